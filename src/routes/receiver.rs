use actix_web::{web, HttpResponse};
use crate::error::AppError;
use crate::models::{RequestResponse, Role, SendRequestPayload};
use crate::routes::{AppState, AuthContext};

/// Configure receiver-only routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/receiver")
            .route("/dashboard", web::get().to(dashboard))
            .route("/requests", web::post().to(send_request)),
    );
}

/// GET /api/v1/receiver/dashboard
///
/// Donors come back closest first, without the ones this receiver already asked.
async fn dashboard(
    state: web::Data<AppState>,
    ctx: AuthContext,
) -> Result<HttpResponse, AppError> {
    let receiver_id = ctx.require(Role::Receiver)?;
    let dashboard = state.dashboards.receiver(receiver_id).await?;

    Ok(HttpResponse::Ok().json(dashboard))
}

/// POST /api/v1/receiver/requests
///
/// Request body:
/// ```json
/// { "donorId": 42 }
/// ```
async fn send_request(
    state: web::Data<AppState>,
    ctx: AuthContext,
    req: web::Json<SendRequestPayload>,
) -> Result<HttpResponse, AppError> {
    let receiver_id = ctx.require(Role::Receiver)?;
    let request = state.requests.send(receiver_id, req.donor_id).await?;

    Ok(HttpResponse::Created().json(RequestResponse { request }))
}
