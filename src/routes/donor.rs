use actix_web::{web, HttpResponse};
use crate::error::AppError;
use crate::models::{RequestResponse, Role, UpdateDonorRequest};
use crate::routes::{AppState, AuthContext};

/// Configure donor-only routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/donor")
            .route("/dashboard", web::get().to(dashboard))
            .route("/profile", web::put().to(update_profile))
            .route("/requests/{id}/accept", web::post().to(accept_request))
            .route("/requests/{id}/reject", web::post().to(reject_request)),
    );
}

/// GET /api/v1/donor/dashboard
async fn dashboard(
    state: web::Data<AppState>,
    ctx: AuthContext,
) -> Result<HttpResponse, AppError> {
    let donor_id = ctx.require(Role::Donor)?;
    let dashboard = state.dashboards.donor(donor_id).await?;

    Ok(HttpResponse::Ok().json(dashboard))
}

/// PUT /api/v1/donor/profile
async fn update_profile(
    state: web::Data<AppState>,
    ctx: AuthContext,
    req: web::Json<UpdateDonorRequest>,
) -> Result<HttpResponse, AppError> {
    let donor_id = ctx.require(Role::Donor)?;
    let donor = state.accounts.update_donor(donor_id, req.into_inner()).await?;

    Ok(HttpResponse::Ok().json(donor))
}

/// POST /api/v1/donor/requests/{id}/accept
///
/// The receiver is emailed on success; a mail failure does not fail the call.
async fn accept_request(
    state: web::Data<AppState>,
    ctx: AuthContext,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let donor_id = ctx.require(Role::Donor)?;
    let request = state.requests.accept(donor_id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(RequestResponse { request }))
}

/// POST /api/v1/donor/requests/{id}/reject
async fn reject_request(
    state: web::Data<AppState>,
    ctx: AuthContext,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let donor_id = ctx.require(Role::Donor)?;
    let request = state.requests.reject(donor_id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(RequestResponse { request }))
}
