use actix_web::{web, HttpResponse};
use crate::error::AppError;
use crate::models::Role;
use crate::routes::{AppState, AuthContext};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/hospital/dashboard", web::get().to(dashboard));
}

/// GET /api/v1/hospital/dashboard
async fn dashboard(
    state: web::Data<AppState>,
    ctx: AuthContext,
) -> Result<HttpResponse, AppError> {
    let hospital_id = ctx.require(Role::Hospital)?;
    let dashboard = state.dashboards.hospital(hospital_id).await?;

    Ok(HttpResponse::Ok().json(dashboard))
}
