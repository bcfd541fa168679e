use actix_web::{web, HttpResponse};
use crate::error::AppError;
use crate::models::{
    LoginRequest, MessageResponse, RegisterDonorRequest, RegisterHospitalRequest,
    RegisterReceiverRequest, RegisteredResponse, Role,
};
use crate::routes::{AppState, AuthContext};

/// Configure registration and login routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register/donor", web::post().to(register_donor))
            .route("/register/receiver", web::post().to(register_receiver))
            .route("/register/hospital", web::post().to(register_hospital))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout)),
    );
}

/// POST /api/v1/auth/register/donor
///
/// Request body:
/// ```json
/// {
///   "name": "string",
///   "email": "string",
///   "password": "string",
///   "contact": "string",
///   "bloodGroup": "O+",
///   "age": 30,
///   "latitude": 12.97,
///   "longitude": 77.59,
///   "lastDonationMonth": "2024-03"
/// }
/// ```
async fn register_donor(
    state: web::Data<AppState>,
    req: web::Json<RegisterDonorRequest>,
) -> Result<HttpResponse, AppError> {
    let donor = state.accounts.register_donor(req.into_inner()).await?;

    Ok(HttpResponse::Created().json(RegisteredResponse {
        id: donor.id,
        user_type: Role::Donor,
    }))
}

async fn register_receiver(
    state: web::Data<AppState>,
    req: web::Json<RegisterReceiverRequest>,
) -> Result<HttpResponse, AppError> {
    let receiver = state.accounts.register_receiver(req.into_inner()).await?;

    Ok(HttpResponse::Created().json(RegisteredResponse {
        id: receiver.id,
        user_type: Role::Receiver,
    }))
}

async fn register_hospital(
    state: web::Data<AppState>,
    req: web::Json<RegisterHospitalRequest>,
) -> Result<HttpResponse, AppError> {
    let hospital = state.accounts.register_hospital(req.into_inner()).await?;

    Ok(HttpResponse::Created().json(RegisteredResponse {
        id: hospital.id,
        user_type: Role::Hospital,
    }))
}

/// POST /api/v1/auth/login
///
/// Request body:
/// ```json
/// { "email": "string", "password": "string", "userType": "donor|receiver|hospital" }
/// ```
async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.accounts.login(req.into_inner()).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Tokens are stateless, so logging out only needs the client to drop its token
async fn logout(ctx: AuthContext) -> HttpResponse {
    let identity = ctx.identity();
    tracing::info!("{} {} logged out", identity.role, identity.user_id);

    HttpResponse::Ok().json(MessageResponse {
        message: "logged out".to_string(),
    })
}
