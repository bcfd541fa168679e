// Route exports
pub mod auth;
pub mod donor;
pub mod health;
pub mod hospital;
pub mod receiver;
pub mod session;

use actix_web::web;
use std::sync::Arc;
use crate::error::{handle_json_payload_error, handle_path_error};
use crate::services::{
    AccountService, DashboardService, Notifier, RequestService, Store, TokenIssuer,
};

pub use session::AuthContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenIssuer>,
    pub accounts: AccountService,
    pub dashboards: DashboardService,
    pub requests: RequestService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, notifier: Arc<dyn Notifier>, tokens: Arc<TokenIssuer>) -> Self {
        Self {
            accounts: AccountService::new(store.clone(), tokens.clone()),
            dashboards: DashboardService::new(store.clone()),
            requests: RequestService::new(store.clone(), notifier),
            store,
            tokens,
        }
    }
}

/// Route extractor failures through the JSON error envelope
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
        .app_data(web::PathConfig::default().error_handler(handle_path_error));
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::configure)
            .configure(auth::configure)
            .configure(donor::configure)
            .configure(receiver::configure)
            .configure(hospital::configure),
    );
}
