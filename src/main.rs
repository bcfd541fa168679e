use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use bloodlink::config::{LoggingSettings, Settings, DEFAULT_JWT_SECRET};
use bloodlink::routes::{self, AppState};
use bloodlink::services::{DisabledMailer, HttpMailer, Notifier, PostgresStore, TokenIssuer};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings.logging);

    info!("Starting Bloodlink matching service...");

    if settings.auth.jwt_secret == DEFAULT_JWT_SECRET {
        warn!("auth.jwt_secret is the built-in default; set JWT_SECRET before running in production");
    }

    let store = PostgresStore::from_settings(&settings.database)
        .await
        .map_err(|e| {
            error!("Failed to connect to PostgreSQL: {}", e);
            io::Error::new(io::ErrorKind::Other, e.to_string())
        })?;

    info!("PostgreSQL store initialized");

    let notifier: Arc<dyn Notifier> = match settings.mail.provider() {
        Some((endpoint, api_key)) => {
            let mailer = HttpMailer::new(
                endpoint.to_string(),
                api_key.to_string(),
                settings.mail.sender.clone(),
                Duration::from_secs(settings.mail.timeout_secs),
            )
            .map_err(|e| {
                error!("Failed to create mail client: {}", e);
                io::Error::new(io::ErrorKind::Other, e.to_string())
            })?;
            info!("Mail notifications enabled via {}", endpoint);
            Arc::new(mailer)
        }
        None => {
            warn!("Mail endpoint or API key not set; acceptance emails will be skipped");
            Arc::new(DisabledMailer)
        }
    };

    let tokens = TokenIssuer::new(&settings.auth.jwt_secret, settings.auth.token_ttl_secs)
        .map_err(|e| {
            error!("Invalid auth settings: {}", e);
            io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
        })?;
    let tokens = Arc::new(tokens);

    let app_state = AppState::new(Arc::new(store), notifier, tokens);

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .configure(routes::configure_extractors)
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
