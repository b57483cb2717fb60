use actix_web::{web, App, HttpServer};
use anyhow::Context;
use mpesa_pay::config::{AppConfig, Config, DatabaseConfig};
use mpesa_pay::gateways::MpesaClient;
use mpesa_pay::middleware::{RequestId, RequestIdRootSpan};
use mpesa_pay::payments::{
    CallbackHandler, MySqlPaymentRepository, PaymentController, PaymentRepository, PaymentService,
};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(app: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("mpesa_pay={},actix_web=info", app.log_level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if app.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    init_tracing(&config.app);

    tracing::info!("Starting M-Pesa payment service");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool
    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    DatabaseConfig::run_migrations(&db_pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    let repository: Arc<dyn PaymentRepository> =
        Arc::new(MySqlPaymentRepository::new(db_pool.clone()));
    let gateway = Arc::new(MpesaClient::new(&config.mpesa));

    let payment_controller = web::Data::new(PaymentController::new(
        PaymentService::new(gateway, repository.clone(), config.mpesa.clone()),
        CallbackHandler::new(repository),
    ));

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::<RequestIdRootSpan>::new())
            .wrap(RequestId)
            .app_data(web::Data::new(db_pool.clone()))
            .configure(|cfg| mpesa_pay::configure_routes(cfg, payment_controller.clone()))
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await.context("HTTP server error")
}
