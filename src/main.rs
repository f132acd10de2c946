use rusty_library_loans::{
    adapters::logging::LoggingMailer,
    adapters::postgres::{PostgresBookRepository, PostgresLoanRepository},
    api::{handlers::AppState, router::create_router},
    application::ServiceDependencies,
    config::AppConfig,
    scheduler,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rusty_library_loans=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().expect("Failed to load configuration");

    // Initialize database connection pool
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    // Initialize adapters
    let service_deps = ServiceDependencies {
        book_repository: Arc::new(PostgresBookRepository::new(pool.clone())),
        loan_repository: Arc::new(PostgresLoanRepository::new(pool.clone())),
        mailer: Arc::new(LoggingMailer::new(config.mail_settings())),
    };

    // Daily late loan reminders
    tokio::spawn(scheduler::run_late_loan_notifier(
        service_deps.clone(),
        config.late_loans_message.clone(),
    ));

    let app_state = Arc::new(AppState { service_deps });
    let app = create_router(app_state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
