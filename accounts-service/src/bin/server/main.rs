use std::sync::Arc;

use accounts_service::config::Config;
use accounts_service::domain::auth::ports::AuthServicePort;
use accounts_service::domain::auth::ports::Clock;
use accounts_service::domain::auth::ports::SystemClock;
use accounts_service::domain::auth::service::AuthService;
use accounts_service::domain::user::ports::UserServicePort;
use accounts_service::domain::user::service::UserService;
use accounts_service::inbound::http::router::create_router;
use accounts_service::inbound::http::router::AppState;
use accounts_service::outbound::repositories::PostgresUserRepository;
use chrono::Duration;
use session_auth::TokenCodec;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "accounts_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "accounts-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        token_ttl_minutes = config.auth.token_ttl_minutes,
        default_role = %config.auth.default_role,
        min_password_length = config.auth.min_password_length,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));
    let token_codec = Arc::new(TokenCodec::new(
        config.auth.token_secret.as_bytes(),
        Duration::minutes(config.auth.token_ttl_minutes),
    ));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let auth_service: Arc<dyn AuthServicePort> = Arc::new(AuthService::new(
        Arc::clone(&user_repository),
        Arc::clone(&token_codec),
        Arc::clone(&clock),
        config.auth.default_role,
    ));
    let user_service: Arc<dyn UserServicePort> = Arc::new(UserService::new(user_repository));

    let state = AppState {
        auth_service,
        user_service,
        token_codec,
        clock,
        min_password_length: config.auth.min_password_length,
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(state)).await?;

    Ok(())
}
