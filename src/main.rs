use sqlx::PgPool;
use std::sync::Arc;
use tallyboard::config::AppConfig;
use tallyboard::game::repository::{InMemoryGameRepository, PostgresGameRepository};
use tallyboard::player::repository::{InMemoryPlayerRepository, PostgresPlayerRepository};
use tallyboard::session::repository::{InMemorySessionRepository, PostgresSessionRepository};
use tallyboard::session::{start_cleanup_task, SessionCleanupConfig};
use tallyboard::shared::AppState;
use tallyboard::tournament::repository::{
    InMemoryTournamentRepository, PostgresTournamentRepository,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tallyboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tallyboard scorekeeping server");

    let config = AppConfig::from_env();

    // DATABASE_URL selects the backing store; without it everything is in memory
    let app_state = match config.database_url.clone() {
        Some(database_url) => {
            let pool = PgPool::connect(&database_url)
                .await
                .expect("Failed to connect to database");
            info!("Connected to PostgreSQL, using database-backed repositories");
            AppState::new(
                Arc::new(PostgresPlayerRepository::new(pool.clone())),
                Arc::new(PostgresTournamentRepository::new(pool.clone())),
                Arc::new(PostgresGameRepository::new(pool.clone())),
                Arc::new(PostgresSessionRepository::new(pool)),
                config.clone(),
            )
        }
        None => {
            info!("DATABASE_URL not set, using in-memory repositories");
            AppState::new(
                Arc::new(InMemoryPlayerRepository::new()),
                Arc::new(InMemoryTournamentRepository::new()),
                Arc::new(InMemoryGameRepository::new()),
                Arc::new(InMemorySessionRepository::new()),
                config.clone(),
            )
        }
    };

    // Periodically purge expired sessions
    tokio::spawn(start_cleanup_task(
        Arc::clone(&app_state.session_repository),
        SessionCleanupConfig::default(),
    ));

    let app = tallyboard::app(app_state);

    let listener = tokio::net::TcpListener::bind(&config.addr).await.unwrap();
    info!("Server running on http://{}", config.addr);
    axum::serve(listener, app).await.unwrap();
}
