use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use common::database::{DatabaseConfig, init_pool};
use tokio::net::TcpListener;

use catalog::{
    jwt::{JwtConfig, JwtService},
    repositories::{self, UserRepository, movie::MovieRepository},
    routes,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting catalog service");

    // The signing secret is required; the process refuses to serve without it
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config);

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    repositories::init_schema(&pool).await?;

    info!("Catalog service initialized successfully");

    let movie_repository = MovieRepository::new(pool.clone());
    let user_repository = UserRepository::new(pool.clone());

    let app_state = AppState {
        db_pool: pool,
        movie_repository,
        user_repository,
        jwt_service,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind("0.0.0.0:3000").await?;
    info!("Catalog service listening on 0.0.0.0:3000");

    axum::serve(listener, app).await?;

    Ok(())
}
