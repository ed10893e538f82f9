use std::net::SocketAddr;

use recruitment_portal::{
    config::{Config, StorageBackend},
    database::{
        pool::{create_pool, run_migrations},
        Repositories,
    },
    error::Error,
    routes::build_router,
    services::llm_client::OpenAiClient,
    AppState,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,sqlx=warn"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;

    let repos = match config.storage_backend {
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| Error::Config("DATABASE_URL is required".into()))?;
            let pool = create_pool(url).await?;
            run_migrations(&pool).await?;
            info!("connected to postgres");
            Repositories::postgres(pool)
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; data is lost on restart");
            Repositories::in_memory()
        }
    };

    let llm = OpenAiClient::from_config(&config)?;
    let addr: SocketAddr = config.server_address.parse()?;
    let app = build_router(AppState::new(config, repos, llm));

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
