use gallery_services::{
    config::{Config, StoreBackend},
    disk::LocalDisk,
    gallery::{GalleryService, seed_demo_galleries},
    routes,
    share::HttpMailer,
    store::{GalleryStore, MemoryStore, PgStore},
    telemetry, version,
};
use std::net::{IpAddr, SocketAddr};
use tracing::info;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config: Config = Config::init()?;

    // Initialize tracing
    telemetry::init_tracing(&config)?;

    // Print build information
    print_build_info();

    info!(
        environment = %config.environment(),
        server_addr = %config.server_addr(),
        port = %config.port(),
        store_backend = %config.store_backend(),
        upload_dir = %config.upload_dir().display(),
        "Configuration loaded"
    );

    match config.store_backend() {
        StoreBackend::Memory => serve(MemoryStore::new(), config).await,
        StoreBackend::Postgres => {
            let database_url = config
                .database_url()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set for postgres"))?;
            let store = PgStore::connect(database_url).await?;
            store.migrate().await?;
            info!("Database migrations applied");
            serve(store, config).await
        }
    }
}

async fn serve<S: GalleryStore>(store: S, config: Config) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(config.upload_dir()).await?;

    if config.seed_demo_data() {
        let galleries = GalleryService::new(store.clone(), LocalDisk::new(config.upload_dir()));
        seed_demo_galleries(&galleries).await?;
    }

    let mailer = HttpMailer::new(
        config.mail_from(),
        config.mail_api_key().map(str::to_string),
        config.mail_api_url().map(str::to_string),
    );
    info!(endpoint = mailer.endpoint(), "Mailer configured");

    // Create socket address
    let addr = SocketAddr::from((config.server_addr().parse::<IpAddr>()?, config.port()));

    // Build the application router
    let route = routes(store, mailer, config);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, route).await?;

    Ok(())
}

/// Print build information
fn print_build_info() {
    info!("===========================================");
    info!("  Gallery Services");
    info!("===========================================");
    info!("Build Date:   {}", version::build_date());
    info!("Build Commit: {}", version::build_commit());
    info!("Build Branch: {}", version::build_branch());
    info!("===========================================");
}
