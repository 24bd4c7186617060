mod api;

use anyhow::Result;
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(name = "station-service")]
struct Args {
    #[arg(long, env = "DB_HOST", default_value = "postgres")]
    db_host: String,

    #[arg(long, env = "DB_NAME", default_value = "evcharging")]
    db_name: String,

    #[arg(long, env = "DB_USER", default_value = "postgres")]
    db_user: String,

    #[arg(long, env = "DB_PASSWORD", default_value = "postgres")]
    db_password: String,

    #[arg(long, env = "PORT", default_value = "5000")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let database_url =
        shared::db::database_url(&args.db_host, &args.db_name, &args.db_user, &args.db_password);
    shared::db::prepare_database(&database_url).await?;
    let pool = shared::db::build_pool(&database_url).await?;

    let app = api::create_router(api::AppState { pool });
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", args.port)).await?;

    info!("station service listening on port {}", args.port);
    axum::serve(listener, app).await?;

    Ok(())
}
