use sea_orm::Database;

use orders_pack_backend::config::{self, Config};
use orders_pack_backend::repositories::Repositories;
use orders_pack_backend::services::reconciliation::Reconciler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    config::init_tracing();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;

    let reconciler = Reconciler::new(Repositories::postgres(db));

    tracing::info!("Starting reference reconciliation");
    match reconciler.reconcile_all().await {
        Ok(report) => {
            if report.is_clean() {
                tracing::info!("No dangling references or orphaned orders found");
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Reconciliation failed: {}", e);
            Err(e.into())
        }
    }
}
