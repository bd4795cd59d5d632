use dotenv::dotenv;
use futures::future::try_join;
use log::info;

use todo_backend::config::Config;
use todo_backend::service::TodoService;
use todo_backend::{axum_api, db, hyper_api, Result};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    pretty_env_logger::init();

    let config = Config::from_env()?;

    let pool = db::establish_pool(&config.database_url, config.pool_size)?;
    db::run_migrations(&pool)?;
    info!("store ready at {}", config.database_url);

    let service = TodoService::new(pool);

    try_join(
        hyper_api::serve(config.hyper_addr, service.clone()),
        axum_api::serve(config.axum_addr, service),
    )
    .await?;

    Ok(())
}
