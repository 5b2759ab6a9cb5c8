use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use canvass::config::Config;
use canvass::core::ports::repository::Manager;
use canvass::core::services::leader;
use canvass::database::memory::MemoryManager;
use canvass::database::sqlx::PgSqlxManager;
use canvass::handlers;
use sqlx::postgres::PgPoolOptions;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "actix_web=info,canvass=info");
    }
    env_logger::init();
    let config = Config::from_env()?;
    match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new().max_connections(config.max_connections).connect(url).await?;
            sqlx::migrate!().run(&pool).await?;
            serve(PgSqlxManager::new(pool), &config).await
        }
        None => {
            log::warn!("DATABASE_URL not set, records are kept in memory");
            serve(MemoryManager::with_sentinel(), &config).await
        }
    }
}

async fn serve<M>(manager: M, config: &Config) -> anyhow::Result<()>
where
    M: Manager + Clone + Send + 'static,
{
    let default_leader = {
        let mut store = manager.store().await?;
        leader::resolve_default_leader(&mut store, config.default_leader_id).await?
    };
    log::info!("unassigned voters go to leader {}", default_leader.id());
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(Data::new(manager.clone()))
            .app_data(Data::new(default_leader))
            .app_data(handlers::json_config())
            .app_data(handlers::query_config())
            .configure(handlers::routes::<M>)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;
    Ok(())
}
