use eurofx_api::{Config, RatesService};
use tracing::info;

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: sqlx::PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    let config = Config::from_secrets(&secrets);
    info!("Источник курсов: {}", config.feed_endpoint);
    let router = RatesService::new(pool, config).run().await?;
    info!("Служба курсов валют готова к использованию");
    Ok(router.into())
}
