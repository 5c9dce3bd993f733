use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, warn};

use brewery_rs::{
    create_app, init_observability,
    repositories::{DynamoDbBeerRepository, DynamoDbCustomerRepository, TableManager},
    services::{BeerService, CustomerService, DataSeeder},
    shutdown_observability, Config, Metrics,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_environment()
        .await
        .context("failed to load configuration")?;

    init_observability(&config.observability).context("failed to initialize observability")?;

    info!(
        "Starting {} v{}",
        config.observability.service_name, config.observability.service_version
    );
    info!(
        "Region: {}, tables: beers={}, customers={}",
        config.aws.region, config.database.beers_table_name, config.database.customers_table_name
    );

    let metrics = Arc::new(Metrics::new().context("failed to register metrics")?);
    let dynamodb_client = Arc::new(config.aws.dynamodb_client.clone());

    if config.database.auto_create_tables {
        TableManager::new(dynamodb_client.clone())
            .create_all_tables(
                &config.database.beers_table_name,
                &config.database.customers_table_name,
            )
            .await
            .context("failed to create tables")?;
    }

    let beer_repository = Arc::new(DynamoDbBeerRepository::new(
        dynamodb_client.clone(),
        config.database.beers_table_name.clone(),
        config.database.region.clone(),
    ));
    let customer_repository = Arc::new(DynamoDbCustomerRepository::new(
        dynamodb_client,
        config.database.customers_table_name.clone(),
        config.database.region.clone(),
    ));

    if config.database.seed_data {
        match DataSeeder::new(beer_repository.clone(), customer_repository.clone())
            .seed()
            .await
        {
            Ok(report) => info!(
                "Seeded {} beers and {} customers",
                report.beers_created, report.customers_created
            ),
            Err(e) => warn!("Seeding skipped: {}", e),
        }
    }

    let beer_service = Arc::new(BeerService::new(beer_repository));
    let customer_service = Arc::new(CustomerService::new(customer_repository));

    let app = create_app(metrics, beer_service, customer_service, &config.server);

    let addr = SocketAddr::new(
        config
            .server
            .host
            .parse()
            .context("invalid server host")?,
        config.server.port,
    );
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
    shutdown_observability().await;
}
