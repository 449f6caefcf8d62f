use travel_checkout::{
    config::CheckoutConfig, route_handler::router, state::new_application_state,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "travel_checkout=info".into()),
        )
        .init();

    let config = CheckoutConfig::from_env()?;
    let state = new_application_state(&config);
    let router = router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "checkout service listening");
    axum::serve(listener, router).await?;
    Ok(())
}
