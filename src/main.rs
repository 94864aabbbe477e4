use dotenv::dotenv;
use log::{LevelFilter, info};
use squad_stats::ScrapingContext;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let context = ScrapingContext::new()?;
    info!(
        "Scraping {} ({:?} between teams)",
        context.scraping_config.league_url, context.scraping_config.request_delay
    );
    let pipeline = context.into_pipeline()?;
    let path = pipeline.run().await?;
    info!("Done, saved to {}", path.display());
    Ok(())
}
