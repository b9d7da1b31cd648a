mod radar;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

use prop_sniper::config::Config;
use prop_sniper::exchange::{MemoryProvider, YahooClient};

use crate::radar::SniperRadar;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env().context("invalid configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    if let Some(path) = cfg.replay_file.clone() {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read replay file {path}"))?;
        let provider = MemoryProvider::from_json(&raw)
            .with_context(|| format!("cannot load replay file {path}"))?;
        let mut radar = SniperRadar::new(cfg, Box::new(provider))?;
        let report = radar.run_once().await;
        radar.render(&report);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let market = Box::new(YahooClient::new(&cfg).context("cannot build HTTP client")?);
    let mut radar = SniperRadar::new(cfg, market)?;
    radar.run().await?;

    Ok(())
}
