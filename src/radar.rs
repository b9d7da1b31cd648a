use anyhow::Result;
use chrono::Utc;
use std::future::Future;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use prop_sniper::config::Config;
use prop_sniper::core::risk::DailyPlan;
use prop_sniper::exchange::{self, BarProvider};
use prop_sniper::strategies::{ConfluenceEngine, RadarReport, Verdict};
use prop_sniper::trading::{DailyLedger, LedgerCommand, LedgerStatus};

/// Pull loop around the confluence engine. Fetches both frames every
/// refresh, logs the report, and keeps the operator's manual ledger.
pub struct SniperRadar {
    config: Config,
    engine: ConfluenceEngine,
    provider: Box<dyn BarProvider>,
    plan: DailyPlan,
    ledger: DailyLedger,
}

impl SniperRadar {
    pub fn new(config: Config, provider: Box<dyn BarProvider>) -> Result<Self> {
        let engine = ConfluenceEngine::from_config(&config)?;
        let plan = config.risk.daily_plan();

        info!("{}", "=".repeat(60));
        info!("Prop Sniper radar starting up");
        info!("Symbol: {}", config.symbol);
        info!(
            "Policy: {} (upper {:.0} / lower {:.0})",
            config.policy, config.thresholds.upper, config.thresholds.lower
        );
        info!(
            "Frames: trend {} ({}d) | trigger {} ({}d)",
            config.trend.timeframe,
            config.trend.lookback_days,
            config.trigger.timeframe,
            config.trigger.lookback_days
        );
        info!("{}", "=".repeat(60));

        Ok(Self {
            config,
            engine,
            provider,
            plan,
            ledger: DailyLedger::new(Utc::now()),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.print_plan();
        info!("Type win / loss [amount] / reset to update the ledger. Ctrl+C to stop.");

        let mut ticker = tokio::time::interval(Duration::from_secs(self.config.refresh_secs));
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdin_open = true;

        loop {
            tokio::select! {
                _ = shutdown_signal() => {
                    self.shutdown();
                    return Ok(());
                }
                _ = ticker.tick() => {
                    if !self.cycle_until(shutdown_signal()).await {
                        self.shutdown();
                        return Ok(());
                    }
                }
                line = lines.next_line(), if stdin_open => match line {
                    Ok(Some(line)) => self.handle_command(&line),
                    Ok(None) => {
                        debug!("stdin closed; ledger input disabled");
                        stdin_open = false;
                    }
                    Err(e) => {
                        warn!("stdin error: {}", e);
                        stdin_open = false;
                    }
                },
            }
        }
    }

    /// Runs and renders one cycle unless `stop` resolves first. Returns
    /// false if it was stopped.
    async fn cycle_until(&mut self, stop: impl Future<Output = ()>) -> bool {
        tokio::select! {
            _ = stop => false,
            report = self.run_once() => {
                self.render(&report);
                true
            }
        }
    }

    /// One evaluation cycle against freshly fetched data.
    pub async fn run_once(&mut self) -> RadarReport {
        let frames = exchange::fetch_frames(self.provider.as_mut(), &self.config).await;
        self.engine.report(&self.config.symbol, &frames, Utc::now())
    }

    pub fn render(&self, report: &RadarReport) {
        info!("--- {} @ {} UTC ---", report.symbol, report.evaluated_at.format("%H:%M:%S"));
        for s in &report.evaluation.signals {
            match (s.price, s.moving_average, s.oscillator) {
                (Some(p), Some(ma), Some(osc)) => info!(
                    "  {}: {} | close {:.2} | MA20 {:.2} | RSI {:.1}",
                    s.timeframe, s.state, p, ma, osc
                ),
                _ => info!("  {}: {}", s.timeframe, s.state),
            }
        }

        match &report.evaluation.verdict {
            Verdict::AwaitingData => {
                info!("Awaiting data: waiting for the market to open or the feed to recover");
            }
            Verdict::Standby => {
                info!("Patience mode: no premium setup. Preserving the account comes first");
            }
            Verdict::Opportunity(t) => {
                info!("{}", "=".repeat(60));
                info!("HIGH-QUALITY SETUP: {} ({})", t.direction.trade_label(), t.direction);
                info!("  Entry:  {:.2}", t.entry_price);
                info!("  Target: {:.2}", t.target_price);
                info!("  Stop:   {:.2}", t.stop_price);
                info!("  Lots:   {:.2}", t.position_size);
                info!(
                    "  Risk ${:.2} ({}%) | Reward ${:.1} | R:R {:.2}",
                    t.risk_amount,
                    self.config.risk.risk_per_trade_pct,
                    t.reward_amount,
                    t.reward_to_risk()
                );
                info!("{}", "=".repeat(60));
            }
        }

        let open: Vec<&str> = report
            .sessions
            .iter()
            .filter(|s| s.open)
            .map(|s| s.name.as_str())
            .collect();
        if open.is_empty() {
            info!("  Sessions: none open");
        } else {
            info!("  Sessions open: {}", open.join(", "));
        }
    }

    fn handle_command(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        match LedgerCommand::parse(line, &self.plan) {
            Some(LedgerCommand::Record(amount)) => {
                self.ledger.record(amount, Utc::now());
                info!("Ledger: recorded ${:+.2}", amount);
            }
            Some(LedgerCommand::Reset) => {
                self.ledger.reset();
                info!("Ledger: reset");
            }
            None => {
                warn!("Unknown command {:?} (expected win / loss [amount] / reset)", line);
                return;
            }
        }
        self.print_ledger();
    }

    fn print_plan(&self) {
        info!("--- Daily Plan ---");
        info!("  Capital:      ${:.2}", self.config.risk.account_size);
        info!("  Daily goal:   ${:.2}", self.plan.goal_amount);
        info!("  Loss limit:   ${:.2}", self.plan.loss_limit_amount);
        info!("  Risk/trade:   ${:.2}", self.plan.risk_per_trade);
        info!("  Reward/trade: ${:.2}", self.plan.reward_per_trade);
    }

    fn print_ledger(&mut self) {
        if self.ledger.roll_day(Utc::now()) {
            info!("Ledger: new UTC day, tally cleared");
        }
        let status = self.ledger.status(&self.plan);
        info!(
            "Ledger {}: {}W / {}L | net ${:+.2} | {}",
            self.ledger.day(),
            self.ledger.wins(),
            self.ledger.losses(),
            self.ledger.net(),
            status
        );
        match status {
            LedgerStatus::GoalReached => info!("Daily goal reached. Consider standing down."),
            LedgerStatus::LossLimitHit => warn!("Daily loss limit hit. Stop trading for today."),
            LedgerStatus::Trading => {}
        }
    }

    fn shutdown(&mut self) {
        info!("Shutting down...");
        self.print_ledger();
        info!("Radar stopped.");
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("cannot listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use prop_sniper::error::ProviderError;
    use prop_sniper::exchange::{BarRequest, MemoryProvider};
    use prop_sniper::models::BarSeries;

    struct StalledProvider;

    #[async_trait]
    impl BarProvider for StalledProvider {
        async fn fetch_bars(&mut self, _: &BarRequest) -> Result<BarSeries, ProviderError> {
            std::future::pending().await
        }
    }

    fn config() -> Config {
        Config::from_lookup(|_| None).unwrap()
    }

    #[tokio::test]
    async fn stop_interrupts_a_stalled_fetch() {
        let mut radar = SniperRadar::new(config(), Box::new(StalledProvider)).unwrap();
        let finished = tokio::time::timeout(Duration::from_secs(1), radar.cycle_until(async {}))
            .await
            .expect("cycle did not yield to the stop signal");
        assert!(!finished);
    }

    #[tokio::test]
    async fn cycle_completes_without_stop() {
        let mut radar = SniperRadar::new(config(), Box::new(MemoryProvider::new())).unwrap();
        let finished = radar.cycle_until(std::future::pending()).await;
        assert!(finished);
    }
}
