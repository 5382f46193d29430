/// Fixed-interval collection loop.
///
/// One cycle runs to completion before the sleep starts, so at most one
/// cycle is ever in flight and the remote store never sees concurrent
/// writers from this process. Cycle failures are logged and swallowed; the
/// next timer fire is the retry.
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{error, info};

use crate::data::{normalize_batch, synchronize, RemoteStore};
use crate::error::Result;
use crate::provider::YahooClient;
use crate::time::is_trading_day;
use crate::types::Config;

/// What a single cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Saturday or Sunday in the local zone, nothing fetched
    Weekend,
    /// Provider returned no bars yet (pre-open, holiday)
    EmptyWindow,
    /// Delta appended to the store (zero means nothing new)
    Appended(usize),
}

pub struct Scheduler<S: RemoteStore> {
    config: Config,
    zone: Tz,
    provider: YahooClient,
    store: S,
}

impl<S: RemoteStore> Scheduler<S> {
    pub fn new(config: Config, zone: Tz, provider: YahooClient, store: S) -> Self {
        Scheduler {
            config,
            zone,
            provider,
            store,
        }
    }

    /// Run cycles until Ctrl+C
    pub async fn run(&self) -> Result<()> {
        let interval = std::time::Duration::from_secs(self.config.poll_interval_sec);
        info!(
            "Collector running: {} every {}s into worksheet {}",
            self.config.symbol, self.config.poll_interval_sec, self.config.worksheet
        );

        loop {
            match self.run_cycle_at(Utc::now()).await {
                Ok(CycleOutcome::Weekend) => info!("Weekend - market closed"),
                Ok(CycleOutcome::EmptyWindow) => info!("Provider returned no bars yet"),
                Ok(CycleOutcome::Appended(0)) => info!("No new rows"),
                Ok(CycleOutcome::Appended(n)) => info!("Appended {} new rows", n),
                Err(e) => error!("Cycle failed: {} ({})", e, e.error_code()),
            }

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Ctrl+C received - stopping collector");
                    break;
                }
            }
        }

        Ok(())
    }

    /// One fetch -> normalize -> synchronize cycle, evaluated at `now`
    pub async fn run_cycle_at(&self, now: DateTime<Utc>) -> Result<CycleOutcome> {
        if !is_trading_day(now, self.zone) {
            return Ok(CycleOutcome::Weekend);
        }

        let bars = self.provider.fetch_intraday(&self.config.symbol).await?;
        if bars.is_empty() {
            return Ok(CycleOutcome::EmptyWindow);
        }

        let batch = normalize_batch(&bars, self.zone);
        let appended = synchronize(&self.store, &batch).await?;

        Ok(CycleOutcome::Appended(appended))
    }
}
