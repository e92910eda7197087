//! Exchange Sync Job
//!
//! Syncs every configured (source × target) currency pair once on startup and
//! then on a fixed interval until shutdown:
//! - Pairs run one at a time, sources in the outer loop, targets in the inner
//! - Self pairs (BRL/BRL) are skipped
//! - A failing pair is logged and the cycle moves on to the next pair
//! - Shutdown is checked before each pair; a pair already in flight finishes

use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::config::SyncConfig;
use crate::models::exchange::CurrencyPair;
use crate::services::exchange_sync::{ExchangeSyncService, SyncError};
use crate::shutdown::Shutdown;

/// One pair that failed during a cycle.
#[derive(Debug)]
pub struct PairFailure {
    pub pair: CurrencyPair,
    pub error: SyncError,
}

/// Outcome of one pass over all configured pairs.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub synced: usize,
    pub skipped: usize,
    pub failures: Vec<PairFailure>,
    /// Shutdown arrived before every pair was attempted.
    pub interrupted: bool,
}

pub struct ExchangeSyncJob {
    sync: ExchangeSyncService,
    source_currencies: Vec<String>,
    target_currencies: Vec<String>,
    interval: Duration,
}

impl ExchangeSyncJob {
    pub fn new(config: &SyncConfig, sync: ExchangeSyncService) -> Self {
        Self {
            sync,
            source_currencies: config.source_currencies.clone(),
            target_currencies: config.target_currencies.clone(),
            interval: config.interval,
        }
    }

    /// Pairs in sync order, self pairs included.
    pub fn pairs(&self) -> impl Iterator<Item = CurrencyPair> + '_ {
        self.source_currencies.iter().flat_map(move |from| {
            self.target_currencies
                .iter()
                .map(move |to| CurrencyPair::new(from.as_str(), to.as_str()))
        })
    }

    /// Attempt every pair once.
    pub async fn run_cycle(&self, shutdown: &Shutdown) -> CycleReport {
        let mut report = CycleReport::default();

        for pair in self.pairs() {
            if shutdown.is_triggered() {
                info!("Shutdown requested, stopping exchange sync cycle early");
                report.interrupted = true;
                break;
            }

            if pair.is_self_pair() {
                report.skipped += 1;
                continue;
            }

            match self.sync.sync_pair(&pair).await {
                Ok(rate) => {
                    debug!(pair = %pair, rate = rate, "Synced exchange rate");
                    report.synced += 1;
                }
                Err(e) => {
                    error!(pair = %pair, error = %e, "Failed to sync exchange rate");
                    report.failures.push(PairFailure { pair, error: e });
                }
            }
        }

        report
    }

    /// Run cycles until `shutdown` fires. The first cycle starts immediately.
    pub async fn run(self, shutdown: Shutdown) {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = shutdown.triggered() => {
                    info!("Shutdown signal received, stopping exchange sync job");
                    break;
                }
                _ = ticker.tick() => {
                    info!(provider = self.sync.provider_name(), "Starting exchange sync cycle");

                    let report = self.run_cycle(&shutdown).await;

                    info!(
                        synced = report.synced,
                        skipped = report.skipped,
                        failed = report.failures.len(),
                        "Exchange sync cycle complete"
                    );
                }
            }
        }
    }
}

/// Spawn the exchange sync job on the runtime.
pub fn start_exchange_sync_job(job: ExchangeSyncJob, shutdown: Shutdown) -> JoinHandle<()> {
    info!(
        interval_secs = job.interval.as_secs(),
        sources = ?job.source_currencies,
        targets = ?job.target_currencies,
        "Initializing exchange sync job"
    );

    tokio::spawn(job.run(shutdown))
}
