//! Running many sessions and merging their results.

use std::sync::Arc;
use std::time::Duration;

use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{debug, info};

use crate::{
    config::RunConfig,
    error::SimResult,
    ledger::GlobalLedger,
    rng::StdSource,
    session::{mean_of, Session, SessionResult},
};

/// Runs N independent sessions concurrently and merges their results.
///
/// Sessions share no mutable state with each other. The merge is
/// single-threaded and only begins once every session has fully joined, so
/// a partially merged ledger is never observable.
pub struct Orchestrator {
    config: RunConfig,
}

impl Orchestrator {
    /// Create an orchestrator for the given run configuration.
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Run every session, join them all, and merge.
    ///
    /// The number of sessions in flight at once is capped by a semaphore
    /// sized to `max_concurrent` (available parallelism by default); every
    /// session still runs, and merging still waits for all of them.
    pub async fn run(self) -> SimResult<RunReport> {
        let permits = self.config.max_concurrent.unwrap_or_else(default_concurrency);
        let semaphore = Arc::new(Semaphore::new(permits.max(1)));

        let mut tasks = JoinSet::new();
        for index in 0..self.config.sessions {
            let config = self.config.session.clone();
            let semaphore = Arc::clone(&semaphore);
            let rng = match self.config.seed {
                Some(seed) => StdSource::seeded(seed.wrapping_add(index as u64)),
                None => StdSource::from_entropy(),
            };

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .expect("session semaphore never closed");
                Session::new(config).run(rng).await
            });
        }

        let mut results = Vec::with_capacity(self.config.sessions);
        while let Some(joined) = tasks.join_next().await {
            results.push(joined??);
        }

        debug!("all {} sessions joined, merging", results.len());
        Ok(merge(&results))
    }
}

/// Fold fully-joined session results into the run-level report.
fn merge(results: &[SessionResult]) -> RunReport {
    let mut ledger = GlobalLedger::default();
    let mut wait_means = Vec::new();
    let mut service_means = Vec::new();
    let mut overtimes = Vec::new();

    for result in results {
        // A session that served nobody contributes no ratio, but still
        // counts towards the session total.
        if let Some(mean) = result.mean_wait() {
            wait_means.push(mean);
        }
        if let Some(mean) = result.mean_service() {
            service_means.push(mean);
        }
        overtimes.push(result.overtime());
        ledger.merge_session(result.visits());
    }

    let summary = RunSummary {
        sessions: results.len(),
        served: results.iter().map(SessionResult::served).sum(),
        mean_wait: mean_of(&wait_means),
        mean_service: mean_of(&service_means),
        mean_overtime: mean_of(&overtimes),
    };

    info!(
        "run complete: {} sessions, {} students served",
        summary.sessions, summary.served
    );

    RunReport { summary, ledger }
}

/// The outcome of a full run: cross-session aggregates plus the merged
/// ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    summary: RunSummary,
    ledger: GlobalLedger,
}

impl RunReport {
    /// The cross-session scalar aggregates.
    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// The merged visit ledger.
    pub fn ledger(&self) -> &GlobalLedger {
        &self.ledger
    }
}

/// Cross-session scalar aggregates: means of the per-session averages.
///
/// Sessions that served zero students are excluded from the wait and
/// service means; `None` means no session contributed at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// How many sessions ran, including empty ones.
    pub sessions: usize,
    /// Total students served across all sessions.
    pub served: usize,
    /// Mean of the per-session average waits.
    pub mean_wait: Option<Duration>,
    /// Mean of the per-session average service times.
    pub mean_service: Option<Duration>,
    /// Mean overtime across sessions.
    pub mean_overtime: Option<Duration>,
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
