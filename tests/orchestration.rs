use std::time::Duration;

use assert_matches::assert_matches;
use office_hours::{
    Orchestrator, ReportEngine, RunConfig, RunReport, SessionConfig, SimError, SortColumn,
    SortDirection,
};

fn quick_session() -> SessionConfig {
    SessionConfig::builder()
        .nominal_duration(Duration::from_secs(20))
        .arrival_interval(2..=4)
        .service_duration(1..=3)
        .build()
}

async fn seeded_run(sessions: usize, seed: u64) -> RunReport {
    let config = RunConfig::builder()
        .sessions(sessions)
        .seed(seed)
        .session(quick_session())
        .build();

    Orchestrator::new(config).run().await.unwrap()
}

/// Given a seeded run
/// When it is executed twice
/// Then both summaries and ledgers are identical
#[tokio::test(start_paused = true)]
async fn seeded_runs_reproduce() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let first = seeded_run(4, 42).await;
    let second = seeded_run(4, 42).await;

    assert_eq!(first, second);
    assert_eq!(first.summary().sessions, 4);
    assert!(first.summary().served > 0);
}

/// Given the same seeded run
/// When sessions are forced to run one at a time
/// Then the outcome does not change
#[tokio::test(start_paused = true)]
async fn concurrency_cap_does_not_change_a_seeded_run() {
    let concurrent = seeded_run(4, 7).await;

    let config = RunConfig::builder()
        .sessions(4)
        .seed(7)
        .max_concurrent(1)
        .session(quick_session())
        .build();
    let serial = Orchestrator::new(config).run().await.unwrap();

    assert_eq!(concurrent, serial);
}

/// Given a completed run
/// Then every recorded service event is accounted for in the ledger,
/// and every wait and overtime is non-negative by construction
#[tokio::test(start_paused = true)]
async fn ledger_counts_match_service_events() {
    let report = seeded_run(6, 99).await;

    let ledger_total: u64 = report
        .ledger()
        .iter()
        .map(|(_, record)| record.count())
        .sum();

    assert_eq!(ledger_total, report.summary().served as u64);
}

/// Given sessions whose first arrival would land long after the clock
/// When the whole run completes
/// Then the cross-session means skip the empty sessions without dividing
/// by zero
#[tokio::test(start_paused = true)]
async fn empty_sessions_do_not_fault_the_means() {
    let config = RunConfig::builder()
        .sessions(3)
        .seed(1)
        .session(
            SessionConfig::builder()
                .nominal_duration(Duration::from_secs(10))
                .arrival_interval(100..=120)
                .build(),
        )
        .build();

    let report = Orchestrator::new(config).run().await.unwrap();
    let summary = report.summary();

    assert_eq!(summary.sessions, 3);
    assert_eq!(summary.served, 0);
    assert_eq!(summary.mean_wait, None);
    assert_eq!(summary.mean_service, None);
    assert_eq!(summary.mean_overtime, Some(Duration::ZERO));
    assert!(report.ledger().is_empty());
}

/// Given an inverted arrival interval
/// When the run starts
/// Then it aborts with the configuration error instead of hanging
#[tokio::test(start_paused = true)]
async fn inverted_range_aborts_the_run() {
    let config = RunConfig::builder()
        .sessions(2)
        .seed(3)
        .session(SessionConfig::builder().arrival_interval(15..=5).build())
        .build();

    let error = Orchestrator::new(config).run().await.unwrap_err();

    assert_matches!(error, SimError::InvalidRange { min: 15, max: 5 });
}

/// Given the merged ledger of a full run
/// When it is sorted and searched through the report engine
/// Then the orderings reverse cleanly and binary search agrees with a
/// linear scan
#[tokio::test(start_paused = true)]
async fn report_over_a_real_run() {
    let report = seeded_run(6, 2024).await;
    let ledger = report.ledger();
    let engine = ReportEngine::new(ledger);

    let ascending = engine.sort(SortColumn::Name, SortDirection::Ascending);
    let mut descending = engine.sort(SortColumn::Name, SortDirection::Descending);
    descending.reverse();
    assert_eq!(ascending, descending);

    for (name, record) in ledger.iter() {
        assert_eq!(engine.search_by_name(name), Some(record));

        for &topic in record.topics() {
            let students = engine
                .search_by_topic(topic)
                .expect("a visited topic is searchable");
            assert!(students.contains(name));
        }
    }
    assert_eq!(engine.search_by_name("Student"), None);
}
