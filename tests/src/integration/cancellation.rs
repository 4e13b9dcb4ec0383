//! Cancellation releases in-flight downloads and staged files.

#![cfg(test)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mn_history_sync::{
    ConsensusStatement, FetchQuorumSetsWork, FileCategory, HistoryRecord, HistorySyncConfig,
    HistorySyncService, MockArchive, QuorumInferenceEngine, QuorumSet,
};
use mn_work_scheduler::{SchedulerConfig, WorkNode, WorkScheduler};
use tokio::sync::oneshot;

use crate::init_test_logging;

const CAT: FileCategory = FileCategory::ConsensusHistory;

fn slow_archive(config: &HistorySyncConfig, delay_ms: u32) -> Arc<MockArchive> {
    let step = config.checkpoint_frequency;
    let tip = step * 8 - 1;
    let archive = Arc::new(MockArchive::new(tip));
    let mut seq = step - 1;
    while seq <= tip {
        archive.put_records(
            CAT,
            seq,
            &[HistoryRecord {
                ledger_seq: seq,
                statements: vec![ConsensusStatement {
                    node_id: [9; 32],
                    quorum_set: Some(QuorumSet::flat(1, vec![[9; 32]])),
                }],
            }],
            false,
        );
        seq += step;
    }
    archive.set_file_delay_ms(delay_ms);
    archive
}

fn staging_dirs(root: &Path) -> usize {
    std::fs::read_dir(root)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("mn-history-"))
        .count()
}

/// Aborting the scheduler task mid-download drops the work tree: the
/// staging directory disappears and no outcome is ever delivered.
#[tokio::test]
async fn aborted_run_removes_staging_and_delivers_no_outcome() {
    init_test_logging();

    let root = tempfile::tempdir().unwrap();
    let config = HistorySyncConfig {
        staging_root: Some(root.path().to_path_buf()),
        ..HistorySyncConfig::for_testing()
    };
    let archive = slow_archive(&config, 60_000);

    let engine = Arc::new(Mutex::new(QuorumInferenceEngine::new()));
    let (tx, rx) = oneshot::channel();
    let work = FetchQuorumSetsWork::new(archive, config, engine.clone(), tx);
    let node = WorkNode::new(Box::new(work));

    let scheduler = WorkScheduler::new(SchedulerConfig::for_testing());
    let handle = tokio::spawn(async move { scheduler.run(node).await });

    // Let the run reach the stalled batch download; staging exists by then.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(staging_dirs(root.path()), 1);

    handle.abort();
    let joined = handle.await;
    assert!(joined.unwrap_err().is_cancelled());

    assert_eq!(staging_dirs(root.path()), 0);
    assert!(rx.await.is_err(), "cancelled run must not report an outcome");
    assert_eq!(engine.lock().unwrap().records_seen(), 0);
}

/// Dropping the service future (here via a timeout) cancels the run the
/// same way and the service surfaces it as `Cancelled`.
#[tokio::test]
async fn timed_out_service_call_cancels_cleanly() {
    init_test_logging();

    let root = tempfile::tempdir().unwrap();
    let config = HistorySyncConfig {
        staging_root: Some(root.path().to_path_buf()),
        ..HistorySyncConfig::for_testing()
    };
    let archive = slow_archive(&config, 60_000);
    let service = HistorySyncService::new(config);

    let result = tokio::time::timeout(
        Duration::from_millis(200),
        service.fetch_recent_quorum_sets(archive),
    )
    .await;
    assert!(result.is_err(), "stalled run should hit the timeout");

    // The future is dropped by the timeout; nothing staged survives.
    assert_eq!(staging_dirs(root.path()), 0);
    assert_eq!(service.quorum_snapshot().records_seen, 0);
}
