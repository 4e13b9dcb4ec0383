//! Full fetch-and-infer runs against mock and local-directory archives.

#![cfg(test)]

use std::sync::Arc;

use mn_history_sync::{
    ConsensusStatement, FetchOutcome, FileCategory, HistoryRecord, HistorySyncConfig,
    HistorySyncService, LocalDirArchive, MockArchive, QuorumSet,
};

use crate::init_test_logging;

const CAT: FileCategory = FileCategory::ConsensusHistory;

fn record(ledger_seq: u32, node: u8, qset: Option<QuorumSet>) -> HistoryRecord {
    HistoryRecord {
        ledger_seq,
        statements: vec![ConsensusStatement {
            node_id: [node; 32],
            quorum_set: qset,
        }],
    }
}

/// The reference scenario: tip 10000, step 64, window 100 checkpoints.
/// One archive-state request, 101 files downloaded, 101 files scanned.
#[tokio::test]
async fn recent_window_downloads_and_scans_101_checkpoints() {
    init_test_logging();

    let config = HistorySyncConfig {
        checkpoint_frequency: 64,
        num_checkpoints: 100,
        ..HistorySyncConfig::for_testing()
    };
    let archive = Arc::new(MockArchive::new(10000));
    let qset = QuorumSet::flat(2, vec![[1; 32], [2; 32], [3; 32]]);
    let mut seq = 3600;
    while seq <= 10000 {
        archive.put_records(
            CAT,
            seq,
            &[record(seq, 1, Some(qset.clone()))],
            (seq / 64) % 2 == 0, // mix gzipped and plain files
        );
        seq += 64;
    }

    let service = HistorySyncService::new(config);
    let outcome = service
        .fetch_recent_quorum_sets(archive.clone())
        .await
        .unwrap();

    assert_eq!(outcome, FetchOutcome::Success);
    assert_eq!(archive.state_calls(), 1);
    assert_eq!(archive.file_calls(), 101);

    let snapshot = service.quorum_snapshot();
    assert_eq!(snapshot.records_seen, 101);
    assert_eq!(snapshot.qsets.len(), 1);
    assert_eq!(snapshot.qsets[0].count, 101);
}

/// A young archive (tip below the first checkpoint boundary) completes
/// successfully with nothing downloaded and nothing scanned.
#[tokio::test]
async fn degenerate_window_completes_with_zero_files() {
    init_test_logging();

    let config = HistorySyncConfig {
        checkpoint_frequency: 64,
        ..HistorySyncConfig::for_testing()
    };
    let archive = Arc::new(MockArchive::new(50));

    let service = HistorySyncService::new(config);
    let outcome = service
        .fetch_recent_quorum_sets(archive.clone())
        .await
        .unwrap();

    assert_eq!(outcome, FetchOutcome::Success);
    assert_eq!(archive.state_calls(), 1);
    assert_eq!(archive.file_calls(), 0);
    assert_eq!(service.quorum_snapshot().records_seen, 0);
}

/// Transient download failures recover within the retry budget and the
/// run still reports success.
#[tokio::test]
async fn flaky_downloads_recover_within_budget() {
    init_test_logging();

    let config = HistorySyncConfig::for_testing();
    let step = config.checkpoint_frequency;
    let tip = step * 8 - 1;
    let archive = Arc::new(MockArchive::new(tip));
    let mut seq = step - 1;
    while seq <= tip {
        archive.put_records(CAT, seq, &[record(seq, 4, None)], false);
        seq += step;
    }
    archive.fail_next_file_fetches(3);

    let service = HistorySyncService::new(config);
    let outcome = service.fetch_recent_quorum_sets(archive).await.unwrap();
    assert_eq!(outcome, FetchOutcome::Success);
}

/// A full run against an archive laid out on disk, including gzipped
/// checkpoint files.
#[tokio::test]
async fn local_directory_archive_round_trip() -> anyhow::Result<()> {
    init_test_logging();

    let config = HistorySyncConfig::for_testing();
    let step = config.checkpoint_frequency;
    let tip = step * 6 - 1;

    let root = tempfile::tempdir()?;
    let archive = LocalDirArchive::new(root.path());
    archive
        .publish_state(&mn_history_sync::ArchiveState {
            current_checkpoint: tip,
            network_id: "testnet".into(),
            bucket_list_hash: [0; 32],
            version: 1,
        })
        .await?;

    let qset = QuorumSet::flat(1, vec![[7; 32]]);
    let mut seq = step - 1;
    while seq <= tip {
        archive
            .publish_records(
                CAT,
                seq,
                &[record(seq, 7, Some(qset.clone()))],
                (seq / step) % 2 == 0, // alternate gzipped and plain
            )
            .await?;
        seq += step;
    }

    let service = HistorySyncService::new(config);
    let outcome = service
        .fetch_recent_quorum_sets(Arc::new(archive))
        .await
        .unwrap();

    assert_eq!(outcome, FetchOutcome::Success);
    let snapshot = service.quorum_snapshot();
    assert!(snapshot.records_seen > 0);
    assert_eq!(snapshot.qsets.len(), 1);
    assert_eq!(snapshot.insane_skipped, 0);
    Ok(())
}

/// Retries exhausted on a permanently failing archive end in a single
/// timed-out outcome.
#[tokio::test]
async fn unreachable_archive_times_out() {
    init_test_logging();

    let config = HistorySyncConfig::for_testing();
    let archive = Arc::new(MockArchive::new(63));
    archive.fail_next_state_fetches(u32::MAX);

    let service = HistorySyncService::new(config);
    let outcome = service.fetch_recent_quorum_sets(archive).await.unwrap();
    assert_eq!(outcome, FetchOutcome::TimedOut);
}
