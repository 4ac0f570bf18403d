//! End-to-end queue behaviour over the filesystem store and directory endpoint.

use std::sync::Arc;
use std::time::Duration;

use fieldsync_core::{
    Connectivity, CreationMode, Entry, EntryKind, ManualConnectivity, RecordPayload, RecordStore,
    Report, SyncConfig, SyncQueueCoordinator,
};
use fieldsync_file::{DirectoryEndpoint, FileStore, JournalOp};
use tempfile::TempDir;

type Queue = SyncQueueCoordinator<FileStore, DirectoryEndpoint, Arc<ManualConnectivity>>;

fn setup(online: bool) -> (TempDir, Queue, Arc<ManualConnectivity>) {
    let tmp = TempDir::new().unwrap();
    let store = FileStore::new(tmp.path().join("store"));
    let endpoint = DirectoryEndpoint::new(tmp.path().join("remote"));
    let connectivity = Arc::new(ManualConnectivity::new(Connectivity::from_online(online)));
    let queue = SyncQueueCoordinator::new(store, endpoint, connectivity.clone());
    (tmp, queue, connectivity)
}

#[tokio::test]
async fn test_offline_records_upload_after_reconnect() {
    let (_tmp, queue, connectivity) = setup(false);

    let report = queue
        .create_record(RecordPayload::Report(Report::new("Warehouse roof")))
        .await
        .unwrap();
    let entry = queue
        .create_record(RecordPayload::Entry(
            Entry::new(report.id.clone(), EntryKind::Note).with_content("Gutter blocked"),
        ))
        .await
        .unwrap();

    assert_eq!(queue.get_pending_records().await.unwrap().len(), 2);
    assert!(queue.endpoint().delivered().unwrap().is_empty());

    connectivity.set_online(true);
    let flushed = queue.on_connectivity_restored().await.unwrap().unwrap();

    let mut expected = vec![report.id, entry.id];
    expected.sort();

    let mut synced = flushed.synced.clone();
    synced.sort();
    assert_eq!(synced, expected);
    assert!(flushed.is_clean());
    assert!(queue.get_pending_records().await.unwrap().is_empty());
    assert_eq!(queue.endpoint().delivered().unwrap(), expected);
}

#[tokio::test]
async fn test_pending_flag_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let store_dir = tmp.path().join("store");

    let id = {
        let queue = SyncQueueCoordinator::new(
            FileStore::new(&store_dir),
            DirectoryEndpoint::new(tmp.path().join("remote")),
            ManualConnectivity::offline(),
        );
        queue
            .create_record(RecordPayload::Report(Report::new("Basement")))
            .await
            .unwrap()
            .id
    };

    let reopened = FileStore::new(&store_dir);
    let pending = reopened.query_pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, id);
}

#[tokio::test]
async fn test_eager_upload_marks_synced_on_disk() {
    let (_tmp, queue, _connectivity) = setup(true);

    let record = queue
        .create_record(RecordPayload::Report(Report::new("Lobby")))
        .await
        .unwrap();
    assert!(record.sync_pending);

    tokio::time::timeout(Duration::from_secs(5), queue.wait_idle())
        .await
        .unwrap();

    assert_eq!(queue.endpoint().delivered().unwrap(), vec![record.id.clone()]);
    let stored = queue.store().get(&record.id).await.unwrap().unwrap();
    assert!(!stored.sync_pending);
}

#[tokio::test]
async fn test_local_first_journal_records_sync() {
    let tmp = TempDir::new().unwrap();
    let connectivity = Arc::new(ManualConnectivity::online());
    let queue = SyncQueueCoordinator::with_config(
        FileStore::new(tmp.path().join("store")),
        DirectoryEndpoint::new(tmp.path().join("remote")),
        connectivity,
        SyncConfig::default().with_creation_mode(CreationMode::LocalFirst),
    );

    let record = queue
        .create_record(RecordPayload::Report(Report::new("Stairwell")))
        .await
        .unwrap();
    assert!(record.sync_pending);

    let flushed = queue.flush().await.unwrap();
    assert_eq!(flushed.synced, vec![record.id.clone()]);

    let ops: Vec<JournalOp> = queue
        .store()
        .read_journal()
        .unwrap()
        .into_iter()
        .map(|event| event.op)
        .collect();
    assert_eq!(ops, vec![JournalOp::Save, JournalOp::Synced]);
}
