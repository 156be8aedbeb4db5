use std::sync::Arc;

use remdu_core::{Backend, MemoryBackend};
use remdu_scan::{scan, Dir, ScanError};

fn sample_backend() -> MemoryBackend {
    let backend = MemoryBackend::new("mem:");
    backend.add_file("top.txt", Some(10));
    backend.add_file("docs/guide.md", Some(100));
    backend.add_file("docs/deep/blob.bin", None);
    backend.add_dir("empty");
    backend
}

async fn scan_to_completion(backend: Arc<dyn Backend>) -> Arc<Dir> {
    let handle = scan(backend);
    handle.done.await.unwrap().unwrap();
    handle.root.await.unwrap()
}

#[tokio::test]
async fn test_scan_aggregates_whole_tree() {
    let root = scan_to_completion(Arc::new(sample_backend())).await;

    let attrs = root.attr();
    assert_eq!(attrs.size, 110);
    assert_eq!(attrs.count, 3);
    assert_eq!(attrs.count_unknown_size, 1);
    assert!(attrs.readable);
    assert!(!attrs.entries_have_errors);

    // children in discovery order (memory backend lists alphabetically)
    let names: Vec<String> = root
        .entries()
        .iter()
        .map(|e| e.name().to_string())
        .collect();
    assert_eq!(names, ["docs", "empty", "top.txt"]);

    let (docs_attrs, err) = root.attr_at(0);
    assert!(docs_attrs.is_dir);
    assert_eq!(docs_attrs.size, 100);
    assert_eq!(docs_attrs.count, 2);
    assert_eq!(docs_attrs.count_unknown_size, 1);
    assert!(err.is_none());

    let (empty_attrs, _) = root.attr_at(1);
    assert!(empty_attrs.is_dir);
    assert_eq!(empty_attrs.count, 0);
    assert!(empty_attrs.readable);
}

#[tokio::test]
async fn test_unreadable_directory_flags_ancestors() {
    let backend = sample_backend();
    backend.fail_dir("docs/deep");
    let root = scan_to_completion(Arc::new(backend)).await;

    assert!(root.attr().entries_have_errors);

    let docs = root.dir_at(0).unwrap();
    assert!(docs.attr().entries_have_errors);
    // the failing directory itself carries the error text
    let deep_index = docs
        .entries()
        .iter()
        .position(|e| e.name() == "deep")
        .unwrap();
    let (deep_attrs, err) = docs.attr_at(deep_index);
    assert!(!deep_attrs.readable);
    assert!(err.unwrap().contains("permission denied"));

    // the failed subtree contributes nothing to the totals
    assert_eq!(root.attr().size, 110);
    assert_eq!(root.attr().count, 2);
}

#[tokio::test]
async fn test_root_failure_is_fatal_and_root_never_arrives() {
    let backend = MemoryBackend::new("mem:");
    backend.add_file("secret/key", Some(1));
    backend.fail_dir("");

    let handle = scan(Arc::new(backend) as Arc<dyn Backend>);
    let result = handle.done.await.unwrap();
    assert!(matches!(result, Err(ScanError::Root { .. })));
    // the root channel closes without ever yielding a node
    assert!(handle.root.await.is_err());
}

#[tokio::test]
async fn test_update_signal_fires() {
    let backend: Arc<dyn Backend> = Arc::new(sample_backend());
    let mut handle = scan(backend);
    // at least one coalesced notification arrives before the channel closes
    assert!(handle.updates.recv().await.is_some());
    handle.done.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_removal_after_scan_updates_totals() {
    let root = scan_to_completion(Arc::new(sample_backend())).await;
    let docs = root.dir_at(0).unwrap();

    // delete "deep" (blob.bin of unknown size lives under it)
    let deep_index = docs
        .entries()
        .iter()
        .position(|e| e.name() == "deep")
        .unwrap();
    docs.remove_child_at(deep_index);

    assert_eq!(root.attr().count, 2);
    assert_eq!(root.attr().count_unknown_size, 0);
    assert_eq!(root.attr().size, 110);
}
