// ==========================================
// 导入管道故障注入测试（内存存储）
// ==========================================
// 测试目标:
// - 各阶段致命失败后暂存文件均被删除
// - 导入 future 被取消时暂存文件同样被删除
// - 雇主查询并发执行，结果与完成顺序无关
// ==========================================

mod helpers;

use corp_directory_import::importer::{DirectoryImporter, DirectoryImporterImpl, FailureKind, ImportError};
use corp_directory_import::logging;
use corp_directory_import::{EntityKind, ImportRequest};
use helpers::{MockConfig, MockStore};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use test_helpers::stage_file;

const PEOPLE_CSV: &str = "name,designation,companyName\nAnn,CEO,Acme\nBob,CTO,Acme\n";

fn importer(store: Arc<MockStore>, config: MockConfig) -> DirectoryImporterImpl<Arc<MockStore>, MockConfig> {
    DirectoryImporterImpl::new(store, config)
}

fn seeded_store() -> MockStore {
    let store = MockStore::new();
    store.seed_company("Acme");
    store
}

// ==========================================
// 各阶段失败 → 暂存文件删除
// ==========================================

#[tokio::test]
async fn test_cleanup_after_parse_failure() {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    let staged = stage_file(dir.path(), "people.json", "{ not json");
    let store = Arc::new(seeded_store());

    let err = importer(store.clone(), MockConfig::default())
        .import(ImportRequest::new(&staged, "application/json", EntityKind::Person))
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::ParseError(_)));
    assert!(!staged.exists());
    assert_eq!(store.lookup_count(), 0);
}

#[tokio::test]
async fn test_cleanup_after_stream_failure_during_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("people.csv");
    let mut bytes = PEOPLE_CSV.as_bytes().to_vec();
    bytes.extend_from_slice(&[0xC3, 0x28, b',', b'X', b',', b'Y', b'\n']);
    std::fs::write(&path, bytes).unwrap();
    let store = Arc::new(seeded_store());

    let err = importer(store.clone(), MockConfig::default())
        .import(ImportRequest::new(&path, "text/csv", EntityKind::Person))
        .await
        .unwrap_err();

    // 流中途出错: 整批失败，前面的有效行也不写入
    assert!(matches!(err, ImportError::ParseError(_)));
    assert!(store.person_names().is_empty());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_cleanup_after_validation_rejects_everything() {
    let dir = TempDir::new().unwrap();
    let staged = stage_file(dir.path(), "people.csv", "name,designation\nAnn,\n,CTO\n");
    let store = Arc::new(seeded_store());

    let err = importer(store, MockConfig::default())
        .import(ImportRequest::new(&staged, "text/csv", EntityKind::Person))
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::NoValidRecords(EntityKind::Person)));
    assert!(!staged.exists());
}

#[tokio::test]
async fn test_cleanup_after_resolution_failure() {
    let dir = TempDir::new().unwrap();
    let staged = stage_file(dir.path(), "people.csv", PEOPLE_CSV);
    let mut store = seeded_store();
    store.fail_lookup = true;
    let store = Arc::new(store);

    let err = importer(store.clone(), MockConfig::default())
        .import(ImportRequest::new(&staged, "text/csv", EntityKind::Person))
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::StoreUnavailable(_)));
    assert_eq!(err.failure_kind(), FailureKind::StoreFailure);
    assert!(store.person_names().is_empty());
    assert!(!staged.exists());
}

#[tokio::test]
async fn test_cleanup_after_load_failure() {
    let dir = TempDir::new().unwrap();
    let staged = stage_file(dir.path(), "people.csv", PEOPLE_CSV);
    let mut store = seeded_store();
    store.fail_insert = true;
    let store = Arc::new(store);

    let err = importer(store.clone(), MockConfig::default())
        .import(ImportRequest::new(&staged, "text/csv", EntityKind::Person))
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::StoreError(_)));
    assert_eq!(err.failure_kind(), FailureKind::StoreFailure);
    assert!(!staged.exists());
}

#[tokio::test]
async fn test_cleanup_after_config_failure() {
    let dir = TempDir::new().unwrap();
    let staged = stage_file(dir.path(), "people.csv", PEOPLE_CSV);
    let config = MockConfig {
        fail: true,
        ..MockConfig::default()
    };

    let err = importer(Arc::new(seeded_store()), config)
        .import(ImportRequest::new(&staged, "text/csv", EntityKind::Person))
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::StoreError(_)));
    assert!(!staged.exists());
}

#[tokio::test]
async fn test_every_person_unresolved_is_no_valid_records() {
    let dir = TempDir::new().unwrap();
    let staged = stage_file(
        dir.path(),
        "people.csv",
        "name,designation,companyName\nAnn,CEO,Ghost\nBob,CTO,acme\n",
    );

    let err = importer(Arc::new(seeded_store()), MockConfig::default())
        .import(ImportRequest::new(&staged, "text/csv", EntityKind::Person))
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::NoValidRecords(EntityKind::Person)));
    assert!(!staged.exists());
}

// ==========================================
// 取消 → 暂存文件删除
// ==========================================

#[tokio::test]
async fn test_cancelled_import_removes_staged_file() {
    let dir = TempDir::new().unwrap();
    let staged = stage_file(dir.path(), "people.csv", PEOPLE_CSV);
    let mut store = seeded_store();
    store.block_lookups = true;
    let store = Arc::new(store);
    let pipeline = importer(store.clone(), MockConfig::default());

    let outcome = tokio::time::timeout(
        Duration::from_millis(50),
        pipeline.import(ImportRequest::new(&staged, "text/csv", EntityKind::Person)),
    )
    .await;

    assert!(outcome.is_err(), "import should still be waiting on lookups");
    assert_eq!(store.lookup_count(), 1);
    assert!(store.person_names().is_empty());
    assert!(!staged.exists(), "dropped import must remove the staged file");
}

// ==========================================
// 雇主查询并发与顺序
// ==========================================

#[tokio::test]
async fn test_one_lookup_per_name_output_in_input_order() {
    let dir = TempDir::new().unwrap();
    let staged = stage_file(
        dir.path(),
        "people.csv",
        "name,designation,companyName\n\
         p1,Engineer,Slow\n\
         p2,Engineer,Fast\n\
         p3,Engineer,Slow\n\
         p4,Engineer,Missing\n\
         p5,Engineer,Fast\n",
    );
    let store = MockStore::new()
        .with_delay("Slow", 80)
        .with_delay("Missing", 40)
        .with_delay("Fast", 5);
    store.seed_company("Slow");
    store.seed_company("Fast");
    let store = Arc::new(store);

    let result = importer(store.clone(), MockConfig::with_concurrency(4))
        .import(ImportRequest::new(&staged, "text/csv", EntityKind::Person))
        .await
        .unwrap();

    assert_eq!(store.lookup_count(), 3);
    assert_eq!(store.max_in_flight.load(Ordering::SeqCst), 3);
    assert_eq!(
        *store.lookups_finished.lock().unwrap(),
        vec!["Fast", "Missing", "Slow"]
    );

    // 完成顺序被打乱，但写入与诊断仍按输入顺序
    assert_eq!(store.person_names(), vec!["p1", "p2", "p3", "p5"]);
    assert_eq!(result.inserted_count, 4);
    assert_eq!(result.diagnostics, vec!["company not found for p4, Missing"]);
}

#[tokio::test]
async fn test_concurrency_limit_is_respected() {
    let dir = TempDir::new().unwrap();
    let staged = stage_file(
        dir.path(),
        "people.csv",
        "name,designation,companyName\na,E,One\nb,E,Two\nc,E,Three\n",
    );
    let store = MockStore::new()
        .with_delay("One", 30)
        .with_delay("Two", 10);
    store.seed_company("One");
    store.seed_company("Two");
    store.seed_company("Three");
    let store = Arc::new(store);

    let result = importer(store.clone(), MockConfig::with_concurrency(1))
        .import(ImportRequest::new(&staged, "text/csv", EntityKind::Person))
        .await
        .unwrap();

    assert_eq!(result.inserted_count, 3);
    assert_eq!(store.max_in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(
        *store.lookups_finished.lock().unwrap(),
        vec!["One", "Two", "Three"]
    );
}

#[tokio::test]
async fn test_store_side_uniqueness_does_not_block_batch() {
    let dir = TempDir::new().unwrap();
    let staged = stage_file(
        dir.path(),
        "companies.json",
        r#"{"companies": [
            {"name": "Acme", "industry": "Tech"},
            {"name": "Globex", "industry": "Energy"}
        ]}"#,
    );
    let mut store = seeded_store();
    store.unique_company_names = true;
    let store = Arc::new(store);

    let result = importer(store.clone(), MockConfig::default())
        .import(ImportRequest::new(&staged, "application/json", EntityKind::Company))
        .await
        .unwrap();

    assert_eq!(result.inserted_count, 1);
    assert_eq!(result.skipped_count, 1);
    assert_eq!(
        result.diagnostics,
        vec!["record 1: rejected: UNIQUE constraint failed: company.name"]
    );
    assert_eq!(store.company_names(), vec!["Acme", "Globex"]);
}
