//! End-to-end export tests against an in-memory query service

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use fauna_dump::adapters::service::{PageRequest, QueryService, ReadMode};
use fauna_dump::config::{CollectionOverrides, DumpConfig, FileNameCase};
use fauna_dump::core::export::{ExportCoordinator, ExportOptions, ProgressEvent};
use fauna_dump::core::hooks::{ConfigHooks, DefaultHooks, ExportHooks};
use fauna_dump::core::retry::RetryPolicy;
use fauna_dump::domain::{
    Collection, CollectionId, Cursor, DumpError, Page, Record, Result, Row,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
}

/// A document with its last-modified time
struct Doc {
    ts: DateTime<Utc>,
    record: Record,
}

/// In-memory database paginating by offset
struct MemoryDb {
    collections: Vec<(String, Vec<Doc>)>,
    fail_first: AtomicUsize,
    fetches: AtomicUsize,
}

impl MemoryDb {
    fn new() -> Self {
        Self {
            collections: Vec::new(),
            fail_first: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        }
    }

    fn with_collection(mut self, name: &str, docs: Vec<(u32, Value)>) -> Self {
        let docs = docs
            .into_iter()
            .enumerate()
            .map(|(i, (hour, data))| Doc {
                ts: at(hour),
                record: Record::new((i + 1).to_string(), data.as_object().cloned().unwrap()),
            })
            .collect();
        self.collections.push((name.to_string(), docs));
        self
    }

    fn failing_first(self, failures: usize) -> Self {
        self.fail_first.store(failures, Ordering::SeqCst);
        self
    }

    fn visible<'a>(&'a self, request: &PageRequest) -> Vec<&'a Record> {
        let docs = self
            .collections
            .iter()
            .find(|(name, _)| name == request.collection.id.as_str())
            .map(|(_, docs)| docs.as_slice())
            .unwrap_or_default();

        docs.iter()
            .filter(|doc| match &request.mode {
                ReadMode::FullSnapshot { at } => doc.ts <= *at,
                ReadMode::Incremental { start, end, .. } => doc.ts > *start && doc.ts <= *end,
            })
            .map(|doc| &doc.record)
            .collect()
    }
}

#[async_trait]
impl QueryService for MemoryDb {
    async fn list_collections(&self) -> Result<Vec<Collection>> {
        Ok(self
            .collections
            .iter()
            .map(|(name, _)| {
                Collection::new(CollectionId::new(name.clone()).unwrap(), json!({ "id": name }))
            })
            .collect())
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let remaining = self.fail_first.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_first.store(remaining - 1, Ordering::SeqCst);
            return Err(DumpError::TransientQuery("status 503: unavailable".to_string()));
        }

        let offset = request
            .after
            .as_ref()
            .and_then(|c| c.as_value().as_u64())
            .unwrap_or(0) as usize;
        let visible = self.visible(request);
        let end = (offset + request.page_size).min(visible.len());
        let records = visible[offset..end].iter().map(|r| (*r).clone()).collect();
        let after = (end < visible.len()).then(|| Cursor::new(json!(end)));
        Ok(Page::new(records, after))
    }

    fn endpoint(&self) -> &str {
        "memory://test"
    }
}

fn options(dir: &Path, page_size: usize) -> ExportOptions {
    ExportOptions {
        output_dir: dir.to_path_buf(),
        page_size,
        end_time: at(23),
        retry: RetryPolicy::forever().with_delays(Duration::ZERO, Duration::ZERO),
        ..Default::default()
    }
}

fn users() -> Vec<(u32, Value)> {
    vec![
        (1, json!({"name": "Ada", "age": 36})),
        (2, json!({"name": "Grace", "age": 85})),
        (3, json!({"name": "Linus", "age": null})),
        (4, json!({"name": "Barbara, L.", "age": 40})),
        (5, json!({"name": "Edsger", "age": 72})),
    ]
}

const USERS_CSV: &str = "id,name,age\r\n\
    \"1\",\"Ada\",36\r\n\
    \"2\",\"Grace\",85\r\n\
    \"3\",\"Linus\",\r\n\
    \"4\",\"Barbara, L.\",40\r\n\
    \"5\",\"Edsger\",72";

fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[tokio::test]
async fn test_full_snapshot_export_pages_through_collection() {
    let dir = TempDir::new().unwrap();
    let db = Arc::new(MemoryDb::new().with_collection("User", users()));

    let coordinator =
        ExportCoordinator::new(db.clone(), options(dir.path(), 2), Arc::new(DefaultHooks));
    let summary = coordinator.execute_export().await.unwrap();

    assert_eq!(read(dir.path().join("User.csv")), USERS_CSV);
    assert_eq!(summary.total_records, 5);

    let user = summary.collection("User").unwrap();
    assert_eq!(user.pages, 3);
    assert_eq!(db.fetches.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_snapshot_excludes_documents_written_after_end_time() {
    let dir = TempDir::new().unwrap();
    let db = Arc::new(MemoryDb::new().with_collection("User", users()));

    let mut opts = options(dir.path(), 10);
    opts.end_time = at(2);
    let coordinator = ExportCoordinator::new(db, opts, Arc::new(DefaultHooks));
    let summary = coordinator.execute_export().await.unwrap();

    assert_eq!(summary.total_records, 2);
    assert_eq!(
        read(dir.path().join("User.csv")),
        "id,name,age\r\n\"1\",\"Ada\",36\r\n\"2\",\"Grace\",85"
    );
}

#[tokio::test]
async fn test_include_list_and_lowercase_file_names() {
    let dir = TempDir::new().unwrap();
    let db = Arc::new(
        MemoryDb::new()
            .with_collection("User", users())
            .with_collection("Order", vec![(1, json!({"total": 10}))]),
    );

    let mut config = DumpConfig::default();
    config.export.file_name_case = FileNameCase::Lower;

    let mut opts = options(dir.path(), 1000);
    opts.collections = vec!["user".to_string()];
    let coordinator =
        ExportCoordinator::new(db, opts, Arc::new(ConfigHooks::from_config(&config)));
    let summary = coordinator.execute_export().await.unwrap();

    assert_eq!(summary.collections.len(), 1);
    assert_eq!(read(dir.path().join("user.csv")), USERS_CSV);
    assert!(!dir.path().join("order.csv").exists());
    assert!(!dir.path().join("Order.csv").exists());
}

#[tokio::test]
async fn test_transient_failures_do_not_change_output() {
    let dir = TempDir::new().unwrap();
    let db = Arc::new(
        MemoryDb::new()
            .with_collection("User", users())
            .failing_first(3),
    );

    let coordinator =
        ExportCoordinator::new(db.clone(), options(dir.path(), 2), Arc::new(DefaultHooks));
    coordinator.execute_export().await.unwrap();

    assert_eq!(read(dir.path().join("User.csv")), USERS_CSV);
    assert_eq!(db.fetches.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn test_fatal_failure_aborts_export() {
    struct Broken;

    #[async_trait]
    impl QueryService for Broken {
        async fn list_collections(&self) -> Result<Vec<Collection>> {
            Ok(vec![Collection::new(CollectionId::new("User").unwrap(), json!(null))])
        }

        async fn fetch_page(&self, _request: &PageRequest) -> Result<Page> {
            Err(DumpError::FatalQuery("status 401: unauthorized".to_string()))
        }

        fn endpoint(&self) -> &str {
            "memory://broken"
        }
    }

    let dir = TempDir::new().unwrap();
    let coordinator =
        ExportCoordinator::new(Arc::new(Broken), options(dir.path(), 2), Arc::new(DefaultHooks));
    let err = coordinator.execute_export().await.unwrap_err();

    assert!(matches!(err, DumpError::FatalQuery(_)));
    assert_eq!(err.exit_code(), 5);
}

#[tokio::test]
async fn test_incremental_export_reads_changed_documents_only() {
    let dir = TempDir::new().unwrap();
    let db = Arc::new(MemoryDb::new().with_collection("User", users()));

    let mut config = DumpConfig::default();
    config.export.index_template = Some("{collection}_by_ts".to_string());

    let mut opts = options(dir.path(), 2);
    opts.start_time = Some(at(3));
    let coordinator =
        ExportCoordinator::new(db, opts, Arc::new(ConfigHooks::from_config(&config)));
    let summary = coordinator.execute_export().await.unwrap();

    assert_eq!(summary.total_records, 2);
    assert_eq!(
        read(dir.path().join("User.csv")),
        "id,name,age\r\n\"4\",\"Barbara, L.\",40\r\n\"5\",\"Edsger\",72"
    );
}

#[tokio::test]
async fn test_incremental_from_before_first_write_matches_snapshot() {
    let snapshot_dir = TempDir::new().unwrap();
    let incremental_dir = TempDir::new().unwrap();
    let db = Arc::new(MemoryDb::new().with_collection("User", users()));

    let mut config = DumpConfig::default();
    config.export.index_template = Some("{collection}_by_ts".to_string());
    let hooks = Arc::new(ConfigHooks::from_config(&config));

    ExportCoordinator::new(db.clone(), options(snapshot_dir.path(), 2), hooks.clone())
        .execute_export()
        .await
        .unwrap();

    let mut opts = options(incremental_dir.path(), 2);
    opts.start_time = Some(at(0));
    ExportCoordinator::new(db, opts, hooks)
        .execute_export()
        .await
        .unwrap();

    assert_eq!(
        read(snapshot_dir.path().join("User.csv")),
        read(incremental_dir.path().join("User.csv"))
    );
}

#[tokio::test]
async fn test_incremental_without_index_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    let db = Arc::new(MemoryDb::new().with_collection("User", users()));

    let mut opts = options(dir.path(), 2);
    opts.start_time = Some(at(3));
    let err = ExportCoordinator::new(db, opts, Arc::new(DefaultHooks))
        .execute_export()
        .await
        .unwrap_err();

    assert!(matches!(err, DumpError::Configuration(_)));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_empty_collection_writes_explicit_headers_only() {
    let dir = TempDir::new().unwrap();
    let db = Arc::new(
        MemoryDb::new()
            .with_collection("Empty", Vec::new())
            .with_collection("Bare", Vec::new()),
    );

    let mut config = DumpConfig::default();
    config.collection.insert(
        "Empty".to_string(),
        CollectionOverrides {
            headers: Some(vec!["id".to_string(), "name".to_string()]),
            ..Default::default()
        },
    );

    let coordinator = ExportCoordinator::new(
        db,
        options(dir.path(), 10),
        Arc::new(ConfigHooks::from_config(&config)),
    );
    let summary = coordinator.execute_export().await.unwrap();

    assert_eq!(summary.total_records, 0);
    assert_eq!(read(dir.path().join("Empty.csv")), "id,name");
    assert_eq!(read(dir.path().join("Bare.csv")), "");
}

/// Drops every row of the first page and records progress events
#[derive(Default)]
struct SkipFirstPage {
    pages: AtomicUsize,
    events: Mutex<Vec<ProgressEvent>>,
}

impl ExportHooks for SkipFirstPage {
    fn append_data(&self, _collection: &CollectionId, rows: Vec<Row>) -> Vec<Row> {
        if self.pages.fetch_add(1, Ordering::SeqCst) == 0 {
            Vec::new()
        } else {
            rows
        }
    }

    fn on_progress(&self, event: &ProgressEvent) -> Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

#[tokio::test]
async fn test_append_data_can_drop_a_page() {
    let dir = TempDir::new().unwrap();
    let db = Arc::new(MemoryDb::new().with_collection("User", users()));
    let hooks = Arc::new(SkipFirstPage::default());

    let coordinator = ExportCoordinator::new(db, options(dir.path(), 2), hooks.clone());
    coordinator.execute_export().await.unwrap();

    assert_eq!(
        read(dir.path().join("User.csv")),
        "id,name,age\r\n\
         \"3\",\"Linus\",\r\n\
         \"4\",\"Barbara, L.\",40\r\n\
         \"5\",\"Edsger\",72"
    );

    let events = hooks.events.lock().unwrap();
    let totals: Vec<usize> = events.iter().map(|e| e.total).collect();
    assert_eq!(totals, vec![2, 4, 5]);
    assert_eq!(events[0].after, Some(Cursor::new(json!(2))));
    assert_eq!(events[2].after, None);
}

#[tokio::test]
async fn test_progress_hook_error_aborts_export() {
    struct Abort;

    impl ExportHooks for Abort {
        fn on_progress(&self, _event: &ProgressEvent) -> Result<()> {
            Err(DumpError::Hook("stop".to_string()))
        }
    }

    let dir = TempDir::new().unwrap();
    let db = Arc::new(MemoryDb::new().with_collection("User", users()));
    let err = ExportCoordinator::new(db.clone(), options(dir.path(), 2), Arc::new(Abort))
        .execute_export()
        .await
        .unwrap_err();

    assert!(matches!(err, DumpError::Hook(_)));
    assert_eq!(db.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_inferred_headers_are_renamed_and_dropped() {
    let dir = TempDir::new().unwrap();
    let db = Arc::new(MemoryDb::new().with_collection(
        "User",
        vec![(1, json!({"name": "Ada", "profile": {"tags": ["math", null]}, "secret": "x"}))],
    ));

    let mut config = DumpConfig::default();
    config.export.drop_headers = vec!["secret".to_string()];
    config.export.rename_headers = HashMap::from([("name".to_string(), "full_name".to_string())]);
    let hooks = ConfigHooks::from_config(&config);

    let coordinator = ExportCoordinator::new(db, options(dir.path(), 10), Arc::new(hooks));
    coordinator.execute_export().await.unwrap();

    assert_eq!(
        read(dir.path().join("User.csv")),
        "id,full_name,profile\r\n\"1\",\"Ada\",{\"tags\":[\"math\",\"\"]}"
    );
}

#[tokio::test]
async fn test_explicit_headers_with_column_paths() {
    let dir = TempDir::new().unwrap();
    let db = Arc::new(MemoryDb::new().with_collection(
        "User",
        vec![(1, json!({"name": "Ada", "profile": {"tags": ["math", "logic"]}}))],
    ));

    let mut config = DumpConfig::default();
    config.export.rename_headers = HashMap::from([("name".to_string(), "full_name".to_string())]);
    config.collection.insert(
        "user".to_string(),
        CollectionOverrides {
            headers: Some(vec![
                "id".to_string(),
                "full_name".to_string(),
                "first_tag".to_string(),
                "missing".to_string(),
            ]),
            columns: HashMap::from([("first_tag".to_string(), "profile/tags/0".to_string())]),
            ..Default::default()
        },
    );

    let coordinator = ExportCoordinator::new(
        db,
        options(dir.path(), 10),
        Arc::new(ConfigHooks::from_config(&config)),
    );
    coordinator.execute_export().await.unwrap();

    assert_eq!(
        read(dir.path().join("User.csv")),
        "id,full_name,first_tag,missing\r\n\"1\",\"Ada\",\"math\","
    );
}
