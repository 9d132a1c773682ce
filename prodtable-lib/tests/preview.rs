mod common;

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use common::*;
use prodtable_lib::catalog::Catalog;
use prodtable_lib::catalog::CatalogPage;
use prodtable_lib::catalog::CatalogQuery;
use prodtable_lib::catalog::CurrencyFormat;
use prodtable_lib::catalog::InMemoryCatalog;
use prodtable_lib::error::CatalogError;
use prodtable_lib::error::Error;
use prodtable_lib::orchestrator::Orchestrator;
use prodtable_lib::orchestrator::PreviewConfig;
use prodtable_lib::orchestrator::PreviewState;
use prodtable_lib::model::CatalogItem;
use prodtable_lib::model::ItemId;
use prodtable_lib::pipeline::RequestParams;
use serde_json::Value;
use serde_json::json;
use tokio::sync::oneshot;
use tokio::time::Instant;

fn edit(title: &str) -> Value {
    json!({
        "title": title,
        "source": {"kind": "explicit-list", "queryArgs": {"postIds": [3, 1, 2]}},
        "columns": [{"type": "sku"}]
    })
}

fn orchestrator(latency: Duration) -> Orchestrator {
    Orchestrator::builder()
        .catalog(slow_catalog(latency))
        .preview_config(PreviewConfig::default().with_debounce(Duration::from_millis(400)))
        .build()
}

/// Fixture catalog whose first `project` call waits until released.
struct GatedCatalog {
    inner: InMemoryCatalog,
    gate: Mutex<Option<(oneshot::Sender<()>, oneshot::Receiver<()>)>>,
}

impl GatedCatalog {
    /// Returns the catalog, a receiver signalled when the gated call starts,
    /// and the sender that releases it.
    fn new() -> (Self, oneshot::Receiver<()>, oneshot::Sender<()>) {
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        let catalog = Self {
            inner: fixture_catalog(),
            gate: Mutex::new(Some((entered_tx, release_rx))),
        };
        (catalog, entered_rx, release_tx)
    }
}

#[async_trait]
impl Catalog for GatedCatalog {
    async fn query(&self, query: &CatalogQuery) -> Result<CatalogPage, CatalogError> {
        self.inner.query(query).await
    }

    async fn project(&self, ids: &[ItemId]) -> Result<Vec<CatalogItem>, CatalogError> {
        let gate = self.gate.lock().unwrap().take();
        if let Some((entered, release)) = gate {
            let _ = entered.send(());
            let _ = release.await;
        }
        self.inner.project(ids).await
    }

    fn currency(&self) -> CurrencyFormat {
        self.inner.currency()
    }
}

#[tokio::test(start_paused = true)]
async fn test_newer_edit_cancels_in_flight_cycle() {
    let mut session = orchestrator(Duration::from_secs(2)).preview_session();

    let first = session.submit(edit("first"), RequestParams::new());
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(session.state(), PreviewState::Resolving);

    let second = session.submit(edit("second"), RequestParams::new());
    assert!(second > first);

    let update = session.next_update().await.unwrap();
    assert_eq!(update.session, session.id());
    assert_eq!(update.seq, second);
    let output = update.result.unwrap();
    assert_eq!(output.title, "second");
    assert_eq!(ids(&output.item_ids()), vec![3, 1, 2]);

    // the first cycle never publishes
    let late = tokio::time::timeout(Duration::from_secs(30), session.next_update()).await;
    assert!(late.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_debounce_restarts_on_each_edit() {
    let mut session = orchestrator(Duration::ZERO).preview_session();
    let start = Instant::now();

    session.submit(edit("a"), RequestParams::new());
    tokio::time::sleep(Duration::from_millis(300)).await;
    session.submit(edit("b"), RequestParams::new());
    tokio::time::sleep(Duration::from_millis(300)).await;
    let last = session.submit(edit("c"), RequestParams::new());

    let update = session.next_update().await.unwrap();
    assert_eq!(update.seq, last);
    assert_eq!(update.result.unwrap().title, "c");
    assert!(start.elapsed() >= Duration::from_millis(1000));

    let more = tokio::time::timeout(Duration::from_secs(30), session.next_update()).await;
    assert!(more.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_failed_cycle_returns_to_idle() {
    let mut session = orchestrator(Duration::ZERO).preview_session();

    session.submit(json!({"columns": [{"type": "hologram"}]}), RequestParams::new());
    let update = session.next_update().await.unwrap();
    let err = update.result.unwrap_err();
    assert!(err.is_definition_error());

    let mut state = session.watch_state();
    state.wait_for(|s| *s == PreviewState::Idle).await.unwrap();

    let seq = session.submit(edit("fixed"), RequestParams::new());
    let update = session.next_update().await.unwrap();
    assert_eq!(update.seq, seq);
    assert!(update.result.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_catalog_failure_is_recoverable() {
    let catalog = FailingCatalog::new();
    let orchestrator = Orchestrator::builder().catalog(catalog.clone()).build();
    let mut session = orchestrator.preview_session();

    session.submit(edit("one"), RequestParams::new());
    let update = session.next_update().await.unwrap();
    assert!(matches!(update.result, Err(Error::CatalogUnavailable(_))));

    let seq = session.submit(edit("two"), RequestParams::new());
    let update = session.next_update().await.unwrap();
    assert_eq!(update.seq, seq);
    assert!(update.result.is_err());
    assert_eq!(catalog.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_closed_session_stops_publishing() {
    let mut session = orchestrator(Duration::from_secs(1)).preview_session();
    session.submit(edit("x"), RequestParams::new());
    tokio::time::sleep(Duration::from_millis(500)).await;
    session.close();

    assert!(session.next_update().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_result_finishing_alongside_newer_edit_is_discarded() {
    let (catalog, entered, release) = GatedCatalog::new();
    let mut session = Orchestrator::builder()
        .catalog(catalog)
        .preview_config(PreviewConfig::default().with_debounce(Duration::from_millis(400)))
        .build()
        .preview_session();

    let first = session.submit(edit("first"), RequestParams::new());
    entered.await.unwrap();

    // The first cycle completes in the same step that queues the newer edit.
    release.send(()).unwrap();
    let second = session.submit(edit("second"), RequestParams::new());
    assert!(second > first);

    let mut state = session.watch_state();
    state.wait_for(|s| *s == PreviewState::Debouncing).await.unwrap();

    let update = session.next_update().await.unwrap();
    assert_eq!(update.seq, second);
    assert_eq!(update.result.unwrap().title, "second");

    let late = tokio::time::timeout(Duration::from_secs(30), session.next_update()).await;
    assert!(late.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_close_stops_worker_blocked_on_full_channel() {
    let catalog: Arc<dyn Catalog> = Arc::new(fixture_catalog());
    let session = Orchestrator::builder()
        .shared_catalog(catalog.clone())
        .preview_config(
            PreviewConfig::default()
                .with_debounce(Duration::from_millis(400))
                .with_channel_capacity(1),
        )
        .build()
        .preview_session();

    // Nobody reads: the first update fills the channel, the second blocks.
    session.submit(edit("a"), RequestParams::new());
    tokio::time::sleep(Duration::from_secs(1)).await;
    session.submit(edit("b"), RequestParams::new());
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(Arc::strong_count(&catalog), 2);

    session.close();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(Arc::strong_count(&catalog), 1);
}
