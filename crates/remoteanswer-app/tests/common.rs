//! Common test utilities.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use remoteanswer_app::{Notification, Runtime, RuntimeEvent, Storefront};
use remoteanswer_core::{Catalog, CatalogEntry, Category, Product, ProductId};
use remoteanswer_oracle::{Oracle, OracleError, StaticOracle};
use remoteanswer_store::{KeyValueStore, MemoryStore, Result as StoreResult};
use tokio::sync::broadcast;

/// Checkout tick interval used by tests.
pub const TICK: Duration = Duration::from_millis(100);

pub fn id(s: &str) -> ProductId {
    ProductId::new(s).unwrap()
}

pub fn product(id: &str, category: Category, rating: f64) -> Product {
    Product {
        id: ProductId::new(id).unwrap(),
        title: format!("{id} guide"),
        description: format!("Notes on {id}"),
        price_cents: 1999,
        category,
        thumbnail: format!("{id}.png"),
        file_size: "2.0 MB".into(),
        pages: 40,
        rating,
        sales_count: 0,
        discount_label: None,
        is_featured: false,
        price_history: None,
    }
}

/// P1 (STEM, 4.5) and P2 (Tech, 4.0).
pub fn two_product_catalog() -> Catalog {
    Catalog::new(vec![
        product("p1", Category::Stem, 4.5),
        product("p2", Category::Tech, 4.0),
    ])
    .unwrap()
}

/// Test harness with an in-memory store.
pub struct TestHarness {
    pub store: Arc<MemoryStore>,
    pub catalog: Catalog,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_catalog(two_product_catalog())
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            catalog,
        }
    }

    /// Load a storefront from the harness store.
    pub fn storefront(&self) -> Storefront {
        let store: Arc<dyn KeyValueStore> = self.store.clone();
        Storefront::load(self.catalog.clone(), store)
    }

    /// Build a runtime with the given oracle.
    pub fn runtime(&self, oracle: impl Oracle + 'static) -> Runtime {
        Runtime::new(self.storefront(), Arc::new(oracle), TICK)
    }

    /// Build a runtime whose oracle recommends nothing.
    pub fn runtime_without_oracle(&self) -> Runtime {
        self.runtime(StaticOracle::new())
    }
}

/// Drive the runtime until the checkout succeeds, returning the number of
/// ticks that made progress.
pub async fn run_checkout(runtime: &mut Runtime) -> u32 {
    let mut ticks = 0;
    while let Some(event) = runtime.next_event().await {
        let is_tick = matches!(event, RuntimeEvent::CheckoutTick { .. });
        let reply = runtime.apply(event);
        if is_tick && reply != remoteanswer_app::Reply::Ignored {
            ticks += 1;
        }
        if matches!(reply, remoteanswer_app::Reply::PaymentSucceeded { .. }) {
            break;
        }
    }
    ticks
}

/// An oracle that answers each query after a fixed delay.
#[derive(Debug, Default)]
pub struct DelayedOracle {
    answers: Vec<(String, Duration, Vec<ProductId>)>,
}

impl DelayedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, query: &str, delay: Duration, ids: &[&str]) -> Self {
        self.answers
            .push((query.to_string(), delay, ids.iter().map(|s| id(s)).collect()));
        self
    }
}

#[async_trait]
impl Oracle for DelayedOracle {
    async fn recommend(
        &self,
        query: &str,
        _catalog: &[CatalogEntry],
    ) -> Result<Vec<ProductId>, OracleError> {
        let Some((_, delay, ids)) = self.answers.iter().find(|(q, _, _)| q == query) else {
            return Err(OracleError::Unavailable);
        };
        tokio::time::sleep(*delay).await;
        Ok(ids.clone())
    }

    async fn pitch(&self, _title: &str) -> Result<String, OracleError> {
        Err(OracleError::Unavailable)
    }
}

/// A store write or a delivered notification, in the order observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observed {
    Written(String),
    Notified(Notification),
}

/// A `MemoryStore` that records every write together with the
/// notifications that were already sent when the write happened.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    receiver: Mutex<Option<broadcast::Receiver<Notification>>>,
    log: Mutex<Vec<Observed>>,
}

impl RecordingStore {
    /// Load a storefront on a fresh recording store and start listening to
    /// its notifications.
    pub fn storefront(catalog: Catalog) -> (Arc<Self>, Storefront) {
        let store = Arc::new(Self::default());
        let shared: Arc<dyn KeyValueStore> = store.clone();
        let storefront = Storefront::load(catalog, shared);
        *store.receiver.lock().unwrap() = Some(storefront.subscribe());
        (store, storefront)
    }

    fn drain_notifications(&self, log: &mut Vec<Observed>) {
        if let Some(receiver) = self.receiver.lock().unwrap().as_mut() {
            while let Ok(notification) = receiver.try_recv() {
                log.push(Observed::Notified(notification));
            }
        }
    }

    /// Everything observed so far, including notifications sent after the
    /// last write.
    pub fn observed(&self) -> Vec<Observed> {
        let mut log = self.log.lock().unwrap();
        self.drain_notifications(&mut log);
        log.clone()
    }
}

impl KeyValueStore for RecordingStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut log = self.log.lock().unwrap();
        self.drain_notifications(&mut log);
        log.push(Observed::Written(key.to_string()));
        self.inner.put(key, value)
    }
}
