//! Application state.
//!
//! [`Storefront`] owns the durable collections (purchases, reviews and the
//! wishlist), the transient selection state, and at most one checkout
//! session. Every change to a durable collection is written to the store
//! in full before subscribers are notified.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast;

use remoteanswer_core::catalog::{filter, paginate};
use remoteanswer_core::review::{aggregate, reviews_for};
use remoteanswer_core::{
    Catalog, CatalogQuery, CategoryFilter, Page, PaymentMethod, Product, ProductId,
    PurchaseRecord, Rating, Result, Review, StorefrontError, Wishlist, PAGE_SIZE,
};
use remoteanswer_store::{codec, keys, KeyValueStore};

use crate::checkout::{CheckoutSession, PaymentStatus, StartOutcome, TickOutcome};

const NOTIFICATION_CAPACITY: usize = 64;

/// The screen the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    /// Catalog browsing.
    #[default]
    Market,
    /// Purchased guides and their reviews.
    Library,
    /// Wishlisted guides.
    Wishlist,
    /// Receipt for the last completed order.
    OrderSuccess,
}

impl View {
    /// Get the view name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::Library => "library",
            Self::Wishlist => "wishlist",
            Self::OrderSuccess => "order-success",
        }
    }
}

/// A durable collection changed and has been written to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    /// The purchase list changed.
    PurchasesChanged,
    /// The review list changed.
    ReviewsChanged,
    /// The wishlist changed.
    WishlistChanged,
}

/// A product as shown on a catalog card.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard<'a> {
    /// The product.
    pub product: &'a Product,
    /// Baseline rating smoothed with submitted reviews, one decimal.
    pub display_rating: f64,
    /// Number of submitted reviews.
    pub review_count: usize,
    /// Whether the product is wishlisted.
    pub wishlisted: bool,
    /// Price points for the trend sparkline.
    pub price_trend: Vec<i64>,
}

/// A purchase as shown in the library.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryEntry<'a> {
    /// The purchase.
    pub record: &'a PurchaseRecord,
    /// The newest review of the purchased product, if any.
    pub review: Option<&'a Review>,
}

impl LibraryEntry<'_> {
    /// Whether the purchase still awaits a review.
    #[must_use]
    pub fn is_unreviewed(&self) -> bool {
        self.review.is_none()
    }
}

/// The receipt shown after an order is confirmed.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary<'a> {
    /// The completed purchase.
    pub record: &'a PurchaseRecord,
    /// The catalog entry, if it still exists.
    pub product: Option<&'a Product>,
    /// Price history plus current price, when there are at least two points.
    pub price_series: Option<Vec<i64>>,
}

/// The storefront's application state.
pub struct Storefront {
    catalog: Catalog,
    store: Arc<dyn KeyValueStore>,

    purchases: Vec<PurchaseRecord>,
    reviews: Vec<Review>,
    wishlist: Wishlist,

    view: View,
    query: CatalogQuery,
    page: usize,
    checkout: Option<CheckoutSession>,
    next_epoch: u64,
    pending_review: Option<ProductId>,
    last_order: Option<PurchaseRecord>,

    notifications: broadcast::Sender<Notification>,
}

impl Storefront {
    /// Create the state, loading each collection from the store.
    ///
    /// A collection that is missing or does not decode starts empty; the
    /// others are unaffected.
    #[must_use]
    pub fn load(catalog: Catalog, store: Arc<dyn KeyValueStore>) -> Self {
        let purchases: Vec<PurchaseRecord> = load_collection(store.as_ref(), keys::PURCHASES);
        let reviews: Vec<Review> = load_collection(store.as_ref(), keys::REVIEWS);
        let wishlist: Wishlist = load_collection(store.as_ref(), keys::WISHLIST);

        tracing::info!(
            products = catalog.len(),
            purchases = purchases.len(),
            reviews = reviews.len(),
            wishlist = wishlist.len(),
            "Storefront loaded"
        );

        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);

        Self {
            catalog,
            store,
            purchases,
            reviews,
            wishlist,
            view: View::default(),
            query: CatalogQuery::default(),
            page: 1,
            checkout: None,
            next_epoch: 1,
            pending_review: None,
            last_order: None,
            notifications,
        }
    }

    /// Subscribe to collection change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// The product catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Purchases, newest first.
    #[must_use]
    pub fn purchases(&self) -> &[PurchaseRecord] {
        &self.purchases
    }

    /// Reviews, newest first.
    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// The wishlist.
    #[must_use]
    pub const fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    /// The current view.
    #[must_use]
    pub const fn view(&self) -> View {
        self.view
    }

    /// The current catalog filter inputs.
    #[must_use]
    pub const fn query(&self) -> &CatalogQuery {
        &self.query
    }

    /// The current catalog page (1-based).
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// The open checkout, if any.
    #[must_use]
    pub const fn checkout(&self) -> Option<&CheckoutSession> {
        self.checkout.as_ref()
    }

    /// Product the user was sent to review, if any.
    #[must_use]
    pub const fn pending_review(&self) -> Option<&ProductId> {
        self.pending_review.as_ref()
    }

    /// The most recent completed order in this session.
    #[must_use]
    pub const fn last_order(&self) -> Option<&PurchaseRecord> {
        self.last_order.as_ref()
    }

    // ------------------------------------------------------------------------
    // Navigation and filtering
    // ------------------------------------------------------------------------

    /// Switch view. Resets pagination.
    pub fn show_view(&mut self, view: View) {
        tracing::debug!(view = view.as_str(), "View changed");
        self.view = view;
        self.page = 1;
    }

    /// Change the category filter. Clears recommendation results and
    /// resets pagination.
    pub fn select_category(&mut self, category: CategoryFilter) {
        tracing::debug!(%category, "Category selected");
        self.query.category = category;
        self.query.recommended.clear();
        self.page = 1;
    }

    /// Replace the live text filter.
    pub fn edit_query(&mut self, text: impl Into<String>) {
        self.query.text = text.into();
    }

    /// Submit a search. Resets pagination.
    ///
    /// A blank query clears any recommendation results and the text filter
    /// and returns `None`. Otherwise returns the trimmed query to send to
    /// the recommendation oracle; current results stay active until new
    /// ones are applied.
    pub fn submit_search(&mut self, text: &str) -> Option<String> {
        self.page = 1;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            tracing::debug!("Blank search, clearing recommendations");
            self.query.text.clear();
            self.query.recommended.clear();
            return None;
        }
        self.query.text = text.to_string();
        Some(trimmed.to_string())
    }

    /// Install recommendation results for the last search.
    ///
    /// Ids outside the catalog are ignored. Empty results fall back to the
    /// category and text filters.
    pub fn apply_recommendations(&mut self, ids: Vec<ProductId>) {
        let recommended: Vec<ProductId> = ids
            .into_iter()
            .filter(|id| self.catalog.get(id).is_some())
            .collect();
        tracing::debug!(matches = recommended.len(), "Recommendations applied");
        self.query.recommended = recommended;
        self.page = 1;
    }

    /// Jump to a catalog page. Out-of-range pages show nothing.
    pub fn go_to_page(&mut self, page: usize) {
        self.page = page;
    }

    // ------------------------------------------------------------------------
    // Wishlist and reviews
    // ------------------------------------------------------------------------

    /// Add the product to the wishlist if absent, remove it if present.
    ///
    /// Returns `true` if the product is wishlisted afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not in the catalog.
    pub fn toggle_wishlist(&mut self, product_id: &ProductId) -> Result<bool> {
        self.product(product_id)?;
        let added = self.wishlist.toggle(product_id);
        tracing::debug!(%product_id, added, "Wishlist toggled");
        self.persist(keys::WISHLIST, &self.wishlist, Notification::WishlistChanged);
        Ok(added)
    }

    /// Record a review from a verified buyer.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not in the catalog.
    pub fn submit_review(
        &mut self,
        product_id: &ProductId,
        rating: Rating,
        comment: impl Into<String>,
    ) -> Result<&Review> {
        self.product(product_id)?;

        let review = Review::submit(product_id.clone(), rating, comment);
        tracing::info!(
            review_id = %review.id,
            %product_id,
            rating = rating.stars(),
            "Review submitted"
        );
        self.reviews.insert(0, review);

        if self.pending_review.as_ref() == Some(product_id) {
            self.pending_review = None;
        }

        self.persist(keys::REVIEWS, &self.reviews, Notification::ReviewsChanged);
        Ok(&self.reviews[0])
    }

    // ------------------------------------------------------------------------
    // Checkout
    // ------------------------------------------------------------------------

    /// Open a checkout for a product, replacing any idle or finished one.
    /// The previous order receipt is cleared.
    ///
    /// Returns the new session's epoch.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is unknown or another checkout is
    /// processing a payment.
    pub fn open_checkout(&mut self, product_id: &ProductId) -> Result<u64> {
        if let Some(session) = self
            .checkout
            .as_ref()
            .filter(|s| s.status() == PaymentStatus::Processing)
        {
            return Err(StorefrontError::CheckoutInProgress {
                product_id: session.product().id.clone(),
            });
        }

        let product = self.product(product_id)?.clone();
        let epoch = self.next_epoch;
        self.next_epoch += 1;

        tracing::debug!(epoch, %product_id, "Checkout opened");
        self.checkout = Some(CheckoutSession::new(epoch, product));
        self.last_order = None;
        Ok(epoch)
    }

    /// Choose the payment method of the open checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if no checkout is open or it is not idle.
    pub fn select_payment_method(&mut self, method: PaymentMethod) -> Result<()> {
        self.session_mut()?.select_method(method)
    }

    /// Start the payment of the open checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if no checkout is open or the payment already
    /// succeeded.
    pub fn start_payment(&mut self) -> Result<StartOutcome> {
        self.session_mut()?.start()
    }

    /// Apply a progress tick for the checkout with `epoch`.
    ///
    /// When the tick completes the payment, the purchase is recorded.
    pub fn checkout_tick(&mut self, epoch: u64) -> TickOutcome {
        let Some(session) = self.checkout.as_mut() else {
            tracing::trace!(epoch, "Tick with no open checkout");
            return TickOutcome::Stale;
        };

        let outcome = session.tick(epoch);
        if let TickOutcome::Completed(record) = &outcome {
            self.complete_purchase(record.clone());
        }
        outcome
    }

    /// Perform the download of the paid product, returning the file name.
    ///
    /// # Errors
    ///
    /// Returns an error if no checkout is open or it has not succeeded.
    pub fn download(&mut self) -> Result<String> {
        let filename = self.session_mut()?.mark_downloaded()?;
        tracing::debug!(%filename, "Download performed");
        Ok(filename)
    }

    /// Close the successful checkout and show the order receipt. Returns the
    /// view shown.
    ///
    /// # Errors
    ///
    /// Returns an error if no checkout is open or it has not succeeded.
    pub fn confirm_order(&mut self) -> Result<View> {
        let status = self.session()?.status();
        if status != PaymentStatus::Success {
            return Err(StorefrontError::InvalidCheckoutState {
                expected: PaymentStatus::Success.as_str(),
                actual: status.as_str(),
            });
        }

        self.checkout = None;
        self.show_view(View::OrderSuccess);
        Ok(View::OrderSuccess)
    }

    /// Close the checkout and go to the library to review the product.
    ///
    /// # Errors
    ///
    /// Returns an error unless the payment succeeded and the download was
    /// performed.
    pub fn review_now(&mut self) -> Result<ProductId> {
        let session = self.session()?;
        if !session.can_review() {
            return Err(StorefrontError::InvalidCheckoutState {
                expected: "downloaded",
                actual: if session.status() == PaymentStatus::Success {
                    "not downloaded"
                } else {
                    session.status().as_str()
                },
            });
        }

        let product_id = session.product().id.clone();
        self.checkout = None;
        self.show_view(View::Library);
        self.pending_review = Some(product_id.clone());
        Ok(product_id)
    }

    /// Close the checkout, discarding its progress.
    ///
    /// Returns `true` if a checkout was open.
    pub fn close_checkout(&mut self) -> bool {
        match self.checkout.take() {
            Some(session) => {
                tracing::debug!(
                    epoch = session.epoch(),
                    status = %session.status(),
                    "Checkout closed"
                );
                true
            }
            None => false,
        }
    }

    fn complete_purchase(&mut self, record: PurchaseRecord) {
        tracing::info!(
            order_id = %record.order_id,
            product_id = %record.product_id,
            price_cents = record.price_cents,
            method = %record.payment_method.as_str(),
            "Purchase completed"
        );

        let removed = self.wishlist.remove(&record.product_id);
        self.purchases.insert(0, record.clone());
        self.last_order = Some(record);

        self.persist(keys::PURCHASES, &self.purchases, Notification::PurchasesChanged);
        if removed {
            self.persist(keys::WISHLIST, &self.wishlist, Notification::WishlistChanged);
        }
    }

    // ------------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------------

    /// The current page of the filtered catalog.
    #[must_use]
    pub fn catalog_page(&self) -> Page<ProductCard<'_>> {
        let visible = filter(self.catalog.products(), &self.query);
        let page = paginate(&visible, self.page, PAGE_SIZE);
        Page {
            items: page.items.into_iter().map(|p| self.product_card(p)).collect(),
            page: page.page,
            total_pages: page.total_pages,
            total_items: page.total_items,
        }
    }

    /// Card data for one product.
    #[must_use]
    pub fn product_card<'a>(&'a self, product: &'a Product) -> ProductCard<'a> {
        let review_count = reviews_for(&self.reviews, &product.id).count();
        ProductCard {
            product,
            display_rating: self.display_rating(product),
            review_count,
            wishlisted: self.wishlist.contains(&product.id),
            price_trend: product.price_trend(),
        }
    }

    /// Baseline rating of a product smoothed with its reviews.
    #[must_use]
    pub fn display_rating(&self, product: &Product) -> f64 {
        aggregate(product.rating, reviews_for(&self.reviews, &product.id))
    }

    /// Wishlisted products, in catalog order.
    #[must_use]
    pub fn wishlist_items(&self) -> Vec<&Product> {
        self.catalog
            .products()
            .iter()
            .filter(|p| self.wishlist.contains(&p.id))
            .collect()
    }

    /// Number of wishlisted products.
    #[must_use]
    pub fn wishlist_count(&self) -> usize {
        self.wishlist.len()
    }

    /// Purchases with their newest matching review.
    #[must_use]
    pub fn library(&self) -> Vec<LibraryEntry<'_>> {
        self.purchases
            .iter()
            .map(|record| LibraryEntry {
                record,
                review: reviews_for(&self.reviews, &record.product_id).next(),
            })
            .collect()
    }

    /// Receipt data for the last completed order.
    #[must_use]
    pub fn order_summary(&self) -> Option<OrderSummary<'_>> {
        let record = self.last_order.as_ref()?;
        let product = self.catalog.get(&record.product_id);
        Some(OrderSummary {
            record,
            product,
            price_series: product.and_then(Product::price_series),
        })
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn product(&self, product_id: &ProductId) -> Result<&Product> {
        self.catalog
            .get(product_id)
            .ok_or_else(|| StorefrontError::ProductNotFound {
                product_id: product_id.clone(),
            })
    }

    fn session(&self) -> Result<&CheckoutSession> {
        self.checkout
            .as_ref()
            .ok_or(StorefrontError::NoActiveCheckout)
    }

    fn session_mut(&mut self) -> Result<&mut CheckoutSession> {
        self.checkout
            .as_mut()
            .ok_or(StorefrontError::NoActiveCheckout)
    }

    /// Write a collection, then notify subscribers.
    ///
    /// A failed write is logged; in-memory state is kept.
    fn persist<T: Serialize>(&self, key: &str, value: &T, notification: Notification) {
        if let Err(e) = codec::save(self.store.as_ref(), key, value) {
            tracing::error!(key, error = %e, "Failed to persist collection");
        }
        // No subscribers is not an error.
        let _ = self.notifications.send(notification);
    }
}

fn load_collection<T: DeserializeOwned + Default>(store: &dyn KeyValueStore, key: &str) -> T {
    match codec::load(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to load collection, starting empty");
            T::default()
        }
    }
}
