//! The event runtime.
//!
//! [`Runtime`] owns the [`Storefront`] and applies, one at a time, user
//! commands and internal events: checkout progress ticks and resolved
//! searches. It holds the progress timer and the in-flight search task and
//! makes sure neither can touch state once superseded.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use remoteanswer_core::{ProductId, Result, StorefrontError};
use remoteanswer_oracle::{pitch_or_description, recommend_or_empty, Oracle};

use crate::checkout::{StartOutcome, TickOutcome};
use crate::command::Command;
use crate::state::{Storefront, View};
use crate::timer::TimerHandle;

/// Internal events fed back into the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// A progress tick for the checkout with this epoch.
    CheckoutTick {
        /// Checkout epoch the tick belongs to.
        epoch: u64,
    },
    /// A recommendation request finished.
    SearchResolved {
        /// Search generation the request was made for.
        generation: u64,
        /// Recommended products; empty on failure.
        ids: Vec<ProductId>,
    },
}

/// What a command or event did, for the driver to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// State changed; nothing specific to report.
    Updated,
    /// The wishlist was toggled.
    Wishlist {
        /// Toggled product.
        product_id: ProductId,
        /// Whether it is wishlisted now.
        added: bool,
    },
    /// A search was sent to the oracle.
    Searching {
        /// Generation of the new search.
        generation: u64,
    },
    /// Recommendation results were applied.
    SearchApplied {
        /// Number of matching products.
        matches: usize,
    },
    /// A checkout was opened.
    CheckoutOpened {
        /// Product being bought.
        product_id: ProductId,
    },
    /// The payment started.
    PaymentStarted,
    /// The payment was already processing.
    AlreadyProcessing,
    /// Payment progress advanced.
    Progress(u8),
    /// The payment completed and the purchase was recorded.
    PaymentSucceeded {
        /// Product bought.
        product_id: ProductId,
    },
    /// The guide was downloaded.
    Downloaded {
        /// Offered file name.
        filename: String,
    },
    /// The checkout closed and this view is shown.
    Navigated(View),
    /// The user was sent to review a product.
    ReviewRequested {
        /// Product to review.
        product_id: ProductId,
    },
    /// A review was recorded.
    Reviewed {
        /// Reviewed product.
        product_id: ProductId,
    },
    /// The checkout was closed.
    CheckoutClosed {
        /// Whether a checkout was open.
        was_open: bool,
    },
    /// Sales copy for a product.
    Pitch {
        /// The product.
        product_id: ProductId,
        /// Oracle text, or the product description.
        text: String,
    },
    /// The event was stale or superseded and was discarded.
    Ignored,
}

/// Single owner of the storefront state and its background work.
pub struct Runtime {
    storefront: Storefront,
    oracle: Arc<dyn Oracle>,
    tick_interval: Duration,

    events_tx: mpsc::UnboundedSender<RuntimeEvent>,
    events_rx: mpsc::UnboundedReceiver<RuntimeEvent>,

    timer: Option<TimerHandle>,
    search: Option<JoinHandle<()>>,
    search_generation: u64,
    pitches: HashMap<ProductId, String>,
}

impl Runtime {
    /// Create a runtime around `storefront`.
    #[must_use]
    pub fn new(storefront: Storefront, oracle: Arc<dyn Oracle>, tick_interval: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            storefront,
            oracle,
            tick_interval,
            events_tx,
            events_rx,
            timer: None,
            search: None,
            search_generation: 0,
            pitches: HashMap::new(),
        }
    }

    /// The application state.
    #[must_use]
    pub const fn storefront(&self) -> &Storefront {
        &self.storefront
    }

    /// Generation of the most recent search submission.
    #[must_use]
    pub const fn search_generation(&self) -> u64 {
        self.search_generation
    }

    /// Whether a progress timer is running.
    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Whether a recommendation request is outstanding.
    #[must_use]
    pub fn search_pending(&self) -> bool {
        self.search.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Apply a user command.
    ///
    /// # Errors
    ///
    /// Returns the storefront error when the command is not valid in the
    /// current state. State is unchanged in that case.
    pub async fn handle(&mut self, command: Command) -> Result<Reply> {
        tracing::trace!(?command, "Handling command");
        match command {
            Command::ShowView(view) => {
                self.storefront.show_view(view);
                Ok(Reply::Navigated(view))
            }
            Command::SelectCategory(category) => {
                self.supersede_search();
                self.storefront.select_category(category);
                Ok(Reply::Updated)
            }
            Command::EditQuery(text) => {
                self.storefront.edit_query(text);
                Ok(Reply::Updated)
            }
            Command::SubmitSearch(text) => Ok(self.submit_search(&text)),
            Command::GoToPage(page) => {
                self.storefront.go_to_page(page);
                Ok(Reply::Updated)
            }
            Command::ToggleWishlist(product_id) => {
                let added = self.storefront.toggle_wishlist(&product_id)?;
                Ok(Reply::Wishlist { product_id, added })
            }
            Command::OpenCheckout(product_id) => {
                self.storefront.open_checkout(&product_id)?;
                self.stop_timer();
                Ok(Reply::CheckoutOpened { product_id })
            }
            Command::SelectPaymentMethod(method) => {
                self.storefront.select_payment_method(method)?;
                Ok(Reply::Updated)
            }
            Command::StartPayment => self.start_payment(),
            Command::Download => {
                let filename = self.storefront.download()?;
                Ok(Reply::Downloaded { filename })
            }
            Command::ConfirmOrder => {
                let view = self.storefront.confirm_order()?;
                self.stop_timer();
                Ok(Reply::Navigated(view))
            }
            Command::ReviewNow => {
                let product_id = self.storefront.review_now()?;
                self.stop_timer();
                Ok(Reply::ReviewRequested { product_id })
            }
            Command::CloseCheckout => {
                let was_open = self.storefront.close_checkout();
                self.stop_timer();
                Ok(Reply::CheckoutClosed { was_open })
            }
            Command::SubmitReview {
                product_id,
                rating,
                comment,
            } => {
                self.storefront.submit_review(&product_id, rating, comment)?;
                Ok(Reply::Reviewed { product_id })
            }
            Command::Pitch(product_id) => {
                let text = self.pitch(&product_id).await?;
                Ok(Reply::Pitch { product_id, text })
            }
        }
    }

    /// Wait for the next internal event.
    pub async fn next_event(&mut self) -> Option<RuntimeEvent> {
        self.events_rx.recv().await
    }

    /// Apply an internal event. Stale ticks and superseded searches are
    /// discarded.
    pub fn apply(&mut self, event: RuntimeEvent) -> Reply {
        match event {
            RuntimeEvent::CheckoutTick { epoch } => match self.storefront.checkout_tick(epoch) {
                TickOutcome::Stale => {
                    tracing::trace!(epoch, "Stale checkout tick ignored");
                    Reply::Ignored
                }
                TickOutcome::Progressed(progress) => Reply::Progress(progress),
                TickOutcome::Completed(record) => {
                    self.stop_timer();
                    Reply::PaymentSucceeded {
                        product_id: record.product_id,
                    }
                }
            },
            RuntimeEvent::SearchResolved { generation, ids } => {
                if generation != self.search_generation {
                    tracing::debug!(
                        generation,
                        current = self.search_generation,
                        "Superseded search result discarded"
                    );
                    return Reply::Ignored;
                }
                self.search = None;
                self.storefront.apply_recommendations(ids);
                Reply::SearchApplied {
                    matches: self.storefront.query().recommended.len(),
                }
            }
        }
    }

    /// Start a new search generation and cancel the in-flight search.
    fn supersede_search(&mut self) -> u64 {
        self.search_generation += 1;
        let generation = self.search_generation;

        if let Some(task) = self.search.take() {
            tracing::debug!(generation, "Cancelling superseded search");
            task.abort();
        }
        generation
    }

    fn submit_search(&mut self, text: &str) -> Reply {
        let generation = self.supersede_search();

        let Some(query) = self.storefront.submit_search(text) else {
            return Reply::Updated;
        };

        let oracle = Arc::clone(&self.oracle);
        let listing = self.storefront.catalog().listing();
        let events = self.events_tx.clone();

        tracing::debug!(generation, %query, "Search submitted");
        self.search = Some(tokio::spawn(async move {
            let ids = recommend_or_empty(oracle.as_ref(), &query, &listing).await;
            // The runtime may be gone; the result is then moot.
            let _ = events.send(RuntimeEvent::SearchResolved { generation, ids });
        }));

        Reply::Searching { generation }
    }

    fn start_payment(&mut self) -> Result<Reply> {
        match self.storefront.start_payment()? {
            StartOutcome::AlreadyProcessing => Ok(Reply::AlreadyProcessing),
            StartOutcome::Started => {
                let epoch = self
                    .storefront
                    .checkout()
                    .map(crate::checkout::CheckoutSession::epoch)
                    .ok_or(StorefrontError::NoActiveCheckout)?;
                self.timer = Some(TimerHandle::spawn(
                    epoch,
                    self.tick_interval,
                    self.events_tx.clone(),
                ));
                Ok(Reply::PaymentStarted)
            }
        }
    }

    async fn pitch(&mut self, product_id: &ProductId) -> Result<String> {
        if let Some(text) = self.pitches.get(product_id) {
            return Ok(text.clone());
        }

        let product = self.storefront.catalog().get(product_id).ok_or_else(|| {
            StorefrontError::ProductNotFound {
                product_id: product_id.clone(),
            }
        })?;
        let text = pitch_or_description(self.oracle.as_ref(), product).await;
        self.pitches.insert(product_id.clone(), text.clone());
        Ok(text)
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            tracing::trace!(epoch = timer.epoch(), "Progress timer stopped");
            timer.cancel();
        }
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if let Some(task) = self.search.take() {
            task.abort();
        }
    }
}
