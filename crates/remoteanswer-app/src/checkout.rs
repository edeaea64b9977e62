//! The simulated checkout state machine.
//!
//! A session moves `Idle -> Processing -> Success`. Progress advances by a
//! fixed step on each timer tick; reaching [`PROGRESS_COMPLETE`] finishes
//! the payment and produces exactly one [`PurchaseRecord`]. There is no
//! failure path. Closing the checkout discards the session, so reopening
//! always starts again from `Idle`.

use std::fmt;

use remoteanswer_core::{PaymentMethod, Product, PurchaseRecord, StorefrontError};

/// Progress added by each timer tick.
pub const PROGRESS_STEP: u8 = 5;

/// Progress at which the payment completes.
pub const PROGRESS_COMPLETE: u8 = 100;

/// Ticks needed to go from zero to complete.
pub const TICKS_TO_COMPLETE: u32 = (PROGRESS_COMPLETE / PROGRESS_STEP) as u32;

/// Payment status of a checkout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaymentStatus {
    /// Choosing a payment method.
    #[default]
    Idle,
    /// Payment running; progress advancing.
    Processing,
    /// Payment complete.
    Success,
}

impl PaymentStatus {
    /// Get the status as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Processing => "processing",
            Self::Success => "success",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of starting a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The session moved to `Processing`; a timer should be started.
    Started,
    /// The session was already processing; nothing changed.
    AlreadyProcessing,
}

/// Result of applying a timer tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick belongs to another session or the session is not processing.
    Stale,
    /// Progress advanced to the given value.
    Progressed(u8),
    /// The payment completed with this record.
    Completed(PurchaseRecord),
}

/// A single checkout of one product.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    epoch: u64,
    product: Product,
    method: PaymentMethod,
    status: PaymentStatus,
    progress: u8,
    record: Option<PurchaseRecord>,
    downloaded: bool,
}

impl CheckoutSession {
    /// Open a checkout for `product`. The owner assigns a unique `epoch`.
    #[must_use]
    pub fn new(epoch: u64, product: Product) -> Self {
        Self {
            epoch,
            product,
            method: PaymentMethod::default(),
            status: PaymentStatus::Idle,
            progress: 0,
            record: None,
            downloaded: false,
        }
    }

    /// Epoch identifying this session's timer ticks.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The product being bought.
    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    /// Selected payment method.
    #[must_use]
    pub const fn method(&self) -> PaymentMethod {
        self.method
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> PaymentStatus {
        self.status
    }

    /// Progress from 0 to 100.
    #[must_use]
    pub const fn progress(&self) -> u8 {
        self.progress
    }

    /// The purchase record, once the payment succeeded.
    #[must_use]
    pub const fn record(&self) -> Option<&PurchaseRecord> {
        self.record.as_ref()
    }

    /// Whether the download was performed.
    #[must_use]
    pub const fn downloaded(&self) -> bool {
        self.downloaded
    }

    /// Whether the "write a review" prompt is available.
    #[must_use]
    pub fn can_review(&self) -> bool {
        self.status == PaymentStatus::Success && self.downloaded
    }

    /// Label for the pay button.
    #[must_use]
    pub fn pay_label(&self) -> String {
        self.method.pay_label(self.product.price_cents)
    }

    /// Choose the payment method.
    ///
    /// # Errors
    ///
    /// Returns an error unless the session is `Idle`.
    pub fn select_method(&mut self, method: PaymentMethod) -> Result<(), StorefrontError> {
        self.expect_status(PaymentStatus::Idle)?;
        self.method = method;
        Ok(())
    }

    /// Begin processing the payment. A no-op while already processing.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment already succeeded.
    pub fn start(&mut self) -> Result<StartOutcome, StorefrontError> {
        match self.status {
            PaymentStatus::Idle => {
                self.status = PaymentStatus::Processing;
                self.progress = 0;
                tracing::debug!(
                    epoch = self.epoch,
                    product_id = %self.product.id,
                    method = %self.method.as_str(),
                    "Payment processing"
                );
                Ok(StartOutcome::Started)
            }
            PaymentStatus::Processing => Ok(StartOutcome::AlreadyProcessing),
            PaymentStatus::Success => Err(self.wrong_status(PaymentStatus::Idle)),
        }
    }

    /// Apply one timer tick carrying `epoch`.
    pub fn tick(&mut self, epoch: u64) -> TickOutcome {
        if epoch != self.epoch || self.status != PaymentStatus::Processing {
            return TickOutcome::Stale;
        }

        self.progress = self
            .progress
            .saturating_add(PROGRESS_STEP)
            .min(PROGRESS_COMPLETE);

        if self.progress < PROGRESS_COMPLETE {
            return TickOutcome::Progressed(self.progress);
        }

        let record = PurchaseRecord::from_product(&self.product, self.method);
        tracing::debug!(
            epoch = self.epoch,
            order_id = %record.order_id,
            product_id = %record.product_id,
            "Payment succeeded"
        );
        self.status = PaymentStatus::Success;
        self.record = Some(record.clone());
        TickOutcome::Completed(record)
    }

    /// Perform the download, returning the file name.
    ///
    /// # Errors
    ///
    /// Returns an error unless the payment succeeded.
    pub fn mark_downloaded(&mut self) -> Result<String, StorefrontError> {
        self.expect_status(PaymentStatus::Success)?;
        self.downloaded = true;
        Ok(self.product.download_filename())
    }

    fn expect_status(&self, expected: PaymentStatus) -> Result<(), StorefrontError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(self.wrong_status(expected))
        }
    }

    fn wrong_status(&self, expected: PaymentStatus) -> StorefrontError {
        StorefrontError::InvalidCheckoutState {
            expected: expected.as_str(),
            actual: self.status.as_str(),
        }
    }
}
