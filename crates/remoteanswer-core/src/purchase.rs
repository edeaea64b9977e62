//! Purchase records and payment methods.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::product::format_cents;
use crate::{OrderId, Product, ProductId};

/// A completed purchase.
///
/// The product fields are a snapshot taken at purchase time and are not
/// linked to the live catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Unique order identifier.
    pub order_id: OrderId,

    /// The purchased product.
    pub product_id: ProductId,

    /// Product title at purchase time.
    pub product_title: String,

    /// Product thumbnail at purchase time.
    pub thumbnail: String,

    /// Price paid in cents.
    pub price_cents: i64,

    /// File size label at purchase time.
    pub file_size: String,

    /// How the order was paid.
    pub payment_method: PaymentMethod,

    /// When the purchase completed.
    pub purchased_at: DateTime<Utc>,
}

impl PurchaseRecord {
    /// Snapshot a product into a new record with a fresh order ID.
    #[must_use]
    pub fn from_product(product: &Product, payment_method: PaymentMethod) -> Self {
        Self {
            order_id: OrderId::generate(),
            product_id: product.id.clone(),
            product_title: product.title.clone(),
            thumbnail: product.thumbnail.clone(),
            price_cents: product.price_cents,
            file_size: product.file_size.clone(),
            payment_method,
            purchased_at: Utc::now(),
        }
    }

    /// Price paid, formatted as dollars.
    #[must_use]
    pub fn formatted_price(&self) -> String {
        format_cents(self.price_cents)
    }
}

/// Supported (simulated) payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Credit or debit card.
    #[default]
    Card,
    /// `PayPal`.
    PayPal,
    /// Apple Pay.
    ApplePay,
    /// Google Pay.
    GooglePay,
    /// Bank transfer.
    BankTransfer,
    /// Cryptocurrency.
    Crypto,
}

impl PaymentMethod {
    /// All payment methods in display order.
    pub const ALL: [Self; 6] = [
        Self::Card,
        Self::PayPal,
        Self::ApplePay,
        Self::GooglePay,
        Self::BankTransfer,
        Self::Crypto,
    ];

    /// Get the method name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::PayPal => "paypal",
            Self::ApplePay => "apple_pay",
            Self::GooglePay => "google_pay",
            Self::BankTransfer => "bank_transfer",
            Self::Crypto => "crypto",
        }
    }

    /// Human-readable method name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Card => "Card",
            Self::PayPal => "PayPal",
            Self::ApplePay => "Apple Pay",
            Self::GooglePay => "Google Pay",
            Self::BankTransfer => "Bank Transfer",
            Self::Crypto => "Crypto",
        }
    }

    /// Label for the pay button, e.g. `"Pay $9.99 with PayPal"`.
    #[must_use]
    pub fn pay_label(&self, price_cents: i64) -> String {
        let amount = format_cents(price_cents);
        match self {
            Self::Card => format!("Pay {amount}"),
            Self::BankTransfer => format!("Pay {amount} via Bank Transfer"),
            other => format!("Pay {amount} with {}", other.display_name()),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().replace('_', "") == normalized)
            .ok_or_else(|| UnknownPaymentMethod(s.to_string()))
    }
}

/// A payment method name that matches no known method.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);
