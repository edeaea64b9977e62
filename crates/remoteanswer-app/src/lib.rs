//! RemoteAnswer storefront application.
//!
//! This crate ties the domain types, the persisted store and the oracle
//! together:
//!
//! - [`Storefront`]: application state and command entry points
//! - [`CheckoutSession`]: the simulated payment state machine
//! - [`Runtime`]: single-owner event loop with the progress timer and
//!   cancellable searches
//! - [`AppConfig`] and [`Services`]: configuration and wiring
//! - [`Line`] and [`render`]: the text command driver

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod checkout;
pub mod command;
pub mod config;
pub mod error;
pub mod render;
pub mod runtime;
pub mod services;
pub mod state;
pub mod timer;

pub use checkout::{CheckoutSession, PaymentStatus, StartOutcome, TickOutcome};
pub use command::{Command, Line};
pub use config::AppConfig;
pub use error::{ConfigError, ParseError};
pub use render::render;
pub use runtime::{Reply, Runtime, RuntimeEvent};
pub use services::Services;
pub use state::{LibraryEntry, Notification, OrderSummary, ProductCard, Storefront, View};
pub use timer::TimerHandle;
