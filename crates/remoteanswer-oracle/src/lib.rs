//! Oracle clients for the RemoteAnswer storefront.
//!
//! An oracle is an optional external capability that maps a free-text
//! search to matching products and writes short sales copy. Both calls
//! fail open: the storefront stays fully usable with no working oracle.
//!
//! # Example
//!
//! ```no_run
//! use remoteanswer_core::Catalog;
//! use remoteanswer_oracle::{recommend_or_empty, HttpOracle, OracleOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::builtin()?;
//! let oracle = HttpOracle::with_options(
//!     "http://oracle.internal:8080",
//!     OracleOptions::with_api_key("your-api-key"),
//! )?;
//!
//! // Never fails: errors become an empty list.
//! let ids = recommend_or_empty(&oracle, "graph algorithms", &catalog.listing()).await;
//! println!("{} matching products", ids.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
pub mod oracle;
mod types;

pub use client::{HttpOracle, OracleOptions};
pub use error::OracleError;
pub use oracle::{pitch_or_description, recommend_or_empty, NoopOracle, Oracle, StaticOracle};
pub use types::*;
