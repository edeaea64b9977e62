//! Core types and pure logic for the RemoteAnswer storefront.
//!
//! This crate provides the domain model and the derived-data pipeline:
//!
//! - **Identifiers**: `ProductId`, `ReviewId`, `OrderId`
//! - **Catalog**: `Product`, `Category`, `Catalog`, plus [`catalog::filter`]
//!   and [`catalog::paginate`]
//! - **Reviews**: `Review`, `Rating`, and the smoothed [`review::aggregate`]
//! - **Purchases**: `PurchaseRecord`, `PaymentMethod`
//! - **Wishlist**: `Wishlist`
//!
//! # Money
//!
//! Prices are stored as `i64` integer cents to avoid floating point
//! precision issues. `2499` is `$24.99`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod catalog;
pub mod error;
pub mod ids;
pub mod product;
pub mod purchase;
pub mod review;
pub mod wishlist;

pub use catalog::{
    Catalog, CatalogEntry, CatalogError, CatalogQuery, CategoryFilter, Page, FILTER_TABS,
    PAGE_SIZE,
};
pub use error::{Result, StorefrontError};
pub use ids::{IdError, OrderId, ProductId, ReviewId};
pub use product::{format_cents, Category, Product, UnknownCategory};
pub use purchase::{PaymentMethod, PurchaseRecord, UnknownPaymentMethod};
pub use review::{InvalidRating, Rating, Review};
pub use wishlist::Wishlist;
