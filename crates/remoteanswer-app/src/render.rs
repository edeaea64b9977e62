//! Plain-text views printed by the command driver.

use std::fmt::Write;

use remoteanswer_core::{format_cents, FILTER_TABS};

use crate::checkout::PaymentStatus;
use crate::state::{Storefront, View};

/// Render the current view, followed by the open checkout if any.
#[must_use]
pub fn render(state: &Storefront) -> String {
    let mut out = match state.view() {
        View::Market => market(state),
        View::Library => library(state),
        View::Wishlist => wishlist(state),
        View::OrderSuccess => order_success(state),
    };
    if let Some(panel) = checkout(state) {
        out.push('\n');
        out.push_str(&panel);
    }
    out
}

/// The catalog page with filter tabs.
#[must_use]
pub fn market(state: &Storefront) -> String {
    let mut out = String::new();
    let query = state.query();

    let tabs: Vec<String> = FILTER_TABS
        .iter()
        .map(|tab| {
            if *tab == query.category {
                format!("[{tab}]")
            } else {
                tab.to_string()
            }
        })
        .collect();
    let _ = writeln!(
        out,
        "== Marketplace ==  {}  (wishlist: {})",
        tabs.join(" "),
        state.wishlist_count()
    );

    if query.has_recommendations() {
        let _ = writeln!(out, "Recommended for {:?}", query.text.trim());
    } else if !query.text.trim().is_empty() {
        let _ = writeln!(out, "Filtering by {:?}", query.text.trim());
    }

    let page = state.catalog_page();
    if page.items.is_empty() {
        out.push_str("No guides match.\n");
    }
    for card in &page.items {
        let product = card.product;
        let _ = writeln!(
            out,
            "{wish} {id:<16} {title}  {price}  {rating:.1}* ({reviews} reviews)  {category}{discount}",
            wish = if card.wishlisted { "♥" } else { " " },
            id = product.id.as_str(),
            title = product.title,
            price = product.formatted_price(),
            rating = card.display_rating,
            reviews = card.review_count,
            category = product.category,
            discount = product
                .discount_label
                .as_deref()
                .map(|d| format!("  [{d}]"))
                .unwrap_or_default(),
        );
    }
    if page.total_pages > 0 {
        let _ = writeln!(out, "Page {} of {}", page.page, page.total_pages);
    }
    out
}

/// Purchased guides with their review state.
#[must_use]
pub fn library(state: &Storefront) -> String {
    let mut out = String::from("== Library ==\n");
    let entries = state.library();
    if entries.is_empty() {
        out.push_str("No purchases yet.\n");
    }
    for entry in &entries {
        let record = entry.record;
        let review = match entry.review {
            Some(review) => format!("{}* \"{}\"", review.rating.stars(), review.comment),
            None => "unreviewed".to_string(),
        };
        let _ = writeln!(
            out,
            "{order}  {title}  {price}  {date}  {review}",
            order = record.order_id,
            title = record.product_title,
            price = record.formatted_price(),
            date = record.purchased_at.format("%Y-%m-%d"),
        );
    }
    if let Some(product_id) = state.pending_review() {
        let _ = writeln!(out, "Review pending for {product_id}: review {product_id} <1-5> [comment]");
    }
    out
}

/// Wishlisted guides.
#[must_use]
pub fn wishlist(state: &Storefront) -> String {
    let mut out = format!("== Wishlist ({}) ==\n", state.wishlist_count());
    let items = state.wishlist_items();
    if items.is_empty() {
        out.push_str("Your wishlist is empty.\n");
    }
    for product in items {
        let _ = writeln!(
            out,
            "{:<16} {}  {}",
            product.id.as_str(),
            product.title,
            product.formatted_price()
        );
    }
    out
}

/// Receipt for the last order.
#[must_use]
pub fn order_success(state: &Storefront) -> String {
    let Some(summary) = state.order_summary() else {
        return "== Order ==\nNo order to show.\n".to_string();
    };

    let record = summary.record;
    let mut out = String::from("== Order confirmed ==\n");
    let _ = writeln!(out, "Order {}", record.order_id);
    let _ = writeln!(out, "{}  {}", record.product_title, record.formatted_price());
    let _ = writeln!(out, "Paid with {}", record.payment_method);
    if let Some(series) = summary.price_series {
        let points: Vec<String> = series.iter().map(|&c| format_cents(c)).collect();
        let _ = writeln!(out, "Price history: {}", points.join(" -> "));
    }
    out
}

/// The open checkout panel, if any.
#[must_use]
pub fn checkout(state: &Storefront) -> Option<String> {
    let session = state.checkout()?;
    let product = session.product();
    let mut out = format!("-- Checkout: {} --\n", product.title);

    match session.status() {
        PaymentStatus::Idle => {
            let _ = writeln!(out, "Method: {}", session.method());
            let _ = writeln!(out, "{}  (pay)", session.pay_label());
        }
        PaymentStatus::Processing => {
            let _ = writeln!(out, "Processing... {}%", session.progress());
        }
        PaymentStatus::Success => {
            if let Some(record) = session.record() {
                let _ = writeln!(out, "Payment complete. Order {}", record.order_id);
            }
            if session.downloaded() {
                out.push_str("Downloaded. (review-now | confirm)\n");
            } else {
                let _ = writeln!(
                    out,
                    "(download {} | confirm)",
                    product.download_filename()
                );
            }
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use remoteanswer_core::Catalog;
    use remoteanswer_store::MemoryStore;
    use std::sync::Arc;

    fn state() -> Storefront {
        Storefront::load(Catalog::builtin().unwrap(), Arc::new(MemoryStore::new()))
    }

    #[test]
    fn market_shows_tabs_and_first_page() {
        let text = market(&state());
        assert!(text.contains("[All] STEM Humanities Business Tech"));
        assert!(text.contains("calc-1"));
        assert!(text.contains("Page 1 of 3"));
    }

    #[test]
    fn empty_views_say_so() {
        let state = state();
        assert!(library(&state).contains("No purchases yet."));
        assert!(wishlist(&state).contains("Your wishlist is empty."));
        assert!(order_success(&state).contains("No order to show."));
        assert!(checkout(&state).is_none());
    }
}
