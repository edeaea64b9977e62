//! Review types and rating aggregation.
//!
//! Displayed ratings blend the catalog baseline with submitted reviews. The
//! baseline counts as [`BASELINE_WEIGHT`] phantom reviews, so one early
//! review cannot swing the figure far, and the result converges to the true
//! review average as volume grows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{ProductId, ReviewId};

/// Number of phantom reviews the baseline rating is worth.
pub const BASELINE_WEIGHT: u32 = 5;

/// Author label attached to every submitted review.
pub const VERIFIED_BUYER: &str = "Verified Buyer";

/// A star rating between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Lowest allowed rating.
    pub const MIN: u8 = 1;
    /// Highest allowed rating.
    pub const MAX: u8 = 5;

    /// Create a rating.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRating` if `stars` is outside 1–5.
    pub fn new(stars: u8) -> Result<Self, InvalidRating> {
        if (Self::MIN..=Self::MAX).contains(&stars) {
            Ok(Self(stars))
        } else {
            Err(InvalidRating(stars))
        }
    }

    /// Number of stars.
    #[must_use]
    pub const fn stars(self) -> u8 {
        self.0
    }

    /// Short description shown next to the star picker.
    #[must_use]
    pub const fn blurb(self) -> &'static str {
        match self.0 {
            5 => "Excellent! Exactly what I needed",
            4 => "Great quality",
            3 => "Good, but could be better",
            2 => "Not what I expected",
            _ => "Very disappointing",
        }
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl TryFrom<u8> for Rating {
    type Error = InvalidRating;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/5", self.0)
    }
}

/// A rating outside the 1–5 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rating must be between 1 and 5, got {0}")]
pub struct InvalidRating(pub u8);

/// A submitted product review.
///
/// Reviews are never edited or deleted once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Unique review ID (ULID for time-ordering).
    pub id: ReviewId,

    /// The reviewed product.
    pub product_id: ProductId,

    /// Star rating.
    pub rating: Rating,

    /// Free-text comment, possibly empty.
    pub comment: String,

    /// When the review was submitted.
    pub submitted_at: DateTime<Utc>,

    /// Author label.
    pub author: String,
}

impl Review {
    /// Create a review from a verified buyer, stamped with the current time.
    #[must_use]
    pub fn submit(product_id: ProductId, rating: Rating, comment: impl Into<String>) -> Self {
        Self {
            id: ReviewId::generate(),
            product_id,
            rating,
            comment: comment.into(),
            submitted_at: Utc::now(),
            author: VERIFIED_BUYER.to_string(),
        }
    }
}

/// Reviews for one product, in the order given.
pub fn reviews_for<'a>(
    reviews: &'a [Review],
    product_id: &'a ProductId,
) -> impl Iterator<Item = &'a Review> + 'a {
    reviews.iter().filter(move |r| &r.product_id == product_id)
}

/// Smoothed mean of a baseline rating and a set of reviews, unrounded.
///
/// Returns the baseline unchanged when there are no reviews.
#[must_use]
pub fn smoothed_rating<'a>(baseline: f64, reviews: impl IntoIterator<Item = &'a Review>) -> f64 {
    let (count, sum) = reviews
        .into_iter()
        .fold((0_u32, 0_u32), |(count, sum), review| {
            (count + 1, sum + u32::from(review.rating.stars()))
        });

    if count == 0 {
        return baseline;
    }

    (f64::from(sum) + baseline * f64::from(BASELINE_WEIGHT)) / f64::from(count + BASELINE_WEIGHT)
}

/// Displayed rating: the smoothed mean rounded to one decimal place.
#[must_use]
pub fn aggregate<'a>(baseline: f64, reviews: impl IntoIterator<Item = &'a Review>) -> f64 {
    let mut reviews = reviews.into_iter().peekable();
    if reviews.peek().is_none() {
        return baseline;
    }
    round_to_tenth(smoothed_rating(baseline, reviews))
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
