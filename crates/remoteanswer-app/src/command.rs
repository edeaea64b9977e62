//! Storefront commands and the line syntax used by the driver.

use std::str::FromStr;

use remoteanswer_core::{CategoryFilter, PaymentMethod, ProductId, Rating};

use crate::error::ParseError;
use crate::state::View;

/// Help text for the command driver.
pub const HELP: &str = "\
Commands:
  market | library | wishlist       switch view
  category <All|STEM|Humanities|Business|Tech>
  query <text>                      live text filter
  search [text]                     ask for recommendations (blank clears)
  page <n>                          go to catalog page
  wish <id>                         toggle wishlist
  buy <id>                          open checkout
  method <card|paypal|apple_pay|google_pay|bank_transfer|crypto>
  pay                               start payment
  download                          download the purchased guide
  confirm                           close checkout and show the receipt
  review-now                        close checkout and review the guide
  close                             close checkout
  review <id> <1-5> [comment]       submit a review
  pitch <id>                        show sales copy
  help | quit";

/// A user command. Every state change goes through one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Switch view.
    ShowView(View),
    /// Change the category filter.
    SelectCategory(CategoryFilter),
    /// Replace the live text filter.
    EditQuery(String),
    /// Submit a search to the recommendation oracle.
    SubmitSearch(String),
    /// Jump to a catalog page.
    GoToPage(usize),
    /// Toggle a product on the wishlist.
    ToggleWishlist(ProductId),
    /// Open a checkout.
    OpenCheckout(ProductId),
    /// Choose the payment method.
    SelectPaymentMethod(PaymentMethod),
    /// Start the payment.
    StartPayment,
    /// Download the purchased guide.
    Download,
    /// Close the checkout and show the receipt.
    ConfirmOrder,
    /// Close the checkout and go review the guide.
    ReviewNow,
    /// Close the checkout.
    CloseCheckout,
    /// Submit a review.
    SubmitReview {
        /// Reviewed product.
        product_id: ProductId,
        /// Star rating.
        rating: Rating,
        /// Free-text comment.
        comment: String,
    },
    /// Fetch sales copy for a product.
    Pitch(ProductId),
}

/// A parsed driver line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Nothing to do.
    Empty,
    /// Print help.
    Help,
    /// Exit the driver.
    Quit,
    /// Run a command.
    Command(Command),
}

impl FromStr for Line {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "" => return Ok(Self::Empty),
            "help" | "?" => return Ok(Self::Help),
            "quit" | "exit" => return Ok(Self::Quit),
            "market" => Command::ShowView(View::Market),
            "library" => Command::ShowView(View::Library),
            "wishlist" => Command::ShowView(View::Wishlist),
            "category" => {
                let name = required(rest, "category", "a category name")?;
                let filter = name.parse::<CategoryFilter>().map_err(|e| ParseError::InvalidArgument {
                    argument: "category",
                    reason: format!("{e}"),
                })?;
                Command::SelectCategory(filter)
            }
            "query" => Command::EditQuery(rest.to_string()),
            "search" => Command::SubmitSearch(rest.to_string()),
            "page" => {
                let n = required(rest, "page", "a page number")?;
                let page = n.parse::<usize>().map_err(|_| ParseError::InvalidArgument {
                    argument: "page number",
                    reason: format!("{n:?} is not a number"),
                })?;
                Command::GoToPage(page)
            }
            "wish" => Command::ToggleWishlist(product_id(rest, "wish")?),
            "buy" => Command::OpenCheckout(product_id(rest, "buy")?),
            "method" => {
                let name = required(rest, "method", "a payment method")?;
                let method = name.parse::<PaymentMethod>().map_err(|e| ParseError::InvalidArgument {
                    argument: "payment method",
                    reason: format!("{e}"),
                })?;
                Command::SelectPaymentMethod(method)
            }
            "pay" => Command::StartPayment,
            "download" => Command::Download,
            "confirm" => Command::ConfirmOrder,
            "review-now" => Command::ReviewNow,
            "close" => Command::CloseCheckout,
            "review" => parse_review(rest)?,
            "pitch" => Command::Pitch(product_id(rest, "pitch")?),
            other => return Err(ParseError::UnknownCommand(other.to_string())),
        };

        Ok(Self::Command(command))
    }
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, ParseError> {
    if rest.is_empty() {
        Err(ParseError::MissingArgument { command, argument })
    } else {
        Ok(rest)
    }
}

fn product_id(rest: &str, command: &'static str) -> Result<ProductId, ParseError> {
    let id = required(rest, command, "a product id")?;
    id.parse::<ProductId>().map_err(|e| ParseError::InvalidArgument {
        argument: "product id",
        reason: format!("{e}"),
    })
}

fn parse_review(rest: &str) -> Result<Command, ParseError> {
    let mut parts = rest.splitn(3, char::is_whitespace);
    let id = parts.next().unwrap_or_default();
    let product_id = product_id(id, "review")?;

    let stars = parts.next().ok_or(ParseError::MissingArgument {
        command: "review",
        argument: "a rating from 1 to 5",
    })?;
    let rating = stars
        .parse::<u8>()
        .ok()
        .and_then(|n| Rating::new(n).ok())
        .ok_or_else(|| ParseError::InvalidArgument {
            argument: "rating",
            reason: format!("{stars:?} is not between 1 and 5"),
        })?;

    let comment = parts.next().unwrap_or_default().trim().to_string();

    Ok(Command::SubmitReview {
        product_id,
        rating,
        comment,
    })
}
