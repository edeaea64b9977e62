//! RemoteAnswer - text driver for the study-guide storefront
//!
//! Reads commands from stdin and prints views to stdout. Logs go to stderr.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use remoteanswer_app::command::HELP;
use remoteanswer_app::{render, AppConfig, Line, Reply, Runtime, Services, Storefront};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,remoteanswer=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting RemoteAnswer");

    let config = AppConfig::from_env()?;
    tracing::info!(
        data_dir = %config.data_dir,
        catalog_path = ?config.catalog_path,
        oracle_configured = %config.oracle_url.is_some(),
        tick_ms = config.checkout_tick_millis,
        "Configuration loaded"
    );

    let services = Services::from_config(&config)?;
    let storefront = Storefront::load(services.catalog, services.store);
    let mut runtime = Runtime::new(storefront, services.oracle, config.tick_interval());

    println!("{}", render(runtime.storefront()));
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.parse::<Line>() {
                    Ok(Line::Empty) => {}
                    Ok(Line::Help) => println!("{HELP}"),
                    Ok(Line::Quit) => break,
                    Ok(Line::Command(command)) => match runtime.handle(command).await {
                        Ok(reply) => {
                            report(&reply);
                            println!("{}", render(runtime.storefront()));
                        }
                        Err(e) => println!("! {e}"),
                    },
                    Err(e) => println!("! {e}"),
                }
            }
            Some(event) = runtime.next_event() => {
                match runtime.apply(event) {
                    Reply::Ignored => {}
                    Reply::Progress(progress) => println!("Processing... {progress}%"),
                    reply => {
                        report(&reply);
                        println!("{}", render(runtime.storefront()));
                    }
                }
            }
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}

fn report(reply: &Reply) {
    match reply {
        Reply::Wishlist { product_id, added } => {
            let verb = if *added { "Added" } else { "Removed" };
            println!("{verb} {product_id} {} wishlist", if *added { "to" } else { "from" });
        }
        Reply::Searching { generation } => println!("Searching... (#{generation})"),
        Reply::SearchApplied { matches } => println!("{matches} recommended guides"),
        Reply::CheckoutOpened { product_id } => println!("Checkout opened for {product_id}"),
        Reply::AlreadyProcessing => println!("Payment already processing"),
        Reply::PaymentSucceeded { product_id } => println!("Payment for {product_id} succeeded"),
        Reply::Downloaded { filename } => println!("Downloaded {filename}"),
        Reply::ReviewRequested { product_id } => {
            println!("Write your review: review {product_id} <1-5> [comment]");
        }
        Reply::Reviewed { product_id } => println!("Thanks for reviewing {product_id}"),
        Reply::CheckoutClosed { was_open: false } => println!("No checkout open"),
        Reply::Pitch { product_id, text } => println!("{product_id}: {text}"),
        Reply::Updated
        | Reply::PaymentStarted
        | Reply::Progress(_)
        | Reply::Navigated(_)
        | Reply::CheckoutClosed { was_open: true }
        | Reply::Ignored => {}
    }
}
