//! On-demand rate queries: canonical rate, best sell prices, per-source
//! listing.

use crate::cli::ui;
use crate::core::quote::Quote;
use crate::core::{Aggregator, ranking};
use anyhow::Result;

fn render_quotes_table(quotes: &[Quote]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Source"),
        ui::header_cell("Buy"),
        ui::header_cell("Sell"),
    ]);

    for quote in quotes {
        table.add_row(vec![
            comfy_table::Cell::new(&quote.source),
            ui::price_cell(quote.buy),
            ui::price_cell(quote.sell),
        ]);
    }

    table.to_string()
}

fn print_no_rates(currency: &str) {
    println!(
        "{}",
        ui::style_text(&format!("No rates found for {currency}."), ui::StyleType::Error)
    );
}

async fn aggregate_with_spinner(aggregator: &Aggregator, currency: &str) -> Vec<Quote> {
    let pb = ui::new_spinner(&format!("Fetching {currency} rates..."));
    let quotes = aggregator.aggregate(currency).await;
    pb.finish_and_clear();
    quotes
}

/// Shows the canonical rate: the cheapest sell price across all sources.
pub async fn show_rate(aggregator: &Aggregator, currency: &str) -> Result<()> {
    let currency = currency.to_uppercase();
    let quotes = aggregate_with_spinner(aggregator, &currency).await;

    let Some(quote) = ranking::canonical(&quotes) else {
        print_no_rates(&currency);
        return Ok(());
    };

    println!(
        "{}\n",
        ui::style_text(&format!("Rate for {currency}"), ui::StyleType::Title)
    );
    println!("{}", render_quotes_table(std::slice::from_ref(&quote)));
    Ok(())
}

/// Shows the `count` cheapest sell rates across all sources.
pub async fn show_best(aggregator: &Aggregator, currency: &str, count: usize) -> Result<()> {
    let currency = currency.to_uppercase();
    let quotes = aggregate_with_spinner(aggregator, &currency).await;

    let top = ranking::top_cheapest(&quotes, count);
    if top.is_empty() {
        print_no_rates(&currency);
        return Ok(());
    }

    println!(
        "{}\n",
        ui::style_text(
            &format!("Best sell rates for {currency}"),
            ui::StyleType::Title
        )
    );
    println!("{}", render_quotes_table(&top));
    Ok(())
}

/// Shows one quote per source, sorted by source name.
pub async fn show_sources(aggregator: &Aggregator, currency: &str) -> Result<()> {
    let currency = currency.to_uppercase();
    let quotes = aggregate_with_spinner(aggregator, &currency).await;

    let distinct = ranking::distinct_by_source(&quotes);
    if distinct.is_empty() {
        print_no_rates(&currency);
        return Ok(());
    }

    println!(
        "{}\n",
        ui::style_text(
            &format!("{currency} rates by source"),
            ui::StyleType::Title
        )
    );
    println!("{}", render_quotes_table(&distinct));
    Ok(())
}
