//! Pure ranking functions over an aggregated list of quotes.

use crate::core::quote::Quote;

/// Returns the `n` quotes with the lowest sell price, ascending.
///
/// The sort is stable, so quotes with equal sell prices keep their
/// aggregation order.
pub fn top_cheapest(quotes: &[Quote], n: usize) -> Vec<Quote> {
    let mut sorted = quotes.to_vec();
    sorted.sort_by(|a, b| a.sell.total_cmp(&b.sell));
    sorted.truncate(n);
    sorted
}

/// Returns one quote per distinct source, sorted by source name (ordinal,
/// case-sensitive).
///
/// When a source appears more than once, the quote that came earliest in
/// aggregation order wins; later duplicates are dropped. The stable sort
/// preserves within-source order, so `dedup` keeps the first occurrence.
pub fn distinct_by_source(quotes: &[Quote]) -> Vec<Quote> {
    let mut sorted = quotes.to_vec();
    sorted.sort_by(|a, b| a.source.cmp(&b.source));
    sorted.dedup_by(|a, b| a.source == b.source);
    sorted
}

/// The single representative quote for a currency: the cheapest available
/// sell price across all sources, or `None` when there is no data.
pub fn canonical(quotes: &[Quote]) -> Option<Quote> {
    top_cheapest(quotes, 1).into_iter().next()
}
