use std::cmp::Ordering;

use crate::models::TermRecord;

/// SQL fragment matching [`rank_order`]. SQLite's default `BINARY` collation compares
/// UTF-8 bytes, which is the same order `str::cmp` uses.
pub(crate) const RANK_ORDER_SQL: &str = "score DESC, last_searched DESC, term ASC";

/// Total order used for listing and eviction: score desc, then most recent, then term.
#[must_use]
pub fn rank_order(a: &TermRecord, b: &TermRecord) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.last_searched.cmp(&a.last_searched))
        .then_with(|| a.term.cmp(&b.term))
}

pub fn sort_ranked(records: &mut [TermRecord]) {
    records.sort_by(rank_order);
}
