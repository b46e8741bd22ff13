use crate::core::aggregate::aggregate_with;
use crate::core::{NanPolicy, NavigationContext, Ranking, RankingEntry, UnitCollection};
use std::cmp::Ordering;

/// Ranks every unit by its weighted total, highest first.
pub fn rank_top_units(units: &UnitCollection, nav: &NavigationContext) -> Ranking {
    rank_top_units_with(units, nav, NanPolicy::default())
}

/// Builds one entry per unit in collection order, then orders them with a
/// stable ascending sort followed by a reversal. Units with equal totals
/// therefore come out in reverse input order.
///
/// Returns [`Ranking::Empty`] when there are no units or the first unit has
/// no content. The full list is returned; use [`Ranking::top`] to cut it.
pub fn rank_top_units_with(
    units: &UnitCollection,
    nav: &NavigationContext,
    policy: NanPolicy,
) -> Ranking {
    let first_has_content = units
        .first()
        .map(|(_, unit)| !unit.content.is_empty())
        .unwrap_or(false);

    if !first_has_content {
        tracing::debug!(units = units.len(), "No gradable units, skipping ranking");
        return Ranking::Empty;
    }

    let mut entries: Vec<RankingEntry> = units
        .iter()
        .map(|(key, unit)| RankingEntry {
            title: unit.title.clone(),
            total: aggregate_with(unit, policy),
            link: format!("{}#{}", nav.current_search_query, key),
        })
        .collect();

    entries.sort_by(|a, b| ascending_total(a.total, b.total));
    entries.reverse();

    tracing::debug!(entries = entries.len(), "Ranked units");
    Ranking::Ranked(entries)
}

// NaN sorts above every number and ties with itself; -0.0 ties with 0.0.
fn ascending_total(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}
