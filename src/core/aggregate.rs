use crate::core::{ContentItem, NanPolicy, Unit};

/// Weighted achievement total of one unit, using the default [`NanPolicy`].
pub fn aggregate(unit: &Unit) -> f64 {
    aggregate_with(unit, NanPolicy::default())
}

/// Sums `weighting * achieved` over the items that count toward the total.
///
/// An item counts when both fields are present and the mark is strictly
/// positive. Everything else contributes nothing. Item order does not
/// matter unless the sum overflows.
///
/// Under [`NanPolicy::Hardened`] the total is always finite: non-finite
/// fields and products are skipped, as is any item that would overflow the
/// running sum.
pub fn aggregate_with(unit: &Unit, policy: NanPolicy) -> f64 {
    unit.content
        .iter()
        .filter_map(|item| contribution(item, policy))
        .fold(0.0, |total, value| match policy {
            NanPolicy::Hardened if !(total + value).is_finite() => total,
            _ => total + value,
        })
}

fn contribution(item: &ContentItem, policy: NanPolicy) -> Option<f64> {
    let weighting = item.weighting?;
    let achieved = item.achieved?;

    if achieved.is_nan() || achieved <= 0.0 {
        return None;
    }

    let value = weighting * achieved;
    if policy == NanPolicy::Hardened
        && !(weighting.is_finite() && achieved.is_finite() && value.is_finite())
    {
        return None;
    }

    Some(value)
}
