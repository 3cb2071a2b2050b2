use itertools::Itertools;

pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedValue {
    pub value: String,
    pub count: usize,
}

/// The `top_n` most frequent values, highest count first.
///
/// Equal counts keep the order in which the values first showed up.
pub fn top_values(values: &[String], top_n: usize) -> Vec<RankedValue> {
    let counts = values.iter().counts();

    values
        .iter()
        .unique()
        .map(|value| RankedValue {
            value: value.clone(),
            count: counts[value],
        })
        // Stable, so first-seen order survives among ties.
        .sorted_by(|a, b| b.count.cmp(&a.count))
        .take(top_n)
        .collect()
}
