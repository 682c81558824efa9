//! Ranker: per-(side, source) grouping, ordering and top-N selection.
//!
//! Sort direction follows the real-world transaction each row stands for:
//!
//! | Side | Source    | Direction  | Meaning                                     |
//! |------|-----------|------------|---------------------------------------------|
//! | buy  | any       | ascending  | cheapest place to acquire gold              |
//! | sell | merchants | descending | highest payout for disposing of gold        |
//! | sell | eldorado  | ascending  | cheapest third-party listing on the market  |
//!
//! Sorting is stable, so equal prices keep their upstream order.

use std::cmp::Ordering;

use serde::Serialize;

use super::offer::{Offer, Side, Source};

/// Maximum number of offers listed per group.
pub const TOP_N: usize = 5;

/// Price ordering for one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RankDirection {
    /// Lowest price first.
    Ascending,
    /// Highest price first.
    Descending,
}

impl RankDirection {
    /// Direction for a (side, source) group.
    pub const fn for_group(side: Side, source: Source) -> Self {
        match (side, source) {
            (Side::Buy, _) | (Side::Sell, Source::Eldorado) => Self::Ascending,
            (Side::Sell, Source::Merchants) => Self::Descending,
        }
    }

    /// Compare two prices in this direction.
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        match self {
            Self::Ascending => a.total_cmp(&b),
            Self::Descending => b.total_cmp(&a),
        }
    }
}

/// Sorted top-N view of one (side, source) group.
///
/// Only [`rank_group`] builds one, so `top` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedGroup {
    side: Side,
    source: Source,
    direction: RankDirection,
    /// Up to [`TOP_N`] offers, best first.
    top: Vec<Offer>,
    /// Offers in the group before truncation.
    total: usize,
}

impl RankedGroup {
    pub const fn side(&self) -> Side {
        self.side
    }

    pub const fn source(&self) -> Source {
        self.source
    }

    pub const fn direction(&self) -> RankDirection {
        self.direction
    }

    /// Up to [`TOP_N`] offers, best first. Never empty.
    pub fn top(&self) -> &[Offer] {
        &self.top
    }

    /// Offers in the group before truncation.
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Display heading, e.g. `Sell · merchants.to`.
    pub fn label(&self) -> String {
        format!("{} · {}", self.side, self.source)
    }

    /// The extremal offer of the group.
    pub fn best(&self) -> &Offer {
        &self.top[0]
    }
}

/// Rank a single group. Returns `None` when it has no offers.
pub fn rank_group(side: Side, source: Source, mut offers: Vec<Offer>) -> Option<RankedGroup> {
    if offers.is_empty() {
        return None;
    }

    let direction = RankDirection::for_group(side, source);
    let total = offers.len();
    offers.sort_by(|a, b| direction.compare(a.price_per_unit(), b.price_per_unit()));
    offers.truncate(TOP_N);

    Some(RankedGroup {
        side,
        source,
        direction,
        top: offers,
        total,
    })
}

/// Partition `offers` by side then source and rank every non-empty group.
///
/// Groups come back in a fixed order: buy before sell, merchants before
/// eldorado. Offers keep their input order within a group until sorted.
pub fn rank(offers: &[Offer]) -> Vec<RankedGroup> {
    let mut groups = Vec::new();
    for side in Side::ALL {
        for source in Source::ALL {
            let members: Vec<Offer> = offers
                .iter()
                .filter(|o| o.side() == side && o.source() == source)
                .cloned()
                .collect();
            if let Some(group) = rank_group(side, source, members) {
                groups.push(group);
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(name: &str, price: f64, side: Side, source: Source) -> Offer {
        Offer::new(name, price, None, side, source).unwrap()
    }

    fn prices(group: &RankedGroup) -> Vec<f64> {
        group.top().iter().map(Offer::price_per_unit).collect()
    }

    #[test]
    fn test_direction_table() {
        use RankDirection::{Ascending, Descending};
        assert_eq!(RankDirection::for_group(Side::Buy, Source::Merchants), Ascending);
        assert_eq!(RankDirection::for_group(Side::Buy, Source::Eldorado), Ascending);
        assert_eq!(RankDirection::for_group(Side::Sell, Source::Merchants), Descending);
        assert_eq!(RankDirection::for_group(Side::Sell, Source::Eldorado), Ascending);
    }

    #[test]
    fn test_merchants_sell_ranks_highest_first() {
        let offers = vec![
            offer("a", 10.5, Side::Sell, Source::Merchants),
            offer("b", 9.75, Side::Sell, Source::Merchants),
        ];
        let groups = rank(&offers);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].best().formatted_price(), "$10.5000");
        assert_eq!(prices(&groups[0]), vec![10.5, 9.75]);
    }

    #[test]
    fn test_buy_and_eldorado_sell_rank_lowest_first() {
        let offers = vec![
            offer("a", 0.30, Side::Buy, Source::Merchants),
            offer("b", 0.20, Side::Buy, Source::Merchants),
            offer("c", 0.25, Side::Sell, Source::Eldorado),
            offer("d", 0.15, Side::Sell, Source::Eldorado),
        ];
        let groups = rank(&offers);
        assert_eq!(groups.len(), 2);
        assert_eq!(prices(&groups[0]), vec![0.20, 0.30]);
        assert_eq!(groups[1].source(), Source::Eldorado);
        assert_eq!(prices(&groups[1]), vec![0.15, 0.25]);
    }

    #[test]
    fn test_sources_never_mixed() {
        let offers = vec![
            offer("m", 1.0, Side::Sell, Source::Merchants),
            offer("e", 2.0, Side::Sell, Source::Eldorado),
        ];
        let groups = rank(&offers);
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.top().len() == 1));
        assert_eq!(groups[0].label(), "Sell · merchants.to");
        assert_eq!(groups[1].label(), "Sell · eldorado.gg");
    }

    #[test]
    fn test_group_order_is_fixed() {
        let offers = vec![
            offer("s", 1.0, Side::Sell, Source::Eldorado),
            offer("b", 1.0, Side::Buy, Source::Eldorado),
            offer("m", 1.0, Side::Sell, Source::Merchants),
            offer("n", 1.0, Side::Buy, Source::Merchants),
        ];
        let order: Vec<_> = rank(&offers).iter().map(|g| (g.side(), g.source())).collect();
        assert_eq!(
            order,
            vec![
                (Side::Buy, Source::Merchants),
                (Side::Buy, Source::Eldorado),
                (Side::Sell, Source::Merchants),
                (Side::Sell, Source::Eldorado),
            ]
        );
    }

    #[test]
    fn test_top_truncated_to_five() {
        let offers: Vec<_> = (1..=8)
            .map(|i| offer(&format!("m{i}"), f64::from(i), Side::Buy, Source::Merchants))
            .collect();
        let group = &rank(&offers)[0];
        assert_eq!(group.top().len(), TOP_N);
        assert_eq!(group.total(), 8);
        assert_eq!(prices(group), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_ties_keep_upstream_order() {
        for (side, source) in [(Side::Buy, Source::Merchants), (Side::Sell, Source::Merchants)] {
            let offers = vec![
                offer("first", 2.0, side, source),
                offer("other", 3.0, side, source),
                offer("second", 2.0, side, source),
            ];
            let group = &rank(&offers)[0];
            let tied: Vec<_> = group
                .top()
                .iter()
                .filter(|o| (o.price_per_unit() - 2.0).abs() < f64::EPSILON)
                .map(Offer::merchant_name)
                .collect();
            assert_eq!(tied, vec!["first", "second"]);
        }
    }

    #[test]
    fn test_empty_input_has_no_groups() {
        assert!(rank(&[]).is_empty());
        assert!(rank_group(Side::Buy, Source::Merchants, Vec::new()).is_none());
    }
}
