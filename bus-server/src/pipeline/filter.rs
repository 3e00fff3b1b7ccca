//! Rating and bus type filtering.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::domain::{BusType, Offering, Rating};

/// The ratings and bus types a user will accept.
///
/// An offering passes only if its rating AND its bus type are both chosen.
/// With either set empty nothing passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub ratings: BTreeSet<Rating>,
    pub bus_types: BTreeSet<BusType>,
}

impl FilterSelection {
    /// Create a selection from chosen ratings and bus types.
    pub fn new(
        ratings: impl IntoIterator<Item = Rating>,
        bus_types: impl IntoIterator<Item = BusType>,
    ) -> Self {
        Self {
            ratings: ratings.into_iter().collect(),
            bus_types: bus_types.into_iter().collect(),
        }
    }

    /// Whether both sets have at least one member.
    pub fn is_complete(&self) -> bool {
        !self.ratings.is_empty() && !self.bus_types.is_empty()
    }

    /// Whether `offering` passes both predicates.
    pub fn accepts(&self, offering: &Offering) -> bool {
        self.ratings.contains(&offering.rating) && self.bus_types.contains(&offering.bus_type)
    }
}

/// Keep the offerings accepted by `selection`, preserving input order.
pub fn filter_offerings(offerings: &[Offering], selection: &FilterSelection) -> Vec<Offering> {
    offerings
        .iter()
        .filter(|o| selection.accepts(o))
        .cloned()
        .collect()
}

/// Distinct ratings in order of first appearance.
pub fn distinct_ratings(offerings: &[Offering]) -> Vec<Rating> {
    let mut seen = HashSet::new();
    offerings
        .iter()
        .map(|o| o.rating)
        .filter(|r| seen.insert(*r))
        .collect()
}

/// Distinct bus types in order of first appearance.
pub fn distinct_bus_types(offerings: &[Offering]) -> Vec<BusType> {
    let mut seen = HashSet::new();
    offerings
        .iter()
        .map(|o| &o.bus_type)
        .filter(|t| seen.insert(*t))
        .cloned()
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::RouteName;
    use proptest::prelude::*;

    const TYPES: [&str; 4] = ["AC", "Non-AC", "Sleeper", "Seater"];
    const RATINGS: [f64; 5] = [3.0, 3.5, 4.0, 4.5, 5.0];

    fn arb_offering() -> impl Strategy<Value = Offering> {
        (0..RATINGS.len(), 0..TYPES.len(), 100u32..2000, 0u32..50).prop_map(
            |(r, t, price, seats)| Offering {
                route_name: RouteName::new("R"),
                bus_name: format!("bus-{price}"),
                bus_type: BusType::new(TYPES[t]).unwrap(),
                rating: Rating::new(RATINGS[r]).unwrap(),
                price: f64::from(price),
                seats_available: seats,
                departing_time: None,
                duration: None,
                reaching_time: None,
            },
        )
    }

    fn arb_selection() -> impl Strategy<Value = FilterSelection> {
        (
            proptest::sample::subsequence(RATINGS.to_vec(), 0..=RATINGS.len()),
            proptest::sample::subsequence(TYPES.to_vec(), 0..=TYPES.len()),
        )
            .prop_map(|(rs, ts)| {
                FilterSelection::new(
                    rs.into_iter().map(|r| Rating::new(r).unwrap()),
                    ts.into_iter().map(|t| BusType::new(t).unwrap()),
                )
            })
    }

    proptest! {
        /// Every kept row satisfies both predicates
        #[test]
        fn kept_rows_match(
            offerings in proptest::collection::vec(arb_offering(), 0..30),
            selection in arb_selection(),
        ) {
            let kept = filter_offerings(&offerings, &selection);
            for o in &kept {
                prop_assert!(selection.ratings.contains(&o.rating));
                prop_assert!(selection.bus_types.contains(&o.bus_type));
            }
        }

        /// No accepted row is dropped, and order is preserved
        #[test]
        fn is_ordered_subsequence(
            offerings in proptest::collection::vec(arb_offering(), 0..30),
            selection in arb_selection(),
        ) {
            let kept = filter_offerings(&offerings, &selection);
            let expected: Vec<Offering> = offerings
                .iter()
                .filter(|o| selection.accepts(o))
                .cloned()
                .collect();
            prop_assert_eq!(kept, expected);
        }

        /// An incomplete selection keeps nothing
        #[test]
        fn incomplete_keeps_nothing(
            offerings in proptest::collection::vec(arb_offering(), 0..30),
            selection in arb_selection(),
        ) {
            if !selection.is_complete() {
                prop_assert!(filter_offerings(&offerings, &selection).is_empty());
            }
        }
    }
}
