//! Round bucketing and the arm splitter.
//!
//! Buckets group records by round, sorted by match number. The plan then
//! halves each arm round (1..=4) at `ceil(n / 2)`: the first half goes left,
//! the remainder right. The championship round is never split and takes the
//! whole of round 4 as its parent set.

use std::collections::BTreeMap;

use crate::record::{Arm, Column, Match, CHAMPIONSHIP_ROUND};

/// Round number -> matches of that round, ascending by match number.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoundBuckets {
    rounds: BTreeMap<u32, Vec<Match>>,
}

impl RoundBuckets {
    /// Group a flat record list by round.
    pub fn from_matches(matches: impl IntoIterator<Item = Match>) -> Self {
        let mut rounds: BTreeMap<u32, Vec<Match>> = BTreeMap::new();
        for m in matches {
            rounds.entry(m.round).or_default().push(m);
        }
        for bucket in rounds.values_mut() {
            bucket.sort_by_key(|m| m.number);
        }
        Self { rounds }
    }

    /// Sorted matches of a round (empty if the round is absent).
    #[inline]
    pub fn round(&self, round: u32) -> &[Match] {
        self.rounds.get(&round).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of records across all rounds.
    pub fn len(&self) -> usize {
        self.rounds.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.values().all(Vec::is_empty)
    }

    /// Iterate `(round, matches)` in ascending round order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[Match])> {
        self.rounds.iter().map(|(r, v)| (*r, v.as_slice()))
    }
}

/// Split a sorted round at `ceil(n / 2)` into (left, right).
#[inline]
pub fn split_arms(sorted: &[Match]) -> (&[Match], &[Match]) {
    sorted.split_at(sorted.len().div_ceil(2))
}

/// The half of a sorted round that belongs to an arm.
pub fn arm_half(sorted: &[Match], arm: Arm) -> &[Match] {
    let (left, right) = split_arms(sorted);
    match arm {
        Arm::Left => left,
        Arm::Right => right,
        Arm::Center => sorted,
    }
}

/// One `place_round` call: a column, its matches, and their parent set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub column: Column,
    /// Matches of this round in this arm, ascending by match number
    pub matches: Vec<Match>,
    /// Matches of the previous round in this arm (empty for round 1)
    pub parents: Vec<Match>,
}

/// Ordered list of placements making up one full layout pass.
///
/// Order: round 1 (left, right), rounds 2..=4 (left, right), round 5 (center).
/// Every round is placed before any round that reads it.
pub fn plan(buckets: &RoundBuckets) -> Vec<Placement> {
    let mut placements = Vec::with_capacity(2 * (CHAMPIONSHIP_ROUND as usize - 1) + 1);

    for round in 1..CHAMPIONSHIP_ROUND {
        for arm in [Arm::Left, Arm::Right] {
            let parents = if round == 1 {
                Vec::new()
            } else {
                arm_half(buckets.round(round - 1), arm).to_vec()
            };
            placements.push(Placement {
                column: Column::new(arm, round),
                matches: arm_half(buckets.round(round), arm).to_vec(),
                parents,
            });
        }
    }

    placements.push(Placement {
        column: Column::new(Arm::Center, CHAMPIONSHIP_ROUND),
        matches: buckets.round(CHAMPIONSHIP_ROUND).to_vec(),
        parents: buckets.round(CHAMPIONSHIP_ROUND - 1).to_vec(),
    });

    placements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(round: u32, number: u32) -> Match {
        Match {
            round,
            number,
            slot_a: None,
            slot_b: None,
            winner: None,
        }
    }

    #[test]
    fn test_buckets_sort_by_match_number() {
        let buckets = RoundBuckets::from_matches(vec![m(1, 3), m(2, 1), m(1, 1), m(1, 2)]);
        let numbers: Vec<u32> = buckets.round(1).iter().map(|m| m.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(buckets.round(2).len(), 1);
        assert!(buckets.round(4).is_empty());
        assert_eq!(buckets.len(), 4);
    }

    #[test]
    fn test_split_odd_count_favors_left() {
        let round: Vec<Match> = (1..=5).map(|n| m(1, n)).collect();
        let (left, right) = split_arms(&round);
        assert_eq!(left.len(), 3);
        assert_eq!(right.len(), 2);
        assert_eq!(right[0].number, 4);
    }

    #[test]
    fn test_split_single_match_goes_left() {
        let round = vec![m(4, 1)];
        let (left, right) = split_arms(&round);
        assert_eq!(left.len(), 1);
        assert!(right.is_empty());
    }

    #[test]
    fn test_plan_order_and_championship_parents() {
        let mut matches: Vec<Match> = (1..=16).map(|n| m(1, n)).collect();
        matches.extend((1..=8).map(|n| m(2, n)));
        matches.extend((1..=4).map(|n| m(3, n)));
        matches.extend((1..=2).map(|n| m(4, n)));
        matches.push(m(5, 1));
        let placements = plan(&RoundBuckets::from_matches(matches));

        let columns: Vec<Column> = placements.iter().map(|p| p.column).collect();
        assert_eq!(columns[0], Column::new(Arm::Left, 1));
        assert_eq!(columns[1], Column::new(Arm::Right, 1));
        assert_eq!(columns[8], Column::new(Arm::Center, 5));
        assert_eq!(placements.len(), 9);

        // right arm of round 2 reads the right half of round 1
        let right2 = &placements[3];
        assert_eq!(right2.column, Column::new(Arm::Right, 2));
        assert_eq!(right2.matches[0].number, 5);
        assert_eq!(right2.parents[0].number, 9);

        assert_eq!(placements[8].parents.len(), 2);
    }
}
