//! Reference Test - compares derived topology against an explicit tree.
//!
//! Builds the bracket graph the slow way (explicit feeder lists for a full,
//! contiguously numbered bracket) and verifies that the arithmetic parent
//! derivation and the drawn connectors agree with it.

use bracket_board::layout::{min_number, parent_keys};
use bracket_board::{
    plan, split_arms, Bracket, LayoutConfig, Match, MatchKey, RoundBuckets, Size,
};
use std::collections::{BTreeMap, BTreeSet};

const ROUND_SIZES: [(u32, u32); 5] = [(1, 16), (2, 8), (3, 4), (4, 2), (5, 1)];

fn m(round: u32, number: u32) -> Match {
    Match {
        round,
        number,
        slot_a: Some(format!("a{round}.{number}")),
        slot_b: Some(format!("b{round}.{number}")),
        winner: None,
    }
}

fn full_bracket() -> Vec<Match> {
    ROUND_SIZES
        .iter()
        .flat_map(|&(round, count)| (1..=count).map(move |n| m(round, n)))
        .collect()
}

/// Explicit child -> parents map: match n of round r is fed by 2n-1 and 2n.
fn reference_tree() -> BTreeMap<MatchKey, [MatchKey; 2]> {
    let mut tree = BTreeMap::new();
    for &(round, count) in ROUND_SIZES.iter().skip(1) {
        for n in 1..=count {
            tree.insert(
                MatchKey::new(round, n),
                [MatchKey::new(round - 1, 2 * n - 1), MatchKey::new(round - 1, 2 * n)],
            );
        }
    }
    tree
}

#[test]
fn test_parent_keys_match_reference_tree() {
    let buckets = RoundBuckets::from_matches(full_bracket());
    let tree = reference_tree();

    for placement in plan(&buckets).iter().filter(|p| p.column.round > 1) {
        let round_min = min_number(&placement.matches).unwrap();
        let parent_min = min_number(&placement.parents);
        for child in &placement.matches {
            let keys = parent_keys(child.round, child.number, round_min, parent_min);
            assert_eq!(
                keys.as_slice(),
                &tree[&child.key()],
                "Parents of {:?} differ from reference",
                child.key()
            );
        }
    }
}

#[test]
fn test_connectors_match_reference_tree() {
    let mut bracket = Bracket::new(LayoutConfig::default(), Size::new(1600.0, 900.0));
    bracket.load(full_bracket(), &());

    let expected: BTreeSet<(MatchKey, MatchKey)> = reference_tree()
        .into_iter()
        .flat_map(|(child, parents)| parents.into_iter().map(move |p| (p, child)))
        .collect();
    let drawn: BTreeSet<(MatchKey, MatchKey)> = bracket
        .links()
        .connectors
        .iter()
        .map(|c| (c.parent, c.child))
        .collect();

    assert_eq!(drawn, expected);
    assert_eq!(bracket.links().len(), 30);
}

#[test]
fn test_children_centered_between_parents() {
    let mut bracket = Bracket::new(LayoutConfig::default(), Size::new(1600.0, 900.0));
    bracket.load(full_bracket(), &());
    let layout = bracket.layout();
    let grid = bracket.grid();

    for (child, [p1, p2]) in reference_tree() {
        let c = layout.registry.bounds(child, grid).unwrap();
        let a = layout.registry.bounds(p1, grid).unwrap();
        let b = layout.registry.bounds(p2, grid).unwrap();
        let mid = (a.center_y() + b.center_y()) / 2.0;
        assert!(
            (c.center_y() - mid).abs() < 1e-3,
            "{:?} not centered between its parents",
            child
        );
    }
}

#[test]
fn test_connectors_leave_right_edge_of_leftmost_card() {
    let mut bracket = Bracket::new(LayoutConfig::default(), Size::new(1600.0, 900.0));
    bracket.load(full_bracket(), &());
    let grid = bracket.grid();

    for connector in &bracket.links().connectors {
        let a = bracket.layout().registry.bounds(connector.parent, grid).unwrap();
        let b = bracket.layout().registry.bounds(connector.child, grid).unwrap();
        let (left, right) = if a.x <= b.x { (a, b) } else { (b, a) };
        assert_eq!(connector.curve.start, left.right_mid());
        assert_eq!(connector.curve.end, right.left_mid());
        let span = connector.curve.end.x - connector.curve.start.x;
        assert!(span > 0.0);
        assert!((connector.curve.control1.x - connector.curve.start.x - span * 0.45).abs() < 1e-3);
    }
}

#[test]
fn test_round_one_split_recovers_sorted_set() {
    for n in 0..=33u32 {
        let round: Vec<Match> = (1..=n).map(|i| m(1, i)).collect();
        let (left, right) = split_arms(&round);
        assert_eq!(left.len(), (n as usize).div_ceil(2));
        assert_eq!(right.len(), n as usize - left.len());

        let rejoined: Vec<u32> = left.iter().chain(right).map(|m| m.number).collect();
        assert_eq!(rejoined, (1..=n).collect::<Vec<_>>());
    }
}

#[test]
fn test_example_two_match_round() {
    let matches = vec![
        Match {
            round: 1,
            number: 1,
            slot_a: Some("A".into()),
            slot_b: Some("B".into()),
            winner: Some("A".into()),
        },
        Match {
            round: 1,
            number: 2,
            slot_a: Some("C".into()),
            slot_b: Some("D".into()),
            winner: None,
        },
    ];
    let mut bracket = Bracket::new(LayoutConfig::default(), Size::new(1600.0, 900.0));
    bracket.load(matches, &());

    let layout = bracket.layout();
    assert_eq!(layout.cards.len(), 2);
    let first = layout.card(MatchKey::new(1, 1)).unwrap();
    let second = layout.card(MatchKey::new(1, 2)).unwrap();
    assert!(first.slots[0].winner && !first.slots[1].winner);
    assert!(!second.slots[0].winner && !second.slots[1].winner);
    assert_eq!(first.column.arm, bracket_board::Arm::Left);
    assert_eq!(second.column.arm, bracket_board::Arm::Right);
}

#[test]
fn test_non_contiguous_arm_minimum() {
    // left arm of round 1 starts at match 5
    let keys = parent_keys(2, 1, 1, Some(5));
    assert_eq!(keys.as_slice(), &[MatchKey::new(1, 5), MatchKey::new(1, 6)]);

    let matches = vec![m(1, 5), m(1, 6), m(2, 1)];
    let buckets = RoundBuckets::from_matches(matches);
    let placements = plan(&buckets);
    let left2 = placements
        .iter()
        .find(|p| p.column.round == 2 && p.column.arm == bracket_board::Arm::Left)
        .unwrap();
    // round 1 splits into [5] left and [6] right; the left arm minimum is 5
    assert_eq!(min_number(&left2.parents), Some(5));
}
