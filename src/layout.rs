//! Layout Engine - vertical placement of match cards.
//!
//! Implements the per-round placement algorithm:
//! 1. ROUND 1: cards stack uniformly, one pitch apart
//! 2. LATER ROUNDS: each card is centered on the midpoint of its two
//!    parents, falling back to uniform stacking when a parent is missing
//!
//! Parents are not stored anywhere. They are derived from match numbers:
//! the k-th match (1-based, counted from the round minimum) of a column is
//! fed by matches `parent_min + 2k - 2` and `parent_min + 2k - 1` of the
//! previous round in the same arm.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::bucket::Placement;
use crate::config::LayoutConfig;
use crate::geometry::ColumnGrid;
use crate::record::{Column, Match, MatchKey, SlotSide};
use crate::registry::{GeometryRegistry, PlacedCard};

/// The (at most two) parents of a match.
pub type ParentKeys = ArrayVec<MatchKey, 2>;

/// 1-based position of `number` counted from the smallest number in its round.
///
/// `None` if the position does not fit in a `u32`.
#[inline]
pub fn within_index(number: u32, round_min: u32) -> Option<u32> {
    number.saturating_sub(round_min).checked_add(1)
}

/// Match numbers of the two parents in the previous round.
///
/// `None` when either number would overflow; such a match has no parents.
#[inline]
pub fn parent_numbers(number: u32, round_min: u32, parent_min: u32) -> Option<[u32; 2]> {
    let k = within_index(number, round_min)?;
    let first = k
        .checked_mul(2)
        .and_then(|two_k| two_k.checked_sub(2))
        .and_then(|offset| parent_min.checked_add(offset))?;
    let second = first.checked_add(1)?;
    Some([first, second])
}

/// Parent keys of a match, empty in round 1 or when there is no parent round.
pub fn parent_keys(round: u32, number: u32, round_min: u32, parent_min: Option<u32>) -> ParentKeys {
    let mut keys = ParentKeys::new();
    if round <= 1 {
        return keys;
    }
    if let Some(parents) = parent_min.and_then(|min| parent_numbers(number, round_min, min)) {
        for parent in parents {
            keys.push(MatchKey::new(round - 1, parent));
        }
    }
    keys
}

/// Smallest match number in a set.
#[inline]
pub fn min_number(matches: &[Match]) -> Option<u32> {
    matches.iter().map(|m| m.number).min()
}

/// Answers whether an invite exists for a match.
pub trait InviteLookup {
    fn has_invite(&self, key: MatchKey) -> bool;
}

impl InviteLookup for () {
    fn has_invite(&self, _key: MatchKey) -> bool {
        false
    }
}

/// One slot of a rendered card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotView {
    pub side: SlotSide,
    pub value: Option<String>,
    /// Slot holds the decided winner
    pub winner: bool,
    /// Slot opens a recipe lookup
    pub interactive: bool,
}

impl SlotView {
    fn new(m: &Match, side: SlotSide) -> Self {
        let value = m.slot(side).map(str::to_string);
        Self {
            side,
            interactive: value.is_some(),
            winner: m.is_winner(side),
            value,
        }
    }
}

/// A positioned match card, ready to paint.
#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub key: MatchKey,
    pub column: Column,
    /// Offset from the column top
    pub top: f32,
    pub slots: [SlotView; 2],
    /// An invite exists for this (round, match)
    pub invite: bool,
}

/// Result of one full layout pass.
#[derive(Clone, Debug, Default)]
pub struct BracketLayout {
    /// Placed card geometry, the context shared by all rounds of the pass
    pub registry: GeometryRegistry,
    /// Cards in placement order
    pub cards: Vec<Card>,
    /// Minimum height of each non-empty column
    pub column_heights: BTreeMap<Column, f32>,
}

impl BracketLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every card and all geometry.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.cards.clear();
        self.column_heights.clear();
    }

    /// Run a full pass: clear, then place every column in plan order.
    pub fn run(
        &mut self,
        placements: &[Placement],
        grid: &ColumnGrid,
        config: &LayoutConfig,
        invites: &dyn InviteLookup,
    ) {
        self.clear();
        for placement in placements {
            self.place_round(placement, grid, config, invites);
        }
        tracing::info!(
            cards = self.cards.len(),
            columns = self.column_heights.len(),
            "layout pass complete"
        );
    }

    /// Place every match of one round within one arm's column.
    ///
    /// Writes the cards into the registry and sets the column height to the
    /// lowest card bottom plus the configured margin.
    pub fn place_round(
        &mut self,
        placement: &Placement,
        grid: &ColumnGrid,
        config: &LayoutConfig,
        invites: &dyn InviteLookup,
    ) {
        let column = placement.column;
        self.column_heights.remove(&column);

        let Some(round_min) = min_number(&placement.matches) else {
            return;
        };
        let Some(origin) = grid.column_origin(column) else {
            tracing::warn!(arm = column.arm.name(), round = column.round, "column not on grid");
            return;
        };
        let parent_min = min_number(&placement.parents);

        let mut matches = placement.matches.clone();
        matches.sort_by_key(|m| m.number);

        let mut max_bottom = 0.0_f32;
        for (index, m) in matches.iter().enumerate() {
            let uniform = index as f32 * config.stack_pitch();
            let parents = parent_keys(column.round, m.number, round_min, parent_min);

            let top = match self.parent_midpoint(&parents, grid) {
                Some(mid_y) => mid_y - origin.y - config.card_height / 2.0,
                None => {
                    if !parents.is_empty() {
                        tracing::debug!(
                            round = m.round,
                            number = m.number,
                            "parents unresolved, stacking uniformly"
                        );
                    }
                    uniform
                }
            };

            let placed = PlacedCard {
                column,
                top,
                height: config.card_height,
            };
            self.registry.insert(m.key(), placed);
            self.cards.push(Card {
                key: m.key(),
                column,
                top,
                slots: [SlotView::new(m, SlotSide::A), SlotView::new(m, SlotSide::B)],
                invite: invites.has_invite(m.key()),
            });

            max_bottom = max_bottom.max(placed.bottom());
        }

        self.column_heights.insert(column, max_bottom + config.column_margin);
        tracing::debug!(
            arm = column.arm.name(),
            round = column.round,
            cards = matches.len(),
            "round placed"
        );
    }

    /// Absolute midpoint of the two parents' vertical centers.
    fn parent_midpoint(&self, parents: &ParentKeys, grid: &ColumnGrid) -> Option<f32> {
        let [first, second] = parents.as_slice() else {
            return None;
        };
        let a = self.registry.bounds(*first, grid)?;
        let b = self.registry.bounds(*second, grid)?;
        Some((a.center_y() + b.center_y()) / 2.0)
    }

    /// Look up a card by key.
    pub fn card(&self, key: MatchKey) -> Option<&Card> {
        self.cards.iter().find(|c| c.key == key)
    }

    /// Height of the bracket container: the tallest column including its top.
    pub fn content_height(&self, grid: &ColumnGrid) -> f32 {
        self.column_heights
            .values()
            .fold(0.0_f32, |acc, h| acc.max(grid.top() + h))
    }
}

/// Run a fresh layout pass.
pub fn layout_bracket(
    placements: &[Placement],
    grid: &ColumnGrid,
    config: &LayoutConfig,
    invites: &dyn InviteLookup,
) -> BracketLayout {
    let mut layout = BracketLayout::new();
    layout.run(placements, grid, config, invites);
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::{plan, RoundBuckets};
    use crate::record::Arm;

    fn m(round: u32, number: u32) -> Match {
        Match {
            round,
            number,
            slot_a: Some(format!("a{round}-{number}")),
            slot_b: Some(format!("b{round}-{number}")),
            winner: None,
        }
    }

    fn full_bracket() -> Vec<Match> {
        let mut matches = Vec::new();
        for (round, count) in [(1, 16), (2, 8), (3, 4), (4, 2), (5, 1)] {
            matches.extend((1..=count).map(|n| m(round, n)));
        }
        matches
    }

    fn grid(config: &LayoutConfig) -> ColumnGrid {
        ColumnGrid::fit(2_000.0, config)
    }

    #[test]
    fn test_parent_numbers_are_relative_to_minimums() {
        assert_eq!(parent_numbers(1, 1, 1), Some([1, 2]));
        assert_eq!(parent_numbers(3, 1, 1), Some([5, 6]));
        assert_eq!(parent_numbers(1, 1, 5), Some([5, 6]));
        assert_eq!(parent_numbers(6, 5, 9), Some([11, 12]));
    }

    #[test]
    fn test_parent_numbers_overflow_yields_no_parents() {
        assert_eq!(parent_numbers(3_000_000_000, 1, 1), None);
        assert_eq!(parent_numbers(u32::MAX, 0, 1), None);
        assert_eq!(parent_numbers(1, 1, u32::MAX), None);
        assert!(parent_keys(2, 3_000_000_000, 1, Some(1)).is_empty());
    }

    #[test]
    fn test_huge_match_numbers_stack_uniformly() {
        let config = LayoutConfig::default();
        let matches = vec![
            m(1, 1),
            m(2, 1),
            m(2, 3_000_000_000),
            m(2, 3_000_000_001),
            m(2, 3_000_000_002),
        ];
        let placements = plan(&RoundBuckets::from_matches(matches));
        let layout = layout_bracket(&placements, &grid(&config), &config, &());

        // round 2 splits [1, 3e9] | [3e9+1, 3e9+2]; only 2.1 has a parent
        assert_eq!(layout.cards.len(), 5);
        assert_eq!(layout.card(MatchKey::new(2, 3_000_000_000)).unwrap().top, 100.0);
        assert_eq!(layout.card(MatchKey::new(2, 3_000_000_001)).unwrap().top, 0.0);
        assert_eq!(layout.card(MatchKey::new(2, 3_000_000_002)).unwrap().top, 100.0);
    }

    #[test]
    fn test_parent_keys_empty_for_first_round() {
        assert!(parent_keys(1, 3, 1, Some(1)).is_empty());
        assert!(parent_keys(2, 3, 1, None).is_empty());
        let keys = parent_keys(3, 2, 1, Some(1));
        assert_eq!(keys.as_slice(), &[MatchKey::new(2, 3), MatchKey::new(2, 4)]);
    }

    #[test]
    fn test_first_round_stacks_uniformly() {
        let config = LayoutConfig::default();
        let placements = plan(&RoundBuckets::from_matches(full_bracket()));
        let layout = layout_bracket(&placements, &grid(&config), &config, &());

        for n in 1..=8 {
            let card = layout.card(MatchKey::new(1, n)).unwrap();
            assert_eq!(card.column, Column::new(Arm::Left, 1));
            assert_eq!(card.top, (n - 1) as f32 * 100.0);
        }
        // right arm restarts at zero
        assert_eq!(layout.card(MatchKey::new(1, 9)).unwrap().top, 0.0);
        assert_eq!(
            layout.column_heights[&Column::new(Arm::Left, 1)],
            7.0 * 100.0 + 84.0 + 20.0
        );
    }

    #[test]
    fn test_later_rounds_center_on_parents() {
        let config = LayoutConfig::default();
        let placements = plan(&RoundBuckets::from_matches(full_bracket()));
        let layout = layout_bracket(&placements, &grid(&config), &config, &());

        // parents at 0 and 100 -> centers 42 and 142 -> top 50
        assert_eq!(layout.card(MatchKey::new(2, 1)).unwrap().top, 50.0);
        // right arm round 2 starts at match 5, fed by 9 and 10
        assert_eq!(layout.card(MatchKey::new(2, 5)).unwrap().top, 50.0);
        // round 3 match 1 fed by round 2 matches 1 (50) and 2 (250)
        assert_eq!(layout.card(MatchKey::new(3, 1)).unwrap().top, 150.0);
        // final sits between both round 4 cards, which share a row
        let final_card = layout.card(MatchKey::new(5, 1)).unwrap();
        let semi = layout.card(MatchKey::new(4, 1)).unwrap();
        assert_eq!(final_card.top, semi.top);
        assert_eq!(final_card.column, Column::new(Arm::Center, 5));
    }

    #[test]
    fn test_missing_parent_falls_back_to_uniform() {
        let config = LayoutConfig::default();
        // round 1 only has matches 1 and 2, so round 2 match 2 (parents 3, 4) cannot resolve
        let matches = vec![m(1, 1), m(1, 2), m(2, 1), m(2, 2), m(2, 3)];
        let placements = plan(&RoundBuckets::from_matches(matches));
        let layout = layout_bracket(&placements, &grid(&config), &config, &());

        // left arm round 2 holds matches 1 and 2
        assert_eq!(layout.card(MatchKey::new(2, 1)).unwrap().top, 0.0);
        assert_eq!(layout.card(MatchKey::new(2, 2)).unwrap().top, 100.0);
    }

    #[test]
    fn test_card_slots_and_invites() {
        struct OnlyFinal;
        impl InviteLookup for OnlyFinal {
            fn has_invite(&self, key: MatchKey) -> bool {
                key == MatchKey::new(1, 2)
            }
        }

        let config = LayoutConfig::default();
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
                slot_b: None,
                winner: None,
            },
        ];
        let placements = plan(&RoundBuckets::from_matches(matches));
        let layout = layout_bracket(&placements, &grid(&config), &config, &OnlyFinal);

        let first = layout.card(MatchKey::new(1, 1)).unwrap();
        assert!(first.slots[0].winner);
        assert!(!first.slots[1].winner);
        assert!(!first.invite);

        let second = layout.card(MatchKey::new(1, 2)).unwrap();
        assert_eq!(second.column, Column::new(Arm::Right, 1));
        assert!(second.slots[0].interactive);
        assert!(!second.slots[1].interactive);
        assert!(!second.slots.iter().any(|s| s.winner));
        assert!(second.invite);
    }

    #[test]
    fn test_empty_column_has_no_height() {
        let config = LayoutConfig::default();
        let placements = plan(&RoundBuckets::from_matches(vec![m(1, 1)]));
        let layout = layout_bracket(&placements, &grid(&config), &config, &());
        assert_eq!(layout.column_heights.len(), 1);
        assert_eq!(layout.content_height(&grid(&config)), 104.0);
    }
}
