//! Geometry registry - where each placed card sits.
//!
//! Cards are stored column-local (column + top offset), so a viewport change
//! moves them with their column without a re-layout. Absolute bounds are
//! resolved on demand through the current [`ColumnGrid`].

use rustc_hash::FxHashMap;

use crate::geometry::{ColumnGrid, Rect};
use crate::record::{Column, MatchKey};

/// A card's position inside its column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedCard {
    pub column: Column,
    /// Offset of the card top from the column top
    pub top: f32,
    pub height: f32,
}

impl PlacedCard {
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Absolute bounds under a grid, `None` if the column is not on it.
    pub fn bounds(&self, grid: &ColumnGrid) -> Option<Rect> {
        let origin = grid.column_origin(self.column)?;
        Some(Rect::new(
            origin.x,
            origin.y + self.top,
            grid.column_width(),
            self.height,
        ))
    }
}

/// Lookup of placed cards keyed by (round, match number).
///
/// Scoped to one layout pass: it is cleared and rebuilt as a whole, never
/// patched.
#[derive(Clone, Debug, Default)]
pub struct GeometryRegistry {
    cards: FxHashMap<MatchKey, PlacedCard>,
}

impl GeometryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    #[inline]
    pub fn insert(&mut self, key: MatchKey, card: PlacedCard) {
        self.cards.insert(key, card);
    }

    #[inline]
    pub fn get(&self, key: MatchKey) -> Option<&PlacedCard> {
        self.cards.get(&key)
    }

    #[inline]
    pub fn contains(&self, key: MatchKey) -> bool {
        self.cards.contains_key(&key)
    }

    /// Absolute bounds of a registered card.
    pub fn bounds(&self, key: MatchKey, grid: &ColumnGrid) -> Option<Rect> {
        self.get(key)?.bounds(grid)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// All entries sorted by key, for stable comparison and output.
    pub fn snapshot(&self) -> Vec<(MatchKey, PlacedCard)> {
        let mut entries: Vec<_> = self.cards.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_key(|(k, _)| *k);
        entries
    }
}
