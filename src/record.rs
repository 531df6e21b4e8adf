//! Match records and the identifiers used to address them.
//!
//! Records are produced by ingestion and never mutated afterwards.
//! Unset slots and undecided winners are `None`, not a sentinel string.

/// Number of rounds in the bracket (four per arm plus the championship).
pub const ROUND_COUNT: u32 = 5;

/// The championship round, placed in the center column.
pub const CHAMPIONSHIP_ROUND: u32 = ROUND_COUNT;

/// Label shown for an unset slot or undecided winner.
pub const TBD_LABEL: &str = "TBD";

/// One half of the bracket, or the center column holding the final.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Arm {
    /// Left half, rounds flow left to right
    Left = 0,
    /// Championship column
    Center = 1,
    /// Right half, rounds flow right to left
    Right = 2,
}

impl Arm {
    /// Short name used in logs and SVG attributes.
    pub const fn name(self) -> &'static str {
        match self {
            Arm::Left => "left",
            Arm::Center => "center",
            Arm::Right => "right",
        }
    }
}

/// A column of cards: one round within one arm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Column {
    pub arm: Arm,
    pub round: u32,
}

impl Column {
    #[inline]
    pub const fn new(arm: Arm, round: u32) -> Self {
        Self { arm, round }
    }
}

/// Registry key: (round, match number).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey {
    pub round: u32,
    pub number: u32,
}

impl MatchKey {
    #[inline]
    pub const fn new(round: u32, number: u32) -> Self {
        Self { round, number }
    }
}

/// Which of the two slots of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotSide {
    A,
    B,
}

/// A single match result as read from the results table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Match {
    /// Round number, 1-based (0 when the cell was not numeric)
    pub round: u32,
    /// Match number, unique within its round
    pub number: u32,
    /// First competitor, `None` while undecided
    pub slot_a: Option<String>,
    /// Second competitor, `None` while undecided
    pub slot_b: Option<String>,
    /// Winner, `None` while undecided
    pub winner: Option<String>,
}

impl Match {
    #[inline]
    pub const fn key(&self) -> MatchKey {
        MatchKey::new(self.round, self.number)
    }

    /// Slot value for a side.
    pub fn slot(&self, side: SlotSide) -> Option<&str> {
        match side {
            SlotSide::A => self.slot_a.as_deref(),
            SlotSide::B => self.slot_b.as_deref(),
        }
    }

    /// True iff the slot holds a value and that value is the decided winner.
    pub fn is_winner(&self, side: SlotSide) -> bool {
        match (self.slot(side), self.winner.as_deref()) {
            (Some(slot), Some(winner)) => slot == winner,
            _ => false,
        }
    }
}

/// Display text for an optional slot.
#[inline]
pub fn display(value: Option<&str>) -> &str {
    value.unwrap_or(TBD_LABEL)
}
