//! # Bracket Board
//!
//! A deterministic layout and connector engine for a five-round
//! single-elimination bracket: two converging arms plus a championship match.
//!
//! ## Design Principles
//!
//! - **Topology from numbers**: parents are derived from round/match numbers,
//!   no bracket graph is supplied
//! - **Explicit context**: each layout pass owns its geometry registry
//! - **Geometry before paint**: positions are computed first, then painted
//!   to SVG or a terminal
//!
//! ## Architecture
//!
//! ```text
//! [Results table] --> [Ingest] --> [Buckets + Arm Plan] --> [Layout Engine]
//!                                                                 |
//!                                       [Link Renderer] <-- [Geometry Registry]
//!                                              |
//!                                       [SVG / Terminal]
//! ```

pub mod bucket;
pub mod config;
pub mod error;
pub mod geometry;
pub mod ingest;
pub mod layout;
pub mod links;
pub mod pipeline;
pub mod record;
pub mod registry;
pub mod render;
pub mod resources;

// Re-exports for convenience
pub use bucket::{plan, split_arms, Placement, RoundBuckets};
pub use config::{BracketConfig, LayoutConfig, Sources};
pub use error::{BracketError, BracketResult};
pub use geometry::{ColumnGrid, Point, Rect, Size};
pub use ingest::parse_matches;
pub use layout::{layout_bracket, parent_keys, BracketLayout, Card, InviteLookup};
pub use links::{draw_links, Connector, CubicCurve, LinkCanvas};
pub use pipeline::{Bracket, ResizeDebounce, Status};
pub use record::{Arm, Column, Match, MatchKey, SlotSide};
pub use registry::{GeometryRegistry, PlacedCard};
