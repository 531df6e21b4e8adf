//! Link Renderer - cubic connectors between each card and its parents.
//!
//! Orientation is detected per connector by comparing horizontal positions,
//! so the same routine serves both mirrored arms and the center column.

use std::fmt::Write as _;

use crate::bucket::Placement;
use crate::config::LayoutConfig;
use crate::geometry::{ColumnGrid, Point, Rect, Size};
use crate::layout::{min_number, parent_keys, BracketLayout};
use crate::record::MatchKey;

/// A cubic Bezier segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicCurve {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl CubicCurve {
    /// S-curve from the facing edge of the leftmost card to the other card.
    ///
    /// Control points sit `strength` of the horizontal span away from each
    /// end, level with that end.
    pub fn between(a: &Rect, b: &Rect, strength: f32) -> Self {
        let (left, right) = if a.x <= b.x { (a, b) } else { (b, a) };
        let start = left.right_mid();
        let end = right.left_mid();
        let c = (end.x - start.x).abs() * strength;
        Self {
            start,
            control1: Point::new(start.x + c, start.y),
            control2: Point::new(end.x - c, end.y),
            end,
        }
    }

    /// Point at parameter `t` in `[0, 1]`.
    pub fn at(&self, t: f32) -> Point {
        let u = 1.0 - t;
        let (b0, b1, b2, b3) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
        Point::new(
            b0 * self.start.x + b1 * self.control1.x + b2 * self.control2.x + b3 * self.end.x,
            b0 * self.start.y + b1 * self.control1.y + b2 * self.control2.y + b3 * self.end.y,
        )
    }

    /// Polyline approximation with `segments` segments.
    pub fn flatten(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.at(i as f32 / segments as f32))
            .collect()
    }

    /// SVG path data (`M x,y C ...`).
    pub fn path_data(&self) -> String {
        let mut d = String::new();
        let _ = write!(
            d,
            "M {:.2},{:.2} C {:.2},{:.2} {:.2},{:.2} {:.2},{:.2}",
            self.start.x,
            self.start.y,
            self.control1.x,
            self.control1.y,
            self.control2.x,
            self.control2.y,
            self.end.x,
            self.end.y
        );
        d
    }
}

/// One drawn connector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connector {
    /// Feeding match
    pub parent: MatchKey,
    /// Fed match
    pub child: MatchKey,
    pub curve: CubicCurve,
}

/// Drawing surface for connectors, sized to the bracket container.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinkCanvas {
    pub size: Size,
    pub connectors: Vec<Connector>,
}

impl LinkCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.connectors.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }
}

/// Redraw every connector onto the canvas.
///
/// Clears prior content first. A (parent, child) pair where either card is
/// missing from the registry is skipped.
pub fn draw_links(
    canvas: &mut LinkCanvas,
    placements: &[Placement],
    layout: &BracketLayout,
    grid: &ColumnGrid,
    config: &LayoutConfig,
) {
    canvas.clear();
    canvas.size = Size::new(grid.width(), layout.content_height(grid));

    let mut skipped = 0usize;
    for placement in placements.iter().filter(|p| p.column.round > 1) {
        let Some(round_min) = min_number(&placement.matches) else {
            continue;
        };
        let parent_min = min_number(&placement.parents);
        if parent_min.is_none() {
            continue;
        }

        let mut children: Vec<MatchKey> = placement.matches.iter().map(|m| m.key()).collect();
        children.sort();

        for child in children {
            for parent in parent_keys(child.round, child.number, round_min, parent_min) {
                let (Some(a), Some(b)) = (
                    layout.registry.bounds(parent, grid),
                    layout.registry.bounds(child, grid),
                ) else {
                    skipped += 1;
                    continue;
                };
                canvas.connectors.push(Connector {
                    parent,
                    child,
                    curve: CubicCurve::between(&a, &b, config.curve_strength),
                });
            }
        }
    }

    tracing::debug!(
        connectors = canvas.connectors.len(),
        skipped,
        width = canvas.size.width,
        height = canvas.size.height,
        "links drawn"
    );
}
