//! Painting phase: turns a settled [`Bracket`](crate::pipeline::Bracket)
//! into SVG, terminal frames, or plain text.

pub mod svg;
pub mod text;
pub mod tui;

pub use svg::{render_svg, SvgTheme};
