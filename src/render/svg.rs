//! SVG painting of a settled bracket.
//!
//! Connectors are painted first so cards sit on top of them.

use std::fmt::Write as _;

use crate::geometry::Rect;
use crate::layout::{Card, SlotView};
use crate::pipeline::{Bracket, Status};
use crate::record::{display, SlotSide};

/// Colors and type used for cards.
#[derive(Clone, Debug)]
pub struct SvgTheme {
    pub background: String,
    pub card_fill: String,
    pub card_border: String,
    pub winner_fill: String,
    pub text_color: String,
    pub muted_text_color: String,
    pub font_family: String,
    pub font_size: f32,
}

impl Default for SvgTheme {
    fn default() -> Self {
        Self {
            background: "#0f1218".to_string(),
            card_fill: "#171b24".to_string(),
            card_border: "#2b3240".to_string(),
            winner_fill: "#1f5135".to_string(),
            text_color: "#e6e9ef".to_string(),
            muted_text_color: "#7d8597".to_string(),
            font_family: "system-ui, sans-serif".to_string(),
            font_size: 14.0,
        }
    }
}

/// Paint the bracket as a standalone SVG document.
pub fn render_svg(bracket: &Bracket, theme: &SvgTheme) -> String {
    let config = bracket.config();
    let canvas = bracket.links();
    let width = canvas.size.width.max(bracket.grid().width()).max(200.0);
    let height = canvas.size.height.max(200.0);

    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.0} {height:.0}\">"
    );
    let _ = write!(
        svg,
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    );

    match bracket.status() {
        Status::Ready => {}
        Status::Loading => {
            svg.push_str(&status_text("Loading\u{2026}", theme));
            svg.push_str("</svg>");
            return svg;
        }
        Status::Failed(message) => {
            svg.push_str(&status_text(message, theme));
            svg.push_str("</svg>");
            return svg;
        }
    }

    svg.push_str("<g id=\"links\">");
    for connector in &canvas.connectors {
        let _ = write!(
            svg,
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
            connector.curve.path_data(),
            config.line_color,
            config.line_width
        );
    }
    svg.push_str("</g>");

    for card in &bracket.layout().cards {
        if let Some(bounds) = bracket.layout().registry.bounds(card.key, bracket.grid()) {
            svg.push_str(&card_svg(card, &bounds, theme));
        }
    }

    svg.push_str("</svg>");
    svg
}

fn status_text(message: &str, theme: &SvgTheme) -> String {
    format!(
        "<text x=\"20\" y=\"40\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        theme.font_family,
        theme.font_size,
        theme.text_color,
        escape_xml(message)
    )
}

fn card_svg(card: &Card, bounds: &Rect, theme: &SvgTheme) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<g class=\"match\" data-arm=\"{}\" data-round=\"{}\" data-match=\"{}\">",
        card.column.arm.name(),
        card.key.round,
        card.key.number
    );
    let _ = write!(
        out,
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"8\" ry=\"8\" fill=\"{}\" stroke=\"{}\"/>",
        bounds.x, bounds.y, bounds.width, bounds.height, theme.card_fill, theme.card_border
    );

    let slot_height = bounds.height / 2.0;
    for slot in &card.slots {
        let offset = match slot.side {
            SlotSide::A => 0.0,
            SlotSide::B => slot_height,
        };
        let slot_rect = Rect::new(bounds.x, bounds.y + offset, bounds.width, slot_height);
        out.push_str(&slot_svg(slot, &slot_rect, theme));
    }

    if card.invite {
        let _ = write!(
            out,
            "<g class=\"invite\" data-invite=\"{}-{}\" cursor=\"pointer\"><title>View invite</title><circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"7\" fill=\"{}\"/></g>",
            card.key.round,
            card.key.number,
            bounds.right() - 12.0,
            bounds.y + 12.0,
            theme.muted_text_color
        );
    }

    out.push_str("</g>");
    out
}

fn slot_svg(slot: &SlotView, rect: &Rect, theme: &SvgTheme) -> String {
    let mut out = String::new();
    let class = if slot.winner { "slot winner" } else { "slot" };
    let _ = write!(out, "<g class=\"{class}\"");
    match slot.value.as_deref().filter(|_| slot.interactive) {
        Some(value) => {
            let _ = write!(
                out,
                " data-drink=\"{}\" cursor=\"pointer\"><title>View recipe</title>",
                escape_xml(value)
            );
        }
        None => out.push('>'),
    }

    if slot.winner {
        let _ = write!(
            out,
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/>",
            rect.x + 1.0,
            rect.y + 1.0,
            (rect.width - 2.0).max(0.0),
            (rect.height - 2.0).max(0.0),
            theme.winner_fill
        );
    }

    let fill = if slot.value.is_some() {
        &theme.text_color
    } else {
        &theme.muted_text_color
    };
    let _ = write!(
        out,
        "<text x=\"{:.2}\" y=\"{:.2}\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        rect.x + 10.0,
        rect.center_y(),
        theme.font_family,
        theme.font_size,
        fill,
        escape_xml(display(slot.value.as_deref()))
    );
    out.push_str("</g>");
    out
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
