//! Terminal painting of a settled bracket with ratatui.
//!
//! The layout works in abstract units; the canvas scales them to the
//! terminal. Canvas y grows upward, so every y is flipped against the
//! content height.

use std::io::{self, Write};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as Segment, Rectangle},
        Block, Borders, Clear, Paragraph, Wrap,
    },
    Frame,
};

use crate::geometry::ColumnGrid;
use crate::pipeline::{Bracket, Status};
use crate::record::{display, MatchKey, SlotSide};

/// Line segments used to approximate one connector.
const CURVE_SEGMENTS: usize = 16;

/// Layout units per terminal cell, horizontally.
pub const UNITS_PER_COLUMN: f32 = 12.0;

/// Layout units per terminal cell, vertically.
pub const UNITS_PER_ROW: f32 = 24.0;

/// Something the user can select: a drink slot, or a whole card that only
/// offers an invite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selectable {
    pub key: MatchKey,
    /// `None` for a card-level target
    pub side: Option<SlotSide>,
    /// Drink shown in the slot, opens a recipe
    pub value: Option<String>,
    /// The card has an invite
    pub invite: bool,
}

impl Selectable {
    #[inline]
    fn is_card(&self) -> bool {
        self.side.is_none()
    }
}

/// Selection targets in reading order: column left to right, then top down.
///
/// Each interactive slot is a target. A card with an invite but no
/// interactive slot is a single card-level target.
pub fn selectable_targets(bracket: &Bracket) -> Vec<Selectable> {
    let mut cards: Vec<_> = bracket.layout().cards.iter().collect();
    cards.sort_by(|a, b| {
        let ia = ColumnGrid::column_index(a.column);
        let ib = ColumnGrid::column_index(b.column);
        ia.cmp(&ib).then(a.top.total_cmp(&b.top))
    });

    let mut targets = Vec::new();
    for card in cards {
        let before = targets.len();
        for slot in card.slots.iter().filter(|s| s.interactive) {
            if let Some(value) = &slot.value {
                targets.push(Selectable {
                    key: card.key,
                    side: Some(slot.side),
                    value: Some(value.clone()),
                    invite: card.invite,
                });
            }
        }
        if targets.len() == before && card.invite {
            targets.push(Selectable {
                key: card.key,
                side: None,
                value: None,
                invite: true,
            });
        }
    }
    targets
}

/// Raw mode and the alternate screen, restored when dropped.
///
/// Holding the guard across the event loop restores the terminal on every
/// exit path, including early `?` returns.
pub struct TerminalGuard<W: Write> {
    out: W,
    raw: bool,
}

impl TerminalGuard<io::Stdout> {
    /// Enable raw mode and enter the alternate screen on stdout.
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        Self::enter_screen(io::stdout(), true)
    }
}

impl<W: Write> TerminalGuard<W> {
    /// Enter the alternate screen on `out`. `raw` marks raw mode as already
    /// enabled, to be disabled on drop.
    pub fn enter_screen(mut out: W, raw: bool) -> io::Result<Self> {
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            if raw {
                let _ = disable_raw_mode();
            }
            return Err(err);
        }
        Ok(Self { out, raw })
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if self.raw {
            let _ = disable_raw_mode();
        }
        let _ = execute!(self.out, LeaveAlternateScreen);
    }
}

/// Split the frame into header, bracket and footer areas.
pub fn frame_areas(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Bracket
            Constraint::Length(3), // Footer
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

pub fn draw_header(f: &mut Frame, area: Rect, title: &str, status: &Status) {
    let (text, color) = match status {
        Status::Loading => ("Loading\u{2026}".to_string(), Color::Yellow),
        Status::Ready => ("Ready".to_string(), Color::Green),
        Status::Failed(message) => (message.clone(), Color::Red),
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {title} "),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(text, Style::default().fg(color)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

pub fn draw_footer(f: &mut Frame, area: Rect) {
    let help = Paragraph::new(
        "\u{2190}\u{2192}\u{2191}\u{2193} select | Enter recipe | i invite | p priority | Esc close | q quit",
    )
    .style(Style::default().fg(Color::DarkGray))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}

/// Paint cards and connectors.
pub fn draw_bracket(f: &mut Frame, area: Rect, bracket: &Bracket, selected: Option<&Selectable>) {
    let width = f64::from(bracket.grid().width().max(bracket.viewport().width));
    let height = f64::from(
        bracket
            .links()
            .size
            .height
            .max(bracket.viewport().height)
            .max(1.0),
    );

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title("Bracket"))
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for connector in &bracket.links().connectors {
                let points = connector.curve.flatten(CURVE_SEGMENTS);
                for pair in points.windows(2) {
                    ctx.draw(&Segment {
                        x1: f64::from(pair[0].x),
                        y1: height - f64::from(pair[0].y),
                        x2: f64::from(pair[1].x),
                        y2: height - f64::from(pair[1].y),
                        color: Color::DarkGray,
                    });
                }
            }
            ctx.layer();

            for card in &bracket.layout().cards {
                let Some(bounds) = bracket.layout().registry.bounds(card.key, bracket.grid()) else {
                    continue;
                };
                let card_selected = selected
                    .map(|s| s.is_card() && s.key == card.key)
                    .unwrap_or(false);
                let color = match (card_selected, card.invite) {
                    (true, _) => Color::Yellow,
                    (false, true) => Color::Magenta,
                    (false, false) => Color::Gray,
                };
                ctx.draw(&Rectangle {
                    x: f64::from(bounds.x),
                    y: height - f64::from(bounds.bottom()),
                    width: f64::from(bounds.width),
                    height: f64::from(bounds.height),
                    color,
                });

                for slot in &card.slots {
                    let slot_center = match slot.side {
                        SlotSide::A => bounds.y + bounds.height * 0.25,
                        SlotSide::B => bounds.y + bounds.height * 0.75,
                    };
                    let is_selected = selected
                        .map(|s| s.key == card.key && s.side == Some(slot.side))
                        .unwrap_or(false);

                    let mut style = match (slot.winner, slot.value.is_some()) {
                        (true, _) => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                        (false, true) => Style::default().fg(Color::White),
                        (false, false) => Style::default().fg(Color::DarkGray),
                    };
                    if is_selected {
                        style = style.add_modifier(Modifier::REVERSED);
                    }

                    ctx.print(
                        f64::from(bounds.x) + f64::from(UNITS_PER_COLUMN),
                        height - f64::from(slot_center),
                        Line::from(Span::styled(
                            display(slot.value.as_deref()).to_string(),
                            style,
                        )),
                    );
                }
            }
        });

    f.render_widget(canvas, area);
}

/// A centered popup with a title and wrapped body text.
pub fn draw_popup(f: &mut Frame, area: Rect, title: &str, body: &str) {
    let popup = centered(area, 60, 60);
    f.render_widget(Clear, popup);
    let paragraph = Paragraph::new(body.to_string())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .style(Style::default().fg(Color::Yellow)),
        );
    f.render_widget(paragraph, popup);
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
