//! Settle Pipeline - sequences layout and connector drawing.
//!
//! A full load clears the registry, places round 1 (left, right), rounds
//! 2..=4 (left, right) and the championship, then draws connectors and only
//! then leaves the loading state. A viewport resize only redraws
//! connectors; card offsets are kept.

use std::time::{Duration, Instant};

use crate::bucket::{plan, Placement, RoundBuckets};
use crate::config::{LayoutConfig, Sources};
use crate::error::BracketError;
use crate::geometry::{ColumnGrid, Size};
use crate::layout::{BracketLayout, InviteLookup};
use crate::links::{draw_links, LinkCanvas};
use crate::record::Match;
use crate::resources::{load_auxiliary, load_matches, Auxiliary};

/// User-visible failure text.
pub const FAILED_TEXT: &str = "Failed to load bracket.";

/// Render state of the bracket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    /// Data is loading or layout has not settled
    Loading,
    /// Cards and connectors are drawn
    Ready,
    /// Loading failed; nothing is drawn
    Failed(String),
}

/// The bracket: ingested data plus its current layout and connectors.
pub struct Bracket {
    config: LayoutConfig,
    viewport: Size,
    grid: ColumnGrid,
    buckets: RoundBuckets,
    placements: Vec<Placement>,
    layout: BracketLayout,
    links: LinkCanvas,
    status: Status,
}

impl Bracket {
    /// Create an empty bracket in the loading state.
    pub fn new(config: LayoutConfig, viewport: Size) -> Self {
        let grid = ColumnGrid::fit(viewport.width, &config);
        Self {
            config,
            viewport,
            grid,
            buckets: RoundBuckets::default(),
            placements: Vec::new(),
            layout: BracketLayout::new(),
            links: LinkCanvas::new(),
            status: Status::Loading,
        }
    }

    /// Run a full layout pass over freshly ingested matches.
    pub fn load(&mut self, matches: Vec<Match>, invites: &dyn InviteLookup) {
        self.status = Status::Loading;
        self.buckets = RoundBuckets::from_matches(matches);
        self.placements = plan(&self.buckets);
        self.layout
            .run(&self.placements, &self.grid, &self.config, invites);
        self.redraw_links();
        self.status = Status::Ready;
    }

    /// Abort the render: drop all cards and connectors.
    pub fn fail(&mut self, err: &BracketError) {
        tracing::error!(error = %err, "bracket load failed");
        self.buckets = RoundBuckets::default();
        self.placements.clear();
        self.layout.clear();
        self.links.clear();
        self.status = Status::Failed(FAILED_TEXT.to_string());
    }

    /// Apply a new viewport and redraw connectors against it.
    pub fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.grid = ColumnGrid::fit(viewport.width, &self.config);
        if self.status == Status::Ready {
            self.redraw_links();
        }
    }

    /// Redraw connectors from the current geometry.
    pub fn redraw_links(&mut self) {
        draw_links(
            &mut self.links,
            &self.placements,
            &self.layout,
            &self.grid,
            &self.config,
        );
    }

    #[inline]
    pub fn status(&self) -> &Status {
        &self.status
    }

    #[inline]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    #[inline]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    #[inline]
    pub fn grid(&self) -> &ColumnGrid {
        &self.grid
    }

    #[inline]
    pub fn buckets(&self) -> &RoundBuckets {
        &self.buckets
    }

    #[inline]
    pub fn layout(&self) -> &BracketLayout {
        &self.layout
    }

    #[inline]
    pub fn links(&self) -> &LinkCanvas {
        &self.links
    }
}

/// Fetch every resource and run the full layout pass.
///
/// The match table and the auxiliary lookups load concurrently; layout
/// starts once all of them have settled. A match-table failure leaves the
/// bracket in the failed state and is returned alongside it.
pub async fn load_bracket(
    sources: &Sources,
    config: LayoutConfig,
    viewport: Size,
) -> (Bracket, Auxiliary, Option<BracketError>) {
    let mut bracket = Bracket::new(config, viewport);

    let matches = async {
        match sources.matches.as_deref() {
            Some(location) => load_matches(location).await,
            None => Err(BracketError::MissingSource("match results")),
        }
    };
    let (aux, matches) = tokio::join!(load_auxiliary(sources), matches);

    match matches {
        Ok(matches) => {
            bracket.load(matches, &aux.invites);
            (bracket, aux, None)
        }
        Err(err) => {
            bracket.fail(&err);
            (bracket, aux, Some(err))
        }
    }
}

/// Trailing-edge debounce for viewport resizes.
///
/// Every resize replaces the pending one and restarts the window. The last
/// size is released once the window passes with no further resizes.
#[derive(Clone, Debug)]
pub struct ResizeDebounce {
    window: Duration,
    pending: Option<(Instant, Size)>,
}

impl ResizeDebounce {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Record a resize at `now`, cancelling any pending one.
    pub fn push(&mut self, size: Size, now: Instant) {
        self.pending = Some((now + self.window, size));
    }

    /// Release the pending size if its window has passed.
    pub fn poll(&mut self, now: Instant) -> Option<Size> {
        match self.pending {
            Some((deadline, size)) if now >= deadline => {
                self.pending = None;
                Some(size)
            }
            _ => None,
        }
    }

    /// Time left until the pending resize fires.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|(deadline, _)| deadline.saturating_duration_since(now))
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
