//! Layout constants and resource locations.
//!
//! Defaults can be overridden by a JSON config file, then by environment
//! variables for the resource locations, then by command-line flags.

use std::{env, fs, path::Path, time::Duration};

use serde::Deserialize;

use crate::error::{BracketError, BracketResult};

/// Geometry and timing constants for a layout pass.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Height of one match card
    pub card_height: f32,
    /// Vertical gap between uniformly stacked cards
    pub vertical_gap: f32,
    /// Extra space below the lowest card of a column
    pub column_margin: f32,
    /// Preferred column (and card) width
    pub column_width: f32,
    /// Columns never shrink below this width
    pub min_column_width: f32,
    /// Horizontal gap between columns
    pub column_gap: f32,
    /// Distance from the container top to the first card row
    pub column_top: f32,
    /// Connector control-point offset as a fraction of the horizontal span
    pub curve_strength: f32,
    /// Quiet period before a resize triggers a connector redraw
    pub resize_debounce_ms: u64,
    /// Connector stroke color
    pub line_color: String,
    /// Connector stroke width
    pub line_width: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            card_height: 84.0,
            vertical_gap: 16.0,
            column_margin: 20.0,
            column_width: 180.0,
            min_column_width: 96.0,
            column_gap: 48.0,
            column_top: 0.0,
            curve_strength: 0.45,
            resize_debounce_ms: 80,
            line_color: "#2b3240".to_string(),
            line_width: 2.0,
        }
    }
}

impl LayoutConfig {
    /// Distance between the tops of two uniformly stacked cards.
    #[inline]
    pub fn stack_pitch(&self) -> f32 {
        self.card_height + self.vertical_gap
    }

    #[inline]
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

/// Where each resource is read from: a file path or an http(s) URL.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Sources {
    /// Match-results table (required)
    pub matches: Option<String>,
    /// Recipe book JSON
    pub recipes: Option<String>,
    /// Invite list JSON
    pub invites: Option<String>,
    /// Tab-delimited priority list
    pub priority: Option<String>,
}

impl Sources {
    /// Fill unset locations from `BRACKET_*` environment variables.
    pub fn with_env_defaults(mut self) -> Self {
        fill(&mut self.matches, "BRACKET_MATCHES");
        fill(&mut self.recipes, "BRACKET_RECIPES");
        fill(&mut self.invites, "BRACKET_INVITES");
        fill(&mut self.priority, "BRACKET_PRIORITY");
        self
    }

    /// Overlay explicitly given locations on top of these.
    pub fn overridden_by(mut self, other: Sources) -> Self {
        if other.matches.is_some() {
            self.matches = other.matches;
        }
        if other.recipes.is_some() {
            self.recipes = other.recipes;
        }
        if other.invites.is_some() {
            self.invites = other.invites;
        }
        if other.priority.is_some() {
            self.priority = other.priority;
        }
        self
    }
}

fn fill(slot: &mut Option<String>, key: &str) {
    if slot.as_deref().map(str::trim).unwrap_or("").is_empty() {
        *slot = env_default(key);
    }
}

/// Non-blank value of an environment variable.
pub fn env_default(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Full application config as stored on disk.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BracketConfig {
    pub layout: LayoutConfig,
    pub sources: Sources,
}

impl BracketConfig {
    /// Load from an optional JSON file; a missing path yields defaults.
    pub fn load(path: Option<&Path>) -> BracketResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let location = path.display().to_string();
        let data = fs::read_to_string(path).map_err(|source| BracketError::Io {
            location: location.clone(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| BracketError::Json { location, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: BracketConfig =
            serde_json::from_str(r#"{"layout": {"card_height": 60}, "sources": {"matches": "m.csv"}}"#)
                .unwrap();
        assert_eq!(config.layout.card_height, 60.0);
        assert_eq!(config.layout.vertical_gap, 16.0);
        assert_eq!(config.sources.matches.as_deref(), Some("m.csv"));
        assert_eq!(config.sources.recipes, None);
    }

    #[test]
    fn test_overrides_only_replace_given_fields() {
        let base = Sources {
            matches: Some("a.csv".into()),
            recipes: Some("r.json".into()),
            ..Sources::default()
        };
        let merged = base.overridden_by(Sources {
            matches: Some("b.csv".into()),
            ..Sources::default()
        });
        assert_eq!(merged.matches.as_deref(), Some("b.csv"));
        assert_eq!(merged.recipes.as_deref(), Some("r.json"));
    }

    #[test]
    fn test_missing_config_path_is_default() {
        let config = BracketConfig::load(None).unwrap();
        assert_eq!(config, BracketConfig::default());
        assert_eq!(config.layout.stack_pitch(), 100.0);
    }
}
