//! External resources: the match table and the auxiliary lookups.
//!
//! Each resource is read from a file path or an http(s) URL. The match table
//! is required and its failures are fatal. Recipes, invites and the
//! priority list are optional; any failure is logged and replaced with an
//! empty dataset.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::Sources;
use crate::error::{BracketError, BracketResult};
use crate::ingest::parse_matches;
use crate::layout::InviteLookup;
use crate::record::{Match, MatchKey};

/// Placeholder shown when a drink has no recipe.
pub const NO_RECIPE_TEXT: &str = "Recipe coming soon.";

// ============================================================================
// Fetching
// ============================================================================

fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Read a resource as text.
pub async fn fetch_text(location: &str) -> BracketResult<String> {
    if !is_url(location) {
        return tokio::fs::read_to_string(location)
            .await
            .map_err(|source| BracketError::Io {
                location: location.to_string(),
                source,
            });
    }

    let fetch_err = |source: reqwest::Error| BracketError::Fetch {
        location: location.to_string(),
        source,
    };
    let resp = reqwest::get(location).await.map_err(fetch_err)?;
    if !resp.status().is_success() {
        return Err(BracketError::Status {
            location: location.to_string(),
            status: resp.status().as_u16(),
        });
    }
    resp.text().await.map_err(fetch_err)
}

/// Fetch and ingest the match table.
pub async fn load_matches(location: &str) -> BracketResult<Vec<Match>> {
    let text = fetch_text(location).await?;
    parse_matches(&text)
}

async fn fetch_json<T: DeserializeOwned>(location: &str) -> BracketResult<T> {
    let text = fetch_text(location).await?;
    serde_json::from_str(&text).map_err(|source| BracketError::Json {
        location: location.to_string(),
        source,
    })
}

// ============================================================================
// Recipes
// ============================================================================

/// A list field that may be written as one newline-separated string.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TextList {
    Lines(Vec<String>),
    Text(String),
}

impl Default for TextList {
    fn default() -> Self {
        TextList::Lines(Vec::new())
    }
}

impl TextList {
    /// Individual entries; a string is split on runs of newlines.
    ///
    /// Only empty pieces are dropped; a whitespace-only line is kept.
    pub fn items(&self) -> Vec<String> {
        match self {
            TextList::Lines(lines) => lines.clone(),
            TextList::Text(text) => text
                .split('\n')
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Recipe {
    pub photo: Option<String>,
    pub ingredients: TextList,
    pub instructions: TextList,
    pub notes: Option<String>,
}

/// What the recipe viewer shows for a drink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecipeView {
    Found {
        title: String,
        photo: Option<String>,
        ingredients: Vec<String>,
        instructions: Vec<String>,
        notes: Option<String>,
    },
    ComingSoon {
        title: String,
    },
}

impl RecipeView {
    pub fn title(&self) -> &str {
        match self {
            RecipeView::Found { title, .. } | RecipeView::ComingSoon { title } => title,
        }
    }
}

/// Drink name -> recipe, looked up case-insensitively.
#[derive(Clone, Debug, Default)]
pub struct RecipeBook {
    recipes: HashMap<String, Recipe>,
}

impl RecipeBook {
    pub fn from_map(map: HashMap<String, Recipe>) -> Self {
        let recipes = map
            .into_iter()
            .map(|(name, recipe)| (name.to_lowercase(), recipe))
            .collect();
        Self { recipes }
    }

    pub fn get(&self, name: &str) -> Option<&Recipe> {
        if name.is_empty() {
            return None;
        }
        self.recipes.get(&name.to_lowercase())
    }

    /// Build the viewer content for a drink.
    pub fn view(&self, name: &str) -> RecipeView {
        let title = name.to_string();
        match self.get(name) {
            Some(recipe) => RecipeView::Found {
                title,
                photo: recipe.photo.clone().filter(|p| !p.is_empty()),
                ingredients: recipe.ingredients.items(),
                instructions: recipe.instructions.items(),
                notes: recipe.notes.clone().filter(|n| !n.is_empty()),
            },
            None => RecipeView::ComingSoon { title },
        }
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

// ============================================================================
// Invites
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Invite {
    pub round: u32,
    #[serde(rename = "match")]
    pub number: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct InviteBook {
    invites: Vec<Invite>,
}

impl InviteBook {
    pub fn new(invites: Vec<Invite>) -> Self {
        Self { invites }
    }

    /// Invite for an exact (round, match) pair.
    pub fn get(&self, key: MatchKey) -> Option<&Invite> {
        self.invites
            .iter()
            .find(|i| i.round == key.round && i.number == key.number)
    }

    pub fn len(&self) -> usize {
        self.invites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invites.is_empty()
    }
}

impl InviteLookup for InviteBook {
    fn has_invite(&self, key: MatchKey) -> bool {
        self.get(key).is_some()
    }
}

// ============================================================================
// Priority list
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct PriorityEntry {
    /// `None` when the rank cell was not numeric
    pub rank: Option<f64>,
    pub name: String,
}

/// Parse the tab-delimited priority list.
///
/// The first two lines are skipped. The rank is the first cell and the name
/// the second-to-last. Entries sort by rank; unranked entries go last.
pub fn parse_priority_list(text: &str) -> Vec<PriorityEntry> {
    let mut entries: Vec<PriorityEntry> = text
        .lines()
        .skip(2)
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let cells: Vec<&str> = line.split('\t').collect();
            let rank = cells
                .first()
                .and_then(|c| c.trim().parse::<f64>().ok())
                .filter(|r| r.is_finite());
            let name = cells
                .len()
                .checked_sub(2)
                .and_then(|i| cells.get(i))
                .map(|c| c.trim().to_string())
                .unwrap_or_default();
            PriorityEntry { rank, name }
        })
        .collect();

    entries.sort_by(|a, b| match (a.rank, b.rank) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    entries
}

// ============================================================================
// Loading
// ============================================================================

/// All optional lookups, already degraded to empty on failure.
#[derive(Clone, Debug, Default)]
pub struct Auxiliary {
    pub recipes: RecipeBook,
    pub invites: InviteBook,
    pub priority: Vec<PriorityEntry>,
}

async fn load_recipes(location: Option<&str>) -> RecipeBook {
    let Some(location) = location else {
        return RecipeBook::default();
    };
    match fetch_json::<HashMap<String, Recipe>>(location).await {
        Ok(map) => RecipeBook::from_map(map),
        Err(err) => {
            tracing::warn!(error = %err, "no recipes loaded");
            RecipeBook::default()
        }
    }
}

async fn load_invites(location: Option<&str>) -> InviteBook {
    let Some(location) = location else {
        return InviteBook::default();
    };
    match fetch_json::<Vec<Invite>>(location).await {
        Ok(invites) => InviteBook::new(invites),
        Err(err) => {
            tracing::warn!(error = %err, "no invites loaded");
            InviteBook::default()
        }
    }
}

async fn load_priority(location: Option<&str>) -> Vec<PriorityEntry> {
    let Some(location) = location else {
        return Vec::new();
    };
    match fetch_text(location).await {
        Ok(text) => parse_priority_list(&text),
        Err(err) => {
            tracing::warn!(error = %err, "no priority list loaded");
            Vec::new()
        }
    }
}

/// Load every optional resource concurrently.
pub async fn load_auxiliary(sources: &Sources) -> Auxiliary {
    let (recipes, invites, priority) = tokio::join!(
        load_recipes(sources.recipes.as_deref()),
        load_invites(sources.invites.as_deref()),
        load_priority(sources.priority.as_deref()),
    );
    tracing::info!(
        recipes = recipes.len(),
        invites = invites.len(),
        priority = priority.len(),
        "auxiliary resources loaded"
    );
    Auxiliary {
        recipes,
        invites,
        priority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_lookup_is_case_insensitive() {
        let map: HashMap<String, Recipe> = serde_json::from_str(
            r#"{"Old Fashioned": {"ingredients": "Bourbon\n\nSugar\nBitters", "instructions": ["Stir"], "notes": "Orange peel"}}"#,
        )
        .unwrap();
        let book = RecipeBook::from_map(map);

        match book.view("old fashioned") {
            RecipeView::Found {
                title,
                photo,
                ingredients,
                instructions,
                notes,
            } => {
                assert_eq!(title, "old fashioned");
                assert_eq!(photo, None);
                assert_eq!(ingredients, vec!["Bourbon", "Sugar", "Bitters"]);
                assert_eq!(instructions, vec!["Stir"]);
                assert_eq!(notes.as_deref(), Some("Orange peel"));
            }
            other => panic!("Expected recipe, got {:?}", other),
        }
    }

    #[test]
    fn test_text_list_splits_on_newline_runs() {
        let list = TextList::Text("Gin\n\n\n \nCampari\n".into());
        assert_eq!(list.items(), vec!["Gin", " ", "Campari"]);
        let list = TextList::Lines(vec!["a".into(), "".into()]);
        assert_eq!(list.items(), vec!["a", ""]);
    }

    #[test]
    fn test_missing_recipe_is_coming_soon() {
        let book = RecipeBook::default();
        let view = book.view("Mojito");
        assert_eq!(
            view,
            RecipeView::ComingSoon {
                title: "Mojito".into()
            }
        );
        assert_eq!(view.title(), "Mojito");
        assert!(book.get("").is_none());
    }

    #[test]
    fn test_invite_lookup_exact_pair() {
        let invites: Vec<Invite> =
            serde_json::from_str(r#"[{"round": 5, "match": 1, "title": "Finals night"}]"#).unwrap();
        let book = InviteBook::new(invites);
        assert!(book.has_invite(MatchKey::new(5, 1)));
        assert!(!book.has_invite(MatchKey::new(1, 5)));
        assert_eq!(
            book.get(MatchKey::new(5, 1)).and_then(|i| i.title.as_deref()),
            Some("Finals night")
        );
    }

    #[test]
    fn test_priority_list_sorting() {
        let text = "Priority\tDrink\tNotes\n\
                    ---\n\
                    3\tx\tNegroni\t\n\
                    \n\
                    n/a\tx\tSpritz\t\n\
                    1\tx\tDaiquiri\tq\n";
        let entries = parse_priority_list(text);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Daiquiri", "Negroni", "Spritz"]);
        assert_eq!(entries[0].rank, Some(1.0));
        assert_eq!(entries[2].rank, None);
    }

    #[test]
    fn test_priority_list_short_lines() {
        let entries = parse_priority_list("h\nh\n7\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "");
        assert_eq!(entries[0].rank, Some(7.0));
    }

    #[tokio::test]
    async fn test_missing_auxiliary_files_degrade_to_empty() {
        let sources = Sources {
            matches: None,
            recipes: Some("/nonexistent/recipes.json".into()),
            invites: Some("/nonexistent/invites.json".into()),
            priority: None,
        };
        let aux = load_auxiliary(&sources).await;
        assert!(aux.recipes.is_empty());
        assert!(aux.invites.is_empty());
        assert!(aux.priority.is_empty());
    }

    #[tokio::test]
    async fn test_missing_match_table_is_fatal() {
        let result = load_matches("/nonexistent/matches.csv").await;
        assert!(matches!(result, Err(BracketError::Io { .. })));
    }
}
