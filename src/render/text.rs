//! Plain-text views of the recipe, invite and priority-list lookups.

use std::fmt::Write as _;

use crate::resources::{Invite, PriorityEntry, RecipeView, NO_RECIPE_TEXT};

/// Recipe viewer content.
pub fn recipe_text(view: &RecipeView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.title());

    match view {
        RecipeView::ComingSoon { .. } => {
            let _ = writeln!(out, "\n{NO_RECIPE_TEXT}");
        }
        RecipeView::Found {
            photo,
            ingredients,
            instructions,
            notes,
            ..
        } => {
            if let Some(photo) = photo {
                let _ = writeln!(out, "Photo: {photo}");
            }
            let _ = writeln!(out, "\nIngredients");
            for item in ingredients {
                let _ = writeln!(out, "  - {item}");
            }
            let _ = writeln!(out, "\nInstructions");
            for (i, step) in instructions.iter().enumerate() {
                let _ = writeln!(out, "  {}. {step}", i + 1);
            }
            if let Some(notes) = notes {
                let _ = writeln!(out, "\n{notes}");
            }
        }
    }
    out
}

/// Invite viewer content.
pub fn invite_text(invite: &Invite) -> String {
    let mut out = String::new();
    let title = invite.title.as_deref().unwrap_or("Invite");
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "Round {} \u{b7} Match {}", invite.round, invite.number);
    if let Some(image) = &invite.image {
        let _ = writeln!(out, "Image: {image}");
    }
    out
}

/// Ranked priority list, one entry per line.
pub fn priority_text(entries: &[PriorityEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        match entry.rank {
            Some(rank) => {
                let _ = writeln!(out, "{rank:>4}  {}", entry.name);
            }
            None => {
                let _ = writeln!(out, "{:>4}  {}", "-", entry.name);
            }
        }
    }
    out
}
