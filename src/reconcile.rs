//! # To-Cook / To-Buy Reconciliation
//!
//! Pure state transitions applied to the to-cook and to-buy lists. Every
//! transition that touches recipe attribution rebuilds the to-buy list through
//! expand and merge instead of patching it in place.

use std::collections::HashSet;

use crate::ingredient_merge::{expand_ingredients, merge_ingredients, merge_into};
use crate::ingredient_parser::{grouping_key, parse_ingredient};
use crate::kitchen_model::{AlreadyBought, Occurrence, Recipe, ShoppingEntry};

/// Result of removing a recipe from the to-cook list
#[derive(Debug, Clone, PartialEq)]
pub struct RemovalOutcome {
    pub to_cook: Vec<Recipe>,
    pub to_buy: Vec<ShoppingEntry>,
    /// Ingredients of the removed recipe that were no longer on the to-buy list
    pub already_bought: Vec<AlreadyBought>,
}

/// Add a recipe's ingredients to the to-buy list
pub fn add_recipe(to_buy: &[ShoppingEntry], recipe: &Recipe) -> Vec<ShoppingEntry> {
    merge_into(to_buy, recipe.occurrences())
}

/// Add a manually entered item to the to-buy list
pub fn add_manual(to_buy: &[ShoppingEntry], item: Occurrence) -> Vec<ShoppingEntry> {
    merge_into(to_buy, vec![item])
}

/// Remove every to-cook entry with `rezept_id` and withdraw its ingredients
///
/// The already-bought report is computed against the to-buy list as it was
/// before the removal. An unknown id reports nothing but still rebuilds the
/// to-buy list.
pub fn remove_recipe(
    to_cook: &[Recipe],
    to_buy: &[ShoppingEntry],
    rezept_id: i64,
) -> RemovalOutcome {
    let removed = to_cook.iter().find(|r| r.id == rezept_id);

    let remaining_cook: Vec<Recipe> = to_cook
        .iter()
        .filter(|r| r.id != rezept_id)
        .cloned()
        .collect();

    let already_bought = removed
        .map(|recipe| already_bought(recipe, to_buy))
        .unwrap_or_default();

    let survivors: Vec<ShoppingEntry> = to_buy
        .iter()
        .filter_map(|entry| entry.without_recipe(rezept_id))
        .collect();

    RemovalOutcome {
        to_cook: remaining_cook,
        to_buy: merge_ingredients(&expand_ingredients(&survivors)),
        already_bought,
    }
}

/// Ingredients of `recipe` whose base name is absent from `to_buy`
pub fn already_bought(recipe: &Recipe, to_buy: &[ShoppingEntry]) -> Vec<AlreadyBought> {
    let present: HashSet<String> = to_buy
        .iter()
        .map(|entry| grouping_key(entry.effective_base_name()))
        .collect();

    recipe
        .zutaten
        .iter()
        .filter_map(|line| {
            let parsed = parse_ingredient(line);
            if present.contains(&grouping_key(&parsed.name)) {
                return None;
            }
            Some(AlreadyBought {
                name: line.clone(),
                base_name: parsed.name,
                rezept_id: recipe.id,
                rezept_name: recipe.name.clone(),
            })
        })
        .collect()
}

/// Remove the entry at `index`; out of range leaves the list unchanged
pub fn delete_entry_at(to_buy: &mut Vec<ShoppingEntry>, index: usize) -> bool {
    if index < to_buy.len() {
        to_buy.remove(index);
        true
    } else {
        false
    }
}

/// Replace the display name at `index` and re-derive its base name
///
/// Amounts and recipe attribution are left as they are. Out of range or an
/// empty name leaves the list unchanged.
pub fn rename_entry_at(to_buy: &mut [ShoppingEntry], index: usize, new_name: &str) -> bool {
    if new_name.is_empty() {
        return false;
    }
    match to_buy.get_mut(index) {
        Some(entry) => {
            entry.name = new_name.to_string();
            entry.base_name = parse_ingredient(new_name).name;
            true
        }
        None => false,
    }
}
