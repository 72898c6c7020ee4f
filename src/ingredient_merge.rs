//! # Ingredient Merge and Expansion
//!
//! Folds ingredient occurrences into a deduplicated to-buy list and unfolds a
//! to-buy list back into per-recipe occurrences.
//!
//! Grouping is case-insensitive on the parsed base name. Amounts are opaque
//! text and are only concatenated, never added up. Output order is the order
//! in which groups, amounts and recipes were first seen.
//!
//! ```rust
//! use kochliste::ingredient_merge::merge_ingredients;
//! use kochliste::kitchen_model::Occurrence;
//!
//! let merged = merge_ingredients(&[
//!     Occurrence::from_recipe("2 Eier", 1, "Kuchen"),
//!     Occurrence::from_recipe("3 EIER", 2, "Omelett"),
//! ]);
//! assert_eq!(merged.len(), 1);
//! assert_eq!(merged[0].name, "2 + 3 Eier");
//! ```

use log::debug;
use std::collections::HashMap;

use crate::ingredient_parser::{grouping_key, parse_ingredient, ParsedIngredient};
use crate::kitchen_model::{Occurrence, ShoppingEntry};

/// Insertion-ordered list without duplicates
#[derive(Debug, Clone)]
struct UniqueList<T> {
    items: Vec<T>,
}

impl<T: PartialEq> UniqueList<T> {
    fn new() -> Self {
        Self { items: Vec::new() }
    }

    fn insert(&mut self, item: T) {
        if !self.items.contains(&item) {
            self.items.push(item);
        }
    }

    fn into_vec(self) -> Vec<T> {
        self.items
    }
}

/// Accumulator for all occurrences sharing one base name
#[derive(Debug, Clone)]
struct IngredientGroup {
    base_name: String,
    amounts: Vec<String>,
    rezept_ids: UniqueList<i64>,
    rezept_names: UniqueList<String>,
}

impl IngredientGroup {
    fn new(base_name: String) -> Self {
        Self {
            base_name,
            amounts: Vec::new(),
            rezept_ids: UniqueList::new(),
            rezept_names: UniqueList::new(),
        }
    }

    fn absorb(&mut self, parsed: ParsedIngredient, occurrence: &Occurrence) {
        if parsed.has_amount() {
            self.amounts.push(parsed.amount);
        }
        if let Some(name) = occurrence.rezept_name.as_deref().filter(|n| !n.is_empty()) {
            self.rezept_names.insert(name.to_string());
        }
        if let Some(id) = occurrence.rezept_id {
            self.rezept_ids.insert(id);
        }
    }

    fn into_entry(self) -> ShoppingEntry {
        ShoppingEntry {
            name: ShoppingEntry::display_name(&self.amounts, &self.base_name),
            base_name: self.base_name,
            amounts: self.amounts,
            rezept_ids: self.rezept_ids.into_vec(),
            rezept_names: self.rezept_names.into_vec(),
        }
    }
}

/// Groups keyed by lower-cased base name, kept in first-seen order
#[derive(Debug, Default)]
struct GroupIndex {
    positions: HashMap<String, usize>,
    groups: Vec<IngredientGroup>,
}

impl GroupIndex {
    fn entry(&mut self, base_name: &str) -> &mut IngredientGroup {
        let key = grouping_key(base_name);
        let position = match self.positions.get(&key) {
            Some(&position) => position,
            None => {
                self.groups.push(IngredientGroup::new(base_name.to_string()));
                self.positions.insert(key, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        &mut self.groups[position]
    }
}

/// Merge occurrences into to-buy entries
pub fn merge_ingredients(occurrences: &[Occurrence]) -> Vec<ShoppingEntry> {
    let mut index = GroupIndex::default();

    for occurrence in occurrences {
        let parsed = parse_ingredient(&occurrence.name);
        index.entry(&parsed.name).absorb(parsed, occurrence);
    }

    debug!(
        "Merged {} occurrences into {} entries",
        occurrences.len(),
        index.groups.len()
    );

    index
        .groups
        .into_iter()
        .map(IngredientGroup::into_entry)
        .collect()
}

/// Unfold to-buy entries into one occurrence per contributing recipe
///
/// Manual entries come back as a single unattributed occurrence carrying the
/// full display name.
pub fn expand_ingredients(entries: &[ShoppingEntry]) -> Vec<Occurrence> {
    let mut expanded = Vec::new();

    for entry in entries {
        if entry.is_manual() {
            expanded.push(Occurrence::manual(&entry.name));
            continue;
        }

        let base_name = entry.effective_base_name();
        for (idx, id) in entry.rezept_ids.iter().enumerate() {
            let name = match entry.amounts.get(idx).filter(|a| !a.is_empty()) {
                Some(amount) => format!("{amount} {base_name}"),
                None => base_name.to_string(),
            };
            let rezept_name = entry.rezept_names.get(idx).cloned().unwrap_or_default();
            expanded.push(Occurrence {
                name,
                rezept_id: Some(*id),
                rezept_name: Some(rezept_name),
            });
        }
    }

    expanded
}

/// Expand, append new occurrences, merge again
pub fn merge_into(entries: &[ShoppingEntry], additions: Vec<Occurrence>) -> Vec<ShoppingEntry> {
    let mut occurrences = expand_ingredients(entries);
    occurrences.extend(additions);
    merge_ingredients(&occurrences)
}
