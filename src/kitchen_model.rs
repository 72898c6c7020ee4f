//! # Kitchen Data Model
//!
//! Data structures stored in the three JSON documents (recipe catalog,
//! to-cook list, to-buy list) and exchanged over the HTTP API.
//!
//! ## Core Concepts
//!
//! - **Recipe**: a named dish with free-text ingredient lines (`zutaten`)
//! - **Occurrence**: one ingredient line with an optional recipe attribution
//! - **ShoppingEntry**: a merged to-buy line aggregating every occurrence that
//!   shares a base name
//! - **AlreadyBought**: an ingredient of a removed recipe that was no longer on
//!   the to-buy list
//!
//! Field names follow the stored documents (`zutaten`, `rezeptIds`, ...), so
//! existing data files load unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A recipe from the catalog, or a to-cook entry copied from one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique recipe id, 0 for stored records that never had one
    #[serde(default)]
    pub id: i64,

    /// Display name of the dish
    #[serde(default)]
    pub name: String,

    /// Ingredient lines, e.g. "200g Mehl"
    #[serde(default)]
    pub zutaten: Vec<String>,

    /// Any further fields of the stored record (images, instructions, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Recipe {
    pub fn new(id: i64, name: &str, zutaten: &[&str]) -> Self {
        Self {
            id,
            name: name.to_string(),
            zutaten: zutaten.iter().map(|z| z.to_string()).collect(),
            extra: Map::new(),
        }
    }

    /// One attributed occurrence per ingredient line
    pub fn occurrences(&self) -> Vec<Occurrence> {
        self.zutaten
            .iter()
            .map(|line| Occurrence::from_recipe(line, self.id, &self.name))
            .collect()
    }
}

/// A catalog record as stored, before ids are assigned
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub zutaten: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The recipe catalog document: either `{ "rezepte": [...] }` or a bare list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CatalogDocument {
    Wrapped { rezepte: Vec<CatalogRecord> },
    Bare(Vec<CatalogRecord>),
}

impl CatalogDocument {
    /// Assign missing (or zero) ids from the 1-based position in the catalog
    ///
    /// The assigned ids are not written back; they are recomputed on every load.
    pub fn into_recipes(self) -> Vec<Recipe> {
        let records = match self {
            CatalogDocument::Wrapped { rezepte } => rezepte,
            CatalogDocument::Bare(records) => records,
        };

        records
            .into_iter()
            .enumerate()
            .map(|(index, record)| Recipe {
                id: match record.id {
                    Some(id) if id != 0 => id,
                    _ => index as i64 + 1,
                },
                name: record.name,
                zutaten: record.zutaten,
                extra: record.extra,
            })
            .collect()
    }
}

/// One ingredient line fed into the merge engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    /// Raw ingredient line including any amount
    pub name: String,
    /// Contributing recipe, `None` for manually added items
    #[serde(default)]
    pub rezept_id: Option<i64>,
    /// Name of the contributing recipe
    #[serde(default)]
    pub rezept_name: Option<String>,
}

impl Occurrence {
    /// A manually typed item without recipe attribution
    pub fn manual(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rezept_id: None,
            rezept_name: None,
        }
    }

    pub fn from_recipe(name: &str, rezept_id: i64, rezept_name: &str) -> Self {
        Self {
            name: name.to_string(),
            rezept_id: Some(rezept_id),
            rezept_name: Some(rezept_name.to_string()),
        }
    }
}

/// A merged line of the to-buy list
///
/// `amounts[i]` and `rezept_names[i]` belong to the recipe `rezept_ids[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingEntry {
    /// Display form: amounts joined with " + ", then the base name
    pub name: String,
    #[serde(default)]
    pub base_name: String,
    #[serde(default)]
    pub amounts: Vec<String>,
    #[serde(default)]
    pub rezept_ids: Vec<i64>,
    #[serde(default)]
    pub rezept_names: Vec<String>,
}

impl ShoppingEntry {
    /// Build the display name from amounts and base name
    pub fn display_name(amounts: &[String], base_name: &str) -> String {
        if amounts.is_empty() {
            base_name.to_string()
        } else {
            format!("{} {}", amounts.join(" + "), base_name)
        }
    }

    /// The base name, falling back to the display name for records without one
    pub fn effective_base_name(&self) -> &str {
        if self.base_name.is_empty() {
            &self.name
        } else {
            &self.base_name
        }
    }

    /// Whether the entry was added by hand rather than from a recipe
    pub fn is_manual(&self) -> bool {
        self.rezept_ids.is_empty()
    }

    /// Drop one recipe's attribution, keeping ids, names and amounts aligned
    ///
    /// Returns `None` when the recipe was the only contributor. Manual entries
    /// are returned unchanged.
    pub fn without_recipe(&self, rezept_id: i64) -> Option<ShoppingEntry> {
        if self.is_manual() {
            return Some(self.clone());
        }

        let kept: Vec<usize> = self
            .rezept_ids
            .iter()
            .enumerate()
            .filter(|(_, id)| **id != rezept_id)
            .map(|(idx, _)| idx)
            .collect();

        if kept.is_empty() {
            return None;
        }

        let pick = |values: &[String]| -> Vec<String> {
            kept.iter().filter_map(|&idx| values.get(idx).cloned()).collect()
        };

        // Amounts only line up with ids when every recipe contributed exactly one
        let amounts = if self.amounts.len() == self.rezept_ids.len() {
            pick(&self.amounts)
        } else {
            self.amounts.clone()
        };

        Some(ShoppingEntry {
            name: self.name.clone(),
            base_name: self.base_name.clone(),
            amounts,
            rezept_ids: kept.iter().map(|&idx| self.rezept_ids[idx]).collect(),
            rezept_names: pick(&self.rezept_names),
        })
    }
}

impl fmt::Display for ShoppingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.rezept_names.is_empty() {
            write!(f, " ({})", self.rezept_names.join(", "))?;
        }
        Ok(())
    }
}

/// An ingredient of a removed recipe that had already left the to-buy list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlreadyBought {
    /// The original ingredient line
    pub name: String,
    pub base_name: String,
    pub rezept_id: i64,
    pub rezept_name: String,
}
