//! # Kitchen Service
//!
//! Read-modify-write operations on the stored documents. Each operation reads
//! the documents it needs, applies a transition from [`crate::reconcile`] and
//! writes the result back. There is no locking across requests: concurrent
//! mutations can overwrite each other.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::kitchen_model::{AlreadyBought, CatalogDocument, Occurrence, Recipe, ShoppingEntry};
use crate::reconcile;
use crate::storage::{BlobStore, StoreError, RECIPES_KEY, TO_BE_BOUGHT_KEY, TO_BE_COOKED_KEY};

#[derive(Clone)]
pub struct Kitchen {
    store: Arc<dyn BlobStore>,
}

impl Kitchen {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn BlobStore> {
        &self.store
    }

    /// The recipe catalog with ids assigned
    pub async fn recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        let raw = match self.store.read(RECIPES_KEY).await {
            Ok(raw) => raw,
            Err(e) if e.is_not_found() => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let document: CatalogDocument = serde_json::from_str(&raw)?;
        Ok(document.into_recipes())
    }

    pub async fn to_cook(&self) -> Result<Vec<Recipe>, StoreError> {
        self.read_list(TO_BE_COOKED_KEY).await
    }

    pub async fn to_buy(&self) -> Result<Vec<ShoppingEntry>, StoreError> {
        self.read_list(TO_BE_BOUGHT_KEY).await
    }

    /// Append a recipe to the to-cook list and its ingredients to the to-buy list
    pub async fn add_to_cook(&self, recipe: Recipe) -> Result<(), StoreError> {
        let mut to_cook = self.to_cook().await?;
        let to_buy = self.to_buy().await?;

        let merged = reconcile::add_recipe(&to_buy, &recipe);
        info!(
            recipe_id = recipe.id,
            ingredients = recipe.zutaten.len(),
            to_buy = merged.len(),
            "Adding recipe to cook"
        );

        to_cook.push(recipe);
        self.write_list(TO_BE_COOKED_KEY, &to_cook).await?;
        self.write_list(TO_BE_BOUGHT_KEY, &merged).await
    }

    /// Remove a recipe from the to-cook list and withdraw its ingredients
    ///
    /// Returns the recipe's ingredients that had already left the to-buy list.
    pub async fn remove_from_cook(&self, rezept_id: i64) -> Result<Vec<AlreadyBought>, StoreError> {
        let to_cook = self.to_cook().await?;
        let to_buy = self.to_buy().await?;

        let outcome = reconcile::remove_recipe(&to_cook, &to_buy, rezept_id);
        info!(
            recipe_id = rezept_id,
            removed = to_cook.len() - outcome.to_cook.len(),
            already_bought = outcome.already_bought.len(),
            "Removing recipe from cook list"
        );

        self.write_list(TO_BE_COOKED_KEY, &outcome.to_cook).await?;
        self.write_list(TO_BE_BOUGHT_KEY, &outcome.to_buy).await?;
        Ok(outcome.already_bought)
    }

    /// Add a manually entered item to the to-buy list
    pub async fn add_to_buy(&self, item: Occurrence) -> Result<(), StoreError> {
        let to_buy = self.to_buy().await?;
        info!(item = %item.name, "Adding item to buy");
        let merged = reconcile::add_manual(&to_buy, item);
        self.write_list(TO_BE_BOUGHT_KEY, &merged).await
    }

    /// Delete the to-buy entry at `index`
    pub async fn delete_to_buy(&self, index: usize) -> Result<(), StoreError> {
        let mut to_buy = self.to_buy().await?;
        let deleted = reconcile::delete_entry_at(&mut to_buy, index);
        info!(index, deleted, "Deleting item to buy");
        self.write_list(TO_BE_BOUGHT_KEY, &to_buy).await
    }

    /// Rename the to-buy entry at `index`
    pub async fn rename_to_buy(&self, index: usize, new_name: &str) -> Result<(), StoreError> {
        let mut to_buy = self.to_buy().await?;
        let renamed = reconcile::rename_entry_at(&mut to_buy, index, new_name);
        info!(index, renamed, new_name, "Renaming item to buy");
        self.write_list(TO_BE_BOUGHT_KEY, &to_buy).await
    }

    /// Read a list document; missing or non-list documents read as empty
    async fn read_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        let raw = match self.store.read(key).await {
            Ok(raw) => raw,
            Err(e) if e.is_not_found() => {
                debug!(key, "Document missing, using empty list");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        match serde_json::from_str::<Value>(&raw)? {
            value @ Value::Array(_) => Ok(serde_json::from_value(value)?),
            _ => {
                debug!(key, "Document is not a list, using empty list");
                Ok(Vec::new())
            }
        }
    }

    async fn write_list<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(items)?;
        self.store.write(key, &contents).await
    }
}
