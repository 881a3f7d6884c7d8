use crate::id::{ItemKey, MaterialType, RecipeId};
use crate::source::{RecipeItemRef, ResolvedItem};
use serde::Serialize;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

/// The deduplicated identity of a material at one variant.
///
/// Fields are taken from the first line that resolved to this key, except
/// `recipe_sources`, which tracks the recipes currently producing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub key: ItemKey,
    pub item_type: MaterialType,
    pub variant: u32,
    pub display_name: String,
    /// Raw material string of the first registration.
    pub material: String,
    pub custom_name: Option<String>,
    pub lore: Vec<String>,
    /// Recipes that produce this item, in registration order. No duplicates.
    pub recipe_sources: Vec<RecipeId>,
}

impl Item {
    fn from_line(line: &RecipeItemRef, resolved: &ResolvedItem) -> Self {
        Self {
            key: resolved.key(),
            item_type: resolved.item_type.clone(),
            variant: resolved.variant,
            display_name: resolved.display_name.clone(),
            material: line.material.clone(),
            custom_name: line.custom_name.clone(),
            lore: line.lore.clone(),
            recipe_sources: Vec::new(),
        }
    }

    /// Fill optional fields the first registration left empty.
    fn backfill(&mut self, line: &RecipeItemRef) {
        if self.custom_name.is_none() {
            self.custom_name.clone_from(&line.custom_name);
        }
        if self.lore.is_empty() {
            self.lore.clone_from(&line.lore);
        }
    }
}

/// Canonical item store. Exactly one [`Item`] per [`ItemKey`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ItemCatalog {
    items: BTreeMap<ItemKey, Item>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resolved line, creating its item on first sight.
    /// Returns the canonical key the line now refers to.
    pub fn canonicalize(&mut self, line: &RecipeItemRef, resolved: &ResolvedItem) -> ItemKey {
        let key = resolved.key();
        match self.items.entry(key.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(Item::from_line(line, resolved));
            }
            Entry::Occupied(mut slot) => slot.get_mut().backfill(line),
        }
        key
    }

    /// Record `recipe` as a producer of the item. Returns false if the item
    /// is unknown or already lists the recipe.
    pub fn add_recipe_source(&mut self, key: &ItemKey, recipe: RecipeId) -> bool {
        match self.items.get_mut(key) {
            Some(item) if !item.recipe_sources.contains(&recipe) => {
                item.recipe_sources.push(recipe);
                true
            }
            _ => false,
        }
    }

    /// Drop `recipe` from every item it no longer produces. Items it still
    /// produces keep their position in the list.
    pub fn prune_recipe_source(&mut self, recipe: RecipeId, produced: &BTreeSet<ItemKey>) {
        for (key, item) in &mut self.items {
            if !produced.contains(key) {
                item.recipe_sources.retain(|&id| id != recipe);
            }
        }
    }

    pub fn get(&self, key: &ItemKey) -> Option<&Item> {
        self.items.get(key)
    }

    pub fn contains(&self, key: &ItemKey) -> bool {
        self.items.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemKey, &Item)> {
        self.items.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ItemKey> {
        self.items.keys()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
