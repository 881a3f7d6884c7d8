//! The merged recipe graph.
//!
//! [`RecipeGraph`] is an owned value: build as many as you like, each one
//! independent. Recipes live in a slot arena so that factories (upgrade
//! recipe) and items (recipe sources) can hold [`RecipeId`]s into it. A
//! recipe key that is merged again keeps its `RecipeId`; only the stored
//! recipe is replaced.
//!
//! Mutation goes through [`crate::merge::SourceMerger`]. Everything here is
//! read access for downstream consumers.

use crate::id::{ItemKey, RecipeId};
use crate::item::{Item, ItemCatalog};
use crate::source::{FactoryDef, RecipeDef, RecipeItemRef, RecipeKind};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use slotmap::SlotMap;
use std::collections::BTreeMap;
use std::fmt;

// ===========================================================================
// Factories
// ===========================================================================

/// A crafting location and the recipes it can run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Factory {
    pub key: String,
    pub name: String,
    /// Recipe keys, in declaration order. Dangling keys are removed on merge.
    pub recipes: Vec<String>,
    /// The single UPGRADE recipe whose target is this factory, if any.
    pub upgrade_recipe: Option<RecipeId>,
}

impl Factory {
    pub(crate) fn from_def(key: String, def: FactoryDef) -> Self {
        Self {
            key,
            name: def.name,
            recipes: def.recipes,
            upgrade_recipe: None,
        }
    }
}

impl fmt::Display for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"key\": {}, \"name\": {}, \"recipes\": {:?}}}",
            self.key, self.name, self.recipes
        )
    }
}

// ===========================================================================
// Recipes
// ===========================================================================

/// A recipe in the graph.
#[derive(Debug, Clone, Serialize)]
pub struct Recipe {
    pub key: String,
    pub name: String,
    pub type_tag: String,
    pub kind: RecipeKind,
    pub input: Vec<RecipeItemRef>,
    pub output: Option<Vec<RecipeItemRef>>,
    /// Keys of every factory listing this recipe, in factory key order.
    pub in_factories: Vec<String>,
}

impl Recipe {
    pub(crate) fn from_def(key: String, def: RecipeDef) -> Self {
        Self {
            key,
            name: def.name,
            type_tag: def.type_tag,
            kind: def.kind,
            input: def.input,
            output: def.output,
            in_factories: Vec::new(),
        }
    }

    /// Input lines followed by output lines.
    pub fn lines(&self) -> impl Iterator<Item = &RecipeItemRef> {
        self.input.iter().chain(self.output.iter().flatten())
    }

    pub fn outputs(&self) -> impl Iterator<Item = &RecipeItemRef> {
        self.output.iter().flatten()
    }

    /// Whether every line carries a resolution.
    pub fn is_resolved(&self) -> bool {
        self.lines().all(|line| line.resolved.is_some())
    }
}

// ===========================================================================
// Graph
// ===========================================================================

/// Accumulated factories, recipes and canonical items.
#[derive(Debug, Clone, Default)]
pub struct RecipeGraph {
    pub(crate) factories: BTreeMap<String, Factory>,
    pub(crate) recipe_arena: SlotMap<RecipeId, Recipe>,
    pub(crate) recipe_keys: BTreeMap<String, RecipeId>,
    pub(crate) items: ItemCatalog,
    pub(crate) sources_merged: usize,
}

impl RecipeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Factories
    // -----------------------------------------------------------------------

    pub fn factory(&self, key: &str) -> Option<&Factory> {
        self.factories.get(key)
    }

    /// First factory, in key order, with this display name.
    pub fn factory_by_name(&self, name: &str) -> Option<&Factory> {
        self.factories.values().find(|f| f.name == name)
    }

    pub fn factories(&self) -> impl Iterator<Item = &Factory> {
        self.factories.values()
    }

    pub fn factory_count(&self) -> usize {
        self.factories.len()
    }

    /// The upgrade recipe that produces a factory.
    pub fn upgrade_recipe_of(&self, factory_key: &str) -> Option<&Recipe> {
        self.factories
            .get(factory_key)
            .and_then(|f| f.upgrade_recipe)
            .and_then(|id| self.recipe_arena.get(id))
    }

    // -----------------------------------------------------------------------
    // Recipes
    // -----------------------------------------------------------------------

    pub fn recipe(&self, key: &str) -> Option<&Recipe> {
        self.recipe_keys
            .get(key)
            .and_then(|&id| self.recipe_arena.get(id))
    }

    pub fn recipe_id(&self, key: &str) -> Option<RecipeId> {
        self.recipe_keys.get(key).copied()
    }

    pub fn recipe_by_id(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipe_arena.get(id)
    }

    /// Recipes in key order.
    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.recipe_keys
            .values()
            .filter_map(|&id| self.recipe_arena.get(id))
    }

    pub fn recipe_count(&self) -> usize {
        self.recipe_keys.len()
    }

    // -----------------------------------------------------------------------
    // Items
    // -----------------------------------------------------------------------

    pub fn item(&self, key: &ItemKey) -> Option<&Item> {
        self.items.get(key)
    }

    pub fn items(&self) -> &ItemCatalog {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Recipes that produce the item, in registration order.
    pub fn recipes_producing(&self, key: &ItemKey) -> impl Iterator<Item = &Recipe> {
        self.items
            .get(key)
            .map(|item| item.recipe_sources.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&id| self.recipe_arena.get(id))
    }

    /// The shared recipe-source list of the item a resolved line points to.
    ///
    /// Every line resolving to the same key gets the same slice back, so
    /// producers merged later are visible through all of them.
    pub fn recipe_sources_of(&self, line: &RecipeItemRef) -> Option<&[RecipeId]> {
        line.item_key()
            .and_then(|key| self.items.get(&key))
            .map(|item| item.recipe_sources.as_slice())
    }

    /// Number of sources merged successfully.
    pub fn sources_merged(&self) -> usize {
        self.sources_merged
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty() && self.recipe_keys.is_empty() && self.items.is_empty()
    }
}

/// Serializes as `{factories, recipes, items, sources_merged}` with every
/// table keyed by its string key.
impl Serialize for RecipeGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let recipes: BTreeMap<&str, &Recipe> = self
            .recipes()
            .map(|recipe| (recipe.key.as_str(), recipe))
            .collect();
        let mut state = serializer.serialize_struct("RecipeGraph", 4)?;
        state.serialize_field("factories", &self.factories)?;
        state.serialize_field("recipes", &recipes)?;
        state.serialize_field("items", &self.items)?;
        state.serialize_field("sources_merged", &self.sources_merged)?;
        state.end()
    }
}
