//! Serde data file structs for recipe sources and lookup tables.
//!
//! These structs define the on-disk format. They are deserialized from RON,
//! JSON, TOML or YAML and then validated into `craftgraph_core` types by
//! [`crate::convert`].

use serde::Deserialize;
use std::collections::BTreeMap;

// ===========================================================================
// Recipe sources
// ===========================================================================

/// One recipe source document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeSourceData {
    #[serde(default)]
    pub factories: BTreeMap<String, FactoryData>,
    #[serde(default)]
    pub recipes: BTreeMap<String, RecipeData>,
}

/// A factory entry.
#[derive(Debug, Clone, Deserialize)]
pub struct FactoryData {
    pub name: String,
    #[serde(default)]
    pub recipes: Vec<String>,
}

/// A recipe entry. `type` is free-form; `UPGRADE` is the only tag with
/// meaning to the merge.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeData {
    #[serde(rename = "type", default)]
    pub type_tag: String,
    pub name: String,
    /// Target factory display name, for UPGRADE recipes.
    #[serde(default)]
    pub factory: Option<String>,
    #[serde(default)]
    pub input: BTreeMap<String, RecipeItemData>,
    #[serde(default)]
    pub output: Option<BTreeMap<String, RecipeItemData>>,
}

/// A quantity line, keyed by slot in its recipe.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeItemData {
    pub material: String,
    #[serde(default)]
    pub durability: Option<i32>,
    pub amount: u32,
    /// Custom display name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lore: Vec<String>,
}

// ===========================================================================
// Lookup tables
// ===========================================================================

/// Material name -> canonical type.
pub type MaterialsData = BTreeMap<String, String>;

/// An item name entry. File order is significant.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemNameData {
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub meta: u32,
    pub name: String,
}
