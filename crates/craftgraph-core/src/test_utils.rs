//! Shared test helpers for unit and integration tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`. Provides a
//! synthetic set of lookup tables and short constructors for sources.

use crate::graph::RecipeGraph;
use crate::id::MaterialType;
use crate::lookup::{ItemMeta, ItemNameTable, LookupTables, MaterialTable};
use crate::merge::{MergeError, MergeReport, SourceMerger};
use crate::source::{FactoryDef, RecipeDef, RecipeItemRef, RecipeSource};

// ===========================================================================
// Lookup tables
// ===========================================================================

/// Materials known to [`sample_tables`]. `REDSTONE_LAMP` is deliberately
/// absent; `BEDROCK` has a type but no item names.
pub const SAMPLE_MATERIALS: &[&str] = &[
    "IRON_ORE",
    "IRON_INGOT",
    "GOLD_ORE",
    "GOLD_INGOT",
    "COAL",
    "STONE",
    "DIAMOND",
    "WOOL",
    "PAPER",
    "REDSTONE_LAMP_OFF",
    "BEDROCK",
];

pub fn sample_tables() -> LookupTables {
    let materials: MaterialTable = SAMPLE_MATERIALS
        .iter()
        .map(|&m| (m, MaterialType::new(m)))
        .collect();

    let item_names = ItemNameTable::new(vec![
        ItemMeta::new("IRON_ORE", 0, "Iron Ore"),
        ItemMeta::new("IRON_INGOT", 0, "Iron Ingot"),
        ItemMeta::new("GOLD_ORE", 0, "Gold Ore"),
        ItemMeta::new("GOLD_INGOT", 0, "Gold Ingot"),
        ItemMeta::new("COAL", 0, "Coal"),
        ItemMeta::new("COAL", 1, "Charcoal"),
        ItemMeta::new("STONE", 0, "Stone"),
        ItemMeta::new("DIAMOND", 0, "Diamond"),
        ItemMeta::new("WOOL", 0, "White Wool"),
        ItemMeta::new("WOOL", 1, "Orange Wool"),
        ItemMeta::new("WOOL", 14, "Red Wool"),
        ItemMeta::new("PAPER", 0, "Paper"),
        ItemMeta::new("REDSTONE_LAMP_OFF", 0, "Redstone Lamp"),
    ]);

    LookupTables::new(materials, item_names)
}

// ===========================================================================
// Source constructors
// ===========================================================================

pub fn line(slot: &str, material: &str, amount: u32) -> RecipeItemRef {
    RecipeItemRef::new(slot, material, amount)
}

pub fn factory(key: &str, name: &str, recipes: &[&str]) -> FactoryDef {
    FactoryDef::new(key, name, recipes.iter().map(|r| r.to_string()).collect())
        .expect("test factory should be valid")
}

/// A `CRAFT` recipe. An empty output list means no output section.
pub fn craft(
    key: &str,
    name: &str,
    input: Vec<RecipeItemRef>,
    output: Vec<RecipeItemRef>,
) -> RecipeDef {
    let output = (!output.is_empty()).then_some(output);
    RecipeDef::new(key, "CRAFT", name, None, input, output).expect("test recipe should be valid")
}

pub fn upgrade(key: &str, name: &str, target: &str, input: Vec<RecipeItemRef>) -> RecipeDef {
    RecipeDef::new(key, "UPGRADE", name, Some(target), input, None)
        .expect("test upgrade should be valid")
}

pub fn downgrade(key: &str, name: &str, target: &str) -> RecipeDef {
    RecipeDef::new(
        key,
        "UPGRADE",
        name,
        Some(target),
        vec![line("i", "STONE", 8)],
        None,
    )
    .expect("test downgrade should be valid")
}

/// `F1` "Smelter" running `R1`: 1 iron ore -> 1 iron ingot.
pub fn smelter_source() -> RecipeSource {
    RecipeSource::new()
        .with_factory("F1", factory("F1", "Smelter", &["R1"]))
        .with_recipe(
            "R1",
            craft(
                "R1",
                "Smelt Iron",
                vec![line("a", "IRON_ORE", 1)],
                vec![line("b", "IRON_INGOT", 1)],
            ),
        )
}

/// [`smelter_source`] plus a "Forge" factory (`F2`) that the Smelter can
/// be upgraded into with `UP1`.
pub fn upgrade_source() -> RecipeSource {
    smelter_source()
        .with_factory("F1", factory("F1", "Smelter", &["R1", "UP1"]))
        .with_factory("F2", factory("F2", "Forge", &[]))
        .with_recipe(
            "UP1",
            upgrade(
                "UP1",
                "Upgrade to Forge",
                "Forge",
                vec![line("a", "IRON_INGOT", 64), line("b", "COAL", 32)],
            ),
        )
}

/// Merge `source` into `graph` with a fresh merger over `tables`.
pub fn merge_into(
    graph: &mut RecipeGraph,
    tables: &LookupTables,
    source: RecipeSource,
) -> Result<MergeReport, MergeError> {
    SourceMerger::new(tables).add_recipe_source(graph, source)
}
