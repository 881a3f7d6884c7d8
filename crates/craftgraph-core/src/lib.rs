//! Craftgraph Core -- merges crafting recipe sources into one cross-referenced graph.
//!
//! A recipe source describes factories (crafting locations) and the recipes
//! they can run. This crate merges any number of sources into a single
//! [`graph::RecipeGraph`], deduplicating every material reference into one
//! canonical [`item::Item`] per (type, variant) pair.
//!
//! # Merge Pipeline
//!
//! Each call to [`merge::SourceMerger::add_recipe_source`] runs:
//!
//! 1. **Tables** -- Factories and recipes from the source replace same-keyed
//!    entries in the graph.
//! 2. **Link** -- Every factory's recipe list is checked against the recipe
//!    table. Dangling keys are dropped and reported; valid ones get a
//!    back-reference from the recipe to the factory.
//! 3. **Upgrades** -- Each UPGRADE recipe is assigned to the factory whose
//!    display name it targets. A second, different upgrade for the same
//!    factory aborts the merge.
//! 4. **Resolve** -- Every input/output line is resolved through the
//!    [`resolver::MaterialResolver`] and canonicalized into the item catalog.
//!    Output lines register the recipe as a source of the item.
//!
//! # Key Types
//!
//! - [`source::RecipeSource`] -- Validated input document.
//! - [`lookup::LookupTables`] -- Read-only material and item-name tables,
//!   injected into the resolver.
//! - [`graph::RecipeGraph`] -- Owned graph store. Recipes live in a slot
//!   arena; items and factories refer to them by [`id::RecipeId`].
//! - [`merge::MergeError`] -- Fatal merge failures.

pub mod graph;
pub mod id;
pub mod item;
pub mod lookup;
pub mod merge;
pub mod resolver;
pub mod source;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
