//! Source merging: the only place the graph is mutated.
//!
//! Cross-references (`in_factories`, `upgrade_recipe`) are derived data.
//! Every merge re-derives them over the whole graph, so merging sources out
//! of order, or merging the same source twice, leaves exactly one
//! back-reference per (factory, recipe) pair. Item `recipe_sources` never
//! hold the same recipe twice. A recipe key that is overwritten is removed
//! from the items its replacement no longer outputs.
//!
//! A fatal error aborts the call with the graph partially merged: tables
//! are already replaced and recipes before the failing one are resolved.
//! Upgrade assignments are only committed once every recipe has passed, so
//! factories keep their previous upgrade recipe on failure. Callers that
//! need atomicity should merge into a clone.

use crate::graph::{Factory, Recipe, RecipeGraph};
use crate::id::{ItemKey, RecipeId};
use crate::lookup::LookupTables;
use crate::resolver::{MaterialResolver, ResolveError};
use crate::source::RecipeSource;
use std::collections::{BTreeMap, BTreeSet};

// ===========================================================================
// Errors and reports
// ===========================================================================

/// Fatal merge failures. The in-progress merge is abandoned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    /// A recipe line could not be resolved.
    #[error("in recipe '{recipe}' ({name}): {source}")]
    Resolve {
        recipe: String,
        name: String,
        source: ResolveError,
    },

    /// A factory already has a different upgrade recipe.
    #[error(
        "upgrade recipe already set for factory '{factory}' ({factory_name}): \
         '{existing}' conflicts with '{incoming}'"
    )]
    UpgradeConflict {
        factory: String,
        factory_name: String,
        existing: String,
        incoming: String,
    },

    /// An upgrade recipe targets a factory name no factory carries.
    #[error("upgrade recipe '{recipe}' targets unknown factory '{factory_name}'")]
    UnknownUpgradeTarget { recipe: String, factory_name: String },
}

/// A factory entry naming a recipe that does not exist. Dropped from the
/// factory's recipe list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingRecipe {
    pub factory: String,
    pub recipe: String,
    /// Rendering of the factory at the time the entry was dropped.
    pub context: String,
}

/// Recoverable problems found during one merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub dropped: Vec<DanglingRecipe>,
}

impl MergeReport {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }
}

// ===========================================================================
// Merger
// ===========================================================================

/// Merges recipe sources into a [`RecipeGraph`] using injected lookup tables.
#[derive(Debug, Clone, Copy)]
pub struct SourceMerger<'t> {
    resolver: MaterialResolver<'t>,
}

impl<'t> SourceMerger<'t> {
    pub fn new(tables: &'t LookupTables) -> Self {
        Self {
            resolver: MaterialResolver::new(tables),
        }
    }

    pub fn resolver(&self) -> &MaterialResolver<'t> {
        &self.resolver
    }

    /// Merge one source into `graph`.
    ///
    /// Same-keyed factories and recipes are replaced wholesale. Callers must
    /// serialize merges into the same graph.
    pub fn add_recipe_source(
        &self,
        graph: &mut RecipeGraph,
        source: RecipeSource,
    ) -> Result<MergeReport, MergeError> {
        let factory_count = source.factories.len();
        let recipe_count = source.recipes.len();

        let replaced = merge_tables(graph, source);
        let report = link_factories(graph);

        let recipes: Vec<(String, RecipeId)> = graph
            .recipe_keys
            .iter()
            .map(|(key, &id)| (key.clone(), id))
            .collect();
        let mut upgrades = BTreeMap::new();
        for (key, id) in recipes {
            assign_upgrade(graph, &mut upgrades, &key, id)?;
            self.resolve_recipe(graph, id, replaced.contains(&id))?;
        }
        for factory in graph.factories.values_mut() {
            factory.upgrade_recipe = upgrades.get(&factory.key).copied();
        }

        graph.sources_merged += 1;
        tracing::debug!(
            factories = factory_count,
            recipes = recipe_count,
            dropped = report.dropped.len(),
            items = graph.items.len(),
            "merged recipe source"
        );
        Ok(report)
    }

    /// Resolve and canonicalize every line of one recipe, then register the
    /// recipe as a source of each output item. A `replaced` recipe is also
    /// dropped from items only its previous definition produced.
    fn resolve_recipe(
        &self,
        graph: &mut RecipeGraph,
        id: RecipeId,
        replaced: bool,
    ) -> Result<(), MergeError> {
        let Some(recipe) = graph.recipe_arena.get_mut(id) else {
            return Ok(());
        };
        let Recipe {
            key,
            name,
            input,
            output,
            ..
        } = recipe;

        for line in input.iter_mut().chain(output.iter_mut().flatten()) {
            let resolved = self
                .resolver
                .resolve(line)
                .map_err(|source| MergeError::Resolve {
                    recipe: key.clone(),
                    name: name.clone(),
                    source,
                })?;
            graph.items.canonicalize(line, &resolved);
            line.resolved = Some(resolved);
        }

        let produced: BTreeSet<ItemKey> = output
            .iter()
            .flatten()
            .filter_map(|line| line.item_key())
            .collect();
        if replaced {
            graph.items.prune_recipe_source(id, &produced);
        }
        for item_key in &produced {
            graph.items.add_recipe_source(item_key, id);
        }
        Ok(())
    }
}

// ===========================================================================
// Merge steps
// ===========================================================================

/// Replace same-keyed factories and recipes. Recipe keys keep their arena
/// slot so existing `RecipeId`s stay valid. Returns the overwritten ids.
fn merge_tables(graph: &mut RecipeGraph, source: RecipeSource) -> BTreeSet<RecipeId> {
    let mut replaced = BTreeSet::new();
    for (key, def) in source.factories {
        graph
            .factories
            .insert(key.clone(), Factory::from_def(key, def));
    }
    for (key, def) in source.recipes {
        let recipe = Recipe::from_def(key.clone(), def);
        match graph.recipe_keys.get(&key) {
            Some(&id) => {
                graph.recipe_arena[id] = recipe;
                replaced.insert(id);
            }
            None => {
                let id = graph.recipe_arena.insert(recipe);
                graph.recipe_keys.insert(key, id);
            }
        }
    }
    replaced
}

/// Rebuild `in_factories` for every recipe. Factory entries naming unknown
/// recipes are dropped and reported.
fn link_factories(graph: &mut RecipeGraph) -> MergeReport {
    let mut report = MergeReport::default();
    for recipe in graph.recipe_arena.values_mut() {
        recipe.in_factories.clear();
    }

    for factory in graph.factories.values_mut() {
        let mut kept = Vec::with_capacity(factory.recipes.len());
        for recipe_key in &factory.recipes {
            match graph.recipe_keys.get(recipe_key) {
                Some(&id) => {
                    let recipe = &mut graph.recipe_arena[id];
                    if !recipe.in_factories.contains(&factory.key) {
                        recipe.in_factories.push(factory.key.clone());
                    }
                    kept.push(recipe_key.clone());
                }
                None => {
                    let context = factory.to_string();
                    tracing::warn!(
                        factory = %factory.key,
                        recipe = %recipe_key,
                        "undefined recipe {recipe_key} in {context}"
                    );
                    report.dropped.push(DanglingRecipe {
                        factory: factory.key.clone(),
                        recipe: recipe_key.clone(),
                        context,
                    });
                }
            }
        }
        factory.recipes = kept;
    }
    report
}

/// Record an UPGRADE recipe against its target factory in `upgrades`
/// (factory key -> recipe). Downgrades and plain crafts are skipped.
fn assign_upgrade(
    graph: &RecipeGraph,
    upgrades: &mut BTreeMap<String, RecipeId>,
    key: &str,
    id: RecipeId,
) -> Result<(), MergeError> {
    let Some(target) = graph
        .recipe_arena
        .get(id)
        .and_then(|recipe| recipe.kind.upgrade_target())
        .map(str::to_string)
    else {
        return Ok(());
    };

    let factory = graph
        .factories
        .values()
        .find(|f| f.name == target)
        .ok_or_else(|| MergeError::UnknownUpgradeTarget {
            recipe: key.to_string(),
            factory_name: target.clone(),
        })?;

    match upgrades.get(&factory.key) {
        Some(&existing) if existing != id => {
            let existing = graph
                .recipe_arena
                .get(existing)
                .map(|r| r.key.clone())
                .unwrap_or_default();
            Err(MergeError::UpgradeConflict {
                factory: factory.key.clone(),
                factory_name: factory.name.clone(),
                existing,
                incoming: key.to_string(),
            })
        }
        _ => {
            upgrades.insert(factory.key.clone(), id);
            Ok(())
        }
    }
}
