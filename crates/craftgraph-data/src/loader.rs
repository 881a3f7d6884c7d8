//! Loading pipeline: reads data files, validates sources, merges the graph.
//!
//! Provides format detection (RON/JSON/TOML/YAML), file discovery, and
//! deserialization helpers, plus [`load_recipe_graph`] which builds a fully
//! merged graph from a data directory.

use craftgraph_core::graph::RecipeGraph;
use craftgraph_core::lookup::LookupTables;
use craftgraph_core::merge::{MergeError, MergeReport, SourceMerger};
use craftgraph_core::source::{RecipeSource, SourceError};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::convert::{item_name_table_from_data, material_table_from_data, recipe_source_from_data};
use crate::schema::{ItemNameData, MaterialsData, RecipeSourceData};

/// Base name of the material table file.
pub const MATERIALS_FILE: &str = "materials";
/// Base name of the item name table file.
pub const ITEM_NAMES_FILE: &str = "item_names";
/// Base name of the file listing recipe sources in merge order.
pub const SOURCES_FILE: &str = "sources";

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A recipe source failed validation.
    #[error("invalid recipe source {file}: {source}")]
    InvalidSource { file: PathBuf, source: SourceError },

    /// Merging a recipe source failed.
    #[error("merge failed for {file}: {source}")]
    Merge { file: PathBuf, source: MergeError },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
    Yaml,
}

/// Extensions probed by [`find_data_file`], in probe order.
const EXTENSIONS: &[&str] = &["ron", "toml", "json", "yaml", "yml"];

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        Some("yaml" | "yml") => Ok(Format::Yaml),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in EXTENSIONS {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Deserialize `content` in the given format. `file` is only used for errors.
pub fn deserialize_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    file: &Path,
) -> Result<T, DataLoadError> {
    let parse_err = |detail: String| DataLoadError::Parse {
        file: file.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Yaml => serde_yaml::from_str(content).map_err(|e| parse_err(e.to_string())),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(&content, format, path)
}

/// Deserialize a list from a file. For TOML files, extracts the array at the
/// given `toml_key` from a top-level table. Other formats deserialize
/// directly as `Vec<T>`.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    if format != Format::Toml {
        return deserialize_str(&content, format, path);
    }

    let table: toml::Value = deserialize_str(&content, format, path)?;
    let array = table
        .get(toml_key)
        .ok_or_else(|| DataLoadError::Parse {
            file: path.to_path_buf(),
            detail: format!("missing key '{toml_key}' in TOML file"),
        })?
        .clone();
    array
        .try_into()
        .map_err(|e: toml::de::Error| DataLoadError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        })
}

// ===========================================================================
// Recipe sources and lookup tables
// ===========================================================================

/// Parse and validate a recipe source held in memory.
pub fn parse_recipe_source(
    content: &str,
    format: Format,
    file: &Path,
) -> Result<RecipeSource, DataLoadError> {
    let data: RecipeSourceData = deserialize_str(content, format, file)?;
    recipe_source_from_data(data).map_err(|source| DataLoadError::InvalidSource {
        file: file.to_path_buf(),
        source,
    })
}

/// Read, parse and validate a recipe source file.
pub fn load_recipe_source(path: &Path) -> Result<RecipeSource, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_recipe_source(&content, format, path)
}

/// Load `materials.*` and `item_names.*` from `dir`.
pub fn load_lookup_tables(dir: &Path) -> Result<LookupTables, DataLoadError> {
    let materials_path = require_data_file(dir, MATERIALS_FILE)?;
    let materials: MaterialsData = deserialize_file(&materials_path)?;

    let names_path = require_data_file(dir, ITEM_NAMES_FILE)?;
    let names: Vec<ItemNameData> = deserialize_list(&names_path, ITEM_NAMES_FILE)?;

    Ok(LookupTables::new(
        material_table_from_data(materials),
        item_name_table_from_data(names),
    ))
}

// ===========================================================================
// Full pipeline
// ===========================================================================

/// Lookup tables and the graph merged from every listed source.
#[derive(Debug)]
pub struct LoadedGraph {
    pub tables: LookupTables,
    pub graph: RecipeGraph,
    /// One report per source, in merge order.
    pub reports: Vec<(PathBuf, MergeReport)>,
}

/// Build a merged recipe graph from a data directory.
///
/// The directory must contain `materials.*`, `item_names.*` and
/// `sources.*`; the latter lists recipe source paths relative to `dir`,
/// merged in order. Any source failing to parse, validate or merge aborts
/// the load.
pub fn load_recipe_graph(dir: &Path) -> Result<LoadedGraph, DataLoadError> {
    let tables = load_lookup_tables(dir)?;

    let sources_path = require_data_file(dir, SOURCES_FILE)?;
    let source_files: Vec<String> = deserialize_list(&sources_path, SOURCES_FILE)?;

    let mut graph = RecipeGraph::new();
    let mut reports = Vec::with_capacity(source_files.len());
    {
        let merger = SourceMerger::new(&tables);
        for file in source_files {
            let path = dir.join(file);
            let source = load_recipe_source(&path)?;
            let report = merger
                .add_recipe_source(&mut graph, source)
                .map_err(|source| DataLoadError::Merge {
                    file: path.clone(),
                    source,
                })?;
            if !report.is_clean() {
                tracing::warn!(
                    file = %path.display(),
                    dropped = report.dropped.len(),
                    "recipe source references undefined recipes"
                );
            }
            reports.push((path, report));
        }
    }

    tracing::info!(
        factories = graph.factory_count(),
        recipes = graph.recipe_count(),
        items = graph.item_count(),
        "loaded recipe graph from {}",
        dir.display()
    );
    Ok(LoadedGraph {
        tables,
        graph,
        reports,
    })
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use craftgraph_core::id::ItemKey;
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "craftgraph_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Clean up a test directory.
    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    fn write_tables(dir: &Path) {
        fs::write(
            dir.join("materials.json"),
            r#"{"IRON_ORE": "IRON_ORE", "IRON_INGOT": "IRON_INGOT", "REDSTONE_LAMP_OFF": "LAMP"}"#,
        )
        .unwrap();
        fs::write(
            dir.join("item_names.toml"),
            r#"
[[item_names]]
type = "IRON_ORE"
name = "Iron Ore"

[[item_names]]
type = "IRON_INGOT"
meta = 0
name = "Iron Ingot"

[[item_names]]
type = "LAMP"
name = "Redstone Lamp"
"#,
        )
        .unwrap();
    }

    const SMELTER_JSON: &str = r#"{
        "factories": {"F1": {"name": "Smelter", "recipes": ["R1"]}},
        "recipes": {"R1": {
            "type": "CRAFT",
            "name": "Smelt Iron",
            "input": {"a": {"material": "IRON_ORE", "amount": 1}},
            "output": {"b": {"material": "IRON_INGOT", "amount": 1}}
        }}
    }"#;

    // -----------------------------------------------------------------------
    // detect_format
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_known_extensions() {
        assert_eq!(detect_format(Path::new("a.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("a.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("a.json")).unwrap(), Format::Json);
        assert_eq!(detect_format(Path::new("a.yaml")).unwrap(), Format::Yaml);
        assert_eq!(detect_format(Path::new("a.yml")).unwrap(), Format::Yaml);
    }

    #[test]
    fn detect_format_unsupported() {
        let result = detect_format(Path::new("recipes.xml"));
        assert!(matches!(
            result,
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
        assert!(detect_format(Path::new("recipes")).is_err());
    }

    // -----------------------------------------------------------------------
    // find_data_file / require_data_file
    // -----------------------------------------------------------------------

    #[test]
    fn find_data_file_found_yaml() {
        let dir = make_test_dir("find_yaml");
        fs::write(dir.join("sources.yml"), "[]").unwrap();

        let result = find_data_file(&dir, "sources").unwrap();
        assert_eq!(result, Some(dir.join("sources.yml")));

        cleanup(&dir);
    }

    #[test]
    fn find_data_file_conflict() {
        let dir = make_test_dir("find_conflict");
        fs::write(dir.join("materials.ron"), "{}").unwrap();
        fs::write(dir.join("materials.json"), "{}").unwrap();

        let result = find_data_file(&dir, "materials");
        assert!(matches!(
            result,
            Err(DataLoadError::ConflictingFormats { .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn require_data_file_missing() {
        let dir = make_test_dir("require_missing");

        let result = require_data_file(&dir, "materials");
        match result {
            Err(DataLoadError::MissingRequired { file, .. }) => assert_eq!(file, "materials"),
            other => panic!("expected MissingRequired, got: {other:?}"),
        }

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // Sources and tables
    // -----------------------------------------------------------------------

    #[test]
    fn parse_recipe_source_json() {
        let source = parse_recipe_source(SMELTER_JSON, Format::Json, Path::new("s.json")).unwrap();
        assert_eq!(source.factories["F1"].name, "Smelter");
        assert_eq!(source.recipes["R1"].input.len(), 1);
    }

    #[test]
    fn parse_recipe_source_invalid() {
        let result = parse_recipe_source(
            r#"{"recipes": {"UP": {"type": "UPGRADE", "name": "Upgrade"}}}"#,
            Format::Json,
            Path::new("bad.json"),
        );
        match result {
            Err(DataLoadError::InvalidSource { file, source }) => {
                assert_eq!(file, PathBuf::from("bad.json"));
                assert!(matches!(source, SourceError::MissingUpgradeTarget { .. }));
            }
            other => panic!("expected InvalidSource, got: {other:?}"),
        }
    }

    #[test]
    fn parse_recipe_source_syntax_error() {
        let result = parse_recipe_source("factories: [", Format::Yaml, Path::new("bad.yaml"));
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));
    }

    #[test]
    fn load_lookup_tables_mixed_formats() {
        let dir = make_test_dir("tables");
        write_tables(&dir);

        let tables = load_lookup_tables(&dir).unwrap();
        assert_eq!(tables.materials.len(), 3);
        assert_eq!(tables.item_names.len(), 3);

        cleanup(&dir);
    }

    #[test]
    fn deserialize_list_toml_missing_key() {
        let dir = make_test_dir("list_toml_missing");
        let path = dir.join("sources.toml");
        fs::write(&path, r#"foo = "bar""#).unwrap();

        let result: Result<Vec<String>, _> = deserialize_list(&path, "sources");
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // load_recipe_graph
    // -----------------------------------------------------------------------

    #[test]
    fn load_recipe_graph_merges_sources_in_order() {
        let dir = make_test_dir("graph_ok");
        write_tables(&dir);
        fs::write(dir.join("sources.json"), r#"["smelter.json", "lamps.yaml"]"#).unwrap();
        fs::write(dir.join("smelter.json"), SMELTER_JSON).unwrap();
        fs::write(
            dir.join("lamps.yaml"),
            r#"
factories:
  F1:
    name: Smelter
    recipes: [R1, R_LAMP, NOPE]
recipes:
  R_LAMP:
    type: CRAFT
    name: Light Lamp
    input:
      a: {material: IRON_INGOT, amount: 4}
    output:
      b: {material: REDSTONE_LAMP, amount: 1}
"#,
        )
        .unwrap();

        let loaded = load_recipe_graph(&dir).unwrap();
        let graph = &loaded.graph;
        assert_eq!(graph.sources_merged(), 2);
        assert_eq!(graph.recipe_count(), 2);
        assert!(graph.item(&ItemKey::new("LAMP", 0)).is_some());
        assert_eq!(
            graph.factory("F1").unwrap().recipes,
            vec!["R1".to_string(), "R_LAMP".to_string()]
        );

        assert_eq!(loaded.reports.len(), 2);
        assert!(loaded.reports[0].1.is_clean());
        assert_eq!(loaded.reports[1].1.dropped[0].recipe, "NOPE");

        cleanup(&dir);
    }

    #[test]
    fn load_recipe_graph_reports_merge_file() {
        let dir = make_test_dir("graph_merge_err");
        write_tables(&dir);
        fs::write(dir.join("sources.ron"), r#"["bad.json"]"#).unwrap();
        fs::write(
            dir.join("bad.json"),
            r#"{"recipes": {"R": {"type": "CRAFT", "name": "Gold",
                "input": {"a": {"material": "GOLD_ORE", "amount": 1}}}}}"#,
        )
        .unwrap();

        let result = load_recipe_graph(&dir);
        match result {
            Err(DataLoadError::Merge { file, source }) => {
                assert_eq!(file, dir.join("bad.json"));
                assert!(source.to_string().contains("GOLD_ORE"));
            }
            other => panic!("expected Merge, got: {other:?}"),
        }

        cleanup(&dir);
    }

    #[test]
    fn load_recipe_graph_requires_sources_file() {
        let dir = make_test_dir("graph_no_sources");
        write_tables(&dir);

        let result = load_recipe_graph(&dir);
        assert!(matches!(
            result,
            Err(DataLoadError::MissingRequired { ref file, .. }) if file == "sources"
        ));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // Error display messages
    // -----------------------------------------------------------------------

    #[test]
    fn error_display_messages() {
        let e = DataLoadError::MissingRequired {
            file: "materials".to_string(),
            dir: PathBuf::from("/data"),
        };
        assert!(format!("{e}").contains("materials"));
        assert!(format!("{e}").contains("/data"));

        let e = DataLoadError::InvalidSource {
            file: PathBuf::from("factories.yaml"),
            source: SourceError::MissingUpgradeTarget {
                recipe: "UP".to_string(),
            },
        };
        let msg = format!("{e}");
        assert!(msg.contains("factories.yaml"));
        assert!(msg.contains("UP"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let data_err: DataLoadError = io_err.into();
        assert!(matches!(data_err, DataLoadError::Io(_)));
    }
}
