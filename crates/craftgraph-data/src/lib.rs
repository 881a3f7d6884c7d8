pub mod convert;
pub mod loader;
pub mod schema;

pub use loader::{load_recipe_graph, DataLoadError, Format, LoadedGraph};
