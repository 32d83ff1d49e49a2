pub mod loader;

pub use loader::{load_definition, parse_definition, DefinitionError};
