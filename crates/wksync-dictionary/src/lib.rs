pub mod index;
pub mod loader;
pub mod types;

pub use index::{DefinitionIndex, IndexOptions};
pub use loader::{DictionaryError, load_words};
pub use types::{JmdictDocument, JmdictWord};
