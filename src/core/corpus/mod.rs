pub mod aliases;
pub mod reader;

pub use aliases::KeyAliases;
pub use reader::{CorpusReader, CorpusSource};
