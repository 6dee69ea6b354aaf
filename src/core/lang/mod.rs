pub mod codec;
pub mod model;

pub use codec::CodecError;
pub use model::{LangCase, LangDialect, LanguageCode, LanguageFile, TranslationEntry};
