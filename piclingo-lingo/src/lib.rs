//! piclingo-lingo: translation service client
//!
//! Implements the `Translator` seam of piclingo-core against the public
//! Google "gtx" endpoint used by browser extensions. One GET per call; no
//! caching and no retries.

pub mod error;
pub mod google;

pub use error::TranslateError;
pub use google::GoogleTranslator;
