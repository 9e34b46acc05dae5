pub mod gemini;
pub mod generator;
pub mod prompt;

pub use gemini::GeminiClient;
pub use generator::{DigestGenerator, NO_RECENT_NEWS};
pub use prompt::{build_prompt, MAX_ARTICLES, SUMMARY_CHARS};

pub mod prelude {
    pub use crate::generator::DigestGenerator;
    pub use nd_core::{Article, Error, Result, Summarizer};
}
