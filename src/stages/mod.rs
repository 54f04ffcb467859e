//! Default stage strategies
//!
//! The handlers a [`KeywordExtractor`](crate::KeywordExtractor) binds as
//! defaults, plus optional ones callers register themselves.

mod clean;
mod filter;
mod post;
mod rank;
mod tokenize;

pub use clean::{AlphabetCleaner, ASCII_ALPHABET};
pub use filter::{MinLengthFilter, StopwordFilter};
pub use post::TopN;
pub use rank::PageRankFactory;
pub use tokenize::SpaceTokenizer;
