//! TermRank: Graph-Based Keyword Extraction
//!
//! Ranks the terms of a text by building a co-occurrence graph over its
//! features and running damped iterative diffusion (PageRank) on it.
//!
//! # Core Concepts
//!
//! - **Stages**: Named extension points (`clean_text`, `get_features`, ...) bound to handlers
//! - **Features**: The ordered tokens that survive cleaning and filtering
//! - **Graph**: Directed edges between features within a window, multi-edges kept
//!
//! # Example
//!
//! ```no_run
//! use termrank::KeywordExtractor;
//!
//! let mut extractor = KeywordExtractor::new()?;
//! let ranked = extractor.add_text("The cat sat on the mat with another cat", Some("en"))?;
//! for keyword in ranked.top(3) {
//!     println!("{} {:.3}", keyword.term, keyword.score);
//! }
//! # Ok::<(), termrank::TermRankError>(())
//! ```

pub mod config;
pub mod error;
pub mod extension;
mod extractor;
pub mod graph;
pub mod ranking;
pub mod stages;
pub mod stopwords;

pub use config::ExtractorConfig;
pub use error::{ConfigurationError, ShapeError, TermRankError, TermRankResult, ValidationError};
pub use extension::{DefaultHandlers, ExtensionRegistry, Flow, Handler, Stage, StageContext};
pub use extractor::KeywordExtractor;
pub use graph::{EdgeSink, FeatureSequence, WindowGraphBuilder};
pub use ranking::{Convergence, Keyword, PageRank, RankedList, RankingAlgorithm, RankingConfig};
pub use stopwords::StopwordStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
