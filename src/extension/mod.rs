//! Named, overridable pipeline extension points
//!
//! Every pipeline stage is bound through an extension point. Handlers
//! registered in an [`ExtensionRegistry`] run first, in registration order;
//! then the extractor's default for that stage runs, unless a handler
//! returned [`Flow::Stop`].

mod registry;
mod traits;

pub use registry::{DefaultHandlers, ExtensionRegistry, Handler};
pub use traits::{
    Cleaner, FeatureFilter, GraphBuilder, PostProcessor, RankingFactory, TextHook, Tokenizer,
};

pub(crate) use registry::invoke;

use crate::error::ConfigurationError;
use std::fmt;
use std::str::FromStr;

/// The fixed set of extension points, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    NewText,
    CleanText,
    GetFeatures,
    FilterFeatures,
    RankingClass,
    BuildGraph,
    PostRanking,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::NewText,
        Stage::CleanText,
        Stage::GetFeatures,
        Stage::FilterFeatures,
        Stage::RankingClass,
        Stage::BuildGraph,
        Stage::PostRanking,
    ];

    /// The exact name a handler must be bound under.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::NewText => "new_text",
            Stage::CleanText => "clean_text",
            Stage::GetFeatures => "get_features",
            Stage::FilterFeatures => "filter_features",
            Stage::RankingClass => "ranking_class",
            Stage::BuildGraph => "build_graph",
            Stage::PostRanking => "post_ranking",
        }
    }

    /// Whether the pipeline aborts when nothing handles this stage.
    pub fn is_required(&self) -> bool {
        matches!(self, Stage::GetFeatures | Stage::BuildGraph)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .iter()
            .copied()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| ConfigurationError::UnknownStage(s.to_string()))
    }
}

/// Outcome of a single handler invocation.
///
/// `Stop` ends the chain for the current call: later registered handlers and
/// the stage default are skipped. It is a normal short-circuit, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    #[default]
    Continue,
    Stop,
}

/// Per-call information handed to every stage handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct StageContext<'a> {
    lang: Option<&'a str>,
}

impl<'a> StageContext<'a> {
    pub fn new(lang: Option<&'a str>) -> Self {
        Self { lang }
    }

    /// Language tag of the text being processed, if any.
    pub fn lang(&self) -> Option<&'a str> {
        self.lang
    }
}
