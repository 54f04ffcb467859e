//! Stage strategy traits implemented by pipeline handlers
//!
//! One trait per extension point. Each handler receives the value the stage
//! operates on by mutable reference and returns a [`Flow`] telling the chain
//! whether to continue.

use super::{Flow, StageContext};
use crate::error::TermRankResult;
use crate::graph::{EdgeSink, FeatureSequence};
use crate::ranking::{RankedList, RankingAlgorithm};

/// `new_text`: may rewrite the raw input before anything else sees it.
pub trait TextHook: Send + Sync {
    fn on_new_text(&self, text: &mut String, ctx: &StageContext<'_>) -> TermRankResult<Flow>;
}

/// `clean_text`: normalizes the working copy of the text in place.
///
/// A language-specific cleaner that should fully replace the default either
/// registers with `replace` or returns [`Flow::Stop`].
pub trait Cleaner: Send + Sync {
    fn clean(&self, text: &mut String, ctx: &StageContext<'_>) -> TermRankResult<Flow>;
}

/// `get_features`: splits the cleaned text into an ordered feature sequence.
///
/// The handler fills `features`. Leaving the slot empty after the whole
/// chain ran is a [`ShapeError`](crate::ShapeError).
pub trait Tokenizer: Send + Sync {
    fn tokenize(
        &self,
        text: &str,
        features: &mut Option<FeatureSequence>,
        ctx: &StageContext<'_>,
    ) -> TermRankResult<Flow>;
}

/// `filter_features`: deletes unwanted entries.
///
/// Deletions leave gaps; the orchestrator compacts the sequence before the
/// graph is built.
pub trait FeatureFilter: Send + Sync {
    fn filter(&self, features: &mut FeatureSequence, ctx: &StageContext<'_>) -> TermRankResult<Flow>;
}

/// `build_graph`: turns the dense feature sequence into edges.
pub trait GraphBuilder: Send + Sync {
    fn build(
        &self,
        features: &[String],
        sink: &mut dyn EdgeSink,
        ctx: &StageContext<'_>,
    ) -> TermRankResult<Flow>;
}

/// `ranking_class`: selects the ranking algorithm for one call.
///
/// The default factory always installs PageRank, so a custom factory that
/// wants to keep its algorithm returns [`Flow::Stop`].
pub trait RankingFactory: Send + Sync {
    fn create(
        &self,
        slot: &mut Option<Box<dyn RankingAlgorithm>>,
        ctx: &StageContext<'_>,
    ) -> TermRankResult<Flow>;
}

/// `post_ranking`: may reshape the final ranked result.
pub trait PostProcessor: Send + Sync {
    fn process(&self, ranked: &mut RankedList, ctx: &StageContext<'_>) -> TermRankResult<Flow>;
}
