//! Default `get_features` strategy

use crate::error::TermRankResult;
use crate::extension::{Flow, StageContext, Tokenizer};
use crate::graph::FeatureSequence;

/// Splits on single spaces. Empty fragments from leading, trailing or
/// repeated spaces are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceTokenizer;

impl Tokenizer for SpaceTokenizer {
    fn tokenize(
        &self,
        text: &str,
        features: &mut Option<FeatureSequence>,
        _ctx: &StageContext<'_>,
    ) -> TermRankResult<Flow> {
        *features = Some(text.split(' ').filter(|word| !word.is_empty()).collect());
        Ok(Flow::Continue)
    }
}
