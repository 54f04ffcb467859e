//! Feature filters for `filter_features`

use crate::error::TermRankResult;
use crate::extension::{FeatureFilter, Flow, StageContext};
use crate::graph::FeatureSequence;
use crate::stopwords::StopwordStore;
use std::sync::Arc;
use tracing::debug;

/// Removes stopwords of the call's language. Without a language tag the
/// sequence is left untouched.
#[derive(Debug, Clone)]
pub struct StopwordFilter {
    store: Arc<StopwordStore>,
}

impl StopwordFilter {
    pub fn new(store: Arc<StopwordStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &StopwordStore {
        &self.store
    }
}

impl FeatureFilter for StopwordFilter {
    fn filter(&self, features: &mut FeatureSequence, ctx: &StageContext<'_>) -> TermRankResult<Flow> {
        let Some(lang) = ctx.lang() else {
            return Ok(Flow::Continue);
        };
        let stopwords = self.store.get(lang)?;
        let before = features.len();
        features.retain(|word| !stopwords.contains(word));
        debug!(lang, removed = before - features.len(), "stopwords removed");
        Ok(Flow::Continue)
    }
}

/// Removes features shorter than `min_chars` characters.
#[derive(Debug, Clone, Copy)]
pub struct MinLengthFilter {
    min_chars: usize,
}

impl MinLengthFilter {
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    pub fn min_chars(&self) -> usize {
        self.min_chars
    }
}

impl FeatureFilter for MinLengthFilter {
    fn filter(&self, features: &mut FeatureSequence, _ctx: &StageContext<'_>) -> TermRankResult<Flow> {
        features.retain(|word| word.chars().count() >= self.min_chars);
        Ok(Flow::Continue)
    }
}
