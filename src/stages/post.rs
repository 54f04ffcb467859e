//! Post-ranking reshaping

use crate::error::TermRankResult;
use crate::extension::{Flow, PostProcessor, StageContext};
use crate::ranking::RankedList;

/// Keeps only the best `n` keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopN(pub usize);

impl PostProcessor for TopN {
    fn process(&self, ranked: &mut RankedList, _ctx: &StageContext<'_>) -> TermRankResult<Flow> {
        ranked.truncate(self.0);
        Ok(Flow::Continue)
    }
}
