//! Ranking algorithm factory

use crate::error::TermRankResult;
use crate::extension::{Flow, RankingFactory, StageContext};
use crate::ranking::{PageRank, RankingAlgorithm, RankingConfig};

/// Installs a fresh [`PageRank`] in the ranking slot, replacing whatever an
/// earlier handler put there.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageRankFactory {
    config: RankingConfig,
}

impl PageRankFactory {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }
}

impl RankingFactory for PageRankFactory {
    fn create(
        &self,
        slot: &mut Option<Box<dyn RankingAlgorithm>>,
        _ctx: &StageContext<'_>,
    ) -> TermRankResult<Flow> {
        *slot = Some(Box::new(PageRank::new(self.config)));
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_the_slot_with_an_empty_graph() {
        let mut slot = None;
        PageRankFactory::default()
            .create(&mut slot, &StageContext::default())
            .unwrap();
        let algorithm = slot.unwrap();
        assert_eq!(algorithm.node_count(), 0);
        assert_eq!(algorithm.edge_count(), 0);
    }

    #[test]
    fn overwrites_an_existing_algorithm() {
        let mut existing = PageRank::default();
        crate::graph::EdgeSink::add_connection(&mut existing, "a", "b");
        let mut slot: Option<Box<dyn RankingAlgorithm>> = Some(Box::new(existing));

        PageRankFactory::default()
            .create(&mut slot, &StageContext::default())
            .unwrap();
        assert_eq!(slot.unwrap().node_count(), 0);
    }
}
