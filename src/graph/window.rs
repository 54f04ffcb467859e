//! Sliding-window co-occurrence builder

use super::EdgeSink;
use crate::error::{TermRankResult, ValidationError};
use crate::extension::{Flow, GraphBuilder, StageContext};
use tracing::debug;

/// Default co-occurrence window radius.
pub const DEFAULT_WINDOW: usize = 3;

/// Emit one directed edge per ordered neighbor pair within `radius`.
///
/// For every position `i`, each position `j` with `0 < |i - j| <= radius`
/// yields the edge `features[i] → features[j]`. Running over every `i`
/// makes the edge multiset symmetric in aggregate; repeated co-occurrence
/// shows up as edge multiplicity. Returns the number of edges the sink
/// accepted.
pub fn cooccurrence_edges(features: &[String], radius: usize, sink: &mut dyn EdgeSink) -> usize {
    let n = features.len();
    let mut accepted = 0;
    if n == 0 {
        return accepted;
    }

    for i in 0..n {
        let lo = i.saturating_sub(radius);
        let hi = i.saturating_add(radius).min(n - 1);
        for j in lo..=hi {
            if j != i && sink.add_connection(&features[i], &features[j]) {
                accepted += 1;
            }
        }
    }

    accepted
}

/// The default `build_graph` strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGraphBuilder {
    radius: usize,
}

impl WindowGraphBuilder {
    pub fn new(radius: usize) -> Result<Self, ValidationError> {
        if radius == 0 {
            return Err(ValidationError::InvalidWindow(radius));
        }
        Ok(Self { radius })
    }

    pub fn radius(&self) -> usize {
        self.radius
    }
}

impl Default for WindowGraphBuilder {
    fn default() -> Self {
        Self {
            radius: DEFAULT_WINDOW,
        }
    }
}

impl GraphBuilder for WindowGraphBuilder {
    fn build(
        &self,
        features: &[String],
        sink: &mut dyn EdgeSink,
        _ctx: &StageContext<'_>,
    ) -> TermRankResult<Flow> {
        let accepted = cooccurrence_edges(features, self.radius, sink);
        debug!(
            features = features.len(),
            radius = self.radius,
            edges = accepted,
            "co-occurrence graph built"
        );
        Ok(Flow::Continue)
    }
}
