//! Ranking engine
//!
//! A ranking algorithm owns the graph for one text: the builder feeds it
//! edges through [`EdgeSink`], then [`RankingAlgorithm::calculate`] produces
//! the ranked terms. The default algorithm is damped iterative diffusion
//! ([`PageRank`]).

mod pagerank;

pub use pagerank::PageRank;

use crate::error::{TermRankResult, ValidationError};
use crate::graph::EdgeSink;
use serde::Serialize;

/// Default damping factor.
pub const DEFAULT_DAMPING: f64 = 0.85;
/// Default convergence threshold.
pub const DEFAULT_CONVERGENCE: f64 = 0.001;
/// Default cap on ranking sweeps.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// The ranking capability every algorithm provides.
pub trait RankingAlgorithm: EdgeSink + Send {
    /// Compute scores for every node touched by an edge.
    fn calculate(&mut self) -> TermRankResult<RankedList>;

    /// Number of distinct nodes in the graph.
    fn node_count(&self) -> usize;

    /// Number of accepted edges, multi-edges counted individually.
    fn edge_count(&self) -> usize;
}

/// Validated ranking parameters.
///
/// Every setter checks its contract before storing, so an invalid value
/// fails at configuration time rather than inside `calculate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingConfig {
    damping: f64,
    convergence: f64,
    max_iterations: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            convergence: DEFAULT_CONVERGENCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl RankingConfig {
    pub fn new(damping: f64, convergence: f64) -> Result<Self, ValidationError> {
        let mut config = Self::default();
        config.set_damping(damping)?;
        config.set_convergence(convergence)?;
        Ok(config)
    }

    /// Set the damping factor; must satisfy `0 < d <= 1`.
    pub fn set_damping(&mut self, damping: f64) -> Result<(), ValidationError> {
        if damping.is_nan() || damping <= 0.0 || damping > 1.0 {
            return Err(ValidationError::InvalidDamping(damping));
        }
        self.damping = damping;
        Ok(())
    }

    /// Set the convergence threshold; must be finite and `<= 1`.
    pub fn set_convergence(&mut self, convergence: f64) -> Result<(), ValidationError> {
        if !convergence.is_finite() || convergence > 1.0 {
            return Err(ValidationError::InvalidConvergence(convergence));
        }
        self.convergence = convergence;
        Ok(())
    }

    /// Set the sweep cap; must be at least 1.
    pub fn set_max_iterations(&mut self, max_iterations: usize) -> Result<(), ValidationError> {
        if max_iterations == 0 {
            return Err(ValidationError::InvalidMaxIterations(max_iterations));
        }
        self.max_iterations = max_iterations;
        Ok(())
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Result<Self, ValidationError> {
        self.set_max_iterations(max_iterations)?;
        Ok(self)
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }

    pub fn convergence(&self) -> f64 {
        self.convergence
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Score every node starts from.
    pub fn initial_score(&self) -> f64 {
        1.0 - self.damping
    }
}

/// How the sweep loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Convergence {
    /// The residual dropped below the threshold.
    Converged { iterations: usize, residual: f64 },
    /// The iteration cap was reached first; scores are from the last sweep.
    DidNotConverge { iterations: usize, residual: f64 },
}

impl Convergence {
    pub fn is_converged(&self) -> bool {
        matches!(self, Convergence::Converged { .. })
    }

    pub fn iterations(&self) -> usize {
        match self {
            Convergence::Converged { iterations, .. }
            | Convergence::DidNotConverge { iterations, .. } => *iterations,
        }
    }

    /// Root of the summed squared score change of the last sweep, over N.
    pub fn residual(&self) -> f64 {
        match self {
            Convergence::Converged { residual, .. }
            | Convergence::DidNotConverge { residual, .. } => *residual,
        }
    }
}

/// A scored term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyword {
    pub term: String,
    pub score: f64,
}

impl Keyword {
    pub fn new(term: impl Into<String>, score: f64) -> Self {
        Self {
            term: term.into(),
            score,
        }
    }
}

/// Terms ordered by descending score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedList {
    keywords: Vec<Keyword>,
    convergence: Convergence,
}

impl RankedList {
    /// Sort `scores` descending.
    ///
    /// The sort is stable, so equal scores keep the order given, which
    /// callers pass as first-seen node order.
    pub fn from_scores(scores: Vec<(String, f64)>, convergence: Convergence) -> Self {
        let mut keywords: Vec<Keyword> = scores
            .into_iter()
            .map(|(term, score)| Keyword::new(term, score))
            .collect();
        keywords.sort_by(|a, b| b.score.total_cmp(&a.score));
        Self {
            keywords,
            convergence,
        }
    }

    /// An empty result for a graph without edges.
    pub fn empty() -> Self {
        Self {
            keywords: Vec::new(),
            convergence: Convergence::Converged {
                iterations: 0,
                residual: 0.0,
            },
        }
    }

    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    /// Mutable access for post-processing stages.
    pub fn keywords_mut(&mut self) -> &mut Vec<Keyword> {
        &mut self.keywords
    }

    pub fn into_keywords(self) -> Vec<Keyword> {
        self.keywords
    }

    pub fn convergence(&self) -> Convergence {
        self.convergence
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Score of `term`, if it was ranked.
    pub fn score(&self, term: &str) -> Option<f64> {
        self.keywords.iter().find(|k| k.term == term).map(|k| k.score)
    }

    /// Terms in rank order.
    pub fn terms(&self) -> Vec<&str> {
        self.keywords.iter().map(|k| k.term.as_str()).collect()
    }

    /// The best `n` keywords.
    pub fn top(&self, n: usize) -> &[Keyword] {
        &self.keywords[..n.min(self.keywords.len())]
    }

    pub fn truncate(&mut self, n: usize) {
        self.keywords.truncate(n);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Keyword> {
        self.keywords.iter()
    }
}

impl IntoIterator for RankedList {
    type Item = Keyword;
    type IntoIter = std::vec::IntoIter<Keyword>;

    fn into_iter(self) -> Self::IntoIter {
        self.keywords.into_iter()
    }
}

impl<'a> IntoIterator for &'a RankedList {
    type Item = &'a Keyword;
    type IntoIter = std::slice::Iter<'a, Keyword>;

    fn into_iter(self) -> Self::IntoIter {
        self.keywords.iter()
    }
}
