//! Damped iterative diffusion over a co-occurrence multigraph
//!
//! One sweep updates every node that has incoming edges:
//!
//! ```text
//! new(v) = (1 - d) / N + d * Σ_{u ∈ In(v)} score(u) / out(u)
//! ```
//!
//! Nodes without incoming edges keep their score. The loop stops when
//! `sqrt(Σ (new - old)²) / N` drops below the convergence threshold, or at
//! the iteration cap.

use super::{Convergence, RankedList, RankingAlgorithm, RankingConfig};
use crate::error::{TermRankResult, ValidationError};
use crate::graph::EdgeSink;
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// PageRank over string-identified nodes.
///
/// Nodes are interned in first-seen order; that order breaks score ties in
/// the ranked result. `In(v)` lists one entry per edge, so edge
/// multiplicity weights a neighbor's contribution.
#[derive(Debug, Clone, Default)]
pub struct PageRank {
    config: RankingConfig,
    index: HashMap<String, usize>,
    names: Vec<String>,
    scores: Vec<f64>,
    out_degree: Vec<usize>,
    incoming: Vec<Vec<usize>>,
    /// Nodes with at least one incoming edge, in first-seen order
    destinations: Vec<usize>,
    edges: usize,
}

impl PageRank {
    pub fn new(config: RankingConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Change the damping factor before ranking.
    ///
    /// Scores of nodes already in the graph are reset to the new `1 - d`.
    pub fn set_damping(&mut self, damping: f64) -> Result<(), ValidationError> {
        self.config.set_damping(damping)?;
        let initial = self.config.initial_score();
        self.scores.iter_mut().for_each(|score| *score = initial);
        Ok(())
    }

    pub fn set_convergence(&mut self, convergence: f64) -> Result<(), ValidationError> {
        self.config.set_convergence(convergence)
    }

    pub fn contains(&self, node: &str) -> bool {
        self.index.contains_key(node)
    }

    /// Current score of `node`: `1 - d` before ranking, the ranked score after.
    pub fn score(&self, node: &str) -> Option<f64> {
        self.index.get(node).map(|&i| self.scores[i])
    }

    /// Number of edges inserted with `node` as source.
    pub fn out_degree(&self, node: &str) -> Option<usize> {
        self.index.get(node).map(|&i| self.out_degree[i])
    }

    /// Sources of the edges into `node`, one entry per edge.
    ///
    /// `None` when the node has no incoming edge.
    pub fn incoming(&self, node: &str) -> Option<Vec<&str>> {
        let &i = self.index.get(node)?;
        if self.incoming[i].is_empty() {
            return None;
        }
        Some(
            self.incoming[i]
                .iter()
                .map(|&u| self.names[u].as_str())
                .collect(),
        )
    }

    fn node(&mut self, name: &str) -> usize {
        if let Some(&i) = self.index.get(name) {
            return i;
        }
        let i = self.names.len();
        self.index.insert(name.to_string(), i);
        self.names.push(name.to_string());
        self.scores.push(self.config.initial_score());
        self.out_degree.push(0);
        self.incoming.push(Vec::new());
        i
    }

    /// One diffusion sweep from `current` into `next`; returns the residual.
    fn sweep(&self, current: &[f64], next: &mut [f64]) -> f64 {
        let n = current.len() as f64;
        let damping = self.config.damping();
        let teleport = (1.0 - damping) / n;

        next.copy_from_slice(current);
        for &v in &self.destinations {
            // A source in In(v) always has out-degree >= 1; zero-degree
            // entries are skipped rather than divided by.
            let inflow: f64 = self.incoming[v]
                .iter()
                .filter(|&&u| self.out_degree[u] > 0)
                .map(|&u| current[u] / self.out_degree[u] as f64)
                .sum();
            next[v] = teleport + damping * inflow;
        }

        let squared: f64 = next
            .iter()
            .zip(current)
            .map(|(new, old)| (new - old) * (new - old))
            .sum();
        squared.sqrt() / n
    }
}

impl EdgeSink for PageRank {
    fn add_connection(&mut self, source: &str, dest: &str) -> bool {
        if source == dest {
            return false;
        }
        let s = self.node(source);
        let d = self.node(dest);

        self.out_degree[s] += 1;
        if self.incoming[d].is_empty() {
            self.destinations.push(d);
        }
        self.incoming[d].push(s);
        self.edges += 1;
        true
    }
}

impl RankingAlgorithm for PageRank {
    fn calculate(&mut self) -> TermRankResult<RankedList> {
        let n = self.names.len();
        if n == 0 {
            debug!("empty graph, nothing to rank");
            return Ok(RankedList::empty());
        }

        let max_iterations = self.config.max_iterations();
        let threshold = self.config.convergence();
        let mut current = self.scores.clone();
        let mut next = vec![0.0; n];
        let mut iterations = 0;

        let convergence = loop {
            iterations += 1;
            let residual = self.sweep(&current, &mut next);
            std::mem::swap(&mut current, &mut next);
            trace!(iterations, residual, "ranking sweep");

            if residual < threshold {
                break Convergence::Converged {
                    iterations,
                    residual,
                };
            }
            if iterations >= max_iterations {
                warn!(
                    iterations,
                    residual, threshold, "ranking stopped at iteration cap without converging"
                );
                break Convergence::DidNotConverge {
                    iterations,
                    residual,
                };
            }
        };

        debug!(
            nodes = n,
            edges = self.edges,
            iterations = convergence.iterations(),
            "ranking finished"
        );
        self.scores = current;

        let scored = self
            .names
            .iter()
            .cloned()
            .zip(self.scores.iter().copied())
            .collect();
        Ok(RankedList::from_scores(scored, convergence))
    }

    fn node_count(&self) -> usize {
        self.names.len()
    }

    fn edge_count(&self) -> usize {
        self.edges
    }
}
