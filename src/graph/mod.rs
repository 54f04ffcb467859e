//! Co-occurrence graph construction
//!
//! Features flow in as an ordered sequence; edges flow out through an
//! [`EdgeSink`], which is how the ranking engine's graph gets populated.

mod features;
mod window;


pub use features::FeatureSequence;
pub use window::{cooccurrence_edges, WindowGraphBuilder, DEFAULT_WINDOW};

/// Receives directed edges from a graph builder.
///
/// Multiple edges between the same ordered pair are allowed and are not
/// deduplicated; an edge from a node to itself must be rejected.
pub trait EdgeSink {
    /// Insert the edge `source → dest`.
    ///
    /// Returns `false` and leaves the graph untouched when the edge was
    /// rejected (self-loops).
    fn add_connection(&mut self, source: &str, dest: &str) -> bool;
}
