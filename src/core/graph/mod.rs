//! Graph module for deadlock detection
//!
//! This module contains the generic directed graph used to find wait-for cycles:
//! - Directed graph: vertices discovered from an edge list, dense adjacency storage
//! - Path: the reconstructed cycle, with borrowed edge data

pub(crate) mod directed_graph;

pub use directed_graph::{
    DEFAULT_EDGE_ARROW, DEFAULT_PROMPT, DEFAULT_TERMINATOR, EdgeDef, Graph, Path,
};
