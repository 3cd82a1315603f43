#![forbid(unsafe_code)]

//! Field dependency graph.
//!
//! Derived grid columns recompute only when an upstream field changes. The
//! graph tracks those relationships as a directed multigraph over
//! domain-qualified tokens (`field:…`, `computed:…`, `meta:…`), built once
//! at grid configuration time and mutated only through explicit
//! registration calls.

pub mod graph;
pub mod token;

pub use graph::{CyclePolicy, DependencyEdge, DependencyGraph, EdgeKind, GraphError, NodeId};
pub use token::{Domain, DependencyToken, TokenParseError};
