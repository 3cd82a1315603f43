#![forbid(unsafe_code)]

//! Directed dependency multigraph with cycle policies.
//!
//! Nodes live in an arena indexed by [`NodeId`]; identity is the token's
//! normalized `domain:payload` key. Edges point from a source field to the
//! field that depends on it, so reachability from a changed field yields
//! the set of dependents to recompute.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::fmt;

use crate::token::{DependencyToken, Domain, TokenParseError};

/// Arena index of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Classification of a dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Structural relationship (layout, grouping, meta propagation).
    Structural,
    /// A computed column reading an upstream field.
    Computed,
}

/// One directed edge of the multigraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyEdge {
    /// Edge classification.
    pub kind: EdgeKind,
    /// The field being depended on.
    pub source: NodeId,
    /// The field that depends on `source`.
    pub target: NodeId,
}

/// What to do when a registration would close a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CyclePolicy {
    /// Fail the registration and leave the graph unmodified.
    #[default]
    Reject,
    /// Insert the edge anyway (callers planning SCC-based evaluation).
    Allow,
}

/// Dependency registration and lookup failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Inserting the edge would create a cycle under [`CyclePolicy::Reject`].
    CycleDetected {
        /// Normalized key of the edge's source token.
        source: String,
        /// Normalized key of the edge's dependent token.
        dependent: String,
    },
    /// A raw token failed to parse.
    Token(TokenParseError),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CycleDetected { source, dependent } => write!(
                f,
                "registering {source} -> {dependent} would create a dependency cycle"
            ),
            Self::Token(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for GraphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Token(err) => Some(err),
            Self::CycleDetected { .. } => None,
        }
    }
}

impl From<TokenParseError> for GraphError {
    fn from(err: TokenParseError) -> Self {
        Self::Token(err)
    }
}

/// Directed multigraph over dependency tokens.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<DependencyToken>,
    index: HashMap<String, NodeId>,
    edges: Vec<DependencyEdge>,
    adjacency: HashMap<NodeId, Vec<NodeId>>,
    cycle_policy: CyclePolicy,
    default_domain: Domain,
}

impl DependencyGraph {
    /// Empty graph with [`CyclePolicy::Reject`] and `field` fallback domain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the cycle policy.
    #[must_use]
    pub fn with_cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.cycle_policy = policy;
        self
    }

    /// Override the fallback domain for un-prefixed tokens.
    #[must_use]
    pub fn with_default_domain(mut self, domain: Domain) -> Self {
        self.default_domain = domain;
        self
    }

    /// Number of interned nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges, counting parallel edges separately.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The edges, in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// The token behind an arena index.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&DependencyToken> {
        self.nodes.get(id.0)
    }

    /// Register `dependent` as depending on `source`.
    ///
    /// Under [`CyclePolicy::Reject`] the insertion is checked first and a
    /// detected cycle fails with [`GraphError::CycleDetected`], leaving the
    /// graph exactly as it was — the rejected edge is never inserted and no
    /// new node is interned for it.
    pub fn register_dependency(
        &mut self,
        source: &str,
        dependent: &str,
        kind: EdgeKind,
    ) -> Result<(), GraphError> {
        let source = DependencyToken::parse(source, self.default_domain)?;
        let dependent = DependencyToken::parse(dependent, self.default_domain)?;
        let source_key = source.key();
        let dependent_key = dependent.key();

        if self.cycle_policy == CyclePolicy::Reject {
            if source_key == dependent_key {
                return Err(GraphError::CycleDetected {
                    source: source_key,
                    dependent: dependent_key,
                });
            }
            // A cycle needs a path dependent ->* source, which requires
            // both endpoints to already exist.
            if let (Some(&from), Some(&to)) = (
                self.index.get(&dependent_key),
                self.index.get(&source_key),
            ) && self.reaches(from, to)
            {
                return Err(GraphError::CycleDetected {
                    source: source_key,
                    dependent: dependent_key,
                });
            }
        }

        let source_id = self.intern(source);
        let target_id = self.intern(dependent);
        self.edges.push(DependencyEdge {
            kind,
            source: source_id,
            target: target_id,
        });
        self.adjacency.entry(source_id).or_default().push(target_id);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            source = %self.nodes[source_id.0],
            dependent = %self.nodes[target_id.0],
            ?kind,
            "dependency registered"
        );
        Ok(())
    }

    /// Transitive set of fields affected by changes to `changed`.
    ///
    /// Returns normalized keys of every reachable dependent; the changed
    /// fields themselves are not included unless they depend on each other.
    /// Tokens never registered simply contribute nothing.
    pub fn affected_fields<I, S>(&self, changed: I) -> Result<BTreeSet<String>, GraphError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let roots = self.resolve_roots(changed)?;
        let mut affected = BTreeSet::new();
        for id in self.closure(&roots) {
            if !roots.contains(&id) {
                affected.insert(self.nodes[id.0].key());
            }
        }
        Ok(affected)
    }

    /// Whether changing `changed` touches any of `dependency_fields`.
    ///
    /// The closure is taken inclusively — a field listed in both sets
    /// matches even without a registered edge.
    pub fn affects_any<I, S, J, T>(&self, changed: I, dependency_fields: J) -> Result<bool, GraphError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        J: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut changed_keys = BTreeSet::new();
        let mut roots = Vec::new();
        for raw in changed {
            let token = DependencyToken::parse(raw.as_ref(), self.default_domain)?;
            let key = token.key();
            if let Some(&id) = self.index.get(&key) {
                roots.push(id);
            }
            changed_keys.insert(key);
        }
        let closure: BTreeSet<String> = self
            .closure(&roots)
            .into_iter()
            .map(|id| self.nodes[id.0].key())
            .collect();

        for raw in dependency_fields {
            let key = DependencyToken::parse(raw.as_ref(), self.default_domain)?.key();
            if changed_keys.contains(&key) || closure.contains(&key) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn resolve_roots<I, S>(&self, changed: I) -> Result<Vec<NodeId>, GraphError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roots = Vec::new();
        for raw in changed {
            let token = DependencyToken::parse(raw.as_ref(), self.default_domain)?;
            if let Some(&id) = self.index.get(&token.key()) {
                roots.push(id);
            }
        }
        Ok(roots)
    }

    /// Breadth-first closure over the adjacency lists.
    fn closure(&self, roots: &[NodeId]) -> Vec<NodeId> {
        let mut seen = vec![false; self.nodes.len()];
        let mut queue: VecDeque<NodeId> = roots.iter().copied().collect();
        let mut out = Vec::new();
        while let Some(id) = queue.pop_front() {
            let Some(next) = self.adjacency.get(&id) else {
                continue;
            };
            for &dep in next {
                if !seen[dep.0] {
                    seen[dep.0] = true;
                    out.push(dep);
                    queue.push_back(dep);
                }
            }
        }
        out
    }

    /// Depth-first reachability with an explicit stack.
    fn reaches(&self, from: NodeId, to: NodeId) -> bool {
        if from == to {
            return true;
        }
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![from];
        seen[from.0] = true;
        while let Some(id) = stack.pop() {
            let Some(next) = self.adjacency.get(&id) else {
                continue;
            };
            for &dep in next {
                if dep == to {
                    return true;
                }
                if !seen[dep.0] {
                    seen[dep.0] = true;
                    stack.push(dep);
                }
            }
        }
        false
    }

    fn intern(&mut self, token: DependencyToken) -> NodeId {
        let key = token.key();
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(token);
        self.index.insert(key, id);
        id
    }
}
