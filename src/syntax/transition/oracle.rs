use std::collections::BTreeSet;

use super::{Action, ActionSource, Config, Error, State};
use crate::syntax::graph::{Edge, EdgeId, NodeId, Passage};

/// Computes the canonical action reproducing a target passage.
///
/// The target itself is never mutated; the oracle consumes its own sets of the units and
/// edges still to be produced. Structures disabled in the configuration (linkage, implicit
/// units, remote edges) are left out of those sets from the start.
#[derive(Debug, Clone)]
pub struct Oracle<'p> {
    passage: &'p Passage,
    config: Config,
    nodes_remaining: BTreeSet<NodeId>,
    edges_remaining: BTreeSet<EdgeId>,
}

impl<'p> Oracle<'p> {
    pub fn new(passage: &'p Passage, config: &Config) -> Self {
        let graph = passage.graph();
        let nodes_remaining = passage
            .units()
            .filter(|&id| {
                let node = graph.node(id);
                (config.linkage || !graph.is_linkage(id)) && (config.implicit || !node.is_implicit())
            })
            .collect();
        let edges_remaining = (0..graph.num_edges())
            .filter(|&id| {
                let edge = graph.edge(id);
                (config.linkage || !edge.tag().is_linkage())
                    && (config.implicit || !graph.node(edge.child()).is_implicit())
                    && (config.remote || !edge.is_remote())
            })
            .collect();
        Oracle {
            passage,
            config: config.clone(),
            nodes_remaining,
            edges_remaining,
        }
    }

    pub fn passage(&self) -> &'p Passage {
        self.passage
    }

    pub fn num_edges_remaining(&self) -> usize {
        self.edges_remaining.len()
    }

    pub fn num_nodes_remaining(&self) -> usize {
        self.nodes_remaining.len()
    }

    fn exhausted(&self, state: &State) -> Error {
        Error::OracleExhausted {
            state: state.to_string(),
        }
    }

    fn orig(&self, state: &State, id: NodeId) -> Result<NodeId, Error> {
        state.node(id).orig().ok_or_else(|| {
            Error::Invariant(format!(
                "node {} has no target counterpart ({})",
                state.node(id),
                state
            ))
        })
    }

    fn consume(&mut self, id: EdgeId) -> &'p Edge {
        self.edges_remaining.remove(&id);
        self.passage.graph().edge(id)
    }

    /// Next action for `state`; edges and units it creates are consumed immediately.
    pub fn get_action(&mut self, state: &State) -> Result<Action, Error> {
        if self.edges_remaining.is_empty() {
            return Ok(Action::finish());
        }
        let top = match state.stack_top() {
            Some(top) => top,
            None if state.is_buffer_empty() => return Err(self.exhausted(state)),
            None => return Ok(Action::shift()),
        };
        let passage = self.passage;
        let graph = passage.graph();
        let top_orig = self.orig(state, top)?;
        let node = graph.node(top_orig);
        let touching: Vec<EdgeId> = node
            .incoming()
            .iter()
            .chain(node.outgoing())
            .cloned()
            .filter(|id| self.edges_remaining.contains(id))
            .collect();
        if touching.is_empty() {
            return Ok(Action::reduce());
        }

        // A node counts as related only while an edge to it could be attached right away.
        let is_related = |id: NodeId| {
            let orig = match state.node(id).orig() {
                Some(orig) => orig,
                None => return false,
            };
            touching.iter().any(|&edge_id| {
                let edge = graph.edge(edge_id);
                let (other, parent, child) = if edge.child() == top_orig {
                    (edge.parent(), id, top)
                } else {
                    (edge.child(), top, id)
                };
                other == orig && (!edge.is_remote() || can_attach_remote(state, parent, child))
            })
        };

        if state.buffer_head().map_or(false, &is_related) {
            return Ok(Action::shift());
        }

        if let Some(second) = state.stack(1) {
            let second_orig = self.orig(state, second)?;
            let found = self.binary_edge(state, &touching, (top, top_orig), (second, second_orig));
            if let Some(id) = found {
                let edge = self.consume(id);
                let right = edge.child() == top_orig;
                let tag = edge.tag();
                return Ok(match (right, edge.is_remote()) {
                    (true, false) => Action::right_edge(tag),
                    (true, true) => Action::right_remote(tag),
                    (false, false) => Action::left_edge(tag),
                    (false, true) => Action::left_remote(tag),
                });
            }
        }

        let size = state.stack_size();
        let related_below = |depth: usize| {
            (depth..size).any(|pos| state.stack(pos).map_or(false, &is_related))
        };
        let mut distance = 0;
        while distance + 2 < size
            && !state.stack(distance + 1).map_or(false, &is_related)
            && related_below(distance + 2)
            && (self.config.compound_swap || distance < 1)
            && distance < self.config.max_swap
        {
            distance += 1;
        }
        for distance in (1..=distance).rev() {
            let action = if self.config.compound_swap {
                Action::swap(Some(distance))
            } else {
                Action::swap(None)
            };
            if state.is_allowed(&action) {
                return Ok(action);
            }
        }

        for &id in &touching {
            let edge = graph.edge(id);
            if edge.child() == top_orig
                && !edge.is_remote()
                && self.nodes_remaining.contains(&edge.parent())
            {
                self.consume(id);
                self.nodes_remaining.remove(&edge.parent());
                return Ok(Action::node(edge.tag()).with_orig(edge.parent()));
            }
        }
        for &id in &touching {
            let edge = graph.edge(id);
            if edge.parent() == top_orig
                && !edge.is_remote()
                && graph.node(edge.child()).is_implicit()
                && self.nodes_remaining.contains(&edge.child())
            {
                self.consume(id);
                self.nodes_remaining.remove(&edge.child());
                return Ok(Action::implicit(edge.tag()).with_orig(edge.child()));
            }
        }

        if state.is_buffer_empty() {
            Err(self.exhausted(state))
        } else {
            Ok(Action::shift())
        }
    }

    /// A remaining edge between the two topmost stack nodes, primary edges first.
    ///
    /// Remote edges are only offered once both endpoints already carry an edge.
    fn binary_edge(
        &self,
        state: &State,
        touching: &[EdgeId],
        (top, top_orig): (NodeId, NodeId),
        (second, second_orig): (NodeId, NodeId),
    ) -> Option<EdgeId> {
        let graph = self.passage.graph();
        let between = |id: &&EdgeId| {
            let edge = graph.edge(**id);
            (edge.parent() == second_orig && edge.child() == top_orig)
                || (edge.parent() == top_orig && edge.child() == second_orig)
        };
        let primary = touching
            .iter()
            .filter(&between)
            .find(|&&id| !graph.edge(id).is_remote());
        if let Some(&id) = primary {
            return Some(id);
        }
        touching
            .iter()
            .filter(&between)
            .find(|&&id| {
                let edge = graph.edge(id);
                let (parent, child) = if edge.child() == top_orig {
                    (second, top)
                } else {
                    (top, second)
                };
                can_attach_remote(state, parent, child)
            })
            .cloned()
    }
}

/// Remote edges need a parent that already heads a unit and a child that is already attached.
fn can_attach_remote(state: &State, parent: NodeId, child: NodeId) -> bool {
    !state.node(parent).outgoing().is_empty() && !state.node(child).incoming().is_empty()
}

impl<'p> ActionSource for Oracle<'p> {
    fn next_action(&mut self, state: &State) -> Result<Action, Error> {
        self.get_action(state)
    }
}
