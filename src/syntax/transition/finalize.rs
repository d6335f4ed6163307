use super::{Error, State};
use crate::syntax::graph::{Graph, NodeId, Passage, Tag};

impl State {
    /// Assembles the finished graph.
    ///
    /// Units are numbered bottom-up by height (leaves first), ties broken by creation order.
    /// Primary edges come first, then remote edges, then linkage nodes. Structural violations
    /// abort when `assert_proper` is set; otherwise they are returned as warnings and the
    /// offending nodes are left out.
    pub fn create_passage(&self, assert_proper: bool) -> Result<(Passage, Vec<Error>), Error> {
        let graph = self.graph();
        let mut warnings = vec![];
        let mut violation = |msg: String| -> Result<(), Error> {
            if assert_proper {
                Err(Error::Structural(msg))
            } else {
                warnings.push(Error::Structural(msg));
                Ok(())
            }
        };

        let levels = heights(graph);
        let mut units: Vec<NodeId> = (self.num_tokens() + 1..graph.len()).collect();
        units.sort_by_key(|&id| (levels[id], id));

        let attached = primary_descendants(graph, self.root());
        let mut emitted = vec![];
        let mut linkages = vec![];
        for &id in &units {
            let node = graph.node(id);
            if graph.is_linkage(id) {
                linkages.push(id);
            } else if !attached[id] {
                violation(format!("unit {} is not attached to the root", node))?;
            } else if node.outgoing().is_empty() && !node.is_implicit() {
                violation(format!("unit {} has no children", node))?;
            } else {
                emitted.push(id);
            }
        }

        let mut passage = Passage::new(self.passage_id(), &self.tokens());
        let mut mapping: Vec<Option<NodeId>> = vec![None; graph.len()];
        mapping[self.root()] = Some(passage.root());
        for (&terminal, &out) in self.terminals().iter().zip(passage.terminals()) {
            mapping[terminal] = Some(out);
        }
        for &id in &emitted {
            mapping[id] = Some(passage.add_unit(graph.node(id).is_implicit()));
        }

        let root = self.root();
        for &id in emitted.iter().chain(std::iter::once(&root)) {
            for edge in graph.outgoing_edges(id).filter(|e| e.is_primary()) {
                if let (Some(parent), Some(child)) = (mapping[id], mapping[edge.child()]) {
                    passage.add_edge(parent, child, edge.tag(), false)?;
                }
            }
        }
        for edge in graph.edges().iter().filter(|e| e.is_remote()) {
            if let (Some(parent), Some(child)) = (mapping[edge.parent()], mapping[edge.child()]) {
                passage.add_edge(parent, child, edge.tag(), true)?;
            }
        }

        for id in linkages {
            let mut relations = vec![];
            let mut arguments = vec![];
            let mut dangling = false;
            for edge in graph.outgoing_edges(id) {
                match mapping[edge.child()] {
                    Some(child) if edge.tag() == Tag::LinkRelation => relations.push(child),
                    Some(child) => arguments.push(child),
                    None => dangling = true,
                }
            }
            let node = graph.node(id);
            if dangling {
                violation(format!("linkage {} refers to an omitted unit", node))?;
            } else if relations.len() != 1 || arguments.len() < 2 {
                violation(format!(
                    "linkage {} needs one relation and at least two arguments, found {} and {}",
                    node,
                    relations.len(),
                    arguments.len()
                ))?;
            } else {
                passage.add_linkage(relations[0], &arguments)?;
            }
        }

        Ok((passage, warnings))
    }
}

/// Longest path from each node down to a leaf.
fn heights(graph: &Graph) -> Vec<usize> {
    let mut levels: Vec<Option<usize>> = vec![None; graph.len()];
    for start in 0..graph.len() {
        let mut agenda = vec![(start, false)];
        while let Some((id, expanded)) = agenda.pop() {
            if levels[id].is_some() {
                continue;
            }
            if expanded {
                let level = graph
                    .outgoing_edges(id)
                    .map(|e| levels[e.child()].unwrap_or(0) + 1)
                    .max()
                    .unwrap_or(0);
                levels[id] = Some(level);
            } else {
                agenda.push((id, true));
                agenda.extend(
                    graph
                        .outgoing_edges(id)
                        .map(|e| e.child())
                        .filter(|&child| levels[child].is_none())
                        .map(|child| (child, false)),
                );
            }
        }
    }
    levels.into_iter().map(|l| l.unwrap_or(0)).collect()
}

fn primary_descendants(graph: &Graph, root: NodeId) -> Vec<bool> {
    let mut visited = vec![false; graph.len()];
    let mut agenda = vec![root];
    while let Some(id) = agenda.pop() {
        if visited[id] {
            continue;
        }
        visited[id] = true;
        agenda.extend(
            graph
                .outgoing_edges(id)
                .filter(|e| e.is_primary())
                .map(|e| e.child()),
        );
    }
    visited
}
