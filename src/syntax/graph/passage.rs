use std::convert::TryFrom;

use serde_derive::{Deserialize, Serialize};

use super::{EdgeId, Error, Graph, Node, NodeId, Tag};
use crate::lang::{Token, Tokenized};

/// A complete graph over a token sequence.
///
/// Node 0 is the root, nodes `1..=n` are the terminals in token order and every later node is
/// a unit (non-terminal). Used both as the oracle's target and as the parser's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PassageData", into = "PassageData")]
pub struct Passage {
    id: String,
    root: NodeId,
    terminals: Vec<NodeId>,
    graph: Graph,
}

impl Passage {
    pub fn new<S: Into<String>, T: Tokenized>(id: S, tokens: &[T]) -> Self {
        let mut graph = Graph::with_capacity(2 * tokens.len() + 1);
        let root = graph.add_unit(false);
        let terminals = tokens.iter().map(|t| graph.add_terminal(t)).collect();
        Passage {
            id: id.into(),
            root,
            terminals,
            graph,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn terminals(&self) -> &[NodeId] {
        &self.terminals
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn node(&self, id: NodeId) -> &Node {
        self.graph.node(id)
    }

    pub fn tokens(&self) -> Vec<Token> {
        self.terminals
            .iter()
            .map(|&id| {
                let node = self.graph.node(id);
                Token::new(node.text().unwrap_or(""), node.is_punct(), node.paragraph())
            })
            .collect()
    }

    /// Ids of all non-terminal nodes except the root, in creation order.
    pub fn units(&self) -> impl Iterator<Item = NodeId> {
        (self.terminals.len() + 1)..self.graph.len()
    }

    pub fn add_unit(&mut self, implicit: bool) -> NodeId {
        self.graph.add_unit(implicit)
    }

    pub fn add_edge(
        &mut self,
        parent: NodeId,
        child: NodeId,
        tag: Tag,
        remote: bool,
    ) -> Result<EdgeId, Error> {
        self.graph.add_edge(parent, child, tag, remote)
    }

    /// Adds a linkage node relating `relation` to `arguments`.
    pub fn add_linkage(&mut self, relation: NodeId, arguments: &[NodeId]) -> Result<NodeId, Error> {
        let linkage = self.graph.add_unit(false);
        self.graph
            .add_edge(linkage, relation, Tag::LinkRelation, false)?;
        for &argument in arguments {
            self.graph
                .add_edge(linkage, argument, Tag::LinkArgument, false)?;
        }
        Ok(linkage)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PassageData {
    id: String,
    tokens: Vec<Token>,
    #[serde(default)]
    units: Vec<UnitData>,
    #[serde(default)]
    edges: Vec<EdgeData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UnitData {
    #[serde(default)]
    implicit: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EdgeData {
    parent: NodeId,
    child: NodeId,
    tag: Tag,
    #[serde(default)]
    remote: bool,
}

impl TryFrom<PassageData> for Passage {
    type Error = Error;

    fn try_from(data: PassageData) -> Result<Passage, Error> {
        let mut passage = Passage::new(data.id, &data.tokens);
        for unit in &data.units {
            passage.add_unit(unit.implicit);
        }
        for edge in &data.edges {
            passage.add_edge(edge.parent, edge.child, edge.tag, edge.remote)?;
        }
        Ok(passage)
    }
}

impl From<Passage> for PassageData {
    fn from(passage: Passage) -> PassageData {
        let tokens = passage.tokens();
        let units = passage
            .units()
            .map(|id| UnitData {
                implicit: passage.graph.node(id).is_implicit(),
            })
            .collect();
        let edges = passage
            .graph
            .edges()
            .iter()
            .map(|e| EdgeData {
                parent: e.parent(),
                child: e.child(),
                tag: e.tag(),
                remote: e.is_remote(),
            })
            .collect();
        PassageData {
            id: passage.id,
            tokens,
            units,
            edges,
        }
    }
}
