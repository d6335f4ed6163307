//! Arena-backed graph of nodes and labeled edges.
//!
//! Nodes never own each other: edges refer to their endpoints by index into the arena,
//! and every node keeps the indices of its incoming and outgoing edges in creation order.

use std::error;
use std::fmt;

use crate::lang::Tokenized;

pub use self::passage::*;
pub use self::tag::*;

mod passage;
mod tag;

pub type NodeId = usize;
pub type EdgeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    index: NodeId,
    text: Option<String>,
    paragraph: usize,
    implicit: bool,
    punct: bool,
    orig: Option<NodeId>,
    swap_index: f64,
    outgoing: Vec<EdgeId>,
    incoming: Vec<EdgeId>,
}

impl Node {
    fn new(index: NodeId) -> Self {
        Node {
            index,
            text: None,
            paragraph: 0,
            implicit: false,
            punct: false,
            orig: None,
            swap_index: index as f64,
            outgoing: vec![],
            incoming: vec![],
        }
    }

    pub fn index(&self) -> NodeId {
        self.index
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_ref().map(|s| s.as_str())
    }

    pub fn is_terminal(&self) -> bool {
        self.text.is_some()
    }

    pub fn is_implicit(&self) -> bool {
        self.implicit
    }

    pub fn is_punct(&self) -> bool {
        self.punct
    }

    pub fn paragraph(&self) -> usize {
        self.paragraph
    }

    /// The target graph node this node was created from (training only).
    pub fn orig(&self) -> Option<NodeId> {
        self.orig
    }

    pub fn swap_index(&self) -> f64 {
        self.swap_index
    }

    pub fn outgoing(&self) -> &[EdgeId] {
        &self.outgoing
    }

    pub fn incoming(&self) -> &[EdgeId] {
        &self.incoming
    }

    pub(crate) fn set_orig(&mut self, orig: Option<NodeId>) {
        self.orig = orig;
    }

    pub(crate) fn set_swap_index(&mut self, swap_index: f64) {
        self.swap_index = swap_index;
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.text {
            Some(ref text) => write!(f, "{}", text),
            None if self.implicit => write!(f, "#{}*", self.index),
            None => write!(f, "#{}", self.index),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    parent: NodeId,
    child: NodeId,
    tag: Tag,
    remote: bool,
}

impl Edge {
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    pub fn child(&self) -> NodeId {
        self.child
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn is_remote(&self) -> bool {
        self.remote
    }

    /// Primary edges form the tree backbone: neither remote nor part of a linkage.
    pub fn is_primary(&self) -> bool {
        !self.remote && !self.tag.is_linkage()
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "#{} -{}{}-> #{}",
            self.parent,
            self.tag,
            if self.remote { "*" } else { "" },
            self.child
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    UnknownNode(NodeId),
    DuplicateEdge {
        parent: NodeId,
        child: NodeId,
        tag: Tag,
    },
    Cycle { parent: NodeId, child: NodeId },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::UnknownNode(id) => write!(f, "unknown node #{}", id),
            Error::DuplicateEdge { parent, child, tag } => {
                write!(f, "edge #{} -{}-> #{} already exists", parent, tag, child)
            }
            Error::Cycle { parent, child } => write!(
                f,
                "edge #{} -> #{} would close a cycle",
                parent,
                child
            ),
        }
    }
}

impl error::Error for Error {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Graph::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Graph {
            nodes: Vec::with_capacity(capacity),
            edges: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    /// Adds a non-terminal node.
    pub fn add_unit(&mut self, implicit: bool) -> NodeId {
        let index = self.nodes.len();
        let mut node = Node::new(index);
        node.implicit = implicit;
        self.nodes.push(node);
        index
    }

    /// Adds a unit joined to `anchor` by a primary edge, as its child if `implicit` and as
    /// its parent otherwise. Nothing is added when `anchor` is unknown.
    pub fn attach_unit(
        &mut self,
        anchor: NodeId,
        implicit: bool,
        tag: Tag,
    ) -> Result<(NodeId, EdgeId), Error> {
        if anchor >= self.nodes.len() {
            return Err(Error::UnknownNode(anchor));
        }
        let id = self.add_unit(implicit);
        let (parent, child) = if implicit { (anchor, id) } else { (id, anchor) };
        let edge = self.edges.len();
        self.edges.push(Edge {
            parent,
            child,
            tag,
            remote: false,
        });
        self.nodes[parent].outgoing.push(edge);
        self.nodes[child].incoming.push(edge);
        Ok((id, edge))
    }

    pub fn add_terminal<T: Tokenized>(&mut self, token: &T) -> NodeId {
        let index = self.nodes.len();
        let mut node = Node::new(index);
        node.text = Some(token.text().to_string());
        node.punct = token.is_punct();
        node.paragraph = token.paragraph();
        self.nodes.push(node);
        index
    }

    /// Adds `parent -> child`, rejecting exact duplicates and edges that would close a cycle.
    pub fn add_edge(
        &mut self,
        parent: NodeId,
        child: NodeId,
        tag: Tag,
        remote: bool,
    ) -> Result<EdgeId, Error> {
        if parent >= self.nodes.len() {
            return Err(Error::UnknownNode(parent));
        }
        if child >= self.nodes.len() {
            return Err(Error::UnknownNode(child));
        }
        if self.has_edge(parent, child, tag, remote) {
            return Err(Error::DuplicateEdge { parent, child, tag });
        }
        if self.reaches(child, parent) {
            return Err(Error::Cycle { parent, child });
        }
        let id = self.edges.len();
        self.edges.push(Edge {
            parent,
            child,
            tag,
            remote,
        });
        self.nodes[parent].outgoing.push(id);
        self.nodes[child].incoming.push(id);
        Ok(id)
    }

    pub fn has_edge(&self, parent: NodeId, child: NodeId, tag: Tag, remote: bool) -> bool {
        self.outgoing_edges(parent).any(|e| {
            e.child == child && e.tag == tag && e.remote == remote
        })
    }

    /// Whether `to` is `from` or one of its descendants.
    pub fn reaches(&self, from: NodeId, to: NodeId) -> bool {
        let mut visited = vec![false; self.nodes.len()];
        let mut agenda = vec![from];
        while let Some(id) = agenda.pop() {
            if id == to {
                return true;
            }
            if visited[id] {
                continue;
            }
            visited[id] = true;
            agenda.extend(self.outgoing_edges(id).map(|e| e.child));
        }
        false
    }

    pub fn outgoing_edges<'a>(&'a self, id: NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.nodes[id].outgoing.iter().map(move |&e| &self.edges[e])
    }

    pub fn incoming_edges<'a>(&'a self, id: NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.nodes[id].incoming.iter().map(move |&e| &self.edges[e])
    }

    pub fn primary_parent(&self, id: NodeId) -> Option<NodeId> {
        self.incoming_edges(id)
            .find(|e| e.is_primary())
            .map(|e| e.parent)
    }

    /// A linkage node has outgoing edges, all of them tagged LR or LA.
    pub fn is_linkage(&self, id: NodeId) -> bool {
        let node = &self.nodes[id];
        !node.outgoing.is_empty() && self.outgoing_edges(id).all(|e| e.tag.is_linkage())
    }

    /// A non-terminal whose primary children are all punctuation terminals.
    pub fn is_punct_unit(&self, id: NodeId) -> bool {
        let mut children = self.outgoing_edges(id).filter(|e| e.is_primary()).peekable();
        if self.nodes[id].is_terminal() || children.peek().is_none() {
            return false;
        }
        children.all(|e| {
            let child = &self.nodes[e.child];
            child.is_terminal() && child.punct
        })
    }
}
