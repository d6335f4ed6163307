use std::collections::VecDeque;
use std::fmt;

use super::{Action, ActionType, Config, Error};
use crate::lang::{Token, Tokenized};
use crate::syntax::graph::{Graph, Node, NodeId, Passage, Tag};

#[inline]
fn default_capacity(num_tokens: usize) -> usize {
    4 * num_tokens + 1
}

/// Stack, buffer and the graph built so far.
///
/// The root sits at the bottom of the stack from the start and never enters the buffer.
/// Terminals occupy ids `1..=n` of the arena, units created by NODE/IMPLICIT follow.
#[derive(Debug, Clone)]
pub struct State {
    config: Config,
    passage_id: String,
    graph: Graph,
    root: NodeId,
    terminals: Vec<NodeId>,
    stack: Vec<NodeId>,
    buffer: VecDeque<NodeId>,
    actions: Vec<Action>,
    labeled: bool,
    finished: bool,
}

impl State {
    /// Creates a state for parsing bare tokens.
    pub fn new<S: Into<String>, T: Tokenized>(id: S, tokens: &[T], config: &Config) -> Self {
        let n = tokens.len();
        let mut graph = Graph::with_capacity(default_capacity(n));
        let root = graph.add_unit(false);
        let terminals: Vec<NodeId> = tokens.iter().map(|t| graph.add_terminal(t)).collect();
        State {
            config: config.clone(),
            passage_id: id.into(),
            graph,
            root,
            stack: vec![root],
            buffer: terminals.iter().cloned().collect(),
            terminals,
            actions: Vec::with_capacity(default_capacity(n)),
            labeled: false,
            finished: false,
        }
    }

    /// Creates a state whose nodes refer back to `passage`, for training.
    pub fn from_passage(passage: &Passage, config: &Config) -> Self {
        let mut state = State::new(passage.id(), &passage.tokens(), config);
        state.labeled = true;
        let root = state.root;
        state.graph.node_mut(root).set_orig(Some(passage.root()));
        for (&terminal, &orig) in state.terminals.iter().zip(passage.terminals()) {
            state.graph.node_mut(terminal).set_orig(Some(orig));
        }
        state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn passage_id(&self) -> &str {
        &self.passage_id
    }

    pub fn is_labeled(&self) -> bool {
        self.labeled
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn step(&self) -> usize {
        self.actions.len()
    }

    pub fn num_tokens(&self) -> usize {
        self.terminals.len()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn node(&self, id: NodeId) -> &Node {
        self.graph.node(id)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn terminals(&self) -> &[NodeId] {
        &self.terminals
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

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn stack_top(&self) -> Option<NodeId> {
        self.stack.last().cloned()
    }

    /// Element `position` places below the top.
    pub fn stack(&self, position: usize) -> Option<NodeId> {
        let size = self.stack.len();
        if position < size {
            Some(self.stack[size - 1 - position])
        } else {
            None
        }
    }

    pub fn stack_size(&self) -> usize {
        self.stack.len()
    }

    pub fn is_stack_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Stack contents from bottom to top.
    pub fn stack_nodes(&self) -> &[NodeId] {
        &self.stack
    }

    pub fn buffer_head(&self) -> Option<NodeId> {
        self.buffer.front().cloned()
    }

    pub fn buffer(&self, position: usize) -> Option<NodeId> {
        self.buffer.get(position).cloned()
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_buffer_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Buffer contents from front to back.
    pub fn buffer_nodes<'a>(&'a self) -> impl Iterator<Item = NodeId> + 'a {
        self.buffer.iter().cloned()
    }

    /// Units created so far (the root excluded) per terminal.
    pub fn node_ratio(&self) -> f64 {
        let n = self.terminals.len();
        let units = self.graph.len() - 1 - n;
        units as f64 / n.max(1) as f64
    }

    pub fn is_allowed(&self, action: &Action) -> bool {
        self.check(action).is_ok()
    }

    /// Like `is_allowed`, but tolerates a NODE/IMPLICIT without a target back-reference.
    ///
    /// Predictors only propose labels, so their candidates are filtered with this during
    /// supervised training.
    pub fn is_allowed_prediction(&self, action: &Action) -> bool {
        self.validate(action, false).is_ok()
    }

    /// Returns an `IllegalAction` error naming the first violated condition.
    pub fn check(&self, action: &Action) -> Result<(), Error> {
        self.validate(action, self.labeled)
            .map_err(|reason| self.illegal(action, reason))
    }

    fn illegal(&self, action: &Action, reason: &'static str) -> Error {
        Error::IllegalAction {
            action: action.clone(),
            reason,
            state: self.to_string(),
        }
    }

    fn validate(&self, action: &Action, require_orig: bool) -> Result<(), &'static str> {
        if self.finished {
            return Err("parse is already finished");
        }
        match action.kind {
            ActionType::Shift => {
                if self.buffer.is_empty() {
                    return Err("buffer is empty");
                }
            }
            ActionType::Finish => {
                if self.graph.node(self.root).outgoing().is_empty() {
                    return Err("root has no children");
                }
            }
            ActionType::Reduce => {
                let top = self.stack_top().ok_or("stack is empty")?;
                if top == self.root && self.graph.node(top).outgoing().is_empty() {
                    return Err("root has no children");
                }
            }
            ActionType::Node => {
                let top = self.stack_top().ok_or("stack is empty")?;
                let tag = action.tag.ok_or("missing tag")?;
                if top == self.root {
                    return Err("root cannot have a parent");
                }
                if require_orig && action.orig.is_none() {
                    return Err("missing target node");
                }
                self.check_agreement(None, top, tag)?;
                if !tag.is_linkage() && self.graph.primary_parent(top).is_some() {
                    return Err("node already has a primary parent");
                }
            }
            ActionType::Implicit => {
                let top = self.stack_top().ok_or("stack is empty")?;
                let tag = action.tag.ok_or("missing tag")?;
                let node = self.graph.node(top);
                if node.is_terminal() {
                    return Err("terminal cannot have children");
                }
                if node.is_implicit() {
                    return Err("implicit node cannot have children");
                }
                if require_orig && action.orig.is_none() {
                    return Err("missing target node");
                }
                if self.config.constraints && (tag == Tag::Terminal || tag == Tag::Punctuation) {
                    return Err("implicit node cannot take a terminal or punctuation tag");
                }
            }
            ActionType::LeftEdge
            | ActionType::RightEdge
            | ActionType::LeftRemote
            | ActionType::RightRemote => {
                if self.stack.len() < 2 {
                    return Err("stack has fewer than two nodes");
                }
                let tag = action.tag.ok_or("missing tag")?;
                let (top, second) = (self.stack[self.stack.len() - 1], self.stack[self.stack.len() - 2]);
                let (parent, child) = match action.kind {
                    ActionType::LeftEdge | ActionType::LeftRemote => (top, second),
                    _ => (second, top),
                };
                self.check_edge(parent, child, tag, action.kind.is_remote())?;
            }
            ActionType::Swap => {
                let size = self.stack.len();
                if size < 2 {
                    return Err("stack has fewer than two nodes");
                }
                let distance = action.swap_distance();
                if distance == 0 || distance >= size {
                    return Err("swap distance out of range");
                }
                let top = self.stack[size - 1];
                let swapped = self.stack[size - 1 - distance];
                if self.stack[size - 1 - distance..size - 1].contains(&self.root) {
                    return Err("root cannot be swapped");
                }
                if self.graph.node(swapped).swap_index() >= self.graph.node(top).swap_index() {
                    return Err("swapped nodes are already reordered");
                }
            }
        }
        Ok(())
    }

    fn check_edge(
        &self,
        parent: NodeId,
        child: NodeId,
        tag: Tag,
        remote: bool,
    ) -> Result<(), &'static str> {
        if child == self.root {
            return Err("root cannot be a child");
        }
        let p = self.graph.node(parent);
        if p.is_terminal() {
            return Err("terminal cannot have children");
        }
        if p.is_implicit() {
            return Err("implicit node cannot have children");
        }
        if parent == self.root && self.graph.node(child).is_terminal() {
            return Err("root cannot have a terminal child");
        }
        if self.graph.has_edge(parent, child, tag, remote) {
            return Err("edge already exists");
        }
        if self.graph.reaches(child, parent) {
            return Err("edge would create a cycle");
        }
        self.check_agreement(Some(parent), child, tag)?;
        if !remote && !tag.is_linkage() && self.graph.primary_parent(child).is_some() {
            return Err("node already has a primary parent");
        }
        if remote
            && (p.outgoing().is_empty() || self.graph.node(child).incoming().is_empty())
        {
            return Err("remote edge cannot be the first edge of its endpoints");
        }
        Ok(())
    }

    /// Tag agreement for an edge into `child`; `parent` is `None` for a node yet to be created.
    fn check_agreement(
        &self,
        parent: Option<NodeId>,
        child: NodeId,
        tag: Tag,
    ) -> Result<(), &'static str> {
        if !self.config.constraints {
            return Ok(());
        }
        let c = self.graph.node(child);
        if c.is_terminal() {
            if tag != Tag::Terminal {
                return Err("terminal child requires the Terminal tag");
            }
            if let Some(parent) = parent {
                let mixed = self
                    .graph
                    .outgoing_edges(parent)
                    .map(|e| self.graph.node(e.child()))
                    .any(|n| n.is_terminal() && n.is_punct() != c.is_punct());
                if mixed {
                    return Err("unit cannot mix punctuation and words");
                }
            }
        } else if tag == Tag::Terminal {
            return Err("Terminal tag requires a terminal child");
        } else if (tag == Tag::Punctuation) != self.graph.is_punct_unit(child) {
            return Err("U tag must mark exactly the punctuation units");
        }
        Ok(())
    }

    /// Checks and applies `action`.
    pub fn transition(&mut self, action: Action) -> Result<(), Error> {
        self.check(&action)?;
        match action.kind {
            ActionType::Shift => {
                if let Some(id) = self.buffer.pop_front() {
                    self.stack.push(id);
                }
            }
            ActionType::Node | ActionType::Implicit => {
                let node = self.create_node(&action)?;
                self.buffer.push_front(node);
            }
            ActionType::Reduce => {
                self.stack.pop();
            }
            ActionType::LeftEdge
            | ActionType::RightEdge
            | ActionType::LeftRemote
            | ActionType::RightRemote => {
                let size = self.stack.len();
                let (top, second) = (self.stack[size - 1], self.stack[size - 2]);
                let (parent, child) = match action.kind {
                    ActionType::LeftEdge | ActionType::LeftRemote => (top, second),
                    _ => (second, top),
                };
                self.add_edge(parent, child, &action, action.kind.is_remote())?;
            }
            ActionType::Swap => {
                let size = self.stack.len();
                let distance = action.swap_distance();
                let swapped: Vec<NodeId> = self.stack.drain(size - 1 - distance..size - 1).collect();
                for &id in swapped.iter().rev() {
                    self.buffer.push_front(id);
                }
            }
            ActionType::Finish => {
                self.finished = true;
            }
        }
        self.actions.push(action);
        if self.config.verify {
            self.assert_disjoint()?;
        }
        self.assert_ratio()
    }

    /// Adds the unit introduced by NODE/IMPLICIT along with its edge to the top.
    fn create_node(&mut self, action: &Action) -> Result<NodeId, Error> {
        let top = self.stack_top().ok_or_else(|| self.illegal(action, "stack is empty"))?;
        let tag = action.tag.ok_or_else(|| self.illegal(action, "missing tag"))?;
        let implicit = action.kind == ActionType::Implicit;
        let (id, _) = self.graph.attach_unit(top, implicit, tag)?;
        let node = self.graph.node_mut(id);
        node.set_orig(action.orig);
        let swap_index = node.swap_index();
        if let Some(head) = self.buffer_head() {
            let head_index = self.graph.node(head).swap_index();
            if head_index <= swap_index {
                let top_index = self.graph.node(top).swap_index();
                self.graph
                    .node_mut(id)
                    .set_swap_index((top_index + head_index) / 2.0);
            }
        }
        Ok(id)
    }

    fn add_edge(
        &mut self,
        parent: NodeId,
        child: NodeId,
        action: &Action,
        remote: bool,
    ) -> Result<(), Error> {
        let tag = match action.tag {
            Some(tag) => tag,
            None => return Err(self.illegal(action, "missing tag")),
        };
        self.graph.add_edge(parent, child, tag, remote)?;
        Ok(())
    }

    fn assert_disjoint(&self) -> Result<(), Error> {
        if let Some(id) = self.buffer.iter().find(|id| self.stack.contains(id)) {
            return Err(Error::Invariant(format!(
                "node #{} is both in the stack and in the buffer ({})",
                id,
                self
            )));
        }
        if self.buffer.contains(&self.root) {
            return Err(Error::Invariant(format!("root entered the buffer ({})", self)));
        }
        Ok(())
    }

    fn assert_ratio(&self) -> Result<(), Error> {
        let ratio = self.node_ratio();
        if ratio > self.config.max_nodes_ratio {
            return Err(Error::NodeRatio {
                ratio,
                max: self.config.max_nodes_ratio,
                state: self.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "stack: [{}] buffer: [{}]",
            join_nodes(&self.graph, self.stack.iter()),
            join_nodes(&self.graph, self.buffer.iter())
        )
    }
}

fn join_nodes<'a, I: Iterator<Item = &'a NodeId>>(graph: &Graph, ids: I) -> String {
    ids.map(|&id| graph.node(id).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
