use std::fmt;
use std::hash::{Hash, Hasher};

use serde_derive::{Deserialize, Serialize};

use crate::syntax::graph::{NodeId, Tag};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    Shift,
    Node,
    Implicit,
    Reduce,
    LeftEdge,
    RightEdge,
    LeftRemote,
    RightRemote,
    Swap,
    Finish,
}

/// Kinds that carry an edge tag, in the order used by the dense action index.
const TAGGED: [ActionType; 6] = [
    ActionType::Node,
    ActionType::Implicit,
    ActionType::LeftEdge,
    ActionType::RightEdge,
    ActionType::LeftRemote,
    ActionType::RightRemote,
];

impl ActionType {
    pub fn num_action_types() -> usize {
        10
    }

    pub fn has_tag(&self) -> bool {
        TAGGED.contains(self)
    }

    pub fn is_edge(&self) -> bool {
        match *self {
            ActionType::LeftEdge
            | ActionType::RightEdge
            | ActionType::LeftRemote
            | ActionType::RightRemote => true,
            _ => false,
        }
    }

    pub fn is_remote(&self) -> bool {
        match *self {
            ActionType::LeftRemote | ActionType::RightRemote => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            ActionType::Shift => "SHIFT",
            ActionType::Node => "NODE",
            ActionType::Implicit => "IMPLICIT",
            ActionType::Reduce => "REDUCE",
            ActionType::LeftEdge => "LEFT_EDGE",
            ActionType::RightEdge => "RIGHT_EDGE",
            ActionType::LeftRemote => "LEFT_REMOTE",
            ActionType::RightRemote => "RIGHT_REMOTE",
            ActionType::Swap => "SWAP",
            ActionType::Finish => "FINISH",
        }
    }
}

/// A transition together with its arguments.
///
/// Two actions are equal when their kind and tag match (and, for SWAP, their distance);
/// the training back-reference is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionType,
    pub tag: Option<Tag>,
    /// Number of stack elements below the top moved by SWAP; `None` means 1.
    pub distance: Option<usize>,
    /// Target node instantiated by NODE/IMPLICIT during training.
    #[serde(skip)]
    pub orig: Option<NodeId>,
}

impl Action {
    fn untagged(kind: ActionType) -> Self {
        Action {
            kind,
            tag: None,
            distance: None,
            orig: None,
        }
    }

    fn tagged(kind: ActionType, tag: Tag) -> Self {
        Action {
            kind,
            tag: Some(tag),
            distance: None,
            orig: None,
        }
    }

    pub fn shift() -> Self {
        Action::untagged(ActionType::Shift)
    }

    pub fn reduce() -> Self {
        Action::untagged(ActionType::Reduce)
    }

    pub fn finish() -> Self {
        Action::untagged(ActionType::Finish)
    }

    pub fn swap(distance: Option<usize>) -> Self {
        Action {
            distance,
            ..Action::untagged(ActionType::Swap)
        }
    }

    pub fn node(tag: Tag) -> Self {
        Action::tagged(ActionType::Node, tag)
    }

    pub fn implicit(tag: Tag) -> Self {
        Action::tagged(ActionType::Implicit, tag)
    }

    pub fn left_edge(tag: Tag) -> Self {
        Action::tagged(ActionType::LeftEdge, tag)
    }

    pub fn right_edge(tag: Tag) -> Self {
        Action::tagged(ActionType::RightEdge, tag)
    }

    pub fn left_remote(tag: Tag) -> Self {
        Action::tagged(ActionType::LeftRemote, tag)
    }

    pub fn right_remote(tag: Tag) -> Self {
        Action::tagged(ActionType::RightRemote, tag)
    }

    pub fn with_orig(mut self, orig: NodeId) -> Self {
        self.orig = Some(orig);
        self
    }

    pub fn swap_distance(&self) -> usize {
        self.distance.unwrap_or(1)
    }

    pub fn num_defined_actions(max_swap: usize) -> usize {
        3 + max_swap + TAGGED.len() * Tag::ALL.len()
    }

    /// Dense classifier id: SHIFT, REDUCE, FINISH, SWAP(1..=max_swap), then tagged kinds.
    pub fn to_index(&self, max_swap: usize) -> Option<u32> {
        let index = match self.kind {
            ActionType::Shift => 0,
            ActionType::Reduce => 1,
            ActionType::Finish => 2,
            ActionType::Swap => {
                let distance = self.swap_distance();
                if distance == 0 || distance > max_swap {
                    return None;
                }
                2 + distance
            }
            kind => {
                let k = TAGGED.iter().position(|&t| t == kind)?;
                let tag = self.tag?;
                3 + max_swap + k * Tag::ALL.len() + tag.index()
            }
        };
        Some(index as u32)
    }

    pub fn from_index(index: u32, max_swap: usize) -> Option<Action> {
        let index = index as usize;
        match index {
            0 => Some(Action::shift()),
            1 => Some(Action::reduce()),
            2 => Some(Action::finish()),
            i if i < 3 + max_swap => Some(Action::swap(Some(i - 2))),
            i => {
                let i = i - 3 - max_swap;
                let kind = *TAGGED.get(i / Tag::ALL.len())?;
                let tag = Tag::ALL[i % Tag::ALL.len()];
                Some(Action::tagged(kind, tag))
            }
        }
    }
}

impl PartialEq for Action {
    fn eq(&self, other: &Action) -> bool {
        self.kind == other.kind
            && self.tag == other.tag
            && (self.kind != ActionType::Swap || self.swap_distance() == other.swap_distance())
    }
}

impl Eq for Action {}

impl Hash for Action {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.tag.hash(state);
        if self.kind == ActionType::Swap {
            self.swap_distance().hash(state);
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.tag, self.distance) {
            (Some(tag), _) => write!(f, "{}({})", self.kind.as_str(), tag),
            (None, Some(distance)) => write!(f, "{}({})", self.kind.as_str(), distance),
            (None, None) => f.write_str(self.kind.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_orig() {
        assert_eq!(Action::node(Tag::Participant).with_orig(7), Action::node(Tag::Participant));
        assert_ne!(Action::node(Tag::Participant), Action::node(Tag::Process));
        assert_ne!(Action::left_edge(Tag::Center), Action::right_edge(Tag::Center));
        assert_eq!(Action::swap(None), Action::swap(Some(1)));
        assert_ne!(Action::swap(Some(2)), Action::swap(Some(1)));
    }

    #[test]
    fn test_dense_index() {
        let max_swap = 3;
        assert_eq!(Action::num_defined_actions(max_swap), 3 + 3 + 6 * 18);
        assert_eq!(Action::shift().to_index(max_swap), Some(0));
        assert_eq!(Action::swap(None).to_index(max_swap), Some(3));
        assert_eq!(Action::swap(Some(3)).to_index(max_swap), Some(5));
        assert_eq!(Action::swap(Some(4)).to_index(max_swap), None);
        assert_eq!(Action::node(Tag::Terminal).to_index(max_swap), Some(6));
        let last = Action::right_remote(Tag::LinkArgument);
        let index = last.to_index(max_swap).unwrap();
        assert_eq!(index as usize, Action::num_defined_actions(max_swap) - 1);
        assert_eq!(Action::from_index(index, max_swap), Some(last));
        assert_eq!(Action::from_index(index + 1, max_swap), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Action::shift().to_string(), "SHIFT");
        assert_eq!(Action::node(Tag::Terminal).to_string(), "NODE(Terminal)");
        assert_eq!(Action::left_remote(Tag::Participant).to_string(), "LEFT_REMOTE(A)");
        assert_eq!(Action::swap(Some(2)).to_string(), "SWAP(2)");
        assert_eq!(Action::swap(None).to_string(), "SWAP");
    }
}
