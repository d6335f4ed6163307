#![allow(dead_code)]

pub mod mock;

use std::collections::HashMap;

use dagparse::syntax::graph::{NodeId, Passage};

/// Structural form of a passage that ignores how units are numbered.
///
/// Every unit is described by its implicit flag and the sorted descriptions of its outgoing
/// edges; terminals are described by their position. Two passages over the same tokens are
/// isomorphic iff their forms are equal.
pub fn canonical(passage: &Passage) -> Vec<String> {
    let mut memo = HashMap::new();
    let mut form: Vec<String> = passage
        .units()
        .map(|id| describe(passage, id, &mut memo))
        .collect();
    form.sort();
    form.push(describe(passage, passage.root(), &mut memo));
    form
}

fn describe(passage: &Passage, id: NodeId, memo: &mut HashMap<NodeId, String>) -> String {
    if let Some(desc) = memo.get(&id) {
        return desc.clone();
    }
    let node = passage.node(id);
    let desc = if node.is_terminal() {
        let position = passage.terminals().iter().position(|&t| t == id).unwrap();
        format!("t{}", position)
    } else {
        let mut children: Vec<String> = passage
            .graph()
            .outgoing_edges(id)
            .map(|e| {
                format!(
                    "{}{}:{}",
                    e.tag(),
                    if e.is_remote() { "*" } else { "" },
                    describe(passage, e.child(), memo)
                )
            })
            .collect();
        children.sort();
        format!(
            "{}[{}]",
            if node.is_implicit() { "implicit" } else { "unit" },
            children.join(" ")
        )
    };
    memo.insert(id, desc.clone());
    desc
}

pub fn action_strings<'a, I>(actions: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a dagparse::syntax::transition::Action>,
{
    actions.into_iter().map(|a| a.to_string()).collect()
}

pub fn split(sequence: &str) -> Vec<String> {
    sequence.split_whitespace().map(|s| s.to_string()).collect()
}
