use dagparse::lang::Token;
use dagparse::syntax::graph::{Passage, Tag};

/// "The cat sat ." as one scene with a participant, a process and punctuation.
pub fn scene() -> Passage {
    let tokens = vec![
        Token::word("The"),
        Token::word("cat"),
        Token::word("sat"),
        Token::punct("."),
    ];
    let mut p = Passage::new("scene", &tokens);
    let (root, t) = (p.root(), p.terminals().to_vec());
    let s = p.add_unit(false);
    let x = p.add_unit(false);
    let y = p.add_unit(false);
    let z = p.add_unit(false);
    p.add_edge(root, s, Tag::ParallelScene, false).unwrap();
    p.add_edge(s, x, Tag::Participant, false).unwrap();
    p.add_edge(x, t[0], Tag::Terminal, false).unwrap();
    p.add_edge(x, t[1], Tag::Terminal, false).unwrap();
    p.add_edge(s, y, Tag::Process, false).unwrap();
    p.add_edge(y, t[2], Tag::Terminal, false).unwrap();
    p.add_edge(s, z, Tag::Punctuation, false).unwrap();
    p.add_edge(z, t[3], Tag::Terminal, false).unwrap();
    p
}

/// "a b c" where the participant spans the discontiguous "a ... c".
pub fn discontiguous() -> Passage {
    let tokens = vec![Token::word("a"), Token::word("b"), Token::word("c")];
    let mut p = Passage::new("discontiguous", &tokens);
    let (root, t) = (p.root(), p.terminals().to_vec());
    let s = p.add_unit(false);
    let x = p.add_unit(false);
    let y = p.add_unit(false);
    p.add_edge(root, s, Tag::ParallelScene, false).unwrap();
    p.add_edge(s, x, Tag::Participant, false).unwrap();
    p.add_edge(x, t[0], Tag::Terminal, false).unwrap();
    p.add_edge(x, t[2], Tag::Terminal, false).unwrap();
    p.add_edge(s, y, Tag::Process, false).unwrap();
    p.add_edge(y, t[1], Tag::Terminal, false).unwrap();
    p
}

/// "John left" with an implicit adverbial and a remote participant of the process.
pub fn remote_implicit() -> Passage {
    let tokens = vec![Token::word("John"), Token::word("left")];
    let mut p = Passage::new("remote", &tokens);
    let (root, t) = (p.root(), p.terminals().to_vec());
    let s = p.add_unit(false);
    let x = p.add_unit(false);
    let y = p.add_unit(false);
    let i = p.add_unit(true);
    p.add_edge(root, s, Tag::ParallelScene, false).unwrap();
    p.add_edge(s, x, Tag::Participant, false).unwrap();
    p.add_edge(x, t[0], Tag::Terminal, false).unwrap();
    p.add_edge(s, y, Tag::Process, false).unwrap();
    p.add_edge(y, t[1], Tag::Terminal, false).unwrap();
    p.add_edge(s, i, Tag::Adverbial, false).unwrap();
    p.add_edge(y, x, Tag::Participant, true).unwrap();
    p
}

/// Three scenes over "a b c d e": the first spans "a ... d", the second "b ... e".
pub fn interleaved() -> Passage {
    let tokens: Vec<Token> = ["a", "b", "c", "d", "e"].iter().map(|&w| Token::word(w)).collect();
    let mut p = Passage::new("interleaved", &tokens);
    let (root, t) = (p.root(), p.terminals().to_vec());
    let first = p.add_unit(false);
    let second = p.add_unit(false);
    let third = p.add_unit(false);
    p.add_edge(root, first, Tag::ParallelScene, false).unwrap();
    p.add_edge(first, t[0], Tag::Terminal, false).unwrap();
    p.add_edge(first, t[3], Tag::Terminal, false).unwrap();
    p.add_edge(root, second, Tag::ParallelScene, false).unwrap();
    p.add_edge(second, t[1], Tag::Terminal, false).unwrap();
    p.add_edge(second, t[4], Tag::Terminal, false).unwrap();
    p.add_edge(root, third, Tag::ParallelScene, false).unwrap();
    p.add_edge(third, t[2], Tag::Terminal, false).unwrap();
    p
}

/// "came but left": two scenes related by the linker "but".
pub fn linked() -> Passage {
    let tokens = vec![Token::word("came"), Token::word("but"), Token::word("left")];
    let mut p = Passage::new("linked", &tokens);
    let (root, t) = (p.root(), p.terminals().to_vec());
    let x = p.add_unit(false);
    let z = p.add_unit(false);
    let y = p.add_unit(false);
    p.add_edge(root, x, Tag::ParallelScene, false).unwrap();
    p.add_edge(x, t[0], Tag::Terminal, false).unwrap();
    p.add_edge(root, z, Tag::Linker, false).unwrap();
    p.add_edge(z, t[1], Tag::Terminal, false).unwrap();
    p.add_edge(root, y, Tag::ParallelScene, false).unwrap();
    p.add_edge(y, t[2], Tag::Terminal, false).unwrap();
    p.add_linkage(z, &[x, y]).unwrap();
    p
}

/// Two sibling scenes over "w0 w1" where the first also takes the second as a remote participant.
pub fn remote_sibling() -> Passage {
    let tokens = vec![Token::word("w0"), Token::word("w1")];
    let mut p = Passage::new("remote-sibling", &tokens);
    let (root, t) = (p.root(), p.terminals().to_vec());
    let x = p.add_unit(false);
    let y = p.add_unit(false);
    p.add_edge(root, x, Tag::ParallelScene, false).unwrap();
    p.add_edge(x, t[0], Tag::Terminal, false).unwrap();
    p.add_edge(root, y, Tag::ParallelScene, false).unwrap();
    p.add_edge(y, t[1], Tag::Terminal, false).unwrap();
    p.add_edge(x, y, Tag::Participant, true).unwrap();
    p
}

/// A terminal claimed by two units, which no action sequence can reproduce.
pub fn doubly_attached() -> Passage {
    let tokens = vec![Token::word("a")];
    let mut p = Passage::new("doubly-attached", &tokens);
    let (root, t) = (p.root(), p.terminals().to_vec());
    let x = p.add_unit(false);
    let y = p.add_unit(false);
    p.add_edge(root, x, Tag::ParallelScene, false).unwrap();
    p.add_edge(x, t[0], Tag::Terminal, false).unwrap();
    p.add_edge(root, y, Tag::ParallelScene, false).unwrap();
    p.add_edge(y, t[0], Tag::Terminal, false).unwrap();
    p
}

pub fn all() -> Vec<Passage> {
    vec![
        scene(),
        discontiguous(),
        remote_implicit(),
        interleaved(),
        linked(),
        remote_sibling(),
    ]
}
