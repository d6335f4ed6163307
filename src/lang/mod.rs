use std::borrow::Cow;
use std::fmt;

use serde_derive::{Deserialize, Serialize};

/// An input token as seen by the transition system.
pub trait Tokenized {
    fn text(&self) -> &str;
    fn is_punct(&self) -> bool;
    fn paragraph(&self) -> usize;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    text: String,
    #[serde(default)]
    punct: bool,
    #[serde(default = "default_paragraph")]
    paragraph: usize,
}

fn default_paragraph() -> usize {
    1
}

impl Token {
    pub fn new<S: Into<String>>(text: S, punct: bool, paragraph: usize) -> Self {
        Token {
            text: text.into(),
            punct,
            paragraph,
        }
    }

    pub fn word<S: Into<String>>(text: S) -> Self {
        Token::new(text, false, default_paragraph())
    }

    pub fn punct<S: Into<String>>(text: S) -> Self {
        Token::new(text, true, default_paragraph())
    }
}

impl Tokenized for Token {
    fn text(&self) -> &str {
        &self.text
    }

    fn is_punct(&self) -> bool {
        self.punct
    }

    fn paragraph(&self) -> usize {
        self.paragraph
    }
}

impl<'a, T: Tokenized> Tokenized for &'a T {
    fn text(&self) -> &str {
        (*self).text()
    }

    fn is_punct(&self) -> bool {
        (*self).is_punct()
    }

    fn paragraph(&self) -> usize {
        (*self).paragraph()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Splits raw text on whitespace, marking tokens made only of punctuation characters.
pub fn tokenize<'a, S: Into<Cow<'a, str>>>(raw: S) -> Vec<Token> {
    let raw = raw.into();
    raw.split_whitespace()
        .map(|word| {
            let punct = word.chars().all(|c| c.is_ascii_punctuation());
            Token::new(word, punct, default_paragraph())
        })
        .collect()
}
