use std::error;
use std::fmt;
use std::str::FromStr;

use serde_derive::{Deserialize, Serialize};

/// Edge categories of the foundational layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tag {
    #[serde(rename = "Terminal")]
    Terminal,
    #[serde(rename = "U")]
    Punctuation,
    #[serde(rename = "A")]
    Participant,
    #[serde(rename = "P")]
    Process,
    #[serde(rename = "S")]
    State,
    #[serde(rename = "D")]
    Adverbial,
    #[serde(rename = "C")]
    Center,
    #[serde(rename = "E")]
    Elaborator,
    #[serde(rename = "F")]
    Function,
    #[serde(rename = "N")]
    Connector,
    #[serde(rename = "R")]
    Relator,
    #[serde(rename = "T")]
    Time,
    #[serde(rename = "Q")]
    Quantifier,
    #[serde(rename = "L")]
    Linker,
    #[serde(rename = "H")]
    ParallelScene,
    #[serde(rename = "G")]
    Ground,
    #[serde(rename = "LR")]
    LinkRelation,
    #[serde(rename = "LA")]
    LinkArgument,
}

impl Tag {
    pub const ALL: [Tag; 18] = [
        Tag::Terminal,
        Tag::Punctuation,
        Tag::Participant,
        Tag::Process,
        Tag::State,
        Tag::Adverbial,
        Tag::Center,
        Tag::Elaborator,
        Tag::Function,
        Tag::Connector,
        Tag::Relator,
        Tag::Time,
        Tag::Quantifier,
        Tag::Linker,
        Tag::ParallelScene,
        Tag::Ground,
        Tag::LinkRelation,
        Tag::LinkArgument,
    ];

    pub fn as_str(&self) -> &'static str {
        match *self {
            Tag::Terminal => "Terminal",
            Tag::Punctuation => "U",
            Tag::Participant => "A",
            Tag::Process => "P",
            Tag::State => "S",
            Tag::Adverbial => "D",
            Tag::Center => "C",
            Tag::Elaborator => "E",
            Tag::Function => "F",
            Tag::Connector => "N",
            Tag::Relator => "R",
            Tag::Time => "T",
            Tag::Quantifier => "Q",
            Tag::Linker => "L",
            Tag::ParallelScene => "H",
            Tag::Ground => "G",
            Tag::LinkRelation => "LR",
            Tag::LinkArgument => "LA",
        }
    }

    /// Position in `Tag::ALL`.
    pub fn index(&self) -> usize {
        Tag::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn is_linkage(&self) -> bool {
        match *self {
            Tag::LinkRelation | Tag::LinkArgument => true,
            _ => false,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTagError(String);

impl fmt::Display for ParseTagError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown edge tag `{}`", self.0)
    }
}

impl error::Error for ParseTagError {}

impl FromStr for Tag {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Tag, ParseTagError> {
        Tag::ALL
            .iter()
            .find(|tag| tag.as_str() == s)
            .cloned()
            .ok_or_else(|| ParseTagError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_names() {
        assert_eq!("A".parse::<Tag>(), Ok(Tag::Participant));
        assert_eq!("LR".parse::<Tag>(), Ok(Tag::LinkRelation));
        assert_eq!(Tag::Punctuation.to_string(), "U");
        assert!("X".parse::<Tag>().is_err());
    }

    #[test]
    fn test_index_follows_all() {
        for (i, tag) in Tag::ALL.iter().enumerate() {
            assert_eq!(tag.index(), i);
        }
        assert!(Tag::LinkArgument.is_linkage());
        assert!(!Tag::Participant.is_linkage());
    }

    #[test]
    fn test_serde_uses_short_names() {
        let json = serde_json::to_string(&Tag::ParallelScene).unwrap();
        assert_eq!(json, "\"H\"");
        let tag: Tag = serde_json::from_str("\"Terminal\"").unwrap();
        assert_eq!(tag, Tag::Terminal);
    }
}
