use std::error;
use std::fmt;
use std::io as std_io;
use std::path::Path;

use serde_derive::{Deserialize, Serialize};

use crate::io::serialize::{self, Format};
use crate::syntax::graph;

pub use self::action::*;
pub use self::oracle::*;
pub use self::parser::*;
pub use self::state::*;

mod action;
mod finalize;
mod oracle;
mod parser;
mod state;

/// Options threaded through every `State` built for a parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Assert after every transition that the stack and the buffer are disjoint.
    pub verify: bool,
    /// Enforce tag agreement between edge tags and terminal/punctuation children.
    pub constraints: bool,
    pub compound_swap: bool,
    pub max_swap: usize,
    /// Upper bound of created units per terminal.
    pub max_nodes_ratio: f64,
    pub linkage: bool,
    pub implicit: bool,
    pub remote: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            verify: false,
            constraints: true,
            compound_swap: false,
            max_swap: 15,
            max_nodes_ratio: 10.0,
            linkage: true,
            implicit: true,
            remote: true,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, Error> {
        serialize::read_from(path, Format::Json).map_err(Error::Io)
    }

    pub fn num_defined_actions(&self) -> usize {
        Action::num_defined_actions(self.max_swap)
    }
}

#[derive(Debug)]
pub enum Error {
    IllegalAction {
        action: Action,
        reason: &'static str,
        state: String,
    },
    Graph(graph::Error),
    Invariant(String),
    NodeRatio {
        ratio: f64,
        max: f64,
        state: String,
    },
    Structural(String),
    OracleExhausted { state: String },
    NoLegalAction { state: String },
    Io(std_io::Error),
}

impl Error {
    pub fn is_illegal_action(&self) -> bool {
        match *self {
            Error::IllegalAction { .. } => true,
            _ => false,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::IllegalAction {
                ref action,
                reason,
                ref state,
            } => write!(f, "illegal action {}: {} ({})", action, reason, state),
            Error::Graph(ref err) => err.fmt(f),
            Error::Invariant(ref msg) => write!(f, "invariant violated: {}", msg),
            Error::NodeRatio {
                ratio,
                max,
                ref state,
            } => write!(
                f,
                "ratio of units to terminals {:.3} exceeds the bound {:.3} ({})",
                ratio,
                max,
                state
            ),
            Error::Structural(ref msg) => write!(f, "malformed graph: {}", msg),
            Error::OracleExhausted { ref state } => {
                write!(f, "no action reproduces the target graph ({})", state)
            }
            Error::NoLegalAction { ref state } => {
                write!(f, "no legal action among the predictions ({})", state)
            }
            Error::Io(ref err) => err.fmt(f),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Graph(ref err) => Some(err),
            Error::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<graph::Error> for Error {
    fn from(err: graph::Error) -> Self {
        Error::Graph(err)
    }
}

impl From<std_io::Error> for Error {
    fn from(err: std_io::Error) -> Self {
        Error::Io(err)
    }
}
