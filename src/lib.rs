//! Transition-based construction of rooted, labeled, acyclic semantic graphs.

#[macro_use]
extern crate slog;

pub mod dataset;
pub mod io;
pub mod lang;
pub mod logging;
pub mod syntax;
pub mod training;
pub mod utils;
