pub mod graph;
pub mod transition;
