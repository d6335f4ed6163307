pub mod env;
pub mod rand;
