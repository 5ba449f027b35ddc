// Domain layer: the syntax tree and the walks over it.

pub mod ast;
pub mod deps;
pub mod error;
pub mod report;
