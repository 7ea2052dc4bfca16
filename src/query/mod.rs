pub mod ast;
pub mod logical;
pub mod options;
pub mod factory;
