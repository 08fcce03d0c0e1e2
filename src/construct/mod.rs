pub mod token;
pub mod ast; // pre-standardization AST
pub mod tree; // standardized core tree
