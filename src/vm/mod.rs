//! The Control-Stack-Environment machine: the environment arena
//! (`env`) and the machine loop that interprets a flattened program
//! (`machine`).

pub mod env;
pub mod machine;
