//! One module per subcommand.

pub mod completions;
pub mod decrypt;
pub mod delete;
pub mod encrypt;
pub mod generate;
pub mod list;
pub mod rotate;
