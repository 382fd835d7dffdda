pub mod bootstrap;
pub mod cli;
pub mod error;
pub mod logger;
pub mod seed;
pub mod tool_loop;

pub use bootstrap::{build_dispatcher, select_transport};
pub use cli::Cli;
pub use error::{Result as ServerResult, ServerError};

#[cfg(test)]
mod tests;
