//! Bar-trivia research tools.
//!
//! [`tools::TriviaTools`] holds the handlers; the `trivia` binary exposes them
//! over MCP stdio and as a one-shot CLI.

pub mod dates;
pub mod envelope;
pub mod format;
pub mod tools;

pub use tools::{TriviaTools, TOOL_NAMES};
