#![forbid(unsafe_code)]

//! ckb-next animation plugin for the keyheat effect.
//!
//! The host launches the binary twice: once with `--ckb-info` to collect the
//! plugin metadata and parameter declarations, then with `--ckb-run` to drive
//! the effect over a line protocol on stdin/stdout. Logs go to stderr.

pub mod cli;
pub mod info;
pub mod logging;
pub mod protocol;
pub mod session;

pub use protocol::{Block, Command, ProtocolError};
pub use session::Session;
