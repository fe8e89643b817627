//! CLI module for luma-door.
//!
//! - Argument parsing
//! - Version display
//! - Logout
//!
//! `main` parses arguments first and dispatches; `Run` and `CheckIn` are
//! handled by [`DoorApp`](crate::app::DoorApp).

pub mod args;
pub mod logout;
pub mod version;

pub use args::{parse_args, CliArgs, CliCommand};
pub use logout::handle_logout_command;
pub use version::{handle_version_command, version_string, VERSION};
