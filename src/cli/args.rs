//! Command-line argument parsing for luma-door.

use std::path::PathBuf;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Scan QR codes from the camera (default)
    Run,
    /// Show version information
    Version,
    /// Remove the stored session credential
    Logout,
    /// Check one payload in without a camera
    CheckIn { payload: String },
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub command: CliCommand,
    /// Settings file given with `--config`
    pub config: Option<PathBuf>,
}

/// Parse command-line arguments.
///
/// # Arguments
///
/// * `args` - Iterator of command-line arguments (typically `std::env::args()`)
///
/// The first command flag wins; `--config` may appear anywhere. Unknown
/// flags and flags missing their value are ignored.
///
/// # Examples
///
/// ```
/// use luma_door::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["luma-door".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()).command, CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliArgs
where
    I: Iterator<Item = String>,
{
    let mut command = None;
    let mut config = None;
    // Skip the program name
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        if let Some(path) = arg.strip_prefix("--config=") {
            config = Some(PathBuf::from(path));
            continue;
        }
        match arg.as_str() {
            "--config" | "-c" => {
                if let Some(path) = args.next() {
                    config = Some(PathBuf::from(path));
                }
            }
            "--version" | "-V" => {
                command.get_or_insert(CliCommand::Version);
            }
            "--logout" => {
                command.get_or_insert(CliCommand::Logout);
            }
            "--check-in" => {
                if let Some(payload) = args.next() {
                    command.get_or_insert(CliCommand::CheckIn { payload });
                }
            }
            _ => {}
        }
    }

    CliArgs {
        command: command.unwrap_or(CliCommand::Run),
        config,
    }
}
