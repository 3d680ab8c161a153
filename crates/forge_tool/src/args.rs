//! Command-line arguments

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

pub const USAGE: &str = "\
usage: forge [--config FILE] <command> <path>...

commands:
  check     load each asset and report errors
  fmt       rewrite each asset in canonical form
  preload   load the assets and preload the first one's dependencies
  dump      print any document in canonical form";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("missing command")]
    MissingCommand,

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("--config needs a file")]
    MissingConfigPath,

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("'{0}' needs at least one path")]
    MissingPaths(Command),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Check,
    Fmt,
    Preload,
    Dump,
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Check => write!(f, "check"),
            Self::Fmt => write!(f, "fmt"),
            Self::Preload => write!(f, "preload"),
            Self::Dump => write!(f, "dump"),
        }
    }
}

impl FromStr for Command {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "check" => Ok(Self::Check),
            "fmt" => Ok(Self::Fmt),
            "preload" => Ok(Self::Preload),
            "dump" => Ok(Self::Dump),
            other => Err(UsageError::UnknownCommand(other.to_string())),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub command: Command,
    pub paths: Vec<PathBuf>,
}

impl Args {
    /// Parse arguments, without the program name
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, UsageError> {
        let mut args = args.into_iter();
        let mut config = None;
        let mut command = None;
        let mut paths = Vec::new();

        while let Some(arg) = args.next() {
            if arg == "--config" {
                config = Some(PathBuf::from(args.next().ok_or(UsageError::MissingConfigPath)?));
            } else if arg.starts_with("--") {
                return Err(UsageError::UnknownOption(arg));
            } else if command.is_none() {
                command = Some(arg.parse::<Command>()?);
            } else {
                paths.push(PathBuf::from(arg));
            }
        }

        let command = command.ok_or(UsageError::MissingCommand)?;
        if paths.is_empty() {
            return Err(UsageError::MissingPaths(command));
        }

        Ok(Self {
            config,
            command,
            paths,
        })
    }
}
