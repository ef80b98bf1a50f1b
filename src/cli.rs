//! Command-line arguments.
//!
//! Parsing is lenient: unknown options are dropped and positionals after
//! the plugin directory are collected and ignored.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use clap::error::{ContextKind, ContextValue, ErrorKind};

/// Telephony daemon: loads capability modules and serves the runtime registry
#[derive(Debug, Parser)]
#[command(name = "telephony-daemon", version, about, long_about = None)]
pub struct Cli {
    /// Open and validate every module, then exit without starting
    #[arg(short = 'T', long = "testload")]
    pub testload: bool,

    /// Path to an additional configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Plugin directory (overrides `plugins.directory`)
    #[arg(value_name = "PLUGIN_PATH")]
    pub plugin_path: Option<String>,

    /// Surplus positionals, accepted and ignored
    #[arg(hide = true)]
    pub extra: Vec<String>,
}

impl Cli {
    /// Parses `args`, dropping options clap does not know.
    ///
    /// Returns the parsed arguments plus everything that was ignored. Help,
    /// version and malformed known options still come back as errors.
    pub fn parse_lenient<I, T>(args: I) -> Result<(Self, Vec<String>), clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let mut ignored = Vec::new();

        loop {
            let err = match Self::try_parse_from(&args) {
                Ok(cli) => {
                    ignored.extend(cli.extra.iter().cloned());
                    return Ok((cli, ignored));
                }
                Err(e) => e,
            };

            if err.kind() != ErrorKind::UnknownArgument {
                return Err(err);
            }
            let Some(ContextValue::String(unknown)) = err.get(ContextKind::InvalidArg) else {
                return Err(err);
            };
            let with_value = format!("{unknown}=");
            let Some(index) = args.iter().skip(1).position(|arg| {
                arg.to_str()
                    .is_some_and(|a| a == unknown || a.starts_with(&with_value))
            }) else {
                return Err(err);
            };

            let removed = args.remove(index + 1);
            ignored.push(removed.to_string_lossy().into_owned());
        }
    }
}
