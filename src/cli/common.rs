use std::fmt::{self, Display, Formatter};

use clap::{Parser, ValueEnum};

use crate::display::Format;
use crate::keys::RecipeId;
use crate::time::Milliseconds;

#[derive(Clone, Parser)]
#[clap(next_help_heading = "Formatting options")]
pub struct FormatArgs {
    /// Do not print headers
    #[clap(long)]
    pub no_headers: bool,
    /// Output format
    #[clap(long, default_value_t=FormatCli::Pipe)]
    pub format: FormatCli,
}

#[derive(Clone, Debug)]
pub struct FormatCliArgs {
    pub no_headers: bool,
    pub format: Format,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum FormatCli {
    Csv,
    Json,
    Pipe,
}

impl Display for FormatCli {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FormatCli::Csv => write!(f, "csv"),
            FormatCli::Pipe => write!(f, "pipe"),
            FormatCli::Json => write!(f, "json"),
        }
    }
}

impl From<FormatCli> for Format {
    fn from(format: FormatCli) -> Self {
        match format {
            FormatCli::Csv => Format::CSV,
            FormatCli::Json => Format::JSON,
            FormatCli::Pipe => Format::PIPE,
        }
    }
}

impl From<FormatArgs> for FormatCliArgs {
    fn from(args: FormatArgs) -> Self {
        FormatCliArgs {
            no_headers: args.no_headers,
            format: args.format.into(),
        }
    }
}

/// Reads a recipe id off the command line. Invalid ids are rejected before
/// anything is sent or cached.
pub fn parse_recipe_id(id: &str) -> Result<RecipeId, String> {
    RecipeId::try_from(id).map_err(|err| err.to_string())
}

/// Parses a time string such as `3s` or `1m` into milliseconds.
pub fn parse_timeout(timeout: &str) -> Result<Milliseconds, String> {
    Milliseconds::try_from(timeout).map_err(|err| err.to_string())
}
