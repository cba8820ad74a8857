pub mod cache;
pub mod common;
pub mod init;
pub mod recipe;
pub mod status;

use clap::Parser;

use self::cache::{CacheCommand, CacheOptions};
use self::init::{InitCommand, InitCommandOptions};
use self::recipe::{
    CreateCommand, DeleteCommand, GetCommand, ListCommand, PatchCommand, RecipeOptions,
    UpdateCommand,
};
use self::status::{StatusCommand, StatusOptions};

#[derive(Parser)]
#[command(about = "Recipes API client with an offline read-through cache")]
pub(crate) struct Args {
    #[clap(subcommand)]
    pub command: Command,
    #[clap(flatten)]
    pub global_args: GlobalArgs,
}

#[derive(Clone, Parser)]
#[clap(next_help_heading = "Global options")]
pub struct GlobalArgs {
    /// Verbose mode. Logs to STDERR, `RUST_LOG` overrides the level
    #[clap(long, short, global = true)]
    pub verbose: bool,
    /// Config file to use instead of $HOME/.config/rcache/config.toml
    #[clap(long, global = true, value_name = "PATH")]
    pub config: Option<String>,
    /// Report the environment as offline
    #[clap(long, global = true)]
    pub offline: bool,
}

#[derive(Parser)]
pub(crate) enum Command {
    #[clap(about = "Initialize the config file")]
    Init(InitCommand),
    #[clap(about = "Get a recipe, served from the cache when possible")]
    Get(GetCommand),
    #[clap(about = "List recipes")]
    List(ListCommand),
    #[clap(about = "Create a recipe from a JSON file")]
    Create(CreateCommand),
    #[clap(about = "Replace a recipe with the contents of a JSON file")]
    Update(UpdateCommand),
    #[clap(about = "Change the fields of a recipe given in a JSON file")]
    Patch(PatchCommand),
    #[clap(about = "Delete a recipe")]
    Delete(DeleteCommand),
    #[clap(about = "Inspect and clear cached recipes")]
    Cache(CacheCommand),
    #[clap(about = "Check whether the recipes API can be reached")]
    Status(StatusCommand),
}

pub enum CliOptions {
    Init(InitCommandOptions),
    Recipe(RecipeOptions),
    Cache(CacheOptions),
    Status(StatusOptions),
}

pub struct OptionArgs {
    pub cli_options: CliOptions,
    pub cli_args: GlobalArgs,
}

pub fn parse_cli() -> OptionArgs {
    Args::parse().into()
}

// From impls - private clap structs to public domain structs
// Mainly to avoid propagating clap further down the stack as changes in the
// clap API could break other parts of the code.

impl From<Args> for OptionArgs {
    fn from(args: Args) -> Self {
        let cli_options = match args.command {
            Command::Init(options) => CliOptions::Init(options.into()),
            Command::Get(options) => CliOptions::Recipe(options.into()),
            Command::List(options) => CliOptions::Recipe(options.into()),
            Command::Create(options) => CliOptions::Recipe(options.into()),
            Command::Update(options) => CliOptions::Recipe(options.into()),
            Command::Patch(options) => CliOptions::Recipe(options.into()),
            Command::Delete(options) => CliOptions::Recipe(options.into()),
            Command::Cache(options) => CliOptions::Cache(options.into()),
            Command::Status(options) => CliOptions::Status(options.into()),
        };
        OptionArgs {
            cli_options,
            cli_args: args.global_args,
        }
    }
}
