use clap::Parser;

use crate::keys::RecipeId;

use super::common::{parse_recipe_id, FormatArgs, FormatCliArgs};

#[derive(Parser)]
pub struct CacheCommand {
    #[clap(subcommand)]
    subcommand: CacheSubcommand,
}

#[derive(Parser)]
enum CacheSubcommand {
    #[clap(about = "List cached recipes in both stores")]
    List(FormatArgs),
    #[clap(about = "Remove cached recipes")]
    Clear(ClearCache),
    #[clap(name = "info", about = "Get local cache size and location")]
    Info,
}

#[derive(Parser)]
struct ClearCache {
    /// Id of the recipe to remove
    #[clap(value_parser = parse_recipe_id, required_unless_present = "all", conflicts_with = "all")]
    id: Option<RecipeId>,
    /// Remove every cached recipe
    #[clap(long)]
    all: bool,
    /// Do not ask for confirmation
    #[clap(long, short, requires = "all")]
    yes: bool,
}

pub enum CacheOptions {
    List(FormatCliArgs),
    Clear(RecipeId),
    ClearAll { confirmed: bool },
    Info,
}

impl From<CacheCommand> for CacheOptions {
    fn from(options: CacheCommand) -> Self {
        match options.subcommand {
            CacheSubcommand::List(args) => CacheOptions::List(args.into()),
            CacheSubcommand::Clear(args) => match args.id {
                Some(id) if !args.all => CacheOptions::Clear(id),
                _ => CacheOptions::ClearAll {
                    confirmed: args.yes,
                },
            },
            CacheSubcommand::Info => CacheOptions::Info,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::cli::{Args, Command};

    use super::*;

    fn parse(args: Vec<&str>) -> CacheOptions {
        match Args::parse_from(args).command {
            Command::Cache(options) => options.into(),
            _ => panic!("Expected CacheCommand"),
        }
    }

    #[test]
    fn test_cache_clear_single_recipe() {
        match parse(vec!["rc", "cache", "clear", "42"]) {
            CacheOptions::Clear(id) => assert_eq!("42", id.as_str()),
            _ => panic!("Expected CacheOptions::Clear"),
        }
    }

    #[test]
    fn test_cache_clear_all_with_yes() {
        match parse(vec!["rc", "cache", "clear", "--all", "--yes"]) {
            CacheOptions::ClearAll { confirmed } => assert!(confirmed),
            _ => panic!("Expected CacheOptions::ClearAll"),
        }
        match parse(vec!["rc", "cache", "clear", "--all"]) {
            CacheOptions::ClearAll { confirmed } => assert!(!confirmed),
            _ => panic!("Expected CacheOptions::ClearAll"),
        }
    }

    #[test]
    fn test_cache_clear_needs_id_or_all() {
        assert!(Args::try_parse_from(vec!["rc", "cache", "clear"]).is_err());
        assert!(Args::try_parse_from(vec!["rc", "cache", "clear", "1", "--all"]).is_err());
        assert!(Args::try_parse_from(vec!["rc", "cache", "clear", "1", "--yes"]).is_err());
    }

    #[test]
    fn test_cache_list_format() {
        match parse(vec!["rc", "cache", "list", "--format", "json"]) {
            CacheOptions::List(args) => {
                assert!(matches!(args.format, crate::display::Format::JSON))
            }
            _ => panic!("Expected CacheOptions::List"),
        }
    }
}
