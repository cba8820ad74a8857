use clap::{Parser, ValueEnum};

use crate::keys::RecipeId;
use crate::recipe::{Category, Difficulty, ListRecipeArgs, SortOrder};
use crate::service::FetchOptions;

use super::common::{parse_recipe_id, FormatArgs, FormatCliArgs};

#[derive(Parser)]
pub struct GetCommand {
    /// Id of the recipe
    #[clap(value_parser = parse_recipe_id)]
    pub id: RecipeId,
    #[clap(flatten)]
    pub cache_args: CacheArgs,
}

#[derive(Clone, Parser)]
#[clap(next_help_heading = "Cache options")]
pub struct CacheArgs {
    /// Skip the cached copies and fetch the recipe again. The result is
    /// cached
    #[clap(long, short, group = "cache")]
    pub refresh: bool,
    /// Do not read the cached copies
    #[clap(long, group = "cache")]
    pub no_cache: bool,
}

#[derive(Parser)]
pub struct ListCommand {
    /// List the given page number
    #[clap(long)]
    pub page: Option<u32>,
    /// Recipes per page
    #[clap(long)]
    pub limit: Option<u32>,
    #[clap(long)]
    pub category: Option<CategoryCli>,
    #[clap(long)]
    pub difficulty: Option<DifficultyCli>,
    /// Search recipes by name
    #[clap(long)]
    pub search: Option<String>,
    /// Field to sort by, e.g. created_at
    #[clap(long)]
    pub sort_by: Option<String>,
    #[clap(long)]
    pub order: Option<SortOrderCli>,
    #[clap(flatten)]
    pub format_args: FormatArgs,
}

#[derive(Parser)]
pub struct CreateCommand {
    /// JSON file with the recipe
    #[clap(long, short)]
    pub file: String,
}

#[derive(Parser)]
pub struct UpdateCommand {
    /// Id of the recipe
    #[clap(value_parser = parse_recipe_id)]
    pub id: RecipeId,
    /// JSON file with the complete recipe
    #[clap(long, short)]
    pub file: String,
}

#[derive(Parser)]
pub struct PatchCommand {
    /// Id of the recipe
    #[clap(value_parser = parse_recipe_id)]
    pub id: RecipeId,
    /// JSON file with only the fields to change
    #[clap(long, short)]
    pub file: String,
}

#[derive(Parser)]
pub struct DeleteCommand {
    /// Id of the recipe
    #[clap(value_parser = parse_recipe_id)]
    pub id: RecipeId,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum CategoryCli {
    #[value(alias = "makanan")]
    Food,
    #[value(alias = "minuman")]
    Drink,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum DifficultyCli {
    #[value(alias = "mudah")]
    Easy,
    #[value(alias = "sedang")]
    Medium,
    #[value(alias = "sulit")]
    Hard,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum SortOrderCli {
    Asc,
    Desc,
}

impl From<CategoryCli> for Category {
    fn from(category: CategoryCli) -> Self {
        match category {
            CategoryCli::Food => Category::Food,
            CategoryCli::Drink => Category::Drink,
        }
    }
}

impl From<DifficultyCli> for Difficulty {
    fn from(difficulty: DifficultyCli) -> Self {
        match difficulty {
            DifficultyCli::Easy => Difficulty::Easy,
            DifficultyCli::Medium => Difficulty::Medium,
            DifficultyCli::Hard => Difficulty::Hard,
        }
    }
}

impl From<SortOrderCli> for SortOrder {
    fn from(order: SortOrderCli) -> Self {
        match order {
            SortOrderCli::Asc => SortOrder::Asc,
            SortOrderCli::Desc => SortOrder::Desc,
        }
    }
}

pub enum RecipeOptions {
    Get {
        id: RecipeId,
        fetch_options: FetchOptions,
    },
    List {
        args: ListRecipeArgs,
        format_args: FormatCliArgs,
    },
    Create {
        file: String,
    },
    Update {
        id: RecipeId,
        file: String,
    },
    Patch {
        id: RecipeId,
        file: String,
    },
    Delete {
        id: RecipeId,
    },
}

impl From<CacheArgs> for FetchOptions {
    fn from(args: CacheArgs) -> Self {
        FetchOptions {
            use_cache: !args.no_cache,
            force: args.refresh,
        }
    }
}

impl From<GetCommand> for RecipeOptions {
    fn from(options: GetCommand) -> Self {
        RecipeOptions::Get {
            id: options.id,
            fetch_options: options.cache_args.into(),
        }
    }
}

impl From<ListCommand> for RecipeOptions {
    fn from(options: ListCommand) -> Self {
        RecipeOptions::List {
            args: ListRecipeArgs {
                page: options.page,
                limit: options.limit,
                category: options.category.map(Into::into),
                difficulty: options.difficulty.map(Into::into),
                search: options.search,
                sort_by: options.sort_by,
                order: options.order.map(Into::into),
            },
            format_args: options.format_args.into(),
        }
    }
}

impl From<CreateCommand> for RecipeOptions {
    fn from(options: CreateCommand) -> Self {
        RecipeOptions::Create { file: options.file }
    }
}

impl From<UpdateCommand> for RecipeOptions {
    fn from(options: UpdateCommand) -> Self {
        RecipeOptions::Update {
            id: options.id,
            file: options.file,
        }
    }
}

impl From<PatchCommand> for RecipeOptions {
    fn from(options: PatchCommand) -> Self {
        RecipeOptions::Patch {
            id: options.id,
            file: options.file,
        }
    }
}

impl From<DeleteCommand> for RecipeOptions {
    fn from(options: DeleteCommand) -> Self {
        RecipeOptions::Delete { id: options.id }
    }
}

#[cfg(test)]
mod test {
    use crate::cli::{Args, Command};
    use crate::display::Format;

    use super::*;

    #[test]
    fn test_get_refresh_forces_network() {
        let args = Args::parse_from(vec!["rc", "get", "42", "--refresh"]);
        let options: RecipeOptions = match args.command {
            Command::Get(options) => options.into(),
            _ => panic!("Expected GetCommand"),
        };
        match options {
            RecipeOptions::Get { id, fetch_options } => {
                assert_eq!("42", id.as_str());
                assert!(fetch_options.use_cache);
                assert!(fetch_options.force);
            }
            _ => panic!("Expected RecipeOptions::Get"),
        }
    }

    #[test]
    fn test_get_no_cache() {
        let args = Args::parse_from(vec!["rc", "get", "42", "--no-cache"]);
        match args.command {
            Command::Get(options) => {
                let fetch_options: FetchOptions = options.cache_args.into();
                assert!(!fetch_options.use_cache);
                assert!(!fetch_options.force);
            }
            _ => panic!("Expected GetCommand"),
        }
    }

    #[test]
    fn test_get_refresh_and_no_cache_conflict() {
        let result = Args::try_parse_from(vec!["rc", "get", "42", "--refresh", "--no-cache"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_get_invalid_id_is_rejected() {
        let result = Args::try_parse_from(vec!["rc", "get", "a/b"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_filters() {
        let args = Args::parse_from(vec![
            "rc",
            "list",
            "--page",
            "2",
            "--category",
            "minuman",
            "--difficulty",
            "easy",
            "--order",
            "asc",
            "--format",
            "csv",
        ]);
        let options: RecipeOptions = match args.command {
            Command::List(options) => options.into(),
            _ => panic!("Expected ListCommand"),
        };
        match options {
            RecipeOptions::List { args, format_args } => {
                assert_eq!(Some(2), args.page);
                assert_eq!(None, args.limit);
                assert_eq!(Some(Category::Drink), args.category);
                assert_eq!(Some(Difficulty::Easy), args.difficulty);
                assert_eq!(Some(SortOrder::Asc), args.order);
                assert!(matches!(format_args.format, Format::CSV));
            }
            _ => panic!("Expected RecipeOptions::List"),
        }
    }

    #[test]
    fn test_update_requires_file() {
        assert!(Args::try_parse_from(vec!["rc", "update", "3"]).is_err());
        let args = Args::parse_from(vec!["rc", "update", "3", "--file", "recipe.json"]);
        match args.command {
            Command::Update(options) => {
                assert_eq!("3", options.id.as_str());
                assert_eq!("recipe.json", options.file);
            }
            _ => panic!("Expected UpdateCommand"),
        }
    }
}
