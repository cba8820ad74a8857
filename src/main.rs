#[macro_use]
extern crate log;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use env_logger::Env;
use rcache::{
    api_defaults::FAST_STORE_FILE,
    cache::{DurableStore, FileCache, InMemoryCache},
    cli::{parse_cli, CliOptions},
    cmds,
    config::{Config, ConfigProperties},
    connectivity::ConnectivityMonitor,
    error::{self, AddContext},
    http::Client,
    init, log_warn,
    recipe::RecipeClient,
    service::RecipeCache,
    storage::{FastStore, InMemoryStorage, LocalStorage},
    Result,
};

const CONFIG_PATH: &str = ".config/rcache/config.toml";

fn main() -> Result<()> {
    let option_args = parse_cli();
    let cli_args = option_args.cli_args;
    if cli_args.verbose {
        let env = Env::default().default_filter_or("info");
        env_logger::init_from_env(env);
    }
    let config_file = match cli_args.config {
        Some(path) => PathBuf::from(path),
        None => {
            let home_dir = std::env::var("HOME").map_err(|_| {
                error::gen("HOME is not set, use --config to point at a config file")
            })?;
            Path::new(&home_dir).join(CONFIG_PATH)
        }
    };
    let cli_options = match option_args.cli_options {
        CliOptions::Init(options) => return init::execute(options, config_file),
        cli_options => cli_options,
    };
    let config = Arc::new(Config::from_path(&config_file)?);
    let runner = Arc::new(Client::new(&config));
    if let CliOptions::Status(options) = cli_options {
        let monitor = ConnectivityMonitor::new(config.base_url(), runner);
        if cli_args.offline {
            monitor.set_online(false);
        }
        return cmds::status::execute(options, config.probe_timeout(), &monitor, io::stdout());
    }
    let fast = open_fast_store(&config);
    match config.cache_location() {
        Some(location) => {
            let durable = FileCache::new(location);
            if let Err(err) = durable.validate_cache_location() {
                log_warn!("Durable store disabled: {}", err);
            }
            run(cli_options, &config, runner, durable, fast.as_ref())
        }
        None => run(cli_options, &config, runner, InMemoryCache::default(), fast.as_ref()),
    }
}

fn run<D: DurableStore>(
    cli_options: CliOptions,
    config: &Arc<Config>,
    runner: Arc<Client>,
    durable: D,
    fast: &dyn FastStore,
) -> Result<()> {
    let api = RecipeClient::new(config.base_url(), runner);
    let cache = RecipeCache::new(config.base_url(), &api, durable, fast);
    match cli_options {
        CliOptions::Recipe(options) => cmds::recipe::execute(options, &api, &cache, io::stdout()),
        CliOptions::Cache(options) => cmds::cache::execute(options, config, &cache, io::stdout()),
        // Handled in main before any store is opened.
        CliOptions::Init(_) | CliOptions::Status(_) => unreachable!(),
    }
}

/// The fast store lives next to the durable containers. Without a cache
/// location, or if the file cannot be opened, it only lasts for this run.
fn open_fast_store(config: &Arc<Config>) -> Box<dyn FastStore> {
    let Some(location) = config.cache_location() else {
        return Box::new(InMemoryStorage::default().with_quota(config.fast_store_quota()));
    };
    let open = || -> Result<LocalStorage> {
        fs::create_dir_all(location)
            .err_context(format!("Unable to create cache location {location}"))?;
        LocalStorage::open(Path::new(location).join(FAST_STORE_FILE), config.fast_store_quota())
    };
    match open() {
        Ok(store) => Box::new(store),
        Err(err) => {
            log_warn!("Fast store kept in memory: {:#}", err);
            Box::new(InMemoryStorage::default().with_quota(config.fast_store_quota()))
        }
    }
}
