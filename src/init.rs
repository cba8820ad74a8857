use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use crate::cli::init::InitCommandOptions;
use crate::error::{AddContext, RCError};
use crate::Result;

const CONFIG_TEMPLATE: &str = r#"
# Fill in the values below and tweak accordingly.

# Base URL of the recipes API. The RCACHE_BASE_URL environment variable takes
# precedence over this value.
base_url="<BASE_URL>"

# Directory holding the cached recipes. Leave it out to keep the cache in
# memory for the lifetime of each command only.
cache_location="<CACHE_LOCATION>"

# How long `rc status` waits for the API to answer.
probe_timeout="3s"

# Timeout for every other request to the API.
request_timeout="30s"

# Maximum size in bytes of the fast store. Writes over it are dropped, the
# durable store still gets them.
fast_store_quota=5242880
"#;

pub fn execute<P: AsRef<Path>>(options: InitCommandOptions, config_path: P) -> Result<()> {
    let config_path = config_path.as_ref();
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).err_context(format!(
            "Unable to create config directory {}",
            parent.display()
        ))?;
    }
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(config_path);

    let mut file = match file {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(RCError::PreconditionNotMet(format!(
                "Config file at {} already exists, move it aside before running `init` again",
                config_path.display()
            ))
            .into())
        }
        Err(e) => {
            return Err(e).err_context(format!(
                "Unable to create config file at path {}",
                config_path.display()
            ))
        }
    };
    let cache_location = default_cache_location();
    generate_and_persist(options, &cache_location, &mut file).err_context(format!(
        "Failed to generate and persist config at path {}",
        config_path.display()
    ))
}

fn default_cache_location() -> String {
    match std::env::var("HOME") {
        Ok(home) => format!("{home}/.cache/rcache"),
        Err(_) => ".cache/rcache".to_string(),
    }
}

fn generate_and_persist<W: Write>(
    options: InitCommandOptions,
    cache_location: &str,
    writer: &mut W,
) -> Result<()> {
    let data = change_placeholders(&options.base_url, cache_location);
    writer
        .write_all(data.as_bytes())
        .err_context("Writing the data to disk failed")?;
    Ok(())
}

fn change_placeholders(base_url: &str, cache_location: &str) -> String {
    CONFIG_TEMPLATE
        .replace("<BASE_URL>", base_url.trim_end_matches('/'))
        .replace("<CACHE_LOCATION>", cache_location)
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::config::{Config, ConfigProperties};
    use tempfile::TempDir;

    #[test]
    fn test_persist_config() {
        let options = InitCommandOptions {
            base_url: "https://api.example.com/".to_string(),
        };
        let mut writer = Vec::new();
        generate_and_persist(options, "/tmp/rcache", &mut writer).unwrap();
        let content = String::from_utf8(writer).unwrap();
        assert!(content.contains(r#"base_url="https://api.example.com""#));
        assert!(content.contains(r#"cache_location="/tmp/rcache""#));
    }

    #[test]
    fn test_generated_config_is_readable() {
        let options = InitCommandOptions {
            base_url: "https://api.example.com".to_string(),
        };
        let mut writer = Vec::new();
        generate_and_persist(options, "/tmp/rcache", &mut writer).unwrap();
        let config = Config::new(writer.as_slice()).unwrap();
        assert_eq!(Some("/tmp/rcache"), config.cache_location());
        assert_eq!(5242880, config.fast_store_quota());
    }

    #[test]
    fn test_init_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rcache").join("config.toml");
        let options = || InitCommandOptions {
            base_url: "https://api.example.com".to_string(),
        };
        execute(options(), &path).unwrap();
        let err = execute(options(), &path).unwrap_err();
        match err.downcast_ref::<RCError>() {
            Some(RCError::PreconditionNotMet(_)) => {}
            _ => panic!("Expected PreconditionNotMet"),
        }
    }
}
