use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::api_defaults::CACHE_NAME;
use crate::api_traits::RecipeFetcher;
use crate::cache::{DurableContainer, DurableStore};
use crate::cli::cache::CacheOptions;
use crate::config::ConfigProperties;
use crate::dialog;
use crate::display::{self, Column, DisplayBody};
use crate::service::RecipeCache;
use crate::storage::FastStore;
use crate::time::epoch_to_local;
use crate::Result;

/// Row of `rc cache list`.
pub struct CachedKey {
    store: &'static str,
    key: String,
    stored_at: String,
}

impl From<CachedKey> for DisplayBody {
    fn from(entry: CachedKey) -> Self {
        DisplayBody::new(vec![
            Column::new("Store", entry.store),
            Column::new("Key", entry.key),
            Column::new("Stored At", entry.stored_at),
        ])
    }
}

pub fn execute<C, F, D, S, W>(
    options: CacheOptions,
    config: &C,
    cache: &RecipeCache<F, D, S>,
    mut writer: W,
) -> Result<()>
where
    C: ConfigProperties,
    F: RecipeFetcher,
    D: DurableStore,
    S: FastStore,
    W: Write,
{
    match options {
        CacheOptions::List(format_args) => {
            let entries = cached_keys(cache);
            if entries.is_empty() {
                writeln!(writer, "No cached recipes")?;
                return Ok(());
            }
            display::print(
                &mut writer,
                entries,
                format_args.no_headers,
                &format_args.format,
            )?;
        }
        CacheOptions::Clear(id) => {
            cache.invalidate(&id)?;
            writeln!(writer, "Recipe {id} removed from the cache")?;
        }
        CacheOptions::ClearAll { confirmed } => {
            if !confirmed && !dialog::confirm("Remove every cached recipe?")? {
                writeln!(writer, "Nothing removed")?;
                return Ok(());
            }
            cache.invalidate_all()?;
            writeln!(writer, "All cached recipes removed")?;
        }
        CacheOptions::Info => match config.cache_location() {
            Some(location) => {
                let size = get_cache_directory_size(Path::new(location))?;
                writeln!(writer, "Location: {location}")?;
                writeln!(writer, "Size: {}", BytesToHumanReadable::from(size))?;
            }
            None => {
                writeln!(
                    writer,
                    "No cache_location configured, recipes are cached in memory only"
                )?;
            }
        },
    }
    Ok(())
}

fn cached_keys<F, D, S>(cache: &RecipeCache<F, D, S>) -> Vec<CachedKey>
where
    F: RecipeFetcher,
    D: DurableStore,
    S: FastStore,
{
    let inventory = cache.list();
    // Listing already logged it if the durable store cannot be opened.
    let container = cache.durable().open(CACHE_NAME).ok();
    let mut entries = Vec::with_capacity(inventory.durable.len() + inventory.fast.len());
    for url in inventory.durable {
        let stored_at = container
            .as_ref()
            .and_then(|c| c.lookup(&url).ok().flatten())
            .map(|entry| epoch_to_local(entry.stored_at))
            .unwrap_or_default();
        entries.push(CachedKey {
            store: "durable",
            key: url,
            stored_at,
        });
    }
    for key in inventory.fast {
        entries.push(CachedKey {
            store: "fast",
            key,
            stored_at: String::new(),
        });
    }
    entries
}

struct BytesToHumanReadable(u64);

impl From<u64> for BytesToHumanReadable {
    fn from(size: u64) -> Self {
        BytesToHumanReadable(size)
    }
}

impl fmt::Display for BytesToHumanReadable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let suffixes = ["B", "KB", "MB", "GB"];
        let mut size = self.0 as f64;
        let mut i = 0;
        while size >= 1024.0 && i < suffixes.len() - 1 {
            size /= 1024.0;
            i += 1;
        }
        write!(f, "{:.2} {}", size, suffixes[i])
    }
}

/// Total size of the files under `path`, containers included.
fn get_cache_directory_size(path: &Path) -> Result<u64> {
    let mut size = 0;
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if metadata.is_dir() {
            size += get_cache_directory_size(&entry.path())?;
        } else {
            size += metadata.len();
        }
    }
    Ok(size)
}
