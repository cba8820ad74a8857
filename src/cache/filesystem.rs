use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use flate2::bufread::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use sha2::{Digest, Sha256};

use crate::cache::{CachedResponse, DurableContainer, DurableStore};
use crate::error::{AddContext, RCError};
use crate::time::{now_epoch_seconds, Seconds};
use crate::Result;
use crate::{log_debug, log_warn};

const TMP_SUFFIX: &str = ".tmp";

/// Durable store on disk. Each container is a directory under the cache
/// location and each entry a gzip file named after the SHA-256 of its URL.
pub struct FileCache {
    location: PathBuf,
}

impl FileCache {
    pub fn new<P: Into<PathBuf>>(location: P) -> Self {
        FileCache {
            location: location.into(),
        }
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn validate_cache_location(&self) -> Result<()> {
        let path = self.location.as_path();
        let cache_location = path.display();

        if !path.exists() {
            return Err(RCError::CacheLocationDoesNotExist(format!(
                "Cache directory does not exist: {cache_location}"
            ))
            .into());
        }

        if !path.is_dir() {
            return Err(RCError::CacheLocationIsNotADirectory(format!(
                "Cache location is not a directory: {cache_location}"
            ))
            .into());
        }

        // Check if we can write to the directory
        let test_file_path = path.join(".write_test_cache_file");
        match File::create(&test_file_path) {
            Ok(_) => {
                if let Err(e) = fs::remove_file(&test_file_path) {
                    return Err(RCError::CacheLocationIsNotWriteable(format!(
                        "Failed to remove cache test file {}: {}",
                        test_file_path.to_string_lossy(),
                        e
                    ))
                    .into());
                }
            }
            Err(e) => {
                return Err(RCError::CacheLocationIsNotWriteable(format!(
                    "No write permission for cache directory {cache_location}: {e}"
                ))
                .into());
            }
        }
        Ok(())
    }

    fn container_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(RCError::PreconditionNotMet(format!(
                "Invalid cache container name: {name:?}"
            ))
            .into());
        }
        Ok(self.location.join(name))
    }
}

impl DurableStore for FileCache {
    type Container = FileContainer;

    fn open(&self, name: &str) -> Result<Self::Container> {
        if !self.location.is_dir() {
            return Err(RCError::StoreUnavailable(format!(
                "Cache location {} is not a directory",
                self.location.display()
            ))
            .into());
        }
        let path = self.container_path(name)?;
        fs::create_dir_all(&path)
            .map_err(|e| RCError::StoreUnavailable(format!("{}: {e}", path.display())))?;
        Ok(FileContainer { path })
    }

    fn delete(&self, name: &str) -> Result<bool> {
        let path = self.container_path(name)?;
        match fs::remove_dir_all(&path) {
            Ok(()) => {
                log_debug!("Deleted cache container {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).err_context(format!(
                "Unable to delete cache container {}",
                path.display()
            )),
        }
    }
}

pub struct FileContainer {
    path: PathBuf,
}

impl FileContainer {
    pub fn get_cache_file(&self, url: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(url);
        let hash = hasher.finalize();
        self.path.join(format!("{hash:x}"))
    }

    fn get_cache_data(&self, reader: impl BufRead) -> Result<CachedResponse> {
        let decompressed_data = GzDecoder::new(reader);
        let mut reader = BufReader::new(decompressed_data);
        let mut url = String::new();
        reader
            .read_line(&mut url)
            .map_err(|e| RCError::StoreCorrupt(e.to_string()))?;
        let mut stored_at = String::new();
        reader
            .read_line(&mut stored_at)
            .map_err(|e| RCError::StoreCorrupt(e.to_string()))?;
        let stored_at = match stored_at.trim().parse::<u64>() {
            Ok(value) => Seconds::new(value),
            Err(err) => {
                let trace = format!("Could not parse the stored at timestamp from cache {err}");
                return Err(RCError::StoreCorrupt(trace).into());
            }
        };
        let mut body = Vec::new();
        reader
            .read_to_end(&mut body)
            .map_err(|e| RCError::StoreCorrupt(e.to_string()))?;
        let body = String::from_utf8(body).map_err(|e| RCError::StoreCorrupt(e.to_string()))?;
        Ok(CachedResponse {
            url: url.trim_end().to_string(),
            stored_at,
            body,
        })
    }

    fn persist_cache_data(&self, url: &str, body: &str, f: BufWriter<File>) -> Result<()> {
        let file_data = format!("{}\n{}\n{}", url, now_epoch_seconds(), body);
        let mut encoder = GzEncoder::new(f, Compression::default());
        encoder.write_all(file_data.as_bytes())?;
        encoder.finish()?.flush()?;
        Ok(())
    }

    fn read_entry(&self, path: &Path) -> Result<Option<CachedResponse>> {
        match File::open(path) {
            Ok(f) => Ok(Some(self.get_cache_data(BufReader::new(f))?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).err_context(format!("Unable to open {}", path.display())),
        }
    }
}

impl DurableContainer for FileContainer {
    fn lookup(&self, url: &str) -> Result<Option<CachedResponse>> {
        let path = self.get_cache_file(url);
        match self.read_entry(&path)? {
            // Two URLs with the same hash would be a very bad day, but check
            // anyway that we are handing out the right entry.
            Some(entry) if entry.url != url => Err(RCError::StoreCorrupt(format!(
                "Cache file {} belongs to {}",
                path.display(),
                entry.url
            ))
            .into()),
            entry => Ok(entry),
        }
    }

    fn put(&self, url: &str, body: &str) -> Result<()> {
        let path = self.get_cache_file(url);
        let mut tmp_path = path.clone().into_os_string();
        tmp_path.push(TMP_SUFFIX);
        let tmp_path = PathBuf::from(tmp_path);
        let write = || -> Result<()> {
            let f = File::create(&tmp_path)?;
            self.persist_cache_data(url, body, BufWriter::new(f))?;
            fs::rename(&tmp_path, &path)?;
            Ok(())
        };
        write().map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            RCError::StoreWriteFailure(format!("{}: {e}", path.display())).into()
        })
    }

    fn delete(&self, url: &str) -> Result<bool> {
        let path = self.get_cache_file(url);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).err_context(format!("Unable to delete {}", path.display())),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut entries = Vec::new();
        for dir_entry in fs::read_dir(&self.path)? {
            let path = dir_entry?.path();
            if !path.is_file() || path.to_string_lossy().ends_with(TMP_SUFFIX) {
                continue;
            }
            match self.read_entry(&path) {
                Ok(Some(entry)) => entries.push(entry),
                Ok(None) => {}
                Err(err) => log_warn!("Skipping unreadable cache file {}: {}", path.display(), err),
            }
        }
        entries.sort_by(|a, b| {
            a.stored_at
                .partial_cmp(&b.stored_at)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.url.cmp(&b.url))
        });
        Ok(entries.into_iter().map(|entry| entry.url).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn container(dir: &TempDir) -> FileContainer {
        FileCache::new(dir.path()).open("recipes-cache-v1").unwrap()
    }

    #[test]
    fn test_get_cache_file() {
        let container = FileContainer {
            path: PathBuf::from("/home/user/.cache/recipes-cache-v1"),
        };
        let url = "https://api.example.com/api/v1/recipes/42";
        let cache_file = container.get_cache_file(url);
        let mut hasher = Sha256::new();
        hasher.update(url);
        let expected = format!(
            "/home/user/.cache/recipes-cache-v1/{:x}",
            hasher.finalize()
        );
        assert_eq!(PathBuf::from(expected), cache_file);
    }

    #[test]
    fn test_get_cache_data() {
        let cached_data = "https://api.example.com/api/v1/recipes/42\n1705175423\n{\"id\":\"42\",\"name\":\"Soto\"}";
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(cached_data.as_bytes()).unwrap();
        let reader = std::io::Cursor::new(enc.finish().unwrap());
        let container = FileContainer {
            path: PathBuf::from("/tmp"),
        };
        let entry = container.get_cache_data(reader).unwrap();
        assert_eq!("https://api.example.com/api/v1/recipes/42", entry.url);
        assert_eq!(Seconds::new(1705175423), entry.stored_at);
        assert_eq!(r#"{"id":"42","name":"Soto"}"#, entry.body);
    }

    #[test]
    fn test_get_cache_data_not_gzip_is_store_corrupt() {
        let reader = std::io::Cursor::new(b"plain text, not gzip".to_vec());
        let container = FileContainer {
            path: PathBuf::from("/tmp"),
        };
        let err = container.get_cache_data(reader).unwrap_err();
        match err.downcast_ref::<RCError>() {
            Some(RCError::StoreCorrupt(_)) => {}
            _ => panic!("Expected StoreCorrupt, got {err}"),
        }
    }

    #[test]
    fn test_put_then_lookup() {
        let dir = TempDir::new().unwrap();
        let container = container(&dir);
        let url = "http://localhost/api/v1/recipes/1";
        container.put(url, r#"{"id":"1"}"#).unwrap();
        let entry = container.lookup(url).unwrap().unwrap();
        assert_eq!(url, entry.url);
        assert_eq!(r#"{"id":"1"}"#, entry.body);
    }

    #[test]
    fn test_put_overwrites_whole_entry() {
        let dir = TempDir::new().unwrap();
        let container = container(&dir);
        let url = "http://localhost/api/v1/recipes/1";
        container.put(url, r#"{"id":"1","name":"a much longer name"}"#).unwrap();
        container.put(url, r#"{"id":"1"}"#).unwrap();
        assert_eq!(r#"{"id":"1"}"#, container.lookup(url).unwrap().unwrap().body);
        assert_eq!(1, container.keys().unwrap().len());
    }

    #[test]
    fn test_lookup_missing_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(container(&dir).lookup("http://localhost/nope").unwrap().is_none());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let container = container(&dir);
        let url = "http://localhost/api/v1/recipes/1";
        container.put(url, "{}").unwrap();
        assert!(container.delete(url).unwrap());
        assert!(!container.delete(url).unwrap());
    }

    #[test]
    fn test_keys_skip_foreign_and_corrupt_files() {
        let dir = TempDir::new().unwrap();
        let container = container(&dir);
        container.put("http://localhost/api/v1/recipes/1", "{}").unwrap();
        fs::write(dir.path().join("recipes-cache-v1").join("garbage"), "xx").unwrap();
        assert_eq!(
            vec!["http://localhost/api/v1/recipes/1".to_string()],
            container.keys().unwrap()
        );
    }

    #[test]
    fn test_delete_container() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path());
        let container = cache.open("recipes-cache-v1").unwrap();
        container.put("http://localhost/api/v1/recipes/1", "{}").unwrap();
        assert!(cache.delete("recipes-cache-v1").unwrap());
        assert!(!dir.path().join("recipes-cache-v1").exists());
        assert!(!cache.delete("recipes-cache-v1").unwrap());
    }

    #[test]
    fn test_open_missing_location_is_store_unavailable() {
        let cache = FileCache::new("/path/does/not/exist");
        match cache.open("recipes-cache-v1") {
            Err(err) => match err.downcast_ref::<RCError>() {
                Some(RCError::StoreUnavailable(_)) => {}
                _ => panic!("Expected StoreUnavailable, got {err}"),
            },
            Ok(_) => panic!("Expected StoreUnavailable"),
        }
    }

    #[test]
    fn test_invalid_container_name() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path());
        assert!(cache.open("../escape").is_err());
        assert!(cache.delete("").is_err());
    }

    #[test]
    fn test_validate_cache_location() {
        let dir = TempDir::new().unwrap();
        assert!(FileCache::new(dir.path()).validate_cache_location().is_ok());
        let err = FileCache::new("/path/does/not/exist")
            .validate_cache_location()
            .unwrap_err();
        match err.downcast_ref::<RCError>() {
            Some(RCError::CacheLocationDoesNotExist(_)) => {}
            _ => panic!("Expected CacheLocationDoesNotExist"),
        }
    }
}
