use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{AddContext, RCError};
use crate::storage::FastStore;
use crate::Result;
use crate::{log_debug, log_warn};

type Items = BTreeMap<String, String>;

/// Fast store persisted as a single JSON object on disk. The whole object is
/// loaded when the store is opened, then read again and rewritten on every
/// change so keys written by other processes in between are kept.
pub struct LocalStorage {
    path: PathBuf,
    quota: u64,
    items: RefCell<Items>,
}

impl LocalStorage {
    pub fn open<P: Into<PathBuf>>(path: P, quota: u64) -> Result<Self> {
        let path = path.into();
        let items = match File::open(&path) {
            Ok(f) => match serde_json::from_reader::<_, Items>(BufReader::new(f)) {
                Ok(items) => items,
                Err(err) => {
                    // Nothing in there can be trusted. Keep the file around
                    // for inspection and start over.
                    let aside = path.with_extension("json.corrupt");
                    log_warn!(
                        "Fast store {} is corrupt ({}), moving it to {}",
                        path.display(),
                        err,
                        aside.display()
                    );
                    fs::rename(&path, &aside).err_context(format!(
                        "Unable to move corrupt fast store {} aside",
                        path.display()
                    ))?;
                    Items::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Items::new(),
            Err(e) => {
                return Err(e).err_context(format!("Unable to open fast store {}", path.display()))
            }
        };
        log_debug!("Fast store {} opened with {} keys", path.display(), items.len());
        Ok(LocalStorage {
            path,
            quota,
            items: RefCell::new(items),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Contents of the file right now. Other processes share it, so every
    /// change starts from here rather than from what was loaded at open.
    /// An unreadable file leaves the loaded contents in place.
    fn latest(&self) -> Items {
        match File::open(&self.path) {
            Ok(f) => match serde_json::from_reader::<_, Items>(BufReader::new(f)) {
                Ok(items) => items,
                Err(err) => {
                    log_warn!("Fast store {} unreadable: {}", self.path.display(), err);
                    self.items.borrow().clone()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Items::new(),
            Err(e) => {
                log_warn!("Fast store {} unreadable: {}", self.path.display(), e);
                self.items.borrow().clone()
            }
        }
    }

    fn persist(&self, items: &Items) -> Result<()> {
        let mut tmp_path = self.path.clone().into_os_string();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);
        let write = || -> Result<()> {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            serde_json::to_writer(&mut writer, items)?;
            writer.flush()?;
            fs::rename(&tmp_path, &self.path)?;
            Ok(())
        };
        write().map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            RCError::StoreWriteFailure(format!("{}: {e}", self.path.display())).into()
        })
    }
}

fn usage(items: &Items) -> u64 {
    items.iter().map(|(k, v)| (k.len() + v.len()) as u64).sum()
}

impl FastStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.latest();
        items.insert(key.to_string(), value.to_string());
        let used = usage(&items);
        if used > self.quota {
            return Err(RCError::StoreWriteFailure(format!(
                "quota exceeded writing {key}: {used} bytes of {}",
                self.quota
            ))
            .into());
        }
        self.persist(&items)?;
        *self.items.borrow_mut() = items;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut items = self.latest();
        if items.remove(key).is_some() {
            self.persist(&items)?;
        }
        *self.items.borrow_mut() = items;
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.items.borrow().len())
    }

    fn key(&self, index: usize) -> Result<Option<String>> {
        Ok(self.items.borrow().keys().nth(index).cloned())
    }
}
