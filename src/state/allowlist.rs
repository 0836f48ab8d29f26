//! Durable allow-list of trusted principals.
//!
//! # Persistence
//!
//! The list lives in a small JSON document, `{ "users": ["<id>", ...] }`,
//! rewritten in full on every mutation. Writes go to a sibling temp file that
//! is then renamed over the target so a crash never leaves half a document.
//!
//! # Consistency
//!
//! All access goes through one mutex. A mutation is persisted while the lock
//! is still held and only then acknowledged; if the write fails the in-memory
//! change is rolled back, so memory and disk never disagree.

use super::Principal;
use crate::error::StoreError;
use crate::metrics;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// On-disk shape of the allow-list.
#[derive(Debug, Default, Deserialize)]
struct AllowListDocument {
    #[serde(default)]
    users: Vec<Principal>,
}

#[derive(Serialize)]
struct AllowListDocumentRef<'a> {
    users: &'a [Principal],
}

/// The set of principals allowed to use the bot, in insertion order.
#[derive(Debug)]
pub struct AllowList {
    path: PathBuf,
    users: Mutex<Vec<Principal>>,
}

impl AllowList {
    /// Load the allow-list from `path`, creating an empty document if absent.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if !path.exists() {
            save(&path, &[])?;
            info!(path = %path.display(), "Created empty allow-list");
            return Ok(Self {
                path,
                users: Mutex::new(Vec::new()),
            });
        }

        let file = File::open(&path)?;
        let document: AllowListDocument = serde_json::from_reader(BufReader::new(file))?;

        let total = document.users.len();
        let mut seen = HashSet::with_capacity(total);
        let users: Vec<Principal> = document
            .users
            .into_iter()
            .filter(|p| seen.insert(*p))
            .collect();
        if users.len() != total {
            warn!(
                path = %path.display(),
                duplicates = total - users.len(),
                "Allow-list file contained duplicate entries; keeping first occurrences"
            );
        }

        info!(path = %path.display(), count = users.len(), "Loaded allow-list");
        Ok(Self {
            path,
            users: Mutex::new(users),
        })
    }

    /// Whether `principal` is allow-listed.
    pub fn contains(&self, principal: Principal) -> bool {
        self.users.lock().contains(&principal)
    }

    /// Add `principal`. Returns `false` (and writes nothing) if already present.
    pub fn add(&self, principal: Principal) -> Result<bool, StoreError> {
        let mut users = self.users.lock();
        if users.contains(&principal) {
            return Ok(false);
        }

        users.push(principal);
        if let Err(e) = save(&self.path, &users) {
            users.pop();
            return Err(e);
        }

        metrics::set_allowlist_size(users.len());
        debug!(principal = %principal, "Principal added to allow-list");
        Ok(true)
    }

    /// Remove `principal`. Returns `false` (and writes nothing) if absent.
    pub fn remove(&self, principal: Principal) -> Result<bool, StoreError> {
        let mut users = self.users.lock();
        let Some(index) = users.iter().position(|p| *p == principal) else {
            return Ok(false);
        };

        users.remove(index);
        if let Err(e) = save(&self.path, &users) {
            users.insert(index, principal);
            return Err(e);
        }

        metrics::set_allowlist_size(users.len());
        debug!(principal = %principal, "Principal removed from allow-list");
        Ok(true)
    }

    /// Snapshot of all principals in insertion order.
    pub fn list(&self) -> Vec<Principal> {
        self.users.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.users.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.lock().is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write the full document atomically (temp file + rename).
///
/// Runs synchronously under the store lock: the document is a few hundred
/// bytes and mutations are rare, so blocking a worker briefly is acceptable.
fn save(path: &Path, users: &[Principal]) -> Result<(), StoreError> {
    let mut temp_name: OsString = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let result = write_document(&temp_path, users)
        .and_then(|()| fs::rename(&temp_path, path).map_err(StoreError::from));
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_document(temp_path: &Path, users: &[Principal]) -> Result<(), StoreError> {
    let file = File::create(temp_path)?;
    let mut writer = BufWriter::new(file);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    AllowListDocumentRef { users }.serialize(&mut serializer)?;
    writer.write_all(b"\n")?;

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(())
}
