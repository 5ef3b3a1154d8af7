use crate::core::error::StoreError;
use crate::storage::backend::{Entries, KvBackend};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Journal line types
#[derive(Debug, Clone, PartialEq)]
pub enum JournalEntry {
    Set { key: String, value: String },
    Remove { key: String },
}

impl JournalEntry {
    fn to_line(&self) -> String {
        match self {
            JournalEntry::Set { key, value } => {
                format!("SET|{}|{}", key, hex::encode(value.as_bytes()))
            }
            JournalEntry::Remove { key } => format!("DEL|{}", key),
        }
    }

    fn from_line(line: &str) -> Result<Self, StoreError> {
        let parts: Vec<&str> = line.splitn(3, '|').collect();

        match parts.first() {
            Some(&"SET") => {
                if parts.len() != 3 || parts[1].is_empty() {
                    return Err(StoreError::Journal("Invalid SET format".to_string()));
                }
                let bytes = hex::decode(parts[2])
                    .map_err(|e| StoreError::Journal(format!("Invalid value hex: {}", e)))?;
                let value = String::from_utf8(bytes)
                    .map_err(|e| StoreError::Journal(format!("Value is not UTF-8: {}", e)))?;

                Ok(JournalEntry::Set {
                    key: parts[1].to_string(),
                    value,
                })
            }
            Some(&"DEL") => {
                if parts.len() != 2 || parts[1].is_empty() {
                    return Err(StoreError::Journal("Invalid DEL format".to_string()));
                }
                Ok(JournalEntry::Remove {
                    key: parts[1].to_string(),
                })
            }
            _ => Err(StoreError::Journal("Unknown entry type".to_string())),
        }
    }
}

/// Durable backend: an append-only journal replayed into memory on open
pub struct JournalBackend {
    entries: Entries,
    file: Mutex<File>,
    path: PathBuf,
}

impl JournalBackend {
    pub fn open(path: impl Into<PathBuf>, quota: Option<usize>) -> Result<Self, StoreError> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        let entries = Entries::new(quota);
        let replayed = Self::replay(&path)?;
        let replayed_count = replayed.len();
        for entry in replayed {
            match entry {
                JournalEntry::Set { key, value } => entries.insert(&key, value),
                JournalEntry::Remove { key } => {
                    entries.remove(&key);
                }
            }
        }

        tracing::debug!(
            path = %path.display(),
            entries_replayed = replayed_count,
            live_keys = entries.len(),
            "Journal opened"
        );

        Ok(Self {
            entries,
            file: Mutex::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn replay(path: &Path) -> Result<Vec<JournalEntry>, StoreError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            match JournalEntry::from_line(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!(
                        line_num = line_num + 1,
                        error = %e,
                        "Failed to parse journal line, skipping"
                    );
                }
            }
        }

        Ok(entries)
    }

    fn append(&self, entry: &JournalEntry) -> Result<(), StoreError> {
        let line = entry.to_line();
        let mut file = self.file.lock().map_err(|_| StoreError::Poisoned)?;
        writeln!(file, "{}", line)?;
        file.flush()?;
        Ok(())
    }

    /// Rewrite the journal with one SET line per live key
    ///
    /// The snapshot is written and synced to a sibling file, which then
    /// replaces the journal. On failure the old journal is left as it was.
    pub fn compact(&self) -> Result<(), StoreError> {
        let mut file = self.file.lock().map_err(|_| StoreError::Poisoned)?;
        let snapshot = self.entries.snapshot();
        let staging = self.staging_path();

        let staged = match Self::write_snapshot(&staging, &snapshot) {
            Ok(staged) => staged,
            Err(e) => {
                let _ = fs::remove_file(&staging);
                return Err(e);
            }
        };

        // The append handle follows the staged file through the rename
        if let Err(e) = fs::rename(&staging, &self.path) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }
        *file = staged;

        tracing::info!(path = %self.path.display(), live_keys = snapshot.len(), "Journal compacted");
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".compact");
        PathBuf::from(name)
    }

    fn write_snapshot(path: &Path, snapshot: &[(String, String)]) -> Result<File, StoreError> {
        let mut staged = File::create(path)?;
        for (key, value) in snapshot {
            let entry = JournalEntry::Set {
                key: key.clone(),
                value: value.clone(),
            };
            writeln!(staged, "{}", entry.to_line())?;
        }
        staged.sync_all()?;

        Ok(OpenOptions::new().append(true).open(path)?)
    }
}

fn check_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() || key.contains('|') || key.contains('\n') {
        return Err(StoreError::Journal(format!("Invalid key: {:?}", key)));
    }
    Ok(())
}

impl KvBackend for JournalBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key))
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        check_key(key)?;
        self.entries.check_quota(key, &value)?;

        self.append(&JournalEntry::Set {
            key: key.to_string(),
            value: value.clone(),
        })?;
        self.entries.insert(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        if !self.entries.contains(key) {
            return Ok(());
        }

        self.append(&JournalEntry::Remove {
            key: key.to_string(),
        })?;
        self.entries.remove(key);
        Ok(())
    }

    fn usage_bytes(&self) -> usize {
        self.entries.usage_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_entry_lines() {
        let entry = JournalEntry::Set {
            key: "electricien_categories".to_string(),
            value: r#"["Normes|Guides"]"#.to_string(),
        };
        let line = entry.to_line();
        assert_eq!(
            line,
            format!(
                "SET|electricien_categories|{}",
                hex::encode(r#"["Normes|Guides"]"#)
            )
        );
        assert_eq!(JournalEntry::from_line(&line).unwrap(), entry);

        let entry = JournalEntry::Remove {
            key: "electricien_auth".to_string(),
        };
        assert_eq!(entry.to_line(), "DEL|electricien_auth");
        assert_eq!(JournalEntry::from_line("DEL|electricien_auth").unwrap(), entry);
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.journal");

        {
            let journal = JournalBackend::open(&path, None).unwrap();
            journal.set("a", "first\nline".to_string()).unwrap();
            journal.set("b", "2".to_string()).unwrap();
            journal.set("a", "replaced".to_string()).unwrap();
            journal.remove("b").unwrap();
        }

        let journal = JournalBackend::open(&path, None).unwrap();
        assert_eq!(journal.get("a").unwrap().as_deref(), Some("replaced"));
        assert!(journal.get("b").unwrap().is_none());
    }

    #[test]
    fn test_invalid_lines_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.journal");

        fs::write(
            &path,
            format!("BOGUS|data\nSET|k|zz\n\nSET|k|{}\n", hex::encode("ok")),
        )
        .unwrap();

        let journal = JournalBackend::open(&path, None).unwrap();
        assert_eq!(journal.get("k").unwrap().as_deref(), Some("ok"));
    }

    #[test]
    fn test_compact_keeps_only_live_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.journal");

        let journal = JournalBackend::open(&path, None).unwrap();
        for i in 0..5 {
            journal.set("counter", i.to_string()).unwrap();
        }
        journal.set("gone", "x".to_string()).unwrap();
        journal.remove("gone").unwrap();

        journal.compact().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);

        // Writes after compaction still append
        journal.set("next", "y".to_string()).unwrap();
        drop(journal);

        let journal = JournalBackend::open(&path, None).unwrap();
        assert_eq!(journal.get("counter").unwrap().as_deref(), Some("4"));
        assert_eq!(journal.get("next").unwrap().as_deref(), Some("y"));
        assert!(journal.get("gone").unwrap().is_none());
    }

    #[test]
    fn test_failed_compaction_keeps_old_journal() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.journal");

        let journal = JournalBackend::open(&path, None).unwrap();
        journal.set("a", "1".to_string()).unwrap();
        journal.set("a", "2".to_string()).unwrap();
        journal.set("b", "3".to_string()).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        // A directory in the staging spot makes the snapshot write fail
        fs::create_dir(temp_dir.path().join("store.journal.compact")).unwrap();
        assert!(journal.compact().is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);

        // Appends still reach the original journal
        journal.set("c", "4".to_string()).unwrap();
        drop(journal);

        let journal = JournalBackend::open(&path, None).unwrap();
        assert_eq!(journal.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(journal.get("b").unwrap().as_deref(), Some("3"));
        assert_eq!(journal.get("c").unwrap().as_deref(), Some("4"));
    }

    #[test]
    fn test_compaction_leaves_no_staging_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.journal");

        let journal = JournalBackend::open(&path, None).unwrap();
        journal.set("a", "1".to_string()).unwrap();
        journal.compact().unwrap();

        assert_eq!(journal.path(), path.as_path());
        assert!(!temp_dir.path().join("store.journal.compact").exists());
    }

    #[test]
    fn test_quota_rejects_without_appending() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.journal");

        let journal = JournalBackend::open(&path, Some(8)).unwrap();
        journal.set("k", "small".to_string()).unwrap();

        let err = journal.set("k2", "too large".to_string()).unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_keys_with_separator_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let journal = JournalBackend::open(temp_dir.path().join("j"), None).unwrap();

        assert!(journal.set("bad|key", "v".to_string()).is_err());
        assert!(journal.set("", "v".to_string()).is_err());
    }
}
