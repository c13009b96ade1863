use crate::table::BackoffTable;
use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_COUNTER: &str = "default";

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackoffConfig {
    #[serde(default)]
    pub table: Option<Vec<u8>>,
    #[serde(default)]
    pub counters: BTreeMap<String, Vec<u8>>,
    #[serde(default)]
    pub retained_dir: Option<PathBuf>,
}

impl BackoffConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path).context("read config")?;
        let config = serde_json::from_str(&data).context("parse config")?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("create config directory")?;
        }
        let data = serde_json::to_string_pretty(self).context("serialize config")?;
        fs::write(path, data).context("write config")?;
        Ok(())
    }

    /// Minutes configured for a counter, falling back to the global table.
    /// `None` means the built-in default.
    pub fn table_for(&self, counter: &str) -> Option<&[u8]> {
        self.counters
            .get(counter)
            .or(self.table.as_ref())
            .map(Vec::as_slice)
    }

    /// Validated table for a counter.
    pub fn backoff_table(&self, counter: &str) -> anyhow::Result<BackoffTable<'_>> {
        match self.table_for(counter) {
            Some(minutes) => BackoffTable::new(minutes)
                .with_context(|| format!("invalid backoff table for counter {counter}")),
            None => Ok(BackoffTable::DEFAULT),
        }
    }

    /// Stores a table after validating it. `None` for `counter` sets the
    /// global table.
    pub fn set_table(&mut self, counter: Option<&str>, minutes: Vec<u8>) -> anyhow::Result<()> {
        BackoffTable::new(&minutes).context("invalid backoff table")?;
        match counter {
            Some(name) => {
                validate_counter_name(name)?;
                self.counters.insert(name.to_string(), minutes);
            }
            None => self.table = Some(minutes),
        }
        Ok(())
    }

    /// Drops a custom table. Returns false when nothing was configured.
    pub fn reset_table(&mut self, counter: Option<&str>) -> bool {
        match counter {
            Some(name) => self.counters.remove(name).is_some(),
            None => self.table.take().is_some(),
        }
    }

    pub fn retained_path(&self, counter: &str) -> anyhow::Result<PathBuf> {
        let dir = match &self.retained_dir {
            Some(dir) => dir.clone(),
            None => default_retained_dir()?,
        };
        retained_path_in(&dir, counter)
    }
}

pub fn retained_path_in(dir: &Path, counter: &str) -> anyhow::Result<PathBuf> {
    validate_counter_name(counter)?;
    Ok(dir.join(format!("{counter}.bin")))
}

/// Counter names become file names as-is, so only `[a-z0-9_-]` is accepted.
/// Mapping other characters, or case-insensitive file systems, would let two
/// names share a record.
pub fn validate_counter_name(name: &str) -> anyhow::Result<()> {
    if name.is_empty() {
        anyhow::bail!("counter name must not be empty");
    }
    if let Some(ch) = name.chars().find(|ch| !is_counter_char(*ch)) {
        anyhow::bail!(
            "counter name {name:?} contains {ch:?}; use lowercase letters, digits, '-' or '_'"
        );
    }
    Ok(())
}

fn is_counter_char(ch: char) -> bool {
    matches!(ch, 'a'..='z' | '0'..='9' | '-' | '_')
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let project = ProjectDirs::from("com", "retained-backoff", "retained-backoff")
        .context("resolve project dirs")?;
    Ok(project.config_dir().join("config.json"))
}

pub fn default_retained_dir() -> anyhow::Result<PathBuf> {
    let project = ProjectDirs::from("com", "retained-backoff", "retained-backoff")
        .context("resolve project dirs")?;
    Ok(project.data_local_dir().join("retained"))
}
