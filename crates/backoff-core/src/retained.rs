use crate::record::{PersistentBackoffRecord, RECORD_LEN};
use anyhow::Context;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File-backed stand-in for retained memory.
///
/// Holds an exclusive lock on the file for as long as it lives, so only one
/// handle can touch a given record at a time. Changes reach the file only on
/// [`RetainedFile::flush`].
#[derive(Debug)]
pub struct RetainedFile {
    path: PathBuf,
    file: File,
    record: PersistentBackoffRecord,
}

impl RetainedFile {
    /// Opens the record, waiting for any other holder to release it.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let file = open_file(path)?;
        file.lock_exclusive()
            .with_context(|| format!("lock retained record {}", path.display()))?;
        Self::load(path, file)
    }

    /// Opens the record, or returns `None` when another handle holds it.
    pub fn try_open(path: &Path) -> anyhow::Result<Option<Self>> {
        let file = open_file(path)?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self::load(path, file)?)),
            Err(err) if is_lock_held(&err) => Ok(None),
            Err(err) => Err(err).context("lock retained record exclusively"),
        }
    }

    fn load(path: &Path, mut file: File) -> anyhow::Result<Self> {
        // One extra byte is enough to tell an oversized file apart.
        let mut data = Vec::with_capacity(RECORD_LEN + 1);
        (&mut file)
            .take(RECORD_LEN as u64 + 1)
            .read_to_end(&mut data)
            .with_context(|| format!("read retained record {}", path.display()))?;
        if data.len() != RECORD_LEN {
            debug!(path = %path.display(), "retained record has unexpected size");
        }
        let mut bytes = [0u8; RECORD_LEN];
        let len = data.len().min(RECORD_LEN);
        bytes[..len].copy_from_slice(&data[..len]);
        Ok(Self {
            path: path.to_path_buf(),
            file,
            record: PersistentBackoffRecord::from_bytes(bytes),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self) -> &PersistentBackoffRecord {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut PersistentBackoffRecord {
        &mut self.record
    }

    pub fn flush(&mut self) -> anyhow::Result<()> {
        self.file
            .seek(SeekFrom::Start(0))
            .context("seek retained record")?;
        self.file
            .write_all(&self.record.to_bytes())
            .context("write retained record")?;
        self.file
            .set_len(RECORD_LEN as u64)
            .context("truncate retained record")?;
        self.file.sync_all().context("sync retained record")?;
        Ok(())
    }
}

impl Drop for RetainedFile {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

fn open_file(path: &Path) -> anyhow::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create retained record directory")?;
    }
    OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(path)
        .with_context(|| format!("open retained record {}", path.display()))
}

fn is_lock_held(err: &std::io::Error) -> bool {
    if err.kind() == std::io::ErrorKind::WouldBlock {
        return true;
    }
    matches!(err.raw_os_error(), Some(33))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{MAGIC, VERSION};
    use crate::state::BackoffState;
    use tempfile::TempDir;

    #[test]
    fn counter_survives_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("retained").join("default.bin");

        {
            let mut retained = RetainedFile::open(&path).unwrap();
            let mut state = BackoffState::new(retained.record_mut());
            assert_eq!(state.record_failure_and_get_wait_secs(), 300);
            assert_eq!(state.record_failure_and_get_wait_secs(), 600);
            retained.flush().unwrap();
        }

        let mut retained = RetainedFile::open(&path).unwrap();
        let mut state = BackoffState::new(retained.record_mut());
        assert_eq!(state.tries_count(), 2);
        assert_eq!(state.record_failure_and_get_wait_secs(), 900);
    }

    #[test]
    fn unflushed_changes_are_lost() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("default.bin");

        {
            let mut retained = RetainedFile::open(&path).unwrap();
            BackoffState::new(retained.record_mut()).record_success();
            retained.flush().unwrap();
        }
        {
            let mut retained = RetainedFile::open(&path).unwrap();
            BackoffState::new(retained.record_mut()).record_failure_and_get_wait_secs();
        }

        let retained = RetainedFile::open(&path).unwrap();
        assert_eq!(retained.record().tries, 0);
    }

    #[test]
    fn short_file_heals() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("short.bin");
        fs::write(&path, [0x08, 0xc7]).unwrap();

        let mut retained = RetainedFile::open(&path).unwrap();
        assert!(!retained.record().is_valid());
        let mut state = BackoffState::new(retained.record_mut());
        assert_eq!(state.tries_count(), 0);
        retained.flush().unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes.len(), RECORD_LEN);
        let record = PersistentBackoffRecord::from_bytes(bytes.try_into().unwrap());
        assert_eq!(record.magic, MAGIC);
        assert_eq!(record.version, VERSION);
    }

    #[test]
    fn oversized_file_is_truncated_on_flush() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("long.bin");
        fs::write(&path, [0x5a; 32]).unwrap();

        let mut retained = RetainedFile::open(&path).unwrap();
        BackoffState::new(retained.record_mut()).record_success();
        retained.flush().unwrap();

        assert_eq!(fs::read(&path).unwrap().len(), RECORD_LEN);
    }

    #[test]
    fn oversized_file_reads_leading_record() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("long.bin");
        let mut data = PersistentBackoffRecord {
            tries: 3,
            ..PersistentBackoffRecord::initialized()
        }
        .to_bytes()
        .to_vec();
        data.extend(std::iter::repeat_n(0xee, 4096));
        fs::write(&path, data).unwrap();

        let retained = RetainedFile::open(&path).unwrap();
        assert!(retained.record().is_valid());
        assert_eq!(retained.record().tries, 3);
    }

    #[test]
    fn try_open_skips_when_locked() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("default.bin");

        let _guard = RetainedFile::open(&path).unwrap();
        let second = RetainedFile::try_open(&path).unwrap();
        assert!(second.is_none());
    }
}
