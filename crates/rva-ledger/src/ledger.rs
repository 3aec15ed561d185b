//! Append-only ledger file: one JSON object per line, all writes serialized
//! under a single process-wide mutex (§4.5, §5).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rva_core::errors::{RvaError, RvaResult};
use rva_core::{Digest, Timestamp};
use tracing::{debug, info};

use crate::records::{Manifest, Record};

const DEFAULT_LEDGER_PATH: &str = "data/ledger.jsonl";

#[derive(Default)]
struct AppendState {
    last_register_stamp: Option<Timestamp>,
}

/// A handle to one ledger file. All mutation goes through `&self` methods
/// that take the internal mutex; there is no global state.
pub struct Ledger {
    path: PathBuf,
    state: Mutex<AppendState>,
}

impl Ledger {
    /// Open (without creating) a ledger at `path`. The parent directory is
    /// created eagerly so the first append never fails on a missing dir.
    pub fn open<P: AsRef<Path>>(path: P) -> RvaResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path, state: Mutex::new(AppendState::default()) })
    }

    /// Open the ledger at the default path (`data/ledger.jsonl`).
    pub fn open_default() -> RvaResult<Self> {
        Self::open(DEFAULT_LEDGER_PATH)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a register record for `object_hash`, stamped with the current
    /// time clamped to stay strictly after the previous register's stamp.
    pub fn append_register(
        &self,
        object_hash: Digest,
        canonical_json: Option<&[u8]>,
    ) -> RvaResult<Record> {
        let mut state = self.state.lock();

        let stamp = match state.last_register_stamp {
            Some(prev) => Timestamp::now().clamped_after(&prev),
            None => Timestamp::now(),
        };
        state.last_register_stamp = Some(stamp);

        let record = Record::register(object_hash, stamp, canonical_json);
        self.append_line(&record)?;
        debug!(object_hash = %object_hash, "appended register record");
        Ok(record)
    }

    /// Append a seal record. Fails with [`RvaError::NoRegistrations`] if no
    /// register has been appended since the previous seal (or ever), and
    /// does not modify the file in that case.
    pub fn append_seal(&self, manifest: Manifest) -> RvaResult<Record> {
        let state = self.state.lock();

        let last_seal_ts = self.last_seal_timestamp()?;
        let pending = self.registers_strictly_after(last_seal_ts)?;
        if pending.is_empty() {
            return Err(RvaError::NoRegistrations);
        }

        let record = Record::seal(manifest);
        self.append_line(&record)?;
        info!(pending_registers = pending.len(), "appended seal record");
        drop(state);
        Ok(record)
    }

    /// Register records with `timestamp > ts`, in file order. A missing
    /// ledger file is treated as empty.
    pub fn list_registers_since(&self, ts: Timestamp) -> RvaResult<Vec<Record>> {
        self.registers_strictly_after(Some(ts))
    }

    fn registers_strictly_after(&self, ts: Option<Timestamp>) -> RvaResult<Vec<Record>> {
        Ok(self
            .read_all_records()?
            .into_iter()
            .filter(|r| match r {
                Record::Register { timestamp, .. } => ts.is_none_or(|floor| *timestamp > floor),
                Record::Seal { .. } => false,
            })
            .collect())
    }

    fn last_seal_timestamp(&self) -> RvaResult<Option<Timestamp>> {
        Ok(self
            .read_all_records()?
            .into_iter()
            .filter_map(|r| match r {
                Record::Seal { manifest } => Some(manifest.timestamp),
                Record::Register { .. } => None,
            })
            .next_back())
    }

    /// Parse every well-formed line in file order. Any unparseable line, or
    /// a trailing line missing its terminating LF, surfaces as
    /// [`RvaError::LedgerCorrupt`] and halts the read.
    fn read_all_records(&self) -> RvaResult<Vec<Record>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RvaError::LedgerIO(e)),
        };
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        if *bytes.last().expect("checked non-empty above") != b'\n' {
            return Err(RvaError::LedgerCorrupt(
                "trailing line is not LF-terminated (partial write)".into(),
            ));
        }

        let text = std::str::from_utf8(&bytes)
            .map_err(|e| RvaError::LedgerCorrupt(format!("ledger is not valid UTF-8: {e}")))?;

        let mut records = Vec::new();
        for line in text.lines() {
            if line.is_empty() {
                continue;
            }
            let record: Record = serde_json::from_str(line)
                .map_err(|e| RvaError::LedgerCorrupt(format!("malformed record line: {e}")))?;
            records.push(record);
        }
        Ok(records)
    }

    fn append_line(&self, record: &Record) -> RvaResult<()> {
        let mut bytes = serde_json::to_vec(record)
            .map_err(|e| RvaError::Canonicalization(e.to_string()))?;
        bytes.push(b'\n');

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rva_core::hashing::sha256;
    use rva_core::{PublicKey, Signature};
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn manifest() -> Manifest {
        Manifest {
            merkle_root: sha256(b"root"),
            signature: Signature::from_bytes([7u8; 64]),
            public_key: PublicKey::from_bytes([9u8; 32]),
            timestamp: Timestamp::now(),
        }
    }

    #[test]
    fn seal_with_no_registers_fails_and_leaves_file_empty() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::open(dir.path().join("ledger.jsonl")).unwrap();

        assert!(matches!(ledger.append_seal(manifest()), Err(RvaError::NoRegistrations)));
        let contents = std::fs::read(ledger.path()).unwrap_or_default();
        assert!(contents.is_empty());
    }

    #[test]
    fn k_registers_then_list_since_epoch_returns_exactly_k() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::open(dir.path().join("ledger.jsonl")).unwrap();

        for i in 0..5 {
            ledger.append_register(sha256(format!("obj-{i}").as_bytes()), None).unwrap();
        }

        let epoch = Timestamp::from_rfc3339("1970-01-01T00:00:00.000000000Z").unwrap();
        let records = ledger.list_registers_since(epoch).unwrap();
        assert_eq!(records.len(), 5);
    }

    #[test]
    fn seal_succeeds_once_a_register_exists_and_then_requires_a_fresh_one() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::open(dir.path().join("ledger.jsonl")).unwrap();

        ledger.append_register(sha256(b"a"), None).unwrap();
        ledger.append_seal(manifest()).unwrap();

        assert!(matches!(ledger.append_seal(manifest()), Err(RvaError::NoRegistrations)));

        ledger.append_register(sha256(b"b"), None).unwrap();
        assert!(ledger.append_seal(manifest()).is_ok());
    }

    #[test]
    fn missing_file_is_treated_as_empty() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::open(dir.path().join("does-not-exist.jsonl")).unwrap();
        let epoch = Timestamp::from_rfc3339("1970-01-01T00:00:00.000000000Z").unwrap();
        assert_eq!(ledger.list_registers_since(epoch).unwrap().len(), 0);
    }

    #[test]
    fn truncated_trailing_line_is_reported_as_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.jsonl");
        let ledger = Ledger::open(&path).unwrap();
        ledger.append_register(sha256(b"a"), None).unwrap();

        let mut bytes = std::fs::read(&path).unwrap();
        bytes.pop();
        std::fs::write(&path, bytes).unwrap();

        let epoch = Timestamp::from_rfc3339("1970-01-01T00:00:00.000000000Z").unwrap();
        assert!(matches!(ledger.list_registers_since(epoch), Err(RvaError::LedgerCorrupt(_))));
    }

    #[test]
    fn unparseable_line_is_reported_as_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.jsonl");
        std::fs::write(&path, b"not json at all\n").unwrap();
        let ledger = Ledger::open(&path).unwrap();

        let epoch = Timestamp::from_rfc3339("1970-01-01T00:00:00.000000000Z").unwrap();
        assert!(matches!(ledger.list_registers_since(epoch), Err(RvaError::LedgerCorrupt(_))));
    }

    #[test]
    fn ten_threads_five_appends_each_yields_exactly_fifty_well_formed_records() {
        let dir = TempDir::new().unwrap();
        let ledger = Arc::new(Ledger::open(dir.path().join("ledger.jsonl")).unwrap());

        let handles: Vec<_> = (0..10)
            .map(|t| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    for i in 0..5 {
                        ledger
                            .append_register(sha256(format!("t{t}-{i}").as_bytes()), None)
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let epoch = Timestamp::from_rfc3339("1970-01-01T00:00:00.000000000Z").unwrap();
        let records = ledger.list_registers_since(epoch).unwrap();
        assert_eq!(records.len(), 50);
    }
}
