use crate::error::Result;
use crate::io;
use crate::paths;
use serde::Serialize;
use std::path::{Path, PathBuf};

const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// One parsed `timestamp|actor|event` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub timestamp: String,
    pub actor: String,
    pub event: String,
}

/// Append-only activity trail backed by a dedicated file. Two scoped
/// instances exist: the admin log and the member log. Prior lines are
/// never rewritten; there is no rotation or compaction.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    pub fn admin(data_dir: &Path) -> Self {
        Self {
            path: paths::admin_log_path(data_dir),
        }
    }

    pub fn member(data_dir: &Path) -> Self {
        Self {
            path: paths::member_log_path(data_dir),
        }
    }

    /// Append `timestamp|actor|event`, creating the file and its parent
    /// directory on first use. The line is flushed before returning.
    pub fn append(&self, actor: &str, event: &str) -> Result<()> {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FMT);
        io::append_line(&self.path, &format!("{timestamp}|{actor}|{event}"))
    }

    /// All records whose actor field equals `actor`, compared
    /// case-SENSITIVELY. This mismatches the case-insensitive matching
    /// used elsewhere; kept as observed behavior, see DESIGN.md.
    pub fn query_for(&self, actor: &str) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.actor == actor)
            .collect()
    }

    /// Every record, unfiltered.
    pub fn query_all(&self) -> Vec<LogRecord> {
        self.records()
    }

    fn records(&self) -> Vec<LogRecord> {
        if !self.path.exists() {
            return Vec::new();
        }
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(file = %self.path.display(), error = %e, "cannot read activity log");
                return Vec::new();
            }
        };
        content
            .lines()
            .filter_map(|line| {
                // Fewer than 3 pipe-separated fields is malformed.
                let mut fields = line.splitn(3, '|');
                Some(LogRecord {
                    timestamp: fields.next()?.to_string(),
                    actor: fields.next()?.to_string(),
                    event: fields.next()?.to_string(),
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn append_creates_file_on_first_use() {
        let dir = TempDir::new().unwrap();
        let log = ActivityLog::member(dir.path());
        log.append("U1", "UPDATE_TUGAS,T1,user1").unwrap();
        assert!(dir.path().join(paths::MEMBER_LOG_FILE).exists());
    }

    #[test]
    fn query_for_is_case_sensitive() {
        let dir = TempDir::new().unwrap();
        let log = ActivityLog::member(dir.path());
        log.append("U1", "UPDATE_TUGAS,T1,user1").unwrap();

        let records = log.query_for("U1");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].event, "UPDATE_TUGAS,T1,user1");

        // Differing case finds nothing.
        assert!(log.query_for("u1").is_empty());
    }

    #[test]
    fn query_all_returns_every_actor() {
        let dir = TempDir::new().unwrap();
        let log = ActivityLog::admin(dir.path());
        log.append("admin", "TAMBAH_ANGGOTA,U2").unwrap();
        log.append("admin2", "HAPUS_ANGGOTA,U3").unwrap();

        let records = log.query_all();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].actor, "admin");
        assert_eq!(records[1].event, "HAPUS_ANGGOTA,U3");
    }

    #[test]
    fn appends_never_truncate() {
        let dir = TempDir::new().unwrap();
        let log = ActivityLog::member(dir.path());
        log.append("U1", "first").unwrap();
        log.append("U1", "second").unwrap();
        assert_eq!(log.query_for("U1").len(), 2);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(paths::MEMBER_LOG_FILE);
        std::fs::write(&path, "only-one-field\ntwo|fields\n2025-01-01 10:00:00|U1|ok\n").unwrap();
        let log = ActivityLog::member(dir.path());
        assert_eq!(log.query_all().len(), 1);
    }

    #[test]
    fn timestamps_use_the_fixed_format() {
        let dir = TempDir::new().unwrap();
        let log = ActivityLog::member(dir.path());
        log.append("U1", "x").unwrap();
        let records = log.query_all();
        assert!(chrono::NaiveDateTime::parse_from_str(&records[0].timestamp, TIMESTAMP_FMT).is_ok());
    }

    #[test]
    fn event_text_may_contain_pipes() {
        let dir = TempDir::new().unwrap();
        let log = ActivityLog::member(dir.path());
        log.append("U1", "a|b").unwrap();
        assert_eq!(log.query_for("U1")[0].event, "a|b");
    }
}
