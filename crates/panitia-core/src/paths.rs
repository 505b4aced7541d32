use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// File name constants
// ---------------------------------------------------------------------------

/// Default data directory, relative to the working directory.
pub const DATA_DIR: &str = "data";

pub const ACCOUNTS_FILE: &str = "accounts.txt";
pub const ROSTER_FILE: &str = "anggota.txt";
pub const DIVISIONS_FILE: &str = "divisi.txt";
pub const ADMIN_LOG_FILE: &str = "riwayat_admin.txt";
pub const MEMBER_LOG_FILE: &str = "riwayat_member.txt";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn accounts_path(data_dir: &Path) -> PathBuf {
    data_dir.join(ACCOUNTS_FILE)
}

pub fn roster_path(data_dir: &Path) -> PathBuf {
    data_dir.join(ROSTER_FILE)
}

pub fn divisions_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DIVISIONS_FILE)
}

pub fn admin_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(ADMIN_LOG_FILE)
}

pub fn member_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(MEMBER_LOG_FILE)
}
