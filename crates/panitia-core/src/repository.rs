use crate::account::Account;
use crate::division::Division;
use crate::error::{PanitiaError, Result};
use crate::io;
use crate::paths;
use crate::roster::RosterEntry;
use crate::task::Task;
use crate::types::TaskStatus;
use std::path::{Path, PathBuf};

const DIV_MARKER: &str = "DIV";
const TASK_MARKER: &str = "TASK";

/// The single source of truth for accounts, roster entries, and divisions.
///
/// All three collections live fully in memory and preserve insertion
/// order, so repeated saves of unchanged state are byte-identical.
/// Mutations do not flush automatically; call sites run `save_all` once
/// the operation is complete.
#[derive(Debug)]
pub struct Repository {
    data_dir: PathBuf,
    accounts: Vec<Account>,
    roster: Vec<RosterEntry>,
    divisions: Vec<Division>,
}

impl Repository {
    /// Open the repository at `data_dir`, creating the directory if
    /// missing. On a first run (none of the backing files exist) the
    /// default data set is seeded and persisted immediately; otherwise
    /// all three files are loaded.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        if let Err(e) = io::ensure_dir(&data_dir) {
            // Non-fatal: continue with an empty store.
            tracing::warn!(dir = %data_dir.display(), error = %e, "cannot create data directory");
        }

        let mut repo = Self {
            data_dir,
            accounts: Vec::new(),
            roster: Vec::new(),
            divisions: Vec::new(),
        };

        let first_run = !paths::accounts_path(&repo.data_dir).exists()
            && !paths::roster_path(&repo.data_dir).exists()
            && !paths::divisions_path(&repo.data_dir).exists();

        if first_run {
            repo.seed_defaults();
            repo.save_all()?;
        } else {
            repo.load_all();
        }
        Ok(repo)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn roster_entries(&self) -> &[RosterEntry] {
        &self.roster
    }

    pub fn divisions(&self) -> &[Division] {
        &self.divisions
    }

    fn seed_defaults(&mut self) {
        self.accounts
            .push(Account::admin("admin", "admin123", "Administrator"));
        self.accounts
            .push(Account::member("user1", "user123", "User Contoh", "U1"));
        self.roster.push(RosterEntry {
            id: "U1".to_string(),
            name: "User Contoh".to_string(),
            division: "Acara".to_string(),
            phone: "081234567890".to_string(),
        });
        let mut acara = Division {
            name: "Acara".to_string(),
            tasks: Vec::new(),
        };
        acara
            .tasks
            .push(Task::new("T1", "Menyusun rundown", "Rundown acara hari H"));
        self.divisions.push(acara);
    }

    // ---------------------------------------------------------------------------
    // Accounts
    // ---------------------------------------------------------------------------

    /// Case-insensitive exact lookup by username.
    pub fn find_account(&self, username: &str) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|a| a.username().eq_ignore_ascii_case(username))
    }

    /// Append an account. Declined on an empty username/password or a
    /// username already taken (case-insensitive); no partial mutation.
    pub fn add_account(&mut self, account: Account) -> Result<()> {
        if account.username().trim().is_empty() {
            return Err(PanitiaError::EmptyField("username"));
        }
        if account.password().is_empty() {
            return Err(PanitiaError::EmptyField("password"));
        }
        if self.find_account(account.username()).is_some() {
            return Err(PanitiaError::AccountExists(account.username().to_string()));
        }
        self.accounts.push(account);
        Ok(())
    }

    /// Succeeds only for an admin account with a matching password.
    /// Wrong role and wrong password both fail the same way.
    pub fn authenticate_admin(&self, username: &str, password: &str) -> Option<&Account> {
        match self.find_account(username) {
            Some(account @ Account::Admin { password: p, .. }) if p == password => Some(account),
            _ => None,
        }
    }

    /// Succeeds only for a member account with a matching password.
    pub fn authenticate_member(&self, username: &str, password: &str) -> Option<&Account> {
        match self.find_account(username) {
            Some(account @ Account::Member { password: p, .. }) if p == password => Some(account),
            _ => None,
        }
    }

    /// Apply `f` to the account with the given username.
    pub fn update_account(
        &mut self,
        username: &str,
        f: impl FnOnce(&mut Account),
    ) -> Result<()> {
        let account = self
            .accounts
            .iter_mut()
            .find(|a| a.username().eq_ignore_ascii_case(username))
            .ok_or_else(|| PanitiaError::AccountNotFound(username.to_string()))?;
        f(account);
        Ok(())
    }

    // ---------------------------------------------------------------------------
    // Roster
    // ---------------------------------------------------------------------------

    /// Exact lookup by id.
    pub fn find_roster_entry(&self, id: &str) -> Option<&RosterEntry> {
        self.roster.iter().find(|e| e.id == id)
    }

    /// Append a roster entry. Declined on an empty id/name or a duplicate
    /// id; the existing entry is left untouched.
    pub fn add_roster_entry(&mut self, entry: RosterEntry) -> Result<()> {
        if entry.id.trim().is_empty() {
            return Err(PanitiaError::EmptyField("id"));
        }
        if entry.name.trim().is_empty() {
            return Err(PanitiaError::EmptyField("name"));
        }
        if self.find_roster_entry(&entry.id).is_some() {
            return Err(PanitiaError::RosterEntryExists(entry.id));
        }
        self.roster.push(entry);
        Ok(())
    }

    /// Apply `f` to the entry with the given id. The explicit update
    /// contract replacing find-then-mutate aliasing.
    pub fn update_roster_entry(
        &mut self,
        id: &str,
        f: impl FnOnce(&mut RosterEntry),
    ) -> Result<()> {
        let entry = self
            .roster
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| PanitiaError::RosterEntryNotFound(id.to_string()))?;
        f(entry);
        Ok(())
    }

    /// Remove the entry with the given id. Returns false when absent.
    /// No cascade: accounts and divisions referencing it are untouched.
    pub fn remove_roster_entry(&mut self, id: &str) -> bool {
        match self.roster.iter().position(|e| e.id == id) {
            Some(pos) => {
                self.roster.remove(pos);
                true
            }
            None => false,
        }
    }

    // ---------------------------------------------------------------------------
    // Divisions and tasks
    // ---------------------------------------------------------------------------

    /// Case-insensitive exact lookup by name.
    pub fn find_division(&self, name: &str) -> Option<&Division> {
        self.divisions
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }

    /// Append a division. Declined on a name already taken, compared
    /// case-insensitively.
    pub fn add_division(&mut self, division: Division) -> Result<()> {
        if division.name.trim().is_empty() {
            return Err(PanitiaError::EmptyField("division name"));
        }
        if self.find_division(&division.name).is_some() {
            return Err(PanitiaError::DivisionExists(division.name));
        }
        self.divisions.push(division);
        Ok(())
    }

    pub fn add_task(&mut self, division_name: &str, task: Task) -> Result<()> {
        self.find_division_mut(division_name)?.add_task(task)
    }

    pub fn remove_task(&mut self, division_name: &str, task_id: &str) -> Result<()> {
        let division = self.find_division_mut(division_name)?;
        if !division.remove_task(task_id) {
            return Err(PanitiaError::TaskNotFound(task_id.to_string()));
        }
        Ok(())
    }

    pub fn set_task_status(
        &mut self,
        division_name: &str,
        task_id: &str,
        status: TaskStatus,
    ) -> Result<()> {
        self.find_division_mut(division_name)?
            .set_task_status(task_id, status)
    }

    fn find_division_mut(&mut self, name: &str) -> Result<&mut Division> {
        self.divisions
            .iter_mut()
            .find(|d| d.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| PanitiaError::DivisionNotFound(name.to_string()))
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    /// Serialize all three collections, fully overwriting each backing
    /// file. Insertion order is preserved, so re-saving unchanged state
    /// is byte-identical.
    pub fn save_all(&self) -> Result<()> {
        let accounts: String = self
            .accounts
            .iter()
            .map(|a| a.encode() + "\n")
            .collect();
        io::atomic_write(&paths::accounts_path(&self.data_dir), accounts.as_bytes())?;

        let roster: String = self.roster.iter().map(|e| e.encode() + "\n").collect();
        io::atomic_write(&paths::roster_path(&self.data_dir), roster.as_bytes())?;

        let mut divisions = String::new();
        for division in &self.divisions {
            divisions.push_str(&format!("{DIV_MARKER}|{}\n", division.name));
            for task in &division.tasks {
                divisions.push_str(&format!("{TASK_MARKER}|{}\n", task.encode()));
            }
        }
        io::atomic_write(
            &paths::divisions_path(&self.data_dir),
            divisions.as_bytes(),
        )?;
        Ok(())
    }

    /// Fully replace the in-memory collections from disk. Malformed lines
    /// are skipped individually; an unreadable file is logged and leaves
    /// that collection empty rather than aborting the load.
    pub fn load_all(&mut self) {
        self.accounts = read_lines(&paths::accounts_path(&self.data_dir))
            .iter()
            .filter_map(|l| Account::decode(l))
            .collect();

        self.roster = read_lines(&paths::roster_path(&self.data_dir))
            .iter()
            .filter_map(|l| RosterEntry::decode(l))
            .collect();

        self.divisions = Vec::new();
        let mut current: Option<Division> = None;
        for line in read_lines(&paths::divisions_path(&self.data_dir)) {
            match line.split_once('|') {
                Some((DIV_MARKER, name)) => {
                    if let Some(done) = current.take() {
                        self.divisions.push(done);
                    }
                    // An empty name orphans the block; its task lines are dropped.
                    if !name.is_empty() {
                        current = Some(Division {
                            name: name.to_string(),
                            tasks: Vec::new(),
                        });
                    }
                }
                Some((TASK_MARKER, payload)) => {
                    if let (Some(division), Some(task)) = (current.as_mut(), Task::decode(payload))
                    {
                        division.tasks.push(task);
                    }
                }
                _ => {}
            }
        }
        if let Some(done) = current.take() {
            self.divisions.push(done);
        }
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    if !path.exists() {
        return Vec::new();
    }
    match std::fs::read_to_string(path) {
        Ok(content) => content
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect(),
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "cannot read data file");
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open(dir: &TempDir) -> Repository {
        Repository::open(dir.path()).unwrap()
    }

    #[test]
    fn first_run_seeds_default_data() {
        let dir = TempDir::new().unwrap();
        let repo = open(&dir);

        let admin = repo.authenticate_admin("admin", "admin123").unwrap();
        assert_eq!(admin.display_name(), "Administrator");

        let member = repo.authenticate_member("user1", "user123").unwrap();
        assert_eq!(member.roster_id(), Some("U1"));

        let entry = repo.find_roster_entry("U1").unwrap();
        assert_eq!(entry.name, "User Contoh");
        assert_eq!(entry.division, "Acara");

        let acara = repo.find_division("Acara").unwrap();
        assert_eq!(acara.tasks.len(), 1);
        assert_eq!(acara.tasks[0].id, "T1");
        assert_eq!(acara.tasks[0].status, TaskStatus::Todo);

        // Seeding persists immediately.
        assert!(dir.path().join(paths::ACCOUNTS_FILE).exists());
        assert!(dir.path().join(paths::ROSTER_FILE).exists());
        assert!(dir.path().join(paths::DIVISIONS_FILE).exists());
    }

    #[test]
    fn authenticate_is_case_insensitive_on_username_only() {
        let dir = TempDir::new().unwrap();
        let repo = open(&dir);
        assert!(repo.authenticate_admin("ADMIN", "admin123").is_some());
        assert!(repo.authenticate_admin("admin", "wrong").is_none());
        // Wrong role fails the same way as a wrong password.
        assert!(repo.authenticate_admin("user1", "user123").is_none());
        assert!(repo.authenticate_member("admin", "admin123").is_none());
    }

    #[test]
    fn add_then_find_returns_equal_entry() {
        let dir = TempDir::new().unwrap();
        let mut repo = open(&dir);
        let entry = RosterEntry::new("U2", "Budi", "Humas", "0812").unwrap();
        repo.add_roster_entry(entry.clone()).unwrap();
        assert_eq!(repo.find_roster_entry("U2"), Some(&entry));
    }

    #[test]
    fn duplicate_roster_id_is_declined_without_mutation() {
        let dir = TempDir::new().unwrap();
        let mut repo = open(&dir);
        repo.add_roster_entry(RosterEntry::new("U2", "Budi", "Humas", "0812").unwrap())
            .unwrap();
        let err = repo
            .add_roster_entry(RosterEntry::new("U2", "Siti", "Acara", "0813").unwrap())
            .unwrap_err();
        assert!(matches!(err, PanitiaError::RosterEntryExists(_)));
        assert_eq!(repo.find_roster_entry("U2").unwrap().name, "Budi");
    }

    #[test]
    fn division_names_are_unique_case_insensitively() {
        let dir = TempDir::new().unwrap();
        let mut repo = open(&dir);
        repo.add_division(Division::new("Humas").unwrap()).unwrap();
        let err = repo.add_division(Division::new("HUMAS").unwrap()).unwrap_err();
        assert!(matches!(err, PanitiaError::DivisionExists(_)));
    }

    #[test]
    fn duplicate_username_is_declined_case_insensitively() {
        let dir = TempDir::new().unwrap();
        let mut repo = open(&dir);
        let err = repo
            .add_account(Account::member("ADMIN", "x", "Clone", "U9"))
            .unwrap_err();
        assert!(matches!(err, PanitiaError::AccountExists(_)));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let mut repo = open(&dir);
        repo.add_roster_entry(RosterEntry::new("U2", "Budi", "Humas", "0812").unwrap())
            .unwrap();
        repo.add_division(Division::new("Humas").unwrap()).unwrap();
        repo.add_task(
            "Humas",
            Task::new("T1", "Sebar undangan", "Undangan sponsor"),
        )
        .unwrap();
        repo.add_account(Account::member("budi", "rahasia", "Budi", "U2"))
            .unwrap();
        repo.save_all().unwrap();

        let reopened = open(&dir);
        assert_eq!(reopened.accounts(), repo.accounts());
        assert_eq!(reopened.roster_entries(), repo.roster_entries());
        assert_eq!(reopened.divisions(), repo.divisions());
    }

    #[test]
    fn resaving_unchanged_state_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let repo = open(&dir);
        let read_all = || {
            [
                paths::ACCOUNTS_FILE,
                paths::ROSTER_FILE,
                paths::DIVISIONS_FILE,
            ]
            .map(|f| std::fs::read(dir.path().join(f)).unwrap())
        };
        let before = read_all();
        repo.save_all().unwrap();
        assert_eq!(before, read_all());
    }

    #[test]
    fn task_status_survives_a_save_load_cycle() {
        let dir = TempDir::new().unwrap();
        let mut repo = open(&dir);
        repo.set_task_status("Acara", "T1", TaskStatus::Done).unwrap();
        repo.save_all().unwrap();

        let reopened = open(&dir);
        assert_eq!(
            reopened.find_division("Acara").unwrap().tasks[0].status,
            TaskStatus::Done
        );
    }

    #[test]
    fn malformed_roster_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(paths::ROSTER_FILE),
            "U1,User Contoh,Acara,0812\nU2,too short\n",
        )
        .unwrap();
        let repo = open(&dir);
        assert_eq!(repo.roster_entries().len(), 1);
        assert_eq!(repo.roster_entries()[0].id, "U1");
        // A present roster file suppresses seeding; the other collections
        // simply load empty.
        assert!(repo.accounts().is_empty());
    }

    #[test]
    fn malformed_division_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(paths::DIVISIONS_FILE),
            "DIV|Acara\nTASK|T1|a|b||TODO\nTASK|broken\nnoise\nDIV|Humas\n",
        )
        .unwrap();
        let repo = open(&dir);
        assert_eq!(repo.divisions().len(), 2);
        assert_eq!(repo.divisions()[0].tasks.len(), 1);
        assert!(repo.divisions()[1].tasks.is_empty());
    }

    #[test]
    fn update_roster_entry_is_explicit() {
        let dir = TempDir::new().unwrap();
        let mut repo = open(&dir);
        repo.update_roster_entry("U1", |e| e.phone = "0899".to_string())
            .unwrap();
        assert_eq!(repo.find_roster_entry("U1").unwrap().phone, "0899");

        let err = repo.update_roster_entry("U9", |e| e.phone.clear()).unwrap_err();
        assert!(matches!(err, PanitiaError::RosterEntryNotFound(_)));
    }

    #[test]
    fn remove_roster_entry_has_no_cascade() {
        let dir = TempDir::new().unwrap();
        let mut repo = open(&dir);
        assert!(repo.remove_roster_entry("U1"));
        assert!(!repo.remove_roster_entry("U1"));
        // The member account keeps its now-dangling link.
        let member = repo.find_account("user1").unwrap();
        assert_eq!(member.roster_id(), Some("U1"));
    }

    #[test]
    fn update_account_changes_password() {
        let dir = TempDir::new().unwrap();
        let mut repo = open(&dir);
        repo.update_account("user1", |a| a.set_password("baru123"))
            .unwrap();
        assert!(repo.authenticate_member("user1", "user123").is_none());
        assert!(repo.authenticate_member("user1", "baru123").is_some());
    }

    #[test]
    fn task_ops_require_an_existing_division() {
        let dir = TempDir::new().unwrap();
        let mut repo = open(&dir);
        let err = repo
            .add_task("Konsumsi", Task::new("T1", "a", ""))
            .unwrap_err();
        assert!(matches!(err, PanitiaError::DivisionNotFound(_)));
        assert!(repo.remove_task("Acara", "T9").is_err());
        repo.remove_task("Acara", "T1").unwrap();
        assert!(repo.find_division("Acara").unwrap().tasks.is_empty());
    }
}
