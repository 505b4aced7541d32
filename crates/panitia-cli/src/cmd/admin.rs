use crate::cmd::record;
use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::NaiveDate;
use clap::Subcommand;
use panitia_core::activity::ActivityLog;
use panitia_core::division::Division;
use panitia_core::repository::Repository;
use panitia_core::roster::RosterEntry;
use panitia_core::task::Task;
use std::path::Path;

#[derive(Subcommand)]
pub enum AdminSubcommand {
    /// Add a roster entry
    RosterAdd {
        id: String,
        name: String,
        division: String,
        phone: String,
    },
    /// Edit a roster entry; only supplied, non-empty fields overwrite
    RosterEdit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        division: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Remove a roster entry
    RosterRemove { id: String },
    /// List roster entries, sorted by id
    RosterList,
    /// Search roster entries by id or name
    RosterSearch { query: String },
    /// Create a division
    DivisionAdd { name: String },
    /// List divisions with their tasks
    DivisionList,
    /// Add a task to a division
    TaskAdd {
        division: String,
        id: String,
        title: String,
        #[arg(default_value = "")]
        description: String,
        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<NaiveDate>,
    },
    /// Remove a task from a division
    TaskRemove { division: String, task_id: String },
    /// Change the admin password
    Passwd { new_password: String },
    /// Show the full admin activity history
    History,
}

pub fn run(
    data_dir: &Path,
    username: &str,
    password: &str,
    subcmd: AdminSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    let mut repo = Repository::open(data_dir)?;
    let admin = repo
        .authenticate_admin(username, password)
        .cloned()
        .context("authentication failed")?;
    let log = ActivityLog::admin(data_dir);
    let actor = admin.username().to_string();

    match subcmd {
        AdminSubcommand::RosterAdd {
            id,
            name,
            division,
            phone,
        } => roster_add(&mut repo, &log, &actor, id, name, division, phone, json),
        AdminSubcommand::RosterEdit {
            id,
            name,
            division,
            phone,
        } => roster_edit(&mut repo, &log, &actor, &id, name, division, phone, json),
        AdminSubcommand::RosterRemove { id } => roster_remove(&mut repo, &log, &actor, &id, json),
        AdminSubcommand::RosterList => roster_list(&repo, json),
        AdminSubcommand::RosterSearch { query } => roster_search(&repo, &query, json),
        AdminSubcommand::DivisionAdd { name } => division_add(&mut repo, &log, &actor, name, json),
        AdminSubcommand::DivisionList => division_list(&repo, json),
        AdminSubcommand::TaskAdd {
            division,
            id,
            title,
            description,
            deadline,
        } => task_add(
            &mut repo,
            &log,
            &actor,
            &division,
            id,
            title,
            description,
            deadline,
            json,
        ),
        AdminSubcommand::TaskRemove { division, task_id } => {
            task_remove(&mut repo, &log, &actor, &division, &task_id, json)
        }
        AdminSubcommand::Passwd { new_password } => {
            passwd(&mut repo, &log, &actor, &new_password, json)
        }
        AdminSubcommand::History => history(&log, json),
    }
}

#[allow(clippy::too_many_arguments)]
fn roster_add(
    repo: &mut Repository,
    log: &ActivityLog,
    actor: &str,
    id: String,
    name: String,
    division: String,
    phone: String,
    json: bool,
) -> anyhow::Result<()> {
    let entry = RosterEntry::new(id, name, division, phone)?;
    let entry_id = entry.id.clone();
    repo.add_roster_entry(entry)?;
    repo.save_all().context("failed to save data")?;
    record(log, actor, &format!("TAMBAH_ANGGOTA,{entry_id}"));

    if json {
        print_json(&serde_json::json!({ "id": entry_id, "added": true }))?;
    } else {
        println!("Added roster entry [{entry_id}]");
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn roster_edit(
    repo: &mut Repository,
    log: &ActivityLog,
    actor: &str,
    id: &str,
    name: Option<String>,
    division: Option<String>,
    phone: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    repo.update_roster_entry(id, |entry| {
        if let Some(n) = name.filter(|s| !s.is_empty()) {
            entry.name = n;
        }
        if let Some(d) = division.filter(|s| !s.is_empty()) {
            entry.division = d;
        }
        if let Some(p) = phone.filter(|s| !s.is_empty()) {
            entry.phone = p;
        }
    })?;
    repo.save_all().context("failed to save data")?;
    record(log, actor, &format!("EDIT_ANGGOTA,{id}"));

    if json {
        print_json(&serde_json::json!({ "id": id, "updated": true }))?;
    } else {
        println!("Updated roster entry [{id}]");
    }
    Ok(())
}

fn roster_remove(
    repo: &mut Repository,
    log: &ActivityLog,
    actor: &str,
    id: &str,
    json: bool,
) -> anyhow::Result<()> {
    let removed = repo.remove_roster_entry(id);
    if removed {
        repo.save_all().context("failed to save data")?;
        record(log, actor, &format!("HAPUS_ANGGOTA,{id}"));
    }

    if json {
        print_json(&serde_json::json!({ "id": id, "removed": removed }))?;
    } else if removed {
        println!("Removed roster entry [{id}]");
    } else {
        println!("No roster entry [{id}].");
    }
    Ok(())
}

fn roster_list(repo: &Repository, json: bool) -> anyhow::Result<()> {
    let mut entries = repo.roster_entries().to_vec();
    entries.sort_by(|a, b| a.id.cmp(&b.id));

    if json {
        print_json(&entries)?;
        return Ok(());
    }

    if entries.is_empty() {
        println!("No roster entries.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = entries
        .into_iter()
        .map(|e| vec![e.id, e.name, e.division, e.phone])
        .collect();
    print_table(&["ID", "NAME", "DIVISION", "PHONE"], rows);
    Ok(())
}

fn roster_search(repo: &Repository, query: &str, json: bool) -> anyhow::Result<()> {
    let q = query.to_lowercase();
    let matches: Vec<_> = repo
        .roster_entries()
        .iter()
        .filter(|e| e.id.to_lowercase().contains(&q) || e.name.to_lowercase().contains(&q))
        .cloned()
        .collect();

    if json {
        print_json(&matches)?;
        return Ok(());
    }

    if matches.is_empty() {
        println!("No roster entries matching '{}'.", query);
        return Ok(());
    }
    let rows: Vec<Vec<String>> = matches
        .into_iter()
        .map(|e| vec![e.id, e.name, e.division, e.phone])
        .collect();
    print_table(&["ID", "NAME", "DIVISION", "PHONE"], rows);
    Ok(())
}

fn division_add(
    repo: &mut Repository,
    log: &ActivityLog,
    actor: &str,
    name: String,
    json: bool,
) -> anyhow::Result<()> {
    let division = Division::new(name)?;
    let division_name = division.name.clone();
    repo.add_division(division)?;
    repo.save_all().context("failed to save data")?;
    record(log, actor, &format!("TAMBAH_DIVISI,{division_name}"));

    if json {
        print_json(&serde_json::json!({ "name": division_name, "added": true }))?;
    } else {
        println!("Added division '{division_name}'");
    }
    Ok(())
}

fn division_list(repo: &Repository, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(&repo.divisions())?;
        return Ok(());
    }

    if repo.divisions().is_empty() {
        println!("No divisions.");
        return Ok(());
    }
    let mut rows: Vec<Vec<String>> = Vec::new();
    for division in repo.divisions() {
        if division.tasks.is_empty() {
            rows.push(vec![
                division.name.clone(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
            ]);
        }
        for task in &division.tasks {
            rows.push(vec![
                division.name.clone(),
                task.id.clone(),
                task.status.to_string(),
                task.title.clone(),
            ]);
        }
    }
    print_table(&["DIVISION", "TASK ID", "STATUS", "TITLE"], rows);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn task_add(
    repo: &mut Repository,
    log: &ActivityLog,
    actor: &str,
    division: &str,
    id: String,
    title: String,
    description: String,
    deadline: Option<NaiveDate>,
    json: bool,
) -> anyhow::Result<()> {
    let mut task = Task::new(id, title, description);
    if let Some(deadline) = deadline {
        task = task.with_deadline(deadline);
    }
    let task_id = task.id.clone();
    repo.add_task(division, task)
        .with_context(|| format!("cannot add task to division '{division}'"))?;
    repo.save_all().context("failed to save data")?;
    record(log, actor, &format!("TAMBAH_TUGAS,{task_id}"));

    if json {
        print_json(&serde_json::json!({ "division": division, "task_id": task_id, "added": true }))?;
    } else {
        println!("Added task [{task_id}] to '{division}'");
    }
    Ok(())
}

fn task_remove(
    repo: &mut Repository,
    log: &ActivityLog,
    actor: &str,
    division: &str,
    task_id: &str,
    json: bool,
) -> anyhow::Result<()> {
    repo.remove_task(division, task_id)
        .with_context(|| format!("cannot remove task from division '{division}'"))?;
    repo.save_all().context("failed to save data")?;
    record(log, actor, &format!("HAPUS_TUGAS,{task_id}"));

    if json {
        print_json(&serde_json::json!({ "division": division, "task_id": task_id, "removed": true }))?;
    } else {
        println!("Removed task [{task_id}] from '{division}'");
    }
    Ok(())
}

fn passwd(
    repo: &mut Repository,
    log: &ActivityLog,
    actor: &str,
    new_password: &str,
    json: bool,
) -> anyhow::Result<()> {
    if new_password.is_empty() {
        anyhow::bail!("password must not be empty");
    }
    repo.update_account(actor, |a| a.set_password(new_password))?;
    repo.save_all().context("failed to save data")?;
    record(log, actor, "GANTI_PASSWORD");

    if json {
        print_json(&serde_json::json!({ "username": actor, "updated": true }))?;
    } else {
        println!("Password updated");
    }
    Ok(())
}

fn history(log: &ActivityLog, json: bool) -> anyhow::Result<()> {
    let records = log.query_all();

    if json {
        print_json(&records)?;
        return Ok(());
    }

    if records.is_empty() {
        println!("No recorded activity.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = records
        .into_iter()
        .map(|r| vec![r.actor, r.event, r.timestamp])
        .collect();
    print_table(&["ACTOR", "EVENT", "TIME"], rows);
    Ok(())
}
