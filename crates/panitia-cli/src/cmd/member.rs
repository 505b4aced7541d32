use crate::cmd::record;
use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use panitia_core::activity::ActivityLog;
use panitia_core::repository::Repository;
use panitia_core::types::TaskStatus;
use std::path::Path;

#[derive(Subcommand)]
pub enum MemberSubcommand {
    /// Show the member's own roster profile
    Profile,
    /// List the member's division tasks, sorted by id
    Tasks,
    /// Update the status of a task in the member's own division
    UpdateStatus {
        task_id: String,
        /// New status: in_progress or done
        status: TaskStatus,
    },
    /// Search divisions and tasks globally
    Search { query: String },
    /// Filter tasks by status and/or division
    Filter {
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        division: Option<String>,
    },
    /// Change the member password
    Passwd { new_password: String },
    /// Show the member's own activity history
    History,
}

pub fn run(
    data_dir: &Path,
    username: &str,
    password: &str,
    subcmd: MemberSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    let mut repo = Repository::open(data_dir)?;
    let member = repo
        .authenticate_member(username, password)
        .cloned()
        .context("authentication failed")?;
    let log = ActivityLog::member(data_dir);
    let roster_id = member.roster_id().unwrap_or_default().to_string();

    match subcmd {
        MemberSubcommand::Profile => profile(&repo, &roster_id, json),
        MemberSubcommand::Tasks => tasks(&repo, &roster_id, json),
        MemberSubcommand::UpdateStatus { task_id, status } => update_status(
            &mut repo,
            &log,
            &roster_id,
            member.username(),
            &task_id,
            status,
            json,
        ),
        MemberSubcommand::Search { query } => search(&repo, &query, json),
        MemberSubcommand::Filter { status, division } => filter(&repo, status, division, json),
        MemberSubcommand::Passwd { new_password } => passwd(
            &mut repo,
            &log,
            &roster_id,
            member.username(),
            &new_password,
            json,
        ),
        MemberSubcommand::History => history(&log, &roster_id, json),
    }
}

fn profile(repo: &Repository, roster_id: &str, json: bool) -> anyhow::Result<()> {
    let Some(entry) = repo.find_roster_entry(roster_id) else {
        println!("(roster data not found)");
        return Ok(());
    };

    if json {
        print_json(entry)?;
        return Ok(());
    }

    println!("ID:       {}", entry.id);
    println!("Name:     {}", entry.name);
    println!("Division: {}", entry.division);
    println!("Phone:    {}", entry.phone);
    Ok(())
}

fn tasks(repo: &Repository, roster_id: &str, json: bool) -> anyhow::Result<()> {
    let Some(entry) = repo.find_roster_entry(roster_id) else {
        println!("(roster data not found)");
        return Ok(());
    };
    let Some(division) = repo.find_division(&entry.division) else {
        println!("(division not found)");
        return Ok(());
    };

    let mut tasks = division.tasks.clone();
    tasks.sort_by(|a, b| a.id.cmp(&b.id));

    if json {
        print_json(&tasks)?;
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks for '{}'.", division.name);
        return Ok(());
    }
    let rows: Vec<Vec<String>> = tasks
        .into_iter()
        .map(|t| {
            vec![
                t.id,
                t.status.to_string(),
                t.title,
                t.deadline
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    print_table(&["ID", "STATUS", "TITLE", "DEADLINE"], rows);
    Ok(())
}

fn update_status(
    repo: &mut Repository,
    log: &ActivityLog,
    roster_id: &str,
    username: &str,
    task_id: &str,
    status: TaskStatus,
    json: bool,
) -> anyhow::Result<()> {
    if status == TaskStatus::Todo {
        anyhow::bail!("status must be IN_PROGRESS or DONE");
    }

    let division = repo
        .find_roster_entry(roster_id)
        .map(|e| e.division.clone())
        .context("no roster data for this account")?;
    repo.set_task_status(&division, task_id, status)
        .with_context(|| format!("cannot update task in division '{division}'"))?;
    repo.save_all().context("failed to save data")?;
    record(log, roster_id, &format!("UPDATE_TUGAS,{task_id},{username}"));

    if json {
        print_json(&serde_json::json!({
            "task_id": task_id,
            "status": status,
            "updated": true,
        }))?;
    } else {
        println!("Task [{task_id}] is now {status}");
    }
    Ok(())
}

fn search(repo: &Repository, query: &str, json: bool) -> anyhow::Result<()> {
    let q = query.to_lowercase();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for division in repo.divisions() {
        if division.name.to_lowercase().contains(&q) {
            rows.push(vec![
                division.name.clone(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
            ]);
        }
        for task in &division.tasks {
            if task.id.to_lowercase().contains(&q) || task.title.to_lowercase().contains(&q) {
                rows.push(vec![
                    division.name.clone(),
                    task.id.clone(),
                    task.status.to_string(),
                    task.title.clone(),
                ]);
            }
        }
    }

    if json {
        let items: Vec<serde_json::Value> = rows
            .iter()
            .map(|r| {
                serde_json::json!({
                    "division": r[0],
                    "task_id": r[1],
                    "status": r[2],
                    "title": r[3],
                })
            })
            .collect();
        print_json(&items)?;
        return Ok(());
    }

    if rows.is_empty() {
        println!("No divisions or tasks matching '{}'.", query);
        return Ok(());
    }
    print_table(&["DIVISION", "TASK ID", "STATUS", "TITLE"], rows);
    Ok(())
}

fn filter(
    repo: &Repository,
    status: Option<TaskStatus>,
    division: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    for d in repo.divisions() {
        if let Some(wanted) = &division {
            if !d.name.eq_ignore_ascii_case(wanted) {
                continue;
            }
        }
        for task in &d.tasks {
            if let Some(wanted) = status {
                if task.status != wanted {
                    continue;
                }
            }
            rows.push(vec![
                d.name.clone(),
                task.id.clone(),
                task.status.to_string(),
                task.title.clone(),
            ]);
        }
    }

    if json {
        let items: Vec<serde_json::Value> = rows
            .iter()
            .map(|r| {
                serde_json::json!({
                    "division": r[0],
                    "task_id": r[1],
                    "status": r[2],
                    "title": r[3],
                })
            })
            .collect();
        print_json(&items)?;
        return Ok(());
    }

    if rows.is_empty() {
        println!("No tasks match the filter.");
        return Ok(());
    }
    print_table(&["DIVISION", "TASK ID", "STATUS", "TITLE"], rows);
    Ok(())
}

fn passwd(
    repo: &mut Repository,
    log: &ActivityLog,
    roster_id: &str,
    username: &str,
    new_password: &str,
    json: bool,
) -> anyhow::Result<()> {
    if new_password.is_empty() {
        anyhow::bail!("password must not be empty");
    }
    repo.update_account(username, |a| a.set_password(new_password))?;
    repo.save_all().context("failed to save data")?;
    record(log, roster_id, "GANTI_PASSWORD");

    if json {
        print_json(&serde_json::json!({ "username": username, "updated": true }))?;
    } else {
        println!("Password updated");
    }
    Ok(())
}

fn history(log: &ActivityLog, roster_id: &str, json: bool) -> anyhow::Result<()> {
    let records = log.query_for(roster_id);

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
        .map(|r| vec![r.timestamp, r.event])
        .collect();
    print_table(&["TIME", "EVENT"], rows);
    Ok(())
}
