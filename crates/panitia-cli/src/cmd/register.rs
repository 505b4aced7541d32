use crate::output::print_json;
use anyhow::Context;
use panitia_core::account::Account;
use panitia_core::repository::Repository;
use std::path::Path;

/// Member self-registration. The roster link is taken as given and may
/// point at a roster entry that does not exist yet.
pub fn run(
    data_dir: &Path,
    username: &str,
    password: &str,
    display_name: &str,
    roster_id: &str,
    json: bool,
) -> anyhow::Result<()> {
    let mut repo = Repository::open(data_dir)?;
    repo.add_account(Account::member(username, password, display_name, roster_id))
        .context("registration declined")?;
    repo.save_all().context("failed to save data")?;

    if json {
        print_json(&serde_json::json!({
            "username": username,
            "role": "member",
            "roster_id": roster_id,
        }))?;
    } else {
        println!("Registered member '{username}'");
    }
    Ok(())
}
