//! Account command handlers.

use crate::config::Config;

use super::{build_gateway, establish_session, read_line};

pub async fn cmd_account_show(config: &Config) -> anyhow::Result<()> {
    let gateway = build_gateway(config)?;
    let session = establish_session(config, gateway.as_ref()).await?;
    let account = session.account();

    println!("Account");
    println!("{:-<70}", "");
    println!("ID:          {}", account.id);
    println!("Username:    {}", account.username);
    println!(
        "Active config: {}",
        account
            .active_config_id
            .map_or("(none)".to_string(), |id| id.to_string())
    );
    if let Some(gateway_url) = &account.custom_connection_gateway {
        println!("Gateway:     {gateway_url}");
    }
    let plan = match (account.is_pro, account.is_sponsor) {
        (true, true) => "pro, sponsor",
        (true, false) => "pro",
        (false, true) => "sponsor",
        (false, false) => "free",
    };
    println!("Plan:        {plan}");

    Ok(())
}

pub async fn cmd_account_create(config: &Config, username: &str) -> anyhow::Result<()> {
    let gateway = build_gateway(config)?;
    let created = gateway.create_account(username).await?;

    println!("✓ Created account: {} (ID: {})", created.username, created.id);
    println!();
    println!("Credential: {}", created.token);
    println!();
    println!("Store this credential now. It is shown exactly once and");
    println!("cannot be retrieved again.");

    Ok(())
}

pub async fn cmd_account_delete(config: &Config) -> anyhow::Result<()> {
    let gateway = build_gateway(config)?;
    let session = establish_session(config, gateway.as_ref()).await?;

    println!(
        "This permanently deletes account '{}' and every config record it owns.",
        session.account().username
    );
    println!("Enter the current credential to confirm:");

    let confirmation = read_line()?;
    if confirmation != session.credential() {
        println!("Credential does not match. Cancelled.");
        return Ok(());
    }

    gateway.delete_account(session.credential()).await?;
    println!("✓ Account deleted.");

    Ok(())
}
