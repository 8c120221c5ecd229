// ABOUTME: CLI commands for service account management
// ABOUTME: Create, list, and delete accounts; deletion removes every owned token

use anyhow::Context;
use clap::Subcommand;
use colored::*;
use inquire::Confirm;

use warden_cli::output::{accounts_table, format_date};
use warden_cli::AppContext;
use warden_core::ServiceAccountId;

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a service account
    Create {
        /// Account name
        name: String,
    },
    /// List all service accounts
    List,
    /// Delete a service account and all of its tokens
    Delete {
        /// Service account ID
        id: ServiceAccountId,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn handle_account_command(
    ctx: &AppContext,
    command: AccountCommands,
) -> anyhow::Result<i32> {
    match command {
        AccountCommands::Create { name } => create_account(ctx, &name).await,
        AccountCommands::List => list_accounts(ctx).await,
        AccountCommands::Delete { id, yes } => delete_account(ctx, id, yes).await,
    }
}

async fn create_account(ctx: &AppContext, name: &str) -> anyhow::Result<i32> {
    let account = ctx
        .accounts
        .create(name)
        .await
        .context("Failed to create service account")?;

    println!(
        "{} Created service account '{}' (ID {})",
        "✓".green().bold(),
        account.name,
        account.id.to_string().cyan()
    );
    println!(
        "  Use {} to issue its first token",
        format!("warden token issue {}", account.id).yellow()
    );
    Ok(0)
}

async fn list_accounts(ctx: &AppContext) -> anyhow::Result<i32> {
    let accounts = ctx.accounts.list().await?;

    if accounts.is_empty() {
        println!("{}", "No service accounts found".yellow());
        println!("{}", "Use 'warden account create <name>' to add one".dimmed());
        return Ok(0);
    }

    println!("{}", accounts_table(&accounts));
    println!("Total: {} accounts", accounts.len().to_string().cyan());
    Ok(0)
}

async fn delete_account(
    ctx: &AppContext,
    id: ServiceAccountId,
    skip_confirmation: bool,
) -> anyhow::Result<i32> {
    let Some(account) = ctx.accounts.get(id).await? else {
        eprintln!("{} Service account {} not found", "✗".red().bold(), id);
        return Ok(1);
    };

    let tokens = ctx.tokens.list_tokens(id).await?;
    println!("{:<10} {}", "Name:".cyan(), account.name);
    println!("{:<10} {}", "Created:".cyan(), format_date(&account.created_at));
    println!("{:<10} {}", "Tokens:".cyan(), tokens.len());
    println!();

    let confirmed = skip_confirmation
        || Confirm::new(&format!(
            "Delete '{}' and its {} token(s)?",
            account.name,
            tokens.len()
        ))
        .with_default(false)
        .prompt()?;

    if !confirmed {
        println!("{}", "Operation cancelled".yellow());
        return Ok(0);
    }

    let removed = ctx.accounts.delete(id).await?;
    println!(
        "{} Deleted service account '{}' and {} token(s)",
        "✓".green().bold(),
        account.name,
        removed
    );
    Ok(0)
}
