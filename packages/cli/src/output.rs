// ABOUTME: Table and date rendering for CLI listings
// ABOUTME: Never renders digests or plaintext token material

use chrono::{DateTime, Utc};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};

use warden_core::{ServiceAccount, TokenRecord};

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn base_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

pub fn accounts_table(accounts: &[ServiceAccount]) -> Table {
    let mut table = base_table(vec!["ID", "Name", "Created"]);
    for account in accounts {
        table.add_row(vec![
            account.id.to_string(),
            account.name.clone(),
            format_date(&account.created_at),
        ]);
    }
    table
}

pub fn tokens_table(tokens: &[TokenRecord]) -> Table {
    let mut table = base_table(vec!["ID", "Key", "Status", "Created", "Revoked"]);
    for token in tokens {
        let revoked = token
            .revoked_at
            .as_ref()
            .map(format_date)
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            token.id.to_string(),
            token.token_key.to_string(),
            token.status().to_string(),
            format_date(&token.created_at),
            revoked,
        ]);
    }
    table
}
