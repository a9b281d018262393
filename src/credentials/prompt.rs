use anyhow::{Context, Result};

/// Prompts for an API token without echoing it.
pub fn prompt_for_token() -> Result<String> {
    println!("Propertifi API token (leave empty to browse anonymously).");
    println!("Manager accounts can create one under Settings > API access.");
    println!();

    let token = rpassword::prompt_password("Enter token: ").context("Failed to read token from stdin")?;

    Ok(token.trim().to_string())
}
