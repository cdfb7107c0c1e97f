//! Endpoint management commands: create, list, delete.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::{Confirm, Input, Password};
use secrecy::{ExposeSecret, SecretString};

use securehook_core::service::setup::{DEFAULT_ENDPOINT_ID, SetupRequest};

use crate::state::AppState;

/// Decide which token to provision.
///
/// `None` means "generate one". An explicit `--token` always wins, even when
/// empty, so the service can reject it.
fn token_choice(
    token: Option<String>,
    generate: bool,
    interactive: bool,
) -> Result<Option<SecretString>> {
    match token {
        Some(t) => Ok(Some(SecretString::from(t))),
        None if generate || !interactive => Ok(None),
        None => {
            let entered = Password::new()
                .with_prompt("Token (leave empty to generate one)")
                .allow_empty_password(true)
                .interact()?;
            Ok((!entered.is_empty()).then(|| SecretString::from(entered)))
        }
    }
}

/// Provision an endpoint. The token is printed once and never stored.
///
/// ```bash
/// shook create endpoint "Garage Door" --generate
/// shook create endpoint front_door --token "$TOKEN"
/// ```
pub async fn create_endpoint(
    state: &AppState,
    name: Option<String>,
    token: Option<String>,
    generate: bool,
    json: bool,
) -> Result<()> {
    let interactive = !json;

    let endpoint_id = match name {
        Some(n) => n,
        None if interactive => Input::<String>::new()
            .with_prompt("Webhook ID")
            .default(DEFAULT_ENDPOINT_ID.to_string())
            .interact_text()?,
        None => DEFAULT_ENDPOINT_ID.to_string(),
    };

    let token = token_choice(token, generate, interactive)?;

    let provisioned = state
        .setup_service
        .create_endpoint(SetupRequest { endpoint_id, token })
        .await?;

    let id = provisioned.registration.id.as_str();
    let url = state.webhook_url(id);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "endpoint_id": id,
                "title": provisioned.registration.title,
                "url": url,
                "token": provisioned.token.expose_secret(),
            })
        );
        return Ok(());
    }

    println!();
    println!(
        "  {} Endpoint '{}' created",
        style("✓").green().bold(),
        style(id).cyan()
    );
    println!();
    println!("  URL:    {}", style(&url).cyan());
    println!(
        "  Token:  {}",
        style(provisioned.token.expose_secret()).yellow().bold()
    );
    println!();
    println!(
        "  {}",
        style("Save this token -- it won't be shown again.").dim()
    );
    println!(
        "  {}",
        style("Send it as: Authorization: Bearer <token>").dim()
    );
    println!();

    Ok(())
}

/// List provisioned endpoints. Credential digests are never printed.
pub async fn list_endpoints(state: &AppState, json: bool) -> Result<()> {
    let endpoints = state.setup_service.list_endpoints().await?;

    if json {
        let rows: Vec<_> = endpoints
            .iter()
            .map(|e| {
                serde_json::json!({
                    "endpoint_id": e.id.as_str(),
                    "title": e.title,
                    "created_at": e.created_at.to_rfc3339(),
                    "url": state.webhook_url(e.id.as_str()),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if endpoints.is_empty() {
        println!();
        println!(
            "  {} No endpoints yet. Create one with: {}",
            style("i").blue().bold(),
            style("shook create endpoint").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Title").fg(Color::White),
        Cell::new("Path").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    for endpoint in &endpoints {
        table.add_row(vec![
            Cell::new(endpoint.id.as_str()).fg(Color::Cyan),
            Cell::new(&endpoint.title),
            Cell::new(format!("/api/webhook/{}", endpoint.id)),
            Cell::new(endpoint.created_at.format("%Y-%m-%d %H:%M").to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} endpoint{}",
        style(endpoints.len()).bold(),
        if endpoints.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Delete an endpoint after confirmation.
///
/// A running server drops the route on its next sync with storage.
pub async fn delete_endpoint(state: &AppState, id: &str, force: bool, json: bool) -> Result<()> {
    let endpoint = state.setup_service.get_endpoint(id).await?;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete endpoint '{}'? Requests using its token will stop working.",
                style(endpoint.id.as_str()).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let removed = state.setup_service.delete_endpoint(endpoint.id.as_str()).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({"deleted": true, "endpoint_id": removed.id.as_str()})
        );
    } else {
        println!(
            "  {} Endpoint '{}' deleted.",
            style("✓").red().bold(),
            removed.id
        );
    }

    Ok(())
}
