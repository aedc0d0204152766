use serde_json::json;

use crate::app::{App, Page};
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::resources::ListQuery;
use crate::routes::ROUTE_TABLE;

pub async fn open(
    app: &App,
    path: &str,
    search: Option<String>,
    page: Option<u32>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let result = app.navigate_with(path, ListQuery { search, page }).await?;
    output_page(&output_format, &result)?;

    match result {
        Page::NotFound { path } => Err(anyhow::anyhow!("no page at {}", path)),
        _ => Ok(()),
    }
}

pub fn menu(app: &App, path: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let view = app.shell().current_view(path);

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Text => {
            for entry in &view.menu {
                let marker = if entry.active { "*" } else { " " };
                println!("{}{:<18} {}", marker, entry.label, entry.path);
            }
        }
    }
    Ok(())
}

pub fn routes(output_format: OutputFormat) -> anyhow::Result<()> {
    let access = |roles: Option<&[crate::session::Role]>, public: bool| -> String {
        match (public, roles) {
            (true, _) => "public".to_string(),
            (false, None) => "any authenticated".to_string(),
            (false, Some(roles)) => roles
                .iter()
                .map(|r| r.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    };

    match output_format {
        OutputFormat::Json => {
            let routes: Vec<_> = ROUTE_TABLE
                .iter()
                .map(|d| {
                    json!({
                        "path": d.pattern,
                        "public": d.public,
                        "allowed_roles": d.allowed_roles,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json!({ "routes": routes }))?);
        }
        OutputFormat::Text => {
            println!("{:<28} {}", "PATH", "ACCESS");
            println!("{}", "-".repeat(60));
            for d in ROUTE_TABLE {
                println!("{:<28} {}", d.pattern, access(d.allowed_roles, d.public));
            }
        }
    }
    Ok(())
}
