use std::path::PathBuf;

use clap::Subcommand;
use serde_json::json;

use crate::app::App;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::guard::GuardDecision;
use crate::resources::{ListQuery, Resource};
use crate::routes::Route;
use crate::screens::{DetailScreen, FormScreen, FormState, ListScreen, PageView, SubmitOutcome};

#[derive(Subcommand)]
pub enum RecordCommands {
    #[command(about = "List records")]
    List {
        #[arg(long, help = "Search term passed to the backend")]
        search: Option<String>,
        #[arg(long, help = "Page number")]
        page: Option<u32>,
    },

    #[command(about = "Show one record")]
    Show {
        #[arg(help = "Record ID")]
        id: String,
    },

    #[command(about = "Create a record")]
    Create {
        #[arg(long = "field", short = 'f', value_name = "NAME=VALUE", help = "Form field (repeatable)")]
        fields: Vec<String>,
        #[arg(long, help = "Image to upload with the record")]
        file: Option<PathBuf>,
    },

    #[command(about = "Update a record")]
    Update {
        #[arg(help = "Record ID")]
        id: String,
        #[arg(long = "field", short = 'f', value_name = "NAME=VALUE", help = "Form field (repeatable)")]
        fields: Vec<String>,
        #[arg(long, help = "Image to upload with the record")]
        file: Option<PathBuf>,
    },

    #[command(about = "Delete a record")]
    Delete {
        #[arg(help = "Record ID")]
        id: String,
    },
}

pub async fn handle<R: Resource>(
    app: &App,
    cmd: RecordCommands,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let collection = R::COLLECTION;

    match cmd {
        RecordCommands::List { search, page } => {
            ensure_allowed(app, &Route::List(collection), &output_format)?;

            let screen = ListScreen::new(app.resource::<R>(), ListQuery { search, page });
            let view = screen.mount().await?;
            output_view(&output_format, &PageView::List(view))
        }
        RecordCommands::Show { id } => {
            ensure_allowed(app, &Route::Detail(collection, id.clone()), &output_format)?;

            let screen = DetailScreen::new(app.resource::<R>(), id);
            let view = screen.mount().await?;
            output_view(&output_format, &PageView::Detail(view))
        }
        RecordCommands::Create { fields, file } => {
            ensure_allowed(app, &Route::Create(collection), &output_format)?;

            let screen = FormScreen::create(app.resource::<R>());
            let mut state = screen.mount().await?;
            fill::<R>(&mut state, &fields, file)?;
            save(&screen, &mut state, &output_format).await
        }
        RecordCommands::Update { id, fields, file } => {
            ensure_allowed(app, &Route::Edit(collection, id.clone()), &output_format)?;

            let screen = FormScreen::edit(app.resource::<R>(), id);
            let mut state = screen.mount().await?;
            fill::<R>(&mut state, &fields, file)?;
            save(&screen, &mut state, &output_format).await
        }
        RecordCommands::Delete { id } => {
            ensure_allowed(app, &Route::Detail(collection, id.clone()), &output_format)?;

            let screen = DetailScreen::new(app.resource::<R>(), id.clone());
            let next = screen.delete().await?;
            output_success(
                &output_format,
                &format!("Deleted {} {}", R::NOUN, id),
                Some(json!({ "id": id, "redirect": next.path() })),
            )
        }
    }
}

/// The CLI obeys the same route guard as `open`
fn ensure_allowed(app: &App, route: &Route, output_format: &OutputFormat) -> anyhow::Result<()> {
    match app.guard(route) {
        GuardDecision::Allowed => Ok(()),
        GuardDecision::Denied { reason, redirect } => {
            tracing::debug!(route = %route, ?reason, "command denied");
            output_error(
                output_format,
                &format!("Not allowed to open {}; redirected to {}", route, redirect),
                Some("ACCESS_DENIED"),
            )?;
            Err(anyhow::anyhow!("access denied"))
        }
    }
}

fn fill<R: Resource>(
    state: &mut FormState<R>,
    fields: &[String],
    file: Option<PathBuf>,
) -> anyhow::Result<()> {
    for pair in fields {
        let (name, value) = parse_field(pair)?;
        state.set(name, value)?;
    }

    if let Some(path) = file {
        let Some(field) = R::UPLOAD_FIELD else {
            return Err(anyhow::anyhow!("{} records have no image upload", R::NOUN));
        };
        state.set(field, &path.to_string_lossy())?;
    }
    Ok(())
}

async fn save<R: Resource>(
    screen: &FormScreen<R>,
    state: &mut FormState<R>,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    match screen.submit(state).await {
        SubmitOutcome::Saved { redirect } => output_success(
            output_format,
            &format!("Saved {}", R::NOUN),
            Some(json!({ "redirect": redirect.path() })),
        ),
        SubmitOutcome::Rejected => {
            output_view(output_format, &PageView::Form(state.view()))?;
            Err(anyhow::anyhow!("{} was not saved", R::NOUN))
        }
    }
}

fn parse_field(pair: &str) -> anyhow::Result<(&str, &str)> {
    match pair.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value)),
        _ => Err(anyhow::anyhow!("expected NAME=VALUE, got '{}'", pair)),
    }
}
