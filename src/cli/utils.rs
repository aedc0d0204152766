use serde_json::{json, Value};

use crate::app::Page;
use crate::cli::OutputFormat;
use crate::navigation::ShellView;
use crate::screens::{DashboardView, DetailView, FormView, ListView, PageView};

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Print the result of a navigation
pub fn output_page(output_format: &OutputFormat, page: &Page) -> anyhow::Result<()> {
    if let OutputFormat::Json = output_format {
        println!("{}", serde_json::to_string_pretty(page)?);
        return Ok(());
    }

    match page {
        Page::Login => println!("Login\n\nRun `school-admin auth login <email>` to sign in."),
        Page::NotFound { path } => println!("No page at {}", path),
        Page::Redirect { to, .. } => println!("→ {}", to),
        Page::Screen { shell, view, .. } => {
            print_shell(shell);
            print_view(view);
        }
    }
    Ok(())
}

/// Print a screen without the shell around it
pub fn output_view(output_format: &OutputFormat, view: &PageView) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(view)?),
        OutputFormat::Text => print_view(view),
    }
    Ok(())
}

fn print_view(view: &PageView) {
    match view {
        PageView::Dashboard(v) => print_dashboard(v),
        PageView::List(v) => print_list(v),
        PageView::Detail(v) => print_detail(v),
        PageView::Form(v) => print_form(v),
    }
}

pub fn print_shell(shell: &ShellView) {
    println!("{} | {}", shell.title, shell.greeting);
    let menu: Vec<String> = shell
        .menu
        .iter()
        .map(|e| if e.active { format!("[{}]", e.label) } else { e.label.to_string() })
        .collect();
    println!("{}", menu.join("  "));
    println!("{}", "-".repeat(72));
}

fn print_dashboard(view: &DashboardView) {
    println!("{}", view.heading);
    for line in &view.lines {
        println!("{}", line);
    }
    for card in &view.cards {
        println!("\n{}: {}  ({})", card.title, card.value, card.link);
    }
}

fn print_list(view: &ListView) {
    println!("{}\n", view.heading);
    if view.rows.is_empty() {
        println!("No records found");
    } else {
        let header: Vec<String> = std::iter::once("ID")
            .chain(view.columns.iter().copied())
            .map(|c| format!("{:<20}", c.to_uppercase()))
            .collect();
        println!("{}", header.join(" ").trim_end());
        println!("{}", "-".repeat(72));

        for row in &view.rows {
            let cells: Vec<String> = std::iter::once(&row.id)
                .chain(row.cells.iter())
                .map(|c| format!("{:<20}", truncate(c, 20)))
                .collect();
            println!("{}", cells.join(" ").trim_end());
        }
    }
    println!("\nPage {} of {}", view.page, view.last_page);
}

fn print_detail(view: &DetailView) {
    println!("{} (#{})\n", view.title, view.id);
    for (label, value) in &view.fields {
        println!("{:<16} {}", format!("{}:", label), value);
    }
    if let Some(url) = &view.image_url {
        println!("{:<16} {}", "Image:", url);
    }
}

fn print_form(view: &FormView) {
    if let Some(error) = &view.general_error {
        println!("⚠ {}", error);
    }
    if let Value::Object(values) = &view.values {
        for (field, value) in values {
            let shown = match value {
                Value::Null => String::new(),
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            println!("{:<16} {}", format!("{}:", field), shown);
            print_field_error(view, field);
        }
    }
    if let Some(field) = view.upload_field {
        println!("{:<16} <file>", format!("{}:", field));
        print_field_error(view, field);
    }
    if !view.choices.is_empty() {
        println!("\nChoices:");
        for choice in &view.choices {
            println!("  {:<8} {}", choice.value, choice.label);
        }
    }
}

fn print_field_error(view: &FormView, field: &str) {
    if let Some(message) = view.errors.get(field).and_then(|m| m.first()) {
        println!("{:<16} ! {}", "", message);
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
