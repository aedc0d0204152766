use clap::Subcommand;
use serde_json::json;

use crate::app::App;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::error::ClientError;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to the school backend")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Logout and forget the stored session")]
    Logout,

    #[command(about = "Show current session status")]
    Status,

    #[command(about = "Show the logged-in user's profile from the backend")]
    Whoami,
}

pub async fn handle(app: &App, cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt_password()?,
            };

            match app.login(&email, &password).await {
                Ok(landing) => {
                    let session = app.current_session();
                    output_success(
                        &output_format,
                        &format!(
                            "Logged in as {}",
                            session.display_name.as_deref().unwrap_or(&email)
                        ),
                        Some(json!({
                            "role": session.role,
                            "redirect": landing.path(),
                        })),
                    )?;
                    if let OutputFormat::Text = output_format {
                        println!("→ {}", landing);
                    }
                    Ok(())
                }
                Err(ClientError::InvalidCredentials) => {
                    output_error(&output_format, "Invalid credentials", Some("INVALID_CREDENTIALS"))?;
                    Err(anyhow::anyhow!("login failed"))
                }
                Err(e) => Err(e.into()),
            }
        }
        AuthCommands::Logout => {
            let next = app.logout()?;
            output_success(
                &output_format,
                "Logged out",
                Some(json!({ "redirect": next.path() })),
            )
        }
        AuthCommands::Status => {
            let session = app.current_session();

            match output_format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "authenticated": session.is_authenticated(),
                            "role": session.role,
                            "name": session.display_name,
                            "logged_in_at": session.logged_in_at,
                        }))?
                    );
                }
                OutputFormat::Text => {
                    if !session.is_authenticated() {
                        println!("Not logged in");
                        return Ok(());
                    }
                    println!("Logged in");
                    println!("Name: {}", session.display_name.as_deref().unwrap_or("-"));
                    println!(
                        "Role: {}",
                        session.role.map(|r| r.as_str()).unwrap_or("none")
                    );
                    if let Some(at) = session.logged_in_at {
                        println!("Since: {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
                    }
                }
            }
            Ok(())
        }
        AuthCommands::Whoami => {
            let user = app.api().current_user().await?;

            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&user)?),
                OutputFormat::Text => {
                    for key in ["name", "email", "role"] {
                        if let Some(value) = user.get(key).and_then(|v| v.as_str()) {
                            println!("{}: {}", key, value);
                        }
                    }
                }
            }
            Ok(())
        }
    }
}

/// Read the password from the terminal without echoing it
fn prompt_password() -> anyhow::Result<String> {
    Ok(rpassword::prompt_password("Password: ")?)
}
