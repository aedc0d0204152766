pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::app::App;
use crate::resources::{SchoolClasses, Students, Teachers};

#[derive(Parser)]
#[command(name = "school-admin")]
#[command(about = "School administration console")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Login, logout and session status")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Open a page by path, e.g. /teachers or /school-classes/3")]
    Open {
        #[arg(help = "Page path")]
        path: String,
        #[arg(long, help = "Search term for list pages")]
        search: Option<String>,
        #[arg(long, help = "Page number for list pages")]
        page: Option<u32>,
    },

    #[command(about = "Show the navigation menu for the current session")]
    Menu {
        #[arg(long, default_value = "/dashboard", help = "Path to highlight")]
        path: String,
    },

    #[command(about = "List registered routes and who may open them")]
    Routes,

    #[command(about = "Manage teachers")]
    Teachers {
        #[command(subcommand)]
        cmd: commands::records::RecordCommands,
    },

    #[command(about = "Manage students")]
    Students {
        #[command(subcommand)]
        cmd: commands::records::RecordCommands,
    },

    #[command(about = "Manage school classes")]
    Classes {
        #[command(subcommand)]
        cmd: commands::records::RecordCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let app = App::from_config()?;

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(&app, cmd, output_format).await,
        Commands::Open { path, search, page } => {
            commands::navigate::open(&app, &path, search, page, output_format).await
        }
        Commands::Menu { path } => commands::navigate::menu(&app, &path, output_format),
        Commands::Routes => commands::navigate::routes(output_format),
        Commands::Teachers { cmd } => commands::records::handle::<Teachers>(&app, cmd, output_format).await,
        Commands::Students { cmd } => commands::records::handle::<Students>(&app, cmd, output_format).await,
        Commands::Classes { cmd } => {
            commands::records::handle::<SchoolClasses>(&app, cmd, output_format).await
        }
    }
}
