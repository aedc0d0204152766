pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod guard;
pub mod navigation;
pub mod resources;
pub mod routes;
pub mod screens;
pub mod session;

pub use app::{App, Page};
pub use error::{ClientError, Result};
pub use session::{Role, Session, SessionContext};
