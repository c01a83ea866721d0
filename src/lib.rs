pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::server::{build_router, run, AppState};
pub use config::{cli::LocalStorage, AdminAccess, DrawConfig};
pub use core::draw::DrawService;
pub use utils::error::{DrawError, Result};
