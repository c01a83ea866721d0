pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::{DrawError, Result};
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use std::fmt;
use std::path::PathBuf;
use toml_config::TomlConfig;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const TASKS_FILE: &str = "tasks.txt";
pub const PARTICIPANTS_FILE: &str = "participants.txt";
pub const RESULTS_FILE: &str = "results.json";

const MIN_ADMIN_TOKEN_CHARS: usize = 8;

/// Who may open `/admin` and `/admin/raw`.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum AdminAccess {
    /// Admin routes answer 403.
    #[default]
    Disabled,
    /// Anyone who can reach the server may read the results.
    TrustedNetwork,
    /// Callers must present the token.
    Token(String),
}

impl AdminAccess {
    /// 由 token 與信任網路旗標組出存取模式，兩者不能同時設定
    pub fn from_parts(token: Option<String>, trusted_network: bool) -> Result<Self> {
        match (token, trusted_network) {
            (Some(_), true) => Err(DrawError::ConfigError {
                message: "admin token and trusted-network mode are mutually exclusive"
                    .to_string(),
            }),
            (Some(token), false) => Ok(AdminAccess::Token(token)),
            (None, true) => Ok(AdminAccess::TrustedNetwork),
            (None, false) => Ok(AdminAccess::Disabled),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AdminAccess::Disabled => "disabled",
            AdminAccess::TrustedNetwork => "trusted-network",
            AdminAccess::Token(_) => "token",
        }
    }
}

impl fmt::Debug for AdminAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminAccess::Token(_) => f.write_str("Token(<redacted>)"),
            other => f.write_str(other.label()),
        }
    }
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct DrawConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: String,
    pub tasks_file: String,
    pub participants_file: String,
    pub results_file: String,
    pub static_dir: Option<String>,
    pub admin_access: AdminAccess,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: DEFAULT_DATA_DIR.to_string(),
            tasks_file: TASKS_FILE.to_string(),
            participants_file: PARTICIPANTS_FILE.to_string(),
            results_file: RESULTS_FILE.to_string(),
            static_dir: None,
            admin_access: AdminAccess::Disabled,
        }
    }
}

impl DrawConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn data_path(&self, file: &str) -> PathBuf {
        PathBuf::from(&self.data_dir).join(file)
    }
}

impl ConfigProvider for DrawConfig {
    fn tasks_file(&self) -> &str {
        &self.tasks_file
    }

    fn participants_file(&self) -> &str {
        &self.participants_file
    }

    fn results_file(&self) -> &str {
        &self.results_file
    }
}

impl Validate for DrawConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.host)?;
        validation::validate_positive_number("server.port", self.port as usize, 1)?;
        validation::validate_path("data.dir", &self.data_dir)?;
        validation::validate_file_name("data.tasks_file", &self.tasks_file)?;
        validation::validate_file_name("data.participants_file", &self.participants_file)?;
        validation::validate_file_name("data.results_file", &self.results_file)?;

        if let Some(dir) = &self.static_dir {
            validation::validate_path("server.static_dir", dir)?;
        }

        if let AdminAccess::Token(token) = &self.admin_access {
            validation::validate_non_empty_string("admin.token", token)?;
            validation::validate_min_length("admin.token", token, MIN_ADMIN_TOKEN_CHARS)?;
            if TomlConfig::has_unresolved_placeholder(token) {
                return Err(DrawError::ConfigError {
                    message: "admin.token references an environment variable that is not set"
                        .to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "task-draw")]
#[command(about = "Randomly assign a task to each participant and keep the results")]
pub struct CliConfig {
    #[arg(long, env = "PORT", help = "Port to listen on [default: 5000]")]
    pub port: Option<u16>,

    #[arg(long, env = "HOST", help = "Address to bind [default: 0.0.0.0]")]
    pub host: Option<String>,

    #[arg(long, env = "DATA_DIR", help = "Directory holding tasks, participants and results [default: data]")]
    pub data_dir: Option<String>,

    #[arg(long, help = "Serve index.html from this directory instead of the built-in page")]
    pub static_dir: Option<String>,

    #[arg(long, env = "ADMIN_TOKEN", hide_env_values = true, help = "Require this token for the admin views")]
    pub admin_token: Option<String>,

    #[arg(long, help = "Open the admin views to anyone who can reach the server")]
    pub admin_trusted_network: bool,

    #[arg(long, help = "Path to a TOML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 預設值 < TOML 檔 < 命令列/環境變數
    pub fn resolve(&self) -> Result<DrawConfig> {
        let mut config = DrawConfig::default();
        let mut admin_token = None;
        let mut trusted_network = false;

        if let Some(path) = &self.config {
            let file = TomlConfig::from_file(path)?;
            file.apply_to(&mut config);
            admin_token = file.admin_token();
            trusted_network = file.admin_trusted_network();
        }

        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(dir) = &self.static_dir {
            config.static_dir = Some(dir.clone());
        }

        // 命令列指定任一種模式時，覆蓋檔案中的設定
        if self.admin_token.is_some() || self.admin_trusted_network {
            admin_token = self.admin_token.clone();
            trusted_network = self.admin_trusted_network;
        }
        config.admin_access = AdminAccess::from_parts(admin_token, trusted_network)?;

        Ok(config)
    }
}
