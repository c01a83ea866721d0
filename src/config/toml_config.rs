use crate::config::DrawConfig;
use crate::utils::error::{DrawError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: Option<ServerConfig>,
    pub data: Option<DataConfig>,
    pub admin: Option<AdminConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub static_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    pub dir: Option<String>,
    pub tasks_file: Option<String>,
    pub participants_file: Option<String>,
    pub results_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    pub token: Option<String>,
    pub trusted_network: Option<bool>,
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // 匹配 ${VAR_NAME} 格式
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(&path).map_err(|e| DrawError::ConfigError {
                message: format!(
                    "cannot read config file {}: {}",
                    path.as_ref().display(),
                    e
                ),
            })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| DrawError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ADMIN_TOKEN})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        placeholder_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| {
                    tracing::warn!("Environment variable {} is not set", var_name);
                    format!("${{{}}}", var_name)
                })
            })
            .into_owned()
    }

    pub fn has_unresolved_placeholder(value: &str) -> bool {
        placeholder_pattern().is_match(value)
    }

    /// 將檔案中有設定的欄位套用到 config 上 (admin 另外處理)
    pub fn apply_to(&self, config: &mut DrawConfig) {
        if let Some(server) = &self.server {
            if let Some(host) = &server.host {
                config.host = host.clone();
            }
            if let Some(port) = server.port {
                config.port = port;
            }
            if let Some(dir) = &server.static_dir {
                config.static_dir = Some(dir.clone());
            }
        }

        if let Some(data) = &self.data {
            if let Some(dir) = &data.dir {
                config.data_dir = dir.clone();
            }
            if let Some(file) = &data.tasks_file {
                config.tasks_file = file.clone();
            }
            if let Some(file) = &data.participants_file {
                config.participants_file = file.clone();
            }
            if let Some(file) = &data.results_file {
                config.results_file = file.clone();
            }
        }
    }

    pub fn admin_token(&self) -> Option<String> {
        self.admin.as_ref().and_then(|a| a.token.clone())
    }

    pub fn admin_trusted_network(&self) -> bool {
        self.admin
            .as_ref()
            .and_then(|a| a.trusted_network)
            .unwrap_or(false)
    }
}
