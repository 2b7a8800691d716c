use std::{
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use error_stack::{Report, Result, ResultExt};
use model::{User, UserLogin};
use serde::{Deserialize, Serialize};
use url::Url;
use utils::ContextExt;

pub const CONFIG_FILE_NAME: &str = "artemis_client.toml";

pub const DEFAULT_CONFIG_FILE_TEXT: &str = r#"

[server]
api_url = "http://localhost:8080/"
# access_token = "token" # Optional

# [account]
# login = "instructor1"
# groups = ["tumuser"]
# authorities = ["ROLE_INSTRUCTOR"]

# [version_check]
# readiness_timeout_millis = 30000 # Default
# update_interval_seconds = 60 # Default

# [general]
# log_timestamp = true # Optional
"#;

#[derive(thiserror::Error, Debug)]
pub enum ConfigFileError {
    #[error("Save default")]
    SaveDefault,
    #[error("Not a directory")]
    NotDirectory,
    #[error("Load config file")]
    LoadConfig,
    #[error("Invalid config")]
    InvalidConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ConfigFile {
    pub server: ServerConfig,

    // Optional configs
    pub account: Option<AccountConfig>,
    #[serde(default)]
    pub version_check: VersionCheckConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl ConfigFile {
    pub fn save_default(dir: impl AsRef<Path>) -> Result<(), ConfigFileError> {
        let file_path =
            Self::default_config_file_path(dir).change_context(ConfigFileError::SaveDefault)?;
        let mut file =
            std::fs::File::create(file_path).change_context(ConfigFileError::SaveDefault)?;
        file.write_all(DEFAULT_CONFIG_FILE_TEXT.as_bytes())
            .change_context(ConfigFileError::SaveDefault)?;
        Ok(())
    }

    pub fn save_default_if_not_exist_and_load(
        dir: impl AsRef<Path>,
    ) -> Result<ConfigFile, ConfigFileError> {
        Self::load(dir, true)
    }

    pub fn load_config(dir: impl AsRef<Path>) -> Result<ConfigFile, ConfigFileError> {
        Self::load(dir, false)
    }

    fn load(dir: impl AsRef<Path>, save_default: bool) -> Result<ConfigFile, ConfigFileError> {
        let file_path =
            Self::default_config_file_path(&dir).change_context(ConfigFileError::LoadConfig)?;
        if !file_path.exists() && save_default {
            Self::save_default(dir).change_context(ConfigFileError::LoadConfig)?;
        }

        let config_string =
            std::fs::read_to_string(file_path).change_context(ConfigFileError::LoadConfig)?;
        Self::parse(&config_string)
    }

    pub fn parse(config_string: &str) -> Result<ConfigFile, ConfigFileError> {
        let file: ConfigFile =
            toml::from_str(config_string).change_context(ConfigFileError::LoadConfig)?;

        if file.version_check.update_interval_seconds == Some(0) {
            return Err(ConfigFileError::InvalidConfig.report())
                .attach_printable("Update check interval must be at least one second");
        }

        Ok(file)
    }

    pub fn default_config_file_path(dir: impl AsRef<Path>) -> Result<PathBuf, ConfigFileError> {
        if !dir.as_ref().is_dir() {
            return Err(Report::new(ConfigFileError::NotDirectory));
        }
        let mut file_path = dir.as_ref().to_path_buf();
        file_path.push(CONFIG_FILE_NAME);
        Ok(file_path)
    }

    pub fn exists(dir: impl AsRef<Path>) -> Result<bool, ConfigFileError> {
        let file_path =
            Self::default_config_file_path(&dir).change_context(ConfigFileError::LoadConfig)?;
        Ok(file_path.exists())
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Base URL of the Artemis server.
    pub api_url: Url,
    /// Bearer token for API requests.
    pub access_token: Option<String>,
}

/// Identity of the logged in user. Lock checks use this.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
    pub login: String,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub authorities: Vec<String>,
}

impl AccountConfig {
    pub fn to_user(&self) -> User {
        User {
            groups: self.groups.clone(),
            authorities: self.authorities.clone(),
            ..User::with_login(UserLogin::new(self.login.clone()))
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VersionCheckConfig {
    readiness_timeout_millis: Option<u64>,
    update_interval_seconds: Option<u64>,
}

impl VersionCheckConfig {
    pub const DEFAULT_READINESS_TIMEOUT_MILLIS: u64 = 30000;
    pub const DEFAULT_UPDATE_INTERVAL_SECONDS: u64 = 60;

    pub fn readiness_timeout(&self) -> Duration {
        Duration::from_millis(
            self.readiness_timeout_millis
                .unwrap_or(Self::DEFAULT_READINESS_TIMEOUT_MILLIS),
        )
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(
            self.update_interval_seconds
                .unwrap_or(Self::DEFAULT_UPDATE_INTERVAL_SECONDS),
        )
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Write timestamp to log messages. Enabled by default.
    log_timestamp: Option<bool>,
}

impl GeneralConfig {
    pub fn log_timestamp(&self) -> bool {
        self.log_timestamp.unwrap_or(true)
    }
}
