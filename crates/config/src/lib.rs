#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![warn(unused_crate_dependencies)]

pub mod args;
pub mod file;

use std::{path::PathBuf, time::Duration};

use args::ArgsConfig;
use error_stack::{Result, ResultExt};
use model::User;
use url::Url;
use utils::ContextExt;

use self::file::ConfigFile;

#[derive(thiserror::Error, Debug)]
pub enum GetConfigError {
    #[error("Get working directory error")]
    GetWorkingDir,
    #[error("File loading failed")]
    LoadFileError,
    #[error("Invalid configuration")]
    InvalidConfiguration,
}

#[derive(Debug)]
pub struct Config {
    /// Client version which is compared to the server version.
    client_version: String,
    /// Client binary Cargo package name.
    ///
    /// Used in `User-Agent` HTTP header.
    client_pkg_name: String,
    api_url: Url,
    config_dir: PathBuf,
    file: ConfigFile,
}

impl Config {
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    pub fn access_token(&self) -> Option<&str> {
        self.file.server.access_token.as_deref()
    }

    /// Logged in user from the `[account]` section.
    pub fn account_identity(&self) -> Option<User> {
        self.file.account.as_ref().map(|account| account.to_user())
    }

    pub fn readiness_timeout(&self) -> Duration {
        self.file.version_check.readiness_timeout()
    }

    pub fn update_interval(&self) -> Duration {
        self.file.version_check.update_interval()
    }

    pub fn log_timestamp(&self) -> bool {
        self.file.general.log_timestamp()
    }

    pub fn client_version(&self) -> &str {
        &self.client_version
    }

    pub fn config_dir(&self) -> &PathBuf {
        &self.config_dir
    }

    pub fn user_agent(&self) -> String {
        format!("{}/{}", self.client_pkg_name, self.client_version)
    }
}

pub fn get_config(
    args: &ArgsConfig,
    client_version: String,
    client_pkg_name: String,
) -> Result<Config, GetConfigError> {
    let config_dir = match args.config_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().change_context(GetConfigError::GetWorkingDir)?,
    };
    let file = ConfigFile::save_default_if_not_exist_and_load(&config_dir)
        .change_context(GetConfigError::LoadFileError)
        .attach_printable_lazy(|| config_dir.display().to_string())?;

    let api_url = args
        .api_url
        .clone()
        .unwrap_or_else(|| file.server.api_url.clone());
    if api_url.cannot_be_a_base() {
        return Err(GetConfigError::InvalidConfiguration.report())
            .attach_printable(format!("API URL can not be a base URL: {}", api_url));
    }

    Ok(Config {
        client_version,
        client_pkg_name,
        api_url,
        config_dir,
        file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(config_dir: PathBuf, api_url: Option<&str>) -> ArgsConfig {
        ArgsConfig {
            build_info: false,
            config_dir: Some(config_dir),
            api_url: api_url.map(|url| Url::parse(url).unwrap()),
            mode: None,
        }
    }

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("artemis-client-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn url_argument_overrides_config_file() {
        let dir = test_dir("url-override");
        let config = get_config(
            &args(dir.clone(), Some("https://artemis.example.com/")),
            "7.0.0".to_string(),
            "artemis-client".to_string(),
        )
        .unwrap();

        assert_eq!(config.api_url().as_str(), "https://artemis.example.com/");
        assert_eq!(config.user_agent(), "artemis-client/7.0.0");
        assert_eq!(config.account_identity(), None);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn config_file_values_are_used() {
        let dir = test_dir("file-values");
        std::fs::write(
            dir.join(file::CONFIG_FILE_NAME),
            r#"
            [server]
            api_url = "http://localhost:9000/"
            access_token = "secret"

            [account]
            login = "tutor1"
            "#,
        )
        .unwrap();

        let config = get_config(
            &args(dir.clone(), None),
            "7.0.0".to_string(),
            "artemis-client".to_string(),
        )
        .unwrap();

        assert_eq!(config.api_url().as_str(), "http://localhost:9000/");
        assert_eq!(config.access_token(), Some("secret"));
        assert_eq!(
            config
                .account_identity()
                .and_then(|user| user.login)
                .map(|login| login.to_string()),
            Some("tutor1".to_string())
        );
        assert_eq!(config.update_interval(), Duration::from_secs(60));
        std::fs::remove_dir_all(dir).unwrap();
    }
}
