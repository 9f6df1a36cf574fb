use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::deepgram::{
    ApiEndpoint, ClientOptions, ProjectSelection, DEFAULT_PAGE_LIMIT, DEFAULT_PROXY_ORIGIN,
};
use crate::error::{DashboardError, Result};

const APP_DIR_NAME: &str = "deepgram-dashboard";
const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Origin serving the `/api/deepgram` proxy.
    pub origin: String,

    /// Call api.deepgram.com directly instead of going through the proxy.
    pub direct: bool,

    /// Project to query. When unset, the first project listed for the key is used.
    pub project_id: Option<String>,

    /// Requests per page in the requests log.
    pub page_limit: u32,

    /// Per-request timeout. When unset, requests wait as long as the HTTP stack allows.
    pub request_timeout_secs: Option<u64>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            origin: DEFAULT_PROXY_ORIGIN.to_string(),
            direct: false,
            project_id: None,
            page_limit: DEFAULT_PAGE_LIMIT,
            request_timeout_secs: None,
        }
    }
}

impl AppSettings {
    pub fn client_options(&self) -> ClientOptions {
        let endpoint = if self.direct {
            ApiEndpoint::Direct
        } else {
            ApiEndpoint::Proxy {
                origin: self.origin.clone(),
            }
        };
        let project = match &self.project_id {
            Some(id) if !id.is_empty() => ProjectSelection::Id(id.clone()),
            _ => ProjectSelection::First,
        };
        ClientOptions {
            endpoint,
            project,
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// `<config dir>/deepgram-dashboard/settings.json`
pub fn settings_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().ok_or_else(|| {
        DashboardError::Settings("Could not determine config directory".to_string())
    })?;
    Ok(dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
}

pub fn load_settings() -> AppSettings {
    match settings_path() {
        Ok(path) => load_settings_from(&path),
        Err(e) => {
            log::warn!("Settings: {}", e);
            AppSettings::default()
        }
    }
}

/// Read settings from `path`, falling back to defaults when the file is
/// missing or unreadable.
pub fn load_settings_from(path: &Path) -> AppSettings {
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<AppSettings>(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Settings: failed to parse {:?}: {}", path, e);
                AppSettings::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppSettings::default(),
        Err(e) => {
            log::warn!("Settings: failed to read {:?}: {}", path, e);
            AppSettings::default()
        }
    }
}

pub fn save_settings(settings: &AppSettings) -> Result<PathBuf> {
    let path = settings_path()?;
    save_settings_to(&path, settings)?;
    Ok(path)
}

pub fn save_settings_to(path: &Path, settings: &AppSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            DashboardError::Settings(format!(
                "Failed to create config directory {:?}: {}",
                parent, e
            ))
        })?;
    }

    let contents = serde_json::to_string_pretty(settings)
        .map_err(|e| DashboardError::Settings(format!("Serialize settings: {}", e)))?;

    // Write to a temp file in the same directory, then rename over the target.
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, &contents).map_err(|e| {
        DashboardError::Settings(format!("Write temp settings {:?}: {}", tmp_path, e))
    })?;

    // rename fails on Windows when the destination exists
    if cfg!(windows) && path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                return Err(DashboardError::Settings(format!(
                    "Remove existing settings file {:?}: {}",
                    path, e
                )));
            }
        }
    }

    std::fs::rename(&tmp_path, path).map_err(|e| {
        DashboardError::Settings(format!(
            "Rename temp settings {:?} to {:?}: {}",
            tmp_path, path, e
        ))
    })?;
    log::info!("Settings: saved to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join("nope.json"));
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, r#"{"project_id":"p-2"}"#).unwrap();

        let settings = load_settings_from(&path);
        assert_eq!(settings.project_id.as_deref(), Some("p-2"));
        assert_eq!(settings.page_limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(settings.origin, DEFAULT_PROXY_ORIGIN);
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "{not json").unwrap();

        assert_eq!(load_settings_from(&path), AppSettings::default());
    }

    #[test]
    fn save_then_load_preserves_values_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE_NAME);
        let settings = AppSettings {
            origin: "http://127.0.0.1:3000".to_string(),
            direct: true,
            project_id: Some("p-9".to_string()),
            page_limit: 25,
            request_timeout_secs: Some(15),
        };

        save_settings_to(&path, &settings).unwrap();

        assert_eq!(load_settings_from(&path), settings);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn client_options_follow_settings() {
        let options = AppSettings::default().client_options();
        assert_eq!(
            options.endpoint,
            ApiEndpoint::Proxy {
                origin: DEFAULT_PROXY_ORIGIN.to_string()
            }
        );
        assert_eq!(options.project, ProjectSelection::First);
        assert!(options.request_timeout.is_none());

        let options = AppSettings {
            direct: true,
            project_id: Some("p-3".to_string()),
            request_timeout_secs: Some(10),
            ..AppSettings::default()
        }
        .client_options();
        assert_eq!(options.endpoint, ApiEndpoint::Direct);
        assert_eq!(options.project, ProjectSelection::Id("p-3".to_string()));
        assert_eq!(options.request_timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn empty_project_id_means_first_project() {
        let options = AppSettings {
            project_id: Some(String::new()),
            ..AppSettings::default()
        }
        .client_options();
        assert_eq!(options.project, ProjectSelection::First);
    }
}
