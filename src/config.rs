use crate::error::IssueBoardError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::debug;

const CONFIG_FILENAME: &str = "config.ron";
const SESSION_FILENAME: &str = "session.ron";

pub const DEFAULT_BASE_URL: &str = "https://swe.mldljyh.tech";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Root of the tracker's REST API, without the `/api` prefix
    pub base_url: String,
    /// Root of the tracker's web UI, used for `open`. Falls back to `base_url`
    pub web_url: Option<String>,
    /// Name of the cookie carrying the session
    pub cookie_name: String,
    /// Give up on a request after this many seconds
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            web_url: None,
            cookie_name: "memberId".to_owned(),
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn web_url(&self) -> &str {
        self.web_url
            .as_deref()
            .unwrap_or(&self.base_url)
            .trim_end_matches('/')
    }
}

/// The opaque session identifier the tracker hands out on login.
#[derive(Clone, Deserialize, Serialize, PartialEq)]
pub struct Session {
    pub member_id: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Saveable for Config {
    fn path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILENAME)
    }
}

impl Saveable for Session {
    fn path(root: &Path) -> PathBuf {
        root.join(SESSION_FILENAME)
    }
}

pub trait Saveable: Serialize + DeserializeOwned {
    fn path(root: &Path) -> PathBuf;

    fn save(&self, root: &Path) -> Result<(), IssueBoardError> {
        let path = Self::path(root);
        debug!("Writing {}", path.display());

        fs::write(path, ron::ser::to_string_pretty(self, Default::default())?)?;

        Ok(())
    }

    /// Reads the file, `None` if it does not exist yet
    fn try_read(root: &Path) -> Result<Option<Self>, IssueBoardError> {
        let path = Self::path(root);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        Ok(Some(ron::from_str(&content)?))
    }

    fn remove(root: &Path) -> Result<bool, IssueBoardError> {
        match fs::remove_file(Self::path(root)) {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(error) => Err(error.into()),
        }
    }
}
