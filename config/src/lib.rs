//! `~/.lawyerify/config.toml` loading.
//!
//! ```toml
//! [replace]
//! strict_ambiguity = true
//! allow_multi_word = true
//! mode = "chained"
//! builtin_overrides = true
//!
//! [overrides]
//! said = "vocalized"
//!
//! [thesaurus]
//! api_key = "${BIGHUGELABS_API_KEY}"
//! timeout_secs = 30
//! lookup_timeout_secs = 10
//! max_retries = 2
//! file = "thesaurus.json"
//! ```
//!
//! Every section is optional. A missing file is not an error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fmt, fs};

use lawyerify_providers::{ApiKey, BigHugeConfig};
use lawyerify_types::{OverrideTable, ReplacePolicy, SubstitutionMode};
use serde::Deserialize;

const CONFIG_DIR: &str = ".lawyerify";
const CONFIG_FILE: &str = "config.toml";

// bool::default() is false, so only true needs a fn
const fn default_true() -> bool {
    true
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LawyerifyConfig {
    #[serde(default)]
    pub replace: ReplaceConfig,
    /// Extra overrides, `word = "replacement"`. `word = "word"` keeps it.
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
    #[serde(default)]
    pub thesaurus: ThesaurusConfig,
}

/// Replacement toggles.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplaceConfig {
    #[serde(default = "default_true")]
    pub strict_ambiguity: bool,
    #[serde(default = "default_true")]
    pub allow_multi_word: bool,
    #[serde(default)]
    pub mode: SubstitutionMode,
    /// Start from the built-in override list before applying `[overrides]`.
    #[serde(default = "default_true")]
    pub builtin_overrides: bool,
}

impl Default for ReplaceConfig {
    fn default() -> Self {
        Self {
            strict_ambiguity: true,
            allow_multi_word: true,
            mode: SubstitutionMode::default(),
            builtin_overrides: true,
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThesaurusConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub lookup_timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    /// Offline JSON thesaurus. Takes precedence over the HTTP service.
    pub file: Option<String>,
}

// Manual Debug impl to prevent leaking the API key in logs.
impl fmt::Debug for ThesaurusConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThesaurusConfig")
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    "[REDACTED]"
                } else {
                    "None"
                },
            )
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("lookup_timeout_secs", &self.lookup_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("file", &self.file)
            .finish()
    }
}

impl ThesaurusConfig {
    /// The API key after `${VAR}` expansion, if non-empty.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        self.api_key
            .as_deref()
            .map(expand_env_vars)
            .filter(|key| !key.trim().is_empty())
    }

    #[must_use]
    pub fn file(&self) -> Option<PathBuf> {
        self.file
            .as_deref()
            .map(expand_env_vars)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
    }

    #[must_use]
    pub fn lookup_timeout(&self) -> Option<Duration> {
        self.lookup_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// HTTP client settings for `api_key`, with configured overrides applied.
    #[must_use]
    pub fn bighuge_config(&self, api_key: ApiKey) -> BigHugeConfig {
        let mut config = BigHugeConfig::new(api_key);
        if let Some(base_url) = self.base_url.as_deref().map(expand_env_vars) {
            config = config.with_base_url(base_url);
        }
        if let Some(secs) = self.timeout_secs.filter(|secs| *secs > 0) {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        if let Some(max_retries) = self.max_retries {
            config = config.with_max_retries(max_retries);
        }
        config
    }
}

/// Replace `${VAR}` with the variable's value (empty when unset).
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

impl LawyerifyConfig {
    /// Load the user config. `Ok(None)` when there is no home directory or no
    /// file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    /// Load from an explicit path. `Ok(None)` when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {:?}: {}", path, source);
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let config = Self::parse(&content).map_err(|source| {
            tracing::warn!("Failed to parse config at {:?}: {}", path, source);
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(Some(config))
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Toggles for a run.
    #[must_use]
    pub fn policy(&self) -> ReplacePolicy {
        ReplacePolicy {
            strict_ambiguity: self.replace.strict_ambiguity,
            allow_multi_word: self.replace.allow_multi_word,
            mode: self.replace.mode,
            lookup_timeout: self.thesaurus.lookup_timeout(),
        }
    }

    /// Built-in overrides (if enabled) with `[overrides]` layered on top.
    #[must_use]
    pub fn overrides(&self) -> OverrideTable {
        let mut table = if self.replace.builtin_overrides {
            OverrideTable::builtin()
        } else {
            OverrideTable::empty()
        };
        table.extend(
            self.overrides
                .iter()
                .map(|(word, replacement)| (word.to_lowercase(), replacement.as_str())),
        );
        table
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// `~/.lawyerify`, home of the config file and logs.
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR))
}
