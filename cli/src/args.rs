//! Command line arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use lawyerify_config::LawyerifyConfig;
use lawyerify_engine::{OverrideTable, ReplacePolicy, SubstitutionMode};

/// Rewrite text with the longest synonym for every word.
#[derive(Parser, Debug, Clone)]
#[command(name = "lawyerify")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct Args {
    /// Text file to rewrite; reads stdin when omitted or "-"
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(short, long, value_name = "PATH", conflicts_with = "in_place")]
    pub output: Option<PathBuf>,

    /// Overwrite INPUT with the result
    #[arg(short, long, requires = "input")]
    pub in_place: bool,

    /// Skip words whose synonyms span several parts of speech
    #[arg(long, overrides_with = "no_strict")]
    pub strict: bool,

    /// Consider every part of speech
    #[arg(long, overrides_with = "strict")]
    pub no_strict: bool,

    /// Allow synonyms containing spaces
    #[arg(long, overrides_with = "no_multi_word")]
    pub multi_word: bool,

    /// Only single-word synonyms
    #[arg(long, overrides_with = "multi_word")]
    pub no_multi_word: bool,

    /// How replacements interact
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Offline thesaurus (JSON, keyed by word)
    #[arg(long, value_name = "PATH")]
    pub thesaurus_file: Option<PathBuf>,

    /// Big Huge Thesaurus API key
    #[arg(long, env = "BIGHUGELABS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Thesaurus API base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Start from an empty override table
    #[arg(long)]
    pub no_builtin_overrides: bool,

    /// Force a replacement, e.g. --override said=declared (repeatable)
    #[arg(long = "override", value_name = "WORD=REPLACEMENT", value_parser = parse_override)]
    pub overrides: Vec<(String, String)>,

    /// Give up on a single lookup after this many seconds
    #[arg(long, value_name = "SECS")]
    pub lookup_timeout: Option<u64>,

    /// Config file (default: ~/.lawyerify/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log to stderr instead of the log file
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Later replacements also rewrite text produced by earlier ones
    Chained,
    /// Every word is replaced at most once, from the original text
    OriginalOnly,
}

impl From<ModeArg> for SubstitutionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Chained => SubstitutionMode::Chained,
            ModeArg::OriginalOnly => SubstitutionMode::OriginalOnly,
        }
    }
}

fn parse_override(raw: &str) -> Result<(String, String), String> {
    let (word, replacement) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected WORD=REPLACEMENT, got {raw:?}"))?;
    let word = word.trim();
    let replacement = replacement.trim();
    if word.is_empty() || replacement.is_empty() {
        return Err(format!("expected WORD=REPLACEMENT, got {raw:?}"));
    }
    Ok((word.to_lowercase(), replacement.to_string()))
}

impl Args {
    /// Reads stdin when there is no input path or it is `-`.
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|path| path.as_os_str() != "-")
    }

    /// Config toggles with flags layered on top.
    pub fn policy(&self, config: &LawyerifyConfig) -> ReplacePolicy {
        let mut policy = config.policy();
        if self.strict {
            policy.strict_ambiguity = true;
        }
        if self.no_strict {
            policy.strict_ambiguity = false;
        }
        if self.multi_word {
            policy.allow_multi_word = true;
        }
        if self.no_multi_word {
            policy.allow_multi_word = false;
        }
        if let Some(mode) = self.mode {
            policy.mode = mode.into();
        }
        if let Some(secs) = self.lookup_timeout {
            policy.lookup_timeout = (secs > 0).then_some(Duration::from_secs(secs));
        }
        policy
    }

    pub fn overrides(&self, config: &LawyerifyConfig) -> OverrideTable {
        let mut table = if self.no_builtin_overrides {
            let mut table = OverrideTable::empty();
            table.extend(config.overrides.iter().map(|(w, r)| (w.to_lowercase(), r.as_str())));
            table
        } else {
            config.overrides()
        };
        table.extend(self.overrides.iter().map(|(w, r)| (w.as_str(), r.as_str())));
        table
    }

    pub fn thesaurus_file(&self, config: &LawyerifyConfig) -> Option<PathBuf> {
        self.thesaurus_file
            .clone()
            .or_else(|| config.thesaurus.file())
    }

    pub fn api_key(&self, config: &LawyerifyConfig) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| config.thesaurus.api_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("lawyerify").chain(args.iter().copied()))
            .expect("valid args")
    }

    #[test]
    fn defaults_follow_config() {
        let config = LawyerifyConfig::default();
        let args = parse(&[]);
        assert_eq!(args.policy(&config), ReplacePolicy::default());
        assert!(args.input_path().is_none());
    }

    #[test]
    fn flags_override_config() {
        let config = LawyerifyConfig::parse(
            "[replace]\nstrict_ambiguity = true\nallow_multi_word = true\n",
        )
        .unwrap();
        let args = parse(&[
            "--no-strict",
            "--no-multi-word",
            "--mode",
            "original-only",
            "--lookup-timeout",
            "4",
        ]);
        let policy = args.policy(&config);
        assert!(!policy.strict_ambiguity);
        assert!(!policy.allow_multi_word);
        assert_eq!(policy.mode, SubstitutionMode::OriginalOnly);
        assert_eq!(policy.lookup_timeout, Some(Duration::from_secs(4)));
    }

    #[test]
    fn last_of_paired_flags_wins() {
        let config = LawyerifyConfig::default();
        assert!(parse(&["--no-strict", "--strict"]).policy(&config).strict_ambiguity);
        assert!(!parse(&["--strict", "--no-strict"]).policy(&config).strict_ambiguity);
    }

    #[test]
    fn dash_means_stdin() {
        assert!(parse(&["-"]).input_path().is_none());
        assert_eq!(
            parse(&["brief.txt"]).input_path(),
            Some(&PathBuf::from("brief.txt"))
        );
    }

    #[test]
    fn in_place_requires_input_and_excludes_output() {
        let cmd = |args: &[&str]| {
            Args::try_parse_from(std::iter::once("lawyerify").chain(args.iter().copied()))
        };
        assert!(cmd(&["--in-place"]).is_err());
        assert!(cmd(&["a.txt", "--in-place", "--output", "b.txt"]).is_err());
        assert!(cmd(&["a.txt", "--in-place"]).is_ok());
    }

    #[test]
    fn override_flags_extend_table() {
        let config = LawyerifyConfig::default();
        let args = parse(&["--override", "Said=declared", "--override", "dog=dog"]);
        let table = args.overrides(&config);
        assert_eq!(table.get("said"), Some("declared"));
        assert_eq!(table.get("dog"), Some("dog"));
        assert_eq!(table.get("he"), Some("he"));
    }

    #[test]
    fn no_builtin_overrides_keeps_config_entries() {
        let config = LawyerifyConfig::parse("[overrides]\ncat = \"feline\"\n").unwrap();
        let table = parse(&["--no-builtin-overrides"]).overrides(&config);
        assert_eq!(table.get("cat"), Some("feline"));
        assert!(!table.contains("he"));
    }

    #[test]
    fn malformed_override_is_rejected() {
        assert!(parse_override("said").is_err());
        assert!(parse_override("=x").is_err());
        assert_eq!(
            parse_override(" New = modern "),
            Ok(("new".to_string(), "modern".to_string()))
        );
    }
}
