//! Runs driven by a config file and an offline thesaurus.

use std::fs;
use std::sync::Arc;

use lawyerify_config::LawyerifyConfig;
use lawyerify_engine::{MemorySurface, Replacer, RunStatus, SubstitutionMode};
use lawyerify_providers::StaticThesaurus;
use serde_json::json;

fn write_fixture(dir: &tempfile::TempDir, config: &str) -> LawyerifyConfig {
    let thesaurus = json!({
        "happy": {"adjective": {"syn": ["joyful", "felicitous"]}},
        "said": {"verb": {"syn": ["aforementioned"]}},
        "dog": {"noun": {"syn": ["domestic dog", "canine"]}},
        "sad": {"adjective": {"syn": ["unhappy"]}},
        "unhappy": {"adjective": {"syn": ["despondent"]}},
        "walk": {
            "noun": {"syn": ["promenade"]},
            "verb": {"syn": ["perambulate"]}
        }
    });
    let thesaurus_path = dir.path().join("thesaurus.json");
    fs::write(&thesaurus_path, thesaurus.to_string()).expect("write thesaurus");

    let config_path = dir.path().join("config.toml");
    let config = format!(
        "{config}\n[thesaurus]\nfile = {:?}\n",
        thesaurus_path.display().to_string()
    );
    fs::write(&config_path, config).expect("write config");

    LawyerifyConfig::load_from(&config_path)
        .expect("config parses")
        .expect("config exists")
}

fn replacer_from(config: &LawyerifyConfig) -> Replacer {
    let path = config.thesaurus.file().expect("thesaurus file configured");
    let thesaurus = StaticThesaurus::load(&path).expect("thesaurus loads");
    Replacer::new(Arc::new(thesaurus))
        .with_overrides(config.overrides())
        .with_policy(config.policy())
}

#[tokio::test]
async fn defaults_apply_builtin_overrides() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_fixture(&dir, "");
    let replacer = replacer_from(&config);

    let mut surface = MemorySurface::new("He said the dog was happy.");
    let report = replacer.run(&mut surface).await.expect("run");

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(
        report.rewritten,
        "He vocalized the domestic dog was felicitous."
    );
    assert!(surface.as_str().ends_with("OLD TEXT: He said the dog was happy."));
}

#[tokio::test]
async fn config_toggles_and_overrides_are_honored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_fixture(
        &dir,
        r#"
[replace]
strict_ambiguity = false
allow_multi_word = false

[overrides]
said = "declared"
"#,
    );
    let replacer = replacer_from(&config);

    let mut surface = MemorySurface::new("Walk the dog, she said.");
    let report = replacer.run(&mut surface).await.expect("run");

    assert_eq!(
        report.rewritten,
        "Perambulate the canine, she declared."
    );
}

#[tokio::test]
async fn original_only_mode_from_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_fixture(&dir, "[replace]\nmode = \"original_only\"\n");
    assert_eq!(config.policy().mode, SubstitutionMode::OriginalOnly);
    let replacer = replacer_from(&config);

    let mut surface = MemorySurface::new("sad and unhappy");
    let report = replacer.run(&mut surface).await.expect("run");

    assert_eq!(report.rewritten, "unhappy and despondent");
}

#[tokio::test]
async fn apostrophes_and_unknown_words_survive() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_fixture(&dir, "");
    let replacer = replacer_from(&config);

    let text = "The dog's owner isn't happy's friend.";
    let mut surface = MemorySurface::new(text);
    let report = replacer.run(&mut surface).await.expect("run");

    assert_eq!(report.rewritten, text);
}
