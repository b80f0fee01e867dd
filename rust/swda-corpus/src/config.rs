use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Name of the consolidated metadata file at the corpus root.
pub const DEFAULT_METADATA_FILENAME: &str = "swda-metadata.csv";

/// Where conversation files live, relative to the corpus root.
pub const DEFAULT_TRANSCRIPT_PATTERN: &str = "sw*/*.csv";

/// What a [`crate::CorpusReader`] does when a conversation file fails to
/// load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Yield the error and end the iteration
    #[default]
    Stop,
    /// Log the error and carry on with the next file
    Skip,
}

/// Settings for reading a corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// The corpus root directory
    pub root: PathBuf,
    /// File name of the metadata file within `root`
    pub metadata_filename: String,
    /// Glob, relative to `root`, matching the conversation files
    pub transcript_pattern: String,
    pub error_policy: ErrorPolicy,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("swda"),
            metadata_filename: DEFAULT_METADATA_FILENAME.to_string(),
            transcript_pattern: DEFAULT_TRANSCRIPT_PATTERN.to_string(),
            error_policy: ErrorPolicy::default(),
        }
    }
}

impl CorpusConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn with_metadata_filename(mut self, metadata_filename: impl Into<String>) -> Self {
        self.metadata_filename = metadata_filename.into();
        self
    }

    pub fn with_transcript_pattern(mut self, transcript_pattern: impl Into<String>) -> Self {
        self.transcript_pattern = transcript_pattern.into();
        self
    }

    pub fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.root.join(&self.metadata_filename)
    }

    /// The full glob pattern for conversation files.
    pub fn transcript_glob(&self) -> String {
        glob_path(&self.root, &self.transcript_pattern)
    }
}

fn glob_path(root: &Path, pattern: &str) -> String {
    let root = glob::Pattern::escape(&root.to_string_lossy());
    if root.is_empty() {
        pattern.to_string()
    } else {
        format!("{}/{pattern}", root.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_defaults_to_the_distributed_layout() {
        let config = CorpusConfig::new("/data/swda");
        assert_eq!(config.metadata_path(), PathBuf::from("/data/swda/swda-metadata.csv"));
        assert_eq!(config.transcript_glob(), "/data/swda/sw*/*.csv");
        assert_eq!(config.error_policy, ErrorPolicy::Stop);
    }

    #[test]
    fn it_escapes_glob_characters_in_the_root() {
        let config = CorpusConfig::new("/data/[old]").with_transcript_pattern("sw0*/*.csv");
        assert_eq!(config.transcript_glob(), "/data/[[]old[]]/sw0*/*.csv");
    }

    #[test]
    fn it_deserializes_with_defaults() -> Result<(), serde_json::Error> {
        let config: CorpusConfig =
            serde_json::from_str(r#"{ "root": "corpus", "error_policy": "skip" }"#)?;
        assert_eq!(config.root, PathBuf::from("corpus"));
        assert_eq!(config.metadata_filename, DEFAULT_METADATA_FILENAME);
        assert_eq!(config.error_policy, ErrorPolicy::Skip);
        Ok(())
    }
}
