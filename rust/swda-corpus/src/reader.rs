use std::path::{Path, PathBuf};

use crate::error::{Result, SwdaError};
use crate::{Conversation, ConversationMetadata, CorpusConfig, ErrorPolicy, Utterance};

/// Entry point for a corpus on disk: the metadata for every conversation,
/// and lazy iteration over the conversation files.
#[derive(Debug, Clone)]
pub struct CorpusReader {
    config: CorpusConfig,
    metadata: ConversationMetadata,
}

impl CorpusReader {
    /// Open the corpus rooted at `root` with the default layout.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        Self::with_config(CorpusConfig::new(root))
    }

    /// Open a corpus, loading its metadata file eagerly.
    pub fn with_config(config: CorpusConfig) -> Result<Self> {
        let metadata = ConversationMetadata::from_path(config.metadata_path())?;
        Ok(Self { config, metadata })
    }

    /// Pair a configuration with metadata that has already been loaded.
    pub fn from_parts(config: CorpusConfig, metadata: ConversationMetadata) -> Self {
        Self { config, metadata }
    }

    pub fn config(&self) -> &CorpusConfig {
        &self.config
    }

    pub fn metadata(&self) -> &ConversationMetadata {
        &self.metadata
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// The conversation files of the corpus, in sorted order.
    pub fn transcript_paths(&self) -> Result<Vec<PathBuf>> {
        glob::glob(&self.config.transcript_glob())?
            .filter(|entry| entry.as_ref().map_or(true, |path| path.is_file()))
            .map(|entry| entry.map_err(SwdaError::from_glob))
            .collect()
    }

    /// Iterate over every conversation. Each file is read when the iterator
    /// reaches it; calling this again starts over.
    pub fn conversations(&self) -> Conversations<'_> {
        match glob::glob(&self.config.transcript_glob()) {
            Ok(paths) => Conversations {
                reader: self,
                paths: Some(paths),
                pending: None,
                loaded: 0,
            },
            Err(error) => Conversations {
                reader: self,
                paths: None,
                pending: Some(error.into()),
                loaded: 0,
            },
        }
    }

    /// Iterate over every utterance of every conversation.
    pub fn utterances(&self) -> Utterances<'_> {
        Utterances {
            conversations: self.conversations(),
            current: Vec::new().into_iter(),
        }
    }
}

/// Lazy iterator over the conversations of a corpus; see
/// [`CorpusReader::conversations`].
pub struct Conversations<'a> {
    reader: &'a CorpusReader,
    paths: Option<glob::Paths>,
    pending: Option<SwdaError>,
    loaded: usize,
}

impl Conversations<'_> {
    fn next_path(&mut self) -> Option<Result<PathBuf>> {
        loop {
            match self.paths.as_mut()?.next()? {
                Ok(path) if !path.is_file() => continue,
                entry => return Some(entry.map_err(SwdaError::from_glob)),
            }
        }
    }
}

impl Iterator for Conversations<'_> {
    type Item = Result<Conversation>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(error) = self.pending.take() {
            return Some(Err(error));
        }

        loop {
            let result = self.next_path()?.and_then(|path| {
                tracing::trace!(path = %path.display(), "Reading conversation file");
                Conversation::from_metadata(&path, &self.reader.metadata)
            });

            match (result, self.reader.config.error_policy) {
                (Ok(conversation), _) => {
                    self.loaded += 1;
                    tracing::debug!(
                        loaded = self.loaded,
                        conversation_no = conversation.conversation_no,
                        "Yielding conversation"
                    );
                    return Some(Ok(conversation));
                }
                (Err(error), ErrorPolicy::Skip) => {
                    tracing::warn!(%error, "Skipping conversation that failed to load");
                }
                (Err(error), ErrorPolicy::Stop) => {
                    self.paths = None;
                    return Some(Err(error));
                }
            }
        }
    }
}

/// Lazy iterator over the utterances of a corpus; see
/// [`CorpusReader::utterances`].
pub struct Utterances<'a> {
    conversations: Conversations<'a>,
    current: std::vec::IntoIter<Utterance>,
}

impl Iterator for Utterances<'_> {
    type Item = Result<Utterance>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(utterance) = self.current.next() {
                return Some(Ok(utterance));
            }
            match self.conversations.next()? {
                Ok(conversation) => self.current = conversation.into_iter(),
                Err(error) => return Some(Err(error)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::{CorpusFixture, MetadataRow, UtteranceRow};
    use testresult::TestResult;

    fn two_conversation_corpus() -> anyhow::Result<CorpusFixture> {
        let fixture = CorpusFixture::new(&[
            MetadataRow::default(),
            MetadataRow {
                conversation_no: "2001".into(),
                ..MetadataRow::default()
            },
        ])?;
        fixture.add_transcript(
            "sw00utt",
            "sw_0001_1234.utt.csv",
            &[UtteranceRow::default(), UtteranceRow::default()],
        )?;
        fixture.add_transcript(
            "sw01utt",
            "sw_0100_2001.utt.csv",
            &[UtteranceRow {
                conversation_no: "2001".into(),
                ..UtteranceRow::default()
            }],
        )?;
        Ok(fixture)
    }

    #[test]
    fn it_discovers_conversations_in_sorted_order() -> TestResult {
        let fixture = two_conversation_corpus()?;
        std::fs::create_dir_all(fixture.root().join("sw02utt").join("archive.csv"))?;
        let reader = CorpusReader::new(fixture.root())?;

        let numbers = reader
            .conversations()
            .map(|conversation| conversation.map(|c| c.conversation_no))
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(numbers, vec![1234, 2001]);
        assert_eq!(reader.transcript_paths()?.len(), 2);
        Ok(())
    }

    #[test]
    fn it_is_restartable() -> TestResult {
        let fixture = two_conversation_corpus()?;
        let reader = CorpusReader::new(fixture.root())?;

        assert_eq!(reader.utterances().count(), 3);
        assert_eq!(reader.utterances().count(), 3);
        Ok(())
    }

    #[test]
    fn it_stops_at_the_first_failure_by_default() -> TestResult {
        let fixture = two_conversation_corpus()?;
        fixture.add_transcript(
            "sw00utt",
            "sw_0002_9999.utt.csv",
            &[UtteranceRow {
                conversation_no: "9999".into(),
                ..UtteranceRow::default()
            }],
        )?;
        let reader = CorpusReader::new(fixture.root())?;

        let results: Vec<_> = reader.conversations().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(SwdaError::KeyNotFound(9999))));
        Ok(())
    }

    #[test]
    fn it_can_skip_failing_files() -> TestResult {
        let fixture = two_conversation_corpus()?;
        fixture.add_transcript(
            "sw00utt",
            "sw_0002_9999.utt.csv",
            &[UtteranceRow {
                conversation_no: "9999".into(),
                ..UtteranceRow::default()
            }],
        )?;
        let config = CorpusConfig::new(fixture.root()).with_error_policy(ErrorPolicy::Skip);
        let reader = CorpusReader::with_config(config)?;

        let numbers = reader
            .conversations()
            .map(|conversation| conversation.map(|c| c.conversation_no))
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(numbers, vec![1234, 2001]);
        Ok(())
    }

    #[test]
    fn it_requires_the_metadata_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let result = CorpusReader::new(dir.path());
        assert!(matches!(result, Err(SwdaError::FileAccess { .. })));
        Ok(())
    }

    #[test]
    fn it_reports_invalid_patterns_once() -> TestResult {
        let fixture = two_conversation_corpus()?;
        let config = CorpusConfig::new(fixture.root()).with_transcript_pattern("sw[*.csv");
        let reader = CorpusReader::with_config(config)?;

        let results: Vec<_> = reader.conversations().collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(SwdaError::Pattern(_))));
        Ok(())
    }
}
