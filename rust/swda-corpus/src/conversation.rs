use std::fs::File;
use std::ops::Deref;
use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf};

use crate::error::{Result, SwdaError, parse_integer};
use crate::{ConversationMetadata, ConversationMetadataRecord, Utterance};

/// Marks slash-units with bad segmentation; such utterances are dropped.
pub const BAD_SEGMENTATION_MARKER: char = '@';

/// One conversation file: its utterances, in transcript order, and the
/// conversation's metadata.
///
/// The metadata fields are reachable directly through `Deref`, so
/// `conversation.talk_day` and `conversation.from_caller` work as expected.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    /// The file this conversation was read from
    pub swda_filename: PathBuf,
    /// The Treebank basename, using the platform's path separator
    pub ptb_basename: String,
    pub metadata: ConversationMetadataRecord,
    /// Utterances whose act tag carries [`BAD_SEGMENTATION_MARKER`] are not
    /// included. Indices are not renumbered, so gaps may appear.
    pub utterances: Vec<Utterance>,
}

impl Conversation {
    /// Read the conversation file at `path`, looking its metadata up in
    /// `metadata`.
    pub fn from_metadata(path: impl AsRef<Path>, metadata: &ConversationMetadata) -> Result<Self> {
        let path = path.as_ref();
        let rows = read_rows(path)?;
        let first = rows
            .first()
            .ok_or_else(|| SwdaError::malformed_row(path, 2, "conversation file has no rows"))?;

        let conversation_no: u32 = parse_integer(
            "conversation_no",
            first.get(2).map(String::as_str).unwrap_or(""),
        )?;
        let ptb_basename = first
            .get(1)
            .map(|basename| basename.trim().split('/').collect::<Vec<_>>().join(MAIN_SEPARATOR_STR))
            .unwrap_or_default();
        let record = metadata.get(conversation_no)?.clone();

        let mut utterances = project_rows(path, &rows, &record)?;
        let total = utterances.len();
        utterances.retain(|utterance| !utterance.act_tag.contains(BAD_SEGMENTATION_MARKER));

        tracing::debug!(
            path = %path.display(),
            conversation_no,
            utterances = utterances.len(),
            dropped = total - utterances.len(),
            "Loaded conversation"
        );

        Ok(Self {
            swda_filename: path.to_path_buf(),
            ptb_basename,
            metadata: record,
            utterances,
        })
    }

    /// Like [`Conversation::from_metadata`], loading the metadata file at
    /// `metadata_path` first.
    pub fn from_metadata_path(
        path: impl AsRef<Path>,
        metadata_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let metadata = ConversationMetadata::from_path(metadata_path)?;
        Self::from_metadata(path, &metadata)
    }

    /// Every utterance in the file at `path`, before bad segmentations are
    /// filtered out.
    pub fn read_utterances(
        path: impl AsRef<Path>,
        metadata: &ConversationMetadataRecord,
    ) -> Result<Vec<Utterance>> {
        let path = path.as_ref();
        project_rows(path, &read_rows(path)?, metadata)
    }

    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Utterance> {
        self.utterances.iter()
    }
}

impl Deref for Conversation {
    type Target = ConversationMetadataRecord;

    fn deref(&self) -> &Self::Target {
        &self.metadata
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a Utterance;
    type IntoIter = std::slice::Iter<'a, Utterance>;

    fn into_iter(self) -> Self::IntoIter {
        self.utterances.iter()
    }
}

impl IntoIterator for Conversation {
    type Item = Utterance;
    type IntoIter = std::vec::IntoIter<Utterance>;

    fn into_iter(self) -> Self::IntoIter {
        self.utterances.into_iter()
    }
}

/// Build an utterance from every row. Each row must belong to the
/// conversation described by `metadata`.
fn project_rows(
    path: &Path,
    rows: &[Vec<String>],
    metadata: &ConversationMetadataRecord,
) -> Result<Vec<Utterance>> {
    rows.iter()
        .zip(2u64..)
        .map(|(row, line)| {
            let utterance = Utterance::from_row(row.as_slice(), metadata)?;
            if utterance.conversation_no != metadata.conversation_no {
                return Err(SwdaError::malformed_row(
                    path,
                    line,
                    format!(
                        "row belongs to conversation {}, not {}",
                        utterance.conversation_no, metadata.conversation_no
                    ),
                ));
            }
            Ok(utterance)
        })
        .collect()
}

/// Read all data rows of a conversation file, skipping its header.
fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let file = File::open(path).map_err(|error| SwdaError::file_access(path, error))?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    reader
        .records()
        .map(|record| {
            record
                .map(|record| record.iter().map(str::to_string).collect())
                .map_err(|error| SwdaError::from_csv(path, error))
        })
        .collect()
}
