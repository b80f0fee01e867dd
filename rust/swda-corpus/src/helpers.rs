//! Fixture builders for tests: metadata rows, conversation rows, and
//! throwaway corpora on disk.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;
use tempfile::TempDir;

use crate::{
    Caller, ConversationMetadata, ConversationMetadataRecord, DEFAULT_METADATA_FILENAME,
    METADATA_HEADER, UTTERANCE_HEADER,
};

/// A row of `swda-metadata.csv`, as raw strings so tests can write
/// malformed values.
#[derive(Debug, Clone)]
pub struct MetadataRow {
    pub conversation_no: String,
    pub talk_day: String,
    pub length: String,
    pub topic_description: String,
    pub prompt: String,
    pub from_caller: String,
    pub from_caller_sex: String,
    pub from_caller_education: String,
    pub from_caller_birth_year: String,
    pub from_caller_dialect_area: String,
    pub to_caller: String,
    pub to_caller_sex: String,
    pub to_caller_education: String,
    pub to_caller_birth_year: String,
    pub to_caller_dialect_area: String,
}

impl Default for MetadataRow {
    fn default() -> Self {
        Self {
            conversation_no: "1234".into(),
            talk_day: "970101".into(),
            length: "300".into(),
            topic_description: "CHILD CARE".into(),
            prompt: "FIND OUT WHAT CRITERIA THE OTHER CALLER WOULD USE".into(),
            from_caller: "1".into(),
            from_caller_sex: "MALE".into(),
            from_caller_education: "3".into(),
            from_caller_birth_year: "1950".into(),
            from_caller_dialect_area: "NORTH".into(),
            to_caller: "2".into(),
            to_caller_sex: "FEMALE".into(),
            to_caller_education: "2".into(),
            to_caller_birth_year: "1960".into(),
            to_caller_dialect_area: "SOUTH".into(),
        }
    }
}

impl MetadataRow {
    /// The fields in [`METADATA_HEADER`] order.
    pub fn fields(&self) -> [&str; 15] {
        [
            &self.conversation_no,
            &self.talk_day,
            &self.length,
            &self.topic_description,
            &self.prompt,
            &self.from_caller,
            &self.from_caller_sex,
            &self.from_caller_education,
            &self.from_caller_birth_year,
            &self.from_caller_dialect_area,
            &self.to_caller,
            &self.to_caller_sex,
            &self.to_caller_education,
            &self.to_caller_birth_year,
            &self.to_caller_dialect_area,
        ]
    }
}

/// The typed record that [`MetadataRow::default`] loads as.
pub fn metadata_record() -> ConversationMetadataRecord {
    ConversationMetadataRecord {
        conversation_no: 1234,
        talk_day: NaiveDate::from_ymd_opt(1997, 1, 1).unwrap_or_default(),
        length: 300,
        topic_description: "CHILD CARE".into(),
        prompt: "FIND OUT WHAT CRITERIA THE OTHER CALLER WOULD USE".into(),
        from_caller: Caller {
            caller_no: 1,
            sex: "MALE".into(),
            education: 3,
            birth_year: 1950,
            dialect_area: "NORTH".into(),
        },
        to_caller: Caller {
            caller_no: 2,
            sex: "FEMALE".into(),
            education: 2,
            birth_year: 1960,
            dialect_area: "SOUTH".into(),
        },
    }
}

/// A row of a conversation file, as raw strings.
#[derive(Debug, Clone)]
pub struct UtteranceRow {
    pub swda_filename: String,
    pub ptb_basename: String,
    pub conversation_no: String,
    pub transcript_index: String,
    pub act_tag: String,
    pub caller: String,
    pub utterance_index: String,
    pub subutterance_index: String,
    pub text: String,
    pub pos: String,
    pub trees: String,
    pub ptb_treenumbers: String,
}

impl Default for UtteranceRow {
    fn default() -> Self {
        Self {
            swda_filename: "sw00utt/sw_0001_1234.utt".into(),
            ptb_basename: "2/sw2005".into(),
            conversation_no: "1234".into(),
            transcript_index: "0".into(),
            act_tag: "sd".into(),
            caller: "A".into(),
            utterance_index: "1".into(),
            subutterance_index: "1".into(),
            text: "I think so. /".into(),
            pos: "I/PRP think/VBP so/RB ./.".into(),
            trees: "(S (NP-SBJ (PRP I)) (VP (VBP think) (ADVP (RB so))) (. .))".into(),
            ptb_treenumbers: "1".into(),
        }
    }
}

impl UtteranceRow {
    /// The fields in [`UTTERANCE_HEADER`] order.
    pub fn fields(&self) -> [&str; 12] {
        [
            &self.swda_filename,
            &self.ptb_basename,
            &self.conversation_no,
            &self.transcript_index,
            &self.act_tag,
            &self.caller,
            &self.utterance_index,
            &self.subutterance_index,
            &self.text,
            &self.pos,
            &self.trees,
            &self.ptb_treenumbers,
        ]
    }
}

/// Write a metadata file, header first.
pub fn write_metadata(path: &Path, rows: &[MetadataRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(METADATA_HEADER)?;
    for row in rows {
        writer.write_record(row.fields())?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a conversation file, header first.
pub fn write_transcript(path: &Path, rows: &[UtteranceRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(UTTERANCE_HEADER)?;
    for row in rows {
        writer.write_record(row.fields())?;
    }
    writer.flush()?;
    Ok(())
}

/// A corpus in a temporary directory, removed when dropped.
pub struct CorpusFixture {
    dir: TempDir,
    metadata: ConversationMetadata,
}

impl CorpusFixture {
    /// Create a corpus root holding a metadata file with `rows`.
    pub fn new(rows: &[MetadataRow]) -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let metadata_path = dir.path().join(DEFAULT_METADATA_FILENAME);
        write_metadata(&metadata_path, rows)?;
        let metadata = ConversationMetadata::from_path(&metadata_path)?;
        Ok(Self { dir, metadata })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.root().join(DEFAULT_METADATA_FILENAME)
    }

    /// The metadata as loaded from the fixture's metadata file.
    pub fn metadata(&self) -> &ConversationMetadata {
        &self.metadata
    }

    /// Write a conversation file at `<root>/<block>/<name>`.
    pub fn add_transcript(&self, block: &str, name: &str, rows: &[UtteranceRow]) -> Result<PathBuf> {
        let dir = self.root().join(block);
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(name);
        write_transcript(&path, rows)?;
        Ok(path)
    }
}
