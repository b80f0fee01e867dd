//! The consolidated per-conversation metadata file, `swda-metadata.csv`.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{Result, SwdaError, parse_integer};

/// Columns of `swda-metadata.csv`, in the order they are written.
pub const METADATA_HEADER: [&str; 15] = [
    "conversation_no",
    "talk_day",
    "length",
    "topic_description",
    "prompt",
    "from_caller",
    "from_caller_sex",
    "from_caller_education",
    "from_caller_birth_year",
    "from_caller_dialect_area",
    "to_caller",
    "to_caller_sex",
    "to_caller_education",
    "to_caller_birth_year",
    "to_caller_dialect_area",
];

/// The two participant slots of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CallerRole {
    /// The caller who placed the call
    From,
    /// The caller who received it
    To,
}

impl CallerRole {
    /// Resolve a speaker marker (`A`, `B`, `@A`, `@@B`, ...) to a role. Markers
    /// ending in `B` are the receiving caller; everything else placed the call.
    pub fn from_speaker(marker: &str) -> Self {
        if marker.ends_with('B') {
            CallerRole::To
        } else {
            CallerRole::From
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            CallerRole::From => "from",
            CallerRole::To => "to",
        }
    }
}

/// Demographics of one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Caller {
    pub caller_no: u32,
    pub sex: String,
    /// Education level code: 0 (less than high school) to 3 (more than
    /// college), 9 when unknown
    pub education: u8,
    pub birth_year: i32,
    pub dialect_area: String,
}

/// Everything known about one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationMetadataRecord {
    pub conversation_no: u32,
    pub talk_day: NaiveDate,
    /// Call length in seconds
    pub length: u32,
    pub topic_description: String,
    pub prompt: String,
    pub from_caller: Caller,
    pub to_caller: Caller,
}

impl ConversationMetadataRecord {
    pub fn caller(&self, role: CallerRole) -> &Caller {
        match role {
            CallerRole::From => &self.from_caller,
            CallerRole::To => &self.to_caller,
        }
    }
}

/// Decode the six-digit `YYMMDD` talk day. Every year is in the 1900s.
pub fn decode_talk_day(value: &str) -> Result<NaiveDate> {
    let invalid = || SwdaError::type_conversion("talk_day", value);
    let digits = value.trim();
    if digits.len() != 6 || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(invalid());
    }

    let year = 1900 + parse_integer::<i32>("talk_day", &digits[..2])?;
    let month = parse_integer::<u32>("talk_day", &digits[2..4])?;
    let day = parse_integer::<u32>("talk_day", &digits[4..])?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Conversation metadata for the whole corpus, keyed by conversation number.
#[derive(Debug, Clone, Default)]
pub struct ConversationMetadata {
    records: HashMap<u32, ConversationMetadataRecord>,
}

impl ConversationMetadata {
    /// Load the metadata file at `path`. The first row must be a header
    /// naming (at least) every column in [`METADATA_HEADER`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|error| SwdaError::file_access(path, error))?;
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

        let header = reader
            .headers()
            .map_err(|error| SwdaError::from_csv(path, error))?
            .clone();
        let mut columns = HashMap::new();
        for name in METADATA_HEADER {
            let index = header
                .iter()
                .position(|column| column.trim() == name)
                .ok_or_else(|| {
                    SwdaError::malformed_row(path, 1, format!("missing column '{name}'"))
                })?;
            columns.insert(name, index);
        }

        let mut records = HashMap::new();
        for record in reader.records() {
            let record = record.map_err(|error| SwdaError::from_csv(path, error))?;
            let fields = Fields {
                record: &record,
                columns: &columns,
                path,
                line: record.position().map(|position| position.line()).unwrap_or(0),
            };

            let metadata = ConversationMetadataRecord {
                conversation_no: fields.integer("conversation_no")?,
                talk_day: decode_talk_day(fields.get("talk_day")?)?,
                length: fields.integer("length")?,
                topic_description: fields.get("topic_description")?.to_string(),
                prompt: fields.get("prompt")?.to_string(),
                from_caller: fields.caller(CallerRole::From)?,
                to_caller: fields.caller(CallerRole::To)?,
            };
            records.insert(metadata.conversation_no, metadata);
        }

        tracing::debug!(
            path = %path.display(),
            conversations = records.len(),
            "Loaded conversation metadata"
        );

        Ok(Self { records })
    }

    /// Build the collection from records that are already in memory.
    pub fn from_records(records: impl IntoIterator<Item = ConversationMetadataRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.conversation_no, record))
                .collect(),
        }
    }

    pub fn get(&self, conversation_no: u32) -> Result<&ConversationMetadataRecord> {
        self.records
            .get(&conversation_no)
            .ok_or(SwdaError::KeyNotFound(conversation_no))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversationMetadataRecord> {
        self.records.values()
    }
}

/// A metadata row viewed through the header's column positions.
struct Fields<'a> {
    record: &'a csv::StringRecord,
    columns: &'a HashMap<&'static str, usize>,
    path: &'a Path,
    line: u64,
}

impl<'a> Fields<'a> {
    fn get(&self, name: &str) -> Result<&'a str> {
        self.columns
            .get(name)
            .and_then(|index| self.record.get(*index))
            .ok_or_else(|| {
                SwdaError::malformed_row(self.path, self.line, format!("missing field '{name}'"))
            })
    }

    fn integer<T: FromStr>(&self, name: &str) -> Result<T> {
        parse_integer(name, self.get(name)?)
    }

    fn caller(&self, role: CallerRole) -> Result<Caller> {
        let prefix = role.prefix();
        Ok(Caller {
            caller_no: self.integer(&format!("{prefix}_caller"))?,
            sex: self.get(&format!("{prefix}_caller_sex"))?.to_string(),
            education: self.integer(&format!("{prefix}_caller_education"))?,
            birth_year: self.integer(&format!("{prefix}_caller_birth_year"))?,
            dialect_area: self.get(&format!("{prefix}_caller_dialect_area"))?.to_string(),
        })
    }
}
