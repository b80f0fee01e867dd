use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, parse_integer};
use crate::{CallerRole, ConversationMetadataRecord, SyntaxTree, damsl_act_tag};

/// Columns of a conversation file, in order.
pub const UTTERANCE_HEADER: [&str; 12] = [
    "swda_filename",
    "ptb_basename",
    "conversation_no",
    "transcript_index",
    "act_tag",
    "caller",
    "utterance_index",
    "subutterance_index",
    "text",
    "pos",
    "trees",
    "ptb_treenumbers",
];

/// Joins several trees (and their tree numbers) within one field.
pub const MULTI_VALUE_SEPARATOR: &str = "|||";

static DISFLUENCY_MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([+/\}\[\]]|\{\w)").expect("valid disfluency pattern"));

/// One transcribed utterance line together with the demographics of the
/// caller who spoke it.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    /// The conversation file, as `directory/basename`
    pub swda_filename: String,
    /// The Treebank file holding this utterance's trees (add `.pos` or `.mrg`)
    pub ptb_basename: String,
    pub conversation_no: u32,
    /// Line number of this utterance in the transcript, counting only
    /// utterance lines
    pub transcript_index: u32,
    /// Dialog act tag with transcription-error `*` markers removed
    pub act_tag: String,
    /// Speaker marker: `A`, `B`, `@A`, `@B`, `@@A` or `@@B`
    pub caller: String,
    /// The number in `A.49`, `B.27`, ...
    pub utterance_index: u32,
    /// Position within an utterance broken across several lines
    pub subutterance_index: u32,
    pub text: String,
    /// Whitespace-separated `word/TAG` pairs
    pub pos: String,
    pub trees: Vec<SyntaxTree>,
    /// Numbers of [`Utterance::trees`] within the `.mrg` file
    pub ptb_treenumbers: Vec<u32>,
    pub caller_no: u32,
    pub caller_sex: String,
    pub caller_education: u8,
    pub caller_birth_year: i32,
    pub caller_dialect_area: String,
}

impl Utterance {
    /// Build an utterance from one conversation-file row (fields in
    /// [`UTTERANCE_HEADER`] order) and the metadata of its conversation.
    ///
    /// Missing trailing fields are treated as empty.
    pub fn from_row<S: AsRef<str>>(
        row: &[S],
        metadata: &ConversationMetadataRecord,
    ) -> Result<Self> {
        let field = |index: usize| row.get(index).map(|value| value.as_ref().trim()).unwrap_or("");
        let integer = |index: usize| parse_integer::<u32>(UTTERANCE_HEADER[index], field(index));

        let trees = split_multi_value(field(10))
            .map(SyntaxTree::parse)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let ptb_treenumbers = split_multi_value(field(11))
            .map(|number| parse_integer(UTTERANCE_HEADER[11], number))
            .collect::<Result<Vec<u32>>>()?;

        let caller = field(5).to_string();
        let speaker = metadata.caller(CallerRole::from_speaker(&caller));

        Ok(Self {
            swda_filename: field(0).to_string(),
            ptb_basename: field(1).to_string(),
            conversation_no: integer(2)?,
            transcript_index: integer(3)?,
            act_tag: field(4).replace('*', ""),
            caller,
            utterance_index: integer(6)?,
            subutterance_index: integer(7)?,
            text: field(8).to_string(),
            pos: field(9).to_string(),
            trees,
            ptb_treenumbers,
            caller_no: speaker.caller_no,
            caller_sex: speaker.sex.clone(),
            caller_education: speaker.education,
            caller_birth_year: speaker.birth_year,
            caller_dialect_area: speaker.dialect_area.clone(),
        })
    }

    /// Which of the two conversation participants spoke this utterance.
    pub fn caller_role(&self) -> CallerRole {
        CallerRole::from_speaker(&self.caller)
    }

    /// The coarse (DAMSL) version of [`Utterance::act_tag`].
    pub fn damsl_act_tag(&self) -> String {
        damsl_act_tag(&self.act_tag)
    }

    /// Split the utterance text on whitespace. With `filter_disfluency`, the
    /// transcription markup (`+`, `/`, brackets, and `{` plus its code
    /// letter) is removed first so the result reads more like printed text.
    pub fn text_words(&self, filter_disfluency: bool) -> Vec<String> {
        let text = if filter_disfluency {
            DISFLUENCY_MARKUP.replace_all(&self.text, "")
        } else {
            self.text.as_str().into()
        };
        let text = text.trim();
        if text.is_empty() {
            return vec![String::new()];
        }
        text.split_whitespace().map(str::to_string).collect()
    }
}

fn split_multi_value(value: &str) -> impl Iterator<Item = &str> {
    (!value.is_empty())
        .then(|| value.split(MULTI_VALUE_SEPARATOR))
        .into_iter()
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SwdaError;
    use crate::helpers::{UtteranceRow, metadata_record};
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    #[test]
    fn it_types_every_field() -> TestResult {
        let row = UtteranceRow {
            transcript_index: "17".into(),
            utterance_index: "9".into(),
            subutterance_index: "2".into(),
            ..UtteranceRow::default()
        };
        let utterance = Utterance::from_row(&row.fields(), &metadata_record())?;

        assert_eq!(utterance.swda_filename, "sw00utt/sw_0001_1234.utt");
        assert_eq!(utterance.ptb_basename, "2/sw2005");
        assert_eq!(utterance.conversation_no, 1234);
        assert_eq!(utterance.transcript_index, 17);
        assert_eq!(utterance.utterance_index, 9);
        assert_eq!(utterance.subutterance_index, 2);
        assert_eq!(utterance.act_tag, "sd");
        assert_eq!(utterance.trees.len(), 1);
        assert_eq!(utterance.trees[0].leaves(), vec!["I", "think", "so", "."]);
        assert_eq!(utterance.ptb_treenumbers, vec![1]);
        Ok(())
    }

    #[test]
    fn it_projects_the_speaking_callers_demographics() -> TestResult {
        let metadata = metadata_record();
        let row = UtteranceRow {
            caller: "B".into(),
            ..UtteranceRow::default()
        };
        let utterance = Utterance::from_row(&row.fields(), &metadata)?;
        assert_eq!(utterance.caller_role(), CallerRole::To);
        assert_eq!(utterance.caller_no, 2);
        assert_eq!(utterance.caller_sex, "FEMALE");
        assert_eq!(utterance.caller_education, 2);
        assert_eq!(utterance.caller_birth_year, 1960);
        assert_eq!(utterance.caller_dialect_area, "SOUTH");

        let row = UtteranceRow {
            caller: "@@A".into(),
            ..UtteranceRow::default()
        };
        let utterance = Utterance::from_row(&row.fields(), &metadata)?;
        assert_eq!(utterance.caller_role(), CallerRole::From);
        assert_eq!(utterance.caller_dialect_area, "NORTH");
        assert_eq!(utterance.caller_education, 3);
        Ok(())
    }

    #[test]
    fn it_strips_transcription_error_markers_only() -> TestResult {
        let row = UtteranceRow {
            act_tag: " sd*^e@ ".into(),
            ..UtteranceRow::default()
        };
        let utterance = Utterance::from_row(&row.fields(), &metadata_record())?;
        assert_eq!(utterance.act_tag, "sd^e@");
        Ok(())
    }

    #[test]
    fn it_splits_multiple_trees() -> TestResult {
        let row = UtteranceRow {
            trees: "(S (NP (PRP I)))|||(S (VP (VB go)))".into(),
            ptb_treenumbers: "4|||5".into(),
            ..UtteranceRow::default()
        };
        let utterance = Utterance::from_row(&row.fields(), &metadata_record())?;
        assert_eq!(utterance.trees.len(), 2);
        assert_eq!(utterance.trees[1].leaves(), vec!["go"]);
        assert_eq!(utterance.ptb_treenumbers, vec![4, 5]);
        Ok(())
    }

    #[test]
    fn it_defaults_missing_trailing_fields() -> TestResult {
        let row = UtteranceRow::default();
        let fields = row.fields();
        let utterance = Utterance::from_row(&fields[..9], &metadata_record())?;

        assert_eq!(utterance.pos, "");
        assert!(utterance.trees.is_empty());
        assert!(utterance.ptb_treenumbers.is_empty());
        Ok(())
    }

    #[test]
    fn it_rejects_non_numeric_indices() {
        let row = UtteranceRow {
            utterance_index: "A.49".into(),
            ..UtteranceRow::default()
        };
        let result = Utterance::from_row(&row.fields(), &metadata_record());
        assert!(matches!(
            result,
            Err(SwdaError::TypeConversion { ref field, .. }) if field == "utterance_index"
        ));

        let row = UtteranceRow::default();
        let fields = row.fields();
        let result = Utterance::from_row(&fields[..3], &metadata_record());
        assert!(matches!(
            result,
            Err(SwdaError::TypeConversion { ref field, .. }) if field == "transcript_index"
        ));
    }

    #[test]
    fn it_rejects_malformed_trees() {
        let row = UtteranceRow {
            trees: "(S (NP (PRP I))|||(S (VP (VB go)))".into(),
            ..UtteranceRow::default()
        };
        let result = Utterance::from_row(&row.fields(), &metadata_record());
        assert!(matches!(result, Err(SwdaError::TreeParse(_))));
    }

    #[test]
    fn it_tokenizes_text_with_and_without_disfluency_markup() -> TestResult {
        let row = UtteranceRow {
            text: "{D Well, } [ I, + I ] think so. /".into(),
            ..UtteranceRow::default()
        };
        let utterance = Utterance::from_row(&row.fields(), &metadata_record())?;

        assert_eq!(
            utterance.text_words(false),
            vec!["{D", "Well,", "}", "[", "I,", "+", "I", "]", "think", "so.", "/"]
        );
        assert_eq!(
            utterance.text_words(true),
            vec!["Well,", "I,", "I", "think", "so."]
        );
        Ok(())
    }
}
