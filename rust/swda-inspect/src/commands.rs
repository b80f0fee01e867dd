use std::io::Write;

use anyhow::{Result, bail};
use swda_corpus::{Caller, Conversation, CorpusConfig, CorpusReader, ErrorPolicy, damsl_act_tag};

use crate::{InspectCli, InspectCommand};

/// Totals gathered by [`check`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub conversations: usize,
    pub utterances: usize,
}

/// Run the command named by `cli`, writing its output to `out`.
pub fn run(cli: InspectCli, out: &mut impl Write) -> Result<()> {
    let mut config = CorpusConfig::new(cli.root);
    if let InspectCommand::Check { skip_errors: true } = cli.command {
        config = config.with_error_policy(ErrorPolicy::Skip);
    }
    let reader = CorpusReader::with_config(config)?;

    match cli.command {
        InspectCommand::Check { .. } => {
            check(&reader, out)?;
        }
        InspectCommand::Show { conversation_no } => show(&reader, conversation_no, out)?,
    }
    Ok(())
}

/// Load every conversation of the corpus and report how much was read.
pub fn check(reader: &CorpusReader, out: &mut impl Write) -> Result<CheckReport> {
    let mut report = CheckReport::default();
    for conversation in reader.conversations() {
        let conversation = conversation?;
        report.conversations += 1;
        report.utterances += conversation.len();
    }

    tracing::info!(
        conversations = report.conversations,
        utterances = report.utterances,
        "Corpus check finished"
    );
    writeln!(
        out,
        "{} conversations, {} utterances ({} conversations in metadata)",
        report.conversations,
        report.utterances,
        reader.metadata().len()
    )?;
    Ok(report)
}

/// Print the metadata and utterances of one conversation.
pub fn show(reader: &CorpusReader, conversation_no: u32, out: &mut impl Write) -> Result<()> {
    reader.metadata().get(conversation_no)?;

    for conversation in reader.conversations() {
        let conversation = conversation?;
        if conversation.conversation_no == conversation_no {
            return write_conversation(&conversation, out);
        }
    }
    bail!("No conversation file for conversation {conversation_no}")
}

fn write_conversation(conversation: &Conversation, out: &mut impl Write) -> Result<()> {
    writeln!(
        out,
        "Conversation {} ({}, {}s) from {}",
        conversation.conversation_no,
        conversation.talk_day,
        conversation.length,
        conversation.swda_filename.display()
    )?;
    writeln!(out, "Topic: {}", conversation.topic_description)?;
    writeln!(out, "Prompt: {}", conversation.prompt)?;
    write_caller(out, "A", &conversation.from_caller)?;
    write_caller(out, "B", &conversation.to_caller)?;
    writeln!(out)?;

    for utterance in conversation {
        writeln!(
            out,
            "{}.{}.{} {} [{}] {}",
            utterance.caller,
            utterance.utterance_index,
            utterance.subutterance_index,
            utterance.act_tag,
            damsl_act_tag(&utterance.act_tag),
            utterance.text
        )?;
    }
    Ok(())
}

fn write_caller(out: &mut impl Write, marker: &str, caller: &Caller) -> Result<()> {
    writeln!(
        out,
        "{marker}: caller {}, {}, born {}, education {}, {}",
        caller.caller_no, caller.sex, caller.birth_year, caller.education, caller.dialect_area
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use swda_corpus::{CorpusFixture, MetadataRow, SwdaError, UtteranceRow};
    use testresult::TestResult;

    fn corpus() -> anyhow::Result<CorpusFixture> {
        let fixture = CorpusFixture::new(&[MetadataRow::default()])?;
        fixture.add_transcript(
            "sw00utt",
            "sw_0001_1234.utt.csv",
            &[
                UtteranceRow::default(),
                UtteranceRow {
                    caller: "B".into(),
                    act_tag: "qy^d@".into(),
                    transcript_index: "1".into(),
                    ..UtteranceRow::default()
                },
                UtteranceRow {
                    caller: "B".into(),
                    act_tag: "nn^e".into(),
                    text: "No. /".into(),
                    transcript_index: "2".into(),
                    utterance_index: "2".into(),
                    ..UtteranceRow::default()
                },
            ],
        )?;
        Ok(fixture)
    }

    #[test]
    fn it_counts_conversations_and_utterances() -> TestResult {
        let fixture = corpus()?;
        let reader = CorpusReader::new(fixture.root())?;
        let mut out = Vec::new();

        let report = check(&reader, &mut out)?;
        assert_eq!(
            report,
            CheckReport {
                conversations: 1,
                utterances: 2
            }
        );
        assert_eq!(
            String::from_utf8(out)?,
            "1 conversations, 2 utterances (1 conversations in metadata)\n"
        );
        Ok(())
    }

    #[test]
    fn it_shows_a_conversation() -> TestResult {
        let fixture = corpus()?;
        let reader = CorpusReader::new(fixture.root())?;
        let mut out = Vec::new();

        show(&reader, 1234, &mut out)?;
        let text = String::from_utf8(out)?;
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("Conversation 1234 (1997-01-01, 300s)"));
        assert_eq!(lines[1], "Topic: CHILD CARE");
        assert_eq!(lines[3], "A: caller 1, MALE, born 1950, education 3, NORTH");
        assert_eq!(lines[4], "B: caller 2, FEMALE, born 1960, education 2, SOUTH");
        assert_eq!(lines[6], "A.1.1 sd [sd] I think so. /");
        assert_eq!(lines[7], "B.2.1 nn^e [ng] No. /");
        assert_eq!(lines.len(), 8);
        Ok(())
    }

    #[test]
    fn it_reports_unknown_conversations() -> TestResult {
        let fixture = corpus()?;
        let reader = CorpusReader::new(fixture.root())?;

        let error = show(&reader, 4321, &mut Vec::new()).err().ok_or("expected an error")?;
        assert!(matches!(
            error.downcast_ref::<SwdaError>(),
            Some(SwdaError::KeyNotFound(4321))
        ));
        Ok(())
    }

    #[test]
    fn it_runs_from_the_command_line() -> TestResult {
        let fixture = corpus()?;
        fixture.add_transcript(
            "sw00utt",
            "sw_0002_9999.utt.csv",
            &[UtteranceRow {
                conversation_no: "9999".into(),
                ..UtteranceRow::default()
            }],
        )?;
        let root = fixture.root().to_string_lossy().into_owned();

        let strict = InspectCli {
            root: root.clone().into(),
            command: InspectCommand::Check { skip_errors: false },
        };
        assert!(run(strict, &mut Vec::new()).is_err());

        let lenient = InspectCli {
            root: root.into(),
            command: InspectCommand::Check { skip_errors: true },
        };
        let mut out = Vec::new();
        run(lenient, &mut out)?;
        assert!(String::from_utf8(out)?.starts_with("1 conversations, 2 utterances"));
        Ok(())
    }
}
