//! Reader for the CSV edition of the Switchboard Dialog Act Corpus (SwDA).
//!
//! A corpus root holds a metadata file (`swda-metadata.csv`) with one row
//! per conversation, and directories `sw00utt` .. `sw13utt` holding one CSV
//! file per conversation with one row per utterance. [`CorpusReader`] walks
//! the conversation files in sorted order, yielding typed [`Conversation`]s
//! and [`Utterance`]s joined with their [`ConversationMetadataRecord`].
//!
//! ```no_run
//! use swda_corpus::{CorpusReader, damsl_act_tag};
//!
//! let reader = CorpusReader::new("swda")?;
//! for utterance in reader.utterances() {
//!     let utterance = utterance?;
//!     println!("{} {}", damsl_act_tag(&utterance.act_tag), utterance.text);
//! }
//! # Ok::<(), swda_corpus::SwdaError>(())
//! ```
//!
//! Besides the readers, the crate carries the corpus' supporting tools:
//! [`reduce_tag`] collapses SWBD-DAMSL tags to the 43-tag set, the
//! [`SyntaxTree`] parser reads bracketed Penn Treebank trees, and the
//! lemma helpers (see [`TagFormat`]) line up the tagged words of the
//! `pos` column against the leaves of the trees.

mod error;
pub use error::*;

mod tree;
pub use tree::*;

mod table;
pub use table::*;

mod metadata;
pub use metadata::*;

mod utterance;
pub use utterance::*;

mod tag;
pub use tag::*;

mod lemma;
pub use lemma::*;

mod conversation;
pub use conversation::*;

mod config;
pub use config::*;

mod reader;
pub use reader::*;

#[cfg(any(test, feature = "helpers"))]
mod helpers;
#[cfg(any(test, feature = "helpers"))]
pub use helpers::*;
