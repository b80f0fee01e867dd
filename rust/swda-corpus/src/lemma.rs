//! Alignment of the two word-level annotations of an utterance: the
//! `word/TAG` string from the Treebank `.pos` files and the terminals of the
//! `.mrg` parse trees.
//!
//! The two encodings disagree on a handful of conventions (empty categories
//! in the trees, fused clitic tags in the POS string, trailing hyphens on
//! cut-off words), so each side is regularized before comparison. See
//! [`Utterance::tree_is_perfect_match`].

use serde::Serialize;

use crate::Utterance;

/// Tree terminals whose tags mark empty categories or disfluency
/// boundaries; they have no counterpart in the POS string.
pub const EMPTY_CATEGORY_TAGS: [&str; 2] = ["-NONE-", "-DFL-"];

/// POS-string tags for fused or ambiguous tokens that the trees split up or
/// never contain.
pub const NON_TREE_POS_TAGS: [&str; 18] = [
    "^PRP^BES", "^FW", "^MD", "^MD^RB", "^PRP^VBZ", "^WP$", "^NN^HVS", "NN|VBG", "^DT^BES",
    "^MD^VB", "^DT^JJ", "^PRP^HVS", "^NN^POS", "^WP^BES", "^NN^BES", "NN|CD", "^WDT", "^VB^PRP",
];

/// Placeholder word the POS files use for dashes.
const DASH_PLACEHOLDER: &str = "--";

/// A word and its part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TaggedWord {
    pub word: String,
    pub tag: String,
}

impl TaggedWord {
    pub fn new(word: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            tag: tag.into(),
        }
    }
}

/// The four open-class categories of WordNet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WordNetPos {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl WordNetPos {
    pub fn as_str(self) -> &'static str {
        match self {
            WordNetPos::Noun => "n",
            WordNetPos::Verb => "v",
            WordNetPos::Adjective => "a",
            WordNetPos::Adverb => "r",
        }
    }

    /// Recognize a WordNet-style tag (`n`, `v`, `a` or `r`).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "n" => Some(WordNetPos::Noun),
            "v" => Some(WordNetPos::Verb),
            "a" => Some(WordNetPos::Adjective),
            "r" => Some(WordNetPos::Adverb),
            _ => None,
        }
    }
}

/// Map a Treebank tag to its WordNet category (`VB*` → `v`, `N*` → `n`,
/// `J*` → `a`, `RB*` → `r`). Other tags are returned lowercased.
pub fn treebank_to_wordnet(tag: &str) -> String {
    let lower = tag.to_lowercase();
    let pos = if lower.starts_with('v') {
        WordNetPos::Verb
    } else if lower.starts_with('n') {
        WordNetPos::Noun
    } else if lower.starts_with('j') {
        WordNetPos::Adjective
    } else if lower.starts_with("rb") {
        WordNetPos::Adverb
    } else {
        return lower;
    };
    pos.as_str().to_string()
}

/// A dictionary that reduces words to their lemmas. `pos` is `None` when the
/// word's tag is not one of the WordNet categories, in which case the
/// implementation should fall back to its untagged behavior.
pub trait Lemmatizer {
    fn lemmatize(&self, word: &str, pos: Option<WordNetPos>) -> String;
}

impl<F> Lemmatizer for F
where
    F: Fn(&str, Option<WordNetPos>) -> String,
{
    fn lemmatize(&self, word: &str, pos: Option<WordNetPos>) -> String {
        self(word, pos)
    }
}

/// How tags (and words) are presented by the lemma accessors.
#[derive(Clone, Copy, Default)]
pub enum TagFormat<'a> {
    /// Tags as they appear in the corpus
    #[default]
    Treebank,
    /// Tags mapped with [`treebank_to_wordnet`]
    WordNet,
    /// Tags mapped with [`treebank_to_wordnet`] and words replaced by their
    /// lemmas
    Lemmatized(&'a dyn Lemmatizer),
}

impl TagFormat<'_> {
    fn apply(self, tagged: Vec<TaggedWord>) -> Vec<TaggedWord> {
        match self {
            TagFormat::Treebank => tagged,
            TagFormat::WordNet => tagged
                .into_iter()
                .map(|TaggedWord { word, tag }| TaggedWord::new(word, treebank_to_wordnet(&tag)))
                .collect(),
            TagFormat::Lemmatized(lemmatizer) => tagged
                .into_iter()
                .map(|TaggedWord { word, tag }| {
                    let tag = treebank_to_wordnet(&tag);
                    let lemma = lemmatizer.lemmatize(&word, WordNetPos::from_tag(&tag));
                    TaggedWord::new(lemma, tag)
                })
                .collect(),
        }
    }
}

fn strip_trailing_hyphen(word: &str) -> String {
    word.strip_suffix('-').unwrap_or(word).to_string()
}

impl Utterance {
    /// The `word/TAG` pairs of [`Utterance::pos`]. Tokens that do not split
    /// into exactly two parts on `/` are dropped.
    pub fn pos_lemmas(&self, format: TagFormat<'_>) -> Vec<TaggedWord> {
        let tagged = self
            .pos
            .split_whitespace()
            .filter_map(|token| {
                let mut parts = token.split('/');
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(word), Some(tag), None) => Some(TaggedWord::new(word, tag)),
                    _ => None,
                }
            })
            .collect();
        format.apply(tagged)
    }

    /// The terminals of every tree, tagged with their preterminal labels.
    pub fn tree_lemmas(&self, format: TagFormat<'_>) -> Vec<TaggedWord> {
        let tagged = self
            .trees
            .iter()
            .flat_map(|tree| tree.pos())
            .map(|(word, tag)| TaggedWord::new(word, tag))
            .collect();
        format.apply(tagged)
    }

    pub fn pos_words(&self, format: TagFormat<'_>) -> Vec<String> {
        self.pos_lemmas(format)
            .into_iter()
            .map(|tagged| tagged.word)
            .collect()
    }

    pub fn tree_words(&self, format: TagFormat<'_>) -> Vec<String> {
        self.tree_lemmas(format)
            .into_iter()
            .map(|tagged| tagged.word)
            .collect()
    }

    /// Tree terminals without empty categories, with one trailing hyphen
    /// stripped from each word.
    pub fn regularize_tree_lemmas(&self) -> Vec<TaggedWord> {
        self.tree_lemmas(TagFormat::Treebank)
            .into_iter()
            .filter(|tagged| !EMPTY_CATEGORY_TAGS.contains(&tagged.tag.as_str()))
            .map(|tagged| TaggedWord::new(strip_trailing_hyphen(&tagged.word), tagged.tag))
            .collect()
    }

    /// POS pairs without fused tags or dash placeholders, with one trailing
    /// hyphen stripped from each word.
    pub fn regularize_pos_lemmas(&self) -> Vec<TaggedWord> {
        self.pos_lemmas(TagFormat::Treebank)
            .into_iter()
            .filter(|tagged| !NON_TREE_POS_TAGS.contains(&tagged.tag.as_str()))
            .filter(|tagged| tagged.word != DASH_PLACEHOLDER)
            .map(|tagged| TaggedWord::new(strip_trailing_hyphen(&tagged.word), tagged.tag))
            .collect()
    }

    /// True when the utterance has exactly one tree and its regularized
    /// terminals equal the regularized POS pairs.
    pub fn tree_is_perfect_match(&self) -> bool {
        self.trees.len() == 1 && self.regularize_tree_lemmas() == self.regularize_pos_lemmas()
    }
}
