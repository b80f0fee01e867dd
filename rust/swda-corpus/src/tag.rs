//! Reduction of SWBD-DAMSL dialog act tags to the coarse tag set of the
//! Coders' Manual.
//!
//! The reduction is a fixed, ordered table:
//!
//! 1. `qy^d`, `qw^d` and `b^m` are kept exactly as written.
//! 2. `nn^e` becomes `ng` and `ny^e` becomes `na`.
//! 3. Any other tag loses its `^` suffix and its `(`, `)`, `@` and `*`
//!    characters, and is then mapped through [`TAG_GROUPS`].

use std::sync::LazyLock;

use regex::Regex;

/// Tags that survive the reduction untouched.
pub const PRESERVED_TAGS: [&str; 3] = ["qy^d", "qw^d", "b^m"];

/// Whole-tag substitutions applied before suffix stripping.
pub const TAG_SUBSTITUTIONS: [(&str, &str); 2] = [("nn^e", "ng"), ("ny^e", "na")];

/// Many-to-one grouping of suffix-stripped tags.
pub const TAG_GROUPS: [(&[&str], &str); 7] = [
    (&["qr", "qy"], "qy"),
    (&["fe", "ba"], "ba"),
    (&["oo", "co", "cc"], "oo_co_cc"),
    (&["fx", "sv"], "sv"),
    (&["aap", "am"], "aap_am"),
    (&["arp", "nd"], "arp_nd"),
    (&["fo", "o", "fw", "\"", "by", "bc"], "fo_o_fw_\"_by_bc"),
];

const STRIPPED_CHARACTERS: [char; 4] = ['(', ')', '@', '*'];

static TAG_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[,;]\s*").expect("valid tag separator pattern"));

static TAG_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)\^.*").expect("valid tag suffix pattern"));

/// Reduce a single tag according to the table above.
pub fn reduce_tag(tag: &str) -> String {
    if PRESERVED_TAGS.contains(&tag) {
        return tag.to_string();
    }
    if let Some((_, replacement)) = TAG_SUBSTITUTIONS.iter().find(|(from, _)| *from == tag) {
        return replacement.to_string();
    }

    let stripped = TAG_SUFFIX.replace(tag, "$1").replace(STRIPPED_CHARACTERS, "");
    TAG_GROUPS
        .iter()
        .find(|(members, _)| members.contains(&stripped.as_str()))
        .map(|(_, group)| group.to_string())
        .unwrap_or(stripped)
}

/// The coarse tag for a (possibly multi-tag) act tag field. Tags joined by
/// `,` or `;` are each reduced, and the first is returned.
pub fn damsl_act_tag(act_tag: &str) -> String {
    let first = TAG_SEPARATOR.split(act_tag).next().unwrap_or(act_tag);
    reduce_tag(first)
}
