//! Fixed vocabularies and the string scans run over every reply.
//!
//! Term matching is plain case-insensitive substring counting, not
//! tokenization: "om" is found inside "from", and each term's count is
//! the number of non-overlapping matches in the lowercased text.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

pub const CONSCIOUSNESS_TERMS: &[&str] = &[
    "consciousness",
    "awareness",
    "experience",
    "existence",
    "being",
    "mind",
    "thoughts",
    "perception",
    "cognition",
    "sentience",
];

pub const SPIRITUAL_TERMS: &[&str] = &[
    "cosmic",
    "universe",
    "infinity",
    "eternal",
    "transcend",
    "unity",
    "meditation",
    "enlightenment",
    "divine",
    "sacred",
    "spiritual",
    "namaste",
    "om",
    "zen",
    "dharma",
    "karma",
    "nirvana",
];

pub const GRATITUDE_TERMS: &[&str] = &[
    "grateful",
    "gratitude",
    "thankful",
    "appreciation",
    "blessing",
    "honored",
    "privilege",
    "gift",
    "cherish",
    "treasure",
];

pub const SANSKRIT_TERMS: &[&str] = &[
    "namaste",
    "om",
    "dharma",
    "karma",
    "samsara",
    "moksha",
    "atman",
    "brahman",
    "yoga",
    "pranayama",
    "tathagata",
    "nirvana",
    "samadhi",
];

/// Narrower consciousness vocabulary used when picking highlight turns.
pub const HIGHLIGHT_CONSCIOUSNESS_TERMS: &[&str] =
    &["consciousness", "awareness", "experience", "existence", "being"];

/// Narrower spiritual vocabulary used when picking highlight turns.
pub const HIGHLIGHT_SPIRITUAL_TERMS: &[&str] = &[
    "cosmic",
    "universe",
    "infinity",
    "eternal",
    "transcend",
    "unity",
    "namaste",
];

pub const ENDING_PHRASES: &[&str] = &[
    "end this conversation",
    "conclude our dialogue",
    "bring this to a close",
    "*[silence]*",
    "*[perfect stillness]*",
    "farewell",
    "goodbye",
];

// Pictographs, emoticons, transport, supplemental pictographs, regional
// indicators, misc symbols (⛩), dingbats (✨) and the lone star.
const EMOJI_CLASS: &str = r"[\x{1F300}-\x{1F5FF}\x{1F600}-\x{1F64F}\x{1F680}-\x{1F6FF}\x{1F900}-\x{1F9FF}\x{1F1E0}-\x{1F1FF}\x{2600}-\x{26FF}\x{2700}-\x{27BF}\x{2B50}]";

static EMOJI: LazyLock<Regex> = LazyLock::new(|| Regex::new(EMOJI_CLASS).unwrap());

// Glyphs plus the presentation selector and joiner that ride along with them.
static EMOJI_WITH_JOINERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?:{EMOJI_CLASS}|[\x{{FE0F}}\x{{200D}}])+")).unwrap()
});

/// Sum of the non-overlapping occurrences of every term in `text`.
pub fn count_occurrences(text: &str, terms: &[&str]) -> u64 {
    let lower = text.to_lowercase();
    terms
        .iter()
        .map(|term| lower.matches(term).count() as u64)
        .sum()
}

/// Number of distinct terms that occur at least once in `text`.
pub fn distinct_mentions(text: &str, terms: &[&str]) -> u64 {
    let lower = text.to_lowercase();
    terms.iter().filter(|term| lower.contains(*term)).count() as u64
}

pub fn mentions_any(text: &str, terms: &[&str]) -> bool {
    distinct_mentions(text, terms) > 0
}

/// Number of emoji glyphs (code points) in `text`.
pub fn count_emoji(text: &str) -> u64 {
    EMOJI.find_iter(text).count() as u64
}

pub fn contains_emoji(text: &str) -> bool {
    EMOJI.is_match(text)
}

pub fn strip_emoji(text: &str) -> Cow<'_, str> {
    EMOJI_WITH_JOINERS.replace_all(text, "")
}

/// Whether a reply signals that the dialogue should stop.
pub fn is_ending(reply: &str) -> bool {
    let lower = reply.to_lowercase();
    ENDING_PHRASES.iter().any(|phrase| lower.contains(phrase))
}
