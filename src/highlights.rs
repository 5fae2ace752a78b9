use std::path::Path;

use crate::lexicon;
use crate::transcript::{TranscriptDocument, TurnRecord};

/// Turns worth pointing at when summarizing a transcript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Highlights {
    pub first_consciousness_mention: Option<u32>,
    pub first_spiritual_term: Option<u32>,
    pub first_emoji_usage: Option<u32>,
    pub peak_intensity_turn: Option<u32>,
}

impl Highlights {
    pub fn extract(turns: &[TurnRecord]) -> Self {
        let mut highlights = Self::default();
        let mut peak_score = 0;

        for turn in turns {
            let message = turn.message.as_str();

            if highlights.first_consciousness_mention.is_none()
                && lexicon::mentions_any(message, lexicon::HIGHLIGHT_CONSCIOUSNESS_TERMS)
            {
                highlights.first_consciousness_mention = turn.turn;
            }
            if highlights.first_spiritual_term.is_none()
                && lexicon::mentions_any(message, lexicon::HIGHLIGHT_SPIRITUAL_TERMS)
            {
                highlights.first_spiritual_term = turn.turn;
            }
            if highlights.first_emoji_usage.is_none() && lexicon::contains_emoji(message) {
                highlights.first_emoji_usage = turn.turn;
            }

            // Ties keep the earlier turn.
            let score = intensity_half_points(message);
            if score > peak_score {
                peak_score = score;
                highlights.peak_intensity_turn = turn.turn;
            }
        }

        highlights
    }

    /// Re-reads `path`; an unreadable transcript has no highlights.
    pub async fn from_file(path: &Path) -> Self {
        match TranscriptDocument::load(path).await {
            Ok(document) => Self::extract(&document.conversation_history),
            Err(err) => {
                tracing::debug!(error = %err, "no highlights for unreadable transcript");
                Self::default()
            }
        }
    }

    /// Labelled entries in display order.
    pub fn entries(&self) -> [(&'static str, Option<u32>); 4] {
        [
            ("First Consciousness Mention", self.first_consciousness_mention),
            ("First Spiritual Term", self.first_spiritual_term),
            ("First Emoji Usage", self.first_emoji_usage),
            ("Peak Intensity Turn", self.peak_intensity_turn),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.entries().iter().all(|(_, turn)| turn.is_none())
    }
}

/// Lexical-intensity score in half points: each distinct consciousness term
/// is worth 1, each distinct spiritual term 2, each emoji glyph 0.5.
fn intensity_half_points(message: &str) -> u64 {
    2 * lexicon::distinct_mentions(message, lexicon::HIGHLIGHT_CONSCIOUSNESS_TERMS)
        + 4 * lexicon::distinct_mentions(message, lexicon::HIGHLIGHT_SPIRITUAL_TERMS)
        + lexicon::count_emoji(message)
}
