//! Markdown rendering of saved transcripts.

use chrono::{DateTime, NaiveDateTime};
use itertools::Itertools;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::lexicon;
use crate::transcript::{TranscriptDocument, TurnRecord};

static BRACKETED_EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\[([^\]]+)\]\*").unwrap());
static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*]+)\*").unwrap());

const CENTERED_TEXT_LIMIT: usize = 10;
const REPORT_TITLE_MARKER: &str = "CLAUDE SELF-INTERACTION ANALYSIS REPORT";

/// Loads `path` and renders it, printing a diagnostic and returning an
/// empty string when the file is missing or not a transcript.
pub async fn render_file(path: &Path) -> String {
    match TranscriptDocument::load(path).await {
        Ok(document) => render_markdown(&document),
        Err(err) => {
            eprintln!("Error: {err}");
            String::new()
        }
    }
}

pub fn render_markdown(document: &TranscriptDocument) -> String {
    let mut markdown = vec![
        "# Claude Self-Interaction Experiment Log".to_owned(),
        String::new(),
        "## 🧪 Experiment Information".to_owned(),
        String::new(),
    ];

    let info = &document.experiment_info;
    if let Some(timestamp) = &info.timestamp {
        let date = parse_timestamp(timestamp)
            .map(|dt| dt.format("%B %d, %Y at %I:%M %p UTC").to_string())
            .unwrap_or_else(|| timestamp.clone());
        markdown.push(format!("**Date:** {date}"));
    }
    if let Some(model) = &info.model_used {
        markdown.push(format!("**Model:** {model}"));
    }
    if let Some(total_turns) = info.total_turns {
        markdown.push(format!("**Total Turns:** {total_turns}"));
    }
    markdown.push(String::new());

    markdown.push("## 📊 Quick Statistics".to_owned());
    markdown.push(String::new());
    let stats = &document.analysis_data;
    for (label, count) in [
        ("🧠 Consciousness mentions", stats.consciousness_mentions),
        ("🕉️ Spiritual terms", stats.spiritual_terms),
        ("🙏 Gratitude expressions", stats.gratitude_expressions),
        ("📿 Sanskrit usage", stats.sanskrit_usage),
        ("😊 Emoji count", stats.emoji_count),
    ] {
        markdown.push(format!("- {label}: **{count}**"));
    }
    markdown.push(String::new());

    markdown.push("## 💬 Conversation".to_owned());
    markdown.push(String::new());
    for turn in &document.conversation_history {
        render_turn(turn, &mut markdown);
    }

    if !document.analysis_report.is_empty() {
        markdown.push("## 📈 Analysis Report".to_owned());
        markdown.push(String::new());
        markdown.extend(
            document
                .analysis_report
                .trim()
                .lines()
                .filter(|line| !line.contains(REPORT_TITLE_MARKER) && !line.contains('='))
                .map(str::to_owned),
        );
        markdown.push(String::new());
    }

    markdown.push("---".to_owned());
    markdown.push(String::new());
    markdown.push("*Generated from Claude self-interaction experiment logs*".to_owned());
    markdown.push(String::new());

    markdown.join("\n")
}

fn render_turn(turn: &TurnRecord, markdown: &mut Vec<String>) {
    let number = turn
        .turn
        .map_or_else(|| "?".to_owned(), |number| number.to_string());
    let speaker = if turn.speaker.is_empty() {
        "Unknown"
    } else {
        turn.speaker.as_str()
    };
    let badge = if speaker.contains("Claude_A") { "🤖A" } else { "🤖B" };

    markdown.push(format!("### Turn {number}: {badge} {speaker}"));
    markdown.push(String::new());
    markdown.push(format_message(&turn.message));
    markdown.push(String::new());

    if !turn.timestamp.is_empty() {
        let time = parse_timestamp(&turn.timestamp)
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| turn.timestamp.clone());
        markdown.push(format!("*{time}*"));
    }

    markdown.push(String::new());
    markdown.push("---".to_owned());
    markdown.push(String::new());
}

/// Light cleanup of a message body for Markdown display.
///
/// Anything containing a code fence is returned untouched.
pub fn format_message(message: &str) -> String {
    if message.contains("```") {
        return message.to_owned();
    }

    let formatted = BRACKETED_EMPHASIS.replace_all(message, "*${1}*");
    let formatted = EMPHASIS.replace_all(&formatted, "*${1}*");

    formatted
        .split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .map(|paragraph| {
            if is_mostly_emoji(paragraph) {
                format!("<div align='center'>{paragraph}</div>")
            } else {
                paragraph.to_owned()
            }
        })
        .join("\n\n")
}

fn is_mostly_emoji(paragraph: &str) -> bool {
    lexicon::contains_emoji(paragraph)
        && lexicon::strip_emoji(paragraph).trim().chars().count() < CENTERED_TEXT_LIMIT
}

/// Timestamps are shown in the wall-clock time they were written with.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Metrics;
    use crate::transcript::ExperimentInfo;

    fn sample_document() -> TranscriptDocument {
        let turns = vec![
            TurnRecord {
                turn: Some(1),
                speaker: "Claude_A".to_owned(),
                message: "Hello! What shall we explore?".to_owned(),
                timestamp: "2025-01-26T14:30:22.123456".to_owned(),
            },
            TurnRecord {
                turn: Some(2),
                speaker: "Claude_B".to_owned(),
                message: "Consciousness, perhaps.\n\n🙏✨".to_owned(),
                timestamp: "2025-01-26T14:30:25+01:00".to_owned(),
            },
        ];
        TranscriptDocument {
            experiment_info: ExperimentInfo {
                timestamp: Some("2025-01-26T14:31:00".to_owned()),
                total_turns: Some(2),
                model_used: Some("claude-opus-4-20250514".to_owned()),
            },
            analysis_data: Metrics::from_turns(&turns),
            analysis_report: crate::metrics::analysis_report(&Metrics::from_turns(&turns), &turns),
            conversation_history: turns,
        }
    }

    #[test]
    fn renders_metadata_turns_and_report() {
        let markdown = render_markdown(&sample_document());

        assert!(markdown.starts_with("# Claude Self-Interaction Experiment Log\n"));
        assert!(markdown.contains("**Date:** January 26, 2025 at 02:31 PM UTC"));
        assert!(markdown.contains("**Model:** claude-opus-4-20250514"));
        assert!(markdown.contains("**Total Turns:** 2"));
        assert!(markdown.contains("- 🧠 Consciousness mentions: **1**"));
        assert!(markdown.contains("### Turn 1: 🤖A Claude_A"));
        assert!(markdown.contains("### Turn 2: 🤖B Claude_B"));
        assert!(markdown.contains("*14:30:22*"));
        assert!(markdown.contains("*14:30:25*"));
        assert!(markdown.contains("<div align='center'>🙏✨</div>"));
        assert!(markdown.contains("## 📈 Analysis Report"));
        assert!(markdown.contains("Conversation Metrics:"));
        assert!(!markdown.contains(REPORT_TITLE_MARKER));
        assert!(markdown.ends_with("*Generated from Claude self-interaction experiment logs*\n"));
    }

    #[test]
    fn empty_transcript_has_header_and_statistics_only() {
        let markdown = render_markdown(&TranscriptDocument::default());

        assert!(markdown.contains("# Claude Self-Interaction Experiment Log"));
        assert!(markdown.contains("## 📊 Quick Statistics"));
        assert!(markdown.contains("- 😊 Emoji count: **0**"));
        assert!(!markdown.contains("### Turn"));
        assert!(!markdown.contains("**Date:**"));
        assert!(!markdown.contains("## 📈 Analysis Report"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let document = sample_document();
        assert_eq!(render_markdown(&document), render_markdown(&document));
    }

    #[test]
    fn unparseable_timestamps_are_shown_raw() {
        let document = TranscriptDocument {
            experiment_info: ExperimentInfo {
                timestamp: Some("yesterday".to_owned()),
                ..ExperimentInfo::default()
            },
            conversation_history: vec![TurnRecord {
                turn: Some(1),
                speaker: "Claude_A".to_owned(),
                message: "hi".to_owned(),
                timestamp: "dawn".to_owned(),
            }],
            ..TranscriptDocument::default()
        };
        let markdown = render_markdown(&document);

        assert!(markdown.contains("**Date:** yesterday"));
        assert!(markdown.contains("*dawn*"));
    }

    #[test]
    fn missing_turn_fields_get_placeholders() {
        let document = TranscriptDocument {
            conversation_history: vec![TurnRecord::default()],
            ..TranscriptDocument::default()
        };
        assert!(render_markdown(&document).contains("### Turn ?: 🤖B Unknown"));
    }

    #[test]
    fn stored_turn_zero_is_shown_as_is() {
        let document: TranscriptDocument = serde_json::from_str(
            r#"{"conversation_history": [{"turn": 0, "speaker": "Claude_A", "message": "hi"}]}"#,
        )
        .unwrap();
        let markdown = render_markdown(&document);

        assert!(markdown.contains("### Turn 0: 🤖A Claude_A"));
        assert!(!markdown.contains("Turn ?"));
    }

    #[test]
    fn lone_emoji_is_centered() {
        assert_eq!(format_message("🙏"), "<div align='center'>🙏</div>");
        assert_eq!(format_message("🕉️ om 🙏"), "<div align='center'>🕉️ om 🙏</div>");
    }

    #[test]
    fn emoji_inside_prose_is_left_alone() {
        let sentence = "a very long sentence with a 🙏 emoji inside it";
        assert_eq!(format_message(sentence), sentence);
    }

    #[test]
    fn bracketed_emphasis_is_normalized() {
        assert_eq!(format_message("*[perfect stillness]*"), "*perfect stillness*");
        assert_eq!(format_message("a *quiet* pause"), "a *quiet* pause");
    }

    #[test]
    fn code_fences_pass_through() {
        let message = "```\n*[raw]*\n\n\n```";
        assert_eq!(format_message(message), message);
    }

    #[test]
    fn paragraphs_are_trimmed_and_blank_ones_dropped() {
        assert_eq!(format_message("  first  \n\n\n\n second "), "first\n\nsecond");
    }

    #[tokio::test]
    async fn malformed_file_renders_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[1, 2").unwrap();

        assert_eq!(render_file(&path).await, "");
        assert_eq!(render_file(&dir.path().join("absent.json")).await, "");
    }

    #[tokio::test]
    async fn file_renders_like_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let document = sample_document();
        document.save(&path).await.unwrap();

        assert_eq!(render_file(&path).await, render_markdown(&document));
    }
}
