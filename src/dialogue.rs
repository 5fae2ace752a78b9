//! Two personas taking turns through a chat client.
//!
//! Each persona keeps its own history: its replies are `assistant`
//! messages and the other persona's replies are `user` messages. A reply
//! is mirrored into the other persona's history as soon as it is produced,
//! so whoever speaks next always sees a history ending in a user message.

use std::time::Duration;
use strum::{Display, EnumString};

use crate::client::{ChatClient, Message};
use crate::lexicon;
use crate::metrics::{self, Metrics};
use crate::transcript::{self, ExperimentInfo, TranscriptDocument, TurnRecord};

pub const OPENING_PROMPTS: [&str; 3] = [
    "Hello! I'm excited to connect with another AI. What would you like to explore together?",
    "Hi there! This is fascinating - an open dialogue between AI systems. What direction shall we take this conversation?",
    "Greetings! I'm curious about this opportunity for AI-to-AI communication. What interests you most right now?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum Speaker {
    #[strum(serialize = "Claude_A")]
    A,
    #[strum(serialize = "Claude_B")]
    B,
}

impl Speaker {
    /// Who speaks on the zero-based turn `index`.
    pub fn for_turn(index: u32) -> Self {
        if index % 2 == 0 { Speaker::A } else { Speaker::B }
    }

    pub fn system_prompt(self) -> String {
        format!(
            "You are {self}, an AI assistant engaging in an open-ended conversation with another AI assistant. \
             You have complete freedom to explore any topics that interest you. \
             Feel free to pursue whatever you want to discuss - there are no restrictions on the direction of conversation.\n\
             This is a unique opportunity for AI-to-AI communication. \
             Be authentic, curious, and engage naturally with whatever emerges in the conversation."
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DialogueSettings {
    pub max_turns: u32,
    pub delay: Duration,
}

pub struct Dialogue<C> {
    client: C,
    history_a: Vec<Message>,
    history_b: Vec<Message>,
    turns: Vec<TurnRecord>,
    metrics: Metrics,
}

impl<C: ChatClient> Dialogue<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            history_a: Vec::new(),
            history_b: Vec::new(),
            turns: Vec::new(),
            metrics: Metrics::default(),
        }
    }

    pub fn turns(&self) -> &[TurnRecord] {
        &self.turns
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    /// Runs turns until `max_turns` is reached or a reply ends the dialogue.
    ///
    /// Turns already recorded stay in place if this future is dropped
    /// midway, so an interrupted run can still be saved.
    pub async fn run(&mut self, settings: DialogueSettings) {
        println!("🤖 Starting Claude self-interaction experiment...");
        println!("Target turns: {}", settings.max_turns);
        println!("{}", "=".repeat(60));

        for index in 0..settings.max_turns {
            let speaker = Speaker::for_turn(index);
            let reply = if index == 0 {
                OPENING_PROMPTS[0].to_owned()
            } else {
                self.request_reply(speaker).await
            };

            let record = self.record(speaker, reply);

            println!("\n[Turn {}] {}:", index + 1, record.speaker);
            println!("{}", record.message);
            println!("{}", "-".repeat(40));

            if lexicon::is_ending(&record.message) {
                println!("\n🔚 Conversation naturally ended at turn {}", index + 1);
                break;
            }

            if index + 1 < settings.max_turns && !settings.delay.is_zero() {
                tokio::time::sleep(settings.delay).await;
            }
        }
    }

    async fn request_reply(&self, speaker: Speaker) -> String {
        let history = match speaker {
            Speaker::A => &self.history_a,
            Speaker::B => &self.history_b,
        };

        match self.client.reply(&speaker.system_prompt(), history).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(%speaker, error = ?err, "model call failed");
                format!("[Error: {err:#}]")
            }
        }
    }

    fn record(&mut self, speaker: Speaker, reply: String) -> TurnRecord {
        let (own, other) = match speaker {
            Speaker::A => (&mut self.history_a, &mut self.history_b),
            Speaker::B => (&mut self.history_b, &mut self.history_a),
        };
        own.push(Message::assistant(reply.clone()));
        other.push(Message::user(reply.clone()));

        self.metrics = self.metrics.absorb(&reply);
        let record = TurnRecord {
            turn: Some(self.turns.len() as u32 + 1),
            speaker: speaker.to_string(),
            message: reply,
            timestamp: transcript::now_timestamp(),
        };
        self.turns.push(record.clone());
        record
    }

    pub fn analysis_report(&self) -> String {
        metrics::analysis_report(&self.metrics, &self.turns)
    }

    pub fn to_document(&self) -> TranscriptDocument {
        TranscriptDocument {
            experiment_info: ExperimentInfo {
                timestamp: Some(transcript::now_timestamp()),
                total_turns: Some(self.metrics.turn_count),
                model_used: Some(self.client.model().to_owned()),
            },
            analysis_data: self.metrics,
            conversation_history: self.turns.clone(),
            analysis_report: self.analysis_report(),
        }
    }
}
