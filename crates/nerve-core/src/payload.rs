//! Outbound message payloads and how listings are split across them.

use serde::{Deserialize, Serialize};

use crate::types::{Entry, Partition};

pub const TRUTH_COLOR: u32 = 0x3498DB;
pub const DARE_COLOR: u32 = 0xE74C3C;
pub const LISTING_COLOR: u32 = 0x95A5A6;

/// Items per listing card.
pub const LISTING_CHUNK: usize = 10;

/// Longest single item shown in a listing; keeps a full card under the
/// per-message ceiling.
pub const MAX_LISTED_CHARS: usize = 350;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    pub description: String,
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outbound {
    Text { text: String },
    Card(Card),
}

impl Outbound {
    pub fn text(text: impl Into<String>) -> Self {
        Outbound::Text { text: text.into() }
    }

    pub fn card(title: impl Into<String>, description: impl Into<String>, color: u32) -> Self {
        Outbound::Card(Card {
            title: title.into(),
            description: description.into(),
            color,
        })
    }

    /// Card for a single drawn entry.
    pub fn entry(partition: Partition, content: &str) -> Self {
        match partition {
            Partition::Truths => Outbound::card("Truth", content, TRUTH_COLOR),
            Partition::Dares => Outbound::card("Dare", content, DARE_COLOR),
        }
    }

    /// Plain-text rendering for transports without rich embeds.
    pub fn render_plain(&self) -> String {
        match self {
            Outbound::Text { text } => text.clone(),
            Outbound::Card(card) => format!("[{}]\n{}", card.title, card.description),
        }
    }
}

/// Split `entries` into numbered cards of [`LISTING_CHUNK`] items.
///
/// Numbering continues across cards. An empty slice yields no cards.
pub fn chunk_listing(label: &str, entries: &[Entry]) -> Vec<Outbound> {
    let total = entries.len();
    entries
        .chunks(LISTING_CHUNK)
        .enumerate()
        .map(|(i, chunk)| {
            let first = i * LISTING_CHUNK + 1;
            let last = first + chunk.len() - 1;
            let description = chunk
                .iter()
                .enumerate()
                .map(|(j, e)| format!("{}. {}", first + j, ellipsize(&e.content, MAX_LISTED_CHARS)))
                .collect::<Vec<_>>()
                .join("\n");
            Outbound::card(
                format!("{label} ({first}–{last} of {total})"),
                description,
                LISTING_COLOR,
            )
        })
        .collect()
}

fn ellipsize(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}
