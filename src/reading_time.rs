//! Estimates how long a post takes to read from the word count of its
//! [`Section`]s.

use crate::record::{Error, Result, Section};
use crate::richtext::Block;
use serde::Deserialize;
use std::num::NonZeroU32;

/// The reading speed used when none is configured.
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

/// A reading speed. Always greater than zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u32")]
pub struct WordsPerMinute(NonZeroU32);

impl WordsPerMinute {
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for WordsPerMinute {
    fn default() -> Self {
        WordsPerMinute(NonZeroU32::new(DEFAULT_WORDS_PER_MINUTE).unwrap_or(NonZeroU32::MIN))
    }
}

impl TryFrom<u32> for WordsPerMinute {
    type Error = String;

    fn try_from(words: u32) -> std::result::Result<Self, String> {
        NonZeroU32::new(words)
            .map(WordsPerMinute)
            .ok_or_else(|| "words per minute must be greater than zero".to_owned())
    }
}

/// Counts whitespace-separated words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Counts the words of every heading and every body block, across all
/// sections.
pub fn word_count(sections: &[Section]) -> usize {
    sections
        .iter()
        .map(|section| {
            section.heading.as_deref().map_or(0, count_words)
                + section
                    .body
                    .iter()
                    .map(|block: &Block| count_words(&block.as_text()))
                    .sum::<usize>()
        })
        .sum()
}

/// Estimates the reading time in whole minutes at
/// [`DEFAULT_WORDS_PER_MINUTE`]. See [`estimate_at`].
pub fn estimate(sections: &[Section]) -> u32 {
    estimate_at(sections, WordsPerMinute::default())
}

/// Estimates the reading time in whole minutes, rounding up. A post without
/// words takes 0 minutes.
pub fn estimate_at(sections: &[Section], speed: WordsPerMinute) -> u32 {
    let words = word_count(sections) as u64;
    let speed = u64::from(speed.get());
    u32::try_from((words + speed - 1) / speed).unwrap_or(u32::MAX)
}

/// Estimates the reading time of content that hasn't been deserialized yet
/// (e.g., the raw `content` field of a document). Fails with
/// [`Error::InvalidContent`] unless `content` is a sequence of sections.
pub fn estimate_value(content: serde_json::Value, speed: WordsPerMinute) -> Result<u32> {
    let sections: Vec<Section> =
        serde_json::from_value(content).map_err(Error::InvalidContent)?;
    Ok(estimate_at(&sections, speed))
}
