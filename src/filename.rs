//! Filenames for generated images.
//!
//! Format: `ai-{style}-{YYYY-MM-DD}-{HH-MM-SS}-{first three words}-{random id}.png`.
//! Names sort by time within a style and the random id keeps concurrent
//! requests from colliding in practice.

use chrono::{DateTime, Utc};
use rand::distr::Alphanumeric;
use rand::{Rng, RngExt};

use crate::constants::{DEFAULT_STYLE, IMAGE_EXTENSION};

/// Length of the random suffix.
pub const RANDOM_ID_LENGTH: usize = 6;

/// How many prompt words go into the name.
pub const PROMPT_WORDS: usize = 3;

/// Builds the filename for an image rendered at `now`.
pub fn make_filename<R: Rng + ?Sized>(
    prompt: &str,
    style: &str,
    now: DateTime<Utc>,
    rng: &mut R,
) -> String {
    format!(
        "ai-{}-{}-{}-{}.{}",
        style_slug(style),
        now.format("%Y-%m-%d-%H-%M-%S"),
        prompt_slug(prompt),
        random_id(rng),
        IMAGE_EXTENSION
    )
}

/// First few prompt words, lowercased and hyphen-joined. Anything that isn't
/// an ASCII letter or digit is dropped so the result is always a safe path
/// component.
pub fn prompt_slug(prompt: &str) -> String {
    let words: Vec<String> = prompt
        .split_whitespace()
        .take(PROMPT_WORDS)
        .map(|word| {
            word.chars()
                .filter(char::is_ascii_alphanumeric)
                .map(|c| c.to_ascii_lowercase())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect();
    if words.is_empty() {
        "image".to_string()
    } else {
        words.join("-")
    }
}

/// Style name reduced to lowercase ASCII letters, digits and hyphens.
pub fn style_slug(style: &str) -> String {
    let slug: String = style
        .trim()
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        DEFAULT_STYLE.to_string()
    } else {
        slug.to_string()
    }
}

fn random_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(RANDOM_ID_LENGTH)
        .map(|byte| char::from(byte.to_ascii_lowercase()))
        .collect()
}
