//! # Notation Metadata Extraction
//!
//! Pulls the structured fields of a tune out of the header lines of an ABC
//! block.
//!
//! ## Header Lines
//! A header line starts with a single tag letter followed by `:`; the rest
//! of the line is the value. Only three tags matter here:
//! - `T:` - title (default: empty)
//! - `K:` - key (default: `D`)
//! - `R:` - rhythm, mapped through [`RhythmType::from_abc`] (default: `other`)
//!
//! Only the first occurrence of each tag counts. Extraction never fails;
//! [`extract_strict`] is the variant bulk import uses, which rejects blocks
//! that lack one of the three headers.
//!
//! ## Example
//! ```rust
//! use reel::{extract, RhythmType};
//!
//! let meta = extract("X:1\nT:Banish Misfortune\nR:jig\nK:Dmix\n|:fed cAG|");
//! assert_eq!(meta.title, "Banish Misfortune");
//! assert_eq!(meta.key, "Dmix");
//! assert_eq!(meta.rhythm_type, RhythmType::Jig);
//! ```

use tracing::debug;

use crate::error::ReelError;
use crate::model::RhythmType;

pub const DEFAULT_KEY: &str = "D";

/// Structured fields derived from notation text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuneMetadata {
    pub title: String,
    pub key: String,
    pub rhythm_type: RhythmType,
}

/// Value of the first `<tag>:` header line, trimmed.
pub fn header_value(text: &str, tag: char) -> Option<&str> {
    text.lines().find_map(|line| {
        let mut chars = line.trim_start().chars();
        if chars.next() == Some(tag) && chars.next() == Some(':') {
            Some(chars.as_str().trim())
        } else {
            None
        }
    })
}

/// Extract title, key and rhythm, falling back to defaults for anything
/// missing.
pub fn extract(text: &str) -> TuneMetadata {
    let meta = TuneMetadata {
        title: header_value(text, 'T').unwrap_or_default().to_string(),
        key: header_value(text, 'K').unwrap_or(DEFAULT_KEY).to_string(),
        rhythm_type: header_value(text, 'R')
            .map(RhythmType::from_abc)
            .unwrap_or_default(),
    };
    debug!(
        title = %meta.title,
        key = %meta.key,
        rhythm = %meta.rhythm_type,
        "extracted tune metadata"
    );
    meta
}

/// Like [`extract`], but a missing or empty `T:`, `R:` or `K:` header is
/// an error instead of a default.
pub fn extract_strict(text: &str) -> Result<TuneMetadata, ReelError> {
    let required = |tag: char, name: &'static str| {
        header_value(text, tag)
            .filter(|value| !value.is_empty())
            .ok_or(ReelError::MissingHeader(name))
    };

    let title = required('T', "title (T:)")?;
    let rhythm = required('R', "rhythm (R:)")?;
    let key = required('K', "key (K:)")?;

    Ok(TuneMetadata {
        title: title.to_string(),
        key: key.to_string(),
        rhythm_type: RhythmType::from_abc(rhythm),
    })
}
