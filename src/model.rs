//! # Repertoire Types
//!
//! Entity schema shared by the extractor, the serializer and the scheduler.
//!
//! ```text
//! Tune
//!   ├── id: Uuid (immutable)
//!   ├── title / key / rhythm_type   (derived from notation_text)
//!   ├── notation_text               (source of truth)
//!   ├── difficulty: Difficulty (1-5, user set)
//!   ├── last_practiced / next_review: Option<DateTime<Utc>>
//!   └── tags: Vec<String> (set semantics, insertion order kept)
//!
//! PracticeSession (immutable, may outlive its tune)
//!   ├── tune_id
//!   ├── date, duration_minutes
//!   └── quality: QualityRating (1-5)
//! ```
//!
//! Derived fields are overwritten every time the notation changes, so
//! callers should go through [`Tune::set_notation`] rather than editing
//! `notation_text` directly.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ReelError;
use crate::metadata::{extract, TuneMetadata};

/// Rhythm of a tune, as named in the `R:` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum RhythmType {
    Reel,
    Jig,
    Hornpipe,
    Polka,
    Barndance,
    SlipJig,
    Slide,
    Waltz,
    Strathspey,
    ThreeTwo,
    Mazurka,
    March,
    #[default]
    Other,
}

impl RhythmType {
    pub const ALL: [RhythmType; 13] = [
        RhythmType::Reel,
        RhythmType::Jig,
        RhythmType::Hornpipe,
        RhythmType::Polka,
        RhythmType::Barndance,
        RhythmType::SlipJig,
        RhythmType::Slide,
        RhythmType::Waltz,
        RhythmType::Strathspey,
        RhythmType::ThreeTwo,
        RhythmType::Mazurka,
        RhythmType::March,
        RhythmType::Other,
    ];

    /// Map a free-form `R:` value onto the enumeration.
    /// Unknown values fall back to `Other`.
    pub fn from_abc(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "reel" => RhythmType::Reel,
            "jig" => RhythmType::Jig,
            "hornpipe" => RhythmType::Hornpipe,
            "polka" => RhythmType::Polka,
            "barndance" => RhythmType::Barndance,
            "slip jig" | "slip-jig" => RhythmType::SlipJig,
            "slide" => RhythmType::Slide,
            "waltz" => RhythmType::Waltz,
            "strathspey" => RhythmType::Strathspey,
            "three-two" => RhythmType::ThreeTwo,
            "mazurka" => RhythmType::Mazurka,
            "march" => RhythmType::March,
            _ => RhythmType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RhythmType::Reel => "reel",
            RhythmType::Jig => "jig",
            RhythmType::Hornpipe => "hornpipe",
            RhythmType::Polka => "polka",
            RhythmType::Barndance => "barndance",
            RhythmType::SlipJig => "slip jig",
            RhythmType::Slide => "slide",
            RhythmType::Waltz => "waltz",
            RhythmType::Strathspey => "strathspey",
            RhythmType::ThreeTwo => "three-two",
            RhythmType::Mazurka => "mazurka",
            RhythmType::March => "march",
            RhythmType::Other => "other",
        }
    }
}

impl fmt::Display for RhythmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RhythmType> for String {
    fn from(rhythm: RhythmType) -> Self {
        rhythm.as_str().to_string()
    }
}

impl From<String> for RhythmType {
    fn from(value: String) -> Self {
        RhythmType::from_abc(&value)
    }
}

/// How hard the player finds a tune (1 = easy, 5 = hard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub fn new(value: u8) -> Result<Self, ReelError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ReelError::InvalidDifficulty(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = ReelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.0
    }
}

/// Self-assessed quality of one practice session.
///
/// 1-2 = poor recall, 3 = adequate, 4-5 = good/excellent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct QualityRating(u8);

impl QualityRating {
    pub fn new(value: u8) -> Result<Self, ReelError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ReelError::InvalidRating(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for QualityRating {
    type Error = ReelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QualityRating> for u8 {
    fn from(rating: QualityRating) -> Self {
        rating.0
    }
}

/// A tune in the repertoire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tune {
    pub id: Uuid,
    pub title: String,
    pub rhythm_type: RhythmType,
    pub key: String,
    pub notation_text: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_practiced: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Tune {
    /// Create a never-practiced tune with a fresh id, deriving title, key
    /// and rhythm from the notation. Surrounding whitespace is not kept.
    pub fn from_notation<I, S>(notation: &str, difficulty: Difficulty, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let TuneMetadata {
            title,
            key,
            rhythm_type,
        } = extract(notation);
        let mut tune = Self {
            id: Uuid::new_v4(),
            title,
            rhythm_type,
            key,
            notation_text: notation.trim().to_string(),
            difficulty,
            last_practiced: None,
            next_review: None,
            tags: Vec::new(),
            notes: None,
        };
        tune.set_tags(tags);
        tune
    }

    /// Replace the notation and re-derive the structured fields from it.
    pub fn set_notation(&mut self, notation: &str) {
        let TuneMetadata {
            title,
            key,
            rhythm_type,
        } = extract(notation);
        self.notation_text = notation.trim().to_string();
        self.title = title;
        self.key = key;
        self.rhythm_type = rhythm_type;
    }

    /// Replace the tag set. Tags are trimmed, empty ones dropped, and
    /// duplicates removed keeping the first occurrence.
    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags.clear();
        for tag in tags {
            let tag = tag.as_ref().trim();
            if !tag.is_empty() && !self.tags.iter().any(|t| t == tag) {
                self.tags.push(tag.to_string());
            }
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Split a comma-separated tag list as typed by the user.
pub fn parse_tags(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Record of one completed practice session.
///
/// `tune_id` is a plain reference: sessions are history and are kept when
/// their tune is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSession {
    pub id: Uuid,
    pub tune_id: Uuid,
    pub date: DateTime<Utc>,
    pub duration_minutes: u32,
    pub quality: QualityRating,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PracticeSession {
    pub fn new(
        tune_id: Uuid,
        date: DateTime<Utc>,
        duration_minutes: u32,
        quality: QualityRating,
        notes: Option<&str>,
    ) -> Self {
        let notes = notes
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        Self {
            id: Uuid::new_v4(),
            tune_id,
            date,
            duration_minutes,
            quality,
            notes,
        }
    }
}
