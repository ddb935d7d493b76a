//! # Tunebook Serialization
//!
//! Turns stored tunes back into a single ABC document, and splits a pasted
//! document into tunes for bulk import.
//!
//! ## Export
//! Every block in an exported tunebook starts with headers in the order
//! `X, T, R, K, M, L, Q, Z`. Tunes whose stored text has no headers get a
//! generated block; tunes that already carry headers pass through. The
//! leading `X:` of every block is then renumbered `X: 1`, `X: 2`, ... in
//! collection order, and blocks are joined by a blank line.
//!
//! Exporting, splitting the result and exporting again gives back the same
//! text.
//!
//! ## Example
//! ```rust
//! use reel::{export_all, split_tunebook, Difficulty, Tune};
//!
//! let d = Difficulty::default();
//! let tunes = vec![
//!     Tune::from_notation("X:7\nT:Kesh\nR:jig\nK:G\n|:GAG GAB|", d, ["jigs"]),
//!     Tune::from_notation("|:E2BE dEBE|", d, ["reels"]),
//! ];
//! let book = export_all(&tunes);
//! assert!(book.starts_with("X: 1\nT:Kesh"));
//! assert_eq!(split_tunebook(&book).len(), 2);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ReelError;
use crate::metadata::extract_strict;
use crate::model::{Difficulty, Tune};

/// Header values used when a tune has no header block of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HeaderDefaults {
    pub meter: String,
    pub unit_note_length: String,
    pub tempo: String,
    pub tool_id: String,
}

impl Default for HeaderDefaults {
    fn default() -> Self {
        Self {
            meter: "4/4".to_string(),
            unit_note_length: "1/8".to_string(),
            tempo: "120".to_string(),
            tool_id: "Reel Revision".to_string(),
        }
    }
}

/// True if the first line looks like `<uppercase letter>:`.
fn has_headers(text: &str) -> bool {
    let first_line = text.lines().next().unwrap_or("");
    let mut chars = first_line.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(c), Some(':')) if c.is_ascii_uppercase()
    )
}

/// Length of a leading `X:<whitespace>*<digits>+` prefix, if present.
fn reference_number_len(text: &str) -> Option<usize> {
    let rest = text.strip_prefix("X:")?;
    let after_space = rest.trim_start();
    let digits = after_space
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    Some(text.len() - after_space.len() + digits)
}

fn renumber(block: &str, number: usize) -> String {
    match reference_number_len(block) {
        Some(len) => format!("X: {}{}", number, &block[len..]),
        None => block.to_string(),
    }
}

/// Notation of `tune` with a full header block, using the stock defaults.
pub fn ensure_headers(tune: &Tune) -> String {
    ensure_headers_with(tune, &HeaderDefaults::default())
}

pub fn ensure_headers_with(tune: &Tune, defaults: &HeaderDefaults) -> String {
    if has_headers(&tune.notation_text) {
        return tune.notation_text.clone();
    }

    let mut lines = vec![
        "X: 1".to_string(),
        format!("T:{}", tune.title),
        format!("R:{}", tune.rhythm_type),
        format!("K:{}", tune.key),
        format!("M:{}", defaults.meter),
        format!("L:{}", defaults.unit_note_length),
        format!("Q:{}", defaults.tempo),
        format!("Z:{}", defaults.tool_id),
    ];
    // An empty body would leave a trailing newline that splitting drops
    if !tune.notation_text.is_empty() {
        lines.push(tune.notation_text.clone());
    }
    lines.join("\n")
}

/// Serialize a whole collection into one tunebook document.
pub fn export_all(tunes: &[Tune]) -> String {
    export_all_with(tunes, &HeaderDefaults::default())
}

pub fn export_all_with(tunes: &[Tune], defaults: &HeaderDefaults) -> String {
    debug!(count = tunes.len(), "exporting tunebook");
    tunes
        .iter()
        .enumerate()
        .map(|(i, tune)| renumber(&ensure_headers_with(tune, defaults), i + 1))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Split a multi-tune document before every `X:<number>` line.
///
/// Blocks are trimmed; anything before the first `X:` line is kept as its
/// own block when it is not blank.
pub fn split_tunebook(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();

    for line in text.split_inclusive('\n') {
        if reference_number_len(line).is_some() && !current.trim().is_empty() {
            blocks.push(current.trim().to_string());
            current.clear();
        }
        current.push_str(line);
    }
    if !current.trim().is_empty() {
        blocks.push(current.trim().to_string());
    }

    blocks
}

/// Parse a pasted tunebook into new tunes.
///
/// Unlike single-tune editing, every block must carry `T:`, `R:` and `K:`
/// headers. The first block that doesn't fails the whole import.
pub fn import_tunebook(text: &str) -> Result<Vec<Tune>, ReelError> {
    split_tunebook(text)
        .iter()
        .enumerate()
        .map(|(i, block)| {
            extract_strict(block).map_err(|e| {
                warn!(block = i + 1, error = %e, "rejecting import");
                ReelError::Import {
                    block: i + 1,
                    source: Box::new(e),
                }
            })?;
            Ok(Tune::from_notation(block, Difficulty::default(), Vec::<String>::new()))
        })
        .collect()
}
