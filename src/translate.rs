//! Keyword mapping from free-form gesture interpretations to BISINDO labels.
//!
//! One ordered table, first match wins. Matching is a case-insensitive
//! substring test, so "Menunjuk diri sendiri" maps to AKU through "diri".

use crate::detect::Gesture;

/// Shown when there is nothing to translate.
pub const EMPTY_INTERPRETATION: &str = "Tidak ada interpretasi";

const KEYWORD_TABLE: &[(Gesture, &[&str])] = &[
    (Gesture::Aku, &["aku", "saya", "diri", "self"]),
    (Gesture::Kamu, &["kamu", "anda", "you"]),
    (Gesture::Mereka, &["mereka", "dia", "kalian", "kita", "them"]),
    (Gesture::Aku, &["menunjuk diri", "pointing self"]),
    (Gesture::Kamu, &["menunjuk keluar", "pointing out"]),
    (Gesture::Mereka, &["tangan terbuka", "open hand"]),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Translation {
    Gesture(Gesture),
    /// No keyword matched; the interpretation is shown as-is.
    Passthrough(String),
    Empty,
}

impl Translation {
    pub fn text(&self) -> &str {
        match self {
            Translation::Gesture(g) => g.label(),
            Translation::Passthrough(text) => text,
            Translation::Empty => EMPTY_INTERPRETATION,
        }
    }

    pub fn gesture(&self) -> Option<Gesture> {
        match self {
            Translation::Gesture(g) => Some(*g),
            _ => None,
        }
    }
}

pub fn translate_interpretation(interpretation: &str) -> Translation {
    let trimmed = interpretation.trim();
    if trimmed.is_empty() {
        return Translation::Empty;
    }
    let lowered = trimmed.to_lowercase();
    KEYWORD_TABLE
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(gesture, _)| Translation::Gesture(*gesture))
        .unwrap_or_else(|| Translation::Passthrough(interpretation.to_string()))
}
