pub mod date;
pub mod engagement;
pub mod patterns;
pub mod profile;
pub mod text;

use thiserror::Error;

use crate::domain::{ContentUnit, PostRecord, SurfaceKind, MIN_TEXT_CHARS};

pub use date::{extract_published_label, relative_age, resolve_label, strip_dates};
pub use engagement::{extract_engagement, to_numeric};
pub use profile::normalize_profile;
pub use text::extract_primary_text;

/// Why a content unit produced no post.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionMiss {
    #[error("no usable text")]
    NoText,

    #[error("text too short ({chars} chars)")]
    TooShort { chars: usize },
}

#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Turns one content unit into a candidate post.
    ///
    /// The returned record is never classified as a repost; that is decided
    /// by the collector, which sees the unit's social context.
    pub fn normalize(&self, unit: &ContentUnit) -> Result<PostRecord, ExtractionMiss> {
        let primary = extract_primary_text(unit).ok_or(ExtractionMiss::NoText)?;
        let chars = primary.chars().count();
        if chars < MIN_TEXT_CHARS {
            return Err(ExtractionMiss::TooShort { chars });
        }

        let raw = unit.text(SurfaceKind::Full).unwrap_or_default();
        Ok(PostRecord::new(
            primary,
            raw,
            extract_published_label(raw),
            extract_engagement(unit),
        ))
    }
}
