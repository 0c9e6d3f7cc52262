use crate::domain::{ContentUnit, SurfaceKind};

/// Words that mark a fragment or line as UI chrome rather than post text.
pub const STOPLIST: [&str; 7] = ["follow", "like", "retweet", "reply", "view", "share", "more"];

/// Fragments and lines must be longer than this to count as post text.
const MIN_FRAGMENT_CHARS: usize = 10;

/// A named way of reading primary text off a unit.
pub struct TextStrategy {
    pub name: &'static str,
    pub extract: fn(&ContentUnit) -> Option<String>,
}

/// Strategies in priority order; the first non-blank result wins.
pub static TEXT_STRATEGIES: [TextStrategy; 4] = [
    TextStrategy {
        name: "body_text",
        extract: body_text,
    },
    TextStrategy {
        name: "localized_text",
        extract: localized_text,
    },
    TextStrategy {
        name: "inline_fragments",
        extract: inline_fragments,
    },
    TextStrategy {
        name: "text_lines",
        extract: text_lines,
    },
];

fn body_text(unit: &ContentUnit) -> Option<String> {
    unit.text(SurfaceKind::Body).map(str::to_string)
}

fn localized_text(unit: &ContentUnit) -> Option<String> {
    unit.text(SurfaceKind::Localized).map(str::to_string)
}

fn looks_like_post_text(candidate: &str) -> bool {
    if candidate.chars().count() <= MIN_FRAGMENT_CHARS {
        return false;
    }
    let lowered = candidate.to_lowercase();
    !STOPLIST.iter().any(|word| lowered.contains(word))
}

fn inline_fragments(unit: &ContentUnit) -> Option<String> {
    unit.fragments()
        .find(|fragment| looks_like_post_text(fragment))
        .map(str::to_string)
}

fn text_lines(unit: &ContentUnit) -> Option<String> {
    unit.text(SurfaceKind::Full)?
        .lines()
        .map(str::trim)
        .find(|line| !line.contains('·') && !line.contains('@') && looks_like_post_text(line))
        .map(str::to_string)
}

/// Runs the strategy table and returns the first non-blank candidate, trimmed.
///
/// Length is not checked here; see [`crate::normalizer::Normalizer::normalize`].
pub fn extract_primary_text(unit: &ContentUnit) -> Option<String> {
    TEXT_STRATEGIES.iter().find_map(|strategy| {
        (strategy.extract)(unit)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .inspect(|_| tracing::trace!(strategy = strategy.name, "primary text found"))
    })
}
