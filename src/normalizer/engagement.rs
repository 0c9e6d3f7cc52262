use crate::domain::{ContentUnit, ControlKind, Engagement, SurfaceKind};
use crate::normalizer::date::strip_dates;
use crate::normalizer::patterns::NUMERAL;

const MAGNITUDES: [(char, f64); 4] = [
    ('K', 1e3),
    ('M', 1e6),
    ('B', 1e9),
    ('万', 1e4),
];

/// Numeric value of a rendered count such as `"1.2K"`, `"3万"` or `"1,234"`.
///
/// Anything unparseable is worth 0.
pub fn to_numeric(token: &str) -> f64 {
    let cleaned: String = token.trim().chars().filter(|c| *c != ',').collect();
    let (number, factor) = match cleaned.chars().last() {
        Some(last) => match MAGNITUDES.iter().find(|(suffix, _)| *suffix == last) {
            Some((_, factor)) => (&cleaned[..cleaned.len() - last.len_utf8()], *factor),
            None => (cleaned.as_str(), 1.0),
        },
        None => return 0.0,
    };
    number.parse::<f64>().map(|n| n * factor).unwrap_or(0.0)
}

fn has_magnitude(token: &str) -> bool {
    token
        .chars()
        .last()
        .is_some_and(|last| MAGNITUDES.iter().any(|(suffix, _)| *suffix == last))
}

/// Every numeral in `text`, with thousands separators removed.
pub fn numeral_tokens(text: &str) -> Vec<String> {
    NUMERAL
        .find_iter(text)
        .map(|m| m.as_str().replace(',', ""))
        .collect()
}

/// A bare four-digit number from 2020 on is a calendar year, not a count.
fn looks_like_year(token: &str) -> bool {
    token.len() == 4
        && token.starts_with("20")
        && token.chars().all(|c| c.is_ascii_digit())
        && token.parse::<u32>().is_ok_and(|year| year >= 2020)
}

/// Count candidates mined from free text, in reading order.
pub fn candidate_counts(raw_text: &str) -> Vec<String> {
    NUMERAL
        .find_iter(&strip_dates(raw_text))
        .filter(|m| !looks_like_year(m.as_str()))
        .map(|m| m.as_str().replace(',', ""))
        .collect()
}

/// Maps the surviving candidates onto the four counts.
///
/// With four or more candidates the largest magnitude-suffixed one becomes
/// `views` and the first three others fill likes, reposts and replies.
/// Without any suffixed candidate the first four are taken in order.
/// Fewer candidates fill the slots from the left.
pub fn assign_counts(candidates: &[String]) -> Engagement {
    let mut engagement = Engagement::default();

    let views_at = if candidates.len() >= 4 {
        candidates
            .iter()
            .enumerate()
            .filter(|(_, token)| has_magnitude(token))
            .fold(None::<(usize, f64)>, |best, (i, token)| {
                let value = to_numeric(token);
                match best {
                    Some((_, best_value)) if best_value >= value => best,
                    _ => Some((i, value)),
                }
            })
            .map(|(i, _)| i)
    } else {
        None
    };

    let ordered: Vec<&String> = match views_at {
        Some(at) => {
            engagement.views = candidates[at].clone();
            candidates
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != at)
                .map(|(_, token)| token)
                .collect()
        }
        None => candidates.iter().collect(),
    };

    let mut slots = ordered.into_iter();
    for slot in [
        &mut engagement.likes,
        &mut engagement.reposts,
        &mut engagement.replies,
    ] {
        if let Some(token) = slots.next() {
            *slot = token.clone();
        }
    }
    if views_at.is_none() {
        if let Some(token) = slots.next() {
            engagement.views = token.clone();
        }
    }

    engagement
}

/// Reads each engagement control on its own; the first label carrying a
/// numeral wins for that control.
pub fn counts_from_controls(unit: &ContentUnit) -> Option<Engagement> {
    let read = |kind: ControlKind| {
        unit.control_labels(kind)
            .iter()
            .find_map(|label| numeral_tokens(label).into_iter().next())
    };

    let likes = read(ControlKind::Like);
    let reposts = read(ControlKind::Repost);
    let replies = read(ControlKind::Reply);
    let views = read(ControlKind::View);

    if likes.is_none() && reposts.is_none() && replies.is_none() && views.is_none() {
        return None;
    }

    let defaults = Engagement::default();
    Some(Engagement {
        likes: likes.unwrap_or(defaults.likes),
        reposts: reposts.unwrap_or(defaults.reposts),
        replies: replies.unwrap_or(defaults.replies),
        views: views.unwrap_or(defaults.views),
    })
}

/// Engagement for a unit: controls first, text mining when no control spoke.
pub fn extract_engagement(unit: &ContentUnit) -> Engagement {
    counts_from_controls(unit).unwrap_or_else(|| {
        let raw = unit.text(SurfaceKind::Full).unwrap_or_default();
        assign_counts(&candidate_counts(raw))
    })
}
