use std::ops::Range;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use crate::domain::UNKNOWN_LABEL;
use crate::normalizer::patterns::{
    CJK_LABEL, DATE_PATTERNS, MONTH_NAME_LABEL, NUMERIC_LABEL, RELATIVE_AGE,
};

/// Byte range of the published-date label in `raw_text`, if any pattern matches.
fn published_label_span(raw_text: &str) -> Option<Range<usize>> {
    DATE_PATTERNS
        .iter()
        .find_map(|p| p.regex.captures(raw_text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.range())
}

/// Returns the first date token found in `raw_text`, or [`UNKNOWN_LABEL`].
pub fn extract_published_label(raw_text: &str) -> String {
    published_label_span(raw_text)
        .map(|span| raw_text[span].to_string())
        .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
}

/// Blanks out the published label, every unambiguous date and every relative
/// timestamp so that their digits are not mistaken for engagement counts.
pub fn strip_dates(raw_text: &str) -> String {
    let mut text = raw_text.to_string();
    if let Some(span) = published_label_span(raw_text) {
        text.replace_range(span, " ");
    }
    text = RELATIVE_AGE.replace_all(&text, " ").into_owned();
    for pattern in DATE_PATTERNS.iter().filter(|p| p.strippable) {
        text = pattern.regex.replace_all(&text, " ").into_owned();
    }
    text
}

/// Age of a post whose timestamp is rendered relatively ("· 2h", "· 3小时", "· now").
pub fn relative_age(raw_text: &str) -> Option<Duration> {
    let caps = RELATIVE_AGE.captures(raw_text)?;
    if caps.get(3).is_some() {
        return Some(Duration::ZERO);
    }
    let amount: u64 = caps.get(1)?.as_str().parse().ok()?;
    let unit_secs = match caps.get(2)?.as_str() {
        "s" | "sec" | "secs" | "秒" => 1,
        "m" | "min" | "mins" | "分" | "分钟" => 60,
        "h" | "hr" | "hrs" | "小时" | "時間" => 3_600,
        "d" | "天" => 86_400,
        _ => return None,
    };
    Some(Duration::from_secs(amount * unit_secs))
}

fn month_from_name(name: &str) -> Option<u32> {
    let prefix = name.get(..3)?.to_ascii_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Best-effort calendar date for a published label.
///
/// Yearless labels take the year of `reference`; when that would put the
/// post after `reference` the previous year is used instead. Slash and dash
/// forms read as month/day, dot forms as day.month.
pub fn resolve_label(label: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let label = label.trim();
    if label.is_empty() || label == UNKNOWN_LABEL {
        return None;
    }

    let (year, month, day) = if let Some(caps) = CJK_LABEL.captures(label) {
        (
            caps.get(1).and_then(|y| y.as_str().parse::<i32>().ok()),
            caps[2].parse::<u32>().ok()?,
            caps[3].parse::<u32>().ok()?,
        )
    } else if let Some(caps) = MONTH_NAME_LABEL.captures(label) {
        (
            caps.get(3).and_then(|y| y.as_str().parse::<i32>().ok()),
            month_from_name(&caps[1])?,
            caps[2].parse::<u32>().ok()?,
        )
    } else if let Some(caps) = NUMERIC_LABEL.captures(label) {
        let first = caps[1].parse::<u32>().ok()?;
        let second = caps[3].parse::<u32>().ok()?;
        let year = caps.get(4).and_then(|y| y.as_str().parse::<i32>().ok());
        match &caps[2] {
            "." => (year, second, first),
            _ => (year, first, second),
        }
    } else {
        return None;
    };

    match year {
        Some(year) => NaiveDate::from_ymd_opt(year, month, day),
        None => {
            let date = NaiveDate::from_ymd_opt(reference.year(), month, day)?;
            if date > reference {
                NaiveDate::from_ymd_opt(reference.year() - 1, month, day)
            } else {
                Some(date)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 19).unwrap()
    }

    #[test]
    fn test_label_from_separated_month_name() {
        assert_eq!(extract_published_label("Great news · Aug 9 1,234 56 12 3.4K"), "Aug 9");
    }

    #[test]
    fn test_year_qualified_form_wins() {
        assert_eq!(
            extract_published_label("Jane\n@jane\n·\nAug 9, 2023\nhello"),
            "Aug 9, 2023"
        );
        assert_eq!(extract_published_label("Jane · 2023年8月9日 你好"), "2023年8月9日");
        assert_eq!(extract_published_label("posted 12/25/2023 ok"), "12/25/2023");
    }

    #[test]
    fn test_separated_form_beats_earlier_bare_match() {
        // "5月1日" appears first in the text but only the later one follows the separator.
        assert_eq!(extract_published_label("5月1日 的活动 · 6月2日"), "6月2日");
    }

    #[test]
    fn test_bare_cjk_label() {
        assert_eq!(extract_published_label("活动在8月9日举行"), "8月9日");
    }

    #[test]
    fn test_unknown_when_nothing_matches() {
        assert_eq!(extract_published_label("just words here"), UNKNOWN_LABEL);
        assert_eq!(extract_published_label(""), UNKNOWN_LABEL);
    }

    #[test]
    fn test_magnitude_numbers_are_not_dates() {
        assert_eq!(extract_published_label("views 3.4K today"), UNKNOWN_LABEL);
        assert_eq!(extract_published_label("version 10.25.1 shipped"), UNKNOWN_LABEL);
    }

    #[test]
    fn test_strip_dates_removes_date_digits() {
        let stripped = strip_dates("Great news · Aug 9 1,234 56 12 3.4K");
        assert!(!stripped.contains("Aug"));
        assert!(stripped.contains("1,234 56 12 3.4K"));

        let stripped = strip_dates("Jane · 2h hello 5");
        assert!(!stripped.contains("2h"));
        assert!(stripped.contains("hello 5"));
    }

    #[test]
    fn test_strip_dates_removes_bare_numeric_label() {
        let raw = "Jane Doe\n@jane\n8/9\nShipping the parser rewrite\n5\n6";
        assert_eq!(extract_published_label(raw), "8/9");
        let stripped = strip_dates(raw);
        assert!(!stripped.contains("8/9"));
        assert!(stripped.contains("5\n6"));
    }

    #[test]
    fn test_month_name_day_followed_by_comma() {
        let raw = "Jane Doe\n@jane · Aug 9, big day\n5\n6";
        assert_eq!(extract_published_label(raw), "Aug 9");
        assert!(!strip_dates(raw).contains('9'));
    }

    #[test]
    fn test_strip_dates_keeps_bare_numeric_shapes() {
        assert!(strip_dates("ratio 3.4K and 1/2").contains("3.4K"));
    }

    #[test]
    fn test_relative_age_units() {
        assert_eq!(relative_age("Jane · 2h"), Some(Duration::from_secs(7_200)));
        assert_eq!(relative_age("Jane · 15m\ntext"), Some(Duration::from_secs(900)));
        assert_eq!(relative_age("Jane · 3小时前"), Some(Duration::from_secs(10_800)));
        assert_eq!(relative_age("Jane · now"), Some(Duration::ZERO));
        assert_eq!(relative_age("Jane · Aug 9"), None);
        assert_eq!(relative_age("ran 2h without separator"), None);
    }

    #[test]
    fn test_resolve_month_name_labels() {
        assert_eq!(
            resolve_label("Aug 9", reference()),
            NaiveDate::from_ymd_opt(2025, 8, 9)
        );
        assert_eq!(
            resolve_label("Aug 9, 2023", reference()),
            NaiveDate::from_ymd_opt(2023, 8, 9)
        );
        assert_eq!(
            resolve_label("December 25", reference()),
            NaiveDate::from_ymd_opt(2024, 12, 25)
        );
    }

    #[test]
    fn test_resolve_cjk_and_numeric_labels() {
        assert_eq!(
            resolve_label("2023年8月9日", reference()),
            NaiveDate::from_ymd_opt(2023, 8, 9)
        );
        assert_eq!(
            resolve_label("8月9日", reference()),
            NaiveDate::from_ymd_opt(2025, 8, 9)
        );
        assert_eq!(
            resolve_label("8/9", reference()),
            NaiveDate::from_ymd_opt(2025, 8, 9)
        );
        assert_eq!(
            resolve_label("9.8.2024", reference()),
            NaiveDate::from_ymd_opt(2024, 8, 9)
        );
    }

    #[test]
    fn test_resolve_rejects_unknown_and_invalid() {
        assert_eq!(resolve_label(UNKNOWN_LABEL, reference()), None);
        assert_eq!(resolve_label("13/45", reference()), None);
        assert_eq!(resolve_label("Foo 3", reference()), None);
    }
}
