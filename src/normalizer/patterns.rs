//! Compiled patterns shared by the normalizer stages.
//!
//! Everything here is compiled once on first use.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

const MONTH: &str = r"(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)";

/// One date shape, compiled in its separator-prefixed and bare forms.
pub struct DatePattern {
    pub name: &'static str,
    pub regex: Regex,
    /// Whether the pattern is unambiguous enough to be cut out before mining numbers.
    pub strippable: bool,
}

struct Family {
    name: &'static str,
    core: String,
    /// Characters that must not directly precede a bare match.
    left: Option<&'static str>,
    /// Characters that must not directly follow a match.
    right: Option<&'static str>,
    /// Bare numeric shapes collide with counts like "3.4K", so they are only
    /// stripped when chosen as the published label.
    bare_strippable: bool,
}

fn families() -> Vec<Family> {
    let month_year = format!(r"\b{MONTH}\s+\d{{1,2}},\s*\d{{4}}");
    let month_day = format!(r"\b{MONTH}\s+\d{{1,2}}");
    vec![
        Family {
            name: "cjk_full",
            core: r"\d{4}年\d{1,2}月\d{1,2}日".into(),
            left: None,
            right: None,
            bare_strippable: true,
        },
        Family {
            name: "cjk_month_day",
            core: r"\d{1,2}月\d{1,2}日".into(),
            left: None,
            right: None,
            bare_strippable: true,
        },
        Family {
            name: "month_name_year",
            core: month_year,
            left: None,
            right: Some(r"\d"),
            bare_strippable: true,
        },
        Family {
            name: "month_name_day",
            core: month_day,
            left: None,
            right: Some(r"\d"),
            bare_strippable: true,
        },
        Family {
            name: "slash_year",
            core: r"\d{1,2}/\d{1,2}/\d{4}".into(),
            left: Some(r"\d./"),
            right: Some(r"\d"),
            bare_strippable: false,
        },
        Family {
            name: "slash",
            core: r"\d{1,2}/\d{1,2}".into(),
            left: Some(r"\d./"),
            right: Some(r"\d/"),
            bare_strippable: false,
        },
        Family {
            name: "dash_year",
            core: r"\d{1,2}-\d{1,2}-\d{4}".into(),
            left: Some(r"\d-"),
            right: Some(r"\d"),
            bare_strippable: false,
        },
        Family {
            name: "dash",
            core: r"\d{1,2}-\d{1,2}".into(),
            left: Some(r"\d-"),
            right: Some(r"\d-"),
            bare_strippable: false,
        },
        Family {
            name: "dot_year",
            core: r"\d{1,2}\.\d{1,2}\.\d{4}".into(),
            left: Some(r"\d.,"),
            right: Some(r"\d"),
            bare_strippable: false,
        },
        Family {
            name: "dot",
            core: r"\d{1,2}\.\d{1,2}".into(),
            left: Some(r"\d.,"),
            right: Some(r"\d.KMB万"),
            bare_strippable: false,
        },
    ]
}

fn right_guard(right: Option<&str>) -> String {
    right
        .map(|chars| format!(r"(?:[^{chars}]|$)"))
        .unwrap_or_default()
}

/// Date patterns in match priority order: every separator-prefixed form first,
/// then every bare form; year-qualified shapes precede their yearless siblings.
pub static DATE_PATTERNS: LazyLock<Vec<DatePattern>> = LazyLock::new(|| {
    let families = families();
    let separated = families.iter().map(|f| DatePattern {
        name: f.name,
        regex: Regex::new(&format!(r"·\s*({}){}", f.core, right_guard(f.right)))
            .expect("separated date pattern"),
        strippable: true,
    });
    let bare = families.iter().map(|f| {
        let left = f
            .left
            .map(|chars| format!(r"(?:^|[^{chars}])"))
            .unwrap_or_default();
        DatePattern {
            name: f.name,
            regex: Regex::new(&format!(r"{left}({}){}", f.core, right_guard(f.right)))
                .expect("bare date pattern"),
            strippable: f.bare_strippable,
        }
    });
    separated.chain(bare).collect()
});

/// Relative timestamps such as "· 2h", "· 15 min", "· 3小时", "· now".
pub static RELATIVE_AGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"·\s*(?:(\d{1,3})\s*(分钟|小时|時間|秒|分|天|mins?|hrs?|secs?|[smhd])|(now|just now|刚刚))(?:[^A-Za-z\d]|$)",
    )
    .expect("RELATIVE_AGE regex")
});

/// Whole-label shapes used when resolving a published label to a calendar date.
pub static CJK_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d{4})年)?(\d{1,2})月(\d{1,2})日$").expect("CJK_LABEL regex")
});

pub static MONTH_NAME_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)\s+(\d{1,2})(?:,\s*(\d{4}))?$").expect("MONTH_NAME_LABEL regex")
});

pub static NUMERIC_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})([/.-])(\d{1,2})(?:[/.-](\d{4}))?$").expect("NUMERIC_LABEL regex")
});

/// Numerals as rendered: plain, decimal or comma-grouped, with an optional magnitude suffix.
pub static NUMERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,3}(?:,\d{3})+(?:\.\d+)?[KMB万]?|\d+(?:\.\d+)?[KMB万]?")
        .expect("NUMERAL regex")
});

/// Classic retweet prefix at the start of a post body.
pub static REPOST_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^RT @\w+").expect("REPOST_PREFIX regex"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(DATE_PATTERNS.len(), 20);
        assert!(DATE_PATTERNS[..10].iter().all(|p| p.strippable));
        assert_eq!(DATE_PATTERNS[0].name, "cjk_full");
        assert_eq!(DATE_PATTERNS[10].name, "cjk_full");
    }

    #[test]
    fn test_numeral_keeps_thousands_group() {
        let found: Vec<&str> = NUMERAL
            .find_iter("1,234 56 3.4K 2万")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["1,234", "56", "3.4K", "2万"]);
    }

    #[test]
    fn test_repost_prefix() {
        assert!(REPOST_PREFIX.is_match("RT @alice: hello"));
        assert!(!REPOST_PREFIX.is_match("hello RT @alice"));
        assert!(!REPOST_PREFIX.is_match("RT alice"));
    }
}
