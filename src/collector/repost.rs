use crate::domain::{ContentUnit, SurfaceKind};
use crate::normalizer::patterns::REPOST_PREFIX;

/// Social-context phrases that mean the unit re-shares someone else's post.
pub const REPOST_MARKERS: [&str; 6] = ["reposted", "retweeted", "转推", "转帖", "已转发", "リポスト"];

/// A unit is a repost when its social context says so, or, lacking that
/// signal, when its primary text starts with `RT @handle`.
pub fn is_repost(unit: &ContentUnit, primary_text: &str) -> bool {
    if let Some(context) = unit.text(SurfaceKind::SocialContext) {
        let lowered = context.to_lowercase();
        if REPOST_MARKERS.iter().any(|marker| lowered.contains(marker)) {
            return true;
        }
    }
    REPOST_PREFIX.is_match(primary_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_context(context: &str) -> ContentUnit {
        ContentUnit {
            social_context: Some(context.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_social_context_marks_repost() {
        assert!(is_repost(&with_context("Jane reposted"), "Some shared words"));
        assert!(is_repost(&with_context("Jane REPOSTED"), "Some shared words"));
        assert!(is_repost(&with_context("Jane 已转发"), "Some shared words"));
    }

    #[test]
    fn test_rt_prefix_marks_repost() {
        assert!(is_repost(&ContentUnit::default(), "RT @alice: hello"));
    }

    #[test]
    fn test_plain_post_is_original() {
        assert!(!is_repost(&ContentUnit::default(), "hello there world"));
        assert!(!is_repost(&with_context("Pinned"), "hello there world"));
        assert!(!is_repost(&ContentUnit::default(), "see RT @alice later"));
    }
}
