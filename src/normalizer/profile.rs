use crate::domain::{PostRecord, ProfileRecord, ProfileSnapshot, UNKNOWN_FIELD};

/// Keeps only digits, the decimal point and magnitude suffixes.
pub fn clean_follower_count(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | 'K' | 'M' | 'B' | '万'))
        .collect()
}

/// Words that mark a header stat as the post count.
const POST_COUNT_MARKERS: &[&str] = &["tweet", "post", "推文", "条"];

/// First cleaned count that is non-empty and not "0".
fn first_count<'a>(texts: impl IntoIterator<Item = &'a String>) -> Option<String> {
    texts
        .into_iter()
        .map(|text| clean_follower_count(text))
        .find(|count| !count.is_empty() && count != "0")
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Builds the profile record for `username` from its header snapshot and finalized posts.
pub fn normalize_profile(
    username: &str,
    url: &str,
    snapshot: &ProfileSnapshot,
    posts: Vec<PostRecord>,
) -> ProfileRecord {
    let mut profile = ProfileRecord::new(username, url);

    // The name element also renders the handle on its second line.
    if let Some(name) = present(snapshot.display_name.as_ref())
        .and_then(|text| text.lines().map(str::trim).find(|line| !line.is_empty()))
    {
        profile.display_name = name.to_string();
    }
    if let Some(description) = present(snapshot.description.as_ref()) {
        profile.description = description.to_string();
    }
    profile.location = present(snapshot.location.as_ref())
        .unwrap_or(UNKNOWN_FIELD)
        .to_string();
    profile.verified = snapshot.verified;

    if let Some(followers) = first_count(&snapshot.followers) {
        profile.followers = followers;
    }
    if let Some(following) = first_count(&snapshot.following) {
        profile.following = following;
    }
    if let Some(posts) = first_count(snapshot.post_count.iter().filter(|text| {
        let lower = text.to_lowercase();
        POST_COUNT_MARKERS.iter().any(|marker| lower.contains(marker))
    })) {
        profile.post_count = posts;
    }

    profile.page_title = match present(snapshot.page_title.as_ref()) {
        Some(title) => title.to_string(),
        None if profile.display_name != UNKNOWN_FIELD => {
            format!("{} (@{}) / X", profile.display_name, username)
        }
        None => format!("@{}", username),
    };

    profile.recent_tweets = posts;
    profile
}
