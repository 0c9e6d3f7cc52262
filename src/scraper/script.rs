use crate::scraper::config::SelectorConfig;

/// Renders a selector list as a JavaScript array literal.
fn js_list(selectors: &[String]) -> String {
    let items = selectors
        .iter()
        .map(|s| format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", items)
}

const HELPERS: &str = r#"
    const text = el => el ? (el.innerText || el.textContent || '').trim() : null;
    const first = (root, sels) => {
        for (const s of sels) {
            const el = root.querySelector(s);
            if (el) return el;
        }
        return null;
    };
    const all = (root, sels) => {
        for (const s of sels) {
            const els = root.querySelectorAll(s);
            if (els.length) return Array.from(els);
        }
        return [];
    };
    const union = (root, sels) => sels.length ? Array.from(root.querySelectorAll(sels.join(', '))) : [];
    const labels = (root, sels) => union(root, sels)
        .map(el => [el.getAttribute('aria-label') || '', text(el) || ''].join(' ').trim())
        .filter(l => l.length > 0);
"#;

/// Builds the scripts evaluated in the page to snapshot its content.
pub struct SnapshotScripts {
    selectors: SelectorConfig,
}

impl SnapshotScripts {
    pub fn new(selectors: SelectorConfig) -> Self {
        Self { selectors }
    }

    /// Returns every rendered post as a JSON array of content units.
    pub fn units_script(&self) -> String {
        let s = &self.selectors;
        format!(
            r#"
            (() => {{
                {HELPERS}
                const units = all(document, {unit});
                return units.map(u => ({{
                    full_text: text(u) || '',
                    body_text: text(first(u, {body})),
                    localized_text: text(first(u, {localized})),
                    fragments: all(u, {fragment}).map(text).filter(t => t),
                    social_context: text(first(u, {social_context})),
                    controls: {{
                        like: labels(u, {like}),
                        repost: labels(u, {repost}),
                        reply: labels(u, {reply}),
                        view: labels(u, {view})
                    }}
                }}));
            }})()
            "#,
            unit = js_list(&s.unit),
            body = js_list(&s.body),
            localized = js_list(&s.localized),
            fragment = js_list(&s.fragment),
            social_context = js_list(&s.social_context),
            like = js_list(&s.like),
            repost = js_list(&s.repost),
            reply = js_list(&s.reply),
            view = js_list(&s.view),
        )
    }

    /// Returns the profile header as a JSON object.
    pub fn profile_script(&self) -> String {
        let s = &self.selectors;
        format!(
            r#"
            (() => {{
                {HELPERS}
                return {{
                    display_name: text(first(document, {display_name})),
                    description: text(first(document, {description})),
                    location: text(first(document, {location})),
                    verified: first(document, {verified}) !== null,
                    followers: union(document, {followers}).map(text).filter(t => t),
                    following: union(document, {following}).map(text).filter(t => t),
                    post_count: union(document, {post_count}).map(text).filter(t => t),
                    page_title: document.title || null
                }};
            }})()
            "#,
            display_name = js_list(&s.display_name),
            description = js_list(&s.description),
            location = js_list(&s.location),
            verified = js_list(&s.verified),
            followers = js_list(&s.followers),
            following = js_list(&s.following),
            post_count = js_list(&s.post_count),
        )
    }

    pub fn scroll_script(pixels: u32) -> String {
        format!("window.scrollBy(0, {}); true", pixels)
    }

    /// True when the viewport touches the bottom of the document.
    pub fn at_bottom_script() -> &'static str {
        "(window.innerHeight + window.scrollY) >= (document.body.scrollHeight - 2)"
    }
}
