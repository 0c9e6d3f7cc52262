use serde::{Deserialize, Serialize};

/// Named text surfaces a content unit may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// The whole rendered text of the unit.
    Full,
    /// Dedicated post body element.
    Body,
    /// First language-tagged text element.
    Localized,
    /// Header line such as "Jane reposted" or "Pinned".
    SocialContext,
}

/// Interactive controls that may carry an engagement count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Like,
    Repost,
    Reply,
    View,
}

impl ControlKind {
    pub const ALL: [ControlKind; 4] = [
        ControlKind::Like,
        ControlKind::Repost,
        ControlKind::Reply,
        ControlKind::View,
    ];
}

/// Candidate label strings read off each engagement control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlLabels {
    pub like: Vec<String>,
    pub repost: Vec<String>,
    pub reply: Vec<String>,
    pub view: Vec<String>,
}

impl ControlLabels {
    pub fn get(&self, kind: ControlKind) -> &[String] {
        match kind {
            ControlKind::Like => &self.like,
            ControlKind::Repost => &self.repost,
            ControlKind::Reply => &self.reply,
            ControlKind::View => &self.view,
        }
    }
}

/// Snapshot of one rendered post element, as captured in the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentUnit {
    pub full_text: String,
    pub body_text: Option<String>,
    pub localized_text: Option<String>,
    pub fragments: Vec<String>,
    pub social_context: Option<String>,
    pub controls: ControlLabels,
}

impl ContentUnit {
    /// Builds a unit that only carries its full text.
    pub fn from_text(full_text: impl Into<String>) -> Self {
        Self {
            full_text: full_text.into(),
            ..Default::default()
        }
    }

    /// Reads a surface, treating blank text as absent.
    pub fn text(&self, kind: SurfaceKind) -> Option<&str> {
        let raw = match kind {
            SurfaceKind::Full => Some(self.full_text.as_str()),
            SurfaceKind::Body => self.body_text.as_deref(),
            SurfaceKind::Localized => self.localized_text.as_deref(),
            SurfaceKind::SocialContext => self.social_context.as_deref(),
        };
        raw.map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn fragments(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(|s| s.trim()).filter(|s| !s.is_empty())
    }

    pub fn control_labels(&self, kind: ControlKind) -> &[String] {
        self.controls.get(kind)
    }
}

/// Profile header fields captured from a subject's page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSnapshot {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub verified: bool,
    pub followers: Vec<String>,
    pub following: Vec<String>,
    /// Header stat texts; the one naming posts carries the post count.
    pub post_count: Vec<String>,
    pub page_title: Option<String>,
}
