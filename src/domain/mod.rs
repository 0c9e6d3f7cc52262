pub mod post;
pub mod profile;
pub mod unit;

pub use post::{DedupKey, Engagement, PostDocument, PostRecord, MIN_TEXT_CHARS, UNKNOWN_LABEL};
pub use profile::{ProfileRecord, UNKNOWN_FIELD};
pub use unit::{ContentUnit, ControlKind, ControlLabels, ProfileSnapshot, SurfaceKind};
