use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeroImageId(pub i64);

impl std::fmt::Display for HeroImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A rotating-banner image, distinct from per-product catalog images.
/// The id is assigned by the persistent store on create, so it is absent
/// until the first round-trip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroImage {
    pub id: Option<HeroImageId>,
    pub src: String,
    pub alt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroImageDraft {
    pub src: String,
    pub alt: String,
}
