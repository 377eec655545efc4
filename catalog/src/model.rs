use serde::{Deserialize, Serialize};

/// One chapter of a course. Chapter names are unique within their course and
/// double as the lookup key for the chapter endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub name: String,
    pub text: String,
}

/// A course as the store holds it: seed fields plus the store-assigned
/// identifier and the accumulated rating counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub date: i64,
    pub description: String,
    pub domain: Vec<String>,
    pub chapters: Vec<Chapter>,
    /// Counters start absent in the store; treat missing as zero.
    #[serde(default)]
    pub positive_ratings: i64,
    #[serde(default)]
    pub negative_ratings: i64,
}

impl Course {
    /// First chapter with exactly this name, in stored order. Matching is
    /// case-sensitive; names are unique per course so at most one should hit.
    pub fn chapter(&self, name: &str) -> Option<&Chapter> {
        self.chapters.iter().find(|ch| ch.name == name)
    }
}

/// A record from the bundled dataset. Carries no identifier and no counters;
/// the seed upsert only ever writes these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub name: String,
    pub date: i64,
    pub description: String,
    pub domain: Vec<String>,
    pub chapters: Vec<Chapter>,
}
