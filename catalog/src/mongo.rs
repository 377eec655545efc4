//! MongoDB adapter for the course store.
//!
//! Documents live in one collection; the driver assigns `_id` on first insert
//! and the seed upsert never writes it, so identifiers are stable across
//! reseeds. The raw `ObjectId` stays inside this module — callers only ever
//! see its hex rendering.

use crate::model::{Chapter, Course, CourseRecord};
use crate::store::{CourseStore, SortKey, StoreError};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};

const COURSES: &str = "courses";

/// Wire form of a stored course. Counters are created lazily by `$inc`, so
/// older documents may not carry them yet.
#[derive(Debug, Serialize, Deserialize)]
struct CourseDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    date: i64,
    description: String,
    #[serde(default)]
    domain: Vec<String>,
    #[serde(default)]
    chapters: Vec<Chapter>,
    #[serde(default)]
    positive_ratings: i64,
    #[serde(default)]
    negative_ratings: i64,
}

impl From<CourseDocument> for Course {
    fn from(document: CourseDocument) -> Self {
        Course {
            id: document.id.to_hex(),
            name: document.name,
            date: document.date,
            description: document.description,
            domain: document.domain,
            chapters: document.chapters,
            positive_ratings: document.positive_ratings,
            negative_ratings: document.negative_ratings,
        }
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::query(err.to_string())
    }
}

pub struct MongoStore {
    courses: Collection<CourseDocument>,
}

impl MongoStore {
    /// Connect and ping once, so a bad URI or an unreachable server fails
    /// here at startup instead of on the first request.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;
        client
            .database(database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;
        let courses = client.database(database).collection(COURSES);
        Ok(Self { courses })
    }
}

fn list_filter(domain: Option<&str>) -> Document {
    match domain {
        Some(value) => doc! { "domain": { "$in": [value] } },
        None => Document::new(),
    }
}

fn sort_doc(sort: SortKey) -> Document {
    match sort {
        SortKey::Alphabetical => doc! { "name": 1 },
        SortKey::Date => doc! { "date": -1 },
    }
}

#[async_trait]
impl CourseStore for MongoStore {
    async fn upsert_course(&self, record: &CourseRecord) -> Result<(), StoreError> {
        let fields = bson::to_document(record).map_err(|e| StoreError::query(e.to_string()))?;
        self.courses
            .update_one(doc! { "name": &record.name }, doc! { "$set": fields })
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        self.courses
            .create_index(IndexModel::builder().keys(doc! { "name": 1 }).build())
            .await?;
        self.courses
            .create_index(IndexModel::builder().keys(doc! { "date": -1 }).build())
            .await?;
        Ok(())
    }

    async fn list_courses(
        &self,
        sort: SortKey,
        domain: Option<&str>,
    ) -> Result<Vec<Course>, StoreError> {
        let cursor = self
            .courses
            .find(list_filter(domain))
            .sort(sort_doc(sort))
            .await?;
        let documents: Vec<CourseDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Course::from).collect())
    }

    async fn find_course(&self, id: &str) -> Result<Option<Course>, StoreError> {
        // An unparsable identifier cannot match any document; report absent.
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        let found = self.courses.find_one(doc! { "_id": oid }).await?;
        Ok(found.map(Course::from))
    }

    async fn increment_rating(&self, id: &str, positive: bool) -> Result<bool, StoreError> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(false);
        };
        let field = if positive { "positive_ratings" } else { "negative_ratings" };
        let result = self
            .courses
            .update_one(doc! { "_id": oid }, doc! { "$inc": { field: 1_i64 } })
            .await?;
        Ok(result.matched_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_filter_is_membership_not_substring() {
        assert_eq!(list_filter(Some("cs")), doc! { "domain": { "$in": ["cs"] } });
        assert_eq!(list_filter(None), Document::new());
    }

    #[test]
    fn sort_docs_match_the_listing_indexes() {
        assert_eq!(sort_doc(SortKey::Alphabetical), doc! { "name": 1 });
        assert_eq!(sort_doc(SortKey::Date), doc! { "date": -1 });
    }

    #[test]
    fn stored_document_renders_hex_id_and_keeps_counters() {
        let oid = ObjectId::new();
        let document = CourseDocument {
            id: oid,
            name: "Intro".into(),
            date: 2020,
            description: "d".into(),
            domain: vec!["cs".into()],
            chapters: vec![Chapter { name: "Ch1".into(), text: "...".into() }],
            positive_ratings: 3,
            negative_ratings: 1,
        };
        let course = Course::from(document);
        assert_eq!(course.id, oid.to_hex());
        assert_eq!(course.positive_ratings, 3);
        assert_eq!(course.negative_ratings, 1);
    }

    #[test]
    fn seed_fields_exclude_id_and_counters() {
        let record = CourseRecord {
            name: "Intro".into(),
            date: 2020,
            description: "d".into(),
            domain: vec!["cs".into()],
            chapters: vec![],
        };
        let fields = bson::to_document(&record).expect("record serializes");
        assert!(fields.get("_id").is_none());
        assert!(fields.get("positive_ratings").is_none());
        assert!(fields.get("negative_ratings").is_none());
        assert_eq!(fields.get_str("name").ok(), Some("Intro"));
    }
}
