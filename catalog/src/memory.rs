//! In-memory course store. Stands in for MongoDB wherever tests (or local
//! runs without a server) inject a store, and mirrors the adapter contract:
//! merge-upsert keyed by name, exact domain membership, and identifiers that
//! survive reseeding.

use crate::model::{Course, CourseRecord};
use crate::store::{CourseStore, SortKey, StoreError};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use parking_lot::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    courses: RwLock<Vec<Course>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored courses, for asserting seed idempotency.
    pub fn course_count(&self) -> usize {
        self.courses.read().len()
    }

    /// Direct store inspection by the seeding key, counters included.
    pub fn find_by_name(&self, name: &str) -> Option<Course> {
        self.courses.read().iter().find(|c| c.name == name).cloned()
    }
}

#[async_trait]
impl CourseStore for MemoryStore {
    async fn upsert_course(&self, record: &CourseRecord) -> Result<(), StoreError> {
        let mut courses = self.courses.write();
        match courses.iter_mut().find(|c| c.name == record.name) {
            Some(existing) => {
                // Merge the seed fields only; id and counters stay put.
                existing.date = record.date;
                existing.description = record.description.clone();
                existing.domain = record.domain.clone();
                existing.chapters = record.chapters.clone();
            }
            None => courses.push(Course {
                id: ObjectId::new().to_hex(),
                name: record.name.clone(),
                date: record.date,
                description: record.description.clone(),
                domain: record.domain.clone(),
                chapters: record.chapters.clone(),
                positive_ratings: 0,
                negative_ratings: 0,
            }),
        }
        Ok(())
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        // Nothing to build; listings scan the vector.
        Ok(())
    }

    async fn list_courses(
        &self,
        sort: SortKey,
        domain: Option<&str>,
    ) -> Result<Vec<Course>, StoreError> {
        let courses = self.courses.read();
        let mut out: Vec<Course> = courses
            .iter()
            .filter(|c| domain.map_or(true, |d| c.domain.iter().any(|entry| entry == d)))
            .cloned()
            .collect();
        match sort {
            SortKey::Alphabetical => out.sort_by(|a, b| a.name.cmp(&b.name)),
            SortKey::Date => out.sort_by(|a, b| b.date.cmp(&a.date)),
        }
        Ok(out)
    }

    async fn find_course(&self, id: &str) -> Result<Option<Course>, StoreError> {
        Ok(self.courses.read().iter().find(|c| c.id == id).cloned())
    }

    async fn increment_rating(&self, id: &str, positive: bool) -> Result<bool, StoreError> {
        let mut courses = self.courses.write();
        match courses.iter_mut().find(|c| c.id == id) {
            Some(course) => {
                if positive {
                    course.positive_ratings += 1;
                } else {
                    course.negative_ratings += 1;
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Chapter;

    fn record(name: &str, date: i64, domain: &[&str]) -> CourseRecord {
        CourseRecord {
            name: name.into(),
            date,
            description: format!("about {name}"),
            domain: domain.iter().map(|d| (*d).into()).collect(),
            chapters: vec![Chapter { name: "Ch1".into(), text: "...".into() }],
        }
    }

    #[tokio::test]
    async fn upsert_merges_by_name_and_keeps_id_and_counters() {
        let store = MemoryStore::new();
        store.upsert_course(&record("Intro", 2020, &["cs"])).await.unwrap();
        let first = store.find_by_name("Intro").unwrap();
        assert!(store.increment_rating(&first.id, true).await.unwrap());

        let mut updated = record("Intro", 2021, &["cs", "math"]);
        updated.description = "revised".into();
        store.upsert_course(&updated).await.unwrap();

        assert_eq!(store.course_count(), 1);
        let merged = store.find_by_name("Intro").unwrap();
        assert_eq!(merged.id, first.id);
        assert_eq!(merged.date, 2021);
        assert_eq!(merged.description, "revised");
        assert_eq!(merged.positive_ratings, 1);
    }

    #[tokio::test]
    async fn listing_sorts_by_name_ascending_and_date_descending() {
        let store = MemoryStore::new();
        store.upsert_course(&record("Zebra", 2019, &["cs"])).await.unwrap();
        store.upsert_course(&record("Alpha", 2021, &["cs"])).await.unwrap();
        store.upsert_course(&record("Mango", 2020, &["cs"])).await.unwrap();

        let by_name = store.list_courses(SortKey::Alphabetical, None).await.unwrap();
        let names: Vec<&str> = by_name.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Mango", "Zebra"]);

        let by_date = store.list_courses(SortKey::Date, None).await.unwrap();
        let dates: Vec<i64> = by_date.iter().map(|c| c.date).collect();
        assert_eq!(dates, [2021, 2020, 2019]);
    }

    #[tokio::test]
    async fn domain_filter_matches_membership_not_substrings() {
        let store = MemoryStore::new();
        store.upsert_course(&record("A", 1, &["cs"])).await.unwrap();
        store.upsert_course(&record("B", 2, &["computer-science"])).await.unwrap();
        store.upsert_course(&record("C", 3, &["cs", "math"])).await.unwrap();

        let cs = store.list_courses(SortKey::Alphabetical, Some("cs")).await.unwrap();
        let names: Vec<&str> = cs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["A", "C"]);

        let sub = store.list_courses(SortKey::Alphabetical, Some("c")).await.unwrap();
        assert!(sub.is_empty());
    }

    #[tokio::test]
    async fn rating_increments_exactly_one_counter() {
        let store = MemoryStore::new();
        store.upsert_course(&record("Intro", 2020, &["cs"])).await.unwrap();
        let id = store.find_by_name("Intro").unwrap().id;

        assert!(store.increment_rating(&id, true).await.unwrap());
        assert!(store.increment_rating(&id, false).await.unwrap());

        let course = store.find_by_name("Intro").unwrap();
        assert_eq!(course.positive_ratings, 1);
        assert_eq!(course.negative_ratings, 1);
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids_are_absent_not_errors() {
        let store = MemoryStore::new();
        store.upsert_course(&record("Intro", 2020, &["cs"])).await.unwrap();

        assert!(store.find_course(&ObjectId::new().to_hex()).await.unwrap().is_none());
        assert!(store.find_course("not-an-objectid").await.unwrap().is_none());
        assert!(!store.increment_rating("not-an-objectid", true).await.unwrap());
    }
}
