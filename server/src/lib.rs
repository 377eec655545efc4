use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use catalog::{Chapter, Course, CourseStore, SortKey};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error;

use error::{ApiError, ApiResult};

/// Store handle injected into every handler.
pub type SharedStore = Arc<dyn CourseStore>;

#[derive(Deserialize)]
pub struct ListParams {
    pub sort_by: Option<String>,
    pub domain: Option<String>,
}

/// Course as the API exposes it: identifier as a plain string, no rating
/// counters, and never the store's own id field.
#[derive(Serialize)]
pub struct CourseResponse {
    pub id: String,
    pub name: String,
    pub date: i64,
    pub description: String,
    pub domain: Vec<String>,
    pub chapters: Vec<Chapter>,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        CourseResponse {
            id: course.id,
            name: course.name,
            date: course.date,
            description: course.description,
            domain: course.domain,
            chapters: course.chapters,
        }
    }
}

#[derive(Deserialize)]
pub struct RatingBody {
    pub rating: bool,
}

#[derive(Serialize)]
pub struct Ack {
    pub detail: String,
}

pub fn build_app(store: SharedStore) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/courses", get(list_courses))
        .route("/courses/:course_id", get(get_course))
        .route("/courses/:course_id/chapters/:chapter_name", get(get_chapter))
        .route("/courses/:course_id/rate", post(rate_course))
        .with_state(store)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow any origin.
fn cors_layer() -> CorsLayer {
    let origins: Vec<_> = std::env::var("CORS_ALLOW_ORIGIN")
        .map(|val| val.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_default();
    let allow = if origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    };
    allow.allow_methods(Any).allow_headers(Any)
}

pub async fn list_courses(
    State(store): State<SharedStore>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<CourseResponse>>> {
    let sort = match params.sort_by.as_deref() {
        None => SortKey::Alphabetical,
        Some(value) => value.parse().map_err(|_| ApiError::InvalidSortOption)?,
    };
    let courses = store.list_courses(sort, params.domain.as_deref()).await?;
    Ok(Json(courses.into_iter().map(CourseResponse::from).collect()))
}

pub async fn get_course(
    State(store): State<SharedStore>,
    Path(course_id): Path<String>,
) -> ApiResult<Json<CourseResponse>> {
    let course = store
        .find_course(&course_id)
        .await?
        .ok_or(ApiError::CourseNotFound)?;
    Ok(Json(course.into()))
}

pub async fn get_chapter(
    State(store): State<SharedStore>,
    Path((course_id, chapter_name)): Path<(String, String)>,
) -> ApiResult<Json<Chapter>> {
    let course = store
        .find_course(&course_id)
        .await?
        .ok_or(ApiError::CourseNotFound)?;
    let chapter = course.chapter(&chapter_name).ok_or(ApiError::ChapterNotFound)?;
    Ok(Json(chapter.clone()))
}

pub async fn rate_course(
    State(store): State<SharedStore>,
    Path(course_id): Path<String>,
    Json(body): Json<RatingBody>,
) -> ApiResult<Json<Ack>> {
    // Existence check and increment are deliberately two store calls; a
    // course vanishing in between shows up as a missed match below.
    store
        .find_course(&course_id)
        .await?
        .ok_or(ApiError::CourseNotFound)?;
    let matched = store.increment_rating(&course_id, body.rating).await?;
    if !matched {
        return Err(ApiError::CourseNotFound);
    }
    Ok(Json(Ack { detail: "Rating submitted successfully".into() }))
}
