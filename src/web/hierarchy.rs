//! Hierarchy listing handlers: departments down to subclasses.

use axum::extract::{Query, State};
use axum::response::Response;
use serde::Deserialize;

use crate::sedna::{Level, Listing};
use crate::state::AppState;
use crate::web::error::ApiError;
use crate::web::routes::{cache, with_cache_control};

/// Parent ids accepted by the listing endpoints; each uses at most one.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentParams {
    pub department_id: Option<String>,
    pub school_id: Option<String>,
    pub semester_id: Option<String>,
    pub class_id: Option<String>,
}

impl ParentParams {
    /// The non-blank id for `level`, or a 400 naming it.
    fn require(&self, level: Level) -> Result<&str, ApiError> {
        let value = match level {
            Level::Department => self.department_id.as_deref(),
            Level::School => self.school_id.as_deref(),
            Level::Semester => self.semester_id.as_deref(),
            Level::Class => self.class_id.as_deref(),
            Level::Subclass => None,
        };
        value
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::missing_id(level))
    }
}

/// `GET /api/departments`
pub(super) async fn departments(State(state): State<AppState>) -> Result<Response, ApiError> {
    let departments = state
        .sedna
        .departments()
        .await
        .map_err(|e| ApiError::from_sedna(Listing::Departments, e))?;
    Ok(with_cache_control(departments, cache::HIERARCHY))
}

/// `GET /api/schools?departmentId=`
pub(super) async fn schools(
    State(state): State<AppState>,
    Query(params): Query<ParentParams>,
) -> Result<Response, ApiError> {
    let department_id = params.require(Level::Department)?;
    let schools = state
        .sedna
        .schools(department_id)
        .await
        .map_err(|e| ApiError::from_sedna(Listing::Schools, e))?;
    Ok(with_cache_control(schools, cache::HIERARCHY))
}

/// `GET /api/semesters?schoolId=`
pub(super) async fn semesters(
    State(state): State<AppState>,
    Query(params): Query<ParentParams>,
) -> Result<Response, ApiError> {
    let school_id = params.require(Level::School)?;
    let semesters = state
        .sedna
        .semesters(school_id)
        .await
        .map_err(|e| ApiError::from_sedna(Listing::Semesters, e))?;
    Ok(with_cache_control(semesters, cache::HIERARCHY))
}

/// `GET /api/classes?semesterId=`
pub(super) async fn classes(
    State(state): State<AppState>,
    Query(params): Query<ParentParams>,
) -> Result<Response, ApiError> {
    let semester_id = params.require(Level::Semester)?;
    let classes = state
        .sedna
        .classes(semester_id)
        .await
        .map_err(|e| ApiError::from_sedna(Listing::Classes, e))?;
    Ok(with_cache_control(classes, cache::HIERARCHY))
}

/// `GET /api/subclasses?classId=`
pub(super) async fn subclasses(
    State(state): State<AppState>,
    Query(params): Query<ParentParams>,
) -> Result<Response, ApiError> {
    let class_id = params.require(Level::Class)?;
    let subclasses = state
        .sedna
        .subclasses(class_id)
        .await
        .map_err(|e| ApiError::from_sedna(Listing::Subclasses, e))?;
    Ok(with_cache_control(subclasses, cache::HIERARCHY))
}
