//! `GET /api/schedule`: events for one subclass.

use axum::extract::{Query, State};
use axum::response::Response;
use serde::Deserialize;

use crate::sedna::{Level, Listing};
use crate::state::AppState;
use crate::web::error::ApiError;
use crate::web::routes::{cache, with_cache_control};

/// Largest day window forwarded to the portal.
pub const MAX_DAY_WINDOW: u32 = 366;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleParams {
    pub subclass_id: Option<String>,
    /// Kept as text so a malformed value gets our own 400 message.
    pub jours: Option<String>,
}

impl ScheduleParams {
    fn day_window(&self, default: u32) -> Result<u32, ApiError> {
        let Some(raw) = self.jours.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(default);
        };
        match raw.parse::<u32>() {
            Ok(days) if (1..=MAX_DAY_WINDOW).contains(&days) => Ok(days),
            _ => Err(ApiError::bad_request(format!(
                "jours must be a number of days between 1 and {MAX_DAY_WINDOW}"
            ))),
        }
    }
}

pub(super) async fn schedule(
    State(state): State<AppState>,
    Query(params): Query<ScheduleParams>,
) -> Result<Response, ApiError> {
    let subclass_id = params
        .subclass_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::missing_id(Level::Subclass))?;
    let days = params.day_window(state.default_day_window)?;

    let events = state
        .sedna
        .schedule(subclass_id, days)
        .await
        .map_err(|e| ApiError::from_sedna(Listing::Schedule, e))?;
    Ok(with_cache_control(events, cache::SCHEDULE))
}
