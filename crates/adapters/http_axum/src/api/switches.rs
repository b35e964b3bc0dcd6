//! JSON handlers for the prayer switches.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use prayerbridge_app::ports::{AccessorySink, Clock, PrayerTimesSource};
use prayerbridge_domain::prayer::PrayerKey;
use prayerbridge_domain::switch::{SwitchService, SwitchSnapshot};

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<SwitchSnapshot>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the single-switch endpoints.
pub enum GetResponse {
    Ok(Json<SwitchSnapshot>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/switches`
pub async fn list<F, C, S>(State(state): State<AppState<F, C, S>>) -> ListResponse
where
    F: PrayerTimesSource + 'static,
    C: Clock + 'static,
    S: AccessorySink + 'static,
{
    ListResponse::Ok(Json(state.switchboard().snapshots()))
}

/// `GET /api/switches/{prayer}`
pub async fn get<F, C, S>(
    State(state): State<AppState<F, C, S>>,
    Path(prayer): Path<String>,
) -> Result<GetResponse, ApiError>
where
    F: PrayerTimesSource + 'static,
    C: Clock + 'static,
    S: AccessorySink + 'static,
{
    let prayer: PrayerKey = prayer.parse()?;
    Ok(GetResponse::Ok(Json(
        state.switchboard().get(prayer).snapshot(),
    )))
}

/// `POST /api/switches/{prayer}/{service}`
///
/// Writes the switch the way a paired controller would: the value is stored
/// and mirrored, no pulse is started.
pub async fn call_service<F, C, S>(
    State(state): State<AppState<F, C, S>>,
    Path((prayer, service)): Path<(String, String)>,
) -> Result<GetResponse, ApiError>
where
    F: PrayerTimesSource + 'static,
    C: Clock + 'static,
    S: AccessorySink + 'static,
{
    let prayer: PrayerKey = prayer.parse()?;
    let service: SwitchService = service.parse()?;
    tracing::info!(%prayer, ?service, "switch service called");
    let snapshot = state.switchboard().handle_service(prayer, service).await?;
    Ok(GetResponse::Ok(Json(snapshot)))
}
