//! JSON handlers for the daily schedule.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;
use serde::Serialize;

use prayerbridge_app::planner::PlanOutcome;
use prayerbridge_app::ports::{AccessorySink, Clock, PrayerTimesSource};
use prayerbridge_app::schedule_engine::PlannedPulse;
use prayerbridge_domain::prayer::PrayerKey;
use prayerbridge_domain::timetable::DailyTimeSet;

use crate::state::AppState;

/// One armed pulse; `at` is RFC 3339 with the local offset.
#[derive(Debug, Serialize)]
pub struct ArmedPulse {
    pub prayer: PrayerKey,
    pub at: String,
}

impl From<&PlannedPulse> for ArmedPulse {
    fn from(pulse: &PlannedPulse) -> Self {
        Self {
            prayer: pulse.prayer,
            at: pulse.at.to_rfc3339(),
        }
    }
}

/// Body of `GET /api/schedule`.
#[derive(Debug, Serialize)]
pub struct ScheduleBody {
    pub date: Option<NaiveDate>,
    pub times: Option<DailyTimeSet>,
    pub armed: Vec<ArmedPulse>,
}

/// Body of `POST /api/plan`.
#[derive(Debug, Serialize)]
pub struct PlanBody {
    pub date: NaiveDate,
    pub scheduled: bool,
    pub armed: Vec<ArmedPulse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_in_secs: Option<u64>,
}

impl From<PlanOutcome> for PlanBody {
    fn from(outcome: PlanOutcome) -> Self {
        match outcome {
            PlanOutcome::Scheduled { date, armed } => Self {
                date,
                scheduled: true,
                armed: armed.iter().map(ArmedPulse::from).collect(),
                error: None,
                retry_in_secs: None,
            },
            PlanOutcome::RetryArmed {
                date,
                error,
                retry_in,
            } => Self {
                date,
                scheduled: false,
                armed: Vec::new(),
                error: Some(error.to_string()),
                retry_in_secs: Some(retry_in.as_secs()),
            },
        }
    }
}

/// Possible responses from the schedule endpoints.
pub enum ScheduleResponse {
    Current(Json<ScheduleBody>),
    Planned(Json<PlanBody>),
}

impl IntoResponse for ScheduleResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Current(json) => json.into_response(),
            Self::Planned(json) => json.into_response(),
        }
    }
}

/// `GET /api/schedule`
pub async fn current<F, C, S>(State(state): State<AppState<F, C, S>>) -> ScheduleResponse
where
    F: PrayerTimesSource + 'static,
    C: Clock + 'static,
    S: AccessorySink + 'static,
{
    let plan = state.planner.current();
    let armed = state.engine().armed();
    ScheduleResponse::Current(Json(ScheduleBody {
        date: plan.as_ref().map(|p| p.date),
        times: plan.map(|p| p.times),
        armed: armed.iter().map(ArmedPulse::from).collect(),
    }))
}

/// `POST /api/plan`
///
/// A failed attempt is still a `200`: the planner has armed its retry and
/// the body says so.
pub async fn plan<F, C, S>(State(state): State<AppState<F, C, S>>) -> ScheduleResponse
where
    F: PrayerTimesSource + 'static,
    C: Clock + 'static,
    S: AccessorySink + 'static,
{
    tracing::info!("manual re-plan requested");
    let outcome = state.planner.plan_today().await;
    ScheduleResponse::Planned(Json(PlanBody::from(outcome)))
}
