use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use route_core::entities::habit::{self, Habit, HabitDraft};
use route_core::entity::Entity;
use route_core::{list, RouteError};
use serde::{Deserialize, Serialize};

use super::with_store;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitBoard {
    pub habits: Vec<Habit>,
    pub today: NaiveDate,
    pub done_today: usize,
    pub total: usize,
}

#[derive(Debug, Default, Deserialize)]
struct ToggleBody {
    date: Option<NaiveDate>,
}

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// GET /api/habits: habits plus today's completion count.
pub async fn list_habits(State(app): State<AppState>) -> Result<Json<HabitBoard>, AppError> {
    let habits = with_store(&app, |store| Ok(store.hydrate::<Habit>()?.items)).await?;
    let today = today();
    let (done_today, total) = habit::completion_on(&habits, today);
    Ok(Json(HabitBoard {
        habits,
        today,
        done_today,
        total,
    }))
}

/// POST /api/habits
pub async fn create_habit(
    State(app): State<AppState>,
    Json(draft): Json<HabitDraft>,
) -> Result<Json<Habit>, AppError> {
    let created = draft.into_habit()?;
    let record = created.clone();
    with_store(&app, move |store| {
        store.hydrate::<Habit>()?;
        store.mutate::<Habit, _>(Habit::SLOT, |habits| Ok(list::add(habits, record)))
    })
    .await?;
    Ok(Json(created))
}

/// POST /api/habits/{id}/toggle: body `{"date": "YYYY-MM-DD"}` is optional
/// and defaults to today (UTC).
pub async fn toggle_habit(
    State(app): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Habit>, AppError> {
    let parsed: ToggleBody = if body.iter().all(u8::is_ascii_whitespace) {
        ToggleBody::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::bad_request(format!("invalid toggle body: {e}")))?
    };
    let day = parsed.date.unwrap_or_else(today);
    let toggled = with_store(&app, move |store| {
        store.hydrate::<Habit>()?;
        let habits =
            store.mutate::<Habit, _>(Habit::SLOT, |habits| habit::toggle_habit(habits, &id, day))?;
        list::find(&habits, &id)
            .cloned()
            .ok_or_else(|| RouteError::not_found(Habit::KIND, &id))
    })
    .await?;
    tracing::debug!(habit = %toggled.id, %day, streak = toggled.streak, "toggled habit");
    Ok(Json(toggled))
}

/// DELETE /api/habits/{id}
pub async fn delete_habit(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = id.clone();
    with_store(&app, move |store| {
        store.hydrate::<Habit>()?;
        store.mutate::<Habit, _>(Habit::SLOT, |habits| {
            list::find(habits, &id).ok_or_else(|| RouteError::not_found(Habit::KIND, &id))?;
            Ok(list::remove(habits, &id))
        })
    })
    .await?;
    Ok(Json(serde_json::json!({ "deleted": removed })))
}
