use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::db;
use crate::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let db_ok = db::ping(&state.db).await;

    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "database": if db_ok { "connected" } else { "disconnected" },
    }))
}
