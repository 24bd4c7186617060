use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, put};
use axum::Router;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Serialize;
use shared::db::DbPool;
use shared::models::{Station, StationFields};
use shared::schema::stations;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/stations", get(list_stations).post(create_station))
        .route("/stations/:id", put(update_station))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
}

async fn list_stations(State(state): State<AppState>) -> Result<Json<Vec<Station>>, ApiError> {
    let mut conn = state.pool.get().await.map_err(internal_error)?;
    let rows = stations::table
        .load::<Station>(&mut conn)
        .await
        .map_err(internal_error)?;
    Ok(Json(rows))
}

async fn create_station(
    State(state): State<AppState>,
    body: Result<Json<StationFields>, JsonRejection>,
) -> Result<(StatusCode, Json<Station>), ApiError> {
    let Json(fields) = body.map_err(bad_request)?;
    let mut conn = state.pool.get().await.map_err(internal_error)?;

    let station = diesel::insert_into(stations::table)
        .values(&fields)
        .get_result::<Station>(&mut conn)
        .await
        .map_err(internal_error)?;

    tracing::info!(station_id = station.id, "created station");
    Ok((StatusCode::CREATED, Json(station)))
}

async fn update_station(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Result<Json<StationFields>, JsonRejection>,
) -> Result<Json<Station>, ApiError> {
    let Json(fields) = body.map_err(bad_request)?;
    let mut conn = state.pool.get().await.map_err(internal_error)?;

    let updated = diesel::update(stations::table.find(id))
        .set(&fields)
        .get_result::<Station>(&mut conn)
        .await
        .optional()
        .map_err(internal_error)?;

    match updated {
        Some(station) => Ok(Json(station)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Station not found".to_string(),
            }),
        )),
    }
}

fn bad_request(rejection: JsonRejection) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: rejection.body_text(),
        }),
    )
}

fn internal_error<E: std::fmt::Display>(e: E) -> ApiError {
    tracing::error!("database error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "internal server error".to_string(),
        }),
    )
}
