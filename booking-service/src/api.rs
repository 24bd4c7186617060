use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use shared::db::DbPool;
use shared::models::{Booking, NewBooking};
use shared::schema::{bookings, stations};

const DEFAULT_LOCATION: &str = "Stockholm";

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    location: Option<String>,
}

#[derive(Debug, Queryable, Serialize)]
pub struct SearchResult {
    station_id: i32,
    name: String,
    location: String,
    available: i32,
}

#[derive(Debug, Deserialize)]
pub struct BookRequest {
    user: String,
    station_id: i32,
    time: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    id: i32,
    user: String,
    station_id: i32,
    time: String,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            user: booking.user_name,
            station_id: booking.station_id,
            time: booking.time.to_rfc3339(),
        }
    }
}

enum BookError {
    NoSlots,
    Db(diesel::result::Error),
}

impl From<diesel::result::Error> for BookError {
    fn from(e: diesel::result::Error) -> Self {
        BookError::Db(e)
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/search", get(search_stations))
        .route("/book", post(book_station))
        .route("/bookings", get(list_bookings))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
}

async fn search_stations(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    let location = search_location(params);
    let mut conn = state.pool.get().await.map_err(internal_error)?;

    // Exact case-sensitive match, same contract as the directory's location field.
    let rows = stations::table
        .filter(stations::location.eq(&location))
        .select((
            stations::id,
            stations::name,
            stations::location,
            stations::available,
        ))
        .load::<SearchResult>(&mut conn)
        .await
        .map_err(internal_error)?;

    Ok(Json(rows))
}

async fn book_station(
    State(state): State<AppState>,
    body: Result<Json<BookRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let Json(request) = body.map_err(bad_request)?;
    let station_id = request.station_id;
    let new_booking = NewBooking {
        user_name: request.user,
        station_id,
        time: request.time.unwrap_or_else(Utc::now),
    };

    let mut conn = state.pool.get().await.map_err(internal_error)?;

    let result = conn
        .transaction::<Booking, BookError, _>(|conn| {
            Box::pin(async move {
                // The conditional decrement is the availability check: zero
                // affected rows means the station is unknown or has no free
                // slot, and concurrent bookings cannot drive the counter
                // negative because each must win its own matching row.
                let claimed = diesel::update(
                    stations::table
                        .filter(stations::id.eq(station_id))
                        .filter(stations::available.gt(0)),
                )
                .set(stations::available.eq(stations::available - 1))
                .execute(conn)
                .await?;

                if claimed == 0 {
                    return Err(BookError::NoSlots);
                }

                let booking = diesel::insert_into(bookings::table)
                    .values(&new_booking)
                    .get_result::<Booking>(conn)
                    .await?;

                Ok(booking)
            })
        })
        .await;

    match result {
        Ok(booking) => {
            tracing::info!(booking_id = booking.id, station_id, "created booking");
            Ok((StatusCode::CREATED, Json(booking.into())))
        }
        Err(BookError::NoSlots) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No available slots".to_string(),
            }),
        )),
        Err(BookError::Db(e)) => Err(internal_error(e)),
    }
}

async fn list_bookings(
    State(state): State<AppState>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let mut conn = state.pool.get().await.map_err(internal_error)?;
    let rows = bookings::table
        .load::<Booking>(&mut conn)
        .await
        .map_err(internal_error)?;
    Ok(Json(rows.into_iter().map(BookingResponse::from).collect()))
}

fn search_location(params: SearchParams) -> String {
    params
        .location
        .unwrap_or_else(|| DEFAULT_LOCATION.to_string())
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
