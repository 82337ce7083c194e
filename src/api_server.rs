// Axum API Server Module
//
// Purpose: room catalog, pricing, availability and booking endpoints over the
// spreadsheet, answering from fallback data when no spreadsheet is connected.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tokio::sync::Mutex;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use validator::Validate;

use crate::config::Config;
use crate::dates::StayRange;
use crate::error::{AppError, SheetError};
use crate::fallback;
use crate::models::{
    Booking, BookingConfirmation, BookingRequest, BookingStatus, PriceQuote, PriceRequest,
    StayRequest, BOOKINGS_TAB, PRICING_TAB, ROOMS_TAB,
};
use crate::pricing;
use crate::sheets::{CachedSheets, GoogleSheets, SheetStore};

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    /// `None` when no spreadsheet is configured or it was unreachable at
    /// startup; read endpoints then serve fallback data.
    pub sheets: Option<Arc<dyn SheetStore>>,
    pub static_dir: PathBuf,
    /// Serializes id allocation with the append so one process never hands
    /// out the same booking id twice.
    booking_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(sheets: Option<Arc<dyn SheetStore>>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            sheets,
            static_dir: static_dir.into(),
            booking_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Connect to the configured spreadsheet once. A failed connection is
    /// logged and the server runs with limited functionality.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let Some(spreadsheet_id) = config.spreadsheet_id.as_deref() else {
            tracing::warn!("SPREADSHEET_ID not set, serving fallback data only");
            return Ok(Self::new(None, config.static_dir.clone()));
        };

        tracing::info!("Connecting to spreadsheet {}...", spreadsheet_id);
        let sheets = match GoogleSheets::connect(
            &config.sheets_api_base,
            spreadsheet_id,
            config.sheets_access_token.clone(),
        )
        .await
        {
            Ok(sheets) => sheets,
            Err(e) => {
                tracing::error!("Error connecting to spreadsheet: {}", e);
                tracing::warn!("Application will run with limited functionality");
                return Ok(Self::new(None, config.static_dir.clone()));
            }
        };

        let store: Arc<dyn SheetStore> = if config.sheet_cache_ttl.is_zero() {
            Arc::new(sheets)
        } else {
            tracing::info!(
                "Caching {} and {} tabs for {}s",
                ROOMS_TAB,
                PRICING_TAB,
                config.sheet_cache_ttl.as_secs()
            );
            Arc::new(CachedSheets::new(
                sheets,
                config.sheet_cache_ttl,
                &[ROOMS_TAB, PRICING_TAB],
            ))
        };

        Ok(Self::new(Some(store), config.static_dir.clone()))
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    let index = ServeFile::new(state.static_dir.join("index.html"));
    let assets = ServeDir::new(&state.static_dir);

    Router::new()
        // Landing page and its assets
        .route_service("/", index)
        .nest_service("/static", assets)

        .route("/health", get(health_check))

        .route("/api/rooms", get(get_rooms))
        .route("/api/pricing", post(get_pricing))
        .route("/api/availability", post(check_availability))
        .route("/api/calculate-price", post(calculate_price))
        .route("/api/book", post(make_booking))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "spreadsheet": if state.sheets.is_some() { "connected" } else { "fallback" },
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Never fails: spreadsheet errors are logged and the built-in catalog is
/// served instead.
async fn get_rooms(State(state): State<AppState>) -> Response {
    let Some(sheets) = &state.sheets else {
        return Json(fallback::fallback_rooms(true)).into_response();
    };

    match sheets.records(ROOMS_TAB).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => {
            tracing::error!("Error in get_rooms: {}", e);
            Json(fallback::fallback_rooms(false)).into_response()
        }
    }
}

async fn get_pricing(
    State(state): State<AppState>,
    payload: Result<Json<StayRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    let stay = StayRange::parse(&request.check_in, &request.check_out)?;

    let Some(sheets) = &state.sheets else {
        return Ok(Json(fallback::mock_pricing(&stay)).into_response());
    };

    let records = sheets.records(PRICING_TAB).await.map_err(|e| {
        tracing::error!("Error in get_pricing: {}", e);
        e
    })?;

    Ok(Json(pricing::filter_pricing(records, &stay)).into_response())
}

/// Without a spreadsheet the default counts are returned before the request
/// body is read, so malformed dates still get the defaults.
async fn check_availability(
    State(state): State<AppState>,
    payload: Result<Json<StayRequest>, JsonRejection>,
) -> Result<Json<BTreeMap<String, i64>>, AppError> {
    let Some(sheets) = &state.sheets else {
        return Ok(Json(fallback::default_availability()));
    };

    let Json(request) = payload?;
    let stay = StayRange::parse(&request.check_in, &request.check_out)?;

    let records = sheets.records(PRICING_TAB).await.map_err(|e| {
        tracing::error!("Error in check_availability: {}", e);
        e
    })?;

    Ok(Json(pricing::aggregate_availability(&records, &stay)))
}

async fn calculate_price(
    State(state): State<AppState>,
    payload: Result<Json<PriceRequest>, JsonRejection>,
) -> Result<Json<PriceQuote>, AppError> {
    let Json(request) = payload?;
    let stay = StayRange::parse(&request.check_in, &request.check_out)?;

    let Some(sheets) = &state.sheets else {
        let room_type = pricing::normalize_room_type(&request.room_type);
        let quote = fallback::flat_rate_quote(
            &room_type,
            request.adults,
            request.breakfast,
            stay.nights(),
        );
        return Ok(Json(quote));
    };

    let records = sheets.records(PRICING_TAB).await.map_err(|e| {
        tracing::error!("Error in calculate_price: {}", e);
        e
    })?;

    Ok(Json(pricing::quote_from_rows(&records, &request, &stay)))
}

async fn make_booking(
    State(state): State<AppState>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Json<BookingConfirmation>, AppError> {
    let Json(request) = payload?;
    request.validate()?;

    let stay = StayRange::parse(&request.check_in, &request.check_out)?;
    if stay.nights() <= 0 {
        return Err(AppError::Validation(
            "Check-out must be after check-in".to_string(),
        ));
    }

    let sheets = state.sheets.as_ref().ok_or(SheetError::NotConfigured)?;

    let _guard = state.booking_lock.lock().await;

    let existing = sheets.records(BOOKINGS_TAB).await.map_err(|e| {
        tracing::error!("Error in make_booking: {}", e);
        e
    })?;
    let booking_id = existing.len() as u64 + 1;

    let booking = Booking {
        id: booking_id,
        guest_name: request.guest_name,
        email: request.email,
        phone: request.phone,
        check_in: request.check_in,
        check_out: request.check_out,
        room_type: request.room_type,
        adults: request.adults,
        breakfast: request.breakfast,
        total_amount: request.total_amount,
        status: BookingStatus::Confirmed,
    };

    sheets.append_row(BOOKINGS_TAB, booking.to_row()).await.map_err(|e| {
        tracing::error!("Failed to append booking {}: {}", booking_id, e);
        e
    })?;

    tracing::info!(
        "Booking {} confirmed: {} for {} nights",
        booking_id,
        booking.room_type,
        stay.nights()
    );

    Ok(Json(BookingConfirmation::confirmed(booking_id)))
}
