// Google Sheets Client Tests
//
// Purpose: Exercise GoogleSheets against a local stub of the Sheets v4
// values API (bound to an ephemeral port), including startup through
// AppState::from_config.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use hotel_booking_api::{AppState, Config, GoogleSheets, SheetError, SheetStore};
use parking_lot::Mutex;
use serde_json::{json, Value};

const TOKEN: &str = "test-token";
const SHEET_ID: &str = "sheet-123";

type Tabs = Arc<Mutex<HashMap<String, Vec<Vec<Value>>>>>;

fn authorized(headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {}", TOKEN);
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        == Some(expected.as_str())
}

async fn metadata(Path(id): Path<String>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if id != SHEET_ID {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({"spreadsheetId": id, "properties": {"title": "Hotel"}})).into_response()
}

async fn read_values(
    State(tabs): State<Tabs>,
    Path((_id, range)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    assert_eq!(params.get("valueRenderOption").map(String::as_str), Some("FORMATTED_VALUE"));

    match tabs.lock().get(&range) {
        // The real API omits `values` for an empty tab
        Some(rows) if rows.is_empty() => Json(json!({"range": range})).into_response(),
        Some(rows) => Json(json!({"range": range, "values": rows})).into_response(),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"message": format!("Unable to parse range: {}", range)}})),
        )
            .into_response(),
    }
}

async fn append_values(
    State(tabs): State<Tabs>,
    Path((_id, range)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let Some(tab) = range.strip_suffix(":append") else {
        return StatusCode::NOT_FOUND.into_response();
    };
    assert_eq!(params.get("valueInputOption").map(String::as_str), Some("USER_ENTERED"));

    let mut tabs = tabs.lock();
    let Some(rows) = tabs.get_mut(tab) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    // USER_ENTERED: the sheet stores what a user would have typed
    for row in body["values"].as_array().cloned().unwrap_or_default() {
        let cells = row
            .as_array()
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|cell| match cell {
                Value::String(s) => Value::String(s),
                other => Value::String(other.to_string()),
            })
            .collect();
        rows.push(cells);
    }

    Json(json!({"spreadsheetId": SHEET_ID, "updates": {"updatedRows": 1}})).into_response()
}

fn seeded_tabs() -> Tabs {
    let mut tabs = HashMap::new();
    tabs.insert(
        "Rooms".to_string(),
        vec![
            vec![json!("Room_Type"), json!("Max_Occupancy"), json!("Base_Price")],
            vec![json!("Suite"), json!("4"), json!("310")],
        ],
    );
    tabs.insert(
        "Bookings".to_string(),
        vec![vec![json!("Booking_ID"), json!("Guest_Name")]],
    );
    Arc::new(Mutex::new(tabs))
}

/// Serve the stub on an ephemeral port and return its base URL.
async fn spawn_stub(tabs: Tabs) -> String {
    let app = Router::new()
        .route("/v4/spreadsheets/:id", get(metadata))
        .route(
            "/v4/spreadsheets/:id/values/:range",
            get(read_values).post(append_values),
        )
        .with_state(tabs);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_connect_and_read_records() {
    let base = spawn_stub(seeded_tabs()).await;
    let sheets = GoogleSheets::connect(&base, SHEET_ID, Some(TOKEN.to_string()))
        .await
        .unwrap();
    assert_eq!(sheets.spreadsheet_id(), SHEET_ID);

    let rooms = sheets.records("Rooms").await.unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["Room_Type"], "Suite");
    assert_eq!(rooms[0]["Max_Occupancy"], 4);
    assert_eq!(rooms[0]["Base_Price"], 310);
}

#[tokio::test]
async fn test_connect_rejects_bad_token() {
    let base = spawn_stub(seeded_tabs()).await;
    let result = GoogleSheets::connect(&base, SHEET_ID, Some("wrong".to_string())).await;
    assert!(matches!(result, Err(SheetError::Status { status: 401, .. })));
}

#[tokio::test]
async fn test_unknown_tab() {
    let base = spawn_stub(seeded_tabs()).await;
    let sheets = GoogleSheets::new(&base, SHEET_ID, Some(TOKEN.to_string())).unwrap();
    assert!(matches!(
        sheets.records("Pricing").await,
        Err(SheetError::TabNotFound(tab)) if tab == "Pricing"
    ));
}

#[tokio::test]
async fn test_append_row_round_trips_through_values_api() {
    let tabs = seeded_tabs();
    let base = spawn_stub(tabs.clone()).await;
    let sheets = GoogleSheets::new(&base, SHEET_ID, Some(TOKEN.to_string())).unwrap();

    assert!(sheets.records("Bookings").await.unwrap().is_empty());

    sheets
        .append_row("Bookings", vec![json!(1), json!("Ada Lovelace")])
        .await
        .unwrap();

    let bookings = sheets.records("Bookings").await.unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["Booking_ID"], 1);
    assert_eq!(bookings[0]["Guest_Name"], "Ada Lovelace");
    assert_eq!(tabs.lock()["Bookings"].len(), 2);
}

#[tokio::test]
async fn test_state_from_config_connects() {
    let base = spawn_stub(seeded_tabs()).await;
    let config = Config {
        spreadsheet_id: Some(SHEET_ID.to_string()),
        sheets_access_token: Some(TOKEN.to_string()),
        sheets_api_base: base,
        sheet_cache_ttl: Duration::from_secs(5),
        ..Config::default()
    };

    let state = AppState::from_config(&config).await.unwrap();
    let sheets = state.sheets.expect("spreadsheet should be connected");
    assert_eq!(sheets.records("Rooms").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_state_from_config_falls_back_when_unreachable() {
    let base = spawn_stub(seeded_tabs()).await;
    let config = Config {
        spreadsheet_id: Some("missing-sheet".to_string()),
        sheets_access_token: Some(TOKEN.to_string()),
        sheets_api_base: base,
        ..Config::default()
    };

    let state = AppState::from_config(&config).await.unwrap();
    assert!(state.sheets.is_none());
}

#[tokio::test]
async fn test_state_without_spreadsheet_id() {
    let state = AppState::from_config(&Config::default()).await.unwrap();
    assert!(state.sheets.is_none());
}
