// Wire and spreadsheet records
//
// Room and pricing structs serialize with the spreadsheet's column names so
// fallback data and live tab records look identical to clients.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use validator::Validate;

/// One spreadsheet row keyed by the header row.
pub type Record = Map<String, Value>;

// ============================================================================
// Spreadsheet tabs
// ============================================================================

pub const ROOMS_TAB: &str = "Rooms";
pub const PRICING_TAB: &str = "Pricing";
pub const BOOKINGS_TAB: &str = "Bookings";

pub const COL_DATE: &str = "Date";
pub const COL_ROOM_TYPE: &str = "Room_Type";
pub const COL_SINGLE_RATE: &str = "Single_Rate";
pub const COL_DOUBLE_RATE: &str = "Double_Rate";
pub const COL_EXTRA_PERSON: &str = "Extra_Person";
pub const COL_WITH_BREAKFAST: &str = "With_Breakfast";
pub const COL_AVAILABLE_ROOMS: &str = "Available_Rooms";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomType {
    #[serde(rename = "Room_Type")]
    pub room_type: String,
    #[serde(rename = "Max_Occupancy")]
    pub max_occupancy: u32,
    #[serde(rename = "Base_Price")]
    pub base_price: i64,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Image_URL")]
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Room_Type")]
    pub room_type: String,
    #[serde(rename = "Single_Rate")]
    pub single_rate: i64,
    #[serde(rename = "Double_Rate")]
    pub double_rate: i64,
    #[serde(rename = "Extra_Person")]
    pub extra_person: i64,
    #[serde(rename = "With_Breakfast")]
    pub with_breakfast: i64,
    #[serde(rename = "Available_Rooms")]
    pub available_rooms: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Confirmed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "Confirmed",
        }
    }
}

/// A reservation as appended to the Bookings tab.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: u64,
    pub guest_name: String,
    pub email: String,
    pub phone: String,
    pub check_in: String,
    pub check_out: String,
    pub room_type: String,
    pub adults: u32,
    pub breakfast: bool,
    pub total_amount: f64,
    pub status: BookingStatus,
}

impl Booking {
    /// Column order of the Bookings tab.
    pub fn to_row(&self) -> Vec<Value> {
        vec![
            Value::from(self.id),
            Value::from(self.guest_name.clone()),
            Value::from(self.email.clone()),
            Value::from(self.phone.clone()),
            Value::from(self.check_in.clone()),
            Value::from(self.check_out.clone()),
            Value::from(self.room_type.clone()),
            Value::from(self.adults),
            Value::from(self.breakfast),
            Value::from(self.total_amount),
            Value::from(self.status.as_str()),
        ]
    }
}

// ============================================================================
// Request payloads
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct StayRequest {
    pub check_in: String,
    pub check_out: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceRequest {
    pub check_in: String,
    pub check_out: String,
    #[serde(default)]
    pub room_type: String,
    #[serde(default = "default_adults", deserialize_with = "deserialize_count")]
    pub adults: u32,
    #[serde(default)]
    pub breakfast: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookingRequest {
    #[validate(length(min = 1))]
    pub guest_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
    pub check_in: String,
    pub check_out: String,
    #[validate(length(min = 1))]
    pub room_type: String,
    #[validate(range(min = 1))]
    #[serde(default = "default_adults", deserialize_with = "deserialize_count")]
    pub adults: u32,
    #[serde(default)]
    pub breakfast: bool,
    #[serde(default)]
    pub total_amount: f64,
}

fn default_adults() -> u32 {
    1
}

/// The booking form posts input values verbatim, so counts arrive either as
/// JSON numbers or as numeric strings (`"2"`).
fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u32),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid count '{}'", s))),
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    #[serde(serialize_with = "serialize_amount")]
    pub total_price: f64,
    pub nights: i64,
    pub price_per_night: f64,
}

impl PriceQuote {
    pub fn new(total_price: f64, nights: i64) -> Self {
        let price_per_night = if nights > 0 {
            total_price / nights as f64
        } else {
            0.0
        };

        Self {
            total_price,
            nights,
            price_per_night,
        }
    }
}

/// Whole amounts go out as JSON integers (`210`, not `210.0`), matching the
/// integer cells clients get from the spreadsheet.
fn serialize_amount<S>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if amount.fract() == 0.0 && amount.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*amount as i64)
    } else {
        serializer.serialize_f64(*amount)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub success: bool,
    pub booking_id: u64,
    pub message: String,
}

impl BookingConfirmation {
    pub fn confirmed(booking_id: u64) -> Self {
        Self {
            success: true,
            booking_id,
            message: "Booking confirmed successfully!".to_string(),
        }
    }
}
