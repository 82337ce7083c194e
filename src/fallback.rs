//! Hardcoded catalog and rates served when the spreadsheet is unavailable

use std::collections::BTreeMap;

use crate::dates::{StayRange, REQUEST_DATE_FORMAT};
use crate::models::{PriceQuote, PricingRow, RoomType};

pub const STANDARD: &str = "Standard";
pub const DELUXE: &str = "Deluxe";
pub const SUITE: &str = "Suite";

pub const ROOM_TYPES: [&str; 3] = [STANDARD, DELUXE, SUITE];

/// Single occupancy pays this percentage of the double rate.
pub const SINGLE_OCCUPANCY_PERCENT: i64 = 70;
pub const EXTRA_PERSON_FEE: i64 = 50;
pub const BREAKFAST_FEE: i64 = 25;
pub const MOCK_AVAILABLE_ROOMS: i64 = 5;

/// Double-occupancy nightly rate; unknown room types price as Standard.
pub fn base_rate(room_type: &str) -> i64 {
    match room_type {
        DELUXE => 200,
        SUITE => 300,
        _ => 150,
    }
}

/// Single occupancy is 70% of the base rate, truncated to whole currency.
pub fn single_rate(room_type: &str) -> i64 {
    base_rate(room_type) * SINGLE_OCCUPANCY_PERCENT / 100
}

/// `with_images` is false when a configured spreadsheet failed; the image
/// files only ship with the offline bundle.
pub fn fallback_rooms(with_images: bool) -> Vec<RoomType> {
    let room = |room_type: &str, max_occupancy: u32, description: &str, image: &str| RoomType {
        room_type: room_type.to_string(),
        max_occupancy,
        base_price: base_rate(room_type),
        description: description.to_string(),
        image_url: if with_images {
            image.to_string()
        } else {
            String::new()
        },
    };

    vec![
        room(
            STANDARD,
            2,
            "Comfortable standard room with modern amenities",
            "standard-room.jpg",
        ),
        room(
            DELUXE,
            3,
            "Spacious deluxe room with premium features",
            "deluxe-room.jpg",
        ),
        room(
            SUITE,
            4,
            "Luxurious suite with separate living area",
            "suite-room.jpg",
        ),
    ]
}

/// One row per night and room type, at the flat rates.
pub fn mock_pricing(stay: &StayRange) -> Vec<PricingRow> {
    stay.days()
        .flat_map(|day| {
            ROOM_TYPES.into_iter().map(move |room_type| PricingRow {
                date: day.format(REQUEST_DATE_FORMAT).to_string(),
                room_type: room_type.to_string(),
                single_rate: single_rate(room_type),
                double_rate: base_rate(room_type),
                extra_person: EXTRA_PERSON_FEE,
                with_breakfast: BREAKFAST_FEE,
                available_rooms: MOCK_AVAILABLE_ROOMS,
            })
        })
        .collect()
}

pub fn default_availability() -> BTreeMap<String, i64> {
    BTreeMap::from([
        (STANDARD.to_string(), 5),
        (DELUXE.to_string(), 3),
        (SUITE.to_string(), 2),
    ])
}

pub fn flat_rate_quote(room_type: &str, adults: u32, breakfast: bool, nights: i64) -> PriceQuote {
    let nightly = if adults == 1 {
        single_rate(room_type)
    } else {
        base_rate(room_type) + i64::from(adults.saturating_sub(2)) * EXTRA_PERSON_FEE
    };

    let mut total = nightly * nights;
    if breakfast {
        total += nights * BREAKFAST_FEE;
    }

    PriceQuote::new(total as f64, nights)
}
