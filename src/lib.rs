//! Hotel Booking API
//!
//! Room catalog, nightly pricing, availability and bookings for a small
//! hotel, backed by a spreadsheet acting as the database.
//!
//! - `sheets/`: spreadsheet backends (Google Sheets REST, in-memory, TTL cache)
//! - `pricing`: stay filtering, availability and price quotes over Pricing rows
//! - `fallback`: built-in catalog and flat rates used when the sheet is unavailable
//! - `api_server`: Axum router and handlers

pub mod api_server;
pub mod config;
pub mod dates;
pub mod error;
pub mod fallback;
pub mod models;
pub mod pricing;
pub mod sheets;

// Re-export commonly used types
pub use api_server::{create_router, AppState};
pub use config::Config;
pub use error::{AppError, SheetError};
pub use models::{PriceQuote, Record};
pub use sheets::{CachedSheets, GoogleSheets, MemorySheets, SheetStore};
