//! Place domain model.

use serde::{Deserialize, Serialize};

/// A bookable place as returned by the backend.
///
/// Immutable from the client's perspective: this crate only ever reads
/// collections of places, it never writes one back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// Backend identifier (the backend serializes it as `_id`)
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    pub address: String,
    /// Photo URLs in display order
    pub photos: Vec<String>,
    pub description: String,
    pub perks: Vec<String>,
    #[serde(default)]
    pub extra_info: String,
    /// Check-in hour of day (e.g. 14 for 2pm)
    pub check_in: u8,
    /// Check-out hour of day
    pub check_out: u8,
    pub max_guests: u32,
    /// Nightly price in whole currency units
    pub price: u32,
    /// Backend id of the owning user
    pub owner: String,
}
