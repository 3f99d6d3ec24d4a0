//! Trip value objects: one priced itinerary as returned by a provider.

use crate::sro::{Sro, TravelClass};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One fare offer from one provider.
///
/// `cache_id` is assigned by the provider and treated as an opaque
/// deduplication key; nothing here couples it to the offer content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub cache_id: String,
    pub provider: ProviderInfo,
    pub segments: Vec<TripSegment>,
    pub prices: TripPrices,
    pub rules: FareRules,
    pub metadata: TripMetadata,
    pub booking: TripBooking,
    pub sro: Option<Sro>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub name: String,
    pub gds: String,
    pub validating_carrier: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSegment {
    pub flight_number: String,
    pub carrier: String,
    pub operating_carrier: String,
    pub departure: FlightPoint,
    pub arrival: FlightPoint,
    pub duration_minutes: u32,
    pub cabin_class: TravelClass,
    pub fare_code: String,
    pub baggage: BaggageInfo,
    /// 0 for the forward leg, 1 for the return leg.
    pub direction: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightPoint {
    pub airport: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    pub time: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaggageInfo {
    pub pieces: u32,
    pub weight_kg: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPrices {
    pub price: f64,
    pub search_price: f64,
    pub fare: f64,
    pub taxes: f64,
    pub service_fee: f64,
    pub currency: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareRules {
    pub refundable: bool,
    pub exchangeable: bool,
    pub refund_amount: f64,
    pub exchange_fee: f64,
    pub penalty: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripMetadata {
    pub route_duration_minutes: u32,
    pub transfers: u32,
    pub has_baggage: bool,
}

/// Booking-window limits reported by the provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripBooking {
    pub expires_at: DateTime<Utc>,
    pub ticketing_time_limit: DateTime<Utc>,
}

impl Trip {
    pub fn price(&self) -> f64 {
        self.prices.price
    }

    pub fn has_baggage(&self) -> bool {
        self.metadata.has_baggage
    }

    pub fn route_duration_minutes(&self) -> u32 {
        self.metadata.route_duration_minutes
    }

    /// Segments of the forward leg only.
    pub fn forward_segments(&self) -> impl Iterator<Item = &TripSegment> {
        self.segments.iter().filter(|s| s.direction == 0)
    }
}
