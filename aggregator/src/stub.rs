//! Stub GDS provider producing deterministic offers after a fixed delay.
//!
//! Used for load testing the orchestration path and as the default
//! provider set until real GDS connectors are wired in.

use crate::provider::{Provider, ProviderError};
use crate::sro::Sro;
use crate::trip::{
    FareRules, ProviderInfo, Trip, TripBooking, TripMetadata, TripPrices, TripSegment,
};
use crate::trips::Trips;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveTime, TimeZone, Utc};
use std::time::Duration;

pub struct StubGds {
    name: String,
    delay: Duration,
    offers: u32,
}

impl StubGds {
    pub fn new(name: impl Into<String>, delay: Duration, offers: u32) -> Self {
        Self {
            name: name.into(),
            delay,
            offers,
        }
    }

    fn fabricate(&self, request: &Sro, index: u32) -> Trip {
        let base_price = 5_000.0 + f64::from(index) * 250.0;
        let segments: Vec<TripSegment> = request
            .segments
            .iter()
            .enumerate()
            .map(|(direction, seg)| {
                let departure = Utc
                    .from_utc_datetime(&seg.date.and_time(NaiveTime::MIN))
                    + ChronoDuration::hours(8 + i64::from(index) % 12);
                TripSegment {
                    flight_number: format!("ST{}{index:02}", direction + 1),
                    carrier: "ST".to_string(),
                    operating_carrier: "ST".to_string(),
                    departure: crate::trip::FlightPoint {
                        airport: seg.origin.clone(),
                        terminal: None,
                        time: departure,
                    },
                    arrival: crate::trip::FlightPoint {
                        airport: seg.destination.clone(),
                        terminal: None,
                        time: departure + ChronoDuration::minutes(150),
                    },
                    duration_minutes: 150,
                    cabin_class: request.class,
                    fare_code: "YSTUB".to_string(),
                    baggage: Default::default(),
                    direction: direction as u8,
                }
            })
            .collect();

        Trip {
            cache_id: format!("{}-{index}", self.name),
            provider: ProviderInfo {
                name: self.name.clone(),
                gds: self.name.clone(),
                validating_carrier: "ST".to_string(),
            },
            segments,
            prices: TripPrices {
                price: base_price,
                search_price: base_price,
                fare: base_price * 0.8,
                taxes: base_price * 0.2,
                service_fee: 0.0,
                currency: request
                    .metadata
                    .currency
                    .clone()
                    .unwrap_or_else(|| "RUB".to_string()),
            },
            rules: FareRules::default(),
            metadata: TripMetadata {
                route_duration_minutes: 150 * request.segments.len() as u32,
                transfers: 0,
                has_baggage: false,
            },
            booking: TripBooking {
                expires_at: Utc::now() + ChronoDuration::minutes(30),
                ticketing_time_limit: Utc::now() + ChronoDuration::hours(24),
            },
            sro: Some(request.clone()),
        }
    }
}

#[async_trait]
impl Provider for StubGds {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, request: &Sro) -> Result<Trips, ProviderError> {
        tokio::time::sleep(self.delay).await;

        let mut trips = Trips::new();
        for index in 0..self.offers {
            trips.add(self.fabricate(request, index));
        }
        Ok(trips)
    }
}
