//! Shared record builders for unit tests.

use crate::models::{ListingDetails, ListingRecord, PropertyDetails, VehicleDetails};
use chrono::{DateTime, Utc};

/// Fixed evaluation time used across tests
pub fn as_of() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-06-17T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn base(id: &str, price: f64, details: ListingDetails) -> ListingRecord {
    ListingRecord {
        id: id.to_string(),
        image: format!("https://img.example/{}.jpg", id),
        url: format!("https://auction.example/{}", id),
        end_date: "2030-01-01T00:00:00Z".to_string(),
        updated_at: "2025-06-15T12:00:00Z".to_string(),
        scraped_at: "2025-06-10T12:00:00Z".to_string(),
        initial_bid_value: price,
        appraised_value: None,
        city: String::new(),
        state: String::new(),
        origin: "Judicial".to_string(),
        stage: "1st Round".to_string(),
        format: "In-person".to_string(),
        source_site: String::new(),
        docs: Vec::new(),
        details,
    }
}

/// An active apartment in São Paulo
pub fn property(id: &str, price: f64) -> ListingRecord {
    let mut record = base(
        id,
        price,
        ListingDetails::Property(PropertyDetails {
            property_type: Some("Apartment".to_string()),
            useful_area_m2: Some(85.0),
            address: Some("Av. Paulista, 1000".to_string()),
        }),
    );
    record.city = "São Paulo".to_string();
    record.state = "SP".to_string();
    record.source_site = "Auction House A".to_string();
    record
}

/// An active car in Belo Horizonte
pub fn vehicle(id: &str, price: f64) -> ListingRecord {
    let mut record = base(
        id,
        price,
        ListingDetails::Vehicle(VehicleDetails {
            vehicle_type: Some("Car".to_string()),
            brand: Some("Fiat".to_string()),
            model: Some("Uno".to_string()),
            color: Some("Red".to_string()),
            year: Some(2015),
        }),
    );
    record.city = "Belo Horizonte".to_string();
    record.state = "MG".to_string();
    record.source_site = "Auction House B".to_string();
    record
}
