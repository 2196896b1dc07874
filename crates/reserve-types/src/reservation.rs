//! Reservation state and the human-facing reservation number.

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Availability label stored in a product's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityStatus {
	InStock,
	Available,
	Reserved,
	Other(String),
}

impl AvailabilityStatus {
	/// Canonical string form written to the metadata store.
	pub const RESERVED: &'static str = "Reserved";
	/// Value written back when a product returns to stock.
	pub const IN_STOCK: &'static str = "In stock";

	pub fn parse(value: &str) -> Self {
		match value {
			Self::IN_STOCK => AvailabilityStatus::InStock,
			"Available" => AvailabilityStatus::Available,
			Self::RESERVED => AvailabilityStatus::Reserved,
			other => AvailabilityStatus::Other(other.to_string()),
		}
	}

	pub fn is_reserved(&self) -> bool {
		matches!(self, AvailabilityStatus::Reserved)
	}
}

impl fmt::Display for AvailabilityStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AvailabilityStatus::InStock => write!(f, "{}", Self::IN_STOCK),
			AvailabilityStatus::Available => write!(f, "Available"),
			AvailabilityStatus::Reserved => write!(f, "{}", Self::RESERVED),
			AvailabilityStatus::Other(s) => write!(f, "{}", s),
		}
	}
}

/// What the reservation check learned about a product.
///
/// `product_id` is `None` when the variant lookup failed; the check treats
/// that as "not reserved" so a backend hiccup never blocks a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductReservationState {
	pub product_id: Option<i64>,
	pub is_reserved: bool,
}

impl ProductReservationState {
	pub fn unknown() -> Self {
		Self {
			product_id: None,
			is_reserved: false,
		}
	}
}

/// Human-facing correlation token, format `RES-YYMMDD-NNNN`.
///
/// Not globally unique: the 4-digit suffix is drawn uniformly from
/// [1000, 9999] and collisions across days or within a busy day are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationNumber(String);

impl ReservationNumber {
	pub fn generate<R: Rng>(date: NaiveDate, rng: &mut R) -> Self {
		let suffix: u16 = rng.gen_range(1000..=9999);
		Self(format!("RES-{}-{}", date.format("%y%m%d"), suffix))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ReservationNumber {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;

	#[test]
	fn reservation_number_format() {
		let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
		let mut rng = rand::thread_rng();
		let pattern = regex::Regex::new(r"^RES-\d{6}-\d{4}$").unwrap();

		for _ in 0..100 {
			let number = ReservationNumber::generate(date, &mut rng);
			assert!(pattern.is_match(number.as_str()), "bad format: {}", number);
			assert!(number.as_str().starts_with("RES-250307-"));

			let suffix: u16 = number.as_str()[11..].parse().unwrap();
			assert!((1000..=9999).contains(&suffix));
		}
	}

	#[test]
	fn availability_round_trips_known_labels() {
		assert!(AvailabilityStatus::parse("Reserved").is_reserved());
		assert!(!AvailabilityStatus::parse("In stock").is_reserved());
		assert!(!AvailabilityStatus::parse("Available").is_reserved());
		assert!(!AvailabilityStatus::parse("something else").is_reserved());
		assert_eq!(AvailabilityStatus::Reserved.to_string(), "Reserved");
	}
}
