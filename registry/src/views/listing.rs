use num_format::{Locale, ToFormattedString};
use serde::Serialize;

use crate::{consts::consts::VERIFIED_STATUS, model::registration::Registration};

pub const EMPTY_STATE: &str = "No completed registrations yet. Be the first to register!";

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ListingRow {
    pub index: usize,
    pub full_name: String,
    pub age: i32,
    pub country: String,
    pub registered_on: String,
    pub status: &'static str,
    /// Showcase columns, only filled when the listing shows them
    pub gender: Option<String>,
    pub amount_paid: Option<String>,
}

/// Table of registrants whose form has been uploaded
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Listing {
    pub rows: Vec<ListingRow>,
    pub showcase_columns: bool,
}

fn format_amount(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;

    format!(
        "${}.{:02}",
        (cents / 100).to_formatted_string(&Locale::en),
        (cents % 100).abs()
    )
}

impl Listing {
    /// Rows are numbered in the order given, callers pass them newest first
    pub fn new(registrations: &[Registration], showcase_columns: bool) -> Self {
        let rows = registrations
            .iter()
            .enumerate()
            .map(|(i, registration)| ListingRow {
                index: i + 1,
                full_name: registration.full_name(),
                age: registration.age,
                country: registration.country.clone(),
                registered_on: registration.registered_on(),
                status: VERIFIED_STATUS,
                gender: showcase_columns
                    .then(|| registration.gender.map(|g| g.label().to_string()))
                    .flatten(),
                amount_paid: showcase_columns
                    .then(|| registration.amount_paid.map(format_amount))
                    .flatten(),
            })
            .collect();

        Listing {
            rows,
            showcase_columns,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn summary(&self) -> String {
        let noun = if self.len() == 1 { "person" } else { "people" };

        format!(
            "{} registered {} with completed forms.",
            self.len().to_formatted_string(&Locale::en),
            noun
        )
    }
}
