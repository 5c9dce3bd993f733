use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Beer document as stored in the beers table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beer {
    pub id: String,
    pub beer_name: String,
    pub beer_style: String,
    pub upc: String,
    pub quantity_on_hand: Option<i32>,
    pub price: Option<Decimal>,
    pub created_date: Option<DateTime<Utc>>,
    pub last_modified_date: Option<DateTime<Utc>>,
}

/// Transport representation of a beer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeerDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub beer_name: String,
    #[serde(default)]
    pub beer_style: String,
    #[serde(default)]
    pub upc: String,
    #[serde(default)]
    pub quantity_on_hand: Option<i32>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_modified_date: Option<DateTime<Utc>>,
}

/// Partial update for a beer; absent fields are left untouched
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeerPatchDto {
    #[serde(default)]
    pub beer_name: Option<String>,
    #[serde(default)]
    pub beer_style: Option<String>,
    #[serde(default)]
    pub upc: Option<String>,
    #[serde(default)]
    pub quantity_on_hand: Option<i32>,
    #[serde(default)]
    pub price: Option<Decimal>,
}

impl Beer {
    /// Generate a fresh document identifier
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Stamp creation and modification dates for a newly persisted beer
    pub fn mark_created(&mut self) {
        let now = Utc::now();
        if self.created_date.is_none() {
            self.created_date = Some(now);
        }
        self.last_modified_date = Some(now);
    }

    /// Replace every mutable field with the values from a full DTO
    pub fn apply_update(&mut self, dto: BeerDto) {
        self.beer_name = dto.beer_name;
        self.beer_style = dto.beer_style;
        self.upc = dto.upc;
        self.quantity_on_hand = dto.quantity_on_hand;
        self.price = dto.price;
        self.last_modified_date = Some(Utc::now());
    }

    /// Apply only the fields carried by the patch
    pub fn apply_patch(&mut self, patch: BeerPatchDto) {
        if let Some(beer_name) = patch.beer_name {
            self.beer_name = beer_name;
        }
        if let Some(beer_style) = patch.beer_style {
            self.beer_style = beer_style;
        }
        if let Some(upc) = patch.upc {
            self.upc = upc;
        }
        if let Some(quantity) = patch.quantity_on_hand {
            self.quantity_on_hand = Some(quantity);
        }
        if let Some(price) = patch.price {
            self.price = Some(price);
        }
        self.last_modified_date = Some(Utc::now());
    }
}
