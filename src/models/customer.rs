use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Customer document as stored in the customers table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub customer_name: String,
    pub created_date: Option<DateTime<Utc>>,
    pub last_modified_date: Option<DateTime<Utc>>,
}

/// Transport representation of a customer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_modified_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatchDto {
    #[serde(default)]
    pub customer_name: Option<String>,
}

impl Customer {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn mark_created(&mut self) {
        let now = Utc::now();
        if self.created_date.is_none() {
            self.created_date = Some(now);
        }
        self.last_modified_date = Some(now);
    }

    pub fn apply_update(&mut self, dto: CustomerDto) {
        self.customer_name = dto.customer_name;
        self.last_modified_date = Some(Utc::now());
    }

    pub fn apply_patch(&mut self, patch: CustomerPatchDto) {
        if let Some(customer_name) = patch.customer_name {
            self.customer_name = customer_name;
        }
        self.last_modified_date = Some(Utc::now());
    }
}
