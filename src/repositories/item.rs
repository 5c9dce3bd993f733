//! Helpers for reading and writing DynamoDB attribute maps.

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::str::FromStr;

use crate::models::{RepositoryError, RepositoryResult};

pub type Item = HashMap<String, AttributeValue>;

pub fn put_string(item: &mut Item, key: &str, value: &str) {
    item.insert(key.to_string(), AttributeValue::S(value.to_string()));
}

pub fn put_optional_number<T: ToString>(item: &mut Item, key: &str, value: Option<T>) {
    if let Some(value) = value {
        item.insert(key.to_string(), AttributeValue::N(value.to_string()));
    }
}

pub fn put_optional_datetime(item: &mut Item, key: &str, value: Option<DateTime<Utc>>) {
    if let Some(value) = value {
        item.insert(key.to_string(), AttributeValue::S(value.to_rfc3339()));
    }
}

pub fn required_string(item: &Item, key: &str) -> RepositoryResult<String> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| RepositoryError::InvalidItem {
            message: format!("Missing {}", key),
        })
}

/// Parse an optional numeric attribute; present but unparseable values are an error
pub fn optional_number<T: FromStr>(item: &Item, key: &str) -> RepositoryResult<Option<T>> {
    match item.get(key).and_then(|v| v.as_n().ok()) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| RepositoryError::InvalidItem {
                message: format!("Invalid {}", key),
            }),
        None => Ok(None),
    }
}

pub fn optional_datetime(item: &Item, key: &str) -> Option<DateTime<Utc>> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_optional_number_absent_and_invalid() {
        let mut item = Item::new();
        assert_eq!(optional_number::<i32>(&item, "quantity_on_hand").unwrap(), None);

        item.insert(
            "quantity_on_hand".to_string(),
            AttributeValue::N("abc".to_string()),
        );
        assert!(optional_number::<i32>(&item, "quantity_on_hand").is_err());
    }

    #[test]
    fn test_put_and_read_back() {
        let mut item = Item::new();
        let now = Utc::now();
        put_string(&mut item, "id", "b-1");
        put_optional_number(&mut item, "price", Some(Decimal::new(1299, 2)));
        put_optional_datetime(&mut item, "created_date", Some(now));
        put_optional_datetime(&mut item, "last_modified_date", None);

        assert_eq!(required_string(&item, "id").unwrap(), "b-1");
        assert_eq!(
            optional_number::<Decimal>(&item, "price").unwrap(),
            Some(Decimal::new(1299, 2))
        );
        assert_eq!(
            optional_datetime(&item, "created_date").map(|d| d.timestamp_millis()),
            Some(now.timestamp_millis())
        );
        assert!(!item.contains_key("last_modified_date"));
    }
}
