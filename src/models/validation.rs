use rust_decimal::Decimal;

use super::{
    BeerDto, BeerPatchDto, CustomerDto, CustomerPatchDto, ValidationError, ValidationResult,
};

/// Trait for validating input models
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

/// Validation constants
pub const MIN_BEER_NAME_LENGTH: usize = 3;
pub const MAX_BEER_NAME_LENGTH: usize = 255;
pub const MIN_BEER_STYLE_LENGTH: usize = 1;
pub const MAX_BEER_STYLE_LENGTH: usize = 255;
pub const MIN_UPC_LENGTH: usize = 1;
pub const MAX_UPC_LENGTH: usize = 25;
pub const MIN_CUSTOMER_NAME_LENGTH: usize = 3;
pub const MAX_CUSTOMER_NAME_LENGTH: usize = 255;

impl Validate for BeerDto {
    fn validate(&self) -> ValidationResult<()> {
        validate_beer_name(&self.beer_name)?;
        validate_beer_style(&self.beer_style)?;
        validate_upc(&self.upc)?;
        if let Some(quantity) = self.quantity_on_hand {
            validate_quantity_on_hand(quantity)?;
        }
        if let Some(price) = &self.price {
            validate_price(price)?;
        }
        Ok(())
    }
}

impl Validate for BeerPatchDto {
    fn validate(&self) -> ValidationResult<()> {
        if let Some(beer_name) = &self.beer_name {
            validate_beer_name(beer_name)?;
        }
        if let Some(beer_style) = &self.beer_style {
            validate_beer_style(beer_style)?;
        }
        if let Some(upc) = &self.upc {
            validate_upc(upc)?;
        }
        if let Some(quantity) = self.quantity_on_hand {
            validate_quantity_on_hand(quantity)?;
        }
        if let Some(price) = &self.price {
            validate_price(price)?;
        }
        Ok(())
    }
}

impl Validate for CustomerDto {
    fn validate(&self) -> ValidationResult<()> {
        validate_customer_name(&self.customer_name)
    }
}

impl Validate for CustomerPatchDto {
    fn validate(&self) -> ValidationResult<()> {
        match &self.customer_name {
            Some(name) => validate_customer_name(name),
            None => Ok(()),
        }
    }
}

/// Check a required text field against length bounds
fn validate_text(field: &str, value: &str, min: usize, max: usize) -> ValidationResult<()> {
    let trimmed = value.trim();
    let length = trimmed.chars().count();

    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: field.to_string(),
        });
    }

    if length < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min_length: min,
            actual_length: length,
        });
    }

    if length > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max_length: max,
            actual_length: length,
        });
    }

    Ok(())
}

/// Validate beer name
pub fn validate_beer_name(name: &str) -> ValidationResult<()> {
    validate_text("beerName", name, MIN_BEER_NAME_LENGTH, MAX_BEER_NAME_LENGTH)?;

    if name
        .trim()
        .chars()
        .any(|c| c.is_control() && c != '\n' && c != '\r' && c != '\t')
    {
        return Err(ValidationError::InvalidValue {
            field: "beerName".to_string(),
            value: name.to_string(),
            reason: "Contains invalid control characters".to_string(),
        });
    }

    Ok(())
}

/// Validate beer style
pub fn validate_beer_style(style: &str) -> ValidationResult<()> {
    validate_text(
        "beerStyle",
        style,
        MIN_BEER_STYLE_LENGTH,
        MAX_BEER_STYLE_LENGTH,
    )
}

/// Validate universal product code
pub fn validate_upc(upc: &str) -> ValidationResult<()> {
    validate_text("upc", upc, MIN_UPC_LENGTH, MAX_UPC_LENGTH)
}

pub fn validate_quantity_on_hand(quantity: i32) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::OutOfRange {
            field: "quantityOnHand".to_string(),
            min: "0".to_string(),
            value: quantity.to_string(),
        });
    }
    Ok(())
}

pub fn validate_price(price: &Decimal) -> ValidationResult<()> {
    if *price < Decimal::ZERO {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: "0".to_string(),
            value: price.to_string(),
        });
    }
    Ok(())
}

/// Validate customer name
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    validate_text(
        "customerName",
        name,
        MIN_CUSTOMER_NAME_LENGTH,
        MAX_CUSTOMER_NAME_LENGTH,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn create_valid_beer_dto() -> BeerDto {
        BeerDto {
            beer_name: "Mango Bobs".to_string(),
            beer_style: "IPA".to_string(),
            upc: "0631234200036".to_string(),
            quantity_on_hand: Some(12),
            price: Some(dec!(11.99)),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_beer_name() {
        assert!(validate_beer_name("Galaxy Cat").is_ok());
        assert!(matches!(
            validate_beer_name("   "),
            Err(ValidationError::RequiredField { .. })
        ));
        assert!(matches!(
            validate_beer_name("ab"),
            Err(ValidationError::TooShort { .. })
        ));
        assert!(matches!(
            validate_beer_name(&"a".repeat(256)),
            Err(ValidationError::TooLong { .. })
        ));
        assert!(matches!(
            validate_beer_name("bad\u{0007}name"),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validate_upc() {
        assert!(validate_upc("123").is_ok());
        assert!(validate_upc("").is_err());
        assert!(validate_upc(&"9".repeat(26)).is_err());
    }

    #[test]
    fn test_validate_price_and_quantity() {
        assert!(validate_price(&dec!(0)).is_ok());
        assert!(validate_price(&dec!(9.99)).is_ok());
        assert!(validate_price(&dec!(-0.01)).is_err());
        assert!(validate_quantity_on_hand(0).is_ok());
        assert!(validate_quantity_on_hand(-1).is_err());
    }

    #[test]
    fn test_beer_dto_validation() {
        assert!(create_valid_beer_dto().validate().is_ok());

        let mut dto = create_valid_beer_dto();
        dto.beer_style = String::new();
        assert!(dto.validate().is_err());

        let mut dto = create_valid_beer_dto();
        dto.price = None;
        dto.quantity_on_hand = None;
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_beer_patch_validation() {
        assert!(BeerPatchDto::default().validate().is_ok());

        let patch = BeerPatchDto {
            beer_name: Some("x".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        let patch = BeerPatchDto {
            quantity_on_hand: Some(-5),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_customer_validation() {
        let dto = CustomerDto {
            customer_name: "Peter Parker".to_string(),
            ..Default::default()
        };
        assert!(dto.validate().is_ok());

        let dto = CustomerDto::default();
        assert!(dto.validate().is_err());

        let patch = CustomerPatchDto {
            customer_name: Some("Al".to_string()),
        };
        assert!(patch.validate().is_err());
        assert!(CustomerPatchDto::default().validate().is_ok());
    }
}
