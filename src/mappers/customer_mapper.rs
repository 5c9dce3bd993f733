use crate::models::{Customer, CustomerDto};

impl From<Customer> for CustomerDto {
    fn from(customer: Customer) -> Self {
        Self {
            id: Some(customer.id),
            customer_name: customer.customer_name,
            created_date: customer.created_date,
            last_modified_date: customer.last_modified_date,
        }
    }
}

impl From<CustomerDto> for Customer {
    fn from(dto: CustomerDto) -> Self {
        Self {
            id: dto.id.unwrap_or_default(),
            customer_name: dto.customer_name,
            created_date: dto.created_date,
            last_modified_date: dto.last_modified_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_mapping_both_ways() {
        let customer = Customer {
            id: "c-7".to_string(),
            customer_name: "Natasha Romanoff".to_string(),
            created_date: Some(chrono::Utc::now()),
            last_modified_date: None,
        };

        let dto = CustomerDto::from(customer.clone());
        assert_eq!(dto.id.as_deref(), Some("c-7"));
        assert_eq!(dto.customer_name, "Natasha Romanoff");
        assert_eq!(dto.created_date, customer.created_date);

        assert_eq!(Customer::from(dto), customer);
    }
}
