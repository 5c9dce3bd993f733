use std::sync::Arc;
use tracing::instrument;

use crate::models::{
    Customer, CustomerDto, CustomerPatchDto, ServiceError, ServiceResult, Validate,
};
use crate::repositories::CustomerRepository;

/// Service for managing customers
pub struct CustomerService {
    repository: Arc<dyn CustomerRepository>,
}

impl CustomerService {
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn list_customers(&self) -> ServiceResult<Vec<CustomerDto>> {
        crate::info_with_trace!("Listing customers");

        let customers = self.repository.find_all().await?;

        crate::info_with_trace!("Found {} customers", customers.len());
        Ok(customers.into_iter().map(CustomerDto::from).collect())
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_customer_by_id(&self, id: &str) -> ServiceResult<CustomerDto> {
        self.find_existing(id).await.map(CustomerDto::from)
    }

    #[instrument(skip(self, dto), fields(customer_name = %dto.customer_name))]
    pub async fn save_new_customer(&self, mut dto: CustomerDto) -> ServiceResult<CustomerDto> {
        crate::info_with_trace!("Creating new customer");

        dto.validate()?;

        if dto.id.as_deref().map_or(true, |id| id.trim().is_empty()) {
            dto.id = Some(Customer::generate_id());
        }

        let mut customer = Customer::from(dto);
        customer.mark_created();

        let saved = self.repository.save(customer).await?;

        crate::info_with_trace!("Customer created successfully with ID: {}", saved.id);
        Ok(CustomerDto::from(saved))
    }

    #[instrument(skip(self, dto), fields(id = %id))]
    pub async fn update_customer(&self, id: &str, dto: CustomerDto) -> ServiceResult<CustomerDto> {
        crate::info_with_trace!("Updating customer");

        let mut customer = self.find_existing(id).await?;
        dto.validate()?;

        customer.apply_update(dto);
        let saved = self.repository.save(customer).await?;

        Ok(CustomerDto::from(saved))
    }

    #[instrument(skip(self, patch), fields(id = %id))]
    pub async fn patch_customer(
        &self,
        id: &str,
        patch: CustomerPatchDto,
    ) -> ServiceResult<CustomerDto> {
        crate::info_with_trace!("Patching customer");

        let mut customer = self.find_existing(id).await?;
        patch.validate()?;

        customer.apply_patch(patch);
        let saved = self.repository.save(customer).await?;

        Ok(CustomerDto::from(saved))
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_customer_by_id(&self, id: &str) -> ServiceResult<()> {
        crate::info_with_trace!("Deleting customer");

        if !self.repository.exists_by_id(id).await? {
            crate::warn_with_trace!("Customer not found");
            return Err(ServiceError::CustomerNotFound { id: id.to_string() });
        }

        self.repository.delete_by_id(id).await?;
        Ok(())
    }

    async fn find_existing(&self, id: &str) -> ServiceResult<Customer> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::CustomerNotFound { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RepositoryError;
    use async_trait::async_trait;
    use mockall::{mock, predicate::eq};

    mock! {
        TestCustomerRepository {}

        #[async_trait]
        impl CustomerRepository for TestCustomerRepository {
            async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError>;
            async fn find_by_id(&self, id: &str) -> Result<Option<Customer>, RepositoryError>;
            async fn save(&self, customer: Customer) -> Result<Customer, RepositoryError>;
            async fn delete_by_id(&self, id: &str) -> Result<(), RepositoryError>;
            async fn exists_by_id(&self, id: &str) -> Result<bool, RepositoryError>;
            async fn count(&self) -> Result<usize, RepositoryError>;
        }
    }

    fn create_test_customer() -> Customer {
        Customer {
            id: "c-1".to_string(),
            customer_name: "Peter Parker".to_string(),
            created_date: None,
            last_modified_date: None,
        }
    }

    #[tokio::test]
    async fn test_save_new_customer_keeps_supplied_id() {
        let mut mock_repo = MockTestCustomerRepository::new();
        mock_repo.expect_save().times(1).returning(Ok);

        let service = CustomerService::new(Arc::new(mock_repo));
        let dto = CustomerDto {
            id: Some("fixed-id".to_string()),
            customer_name: "Tony Stark".to_string(),
            ..Default::default()
        };

        let saved = service.save_new_customer(dto).await.unwrap();
        assert_eq!(saved.id.as_deref(), Some("fixed-id"));
        assert!(saved.created_date.is_some());
    }

    #[tokio::test]
    async fn test_save_new_customer_rejects_blank_name() {
        let mut mock_repo = MockTestCustomerRepository::new();
        mock_repo.expect_save().never();

        let service = CustomerService::new(Arc::new(mock_repo));
        let dto = CustomerDto {
            customer_name: "  ".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            service.save_new_customer(dto).await,
            Err(ServiceError::ValidationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_customer_not_found() {
        let mut mock_repo = MockTestCustomerRepository::new();
        mock_repo
            .expect_find_by_id()
            .with(eq("ghost"))
            .returning(|_| Ok(None));

        let service = CustomerService::new(Arc::new(mock_repo));
        assert!(matches!(
            service.get_customer_by_id("ghost").await,
            Err(ServiceError::CustomerNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_patch_customer_without_fields_keeps_name() {
        let mut mock_repo = MockTestCustomerRepository::new();
        let existing = create_test_customer();

        mock_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        mock_repo.expect_save().times(1).returning(Ok);

        let service = CustomerService::new(Arc::new(mock_repo));
        let patched = service
            .patch_customer("c-1", CustomerPatchDto::default())
            .await
            .unwrap();

        assert_eq!(patched.customer_name, "Peter Parker");
        assert!(patched.last_modified_date.is_some());
    }

    #[tokio::test]
    async fn test_update_customer_replaces_name() {
        let mut mock_repo = MockTestCustomerRepository::new();
        let existing = create_test_customer();

        mock_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        mock_repo.expect_save().times(1).returning(Ok);

        let service = CustomerService::new(Arc::new(mock_repo));
        let dto = CustomerDto {
            customer_name: "Miles Morales".to_string(),
            ..Default::default()
        };
        let updated = service.update_customer("c-1", dto).await.unwrap();

        assert_eq!(updated.id.as_deref(), Some("c-1"));
        assert_eq!(updated.customer_name, "Miles Morales");
    }

    #[tokio::test]
    async fn test_update_customer_rejects_short_name_without_saving() {
        let mut mock_repo = MockTestCustomerRepository::new();
        let existing = create_test_customer();

        mock_repo
            .expect_find_by_id()
            .with(eq("c-1"))
            .returning(move |_| Ok(Some(existing.clone())));
        mock_repo.expect_save().never();

        let service = CustomerService::new(Arc::new(mock_repo));
        let dto = CustomerDto {
            customer_name: "Al".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            service.update_customer("c-1", dto).await,
            Err(ServiceError::ValidationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_customer_is_not_found() {
        let mut mock_repo = MockTestCustomerRepository::new();
        mock_repo.expect_exists_by_id().returning(|_| Ok(false));
        mock_repo.expect_delete_by_id().never();

        let service = CustomerService::new(Arc::new(mock_repo));
        assert!(matches!(
            service.delete_customer_by_id("c-404").await,
            Err(ServiceError::CustomerNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_customers() {
        let mut mock_repo = MockTestCustomerRepository::new();
        let customers = vec![create_test_customer()];
        mock_repo
            .expect_find_all()
            .returning(move || Ok(customers.clone()));

        let service = CustomerService::new(Arc::new(mock_repo));
        let listed = service.list_customers().await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].customer_name, "Peter Parker");
    }
}
