use std::sync::Arc;
use tracing::instrument;

use crate::models::{Beer, BeerDto, BeerPatchDto, ServiceError, ServiceResult, Validate};
use crate::repositories::BeerRepository;

/// Service for managing the beer catalogue
pub struct BeerService {
    repository: Arc<dyn BeerRepository>,
}

impl BeerService {
    pub fn new(repository: Arc<dyn BeerRepository>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn list_beers(&self) -> ServiceResult<Vec<BeerDto>> {
        crate::info_with_trace!("Listing beers");

        let beers = self.repository.find_all().await?;

        crate::info_with_trace!("Found {} beers", beers.len());
        Ok(beers.into_iter().map(BeerDto::from).collect())
    }

    #[instrument(skip(self), fields(beer_style = %beer_style))]
    pub async fn find_by_beer_style(&self, beer_style: &str) -> ServiceResult<Vec<BeerDto>> {
        crate::info_with_trace!("Listing beers by style");

        let beers = self.repository.find_by_beer_style(beer_style).await?;

        crate::info_with_trace!("Found {} beers for style {}", beers.len(), beer_style);
        Ok(beers.into_iter().map(BeerDto::from).collect())
    }

    #[instrument(skip(self), fields(beer_name = %beer_name))]
    pub async fn find_first_by_beer_name(&self, beer_name: &str) -> ServiceResult<Option<BeerDto>> {
        crate::info_with_trace!("Looking up beer by name");

        Ok(self
            .repository
            .find_first_by_beer_name(beer_name)
            .await?
            .map(BeerDto::from))
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_beer_by_id(&self, id: &str) -> ServiceResult<BeerDto> {
        crate::info_with_trace!("Retrieving beer");

        self.find_existing(id).await.map(BeerDto::from)
    }

    /// Persist a new beer, assigning an id when the caller did not supply one
    #[instrument(skip(self, dto), fields(beer_name = %dto.beer_name))]
    pub async fn save_new_beer(&self, mut dto: BeerDto) -> ServiceResult<BeerDto> {
        crate::info_with_trace!("Creating new beer");

        dto.validate()?;

        if dto.id.as_deref().map_or(true, |id| id.trim().is_empty()) {
            dto.id = Some(Beer::generate_id());
        }

        let mut beer = Beer::from(dto);
        beer.mark_created();

        let saved = self.repository.save(beer).await?;

        crate::info_with_trace!("Beer created successfully with ID: {}", saved.id);
        Ok(BeerDto::from(saved))
    }

    /// Replace the mutable fields of an existing beer
    #[instrument(skip(self, dto), fields(id = %id))]
    pub async fn update_beer(&self, id: &str, dto: BeerDto) -> ServiceResult<BeerDto> {
        crate::info_with_trace!("Updating beer");

        let mut beer = self.find_existing(id).await?;
        dto.validate()?;

        beer.apply_update(dto);
        let saved = self.repository.save(beer).await?;

        crate::info_with_trace!("Beer updated successfully");
        Ok(BeerDto::from(saved))
    }

    #[instrument(skip(self, patch), fields(id = %id))]
    pub async fn patch_beer(&self, id: &str, patch: BeerPatchDto) -> ServiceResult<BeerDto> {
        crate::info_with_trace!("Patching beer");

        let mut beer = self.find_existing(id).await?;
        patch.validate()?;

        beer.apply_patch(patch);
        let saved = self.repository.save(beer).await?;

        crate::info_with_trace!("Beer patched successfully");
        Ok(BeerDto::from(saved))
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_beer_by_id(&self, id: &str) -> ServiceResult<()> {
        crate::info_with_trace!("Deleting beer");

        if !self.repository.exists_by_id(id).await? {
            crate::warn_with_trace!("Beer not found");
            return Err(ServiceError::BeerNotFound { id: id.to_string() });
        }

        self.repository.delete_by_id(id).await?;

        crate::info_with_trace!("Beer deleted successfully");
        Ok(())
    }

    async fn find_existing(&self, id: &str) -> ServiceResult<Beer> {
        match self.repository.find_by_id(id).await? {
            Some(beer) => Ok(beer),
            None => {
                crate::warn_with_trace!("Beer not found");
                Err(ServiceError::BeerNotFound { id: id.to_string() })
            }
        }
    }
}
