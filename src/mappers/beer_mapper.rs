use crate::models::{Beer, BeerDto};

impl From<Beer> for BeerDto {
    fn from(beer: Beer) -> Self {
        Self {
            id: Some(beer.id),
            beer_name: beer.beer_name,
            beer_style: beer.beer_style,
            upc: beer.upc,
            quantity_on_hand: beer.quantity_on_hand,
            price: beer.price,
            created_date: beer.created_date,
            last_modified_date: beer.last_modified_date,
        }
    }
}

impl From<BeerDto> for Beer {
    fn from(dto: BeerDto) -> Self {
        Self {
            id: dto.id.unwrap_or_default(),
            beer_name: dto.beer_name,
            beer_style: dto.beer_style,
            upc: dto.upc,
            quantity_on_hand: dto.quantity_on_hand,
            price: dto.price,
            created_date: dto.created_date,
            last_modified_date: dto.last_modified_date,
        }
    }
}
