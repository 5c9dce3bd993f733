// Mappers - document <-> transport conversions

mod beer_mapper;
mod customer_mapper;
