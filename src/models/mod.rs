// Re-export all model types
pub use self::beer::*;
pub use self::customer::*;
pub use self::errors::*;
pub use self::validation::*;

mod beer;
mod customer;
mod errors;
mod validation;
