//! Service layer providing the car/engine business operations on top of models.
//! - Separates business logic from data access via repository traits.
//! - Reuses entity definitions and row operations from the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod car;
#[cfg(test)]
pub mod test_support;
