//! SeaORM entities for the `car` and `engine` tables plus the single-table
//! row operations the service layer builds on.

pub mod errors;
pub mod db;
pub mod engine;
pub mod car;

#[cfg(test)]
mod tests;
