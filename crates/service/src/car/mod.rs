//! Car + engine aggregate: domain types, validation, repository contracts and
//! the service that sequences the two stores.

pub mod domain;
pub mod validation;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::{Brand, Car, Engine, FuelType};
pub use service::CarService;
