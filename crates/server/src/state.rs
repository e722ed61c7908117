use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::car::repo::seaorm::{SeaOrmCarRepository, SeaOrmEngineRepository};
use service::car::repository::{CarRepository, EngineRepository};
use service::car::CarService;

/// Car service over type-erased stores, so tests can swap in the fakes.
pub type DynCarService = CarService<dyn CarRepository, dyn EngineRepository>;

#[derive(Clone)]
pub struct ServerState {
    pub cars: Arc<DynCarService>,
}

impl ServerState {
    pub fn new(cars: Arc<dyn CarRepository>, engines: Arc<dyn EngineRepository>) -> Self {
        Self { cars: Arc::new(CarService::new(cars, engines)) }
    }

    /// Wire the SeaORM stores over one shared pool.
    pub fn from_db(db: DatabaseConnection) -> Self {
        Self::new(
            Arc::new(SeaOrmCarRepository { db: db.clone() }),
            Arc::new(SeaOrmEngineRepository { db }),
        )
    }
}
