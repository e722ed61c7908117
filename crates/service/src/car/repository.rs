use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{Car, Engine};
use crate::errors::ServiceError;

/// Single-table access to car rows.
///
/// Rows carry no engine data beyond the correlated id, so cars returned here
/// have `engine.id` set and the remaining engine fields zeroed.
#[async_trait]
pub trait CarRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Car, ServiceError>;
    /// Exact brand match; an empty brand is `MissingParameter`.
    async fn list_by_brand(&self, brand: &str) -> Result<Vec<Car>, ServiceError>;
    /// Insert under `car.id`, which the caller has already set.
    async fn create(&self, car: &Car) -> Result<Car, ServiceError>;
    async fn update(&self, id: Uuid, car: &Car) -> Result<Car, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<(), ServiceError>;
}

/// Single-table access to engine rows, sharing the car id space.
#[async_trait]
pub trait EngineRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Engine, ServiceError>;
    /// Insert under a freshly generated id, returned in the result.
    async fn create(&self, engine: &Engine) -> Result<Engine, ServiceError>;
    async fn update(&self, id: Uuid, engine: &Engine) -> Result<Engine, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<(), ServiceError>;
}

/// In-memory repositories for tests and doc examples, with call recording and
/// failure injection.
pub mod mock {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    /// Repository operation, used to record calls and to inject failures.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Op {
        Get,
        List,
        Create,
        Update,
        Delete,
    }

    fn injected(op: Op) -> ServiceError {
        ServiceError::Db(format!("injected {:?} failure", op))
    }

    #[derive(Default)]
    pub struct MockCarRepository {
        cars: Mutex<HashMap<Uuid, Car>>, // key: car id
        failing_ops: Mutex<HashSet<Op>>,
        calls: Mutex<Vec<Op>>,
    }

    impl MockCarRepository {
        /// Store a row directly, bypassing call recording.
        pub fn seed(&self, car: Car) {
            self.cars.lock().unwrap().insert(car.id, as_row(&car));
        }

        pub fn fail_on(&self, op: Op) {
            self.failing_ops.lock().unwrap().insert(op);
        }

        pub fn row(&self, id: Uuid) -> Option<Car> {
            self.cars.lock().unwrap().get(&id).cloned()
        }

        pub fn len(&self) -> usize {
            self.cars.lock().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        pub fn calls(&self) -> Vec<Op> {
            self.calls.lock().unwrap().clone()
        }

        fn enter(&self, op: Op) -> Result<(), ServiceError> {
            self.calls.lock().unwrap().push(op);
            if self.failing_ops.lock().unwrap().contains(&op) {
                return Err(injected(op));
            }
            Ok(())
        }
    }

    /// What a car row holds: the engine is reduced to its id.
    fn as_row(car: &Car) -> Car {
        Car { engine: Engine { id: car.id, ..Engine::default() }, ..car.clone() }
    }

    #[async_trait]
    impl CarRepository for MockCarRepository {
        async fn get_by_id(&self, id: Uuid) -> Result<Car, ServiceError> {
            self.enter(Op::Get)?;
            self.row(id).ok_or_else(|| ServiceError::not_found("car", id))
        }

        async fn list_by_brand(&self, brand: &str) -> Result<Vec<Car>, ServiceError> {
            self.enter(Op::List)?;
            if brand.is_empty() {
                return Err(ServiceError::missing_param("brand"));
            }
            let cars = self.cars.lock().unwrap();
            let mut found: Vec<Car> = cars.values().filter(|c| c.brand == brand).cloned().collect();
            found.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
            Ok(found)
        }

        async fn create(&self, car: &Car) -> Result<Car, ServiceError> {
            self.enter(Op::Create)?;
            let mut cars = self.cars.lock().unwrap();
            if cars.contains_key(&car.id) {
                return Err(ServiceError::Db(format!("duplicate key: {}", car.id)));
            }
            cars.insert(car.id, as_row(car));
            Ok(car.clone())
        }

        async fn update(&self, id: Uuid, car: &Car) -> Result<Car, ServiceError> {
            self.enter(Op::Update)?;
            let mut cars = self.cars.lock().unwrap();
            let row = cars.get_mut(&id).ok_or_else(|| ServiceError::not_found("car", id))?;
            row.name = car.name.clone();
            row.year = car.year;
            row.brand = car.brand.clone();
            row.fuel_type = car.fuel_type.clone();
            Ok(Car { id, ..car.clone() })
        }

        async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
            self.enter(Op::Delete)?;
            self.cars
                .lock()
                .unwrap()
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| ServiceError::not_found("car", id))
        }
    }

    #[derive(Default)]
    pub struct MockEngineRepository {
        engines: Mutex<HashMap<Uuid, Engine>>, // key: engine id
        failing_ops: Mutex<HashSet<Op>>,
        failing_ids: Mutex<HashSet<Uuid>>,
        calls: Mutex<Vec<(Op, Option<Uuid>)>>,
    }

    impl MockEngineRepository {
        pub fn seed(&self, engine: Engine) {
            self.engines.lock().unwrap().insert(engine.id, engine);
        }

        pub fn fail_on(&self, op: Op) {
            self.failing_ops.lock().unwrap().insert(op);
        }

        /// Every operation addressed to `id` fails.
        pub fn fail_for(&self, id: Uuid) {
            self.failing_ids.lock().unwrap().insert(id);
        }

        pub fn row(&self, id: Uuid) -> Option<Engine> {
            self.engines.lock().unwrap().get(&id).cloned()
        }

        pub fn len(&self) -> usize {
            self.engines.lock().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        pub fn calls(&self) -> Vec<(Op, Option<Uuid>)> {
            self.calls.lock().unwrap().clone()
        }

        fn enter(&self, op: Op, id: Option<Uuid>) -> Result<(), ServiceError> {
            self.calls.lock().unwrap().push((op, id));
            let id_fails = id.is_some_and(|id| self.failing_ids.lock().unwrap().contains(&id));
            if id_fails || self.failing_ops.lock().unwrap().contains(&op) {
                return Err(injected(op));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl EngineRepository for MockEngineRepository {
        async fn get_by_id(&self, id: Uuid) -> Result<Engine, ServiceError> {
            self.enter(Op::Get, Some(id))?;
            self.row(id).ok_or_else(|| ServiceError::not_found("engine", id))
        }

        async fn create(&self, engine: &Engine) -> Result<Engine, ServiceError> {
            self.enter(Op::Create, None)?;
            let created = Engine { id: Uuid::new_v4(), ..engine.clone() };
            self.engines.lock().unwrap().insert(created.id, created.clone());
            Ok(created)
        }

        async fn update(&self, id: Uuid, engine: &Engine) -> Result<Engine, ServiceError> {
            self.enter(Op::Update, Some(id))?;
            let mut engines = self.engines.lock().unwrap();
            let row = engines.get_mut(&id).ok_or_else(|| ServiceError::not_found("engine", id))?;
            *row = Engine { id, ..engine.clone() };
            Ok(row.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
            self.enter(Op::Delete, Some(id))?;
            self.engines
                .lock()
                .unwrap()
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| ServiceError::not_found("engine", id))
        }
    }
}
