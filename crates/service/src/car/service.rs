use std::sync::Arc;

use chrono::Datelike;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::domain::{Car, Engine};
use super::repository::{CarRepository, EngineRepository};
use super::validation::validate_new_car;
use crate::errors::ServiceError;

/// Application service for the car aggregate.
///
/// Car and engine rows live in separate stores keyed by the same id. Every
/// operation calls the stores one after another and stops at the first
/// failure; nothing already written is rolled back.
pub struct CarService<C: CarRepository + ?Sized, E: EngineRepository + ?Sized> {
    cars: Arc<C>,
    engines: Arc<E>,
}

impl<C: CarRepository + ?Sized, E: EngineRepository + ?Sized> Clone for CarService<C, E> {
    fn clone(&self) -> Self {
        Self { cars: Arc::clone(&self.cars), engines: Arc::clone(&self.engines) }
    }
}

fn parse_id(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ServiceError::invalid_param("id"))
}

fn current_year() -> i32 {
    chrono::Utc::now().year()
}

impl<C: CarRepository + ?Sized, E: EngineRepository + ?Sized> CarService<C, E> {
    pub fn new(cars: Arc<C>, engines: Arc<E>) -> Self { Self { cars, engines } }

    /// Fetch a car and attach its engine.
    ///
    /// The nil id is rejected with `InvalidParameter` before any store call.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Result<Car, ServiceError> {
        let id = parse_id(id)?;
        if id.is_nil() {
            return Err(ServiceError::invalid_param("id"));
        }

        let mut car = self.cars.get_by_id(id).await?;
        let engine = self.engines.get_by_id(id).await?;
        car.engine = correlate(id, engine);
        Ok(car)
    }

    /// List cars of one brand, optionally with engines.
    ///
    /// With `include_engine` every car's engine is looked up even after a
    /// failure; the last failure seen is returned once all lookups are done.
    /// Without it, engines are left empty.
    #[instrument(skip(self))]
    pub async fn get_by_brand(&self, brand: &str, include_engine: bool) -> Result<Vec<Car>, ServiceError> {
        let mut cars = self.cars.list_by_brand(brand).await?;

        if !include_engine {
            for car in cars.iter_mut() {
                car.engine = Engine::default();
            }
            return Ok(cars);
        }

        let mut last_err = None;
        for car in cars.iter_mut() {
            match self.engines.get_by_id(car.id).await {
                Ok(engine) => car.engine = correlate(car.id, engine),
                Err(e) => {
                    warn!(car_id = %car.id, error = %e, "engine_lookup_failed");
                    last_err = Some(e);
                }
            }
        }
        match last_err {
            Some(e) => Err(e),
            None => Ok(cars),
        }
    }

    /// Validate and persist a new car with its engine.
    ///
    /// The engine is written first; its generated id becomes the car id.
    ///
    /// # Examples
    /// ```
    /// use service::car::{CarService, Car, Engine};
    /// use service::car::repository::mock::{MockCarRepository, MockEngineRepository};
    /// use std::sync::Arc;
    /// let svc = CarService::new(Arc::new(MockCarRepository::default()), Arc::new(MockEngineRepository::default()));
    /// let input = Car {
    ///     name: "Model 3".into(), year: 2018, brand: "Tesla".into(), fuel_type: "Petrol".into(),
    ///     engine: Engine { displacement: 500, cylinders: 2, range: 200, ..Engine::default() },
    ///     ..Car::default()
    /// };
    /// let car = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(car.id, car.engine.id);
    /// assert_eq!(car.engine.range, 200);
    /// ```
    #[instrument(skip(self, car), fields(brand = %car.brand, year = car.year))]
    pub async fn create(&self, car: Car) -> Result<Car, ServiceError> {
        if let Err(reason) = validate_new_car(&car, current_year()) {
            warn!(field = reason.field(), %reason, "car_rejected");
            return Err(ServiceError::invalid_param(reason.field()));
        }

        let engine = self.engines.create(&car.engine).await?;
        let candidate = Car { id: engine.id, engine: engine.clone(), ..car };
        let mut created = self.cars.create(&candidate).await?;
        created.id = engine.id;
        created.engine = engine;

        info!(car_id = %created.id, "car_created");
        Ok(created)
    }

    /// Overwrite a car and then its engine. No validation is applied.
    #[instrument(skip(self, car))]
    pub async fn update(&self, id: &str, car: Car) -> Result<Car, ServiceError> {
        if id.trim().is_empty() {
            return Err(ServiceError::missing_param("id"));
        }
        let id = parse_id(id)?;

        let mut updated = self.cars.update(id, &car).await?;
        let engine = self.engines.update(id, &car.engine).await?;
        updated.id = id;
        updated.engine = correlate(id, engine);

        info!(car_id = %id, "car_updated");
        Ok(updated)
    }

    /// Remove the car row and then the engine row.
    ///
    /// The nil id is `EntityNotFound` and touches no store.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let id = parse_id(id)?;
        if id.is_nil() {
            return Err(ServiceError::not_found("car", id));
        }

        self.cars.delete(id).await?;
        self.engines.delete(id).await?;

        info!(car_id = %id, "car_deleted");
        Ok(())
    }
}

/// Pin an engine to the car id it was looked up or written under.
fn correlate(car_id: Uuid, mut engine: Engine) -> Engine {
    if engine.id != car_id {
        warn!(%car_id, engine_id = %engine.id, "engine id does not match car id");
        engine.id = car_id;
    }
    engine
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car::repository::mock::{MockCarRepository, MockEngineRepository, Op};

    type Svc = CarService<MockCarRepository, MockEngineRepository>;

    fn setup() -> (Svc, Arc<MockCarRepository>, Arc<MockEngineRepository>) {
        let cars = Arc::new(MockCarRepository::default());
        let engines = Arc::new(MockEngineRepository::default());
        (CarService::new(cars.clone(), engines.clone()), cars, engines)
    }

    fn model_3() -> Car {
        Car {
            name: "Model 3".into(),
            year: 2018,
            brand: "Tesla".into(),
            fuel_type: "Petrol".into(),
            engine: Engine { displacement: 500, cylinders: 2, range: 200, ..Engine::default() },
            ..Car::default()
        }
    }

    /// Seed a matching car + engine pair directly into the fakes.
    fn seed_pair(cars: &MockCarRepository, engines: &MockEngineRepository, name: &str, brand: &str) -> Uuid {
        let id = Uuid::new_v4();
        cars.seed(Car { id, name: name.into(), year: 2015, brand: brand.into(), fuel_type: "Electric".into(), ..Car::default() });
        engines.seed(Engine { id, displacement: 100, cylinders: 4, range: 300 });
        id
    }

    #[tokio::test]
    async fn create_assigns_engine_id_to_car() {
        let (svc, cars, engines) = setup();

        let created = svc.create(model_3()).await.unwrap();

        assert!(!created.id.is_nil());
        assert_eq!(created.id, created.engine.id);
        assert_eq!(created.name, "Model 3");
        assert_eq!(created.year, 2018);
        assert_eq!(created.brand, "Tesla");
        assert_eq!(created.fuel_type, "Petrol");
        assert_eq!((created.engine.displacement, created.engine.cylinders, created.engine.range), (500, 2, 200));

        let row = cars.row(created.id).expect("car row");
        assert_eq!(row.engine.id, created.id);
        assert_eq!(engines.row(created.id).expect("engine row").range, 200);
    }

    #[tokio::test]
    async fn create_ignores_incoming_id() {
        let (svc, _, _) = setup();
        let supplied = Uuid::new_v4();
        let created = svc.create(Car { id: supplied, ..model_3() }).await.unwrap();
        assert_ne!(created.id, supplied);
    }

    #[tokio::test]
    async fn create_with_unknown_brand_persists_nothing() {
        let (svc, cars, engines) = setup();

        let err = svc.create(Car { brand: "ABC".into(), ..model_3() }).await.unwrap_err();

        assert!(matches!(err, ServiceError::InvalidParameter { ref params } if params == &["Brand"]));
        assert!(cars.calls().is_empty());
        assert!(engines.calls().is_empty());
        assert!(cars.is_empty() && engines.is_empty());
    }

    #[tokio::test]
    async fn create_rejects_each_invalid_field() {
        let (svc, _, engines) = setup();
        let next_year = current_year() + 1;
        for bad in [
            Car { year: 1899, ..model_3() },
            Car { year: next_year, ..model_3() },
            Car { brand: String::new(), ..model_3() },
            Car { fuel_type: "petrol".into(), ..model_3() },
            Car { fuel_type: String::new(), ..model_3() },
        ] {
            let err = svc.create(bad).await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidParameter { .. }));
        }
        assert!(engines.calls().is_empty());
    }

    #[tokio::test]
    async fn create_accepts_current_year() {
        let (svc, _, _) = setup();
        let created = svc.create(Car { year: current_year(), ..model_3() }).await.unwrap();
        assert_eq!(created.year, current_year());
    }

    #[tokio::test]
    async fn create_stops_when_engine_store_fails() {
        let (svc, cars, engines) = setup();
        engines.fail_on(Op::Create);

        let err = svc.create(model_3()).await.unwrap_err();

        assert!(matches!(err, ServiceError::Db(_)));
        assert!(cars.calls().is_empty());
    }

    #[tokio::test]
    async fn create_leaves_engine_when_car_store_fails() {
        let (svc, cars, engines) = setup();
        cars.fail_on(Op::Create);

        let err = svc.create(model_3()).await.unwrap_err();

        assert!(matches!(err, ServiceError::Db(_)));
        // no compensation: the engine row stays behind
        assert_eq!(engines.len(), 1);
        assert!(cars.is_empty());
    }

    #[tokio::test]
    async fn get_by_id_assembles_aggregate() {
        let (svc, cars, engines) = setup();
        let id = seed_pair(&cars, &engines, "Model S", "Tesla");

        let car = svc.get_by_id(&id.to_string()).await.unwrap();

        assert_eq!(car.id, id);
        assert_eq!(car.name, "Model S");
        assert_eq!(car.engine, Engine { id, displacement: 100, cylinders: 4, range: 300 });
    }

    #[tokio::test]
    async fn get_by_id_nil_never_calls_store() {
        let (svc, cars, engines) = setup();

        let err = svc.get_by_id(&Uuid::nil().to_string()).await.unwrap_err();

        assert!(matches!(err, ServiceError::InvalidParameter { .. }));
        assert!(cars.calls().is_empty());
        assert!(engines.calls().is_empty());
    }

    #[tokio::test]
    async fn get_by_id_rejects_malformed_id() {
        let (svc, cars, _) = setup();
        let err = svc.get_by_id("not-a-uuid").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidParameter { .. }));
        assert!(cars.calls().is_empty());
    }

    #[tokio::test]
    async fn get_by_id_propagates_store_errors() {
        let (svc, cars, engines) = setup();

        let missing = Uuid::new_v4();
        let err = svc.get_by_id(&missing.to_string()).await.unwrap_err();
        assert!(matches!(err, ServiceError::EntityNotFound { entity: "car", .. }));
        assert!(engines.calls().is_empty());

        let id = seed_pair(&cars, &engines, "Model X", "Tesla");
        engines.fail_for(id);
        let err = svc.get_by_id(&id.to_string()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Db(_)));
    }

    #[tokio::test]
    async fn get_by_brand_without_engine_leaves_engine_unset() {
        let (svc, cars, engines) = setup();
        seed_pair(&cars, &engines, "Model 3", "Tesla");
        seed_pair(&cars, &engines, "911", "Porsche");

        let listed = svc.get_by_brand("Tesla", false).await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].engine, Engine::default());
        assert!(engines.calls().is_empty());
    }

    #[tokio::test]
    async fn get_by_brand_with_engine_attaches_each() {
        let (svc, cars, engines) = setup();
        let b = seed_pair(&cars, &engines, "Model Y", "Tesla");
        let a = seed_pair(&cars, &engines, "Model 3", "Tesla");

        let listed = svc.get_by_brand("Tesla", true).await.unwrap();

        let ids: Vec<Uuid> = listed.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![a, b]);
        assert!(listed.iter().all(|c| c.engine.id == c.id && c.engine.range == 300));
    }

    #[tokio::test]
    async fn get_by_brand_tries_every_engine_before_failing() {
        let (svc, cars, engines) = setup();
        let first = seed_pair(&cars, &engines, "Model 3", "Tesla");
        let second = seed_pair(&cars, &engines, "Model S", "Tesla");
        let third = seed_pair(&cars, &engines, "Model X", "Tesla");
        engines.fail_for(second);

        let err = svc.get_by_brand("Tesla", true).await.unwrap_err();

        assert!(matches!(err, ServiceError::Db(_)));
        let looked_up: Vec<Uuid> = engines.calls().into_iter().filter_map(|(op, id)| (op == Op::Get).then_some(id).flatten()).collect();
        assert_eq!(looked_up, vec![first, second, third]);
    }

    #[tokio::test]
    async fn get_by_brand_empty_brand_is_missing_parameter() {
        let (svc, _, _) = setup();
        let err = svc.get_by_brand("", true).await.unwrap_err();
        assert!(matches!(err, ServiceError::MissingParameter { .. }));
    }

    #[tokio::test]
    async fn get_by_brand_store_failure_short_circuits() {
        let (svc, cars, engines) = setup();
        cars.fail_on(Op::List);
        assert!(svc.get_by_brand("BMW", true).await.is_err());
        assert!(engines.calls().is_empty());
    }

    #[tokio::test]
    async fn update_overwrites_car_then_engine() {
        let (svc, cars, engines) = setup();
        let id = seed_pair(&cars, &engines, "Model 3", "Tesla");

        let replacement = Car {
            name: "Model 3 Performance".into(),
            year: 2021,
            brand: "Tesla".into(),
            fuel_type: "Electric".into(),
            engine: Engine { displacement: 0, cylinders: 0, range: 500, ..Engine::default() },
            ..Car::default()
        };
        let updated = svc.update(&id.to_string(), replacement).await.unwrap();

        assert_eq!(updated.id, id);
        assert_eq!(updated.engine.id, id);
        assert_eq!(updated.engine.range, 500);
        assert_eq!(cars.row(id).unwrap().name, "Model 3 Performance");
        assert_eq!(engines.row(id).unwrap().range, 500);
    }

    #[tokio::test]
    async fn update_skips_validation() {
        let (svc, cars, engines) = setup();
        let id = seed_pair(&cars, &engines, "Model 3", "Tesla");
        let updated = svc.update(&id.to_string(), Car { brand: "ABC".into(), year: 1066, ..model_3() }).await.unwrap();
        assert_eq!(updated.brand, "ABC");
        assert_eq!(cars.row(id).unwrap().year, 1066);

        let long_name = "x".repeat(300);
        let updated = svc.update(&id.to_string(), Car { name: long_name.clone(), ..model_3() }).await.unwrap();
        assert_eq!(updated.name, long_name);
    }

    #[tokio::test]
    async fn update_engine_failure_keeps_car_change() {
        let (svc, cars, engines) = setup();
        let id = seed_pair(&cars, &engines, "Model 3", "Tesla");
        engines.fail_on(Op::Update);

        let err = svc.update(&id.to_string(), Car { name: "Overwritten".into(), ..model_3() }).await.unwrap_err();

        assert!(matches!(err, ServiceError::Db(ref m) if m.contains("Update")));
        assert_eq!(cars.row(id).unwrap().name, "Overwritten");
        assert_eq!(engines.row(id).unwrap().range, 300);
    }

    #[tokio::test]
    async fn update_car_failure_leaves_engine_untouched() {
        let (svc, cars, engines) = setup();
        let id = seed_pair(&cars, &engines, "Model 3", "Tesla");
        cars.fail_on(Op::Update);

        assert!(svc.update(&id.to_string(), model_3()).await.is_err());
        assert!(engines.calls().is_empty());
    }

    #[tokio::test]
    async fn update_requires_id() {
        let (svc, cars, _) = setup();
        let err = svc.update("  ", model_3()).await.unwrap_err();
        assert!(matches!(err, ServiceError::MissingParameter { .. }));
        let err = svc.update("xyz", model_3()).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidParameter { .. }));
        assert!(cars.calls().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_both_rows() {
        let (svc, cars, engines) = setup();
        let id = seed_pair(&cars, &engines, "Model 3", "Tesla");

        svc.delete(&id.to_string()).await.unwrap();

        assert!(cars.row(id).is_none());
        assert!(engines.row(id).is_none());
    }

    #[tokio::test]
    async fn delete_nil_never_calls_store() {
        let (svc, cars, engines) = setup();

        let err = svc.delete(&Uuid::nil().to_string()).await.unwrap_err();

        assert!(matches!(err, ServiceError::EntityNotFound { .. }));
        assert!(cars.calls().is_empty());
        assert!(engines.calls().is_empty());
    }

    #[tokio::test]
    async fn delete_car_failure_keeps_engine() {
        let (svc, cars, engines) = setup();
        let id = seed_pair(&cars, &engines, "Model 3", "Tesla");
        cars.fail_on(Op::Delete);

        assert!(svc.delete(&id.to_string()).await.is_err());
        assert!(engines.calls().is_empty());
        assert!(engines.row(id).is_some());
    }

    #[tokio::test]
    async fn delete_engine_failure_leaves_car_deleted() {
        let (svc, cars, engines) = setup();
        let id = seed_pair(&cars, &engines, "Model 3", "Tesla");
        engines.fail_on(Op::Delete);

        assert!(svc.delete(&id.to_string()).await.is_err());
        assert!(cars.row(id).is_none());
        assert!(engines.row(id).is_some());
    }

    #[tokio::test]
    async fn works_over_trait_objects() {
        let cars: Arc<dyn CarRepository> = Arc::new(MockCarRepository::default());
        let engines: Arc<dyn EngineRepository> = Arc::new(MockEngineRepository::default());
        let svc = CarService::new(cars, engines);
        let created = svc.create(model_3()).await.unwrap();
        let fetched = svc.get_by_id(&created.id.to_string()).await.unwrap();
        assert_eq!(fetched, created);
    }
}
