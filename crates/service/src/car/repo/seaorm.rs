use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::car::domain::{Car, Engine};
use crate::car::repository::{CarRepository, EngineRepository};
use crate::errors::ServiceError;
use models::errors::ModelError;

pub struct SeaOrmCarRepository {
    pub db: DatabaseConnection,
}

pub struct SeaOrmEngineRepository {
    pub db: DatabaseConnection,
}

fn car_from_row(m: models::car::Model) -> Car {
    Car {
        id: m.id,
        engine: Engine { id: m.engine_id, ..Engine::default() },
        name: m.name,
        year: m.year,
        brand: m.brand,
        fuel_type: m.fuel_type,
    }
}

fn engine_column(column: &'static str, value: i64) -> Result<u32, ServiceError> {
    u32::try_from(value).map_err(|_| ServiceError::Model(ModelError::OutOfRange { column, value }))
}

fn engine_from_row(m: models::engine::Model) -> Result<Engine, ServiceError> {
    Ok(Engine {
        id: m.id,
        displacement: engine_column("displacement", m.displacement)?,
        cylinders: engine_column("cylinders", m.cylinders)?,
        range: engine_column("range", m.range)?,
    })
}

#[async_trait::async_trait]
impl CarRepository for SeaOrmCarRepository {
    async fn get_by_id(&self, id: Uuid) -> Result<Car, ServiceError> {
        models::car::find(&self.db, id)
            .await
            .map_err(ServiceError::from_model)?
            .map(car_from_row)
            .ok_or_else(|| ServiceError::not_found("car", id))
    }

    async fn list_by_brand(&self, brand: &str) -> Result<Vec<Car>, ServiceError> {
        if brand.is_empty() {
            return Err(ServiceError::missing_param("brand"));
        }
        let rows = models::car::find_by_brand(&self.db, brand).await.map_err(ServiceError::from_model)?;
        Ok(rows.into_iter().map(car_from_row).collect())
    }

    async fn create(&self, car: &Car) -> Result<Car, ServiceError> {
        models::car::create(&self.db, car.id, &car.name, car.year, &car.brand, &car.fuel_type)
            .await
            .map_err(ServiceError::from_model)?;
        Ok(car.clone())
    }

    async fn update(&self, id: Uuid, car: &Car) -> Result<Car, ServiceError> {
        let touched = models::car::update_details(&self.db, id, &car.name, car.year, &car.brand, &car.fuel_type)
            .await
            .map_err(ServiceError::from_model)?;
        if touched == 0 {
            return Err(ServiceError::not_found("car", id));
        }
        Ok(Car { id, ..car.clone() })
    }

    async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let touched = models::car::delete(&self.db, id).await.map_err(ServiceError::from_model)?;
        if touched == 0 {
            return Err(ServiceError::not_found("car", id));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl EngineRepository for SeaOrmEngineRepository {
    async fn get_by_id(&self, id: Uuid) -> Result<Engine, ServiceError> {
        let row = models::engine::find(&self.db, id)
            .await
            .map_err(ServiceError::from_model)?
            .ok_or_else(|| ServiceError::not_found("engine", id))?;
        engine_from_row(row)
    }

    async fn create(&self, engine: &Engine) -> Result<Engine, ServiceError> {
        let row = models::engine::create(
            &self.db,
            i64::from(engine.displacement),
            i64::from(engine.cylinders),
            i64::from(engine.range),
        )
        .await
        .map_err(ServiceError::from_model)?;
        engine_from_row(row)
    }

    async fn update(&self, id: Uuid, engine: &Engine) -> Result<Engine, ServiceError> {
        let touched = models::engine::update_specs(
            &self.db,
            id,
            i64::from(engine.displacement),
            i64::from(engine.cylinders),
            i64::from(engine.range),
        )
        .await
        .map_err(ServiceError::from_model)?;
        if touched == 0 {
            return Err(ServiceError::not_found("engine", id));
        }
        Ok(Engine { id, ..engine.clone() })
    }

    async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let touched = models::engine::delete(&self.db, id).await.map_err(ServiceError::from_model)?;
        if touched == 0 {
            return Err(ServiceError::not_found("engine", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car::CarService;
    use crate::test_support::get_db;
    use std::sync::Arc;

    #[test]
    fn engine_rows_outside_u32_are_rejected() {
        let row = models::engine::Model { id: Uuid::new_v4(), displacement: -1, cylinders: 4, range: 0 };
        let err = engine_from_row(row).unwrap_err();
        assert!(matches!(err, ServiceError::Model(ModelError::OutOfRange { column: "displacement", value: -1 })));
    }

    #[test]
    fn car_row_keeps_engine_id_only() {
        let id = Uuid::new_v4();
        let row = models::car::Model { id, engine_id: id, name: "i8".into(), year: 2015, brand: "BMW".into(), fuel_type: "Petrol".into() };
        let car = car_from_row(row);
        assert_eq!(car.engine, Engine { id, ..Engine::default() });
    }

    #[tokio::test]
    async fn seaorm_aggregate_lifecycle() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let svc = CarService::new(
            Arc::new(SeaOrmCarRepository { db: db.clone() }),
            Arc::new(SeaOrmEngineRepository { db: db.clone() }),
        );

        let input = Car {
            name: "Model 3".into(),
            year: 2018,
            brand: "Tesla".into(),
            fuel_type: "Petrol".into(),
            engine: Engine { displacement: 500, cylinders: 2, range: 200, ..Engine::default() },
            ..Car::default()
        };
        let created = svc.create(input).await?;
        assert_eq!(created.id, created.engine.id);

        let id = created.id.to_string();
        let fetched = svc.get_by_id(&id).await?;
        assert_eq!(fetched, created);

        let listed = svc.get_by_brand("Tesla", true).await?;
        assert!(listed.iter().any(|c| c.id == created.id && c.engine.range == 200));

        let updated = svc.update(&id, Car { name: "Model 3 LR".into(), ..created.clone() }).await?;
        assert_eq!(updated.name, "Model 3 LR");

        svc.delete(&id).await?;
        assert!(matches!(svc.get_by_id(&id).await, Err(ServiceError::EntityNotFound { .. })));
        assert!(matches!(svc.delete(&id).await, Err(ServiceError::EntityNotFound { .. })));
        Ok(())
    }
}
