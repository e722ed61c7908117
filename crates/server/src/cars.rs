use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use service::car::Car;
use service::errors::ServiceError;
use tracing::{error, info};

use crate::{errors::JsonApiError, state::ServerState};

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BrandQuery {
    #[serde(default)]
    pub brand: String,
    /// Required; one of `1 t T TRUE true True 0 f F FALSE false False`
    #[serde(default, rename = "isEngine")]
    pub is_engine: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CarList {
    pub cars: Vec<Car>,
}

/// Strict boolean flag parsing: `1 t T TRUE true True` and their false counterparts.
pub fn parse_bool_flag(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn bind_body(payload: Result<Json<Car>, JsonRejection>) -> Result<Car, JsonApiError> {
    match payload {
        Ok(Json(car)) => Ok(car),
        Err(rejection) => {
            error!(error = %rejection.body_text(), "error in binding");
            Err(ServiceError::invalid_param("body").into())
        }
    }
}

#[utoipa::path(
    get, path = "/car/{id}", tag = "cars",
    params(("id" = String, Path, description = "Car ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::CarDoc),
        (status = 400, description = "Invalid Parameter"),
        (status = 404, description = "Entity Not Found")
    )
)]
pub async fn get_car(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<Car>, JsonApiError> {
    let car = state.cars.get_by_id(&id).await?;
    Ok(Json(car))
}

#[utoipa::path(
    get, path = "/cars", tag = "cars",
    params(BrandQuery),
    responses(
        (status = 200, description = "OK", body = crate::openapi::CarListDoc),
        (status = 400, description = "Invalid or Missing Parameter")
    )
)]
pub async fn list_cars(State(state): State<ServerState>, Query(q): Query<BrandQuery>) -> Result<Json<CarList>, JsonApiError> {
    // an absent flag parses like an empty one
    let include_engine = parse_bool_flag(q.is_engine.as_deref().unwrap_or_default())
        .ok_or_else(|| ServiceError::invalid_param("isEngine"))?;
    let cars = state.cars.get_by_brand(&q.brand, include_engine).await?;
    info!(brand = %q.brand, include_engine, count = cars.len(), "list cars");
    Ok(Json(CarList { cars }))
}

#[utoipa::path(
    post, path = "/car", tag = "cars",
    request_body = crate::openapi::CarDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::CarDoc),
        (status = 400, description = "Invalid Parameter"),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn create_car(
    State(state): State<ServerState>,
    payload: Result<Json<Car>, JsonRejection>,
) -> Result<(StatusCode, Json<Car>), JsonApiError> {
    let car = bind_body(payload)?;
    let created = state.cars.create(car).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/car/{id}", tag = "cars",
    params(("id" = String, Path, description = "Car ID")),
    request_body = crate::openapi::CarDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::CarDoc),
        (status = 400, description = "Invalid or Missing Parameter"),
        (status = 404, description = "Entity Not Found"),
        (status = 500, description = "Update Failed")
    )
)]
pub async fn update_car(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<Car>, JsonRejection>,
) -> Result<Json<Car>, JsonApiError> {
    if id.trim().is_empty() {
        return Err(ServiceError::missing_param("id").into());
    }
    let car = bind_body(payload)?;
    let updated = state.cars.update(&id, car).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete, path = "/car/{id}", tag = "cars",
    params(("id" = String, Path, description = "Car ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Entity Not Found"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete_car(State(state): State<ServerState>, Path(id): Path<String>) -> Result<StatusCode, JsonApiError> {
    if id.trim().is_empty() {
        return Err(ServiceError::missing_param("id").into());
    }
    state.cars.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
