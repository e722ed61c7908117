use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
pub struct EngineDoc {
    pub id: Uuid,
    pub displacement: u32,
    pub cylinders: u32,
    pub range: u32,
}

#[derive(Serialize, ToSchema)]
pub struct CarDoc {
    #[serde(rename = "ID")]
    pub id: Uuid,
    #[serde(rename = "Engine")]
    pub engine: EngineDoc,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Year")]
    pub year: i32,
    /// Tesla, Porsche, Ferrari, Mercedes or BMW
    #[serde(rename = "Brand")]
    pub brand: String,
    /// Petrol, Diesel or Electric
    #[serde(rename = "FuelType")]
    pub fuel_type: String,
}

#[derive(Serialize, ToSchema)]
pub struct CarListDoc { pub cars: Vec<CarDoc> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::cars::get_car,
        crate::cars::list_cars,
        crate::cars::create_car,
        crate::cars::update_car,
        crate::cars::delete_car,
    ),
    components(
        schemas(
            HealthResponse,
            EngineDoc,
            CarDoc,
            CarListDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "cars")
    )
)]
pub struct ApiDoc;
