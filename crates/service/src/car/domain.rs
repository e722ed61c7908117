use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

/// Engine as carried inside a [`Car`]. `id` is assigned by the engine store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Engine {
    pub id: Uuid,
    pub displacement: u32,
    pub cylinders: u32,
    pub range: u32,
}

/// Car aggregate (business view). `id` always equals `engine.id` once persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Car {
    #[serde(rename = "ID")]
    pub id: Uuid,
    #[serde(rename = "Engine")]
    pub engine: Engine,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "FuelType")]
    pub fuel_type: String,
}

/// Brands accepted on creation. Matching is exact and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Display, EnumString, EnumIter, AsRefStr)]
pub enum Brand {
    Tesla,
    Porsche,
    Ferrari,
    Mercedes,
    #[strum(serialize = "BMW")]
    Bmw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Display, EnumString, EnumIter, AsRefStr)]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
}
