//! Creation-time checks for a proposed car.
//!
//! Checks run in a fixed order (year, brand, fuel type) and the first failure
//! is reported. Updates are not validated.

use std::str::FromStr;

use thiserror::Error;

use super::domain::{Brand, Car, FuelType};

pub const MIN_YEAR: i32 = 1900;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CarValidationError {
    #[error("year {year} outside {min}..={max}")]
    Year { year: i32, min: i32, max: i32 },
    #[error("brand `{0}` is not one of Tesla, Porsche, Ferrari, Mercedes, BMW")]
    Brand(String),
    #[error("fuel type `{0}` is not one of Petrol, Diesel, Electric")]
    FuelType(String),
}

impl CarValidationError {
    /// Wire name of the rejected field.
    pub fn field(&self) -> &'static str {
        match self {
            CarValidationError::Year { .. } => "Year",
            CarValidationError::Brand(_) => "Brand",
            CarValidationError::FuelType(_) => "FuelType",
        }
    }
}

pub fn check_year(year: i32, current_year: i32) -> Result<(), CarValidationError> {
    if year > current_year || year < MIN_YEAR {
        return Err(CarValidationError::Year { year, min: MIN_YEAR, max: current_year });
    }
    Ok(())
}

pub fn check_brand(brand: &str) -> Result<Brand, CarValidationError> {
    Brand::from_str(brand).map_err(|_| CarValidationError::Brand(brand.to_string()))
}

pub fn check_fuel_type(fuel_type: &str) -> Result<FuelType, CarValidationError> {
    FuelType::from_str(fuel_type).map_err(|_| CarValidationError::FuelType(fuel_type.to_string()))
}

/// Validate a car proposed for creation against `current_year`.
pub fn validate_new_car(car: &Car, current_year: i32) -> Result<(), CarValidationError> {
    check_year(car.year, current_year)?;
    check_brand(&car.brand)?;
    check_fuel_type(&car.fuel_type)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    const NOW: i32 = 2024;

    fn car(year: i32, brand: &str, fuel: &str) -> Car {
        Car { name: "Model 3".into(), year, brand: brand.into(), fuel_type: fuel.into(), ..Car::default() }
    }

    #[test]
    fn every_valid_combination_passes() {
        for brand in Brand::iter() {
            for fuel in FuelType::iter() {
                for year in [MIN_YEAR, 1990, NOW] {
                    let c = car(year, brand.as_ref(), fuel.as_ref());
                    assert_eq!(validate_new_car(&c, NOW), Ok(()), "{brand} {fuel} {year}");
                }
            }
        }
    }

    #[test]
    fn year_bounds() {
        assert!(check_year(1899, NOW).is_err());
        assert!(check_year(NOW + 1, NOW).is_err());
        assert!(check_year(0, NOW).is_err());
        assert!(check_year(NOW, NOW).is_ok());
    }

    #[test]
    fn single_violation_fails_regardless_of_other_fields() {
        let cases = [
            (car(1800, "Tesla", "Petrol"), "Year"),
            (car(NOW + 5, "BMW", "Electric"), "Year"),
            (car(2018, "ABC", "Petrol"), "Brand"),
            (car(2018, "", "Diesel"), "Brand"),
            (car(2018, "Porsche", "Hydrogen"), "FuelType"),
            (car(2018, "Ferrari", ""), "FuelType"),
        ];
        for (c, field) in cases {
            let err = validate_new_car(&c, NOW).unwrap_err();
            assert_eq!(err.field(), field, "{c:?}");
        }
    }

    #[test]
    fn first_failing_check_is_reported() {
        let err = validate_new_car(&car(1800, "ABC", "Hydrogen"), NOW).unwrap_err();
        assert_eq!(err, CarValidationError::Year { year: 1800, min: MIN_YEAR, max: NOW });

        let err = validate_new_car(&car(2000, "ABC", "Hydrogen"), NOW).unwrap_err();
        assert_eq!(err, CarValidationError::Brand("ABC".into()));
    }

    #[test]
    fn engine_fields_are_not_validated() {
        let mut c = car(2018, "Mercedes", "Diesel");
        c.engine.cylinders = 0;
        c.engine.displacement = u32::MAX;
        assert!(validate_new_car(&c, NOW).is_ok());
    }
}
