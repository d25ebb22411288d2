use model::entities::produce::{self, MeasurementUnit};
use rust_decimal::Decimal;
use sea_orm::ActiveEnum;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ValidationErrors;

/// Outbound produce representation. `owner` carries the owning user's
/// email, never the numeric id.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProduceResponse {
    pub id: i32,
    pub produce_name: String,
    pub produce_category: i32,
    pub stock: i32,
    pub measurement_unit: String,
    pub owner: String,
    pub price_tag: Decimal,
}

impl ProduceResponse {
    pub fn from_model(model: produce::Model, owner_email: String) -> Self {
        Self {
            id: model.id,
            produce_name: model.produce_name,
            produce_category: model.produce_category_id,
            stock: model.stock,
            measurement_unit: model.measurement_unit.to_value(),
            owner: owner_email,
            price_tag: model.price_tag,
        }
    }
}

/// Inbound produce payload. All fields are optional at the serde layer so
/// missing required fields surface as field-keyed validation errors. The
/// owner never appears here: it comes from the authenticated caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProducePayload {
    pub produce_name: Option<String>,
    /// ID of the category the listing belongs to
    pub produce_category: Option<i32>,
    pub stock: Option<i64>,
    pub measurement_unit: Option<String>,
    pub price_tag: Option<Decimal>,
}

/// A creation payload that passed validation.
#[derive(Debug, Clone)]
pub struct NewProduce {
    pub produce_name: String,
    pub produce_category: i32,
    pub stock: i32,
    pub measurement_unit: MeasurementUnit,
    pub price_tag: Decimal,
}

/// The validated subset of fields present in an update payload.
#[derive(Debug, Clone, Default)]
pub struct ProduceChanges {
    pub produce_name: Option<String>,
    pub produce_category: Option<i32>,
    pub stock: Option<i32>,
    pub measurement_unit: Option<MeasurementUnit>,
    pub price_tag: Option<Decimal>,
}

impl ProduceChanges {
    pub fn is_empty(&self) -> bool {
        self.produce_name.is_none()
            && self.produce_category.is_none()
            && self.stock.is_none()
            && self.measurement_unit.is_none()
            && self.price_tag.is_none()
    }
}

impl ProducePayload {
    /// Validate a creation payload. Every field check runs independently;
    /// failures are aggregated per field rather than short-circuited.
    pub fn validate_create(&self) -> Result<NewProduce, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let produce_name = match self.produce_name.as_deref() {
            None => {
                errors.required("produce_name");
                None
            }
            Some(name) => check_name(name, &mut errors),
        };
        let produce_category = match self.produce_category {
            None => {
                errors.required("produce_category");
                None
            }
            Some(id) => Some(id),
        };
        let stock = match self.stock {
            None => {
                errors.required("stock");
                None
            }
            Some(stock) => check_stock(stock, &mut errors),
        };
        let measurement_unit = match self.measurement_unit.as_deref() {
            None => {
                errors.required("measurement_unit");
                None
            }
            Some(unit) => check_measurement_unit(unit, &mut errors),
        };
        let price_tag = match self.price_tag {
            None => {
                errors.required("price_tag");
                None
            }
            Some(price) => check_price(price, &mut errors),
        };

        match (
            produce_name,
            produce_category,
            stock,
            measurement_unit,
            price_tag,
        ) {
            (Some(produce_name), Some(produce_category), Some(stock), Some(unit), Some(price_tag))
                if errors.is_empty() =>
            {
                Ok(NewProduce {
                    produce_name,
                    produce_category,
                    stock,
                    measurement_unit: unit,
                    price_tag,
                })
            }
            _ => Err(errors),
        }
    }

    /// Validate an update payload: the same constraints, applied only to
    /// the fields that are present.
    pub fn validate_update(&self) -> Result<ProduceChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let produce_name = self
            .produce_name
            .as_deref()
            .and_then(|name| check_name(name, &mut errors));
        let stock = self.stock.and_then(|stock| check_stock(stock, &mut errors));
        let measurement_unit = self
            .measurement_unit
            .as_deref()
            .and_then(|unit| check_measurement_unit(unit, &mut errors));
        let price_tag = self
            .price_tag
            .and_then(|price| check_price(price, &mut errors));

        errors.finish()?;
        Ok(ProduceChanges {
            produce_name,
            produce_category: self.produce_category,
            stock,
            measurement_unit,
            price_tag,
        })
    }
}

fn check_name(name: &str, errors: &mut ValidationErrors) -> Option<String> {
    if name.trim().is_empty() {
        errors.add("produce_name", "This field may not be blank.");
        None
    } else {
        Some(name.to_string())
    }
}

fn check_stock(stock: i64, errors: &mut ValidationErrors) -> Option<i32> {
    if stock < 0 {
        errors.add("stock", "Ensure this value is greater than or equal to 0.");
        return None;
    }
    match i32::try_from(stock) {
        Ok(stock) => Some(stock),
        Err(_) => {
            errors.add(
                "stock",
                format!("Ensure this value is less than or equal to {}.", i32::MAX),
            );
            None
        }
    }
}

fn check_measurement_unit(unit: &str, errors: &mut ValidationErrors) -> Option<MeasurementUnit> {
    match MeasurementUnit::try_from_value(&unit.to_string()) {
        Ok(unit) => Some(unit),
        Err(_) => {
            errors.add(
                "measurement_unit",
                format!("\"{unit}\" is not a valid choice."),
            );
            None
        }
    }
}

fn check_price(price: Decimal, errors: &mut ValidationErrors) -> Option<Decimal> {
    if price < Decimal::ZERO {
        errors.add(
            "price_tag",
            "Ensure this value is greater than or equal to 0.",
        );
        None
    } else {
        Some(price)
    }
}
