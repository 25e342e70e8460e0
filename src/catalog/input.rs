use std::borrow::Cow;
use std::str::FromStr;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::entities::product::{self, PrimaryUnit, ProductType};
use crate::error::{CatalogError, FieldError};

/// Highest accepted base price. Keeps every derived amount finite and
/// representable to the cent.
pub const MAX_SELL_PRICE: f64 = 1_000_000_000_000.0;

/// Product fields as submitted by a caller. `None` means "not provided".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductFields {
    pub item_name: Option<String>,
    pub sell_price: Option<f64>,
    pub product_type: Option<String>,
    pub primary_unit: Option<String>,
    pub custom_unit: Option<String>,
    /// Raw flag text: true/false, 1/0, on/off, yes/no.
    pub gst_enabled: Option<String>,
}

#[derive(Debug, Validate)]
pub(crate) struct ProductInput {
    #[validate(length(min = 1, message = "itemName is required"))]
    item_name: String,
    #[validate(custom(function = "validate_sell_price"))]
    sell_price: f64,
    #[validate(custom(function = "validate_product_type"))]
    product_type: String,
    #[validate(custom(function = "validate_primary_unit"))]
    primary_unit: Option<String>,
    custom_unit: Option<String>,
    #[validate(custom(function = "validate_gst_flag"))]
    gst_enabled: String,
}

/// Input that passed validation, with closed-set values parsed.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidProduct {
    pub item_name: String,
    pub sell_price: f64,
    pub product_type: ProductType,
    pub primary_unit: Option<PrimaryUnit>,
    pub custom_unit: Option<String>,
    pub gst_enabled: bool,
}

impl ProductInput {
    pub(crate) fn for_create(fields: ProductFields) -> Self {
        Self {
            item_name: trimmed(fields.item_name).unwrap_or_default(),
            // a missing price fails the same check as a malformed one
            sell_price: fields.sell_price.unwrap_or(f64::NAN),
            product_type: trimmed(fields.product_type)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| ProductType::default().to_string()),
            primary_unit: trimmed(fields.primary_unit).filter(|u| !u.is_empty()),
            custom_unit: trimmed(fields.custom_unit).filter(|u| !u.is_empty()),
            gst_enabled: trimmed(fields.gst_enabled)
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| false.to_string()),
        }
    }

    /// Omitted fields keep the value stored on `existing`.
    pub(crate) fn for_update(fields: ProductFields, existing: &product::Model) -> Self {
        let primary_unit = match fields.primary_unit {
            Some(unit) => Some(unit.trim().to_owned()).filter(|u| !u.is_empty()),
            None => existing.primary_unit.map(|u| u.to_string()),
        };
        let custom_unit = match fields.custom_unit {
            Some(unit) => Some(unit.trim().to_owned()).filter(|u| !u.is_empty()),
            None => existing.custom_unit.clone(),
        };

        Self {
            item_name: trimmed(fields.item_name).unwrap_or_else(|| existing.item_name.clone()),
            sell_price: fields.sell_price.unwrap_or(existing.sell_price),
            product_type: trimmed(fields.product_type)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| existing.product_type.to_string()),
            primary_unit,
            custom_unit,
            gst_enabled: trimmed(fields.gst_enabled)
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| existing.gst_enabled.to_string()),
        }
    }

    pub(crate) fn into_valid(self) -> Result<ValidProduct, CatalogError> {
        self.validate()
            .map_err(|errors| CatalogError::Validation(field_errors(&errors)))?;

        let product_type = ProductType::from_str(&self.product_type)
            .map_err(|err| CatalogError::Validation(vec![FieldError::new("type", err)]))?;
        let primary_unit = self
            .primary_unit
            .as_deref()
            .map(PrimaryUnit::from_str)
            .transpose()
            .map_err(|err| CatalogError::Validation(vec![FieldError::new("primaryUnit", err)]))?;
        let gst_enabled = parse_flag(&self.gst_enabled).ok_or_else(|| {
            CatalogError::Validation(vec![FieldError::new("gstEnabled", GST_FLAG_MESSAGE)])
        })?;

        Ok(ValidProduct {
            item_name: self.item_name,
            sell_price: self.sell_price,
            product_type,
            primary_unit,
            custom_unit: self.custom_unit,
            gst_enabled,
        })
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned())
}

const GST_FLAG_MESSAGE: &str = "gstEnabled must be one of true, false, 1, 0, on, off, yes, no";

/// Parses a submitted flag; `None` for anything outside the accepted spellings.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}

fn validate_sell_price(price: f64) -> Result<(), ValidationError> {
    if price.is_finite() && price >= 0.0 && price <= MAX_SELL_PRICE {
        Ok(())
    } else {
        Err(ValidationError::new("sell_price").with_message(Cow::Borrowed(
            "sellPrice must be a number between 0 and 1000000000000",
        )))
    }
}

fn validate_gst_flag(value: &str) -> Result<(), ValidationError> {
    match parse_flag(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("gst_enabled").with_message(Cow::Borrowed(GST_FLAG_MESSAGE))),
    }
}

fn validate_product_type(value: &str) -> Result<(), ValidationError> {
    match ProductType::from_str(value) {
        Ok(_) => Ok(()),
        Err(_) => Err(ValidationError::new("product_type").with_message(Cow::Borrowed(
            "type must be one of Veg, Non-Veg, Beverage, Starter, Dessert, Breads",
        ))),
    }
}

fn validate_primary_unit(value: &str) -> Result<(), ValidationError> {
    match PrimaryUnit::from_str(value) {
        Ok(_) => Ok(()),
        Err(_) => Err(ValidationError::new("primary_unit")
            .with_message(Cow::Borrowed("primaryUnit must be one of piece, kg, gram"))),
    }
}

fn wire_name(field: &str) -> &str {
    match field {
        "item_name" => "itemName",
        "sell_price" => "sellPrice",
        "product_type" => "type",
        "primary_unit" => "primaryUnit",
        "custom_unit" => "customUnit",
        "gst_enabled" => "gstEnabled",
        other => other,
    }
}

fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = wire_name(&field.to_string()).to_owned();
            errs.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                FieldError::new(field.clone(), message)
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}
