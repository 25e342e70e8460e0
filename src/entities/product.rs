use sea_orm::entity::prelude::*;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "products")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub item_name: String,
    #[sea_orm(column_type = "Double")]
    pub sell_price: f64,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub primary_unit: Option<PrimaryUnit>,
    pub custom_unit: Option<String>,
    pub gst_enabled: bool,
    pub gst_percentage: i32,
    #[sea_orm(column_type = "Double")]
    pub gst_amount: f64,
    #[sea_orm(column_type = "Double")]
    pub total_price: f64,
    #[sea_orm(unique)]
    pub barcode: String,
    #[sea_orm(column_type = "Text")]
    pub image_url: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(
    enum_name = "product_type_enum",
    db_type = "String(StringLen::N(32))",
    rs_type = "String"
)]
pub enum ProductType {
    #[default]
    #[sea_orm(string_value = "Veg")]
    Veg,
    #[sea_orm(string_value = "Non-Veg")]
    #[serde(rename = "Non-Veg")]
    NonVeg,
    #[sea_orm(string_value = "Beverage")]
    Beverage,
    #[sea_orm(string_value = "Starter")]
    Starter,
    #[sea_orm(string_value = "Dessert")]
    Dessert,
    #[sea_orm(string_value = "Breads")]
    Breads,
}

impl FromStr for ProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Veg" => Ok(Self::Veg),
            "Non-Veg" => Ok(Self::NonVeg),
            "Beverage" => Ok(Self::Beverage),
            "Starter" => Ok(Self::Starter),
            "Dessert" => Ok(Self::Dessert),
            "Breads" => Ok(Self::Breads),
            _ => Err(format!("Invalid product type: {}", s)),
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::Veg => "Veg",
            Self::NonVeg => "Non-Veg",
            Self::Beverage => "Beverage",
            Self::Starter => "Starter",
            Self::Dessert => "Dessert",
            Self::Breads => "Breads",
        };
        f.write_str(value)
    }
}

/// Selling unit. An empty unit is stored as `NULL`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(
    enum_name = "primary_unit_enum",
    db_type = "String(StringLen::N(16))",
    rs_type = "String"
)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryUnit {
    #[sea_orm(string_value = "piece")]
    Piece,
    #[sea_orm(string_value = "kg")]
    Kg,
    #[sea_orm(string_value = "gram")]
    Gram,
}

impl FromStr for PrimaryUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "piece" => Ok(Self::Piece),
            "kg" => Ok(Self::Kg),
            "gram" => Ok(Self::Gram),
            _ => Err(format!("Invalid primary unit: {}", s)),
        }
    }
}

impl fmt::Display for PrimaryUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::Piece => "piece",
            Self::Kg => "kg",
            Self::Gram => "gram",
        };
        f.write_str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_type_parses_closed_set() {
        for name in ["Veg", "Non-Veg", "Beverage", "Starter", "Dessert", "Breads"] {
            let parsed = ProductType::from_str(name).unwrap();
            assert_eq!(parsed.to_string(), name);
        }
        assert!(ProductType::from_str("veg").is_err());
        assert!(ProductType::from_str("Snack").is_err());
    }

    #[test]
    fn product_type_serializes_with_hyphen() {
        let json = serde_json::to_string(&ProductType::NonVeg).unwrap();
        assert_eq!(json, "\"Non-Veg\"");
    }

    #[test]
    fn primary_unit_rejects_unknown() {
        assert_eq!(PrimaryUnit::from_str("kg"), Ok(PrimaryUnit::Kg));
        assert!(PrimaryUnit::from_str("litre").is_err());
    }
}
