use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

use sims_core::{DomainError, PartId};
use sims_inventory::{
    DailyStockOutRow, DailyStockOutSummary, DashboardSummary, NewPart, NewStockIn, NewStockOut,
    Part, StockInRecord, StockOutRecord, StockStatusRow, StockStatusSummary,
};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePartRequest {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Quantity", deserialize_with = "number_or_text")]
    pub quantity: i64,
    #[serde(rename = "UnitPrice", deserialize_with = "number_or_text")]
    pub unit_price: f64,
}

impl CreatePartRequest {
    pub fn into_new_part(self) -> Result<NewPart, DomainError> {
        Ok(NewPart {
            name: self.name,
            category: self.category.parse()?,
            quantity: self.quantity,
            unit_price: self.unit_price,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct StockInRequest {
    #[serde(deserialize_with = "number_or_text")]
    pub spare_part_id: i64,
    #[serde(rename = "StockInQuantity", deserialize_with = "number_or_text")]
    pub quantity: i64,
    #[serde(rename = "StockInDate")]
    pub date: NaiveDate,
}

impl From<StockInRequest> for NewStockIn {
    fn from(body: StockInRequest) -> Self {
        NewStockIn {
            part_id: PartId::new(body.spare_part_id),
            quantity: body.quantity,
            date: body.date,
        }
    }
}

/// Body of both stock-out create and stock-out update.
#[derive(Debug, Deserialize)]
pub struct StockOutRequest {
    #[serde(deserialize_with = "number_or_text")]
    pub spare_part_id: i64,
    #[serde(rename = "StockOutQuantity", deserialize_with = "number_or_text")]
    pub quantity: i64,
    #[serde(rename = "StockOutUnitPrice", deserialize_with = "number_or_text")]
    pub unit_price: f64,
    #[serde(rename = "StockOutDate")]
    pub date: NaiveDate,
}

impl From<StockOutRequest> for NewStockOut {
    fn from(body: StockOutRequest) -> Self {
        NewStockOut {
            part_id: PartId::new(body.spare_part_id),
            quantity: body.quantity,
            unit_price: body.unit_price,
            date: body.date,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DailyReportQuery {
    pub date: Option<String>,
}

impl DailyReportQuery {
    /// The requested day, or `today` when the parameter is absent or blank.
    pub fn date_or(&self, today: NaiveDate) -> Result<NaiveDate, DomainError> {
        match self.date.as_deref().map(str::trim) {
            None | Some("") => Ok(today),
            Some(raw) => raw
                .parse()
                .map_err(|_| DomainError::validation(format!("date must be YYYY-MM-DD, got {raw:?}"))),
        }
    }
}

/// HTML forms post numbers as strings; accept either.
fn number_or_text<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + core::str::FromStr,
    T::Err: core::fmt::Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText<T> {
        Number(T),
        Text(String),
    }

    match NumberOrText::<T>::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

// -------------------------
// Response mapping
// -------------------------

pub fn part_to_json(p: &Part) -> Value {
    json!({
        "spare_part_id": p.id,
        "Name": p.name,
        "Category": p.category.as_str(),
        "Quantity": p.quantity,
        "UnitPrice": p.unit_price,
        "TotalPrice": p.total_price,
        "created_at": p.created_at,
    })
}

pub fn stock_in_to_json(r: &StockInRecord) -> Value {
    json!({
        "stock_in_id": r.entry.id,
        "spare_part_id": r.entry.part_id,
        "StockInQuantity": r.entry.quantity,
        "StockInDate": r.entry.date,
        "created_at": r.entry.created_at,
        "spare_part_name": r.part_name,
    })
}

pub fn stock_out_to_json(r: &StockOutRecord) -> Value {
    json!({
        "stock_out_id": r.entry.id,
        "spare_part_id": r.entry.part_id,
        "StockOutQuantity": r.entry.quantity,
        "StockOutUnitPrice": r.entry.unit_price,
        "StockOutTotalPrice": r.entry.total_price,
        "StockOutDate": r.entry.date,
        "created_at": r.entry.created_at,
        "spare_part_name": r.part_name,
    })
}

pub fn daily_row_to_json(r: &DailyStockOutRow) -> Value {
    json!({
        "stock_out_id": r.entry.id,
        "spare_part_id": r.entry.part_id,
        "StockOutQuantity": r.entry.quantity,
        "StockOutUnitPrice": r.entry.unit_price,
        "StockOutTotalPrice": r.entry.total_price,
        "StockOutDate": r.entry.date,
        "created_at": r.entry.created_at,
        "spare_part_name": r.part_name,
        "Category": r.category.as_str(),
    })
}

pub fn daily_summary_to_json(s: &DailyStockOutSummary) -> Value {
    json!({
        "date": s.date,
        "count": s.count,
        "total": s.total,
    })
}

pub fn stock_status_to_json(r: &StockStatusRow) -> Value {
    json!({
        "spare_part_id": r.part_id,
        "spare_part_name": r.part_name,
        "Category": r.category.as_str(),
        "UnitPrice": r.unit_price,
        "stored_quantity": r.quantity,
        "total_stock_out": r.total_stock_out,
        "remaining_quantity": r.quantity,
        "status": r.level().as_str(),
    })
}

pub fn stock_status_summary_to_json(s: &StockStatusSummary) -> Value {
    json!({
        "good": s.good,
        "low": s.low,
        "critical": s.critical,
    })
}

pub fn dashboard_to_json(s: &DashboardSummary) -> Value {
    json!({
        "totalSpareParts": s.total_spare_parts,
        "totalStockIn": s.total_stock_in,
        "totalStockOut": s.total_stock_out,
        "lowStockItems": s.low_stock_items,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sims_inventory::Category;

    use super::*;

    #[test]
    fn form_posted_strings_are_accepted() {
        let body: StockOutRequest = serde_json::from_value(json!({
            "spare_part_id": "3",
            "StockOutQuantity": "25",
            "StockOutUnitPrice": "6.00",
            "StockOutDate": "2024-01-02",
        }))
        .unwrap();
        let entry = NewStockOut::from(body);
        assert_eq!(entry.part_id, PartId::new(3));
        assert_eq!(entry.quantity, 25);
        assert_eq!(entry.unit_price, 6.0);
    }

    #[test]
    fn non_numeric_quantity_is_rejected() {
        let res = serde_json::from_value::<StockInRequest>(json!({
            "spare_part_id": 1,
            "StockInQuantity": "five",
            "StockInDate": "2024-01-01",
        }));
        assert!(res.is_err());
    }

    #[test]
    fn unknown_category_is_a_validation_error() {
        let body: CreatePartRequest = serde_json::from_value(json!({
            "Name": "Muffler", "Category": "Exhaust", "Quantity": 1, "UnitPrice": 1,
        }))
        .unwrap();
        assert!(matches!(body.into_new_part(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn daily_query_defaults_to_today() {
        let today: NaiveDate = "2024-05-05".parse().unwrap();
        assert_eq!(DailyReportQuery::default().date_or(today).unwrap(), today);
        let q = DailyReportQuery { date: Some("2024-01-02".into()) };
        assert_eq!(q.date_or(today).unwrap(), "2024-01-02".parse::<NaiveDate>().unwrap());
        let q = DailyReportQuery { date: Some("01/02/2024".into()) };
        assert!(q.date_or(today).is_err());
    }

    #[test]
    fn part_json_keeps_column_names() {
        let part = NewPart { name: "Brake Pad".into(), category: Category::Brakes, quantity: 20, unit_price: 5.0 }
            .into_part(PartId::new(1), Utc::now());
        let v = part_to_json(&part);
        assert_eq!(v["spare_part_id"], 1);
        assert_eq!(v["Category"], "Brakes");
        assert_eq!(v["TotalPrice"], 100.0);
    }
}
