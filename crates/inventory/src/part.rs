use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use sims_core::{DomainError, DomainResult, Entity, PartId};

static PART_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("constant regex pattern is valid"));

/// Part category. The catalog only accepts this fixed set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Engine,
    Brakes,
    Electrical,
    Wheels,
    Transmission,
    Suspension,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Engine,
        Category::Brakes,
        Category::Electrical,
        Category::Wheels,
        Category::Transmission,
        Category::Suspension,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Engine => "Engine",
            Category::Brakes => "Brakes",
            Category::Electrical => "Electrical",
            Category::Wheels => "Wheels",
            Category::Transmission => "Transmission",
            Category::Suspension => "Suspension",
            Category::Other => "Other",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "Category must be one of: {}",
                    Category::ALL.map(|c| c.as_str()).join(", ")
                ))
            })
    }
}

/// A catalog row: one spare-part SKU with on-hand quantity and price.
///
/// `total_price` is computed once when the part is added and is not kept in
/// sync with later quantity changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    pub name: String,
    pub category: Category,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
}

impl Entity for Part {
    type Id = PartId;

    fn id(&self) -> PartId {
        self.id
    }
}

/// Request to add a part to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPart {
    pub name: String,
    pub category: Category,
    pub quantity: i64,
    pub unit_price: f64,
}

impl NewPart {
    pub fn validate(&self) -> DomainResult<()> {
        if !PART_NAME.is_match(&self.name) || self.name.trim().is_empty() {
            return Err(DomainError::validation(
                "Part Name must contain only letters and spaces",
            ));
        }
        if self.quantity < 0 {
            return Err(DomainError::validation("Quantity cannot be negative"));
        }
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err(DomainError::validation(
                "Unit price must be a non-negative number",
            ));
        }
        if !self.total_price().is_finite() {
            return Err(DomainError::validation("Total price is too large"));
        }
        Ok(())
    }

    /// Inventory value at insert time.
    pub fn total_price(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }

    /// Materialize the catalog row once storage has assigned an id.
    pub fn into_part(self, id: PartId, created_at: DateTime<Utc>) -> Part {
        let total_price = self.total_price();
        Part {
            id,
            name: self.name,
            category: self.category,
            quantity: self.quantity,
            unit_price: self.unit_price,
            total_price,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brake_pad() -> NewPart {
        NewPart {
            name: "Brake Pad".to_string(),
            category: Category::Brakes,
            quantity: 20,
            unit_price: 5.0,
        }
    }

    #[test]
    fn total_price_is_quantity_times_unit_price() {
        let part = brake_pad().into_part(PartId::new(1), Utc::now());
        assert_eq!(part.total_price, 100.0);
        assert_eq!(part.quantity, 20);
    }

    #[test]
    fn names_with_digits_or_symbols_are_rejected() {
        for name in ["Brake Pad 2", "Oil-Filter", "Spark_Plug", "", "   "] {
            let mut p = brake_pad();
            p.name = name.to_string();
            let err = p.validate().unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{name:?} accepted");
        }
    }

    #[test]
    fn negative_quantity_and_price_are_rejected() {
        let mut p = brake_pad();
        p.quantity = -1;
        assert!(p.validate().is_err());

        let mut p = brake_pad();
        p.unit_price = -0.5;
        assert!(p.validate().is_err());

        let mut p = brake_pad();
        p.unit_price = f64::NAN;
        assert!(p.validate().is_err());
    }

    #[test]
    fn overflowing_total_price_is_rejected() {
        let mut p = brake_pad();
        p.quantity = i64::MAX;
        p.unit_price = f64::MAX;
        assert!(matches!(p.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn category_parses_only_known_values() {
        assert_eq!("Wheels".parse::<Category>().unwrap(), Category::Wheels);
        assert!("Exhaust".parse::<Category>().is_err());
        assert!("brakes".parse::<Category>().is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: letters-and-spaces names with a letter always pass and
            /// the stored total equals quantity * unit price.
            #[test]
            fn valid_parts_keep_total_price(
                name in "[A-Za-z][A-Za-z ]{0,40}",
                quantity in 0i64..100_000,
                cents in 0u32..1_000_000,
            ) {
                let unit_price = f64::from(cents) / 100.0;
                let new = NewPart { name, category: Category::Engine, quantity, unit_price };
                prop_assert!(new.validate().is_ok());
                let part = new.into_part(PartId::new(1), Utc::now());
                prop_assert_eq!(part.total_price, quantity as f64 * unit_price);
            }

            /// Property: any digit anywhere in the name is a validation error.
            #[test]
            fn digits_in_name_are_rejected(prefix in "[A-Za-z ]{0,10}", digit in 0u8..10, suffix in "[A-Za-z ]{0,10}") {
                let name = format!("{prefix}{digit}{suffix}");
                let new = NewPart { name, category: Category::Other, quantity: 1, unit_price: 1.0 };
                prop_assert!(new.validate().is_err());
            }
        }
    }
}
