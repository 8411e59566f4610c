//! Core types for the cafeteria menu

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use utoipa::ToSchema;

use crate::error::{Error, Result};

/// A serving team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Team {
    #[serde(rename = "1조")]
    First,
    #[serde(rename = "2조")]
    Second,
    #[serde(rename = "3조")]
    Third,
}

impl Team {
    pub const ALL: [Team; 3] = [Team::First, Team::Second, Team::Third];

    pub fn label(self) -> &'static str {
        match self {
            Team::First => "1조",
            Team::Second => "2조",
            Team::Third => "3조",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|team| team.label() == label)
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Serving rotation: every team exactly once, in serving order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Team>")]
pub struct ServingOrder([Team; 3]);

impl ServingOrder {
    pub fn teams(&self) -> &[Team; 3] {
        &self.0
    }
}

impl TryFrom<Vec<Team>> for ServingOrder {
    type Error = Error;

    fn try_from(teams: Vec<Team>) -> Result<Self> {
        let teams: [Team; 3] = teams.try_into().map_err(|_| Error::InvalidOrder)?;
        if Team::ALL.iter().all(|team| teams.contains(team)) {
            Ok(Self(teams))
        } else {
            Err(Error::InvalidOrder)
        }
    }
}

/// Meal occasions a day's menu must cover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealType {
    Lunch,
    Dinner,
}

impl MealType {
    pub const ALL: [MealType; 2] = [MealType::Lunch, MealType::Dinner];

    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One meal's composition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Meal {
    pub rice: String,
    pub soup: String,
    pub dishes: String,
    pub kimchi: String,
    /// Side dish corner
    pub plus_corner: String,
}

impl Meal {
    pub const FIELDS: [&'static str; 5] = ["rice", "soup", "dishes", "kimchi", "plus_corner"];

    fn from_json(meal_type: MealType, value: &Value) -> Result<Self> {
        let record = value.as_object().ok_or_else(|| {
            Error::InvalidField(format!("'{}' must be an object", meal_type))
        })?;

        for field in Self::FIELDS {
            if is_absent(record, field) {
                return Err(Error::MissingMealField {
                    meal: meal_type,
                    field,
                });
            }
        }

        let text = |field: &'static str| -> Result<String> {
            record[field].as_str().map(str::to_owned).ok_or_else(|| {
                Error::InvalidField(format!("'{}.{}' must be a string", meal_type, field))
            })
        };

        Ok(Self {
            rice: text("rice")?,
            soup: text("soup")?,
            dishes: text("dishes")?,
            kimchi: text("kimchi")?,
            plus_corner: text("plus_corner")?,
        })
    }
}

/// Lunch and dinner for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Meals {
    pub lunch: Meal,
    pub dinner: Meal,
}

impl Meals {
    fn from_json(value: &Value) -> Result<Self> {
        let meals = value
            .as_object()
            .ok_or_else(|| Error::InvalidField("'meals' must be an object".into()))?;

        // Both meal types must be present before any field is inspected
        for meal_type in MealType::ALL {
            if is_absent(meals, meal_type.as_str()) {
                return Err(Error::MissingMealType(meal_type));
            }
        }

        Ok(Self {
            lunch: Meal::from_json(MealType::Lunch, &meals["lunch"])?,
            dinner: Meal::from_json(MealType::Dinner, &meals["dinner"])?,
        })
    }
}

/// A persisted day's menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MenuEntry {
    pub id: i64,
    pub date: String,
    pub meals: Meals,
    #[schema(value_type = Vec<Team>)]
    pub order: ServingOrder,
}

/// A validated menu awaiting insertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct NewMenuEntry {
    /// Calendar date identifier, stored verbatim
    pub date: String,
    pub meals: Meals,
    /// Serving rotation, each team exactly once
    #[schema(value_type = Vec<Team>)]
    pub order: ServingOrder,
}

impl NewMenuEntry {
    /// Validate an untyped request document.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// required keys, serving order, meal types, then meal fields.
    pub fn from_json(value: &Value) -> Result<Self> {
        let body = value
            .as_object()
            .ok_or_else(|| Error::InvalidBody("expected a JSON object".into()))?;

        for field in ["date", "meals", "order"] {
            if is_absent(body, field) {
                return Err(Error::MissingField(field));
            }
        }

        let order = parse_order(&body["order"])?;
        let meals = Meals::from_json(&body["meals"])?;
        let date = body["date"]
            .as_str()
            .ok_or_else(|| Error::InvalidField("'date' must be a string".into()))?
            .to_owned();

        Ok(Self { date, meals, order })
    }
}

fn parse_order(value: &Value) -> Result<ServingOrder> {
    let labels = value.as_array().ok_or(Error::InvalidOrder)?;
    let teams = labels
        .iter()
        .map(|label| label.as_str().and_then(Team::from_label).ok_or(Error::InvalidOrder))
        .collect::<Result<Vec<_>>>()?;
    ServingOrder::try_from(teams)
}

/// `null` counts as missing
fn is_absent(object: &Map<String, Value>, key: &str) -> bool {
    object.get(key).map_or(true, Value::is_null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meal(prefix: &str) -> Value {
        json!({
            "rice": format!("{prefix} 쌀밥"),
            "soup": format!("{prefix} 된장국"),
            "dishes": format!("{prefix} 제육볶음"),
            "kimchi": "배추김치",
            "plus_corner": "샐러드",
        })
    }

    fn valid_body() -> Value {
        json!({
            "date": "2024-03-04",
            "meals": { "lunch": meal("점심"), "dinner": meal("저녁") },
            "order": ["2조", "3조", "1조"],
        })
    }

    #[test]
    fn test_valid_body_parses() {
        let entry = NewMenuEntry::from_json(&valid_body()).unwrap();

        assert_eq!(entry.date, "2024-03-04");
        assert_eq!(entry.meals.lunch.rice, "점심 쌀밥");
        assert_eq!(entry.meals.dinner.plus_corner, "샐러드");
        assert_eq!(entry.order.teams(), &[Team::Second, Team::Third, Team::First]);
    }

    #[test]
    fn test_missing_order() {
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove("order");

        let err = NewMenuEntry::from_json(&body).unwrap_err();
        assert!(matches!(err, Error::MissingField("order")));
    }

    #[test]
    fn test_null_date_counts_as_missing() {
        let mut body = valid_body();
        body["date"] = Value::Null;

        let err = NewMenuEntry::from_json(&body).unwrap_err();
        assert!(matches!(err, Error::MissingField("date")));
    }

    #[test]
    fn test_short_order_rejected() {
        let mut body = valid_body();
        body["order"] = json!(["1조", "2조"]);

        assert!(matches!(
            NewMenuEntry::from_json(&body).unwrap_err(),
            Error::InvalidOrder
        ));
    }

    #[test]
    fn test_duplicate_team_rejected() {
        let mut body = valid_body();
        body["order"] = json!(["1조", "1조", "3조"]);

        assert!(matches!(
            NewMenuEntry::from_json(&body).unwrap_err(),
            Error::InvalidOrder
        ));
    }

    #[test]
    fn test_unknown_team_and_long_order_rejected() {
        for order in [
            json!(["1조", "2조", "4조"]),
            json!(["1조", "2조", "3조", "1조"]),
            json!("1조,2조,3조"),
            json!([1, 2, 3]),
        ] {
            let mut body = valid_body();
            body["order"] = order;
            assert!(matches!(
                NewMenuEntry::from_json(&body).unwrap_err(),
                Error::InvalidOrder
            ));
        }
    }

    #[test]
    fn test_order_checked_before_meals() {
        let body = json!({
            "date": "2024-03-04",
            "meals": {},
            "order": ["1조"],
        });

        assert!(matches!(
            NewMenuEntry::from_json(&body).unwrap_err(),
            Error::InvalidOrder
        ));
    }

    #[test]
    fn test_missing_meal_type() {
        let mut body = valid_body();
        body["meals"].as_object_mut().unwrap().remove("dinner");

        let err = NewMenuEntry::from_json(&body).unwrap_err();
        assert!(matches!(err, Error::MissingMealType(MealType::Dinner)));
        assert!(err.to_string().contains("dinner"));
    }

    #[test]
    fn test_meal_types_checked_before_fields() {
        let mut body = valid_body();
        body["meals"]["lunch"].as_object_mut().unwrap().remove("soup");
        body["meals"].as_object_mut().unwrap().remove("dinner");

        assert!(matches!(
            NewMenuEntry::from_json(&body).unwrap_err(),
            Error::MissingMealType(MealType::Dinner)
        ));
    }

    #[test]
    fn test_missing_meal_field() {
        let mut body = valid_body();
        body["meals"]["dinner"].as_object_mut().unwrap().remove("kimchi");

        let err = NewMenuEntry::from_json(&body).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingMealField {
                meal: MealType::Dinner,
                field: "kimchi"
            }
        ));
    }

    #[test]
    fn test_non_string_meal_field() {
        let mut body = valid_body();
        body["meals"]["lunch"]["rice"] = json!(42);

        assert!(matches!(
            NewMenuEntry::from_json(&body).unwrap_err(),
            Error::InvalidField(_)
        ));
    }

    #[test]
    fn test_non_object_body() {
        assert!(matches!(
            NewMenuEntry::from_json(&json!(["not", "an", "object"])).unwrap_err(),
            Error::InvalidBody(_)
        ));
    }

    #[test]
    fn test_serving_order_decoding_enforces_invariant() {
        let order: ServingOrder = serde_json::from_str(r#"["3조","1조","2조"]"#).unwrap();
        assert_eq!(order.teams(), &[Team::Third, Team::First, Team::Second]);
        assert_eq!(serde_json::to_string(&order).unwrap(), r#"["3조","1조","2조"]"#);

        assert!(serde_json::from_str::<ServingOrder>(r#"["1조","1조","2조"]"#).is_err());
    }
}
