use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

use super::{Amount, Category, EntityId, Resource};
use crate::validation::validate_positive_amount;

/// Date layout used by the backend, e.g. `14/10/2018`
pub const WIRE_DATE_FORMAT: &str = "%d/%m/%Y";

/// Whether an entry brings money in or takes it out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Revenue,
    Expense,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Revenue => "revenue",
            EntryType::Expense => "expense",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not an entry type (expected revenue or expense)")]
pub struct UnknownEntryType(pub String);

impl FromStr for EntryType {
    type Err = UnknownEntryType;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "revenue" => Ok(EntryType::Revenue),
            "expense" => Ok(EntryType::Expense),
            other => Err(UnknownEntryType(other.to_string())),
        }
    }
}

/// Single revenue or expense transaction filed under a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": 2,
    "name": "Remédios demais",
    "description": "Qualquer descrição para essa despesa",
    "type": "expense",
    "amount": "70,80",
    "date": "14/10/2018",
    "paid": false,
    "categoryId": 2
}))]
pub struct Entry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<u64>)]
    pub id: Option<EntityId>,

    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    #[schema(min_length = 2)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "type")]
    pub entry_type: EntryType,

    #[validate(custom(function = "validate_positive_amount"))]
    #[schema(value_type = String, example = "70,80")]
    pub amount: Amount,

    #[serde(with = "wire_date")]
    #[schema(value_type = String, example = "14/10/2018")]
    pub date: NaiveDate,

    pub paid: bool,

    /// Foreign key to the owning category; the source of truth for the relation
    #[schema(value_type = u64)]
    pub category_id: EntityId,

    /// Copy of the referenced category, filled in by the backend on reads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl Entry {
    pub fn new(
        name: impl Into<String>,
        entry_type: EntryType,
        amount: Amount,
        date: NaiveDate,
        paid: bool,
        category_id: EntityId,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            entry_type,
            amount,
            date,
            paid,
            category_id,
            category: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Drops the embedded category so only the foreign key is kept
    pub fn without_category(mut self) -> Self {
        self.category = None;
        self
    }
}

impl Resource for Entry {
    const PATH: &'static str = "entries";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

pub fn parse_wire_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw.trim(), WIRE_DATE_FORMAT)
}

pub fn format_wire_date(date: NaiveDate) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}

mod wire_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_wire_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_wire_date(&raw)
            .map_err(|e| de::Error::custom(format!("invalid date '{}': {}", raw, e)))
    }
}
