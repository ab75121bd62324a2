use validator::Validate;

use super::{field_error, FormModel};
use crate::models::{format_wire_date, parse_wire_date, Amount, EntityId, Entry, EntryType};
use crate::validation::{validate_amount, validate_wire_date, FieldErrors};

/// Field group of the entry form. Amount and date hold what the user typed
/// (`70,80`, `14/10/2018`) until the entry is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct EntryFields {
    pub id: Option<EntityId>,

    #[validate(
        required(message = "Name is required"),
        length(min = 2, message = "Name must be at least 2 characters")
    )]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(required(message = "Type is required"))]
    pub entry_type: Option<EntryType>,

    #[validate(
        required(message = "Amount is required"),
        custom(function = "validate_amount")
    )]
    pub amount: Option<String>,

    #[validate(
        required(message = "Date is required"),
        custom(function = "validate_wire_date")
    )]
    pub date: Option<String>,

    #[validate(required(message = "Paid is required"))]
    pub paid: Option<bool>,

    #[validate(required(message = "Category is required"))]
    pub category_id: Option<EntityId>,
}

impl FormModel for Entry {
    type Fields = EntryFields;

    const NEW_CAPTION: &'static str = "New entry";
    const EDIT_CAPTION: &'static str = "Editing entry: ";
    const SAVED_MESSAGE: &'static str =
        "Request processed successfully, you can now edit your entry.";

    fn patch_fields(&self, fields: &mut EntryFields) {
        if let Some(id) = self.id {
            fields.id = Some(id);
        }
        fields.name = Some(self.name.clone());
        if let Some(description) = &self.description {
            fields.description = Some(description.clone());
        }
        fields.entry_type = Some(self.entry_type);
        fields.amount = Some(self.amount.to_string());
        fields.date = Some(format_wire_date(self.date));
        fields.paid = Some(self.paid);
        fields.category_id = Some(self.category_id);
    }

    fn from_fields(fields: &EntryFields) -> Result<Self, FieldErrors> {
        let name = fields
            .name
            .clone()
            .ok_or_else(|| field_error("name", "Name is required"))?;
        let entry_type = fields
            .entry_type
            .ok_or_else(|| field_error("entry_type", "Type is required"))?;
        let amount: Amount = fields
            .amount
            .as_deref()
            .ok_or_else(|| field_error("amount", "Amount is required"))?
            .parse()
            .map_err(|e: crate::models::AmountParseError| field_error("amount", e.to_string()))?;
        let date = fields
            .date
            .as_deref()
            .ok_or_else(|| field_error("date", "Date is required"))
            .and_then(|raw| {
                parse_wire_date(raw)
                    .map_err(|_| field_error("date", "Date must be in dd/mm/yyyy format"))
            })?;
        let paid = fields
            .paid
            .ok_or_else(|| field_error("paid", "Paid is required"))?;
        let category_id = fields
            .category_id
            .ok_or_else(|| field_error("category_id", "Category is required"))?;

        Ok(Entry {
            id: fields.id,
            name,
            description: fields.description.clone(),
            entry_type,
            amount,
            date,
            paid,
            category_id,
            category: None,
        })
    }
}
