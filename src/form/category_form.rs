use validator::Validate;

use super::{field_error, FormModel};
use crate::models::{Category, EntityId};
use crate::validation::FieldErrors;

/// Field group of the category form
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct CategoryFields {
    pub id: Option<EntityId>,

    #[validate(
        required(message = "Name is required"),
        length(min = 2, message = "Name must be at least 2 characters")
    )]
    pub name: Option<String>,

    pub description: Option<String>,
}

impl FormModel for Category {
    type Fields = CategoryFields;

    const NEW_CAPTION: &'static str = "New category";
    const EDIT_CAPTION: &'static str = "Editing category: ";
    const SAVED_MESSAGE: &'static str =
        "Request processed successfully, you can now edit your category.";

    fn patch_fields(&self, fields: &mut CategoryFields) {
        if let Some(id) = self.id {
            fields.id = Some(id);
        }
        fields.name = Some(self.name.clone());
        if let Some(description) = &self.description {
            fields.description = Some(description.clone());
        }
    }

    fn from_fields(fields: &CategoryFields) -> Result<Self, FieldErrors> {
        let name = fields
            .name
            .clone()
            .ok_or_else(|| field_error("name", "Name is required"))?;

        Ok(Category {
            id: fields.id,
            name,
            description: fields.description.clone(),
        })
    }
}
