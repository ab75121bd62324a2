use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{EntityId, Resource};

/// Budget bucket that entries are filed under
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "id": 3,
    "name": "Lazer",
    "description": "Cinema, parques, praia, etc"
}))]
pub struct Category {
    /// Assigned by the backend, absent until the category is persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<u64>)]
    pub id: Option<EntityId>,

    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    #[schema(min_length = 2, example = "Lazer")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description,
        }
    }
}

impl Resource for Category {
    const PATH: &'static str = "categories";

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
