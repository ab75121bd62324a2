pub mod amount;
pub mod category;
pub mod entry;

use serde::{de::DeserializeOwned, Serialize};

pub use amount::{Amount, AmountParseError};
pub use category::Category;
pub use entry::{format_wire_date, parse_wire_date, Entry, EntryType, UnknownEntryType};

/// Identifier assigned by the backend to a stored record
pub type EntityId = u64;

/// A record kind exposed by the backend under `api/<PATH>`.
///
/// Both the HTTP client and the in-memory backend are generic over this
/// trait, so categories and entries share one code path end to end.
pub trait Resource: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection segment of the resource URL, e.g. `categories`
    const PATH: &'static str;

    fn id(&self) -> Option<EntityId>;

    /// Returns the record carrying `id`. Only the backend assigns identifiers.
    fn with_id(self, id: EntityId) -> Self;

    /// Human readable name used in page titles and log lines
    fn display_name(&self) -> &str;
}
