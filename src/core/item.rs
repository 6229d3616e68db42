//! Item model and the wire shapes exchanged with the remote table.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier assigned by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single auction line item.
///
/// `id` is `None` while the item is pending, i.e. before the remote store
/// has accepted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    pub bid_number: i64,
    pub item_number: String,
    pub item_description: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub paid: bool,
}

impl Item {
    /// Create a pending item (no id, unpaid).
    pub fn pending(
        bid_number: i64,
        item_number: impl Into<String>,
        item_description: impl Into<String>,
        price: Option<f64>,
    ) -> Self {
        Self {
            id: None,
            bid_number,
            item_number: item_number.into(),
            item_description: item_description.into(),
            price,
            paid: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<ItemId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_paid(mut self, paid: bool) -> Self {
        self.paid = paid;
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Numeric value of `item_number`, used as the display sort key.
    pub fn sort_key(&self) -> Option<f64> {
        self.item_number
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
    }

    /// Amount still owed for this item.
    pub fn amount_due(&self) -> f64 {
        if self.paid {
            0.0
        } else {
            self.price.unwrap_or(0.0)
        }
    }

    /// The fields sent when creating this item remotely.
    pub fn to_fields(&self) -> ItemFields {
        ItemFields {
            bid_number: self.bid_number,
            item_number: self.item_number.clone(),
            item_description: self.item_description.clone(),
            price: self.price,
        }
    }

    /// The full field set sent on a batch update.
    pub fn to_record_fields(&self) -> RecordFields {
        RecordFields {
            bid_number: Some(self.bid_number),
            item_number: Some(self.item_number.clone()),
            item_description: Some(self.item_description.clone()),
            price: self.price,
            paid: Some(self.paid),
        }
    }
}

impl From<RawRecord> for Item {
    fn from(record: RawRecord) -> Self {
        let RawRecord { id, fields } = record;
        Self {
            id: Some(id),
            bid_number: fields.bid_number.unwrap_or(0),
            item_number: fields.item_number.unwrap_or_default(),
            item_description: fields.item_description.unwrap_or_default(),
            price: fields.price,
            paid: fields.paid.unwrap_or(false),
        }
    }
}

/// Payload of a create request. The remote store assigns `id` and `paid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFields {
    pub bid_number: i64,
    pub item_number: String,
    pub item_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl From<ItemFields> for RecordFields {
    fn from(fields: ItemFields) -> Self {
        Self {
            bid_number: Some(fields.bid_number),
            item_number: Some(fields.item_number),
            item_description: Some(fields.item_description),
            price: fields.price,
            paid: None,
        }
    }
}

/// Field bag of a remote record.
///
/// The hosted table omits empty cells entirely (an unchecked box is absent,
/// not `false`), so every field is optional on the way in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bid_number: Option<i64>,
    #[serde(
        default,
        deserialize_with = "deserialize_label",
        skip_serializing_if = "Option::is_none"
    )]
    pub item_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_description: Option<String>,
    // Sent as null on update so a cleared price is cleared remotely.
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid: Option<bool>,
}

/// Item numbers may be stored as text or as a number column.
fn deserialize_label<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Label>::deserialize(deserializer)?.map(|label| match label {
        Label::Text(text) => text,
        Label::Number(number) => number.to_string(),
    }))
}

/// A record as returned by the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: ItemId,
    #[serde(default)]
    pub fields: RecordFields,
}

impl RawRecord {
    pub fn new(id: impl Into<ItemId>, fields: RecordFields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// One entry of a batch update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordUpdate {
    pub id: ItemId,
    pub fields: RecordFields,
}

impl RecordUpdate {
    /// Build an update from a persisted item; `None` for a pending one.
    pub fn from_item(item: &Item) -> Option<Self> {
        item.id.clone().map(|id| Self {
            id,
            fields: item.to_record_fields(),
        })
    }
}
