//! Column configuration for tabular display of items.
//!
//! Each column resolves its kind once when it is built; rendering a cell is
//! then a match on that kind rather than a lookup by field name.

pub mod table;

use crate::core::Item;
use std::fmt;

pub use table::{render_checkout, render_table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    BidNumber,
    ItemNumber,
    ItemDescription,
    Price,
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Currency,
    Boolean,
}

impl ItemField {
    pub fn kind(self) -> ColumnKind {
        match self {
            ItemField::BidNumber => ColumnKind::Number,
            ItemField::ItemNumber | ItemField::ItemDescription => ColumnKind::Text,
            ItemField::Price => ColumnKind::Currency,
            ItemField::Paid => ColumnKind::Boolean,
        }
    }
}

/// A rendered cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(i64),
    Currency(Option<f64>),
    Boolean(bool),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Currency(Some(amount)) => write!(f, "${:.2}", amount),
            Cell::Currency(None) => Ok(()),
            Cell::Boolean(true) => f.write_str("[x]"),
            Cell::Boolean(false) => f.write_str("[ ]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub header: String,
    pub field: ItemField,
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(header: impl Into<String>, field: ItemField) -> Self {
        Self {
            header: header.into(),
            field,
            kind: field.kind(),
        }
    }

    /// Override the kind derived from the field, e.g. show a price as plain text.
    pub fn with_kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn cell(&self, item: &Item) -> Cell {
        let natural = match self.field {
            ItemField::BidNumber => Cell::Number(item.bid_number),
            ItemField::ItemNumber => Cell::Text(item.item_number.clone()),
            ItemField::ItemDescription => Cell::Text(item.item_description.clone()),
            ItemField::Price => Cell::Currency(item.price),
            ItemField::Paid => Cell::Boolean(item.paid),
        };
        match (self.kind, natural) {
            (ColumnKind::Text, Cell::Number(n)) => Cell::Text(n.to_string()),
            (ColumnKind::Text, Cell::Currency(price)) => {
                Cell::Text(price.map(|p| p.to_string()).unwrap_or_default())
            }
            (ColumnKind::Text, Cell::Boolean(b)) => Cell::Text(b.to_string()),
            (_, cell) => cell,
        }
    }
}

/// Bid number, item number, description, price and paid, in that order.
pub fn default_columns() -> Vec<Column> {
    vec![
        Column::new("Bid Number", ItemField::BidNumber),
        Column::new("Item Number", ItemField::ItemNumber),
        Column::new("Item Description", ItemField::ItemDescription),
        Column::new("Price", ItemField::Price),
        Column::new("Paid", ItemField::Paid),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_resolved_at_construction() {
        let columns = default_columns();
        let kinds: Vec<_> = columns.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Number,
                ColumnKind::Text,
                ColumnKind::Text,
                ColumnKind::Currency,
                ColumnKind::Boolean
            ]
        );
    }

    #[test]
    fn test_cells_render_by_kind() {
        let item = Item::pending(3, "12", "Lamp", Some(20.0)).with_paid(true);
        let rendered: Vec<String> = default_columns()
            .iter()
            .map(|c| c.cell(&item).to_string())
            .collect();
        assert_eq!(rendered, vec!["3", "12", "Lamp", "$20.00", "[x]"]);

        let pending = Item::pending(3, "12", "Lamp", None);
        assert_eq!(Column::new("Price", ItemField::Price).cell(&pending).to_string(), "");

        let plain = Column::new("Price", ItemField::Price).with_kind(ColumnKind::Text);
        assert_eq!(plain.cell(&item), Cell::Text("20".to_string()));
    }
}
