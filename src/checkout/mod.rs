//! Checkout aggregation over the record store.

pub mod session;

use crate::core::Item;

pub use session::CheckoutSession;

/// Items claimed by `bidder`, in the order given.
pub fn select_by_bidder(items: &[Item], bidder: i64) -> Vec<Item> {
    items
        .iter()
        .filter(|item| item.bid_number == bidder)
        .cloned()
        .collect()
}

/// Sum still owed: unpaid prices, absent price counting as zero.
pub fn total_due(items: &[Item]) -> f64 {
    items.iter().map(Item::amount_due).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_due_skips_paid_and_missing_prices() {
        let items = vec![
            Item::pending(1, "1", "Lamp", Some(10.0)),
            Item::pending(1, "2", "Vase", Some(5.0)).with_paid(true),
            Item::pending(1, "3", "Rug", None),
            Item::pending(1, "4", "Free", Some(0.0)),
        ];
        assert_eq!(total_due(&items), 10.0);
        assert_eq!(total_due(&[]), 0.0);
    }

    #[test]
    fn test_select_by_bidder_keeps_order() {
        let items = vec![
            Item::pending(7, "1", "a", None).with_id("r1"),
            Item::pending(9, "2", "b", None).with_id("r2"),
            Item::pending(7, "3", "c", None).with_id("r3"),
        ];

        let selected = select_by_bidder(&items, 7);
        assert_eq!(selected, vec![items[0].clone(), items[2].clone()]);
        assert!(select_by_bidder(&items, 4).is_empty());
    }
}
