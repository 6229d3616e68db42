use super::{Column, Item};
use crate::checkout::CheckoutSession;

/// Render items as an aligned text table with a trailing row count.
pub fn render_table(columns: &[Column], items: &[Item]) -> String {
    if columns.is_empty() {
        return "Empty result set\n".to_string();
    }

    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| columns.iter().map(|c| c.cell(item).to_string()).collect())
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.header.chars().count()).collect();
    for row in &rows {
        for (i, value) in row.iter().enumerate() {
            widths[i] = widths[i].max(value.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 4);
    let header: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| format!("{:width$}", col.header, width = widths[i]))
        .collect();
    lines.push(header.join(" | ").trim_end().to_string());

    let separator: String = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-");
    lines.push(separator);

    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, val)| format!("{:width$}", val, width = widths[i]))
            .collect();
        lines.push(line.join(" | ").trim_end().to_string());
    }

    lines.push(String::new());
    lines.push(format!("{} item(s)", rows.len()));
    lines.join("\n") + "\n"
}

/// Render a checkout: one line per item with its paid box, then the total due.
pub fn render_checkout(session: &CheckoutSession) -> String {
    if session.is_empty() {
        return "No items to checkout\n".to_string();
    }

    let mut lines = Vec::with_capacity(session.items().len() + 2);
    lines.push(format!("Checkout for bidder {}", session.bidder()));
    for item in session.items() {
        let paid = if item.paid { "[x]" } else { "[ ]" };
        let id = item.id.as_ref().map(|id| id.as_str()).unwrap_or("-");
        lines.push(format!(
            "{} {} {} {} ${:.2}",
            paid,
            id,
            item.item_number,
            item.item_description,
            item.price.unwrap_or(0.0)
        ));
    }
    lines.push(format!("total due: ${:.2}", session.total_due()));
    lines.join("\n") + "\n"
}
