//! Plain-text rendering of list pages for the terminal

use std::fmt::Write as _;

use storefront_core::{
    listing::{ListView, Listable, PageMarker},
    types::{Category, Customer, Order, Product, Vendor},
    utils::customer_slug,
};

/// Record that can be laid out as a table row
pub trait TableRow {
    /// Column headings
    fn headers() -> &'static [&'static str];

    /// Cell values, one per heading
    fn cells(&self) -> Vec<String>;
}

fn or_na(value: Option<&str>) -> String {
    value.unwrap_or("N/A").to_string()
}

impl TableRow for Product {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Category", "Price", "Stock"]
    }

    fn cells(&self) -> Vec<String> {
        let stock = self
            .inventory
            .map(|level| format!("{} {}", level.quantity, level.unit))
            .or_else(|| self.quantity_in_stock.map(|q| q.to_string()));
        vec![
            self.id.clone(),
            self.name.clone(),
            or_na(self.category.as_deref()),
            or_na(self.price.as_deref()),
            or_na(stock.as_deref()),
        ]
    }
}

impl TableRow for Category {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Description"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            or_na(self.description.as_deref()),
        ]
    }
}

impl TableRow for Order {
    fn headers() -> &'static [&'static str] {
        &["Order", "Customer", "Date", "Total", "Status", "Items", "Delivery"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.order_number.clone().unwrap_or_else(|| self.id.clone()),
            self.customer.clone(),
            or_na(self.date.as_deref()),
            or_na(self.total.as_deref()),
            self.status.to_string(),
            self.items.map_or_else(|| "N/A".to_string(), |n| n.to_string()),
            or_na(self.delivery.as_deref()),
        ]
    }
}

impl TableRow for Customer {
    fn headers() -> &'static [&'static str] {
        &["Name", "Email", "Phone", "Profile"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
            format!("customers/{}", customer_slug(&self.name)),
        ]
    }
}

impl TableRow for Vendor {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Email", "Phone"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            or_na(self.email.as_deref()),
            or_na(self.phone.as_deref()),
        ]
    }
}

/// Pagination control, e.g. `1 … 5 6 [7] 8 9 10`
#[must_use]
pub fn render_markers(markers: &[PageMarker], current: usize) -> String {
    markers
        .iter()
        .map(|marker| match marker {
            PageMarker::Page(page) if *page == current => format!("[{page}]"),
            PageMarker::Page(page) => page.to_string(),
            PageMarker::Ellipsis => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Current page of a list view as an aligned table with its pagination
#[must_use]
pub fn render_page<T: Listable + TableRow>(view: &ListView<T>, max_visible: usize) -> String {
    let headers = T::headers();
    let rows: Vec<Vec<String>> = view.displayed().iter().map(|item| item.cells()).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(ToString::to_string).collect();
    push_row(&mut out, &header_cells, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);

    if rows.is_empty() {
        out.push_str("(no results)\n");
    }
    for row in &rows {
        push_row(&mut out, row, &widths);
    }

    let window = view.window();
    let _ = writeln!(
        out,
        "\nPage {} of {} ({} matching)",
        window.current_page,
        window.total_pages.max(1),
        view.filtered_count()
    );
    let markers = view.page_markers_with(max_visible);
    if !markers.is_empty() {
        let _ = writeln!(out, "{}", render_markers(&markers, window.current_page));
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use storefront_core::listing::ListOptions;

    fn vendor(i: usize) -> Vendor {
        Vendor {
            id: format!("v{i}"),
            name: format!("Vendor {i}"),
            email: None,
            phone: Some("0800".to_string()),
        }
    }

    #[test]
    fn test_render_markers_highlights_current_page() {
        let markers = [
            PageMarker::Page(1),
            PageMarker::Ellipsis,
            PageMarker::Page(6),
            PageMarker::Page(7),
            PageMarker::Page(8),
            PageMarker::Ellipsis,
            PageMarker::Page(10),
        ];
        assert_eq!(render_markers(&markers, 7), "1 … 6 [7] 8 … 10");
    }

    #[test]
    fn test_render_page_lists_rows_and_pagination() {
        let mut view = ListView::with_items(ListOptions::default(), (0..23).map(vendor).collect());
        view.set_page(3);

        let page = render_page(&view, 5);
        let lines: Vec<&str> = page.lines().collect();

        assert_eq!(lines.first().copied(), Some("ID   Name       Email  Phone"));
        assert!(page.contains("v20  Vendor 20  N/A    0800"));
        assert!(!page.contains("v19 "));
        assert!(page.contains("Page 3 of 3 (23 matching)"));
        assert_eq!(lines.last().copied(), Some("1 2 [3]"));
    }

    #[test]
    fn test_render_empty_page() {
        let view: ListView<Vendor> = ListView::new(ListOptions::default());
        let page = render_page(&view, 5);
        assert!(page.contains("(no results)"));
        assert!(page.contains("Page 1 of 1 (0 matching)"));
    }

    #[test]
    fn test_customer_row_links_to_slug() {
        let customer = Customer {
            id: None,
            name: "Taskane Marina".to_string(),
            email: "t@example.com".to_string(),
            phone: String::new(),
        };
        assert_eq!(customer.cells().last().unwrap(), "customers/taskane-marina");
    }
}
