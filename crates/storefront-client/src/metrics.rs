//! Order counters shown on the dashboard landing page

use serde::Serialize;
use storefront_core::{
    types::{Order, OrderStatus},
    utils::parse_price,
};

/// Order counts by fulfilment stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OrderMetrics {
    /// Orders fetched
    pub total_orders: usize,
    /// Orders awaiting dispatch
    pub pending: usize,
    /// Orders on their way
    pub dispatched: usize,
    /// Orders that reached the customer
    pub delivered: usize,
    /// Cancelled or returned orders
    pub cancelled: usize,
    /// Sum of item counts over all orders
    pub items: u64,
    /// Sum of parseable order totals
    pub revenue: f64,
}

impl OrderMetrics {
    /// Tally a fetched order list
    #[must_use]
    pub fn from_orders(orders: &[Order]) -> Self {
        orders.iter().fold(
            Self {
                total_orders: orders.len(),
                ..Self::default()
            },
            |mut acc, order| {
                match order.status {
                    OrderStatus::Pending => acc.pending += 1,
                    OrderStatus::Dispatched | OrderStatus::Shipped => acc.dispatched += 1,
                    OrderStatus::Delivered | OrderStatus::Completed => acc.delivered += 1,
                    OrderStatus::Cancelled | OrderStatus::Returned => acc.cancelled += 1,
                    OrderStatus::Other(_) => {}
                }
                acc.items += u64::from(order.items.unwrap_or(1));
                if let Some(total) = order.total.as_deref().and_then(|t| parse_price(t).ok()) {
                    acc.revenue += total;
                }
                acc
            },
        )
    }
}
