//! Admin dashboard statistics.

use serde::{Deserialize, Serialize};

/// Order count reported by the dashboard. There is no order storage yet.
pub const PLACEHOLDER_ORDER_COUNT: i64 = 15;

/// Revenue reported by the dashboard, in VND. There is no order storage yet.
pub const PLACEHOLDER_REVENUE: i64 = 15_000_000;

/// Status string reported while the service is serving requests.
pub const HEALTHY_STATUS: &str = "healthy";

/// Aggregate figures shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Number of product rows at query time.
    pub total_products: i64,
    /// Placeholder, see [`PLACEHOLDER_ORDER_COUNT`].
    pub total_orders: i64,
    /// Placeholder, see [`PLACEHOLDER_REVENUE`].
    pub revenue: i64,
    pub system_status: String,
}

impl DashboardStats {
    /// Build the stats from a real product count and the placeholder figures.
    #[must_use]
    pub fn with_product_count(total_products: i64) -> Self {
        Self {
            total_products,
            total_orders: PLACEHOLDER_ORDER_COUNT,
            revenue: PLACEHOLDER_REVENUE,
            system_status: HEALTHY_STATUS.to_owned(),
        }
    }
}
