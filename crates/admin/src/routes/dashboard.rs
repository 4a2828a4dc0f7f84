//! Dashboard route handler.
//!
//! Renders the four summary tiles and four analytics charts from the
//! backend's aggregate endpoint. Chart data is serialized to JSON in the
//! handler so the template only splices label/value arrays into the chart
//! setup script.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::api::types::DashboardData;
use crate::error::Result;
use crate::filters;
use crate::middleware::auth::RequireAdminAuth;
use crate::state::AppState;

/// One chart's data, pre-serialized for the setup script.
#[derive(Debug, Clone)]
pub struct ChartView {
    pub labels_json: String,
    pub values_json: String,
}

impl ChartView {
    fn new(labels: &[String], values: &[u64]) -> Self {
        Self {
            labels_json: serde_json::to_string(labels).unwrap_or_else(|_| "[]".to_string()),
            values_json: serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string()),
        }
    }

    /// Whether there is anything to draw.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.values_json != "[]"
    }
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_name: String,
    pub total_sales: String,
    pub total_orders: u64,
    pub total_products: u64,
    pub total_customers: u64,
    pub product_orders: ChartView,
    pub weekly_orders: ChartView,
    pub order_status: ChartView,
    pub contact_requests: ChartView,
}

fn build_charts(data: &DashboardData) -> (ChartView, ChartView, ChartView, ChartView) {
    let product_labels: Vec<String> = data
        .product_orders
        .iter()
        .map(|p| p.product_name.clone())
        .collect();
    let product_values: Vec<u64> = data.product_orders.iter().map(|p| p.count).collect();

    let weekly_labels: Vec<String> = data
        .weekly_orders
        .iter()
        .map(|w| match (w.id.week, w.id.year) {
            (Some(week), Some(year)) => format!("W{week} {year}"),
            _ => "Unknown Week".to_string(),
        })
        .collect();
    let weekly_values: Vec<u64> = data.weekly_orders.iter().map(|w| w.count).collect();

    let status_labels: Vec<String> = data.order_status.iter().map(|s| s.status.clone()).collect();
    let status_values: Vec<u64> = data.order_status.iter().map(|s| s.count).collect();

    let month_labels: Vec<String> = data
        .contact_requests
        .iter()
        .map(|c| format!("Month {}", c.month))
        .collect();
    let month_values: Vec<u64> = data.contact_requests.iter().map(|c| c.count).collect();

    (
        ChartView::new(&product_labels, &product_values),
        ChartView::new(&weekly_labels, &weekly_values),
        ChartView::new(&status_labels, &status_values),
        ChartView::new(&month_labels, &month_values),
    )
}

/// Display the analytics dashboard.
#[instrument(skip(state, auth))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdminAuth(auth): RequireAdminAuth,
) -> Result<DashboardTemplate> {
    let data = state.api().dashboard(&auth.token).await?;

    let (product_orders, weekly_orders, order_status, contact_requests) = build_charts(&data);

    Ok(DashboardTemplate {
        admin_name: auth.admin.username,
        total_sales: data.total_sales_revenue.to_string(),
        total_orders: data.total_orders,
        total_products: data.total_products,
        total_customers: data.total_customers,
        product_orders,
        weekly_orders,
        order_status,
        contact_requests,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::types::{MonthlyCount, ProductOrderCount, StatusCount, WeekKey, WeeklyOrderCount};

    #[test]
    fn test_build_charts_labels() {
        let data = DashboardData {
            product_orders: vec![ProductOrderCount {
                product_name: "Seamaster".to_string(),
                count: 9,
            }],
            weekly_orders: vec![
                WeeklyOrderCount {
                    id: WeekKey {
                        week: Some(31),
                        year: Some(2026),
                    },
                    count: 5,
                },
                WeeklyOrderCount {
                    id: WeekKey {
                        week: None,
                        year: None,
                    },
                    count: 1,
                },
            ],
            order_status: vec![StatusCount {
                status: "pending".to_string(),
                count: 7,
            }],
            contact_requests: vec![MonthlyCount { month: 8, count: 3 }],
            ..DashboardData::default()
        };

        let (products, weekly, status, months) = build_charts(&data);
        assert_eq!(products.labels_json, "[\"Seamaster\"]");
        assert_eq!(weekly.labels_json, "[\"W31 2026\",\"Unknown Week\"]");
        assert_eq!(status.values_json, "[7]");
        assert_eq!(months.labels_json, "[\"Month 8\"]");
        assert!(products.has_data());
    }

    #[test]
    fn test_empty_chart_has_no_data() {
        let chart = ChartView::new(&[], &[]);
        assert!(!chart.has_data());
    }
}
