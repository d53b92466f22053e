//! Askama templates for the web frontend.

use askama::Template;

use crate::exchange::{Dashboard, RouteQuery};
use crate::store::{ExchangeDetail, Listing};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Home page.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate;

/// Route-matched listings.
#[derive(Template)]
#[template(path = "browse.html")]
pub struct BrowseTemplate {
    pub source: String,
    pub destination: String,
    pub journey_date: String,
    pub listings: Vec<ListingView>,
}

impl BrowseTemplate {
    pub fn new(query: &RouteQuery, listings: &[Listing]) -> Self {
        Self {
            source: query.source.clone().unwrap_or_default(),
            destination: query.destination.clone().unwrap_or_default(),
            journey_date: query.date.map(|d| d.to_string()).unwrap_or_default(),
            listings: listings.iter().map(ListingView::from_listing).collect(),
        }
    }
}

/// A user's listings, purchases and sales.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub username: String,
    pub listings: Vec<ListingView>,
    pub purchases: Vec<ExchangeView>,
    pub sales: Vec<ExchangeView>,
}

impl DashboardTemplate {
    pub fn new(username: &str, dashboard: &Dashboard) -> Self {
        Self {
            username: username.to_string(),
            listings: dashboard.listings.iter().map(ListingView::from_listing).collect(),
            purchases: dashboard.purchases.iter().map(ExchangeView::from_detail).collect(),
            sales: dashboard.sales.iter().map(ExchangeView::from_detail).collect(),
        }
    }
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Format paise as rupees, e.g. `25050` → `"₹250.50"`.
pub fn format_rupees(paise: i64) -> String {
    let sign = if paise < 0 { "-" } else { "" };
    let abs = paise.unsigned_abs();
    format!("{sign}₹{}.{:02}", abs / 100, abs % 100)
}

/// Listing view model for templates.
#[derive(Debug, Clone)]
pub struct ListingView {
    pub id: i64,
    pub train: String,
    pub route: String,
    pub journey_date: String,
    pub seat: String,
    pub price: String,
    pub status: String,
    pub description: String,
}

impl ListingView {
    pub fn from_listing(l: &Listing) -> Self {
        Self {
            id: l.id,
            train: format!("{} {}", l.train_number, l.train_name),
            route: format!(
                "{} ({}) → {} ({})",
                l.source_station,
                l.source_station_code,
                l.destination_station,
                l.destination_station_code
            ),
            journey_date: l.journey_date.format("%d %b %Y").to_string(),
            seat: format!("{}/{} {}", l.coach_number, l.seat_number, l.seat_type.label()),
            price: format_rupees(l.price_paise),
            status: l.status.to_string(),
            description: l.description.clone().unwrap_or_default(),
        }
    }
}

/// Exchange view model for templates.
#[derive(Debug, Clone)]
pub struct ExchangeView {
    pub id: i64,
    pub train: String,
    pub seat: String,
    pub counterparty: String,
    pub amount: String,
    pub payment_status: String,
    pub exchange_date: String,
}

impl ExchangeView {
    pub fn from_detail(x: &ExchangeDetail) -> Self {
        Self {
            id: x.id,
            train: format!("{} {}", x.train_number, x.train_name),
            seat: format!("{}/{}", x.coach_number, x.seat_number),
            counterparty: format!("{} → {}", x.seller_username, x.buyer_username),
            amount: format_rupees(x.exchange_amount_paise),
            payment_status: x.payment_status.to_string(),
            exchange_date: x.exchange_date.format("%d %b %Y %H:%M").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ListingStatus, SeatType};
    use chrono::{NaiveDate, Utc};

    fn listing() -> Listing {
        Listing {
            id: 3,
            owner_id: 1,
            pnr_number: "8634824688".into(),
            train_number: "12185".into(),
            train_name: "REWANCHAL EXP".into(),
            source_station: "Rani Kamlapati".into(),
            destination_station: "Rewa".into(),
            source_station_code: "RKMP".into(),
            destination_station_code: "REWA".into(),
            journey_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            seat_type: SeatType::SideUpper,
            seat_number: "48".into(),
            coach_number: "B2".into(),
            price_paise: 25_050,
            description: None,
            status: ListingStatus::Available,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn rupees() {
        assert_eq!(format_rupees(25_050), "₹250.50");
        assert_eq!(format_rupees(5), "₹0.05");
        assert_eq!(format_rupees(-100), "-₹1.00");
    }

    #[test]
    fn listing_view() {
        let view = ListingView::from_listing(&listing());
        assert_eq!(view.train, "12185 REWANCHAL EXP");
        assert_eq!(view.route, "Rani Kamlapati (RKMP) → Rewa (REWA)");
        assert_eq!(view.journey_date, "01 Jul 2025");
        assert_eq!(view.seat, "B2/48 Side Upper");
        assert_eq!(view.status, "AVAILABLE");
    }

    #[test]
    fn browse_renders_listings() {
        let query = RouteQuery {
            source: Some("RKMP".into()),
            destination: Some("REWA".into()),
            ..RouteQuery::default()
        };
        let html = BrowseTemplate::new(&query, &[listing()]).render().unwrap();
        assert!(html.contains("REWANCHAL EXP"));
        assert!(html.contains("₹250.50"));
    }

    #[test]
    fn browse_renders_empty_state() {
        let html = BrowseTemplate::new(&RouteQuery::default(), &[]).render().unwrap();
        assert!(html.contains("No seats match"));
    }
}
