//! Route matching between a requester's journey and open listings.

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::store::{JourneyProfile, Listing, ListingRepo};

/// Explicit search terms. Empty fields fall back to the profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteSearch {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub travel_class: Option<String>,
}

/// Effective route filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteQuery {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub date: Option<NaiveDate>,
    /// Carried for display; not used as a filter.
    pub travel_class: Option<String>,
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Profile station needle: the code when present, else the name.
fn profile_station(code: &str, name: &str) -> Option<String> {
    non_empty(Some(code)).or_else(|| non_empty(Some(name)))
}

impl RouteQuery {
    /// Combine an explicit search with the requester's profile.
    pub fn resolve(profile: Option<&JourneyProfile>, search: &RouteSearch) -> Self {
        let source = non_empty(search.source.as_deref()).or_else(|| {
            profile.and_then(|p| profile_station(&p.source_station_code, &p.source_station))
        });
        let destination = non_empty(search.destination.as_deref()).or_else(|| {
            profile.and_then(|p| {
                profile_station(&p.destination_station_code, &p.destination_station)
            })
        });
        let date = search.date.or_else(|| profile.map(|p| p.journey_date));
        let travel_class = non_empty(search.travel_class.as_deref())
            .or_else(|| profile.and_then(|p| non_empty(Some(&p.travel_class))));

        Self {
            source,
            destination,
            date,
            travel_class,
        }
    }

    /// Whether a listing satisfies the query.
    ///
    /// The route filter applies only when both source and destination are
    /// known; each needle may hit the station name or code.
    pub fn matches(&self, listing: &Listing) -> bool {
        if let (Some(src), Some(dst)) = (&self.source, &self.destination) {
            let src_hit = contains_ci(&listing.source_station, src)
                || contains_ci(&listing.source_station_code, src);
            let dst_hit = contains_ci(&listing.destination_station, dst)
                || contains_ci(&listing.destination_station_code, dst);
            if !(src_hit && dst_hit) {
                return false;
            }
        }

        match self.date {
            Some(date) => listing.journey_date == date,
            None => true,
        }
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Available listings of other users matching `query`, newest first.
pub async fn find_matching_listings(
    pool: &SqlitePool,
    requester: i64,
    query: &RouteQuery,
) -> Result<Vec<Listing>, sqlx::Error> {
    let candidates = ListingRepo::list_available_excluding(pool, requester).await?;
    let total = candidates.len();
    let matched: Vec<Listing> = candidates.into_iter().filter(|l| query.matches(l)).collect();

    tracing::debug!(requester, total, matched = matched.len(), "route match");
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ListingStatus, SeatType};
    use chrono::Utc;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    fn listing(src_name: &str, src: &str, dst_name: &str, dst: &str, day: u32) -> Listing {
        Listing {
            id: 1,
            owner_id: 1,
            pnr_number: "1234567890".into(),
            train_number: "12951".into(),
            train_name: "MUMBAI RAJDHANI".into(),
            source_station: src_name.into(),
            destination_station: dst_name.into(),
            source_station_code: src.into(),
            destination_station_code: dst.into(),
            journey_date: date(day),
            seat_type: SeatType::Lower,
            seat_number: "12".into(),
            coach_number: "B1".into(),
            price_paise: 10_000,
            description: None,
            status: ListingStatus::Available,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn profile(src_name: &str, src: &str, dst_name: &str, dst: &str, day: u32) -> JourneyProfile {
        JourneyProfile {
            user_id: 2,
            pnr_number: "0987654321".into(),
            source_station: src_name.into(),
            destination_station: dst_name.into(),
            source_station_code: src.into(),
            destination_station_code: dst.into(),
            journey_date: date(day),
            travel_class: "3A".into(),
            updated_at: Utc::now(),
        }
    }

    fn search(src: &str, dst: &str) -> RouteSearch {
        RouteSearch {
            source: Some(src.into()),
            destination: Some(dst.into()),
            ..RouteSearch::default()
        }
    }

    #[test]
    fn code_matches_case_insensitively() {
        let l = listing("NDLS", "NDLS", "BCT", "BCT", 1);
        let q = RouteQuery::resolve(None, &search("ndls", "bct"));
        assert!(q.matches(&l));
    }

    #[test]
    fn name_needle_matches_by_substring() {
        let l = listing("New Delhi", "NDLS", "Mumbai Central", "BCT", 1);
        let q = RouteQuery::resolve(None, &search("Delhi", "mumbai"));
        assert!(q.matches(&l));
    }

    #[test]
    fn wrong_destination_does_not_match() {
        let l = listing("New Delhi", "NDLS", "Howrah Junction", "HWH", 1);
        let q = RouteQuery::resolve(None, &search("NDLS", "BCT"));
        assert!(!q.matches(&l));
    }

    #[test]
    fn profile_supplies_codes_and_date() {
        let p = profile("New Delhi", "NDLS", "Mumbai Central", "BCT", 3);
        let q = RouteQuery::resolve(Some(&p), &RouteSearch::default());

        assert_eq!(q.source.as_deref(), Some("NDLS"));
        assert_eq!(q.destination.as_deref(), Some("BCT"));
        assert_eq!(q.date, Some(date(3)));
        assert_eq!(q.travel_class.as_deref(), Some("3A"));

        assert!(q.matches(&listing("New Delhi", "NDLS", "Mumbai Central", "BCT", 3)));
        assert!(!q.matches(&listing("New Delhi", "NDLS", "Mumbai Central", "BCT", 4)));
    }

    #[test]
    fn profile_name_is_used_without_code() {
        let p = profile("New Delhi", "", "Mumbai Central", "", 3);
        let q = RouteQuery::resolve(Some(&p), &RouteSearch::default());
        assert_eq!(q.source.as_deref(), Some("New Delhi"));
    }

    #[test]
    fn explicit_search_overrides_profile() {
        let p = profile("New Delhi", "NDLS", "Mumbai Central", "BCT", 3);
        let s = RouteSearch {
            destination: Some("HWH".into()),
            date: Some(date(9)),
            ..RouteSearch::default()
        };
        let q = RouteQuery::resolve(Some(&p), &s);

        assert_eq!(q.source.as_deref(), Some("NDLS"));
        assert_eq!(q.destination.as_deref(), Some("HWH"));
        assert_eq!(q.date, Some(date(9)));
    }

    #[test]
    fn blank_search_fields_fall_back() {
        let p = profile("New Delhi", "NDLS", "Mumbai Central", "BCT", 3);
        let q = RouteQuery::resolve(Some(&p), &search("  ", ""));
        assert_eq!(q.source.as_deref(), Some("NDLS"));
        assert_eq!(q.destination.as_deref(), Some("BCT"));
    }

    #[test]
    fn half_route_applies_no_route_filter() {
        let q = RouteQuery {
            source: Some("NDLS".into()),
            ..RouteQuery::default()
        };
        assert!(q.matches(&listing("Howrah Junction", "HWH", "Chennai Central", "MAS", 1)));
    }

    #[test]
    fn empty_query_matches_everything() {
        let q = RouteQuery::resolve(None, &RouteSearch::default());
        assert_eq!(q, RouteQuery::default());
        assert!(q.matches(&listing("A", "A", "B", "B", 1)));
    }

    #[tokio::test]
    async fn find_excludes_own_and_filters() {
        use crate::store::{ListingRepo, NewListingRow, memory_pool};
        use crate::testing::user;

        let pool = memory_pool().await.unwrap();
        let seller = user(&pool, "seller").await;
        let buyer = user(&pool, "buyer").await;

        let row = |owner_id: i64, dst: &str| NewListingRow {
            owner_id,
            pnr_number: "1234567890".into(),
            train_number: "12951".into(),
            train_name: "MUMBAI RAJDHANI".into(),
            source_station: "New Delhi".into(),
            destination_station: dst.into(),
            source_station_code: "NDLS".into(),
            destination_station_code: dst.into(),
            journey_date: date(1),
            seat_type: SeatType::Upper,
            seat_number: "30".into(),
            coach_number: "B3".into(),
            price_paise: 5_000,
            description: None,
            created_at: Utc::now(),
        };

        let wanted = ListingRepo::create(&pool, &row(seller.id, "BCT")).await.unwrap();
        ListingRepo::create(&pool, &row(seller.id, "HWH")).await.unwrap();
        ListingRepo::create(&pool, &row(buyer.id, "BCT")).await.unwrap();

        let q = RouteQuery::resolve(None, &search("ndls", "bct"));
        let found = find_matching_listings(&pool, buyer.id, &q).await.unwrap();
        let ids: Vec<i64> = found.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![wanted.id]);
    }
}
