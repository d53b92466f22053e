//! Marketplace operations: accounts, journeys, listings, bookings, payment.
//!
//! Each operation validates its input, consults the PNR cache where a PNR
//! is involved, and writes through the repositories. Multi-row state
//! changes run in one transaction with conditional updates, so two buyers
//! cannot book the same listing.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::auth::{self, AuthError};
use crate::domain::{ListingStatus, PaymentStatus, PnrNumber, PnrStatus, SeatType};
use crate::store::{
    Exchange, ExchangeDetail, ExchangeRepo, JourneyProfile, Listing, ListingRepo, NewListingRow,
    NewUserRow, ProfileRepo, User, UserRepo, is_unique_violation,
};

use super::pnr_cache::PnrCache;

/// Message shown whenever a PNR cannot be verified, whatever the cause.
pub const VERIFICATION_FAILED: &str =
    "PNR verification failed. Please check the PNR number and try again.";

const MAX_PHONE_LEN: usize = 15;

/// Errors from marketplace operations.
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    /// Input failed validation; the message is for the user
    #[error("{0}")]
    Validation(String),

    /// Username taken, or a state change lost a race
    #[error("{0}")]
    Conflict(String),

    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("PNR verification failed. Please check the PNR number and try again.")]
    VerificationFailed,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("You cannot book your own listing.")]
    OwnListing,

    #[error("PNR route does not match the seat route.")]
    RouteMismatch,

    #[error("Access denied. Admin privileges required.")]
    Forbidden,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Registration form.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub phone_number: String,
    #[serde(default)]
    pub upi_id: Option<String>,
}

/// Listing form. Journey details come from the PNR.
#[derive(Debug, Clone, Deserialize)]
pub struct NewListing {
    pub pnr_number: String,
    pub seat_type: SeatType,
    pub seat_number: String,
    pub coach_number: String,
    pub price_paise: i64,
    #[serde(default)]
    pub description: Option<String>,
}

/// Everything a user has going on.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub listings: Vec<Listing>,
    pub purchases: Vec<ExchangeDetail>,
    pub sales: Vec<ExchangeDetail>,
}

/// Result of a successful journey verification.
#[derive(Debug, Clone, Serialize)]
pub struct VerifiedJourney {
    pub profile: JourneyProfile,
    pub status: PnrStatus,
}

fn required(value: &str, field: &str) -> Result<String, MarketError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(MarketError::Validation(format!("{field} is required.")));
    }
    Ok(value.to_string())
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_pnr(raw: &str) -> Result<PnrNumber, MarketError> {
    PnrNumber::parse_normalized(raw)
        .map_err(|_| MarketError::Validation("PNR number must be exactly 10 digits.".into()))
}

/// Create an account.
pub async fn register(pool: &SqlitePool, input: NewUser) -> Result<User, MarketError> {
    let username = required(&input.username, "Username")?;
    let email = required(&input.email, "Email")?;
    if !email.contains('@') {
        return Err(MarketError::Validation("Enter a valid email address.".into()));
    }
    let phone_number = required(&input.phone_number, "Phone number")?;
    if phone_number.chars().count() > MAX_PHONE_LEN {
        return Err(MarketError::Validation(format!(
            "Phone number must be at most {MAX_PHONE_LEN} characters."
        )));
    }
    auth::validate_password_strength(&input.password).map_err(MarketError::Validation)?;
    if input.password != input.password_confirm {
        return Err(MarketError::Validation("The two password fields didn't match.".into()));
    }

    let row = NewUserRow {
        username,
        email,
        password_hash: auth::hash_password(&input.password)?,
        phone_number,
        upi_id: optional(input.upi_id.as_deref()),
        is_staff: false,
        created_at: Utc::now(),
    };

    match UserRepo::create(pool, &row).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, username = %user.username, "user registered");
            Ok(user)
        }
        Err(e) if is_unique_violation(&e) => Err(MarketError::Conflict(
            "A user with that username already exists.".into(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Check a username and password.
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<User, MarketError> {
    let Some(user) = UserRepo::find_by_username(pool, username.trim()).await? else {
        return Err(MarketError::InvalidCredentials);
    };

    if auth::verify_password(password, &user.password_hash)? {
        Ok(user)
    } else {
        tracing::info!(username = %user.username, "password mismatch");
        Err(MarketError::InvalidCredentials)
    }
}

/// Verify a PNR and make it the user's current journey.
pub async fn verify_journey(
    cache: &PnrCache,
    pool: &SqlitePool,
    user_id: i64,
    pnr: &str,
) -> Result<VerifiedJourney, MarketError> {
    let pnr = parse_pnr(pnr)?;
    let Some(status) = cache.fetch_pnr_status(&pnr).await else {
        return Err(MarketError::VerificationFailed);
    };

    let profile = ProfileRepo::upsert(pool, user_id, &pnr, &status, Utc::now()).await?;
    UserRepo::mark_verified(pool, user_id).await?;
    tracing::info!(user_id, pnr = %pnr, train = %status.train_number, "journey verified");

    Ok(VerifiedJourney { profile, status })
}

/// The user's current journey, if they have verified one.
pub async fn journey_profile(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Option<JourneyProfile>, MarketError> {
    Ok(ProfileRepo::find(pool, user_id).await?)
}

/// Offer a seat held under a verified PNR.
pub async fn create_listing(
    cache: &PnrCache,
    pool: &SqlitePool,
    owner_id: i64,
    input: NewListing,
) -> Result<Listing, MarketError> {
    let pnr = parse_pnr(&input.pnr_number)?;
    let seat_number = required(&input.seat_number, "Seat number")?;
    let coach_number = required(&input.coach_number, "Coach number")?;
    if input.price_paise <= 0 {
        return Err(MarketError::Validation("Price must be greater than zero.".into()));
    }

    let Some(status) = cache.fetch_pnr_status(&pnr).await else {
        return Err(MarketError::VerificationFailed);
    };

    let row = NewListingRow {
        owner_id,
        pnr_number: pnr.to_string(),
        train_number: status.train_number,
        train_name: status.train_name,
        source_station: status.source_station,
        destination_station: status.destination_station,
        source_station_code: status.source_station_code,
        destination_station_code: status.destination_station_code,
        journey_date: status.journey_date,
        seat_type: input.seat_type,
        seat_number,
        coach_number: coach_number.to_ascii_uppercase(),
        price_paise: input.price_paise,
        description: optional(input.description.as_deref()),
        created_at: Utc::now(),
    };

    let listing = ListingRepo::create(pool, &row).await?;
    tracing::info!(listing_id = listing.id, owner_id, pnr = %pnr, "seat listed");
    Ok(listing)
}

/// An available listing.
pub async fn available_listing(pool: &SqlitePool, id: i64) -> Result<Listing, MarketError> {
    match ListingRepo::find(pool, id).await? {
        Some(listing) if listing.status == ListingStatus::Available => Ok(listing),
        _ => Err(MarketError::NotFound("listing")),
    }
}

/// Book a listing for a buyer travelling the same route.
pub async fn book_listing(
    cache: &PnrCache,
    pool: &SqlitePool,
    buyer_id: i64,
    listing_id: i64,
    buyer_pnr: &str,
) -> Result<Exchange, MarketError> {
    let listing = available_listing(pool, listing_id).await?;
    if listing.owner_id == buyer_id {
        return Err(MarketError::OwnListing);
    }

    let pnr = parse_pnr(buyer_pnr)?;
    let Some(status) = cache.fetch_pnr_status(&pnr).await else {
        return Err(MarketError::VerificationFailed);
    };
    if !status.same_route(&listing.source_station_code, &listing.destination_station_code) {
        tracing::info!(
            listing_id,
            buyer_id,
            listing_route = %format!("{}-{}", listing.source_station_code, listing.destination_station_code),
            buyer_route = %format!("{}-{}", status.source_station_code, status.destination_station_code),
            "route mismatch"
        );
        return Err(MarketError::RouteMismatch);
    }

    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let booked = ListingRepo::transition(
        &mut *tx,
        listing.id,
        ListingStatus::Available,
        ListingStatus::Booked,
        now,
    )
    .await?;
    if !booked {
        return Err(MarketError::Conflict(
            "This seat is no longer available.".into(),
        ));
    }

    let exchange = ExchangeRepo::create(
        &mut *tx,
        listing.id,
        buyer_id,
        listing.owner_id,
        listing.price_paise,
        pnr.as_str(),
        now,
    )
    .await?;
    tx.commit().await?;

    tracing::info!(exchange_id = exchange.id, listing_id, buyer_id, "seat booked");
    Ok(exchange)
}

/// Record the buyer's payment and complete the listing.
pub async fn confirm_payment(
    pool: &SqlitePool,
    buyer_id: i64,
    exchange_id: i64,
    transaction_id: &str,
) -> Result<Exchange, MarketError> {
    let exchange = match ExchangeRepo::find(pool, exchange_id).await? {
        Some(x) if x.buyer_id == buyer_id => x,
        _ => return Err(MarketError::NotFound("exchange")),
    };

    let transaction_id = transaction_id.trim();
    if transaction_id.is_empty() {
        return Err(MarketError::Validation("Please enter transaction ID.".into()));
    }

    let now = Utc::now();
    let mut tx = pool.begin().await?;

    if !ExchangeRepo::mark_paid(&mut *tx, exchange.id, transaction_id, now).await? {
        return Err(MarketError::Conflict(format!(
            "Exchange is {}, not awaiting payment.",
            exchange.payment_status
        )));
    }
    let completed = ListingRepo::transition(
        &mut *tx,
        exchange.listing_id,
        ListingStatus::Booked,
        ListingStatus::Completed,
        now,
    )
    .await?;
    if !completed {
        tracing::warn!(exchange_id, listing_id = exchange.listing_id, "listing was not booked at payment");
    }
    tx.commit().await?;

    tracing::info!(exchange_id, buyer_id, "payment recorded");
    ExchangeRepo::find(pool, exchange.id)
        .await?
        .ok_or(MarketError::NotFound("exchange"))
}

/// A user's listings, purchases and sales, newest first.
pub async fn dashboard(pool: &SqlitePool, user_id: i64) -> Result<Dashboard, MarketError> {
    Ok(Dashboard {
        listings: ListingRepo::list_by_owner(pool, user_id).await?,
        purchases: ExchangeRepo::list_for_buyer(pool, user_id).await?,
        sales: ExchangeRepo::list_for_seller(pool, user_id).await?,
    })
}

/// All paid exchanges, for staff.
pub async fn paid_exchanges(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<ExchangeDetail>, MarketError> {
    let is_staff = UserRepo::find_by_id(pool, user_id)
        .await?
        .is_some_and(|u| u.is_staff);
    if !is_staff {
        return Err(MarketError::Forbidden);
    }

    Ok(ExchangeRepo::list_by_status(pool, PaymentStatus::Paid).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::railway::{FixtureBook, FixtureRailwayClient};
    use crate::store::memory_pool;
    use crate::testing::{ScriptedProvider, status, user};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn form(username: &str) -> NewUser {
        NewUser {
            username: username.into(),
            email: format!("{username}@example.com"),
            password: "correct-horse".into(),
            password_confirm: "correct-horse".into(),
            phone_number: "9876543210".into(),
            upi_id: Some(" ".into()),
        }
    }

    fn listing_form(pnr: &str) -> NewListing {
        NewListing {
            pnr_number: pnr.into(),
            seat_type: SeatType::Lower,
            seat_number: "41".into(),
            coach_number: "b2".into(),
            price_paise: 20_000,
            description: Some("Near the door".into()),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    async fn scripted(route: (&str, &str)) -> (SqlitePool, PnrCache, Arc<ScriptedProvider>) {
        let pool = memory_pool().await.unwrap();
        let provider = Arc::new(ScriptedProvider::new(Some(status(route.0, route.1, date(), 1))));
        let cache = PnrCache::new(pool.clone(), provider.clone());
        (pool, cache, provider)
    }

    #[tokio::test]
    async fn register_then_authenticate() {
        let pool = memory_pool().await.unwrap();
        let user = register(&pool, form("asha")).await.unwrap();
        assert_eq!(user.upi_id, None);
        assert!(user.password_hash.starts_with("$argon2id$"));

        let back = authenticate(&pool, "asha", "correct-horse").await.unwrap();
        assert_eq!(back.id, user.id);

        assert!(matches!(
            authenticate(&pool, "asha", "wrong-horse").await,
            Err(MarketError::InvalidCredentials)
        ));
        assert!(matches!(
            authenticate(&pool, "nobody", "correct-horse").await,
            Err(MarketError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn register_validation() {
        let pool = memory_pool().await.unwrap();

        let mut bad_email = form("a");
        bad_email.email = "not-an-email".into();
        let mut long_phone = form("b");
        long_phone.phone_number = "1234567890123456".into();
        let mut short_pw = form("c");
        short_pw.password = "short".into();
        short_pw.password_confirm = "short".into();
        let mut mismatch = form("d");
        mismatch.password_confirm = "different-horse".into();
        let mut blank = form("e");
        blank.username = "  ".into();

        for input in [bad_email, long_phone, short_pw, mismatch, blank] {
            assert!(matches!(
                register(&pool, input).await,
                Err(MarketError::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let pool = memory_pool().await.unwrap();
        register(&pool, form("asha")).await.unwrap();
        assert!(matches!(
            register(&pool, form("asha")).await,
            Err(MarketError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn verify_journey_records_profile() {
        let pool = memory_pool().await.unwrap();
        let provider = Arc::new(FixtureRailwayClient::new(FixtureBook::sample()));
        let cache = PnrCache::new(pool.clone(), provider);
        let u = user(&pool, "ravi").await;

        let verified = verify_journey(&cache, &pool, u.id, " 8634824688 ").await.unwrap();
        assert_eq!(verified.profile.source_station_code, "RKMP");
        assert_eq!(verified.profile.destination_station_code, "REWA");
        assert_eq!(verified.status.train_number, "12185");

        let again = journey_profile(&pool, u.id).await.unwrap().unwrap();
        assert_eq!(again.pnr_number, "8634824688");
        assert!(UserRepo::find_by_id(&pool, u.id).await.unwrap().unwrap().is_verified);

        // A new PNR replaces the profile
        verify_journey(&cache, &pool, u.id, "4335734389").await.unwrap();
        let replaced = journey_profile(&pool, u.id).await.unwrap().unwrap();
        assert_eq!(replaced.source_station_code, "CCT");
    }

    #[tokio::test]
    async fn verify_journey_failures() {
        let (pool, cache, provider) = scripted(("NDLS", "BCT")).await;
        let u = user(&pool, "ravi").await;

        assert!(matches!(
            verify_journey(&cache, &pool, u.id, "12345").await,
            Err(MarketError::Validation(_))
        ));

        provider.set_answer(None);
        let err = verify_journey(&cache, &pool, u.id, "1234567890").await.unwrap_err();
        assert!(matches!(err, MarketError::VerificationFailed));
        assert_eq!(err.to_string(), VERIFICATION_FAILED);
        assert!(journey_profile(&pool, u.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_listing_copies_journey() {
        let (pool, cache, _) = scripted(("NDLS", "BCT")).await;
        let seller = user(&pool, "seller").await;

        let listing = create_listing(&cache, &pool, seller.id, listing_form("1234567890"))
            .await
            .unwrap();
        assert_eq!(listing.source_station_code, "NDLS");
        assert_eq!(listing.journey_date, date());
        assert_eq!(listing.coach_number, "B2");
        assert_eq!(listing.status, ListingStatus::Available);
    }

    #[tokio::test]
    async fn create_listing_rejects_bad_input_and_unverifiable_pnr() {
        let (pool, cache, provider) = scripted(("NDLS", "BCT")).await;
        let seller = user(&pool, "seller").await;

        let mut free = listing_form("1234567890");
        free.price_paise = 0;
        assert!(matches!(
            create_listing(&cache, &pool, seller.id, free).await,
            Err(MarketError::Validation(_))
        ));

        let mut no_seat = listing_form("1234567890");
        no_seat.seat_number = String::new();
        assert!(matches!(
            create_listing(&cache, &pool, seller.id, no_seat).await,
            Err(MarketError::Validation(_))
        ));

        provider.set_answer(None);
        assert!(matches!(
            create_listing(&cache, &pool, seller.id, listing_form("1234567890")).await,
            Err(MarketError::VerificationFailed)
        ));
    }

    #[tokio::test]
    async fn booking_and_payment_flow() {
        let (pool, cache, _) = scripted(("NDLS", "BCT")).await;
        let seller = user(&pool, "seller").await;
        let buyer = user(&pool, "buyer").await;

        let listing = create_listing(&cache, &pool, seller.id, listing_form("1234567890"))
            .await
            .unwrap();

        let exchange = book_listing(&cache, &pool, buyer.id, listing.id, "2222222222")
            .await
            .unwrap();
        assert_eq!(exchange.payment_status, PaymentStatus::Pending);
        assert_eq!(exchange.exchange_amount_paise, 20_000);
        assert_eq!(exchange.seller_id, seller.id);
        assert_eq!(exchange.buyer_pnr, "2222222222");

        // Booked listings are no longer available
        assert!(matches!(
            available_listing(&pool, listing.id).await,
            Err(MarketError::NotFound(_))
        ));

        // Only the buyer can pay
        assert!(matches!(
            confirm_payment(&pool, seller.id, exchange.id, "TXN1").await,
            Err(MarketError::NotFound(_))
        ));
        assert!(matches!(
            confirm_payment(&pool, buyer.id, exchange.id, "  ").await,
            Err(MarketError::Validation(_))
        ));

        let paid = confirm_payment(&pool, buyer.id, exchange.id, "TXN1").await.unwrap();
        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        assert_eq!(paid.payment_transaction_id.as_deref(), Some("TXN1"));
        assert!(paid.completion_date.is_some());

        assert!(matches!(
            confirm_payment(&pool, buyer.id, exchange.id, "TXN2").await,
            Err(MarketError::Conflict(_))
        ));

        let seller_view = dashboard(&pool, seller.id).await.unwrap();
        assert_eq!(seller_view.listings[0].status, ListingStatus::Completed);
        assert_eq!(seller_view.sales.len(), 1);
        assert_eq!(seller_view.sales[0].buyer_username, "buyer");
        assert!(seller_view.purchases.is_empty());

        let buyer_view = dashboard(&pool, buyer.id).await.unwrap();
        assert_eq!(buyer_view.purchases.len(), 1);
        assert_eq!(buyer_view.purchases[0].seller_username, "seller");
    }

    #[tokio::test]
    async fn booking_rules() {
        let (pool, cache, provider) = scripted(("NDLS", "BCT")).await;
        let seller = user(&pool, "seller").await;
        let buyer = user(&pool, "buyer").await;
        let listing = create_listing(&cache, &pool, seller.id, listing_form("1234567890"))
            .await
            .unwrap();

        assert!(matches!(
            book_listing(&cache, &pool, seller.id, listing.id, "1234567890").await,
            Err(MarketError::OwnListing)
        ));
        assert!(matches!(
            book_listing(&cache, &pool, buyer.id, listing.id + 100, "2222222222").await,
            Err(MarketError::NotFound(_))
        ));

        provider.set_answer(Some(status("NDLS", "HWH", date(), 1)));
        assert!(matches!(
            book_listing(&cache, &pool, buyer.id, listing.id, "3333333333").await,
            Err(MarketError::RouteMismatch)
        ));

        provider.set_answer(None);
        assert!(matches!(
            book_listing(&cache, &pool, buyer.id, listing.id, "4444444444").await,
            Err(MarketError::VerificationFailed)
        ));

        // Nothing was booked along the way
        assert!(available_listing(&pool, listing.id).await.is_ok());
    }

    #[tokio::test]
    async fn paid_exchanges_is_staff_only() {
        let (pool, cache, _) = scripted(("NDLS", "BCT")).await;
        let seller = user(&pool, "seller").await;
        let buyer = user(&pool, "buyer").await;
        let admin = user(&pool, "admin").await;
        UserRepo::set_staff(&pool, "admin", true).await.unwrap();

        let listing = create_listing(&cache, &pool, seller.id, listing_form("1234567890"))
            .await
            .unwrap();
        let exchange = book_listing(&cache, &pool, buyer.id, listing.id, "2222222222")
            .await
            .unwrap();

        assert!(paid_exchanges(&pool, admin.id).await.unwrap().is_empty());
        confirm_payment(&pool, buyer.id, exchange.id, "TXN9").await.unwrap();

        let paid = paid_exchanges(&pool, admin.id).await.unwrap();
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].payment_transaction_id.as_deref(), Some("TXN9"));

        assert!(matches!(
            paid_exchanges(&pool, buyer.id).await,
            Err(MarketError::Forbidden)
        ));
    }
}
