//! In-memory repositories for service-level tests
//!
//! Implements the domain repository traits over `Mutex<Vec<_>>` with the
//! same observable semantics as the SeaORM implementations: overlap and
//! active-payment checks on insert, one review per booking, vote toggling.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::domain::booking::{Booking, BookingRepository, BookingStatus, VehicleInfo};
use crate::domain::parking_space::{
    haversine_m, Availability, ParkingSpace, ParkingSpaceRepository, Price, Rating, SpaceQuery,
    SpaceSize, SpaceType,
};
use crate::domain::payment::{Payment, PaymentRepository, PaymentStatus};
use crate::domain::provider::RepositoryProvider;
use crate::domain::review::{Review, ReviewRepository};
use crate::domain::user::{User, UserRepository, UserRole};
use crate::domain::{DomainError, DomainResult};

fn page_of<T: Clone>(rows: &[T], page: u32, limit: u32) -> (Vec<T>, u64) {
    let total = rows.len() as u64;
    let limit = limit.max(1) as usize;
    let start = (page.max(1) as usize - 1) * limit;
    let items = rows.iter().skip(start).take(limit).cloned().collect();
    (items, total)
}

// ── Users ───────────────────────────────────────────────────────

#[derive(Default)]
struct MemoryUsers {
    rows: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn save(&self, user: User) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == user.email) {
            return Err(DomainError::Conflict("Email already registered".into()));
        }
        rows.push(user);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update(&self, user: User) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| DomainError::not_found("User", &user.id))?;
        *slot = user;
        Ok(())
    }

    async fn set_role(&self, id: &str, role: UserRole) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| DomainError::not_found("User", id))?;
        slot.role = role;
        Ok(())
    }

    async fn deactivate(&self, id: &str) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| DomainError::not_found("User", id))?;
        slot.is_active = false;
        Ok(())
    }

    async fn find_paged(&self, page: u32, limit: u32) -> DomainResult<(Vec<User>, u64)> {
        Ok(page_of(&self.rows.lock().unwrap(), page, limit))
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }
}

// ── Parking spaces ──────────────────────────────────────────────

#[derive(Default)]
struct MemorySpaces {
    rows: Mutex<Vec<ParkingSpace>>,
}

#[async_trait]
impl ParkingSpaceRepository for MemorySpaces {
    async fn save(&self, space: ParkingSpace) -> DomainResult<()> {
        self.rows.lock().unwrap().push(space);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ParkingSpace>> {
        Ok(self.rows.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn update(&self, space: ParkingSpace) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|s| s.id == space.id)
            .ok_or_else(|| DomainError::not_found("ParkingSpace", &space.id))?;
        *slot = space;
        Ok(())
    }

    async fn search(&self, query: &SpaceQuery) -> DomainResult<(Vec<ParkingSpace>, u64)> {
        let rows = self.rows.lock().unwrap();
        let mut matches: Vec<ParkingSpace> = rows
            .iter()
            .filter(|s| s.is_active)
            .filter(|s| query.availability.map_or(true, |a| s.availability == a))
            .filter(|s| query.space_type.map_or(true, |t| s.space_type == t))
            .filter(|s| query.min_hourly_price.map_or(true, |p| s.price.hourly >= p))
            .filter(|s| query.max_hourly_price.map_or(true, |p| s.price.hourly <= p))
            .filter(|s| query.features.iter().all(|f| s.features.contains(f)))
            .filter(|s| {
                query.near.map_or(true, |g| {
                    haversine_m(g.longitude, g.latitude, s.longitude, s.latitude) <= g.radius_m
                })
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            b.rating
                .average
                .partial_cmp(&a.rating.average)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(page_of(&matches, query.page, query.limit))
    }

    async fn find_by_owner(&self, owner_id: &str) -> DomainResult<Vec<ParkingSpace>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update_rating(&self, id: &str, average: f64, count: u32) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| DomainError::not_found("ParkingSpace", id))?;
        slot.rating = Rating { average, count };
        Ok(())
    }

    async fn increment_total_bookings(&self, id: &str) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| DomainError::not_found("ParkingSpace", id))?;
        slot.total_bookings += 1;
        Ok(())
    }

    async fn set_status(
        &self,
        id: &str,
        is_active: Option<bool>,
        availability: Option<Availability>,
    ) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| DomainError::not_found("ParkingSpace", id))?;
        if let Some(flag) = is_active {
            slot.is_active = flag;
        }
        if let Some(availability) = availability {
            slot.availability = availability;
        }
        Ok(())
    }

    async fn find_paged(&self, page: u32, limit: u32) -> DomainResult<(Vec<ParkingSpace>, u64)> {
        Ok(page_of(&self.rows.lock().unwrap(), page, limit))
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }
}

// ── Bookings ────────────────────────────────────────────────────

struct MemoryBookings {
    rows: Arc<Mutex<Vec<Booking>>>,
}

fn blocking_overlap(
    rows: &[Booking],
    space_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude_id: Option<&str>,
) -> bool {
    rows.iter().any(|b| {
        b.parking_space_id == space_id
            && exclude_id != Some(b.id.as_str())
            && b.status.blocks_schedule()
            && b.overlaps(start, end)
    })
}

#[async_trait]
impl BookingRepository for MemoryBookings {
    async fn insert_checked(&self, booking: Booking) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if blocking_overlap(
            &rows,
            &booking.parking_space_id,
            booking.start_time,
            booking.end_time,
            None,
        ) {
            return Err(DomainError::Conflict(
                "Parking space is already booked for this time window".into(),
            ));
        }
        rows.push(booking);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>> {
        Ok(self.rows.lock().unwrap().iter().find(|b| b.id == id).cloned())
    }

    async fn update(&self, booking: Booking) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|b| b.id == booking.id)
            .ok_or_else(|| DomainError::not_found("Booking", &booking.id))?;
        *slot = booking;
        Ok(())
    }

    async fn confirm_checked(&self, booking: Booking) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.iter().any(|b| b.id == booking.id) {
            return Err(DomainError::not_found("Booking", &booking.id));
        }
        if blocking_overlap(
            &rows,
            &booking.parking_space_id,
            booking.start_time,
            booking.end_time,
            Some(&booking.id),
        ) {
            return Err(DomainError::Conflict(
                "Parking space is already booked for this time window".into(),
            ));
        }
        let slot = rows.iter_mut().find(|b| b.id == booking.id).unwrap();
        *slot = booking;
        Ok(())
    }

    async fn find_conflicting(
        &self,
        parking_space_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|b| {
                b.parking_space_id == parking_space_id
                    && b.status.blocks_schedule()
                    && b.overlaps(start, end)
            })
            .cloned()
            .collect())
    }

    async fn find_by_user(
        &self,
        user_id: &str,
        status: Option<BookingStatus>,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Booking>, u64)> {
        let rows = self.rows.lock().unwrap();
        let matches: Vec<Booking> = rows
            .iter()
            .filter(|b| b.user_id == user_id)
            .filter(|b| status.map_or(true, |s| b.status == s))
            .cloned()
            .collect();
        Ok(page_of(&matches, page, limit))
    }

    async fn find_for_spaces(&self, space_ids: &[String]) -> DomainResult<Vec<Booking>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|b| space_ids.contains(&b.parking_space_id))
            .cloned()
            .collect())
    }

    async fn find_paged(&self, page: u32, limit: u32) -> DomainResult<(Vec<Booking>, u64)> {
        Ok(page_of(&self.rows.lock().unwrap(), page, limit))
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }
}

// ── Payments ────────────────────────────────────────────────────

struct MemoryPayments {
    rows: Mutex<Vec<Payment>>,
    bookings: Arc<Mutex<Vec<Booking>>>,
}

#[async_trait]
impl PaymentRepository for MemoryPayments {
    async fn insert_checked(&self, payment: Payment) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|p| p.booking_id == payment.booking_id && p.status.is_active())
        {
            return Err(DomainError::Conflict(
                "An active payment already exists for this booking".into(),
            ));
        }
        rows.push(payment);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Payment>> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn find_active_for_booking(&self, booking_id: &str) -> DomainResult<Option<Payment>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.booking_id == booking_id && p.status.is_active())
            .cloned())
    }

    async fn update_with_booking(&self, payment: Payment, booking: Booking) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|p| p.id == payment.id)
            .ok_or_else(|| DomainError::not_found("Payment", &payment.id))?;
        *slot = payment;

        let mut bookings = self.bookings.lock().unwrap();
        let slot = bookings
            .iter_mut()
            .find(|b| b.id == booking.id)
            .ok_or_else(|| DomainError::not_found("Booking", &booking.id))?;
        *slot = booking;
        Ok(())
    }

    async fn find_by_user(
        &self,
        user_id: &str,
        status: Option<PaymentStatus>,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Payment>, u64)> {
        let rows = self.rows.lock().unwrap();
        let matches: Vec<Payment> = rows
            .iter()
            .filter(|p| p.user_id == user_id)
            .filter(|p| status.map_or(true, |s| p.status == s))
            .cloned()
            .collect();
        Ok(page_of(&matches, page, limit))
    }

    async fn find_paged(&self, page: u32, limit: u32) -> DomainResult<(Vec<Payment>, u64)> {
        Ok(page_of(&self.rows.lock().unwrap(), page, limit))
    }

    async fn total_revenue(&self) -> DomainResult<i64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.status == PaymentStatus::Completed)
            .map(|p| p.amount)
            .sum())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }
}

// ── Reviews ─────────────────────────────────────────────────────

#[derive(Default)]
struct MemoryReviews {
    rows: Mutex<Vec<Review>>,
    votes: Mutex<HashSet<(String, String)>>,
}

#[async_trait]
impl ReviewRepository for MemoryReviews {
    async fn insert(&self, review: Review) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|r| r.booking_id == review.booking_id) {
            return Err(DomainError::Conflict(
                "This booking has already been reviewed".into(),
            ));
        }
        rows.push(review);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Review>> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_booking(&self, booking_id: &str) -> DomainResult<Option<Review>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.booking_id == booking_id)
            .cloned())
    }

    async fn update(&self, review: Review) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|r| r.id == review.id)
            .ok_or_else(|| DomainError::not_found("Review", &review.id))?;
        *slot = review;
        Ok(())
    }

    async fn find_visible_for_space(
        &self,
        parking_space_id: &str,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Review>, u64)> {
        let rows = self.rows.lock().unwrap();
        let matches: Vec<Review> = rows
            .iter()
            .filter(|r| r.parking_space_id == parking_space_id && r.is_visible)
            .cloned()
            .collect();
        Ok(page_of(&matches, page, limit))
    }

    async fn find_by_user(&self, user_id: &str) -> DomainResult<Vec<Review>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn visible_ratings(&self, parking_space_id: &str) -> DomainResult<Vec<i32>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.parking_space_id == parking_space_id && r.is_visible)
            .map(|r| r.rating)
            .collect())
    }

    async fn toggle_helpful(&self, review_id: &str, user_id: &str) -> DomainResult<(Review, bool)> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|r| r.id == review_id)
            .ok_or_else(|| DomainError::not_found("Review", review_id))?;

        let key = (review_id.to_string(), user_id.to_string());
        let mut votes = self.votes.lock().unwrap();
        let voted = if votes.remove(&key) {
            slot.helpful = (slot.helpful - 1).max(0);
            false
        } else {
            votes.insert(key);
            slot.helpful += 1;
            true
        };
        Ok((slot.clone(), voted))
    }

    async fn set_visibility(&self, review_id: &str, visible: bool) -> DomainResult<Review> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|r| r.id == review_id)
            .ok_or_else(|| DomainError::not_found("Review", review_id))?;
        slot.is_visible = visible;
        Ok(slot.clone())
    }
}

// ── Provider ────────────────────────────────────────────────────

pub struct MemoryRepositoryProvider {
    users: MemoryUsers,
    spaces: MemorySpaces,
    bookings: MemoryBookings,
    payments: MemoryPayments,
    reviews: MemoryReviews,
}

impl Default for MemoryRepositoryProvider {
    fn default() -> Self {
        let booking_rows: Arc<Mutex<Vec<Booking>>> = Arc::default();
        Self {
            users: MemoryUsers::default(),
            spaces: MemorySpaces::default(),
            bookings: MemoryBookings {
                rows: booking_rows.clone(),
            },
            payments: MemoryPayments {
                rows: Mutex::default(),
                bookings: booking_rows,
            },
            reviews: MemoryReviews::default(),
        }
    }
}

impl RepositoryProvider for MemoryRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn spaces(&self) -> &dyn ParkingSpaceRepository {
        &self.spaces
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }

    fn payments(&self) -> &dyn PaymentRepository {
        &self.payments
    }

    fn reviews(&self) -> &dyn ReviewRepository {
        &self.reviews
    }
}

pub fn memory_repos() -> Arc<dyn RepositoryProvider> {
    Arc::new(MemoryRepositoryProvider::default())
}

// ── Seed helpers ────────────────────────────────────────────────

pub async fn seed_user(repos: &Arc<dyn RepositoryProvider>, id: &str, role: UserRole) -> User {
    let mut user = User::new(
        format!("User {}", id),
        format!("{}@example.com", id),
        "not-a-real-hash",
        "010-0000-0000",
        role,
    );
    user.id = id.to_string();
    repos.users().save(user.clone()).await.unwrap();
    user
}

pub async fn seed_space(
    repos: &Arc<dyn RepositoryProvider>,
    owner_id: &str,
    hourly: i64,
) -> ParkingSpace {
    let now = Utc::now();
    let space = ParkingSpace {
        id: uuid::Uuid::new_v4().to_string(),
        owner_id: owner_id.to_string(),
        title: "Test lot".into(),
        description: "A lot for tests".into(),
        address: "Seoul".into(),
        longitude: 127.0276,
        latitude: 37.4979,
        price: Price {
            hourly,
            daily: None,
            monthly: None,
        },
        availability: Availability::Available,
        space_type: SpaceType::Outdoor,
        space_size: SpaceSize::Standard,
        features: vec![],
        images: vec![],
        available_time_slots: vec![],
        rating: Rating::default(),
        total_bookings: 0,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    repos.spaces().save(space.clone()).await.unwrap();
    space
}

pub async fn seed_booking(
    repos: &Arc<dyn RepositoryProvider>,
    user_id: &str,
    space_id: &str,
    status: BookingStatus,
) -> Booking {
    let start = Utc::now() + Duration::hours(1);
    let mut booking = Booking::new(
        user_id,
        space_id,
        start,
        start + Duration::hours(2),
        5000,
        VehicleInfo {
            license_plate: "12가3456".into(),
            model: None,
            color: None,
        },
        None,
    )
    .unwrap();
    booking.status = status;
    repos.bookings().insert_checked(booking.clone()).await.unwrap();
    booking
}
