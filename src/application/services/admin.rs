//! Admin service — platform statistics and moderation listings

use std::sync::Arc;

use tracing::info;

use crate::domain::access::{ensure_role, Actor};
use crate::domain::booking::Booking;
use crate::domain::parking_space::{Availability, ParkingSpace};
use crate::domain::payment::Payment;
use crate::domain::provider::RepositoryProvider;
use crate::domain::user::{User, UserRole};
use crate::domain::{DomainError, DomainResult};

/// Platform-wide counters for the admin dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformStats {
    pub users: u64,
    pub spaces: u64,
    pub bookings: u64,
    pub payments: u64,
    /// Sum of completed payment amounts, in whole KRW
    pub total_revenue: i64,
}

pub struct AdminService {
    repos: Arc<dyn RepositoryProvider>,
}

impl AdminService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn stats(&self, actor: &Actor) -> DomainResult<PlatformStats> {
        ensure_role(actor, &[UserRole::Admin], "view platform statistics")?;
        Ok(PlatformStats {
            users: self.repos.users().count().await?,
            spaces: self.repos.spaces().count().await?,
            bookings: self.repos.bookings().count().await?,
            payments: self.repos.payments().count().await?,
            total_revenue: self.repos.payments().total_revenue().await?,
        })
    }

    // ── Users ───────────────────────────────────────────────────

    pub async fn list_users(
        &self,
        actor: &Actor,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<User>, u64)> {
        ensure_role(actor, &[UserRole::Admin], "list users")?;
        self.repos.users().find_paged(page, limit).await
    }

    pub async fn set_user_role(&self, actor: &Actor, user_id: &str, role: UserRole) -> DomainResult<()> {
        ensure_role(actor, &[UserRole::Admin], "change user roles")?;
        self.repos.users().set_role(user_id, role).await?;
        info!(user_id = %user_id, role = %role, "User role changed");
        Ok(())
    }

    pub async fn deactivate_user(&self, actor: &Actor, user_id: &str) -> DomainResult<()> {
        ensure_role(actor, &[UserRole::Admin], "deactivate users")?;
        if actor.id == user_id {
            return Err(DomainError::Validation(
                "Admins cannot deactivate their own account".into(),
            ));
        }
        self.repos.users().deactivate(user_id).await?;
        info!(user_id = %user_id, "User deactivated");
        Ok(())
    }

    // ── Spaces ──────────────────────────────────────────────────

    pub async fn list_spaces(
        &self,
        actor: &Actor,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<ParkingSpace>, u64)> {
        ensure_role(actor, &[UserRole::Admin], "list parking spaces")?;
        self.repos.spaces().find_paged(page, limit).await
    }

    pub async fn set_space_status(
        &self,
        actor: &Actor,
        space_id: &str,
        is_active: Option<bool>,
        availability: Option<Availability>,
    ) -> DomainResult<()> {
        ensure_role(actor, &[UserRole::Admin], "moderate parking spaces")?;
        self.repos
            .spaces()
            .set_status(space_id, is_active, availability)
            .await?;
        info!(space_id = %space_id, "Parking space status changed");
        Ok(())
    }

    // ── Bookings & payments ─────────────────────────────────────

    pub async fn list_bookings(
        &self,
        actor: &Actor,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Booking>, u64)> {
        ensure_role(actor, &[UserRole::Admin], "list bookings")?;
        self.repos.bookings().find_paged(page, limit).await
    }

    pub async fn list_payments(
        &self,
        actor: &Actor,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Payment>, u64)> {
        ensure_role(actor, &[UserRole::Admin], "list payments")?;
        self.repos.payments().find_paged(page, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{memory_repos, seed_booking, seed_space, seed_user};
    use crate::domain::booking::BookingStatus;
    use crate::domain::payment::{Payment, PaymentMethod};

    fn admin() -> Actor {
        Actor::new("admin-1", UserRole::Admin)
    }

    #[tokio::test]
    async fn non_admin_is_rejected_everywhere() {
        let svc = AdminService::new(memory_repos());
        let provider = Actor::new("p1", UserRole::Provider);

        assert!(matches!(
            svc.stats(&provider).await.unwrap_err(),
            DomainError::Forbidden(_)
        ));
        assert!(matches!(
            svc.list_users(&provider, 1, 20).await.unwrap_err(),
            DomainError::Forbidden(_)
        ));
        assert!(matches!(
            svc.set_user_role(&provider, "u1", UserRole::Provider)
                .await
                .unwrap_err(),
            DomainError::Forbidden(_)
        ));
    }

    #[tokio::test]
    async fn stats_count_revenue_from_completed_payments_only() {
        let repos = memory_repos();
        seed_user(&repos, "u1", UserRole::User).await;
        let space = seed_space(&repos, "provider-1", 5000).await;
        let booking = seed_booking(&repos, "u1", &space.id, BookingStatus::Pending).await;

        let mut completed = Payment::new(booking.id.clone(), "u1", 10000, PaymentMethod::Card);
        completed.complete(None).unwrap();
        repos.payments().insert_checked(completed).await.unwrap();

        let svc = AdminService::new(repos);
        let stats = svc.stats(&admin()).await.unwrap();
        assert_eq!(stats.users, 1);
        assert_eq!(stats.spaces, 1);
        assert_eq!(stats.bookings, 1);
        assert_eq!(stats.payments, 1);
        assert_eq!(stats.total_revenue, 10000);
    }

    #[tokio::test]
    async fn role_change_and_deactivation() {
        let repos = memory_repos();
        let user = seed_user(&repos, "u1", UserRole::User).await;
        let svc = AdminService::new(repos.clone());

        svc.set_user_role(&admin(), &user.id, UserRole::Provider)
            .await
            .unwrap();
        let reloaded = repos.users().find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(reloaded.role, UserRole::Provider);

        svc.deactivate_user(&admin(), &user.id).await.unwrap();
        let reloaded = repos.users().find_by_id(&user.id).await.unwrap().unwrap();
        assert!(!reloaded.is_active);
    }

    #[tokio::test]
    async fn admin_cannot_deactivate_self() {
        let repos = memory_repos();
        let admin_user = seed_user(&repos, "admin-1", UserRole::Admin).await;
        let svc = AdminService::new(repos);

        let err = svc
            .deactivate_user(&admin(), &admin_user.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn space_moderation_hides_listing() {
        let repos = memory_repos();
        let space = seed_space(&repos, "provider-1", 5000).await;
        let svc = AdminService::new(repos.clone());

        svc.set_space_status(&admin(), &space.id, Some(false), Some(Availability::Unavailable))
            .await
            .unwrap();
        let reloaded = repos.spaces().find_by_id(&space.id).await.unwrap().unwrap();
        assert!(!reloaded.is_active);
        assert_eq!(reloaded.availability, Availability::Unavailable);
    }
}
