use std::time::Duration;

use async_trait::async_trait;

use crate::domain::membership::{LoyaltyMembership, LoyaltyTier};

/// Source of loyalty records for the checkout.
#[async_trait]
pub trait MembershipProvider: Send + Sync {
    /// The member already known to this session, if any.
    async fn current_member(
        &self,
    ) -> Result<Option<LoyaltyMembership>, Box<dyn std::error::Error + Send + Sync>>;

    /// Resolve a loyalty number typed into the form. `Ok(None)` means not found.
    async fn lookup(
        &self,
        loyalty_number: &str,
    ) -> Result<Option<LoyaltyMembership>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Mock loyalty service. Every lookup resolves to a Silver member after `delay`;
/// the stored member, when configured, is Gold.
pub struct StaticMembershipProvider {
    stored_member_id: Option<String>,
    delay: Duration,
}

impl StaticMembershipProvider {
    #[must_use]
    pub fn new(stored_member_id: Option<String>, delay: Duration) -> Self {
        Self {
            stored_member_id,
            delay,
        }
    }

    /// No stored member and no delay.
    #[must_use]
    pub fn immediate() -> Self {
        Self::new(None, Duration::ZERO)
    }
}

#[async_trait]
impl MembershipProvider for StaticMembershipProvider {
    async fn current_member(
        &self,
    ) -> Result<Option<LoyaltyMembership>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .stored_member_id
            .as_ref()
            .map(|id| LoyaltyMembership::new(id.clone(), LoyaltyTier::Gold, 2500)))
    }

    async fn lookup(
        &self,
        loyalty_number: &str,
    ) -> Result<Option<LoyaltyMembership>, Box<dyn std::error::Error + Send + Sync>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let loyalty_number = loyalty_number.trim();
        if loyalty_number.is_empty() {
            return Ok(None);
        }
        Ok(Some(LoyaltyMembership::new(
            loyalty_number,
            LoyaltyTier::Silver,
            1200,
        )))
    }
}
