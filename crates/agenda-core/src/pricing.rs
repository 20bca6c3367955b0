// Pricing snapshots and the payment-button tier builder

use uuid::Uuid;

/// The provider disallows a literal zero price, so the free Member tier
/// carries a nominal non-zero minimum.
pub const MEMBER_TIER_PRICE: &str = "0.01";

/// The tuple of fee fields whose content equality gates external
/// synchronization. If the submitted snapshot equals the persisted one, the
/// payment button is not touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingSnapshot {
    pub fee: Option<i32>,
    pub conc_fee: Option<i32>,
    pub multi_day_fee: Option<i32>,
    pub multi_day_conc_fee: Option<i32>,
    pub event_type_id: Uuid,
}

/// One (label, price) pair on the button's ticket-type option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingTier {
    pub label: String,
    pub price: String,
}

/// Ordered builder for the button's option schedule.
///
/// Tiers are appended, never positioned by index, so the multi-day and
/// member-free tiers cannot collide however they combine. The wire encoding
/// derives field indices from the final order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PricingTierSet {
    tiers: Vec<PricingTier>,
}

impl PricingTierSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, label: impl Into<String>, price: impl Into<String>) {
        self.tiers.push(PricingTier {
            label: label.into(),
            price: price.into(),
        });
    }

    /// Build the full schedule for an event.
    /// Tier 0/1 are always Full/Concession; All_Full/All_Concession follow
    /// when multi-day pricing is supplied; the Member tier is appended last
    /// for talks.
    pub fn build(
        fee: i32,
        conc_fee: i32,
        multi_day: Option<(i32, i32)>,
        members_free: bool,
    ) -> Self {
        let mut tiers = Self::new();
        tiers.append("Full", fee.to_string());
        tiers.append("Concession", conc_fee.to_string());

        if let Some((all_fee, all_conc_fee)) = multi_day {
            tiers.append("All_Full", all_fee.to_string());
            tiers.append("All_Concession", all_conc_fee.to_string());
        }

        if members_free {
            tiers.append("Member", MEMBER_TIER_PRICE);
        }

        tiers
    }

    pub fn tiers(&self) -> &[PricingTier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}
