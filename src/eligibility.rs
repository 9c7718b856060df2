// VRF Raffle Program - Eligibility
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::clock::UnixTimestamp;

use crate::state::Raffle;

/// The four conditions that must all hold before a round may resolve
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EligibilityConditions {
    pub is_open: bool,
    pub interval_elapsed: bool,
    pub has_participants: bool,
    pub has_pool: bool,
}

impl EligibilityConditions {
    pub fn all_hold(&self) -> bool {
        self.is_open && self.interval_elapsed && self.has_participants && self.has_pool
    }
}

/// Diagnostic returned by the eligibility check.
///
/// Keepers poll this read-only and pass it back with the trigger; the trigger
/// always recomputes it.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Eligibility {
    pub ready: bool,
    pub conditions: EligibilityConditions,
    /// Seconds since the last resolution
    pub elapsed: i64,
    pub participant_count: u32,
    pub pool_total: u64,
}

impl Eligibility {
    pub fn from_conditions(conditions: EligibilityConditions) -> Self {
        Self {
            ready: conditions.all_hold(),
            conditions,
            ..Self::default()
        }
    }
}

impl Raffle {
    /// Evaluate whether the round can be resolved at `now`. Never mutates.
    pub fn check_eligibility(&self, now: UnixTimestamp) -> Eligibility {
        let elapsed = now.saturating_sub(self.last_resolution_timestamp);
        let pool_total = self.pool_total();

        let conditions = EligibilityConditions {
            is_open: self.state.is_open(),
            interval_elapsed: u64::try_from(elapsed)
                .map_or(false, |elapsed| elapsed >= self.config.eligibility_interval),
            has_participants: !self.ledger.is_empty(),
            has_pool: pool_total > 0,
        };

        Eligibility {
            elapsed,
            participant_count: self.ledger.len() as u32,
            pool_total,
            ..Eligibility::from_conditions(conditions)
        }
    }
}
