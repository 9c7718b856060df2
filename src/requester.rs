// VRF Raffle Program - Randomness requester
use solana_program::{clock::UnixTimestamp, msg, program_error::ProgramError};

use crate::{
    error::RaffleError,
    events::RaffleEvent,
    oracle::{RandomnessOracle, RandomnessRequest},
    state::{PendingRequest, Raffle, RaffleState},
};

impl Raffle {
    /// Lock the round and ask the oracle for randomness.
    ///
    /// Eligibility is re-evaluated here regardless of what the caller polled.
    /// Nothing is mutated unless the oracle accepts the request.
    pub fn trigger_resolution<O>(
        &mut self,
        now: UnixTimestamp,
        oracle: &mut O,
    ) -> Result<RaffleEvent, ProgramError>
    where
        O: RandomnessOracle + ?Sized,
    {
        let eligibility = self.check_eligibility(now);
        if !eligibility.ready {
            msg!(
                "Eligibility not met: open={}, interval_elapsed={}, participants={}, pool={}",
                eligibility.conditions.is_open,
                eligibility.conditions.interval_elapsed,
                eligibility.participant_count,
                eligibility.pool_total
            );
            return Err(RaffleError::EligibilityNotMet.into());
        }

        let request = RandomnessRequest::from(&self.config.oracle);
        let request_id = oracle.request_randomness(&request)?;

        self.state = RaffleState::Calculating(PendingRequest {
            request_id,
            issued_at: now,
        });
        msg!(
            "Round locked with {} participants, awaiting request {}",
            eligibility.participant_count,
            request_id
        );

        Ok(RaffleEvent::ResolutionRequested { request_id })
    }
}
