// VRF Raffle Program - Winner resolution
use solana_program::{clock::UnixTimestamp, msg, program_error::ProgramError};

use crate::{
    error::RaffleError,
    events::RaffleEvent,
    oracle::winner_index,
    payout::PrizePayout,
    state::{Raffle, RaffleState, RequestId},
};

impl Raffle {
    /// Consume the oracle callback for `request_id`: pick the winner, pay the
    /// pool and start a new round.
    ///
    /// The payout runs before anything is committed. If it fails the round
    /// stays locked with its participants and pool untouched.
    pub fn resolve<P>(
        &mut self,
        request_id: RequestId,
        random_words: &[u64],
        now: UnixTimestamp,
        payout: &mut P,
    ) -> Result<RaffleEvent, ProgramError>
    where
        P: PrizePayout + ?Sized,
    {
        let pending = match self.state {
            RaffleState::Calculating(pending) if pending.request_id == request_id => pending,
            RaffleState::Calculating(pending) => {
                msg!(
                    "Callback for request {} does not match pending request {}",
                    request_id,
                    pending.request_id
                );
                return Err(RaffleError::UnknownRequest.into());
            }
            RaffleState::Open => {
                msg!("No randomness request is pending, rejecting request {}", request_id);
                return Err(RaffleError::UnknownRequest.into());
            }
        };

        let random_word = *random_words.first().ok_or_else(|| {
            msg!("Callback for request {} carried no random words", request_id);
            RaffleError::MissingRandomWords
        })?;

        let winner = winner_index(random_word, self.ledger.len())
            .and_then(|index| self.ledger.get(index))
            .copied()
            .ok_or_else(|| {
                msg!("Round has no participants to pay");
                RaffleError::PayoutFailed
            })?;
        let amount = self.pool_total();

        msg!(
            "Request {} issued at {} resolved: winner {} of {}",
            request_id,
            pending.issued_at,
            winner,
            self.ledger.len()
        );

        payout.pay(&winner, amount).map_err(|err| {
            msg!("Payout of {} lamports to {} failed: {}", amount, winner, err);
            ProgramError::from(RaffleError::PayoutFailed)
        })?;

        self.ledger.clear();
        self.last_resolution_timestamp = now;
        self.recent_winner = Some(winner);
        self.state = RaffleState::Open;

        Ok(RaffleEvent::WinnerSelected { winner, amount })
    }
}
