// VRF Raffle Program - Entry ledger
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, program_error::ProgramError, pubkey::Pubkey};

use crate::{error::RaffleError, events::RaffleEvent, state::Raffle};

/// Participants of the current round, in entry order
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryLedger {
    participants: Vec<Pubkey>,
}

impl EntryLedger {
    pub fn get(&self, index: usize) -> Option<&Pubkey> {
        self.participants.get(index)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Pool held for the round. Entries are capped so this never saturates.
    pub fn pool_total(&self, entrance_fee: u64) -> u64 {
        (self.participants.len() as u64).saturating_mul(entrance_fee)
    }

    pub(crate) fn push(&mut self, participant: Pubkey) {
        self.participants.push(participant);
    }

    pub(crate) fn clear(&mut self) {
        self.participants.clear();
    }
}

impl Raffle {
    /// Admit `participant` into the current round.
    ///
    /// Only the entrance fee is collected; any amount paid above it stays with
    /// the participant.
    pub fn enter(&mut self, participant: Pubkey, amount_paid: u64) -> Result<RaffleEvent, ProgramError> {
        if amount_paid < self.config.entrance_fee {
            msg!(
                "Insufficient fee: paid {} lamports, entrance fee is {} lamports",
                amount_paid,
                self.config.entrance_fee
            );
            return Err(RaffleError::InsufficientFee.into());
        }

        if !self.state.is_open() {
            msg!("Raffle is calculating a winner, entries are closed");
            return Err(RaffleError::RoundNotOpen.into());
        }

        if self.ledger.len() >= self.config.max_participants as usize {
            msg!("Raffle is full ({} participants)", self.config.max_participants);
            return Err(RaffleError::RaffleFull.into());
        }

        let count = (self.ledger.len() as u64)
            .checked_add(1)
            .ok_or(RaffleError::MathOverflow)?;
        let pool_total = count
            .checked_mul(self.config.entrance_fee)
            .ok_or(RaffleError::MathOverflow)?;

        self.ledger.push(participant);
        msg!(
            "Participant {} joined, {} in round, pool {} lamports",
            participant,
            count,
            pool_total
        );

        Ok(RaffleEvent::ParticipantJoined { participant })
    }
}
