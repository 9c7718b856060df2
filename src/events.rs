// VRF Raffle Program - Events
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    entrypoint::ProgramResult, log::sol_log_data, msg, program_error::ProgramError, pubkey::Pubkey,
};

use crate::state::RequestId;

/// Notifications published in the transaction log
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum RaffleEvent {
    ParticipantJoined { participant: Pubkey },
    ResolutionRequested { request_id: RequestId },
    WinnerSelected { winner: Pubkey, amount: u64 },
}

impl RaffleEvent {
    /// Log the event as text and as borsh encoded program data
    pub fn emit(&self) -> ProgramResult {
        match self {
            RaffleEvent::ParticipantJoined { participant } => {
                msg!("ParticipantJoined: {}", participant)
            }
            RaffleEvent::ResolutionRequested { request_id } => {
                msg!("ResolutionRequested: {}", request_id)
            }
            RaffleEvent::WinnerSelected { winner, amount } => {
                msg!("WinnerSelected: {} won {} lamports", winner, amount)
            }
        }

        let data = self.try_to_vec().map_err(|err| {
            msg!("Failed to encode event: {}", err);
            ProgramError::BorshIoError(err.to_string())
        })?;
        sol_log_data(&[&data]);
        Ok(())
    }
}
