use solana_program::{
    decode_error::DecodeError, msg, program_error::PrintProgramError, program_error::ProgramError,
};
use thiserror::Error;

/// Errors that may be returned by the raffle program
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RaffleError {
    /// Instruction data could not be decoded
    #[error("Invalid instruction data")]
    InvalidInstruction,

    /// Payment is below the entrance fee
    #[error("Amount paid is below the entrance fee")]
    InsufficientFee,

    /// Entries are only accepted while the round is open
    #[error("Round is not open")]
    RoundNotOpen,

    /// The round cannot be resolved yet
    #[error("Eligibility conditions are not met")]
    EligibilityNotMet,

    /// Callback does not match the pending randomness request
    #[error("Unknown randomness request")]
    UnknownRequest,

    /// Prize could not be transferred to the winner
    #[error("Payout to the winner failed")]
    PayoutFailed,

    /// Initialization parameters were rejected
    #[error("Invalid raffle configuration")]
    InvalidConfiguration,

    /// Raffle account already holds a raffle
    #[error("Raffle already initialized")]
    AlreadyInitialized,

    /// Raffle account does not hold a raffle
    #[error("Raffle not initialized")]
    NotInitialized,

    /// Participant capacity of the raffle account is exhausted
    #[error("Raffle is full")]
    RaffleFull,

    /// Only the configured oracle may deliver randomness
    #[error("Only the randomness oracle can fulfill requests")]
    OnlyOracle,

    /// Callback carried no random words
    #[error("No random words supplied")]
    MissingRandomWords,

    /// Coordinator did not return a request id
    #[error("Randomness request failed")]
    OracleRequestFailed,

    /// Arithmetic overflow
    #[error("Math overflow")]
    MathOverflow,
}

impl From<RaffleError> for ProgramError {
    fn from(e: RaffleError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for RaffleError {
    fn type_of() -> &'static str {
        "Raffle Error"
    }
}

impl PrintProgramError for RaffleError {
    fn print<E>(&self) {
        msg!(&self.to_string());
    }
}
