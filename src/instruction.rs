// VRF Raffle Program - Instructions
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};

use crate::{
    eligibility::Eligibility,
    error::RaffleError,
    state::{OracleConfig, RequestId},
};

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub enum RaffleInstruction {
    /// Create and initialize a raffle
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The authority paying for the raffle account
    /// 1. `[signer, writable]` The raffle account, must not exist yet
    /// 2. `[]` The system program
    InitializeRaffle {
        /// Lamports charged per entry
        entrance_fee: u64,
        /// Seconds between resolutions
        eligibility_interval: u64,
        /// Participant capacity of the raffle account
        max_participants: u32,
        /// Randomness coordinator parameters
        oracle: OracleConfig,
    },

    /// Enter the current round
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The participant paying the entrance fee
    /// 1. `[writable]` The raffle account
    /// 2. `[]` The system program
    EnterRaffle {
        /// Lamports the participant is willing to pay, at least the entrance fee
        amount: u64,
    },

    /// Evaluate eligibility without mutating anything.
    /// The `Eligibility` diagnostic is published as return data.
    ///
    /// Accounts expected:
    /// 0. `[]` The raffle account
    CheckEligibility,

    /// Lock the round and request randomness from the coordinator
    ///
    /// Accounts expected:
    /// 0. `[signer]` Any caller, pays for the randomness request
    /// 1. `[writable]` The raffle account
    /// 2. `[]` The coordinator program
    /// Remaining accounts are forwarded to the coordinator
    TriggerResolution {
        /// Diagnostic from an earlier `CheckEligibility`, advisory only
        diagnostic: Option<Eligibility>,
    },

    /// Deliver randomness for the pending request and pay the winner
    ///
    /// Accounts expected:
    /// 0. `[signer]` The coordinator's fulfillment authority
    /// 1. `[writable]` The raffle account
    /// 2. `[writable]` The winning participant
    FulfillRandomWords {
        request_id: RequestId,
        random_words: Vec<u64>,
    },
}

impl RaffleInstruction {
    /// Unpacks a byte buffer into a RaffleInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(input).map_err(|_| RaffleError::InvalidInstruction.into())
    }

    /// Packs a RaffleInstruction into a byte buffer
    pub fn pack(&self) -> Result<Vec<u8>, ProgramError> {
        self.try_to_vec()
            .map_err(|_| RaffleError::InvalidInstruction.into())
    }
}

/// Create initialize_raffle instruction
pub fn initialize_raffle(
    program_id: &Pubkey,
    authority: &Pubkey,
    raffle_account: &Pubkey,
    entrance_fee: u64,
    eligibility_interval: u64,
    max_participants: u32,
    oracle: OracleConfig,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::InitializeRaffle {
        entrance_fee,
        eligibility_interval,
        max_participants,
        oracle,
    }
    .pack()?;

    let accounts = vec![
        AccountMeta::new(*authority, true),
        AccountMeta::new(*raffle_account, true),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create enter_raffle instruction
pub fn enter_raffle(
    program_id: &Pubkey,
    participant: &Pubkey,
    raffle_account: &Pubkey,
    amount: u64,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::EnterRaffle { amount }.pack()?;

    let accounts = vec![
        AccountMeta::new(*participant, true),
        AccountMeta::new(*raffle_account, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create check_eligibility instruction
pub fn check_eligibility(program_id: &Pubkey, raffle_account: &Pubkey) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::CheckEligibility.pack()?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![AccountMeta::new_readonly(*raffle_account, false)],
        data,
    })
}

/// Create trigger_resolution instruction
pub fn trigger_resolution(
    program_id: &Pubkey,
    caller: &Pubkey,
    raffle_account: &Pubkey,
    coordinator_program: &Pubkey,
    remaining_accounts: &[AccountMeta],
    diagnostic: Option<Eligibility>,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::TriggerResolution { diagnostic }.pack()?;

    let mut accounts = vec![
        AccountMeta::new(*caller, true),
        AccountMeta::new(*raffle_account, false),
        AccountMeta::new_readonly(*coordinator_program, false),
    ];
    accounts.extend_from_slice(remaining_accounts);

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create fulfill_random_words instruction
pub fn fulfill_random_words(
    program_id: &Pubkey,
    fulfillment_authority: &Pubkey,
    raffle_account: &Pubkey,
    winner: &Pubkey,
    request_id: RequestId,
    random_words: Vec<u64>,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::FulfillRandomWords {
        request_id,
        random_words,
    }
    .pack()?;

    let accounts = vec![
        AccountMeta::new_readonly(*fulfillment_authority, true),
        AccountMeta::new(*raffle_account, false),
        AccountMeta::new(*winner, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}
