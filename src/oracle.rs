// Randomness coordinator integration for the VRF raffle program
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::AccountInfo,
    instruction::{AccountMeta, Instruction},
    msg,
    program::{get_return_data, invoke},
    program_error::ProgramError,
};

use crate::{
    error::RaffleError,
    state::{OracleConfig, RequestId, NUM_WORDS},
};

/// Parameters sent with every randomness request
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct RandomnessRequest {
    pub key_hash: [u8; 32],
    pub subscription_id: u64,
    pub request_confirmations: u16,
    pub callback_compute_limit: u32,
    pub num_words: u32,
}

impl From<&OracleConfig> for RandomnessRequest {
    fn from(config: &OracleConfig) -> Self {
        Self {
            key_hash: config.key_hash,
            subscription_id: config.subscription_id,
            request_confirmations: config.request_confirmations,
            callback_compute_limit: config.callback_compute_limit,
            num_words: NUM_WORDS,
        }
    }
}

/// Instructions understood by the randomness coordinator
///
/// Accounts expected by `RequestRandomWords`:
/// 0. `[]` The consumer (raffle) account that receives the callback
/// 1. `[signer]` The requester paying for the request
/// Remaining accounts are coordinator specific
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum CoordinatorInstruction {
    /// Returns the borsh encoded `RequestId` as program return data
    RequestRandomWords(RandomnessRequest),
}

/// Source of randomness. Requests are fire-and-forget; the words arrive later
/// through a separate fulfillment call carrying the returned id.
pub trait RandomnessOracle {
    fn request_randomness(&mut self, request: &RandomnessRequest) -> Result<RequestId, ProgramError>;
}

/// Issues requests to the coordinator program through a cross-program invocation
pub struct CpiCoordinator<'a, 'info> {
    coordinator_program: &'a AccountInfo<'info>,
    consumer: &'a AccountInfo<'info>,
    requester: &'a AccountInfo<'info>,
    remaining_accounts: &'a [AccountInfo<'info>],
}

impl<'a, 'info> CpiCoordinator<'a, 'info> {
    pub fn new(
        coordinator_program: &'a AccountInfo<'info>,
        consumer: &'a AccountInfo<'info>,
        requester: &'a AccountInfo<'info>,
        remaining_accounts: &'a [AccountInfo<'info>],
    ) -> Self {
        Self {
            coordinator_program,
            consumer,
            requester,
            remaining_accounts,
        }
    }
}

impl<'a, 'info> RandomnessOracle for CpiCoordinator<'a, 'info> {
    fn request_randomness(&mut self, request: &RandomnessRequest) -> Result<RequestId, ProgramError> {
        if !self.requester.is_signer {
            msg!("Requester must sign the randomness request");
            return Err(ProgramError::MissingRequiredSignature);
        }

        let data = CoordinatorInstruction::RequestRandomWords(request.clone())
            .try_to_vec()
            .map_err(|_| ProgramError::InvalidInstructionData)?;

        let mut accounts = vec![
            AccountMeta::new_readonly(*self.consumer.key, false),
            AccountMeta::new_readonly(*self.requester.key, true),
        ];
        accounts.extend(self.remaining_accounts.iter().map(|account| AccountMeta {
            pubkey: *account.key,
            is_signer: account.is_signer,
            is_writable: account.is_writable,
        }));

        let mut account_infos = vec![
            self.consumer.clone(),
            self.requester.clone(),
            self.coordinator_program.clone(),
        ];
        account_infos.extend_from_slice(self.remaining_accounts);

        invoke(
            &Instruction {
                program_id: *self.coordinator_program.key,
                accounts,
                data,
            },
            &account_infos,
        )?;

        let (program_id, return_data) = get_return_data().ok_or_else(|| {
            msg!("Coordinator returned no request id");
            RaffleError::OracleRequestFailed
        })?;
        if program_id != *self.coordinator_program.key {
            msg!("Return data was set by {}, not the coordinator", program_id);
            return Err(RaffleError::OracleRequestFailed.into());
        }

        let request_id = RequestId::try_from_slice(&return_data).map_err(|_| {
            msg!("Coordinator returned a malformed request id");
            RaffleError::OracleRequestFailed
        })?;

        msg!("Randomness requested from {}: request {}", program_id, request_id);
        Ok(request_id)
    }
}

/// Index of the winning participant for a random word
pub fn winner_index(random_word: u64, participant_count: usize) -> Option<usize> {
    random_word
        .checked_rem(participant_count as u64)
        .map(|index| index as usize)
}
