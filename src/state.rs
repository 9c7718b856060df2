// VRF Raffle Program - State
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::AccountInfo,
    clock::UnixTimestamp,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    program_pack::{IsInitialized, Sealed},
    pubkey::Pubkey,
};

use crate::{error::RaffleError, ledger::EntryLedger};

/// Number of random words requested per resolution
pub const NUM_WORDS: u32 = 1;

/// Correlation token issued by the randomness coordinator
#[derive(
    BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outstanding randomness request
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingRequest {
    /// Token returned by the coordinator
    pub request_id: RequestId,
    /// When the request was issued
    pub issued_at: UnixTimestamp,
}

impl PendingRequest {
    pub const LEN: usize = 8 + 8;
}

/// Lifecycle of the raffle. The pending request only exists while calculating.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaffleState {
    /// Entries are accepted
    Open,
    /// Waiting on the coordinator callback; entries and new requests are rejected
    Calculating(PendingRequest),
}

impl RaffleState {
    pub const MAX_LEN: usize = 1 + PendingRequest::LEN;

    pub fn is_open(&self) -> bool {
        matches!(self, RaffleState::Open)
    }

    pub fn pending_request(&self) -> Option<&PendingRequest> {
        match self {
            RaffleState::Open => None,
            RaffleState::Calculating(request) => Some(request),
        }
    }
}

impl Default for RaffleState {
    fn default() -> Self {
        RaffleState::Open
    }
}

/// Connection parameters for the randomness coordinator
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OracleConfig {
    /// Coordinator program that receives randomness requests
    pub coordinator: Pubkey,
    /// Key the coordinator signs fulfillments with
    pub fulfillment_authority: Pubkey,
    /// Key hash selecting the coordinator's proving key (gas lane)
    pub key_hash: [u8; 32],
    /// Subscription billed for requests
    pub subscription_id: u64,
    /// Slots the coordinator waits before answering
    pub request_confirmations: u16,
    /// Compute budget for the fulfillment callback
    pub callback_compute_limit: u32,
}

impl OracleConfig {
    pub const LEN: usize = 32 + 32 + 32 + 8 + 2 + 4;
}

/// Raffle configuration, immutable once the raffle is initialized
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RaffleConfig {
    /// Lamports charged per entry
    pub entrance_fee: u64,
    /// Seconds that must pass since the last resolution
    pub eligibility_interval: u64,
    /// Participant capacity of the raffle account
    pub max_participants: u32,
    /// Randomness coordinator parameters
    pub oracle: OracleConfig,
}

impl RaffleConfig {
    pub const LEN: usize = 8 + 8 + 4 + OracleConfig::LEN;

    pub fn validate(&self) -> Result<(), RaffleError> {
        if self.entrance_fee == 0 {
            msg!("Entrance fee must be greater than zero");
            return Err(RaffleError::InvalidConfiguration);
        }
        if self.max_participants == 0 {
            msg!("Participant capacity must be greater than zero");
            return Err(RaffleError::InvalidConfiguration);
        }
        Ok(())
    }
}

/// Raffle account data
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Raffle {
    /// Is the account initialized
    pub(crate) is_initialized: bool,
    /// Account that created the raffle
    pub(crate) authority: Pubkey,
    pub(crate) config: RaffleConfig,
    pub(crate) state: RaffleState,
    /// Participants of the current round
    pub(crate) ledger: EntryLedger,
    /// Start of the current round
    pub(crate) last_resolution_timestamp: UnixTimestamp,
    /// Winner of the previous round
    pub(crate) recent_winner: Option<Pubkey>,
}

impl Sealed for Raffle {}

impl IsInitialized for Raffle {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

impl Raffle {
    const FIXED_LEN: usize = 1 // is_initialized
        + 32 // authority
        + RaffleConfig::LEN
        + RaffleState::MAX_LEN
        + 4 // participant count prefix
        + 8 // last_resolution_timestamp
        + 1 + 32; // recent_winner

    /// Account size needed to hold `max_participants` entries
    pub fn space(max_participants: u32) -> usize {
        Self::FIXED_LEN + 32 * max_participants as usize
    }

    /// Create an open raffle with an empty round starting at `now`
    pub fn new(authority: Pubkey, config: RaffleConfig, now: UnixTimestamp) -> Self {
        Self {
            is_initialized: true,
            authority,
            config,
            state: RaffleState::Open,
            ledger: EntryLedger::default(),
            last_resolution_timestamp: now,
            recent_winner: None,
        }
    }

    /// Decode account data without checking initialization
    pub fn unpack_unchecked(data: &[u8]) -> Result<Self, ProgramError> {
        Self::deserialize(&mut &data[..]).map_err(|_| ProgramError::InvalidAccountData)
    }

    /// Load an initialized raffle from its account
    pub fn load(account: &AccountInfo) -> Result<Self, ProgramError> {
        let raffle = Self::unpack_unchecked(&account.try_borrow_data()?)?;
        if !raffle.is_initialized {
            msg!("Raffle account {} is not initialized", account.key);
            return Err(RaffleError::NotInitialized.into());
        }
        Ok(raffle)
    }

    /// Write the raffle back into its account
    pub fn store(&self, account: &AccountInfo) -> ProgramResult {
        let mut data = account.try_borrow_mut_data()?;
        self.serialize(&mut &mut data[..]).map_err(|_| {
            msg!("Raffle account {} is too small", account.key);
            ProgramError::AccountDataTooSmall
        })
    }

    pub fn authority(&self) -> &Pubkey {
        &self.authority
    }

    pub fn config(&self) -> &RaffleConfig {
        &self.config
    }

    pub fn entrance_fee(&self) -> u64 {
        self.config.entrance_fee
    }

    pub fn eligibility_interval(&self) -> u64 {
        self.config.eligibility_interval
    }

    pub fn state(&self) -> &RaffleState {
        &self.state
    }

    pub fn pending_request(&self) -> Option<&PendingRequest> {
        self.state.pending_request()
    }

    pub fn participant(&self, index: usize) -> Option<&Pubkey> {
        self.ledger.get(index)
    }

    pub fn participant_count(&self) -> usize {
        self.ledger.len()
    }

    /// Lamports owed to the next winner
    pub fn pool_total(&self) -> u64 {
        self.ledger.pool_total(self.config.entrance_fee)
    }

    pub fn last_resolution_timestamp(&self) -> UnixTimestamp {
        self.last_resolution_timestamp
    }

    pub fn recent_winner(&self) -> Option<&Pubkey> {
        self.recent_winner.as_ref()
    }

    pub fn num_words(&self) -> u32 {
        NUM_WORDS
    }

    pub fn request_confirmations(&self) -> u16 {
        self.config.oracle.request_confirmations
    }

    pub fn callback_compute_limit(&self) -> u32 {
        self.config.oracle.callback_compute_limit
    }
}
