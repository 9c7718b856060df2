// VRF Raffle
// Participants pay a fixed entrance fee into a shared pool; once the
// eligibility interval has passed a coordinator supplies randomness, the
// winner takes the pool and a new round begins.

// Raffle state machine
pub mod eligibility;
pub mod ledger;
pub mod requester;
pub mod resolver;
pub mod state;

// Program surface
pub mod error;
pub mod events;
pub mod instruction;
pub mod processor;

// External collaborators
pub mod oracle;
pub mod payout;

#[cfg(not(feature = "no-entrypoint"))]
pub mod entrypoint;

use solana_program::{account_info::AccountInfo, entrypoint::ProgramResult, pubkey::Pubkey};

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    processor::Processor::process(program_id, accounts, instruction_data)
}
