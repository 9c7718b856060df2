// VRF Raffle Program - Instruction Processor
use borsh::BorshSerialize;
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    clock::Clock,
    entrypoint::ProgramResult,
    msg,
    program::{invoke, set_return_data},
    program_error::ProgramError,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction, system_program,
    sysvar::Sysvar,
};

use crate::{
    eligibility::Eligibility,
    error::RaffleError,
    instruction::RaffleInstruction,
    oracle::CpiCoordinator,
    payout::LamportPayout,
    state::{OracleConfig, Raffle, RaffleConfig, RequestId},
};

/// Program state handler.
pub struct Processor {}

impl Processor {
    pub fn process(program_id: &Pubkey, accounts: &[AccountInfo], instruction_data: &[u8]) -> ProgramResult {
        let instruction = RaffleInstruction::unpack(instruction_data)?;

        match instruction {
            RaffleInstruction::InitializeRaffle {
                entrance_fee,
                eligibility_interval,
                max_participants,
                oracle,
            } => {
                msg!("Instruction: Initialize Raffle");
                Self::process_initialize_raffle(
                    program_id,
                    accounts,
                    entrance_fee,
                    eligibility_interval,
                    max_participants,
                    oracle,
                )
            }
            RaffleInstruction::EnterRaffle { amount } => {
                msg!("Instruction: Enter Raffle");
                Self::process_enter_raffle(program_id, accounts, amount)
            }
            RaffleInstruction::CheckEligibility => {
                msg!("Instruction: Check Eligibility");
                Self::process_check_eligibility(program_id, accounts)
            }
            RaffleInstruction::TriggerResolution { diagnostic } => {
                msg!("Instruction: Trigger Resolution");
                Self::process_trigger_resolution(program_id, accounts, diagnostic)
            }
            RaffleInstruction::FulfillRandomWords {
                request_id,
                random_words,
            } => {
                msg!("Instruction: Fulfill Random Words");
                Self::process_fulfill_random_words(program_id, accounts, request_id, &random_words)
            }
        }
    }

    fn process_initialize_raffle(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        entrance_fee: u64,
        eligibility_interval: u64,
        max_participants: u32,
        oracle: OracleConfig,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        // Verify the authority signed the transaction
        if !authority_info.is_signer {
            msg!("Authority must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        let config = RaffleConfig {
            entrance_fee,
            eligibility_interval,
            max_participants,
            oracle,
        };
        config.validate()?;

        // Create the raffle account sized for the configured capacity
        let space = Raffle::space(max_participants);

        if raffle_info.owner == program_id {
            if Raffle::unpack_unchecked(&raffle_info.try_borrow_data()?)?.is_initialized {
                msg!("Raffle account {} is already initialized", raffle_info.key);
                return Err(RaffleError::AlreadyInitialized.into());
            }
            if raffle_info.data_len() < space {
                msg!("Raffle account needs {} bytes", space);
                return Err(ProgramError::AccountDataTooSmall);
            }
        } else if raffle_info.owner == &system_program::id() {
            if !raffle_info.is_signer {
                msg!("Raffle account must sign its creation");
                return Err(ProgramError::MissingRequiredSignature);
            }
            let rent_lamports = Rent::get()?.minimum_balance(space);
            invoke(
                &system_instruction::create_account(
                    authority_info.key,
                    raffle_info.key,
                    rent_lamports,
                    space as u64,
                    program_id,
                ),
                &[
                    authority_info.clone(),
                    raffle_info.clone(),
                    system_program_info.clone(),
                ],
            )?;
        } else {
            msg!("Raffle account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }

        // Save initial raffle data
        let clock = Clock::get()?;
        let raffle = Raffle::new(*authority_info.key, config, clock.unix_timestamp);
        raffle.store(raffle_info)?;

        msg!(
            "Raffle initialized: fee={} lamports, interval={}s, capacity={}, coordinator={}",
            entrance_fee,
            eligibility_interval,
            max_participants,
            oracle.coordinator
        );
        Ok(())
    }

    fn process_enter_raffle(program_id: &Pubkey, accounts: &[AccountInfo], amount: u64) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let participant_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        // Verify the participant signed the transaction
        if !participant_info.is_signer {
            msg!("Participant must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }
        Self::check_raffle_owner(program_id, raffle_info)?;

        // Load raffle data and admit the participant
        let mut raffle = Raffle::load(raffle_info)?;
        let event = raffle.enter(*participant_info.key, amount)?;

        // Transfer the entrance fee to the raffle account
        invoke(
            &system_instruction::transfer(participant_info.key, raffle_info.key, raffle.entrance_fee()),
            &[
                participant_info.clone(),
                raffle_info.clone(),
                system_program_info.clone(),
            ],
        )?;

        // Save updated raffle data
        raffle.store(raffle_info)?;
        event.emit()?;
        Ok(())
    }

    fn process_check_eligibility(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let raffle_info = next_account_info(account_info_iter)?;
        Self::check_raffle_owner(program_id, raffle_info)?;

        let raffle = Raffle::load(raffle_info)?;
        let eligibility = raffle.check_eligibility(Clock::get()?.unix_timestamp);

        msg!(
            "Eligibility: ready={}, open={}, elapsed={}s of {}s, participants={}, pool={}",
            eligibility.ready,
            eligibility.conditions.is_open,
            eligibility.elapsed,
            raffle.eligibility_interval(),
            eligibility.participant_count,
            eligibility.pool_total
        );

        let data = eligibility
            .try_to_vec()
            .map_err(|_| ProgramError::InvalidAccountData)?;
        set_return_data(&data);
        Ok(())
    }

    fn process_trigger_resolution(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        diagnostic: Option<Eligibility>,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let caller_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let coordinator_info = next_account_info(account_info_iter)?;
        let remaining_accounts = account_info_iter.as_slice();

        // Anyone may trigger, but the caller pays and signs
        if !caller_info.is_signer {
            msg!("Caller must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }
        Self::check_raffle_owner(program_id, raffle_info)?;

        let mut raffle = Raffle::load(raffle_info)?;
        if *coordinator_info.key != raffle.config().oracle.coordinator {
            msg!("Coordinator {} is not configured for this raffle", coordinator_info.key);
            return Err(ProgramError::IncorrectProgramId);
        }

        // Eligibility is always re-evaluated against the current clock
        let now = Clock::get()?.unix_timestamp;
        if let Some(diagnostic) = diagnostic {
            if diagnostic.ready != raffle.check_eligibility(now).ready {
                msg!("Caller diagnostic is stale, using re-evaluated eligibility");
            }
        }

        // Request randomness and lock the round
        let mut oracle = CpiCoordinator::new(coordinator_info, raffle_info, caller_info, remaining_accounts);
        let event = raffle.trigger_resolution(now, &mut oracle)?;

        // Save updated raffle data
        raffle.store(raffle_info)?;
        event.emit()?;
        Ok(())
    }

    fn process_fulfill_random_words(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        request_id: RequestId,
        random_words: &[u64],
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let oracle_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let winner_info = next_account_info(account_info_iter)?;

        // Verify the fulfillment authority signed the transaction
        if !oracle_info.is_signer {
            msg!("Fulfillment authority must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }
        Self::check_raffle_owner(program_id, raffle_info)?;

        let mut raffle = Raffle::load(raffle_info)?;
        if *oracle_info.key != raffle.config().oracle.fulfillment_authority {
            msg!("{} is not the fulfillment authority", oracle_info.key);
            return Err(RaffleError::OnlyOracle.into());
        }

        // Pay the winner first, state is committed only after payout succeeds
        let mut payout = LamportPayout::new(raffle_info, winner_info, Rent::get()?);
        let event = raffle.resolve(
            request_id,
            random_words,
            Clock::get()?.unix_timestamp,
            &mut payout,
        )?;

        // Save updated raffle data
        raffle.store(raffle_info)?;
        event.emit()?;
        Ok(())
    }

    fn check_raffle_owner(program_id: &Pubkey, raffle_info: &AccountInfo) -> ProgramResult {
        if raffle_info.owner != program_id {
            msg!("Raffle account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }
        Ok(())
    }
}
