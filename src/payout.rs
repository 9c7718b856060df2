// VRF Raffle Program - Prize payout
use solana_program::{
    account_info::AccountInfo, msg, program_error::ProgramError, pubkey::Pubkey, rent::Rent,
};

use crate::error::RaffleError;

/// Moves the pool to the winner. Called before any raffle state is committed.
pub trait PrizePayout {
    fn pay(&mut self, winner: &Pubkey, amount: u64) -> Result<(), ProgramError>;
}

/// Pays the prize out of the raffle account's lamports
pub struct LamportPayout<'a, 'info> {
    vault: &'a AccountInfo<'info>,
    recipient: &'a AccountInfo<'info>,
    rent: Rent,
}

impl<'a, 'info> LamportPayout<'a, 'info> {
    pub fn new(vault: &'a AccountInfo<'info>, recipient: &'a AccountInfo<'info>, rent: Rent) -> Self {
        Self {
            vault,
            recipient,
            rent,
        }
    }
}

impl<'a, 'info> PrizePayout for LamportPayout<'a, 'info> {
    fn pay(&mut self, winner: &Pubkey, amount: u64) -> Result<(), ProgramError> {
        if self.recipient.key != winner {
            msg!("Recipient {} is not the winner {}", self.recipient.key, winner);
            return Err(RaffleError::PayoutFailed.into());
        }
        if self.recipient.key == self.vault.key || !self.recipient.is_writable {
            msg!("Recipient {} cannot receive the prize", self.recipient.key);
            return Err(RaffleError::PayoutFailed.into());
        }

        // Vault keeps its rent exemption
        let vault_floor = self.rent.minimum_balance(self.vault.data_len());
        let vault_balance = self
            .vault
            .lamports()
            .checked_sub(amount)
            .filter(|remaining| *remaining >= vault_floor)
            .ok_or_else(|| {
                msg!(
                    "Vault holds {} lamports, cannot pay {} and keep {} for rent",
                    self.vault.lamports(),
                    amount,
                    vault_floor
                );
                RaffleError::PayoutFailed
            })?;

        // The runtime rejects a recipient left below rent exemption
        let recipient_floor = self.rent.minimum_balance(self.recipient.data_len());
        let recipient_balance = self
            .recipient
            .lamports()
            .checked_add(amount)
            .filter(|balance| *balance >= recipient_floor)
            .ok_or_else(|| {
                msg!(
                    "Recipient {} would hold {} lamports after payout, below the {} rent minimum",
                    self.recipient.key,
                    self.recipient.lamports().saturating_add(amount),
                    recipient_floor
                );
                RaffleError::PayoutFailed
            })?;

        **self.vault.try_borrow_mut_lamports()? = vault_balance;
        **self.recipient.try_borrow_mut_lamports()? = recipient_balance;

        msg!("Paid {} lamports to {}", amount, winner);
        Ok(())
    }
}
