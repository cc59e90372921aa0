use anchor_lang::prelude::*;

use crate::errors::BinaryOptionError;
use crate::events::{
    ManagerConfigUpdated, MarketCreationEnabledChanged, OwnerNominated, OwnershipTransferred,
    PauseChanged,
};
use crate::state::*;

impl MarketManager {
    fn require_owner(&self, caller: &Pubkey) -> Result<()> {
        require_keys_eq!(*caller, self.owner, BinaryOptionError::Unauthorized);
        Ok(())
    }

    /// Replace the configuration. Existing markets keep the fees they were
    /// created with.
    pub fn set_config(&mut self, caller: &Pubkey, config: ManagerConfig) -> Result<()> {
        self.require_owner(caller)?;
        config.validate()?;

        self.config = config;
        emit!(ManagerConfigUpdated {
            config: self.config.clone(),
        });
        msg!("Manager config updated by {}", caller);
        Ok(())
    }

    pub fn set_paused(&mut self, caller: &Pubkey, paused: bool) -> Result<()> {
        self.require_owner(caller)?;
        if self.paused == paused {
            return Ok(());
        }

        self.paused = paused;
        emit!(PauseChanged { is_paused: paused });
        msg!("Manager paused: {}", paused);
        Ok(())
    }

    pub fn set_market_creation_enabled(&mut self, caller: &Pubkey, enabled: bool) -> Result<()> {
        self.require_owner(caller)?;
        if self.market_creation_enabled == enabled {
            return Ok(());
        }

        self.market_creation_enabled = enabled;
        emit!(MarketCreationEnabledChanged { enabled });
        msg!("Market creation enabled: {}", enabled);
        Ok(())
    }

    /// First half of a two-step ownership handover.
    pub fn nominate_owner(&mut self, caller: &Pubkey, nominee: Pubkey) -> Result<()> {
        self.require_owner(caller)?;

        self.nominated_owner = Some(nominee);
        emit!(OwnerNominated { nominee });
        msg!("Owner nominated: {}", nominee);
        Ok(())
    }

    pub fn accept_ownership(&mut self, caller: &Pubkey) -> Result<()> {
        let nominee = self
            .nominated_owner
            .ok_or(BinaryOptionError::Unauthorized)?;
        require_keys_eq!(*caller, nominee, BinaryOptionError::Unauthorized);

        let previous_owner = self.owner;
        self.owner = nominee;
        self.nominated_owner = None;
        emit!(OwnershipTransferred {
            previous_owner,
            new_owner: nominee,
        });
        msg!("Ownership transferred: {} -> {}", previous_owner, nominee);
        Ok(())
    }
}
