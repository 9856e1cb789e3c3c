// src/authorization.rs
use alloy_primitives::Address;
use std::sync::Arc;

use crate::chain::ChainReader;
use crate::config::DEPOSIT_SELECTOR;
use crate::error::Result;

/// Capability checks against the vault's roles authority
#[derive(Clone)]
pub struct AuthorizationGate {
    chain: Arc<dyn ChainReader>,
    authority: Address,
    teller: Address,
}

impl AuthorizationGate {
    pub fn new(chain: Arc<dyn ChainReader>, authority: Address, teller: Address) -> Self {
        Self {
            chain,
            authority,
            teller,
        }
    }

    /// May `account` call `selector` on `target`? `false` is a normal answer, not an error.
    pub async fn is_authorized(
        &self,
        account: Address,
        target: Address,
        selector: [u8; 4],
    ) -> Result<bool> {
        let allowed = self.chain.can_call(self.authority, account, target, selector).await?;
        log::debug!(
            "[Auth] {} -> {}::0x{}: {}",
            account,
            target,
            hex::encode(selector),
            allowed
        );
        Ok(allowed)
    }

    /// May `account` use the teller's deposit entry point?
    pub async fn can_deposit(&self, account: Address) -> Result<bool> {
        self.is_authorized(account, self.teller, DEPOSIT_SELECTOR).await
    }

    pub fn teller(&self) -> Address {
        self.teller
    }
}
