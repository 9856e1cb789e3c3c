//! Atomic withdrawal requests against the vault's queue

mod composer;
mod types;

pub use composer::WithdrawalComposer;
pub use types::*;
