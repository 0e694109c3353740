/*!
Typed call surface over the Perk task-reward ledger.

[`RewardService`] exposes one method per boundary operation, keyed on the
verified caller identity the external authenticator supplies. It owns no
ledger state of its own; everything flows through the
[`perk_ledger::LedgerEngine`]. The only state here is the
[`ContactDesk`] intake, which sits outside the ledger core.
*/

pub mod contact;
pub mod service;

pub use contact::ContactDesk;
pub use service::RewardService;
