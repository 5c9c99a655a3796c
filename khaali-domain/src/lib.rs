#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod model;
pub mod services;

pub use error::{ComputationError, ParseSplitPolicyError};
pub use model::{
    BalanceAccumulator, Balances, ExpenseRecord, Money, ParticipantId, SHARE_SCALE, Split,
    SplitPolicy, TRANSFER_SCALE, Transfer, apply_transfers,
};
pub use services::{BalanceAggregator, DebtSimplifier};

/// Folds expenses into net balances per participant.
pub fn compute_net_balances<'a, I>(expenses: I) -> Result<Balances, ComputationError>
where
    I: IntoIterator<Item = &'a ExpenseRecord>,
{
    BalanceAggregator.compute(expenses)
}

/// Reduces net balances to a short list of point-to-point transfers.
pub fn simplify_debts(balances: &Balances) -> Vec<Transfer> {
    DebtSimplifier.simplify(balances)
}

/// `simplify_debts(compute_net_balances(expenses))`.
pub fn compute_group_debts<'a, I>(expenses: I) -> Result<Vec<Transfer>, ComputationError>
where
    I: IntoIterator<Item = &'a ExpenseRecord>,
{
    let balances = compute_net_balances(expenses)?;
    Ok(simplify_debts(&balances))
}
