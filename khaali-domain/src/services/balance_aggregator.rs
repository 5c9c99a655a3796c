use crate::{
    error::ComputationError,
    model::{BalanceAccumulator, Balances, ExpenseRecord},
};

/// Net balance aggregation service
pub struct BalanceAggregator;

impl BalanceAggregator {
    /// Compute net balances for a group's expenses
    ///
    /// The payer of every expense with a non-empty split is credited the full
    /// amount and each participant is debited their share. Shares that do not
    /// add up to the amount are accepted as-is and surface as residual balance.
    ///
    /// # Arguments
    /// * `expenses` - Expenses in any order
    ///
    /// # Returns
    /// Balance per participant, or the first value that could not be aggregated
    pub fn compute<'a, I>(&self, expenses: I) -> Result<Balances, ComputationError>
    where
        I: IntoIterator<Item = &'a ExpenseRecord>,
    {
        let mut accumulator = BalanceAccumulator::new();
        let mut expense_count = 0usize;
        let mut skipped_count = 0usize;

        for expense in expenses {
            expense_count += 1;
            if expense.split.is_empty() {
                skipped_count += 1;
                continue;
            }
            accumulator.apply(expense)?;
        }

        tracing::debug!(
            expense_count,
            skipped_count,
            participant_count = accumulator.balances().len(),
            "Aggregated net balances"
        );

        Ok(accumulator.into_balances())
    }
}
