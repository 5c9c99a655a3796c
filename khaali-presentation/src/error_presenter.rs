use khaali_application::{DebtError, SourceError};
use khaali_domain::ComputationError;

/// One-line explanation shown in place of the debt table.
pub fn format_debt_error(error: &DebtError) -> String {
    match error {
        DebtError::Source(SourceError::UnknownGroup(group_id)) => {
            format!("Debts unavailable: group {group_id} is not known here.")
        }
        DebtError::Source(err) => format!("Debts unavailable: could not load expenses ({err})."),
        DebtError::Computation(ComputationError::InvalidAmount { payer, value }) => {
            format!("Debts unavailable: an expense paid by {payer} has an invalid amount `{value}`.")
        }
        DebtError::Computation(ComputationError::InvalidShare { participant, value }) => {
            format!("Debts unavailable: the share of {participant} is invalid (`{value}`).")
        }
        DebtError::Computation(ComputationError::Overflow { payer }) => {
            format!("Debts unavailable: amounts paid by {payer} are too large to add up.")
        }
    }
}
