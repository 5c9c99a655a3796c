use crate::{
    error::DebtError,
    model::{CachedExpense, GroupId, resolve_expenses},
    ports::ExpenseSource,
};
use khaali_domain::{Transfer, apply_transfers, compute_net_balances, simplify_debts};

/// Outcome of a debt computation for one group.
///
/// A failed computation is never reported as an empty settlement: callers
/// must show `Unavailable` differently from `Settled`.
#[derive(Debug)]
pub enum GroupDebts {
    Settled,
    Outstanding(Vec<Transfer>),
    Unavailable(DebtError),
}

impl GroupDebts {
    pub fn transfers(&self) -> &[Transfer] {
        match self {
            Self::Outstanding(transfers) => transfers,
            Self::Settled | Self::Unavailable(_) => &[],
        }
    }
}

#[derive(Clone, Copy)]
pub struct DebtService<'a> {
    source: &'a dyn ExpenseSource,
}

impl<'a> DebtService<'a> {
    pub fn new(source: &'a dyn ExpenseSource) -> Self {
        Self { source }
    }

    pub fn group_debts(&self, group_id: GroupId) -> GroupDebts {
        match self.try_group_debts(group_id) {
            Ok(transfers) if transfers.is_empty() => GroupDebts::Settled,
            Ok(transfers) => GroupDebts::Outstanding(transfers),
            Err(err) => {
                tracing::error!(group_id, error = %err, "Group debts unavailable");
                GroupDebts::Unavailable(err)
            }
        }
    }

    pub fn try_group_debts(&self, group_id: GroupId) -> Result<Vec<Transfer>, DebtError> {
        let rows = self.source.load_expenses(group_id)?;
        let transfers = Self::debts_for_rows(&rows)?;

        tracing::info!(
            group_id,
            expense_count = rows.len(),
            transfer_count = transfers.len(),
            "Computed group debts"
        );

        Ok(transfers)
    }

    /// Runs the whole pipeline on rows that were already loaded.
    pub fn debts_for_rows(rows: &[CachedExpense]) -> Result<Vec<Transfer>, DebtError> {
        let records = resolve_expenses(rows)?;
        let balances = compute_net_balances(&records)?;
        let transfers = simplify_debts(&balances);

        let unsettled_count = apply_transfers(&balances, &transfers)
            .values()
            .filter(|balance| !balance.is_negligible())
            .count();
        if unsettled_count > 0 {
            tracing::warn!(
                unsettled_count,
                "Expense shares do not cover their amounts; residual balances left unsettled"
            );
        }

        Ok(transfers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use khaali_domain::{ComputationError, Money, ParticipantId};
    use rstest::{fixture, rstest};
    use serde_json::json;
    use std::collections::HashMap;

    struct InMemorySource {
        groups: HashMap<GroupId, Vec<CachedExpense>>,
    }

    impl ExpenseSource for InMemorySource {
        fn load_expenses(&self, group_id: GroupId) -> Result<Vec<CachedExpense>, SourceError> {
            self.groups
                .get(&group_id)
                .cloned()
                .ok_or(SourceError::UnknownGroup(group_id))
        }
    }

    fn rows(values: serde_json::Value) -> Vec<CachedExpense> {
        serde_json::from_value(values).expect("rows should deserialize")
    }

    #[fixture]
    fn source() -> InMemorySource {
        InMemorySource {
            groups: HashMap::from([
                (
                    1,
                    rows(json!([
                        {"expense_id": 1, "creator_address": "0xA", "amount": "100",
                         "split_type": "equal", "participants_json": {"0xA": 1, "0xB": 1}},
                    ])),
                ),
                (
                    2,
                    rows(json!([
                        {"expense_id": 2, "creator_address": "0xA", "amount": "50",
                         "participants_json": {"0xA": 1}},
                        {"expense_id": 3, "creator_address": "0xB", "amount": null,
                         "participants_json": {"0xA": 1, "0xB": 1}},
                    ])),
                ),
                (
                    3,
                    rows(json!([
                        {"expense_id": 4, "creator_address": "0xA", "amount": "1O0",
                         "participants_json": {"0xB": 1}},
                    ])),
                ),
            ]),
        }
    }

    #[rstest]
    fn outstanding_debts_are_returned(source: InMemorySource) {
        let service = DebtService::new(&source);

        let debts = service.group_debts(1);

        assert!(matches!(debts, GroupDebts::Outstanding(_)));
        assert_eq!(
            debts.transfers(),
            &[Transfer {
                from: ParticipantId::from("0xB"),
                to: ParticipantId::from("0xA"),
                amount: Money::from_i64(50),
            }]
        );
    }

    #[rstest]
    fn balanced_group_is_settled(source: InMemorySource) {
        let service = DebtService::new(&source);

        assert!(matches!(service.group_debts(2), GroupDebts::Settled));
    }

    #[rstest]
    fn malformed_amount_makes_debts_unavailable(source: InMemorySource) {
        let service = DebtService::new(&source);

        let debts = service.group_debts(3);

        assert!(matches!(
            debts,
            GroupDebts::Unavailable(DebtError::Computation(ComputationError::InvalidAmount { .. }))
        ));
        assert!(debts.transfers().is_empty());
    }

    #[rstest]
    fn unknown_group_makes_debts_unavailable(source: InMemorySource) {
        let service = DebtService::new(&source);

        assert!(matches!(
            service.group_debts(99),
            GroupDebts::Unavailable(DebtError::Source(SourceError::UnknownGroup(99)))
        ));
    }
}
