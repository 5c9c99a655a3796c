use std::{cmp::Ordering, collections::BinaryHeap};

use crate::model::{Balances, Money, ParticipantId, TRANSFER_SCALE, Transfer};

/// Greedy min-cash-flow service
pub struct DebtSimplifier;

/// Heap entry. Larger magnitude first; equal magnitudes pop in ascending
/// identifier order.
#[derive(Debug, PartialEq, Eq)]
struct Position {
    magnitude: Money,
    participant: ParticipantId,
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.magnitude
            .cmp(&other.magnitude)
            .then_with(|| other.participant.cmp(&self.participant))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl DebtSimplifier {
    /// Reduce net balances to point-to-point transfers
    ///
    /// Repeatedly pairs the largest creditor with the largest debtor and
    /// settles the smaller of the two magnitudes. Balances within
    /// [`Money::TOLERANCE`] are already settled. When the balances do not sum
    /// to zero the unmatched remainder is dropped.
    ///
    /// # Arguments
    /// * `balances` - Net balance per participant
    ///
    /// # Returns
    /// Transfers from debtor to creditor, amounts rounded to [`TRANSFER_SCALE`]
    pub fn simplify(&self, balances: &Balances) -> Vec<Transfer> {
        let mut creditors = BinaryHeap::new();
        let mut debtors = BinaryHeap::new();

        for (participant, &balance) in balances {
            if balance.is_negligible() {
                continue;
            }
            let position = Position {
                magnitude: balance.abs(),
                participant: participant.clone(),
            };
            if balance > Money::ZERO {
                creditors.push(position);
            } else {
                debtors.push(position);
            }
        }

        let creditor_count = creditors.len();
        let debtor_count = debtors.len();
        let mut transfers = Vec::with_capacity((creditor_count + debtor_count).saturating_sub(1));

        while let Some(creditor) = creditors.pop() {
            let Some(debtor) = debtors.pop() else {
                break;
            };

            let settled = creditor.magnitude.min(debtor.magnitude);
            transfers.push(Transfer {
                from: debtor.participant.clone(),
                to: creditor.participant.clone(),
                amount: settled.round_to(TRANSFER_SCALE),
            });

            let remaining_credit = creditor.magnitude - settled;
            if remaining_credit > Money::TOLERANCE {
                creditors.push(Position {
                    magnitude: remaining_credit,
                    ..creditor
                });
            }
            let remaining_debt = debtor.magnitude - settled;
            if remaining_debt > Money::TOLERANCE {
                debtors.push(Position {
                    magnitude: remaining_debt,
                    ..debtor
                });
            }
        }

        tracing::debug!(
            creditor_count,
            debtor_count,
            transfer_count = transfers.len(),
            "Simplified group debts"
        );

        transfers
    }
}
