use std::collections::{BTreeMap, BTreeSet};

use khaali_domain::{
    ComputationError, ExpenseRecord, Money, ParseSplitPolicyError, ParticipantId, Split,
    SplitPolicy,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};

/// On-chain group identifier.
pub type GroupId = u64;

/// Expense row as cached by the web backend.
///
/// `amount`, `split_type` and `participants_json` are filled in after a
/// group member decrypts the on-chain payload, so any of them may still be
/// missing. Amounts and shares arrive either as JSON strings or numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CachedExpense {
    pub expense_id: u64,
    pub creator_address: String,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub split_type: Option<String>,
    #[serde(default)]
    pub participants_json: Option<Map<String, Value>>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedExpense {
    Ready(ExpenseRecord),
    /// Nobody has decrypted the amount yet.
    AmountPending,
    UnsupportedSplit(ParseSplitPolicyError),
}

impl CachedExpense {
    pub fn resolve(&self) -> Result<ResolvedExpense, ComputationError> {
        let payer = ParticipantId::new(self.creator_address.as_str());

        let Some(raw_amount) = &self.amount else {
            return Ok(ResolvedExpense::AmountPending);
        };
        let amount = decimal_from_json(raw_amount)
            .filter(|amount| !amount.is_sign_negative() || amount.is_zero())
            .ok_or_else(|| ComputationError::InvalidAmount {
                payer: payer.clone(),
                value: raw_text(raw_amount),
            })?;

        let policy = match self.split_type.as_deref() {
            None => SplitPolicy::Equal,
            Some(text) => match text.parse::<SplitPolicy>() {
                Ok(policy) => policy,
                Err(err) => return Ok(ResolvedExpense::UnsupportedSplit(err)),
            },
        };

        let empty = Map::new();
        let participants = self.participants_json.as_ref().unwrap_or(&empty);

        let split = match policy {
            SplitPolicy::Equal => Split::Equal(
                participants
                    .keys()
                    .map(|address| ParticipantId::new(address.as_str()))
                    .collect::<BTreeSet<_>>(),
            ),
            SplitPolicy::Exact => Split::Exact(
                parse_shares(participants)?
                    .into_iter()
                    .map(|(participant, owed)| (participant, Money::from_decimal(owed)))
                    .collect(),
            ),
            SplitPolicy::Percentage => Split::Percentage(parse_shares(participants)?),
        };

        Ok(ResolvedExpense::Ready(ExpenseRecord::new(
            payer,
            Money::from_decimal(amount),
            split,
        )))
    }
}

fn parse_shares(
    participants: &Map<String, Value>,
) -> Result<BTreeMap<ParticipantId, Decimal>, ComputationError> {
    participants
        .iter()
        .map(|(address, raw)| {
            let participant = ParticipantId::new(address.as_str());
            match decimal_from_json(raw) {
                Some(share) => Ok((participant, share)),
                None => Err(ComputationError::InvalidShare {
                    participant,
                    value: raw_text(raw),
                }),
            }
        })
        .collect()
}

fn decimal_from_json(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    text.parse::<Money>().ok().map(Money::as_decimal)
}

fn raw_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Resolves cached rows into expense records, leaving out rows that cannot
/// take part yet: pending amounts and unsupported split types.
pub fn resolve_expenses(rows: &[CachedExpense]) -> Result<Vec<ExpenseRecord>, ComputationError> {
    let mut records = Vec::with_capacity(rows.len());
    let mut pending_count = 0usize;

    for row in rows {
        match row.resolve()? {
            ResolvedExpense::Ready(record) => records.push(record),
            ResolvedExpense::AmountPending => pending_count += 1,
            ResolvedExpense::UnsupportedSplit(err) => {
                tracing::warn!(
                    expense_id = row.expense_id,
                    error = %err,
                    "Skipping expense with unsupported split type"
                );
            }
        }
    }

    tracing::debug!(
        row_count = rows.len(),
        resolved_count = records.len(),
        pending_count,
        "Resolved cached expenses"
    );

    Ok(records)
}
