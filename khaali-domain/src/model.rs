use std::{
    borrow::Borrow,
    collections::{BTreeMap, BTreeSet},
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{ComputationError, ParseSplitPolicyError};

/// Fractional digits of an emitted transfer (the token's base unit).
pub const TRANSFER_SCALE: u32 = 6;

/// Fractional digits kept for a single computed share.
///
/// Every computed debit is bounded to this scale so that summing
/// contributions stays exact regardless of order.
pub const SHARE_SCALE: u32 = 12;

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Opaque participant identifier, usually a wallet address.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ParticipantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for ParticipantId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Balances at or below this magnitude are treated as settled.
    pub const TOLERANCE: Self = Self(Decimal::from_parts(1, 0, 0, false, TRANSFER_SCALE));

    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negligible(self) -> bool {
        self.abs() <= Self::TOLERANCE
    }

    /// Rounds half to even, the behaviour of decimal quantization.
    pub fn round_to(self, scale: u32) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven),
        )
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map(Self)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplitPolicy {
    Equal,
    Exact,
    Percentage,
}

impl SplitPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Exact => "exact",
            Self::Percentage => "percentage",
        }
    }
}

impl fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitPolicy {
    type Err = ParseSplitPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equal" => Ok(Self::Equal),
            "exact" => Ok(Self::Exact),
            "percentage" => Ok(Self::Percentage),
            other => Err(ParseSplitPolicyError(other.to_owned())),
        }
    }
}

/// How an expense is divided, together with the participants it is divided among.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Split {
    /// Every participant owes `amount / count`.
    Equal(BTreeSet<ParticipantId>),
    /// Each participant owes the literal amount.
    Exact(BTreeMap<ParticipantId, Money>),
    /// Each participant owes a percentage (0..=100) of the amount.
    Percentage(BTreeMap<ParticipantId, Decimal>),
}

impl Split {
    pub fn policy(&self) -> SplitPolicy {
        match self {
            Self::Equal(_) => SplitPolicy::Equal,
            Self::Exact(_) => SplitPolicy::Exact,
            Self::Percentage(_) => SplitPolicy::Percentage,
        }
    }

    pub fn participant_count(&self) -> usize {
        match self {
            Self::Equal(participants) => participants.len(),
            Self::Exact(shares) => shares.len(),
            Self::Percentage(shares) => shares.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.participant_count() == 0
    }

    pub fn equal<I, P>(participants: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParticipantId>,
    {
        Self::Equal(participants.into_iter().map(Into::into).collect())
    }

    pub fn exact<I, P>(shares: I) -> Self
    where
        I: IntoIterator<Item = (P, Money)>,
        P: Into<ParticipantId>,
    {
        Self::Exact(shares.into_iter().map(|(p, owed)| (p.into(), owed)).collect())
    }

    pub fn percentage<I, P>(shares: I) -> Self
    where
        I: IntoIterator<Item = (P, Decimal)>,
        P: Into<ParticipantId>,
    {
        Self::Percentage(shares.into_iter().map(|(p, pct)| (p.into(), pct)).collect())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseRecord {
    pub payer: ParticipantId,
    pub amount: Money,
    pub split: Split,
}

impl ExpenseRecord {
    pub fn new(payer: impl Into<ParticipantId>, amount: Money, split: Split) -> Self {
        Self {
            payer: payer.into(),
            amount,
            split,
        }
    }
}

/// Net balance per participant. Positive: is owed money. Negative: owes money.
pub type Balances = BTreeMap<ParticipantId, Money>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
}

/// Folds expenses into net balances one expense at a time.
#[derive(Debug, Default)]
pub struct BalanceAccumulator {
    balances: Balances,
}

impl BalanceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one expense. On error the balances are left untouched.
    pub fn apply(&mut self, expense: &ExpenseRecord) -> Result<(), ComputationError> {
        if expense.split.is_empty() {
            return Ok(());
        }

        let overflow = || ComputationError::Overflow {
            payer: expense.payer.clone(),
        };

        let mut deltas: BTreeMap<&ParticipantId, Money> = BTreeMap::new();
        deltas.insert(&expense.payer, expense.amount);

        match &expense.split {
            Split::Equal(participants) => {
                let count = Decimal::from(participants.len());
                let share = expense
                    .amount
                    .as_decimal()
                    .checked_div(count)
                    .ok_or_else(overflow)?
                    .round_dp(SHARE_SCALE);
                for participant in participants {
                    debit(&mut deltas, participant, Money(share)).ok_or_else(overflow)?;
                }
            }
            Split::Exact(shares) => {
                for (participant, owed) in shares {
                    debit(&mut deltas, participant, *owed).ok_or_else(overflow)?;
                }
            }
            Split::Percentage(shares) => {
                for (participant, pct) in shares {
                    let share = expense
                        .amount
                        .as_decimal()
                        .checked_mul(*pct)
                        .and_then(|value| value.checked_div(ONE_HUNDRED))
                        .ok_or_else(overflow)?
                        .round_dp(SHARE_SCALE);
                    debit(&mut deltas, participant, Money(share)).ok_or_else(overflow)?;
                }
            }
        }

        let mut updated = Vec::with_capacity(deltas.len());
        for (participant, delta) in deltas {
            let current = self.balances.get(participant).copied().unwrap_or_default();
            updated.push((participant, current.checked_add(delta).ok_or_else(overflow)?));
        }
        for (participant, balance) in updated {
            self.balances.insert(participant.clone(), balance);
        }

        Ok(())
    }

    pub fn balances(&self) -> &Balances {
        &self.balances
    }

    pub fn into_balances(self) -> Balances {
        self.balances
    }
}

fn debit<'a>(
    deltas: &mut BTreeMap<&'a ParticipantId, Money>,
    participant: &'a ParticipantId,
    amount: Money,
) -> Option<()> {
    let entry = deltas.entry(participant).or_default();
    *entry = entry.checked_sub(amount)?;
    Some(())
}

/// Settles `transfers` against a copy of `balances`: every payment shrinks the
/// payer's debt and the payee's credit by its amount.
///
/// What remains is the residual of the settlement, negligible for consistent input.
pub fn apply_transfers(balances: &Balances, transfers: &[Transfer]) -> Balances {
    let mut residual = balances.clone();
    for transfer in transfers {
        *residual.entry(transfer.from.clone()).or_default() += transfer.amount;
        *residual.entry(transfer.to.clone()).or_default() -= transfer.amount;
    }
    residual
}
