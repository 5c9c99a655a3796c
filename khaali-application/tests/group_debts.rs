use khaali_application::{
    CachedExpense, DebtService, ExpenseSource, GroupDebts, GroupId, SourceError,
};
use khaali_domain::{Money, ParticipantId, Transfer};
use proptest::prelude::*;
use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};

struct FixedSource(Vec<CachedExpense>);

impl ExpenseSource for FixedSource {
    fn load_expenses(&self, _group_id: GroupId) -> Result<Vec<CachedExpense>, SourceError> {
        Ok(self.0.clone())
    }
}

fn rows(values: Value) -> Vec<CachedExpense> {
    serde_json::from_value(values).expect("rows should deserialize")
}

fn transfers(entries: &[(&str, &str, Decimal)]) -> Vec<Transfer> {
    entries
        .iter()
        .map(|(from, to, amount)| Transfer {
            from: ParticipantId::from(*from),
            to: ParticipantId::from(*to),
            amount: Money::from_decimal(*amount),
        })
        .collect()
}

#[fixture]
fn weekend_trip() -> FixedSource {
    FixedSource(rows(json!([
        {"expense_id": 10, "creator_address": "0xalice", "amount": "120.00",
         "split_type": "equal", "description": "Cabin",
         "participants_json": {"0xalice": 1, "0xbob": 1, "0xcarol": 1}},
        {"expense_id": 11, "creator_address": "0xbob", "amount": "45.00",
         "split_type": "exact", "description": "Groceries",
         "participants_json": {"0xalice": "15", "0xbob": "15", "0xcarol": "15"}},
        {"expense_id": 12, "creator_address": "0xcarol", "amount": "30.00",
         "split_type": "percentage", "description": "Fuel",
         "participants_json": {"0xalice": 50, "0xcarol": 50}},
        {"expense_id": 13, "creator_address": "0xcarol", "amount": null,
         "split_type": "equal", "participants_json": {"0xalice": 1}},
    ])))
}

#[rstest]
fn mixed_policies_settle_in_greedy_order(weekend_trip: FixedSource) {
    // alice +120 -40 -15 -15 = 50, bob +45 -40 -15 = -10, carol +30 -40 -15 -15 = -40
    let service = DebtService::new(&weekend_trip);

    let debts = service.group_debts(7);

    assert!(matches!(debts, GroupDebts::Outstanding(_)));
    assert_eq!(
        debts.transfers(),
        transfers(&[("0xcarol", "0xalice", dec!(40)), ("0xbob", "0xalice", dec!(10))]).as_slice()
    );
}

#[rstest]
#[case::three_way_equal(
    json!([
        {"expense_id": 1, "creator_address": "A", "amount": "60",
         "participants_json": {"A": 1, "B": 1, "C": 1}},
        {"expense_id": 2, "creator_address": "B", "amount": "30",
         "participants_json": {"A": 1, "B": 1, "C": 1}},
    ]),
    &[("C", "A", dec!(30))],
)]
#[case::repeating_thirds_round_at_emission(
    json!([
        {"expense_id": 1, "creator_address": "A", "amount": "100",
         "participants_json": {"A": 1, "B": 1, "C": 1}},
    ]),
    &[("B", "A", dec!(33.333333)), ("C", "A", dec!(33.333333))],
)]
#[case::short_exact_split_keeps_residual(
    json!([
        {"expense_id": 1, "creator_address": "A", "amount": "100", "split_type": "exact",
         "participants_json": {"B": "40", "C": "40"}},
    ]),
    &[("B", "A", dec!(40)), ("C", "A", dec!(40))],
)]
#[case::unsupported_split_skipped(
    json!([
        {"expense_id": 1, "creator_address": "A", "amount": "100", "split_type": "shares",
         "participants_json": {"B": 1}},
        {"expense_id": 2, "creator_address": "B", "amount": "8",
         "participants_json": {"A": 1}},
    ]),
    &[("A", "B", dec!(8))],
)]
fn row_scenarios(#[case] values: Value, #[case] expected: &[(&str, &str, Decimal)]) {
    let transfers_out = DebtService::debts_for_rows(&rows(values)).expect("debts should compute");

    assert_eq!(transfers_out, transfers(expected));
}

proptest! {
    #[test]
    fn string_and_number_amounts_agree(
        cents in prop::collection::vec(1i64..=500_000, 1..=8),
        payers in prop::collection::vec(0usize..4, 1..=8),
    ) {
        let names = ["0x1", "0x2", "0x3", "0x4"];
        let build = |as_text: bool| -> Vec<CachedExpense> {
            cents
                .iter()
                .zip(payers.iter().cycle())
                .enumerate()
                .map(|(idx, (&amount, &payer))| {
                    let amount = Decimal::new(amount, 2);
                    let amount = if as_text {
                        json!(amount.to_string())
                    } else {
                        serde_json::from_str::<Value>(&amount.to_string())
                            .expect("decimal renders as a JSON number")
                    };
                    serde_json::from_value(json!({
                        "expense_id": idx,
                        "creator_address": names[payer],
                        "amount": amount,
                        "participants_json": {"0x1": 1, "0x2": 1, "0x3": 1, "0x4": 1},
                    }))
                    .expect("row should deserialize")
                })
                .collect()
        };

        let from_text = DebtService::debts_for_rows(&build(true)).expect("text amounts");
        let from_numbers = DebtService::debts_for_rows(&build(false)).expect("number amounts");

        prop_assert_eq!(from_text, from_numbers);
    }
}
