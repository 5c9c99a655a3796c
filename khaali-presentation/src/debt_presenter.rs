use crate::{
    error_presenter::format_debt_error,
    text_table::{Column, TextTable},
};
use khaali_application::{GroupDebts, MemberDirectory};
use khaali_domain::Transfer;
use serde::Serialize;
use std::borrow::Cow;

const DEBT_COLUMNS: [Column<'static>; 3] = [
    Column::left("From"),
    Column::left("To"),
    Column::right("Amount"),
];
const ALL_SETTLED: &str = "All settled up.";
const VIEWER_SUFFIX: &str = " (you)";
const SHORT_ADDRESS_LEN: usize = 10;

/// A transfer annotated for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebtView {
    pub from_address: String,
    pub to_address: String,
    pub amount: String,
    pub from_label: String,
    pub to_label: String,
    pub is_payer: bool,
    pub is_payee: bool,
}

/// Machine-readable outcome of a debt computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DebtReport {
    Settled,
    Outstanding { debts: Vec<DebtView> },
    Unavailable { error: String },
}

pub struct DebtPresenter;

impl DebtPresenter {
    /// Annotates transfers with display labels and the viewer's role.
    ///
    /// The viewer address is compared without regard to ASCII case.
    pub fn annotate(
        transfers: &[Transfer],
        member_directory: &dyn MemberDirectory,
        viewer: Option<&str>,
    ) -> Vec<DebtView> {
        let is_viewer =
            |address: &str| viewer.is_some_and(|viewer| viewer.eq_ignore_ascii_case(address));

        transfers
            .iter()
            .map(|transfer| {
                let from = transfer.from.as_str();
                let to = transfer.to.as_str();
                DebtView {
                    from_address: from.to_owned(),
                    to_address: to.to_owned(),
                    amount: transfer.amount.to_string(),
                    from_label: format_member_label(from, member_directory).into_owned(),
                    to_label: format_member_label(to, member_directory).into_owned(),
                    is_payer: is_viewer(from),
                    is_payee: is_viewer(to),
                }
            })
            .collect()
    }

    pub fn report(
        debts: &GroupDebts,
        member_directory: &dyn MemberDirectory,
        viewer: Option<&str>,
    ) -> DebtReport {
        match debts {
            GroupDebts::Settled => DebtReport::Settled,
            GroupDebts::Outstanding(transfers) => DebtReport::Outstanding {
                debts: Self::annotate(transfers, member_directory, viewer),
            },
            GroupDebts::Unavailable(err) => DebtReport::Unavailable {
                error: err.to_string(),
            },
        }
    }

    /// Plain-text rendering. A failed computation never reads as settled.
    pub fn render(
        debts: &GroupDebts,
        member_directory: &dyn MemberDirectory,
        viewer: Option<&str>,
    ) -> String {
        match debts {
            GroupDebts::Settled => ALL_SETTLED.to_owned(),
            GroupDebts::Unavailable(err) => format_debt_error(err),
            GroupDebts::Outstanding(transfers) => Self::build_debt_table(
                &Self::annotate(transfers, member_directory, viewer),
            ),
        }
    }

    pub fn build_debt_table(views: &[DebtView]) -> String {
        let mut table = TextTable::new(&DEBT_COLUMNS);
        for view in views {
            table.push_row([
                mark_viewer(&view.from_label, view.is_payer),
                mark_viewer(&view.to_label, view.is_payee),
                Cow::Borrowed(view.amount.as_str()),
            ]);
        }
        table.to_string()
    }
}

fn format_member_label<'a>(
    address: &'a str,
    member_directory: &'a dyn MemberDirectory,
) -> Cow<'a, str> {
    match member_directory.display_name(address) {
        Some(name) => Cow::Borrowed(name),
        None => {
            let short: String = address.chars().take(SHORT_ADDRESS_LEN).collect();
            Cow::Owned(format!("{short}..."))
        }
    }
}

fn mark_viewer(label: &str, is_viewer: bool) -> Cow<'_, str> {
    if is_viewer {
        Cow::Owned(format!("{label}{VIEWER_SUFFIX}"))
    } else {
        Cow::Borrowed(label)
    }
}
