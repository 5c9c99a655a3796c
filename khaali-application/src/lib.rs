#![warn(clippy::uninlined_format_args)]

pub mod debt_service;
pub mod error;
pub mod model;
pub mod ports;

pub use debt_service::{DebtService, GroupDebts};
pub use error::{DebtError, SourceError};
pub use model::{CachedExpense, GroupId, ResolvedExpense, resolve_expenses};
pub use ports::{ExpenseSource, MemberDirectory};
