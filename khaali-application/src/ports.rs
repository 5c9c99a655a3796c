use crate::{
    error::SourceError,
    model::{CachedExpense, GroupId},
};
use std::collections::HashMap;

pub trait ExpenseSource: Send + Sync {
    fn load_expenses(&self, group_id: GroupId) -> Result<Vec<CachedExpense>, SourceError>;
}

/// Human-readable names for participant addresses. Lookups ignore ASCII case.
pub trait MemberDirectory: Send + Sync {
    fn display_name(&self, address: &str) -> Option<&str>;
}

/// Keys must be lowercase addresses.
impl MemberDirectory for HashMap<String, String> {
    fn display_name(&self, address: &str) -> Option<&str> {
        self.get(&address.to_ascii_lowercase()).map(String::as_str)
    }
}
