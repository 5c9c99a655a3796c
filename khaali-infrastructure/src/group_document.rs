use fxhash::FxHashMap;
use khaali_application::{CachedExpense, ExpenseSource, GroupId, MemberDirectory, SourceError};
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupMember {
    pub address: String,
    #[serde(default)]
    pub subname: Option<String>,
}

/// A group's cached state as exported by the web backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupDocument {
    pub group_id: GroupId,
    #[serde(default)]
    pub members: Vec<GroupMember>,
    #[serde(default)]
    pub expenses: Vec<CachedExpense>,
}

/// Serves one [`GroupDocument`] as both expense source and member directory.
pub struct JsonGroupDocument {
    group_id: GroupId,
    expenses: Vec<CachedExpense>,
    // Lowercase address -> subname
    names: FxHashMap<String, String>,
}

impl JsonGroupDocument {
    pub fn from_document(document: GroupDocument) -> Self {
        let names = document
            .members
            .into_iter()
            .filter_map(|member| {
                let subname = member.subname.filter(|name| !name.is_empty())?;
                Some((member.address.to_ascii_lowercase(), subname))
            })
            .collect();

        Self {
            group_id: document.group_id,
            expenses: document.expenses,
            names,
        }
    }

    pub fn from_json(content: &str) -> Result<Self, SourceError> {
        let document: GroupDocument = serde_json::from_str(content)?;
        Ok(Self::from_document(document))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let document = Self::from_json(&content)?;
        tracing::debug!(
            path = %path.display(),
            group_id = document.group_id,
            expense_count = document.expenses.len(),
            named_member_count = document.names.len(),
            "Loaded group document"
        );
        Ok(document)
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }
}

impl ExpenseSource for JsonGroupDocument {
    fn load_expenses(&self, group_id: GroupId) -> Result<Vec<CachedExpense>, SourceError> {
        if group_id != self.group_id {
            return Err(SourceError::UnknownGroup(group_id));
        }
        Ok(self.expenses.clone())
    }
}

impl MemberDirectory for JsonGroupDocument {
    fn display_name(&self, address: &str) -> Option<&str> {
        self.names
            .get(&address.to_ascii_lowercase())
            .map(String::as_str)
    }
}
