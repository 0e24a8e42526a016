//! Wire and storage model for statement reports.
//!
//! Field names follow the JSON contract used by existing clients, so the
//! structs rename everything to camelCase on the wire.

use serde::{Deserialize, Serialize};

/// Shape and presentation metadata for one statement report.
///
/// The `rows` field is only populated by the self-contained generate request;
/// stored definitions and override definitions usually leave it empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Ordered table columns; one header cell per entry.
    pub header: Vec<ColumnSpec>,
    pub title: Option<String>,
    /// Path to a logo image. A missing or unreadable icon falls back to a
    /// generated placeholder.
    pub icon: Option<String>,
    /// Label/value pairs rendered as a grid above the table. `None` skips the
    /// band entirely; `Some(vec![])` renders an empty band.
    pub meta: Option<Vec<MetaEntry>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<StatementRow>,
}

/// One table column: a display label and the data field it nominally shows.
///
/// `field_key` is carried for clients but never consulted during rendering;
/// cell contents come from [`StatementRow::cells`] by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnSpec {
    pub field_name: String,
    pub field_key: String,
}

/// One label/value pair in the metadata band.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaEntry {
    pub title: String,
    pub value: String,
}

/// One statement line. All fields are plain strings; absent JSON fields
/// deserialize as empty strings and still occupy their table cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatementRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub date: String,
    pub branch: String,
    pub start_balance: String,
    pub debit: String,
    pub credit: String,
    pub end_balance: String,
    pub description: String,
    pub target_account: String,
}

/// Number of data fields a rendered table row always carries.
pub const ROW_FIELD_COUNT: usize = 8;

impl StatementRow {
    /// Cell contents in the fixed order the table renders them, independent
    /// of the definition's column keys.
    pub fn cells(&self) -> [&str; ROW_FIELD_COUNT] {
        [
            self.date.as_str(),
            self.branch.as_str(),
            self.start_balance.as_str(),
            self.debit.as_str(),
            self.credit.as_str(),
            self.end_balance.as_str(),
            self.description.as_str(),
            self.target_account.as_str(),
        ]
    }
}

impl MetaEntry {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
        }
    }
}

impl ColumnSpec {
    pub fn new(field_name: impl Into<String>, field_key: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            field_key: field_key.into(),
        }
    }
}
