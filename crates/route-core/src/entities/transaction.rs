use crate::entity::{required, string_enum, Entity, NumberInput};
use crate::error::Result;
use crate::list;
use crate::paths;
use crate::query::Listing;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Income,
    Expense,
}

string_enum!(TransactionKind, "transaction kind", [
    Income => "Income",
    Expense => "Expense",
]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub description: String,
    /// Always non-negative; `kind` carries the sign.
    pub amount: f64,
    #[serde(default)]
    pub category: String,
    pub kind: TransactionKind,
    pub date: NaiveDate,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
        kind: TransactionKind,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            amount: amount.abs(),
            category: String::new(),
            kind,
            date,
        }
    }

    pub fn signed(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

impl Entity for Transaction {
    const KIND: &'static str = "transaction";
    const SLOT: &'static str = paths::SPENDING_SLOT;

    fn id(&self) -> &str {
        &self.id
    }

    fn defaults() -> Vec<Self> {
        let today = Utc::now().date_naive();
        let mut hosting = Transaction::new("transaction-1", "Hosting", 49.0, TransactionKind::Expense, today);
        hosting.category = "Infrastructure".into();
        let mut invoice = Transaction::new("transaction-2", "Consulting invoice", 2_400.0, TransactionKind::Income, today);
        invoice.category = "Services".into();
        vec![hosting, invoice]
    }
}

impl Listing for Transaction {
    type Facet = TransactionKind;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.description.as_str(), self.category.as_str()]
    }

    fn sort_label(&self) -> &str {
        &self.description
    }

    fn touched_at(&self) -> i64 {
        self.date
            .and_hms_opt(0, 0, 0)
            .map(|t| t.and_utc().timestamp_millis())
            .unwrap_or(0)
    }

    fn facet(&self) -> TransactionKind {
        self.kind
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    pub description: String,
    #[serde(default)]
    pub amount: NumberInput,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub kind: Option<TransactionKind>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl TransactionDraft {
    /// Missing kind means expense; missing date means today.
    pub fn into_transaction(self) -> Result<Transaction> {
        let mut t = Transaction::new(
            list::generate_id(),
            required("description", &self.description)?,
            self.amount.value(),
            self.kind.unwrap_or(TransactionKind::Expense),
            self.date.unwrap_or_else(|| Utc::now().date_naive()),
        );
        t.category = self.category.trim().to_string();
        Ok(t)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    pub description: Option<String>,
    pub amount: Option<NumberInput>,
    pub category: Option<String>,
    pub kind: Option<TransactionKind>,
    pub date: Option<NaiveDate>,
}

impl TransactionPatch {
    pub fn apply(self, t: &mut Transaction) -> Result<()> {
        if let Some(description) = self.description {
            t.description = required("description", &description)?;
        }
        if let Some(amount) = self.amount {
            t.amount = amount.value().abs();
        }
        if let Some(category) = self.category {
            t.category = category.trim().to_string();
        }
        if let Some(kind) = self.kind {
            t.kind = kind;
        }
        if let Some(date) = self.date {
            t.date = date;
        }
        Ok(())
    }
}

pub fn add_transaction(items: &[Transaction], draft: TransactionDraft) -> Result<Vec<Transaction>> {
    Ok(list::add(items, draft.into_transaction()?))
}

pub fn edit_transaction(items: &[Transaction], id: &str, patch: TransactionPatch) -> Result<Vec<Transaction>> {
    list::try_update(items, id, |t| patch.apply(t))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    pub income: f64,
    pub expense: f64,
    pub net: f64,
}

pub fn summary(items: &[Transaction]) -> Summary {
    let mut s = Summary::default();
    for t in items {
        match t.kind {
            TransactionKind::Income => s.income += t.amount,
            TransactionKind::Expense => s.expense += t.amount,
        }
    }
    s.net = s.income - s.expense;
    s
}
