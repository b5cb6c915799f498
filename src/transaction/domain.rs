//! Core transaction domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, category::CategoryId, invoice::InvoiceId, profile::ProfileId};

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money received, e.g. payment for a service.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionKind {
    /// The value stored in the database, "income" or "expense".
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(Error::InvalidTransactionKind(other.to_owned())),
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An income or expense recorded for a profile.
///
/// `amount` is always positive, `kind` says which way the money went.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The transaction's database ID.
    pub id: TransactionId,
    /// Whether money came in or went out.
    pub kind: TransactionKind,
    /// How much money changed hands.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// Free text describing the transaction.
    pub description: String,
    /// The profile that owns the transaction.
    pub profile_id: ProfileId,
    /// The expense category, if any.
    pub category_id: Option<CategoryId>,
    /// The invoice an income has been billed on, `None` until it is invoiced.
    pub invoice_id: Option<InvoiceId>,
}

/// The fields needed to record a [Transaction].
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: f64,
    pub date: Date,
    pub description: String,
    pub profile_id: ProfileId,
    pub category_id: Option<CategoryId>,
}
