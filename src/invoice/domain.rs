//! Core invoice domain types.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::profile::ProfileId;

/// Database identifier for an invoice.
pub type InvoiceId = i64;

/// A bill for one or more incomes of a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// The invoice's database ID.
    pub id: InvoiceId,
    /// The profile that issued the invoice.
    pub profile_id: ProfileId,
    /// The date the invoice was issued.
    pub date: Date,
    /// The sum of the invoiced incomes.
    pub total: f64,
}
