use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Backing-store record id. Zero marks a checkout that has never been saved.
pub type CheckoutId = i64;

/// Sentinel id of a new, unsaved checkout.
pub const UNSAVED_ID: CheckoutId = 0;

fn is_unsaved_id(id: &CheckoutId) -> bool {
    *id == UNSAVED_ID
}

// ── Records ──────────────────────────────────────────────────────

/// A person or organizational account attached to a checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Owner {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    /// Organizational/shared account rather than a named individual.
    pub client: bool,
    pub primary: bool,
    pub alert: bool,
    /// Back-reference to the owning checkout.
    #[serde(rename = "checkoutID", alias = "checkoutId")]
    pub checkout_id: CheckoutId,
}

/// A reservation of one server, either date-bounded or permanent.
///
/// Dates are kept as the text the operator or backing store supplied;
/// the list filter and the date-range sort work on that text, while
/// availability and range validation parse it with [`parse_day`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Checkout {
    /// Omitted on the wire while unsaved so the store assigns a fresh id.
    #[serde(skip_serializing_if = "is_unsaved_id")]
    pub id: CheckoutId,
    pub server: String,
    pub client_code: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub jira: String,
    pub hd_event: String,
    pub notes: String,
    pub permanent: bool,
    pub owners: Vec<Owner>,
}

impl Checkout {
    /// Locally built empty checkout, never fetched from the backing store.
    pub fn unsaved() -> Self {
        Self::default()
    }

    pub fn is_unsaved(&self) -> bool {
        is_unsaved_id(&self.id)
    }

    pub fn start_day(&self) -> Option<NaiveDate> {
        self.start_date.as_deref().and_then(parse_day)
    }

    pub fn end_day(&self) -> Option<NaiveDate> {
        self.end_date.as_deref().and_then(parse_day)
    }

    /// First owner flagged primary, if any.
    pub fn primary_owner(&self) -> Option<&Owner> {
        self.owners.iter().find(|o| o.primary)
    }
}

// ── Dates ────────────────────────────────────────────────────────

const US_DATE: &str = "%m/%d/%Y";
const ISO_DATE: &str = "%Y-%m-%d";

/// Parse `M/D/YYYY` (zero padding optional) or ISO `YYYY-MM-DD`.
/// Blank or unrecognized text yields `None`.
pub fn parse_day(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(text, US_DATE)
        .or_else(|_| NaiveDate::parse_from_str(text, ISO_DATE))
        .ok()
}

/// `M/D/YYYY` without zero padding.
pub fn format_day(day: NaiveDate) -> String {
    format!("{}/{}/{}", day.month(), day.day(), day.year())
}

/// Rewrite a date field into `M/D/YYYY`. Blank becomes `None`;
/// text that does not parse is passed through untouched.
pub fn normalize_day(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(parse_day(trimmed).map_or_else(|| trimmed.to_string(), format_day))
}

// ── Server catalog ───────────────────────────────────────────────

/// A shared server that can be checked out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Server {
    pub code: &'static str,
    pub name: &'static str,
}

pub const SERVERS: &[Server] = &[
    Server { code: "UX04", name: "UX04: PAS/HARP/CRM DEV" },
    Server { code: "QXA", name: "QXA: HARP Production" },
    Server { code: "QXB", name: "QXB: Quick Processing" },
    Server { code: "QXC", name: "QXC: Old Development" },
    Server { code: "QXE", name: "QXE: HP 3000 Development" },
    Server { code: "UX02", name: "UX02: Suprtool" },
];

pub fn find_server(code: &str) -> Option<&'static Server> {
    SERVERS.iter().find(|s| s.code.eq_ignore_ascii_case(code))
}
