use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::model::Checkout;

use super::availability::checkout_is_active;

/// Sortable columns of the checkout table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    ClientCode,
    DateRange,
    Status,
    Jira,
    HdEvent,
}

impl SortColumn {
    pub const ALL: [SortColumn; 5] = [
        SortColumn::ClientCode,
        SortColumn::DateRange,
        SortColumn::Status,
        SortColumn::Jira,
        SortColumn::HdEvent,
    ];

    /// Stable identifier, also used in the `lastSort` rendering.
    pub fn key(self) -> &'static str {
        match self {
            SortColumn::ClientCode => "clientCode",
            SortColumn::DateRange => "dateRange",
            SortColumn::Status => "status",
            SortColumn::Jira => "jira",
            SortColumn::HdEvent => "hdEvent",
        }
    }

    /// Column header text.
    pub fn label(self) -> &'static str {
        match self {
            SortColumn::ClientCode => "Client Code",
            SortColumn::DateRange => "Date Range",
            SortColumn::Status => "Checkout Status",
            SortColumn::Jira => "Jira Issue",
            SortColumn::HdEvent => "HD Event",
        }
    }
}

impl FromStr for SortColumn {
    type Err = String;

    /// Accepts the key or the header label, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortColumn::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(s) || c.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown sort column: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// Memory of the last applied sort.
///
/// Sorting the same column again flips its direction; any other column
/// starts ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    last: Option<(SortColumn, SortDirection)>,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<(SortColumn, SortDirection)> {
        self.last
    }

    /// Direction the next sort on `column` will use.
    pub fn next_direction(&self, column: SortColumn) -> SortDirection {
        match self.last {
            Some((c, dir)) if c == column => dir.flip(),
            _ => SortDirection::Ascending,
        }
    }

    /// Sort `rows` in place by `column` and remember the direction used.
    pub fn sort(
        &mut self,
        rows: &mut [Checkout],
        column: SortColumn,
        today: NaiveDate,
    ) -> SortDirection {
        let direction = self.next_direction(column);
        sort_rows(rows, column, direction, today);
        self.last = Some((column, direction));
        direction
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Renders as `none` or `<column>_<asc|desc>`, e.g. `jira_desc`.
impl fmt::Display for SortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.last {
            None => write!(f, "none"),
            Some((column, dir)) => write!(f, "{}_{}", column.key(), dir.suffix()),
        }
    }
}

/// Stable sort of `rows` by one column in one direction.
///
/// `DateRange` keeps permanent rows after dated ones in both directions and
/// orders by the start date text within each group. `Status` orders by the
/// active flag alone: ascending puts inactive rows first, descending puts
/// active rows first, and equal rows keep their previous relative order.
pub fn sort_rows(
    rows: &mut [Checkout],
    column: SortColumn,
    direction: SortDirection,
    today: NaiveDate,
) {
    match column {
        SortColumn::ClientCode => {
            rows.sort_by(|a, b| direction.apply(a.client_code.cmp(&b.client_code)))
        }
        SortColumn::Jira => rows.sort_by(|a, b| direction.apply(a.jira.cmp(&b.jira))),
        SortColumn::HdEvent => rows.sort_by(|a, b| direction.apply(a.hd_event.cmp(&b.hd_event))),
        SortColumn::DateRange => rows.sort_by(|a, b| {
            a.permanent
                .cmp(&b.permanent)
                .then_with(|| direction.apply(start_text(a).cmp(start_text(b))))
        }),
        SortColumn::Status => rows.sort_by_key(|c| {
            let active = checkout_is_active(c, today);
            match direction {
                SortDirection::Ascending => active,
                SortDirection::Descending => !active,
            }
        }),
    }
}

fn start_text(c: &Checkout) -> &str {
    c.start_date.as_deref().unwrap_or("")
}
