use std::fmt::{Display, Formatter};

use time::macros::format_description;
use time::{Date, Duration};

use crate::ValidationError;

/// Formats a calendar date as `dd/mm/yyyy`, the indicators service wire format.
pub fn format_wire_date(date: Date) -> String {
    format!(
        "{:02}/{:02}/{:04}",
        date.day(),
        u8::from(date.month()),
        date.year()
    )
}

/// Parses a `dd/mm/yyyy` date.
pub fn parse_wire_date(input: &str) -> Result<Date, ValidationError> {
    Date::parse(input.trim(), format_description!("[day]/[month]/[year]")).map_err(|_| {
        ValidationError::InvalidDate {
            value: input.to_owned(),
        }
    })
}

/// Inclusive calendar window used to scope a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidDateRange {
                start: format_wire_date(start),
                end: format_wire_date(end),
            });
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        Self::new(parse_wire_date(start)?, parse_wire_date(end)?)
    }

    /// Window ending on `today` and starting `days` days earlier.
    pub fn trailing_days(days: u16, today: Date) -> Result<Self, ValidationError> {
        let start = today
            .checked_sub(Duration::days(i64::from(days)))
            .ok_or_else(|| ValidationError::InvalidDateRange {
                start: format!("{} days before {}", days, format_wire_date(today)),
                end: format_wire_date(today),
            })?;
        Self::new(start, today)
    }

    pub const fn start(&self) -> Date {
        self.start
    }

    pub const fn end(&self) -> Date {
        self.end
    }

    pub fn start_wire(&self) -> String {
        format_wire_date(self.start)
    }

    pub fn end_wire(&self) -> String {
        format_wire_date(self.end)
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.start_wire(), self.end_wire())
    }
}
