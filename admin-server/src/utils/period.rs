//! Named relative date ranges used by statistics and reports

use chrono::{DateTime, Duration, Months, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use shared::error::AppError;
use shared::util::start_of_local_day;

/// `GET /api/orders/stats?period=`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsPeriod {
    /// Since local midnight
    Today,
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
}

impl StatsPeriod {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "today" => Some(StatsPeriod::Today),
            "week" => Some(StatsPeriod::Week),
            "month" => Some(StatsPeriod::Month),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            StatsPeriod::Today => "today",
            StatsPeriod::Week => "week",
            StatsPeriod::Month => "month",
        }
    }

    pub fn start(&self, now: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
        match self {
            StatsPeriod::Today => start_of_local_day(now, tz),
            StatsPeriod::Week => now - Duration::days(7),
            StatsPeriod::Month => now - Duration::days(30),
        }
    }
}

/// `GET /api/reports/*?period=`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Days7,
    Days30,
    Days90,
    Year,
}

impl ReportPeriod {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "7d" => Some(ReportPeriod::Days7),
            "30d" => Some(ReportPeriod::Days30),
            "90d" => Some(ReportPeriod::Days90),
            "1y" => Some(ReportPeriod::Year),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ReportPeriod::Days7 => "7d",
            ReportPeriod::Days30 => "30d",
            ReportPeriod::Days90 => "90d",
            ReportPeriod::Year => "1y",
        }
    }

    /// Start of `[start, now]`; one year back is a calendar year
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            ReportPeriod::Days7 => now - Duration::days(7),
            ReportPeriod::Days30 => now - Duration::days(30),
            ReportPeriod::Days90 => now - Duration::days(90),
            ReportPeriod::Year => now
                .checked_sub_months(Months::new(12))
                .unwrap_or(now - Duration::days(365)),
        }
    }
}

/// A `period` query value as sent by the client.
///
/// Labels outside the known set are kept and echoed back; they select an
/// empty window rather than failing the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedPeriod<P> {
    label: String,
    window: Option<P>,
}

impl<P: Copy> RequestedPeriod<P> {
    fn resolve(value: Option<&str>, default: P, default_label: &str, lookup: fn(&str) -> Option<P>) -> Self {
        match value.filter(|v| !v.is_empty()) {
            None => Self { label: default_label.to_string(), window: Some(default) },
            Some(label) => Self { label: label.to_string(), window: lookup(label) },
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// `None` when the label is not a known period
    pub fn window(&self) -> Option<P> {
        self.window
    }
}

impl RequestedPeriod<StatsPeriod> {
    /// Missing or empty means today
    pub fn stats(value: Option<&str>) -> Self {
        Self::resolve(value, StatsPeriod::Today, StatsPeriod::Today.as_str(), StatsPeriod::from_label)
    }

    pub fn start(&self, now: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
        self.window.map_or(now, |p| p.start(now, tz))
    }
}

impl RequestedPeriod<ReportPeriod> {
    pub fn report(value: Option<&str>, default: ReportPeriod) -> Self {
        Self::resolve(value, default, default.as_str(), ReportPeriod::from_label)
    }

    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.window.map_or(now, |p| p.start(now))
    }
}

impl From<StatsPeriod> for RequestedPeriod<StatsPeriod> {
    fn from(period: StatsPeriod) -> Self {
        Self { label: period.as_str().to_string(), window: Some(period) }
    }
}

impl From<ReportPeriod> for RequestedPeriod<ReportPeriod> {
    fn from(period: ReportPeriod) -> Self {
        Self { label: period.as_str().to_string(), window: Some(period) }
    }
}

/// Which end of a date filter a bare `YYYY-MM-DD` stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    /// Local midnight at the start of the day
    Start,
    /// Last instant of the day
    End,
}

/// Parse a list filter date: RFC 3339, or a calendar date in the business zone
pub fn parse_date_bound(
    value: &str,
    field: &str,
    bound: DateBound,
    tz: Tz,
) -> Result<DateTime<Utc>, AppError> {
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(at.with_timezone(&Utc));
    }
    let invalid = || {
        AppError::validation(format!("Invalid {field}: {value}"))
            .with_detail("field", field)
            .with_detail("expected", "RFC 3339 timestamp or YYYY-MM-DD")
    };
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())?;
    let naive = match bound {
        DateBound::Start => date.and_time(NaiveTime::MIN),
        DateBound::End => date
            .succ_opt()
            .ok_or_else(invalid)?
            .and_time(NaiveTime::MIN),
    };
    let start = naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc());
    Ok(match bound {
        DateBound::Start => start,
        DateBound::End => start - Duration::nanoseconds(1),
    })
}
