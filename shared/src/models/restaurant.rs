//! Restaurant and Location Models

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::util::parse_hhmm;

/// Restaurant (tenant) row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Physical site of a restaurant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Location {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub business_hours: BusinessHours,
    pub created_at: DateTime<Utc>,
}

/// Opening hours for one weekday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    /// `HH:MM`, 24h
    pub open: String,
    /// `HH:MM`, 24h
    pub close: String,
    #[serde(default)]
    pub closed: bool,
}

impl DayHours {
    pub fn new(open: &str, close: &str) -> Self {
        Self {
            open: open.to_string(),
            close: close.to_string(),
            closed: false,
        }
    }

    pub fn closed() -> Self {
        Self {
            open: "00:00".to_string(),
            close: "00:00".to_string(),
            closed: true,
        }
    }

    /// Whether `minute` (minutes since local midnight) falls inside the hours.
    ///
    /// Both ends are inclusive. A close time earlier than the open time
    /// means the day runs past midnight. Malformed times count as closed.
    pub fn is_open_at(&self, minute: u32) -> bool {
        if self.closed {
            return false;
        }
        let (Some(open), Some(close)) = (parse_hhmm(&self.open), parse_hhmm(&self.close)) else {
            return false;
        };
        if close >= open {
            minute >= open && minute <= close
        } else {
            minute >= open || minute <= close
        }
    }

    /// `9:00 AM - 10:30 PM`, or `Closed`
    pub fn format(&self) -> String {
        if self.closed {
            return "Closed".to_string();
        }
        format!("{} - {}", format_12h(&self.open), format_12h(&self.close))
    }
}

fn format_12h(time: &str) -> String {
    let Some(total) = parse_hhmm(time) else {
        return time.to_string();
    };
    let (hour, minute) = (total / 60, total % 60);
    let suffix = if hour >= 12 { "PM" } else { "AM" };
    let display = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    format!("{display}:{minute:02} {suffix}")
}

/// Weekly opening hours, stored as JSON on the location row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    pub monday: DayHours,
    pub tuesday: DayHours,
    pub wednesday: DayHours,
    pub thursday: DayHours,
    pub friday: DayHours,
    pub saturday: DayHours,
    pub sunday: DayHours,
}

impl Default for BusinessHours {
    /// 09:00 - 21:00 every day
    fn default() -> Self {
        let day = DayHours::new("09:00", "21:00");
        Self {
            monday: day.clone(),
            tuesday: day.clone(),
            wednesday: day.clone(),
            thursday: day.clone(),
            friday: day.clone(),
            saturday: day.clone(),
            sunday: day,
        }
    }
}

impl BusinessHours {
    pub fn day(&self, weekday: Weekday) -> &DayHours {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    /// Whether the location is open at a local wall-clock time
    pub fn is_open_at(&self, local: NaiveDateTime) -> bool {
        self.day(local.weekday())
            .is_open_at(local.hour() * 60 + local.minute())
    }
}
