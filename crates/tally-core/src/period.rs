//! Time window resolution for period-over-period reports
//!
//! A period token (`week`, `month`, `year`) plus a reference instant resolves
//! to the window containing that instant and the equal-length window right
//! before it.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A closed date range `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(Error::Validation(format!(
                "Date range end {} is before start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days in the range, both ends included
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Parse a `YYYY-MM-DD` pair
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        let start = parse_date(from)?;
        let end = parse_date(to)?;
        Self::new(start, end)
    }
}

/// Parse a `YYYY-MM-DD` date, mapping failures to a validation error
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| Error::Validation(format!("Invalid date '{}' (use YYYY-MM-DD)", s)))
}

/// Report period granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    #[default]
    Month,
    Year,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Lenient parse used by report endpoints: unknown or absent tokens
    /// fall back to `month`.
    pub fn parse_or_default(token: Option<&str>) -> Self {
        token.and_then(|t| t.parse().ok()).unwrap_or_default()
    }

    /// Resolve the current and previous windows around `now`
    pub fn windows(&self, now: DateTime<Utc>) -> PeriodWindows {
        let today = now.date_naive();
        let (current, previous) = match self {
            Self::Week => {
                let offset = today.weekday().num_days_from_sunday() as i64;
                let start = today - Duration::days(offset);
                let end = start + Duration::days(6);
                (
                    DateRange { start, end },
                    DateRange {
                        start: start - Duration::days(7),
                        end: end - Duration::days(7),
                    },
                )
            }
            Self::Month => {
                let start = first_of_month(today);
                let end = last_of_month(today);
                let prev_start = start - Months::new(1);
                (
                    DateRange { start, end },
                    DateRange {
                        start: prev_start,
                        end: start - Duration::days(1),
                    },
                )
            }
            Self::Year => {
                let year = today.year();
                (
                    year_range(year).unwrap_or(DateRange {
                        start: today,
                        end: today,
                    }),
                    year_range(year - 1).unwrap_or(DateRange {
                        start: today,
                        end: today,
                    }),
                )
            }
        };

        PeriodWindows {
            period: *self,
            current,
            previous,
        }
    }
}

impl std::str::FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(Error::Validation(format!(
                "Unknown period: {} (valid: week, month, year)",
                s
            ))),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current window and the equal-length window preceding it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodWindows {
    pub period: Period,
    pub current: DateRange,
    pub previous: DateRange,
}

/// First day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    (first + Months::new(1)) - Duration::days(1)
}

/// First day of the month `n` months before the month containing `date`
pub fn months_back(date: NaiveDate, n: u32) -> NaiveDate {
    first_of_month(date) - Months::new(n)
}

fn year_range(year: i32) -> Option<DateRange> {
    Some(DateRange {
        start: NaiveDate::from_ymd_opt(year, 1, 1)?,
        end: NaiveDate::from_ymd_opt(year, 12, 31)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_window_starts_on_sunday() {
        // 2024-03-13 is a Wednesday
        let w = Period::Week.windows(at(2024, 3, 13));
        assert_eq!(w.current.start, date(2024, 3, 10));
        assert_eq!(w.current.end, date(2024, 3, 16));
        assert_eq!(w.previous.start, date(2024, 3, 3));
        assert_eq!(w.previous.end, date(2024, 3, 9));
    }

    #[test]
    fn test_week_window_on_sunday_itself() {
        let w = Period::Week.windows(at(2024, 3, 10));
        assert_eq!(w.current.start, date(2024, 3, 10));
        assert_eq!(w.current.num_days(), 7);
    }

    #[test]
    fn test_month_window_handles_short_previous_month() {
        let w = Period::Month.windows(at(2024, 3, 31));
        assert_eq!(w.current.start, date(2024, 3, 1));
        assert_eq!(w.current.end, date(2024, 3, 31));
        assert_eq!(w.previous.start, date(2024, 2, 1));
        assert_eq!(w.previous.end, date(2024, 2, 29));
    }

    #[test]
    fn test_month_window_crosses_year() {
        let w = Period::Month.windows(at(2024, 1, 15));
        assert_eq!(w.previous.start, date(2023, 12, 1));
        assert_eq!(w.previous.end, date(2023, 12, 31));
    }

    #[test]
    fn test_year_window() {
        let w = Period::Year.windows(at(2024, 6, 1));
        assert_eq!(w.current.start, date(2024, 1, 1));
        assert_eq!(w.current.end, date(2024, 12, 31));
        assert_eq!(w.previous.start, date(2023, 1, 1));
        assert_eq!(w.previous.end, date(2023, 12, 31));
    }

    #[test]
    fn test_unknown_token_defaults_to_month() {
        assert_eq!(Period::parse_or_default(Some("fortnight")), Period::Month);
        assert_eq!(Period::parse_or_default(None), Period::Month);
        assert_eq!(Period::parse_or_default(Some("YEAR")), Period::Year);
        assert!("fortnight".parse::<Period>().is_err());
    }

    #[test]
    fn test_months_back() {
        assert_eq!(months_back(date(2024, 3, 17), 6), date(2023, 9, 1));
        assert_eq!(months_back(date(2024, 3, 17), 0), date(2024, 3, 1));
    }

    #[test]
    fn test_date_range_rejects_inverted() {
        assert!(DateRange::new(date(2024, 2, 1), date(2024, 1, 1)).is_err());
        assert!(DateRange::parse("2024-01-01", "2024-13-01").is_err());
        let r = DateRange::parse("2024-01-01", "2024-01-31").unwrap();
        assert!(r.contains(date(2024, 1, 31)));
        assert_eq!(r.num_days(), 31);
    }
}
