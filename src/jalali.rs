//! Gregorian <-> Jalali (Solar Hijri) calendar conversion.
//!
//! ALGORITHM
//! =========
//! Leap years follow the 2820-year break table used by the Iranian calendar
//! authority's arithmetic approximation; it is exact for years -61..3177.
//! Day arithmetic goes through the Julian day number so `time::Date` does
//! the Gregorian side.

use std::fmt;
use std::str::FromStr;

use time::macros::format_description;
use time::{Date, Month};

pub const MONTH_NAMES: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

const BREAKS: [i32; 20] = [
    -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262, 2324, 2394, 2456, 3178,
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JalaliError {
    #[error("jalali year {0} is outside the supported range")]
    YearOutOfRange(i32),

    #[error("invalid jalali date {year}/{month}/{day}")]
    InvalidDate { year: i32, month: u8, day: u8 },

    #[error("cannot parse date '{0}' (expected YYYY-MM-DD or YYYY/MM/DD)")]
    Unparseable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct JalaliDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl JalaliDate {
    /// Build a date after checking month and day bounds.
    ///
    /// # Errors
    ///
    /// `InvalidDate` for an impossible day, `YearOutOfRange` for a year the
    /// break table does not cover.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, JalaliError> {
        let invalid = JalaliError::InvalidDate { year, month, day };
        if !(1..=12).contains(&month) || day == 0 {
            return Err(invalid);
        }
        if day > month_length(year, month)? {
            return Err(invalid);
        }
        Ok(Self { year, month, day })
    }

    #[must_use]
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[usize::from(self.month.clamp(1, 12) - 1)]
    }

    /// `"1 فروردین 1403"`, the form the panel shows next to dates.
    #[must_use]
    pub fn long(&self) -> String {
        format!("{} {} {}", self.day, self.month_name(), self.year)
    }
}

impl fmt::Display for JalaliDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for JalaliDate {
    type Err = JalaliError;

    /// Accepts `1403/01/01` or `1403-01-01`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || JalaliError::Unparseable(s.to_owned());
        let mut parts = s.trim().split(['/', '-']);
        let (Some(y), Some(m), Some(d), None) = (parts.next(), parts.next(), parts.next(), parts.next()) else {
            return Err(bad());
        };
        let year = y.parse().map_err(|_| bad())?;
        let month = m.parse().map_err(|_| bad())?;
        let day = d.parse().map_err(|_| bad())?;
        Self::new(year, month, day)
    }
}

// =============================================================================
// CALENDAR CORE
// =============================================================================

struct YearInfo {
    /// Years since the last leap year; 0 means this year is leap.
    leap: i32,
    /// Gregorian year in which this Jalali year begins.
    gregorian_year: i32,
    /// Day of March on which Farvardin 1 falls.
    march: u8,
}

fn year_info(jy: i32) -> Result<YearInfo, JalaliError> {
    let last = BREAKS[BREAKS.len() - 1];
    if jy < BREAKS[0] || jy >= last {
        return Err(JalaliError::YearOutOfRange(jy));
    }

    let gy = jy + 621;
    let mut leap_j = -14;
    let mut jp = BREAKS[0];
    let mut jump = 0;
    for &jm in &BREAKS[1..] {
        jump = jm - jp;
        if jy < jm {
            break;
        }
        leap_j += jump / 33 * 8 + (jump % 33) / 4;
        jp = jm;
    }

    let mut n = jy - jp;
    leap_j += n / 33 * 8 + (n % 33 + 3) / 4;
    if jump % 33 == 4 && jump - n == 4 {
        leap_j += 1;
    }

    let leap_g = gy / 4 - (gy / 100 + 1) * 3 / 4 - 150;
    let march = 20 + leap_j - leap_g;

    if jump - n < 6 {
        n = n - jump + (jump + 4) / 33 * 33;
    }
    let mut leap = ((n + 1) % 33 - 1) % 4;
    if leap == -1 {
        leap = 4;
    }

    let march = u8::try_from(march).map_err(|_| JalaliError::YearOutOfRange(jy))?;
    Ok(YearInfo { leap, gregorian_year: gy, march })
}

fn nowruz_day(info: &YearInfo, jy: i32) -> Result<i32, JalaliError> {
    Date::from_calendar_date(info.gregorian_year, Month::March, info.march)
        .map(Date::to_julian_day)
        .map_err(|_| JalaliError::YearOutOfRange(jy))
}

/// Whether `year` has 366 days.
///
/// # Errors
///
/// `YearOutOfRange` outside the supported years.
pub fn is_leap_year(year: i32) -> Result<bool, JalaliError> {
    Ok(year_info(year)?.leap == 0)
}

/// Days in `month` of `year`.
///
/// # Errors
///
/// `YearOutOfRange` outside the supported years.
pub fn month_length(year: i32, month: u8) -> Result<u8, JalaliError> {
    Ok(match month {
        1..=6 => 31,
        7..=11 => 30,
        _ if is_leap_year(year)? => 30,
        _ => 29,
    })
}

/// Convert a Gregorian date to the Jalali calendar.
///
/// # Errors
///
/// `YearOutOfRange` for dates outside the supported years.
pub fn to_jalali(date: Date) -> Result<JalaliDate, JalaliError> {
    let jdn = date.to_julian_day();
    let mut jy = date.year() - 621;
    let info = year_info(jy)?;
    let mut k = jdn - nowruz_day(&info, jy)?;

    if k >= 0 {
        if k <= 185 {
            return date_from_parts(jy, 1 + k / 31, k % 31 + 1);
        }
        k -= 186;
    } else {
        jy -= 1;
        k += 179;
        if info.leap == 1 {
            k += 1;
        }
    }
    date_from_parts(jy, 7 + k / 30, k % 30 + 1)
}

/// Convert a Jalali date to the Gregorian calendar.
///
/// # Errors
///
/// `YearOutOfRange` for unsupported years; `InvalidDate` if the result is not
/// representable.
pub fn to_gregorian(date: JalaliDate) -> Result<Date, JalaliError> {
    let info = year_info(date.year)?;
    let month = i32::from(date.month);
    let jdn = nowruz_day(&info, date.year)? + (month - 1) * 31 - month / 7 * (month - 7) + i32::from(date.day) - 1;
    Date::from_julian_day(jdn).map_err(|_| JalaliError::InvalidDate {
        year: date.year,
        month: date.month,
        day: date.day,
    })
}

/// Parse `YYYY-MM-DD` and convert it.
///
/// # Errors
///
/// `Unparseable` for bad input, otherwise as [`to_jalali`].
pub fn gregorian_str_to_jalali(input: &str) -> Result<JalaliDate, JalaliError> {
    let format = format_description!("[year]-[month]-[day]");
    let date = Date::parse(input.trim(), format).map_err(|_| JalaliError::Unparseable(input.to_owned()))?;
    to_jalali(date)
}

/// Convert and render as `YYYY-MM-DD`, the form the API expects.
///
/// # Errors
///
/// As [`to_gregorian`].
pub fn jalali_to_gregorian_string(date: JalaliDate) -> Result<String, JalaliError> {
    let format = format_description!("[year]-[month]-[day]");
    let gregorian = to_gregorian(date)?;
    gregorian
        .format(format)
        .map_err(|_| JalaliError::InvalidDate { year: date.year, month: date.month, day: date.day })
}

/// Narrow computed month and day into a `JalaliDate`.
fn date_from_parts(year: i32, month: i32, day: i32) -> Result<JalaliDate, JalaliError> {
    match (u8::try_from(month), u8::try_from(day)) {
        (Ok(month), Ok(day)) if (1..=12).contains(&month) && (1..=31).contains(&day) => {
            Ok(JalaliDate { year, month, day })
        }
        _ => Err(JalaliError::InvalidDate {
            year,
            month: u8::try_from(month).unwrap_or(u8::MAX),
            day: u8::try_from(day).unwrap_or(u8::MAX),
        }),
    }
}

#[cfg(test)]
#[path = "jalali_test.rs"]
mod tests;
