use chrono::Local;

use crate::model::date_key::DateKey;

/// Where a day sits relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayClass {
    Past,
    Today,
    Future,
}

/// Today's local calendar date
pub fn today() -> DateKey {
    DateKey::from_date(Local::now().date_naive())
}

pub fn is_past(date: &DateKey) -> bool {
    is_past_on(date, &today())
}

pub fn is_future(date: &DateKey) -> bool {
    is_future_on(date, &today())
}

/// Strictly before `today`; time of day plays no part
pub fn is_past_on(date: &DateKey, today: &DateKey) -> bool {
    date < today
}

/// Strictly after `today`
pub fn is_future_on(date: &DateKey, today: &DateKey) -> bool {
    date > today
}

pub fn relative_day(date: &DateKey, today: &DateKey) -> DayClass {
    if is_past_on(date, today) {
        DayClass::Past
    } else if is_future_on(date, today) {
        DayClass::Future
    } else {
        DayClass::Today
    }
}

/// Long header form, e.g. `Monday, January 15, 2025`
pub fn display_format(date: &DateKey) -> String {
    date.date().format("%A, %B %-d, %Y").to_string()
}
