use brickbooks_core::{MonthKey, Record};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    pub fn month(key: MonthKey) -> Option<Self> {
        Some(Self::new(key.first_day()?, key.last_day()?))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Sum of `amount` over `records`. Saturates at the `Decimal` bounds rather
/// than overflowing.
pub fn sum_amounts<'a, T, I>(records: I) -> Decimal
where
    T: Record + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .map(Record::amount)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Records dated within `from..=to`. Yields nothing unless both bounds are
/// set; undated records never match.
pub fn filter_by_date_range<T: Record>(
    records: &[T],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<&T> {
    let (Some(from), Some(to)) = (from, to) else {
        return Vec::new();
    };
    let range = DateRange::new(from, to);
    records
        .iter()
        .filter(|record| record.date().is_some_and(|date| range.contains(date)))
        .collect()
}

pub fn filter_by_category<'a, T: Record>(records: &'a [T], category: &str) -> Vec<&'a T> {
    records
        .iter()
        .filter(|record| record.category_label() == category)
        .collect()
}

/// All records when `period` is `None`, otherwise those dated inside it.
pub fn within<T: Record>(records: &[T], period: Option<DateRange>) -> Vec<&T> {
    match period {
        Some(range) => filter_by_date_range(records, Some(range.from), Some(range.to)),
        None => records.iter().collect(),
    }
}
