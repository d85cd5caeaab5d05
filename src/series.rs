//! Derived series: daily deltas, the trailing seven-day mean, and date-range
//! slicing that keeps each series aligned with the full report-date index.

use crate::errors::DataError;
use chrono::NaiveDate;

pub const AVERAGE_WINDOW: usize = 7;

/// Daily value `i` is labelled with report date `i`.
pub const DAILY_OFFSET: usize = 0;

/// Averaged value `i` covers daily values `i..=i + 6` and is labelled with the
/// report date that closes that window.
pub const AVERAGED_OFFSET: usize = AVERAGE_WINDOW;

/// First differences: `daily[i] = cumulative[i + 1] - cumulative[i]`.
/// Negative values (source corrections) are kept.
pub fn daily_deltas(cumulative: &[i64]) -> Vec<i64> {
    cumulative
        .windows(2)
        .map(|pair| pair[1].saturating_sub(pair[0]))
        .collect()
}

/// Trailing mean over windows of [`AVERAGE_WINDOW`] days, truncated toward
/// zero. Shorter input yields an empty series.
pub fn seven_day_average(daily: &[i64]) -> Vec<i64> {
    daily
        .windows(AVERAGE_WINDOW)
        .map(|window| window.iter().sum::<i64>() / AVERAGE_WINDOW as i64)
        .collect()
}

/// A derived series paired with its own date labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedSeries {
    offset: usize,
    dates: Vec<NaiveDate>,
    values: Vec<i64>,
}

impl AlignedSeries {
    pub fn daily(index: &[NaiveDate], cumulative: &[i64]) -> Self {
        Self::aligned(index, DAILY_OFFSET, daily_deltas(cumulative))
    }

    pub fn averaged(index: &[NaiveDate], cumulative: &[i64]) -> Self {
        let daily = daily_deltas(cumulative);
        Self::aligned(index, AVERAGED_OFFSET, seven_day_average(&daily))
    }

    fn aligned(index: &[NaiveDate], offset: usize, values: Vec<i64>) -> Self {
        let dates = index
            .iter()
            .skip(offset)
            .take(values.len())
            .copied()
            .collect::<Vec<_>>();
        debug_assert_eq!(dates.len(), values.len());
        Self {
            offset,
            dates,
            values,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Position of `date` in this series, found via the full report-date
    /// index and shifted back by the series offset.
    pub fn position(&self, index: &[NaiveDate], date: NaiveDate) -> Result<usize, DataError> {
        let raw = index
            .iter()
            .position(|candidate| *candidate == date)
            .ok_or(DataError::DateNotFound(date))?;
        raw.checked_sub(self.offset)
            .filter(|pos| *pos < self.values.len())
            .ok_or(DataError::DateNotFound(date))
    }

    /// Inclusive slice between two report dates.
    pub fn slice(
        &self,
        index: &[NaiveDate],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(NaiveDate, i64)>, DataError> {
        if start > end {
            return Err(DataError::InvalidRange { start, end });
        }
        let from = self.position(index, start)?;
        let to = self.position(index, end)?;
        Ok(self.dates[from..=to]
            .iter()
            .copied()
            .zip(self.values[from..=to].iter().copied())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(len: usize) -> Vec<NaiveDate> {
        let first = NaiveDate::from_ymd_opt(2020, 1, 22).unwrap();
        first.iter_days().take(len).collect()
    }

    const CUMULATIVE: [i64; 8] = [0, 1, 3, 6, 10, 15, 21, 28];

    #[test]
    fn worked_example() {
        let daily = daily_deltas(&CUMULATIVE);
        assert_eq!(daily, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(seven_day_average(&daily), vec![4]);
    }

    #[test]
    fn deltas_sum_back_to_cumulative_change() {
        let cumulative = [3, 3, 9, 7, 20, 21, 40];
        let daily = daily_deltas(&cumulative);
        assert_eq!(daily.len(), cumulative.len() - 1);
        for from in 0..cumulative.len() {
            for to in from..cumulative.len() {
                let sum: i64 = daily[from..to].iter().sum();
                assert_eq!(sum, cumulative[to] - cumulative[from]);
            }
        }
        // corrections are not clamped
        assert_eq!(daily[2], -2);
    }

    #[test]
    fn average_length_and_first_value() {
        let daily = [10, 0, 3, 8, 1, 1, 4, 30, 2];
        let avg = seven_day_average(&daily);
        assert_eq!(avg.len(), daily.len() - 6);
        assert_eq!(avg[0], 27 / 7);
        assert_eq!(avg[1], 47 / 7);
    }

    #[test]
    fn average_truncates_toward_zero() {
        assert_eq!(seven_day_average(&[-1, -1, -1, -1, -1, -1, -4]), vec![-1]);
    }

    #[test]
    fn short_input_gives_empty_average() {
        assert!(seven_day_average(&[1, 2, 3, 4, 5, 6]).is_empty());
        assert!(daily_deltas(&[]).is_empty());
        assert!(daily_deltas(&[5]).is_empty());
    }

    #[test]
    fn averaged_series_starts_seven_dates_after_index() {
        let dates = index(20);
        let cumulative: Vec<i64> = (0..20).map(|i| i * i).collect();
        let daily = AlignedSeries::daily(&dates, &cumulative);
        let averaged = AlignedSeries::averaged(&dates, &cumulative);

        assert_eq!(daily.offset(), 0);
        assert_eq!(daily.len(), 19);
        assert_eq!(daily.dates(), &dates[..19]);

        assert_eq!(averaged.offset(), AVERAGED_OFFSET);
        assert_eq!(averaged.len(), daily.len() - 6);
        assert_eq!(averaged.first_date(), Some(dates[7]));
        assert_eq!(averaged.last_date(), dates.last().copied());
        assert_eq!(averaged.dates(), &dates[AVERAGED_OFFSET..]);
    }

    #[test]
    fn averaged_value_is_labelled_with_window_end() {
        let dates = index(CUMULATIVE.len());
        let averaged = AlignedSeries::averaged(&dates, &CUMULATIVE);
        assert_eq!(averaged.values(), &[4]);
        assert_eq!(averaged.dates(), &[dates[7]]);
        assert_eq!(averaged.position(&dates, dates[7]).unwrap(), 0);
    }

    #[test]
    fn slice_with_equal_bounds_has_one_row() {
        let dates = index(CUMULATIVE.len());
        let daily = AlignedSeries::daily(&dates, &CUMULATIVE);
        let rows = daily.slice(&dates, dates[3], dates[3]).unwrap();
        assert_eq!(rows, vec![(dates[3], 4)]);
    }

    #[test]
    fn slice_is_inclusive_on_both_ends() {
        let dates = index(30);
        let cumulative: Vec<i64> = (0..30).map(|i| i * 2).collect();
        let averaged = AlignedSeries::averaged(&dates, &cumulative);
        let rows = averaged.slice(&dates, dates[10], dates[15]).unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows.first().unwrap().0, dates[10]);
        assert_eq!(rows.last().unwrap().0, dates[15]);
        assert!(rows.iter().all(|(_, value)| *value == 2));
    }

    #[test]
    fn averaged_lookup_before_offset_fails() {
        let dates = index(20);
        let cumulative: Vec<i64> = (0..20).collect();
        let averaged = AlignedSeries::averaged(&dates, &cumulative);
        let err = averaged.slice(&dates, dates[6], dates[12]).unwrap_err();
        assert!(matches!(err, DataError::DateNotFound(date) if date == dates[6]));
        assert!(averaged.slice(&dates, dates[7], dates[12]).is_ok());
    }

    #[test]
    fn dates_outside_index_fail() {
        let dates = index(10);
        let daily = AlignedSeries::daily(&dates, &[0; 10]);
        let before = NaiveDate::from_ymd_opt(2019, 12, 31).unwrap();
        assert!(matches!(
            daily.slice(&dates, before, dates[3]),
            Err(DataError::DateNotFound(date)) if date == before
        ));
        // the last report date has no following day to difference against
        assert!(matches!(
            daily.slice(&dates, dates[0], dates[9]),
            Err(DataError::DateNotFound(_))
        ));
    }

    #[test]
    fn reversed_bounds_fail() {
        let dates = index(10);
        let daily = AlignedSeries::daily(&dates, &[0; 10]);
        assert!(matches!(
            daily.slice(&dates, dates[5], dates[2]),
            Err(DataError::InvalidRange { .. })
        ));
    }
}
