//! Price history access port trait.

use crate::domain::error::BuffetError;
use crate::domain::price::PriceRow;
use chrono::NaiveDate;

pub trait PriceHistoryPort {
    /// Daily closes for `symbol` between `start_date` and `end_date`
    /// inclusive, sorted by date.
    fn fetch_history(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceRow>, BuffetError>;
}
