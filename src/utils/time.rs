use chrono::{NaiveDate, Utc};

/// `YYYY-MM-DD` of the current UTC date.
pub fn date_stamp() -> String {
    format_date(Utc::now().date_naive())
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_date(date), "2024-03-07");
        assert_eq!(date_stamp().len(), 10);
    }
}
