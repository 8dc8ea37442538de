use crate::error::AppError;
use chrono::{DateTime, Datelike, Month, Utc};
use std::fmt;

/// 月份过滤条件: 匹配任意年份中的同一自然月 (按 UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthFilter(Month);

impl MonthFilter {
    pub const fn new(month: Month) -> Self {
        Self(month)
    }

    /// 解析月份名称, 支持英文全称与三字母缩写, 不区分大小写
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        raw.trim()
            .parse::<Month>()
            .map(Self)
            .map_err(|_| AppError::InvalidMonth(raw.to_string()))
    }

    /// 1-12
    pub fn number(self) -> u32 {
        self.0.number_from_month()
    }

    pub fn name(self) -> &'static str {
        self.0.name()
    }

    pub fn matches(self, date: &DateTime<Utc>) -> bool {
        date.month() == self.number()
    }

    /// 一至十二月
    pub fn all() -> impl Iterator<Item = Self> {
        (1u8..=12).filter_map(|n| Month::try_from(n).ok().map(Self))
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_sale_date;

    #[test]
    fn parses_full_names_and_abbreviations() {
        assert_eq!(MonthFilter::parse("March").unwrap().number(), 3);
        assert_eq!(MonthFilter::parse("march").unwrap().number(), 3);
        assert_eq!(MonthFilter::parse(" Dec ").unwrap().number(), 12);
        assert_eq!(MonthFilter::parse("JANUARY").unwrap().number(), 1);
    }

    #[test]
    fn rejects_unknown_names() {
        for raw in ["Smarch", "", "13", "Marc"] {
            match MonthFilter::parse(raw) {
                Err(AppError::InvalidMonth(value)) => assert_eq!(value, raw),
                other => panic!("expected InvalidMonth for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn matches_month_of_any_year() {
        let march = MonthFilter::parse("March").unwrap();
        assert!(march.matches(&parse_sale_date("2021-03-05").unwrap()));
        assert!(march.matches(&parse_sale_date("1999-03-31T23:59:59Z").unwrap()));
        assert!(!march.matches(&parse_sale_date("2021-04-01").unwrap()));
        // 按 UTC 判定月份: 当地 4 月 1 日凌晨即 UTC 3 月 31 日
        assert!(march.matches(&parse_sale_date("2021-04-01T02:00:00+05:30").unwrap()));
    }

    #[test]
    fn all_lists_twelve_months_in_order() {
        let names: Vec<_> = MonthFilter::all().map(MonthFilter::name).collect();
        assert_eq!(names.len(), 12);
        assert_eq!(names[0], "January");
        assert_eq!(names[11], "December");
    }
}
