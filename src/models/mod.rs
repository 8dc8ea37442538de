pub mod month;
pub mod query;
pub mod report;
pub mod transaction;

pub use month::MonthFilter;
pub use query::{price_text, PageRequest, TransactionFilter};
pub use report::{
    price_bucket, price_range_label, CategoryCount, CombinedData, DashboardData,
    PriceRangeCount, Statistics, PRICE_BUCKET_COUNT, PRICE_BUCKET_WIDTH,
};
pub use transaction::{parse_sale_date, NewTransaction, Transaction};
