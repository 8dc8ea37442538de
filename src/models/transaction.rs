use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// 商品交易记录 (product_transactions)
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub date_of_sale: DateTime<Utc>,
    pub category: String,
    pub sold: Option<bool>, // 缺失时为 null, 不计入已售/未售
}

/// 待插入记录 (种子数据格式, 额外字段如 id/image 忽略)
///
/// `price` 与 `dateOfSale` 必填: 缺任一字段的记录解码失败, 整批种子数据不入库
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(deserialize_with = "deserialize_sale_date")]
    pub date_of_sale: DateTime<Utc>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sold: Option<bool>,
}

impl NewTransaction {
    /// 分配 id 后转换为存储记录
    pub fn with_id(&self, id: i64) -> Transaction {
        Transaction {
            id,
            title: self.title.clone(),
            description: self.description.clone(),
            price: self.price,
            date_of_sale: self.date_of_sale,
            category: self.category.clone(),
            sold: self.sold,
        }
    }
}

/// 解析销售日期
/// 支持 RFC 3339、无时区的日期时间 (按 UTC)、纯日期 (UTC 零点)
pub fn parse_sale_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn deserialize_sale_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_sale_date(&raw)
        .ok_or_else(|| de::Error::custom(format!("unrecognised dateOfSale: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_offset_date_times_into_utc() {
        let dt = parse_sale_date("2021-11-27T20:29:54+05:30").unwrap();
        assert_eq!((dt.month(), dt.day(), dt.hour(), dt.minute()), (11, 27, 14, 59));
    }

    #[test]
    fn parses_plain_dates_at_midnight() {
        let dt = parse_sale_date("2021-03-05").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day(), dt.hour()), (2021, 3, 5, 0));
        assert!(parse_sale_date("2021-03-10T08:00:00").is_some());
        assert!(parse_sale_date("March 5th").is_none());
    }

    #[test]
    fn seed_records_ignore_extra_fields() {
        let json = r#"{
            "id": 1,
            "title": "Fjallraven Backpack",
            "price": 329.85,
            "description": "Your perfect pack",
            "category": "men's clothing",
            "image": "https://example.invalid/img.jpg",
            "sold": false,
            "dateOfSale": "2021-11-27T20:29:54+05:30"
        }"#;
        let record: NewTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(record.title, "Fjallraven Backpack");
        assert_eq!(record.price, 329.85);
        assert_eq!(record.sold, Some(false));
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let record: NewTransaction =
            serde_json::from_str(r#"{"title":"A","price":50,"dateOfSale":"2021-03-05"}"#).unwrap();
        assert_eq!(record.description, "");
        assert_eq!(record.category, "");
        assert_eq!(record.sold, None);
    }

    #[test]
    fn serializes_with_mongo_style_id() {
        let record: NewTransaction =
            serde_json::from_str(r#"{"title":"A","price":50,"dateOfSale":"2021-03-05","sold":true}"#).unwrap();
        let value = serde_json::to_value(record.with_id(7)).unwrap();
        assert_eq!(value["_id"], 7);
        assert_eq!(value["dateOfSale"], "2021-03-05T00:00:00Z");
        assert_eq!(value["sold"], true);
    }
}
