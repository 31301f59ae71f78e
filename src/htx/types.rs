use rust_decimal::Decimal;
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// HTX sends numbers both as JSON strings and as JSON numbers depending on the
// endpoint version. Anything else becomes None and the listing is dropped later.
fn decimal_lenient<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(match v {
        Some(Value::String(s)) => parse_dec(s.trim()),
        Some(Value::Number(n)) => parse_dec(&n.to_string()),
        _ => None,
    })
}

fn string_lenient<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(match v {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

// One bad element must not sink its page. Elements that are not a listing
// object decode as an empty RawListing and are dropped as malformed.
fn listings_lenient<'de, D>(deserializer: D) -> Result<Vec<RawListing>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(items
        .into_iter()
        .map(|v| serde_json::from_value::<RawListing>(v).unwrap_or_default())
        .collect())
}

fn pay_methods_lenient<'de, D>(deserializer: D) -> Result<Vec<PayMethodRef>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| serde_json::from_value::<PayMethodRef>(v).ok())
            .collect(),
        _ => vec![],
    })
}

fn parse_dec(s: &str) -> Option<Decimal> {
    s.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

/// Response of the trade-market endpoint. A missing or null `data` marks the end of pages.
#[derive(Debug, Deserialize)]
pub struct TradeMarketResponse {
    #[serde(default, deserialize_with = "listings_lenient")]
    pub data: Vec<RawListing>,
}

/// Listing as delivered on the wire; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawListing {
    #[serde(default, deserialize_with = "decimal_lenient")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_lenient")]
    pub trade_count: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_lenient")]
    pub min_trade_limit: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal_lenient")]
    pub max_trade_limit: Option<Decimal>,
    #[serde(default, deserialize_with = "string_lenient")]
    pub user_name: Option<String>,
    #[serde(default, deserialize_with = "string_lenient")]
    pub pay_method: Option<String>,
    #[serde(default, deserialize_with = "pay_methods_lenient")]
    pub pay_methods: Vec<PayMethodRef>,
}

/// Method descriptor embedded in a listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayMethodRef {
    #[serde(default, deserialize_with = "string_lenient")]
    pub pay_method_id: Option<String>,
    #[serde(default, deserialize_with = "string_lenient")]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn decodes_strings_and_numbers() {
        let body = json!({
            "code": 200,
            "data": [
                {
                    "price": "96.55",
                    "tradeCount": 1520.5,
                    "minTradeLimit": "10000",
                    "maxTradeLimit": 150000,
                    "payMethod": "29,69",
                    "payMethods": [{"payMethodId": 29, "name": "Sber"}],
                    "userName": "trader1"
                }
            ]
        });
        let resp: TradeMarketResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.data.len(), 1);
        let l = &resp.data[0];
        assert_eq!(l.price, Some(dec!(96.55)));
        assert_eq!(l.trade_count, Some(dec!(1520.5)));
        assert_eq!(l.min_trade_limit, Some(dec!(10000)));
        assert_eq!(l.max_trade_limit, Some(dec!(150000)));
        assert_eq!(l.pay_method.as_deref(), Some("29,69"));
        assert_eq!(l.pay_methods[0].pay_method_id.as_deref(), Some("29"));
        assert_eq!(l.user_name.as_deref(), Some("trader1"));
    }

    #[test]
    fn missing_or_null_data_is_empty_page() {
        let resp: TradeMarketResponse = serde_json::from_value(json!({"code": 200})).unwrap();
        assert!(resp.data.is_empty());
        let resp: TradeMarketResponse =
            serde_json::from_value(json!({"code": 200, "data": null})).unwrap();
        assert!(resp.data.is_empty());
    }

    #[test]
    fn bad_elements_do_not_sink_the_page() {
        let body = json!({
            "data": [
                {"price": "95", "tradeCount": "10", "minTradeLimit": "10000", "maxTradeLimit": "50000", "payMethod": "29"},
                null,
                "garbage",
                {"price": "96", "tradeCount": "10", "minTradeLimit": "10000", "maxTradeLimit": "50000", "payMethods": "29"},
                {"price": "97", "tradeCount": "10", "minTradeLimit": "10000", "maxTradeLimit": "50000",
                 "payMethods": [{"payMethodId": "28"}, "oops"]}
            ]
        });
        let resp: TradeMarketResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.data.len(), 5);
        assert_eq!(resp.data[0].price, Some(dec!(95)));
        assert!(resp.data[1].price.is_none());
        assert!(resp.data[2].price.is_none());
        assert_eq!(resp.data[3].price, Some(dec!(96)));
        assert!(resp.data[3].pay_methods.is_empty());
        assert_eq!(resp.data[4].pay_methods.len(), 1);
        assert_eq!(resp.data[4].pay_methods[0].pay_method_id.as_deref(), Some("28"));
    }

    #[test]
    fn garbage_numbers_become_none() {
        let l: RawListing = serde_json::from_value(json!({
            "price": "n/a",
            "minTradeLimit": true,
            "payMethods": null
        }))
        .unwrap();
        assert_eq!(l.price, None);
        assert_eq!(l.min_trade_limit, None);
        assert_eq!(l.trade_count, None);
        assert!(l.pay_methods.is_empty());
    }
}
