//! Request construction for the two PhoneID call shapes.
//!
//! - Standard: `POST {base}/v1/phoneid/{phone}` with
//!   `{"addons": {name: {}}, "ucid": ...}`
//! - Live: `GET {base}/v1/phoneid/live/{phone}?ucid=...`

use reqwest::Method;
use serde_json::{json, Map, Value};

use crate::transport::TransportRequest;
use crate::types::{Product, RequestConfig};

/// Build the HTTP call for `phone` according to the configured product.
pub fn build_request(config: &RequestConfig, phone: &str) -> TransportRequest {
    let url = config.endpoint_url(phone);
    match config.product {
        Product::Standard => TransportRequest {
            method: Method::POST,
            url,
            body: Some(standard_body(&config.addons, config.ucid.as_deref())),
            query: Vec::new(),
            timeout: config.timeout,
        },
        Product::Live => TransportRequest {
            method: Method::GET,
            url,
            body: None,
            query: live_query(config.ucid.as_deref()),
            timeout: config.timeout,
        },
    }
}

/// JSON body for a standard call.
pub fn standard_body(addons: &[String], ucid: Option<&str>) -> Value {
    let addons: Map<String, Value> = addons
        .iter()
        .map(|name| (name.clone(), json!({})))
        .collect();

    let mut body = Map::new();
    body.insert("addons".to_string(), Value::Object(addons));
    if let Some(ucid) = ucid.filter(|u| !u.is_empty()) {
        body.insert("ucid".to_string(), Value::String(ucid.to_string()));
    }
    Value::Object(body)
}

/// Query parameters for a live call.
pub fn live_query(ucid: Option<&str>) -> Vec<(String, String)> {
    ucid.filter(|u| !u.is_empty())
        .map(|u| vec![("ucid".to_string(), u.to_string())])
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_standard_request() {
        let config = RequestConfig::default()
            .with_base_url("https://api.example.com/")
            .with_ucid(Some("BACF"))
            .with_timeout(Duration::from_secs(3));

        let request = build_request(&config, "15551234567");
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "https://api.example.com/v1/phoneid/15551234567");
        assert_eq!(request.timeout, Duration::from_secs(3));
        assert!(request.query.is_empty());
        assert_eq!(
            request.body,
            Some(json!({
                "addons": {"contact": {}, "number_deactivation": {}, "porting_history": {}},
                "ucid": "BACF"
            }))
        );
    }

    #[test]
    fn test_standard_body_without_ucid() {
        assert_eq!(standard_body(&[], None), json!({"addons": {}}));
        assert_eq!(standard_body(&[], Some("")), json!({"addons": {}}));
    }

    #[test]
    fn test_live_request() {
        let config = RequestConfig::default()
            .with_base_url("https://api.example.com")
            .with_product(Product::Live)
            .with_ucid(Some("BACF"));

        let request = build_request(&config, "15551234567");
        assert_eq!(request.method, Method::GET);
        assert_eq!(
            request.url,
            "https://api.example.com/v1/phoneid/live/15551234567"
        );
        assert_eq!(request.body, None);
        assert_eq!(
            request.query,
            vec![("ucid".to_string(), "BACF".to_string())]
        );
    }

    #[test]
    fn test_live_query_without_ucid() {
        assert!(live_query(None).is_empty());
    }
}
