
use crate::config::Config;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ZONE_ID: &str = "zone123";
pub const RECORD_NAME: &str = "vpn.example.com";
pub const RECORD_ID: &str = "record123";
pub const PASSWORD: &str = "hunter2";
pub const MAIN_IP: &str = "1.2.3.4";
pub const BACKUP_IP: &str = "5.6.7.8";

pub fn test_config(base_url: &str) -> Config {
    Config {
        api_token: "test_token".to_string(),
        zone_id: ZONE_ID.to_string(),
        record_type: "A".to_string(),
        record_name: RECORD_NAME.to_string(),
        record_ttl: 120,
        main_line_ip: Some(MAIN_IP.to_string()),
        backup_line_ip: Some(BACKUP_IP.to_string()),
        password: PASSWORD.to_string(),
        port: 0,
        api_base_url: base_url.to_string(),
    }
}

pub fn record(id: &str, name: &str, record_type: &str, content: &str) -> Value {
    json!({
        "id": id,
        "zone_id": ZONE_ID,
        "name": name,
        "type": record_type,
        "content": content,
        "proxied": false,
        "ttl": 120,
    })
}

pub fn envelope(result: Value) -> Value {
    json!({
        "success": true,
        "errors": [],
        "messages": [],
        "result": result,
    })
}

pub fn failure_envelope(code: u32, message: &str) -> Value {
    json!({
        "success": false,
        "errors": [{ "code": code, "message": message }],
        "messages": [],
        "result": null,
    })
}

pub fn records_path() -> String {
    format!("/zones/{}/dns_records", ZONE_ID)
}

pub fn record_path() -> String {
    format!("/zones/{}/dns_records/{}", ZONE_ID, RECORD_ID)
}

/// Serves a zone listing holding the managed record with `content`.
pub async fn mount_listing(server: &MockServer, content: &str, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(records_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            record("aaaa-record", RECORD_NAME, "AAAA", "::1"),
            record(RECORD_ID, RECORD_NAME, "A", content),
        ]))))
        .expect(expected_calls)
        .mount(server)
        .await;
}

pub async fn mount_empty_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(records_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .mount(server)
        .await;
}
