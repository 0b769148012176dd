pub mod cloudflare;

use serde::{Deserialize, Serialize};

/// TTL written on every create and update.
pub const RECORD_TTL: u32 = 120;

pub const RECORD_TYPE_A: &str = "A";

/// A record as the provider returns it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DnsRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub content: String,
    #[serde(default)]
    pub proxied: bool,
}

/// Request body for create and update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordPayload {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    pub proxied: bool,
}

impl RecordPayload {
    pub fn a_record(name: &str, content: &str, proxied: bool) -> Self {
        Self {
            record_type: RECORD_TYPE_A.to_string(),
            name: name.to_string(),
            content: content.to_string(),
            ttl: RECORD_TTL,
            proxied,
        }
    }

    /// Keeps the name and type of `record`, swaps in the new content.
    pub fn replacing(record: &DnsRecord, content: &str, proxied: bool) -> Self {
        Self {
            record_type: record.record_type.clone(),
            name: record.name.clone(),
            content: content.to_string(),
            ttl: RECORD_TTL,
            proxied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_record() -> DnsRecord {
        DnsRecord {
            id: "rec1".to_string(),
            name: "home.example.com".to_string(),
            record_type: "A".to_string(),
            content: "1.1.1.1".to_string(),
            proxied: true,
        }
    }

    #[test]
    fn test_a_record_payload() {
        let payload = RecordPayload::a_record("example.com", "1.2.3.4", true);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "type": "A",
                "name": "example.com",
                "content": "1.2.3.4",
                "ttl": 120,
                "proxied": true
            })
        );
    }

    #[test]
    fn test_replacing_keeps_name_and_type() {
        let record = sample_record();
        let payload = RecordPayload::replacing(&record, "9.9.9.9", false);
        assert_eq!(payload.name, "home.example.com");
        assert_eq!(payload.record_type, "A");
        assert_eq!(payload.content, "9.9.9.9");
        assert_eq!(payload.ttl, RECORD_TTL);
        assert!(!payload.proxied);
    }

    #[test]
    fn test_record_deserialization_defaults() {
        let record: DnsRecord = serde_json::from_value(json!({
            "id": "abc",
            "name": "example.com",
            "type": "A",
            "content": "1.2.3.4",
            "ttl": 1,
            "zone_id": "ignored"
        }))
        .unwrap();
        assert_eq!(record.record_type, "A");
        assert!(!record.proxied);
    }
}
