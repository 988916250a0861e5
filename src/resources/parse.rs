use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use super::record::{ResourceKind, ResourceRecord, size_from_value};

pub(super) const ROOT_ID: &str = "root";

pub(super) fn parse_dataset_json(raw: &str) -> Result<Vec<ResourceRecord>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid dataset JSON")?;
    let items = match &parsed {
        Value::Array(_) => parsed,
        Value::Object(object) => object
            .get("resources")
            .cloned()
            .ok_or_else(|| anyhow!("dataset object has no \"resources\" array"))?,
        _ => return Err(anyhow!("unexpected JSON type for dataset")),
    };

    serde_json::from_value(items).context("invalid resource record in dataset")
}

fn kind_from_resource_type(resource_type: Option<&str>) -> ResourceKind {
    let Some(resource_type) = resource_type else {
        return ResourceKind::Other;
    };

    match resource_type.to_ascii_lowercase().as_str() {
        "document" => ResourceKind::Html,
        "stylesheet" => ResourceKind::Css,
        "script" => ResourceKind::Js,
        "image" | "media" => ResourceKind::Image,
        "font" => ResourceKind::Font,
        _ => ResourceKind::Other,
    }
}

pub(super) fn compression_label(resource_size: u64, transfer_size: u64) -> String {
    if transfer_size == 0 {
        return "Cache / Service Worker".to_owned();
    }

    if resource_size > 0 && (transfer_size as f64) < (resource_size as f64) * 0.95 {
        let savings = ((1.0 - (transfer_size as f64 / resource_size as f64)) * 100.0).round();
        return format!("Compressed (~{savings}% saved)");
    }

    if resource_size > 0 && transfer_size >= resource_size {
        return "Uncompressed".to_owned();
    }

    "Unknown".to_owned()
}

/// Extracts the network request list from a saved PageSpeed Insights
/// response or a bare Lighthouse report.
pub(super) fn parse_lighthouse_report(raw: &str) -> Result<Vec<ResourceRecord>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid report JSON")?;
    let object = parsed
        .as_object()
        .ok_or_else(|| anyhow!("unexpected JSON type for report"))?;

    let audits = object
        .get("lighthouseResult")
        .and_then(|result| result.get("audits"))
        .or_else(|| object.get("audits"));
    let Some(audits) = audits else {
        tracing::warn!("report has no audits section");
        return Ok(Vec::new());
    };

    let Some(items) = audits
        .get("network-requests")
        .and_then(|audit| audit.get("details"))
        .and_then(|details| details.get("items"))
        .and_then(Value::as_array)
    else {
        tracing::warn!("report has no network-requests items");
        return Ok(Vec::new());
    };

    let records = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let is_root = index == 0;
            let url = item
                .get("url")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned();
            let resource_size = item.get("resourceSize").and_then(size_from_value).unwrap_or(0);
            let transfer_size = item.get("transferSize").and_then(size_from_value).unwrap_or(0);
            let protocol_label = item
                .get("protocol")
                .and_then(Value::as_str)
                .filter(|protocol| !protocol.is_empty())
                .unwrap_or("http/1.1")
                .to_owned();

            ResourceRecord {
                id: if is_root {
                    ROOT_ID.to_owned()
                } else {
                    format!("{url}-{index}")
                },
                category: kind_from_resource_type(
                    item.get("resourceType").and_then(Value::as_str),
                ),
                byte_size: resource_size,
                transfer_size: Some(transfer_size),
                initiator_ref: (!is_root).then(|| ROOT_ID.to_owned()),
                protocol_label,
                compression_label: compression_label(resource_size, transfer_size),
                url,
            }
        })
        .collect();

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compression_labels_follow_transfer_ratio() {
        assert_eq!(compression_label(1000, 0), "Cache / Service Worker");
        assert_eq!(compression_label(1000, 300), "Compressed (~70% saved)");
        assert_eq!(compression_label(1000, 1000), "Uncompressed");
        assert_eq!(compression_label(1000, 960), "Unknown");
        assert_eq!(compression_label(0, 50), "Unknown");
    }

    #[test]
    fn pagespeed_response_maps_network_requests() {
        let raw = r#"{
            "lighthouseResult": {
                "audits": {
                    "network-requests": {
                        "details": {
                            "items": [
                                {"url": "https://shop.test/", "resourceType": "Document",
                                 "resourceSize": 40000, "transferSize": 9000, "protocol": "h2"},
                                {"url": "https://shop.test/app.js", "resourceType": "Script",
                                 "resourceSize": 2000, "transferSize": 2000},
                                {"url": "https://shop.test/clip.mp4", "resourceType": "Media"}
                            ]
                        }
                    }
                }
            }
        }"#;

        let records = parse_lighthouse_report(raw).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].id, ROOT_ID);
        assert_eq!(records[0].category, ResourceKind::Html);
        assert_eq!(records[0].initiator_ref, None);
        assert_eq!(records[0].protocol_label, "h2");

        assert_eq!(records[1].id, "https://shop.test/app.js-1");
        assert_eq!(records[1].category, ResourceKind::Js);
        assert_eq!(records[1].initiator_ref.as_deref(), Some(ROOT_ID));
        assert_eq!(records[1].protocol_label, "http/1.1");
        assert_eq!(records[1].compression_label, "Uncompressed");

        assert_eq!(records[2].category, ResourceKind::Image);
        assert_eq!(records[2].byte_size, 0);
        assert_eq!(records[2].compression_label, "Cache / Service Worker");
    }

    #[test]
    fn bare_report_without_network_items_is_empty() {
        let raw = r#"{"audits": {"first-contentful-paint": {}}}"#;
        assert!(parse_lighthouse_report(raw).unwrap().is_empty());
        assert!(parse_lighthouse_report(r#"{"categories": {}}"#).unwrap().is_empty());
        assert!(parse_lighthouse_report("[1, 2]").is_err());
    }

    #[test]
    fn dataset_accepts_array_or_wrapped_object() {
        let array = r#"[{"id": "root", "category": "html", "byteSize": 10}]"#;
        let wrapped = r#"{"resources": [{"id": "root", "category": "html"}]}"#;

        assert_eq!(parse_dataset_json(array).unwrap().len(), 1);
        assert_eq!(parse_dataset_json(wrapped).unwrap()[0].id, "root");
        assert!(parse_dataset_json(r#"{"items": []}"#).is_err());
    }
}
