use rand::Rng;

use super::parse::ROOT_ID;
use super::record::{ResourceKind, ResourceRecord};
use crate::util::host_of;

const MAIN_CSS_ID: &str = "style-main";
const MAIN_JS_ID: &str = "app-main";
const CHUNK_COUNT: usize = 8;
const IMAGE_COUNT: usize = 15;

fn mock_compression(rng: &mut impl Rng, kind: ResourceKind) -> String {
    if kind == ResourceKind::Image {
        return "Uncompressed".to_owned();
    }

    let roll = rng.random::<f64>();
    if roll > 0.6 {
        "Compressed (~65% saved)".to_owned()
    } else if roll > 0.3 {
        "Compressed (~40% saved)".to_owned()
    } else {
        "Uncompressed".to_owned()
    }
}

/// Synthetic page: a document, one stylesheet, a main bundle that pulls in
/// lazy chunks, and a gallery of heavy images.
pub fn generate_mock_resources(url: &str, rng: &mut impl Rng) -> Vec<ResourceRecord> {
    let clean_url = url.trim().trim_end_matches('/');
    let domain = host_of(clean_url);
    let scheme = if clean_url.contains("https") {
        "https"
    } else {
        "http"
    };
    let base_url = format!("{scheme}://{domain}");

    let mut resources = Vec::with_capacity(3 + CHUNK_COUNT + IMAGE_COUNT);

    resources.push(ResourceRecord {
        id: ROOT_ID.to_owned(),
        url: clean_url.to_owned(),
        category: ResourceKind::Html,
        byte_size: (rng.random::<f64>() * 40.0 * 1024.0 + 10_000.0) as u64,
        transfer_size: Some(8_000),
        initiator_ref: None,
        protocol_label: "h3".to_owned(),
        compression_label: "Compressed (~70% saved)".to_owned(),
    });

    resources.push(ResourceRecord {
        id: MAIN_CSS_ID.to_owned(),
        url: format!("{base_url}/assets/css/style.min.css"),
        category: ResourceKind::Css,
        byte_size: 45 * 1024,
        transfer_size: Some(12_000),
        initiator_ref: Some(ROOT_ID.to_owned()),
        protocol_label: "h2".to_owned(),
        compression_label: "Compressed (~73% saved)".to_owned(),
    });

    resources.push(ResourceRecord {
        id: MAIN_JS_ID.to_owned(),
        url: format!("{base_url}/assets/js/app.bundle.js"),
        category: ResourceKind::Js,
        byte_size: 150 * 1024,
        transfer_size: Some(45_000),
        initiator_ref: Some(ROOT_ID.to_owned()),
        protocol_label: "h2".to_owned(),
        compression_label: "Compressed (~60% saved)".to_owned(),
    });

    for index in 0..CHUNK_COUNT {
        let compression_label = mock_compression(rng, ResourceKind::Js);
        resources.push(ResourceRecord {
            id: format!("chunk-{index}"),
            url: format!("{base_url}/assets/js/chunk-{index}.js"),
            category: ResourceKind::Js,
            byte_size: (rng.random::<f64>() * 100.0 * 1024.0 + 5_000.0) as u64,
            transfer_size: None,
            initiator_ref: Some(MAIN_JS_ID.to_owned()),
            protocol_label: "h2".to_owned(),
            compression_label,
        });
    }

    for index in 0..IMAGE_COUNT {
        let compression_label = mock_compression(rng, ResourceKind::Image);
        resources.push(ResourceRecord {
            id: format!("img-{index}"),
            url: format!("{base_url}/uploads/images/pic-{index}.jpg"),
            category: ResourceKind::Image,
            byte_size: (rng.random::<f64>() * 2000.0 * 1024.0 + 20.0 * 1024.0) as u64,
            transfer_size: None,
            initiator_ref: Some(ROOT_ID.to_owned()),
            protocol_label: "h2".to_owned(),
            compression_label,
        });
    }

    resources
}
