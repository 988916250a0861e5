use std::collections::HashSet;

use anyhow::{Result, bail};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Html,
    Css,
    Js,
    Image,
    Font,
    Other,
}

impl ResourceKind {
    pub const ALL: [Self; 6] = [
        Self::Html,
        Self::Css,
        Self::Js,
        Self::Image,
        Self::Font,
        Self::Other,
    ];

    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "html" => Self::Html,
            "css" => Self::Css,
            "js" | "javascript" => Self::Js,
            "image" => Self::Image,
            "font" => Self::Font,
            _ => Self::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::Css => "CSS",
            Self::Js => "JavaScript",
            Self::Image => "Images",
            Self::Font => "Fonts",
            Self::Other => "Other",
        }
    }

    /// Short tag drawn inside graph nodes.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::Css => "CSS",
            Self::Js => "JS",
            Self::Image => "IMAGE",
            Self::Font => "FONT",
            Self::Other => "OTHER",
        }
    }
}

impl<'de> Deserialize<'de> for ResourceKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().map(Self::from_label).unwrap_or(Self::Other))
    }
}

/// One fetched resource as handed over by a data source.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_kind")]
    pub category: ResourceKind,
    #[serde(default, deserialize_with = "lenient_size")]
    pub byte_size: u64,
    #[serde(default, deserialize_with = "lenient_optional_size")]
    pub transfer_size: Option<u64>,
    #[serde(default)]
    pub initiator_ref: Option<String>,
    #[serde(default)]
    pub protocol_label: String,
    #[serde(default)]
    pub compression_label: String,
}

fn default_kind() -> ResourceKind {
    ResourceKind::Other
}

pub(super) fn size_from_value(value: &Value) -> Option<u64> {
    let number = value.as_f64()?;
    if !number.is_finite() || number < 0.0 {
        return None;
    }
    Some(number.round() as u64)
}

fn lenient_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(size_from_value(&value).unwrap_or(0))
}

fn lenient_optional_size<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(size_from_value(&value))
}

#[derive(Clone, Debug)]
pub struct CategoryStats {
    pub kind: ResourceKind,
    pub count: usize,
    pub size: u64,
    pub percentage: f32,
}

/// An ordered resource set; the first record is the root document.
#[derive(Clone, Debug)]
pub struct Dataset {
    pub source_label: String,
    pub records: Vec<ResourceRecord>,
}

impl Dataset {
    pub fn new(source_label: impl Into<String>, records: Vec<ResourceRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                bail!("duplicate resource id {:?}", record.id);
            }
        }

        Ok(Self {
            source_label: source_label.into(),
            records,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of resource sizes, saturating at `u64::MAX`.
    pub fn total_size(&self) -> u64 {
        self.records
            .iter()
            .fold(0u64, |total, record| total.saturating_add(record.byte_size))
    }

    pub fn total_transfer_size(&self) -> u64 {
        self.records.iter().fold(0u64, |total, record| {
            total.saturating_add(record.transfer_size.unwrap_or(record.byte_size))
        })
    }

    pub fn category_stats(&self) -> Vec<CategoryStats> {
        // Shares come from float sums so saturated totals keep them within 100%.
        let total = self
            .records
            .iter()
            .map(|record| record.byte_size as f64)
            .sum::<f64>();
        let mut stats = ResourceKind::ALL
            .iter()
            .map(|&kind| {
                let (count, size, share) = self
                    .records
                    .iter()
                    .filter(|record| record.category == kind)
                    .fold((0usize, 0u64, 0.0f64), |(count, size, share), record| {
                        (
                            count + 1,
                            size.saturating_add(record.byte_size),
                            share + record.byte_size as f64,
                        )
                    });
                let percentage = if total > 0.0 {
                    (share / total * 100.0) as f32
                } else {
                    0.0
                };
                CategoryStats {
                    kind,
                    count,
                    size,
                    percentage,
                }
            })
            .collect::<Vec<_>>();

        stats.sort_by(|a, b| b.size.cmp(&a.size));
        stats
    }
}
