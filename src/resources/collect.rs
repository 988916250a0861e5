use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::mock::generate_mock_resources;
use super::parse::{parse_dataset_json, parse_lighthouse_report};
use super::record::Dataset;

/// Where an analysis run gets its resource list from.
#[derive(Clone, Debug)]
pub enum DataSource {
    DatasetFile(PathBuf),
    ReportFile(PathBuf),
    Mock { url: String, seed: Option<u64> },
}

impl DataSource {
    pub fn describe(&self) -> String {
        match self {
            Self::DatasetFile(path) => format!("dataset {}", path.display()),
            Self::ReportFile(path) => format!("report {}", path.display()),
            Self::Mock { url, .. } => format!("simulation of {url}"),
        }
    }

    /// Page url a simulated source was built for.
    pub fn page_url(&self) -> Option<&str> {
        match self {
            Self::Mock { url, .. } => Some(url),
            Self::DatasetFile(_) | Self::ReportFile(_) => None,
        }
    }

    /// Simulated source for a url typed by the user. Blank input yields none.
    pub fn for_page_url(input: &str, seed: Option<u64>) -> Option<Self> {
        let url = input.trim();
        (!url.is_empty()).then(|| Self::Mock {
            url: url.to_owned(),
            seed,
        })
    }
}

pub fn collect_dataset(source: &DataSource) -> Result<Dataset> {
    let records = match source {
        DataSource::DatasetFile(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read dataset {}", path.display()))?;
            parse_dataset_json(&raw)
                .with_context(|| format!("failed to parse dataset {}", path.display()))?
        }
        DataSource::ReportFile(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read report {}", path.display()))?;
            parse_lighthouse_report(&raw)
                .with_context(|| format!("failed to parse report {}", path.display()))?
        }
        DataSource::Mock { url, seed } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(*seed),
                None => StdRng::from_os_rng(),
            };
            generate_mock_resources(url, &mut rng)
        }
    };

    let dataset = Dataset::new(source.describe(), records)
        .with_context(|| format!("invalid resource set from {}", source.describe()))?;
    tracing::info!(
        source = %dataset.source_label,
        resources = dataset.len(),
        "collected resource set"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_report_their_path() {
        let source = DataSource::DatasetFile(PathBuf::from("/nonexistent/resources.json"));
        let error = collect_dataset(&source).unwrap_err();
        assert!(format!("{error:#}").contains("/nonexistent/resources.json"));
    }

    #[test]
    fn dataset_file_round_trips_through_loader() {
        let path = std::env::temp_dir().join(format!(
            "wpo-analisa-dataset-{}.json",
            std::process::id()
        ));
        fs::write(
            &path,
            r#"[{"id": "root", "url": "https://a.test", "category": "html", "byteSize": 900},
                {"id": "css", "url": "https://a.test/s.css", "category": "css",
                 "byteSize": 4096, "initiatorRef": "root"}]"#,
        )
        .unwrap();

        let dataset = collect_dataset(&DataSource::DatasetFile(path.clone())).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records[1].initiator_ref.as_deref(), Some("root"));
    }

    #[test]
    fn seeded_mock_source_is_reproducible() {
        let source = DataSource::Mock {
            url: "https://shop.test".to_owned(),
            seed: Some(11),
        };
        let first = collect_dataset(&source).unwrap();
        let second = collect_dataset(&source).unwrap();
        assert_eq!(first.total_size(), second.total_size());
        assert_eq!(first.records[0].id, "root");
    }

    #[test]
    fn typed_urls_start_a_simulated_analysis() {
        assert!(DataSource::for_page_url("   ", Some(1)).is_none());

        let source = DataSource::for_page_url("  https://other.test/ ", Some(5)).unwrap();
        assert_eq!(source.page_url(), Some("https://other.test/"));
        let dataset = collect_dataset(&source).unwrap();
        assert_eq!(dataset.records[0].id, "root");
        assert!(dataset.records[0].url.starts_with("https://other.test"));

        let file = DataSource::ReportFile(PathBuf::from("report.json"));
        assert_eq!(file.page_url(), None);
    }
}
