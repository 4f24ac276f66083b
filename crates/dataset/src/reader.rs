use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::schema::Dataset;

pub struct DatasetReader;

impl DatasetReader {
    pub async fn read_file(path: &Path) -> Result<Dataset> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        match extension {
            "json" => {
                let content = fs::read_to_string(path)
                    .await
                    .context(format!("Failed to read dataset: {:?}", path))?;
                let dataset = Self::parse_json(&content)
                    .context(format!("Invalid dataset file: {:?}", path))?;

                info!(
                    path = %path.display(),
                    entities = dataset.entities.len(),
                    edges = dataset.edges.len(),
                    "Dataset loaded"
                );
                Ok(dataset)
            }
            _ => anyhow::bail!("Unsupported dataset format: {}", extension),
        }
    }

    pub fn parse_json(content: &str) -> Result<Dataset> {
        let dataset: Dataset = serde_json::from_str(content)
            .context("Failed to parse dataset JSON")?;
        Ok(dataset)
    }

    pub async fn write_file(path: &Path, dataset: &Dataset) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string(dataset)?;
        fs::write(path, json)
            .await
            .context(format!("Failed to write dataset: {:?}", path))?;
        Ok(())
    }
}
