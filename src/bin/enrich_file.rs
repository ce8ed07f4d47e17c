//! Enriches raw records from a JSON file without a server or database.
//!
//! Usage: `enrich_file <path|->`. The input may be a single record or an
//! array of records; the output mirrors its shape.

use anyhow::Context;
use serde_json::Value;
use std::io::Read;

use rust_darkdata_api::enrichment::Enricher;

/// Main entry point for the offline enrichment tool.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: enrich_file <path|->"))?;

    let raw = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path))?
    };

    let input: Value = serde_json::from_str(&raw).context("Input is not valid JSON")?;
    let enricher = Enricher::default();

    let output = match input {
        Value::Array(records) => {
            let total = records.len();
            let mut enriched = Vec::with_capacity(total);
            for (idx, record) in records.into_iter().enumerate() {
                let record = enricher
                    .enrich_value(record)
                    .with_context(|| format!("Record {} of {} is not an object", idx + 1, total))?;
                enriched.push(serde_json::to_value(record)?);
            }
            tracing::info!("Enriched {} records", total);
            Value::Array(enriched)
        }
        single => serde_json::to_value(enricher.enrich_value(single)?)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
