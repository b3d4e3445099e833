use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::EnrichmentRequest;
use crate::error::PantherError;

pub const BASE_URL: &str = "https://pantherdb.org";

/// Client for the Panther `oai` web services.
///
/// Each operation is one stateless round trip: a failed call surfaces
/// immediately, with no retry. Records are returned as raw JSON values in
/// upstream order; whatever fields the service ships are passed through.
pub trait PantherClient: Send + Sync {
    fn supported_genomes(&self) -> Result<Vec<Value>, PantherError>;
    fn supported_annot_datasets(&self) -> Result<Vec<Value>, PantherError>;
    fn enrich_overrep(&self, request: &EnrichmentRequest) -> Result<Vec<Value>, PantherError>;
}

#[derive(Clone)]
pub struct PantherHttpClient {
    client: Client,
    base_url: String,
}

impl PantherHttpClient {
    pub fn new() -> Result<Self, PantherError> {
        Self::with_base_url(BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Result<Self, PantherError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("panther-mcp/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| PantherError::PantherHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|err| PantherError::PantherHttp(err.to_string()))?;
        Ok(Self { client, base_url })
    }

    fn handle_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, PantherError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "Panther request failed".to_string());
        Err(PantherError::PantherStatus { status, message })
    }

    fn get_json(&self, url: &str) -> Result<Value, PantherError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| PantherError::PantherHttp(err.to_string()))?;
        let response = Self::handle_status(response)?;
        response
            .json()
            .map_err(|err| PantherError::PantherHttp(err.to_string()))
    }
}

impl PantherClient for PantherHttpClient {
    fn supported_genomes(&self) -> Result<Vec<Value>, PantherError> {
        let url = format!("{}/services/oai/pantherdb/supportedgenomes", self.base_url);
        let raw = self.get_json(&url)?;
        extract_genomes(&raw)
    }

    fn supported_annot_datasets(&self) -> Result<Vec<Value>, PantherError> {
        let url = format!(
            "{}/services/oai/pantherdb/supportedannotdatasets",
            self.base_url
        );
        let raw = self.get_json(&url)?;
        extract_annot_datasets(&raw)
    }

    fn enrich_overrep(&self, request: &EnrichmentRequest) -> Result<Vec<Value>, PantherError> {
        let url = format!("{}/services/oai/pantherdb/enrich/overrep", self.base_url);
        let params = [
            ("geneInputList", request.gene_input_list.joined()),
            ("organism", request.organism.as_str().to_string()),
            ("annotDataSet", request.annot_data_set.as_str().to_string()),
        ];
        let response = self
            .client
            .post(&url)
            .form(&params)
            .send()
            .map_err(|err| PantherError::PantherHttp(err.to_string()))?;
        let response = Self::handle_status(response)?;
        let raw: Value = response
            .json()
            .map_err(|err| PantherError::PantherHttp(err.to_string()))?;
        let results = extract_results(&raw)?;
        filter_observed(results)
    }
}

#[derive(Deserialize)]
struct GenomesEnvelope {
    search: Option<GenomesSearch>,
}

#[derive(Deserialize)]
struct GenomesSearch {
    output: Option<GenomesOutput>,
}

#[derive(Deserialize)]
struct GenomesOutput {
    genomes: Option<GenomeHolder>,
}

#[derive(Deserialize)]
struct GenomeHolder {
    genome: Option<Vec<Value>>,
}

#[derive(Deserialize)]
struct DatasetsEnvelope {
    search: Option<DatasetsSearch>,
}

#[derive(Deserialize)]
struct DatasetsSearch {
    annotation_data_sets: Option<DatasetHolder>,
}

#[derive(Deserialize)]
struct DatasetHolder {
    annotation_data_type: Option<Vec<Value>>,
}

#[derive(Deserialize)]
struct ResultsEnvelope {
    results: Option<ResultsHolder>,
}

#[derive(Deserialize)]
struct ResultsHolder {
    result: Option<Vec<Value>>,
}

pub fn extract_genomes(raw: &Value) -> Result<Vec<Value>, PantherError> {
    const PATH: &str = "search.output.genomes.genome";
    let envelope: GenomesEnvelope = decode(raw, PATH)?;
    envelope
        .search
        .and_then(|search| search.output)
        .and_then(|output| output.genomes)
        .and_then(|genomes| genomes.genome)
        .ok_or_else(|| PantherError::MissingField(PATH.to_string()))
}

pub fn extract_annot_datasets(raw: &Value) -> Result<Vec<Value>, PantherError> {
    const PATH: &str = "search.annotation_data_sets.annotation_data_type";
    let envelope: DatasetsEnvelope = decode(raw, PATH)?;
    envelope
        .search
        .and_then(|search| search.annotation_data_sets)
        .and_then(|sets| sets.annotation_data_type)
        .ok_or_else(|| PantherError::MissingField(PATH.to_string()))
}

pub fn extract_results(raw: &Value) -> Result<Vec<Value>, PantherError> {
    const PATH: &str = "results.result";
    let envelope: ResultsEnvelope = decode(raw, PATH)?;
    envelope
        .results
        .and_then(|results| results.result)
        .ok_or_else(|| PantherError::MissingField(PATH.to_string()))
}

// A wrong-typed intermediate node counts as an absent path.
fn decode<T: serde::de::DeserializeOwned>(raw: &Value, path: &str) -> Result<T, PantherError> {
    serde_json::from_value(raw.clone()).map_err(|_| PantherError::MissingField(path.to_string()))
}

/// Drops result records whose gene-list hit count is zero.
///
/// Terms with `number_in_list == 0` are valid upstream records; they are
/// removed as a significance pre-filter, not a correctness check.
pub fn filter_observed(results: Vec<Value>) -> Result<Vec<Value>, PantherError> {
    let mut kept = Vec::with_capacity(results.len());
    for record in results {
        if number_in_list(&record)? > 0 {
            kept.push(record);
        }
    }
    Ok(kept)
}

fn number_in_list(record: &Value) -> Result<i64, PantherError> {
    let field = record
        .get("number_in_list")
        .ok_or_else(|| PantherError::MissingField("results.result[].number_in_list".to_string()))?;
    // Panther serves the count as a JSON number or a numeric string.
    match field {
        Value::Number(count) => count.as_i64().ok_or_else(|| malformed(field)),
        Value::String(text) => text.trim().parse::<i64>().map_err(|_| malformed(field)),
        _ => Err(malformed(field)),
    }
}

fn malformed(value: &Value) -> PantherError {
    PantherError::MalformedField {
        field: "number_in_list".to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn filter_drops_zero_counts() {
        let results = vec![
            json!({"number_in_list": 0, "term": {"id": "GO:0003674"}}),
            json!({"number_in_list": 3, "term": {"id": "GO:0008150"}}),
            json!({"number_in_list": "0", "term": {"id": "GO:0005575"}}),
        ];
        let kept = filter_observed(results).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0]["term"]["id"], "GO:0008150");
    }

    #[test]
    fn filter_rejects_non_integer_count() {
        let results = vec![json!({"number_in_list": "three"})];
        let err = filter_observed(results).unwrap_err();
        assert!(matches!(err, PantherError::MalformedField { .. }));
    }
}
