use std::fs;

use assert_matches::assert_matches;
use serde_json::{Value, json};

use panther_mcp::error::PantherError;
use panther_mcp::panther::{
    extract_annot_datasets, extract_genomes, extract_results, filter_observed,
};

fn fixture(name: &str) -> Value {
    let raw = fs::read_to_string(format!("tests/fixtures/{name}")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn extract_genomes_is_identity_pass_through() {
    let raw = fixture("supportedgenomes.json");
    let genomes = extract_genomes(&raw).unwrap();

    assert_eq!(genomes.len(), 3);
    assert_eq!(genomes[0]["taxon_id"], 9606);
    assert_eq!(genomes[0]["long_name"], "Homo sapiens");
    assert_eq!(genomes[2]["short_name"], "DROME");
    assert_eq!(
        raw["search"]["output"]["genomes"]["genome"],
        Value::Array(genomes)
    );
}

#[test]
fn extract_annot_datasets_is_identity_pass_through() {
    let raw = fixture("supportedannotdatasets.json");
    let datasets = extract_annot_datasets(&raw).unwrap();

    assert_eq!(datasets.len(), 5);
    assert_eq!(datasets[1]["id"], "GO:0008150");
    assert_eq!(datasets[1]["label"], "biological_process");
    assert_eq!(
        raw["search"]["annotation_data_sets"]["annotation_data_type"],
        Value::Array(datasets)
    );
}

#[test]
fn filter_keeps_only_observed_terms() {
    let raw = fixture("overrep.json");
    let results = extract_results(&raw).unwrap();
    assert_eq!(results.len(), 4);

    let kept = filter_observed(results).unwrap();
    assert_eq!(kept.len(), 2);
    assert_eq!(kept[0]["term"]["id"], "GO:0006281");
    assert_eq!(kept[1]["term"]["id"], "GO:0006974");

    for record in &kept {
        let count = match &record["number_in_list"] {
            Value::Number(n) => n.as_i64().unwrap(),
            Value::String(s) => s.parse::<i64>().unwrap(),
            other => panic!("unexpected count shape: {other}"),
        };
        assert!(count > 0);
    }
}

#[test]
fn missing_genome_path_is_upstream_error() {
    let raw = json!({ "search": { "output": {} } });
    let err = extract_genomes(&raw).unwrap_err();
    assert_matches!(err, PantherError::MissingField(path) if path == "search.output.genomes.genome");
}

#[test]
fn missing_dataset_path_is_upstream_error() {
    let raw = json!({ "search": {} });
    let err = extract_annot_datasets(&raw).unwrap_err();
    assert_matches!(
        err,
        PantherError::MissingField(path) if path == "search.annotation_data_sets.annotation_data_type"
    );
}

#[test]
fn missing_results_path_is_upstream_error() {
    let raw = json!({ "results": {} });
    let err = extract_results(&raw).unwrap_err();
    assert_matches!(err, PantherError::MissingField(path) if path == "results.result");
}

#[test]
fn wrong_typed_envelope_is_upstream_error() {
    let raw = json!({ "search": "service unavailable" });
    let err = extract_genomes(&raw).unwrap_err();
    assert_matches!(err, PantherError::MissingField(_));
}

#[test]
fn non_integer_count_is_malformed() {
    let results = vec![json!({ "number_in_list": "n/a" })];
    let err = filter_observed(results).unwrap_err();
    assert_matches!(
        err,
        PantherError::MalformedField { field, .. } if field == "number_in_list"
    );
}

#[test]
fn fractional_count_is_malformed() {
    let results = vec![json!({ "number_in_list": 1.5 })];
    let err = filter_observed(results).unwrap_err();
    assert_matches!(err, PantherError::MalformedField { .. });
}

#[test]
fn record_without_count_is_upstream_error() {
    let results = vec![json!({ "term": { "id": "GO:0008150" } })];
    let err = filter_observed(results).unwrap_err();
    assert_matches!(err, PantherError::MissingField(_));
}

#[test]
fn negative_count_is_dropped_not_rejected() {
    let results = vec![
        json!({ "number_in_list": -1, "term": { "id": "a" } }),
        json!({ "number_in_list": 1, "term": { "id": "b" } }),
    ];
    let kept = filter_observed(results).unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0]["term"]["id"], "b");
}
