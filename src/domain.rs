use std::fmt;

use serde::Deserialize;

/// Taxon identifier of an organism from the Panther supported genomes list.
///
/// Callers may supply the numeric taxon id (9606) or any string form; the
/// identifier is transmitted to Panther as its string representation either
/// way, uninterpreted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "OrganismArg")]
pub struct OrganismId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum OrganismArg {
    Number(i64),
    Text(String),
}

impl From<OrganismArg> for OrganismId {
    fn from(value: OrganismArg) -> Self {
        match value {
            OrganismArg::Number(taxon) => Self(taxon.to_string()),
            OrganismArg::Text(text) => Self(text),
        }
    }
}

impl OrganismId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrganismId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for OrganismId {
    fn from(taxon: i64) -> Self {
        Self(taxon.to_string())
    }
}

impl From<String> for OrganismId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for OrganismId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Annotation dataset identifier, passed to Panther verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct AnnotDataSet(String);

impl AnnotDataSet {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnnotDataSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AnnotDataSet {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for AnnotDataSet {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Ordered gene identifier list.
///
/// Order and duplicates are preserved exactly as given. The wire form joins
/// elements with a comma and performs no escaping of embedded commas.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct GeneList(Vec<String>);

impl GeneList {
    pub fn new(genes: Vec<String>) -> Self {
        Self(genes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn joined(&self) -> String {
        self.0.join(",")
    }
}

impl From<Vec<String>> for GeneList {
    fn from(genes: Vec<String>) -> Self {
        Self(genes)
    }
}

/// One overrepresentation query: which genes, against which organism and
/// annotation dataset. Field names match the tool-call argument names.
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichmentRequest {
    pub gene_input_list: GeneList,
    pub organism: OrganismId,
    pub annot_data_set: AnnotDataSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organism_from_integer_is_string_form() {
        let id = OrganismId::from(9606);
        assert_eq!(id.as_str(), "9606");
    }

    #[test]
    fn gene_list_joins_in_order_keeping_duplicates() {
        let genes = GeneList::new(vec![
            "TP53".to_string(),
            "BRCA1".to_string(),
            "TP53".to_string(),
        ]);
        assert_eq!(genes.joined(), "TP53,BRCA1,TP53");
    }

    #[test]
    fn deserialize_request_with_numeric_organism() {
        let raw = serde_json::json!({
            "gene_input_list": ["TP53", "BRCA1"],
            "organism": 9606,
            "annot_data_set": "GO:0008150"
        });
        let request: EnrichmentRequest = serde_json::from_value(raw).unwrap();
        assert_eq!(request.organism.as_str(), "9606");
        assert_eq!(request.gene_input_list.joined(), "TP53,BRCA1");
        assert_eq!(request.annot_data_set.as_str(), "GO:0008150");
    }
}
