use serde::{Deserialize, Serialize};

/// Response of `GET /dogs/search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "resultIds")]
    pub result_ids: Vec<String>,
    pub total: u64,
}

/// Response of `POST /dogs/match`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResponse {
    #[serde(rename = "match")]
    pub matched_id: String,
}
