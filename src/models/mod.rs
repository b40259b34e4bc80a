// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{DogRecord, ResultPage};
pub use requests::{LoginRequest, SearchParams};
pub use responses::{MatchResponse, SearchResponse};
