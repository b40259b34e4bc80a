// Service exports
pub mod dogs;

pub use dogs::{ApiError, DogService, DogsClient, MAX_HYDRATE_BATCH};
