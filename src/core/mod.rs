// Client state exports
pub mod breeds;
pub mod controller;
pub mod favorites;
pub mod matcher;
pub mod pagination;
pub mod paging;
pub mod query;
pub mod session;

pub use breeds::BreedLookup;
pub use controller::{SearchController, SearchView};
pub use favorites::FavoritesSet;
pub use matcher::{request_match, MatchError, MatchRequester};
pub use pagination::{clamp_page, offset_for_page, page_count, shows_pagination, PAGE_SIZE};
pub use paging::{fetch_page, Completion, FetchError, FetchTicket, ResultPager};
pub use query::{SearchQuery, SearchQueryState};
pub use session::{SessionError, SessionGateway};
