/// In-app navigation
///
/// Locations are path + query string, exactly like a browser URL, so the
/// review filters can live in the query string and survive back/forward.
pub mod history;
pub mod location;

pub use history::History;
pub use location::{Location, Route};
