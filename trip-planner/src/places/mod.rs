//! Place lookup.
//!
//! Resolves place ids to full place references. The planner only ever
//! sees `PlaceRef` values; where they come from (a search provider, the
//! user's saved places) sits behind `PlaceLookup`.

mod error;
mod saved;

pub use error::PlacesError;
pub use saved::{PlaceLookup, SavedPlaces};
