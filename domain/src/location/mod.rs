//! Location resolution
//!
//! Static lookups only: there is no geocoding service behind any of this.

pub mod gazetteer;
pub mod place;
pub mod travel;

pub use gazetteer::{Gazetteer, parse_location_list};
pub use place::{Coordinates, Place, RegionCode};
pub use travel::{TravelContext, TravelType};
