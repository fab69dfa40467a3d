mod nominatim;

pub use nominatim::{GeocodeResult, GeocodingService};
