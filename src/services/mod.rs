// Service exports
pub mod geocoder;
pub mod location;

pub use geocoder::{GeocodeError, Geocoder};
pub use location::{LocationClient, regional_endpoint};
