pub mod client;
pub mod form;
pub mod geocoder;
pub mod memory;
pub mod store;

pub use client::{Client, SubmitError};
pub use form::LocationForm;
pub use geocoder::{GeocodeError, Geocoder, PlaceholderGeocoder};
pub use store::{LocationStore, StoreError, StoreResult};
