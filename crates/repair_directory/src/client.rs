use std::sync::Arc;

use model::{
    filter::LocationQuery,
    location::RepairLocation,
};
use utility::id::Id;

use crate::{
    form::{LocationForm, ValidationErrors},
    geocoder::{GeocodeError, Geocoder, PlaceholderGeocoder},
    store::{LocationStore, StoreError},
};

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Location added successfully!";
pub const SUBMIT_FAILURE_MESSAGE: &str = "Error adding location. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("could not geocode address: {0}")]
    Geocode(#[from] GeocodeError),
    #[error("could not insert location: {0}")]
    Store(#[from] StoreError),
}

impl SubmitError {
    /// What the person submitting the form gets to see.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(errors) => errors.to_string(),
            Self::Geocode(_) | Self::Store(_) => SUBMIT_FAILURE_MESSAGE.to_owned(),
        }
    }
}

/// Reads and submits repair locations against a [`LocationStore`].
///
/// Failures never escape the read operations: they are logged and reported
/// as an empty list or a missing location.
#[derive(Clone)]
pub struct Client<S>
where
    S: LocationStore,
{
    store: S,
    geocoder: Arc<dyn Geocoder>,
}

impl<S> Client<S>
where
    S: LocationStore,
{
    /// A client that assigns coordinates with the [`PlaceholderGeocoder`].
    pub fn new(store: S) -> Self {
        Self::with_geocoder(store, PlaceholderGeocoder::default())
    }

    pub fn with_geocoder<G>(store: S, geocoder: G) -> Self
    where
        G: Geocoder + 'static,
    {
        Self {
            store,
            geocoder: Arc::new(geocoder),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Every location, newest first. Empty if the store could not be read.
    pub async fn fetch_all(&self) -> Vec<RepairLocation> {
        match self.store.select_all_newest_first().await {
            Ok(locations) => locations,
            Err(why) => {
                log::error!("Error fetching locations: {}", why);
                vec![]
            }
        }
    }

    /// The location with the given id.
    ///
    /// Absence, ambiguity and request failures all end up as `None`; only the
    /// failures are logged.
    pub async fn fetch_by_id(&self, id: &Id<RepairLocation>) -> Option<RepairLocation> {
        match self.store.select_single(id).await {
            Ok(location) => Some(location),
            Err(why) if why.is_absence() => {
                log::debug!("location {} not found: {}", id, why);
                None
            }
            Err(why) => {
                log::error!("Error fetching location {}: {}", id, why);
                None
            }
        }
    }

    /// Fetches everything and keeps what matches `query`, in fetch order.
    pub async fn search(&self, query: &LocationQuery) -> Vec<RepairLocation> {
        let locations = self.fetch_all().await;
        if query.is_unrestricted() {
            return locations;
        }
        query.apply(&locations)
    }

    /// Validates the form, assigns coordinates and inserts the location.
    ///
    /// On success the form is reset. On failure it is left exactly as it was
    /// so the submission can be retried. Nothing is inserted unless validation
    /// and geocoding both succeed.
    pub async fn submit(&self, form: &mut LocationForm) -> Result<RepairLocation, SubmitError> {
        let valid = form.validate()?;

        let coordinates = self
            .geocoder
            .geocode(&valid.address)
            .await
            .inspect_err(|why| log::error!("Error geocoding address: {}", why))?;

        let location = self
            .store
            .insert(valid.at(coordinates))
            .await
            .inspect_err(|why| log::error!("Error adding location: {}", why))?;

        log::info!("added location {} ({})", location.id, location.name);
        form.reset();
        Ok(location)
    }
}
