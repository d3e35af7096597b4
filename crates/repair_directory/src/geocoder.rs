use async_trait::async_trait;
use model::location::Coordinates;
use rand::Rng;

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("an address is required for geocoding")]
    EmptyAddress,
    #[error("address could not be resolved: {0}")]
    Unresolvable(String),
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Resolves a free-form address to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError>;
}

/// New York City Hall, the reference point the directory started out with.
pub const DEFAULT_REFERENCE: Coordinates = Coordinates {
    latitude: 40.7128,
    longitude: -74.0060,
};

pub const DEFAULT_SPREAD_DEGREES: f64 = 0.1;

/// Stand-in geocoder that ignores the address.
///
/// Every call returns `reference` shifted by a uniformly random offset of at
/// most `spread / 2` degrees on each axis. **The result bears no relation to
/// the address passed in.** Replace it with a real provider behind the
/// [`Geocoder`] trait before relying on stored coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceholderGeocoder {
    pub reference: Coordinates,
    pub spread_degrees: f64,
}

impl Default for PlaceholderGeocoder {
    fn default() -> Self {
        Self {
            reference: DEFAULT_REFERENCE,
            spread_degrees: DEFAULT_SPREAD_DEGREES,
        }
    }
}

impl PlaceholderGeocoder {
    pub fn new(reference: Coordinates, spread_degrees: f64) -> Self {
        Self {
            reference,
            spread_degrees: spread_degrees.abs(),
        }
    }

    fn jitter<R: Rng>(&self, rng: &mut R) -> Coordinates {
        let mut offset = || (rng.gen::<f64>() - 0.5) * self.spread_degrees;
        Coordinates::new(
            self.reference.latitude + offset(),
            self.reference.longitude + offset(),
        )
    }
}

#[async_trait]
impl Geocoder for PlaceholderGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        if address.trim().is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }
        Ok(self.jitter(&mut rand::thread_rng()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[tokio::test]
    async fn stays_within_spread_of_reference() {
        let geocoder = PlaceholderGeocoder::default();
        for _ in 0..200 {
            let point = geocoder.geocode("12 Canal Street").await.unwrap();
            assert!((point.latitude - DEFAULT_REFERENCE.latitude).abs() <= 0.05);
            assert!((point.longitude - DEFAULT_REFERENCE.longitude).abs() <= 0.05);
        }
    }

    #[tokio::test]
    async fn rejects_blank_address() {
        let result = PlaceholderGeocoder::default().geocode("   ").await;
        assert!(matches!(result, Err(GeocodeError::EmptyAddress)));
    }

    #[test]
    fn zero_spread_returns_reference() {
        let geocoder = PlaceholderGeocoder::new(Coordinates::new(54.3, 10.1), 0.0);
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(geocoder.jitter(&mut rng), Coordinates::new(54.3, 10.1));
    }

    #[test]
    fn negative_spread_is_normalized() {
        let geocoder = PlaceholderGeocoder::new(DEFAULT_REFERENCE, -0.2);
        assert_eq!(geocoder.spread_degrees, 0.2);
    }
}
