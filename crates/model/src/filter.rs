use std::{fmt, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::location::{LocationType, RepairLocation, StoredLocationType, UnknownLocationType};

/// Restricts results to one location type, or lets all of them through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(LocationType),
}

impl TypeFilter {
    /// Values outside the known set only pass [`TypeFilter::All`].
    pub fn matches(&self, location_type: &StoredLocationType) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => location_type == expected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(location_type) => location_type.as_str(),
        }
    }
}

impl From<LocationType> for TypeFilter {
    fn from(value: LocationType) -> Self {
        Self::Only(value)
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeFilter {
    type Err = UnknownLocationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            other => other.parse().map(Self::Only),
        }
    }
}

impl Serialize for TypeFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TypeFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl JsonSchema for TypeFilter {
    fn schema_name() -> String {
        "TypeFilter".to_owned()
    }

    fn json_schema(_gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        schemars::schema::SchemaObject {
            instance_type: Some(schemars::schema::InstanceType::String.into()),
            enum_values: Some(
                std::iter::once(TypeFilter::All)
                    .chain(LocationType::ALL.into_iter().map(TypeFilter::Only))
                    .map(|filter| filter.as_str().into())
                    .collect(),
            ),
            ..Default::default()
        }
        .into()
    }
}

/// A free-text search combined with a type restriction.
///
/// Matching is a case-insensitive substring test against the name, address,
/// description and every service label. A location is kept if any of those
/// fields contains the text and its type passes the type filter. Filtering
/// never reorders its input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationQuery {
    text: String,
    location_type: TypeFilter,
    needle: String,
}

impl LocationQuery {
    pub fn new<S: Into<String>>(text: S, location_type: TypeFilter) -> Self {
        let text = text.into();
        let needle = text.to_lowercase();
        Self {
            text,
            location_type,
            needle,
        }
    }

    /// Matches every location.
    pub fn everything() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn location_type(&self) -> TypeFilter {
        self.location_type
    }

    pub fn is_unrestricted(&self) -> bool {
        self.text.is_empty() && self.location_type == TypeFilter::All
    }

    pub fn matches(&self, location: &RepairLocation) -> bool {
        self.matches_text(location) && self.location_type.matches(&location.location_type)
    }

    fn matches_text(&self, location: &RepairLocation) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        let contains = |haystack: &str| haystack.to_lowercase().contains(&self.needle);

        contains(&location.name)
            || contains(&location.address)
            || location.description.as_deref().is_some_and(contains)
            || location.services.iter().any(contains)
    }

    /// Borrowing variant of [`LocationQuery::apply`].
    pub fn filter<'a, I>(&'a self, locations: I) -> impl Iterator<Item = &'a RepairLocation>
    where
        I: IntoIterator<Item = &'a RepairLocation>,
        I::IntoIter: 'a,
    {
        locations
            .into_iter()
            .filter(move |location| self.matches(location))
    }

    /// Returns the matching locations in their original order.
    pub fn apply(&self, locations: &[RepairLocation]) -> Vec<RepairLocation> {
        self.filter(locations).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{services::Services, ExampleData};
    use utility::id::Id;

    fn location(
        id: &str,
        name: &str,
        location_type: LocationType,
        services: &[&str],
    ) -> RepairLocation {
        RepairLocation {
            id: Id::new(id.to_owned()),
            name: name.to_owned(),
            description: None,
            address: "1 Main Street".to_owned(),
            phone: None,
            website: None,
            location_type: location_type.into(),
            services: services.iter().copied().collect::<Services>(),
            ..RepairLocation::example_data()
        }
    }

    fn acme_and_bob() -> Vec<RepairLocation> {
        vec![
            location("1", "Acme Repair", LocationType::RepairCafe, &["bikes"]),
            location("2", "Bob's Shop", LocationType::CommercialShop, &["phones"]),
        ]
    }

    fn names(locations: &[RepairLocation]) -> Vec<&str> {
        locations.iter().map(|l| l.name.as_str()).collect()
    }

    #[test]
    fn text_matches_service_labels() {
        let result = LocationQuery::new("bike", TypeFilter::All).apply(&acme_and_bob());
        assert_eq!(names(&result), vec!["Acme Repair"]);
    }

    #[test]
    fn type_filter_selects_exact_type() {
        let result = LocationQuery::new("", LocationType::CommercialShop.into())
            .apply(&acme_and_bob());
        assert_eq!(names(&result), vec!["Bob's Shop"]);
    }

    #[test]
    fn unmatched_text_returns_nothing() {
        let result = LocationQuery::new("zzz", TypeFilter::All).apply(&acme_and_bob());
        assert!(result.is_empty());
    }

    #[test]
    fn unrestricted_query_returns_input() {
        let all = acme_and_bob();
        assert!(LocationQuery::everything().is_unrestricted());
        assert_eq!(LocationQuery::everything().apply(&all), all);
    }

    #[test]
    fn matching_ignores_case() {
        let result = LocationQuery::new("ACME", TypeFilter::All).apply(&acme_and_bob());
        assert_eq!(names(&result), vec!["Acme Repair"]);
        let result = LocationQuery::new("PhOnEs", TypeFilter::All).apply(&acme_and_bob());
        assert_eq!(names(&result), vec!["Bob's Shop"]);
    }

    #[test]
    fn matches_address_and_description() {
        let mut locations = acme_and_bob();
        locations[0].address = "7 Harbor Road".to_owned();
        locations[1].description = Some("Screens replaced while you wait".to_owned());

        let by_address = LocationQuery::new("harbor", TypeFilter::All).apply(&locations);
        assert_eq!(names(&by_address), vec!["Acme Repair"]);
        let by_description = LocationQuery::new("screens", TypeFilter::All).apply(&locations);
        assert_eq!(names(&by_description), vec!["Bob's Shop"]);
    }

    #[test]
    fn absent_description_never_matches() {
        let locations = acme_and_bob();
        assert!(locations.iter().all(|l| l.description.is_none()));
        assert!(LocationQuery::new("wait", TypeFilter::All)
            .apply(&locations)
            .is_empty());
    }

    #[test]
    fn text_and_type_are_combined() {
        let locations = acme_and_bob();
        let query = LocationQuery::new("repair", LocationType::CommercialShop.into());
        assert!(query.apply(&locations).is_empty());
        let query = LocationQuery::new("repair", LocationType::RepairCafe.into());
        assert_eq!(names(&query.apply(&locations)), vec!["Acme Repair"]);
    }

    #[test]
    fn order_is_preserved() {
        let locations = vec![
            location("3", "Cafe C", LocationType::RepairCafe, &[]),
            location("1", "Cafe A", LocationType::MobileService, &[]),
            location("2", "Cafe B", LocationType::RepairCafe, &[]),
        ];
        let result = LocationQuery::new("cafe", TypeFilter::All).apply(&locations);
        assert_eq!(names(&result), vec!["Cafe C", "Cafe A", "Cafe B"]);
    }

    #[test]
    fn filtering_is_idempotent_and_a_subset() {
        let mut locations = acme_and_bob();
        locations.push(location("3", "Fix-It Van", LocationType::MobileService, &["Bikes", "Toasters"]));
        let queries = [
            LocationQuery::new("", TypeFilter::All),
            LocationQuery::new("b", TypeFilter::All),
            LocationQuery::new("BIKES", TypeFilter::All),
            LocationQuery::new("s", LocationType::MobileService.into()),
            LocationQuery::new("", LocationType::RepairCafe.into()),
        ];
        for query in queries {
            let once = query.apply(&locations);
            assert_eq!(query.apply(&once), once);
            assert!(once.iter().all(|l| locations.contains(l)));
            assert!(once.iter().all(|l| query.matches(l)));
        }
    }

    #[test]
    fn type_only_query_keeps_only_that_type() {
        let locations = acme_and_bob();
        for location_type in LocationType::ALL {
            let result = LocationQuery::new("", location_type.into()).apply(&locations);
            assert!(result.iter().all(|l| l.location_type == location_type));
        }
    }

    #[test]
    fn unrecognized_type_only_passes_all() {
        let mut locations = acme_and_bob();
        locations[1].location_type = StoredLocationType::from("bakery".to_owned());

        let all = LocationQuery::new("", TypeFilter::All).apply(&locations);
        assert_eq!(names(&all), vec!["Acme Repair", "Bob's Shop"]);
        for location_type in LocationType::ALL {
            let result = LocationQuery::new("", location_type.into()).apply(&locations);
            assert!(!names(&result).contains(&"Bob's Shop"));
        }
    }

    #[test]
    fn type_filter_parses_all_and_types() {
        assert_eq!("all".parse(), Ok(TypeFilter::All));
        assert_eq!(
            "mobile_service".parse(),
            Ok(TypeFilter::Only(LocationType::MobileService))
        );
        assert!("everything".parse::<TypeFilter>().is_err());
        assert_eq!(TypeFilter::default(), TypeFilter::All);
        assert_eq!(
            serde_json::to_string(&TypeFilter::Only(LocationType::RepairCafe)).unwrap(),
            "\"repair_cafe\""
        );
    }
}
