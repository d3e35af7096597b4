//! Lookup tables for displaying locations.
//!
//! The lookups take the raw column value so that an unexpected type still
//! renders with a neutral fallback.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{location::LocationType, services::Services};

pub const FALLBACK_TYPE_LABEL: &str = "Repair Service";

/// Number of service labels shown on a listing card.
pub const CARD_SERVICE_PREVIEW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum BadgeVariant {
    Default,
    Secondary,
    Outline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum TypeColor {
    Green,
    Blue,
    Purple,
    Gray,
}

impl LocationType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::RepairCafe => "Repair Cafe",
            Self::CommercialShop => "Commercial Shop",
            Self::MobileService => "Mobile Service",
        }
    }

    /// Plural form used by the type filter options.
    pub fn plural_label(&self) -> &'static str {
        match self {
            Self::RepairCafe => "Repair Cafes",
            Self::CommercialShop => "Commercial Shops",
            Self::MobileService => "Mobile Services",
        }
    }

    pub fn badge(&self) -> BadgeVariant {
        match self {
            Self::RepairCafe => BadgeVariant::Default,
            Self::CommercialShop => BadgeVariant::Secondary,
            Self::MobileService => BadgeVariant::Outline,
        }
    }

    pub fn color(&self) -> TypeColor {
        match self {
            Self::RepairCafe => TypeColor::Green,
            Self::CommercialShop => TypeColor::Blue,
            Self::MobileService => TypeColor::Purple,
        }
    }
}

pub fn type_label(raw: &str) -> &'static str {
    raw.parse::<LocationType>()
        .map(|location_type| location_type.label())
        .unwrap_or(FALLBACK_TYPE_LABEL)
}

pub fn type_badge(raw: &str) -> BadgeVariant {
    raw.parse::<LocationType>()
        .map(|location_type| location_type.badge())
        .unwrap_or(BadgeVariant::Default)
}

pub fn type_color(raw: &str) -> TypeColor {
    raw.parse::<LocationType>()
        .map(|location_type| location_type.color())
        .unwrap_or(TypeColor::Gray)
}

/// The first few service labels plus how many were left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServicePreview {
    pub shown: Vec<String>,
    pub more: usize,
}

impl ServicePreview {
    pub fn of(services: &Services, limit: usize) -> Self {
        let shown = services
            .iter()
            .take(limit)
            .map(str::to_owned)
            .collect::<Vec<_>>();
        let more = services.len() - shown.len();
        Self { shown, more }
    }

    pub fn more_label(&self) -> Option<String> {
        (self.more > 0).then(|| format!("+{} more", self.more))
    }
}

/// "1 repair location found" / "3 repair locations found".
pub fn results_summary(count: usize) -> String {
    let noun = if count == 1 { "location" } else { "locations" };
    format!("{count} repair {noun} found")
}
