use std::fmt;

use model::{
    location::{Coordinates, LocationType, NewRepairLocation},
    services::Services,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Name,
    Address,
    LocationType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

/// Every required field that failed validation, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> Vec<FormField> {
        self.0.iter().map(|error| error.field).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages = self
            .0
            .iter()
            .map(|error| error.message.as_str())
            .collect::<Vec<_>>();
        write!(f, "{}", messages.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Form input that passed validation, still missing its coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidLocation {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub location_type: LocationType,
    pub services: Services,
}

impl ValidLocation {
    pub fn at(self, coordinates: Coordinates) -> NewRepairLocation {
        NewRepairLocation {
            name: self.name,
            description: self.description,
            address: self.address,
            phone: self.phone,
            website: self.website,
            location_type: self.location_type,
            services: self.services,
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
        }
    }
}

/// State of the "add location" form.
///
/// Text fields hold whatever was typed. `location_type` holds the raw select
/// value, empty until a type is chosen. Service labels are added one at a time
/// through [`LocationForm::add_service`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationForm {
    pub name: String,
    pub description: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub location_type: String,
    services: Services,
}

impl LocationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Adds a trimmed service label. Blank labels and labels already in the
    /// list are ignored. Returns whether the label was added.
    pub fn add_service(&mut self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() {
            return false;
        }
        self.services.insert(label)
    }

    pub fn remove_service(&mut self, label: &str) -> bool {
        self.services.remove(label)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn validate(&self) -> Result<ValidLocation, ValidationErrors> {
        let mut errors = vec![];

        let name = required(&self.name);
        if name.is_none() {
            errors.push(FieldError {
                field: FormField::Name,
                message: "Location name is required".to_owned(),
            });
        }

        let location_type = match required(&self.location_type) {
            None => {
                errors.push(FieldError {
                    field: FormField::LocationType,
                    message: "Location type is required".to_owned(),
                });
                None
            }
            Some(raw) => match raw.parse::<LocationType>() {
                Ok(location_type) => Some(location_type),
                Err(why) => {
                    errors.push(FieldError {
                        field: FormField::LocationType,
                        message: why.to_string(),
                    });
                    None
                }
            },
        };

        let address = required(&self.address);
        if address.is_none() {
            errors.push(FieldError {
                field: FormField::Address,
                message: "Address is required".to_owned(),
            });
        }

        match (name, address, location_type) {
            (Some(name), Some(address), Some(location_type)) => Ok(ValidLocation {
                name,
                description: required(&self.description),
                address,
                phone: required(&self.phone),
                website: required(&self.website),
                location_type,
                services: self.services.clone(),
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }
}

/// The trimmed value, or `None` if nothing but whitespace was entered.
/// Text fields are stored trimmed.
fn required(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}
