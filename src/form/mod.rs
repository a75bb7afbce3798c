use crate::models::{PropertyRecord, UpdateProperty};

/// Identifies one editable field of the property form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Value,
    Summary,
    Description,
    TypeId,
    Bedrooms,
    Bathrooms,
    Suites,
    ParkingSpots,
    TotalArea,
    PrivateArea,
    Cep,
    State,
    City,
    Neighborhood,
    Street,
    Number,
    Latitude,
    Longitude,
}

/// A failed schema check for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

/// Schema: required fields and the message shown when they are missing.
/// Counters and areas are unconstrained, the house number is optional.
const REQUIRED: &[(Field, &str)] = &[
    (Field::Name, "Nome é obrigatório"),
    (Field::Value, "Valor é obrigatório"),
    (Field::Summary, "Resumo é obrigatório"),
    (Field::TypeId, "Tipo do imóvel é obrigatório"),
    (Field::Description, "Descrição é obrigatório"),
    (Field::Cep, "CEP é obrigatório"),
    (Field::State, "Estado é obrigatório"),
    (Field::City, "Cidade é obrigatório"),
    (Field::Neighborhood, "Bairro é obrigatório"),
    (Field::Street, "Rua é obrigatório"),
    (Field::Latitude, "Latitude é obrigatório"),
    (Field::Longitude, "Longitude é obrigatório"),
];

/// In-memory state of the property edit form
///
/// Holds every field as a plain string plus the validation errors of the
/// latest `validate` run. The authoritative copy of the record stays on the
/// backend; this state lives for one edit session.
#[derive(Debug, Clone, Default)]
pub struct PropertyForm {
    name: String,
    value: String,
    summary: String,
    description: String,
    type_id: String,
    bedrooms: String,
    bathrooms: String,
    suites: String,
    parking_spots: String,
    total_area: String,
    private_area: String,
    cep: String,
    state: String,
    city: String,
    neighborhood: String,
    street: String,
    number: String,
    latitude: String,
    longitude: String,
    errors: Vec<FieldError>,
}

impl PropertyForm {
    /// Pre-populates the form from a fetched record, including the type id
    /// carried on the embedded `type_property`.
    pub fn from_record(record: &PropertyRecord) -> Self {
        Self {
            name: record.name.clone(),
            value: record.value.clone(),
            summary: record.summary.clone(),
            description: record.description.clone(),
            type_id: record.type_property.id.clone(),
            bedrooms: record.bedrooms.clone(),
            bathrooms: record.bathrooms.clone(),
            suites: record.suites.clone(),
            parking_spots: record.parking_spots.clone(),
            total_area: record.total_area.clone(),
            private_area: record.private_area.clone(),
            cep: record.cep.clone(),
            state: record.state.clone(),
            city: record.city.clone(),
            neighborhood: record.neighborhood.clone(),
            street: record.street.clone(),
            number: record.number_address.clone(),
            latitude: record.latitude.clone(),
            longitude: record.longitude.clone(),
            errors: Vec::new(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Value => &self.value,
            Field::Summary => &self.summary,
            Field::Description => &self.description,
            Field::TypeId => &self.type_id,
            Field::Bedrooms => &self.bedrooms,
            Field::Bathrooms => &self.bathrooms,
            Field::Suites => &self.suites,
            Field::ParkingSpots => &self.parking_spots,
            Field::TotalArea => &self.total_area,
            Field::PrivateArea => &self.private_area,
            Field::Cep => &self.cep,
            Field::State => &self.state,
            Field::City => &self.city,
            Field::Neighborhood => &self.neighborhood,
            Field::Street => &self.street,
            Field::Number => &self.number,
            Field::Latitude => &self.latitude,
            Field::Longitude => &self.longitude,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Value => self.value = value,
            Field::Summary => self.summary = value,
            Field::Description => self.description = value,
            Field::TypeId => self.type_id = value,
            Field::Bedrooms => self.bedrooms = value,
            Field::Bathrooms => self.bathrooms = value,
            Field::Suites => self.suites = value,
            Field::ParkingSpots => self.parking_spots = value,
            Field::TotalArea => self.total_area = value,
            Field::PrivateArea => self.private_area = value,
            Field::Cep => self.cep = value,
            Field::State => self.state = value,
            Field::City => self.city = value,
            Field::Neighborhood => self.neighborhood = value,
            Field::Street => self.street = value,
            Field::Number => self.number = value,
            Field::Latitude => self.latitude = value,
            Field::Longitude => self.longitude = value,
        }
    }

    /// Runs the schema over the current values. Returns whether the form is
    /// submittable; the per-field messages stay available until the next run.
    pub fn validate(&mut self) -> bool {
        self.errors = REQUIRED
            .iter()
            .filter(|(field, _)| self.get(*field).is_empty())
            .map(|&(field, message)| FieldError { field, message })
            .collect();
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }

    /// Builds the `PUT /imovel/{id}` body from the current values plus the
    /// storage paths returned by the upload.
    pub fn to_payload(&self, files: Vec<String>) -> UpdateProperty {
        UpdateProperty {
            name: self.name.clone(),
            value: self.value.clone(),
            summary: self.summary.clone(),
            type_id: self.type_id.clone(),
            description: self.description.clone(),
            bedrooms: self.bedrooms.clone(),
            bathrooms: self.bathrooms.clone(),
            suites: self.suites.clone(),
            parking_spots: self.parking_spots.clone(),
            total_area: self.total_area.clone(),
            private_area: self.private_area.clone(),
            cep: self.cep.clone(),
            state: self.state.clone(),
            city: self.city.clone(),
            neighborhood: self.neighborhood.clone(),
            street: self.street.clone(),
            number: self.number.clone(),
            latitude: self.latitude.clone(),
            longitude: self.longitude.clone(),
            files,
        }
    }
}
