// Client-side form schemas. They mirror the backend's expected shapes so that
// obviously invalid submissions never leave the console.

use std::collections::BTreeMap;

use crate::models::{Accommodation, HotelData, HotelRoomData, Id};

pub const MAX_TEXT_LEN: usize = 255;

// Field name -> first failing rule's message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

struct TextRule {
    required: &'static str,
    too_long: &'static str,
}

struct PositiveIntegerRule {
    required: &'static str,
    not_a_number: &'static str,
    positive: &'static str,
    integer: &'static str,
}

fn check_text(errors: &mut FieldErrors, field: &'static str, value: &str, rule: &TextRule) {
    if value.is_empty() {
        errors.insert(field, rule.required);
    } else if value.chars().count() > MAX_TEXT_LEN {
        errors.insert(field, rule.too_long);
    }
}

// Accepts what a numeric input would hold; rules run in order
// required -> number -> positive -> integer
fn check_positive_integer(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    rule: &PositiveIntegerRule,
) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.insert(field, rule.required);
        return None;
    }
    let number = match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => number,
        _ => {
            errors.insert(field, rule.not_a_number);
            return None;
        }
    };
    if number <= 0.0 {
        errors.insert(field, rule.positive);
        return None;
    }
    if number.fract() != 0.0 || number > i64::MAX as f64 {
        errors.insert(field, rule.integer);
        return None;
    }
    Some(number as i64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotelField {
    Name,
    Address,
    City,
    Nit,
    TotalRooms,
}

impl HotelField {
    pub const ALL: [HotelField; 5] = [
        Self::Name,
        Self::Address,
        Self::City,
        Self::Nit,
        Self::TotalRooms,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Address => "address",
            Self::City => "city",
            Self::Nit => "nit",
            Self::TotalRooms => "total_rooms",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Nombre",
            Self::Address => "Dirección",
            Self::City => "Ciudad",
            Self::Nit => "NIT",
            Self::TotalRooms => "Número de Habitaciones",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotelRoomField {
    RoomType,
    Accommodation,
    Quantity,
}

impl HotelRoomField {
    pub const ALL: [HotelRoomField; 3] = [Self::RoomType, Self::Accommodation, Self::Quantity];

    pub fn key(self) -> &'static str {
        match self {
            Self::RoomType => "room_type_id",
            Self::Accommodation => "accommodation_id",
            Self::Quantity => "quantity",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::RoomType => "Tipo de Habitación",
            Self::Accommodation => "Acomodación",
            Self::Quantity => "Cantidad",
        }
    }
}

// Hotel form as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotelFormValues {
    pub name: String,
    pub address: String,
    pub city: String,
    pub nit: String,
    pub total_rooms: String,
}

impl From<&HotelData> for HotelFormValues {
    fn from(data: &HotelData) -> Self {
        Self {
            name: data.name.clone(),
            address: data.address.clone(),
            city: data.city.clone(),
            nit: data.nit.clone(),
            total_rooms: data.total_rooms.to_string(),
        }
    }
}

impl HotelFormValues {
    pub fn get(&self, field: HotelField) -> &str {
        match field {
            HotelField::Name => &self.name,
            HotelField::Address => &self.address,
            HotelField::City => &self.city,
            HotelField::Nit => &self.nit,
            HotelField::TotalRooms => &self.total_rooms,
        }
    }

    pub fn set(&mut self, field: HotelField, value: impl Into<String>) {
        let value = value.into();
        match field {
            HotelField::Name => self.name = value,
            HotelField::Address => self.address = value,
            HotelField::City => self.city = value,
            HotelField::Nit => self.nit = value,
            HotelField::TotalRooms => self.total_rooms = value,
        }
    }

    pub fn validate(&self) -> Result<HotelData, FieldErrors> {
        let mut errors = FieldErrors::default();

        check_text(&mut errors, "name", &self.name, &TextRule {
            required: "El nombre es obligatorio",
            too_long: "El nombre no debe exceder los 255 caracteres",
        });
        check_text(&mut errors, "address", &self.address, &TextRule {
            required: "La dirección es obligatoria",
            too_long: "La dirección no debe exceder los 255 caracteres",
        });
        check_text(&mut errors, "city", &self.city, &TextRule {
            required: "La ciudad es obligatoria",
            too_long: "La ciudad no debe exceder los 255 caracteres",
        });
        check_text(&mut errors, "nit", &self.nit, &TextRule {
            required: "El NIT es obligatorio",
            too_long: "El NIT no debe exceder los 255 caracteres",
        });
        let total_rooms = check_positive_integer(
            &mut errors,
            "total_rooms",
            &self.total_rooms,
            &PositiveIntegerRule {
                required: "El número de habitaciones es obligatorio",
                not_a_number: "El número de habitaciones debe ser un número",
                positive: "El número de habitaciones debe ser positivo",
                integer: "El número de habitaciones debe ser un número entero",
            },
        );

        errors.into_result(|| HotelData {
            name: self.name.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            nit: self.nit.clone(),
            total_rooms: total_rooms.unwrap_or_default(),
        })
    }
}

// Room configuration form as selected/typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotelRoomFormValues {
    pub room_type_id: Option<Id>,
    pub accommodation_id: Option<Id>,
    pub quantity: String,
}

impl HotelRoomFormValues {
    // `valid_accommodations` is the selector's current option list
    pub fn validate(
        &self,
        hotel_id: Id,
        valid_accommodations: &[Accommodation],
    ) -> Result<HotelRoomData, FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.room_type_id.is_none() {
            errors.insert(HotelRoomField::RoomType.key(), "El tipo de habitación es obligatorio");
        }
        match self.accommodation_id {
            None => errors.insert(HotelRoomField::Accommodation.key(), "La acomodación es obligatoria"),
            Some(id) if !valid_accommodations.iter().any(|a| a.id == id) => errors.insert(
                HotelRoomField::Accommodation.key(),
                "La acomodación no es válida para el tipo de habitación",
            ),
            Some(_) => {}
        }
        let quantity = check_positive_integer(
            &mut errors,
            HotelRoomField::Quantity.key(),
            &self.quantity,
            &PositiveIntegerRule {
                required: "La cantidad es obligatoria",
                not_a_number: "La cantidad debe ser un número",
                positive: "La cantidad debe ser positiva",
                integer: "La cantidad debe ser un número entero",
            },
        );

        errors.into_result(|| HotelRoomData {
            hotel_id,
            room_type_id: self.room_type_id.unwrap_or_default(),
            accommodation_id: self.accommodation_id.unwrap_or_default(),
            quantity: quantity.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::canonical_accommodations;
    use crate::rules::valid_accommodations_for;
    use test_case::test_case;

    fn sol(total_rooms: &str) -> HotelFormValues {
        HotelFormValues {
            name: "Sol".to_string(),
            address: "Calle 1".to_string(),
            city: "Cali".to_string(),
            nit: "123".to_string(),
            total_rooms: total_rooms.to_string(),
        }
    }

    #[test]
    fn test_valid_hotel() {
        let data = sol("20").validate().unwrap();
        assert_eq!(data.total_rooms, 20);
        assert_eq!(data.name, "Sol");
    }

    #[test_case("0", "El número de habitaciones debe ser positivo"; "zero")]
    #[test_case("-1", "El número de habitaciones debe ser positivo"; "negative")]
    #[test_case("-1.5", "El número de habitaciones debe ser positivo"; "negative fraction")]
    #[test_case("1.5", "El número de habitaciones debe ser un número entero"; "fraction")]
    #[test_case("", "El número de habitaciones es obligatorio"; "empty")]
    #[test_case("veinte", "El número de habitaciones debe ser un número"; "not a number")]
    #[test_case("NaN", "El número de habitaciones debe ser un número"; "nan")]
    fn test_total_rooms_rules(total_rooms: &str, message: &str) {
        let errors = sol(total_rooms).validate().unwrap_err();
        assert_eq!(errors.get("total_rooms"), Some(message));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_total_rooms_accepts_surrounding_whitespace() {
        assert_eq!(sol(" 7 ").validate().unwrap().total_rooms, 7);
    }

    #[test]
    fn test_required_text_fields() {
        let errors = HotelFormValues {
            total_rooms: "5".to_string(),
            ..Default::default()
        }
        .validate()
        .unwrap_err();

        assert_eq!(errors.get("name"), Some("El nombre es obligatorio"));
        assert_eq!(errors.get("address"), Some("La dirección es obligatoria"));
        assert_eq!(errors.get("city"), Some("La ciudad es obligatoria"));
        assert_eq!(errors.get("nit"), Some("El NIT es obligatorio"));
        assert_eq!(errors.get("total_rooms"), None);
    }

    #[test]
    fn test_text_length_limit_counts_characters() {
        let mut values = sol("5");
        values.set(HotelField::City, "á".repeat(MAX_TEXT_LEN));
        assert!(values.validate().is_ok());

        values.set(HotelField::City, "á".repeat(MAX_TEXT_LEN + 1));
        let errors = values.validate().unwrap_err();
        assert_eq!(
            errors.get("city"),
            Some("La ciudad no debe exceder los 255 caracteres")
        );
    }

    #[test]
    fn test_form_values_from_hotel_data() {
        let data = sol("12").validate().unwrap();
        let values = HotelFormValues::from(&data);
        assert_eq!(values.get(HotelField::TotalRooms), "12");
        assert_eq!(values, sol("12"));
    }

    #[test]
    fn test_valid_room_configuration() {
        let junior = valid_accommodations_for("Junior", &canonical_accommodations());
        let values = HotelRoomFormValues {
            room_type_id: Some(2),
            accommodation_id: Some(3),
            quantity: "4".to_string(),
        };
        let data = values.validate(9, &junior).unwrap();
        assert_eq!(
            data,
            HotelRoomData {
                hotel_id: 9,
                room_type_id: 2,
                accommodation_id: 3,
                quantity: 4,
            }
        );
    }

    #[test]
    fn test_room_configuration_required_fields() {
        let errors = HotelRoomFormValues::default().validate(1, &[]).unwrap_err();
        assert_eq!(errors.get("room_type_id"), Some("El tipo de habitación es obligatorio"));
        assert_eq!(errors.get("accommodation_id"), Some("La acomodación es obligatoria"));
        assert_eq!(errors.get("quantity"), Some("La cantidad es obligatoria"));
    }

    #[test]
    fn test_room_configuration_rejects_accommodation_outside_valid_set() {
        let standard = valid_accommodations_for("Estándar", &canonical_accommodations());
        let values = HotelRoomFormValues {
            room_type_id: Some(1),
            accommodation_id: Some(4),
            quantity: "2".to_string(),
        };
        let errors = values.validate(1, &standard).unwrap_err();
        assert_eq!(
            errors.get("accommodation_id"),
            Some("La acomodación no es válida para el tipo de habitación")
        );
    }

    #[test_case("0", "La cantidad debe ser positiva"; "zero")]
    #[test_case("2.5", "La cantidad debe ser un número entero"; "fraction")]
    fn test_quantity_rules(quantity: &str, message: &str) {
        let suite = valid_accommodations_for("Suite", &canonical_accommodations());
        let values = HotelRoomFormValues {
            room_type_id: Some(3),
            accommodation_id: Some(1),
            quantity: quantity.to_string(),
        };
        let errors = values.validate(1, &suite).unwrap_err();
        assert_eq!(errors.get("quantity"), Some(message));
    }
}
