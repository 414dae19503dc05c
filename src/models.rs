// Data structures exchanged with the hotel REST backend
use serde::{Deserialize, Serialize};

pub type Id = u64;

// Text rendered in place of an association the backend did not embed
pub const MISSING_NAME: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Hotel {
    pub id: Id,
    pub name: String,
    pub address: String,
    pub city: String,
    pub nit: String,
    pub total_rooms: i64,
}

impl Hotel {
    pub fn from_data(id: Id, data: HotelData) -> Self {
        Self {
            id,
            name: data.name,
            address: data.address,
            city: data.city,
            nit: data.nit,
            total_rooms: data.total_rooms,
        }
    }

    pub fn data(&self) -> HotelData {
        HotelData {
            name: self.name.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            nit: self.nit.clone(),
            total_rooms: self.total_rooms,
        }
    }
}

// Body of POST /hotels and PUT /hotels/{id}
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HotelData {
    pub name: String,
    pub address: String,
    pub city: String,
    pub nit: String,
    pub total_rooms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RoomType {
    pub id: Id,
    pub name: String,
}

impl RoomType {
    pub fn kind(&self) -> Option<RoomTypeKind> {
        RoomTypeKind::from_name(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Accommodation {
    pub id: Id,
    pub name: String,
}

impl Accommodation {
    pub fn kind(&self) -> Option<AccommodationKind> {
        AccommodationKind::from_name(&self.name)
    }
}

// Room configuration; `room_type` and `accommodation` are only embedded by
// GET /hotels/{id}/rooms
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HotelRoom {
    pub id: Id,
    pub hotel_id: Id,
    pub room_type_id: Id,
    pub accommodation_id: Id,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_type: Option<RoomType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accommodation: Option<Accommodation>,
}

impl HotelRoom {
    pub fn from_data(id: Id, data: HotelRoomData) -> Self {
        Self {
            id,
            hotel_id: data.hotel_id,
            room_type_id: data.room_type_id,
            accommodation_id: data.accommodation_id,
            quantity: data.quantity,
            room_type: None,
            accommodation: None,
        }
    }

    pub fn room_type_name(&self) -> &str {
        self.room_type
            .as_ref()
            .map_or(MISSING_NAME, |room_type| room_type.name.as_str())
    }

    pub fn accommodation_name(&self) -> &str {
        self.accommodation
            .as_ref()
            .map_or(MISSING_NAME, |accommodation| accommodation.name.as_str())
    }
}

// Body of POST /hotel-rooms and PUT /hotel-rooms/{id}
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HotelRoomData {
    pub hotel_id: Id,
    pub room_type_id: Id,
    pub accommodation_id: Id,
    pub quantity: i64,
}

// Error payload the backend attaches to rejected requests
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomTypeKind {
    Standard,
    Junior,
    Suite,
}

impl RoomTypeKind {
    pub const ALL: [RoomTypeKind; 3] = [Self::Standard, Self::Junior, Self::Suite];

    // Exact match on the backend vocabulary
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Estándar" => Some(Self::Standard),
            "Junior" => Some(Self::Junior),
            "Suite" => Some(Self::Suite),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "Estándar",
            Self::Junior => "Junior",
            Self::Suite => "Suite",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccommodationKind {
    Single,
    Double,
    Triple,
    Quadruple,
}

impl AccommodationKind {
    pub const ALL: [AccommodationKind; 4] =
        [Self::Single, Self::Double, Self::Triple, Self::Quadruple];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Sencilla" => Some(Self::Single),
            "Doble" => Some(Self::Double),
            "Triple" => Some(Self::Triple),
            "Cuádruple" => Some(Self::Quadruple),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Single => "Sencilla",
            Self::Double => "Doble",
            Self::Triple => "Triple",
            Self::Quadruple => "Cuádruple",
        }
    }
}

// The room configuration form works from this fixed list rather than the
// backend's /accommodations response
pub fn canonical_accommodations() -> Vec<Accommodation> {
    AccommodationKind::ALL
        .iter()
        .zip(1..)
        .map(|(kind, id)| Accommodation {
            id,
            name: kind.name().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_accommodations() {
        let list = canonical_accommodations();
        let pairs: Vec<(Id, &str)> = list.iter().map(|a| (a.id, a.name.as_str())).collect();
        assert_eq!(
            pairs,
            vec![(1, "Sencilla"), (2, "Doble"), (3, "Triple"), (4, "Cuádruple")]
        );
    }

    #[test]
    fn test_hotel_room_without_embedded_associations() {
        let json = r#"{"id":7,"hotel_id":1,"room_type_id":2,"accommodation_id":3,"quantity":4}"#;
        let room: HotelRoom = serde_json::from_str(json).unwrap();
        assert_eq!(room.room_type_name(), MISSING_NAME);
        assert_eq!(room.accommodation_name(), MISSING_NAME);
    }

    #[test]
    fn test_hotel_room_with_embedded_associations() {
        let json = r#"{
            "id": 7, "hotel_id": 1, "room_type_id": 2, "accommodation_id": 3, "quantity": 4,
            "room_type": {"id": 2, "name": "Junior"},
            "accommodation": {"id": 3, "name": "Triple"}
        }"#;
        let room: HotelRoom = serde_json::from_str(json).unwrap();
        assert_eq!(room.room_type_name(), "Junior");
        assert_eq!(room.accommodation_name(), "Triple");
    }

    #[test]
    fn test_error_body_tolerates_missing_message() {
        let body: ErrorBody = serde_json::from_str(r#"{"errors":{}}"#).unwrap();
        assert!(body.message.is_none());
    }

    #[test]
    fn test_vocabulary_is_exact_match() {
        assert_eq!(RoomTypeKind::from_name("Estándar"), Some(RoomTypeKind::Standard));
        assert_eq!(RoomTypeKind::from_name("estándar"), None);
        assert_eq!(RoomTypeKind::from_name("Estandar"), None);
        assert_eq!(AccommodationKind::from_name("Cuádruple"), Some(AccommodationKind::Quadruple));
        assert_eq!(AccommodationKind::from_name("Cuadruple"), None);
    }
}
