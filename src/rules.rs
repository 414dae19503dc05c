// Room configuration rules: which accommodations pair with a room type, and
// how many of a hotel's rooms are already configured
use crate::models::{Accommodation, AccommodationKind, Hotel, HotelRoom, Id, RoomType, RoomTypeKind};

// Accommodations permitted for a room type
pub fn permitted_accommodations(room_type: RoomTypeKind) -> &'static [AccommodationKind] {
    match room_type {
        RoomTypeKind::Standard => &[AccommodationKind::Single, AccommodationKind::Double],
        RoomTypeKind::Junior => &[AccommodationKind::Triple, AccommodationKind::Quadruple],
        RoomTypeKind::Suite => &[
            AccommodationKind::Single,
            AccommodationKind::Double,
            AccommodationKind::Triple,
        ],
    }
}

// Filters `accommodations` down to those permitted for the named room type.
// Unknown or empty room type names yield an empty list.
pub fn valid_accommodations_for(
    room_type_name: &str,
    accommodations: &[Accommodation],
) -> Vec<Accommodation> {
    let Some(kind) = RoomTypeKind::from_name(room_type_name) else {
        return Vec::new();
    };
    let permitted = permitted_accommodations(kind);

    accommodations
        .iter()
        .filter(|accommodation| {
            accommodation
                .kind()
                .is_some_and(|accommodation| permitted.contains(&accommodation))
        })
        .cloned()
        .collect()
}

// Same as `valid_accommodations_for`, resolving the room type by identifier
// first. An identifier that is not in `room_types` yields an empty list.
pub fn valid_accommodations_for_id(
    room_type_id: Id,
    room_types: &[RoomType],
    accommodations: &[Accommodation],
) -> Vec<Accommodation> {
    room_types
        .iter()
        .find(|room_type| room_type.id == room_type_id)
        .map(|room_type| valid_accommodations_for(&room_type.name, accommodations))
        .unwrap_or_default()
}

pub fn is_valid_pairing(room_type_name: &str, accommodation_name: &str) -> bool {
    match (
        RoomTypeKind::from_name(room_type_name),
        AccommodationKind::from_name(accommodation_name),
    ) {
        (Some(room_type), Some(accommodation)) => {
            permitted_accommodations(room_type).contains(&accommodation)
        }
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityStatus {
    Available,
    Full,
    OverCapacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacitySummary {
    pub total: i64,
    pub configured: i64,
    pub available: i64,
}

impl CapacitySummary {
    pub fn status(&self) -> CapacityStatus {
        match self.available {
            n if n > 0 => CapacityStatus::Available,
            0 => CapacityStatus::Full,
            _ => CapacityStatus::OverCapacity,
        }
    }

    // Rendered as a warning whenever nothing is left to configure
    pub fn is_flagged(&self) -> bool {
        self.available <= 0
    }

    pub fn can_add_rooms(&self) -> bool {
        self.available > 0
    }
}

pub fn capacity_summary(hotel: &Hotel, rooms: &[HotelRoom]) -> CapacitySummary {
    let configured = rooms
        .iter()
        .fold(0i64, |sum, room| sum.saturating_add(room.quantity));

    CapacitySummary {
        total: hotel.total_rooms,
        configured,
        available: hotel.total_rooms.saturating_sub(configured),
    }
}
