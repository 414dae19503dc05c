// In-memory backend implementing the same resource traits as `RestClient`.
// Test double for the view and store tests; supports injected failures and
// delays to exercise the error and race paths.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

use crate::api::{AccommodationsApi, ApiError, HotelRoomsApi, HotelsApi, RoomTypesApi};
use crate::models::{
    canonical_accommodations, Accommodation, Hotel, HotelData, HotelRoom, HotelRoomData, Id,
    RoomType, RoomTypeKind,
};
use crate::rules::permitted_accommodations;

// Failure returned for the next N requests
#[derive(Debug, Clone)]
struct InjectedFailure {
    remaining: usize,
    error: ApiError,
}

pub struct InMemoryBackend {
    hotels: DashMap<Id, Hotel>,
    hotel_rooms: DashMap<Id, HotelRoom>,
    room_types: Vec<RoomType>,
    accommodations: Vec<Accommodation>,
    next_id: AtomicU64,
    request_count: AtomicUsize,
    delay_ms: AtomicU64,
    failure: Mutex<Option<InjectedFailure>>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    // Empty backend with the standard room type and accommodation catalog
    pub fn new() -> Self {
        let room_types = RoomTypeKind::ALL
            .iter()
            .zip(1..)
            .map(|(kind, id)| RoomType {
                id,
                name: kind.name().to_string(),
            })
            .collect();

        Self {
            hotels: DashMap::new(),
            hotel_rooms: DashMap::new(),
            room_types,
            accommodations: canonical_accommodations(),
            next_id: AtomicU64::new(1),
            request_count: AtomicUsize::new(0),
            delay_ms: AtomicU64::new(0),
            failure: Mutex::new(None),
        }
    }

    // Backend with a couple of hotels and room configurations
    pub fn seeded() -> Self {
        let backend = Self::new();
        let cartagena = backend.insert_hotel(HotelData {
            name: "Decameron Cartagena".to_string(),
            address: "Calle 1 #2-3".to_string(),
            city: "Cartagena".to_string(),
            nit: "12345678-9".to_string(),
            total_rooms: 42,
        });
        backend.insert_hotel(HotelData {
            name: "Decameron San Andrés".to_string(),
            address: "Avenida Colombia 5".to_string(),
            city: "San Andrés".to_string(),
            nit: "98765432-1".to_string(),
            total_rooms: 30,
        });
        backend.insert_hotel_room(HotelRoomData {
            hotel_id: cartagena.id,
            room_type_id: 1,
            accommodation_id: 1,
            quantity: 25,
        });
        backend.insert_hotel_room(HotelRoomData {
            hotel_id: cartagena.id,
            room_type_id: 2,
            accommodation_id: 3,
            quantity: 12,
        });
        backend
    }

    pub fn insert_hotel(&self, data: HotelData) -> Hotel {
        let hotel = Hotel::from_data(self.allocate_id(), data);
        self.hotels.insert(hotel.id, hotel.clone());
        hotel
    }

    pub fn insert_hotel_room(&self, data: HotelRoomData) -> HotelRoom {
        let room = HotelRoom::from_data(self.allocate_id(), data);
        self.hotel_rooms.insert(room.id, room.clone());
        room
    }

    pub fn hotel_count(&self) -> usize {
        self.hotels.len()
    }

    pub fn hotel_room_count(&self) -> usize {
        self.hotel_rooms.len()
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    pub fn set_delay(&self, delay_ms: u64) {
        self.delay_ms.store(delay_ms, Ordering::SeqCst);
    }

    // Makes the next `count` requests fail with `error`
    pub fn fail_next_requests(&self, count: usize, error: ApiError) {
        *self.failure.lock() = Some(InjectedFailure {
            remaining: count,
            error,
        });
    }

    pub fn reject_next_request(&self, status_code: u16, message: Option<&str>) {
        self.fail_next_requests(
            1,
            ApiError::ApiResponseError {
                status_code,
                message: message.map(str::to_string),
            },
        );
    }

    fn allocate_id(&self) -> Id {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    async fn begin(&self, operation: &str) -> Result<(), ApiError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        debug!(operation, "in-memory request");

        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let mut failure = self.failure.lock();
        if let Some(injected) = failure.as_mut() {
            if injected.remaining > 0 {
                injected.remaining -= 1;
                let error = injected.error.clone();
                if injected.remaining == 0 {
                    *failure = None;
                }
                return Err(error);
            }
        }
        Ok(())
    }

    fn not_found(what: &str, id: Id) -> ApiError {
        ApiError::ApiResponseError {
            status_code: 404,
            message: Some(format!("{what} {id} not found")),
        }
    }

    fn unprocessable(message: String) -> ApiError {
        ApiError::ApiResponseError {
            status_code: 422,
            message: Some(message),
        }
    }

    // Server-side checks for a room configuration payload
    fn check_hotel_room(&self, data: &HotelRoomData) -> Result<(), ApiError> {
        if !self.hotels.contains_key(&data.hotel_id) {
            return Err(Self::not_found("hotel", data.hotel_id));
        }
        let room_type = self
            .room_types
            .iter()
            .find(|room_type| room_type.id == data.room_type_id)
            .ok_or_else(|| Self::unprocessable("invalid room type".to_string()))?;
        let accommodation = self
            .accommodations
            .iter()
            .find(|accommodation| accommodation.id == data.accommodation_id)
            .ok_or_else(|| Self::unprocessable("invalid accommodation".to_string()))?;

        let permitted = match (room_type.kind(), accommodation.kind()) {
            (Some(room_type), Some(accommodation)) => {
                permitted_accommodations(room_type).contains(&accommodation)
            }
            _ => false,
        };
        if !permitted {
            return Err(Self::unprocessable(format!(
                "{} rooms cannot use {} accommodation",
                room_type.name, accommodation.name
            )));
        }
        if data.quantity <= 0 {
            return Err(Self::unprocessable("quantity must be positive".to_string()));
        }
        Ok(())
    }

    fn embed(&self, mut room: HotelRoom) -> HotelRoom {
        room.room_type = self
            .room_types
            .iter()
            .find(|room_type| room_type.id == room.room_type_id)
            .cloned();
        room.accommodation = self
            .accommodations
            .iter()
            .find(|accommodation| accommodation.id == room.accommodation_id)
            .cloned();
        room
    }
}

#[async_trait]
impl HotelsApi for InMemoryBackend {
    async fn list_hotels(&self) -> Result<Vec<Hotel>, ApiError> {
        self.begin("list_hotels").await?;
        let mut hotels: Vec<Hotel> = self.hotels.iter().map(|entry| entry.value().clone()).collect();
        hotels.sort_by_key(|hotel| hotel.id);
        Ok(hotels)
    }

    async fn get_hotel(&self, id: Id) -> Result<Hotel, ApiError> {
        self.begin("get_hotel").await?;
        self.hotels
            .get(&id)
            .map(|hotel| hotel.clone())
            .ok_or_else(|| Self::not_found("hotel", id))
    }

    async fn create_hotel(&self, data: &HotelData) -> Result<Hotel, ApiError> {
        self.begin("create_hotel").await?;
        if self.hotels.iter().any(|hotel| hotel.nit == data.nit) {
            return Err(Self::unprocessable(format!("NIT {} is already registered", data.nit)));
        }
        Ok(self.insert_hotel(data.clone()))
    }

    async fn update_hotel(&self, id: Id, data: &HotelData) -> Result<Hotel, ApiError> {
        self.begin("update_hotel").await?;
        let mut hotel = self
            .hotels
            .get_mut(&id)
            .ok_or_else(|| Self::not_found("hotel", id))?;
        *hotel = Hotel::from_data(id, data.clone());
        Ok(hotel.clone())
    }

    async fn delete_hotel(&self, id: Id) -> Result<(), ApiError> {
        self.begin("delete_hotel").await?;
        self.hotels
            .remove(&id)
            .ok_or_else(|| Self::not_found("hotel", id))?;
        self.hotel_rooms.retain(|_, room| room.hotel_id != id);
        Ok(())
    }

    async fn hotel_rooms(&self, id: Id) -> Result<Vec<HotelRoom>, ApiError> {
        self.begin("hotel_rooms").await?;
        if !self.hotels.contains_key(&id) {
            return Err(Self::not_found("hotel", id));
        }
        let mut rooms: Vec<HotelRoom> = self
            .hotel_rooms
            .iter()
            .filter(|room| room.hotel_id == id)
            .map(|room| self.embed(room.clone()))
            .collect();
        rooms.sort_by_key(|room| room.id);
        Ok(rooms)
    }
}

#[async_trait]
impl RoomTypesApi for InMemoryBackend {
    async fn list_room_types(&self) -> Result<Vec<RoomType>, ApiError> {
        self.begin("list_room_types").await?;
        Ok(self.room_types.clone())
    }

    async fn room_type_accommodations(&self, id: Id) -> Result<Vec<Accommodation>, ApiError> {
        self.begin("room_type_accommodations").await?;
        let room_type = self
            .room_types
            .iter()
            .find(|room_type| room_type.id == id)
            .ok_or_else(|| Self::not_found("room type", id))?;
        Ok(crate::rules::valid_accommodations_for(
            &room_type.name,
            &self.accommodations,
        ))
    }
}

#[async_trait]
impl AccommodationsApi for InMemoryBackend {
    async fn list_accommodations(&self) -> Result<Vec<Accommodation>, ApiError> {
        self.begin("list_accommodations").await?;
        Ok(self.accommodations.clone())
    }
}

#[async_trait]
impl HotelRoomsApi for InMemoryBackend {
    async fn list_hotel_rooms(&self) -> Result<Vec<HotelRoom>, ApiError> {
        self.begin("list_hotel_rooms").await?;
        let mut rooms: Vec<HotelRoom> =
            self.hotel_rooms.iter().map(|room| room.value().clone()).collect();
        rooms.sort_by_key(|room| room.id);
        Ok(rooms)
    }

    async fn get_hotel_room(&self, id: Id) -> Result<HotelRoom, ApiError> {
        self.begin("get_hotel_room").await?;
        self.hotel_rooms
            .get(&id)
            .map(|room| room.clone())
            .ok_or_else(|| Self::not_found("hotel room", id))
    }

    async fn create_hotel_room(&self, data: &HotelRoomData) -> Result<HotelRoom, ApiError> {
        self.begin("create_hotel_room").await?;
        self.check_hotel_room(data)?;
        Ok(self.insert_hotel_room(data.clone()))
    }

    async fn update_hotel_room(
        &self,
        id: Id,
        data: &HotelRoomData,
    ) -> Result<HotelRoom, ApiError> {
        self.begin("update_hotel_room").await?;
        self.check_hotel_room(data)?;
        let mut room = self
            .hotel_rooms
            .get_mut(&id)
            .ok_or_else(|| Self::not_found("hotel room", id))?;
        *room = HotelRoom::from_data(id, data.clone());
        Ok(room.clone())
    }

    async fn delete_hotel_room(&self, id: Id) -> Result<(), ApiError> {
        self.begin("delete_hotel_room").await?;
        self.hotel_rooms
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found("hotel room", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn sol() -> HotelData {
        HotelData {
            name: "Sol".to_string(),
            address: "Calle 1".to_string(),
            city: "Cali".to_string(),
            nit: "123".to_string(),
            total_rooms: 20,
        }
    }

    #[tokio::test]
    async fn test_hotel_crud() {
        let backend = InMemoryBackend::new();

        let created = assert_ok!(backend.create_hotel(&sol()).await);
        assert_eq!(assert_ok!(backend.get_hotel(created.id).await), created);

        let mut renamed = sol();
        renamed.name = "Luna".to_string();
        let updated = assert_ok!(backend.update_hotel(created.id, &renamed).await);
        assert_eq!(updated.name, "Luna");

        assert_ok!(backend.delete_hotel(created.id).await);
        let err = assert_err!(backend.get_hotel(created.id).await);
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_duplicate_nit_is_rejected_with_message() {
        let backend = InMemoryBackend::new();
        assert_ok!(backend.create_hotel(&sol()).await);
        let err = assert_err!(backend.create_hotel(&sol()).await);
        assert_eq!(err.status_code(), Some(422));
        assert!(err.server_message().is_some());
    }

    #[tokio::test]
    async fn test_hotel_rooms_embed_associations() {
        let backend = InMemoryBackend::new();
        let hotel = backend.insert_hotel(sol());
        backend.insert_hotel_room(HotelRoomData {
            hotel_id: hotel.id,
            room_type_id: 2,
            accommodation_id: 4,
            quantity: 3,
        });

        let rooms = assert_ok!(backend.hotel_rooms(hotel.id).await);
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].room_type_name(), "Junior");
        assert_eq!(rooms[0].accommodation_name(), "Cuádruple");
    }

    #[tokio::test]
    async fn test_invalid_pairing_is_rejected() {
        let backend = InMemoryBackend::new();
        let hotel = backend.insert_hotel(sol());
        let err = assert_err!(
            backend
                .create_hotel_room(&HotelRoomData {
                    hotel_id: hotel.id,
                    room_type_id: 1,
                    accommodation_id: 4,
                    quantity: 1,
                })
                .await
        );
        assert_eq!(err.status_code(), Some(422));
    }

    #[tokio::test]
    async fn test_injected_failures_are_consumed() {
        let backend = InMemoryBackend::new();
        backend.fail_next_requests(2, ApiError::NetworkError("down".to_string()));

        assert_err!(backend.list_room_types().await);
        assert_err!(backend.list_room_types().await);
        assert_ok!(backend.list_room_types().await);
        assert_eq!(backend.request_count(), 3);
    }

    #[tokio::test]
    async fn test_deleting_hotel_removes_its_rooms() {
        let backend = InMemoryBackend::seeded();
        let hotels = assert_ok!(backend.list_hotels().await);
        let before = backend.hotel_room_count();
        assert!(before > 0);

        assert_ok!(backend.delete_hotel(hotels[0].id).await);
        assert_eq!(backend.hotel_room_count(), 0);
        assert_eq!(backend.hotel_count(), hotels.len() - 1);
    }

    #[tokio::test]
    async fn test_room_type_accommodations_endpoint() {
        let backend = InMemoryBackend::new();
        let suite = assert_ok!(backend.room_type_accommodations(3).await);
        let names: Vec<&str> = suite.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Sencilla", "Doble", "Triple"]);
    }
}
