// Application-wide cache of hotels, room types and accommodations.
// Built once per session and shared by every view through an `Arc`.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{error, info};

use crate::api::{ApiError, Backend};
use crate::models::{Accommodation, Hotel, Id, RoomType};

pub const INIT_ERROR_MESSAGE: &str =
    "Error cargando datos iniciales. Por favor, recarga la página.";

#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    pub hotels: Vec<Hotel>,
    pub room_types: Vec<RoomType>,
    pub accommodations: Vec<Accommodation>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            hotels: Vec::new(),
            room_types: Vec::new(),
            accommodations: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

pub struct AppState {
    api: Arc<dyn Backend>,
    data: RwLock<StoreSnapshot>,
}

impl AppState {
    // Starts in the loading state; call `initialize` to populate
    pub fn new(api: Arc<dyn Backend>) -> Self {
        Self {
            api,
            data: RwLock::new(StoreSnapshot::default()),
        }
    }

    pub fn api(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.api)
    }

    // Fetches the three collections concurrently. Any failure leaves the
    // cached collections untouched and sets the user-facing error.
    pub async fn initialize(&self) -> Result<(), ApiError> {
        self.data.write().loading = true;

        let result = futures::try_join!(
            self.api.list_hotels(),
            self.api.list_room_types(),
            self.api.list_accommodations(),
        );

        let mut data = self.data.write();
        data.loading = false;
        match result {
            Ok((hotels, room_types, accommodations)) => {
                info!(
                    hotels = hotels.len(),
                    room_types = room_types.len(),
                    accommodations = accommodations.len(),
                    "initial data loaded"
                );
                data.hotels = hotels;
                data.room_types = room_types;
                data.accommodations = accommodations;
                data.error = None;
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "error fetching initial data");
                data.error = Some(INIT_ERROR_MESSAGE.to_string());
                Err(err)
            }
        }
    }

    pub async fn refetch(&self) -> Result<(), ApiError> {
        self.initialize().await
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.data.read().clone()
    }

    pub fn hotels(&self) -> Vec<Hotel> {
        self.data.read().hotels.clone()
    }

    pub fn hotel(&self, id: Id) -> Option<Hotel> {
        self.data.read().hotels.iter().find(|hotel| hotel.id == id).cloned()
    }

    pub fn room_types(&self) -> Vec<RoomType> {
        self.data.read().room_types.clone()
    }

    pub fn accommodations(&self) -> Vec<Accommodation> {
        self.data.read().accommodations.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.data.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.data.read().error.clone()
    }

    pub fn set_hotels(&self, hotels: Vec<Hotel>) {
        self.data.write().hotels = hotels;
    }

    // Replaces the hotel with the same identifier, or appends it
    pub fn upsert_hotel(&self, hotel: Hotel) {
        let mut data = self.data.write();
        match data.hotels.iter_mut().find(|cached| cached.id == hotel.id) {
            Some(cached) => *cached = hotel,
            None => data.hotels.push(hotel),
        }
    }

    // Replaces the hotel with the same identifier; a hotel that is not
    // cached is left out
    pub fn replace_hotel(&self, hotel: Hotel) -> bool {
        let mut data = self.data.write();
        match data.hotels.iter_mut().find(|cached| cached.id == hotel.id) {
            Some(cached) => {
                *cached = hotel;
                true
            }
            None => false,
        }
    }

    pub fn remove_hotel(&self, id: Id) -> bool {
        let mut data = self.data.write();
        let before = data.hotels.len();
        data.hotels.retain(|hotel| hotel.id != id);
        data.hotels.len() != before
    }
}
