// Room configurations of one hotel, with the capacity summary. Configurations
// are always fetched fresh for the hotel in the route, never cached.

use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tracing::error;

use super::{Confirm, DeleteOutcome, ListStatus};
use crate::alert::{Alert, AlertSlot};
use crate::api::Backend;
use crate::models::{Hotel, HotelRoom, Id};
use crate::mount::Mount;
use crate::routes::Route;
use crate::rules::{capacity_summary, CapacitySummary};

pub const DELETE_PROMPT: &str =
    "¿Estás seguro de que deseas eliminar esta configuración de habitación?";
pub const LOAD_ERROR: &str = "Error al cargar los datos. Por favor, inténtalo de nuevo.";
pub const EMPTY_MESSAGE: &str =
    "No hay configuraciones de habitaciones registradas para este hotel.";
pub const NOT_FOUND_MESSAGE: &str = "Hotel no encontrado.";

#[derive(Debug, Clone, PartialEq)]
pub struct HotelRoomsListState {
    pub loading: bool,
    pub hotel: Option<Hotel>,
    pub rooms: Vec<HotelRoom>,
    pub alert: AlertSlot,
}

pub struct HotelRoomsListView {
    hotel_id: Id,
    api: Arc<dyn Backend>,
    state: Arc<Mutex<HotelRoomsListState>>,
    mount: Mount,
}

impl HotelRoomsListView {
    pub fn new(api: Arc<dyn Backend>, hotel_id: Id) -> Self {
        Self {
            hotel_id,
            api,
            state: Arc::new(Mutex::new(HotelRoomsListState {
                loading: true,
                hotel: None,
                rooms: Vec::new(),
                alert: AlertSlot::default(),
            })),
            mount: Mount::new(),
        }
    }

    pub fn hotel_id(&self) -> Id {
        self.hotel_id
    }

    pub fn state(&self) -> HotelRoomsListState {
        self.state.lock().clone()
    }

    // Hotel and configurations are fetched together; either failing leaves
    // the hotel unset so the view falls back to "not found"
    pub fn load(&self) -> impl Future<Output = ()> + Send + 'static {
        let hotel_id = self.hotel_id;
        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let token = self.mount.token();

        async move {
            let result = futures::try_join!(api.get_hotel(hotel_id), api.hotel_rooms(hotel_id));
            token.apply(&state, |state| {
                match result {
                    Ok((hotel, rooms)) => {
                        state.hotel = Some(hotel);
                        state.rooms = rooms;
                    }
                    Err(err) => {
                        error!(hotel_id, error = %err, "error fetching hotel rooms");
                        state.alert.show(Alert::danger(LOAD_ERROR));
                    }
                }
                state.loading = false;
            });
        }
    }

    pub fn status(&self) -> ListStatus<HotelRoom> {
        let state = self.state.lock();
        if state.loading {
            ListStatus::Loading
        } else {
            ListStatus::from_rows(state.rooms.clone())
        }
    }

    // None until the hotel is known
    pub fn capacity(&self) -> Option<CapacitySummary> {
        let state = self.state.lock();
        state
            .hotel
            .as_ref()
            .map(|hotel| capacity_summary(hotel, &state.rooms))
    }

    // "Add room" route, offered only while rooms remain unconfigured
    pub fn add_room_route(&self) -> Option<Route> {
        self.capacity()
            .filter(CapacitySummary::can_add_rooms)
            .map(|_| Route::NewHotelRoom(self.hotel_id))
    }

    pub fn edit_room_route(&self, room_id: Id) -> Route {
        Route::EditHotelRoom {
            hotel_id: self.hotel_id,
            id: room_id,
        }
    }

    pub fn dismiss_alert(&self) {
        self.state.lock().alert.dismiss();
    }

    pub async fn delete(&self, room_id: Id, confirm: &dyn Confirm) -> DeleteOutcome {
        if !confirm.confirm(DELETE_PROMPT) {
            return DeleteOutcome::Cancelled;
        }

        let token = self.mount.token();
        match self.api.delete_hotel_room(room_id).await {
            Ok(()) => {
                token.apply(&self.state, |state| {
                    state.rooms.retain(|room| room.id != room_id);
                    state.alert.show(Alert::success(
                        "Configuración de habitación eliminada correctamente.",
                    ));
                });
                DeleteOutcome::Deleted
            }
            Err(err) => {
                error!(room_id, error = %err, "error deleting room configuration");
                token.apply(&self.state, |state| {
                    state
                        .alert
                        .show(Alert::danger("Error al eliminar la configuración de habitación."));
                });
                DeleteOutcome::Failed(err)
            }
        }
    }

    pub fn unmount(&self) {
        self.mount.unmount();
    }
}
