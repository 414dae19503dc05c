// Room configuration create/edit form. The accommodation selector depends on
// the selected room type: every room type change clears the accommodation
// and recomputes the options from the pairing rules.

use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tracing::{error, warn};

use super::{failure_message, FormMode, FormPhase, Redirect, SubmitOutcome, ViewConfig};
use crate::alert::{Alert, AlertSlot};
use crate::api::{ApiError, Backend};
use crate::models::{canonical_accommodations, Accommodation, Hotel, HotelRoom, Id, RoomType};
use crate::mount::Mount;
use crate::routes::Route;
use crate::rules::valid_accommodations_for_id;
use crate::store::AppState;
use crate::validation::{FieldErrors, HotelRoomFormValues};

pub const HOTEL_LOAD_ERROR: &str = "Error al cargar los datos del hotel.";
pub const INITIAL_LOAD_ERROR: &str = "Error al cargar los datos iniciales.";
pub const SAVE_ERROR: &str =
    "Error al guardar la configuración de habitación. Por favor, inténtalo de nuevo.";

#[derive(Debug, Clone, PartialEq)]
pub struct HotelRoomFormState {
    pub phase: FormPhase,
    pub hotel: Option<Hotel>,
    pub values: HotelRoomFormValues,
    // Options currently offered by the accommodation selector
    pub valid_accommodations: Vec<Accommodation>,
    pub errors: FieldErrors,
    pub alert: AlertSlot,
}

impl HotelRoomFormState {
    pub fn accommodation_selector_enabled(&self) -> bool {
        !self.valid_accommodations.is_empty()
    }
}

pub struct HotelRoomFormView {
    hotel_id: Id,
    mode: FormMode,
    store: Arc<AppState>,
    config: ViewConfig,
    accommodations: Arc<Vec<Accommodation>>,
    state: Arc<Mutex<HotelRoomFormState>>,
    mount: Mount,
}

// What the initial fetch produced, before it is applied to the view
struct Loaded {
    hotel: Option<Hotel>,
    room: Option<HotelRoom>,
    alert: Option<&'static str>,
}

impl HotelRoomFormView {
    pub fn new(store: Arc<AppState>, hotel_id: Id, mode: FormMode, config: ViewConfig) -> Self {
        Self {
            hotel_id,
            mode,
            store,
            config,
            accommodations: Arc::new(canonical_accommodations()),
            state: Arc::new(Mutex::new(HotelRoomFormState {
                phase: FormPhase::InitialLoading,
                hotel: None,
                values: HotelRoomFormValues::default(),
                valid_accommodations: Vec::new(),
                errors: FieldErrors::default(),
                alert: AlertSlot::default(),
            })),
            mount: Mount::new(),
        }
    }

    pub fn hotel_id(&self) -> Id {
        self.hotel_id
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Nueva Configuración de Habitación",
            FormMode::Edit(_) => "Editar Configuración de Habitación",
        }
    }

    pub fn state(&self) -> HotelRoomFormState {
        self.state.lock().clone()
    }

    pub fn room_type_options(&self) -> Vec<RoomType> {
        self.store.room_types()
    }

    pub fn return_route(&self) -> Route {
        Route::HotelRooms(self.hotel_id)
    }

    pub fn load(&self) -> impl Future<Output = ()> + Send + 'static {
        let hotel_id = self.hotel_id;
        let mode = self.mode;
        let api = self.store.api();
        let room_types = self.store.room_types();
        let accommodations = Arc::clone(&self.accommodations);
        let state = Arc::clone(&self.state);
        let token = self.mount.token();

        async move {
            let loaded = Self::fetch(api.as_ref(), hotel_id, mode).await;
            token.apply(&state, |state| {
                if let Some(room) = loaded.room {
                    state.valid_accommodations =
                        valid_accommodations_for_id(room.room_type_id, &room_types, &accommodations);
                    state.values = HotelRoomFormValues {
                        room_type_id: Some(room.room_type_id),
                        accommodation_id: Some(room.accommodation_id),
                        quantity: room.quantity.to_string(),
                    };
                }
                state.hotel = loaded.hotel;
                if let Some(message) = loaded.alert {
                    state.alert.show(Alert::danger(message));
                }
                state.phase = FormPhase::Ready;
            });
        }
    }

    async fn fetch_primary(
        api: &dyn Backend,
        hotel_id: Id,
        mode: FormMode,
    ) -> Result<(Hotel, Option<HotelRoom>), ApiError> {
        let hotel = api.get_hotel(hotel_id).await?;
        let room = match mode {
            FormMode::Edit(id) => Some(api.get_hotel_room(id).await?),
            FormMode::Create => None,
        };
        Ok((hotel, room))
    }

    // Hotel (and edited configuration) first; if that fails, look the hotel
    // up in the full hotel list instead
    async fn fetch(api: &dyn Backend, hotel_id: Id, mode: FormMode) -> Loaded {
        let primary = Self::fetch_primary(api, hotel_id, mode).await;

        match primary {
            Ok((hotel, room)) => Loaded {
                hotel: Some(hotel),
                room,
                alert: None,
            },
            Err(err) => {
                warn!(hotel_id, error = %err, "error fetching initial data, falling back to hotel list");
                match api.list_hotels().await {
                    Ok(hotels) => {
                        let hotel = hotels.into_iter().find(|hotel| hotel.id == hotel_id);
                        let alert = hotel.is_none().then_some(HOTEL_LOAD_ERROR);
                        Loaded {
                            hotel,
                            room: None,
                            alert,
                        }
                    }
                    Err(err) => {
                        error!(hotel_id, error = %err, "error in hotel list fallback");
                        Loaded {
                            hotel: None,
                            room: None,
                            alert: Some(INITIAL_LOAD_ERROR),
                        }
                    }
                }
            }
        }
    }

    // Selecting (or clearing) the room type always clears the accommodation
    pub fn select_room_type(&self, room_type_id: Option<Id>) {
        let valid = room_type_id
            .map(|id| valid_accommodations_for_id(id, &self.store.room_types(), &self.accommodations))
            .unwrap_or_default();

        let mut state = self.state.lock();
        state.values.room_type_id = room_type_id;
        state.values.accommodation_id = None;
        state.valid_accommodations = valid;
    }

    // Refuses accommodations the selector does not offer
    pub fn select_accommodation(&self, accommodation_id: Option<Id>) -> bool {
        let mut state = self.state.lock();
        match accommodation_id {
            None => {
                state.values.accommodation_id = None;
                true
            }
            Some(id) if state.valid_accommodations.iter().any(|a| a.id == id) => {
                state.values.accommodation_id = Some(id);
                true
            }
            Some(_) => false,
        }
    }

    pub fn set_quantity(&self, quantity: impl Into<String>) {
        self.state.lock().values.quantity = quantity.into();
    }

    pub fn dismiss_alert(&self) {
        self.state.lock().alert.dismiss();
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let data = {
            let mut state = self.state.lock();
            if matches!(state.phase, FormPhase::InitialLoading | FormPhase::Submitting) {
                return SubmitOutcome::Busy;
            }
            if state.hotel.is_none() {
                return SubmitOutcome::NotFound;
            }
            match state
                .values
                .validate(self.hotel_id, &state.valid_accommodations)
            {
                Ok(data) => {
                    state.errors = FieldErrors::default();
                    state.phase = FormPhase::Submitting;
                    data
                }
                Err(errors) => {
                    state.errors = errors;
                    state.phase = FormPhase::Ready;
                    return SubmitOutcome::Invalid;
                }
            }
        };

        let token = self.mount.token();
        let api = self.store.api();
        let result = match self.mode {
            FormMode::Create => api.create_hotel_room(&data).await,
            FormMode::Edit(id) => api.update_hotel_room(id, &data).await,
        };

        match result {
            Ok(_) => {
                let message = match self.mode {
                    FormMode::Create => "Configuración de habitación creada correctamente.",
                    FormMode::Edit(_) => "Configuración de habitación actualizada correctamente.",
                };
                token.apply(&self.state, |state| {
                    state.alert.show(Alert::success(message));
                    state.phase = FormPhase::SubmittedSuccess;
                });
                SubmitOutcome::Saved {
                    redirect: Some(Redirect {
                        to: self.return_route(),
                        after: self.config.redirect_delay,
                    }),
                }
            }
            Err(err) => {
                error!(hotel_id = self.hotel_id, error = %err, "error saving room configuration");
                token.apply(&self.state, |state| {
                    state.alert.show(Alert::danger(failure_message(&err, SAVE_ERROR)));
                    state.phase = FormPhase::SubmittedError;
                });
                SubmitOutcome::Failed(err)
            }
        }
    }

    pub fn unmount(&self) {
        self.mount.unmount();
    }
}
