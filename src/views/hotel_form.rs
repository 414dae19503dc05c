// Hotel create/edit form

use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tracing::error;

use super::{failure_message, FormMode, FormPhase, Redirect, SubmitOutcome, ViewConfig};
use crate::alert::{Alert, AlertSlot};
use crate::mount::Mount;
use crate::routes::Route;
use crate::store::AppState;
use crate::validation::{FieldErrors, HotelField, HotelFormValues};

pub const LOAD_ERROR: &str = "Error al cargar los datos del hotel.";
pub const SAVE_ERROR: &str = "Error al guardar el hotel. Por favor, inténtalo de nuevo.";

#[derive(Debug, Clone, PartialEq)]
pub struct HotelFormState {
    pub phase: FormPhase,
    pub values: HotelFormValues,
    pub errors: FieldErrors,
    pub alert: AlertSlot,
}

pub struct HotelFormView {
    mode: FormMode,
    store: Arc<AppState>,
    config: ViewConfig,
    state: Arc<Mutex<HotelFormState>>,
    mount: Mount,
}

impl HotelFormView {
    pub fn new(store: Arc<AppState>, mode: FormMode, config: ViewConfig) -> Self {
        let phase = if mode.is_edit() {
            FormPhase::InitialLoading
        } else {
            FormPhase::Ready
        };

        Self {
            mode,
            store,
            config,
            state: Arc::new(Mutex::new(HotelFormState {
                phase,
                values: HotelFormValues::default(),
                errors: FieldErrors::default(),
                alert: AlertSlot::default(),
            })),
            mount: Mount::new(),
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Nuevo Hotel",
            FormMode::Edit(_) => "Editar Hotel",
        }
    }

    pub fn state(&self) -> HotelFormState {
        self.state.lock().clone()
    }

    // Pre-populates the fields in edit mode; a no-op for new hotels
    pub fn load(&self) -> impl Future<Output = ()> + Send + 'static {
        let mode = self.mode;
        let api = self.store.api();
        let state = Arc::clone(&self.state);
        let token = self.mount.token();

        async move {
            let FormMode::Edit(id) = mode else {
                return;
            };
            let result = api.get_hotel(id).await;
            token.apply(&state, |state| {
                match result {
                    Ok(hotel) => state.values = HotelFormValues::from(&hotel.data()),
                    Err(err) => {
                        error!(hotel_id = id, error = %err, "error fetching hotel");
                        state.alert.show(Alert::danger(LOAD_ERROR));
                    }
                }
                state.phase = FormPhase::Ready;
            });
        }
    }

    pub fn set_field(&self, field: HotelField, value: impl Into<String>) {
        self.state.lock().values.set(field, value);
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
            match state.values.validate() {
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
            FormMode::Create => api.create_hotel(&data).await,
            FormMode::Edit(id) => api.update_hotel(id, &data).await,
        };

        match result {
            Ok(hotel) => {
                // Edits only replace a cached hotel; creates append
                match self.mode {
                    FormMode::Create => self.store.upsert_hotel(hotel),
                    FormMode::Edit(_) => {
                        self.store.replace_hotel(hotel);
                    }
                }
                let message = match self.mode {
                    FormMode::Create => "Hotel creado correctamente.",
                    FormMode::Edit(_) => "Hotel actualizado correctamente.",
                };
                token.apply(&self.state, |state| {
                    state.alert.show(Alert::success(message));
                    state.phase = FormPhase::SubmittedSuccess;
                });
                // Only new hotels navigate back to the list
                let redirect = (!self.mode.is_edit()).then(|| Redirect {
                    to: Route::Hotels,
                    after: self.config.redirect_delay,
                });
                SubmitOutcome::Saved { redirect }
            }
            Err(err) => {
                error!(error = %err, "error saving hotel");
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertKind;
    use crate::memory::InMemoryBackend;
    use crate::models::HotelData;
    use std::time::Duration;

    async fn store(backend: Arc<InMemoryBackend>) -> Arc<AppState> {
        let store = Arc::new(AppState::new(backend));
        store.initialize().await.unwrap();
        store
    }

    fn fill(view: &HotelFormView, total_rooms: &str) {
        view.set_field(HotelField::Name, "Sol");
        view.set_field(HotelField::Address, "Calle 1");
        view.set_field(HotelField::City, "Cali");
        view.set_field(HotelField::Nit, "123");
        view.set_field(HotelField::TotalRooms, total_rooms);
    }

    #[tokio::test]
    async fn test_invalid_submission_is_blocked() {
        let backend = Arc::new(InMemoryBackend::new());
        let view = HotelFormView::new(store(backend.clone()).await, FormMode::Create, ViewConfig::default());
        fill(&view, "0");
        let requests = backend.request_count();

        assert_eq!(view.submit().await, SubmitOutcome::Invalid);
        let state = view.state();
        assert_eq!(state.phase, FormPhase::Ready);
        assert_eq!(
            state.errors.get("total_rooms"),
            Some("El número de habitaciones debe ser positivo")
        );
        assert_eq!(backend.request_count(), requests);
    }

    #[tokio::test]
    async fn test_edit_mode_prefills_fields() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let view = HotelFormView::new(store(backend).await, FormMode::Edit(2), ViewConfig::default());
        assert_eq!(view.title(), "Editar Hotel");
        assert_eq!(view.state().phase, FormPhase::InitialLoading);
        assert_eq!(view.submit().await, SubmitOutcome::Busy);

        view.load().await;
        let state = view.state();
        assert_eq!(state.phase, FormPhase::Ready);
        assert_eq!(state.values.city, "San Andrés");
        assert_eq!(state.values.total_rooms, "30");
    }

    #[tokio::test]
    async fn test_edit_mode_load_failure_shows_alert() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let view = HotelFormView::new(store(backend).await, FormMode::Edit(77), ViewConfig::default());
        view.load().await;

        let state = view.state();
        assert_eq!(state.phase, FormPhase::Ready);
        assert_eq!(state.alert.current(), Some(&Alert::danger(LOAD_ERROR)));
    }

    #[tokio::test]
    async fn test_update_replaces_cached_hotel_without_redirect() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let store = store(backend).await;
        let view = HotelFormView::new(store.clone(), FormMode::Edit(2), ViewConfig::default());
        view.load().await;
        view.set_field(HotelField::TotalRooms, "35");

        assert_eq!(view.submit().await, SubmitOutcome::Saved { redirect: None });
        assert_eq!(store.hotel(2).map(|h| h.total_rooms), Some(35));
        assert_eq!(store.hotels().len(), 2);

        let state = view.state();
        assert_eq!(state.phase, FormPhase::SubmittedSuccess);
        assert_eq!(
            state.alert.current(),
            Some(&Alert::success("Hotel actualizado correctamente."))
        );
    }

    #[tokio::test]
    async fn test_update_of_uncached_hotel_does_not_append() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let store = store(backend.clone()).await;
        let extra = backend.insert_hotel(HotelData {
            name: "Nuevo".to_string(),
            address: "Calle 5".to_string(),
            city: "Cali".to_string(),
            nit: "555".to_string(),
            total_rooms: 8,
        });

        let view = HotelFormView::new(store.clone(), FormMode::Edit(extra.id), ViewConfig::default());
        view.load().await;
        view.set_field(HotelField::TotalRooms, "9");

        assert_eq!(view.submit().await, SubmitOutcome::Saved { redirect: None });
        assert_eq!(store.hotels().len(), 2);
        assert!(store.hotel(extra.id).is_none());
    }

    #[tokio::test]
    async fn test_server_rejection_uses_server_message() {
        let backend = Arc::new(InMemoryBackend::new());
        backend.insert_hotel(HotelData {
            name: "Otro".to_string(),
            address: "Calle 9".to_string(),
            city: "Cali".to_string(),
            nit: "123".to_string(),
            total_rooms: 5,
        });
        let view = HotelFormView::new(store(backend).await, FormMode::Create, ViewConfig::default());
        fill(&view, "20");

        assert!(matches!(view.submit().await, SubmitOutcome::Failed(_)));
        let state = view.state();
        assert_eq!(state.phase, FormPhase::SubmittedError);
        let alert = state.alert.current().unwrap();
        assert_eq!(alert.kind, AlertKind::Danger);
        assert_eq!(alert.message, "NIT 123 is already registered");
    }

    #[tokio::test]
    async fn test_rejection_without_message_uses_generic_text() {
        let backend = Arc::new(InMemoryBackend::new());
        let view = HotelFormView::new(store(backend.clone()).await, FormMode::Create, ViewConfig::default());
        fill(&view, "20");
        backend.reject_next_request(500, None);

        view.submit().await;
        assert_eq!(view.state().alert.current(), Some(&Alert::danger(SAVE_ERROR)));
    }

    #[tokio::test]
    async fn test_load_completion_after_unmount_is_discarded() {
        let backend = Arc::new(InMemoryBackend::seeded());
        let store = store(backend.clone()).await;
        backend.set_delay(50);

        let view = HotelFormView::new(store, FormMode::Edit(1), ViewConfig::default());
        let load = tokio::spawn(view.load());
        tokio::time::sleep(Duration::from_millis(5)).await;
        view.unmount();
        load.await.unwrap();

        let state = view.state();
        assert_eq!(state.phase, FormPhase::InitialLoading);
        assert_eq!(state.values, HotelFormValues::default());
    }
}
