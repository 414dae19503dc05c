// Hotel list screen. Rows come straight from the shared store; the view only
// owns its alert.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::error;

use super::{Confirm, DeleteOutcome, ListStatus};
use crate::alert::{Alert, AlertSlot};
use crate::models::{Hotel, Id};
use crate::mount::Mount;
use crate::store::AppState;

pub const DELETE_PROMPT: &str = "¿Estás seguro de que deseas eliminar este hotel?";
pub const EMPTY_MESSAGE: &str = "No hay hoteles registrados.";

#[derive(Debug, Clone, PartialEq)]
pub struct HotelListModel {
    // Initialization failure; hides the table
    pub banner: Option<String>,
    pub alert: Option<Alert>,
    pub status: ListStatus<Hotel>,
}

pub struct HotelListView {
    store: Arc<AppState>,
    alert: Arc<Mutex<AlertSlot>>,
    mount: Mount,
}

impl HotelListView {
    pub fn new(store: Arc<AppState>) -> Self {
        Self {
            store,
            alert: Arc::new(Mutex::new(AlertSlot::default())),
            mount: Mount::new(),
        }
    }

    pub fn model(&self) -> HotelListModel {
        let snapshot = self.store.snapshot();
        let status = if snapshot.loading {
            ListStatus::Loading
        } else {
            ListStatus::from_rows(snapshot.hotels)
        };

        HotelListModel {
            banner: snapshot.error,
            alert: self.alert.lock().current().cloned(),
            status,
        }
    }

    pub fn dismiss_alert(&self) {
        self.alert.lock().dismiss();
    }

    // The store is updated once the backend acknowledges the delete, whether
    // or not this view is still mounted
    pub async fn delete(&self, id: Id, confirm: &dyn Confirm) -> DeleteOutcome {
        if !confirm.confirm(DELETE_PROMPT) {
            return DeleteOutcome::Cancelled;
        }

        let token = self.mount.token();
        match self.store.api().delete_hotel(id).await {
            Ok(()) => {
                self.store.remove_hotel(id);
                token.apply(&self.alert, |alert| {
                    alert.show(Alert::success("Hotel eliminado correctamente."))
                });
                DeleteOutcome::Deleted
            }
            Err(err) => {
                error!(hotel_id = id, error = %err, "error deleting hotel");
                token.apply(&self.alert, |alert| {
                    alert.show(Alert::danger(
                        "Error al eliminar el hotel. Por favor, inténtalo de nuevo.",
                    ))
                });
                DeleteOutcome::Failed(err)
            }
        }
    }

    pub fn unmount(&self) {
        self.mount.unmount();
    }
}
