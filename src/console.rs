// Terminal shell over the view models. Every screen is built fresh for a
// route, loaded, rendered and dropped (which unmounts it).

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::{info, warn};

use crate::api::Backend;
use crate::models::Id;
use crate::render::{self, Palette};
use crate::routes::Route;
use crate::store::AppState;
use crate::validation::HotelField;
use crate::views::{
    Confirm, DeleteOutcome, FormMode, HotelFormView, HotelListView, HotelRoomFormView,
    HotelRoomsListView, NavbarModel, SubmitOutcome, ViewConfig,
};

// Asks on stderr and reads the answer from stdin
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirm;

impl StdinConfirm {
    fn read_answer() -> Option<String> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).ok()?;
        Some(line)
    }
}

// Runs a blocking call without stalling the async worker it is called from.
// `block_in_place` is unavailable on a current-thread runtime, where the call
// just runs inline.
fn run_blocking<T>(f: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("\n{prompt} (y/N) ");
        let _ = io::stderr().flush();

        let Some(line) = run_blocking(Self::read_answer) else {
            return false;
        };
        let answer = line.trim();
        answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("s")
    }
}

// Output of one console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub text: String,
    // False when the command ended on a validation or backend error
    pub ok: bool,
}

impl Screen {
    fn new(text: String, ok: bool) -> Self {
        Self { text, ok }
    }
}

// Field values for a room configuration; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomInput {
    pub room_type_id: Option<Id>,
    pub accommodation_id: Option<Id>,
    pub quantity: Option<String>,
}

pub struct Console {
    store: Arc<AppState>,
    config: ViewConfig,
    confirm: Box<dyn Confirm>,
    palette: Palette,
}

impl Console {
    pub fn new(
        api: Arc<dyn Backend>,
        config: ViewConfig,
        confirm: Box<dyn Confirm>,
        palette: Palette,
    ) -> Self {
        Self {
            store: Arc::new(AppState::new(api)),
            config,
            confirm,
            palette,
        }
    }

    pub fn store(&self) -> &Arc<AppState> {
        &self.store
    }

    // Loads the shared collections. A failure is not fatal: the hotel list
    // shows the banner and the other screens still work.
    pub async fn start(&self) {
        match self.store.initialize().await {
            Ok(()) => info!(hotels = self.store.hotels().len(), "store initialized"),
            Err(err) => warn!(error = %err, "store initialization failed"),
        }
    }

    fn frame(&self, route: &Route, body: String) -> String {
        format!(
            "{}\n\n{}",
            render::navbar(&NavbarModel::for_route(route), self.palette),
            body
        )
    }

    pub async fn show(&self, route: &Route) -> String {
        let body = match *route {
            Route::Hotels => {
                let view = HotelListView::new(self.store.clone());
                render::hotel_list(&view.model(), self.palette)
            }
            Route::NewHotel => self.hotel_form(FormMode::Create).await.1,
            Route::EditHotel(id) => self.hotel_form(FormMode::Edit(id)).await.1,
            Route::HotelRooms(hotel_id) => {
                let view = HotelRoomsListView::new(self.store.api(), hotel_id);
                view.load().await;
                self.render_room_list(&view)
            }
            Route::NewHotelRoom(hotel_id) => self.room_form(hotel_id, FormMode::Create).await.1,
            Route::EditHotelRoom { hotel_id, id } => {
                self.room_form(hotel_id, FormMode::Edit(id)).await.1
            }
        };
        self.frame(route, body)
    }

    async fn hotel_form(&self, mode: FormMode) -> (HotelFormView, String) {
        let view = HotelFormView::new(self.store.clone(), mode, self.config.clone());
        view.load().await;
        let text = render::hotel_form(view.title(), &view.state(), self.palette);
        (view, text)
    }

    async fn room_form(&self, hotel_id: Id, mode: FormMode) -> (HotelRoomFormView, String) {
        let view = HotelRoomFormView::new(self.store.clone(), hotel_id, mode, self.config.clone());
        view.load().await;
        let text = self.render_room_form(&view);
        (view, text)
    }

    fn render_room_list(&self, view: &HotelRoomsListView) -> String {
        render::room_list(
            &view.state(),
            &view.status(),
            view.capacity().as_ref(),
            self.palette,
        )
    }

    fn render_room_form(&self, view: &HotelRoomFormView) -> String {
        render::room_form(
            view.title(),
            &view.state(),
            &view.room_type_options(),
            self.palette,
        )
    }

    // Waits out the redirect delay and renders the destination
    async fn follow(&self, outcome: &SubmitOutcome, text: String) -> String {
        let SubmitOutcome::Saved {
            redirect: Some(redirect),
        } = outcome
        else {
            return text;
        };
        info!(to = %redirect.to, after_ms = redirect.after.as_millis() as u64, "redirecting");
        tokio::time::sleep(redirect.after).await;
        format!("{text}\n\n{}", self.show(&redirect.to).await)
    }

    async fn submit_hotel(&self, view: HotelFormView, route: Route) -> Screen {
        let outcome = view.submit().await;
        let text = self.frame(
            &route,
            render::hotel_form(view.title(), &view.state(), self.palette),
        );
        drop(view);
        let ok = matches!(outcome, SubmitOutcome::Saved { .. });
        Screen::new(self.follow(&outcome, text).await, ok)
    }

    pub async fn create_hotel(&self, fields: &[(HotelField, String)]) -> Screen {
        let (view, _) = self.hotel_form(FormMode::Create).await;
        for (field, value) in fields {
            view.set_field(*field, value.as_str());
        }
        self.submit_hotel(view, Route::NewHotel).await
    }

    // Fields not listed keep the values loaded from the backend
    pub async fn edit_hotel(&self, id: Id, fields: &[(HotelField, String)]) -> Screen {
        let (view, text) = self.hotel_form(FormMode::Edit(id)).await;
        if view.state().alert.is_visible() {
            return Screen::new(self.frame(&Route::EditHotel(id), text), false);
        }
        for (field, value) in fields {
            view.set_field(*field, value.as_str());
        }
        self.submit_hotel(view, Route::EditHotel(id)).await
    }

    pub async fn delete_hotel(&self, id: Id) -> Screen {
        let view = HotelListView::new(self.store.clone());
        let outcome = view.delete(id, self.confirm.as_ref()).await;
        let text = self.frame(
            &Route::Hotels,
            render::hotel_list(&view.model(), self.palette),
        );
        Screen::new(text, outcome == DeleteOutcome::Deleted)
    }

    async fn submit_room(&self, view: HotelRoomFormView, input: &RoomInput, route: Route) -> Screen {
        if let Some(room_type_id) = input.room_type_id {
            view.select_room_type(Some(room_type_id));
        }
        if let Some(accommodation_id) = input.accommodation_id {
            if !view.select_accommodation(Some(accommodation_id)) {
                warn!(accommodation_id, "accommodation not offered for the selected room type");
            }
        }
        if let Some(quantity) = &input.quantity {
            view.set_quantity(quantity.as_str());
        }

        let outcome = view.submit().await;
        let text = self.frame(&route, self.render_room_form(&view));
        drop(view);
        let ok = matches!(outcome, SubmitOutcome::Saved { .. });
        Screen::new(self.follow(&outcome, text).await, ok)
    }

    pub async fn create_room(&self, hotel_id: Id, input: &RoomInput) -> Screen {
        let route = Route::NewHotelRoom(hotel_id);
        let (view, text) = self.room_form(hotel_id, FormMode::Create).await;
        if view.state().hotel.is_none() {
            return Screen::new(self.frame(&route, text), false);
        }
        self.submit_room(view, input, route).await
    }

    // Changing the room type clears the accommodation, so a new room type
    // needs a new accommodation as well
    pub async fn edit_room(&self, hotel_id: Id, id: Id, input: &RoomInput) -> Screen {
        let route = Route::EditHotelRoom { hotel_id, id };
        let (view, text) = self.room_form(hotel_id, FormMode::Edit(id)).await;
        let state = view.state();
        if state.hotel.is_none() || state.alert.is_visible() {
            return Screen::new(self.frame(&route, text), false);
        }
        self.submit_room(view, input, route).await
    }

    pub async fn delete_room(&self, hotel_id: Id, id: Id) -> Screen {
        let view = HotelRoomsListView::new(self.store.api(), hotel_id);
        view.load().await;
        let outcome = view.delete(id, self.confirm.as_ref()).await;
        let text = self.frame(&Route::HotelRooms(hotel_id), self.render_room_list(&view));
        Screen::new(text, outcome == DeleteOutcome::Deleted)
    }

    pub fn room_types(&self) -> String {
        self.store
            .room_types()
            .iter()
            .map(|room_type| format!("{:>3}  {}", room_type.id, room_type.name))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn accommodations(&self) -> String {
        self.store
            .accommodations()
            .iter()
            .map(|accommodation| format!("{:>3}  {}", accommodation.id, accommodation.name))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
