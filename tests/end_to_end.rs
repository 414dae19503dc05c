// Whole-application scenarios against the in-memory backend

use std::sync::Arc;
use std::time::Duration;

use hotel_inventory_console::{
    alert::Alert,
    memory::InMemoryBackend,
    routes::Route,
    store::AppState,
    validation::HotelField,
    views::{
        DeleteOutcome, FormMode, HotelFormView, HotelListView, HotelRoomFormView,
        HotelRoomsListView, ListStatus, Redirect, SubmitOutcome, ViewConfig,
    },
};
use test_case::test_case;
use tokio_test::assert_ok;

const REDIRECT_AFTER: Duration = Duration::from_millis(20);

fn config() -> ViewConfig {
    ViewConfig {
        redirect_delay: REDIRECT_AFTER,
    }
}

async fn started(backend: Arc<InMemoryBackend>) -> Arc<AppState> {
    let store = Arc::new(AppState::new(backend));
    assert_ok!(store.initialize().await);
    store
}

fn fill_sol(view: &HotelFormView, total_rooms: &str) {
    view.set_field(HotelField::Name, "Sol");
    view.set_field(HotelField::Address, "Calle 1");
    view.set_field(HotelField::City, "Cali");
    view.set_field(HotelField::Nit, "123");
    view.set_field(HotelField::TotalRooms, total_rooms);
}

#[tokio::test]
async fn creating_a_hotel_updates_the_list_and_redirects() {
    let backend = Arc::new(InMemoryBackend::new());
    let store = started(backend.clone()).await;
    let list = HotelListView::new(store.clone());
    assert_eq!(list.model().status, ListStatus::Empty);

    let form = HotelFormView::new(store.clone(), FormMode::Create, config());
    form.load().await;
    fill_sol(&form, "20");

    let outcome = form.submit().await;
    assert_eq!(
        outcome,
        SubmitOutcome::Saved {
            redirect: Some(Redirect {
                to: Route::Hotels,
                after: REDIRECT_AFTER,
            }),
        }
    );
    assert_eq!(
        form.state().alert.current(),
        Some(&Alert::success("Hotel creado correctamente."))
    );

    // The list reads the store directly, no refetch needed
    let ListStatus::Rows(hotels) = list.model().status else {
        panic!("expected the new hotel in the list");
    };
    assert_eq!(hotels.len(), 1);
    assert_eq!(hotels[0].name, "Sol");
    assert_eq!(hotels[0].total_rooms, 20);
    assert_eq!(backend.hotel_count(), 1);
}

#[test_case("0"; "zero")]
#[test_case("-1"; "negative")]
#[test_case("1.5"; "fractional")]
#[tokio::test]
async fn non_positive_or_fractional_room_totals_are_rejected(total_rooms: &str) {
    let backend = Arc::new(InMemoryBackend::new());
    let store = started(backend.clone()).await;
    let form = HotelFormView::new(store.clone(), FormMode::Create, config());
    fill_sol(&form, total_rooms);
    let requests = backend.request_count();

    assert_eq!(form.submit().await, SubmitOutcome::Invalid);
    assert!(form.state().errors.get("total_rooms").is_some());
    assert_eq!(backend.request_count(), requests);
    assert!(store.hotels().is_empty());
}

#[tokio::test]
async fn junior_room_type_restricts_and_clears_accommodation() {
    let backend = Arc::new(InMemoryBackend::seeded());
    let store = started(backend).await;
    let form = HotelRoomFormView::new(store, 2, FormMode::Create, config());
    form.load().await;

    form.select_room_type(Some(1));
    assert!(form.select_accommodation(Some(1)));

    form.select_room_type(Some(2));
    let state = form.state();
    assert_eq!(state.values.accommodation_id, None);
    let names: Vec<&str> = state
        .valid_accommodations
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(names, vec!["Triple", "Cuádruple"]);
    assert!(!form.select_accommodation(Some(1)));
}

#[tokio::test]
async fn deleting_a_room_configuration_removes_exactly_that_row() {
    let backend = Arc::new(InMemoryBackend::seeded());
    let list = HotelRoomsListView::new(backend.clone(), 1);
    list.load().await;

    let before: Vec<u64> = list.state().rooms.iter().map(|r| r.id).collect();
    assert_eq!(before.len(), 2);
    let capacity = list.capacity().expect("hotel loaded");
    assert_eq!((capacity.configured, capacity.available), (37, 5));

    let outcome = list.delete(before[0], &|_: &str| true).await;
    assert_eq!(outcome, DeleteOutcome::Deleted);

    let after: Vec<u64> = list.state().rooms.iter().map(|r| r.id).collect();
    assert_eq!(after, vec![before[1]]);
    assert_eq!(list.capacity().map(|c| c.available), Some(30));
}

#[tokio::test]
async fn room_configuration_round_trip_through_the_forms() {
    let backend = Arc::new(InMemoryBackend::seeded());
    let store = started(backend.clone()).await;

    let form = HotelRoomFormView::new(store.clone(), 2, FormMode::Create, config());
    form.load().await;
    form.select_room_type(Some(3));
    assert!(form.select_accommodation(Some(3)));
    form.set_quantity("10");
    let SubmitOutcome::Saved {
        redirect: Some(redirect),
    } = form.submit().await
    else {
        panic!("expected a saved configuration");
    };
    assert_eq!(redirect.to, Route::HotelRooms(2));

    tokio::time::sleep(redirect.after).await;
    let list = HotelRoomsListView::new(store.api(), 2);
    list.load().await;
    let ListStatus::Rows(rooms) = list.status() else {
        panic!("expected one configuration");
    };
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].room_type_name(), "Suite");
    assert_eq!(rooms[0].accommodation_name(), "Triple");

    let edit = HotelRoomFormView::new(store, 2, FormMode::Edit(rooms[0].id), config());
    edit.load().await;
    edit.set_quantity("30");
    assert!(matches!(edit.submit().await, SubmitOutcome::Saved { .. }));

    list.load().await;
    assert_eq!(list.capacity().map(|c| c.available), Some(0));
    assert_eq!(list.add_room_route(), None);
}

#[tokio::test]
async fn hotel_delete_after_unmount_still_updates_the_store() {
    let backend = Arc::new(InMemoryBackend::seeded());
    let store = started(backend.clone()).await;
    backend.set_delay(30);

    let view = Arc::new(HotelListView::new(store.clone()));
    let task = {
        let view = Arc::clone(&view);
        tokio::spawn(async move { view.delete(2, &|_: &str| true).await })
    };
    tokio::time::sleep(Duration::from_millis(5)).await;
    view.unmount();

    assert_eq!(task.await.unwrap(), DeleteOutcome::Deleted);
    assert!(store.hotel(2).is_none());
    assert_eq!(view.model().alert, None);
}
