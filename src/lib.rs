// Hotel and room-inventory console: view models over a REST hotel API

pub mod alert;
pub mod api;
pub mod console;
pub mod memory;
pub mod models;
pub mod mount;
pub mod render;
pub mod routes;
pub mod rules;
pub mod store;
pub mod validation;
pub mod views;

// Re-export key types for convenience
pub use api::{ApiError, Backend, ClientConfig, ClientError, RestClient};
pub use console::Console;
pub use memory::InMemoryBackend;
pub use models::{
    Accommodation, AccommodationKind, Hotel, HotelData, HotelRoom, HotelRoomData, Id, RoomType,
    RoomTypeKind,
};
pub use routes::{Route, RouteError};
pub use rules::{capacity_summary, valid_accommodations_for, CapacitySummary};
pub use store::AppState;
