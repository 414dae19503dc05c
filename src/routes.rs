// Navigable console routes

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::models::Id;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    #[error("Invalid identifier in route {route}: {segment}")]
    InvalidId { route: String, segment: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Hotels,
    NewHotel,
    EditHotel(Id),
    HotelRooms(Id),
    NewHotelRoom(Id),
    EditHotelRoom { hotel_id: Id, id: Id },
}

impl Route {
    // Root of the console; `/` redirects here
    pub const HOME: Route = Route::Hotels;

    pub fn path(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Hotels => write!(f, "/hotels"),
            Route::NewHotel => write!(f, "/hotels/new"),
            Route::EditHotel(id) => write!(f, "/hotels/edit/{id}"),
            Route::HotelRooms(id) => write!(f, "/hotels/{id}/rooms"),
            Route::NewHotelRoom(id) => write!(f, "/hotels/{id}/rooms/new"),
            Route::EditHotelRoom { hotel_id, id } => {
                write!(f, "/hotels/{hotel_id}/rooms/edit/{id}")
            }
        }
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = path
            .trim()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        let id = |segment: &str| {
            segment.parse::<Id>().map_err(|_| RouteError::InvalidId {
                route: path.to_string(),
                segment: segment.to_string(),
            })
        };

        match segments.as_slice() {
            [] => Ok(Route::HOME),
            ["hotels"] => Ok(Route::Hotels),
            ["hotels", "new"] => Ok(Route::NewHotel),
            ["hotels", "edit", hotel] => Ok(Route::EditHotel(id(*hotel)?)),
            ["hotels", hotel, "rooms"] => Ok(Route::HotelRooms(id(*hotel)?)),
            ["hotels", hotel, "rooms", "new"] => Ok(Route::NewHotelRoom(id(*hotel)?)),
            ["hotels", hotel, "rooms", "edit", room] => Ok(Route::EditHotelRoom {
                hotel_id: id(*hotel)?,
                id: id(*room)?,
            }),
            _ => Err(RouteError::UnknownRoute(path.to_string())),
        }
    }
}
