use crate::routes::Route;

pub const BRAND: &str = "Hoteles Decameron";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub route: Route,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavbarModel {
    pub brand: &'static str,
    // The brand links to `/`, which lands on this route
    pub brand_route: Route,
    pub links: Vec<NavLink>,
}

impl NavbarModel {
    pub fn for_path(current_path: &str) -> Self {
        Self {
            brand: BRAND,
            brand_route: Route::HOME,
            links: vec![NavLink {
                label: "Hoteles",
                route: Route::Hotels,
                active: current_path.contains("/hotels"),
            }],
        }
    }

    pub fn for_route(route: &Route) -> Self {
        Self::for_path(&route.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hotels_link_active_on_nested_routes() {
        let navbar = NavbarModel::for_route(&Route::EditHotelRoom { hotel_id: 1, id: 2 });
        assert_eq!(navbar.brand, "Hoteles Decameron");
        assert!(navbar.links[0].active);
    }

    #[test]
    fn test_hotels_link_inactive_elsewhere() {
        let navbar = NavbarModel::for_path("/");
        assert!(!navbar.links[0].active);
        assert_eq!(navbar.brand_route, Route::Hotels);
    }
}
