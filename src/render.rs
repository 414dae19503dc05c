// Plain-text rendering of the view models for the terminal console.
// Colors are applied only when the palette enables them.

use owo_colors::OwoColorize;
use std::fmt::Write;

use crate::alert::{Alert, AlertKind};
use crate::models::{Hotel, HotelRoom, RoomType};
use crate::rules::CapacitySummary;
use crate::validation::{FieldErrors, HotelField, HotelRoomField};
use crate::views::hotel_list::EMPTY_MESSAGE as NO_HOTELS;
use crate::views::room_list::{EMPTY_MESSAGE as NO_ROOMS, NOT_FOUND_MESSAGE};
use crate::views::{
    FormPhase, HotelFormState, HotelListModel, HotelRoomFormState, HotelRoomsListState, ListStatus,
    NavbarModel,
};

pub const LOADING: &str = "Cargando...";

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub color: bool,
}

impl Palette {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn success(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn danger(&self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn info(&self, text: &str) -> String {
        if self.color {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

pub fn navbar(model: &NavbarModel, palette: Palette) -> String {
    let links: Vec<String> = model
        .links
        .iter()
        .map(|link| {
            if link.active {
                palette.bold(&format!("[{}]", link.label))
            } else {
                link.label.to_string()
            }
        })
        .collect();
    format!("{}  {}", palette.bold(model.brand), links.join("  "))
}

pub fn alert(alert: &Alert, palette: Palette) -> String {
    match alert.kind {
        AlertKind::Success => palette.success(&format!("✔ {}", alert.message)),
        AlertKind::Danger => palette.danger(&format!("✖ {}", alert.message)),
        AlertKind::Info => palette.info(&format!("ℹ {}", alert.message)),
    }
}

fn table_line(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

// Left-aligned columns sized to the widest cell
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut out = format!("{}\n{}", table_line(headers, &widths), separator.join("  "));
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push('\n');
        out.push_str(&table_line(&cells, &widths));
    }
    out
}

fn hotel_row(hotel: &Hotel) -> Vec<String> {
    vec![
        hotel.id.to_string(),
        hotel.name.clone(),
        hotel.city.clone(),
        hotel.address.clone(),
        hotel.nit.clone(),
        hotel.total_rooms.to_string(),
    ]
}

fn room_row(room: &HotelRoom) -> Vec<String> {
    vec![
        room.id.to_string(),
        room.room_type_name().to_string(),
        room.accommodation_name().to_string(),
        room.quantity.to_string(),
    ]
}

pub fn hotel_list(model: &HotelListModel, palette: Palette) -> String {
    let mut out = palette.bold("Listado de Hoteles");

    // An initialization failure replaces the table entirely
    if let Some(banner) = &model.banner {
        let _ = write!(out, "\n\n{}", palette.danger(banner));
        return out;
    }
    if let Some(current) = &model.alert {
        let _ = write!(out, "\n\n{}", alert(current, palette));
    }

    out.push_str("\n\n");
    match &model.status {
        ListStatus::Loading => out.push_str(&palette.dim(LOADING)),
        ListStatus::Empty => out.push_str(&palette.info(NO_HOTELS)),
        ListStatus::Rows(hotels) => {
            let rows: Vec<Vec<String>> = hotels.iter().map(hotel_row).collect();
            out.push_str(&table(
                &["ID", "Nombre", "Ciudad", "Dirección", "NIT", "Habitaciones"],
                &rows,
            ));
        }
    }
    out
}

pub fn capacity(summary: &CapacitySummary, palette: Palette) -> String {
    let available = summary.available.to_string();
    let available = if summary.is_flagged() {
        palette.danger(&available)
    } else {
        palette.success(&available)
    };
    format!(
        "Resumen de Habitaciones\n  Total de habitaciones: {}\n  Habitaciones configuradas: {}\n  Habitaciones disponibles: {}",
        summary.total, summary.configured, available
    )
}

pub fn room_list(
    state: &HotelRoomsListState,
    status: &ListStatus<HotelRoom>,
    summary: Option<&CapacitySummary>,
    palette: Palette,
) -> String {
    if state.loading {
        return palette.dim(LOADING);
    }

    let mut out = String::new();
    if let Some(current) = state.alert.current() {
        let _ = writeln!(out, "{}\n", alert(current, palette));
    }

    let (Some(hotel), Some(summary)) = (&state.hotel, summary) else {
        out.push_str(&palette.danger(NOT_FOUND_MESSAGE));
        return out;
    };

    let _ = write!(
        out,
        "{}\n{}\n\n{}\n\n",
        palette.bold(&format!("Habitaciones - {}", hotel.name)),
        palette.dim(&format!(
            "Ciudad: {} | Dirección: {} | NIT: {}",
            hotel.city, hotel.address, hotel.nit
        )),
        capacity(summary, palette),
    );

    match status {
        ListStatus::Rows(rooms) => {
            let rows: Vec<Vec<String>> = rooms.iter().map(room_row).collect();
            out.push_str(&table(
                &["ID", "Tipo de Habitación", "Acomodación", "Cantidad"],
                &rows,
            ));
        }
        _ => out.push_str(&palette.info(NO_ROOMS)),
    }
    out
}

pub fn hotel_form(title: &str, state: &HotelFormState, palette: Palette) -> String {
    let mut out = palette.bold(title);
    if let Some(current) = state.alert.current() {
        let _ = write!(out, "\n\n{}", alert(current, palette));
    }
    out.push('\n');
    for field in HotelField::ALL {
        let _ = write!(
            out,
            "\n  {}: {}{}",
            field.label(),
            state.values.get(field),
            field_error(&state.errors, field.key(), palette)
        );
    }
    out
}

// Inline error for one field, or nothing
fn field_error(errors: &FieldErrors, key: &str, palette: Palette) -> String {
    errors
        .get(key)
        .map(|message| format!("  {}", palette.danger(message)))
        .unwrap_or_default()
}

pub fn room_form(
    title: &str,
    state: &HotelRoomFormState,
    room_types: &[RoomType],
    palette: Palette,
) -> String {
    let mut out = palette.bold(title);
    if state.phase == FormPhase::InitialLoading {
        let _ = write!(out, "\n\n{}", palette.dim(LOADING));
        return out;
    }
    if let Some(hotel) = &state.hotel {
        let _ = write!(out, "\nHotel: {}", hotel.name);
    }
    if let Some(current) = state.alert.current() {
        let _ = write!(out, "\n\n{}", alert(current, palette));
    }
    // No form without the hotel it belongs to
    if state.hotel.is_none() {
        let _ = write!(out, "\n\n{}", palette.danger(NOT_FOUND_MESSAGE));
        return out;
    }

    let options = |selected: Option<u64>, items: Vec<(u64, &str)>| {
        items
            .into_iter()
            .map(|(id, name)| {
                if Some(id) == selected {
                    palette.bold(&format!("[{id}] {name}"))
                } else {
                    format!(" {id}  {name}")
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    };

    let room_type_options = options(
        state.values.room_type_id,
        room_types.iter().map(|t| (t.id, t.name.as_str())).collect(),
    );
    let accommodation_options = if state.accommodation_selector_enabled() {
        options(
            state.values.accommodation_id,
            state
                .valid_accommodations
                .iter()
                .map(|a| (a.id, a.name.as_str()))
                .collect(),
        )
    } else {
        palette.dim("Seleccione un tipo de habitación")
    };

    out.push('\n');
    for field in HotelRoomField::ALL {
        let value = match field {
            HotelRoomField::RoomType => room_type_options.clone(),
            HotelRoomField::Accommodation => accommodation_options.clone(),
            HotelRoomField::Quantity => state.values.quantity.clone(),
        };
        let _ = write!(
            out,
            "\n  {}: {}{}",
            field.label(),
            value,
            field_error(&state.errors, field.key(), palette)
        );
    }
    out
}
