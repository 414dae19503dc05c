use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use hotel_inventory_console::{
    api::{Backend, ClientConfig, RestClient, DEFAULT_BASE_URL},
    console::{Console, RoomInput, Screen, StdinConfirm},
    models::Id,
    render::Palette,
    routes::Route,
    validation::HotelField,
    views::{Confirm, ViewConfig, REDIRECT_DELAY},
};
use tracing::debug;

#[derive(Debug, Parser)]
#[command(version, about = "Hotel and room inventory console")]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Base URL of the hotel API
    #[arg(long, env = "HOTEL_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    api_url: String,

    /// Request timeout in milliseconds (transport default when omitted)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Pause before following a redirect after a successful save
    #[arg(long, default_value_t = REDIRECT_DELAY.as_millis() as u64, global = true)]
    redirect_delay_ms: u64,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let console = self.console()?;
        console.start().await;

        let screen = self
            .command
            .unwrap_or_default()
            .run(&console)
            .await;

        println!("{}", screen.text);
        if !screen.ok {
            std::process::exit(1);
        }
        Ok(())
    }

    fn console(&self) -> anyhow::Result<Console> {
        let config = ClientConfig {
            base_url: self.api_url.clone(),
            timeout_ms: self.timeout_ms,
        };
        let client = RestClient::new(config).context("Failed to create API client")?;
        debug!(base_url = client.base_url(), "using hotel API");
        let api: Arc<dyn Backend> = Arc::new(client);

        let confirm: Box<dyn Confirm> = if self.yes {
            Box::new(|_: &str| true)
        } else {
            Box::new(StdinConfirm)
        };

        let config = ViewConfig {
            redirect_delay: Duration::from_millis(self.redirect_delay_ms),
        };
        Ok(Console::new(api, config, confirm, Palette::new(!self.no_color)))
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render the screen at a route (default: the hotel list)
    Show {
        #[arg(default_value = "/")]
        route: Route,
    },

    /// Create, edit or delete hotels
    #[command(subcommand)]
    Hotel(HotelCommand),

    /// Create, edit or delete a hotel's room configurations
    #[command(subcommand)]
    Room(RoomCommand),

    /// List the room types known to the backend
    RoomTypes,

    /// List the accommodations known to the backend
    Accommodations,
}

impl Default for Command {
    fn default() -> Self {
        Self::Show { route: Route::HOME }
    }
}

impl Command {
    async fn run(self, console: &Console) -> Screen {
        match self {
            Self::Show { route } => Screen {
                text: console.show(&route).await,
                ok: true,
            },
            Self::Hotel(command) => command.run(console).await,
            Self::Room(command) => command.run(console).await,
            Self::RoomTypes => Screen {
                text: console.room_types(),
                ok: true,
            },
            Self::Accommodations => Screen {
                text: console.accommodations(),
                ok: true,
            },
        }
    }
}

#[derive(Debug, Default, Args)]
pub struct HotelFields {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    address: Option<String>,

    #[arg(long)]
    city: Option<String>,

    #[arg(long)]
    nit: Option<String>,

    /// Kept as text so the form reports non-numeric input
    #[arg(long, allow_hyphen_values = true)]
    total_rooms: Option<String>,
}

impl HotelFields {
    fn into_pairs(self) -> Vec<(HotelField, String)> {
        [
            (HotelField::Name, self.name),
            (HotelField::Address, self.address),
            (HotelField::City, self.city),
            (HotelField::Nit, self.nit),
            (HotelField::TotalRooms, self.total_rooms),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|value| (field, value)))
        .collect()
    }
}

#[derive(Debug, Subcommand)]
pub enum HotelCommand {
    /// Submit the new-hotel form
    Create(HotelFields),

    /// Load a hotel into the edit form, change the given fields and submit
    Edit {
        id: Id,

        #[command(flatten)]
        fields: HotelFields,
    },

    /// Delete a hotel after confirmation
    Delete { id: Id },
}

impl HotelCommand {
    async fn run(self, console: &Console) -> Screen {
        match self {
            Self::Create(fields) => console.create_hotel(&fields.into_pairs()).await,
            Self::Edit { id, fields } => console.edit_hotel(id, &fields.into_pairs()).await,
            Self::Delete { id } => console.delete_hotel(id).await,
        }
    }
}

#[derive(Debug, Default, Args)]
pub struct RoomFields {
    /// Room type id
    #[arg(long)]
    room_type: Option<Id>,

    /// Accommodation id; must be valid for the room type
    #[arg(long)]
    accommodation: Option<Id>,

    #[arg(long, allow_hyphen_values = true)]
    quantity: Option<String>,
}

impl From<RoomFields> for RoomInput {
    fn from(fields: RoomFields) -> Self {
        RoomInput {
            room_type_id: fields.room_type,
            accommodation_id: fields.accommodation,
            quantity: fields.quantity,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum RoomCommand {
    /// Submit the new room configuration form for a hotel
    Create {
        hotel_id: Id,

        #[command(flatten)]
        fields: RoomFields,
    },

    /// Edit one room configuration of a hotel
    Edit {
        hotel_id: Id,
        id: Id,

        #[command(flatten)]
        fields: RoomFields,
    },

    /// Delete a room configuration after confirmation
    Delete { hotel_id: Id, id: Id },
}

impl RoomCommand {
    async fn run(self, console: &Console) -> Screen {
        match self {
            Self::Create { hotel_id, fields } => {
                console.create_room(hotel_id, &fields.into()).await
            }
            Self::Edit {
                hotel_id,
                id,
                fields,
            } => console.edit_room(hotel_id, id, &fields.into()).await,
            Self::Delete { hotel_id, id } => console.delete_room(hotel_id, id).await,
        }
    }
}
