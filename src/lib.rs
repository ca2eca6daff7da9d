pub mod config;

pub use config::RouteConfig;

pub mod network;

pub use network::{Leg, RouteGraph};

pub mod timetable;

pub use timetable::TimetableValidator;

pub mod ingest;

pub use ingest::{load_network, ScheduleIngester};

pub mod queue;

pub mod dijkstra;

pub use dijkstra::SearchOutcome;

pub mod journey;

pub use journey::{Itinerary, ItineraryRecord, Journey};

pub mod output;

pub use output::{CollectingSink, ItinerarySink, TsvSink};

pub mod error;

pub use error::{Error, Result};

pub mod utils;
