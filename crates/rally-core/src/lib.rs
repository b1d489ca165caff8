pub mod alert;
pub mod auth;
pub mod calendar;
pub mod campaigns;
pub mod config;
pub mod controller;
pub mod error;
pub mod forms;
pub mod host;
pub mod loader;
pub mod router;
pub mod session;

pub use controller::UiController;
pub use error::FetchError;
pub use host::{
  CalendarHooks,
  CalendarWidget,
  Host,
  Page,
  Runtime,
  Transport
};
