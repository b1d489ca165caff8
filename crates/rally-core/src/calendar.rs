use std::rc::Rc;

use chrono::NaiveDate;
use rally_shared::{
  ActiveEvents,
  CalendarEvent
};
use tracing::{
  debug,
  info,
  warn
};

use crate::alert::Severity;
use crate::controller::UiController;
use crate::error::FetchError;
use crate::host::{
  CalendarHooks,
  CalendarWidget,
  Host,
  Transport
};
use crate::loader::LoaderKey;

pub const LIST_BUTTON: &str =
  "#listViewBtn";
pub const CALENDAR_BUTTON: &str =
  "#calendarViewBtn";
pub const LIST_CONTAINER: &str =
  "#campaignsContent";
pub const CALENDAR_CONTAINER: &str =
  "#calendarView";

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum ViewMode {
  List,
  Calendar
}

impl ViewMode {
  /// Anything other than `"list"` selects the
  /// calendar.
  pub fn parse(raw: &str) -> Self {
    if raw.trim() == "list" {
      ViewMode::List
    } else {
      ViewMode::Calendar
    }
  }
}

/// An event the user clicked in the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarClick {
  pub title:    String,
  pub location: Option<String>,
  pub start:    String
}

impl CalendarClick {
  pub fn summary(&self) -> String {
    format!(
      "{}\n📍 {}\n📅 {}",
      self.title,
      self.location.as_deref().unwrap_or(""),
      display_date(&self.start)
    )
  }
}

/// `2026-11-02T09:30` → `11/2/2026`; input that
/// does not start with an ISO date is shown as is.
pub fn display_date(start: &str) -> String {
  start
    .get(..10)
    .and_then(|day| {
      NaiveDate::parse_from_str(
        day, "%Y-%m-%d"
      )
      .ok()
    })
    .map(|date| {
      date.format("%-m/%-d/%Y").to_string()
    })
    .unwrap_or_else(|| start.to_string())
}

/// Fetches the events API and maps every active
/// event into the widget's shape, in server order.
pub async fn load_calendar_events<T>(
  transport: &T,
  url: &str
) -> Result<Vec<CalendarEvent>, FetchError>
where
  T: Transport + ?Sized
{
  let body = transport.get_text(url).await?;
  let payload =
    serde_json::from_str::<ActiveEvents>(
      &body
    )
    .map_err(|error| {
      FetchError::Decode(error.to_string())
    })?;
  debug!(
    events = payload.events.len(),
    "loaded calendar events"
  );
  Ok(
    payload
      .events
      .iter()
      .map(CalendarEvent::from)
      .collect()
  )
}

impl<H: Host> UiController<H> {
  #[tracing::instrument(skip(self))]
  pub fn toggle_view(
    self: &Rc<Self>,
    mode: ViewMode
  ) {
    if !self.guard("toggle_view") {
      return;
    }

    self.state.borrow_mut().view = Some(mode);
    if !self.is_loaded(LoaderKey::Campaigns)
    {
      self
        .load_fragment(LoaderKey::Campaigns);
    }

    let list = mode == ViewMode::List;
    let page = &self.host;
    page.set_class(
      LIST_BUTTON,
      "active",
      list
    );
    page.set_class(
      CALENDAR_BUTTON,
      "active",
      !list
    );
    page.set_display(
      LIST_CONTAINER,
      if list { "block" } else { "none" }
    );
    page.set_display(
      CALENDAR_CONTAINER,
      if list { "none" } else { "block" }
    );

    if !list {
      self.show_calendar();
    }
  }

  pub fn has_calendar(&self) -> bool {
    self.state.borrow().calendar.is_some()
  }

  fn show_calendar(self: &Rc<Self>) {
    let existing =
      self.state.borrow().calendar.clone();
    if let Some(calendar) = existing {
      debug!("re-rendering calendar");
      self.host.schedule(
        self.config.timing.calendar_rerender_ms,
        Box::new(move || calendar.render())
      );
      return;
    }

    let weak = Rc::downgrade(self);
    let hooks = CalendarHooks {
      on_event_click: Rc::new(
        move |click: CalendarClick| {
          if let Some(this) = weak.upgrade()
          {
            this.notify(
              &click.summary(),
              Severity::Info
            );
          }
        }
      )
    };

    match self.host.mount_calendar(
      &self.config.calendar_options(),
      hooks
    ) {
      | Some(calendar) => {
        info!("calendar mounted");
        self.state.borrow_mut().calendar =
          Some(Rc::new(calendar));
      }
      | None => {
        warn!(
          "calendar widget unavailable"
        );
        self.notify(
          "The calendar could not be \
           loaded.",
          Severity::Error
        );
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn view_mode_defaults_to_calendar() {
    assert_eq!(
      ViewMode::parse("list"),
      ViewMode::List
    );
    assert_eq!(
      ViewMode::parse("calendar"),
      ViewMode::Calendar
    );
    assert_eq!(
      ViewMode::parse("grid"),
      ViewMode::Calendar
    );
  }

  #[test]
  fn click_summary_lists_place_and_day() {
    let click = CalendarClick {
      title:    "Beach cleanup".to_string(),
      location: Some("Juhu".to_string()),
      start:    "2026-11-02T09:30"
        .to_string()
    };

    assert_eq!(
      click.summary(),
      "Beach cleanup\n📍 Juhu\n📅 11/2/2026"
    );
  }

  #[test]
  fn odd_start_is_shown_verbatim() {
    assert_eq!(
      display_date("soon"),
      "soon"
    );
    assert_eq!(
      display_date("2026-13-40"),
      "2026-13-40"
    );
  }
}
