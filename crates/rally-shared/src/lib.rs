use serde::{
  Deserialize,
  Serialize
};

/// One row of the `"active events"` list served by the events API.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct EventRecord {
  pub eventname:      String,
  pub eventstartdate: String,
  #[serde(default)]
  pub eventstarttime: Option<String>,
  #[serde(default)]
  pub location:       Option<String>,
  #[serde(default)]
  pub description:    Option<String>
}

impl EventRecord {
  /// Start instant in the widget's format: the
  /// date, plus `T<time>` when a start time is
  /// set.
  pub fn start(&self) -> String {
    match self
      .eventstarttime
      .as_deref()
      .map(str::trim)
    {
      | Some(time) if !time.is_empty() => {
        format!(
          "{}T{}",
          self.eventstartdate, time
        )
      }
      | _ => self.eventstartdate.clone()
    }
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Default,
)]
pub struct ActiveEvents {
  #[serde(
    rename = "active events",
    default
  )]
  pub events: Vec<EventRecord>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
pub struct CalendarEventProps {
  pub description: Option<String>,
  pub location:    Option<String>
}

/// Event object handed to the calendar widget.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct CalendarEvent {
  pub title:          String,
  pub start:          String,
  pub url:            String,
  #[serde(rename = "extendedProps")]
  pub extended_props: CalendarEventProps
}

impl From<&EventRecord> for CalendarEvent {
  fn from(record: &EventRecord) -> Self {
    Self {
      title:          record
        .eventname
        .clone(),
      start:          record.start(),
      url:            "#".to_string(),
      extended_props:
        CalendarEventProps {
          description: record
            .description
            .clone(),
          location:    record
            .location
            .clone()
        }
    }
  }
}

/// One-shot notification handed across a full
/// page navigation through local storage.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct StoredAlert {
  pub message: String
}
