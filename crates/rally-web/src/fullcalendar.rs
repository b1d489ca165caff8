//! Bridge to the FullCalendar script loaded by
//! the page.

use js_sys::{
  Array,
  Function,
  Reflect
};
use rally_core::calendar::{
  CalendarClick,
  load_calendar_events
};
use rally_core::config::CalendarOptions;
use rally_core::{
  CalendarHooks,
  CalendarWidget
};
use serde::Serialize;
use tracing::{
  debug,
  warn
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{
  JsCast,
  JsValue
};
use web_sys::Event;

use crate::dom;
use crate::host::WebHost;

type EventSource =
  Closure<dyn FnMut(JsValue, Function, Function)>;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WidgetOptions<'a> {
  initial_view:   &'a str,
  header_toolbar: Toolbar<'a>
}

#[derive(Serialize)]
struct Toolbar<'a> {
  left:   &'a str,
  center: &'a str,
  right:  &'a str
}

/// A constructed `FullCalendar.Calendar`, with the
/// Rust callbacks it calls kept alive beside it.
pub struct FullCalendar {
  instance: JsValue,
  _events:  EventSource,
  _click:   Closure<dyn FnMut(JsValue)>
}

impl CalendarWidget for FullCalendar {
  fn render(&self) {
    call_method(&self.instance, "render");
  }
}

impl FullCalendar {
  pub fn mount(
    host: WebHost,
    options: &CalendarOptions,
    hooks: CalendarHooks
  ) -> Option<Self> {
    let element =
      dom::query(&options.container)?;
    let constructor = widget_constructor()?;

    let config = serde_wasm_bindgen::to_value(
      &WidgetOptions {
        initial_view:   &options
          .initial_view,
        header_toolbar: Toolbar {
          left:   &options.toolbar_left,
          center: &options.toolbar_center,
          right:  &options.toolbar_right
        }
      }
    )
    .map_err(|error| {
      warn!(%error, "failed encoding calendar options");
    })
    .ok()?;

    let events_url =
      options.events_url.clone();
    let events = EventSource::new(
      move |_info: JsValue,
            success: Function,
            failure: Function| {
        let url = events_url.clone();
        wasm_bindgen_futures::spawn_local(
          async move {
            feed_events(
              host, &url, &success, &failure
            )
            .await;
          }
        );
      }
    );

    let click =
      Closure::<dyn FnMut(JsValue)>::new(
        move |info: JsValue| {
          if let Ok(event) =
            property(&info, "jsEvent")
              .dyn_into::<Event>()
          {
            event.prevent_default();
          }
          (hooks.on_event_click)(read_click(
            &info
          ));
        }
      );

    Reflect::set(
      &config,
      &JsValue::from_str("events"),
      events.as_ref()
    )
    .ok()?;
    Reflect::set(
      &config,
      &JsValue::from_str("eventClick"),
      click.as_ref()
    )
    .ok()?;

    let instance = Reflect::construct(
      &constructor,
      &Array::of2(&element.into(), &config)
    )
    .map_err(|error| {
      warn!(?error, "calendar constructor threw");
    })
    .ok()?;
    call_method(&instance, "render");
    debug!("calendar widget constructed");

    Some(Self {
      instance,
      _events: events,
      _click: click
    })
  }
}

async fn feed_events(
  host: WebHost,
  url: &str,
  success: &Function,
  failure: &Function
) {
  let outcome =
    match load_calendar_events(&host, url)
      .await
    {
      | Ok(events) => {
        serde_wasm_bindgen::to_value(&events)
          .map_err(|error| error.to_string())
      }
      | Err(error) => Err(error.to_string())
    };

  let delivered = match outcome {
    | Ok(events) => {
      success.call1(&JsValue::NULL, &events)
    }
    | Err(error) => {
      warn!(%error, "calendar event source failed");
      failure.call1(
        &JsValue::NULL,
        &JsValue::from_str(&error)
      )
    }
  };
  if let Err(error) = delivered {
    warn!(?error, "calendar callback threw");
  }
}

fn read_click(info: &JsValue) -> CalendarClick {
  let event = property(info, "event");
  let props =
    property(&event, "extendedProps");
  CalendarClick {
    title:    property(&event, "title")
      .as_string()
      .unwrap_or_default(),
    location: property(&props, "location")
      .as_string(),
    start:    property(&event, "startStr")
      .as_string()
      .unwrap_or_default()
  }
}

fn widget_constructor() -> Option<Function>
{
  let namespace = Reflect::get(
    &js_sys::global(),
    &JsValue::from_str("FullCalendar")
  )
  .ok()?;
  Reflect::get(
    &namespace,
    &JsValue::from_str("Calendar")
  )
  .ok()?
  .dyn_into::<Function>()
  .ok()
}

fn property(
  target: &JsValue,
  name: &str
) -> JsValue {
  Reflect::get(
    target,
    &JsValue::from_str(name)
  )
  .unwrap_or(JsValue::UNDEFINED)
}

fn call_method(
  target: &JsValue,
  name: &str
) {
  let Ok(method) = property(target, name)
    .dyn_into::<Function>()
  else {
    warn!(method = name, "calendar method missing");
    return;
  };
  if let Err(error) = method.call0(target) {
    warn!(method = name, ?error, "calendar method threw");
  }
}
