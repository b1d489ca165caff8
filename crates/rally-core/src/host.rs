//! The seam between the controller and the
//! browser. The wasm shell implements these over
//! the live document; tests implement them over a
//! recording fake.

use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::calendar::CalendarClick;
use crate::config::CalendarOptions;
use crate::error::FetchError;

/// Document-level operations, addressed by CSS
/// selector. Operations on selectors that match
/// nothing are silent no-ops.
pub trait Page {
  /// Adds or removes `class` on every element
  /// matching `selector`.
  fn set_class(
    &self,
    selector: &str,
    class: &str,
    on: bool
  );

  /// For every element matching `selector`, sets
  /// `class` iff its `attr` equals `value`.
  fn mark_matching(
    &self,
    selector: &str,
    attr: &str,
    value: &str,
    class: &str
  );

  fn set_display(
    &self,
    selector: &str,
    display: &str
  );

  fn set_text(
    &self,
    selector: &str,
    text: &str
  );

  fn set_html(
    &self,
    selector: &str,
    html: &str
  );

  /// Replaces every `<script>` under `selector`
  /// with a fresh copy so the browser runs it.
  fn activate_scripts(
    &self,
    selector: &str
  );

  fn value(
    &self,
    selector: &str
  ) -> Option<String>;

  fn set_value(
    &self,
    selector: &str,
    value: &str
  );

  fn attribute(
    &self,
    selector: &str,
    name: &str
  ) -> Option<String>;

  fn set_attribute(
    &self,
    selector: &str,
    name: &str,
    value: &str
  );

  fn scroll_to_top(&self);

  /// Location fragment without the leading `#`.
  fn fragment(&self) -> String;

  fn set_fragment(
    &self,
    fragment: &str
  );

  fn reload(&self);

  fn stored(
    &self,
    key: &str
  ) -> Option<String>;

  fn forget(&self, key: &str);
}

pub trait Transport {
  fn get_text(
    &self,
    url: &str
  ) -> LocalBoxFuture<
    'static,
    Result<String, FetchError>
  >;

  fn post_form(
    &self,
    url: &str,
    fields: Vec<(String, String)>
  ) -> LocalBoxFuture<
    'static,
    Result<String, FetchError>
  >;
}

pub trait Runtime {
  fn spawn(
    &self,
    task: LocalBoxFuture<'static, ()>
  );

  fn schedule(
    &self,
    delay_ms: u32,
    task: Box<dyn FnOnce()>
  );
}

pub trait CalendarWidget {
  fn render(&self);
}

/// Callbacks the calendar widget reports back
/// through.
#[derive(Clone)]
pub struct CalendarHooks {
  pub on_event_click:
    Rc<dyn Fn(CalendarClick)>
}

pub trait Host:
  Page + Transport + Runtime + 'static
{
  type Calendar: CalendarWidget + 'static;

  /// Constructs and renders the calendar widget.
  /// `None` when the widget library is not
  /// available on the page.
  fn mount_calendar(
    &self,
    options: &CalendarOptions,
    hooks: CalendarHooks
  ) -> Option<Self::Calendar>;
}
