use std::rc::Rc;

use futures::FutureExt;
use tracing::{
  info,
  warn
};

use crate::controller::UiController;
use crate::host::Host;

pub const CHAT_DRAWER: &str =
  "#sideChatDrawer";
pub const CHAT_FRAME: &str =
  "#globalChatIframe";

impl<H: Host> UiController<H> {
  /// Switches the server-side template, then
  /// reloads.
  pub fn change_template(self: &Rc<Self>) {
    if !self.guard("change_template") {
      return;
    }
    let request = self.host.get_text(
      &self.config.endpoints.change_template
    );
    self.reload_after(request, None);
  }

  /// Filters the campaign list to one organiser's
  /// events and reopens the campaigns section.
  pub fn view_your_events(
    self: &Rc<Self>,
    username: &str
  ) {
    if !self.guard("view_your_events") {
      return;
    }
    let url = format!(
      "{}/{username}",
      self.config.endpoints.view_your_events
    );
    let request =
      self.host.post_form(&url, Vec::new());
    self.reload_after(
      request,
      Some("campaigns")
    );
  }

  pub fn set_sort_by(
    self: &Rc<Self>,
    sort_by: &str
  ) {
    if !self.guard("set_sort_by") {
      return;
    }
    let url = format!(
      "{}/{sort_by}",
      self.config.endpoints.set_sort_by
    );
    let request =
      self.host.post_form(&url, Vec::new());
    self.reload_after(
      request,
      Some("campaigns")
    );
  }

  fn reload_after<F, T, E>(
    self: &Rc<Self>,
    request: F,
    fragment: Option<&'static str>
  ) where
    F: Future<Output = Result<T, E>>
      + 'static,
    E: std::fmt::Display
  {
    let this = Rc::clone(self);
    self.host.spawn(
      async move {
        match request.await {
          | Ok(_) => {
            if !this.is_live() {
              return;
            }
            if let Some(fragment) = fragment {
              this.host.set_fragment(fragment);
            }
            info!(
              ?fragment,
              "session updated; reloading"
            );
            this.host.reload();
          }
          | Err(error) => {
            warn!(%error, "session request failed");
          }
        }
      }
      .boxed_local()
    );
  }

  pub fn open_event_chat(
    &self,
    event_id: &str
  ) {
    if !self.guard("open_event_chat") {
      return;
    }
    let src = format!(
      "{}/{event_id}",
      self.config.endpoints.event_chat
    );
    self.host.set_attribute(
      CHAT_FRAME, "src", &src
    );
    self.host.set_class(
      CHAT_DRAWER,
      "open",
      true
    );
  }

  /// Closes the drawer and blanks the frame once
  /// the slide-out has finished.
  pub fn close_event_chat(
    self: &Rc<Self>
  ) {
    if !self.guard("close_event_chat") {
      return;
    }
    self.host.set_class(
      CHAT_DRAWER,
      "open",
      false
    );
    let weak = Rc::downgrade(self);
    self.host.schedule(
      self.config.timing.chat_clear_ms,
      Box::new(move || {
        if let Some(this) = weak.upgrade() {
          this.host.set_attribute(
            CHAT_FRAME, "src", ""
          );
        }
      })
    );
  }

  pub fn toggle_password_visibility(
    &self,
    field_id: &str
  ) {
    if !self.guard(
      "toggle_password_visibility"
    ) {
      return;
    }
    let selector = format!("#{field_id}");
    let Some(kind) =
      self.host.attribute(&selector, "type")
    else {
      return;
    };
    let next = if kind == "password" {
      "text"
    } else {
      "password"
    };
    self.host.set_attribute(
      &selector, "type", next
    );
  }
}
