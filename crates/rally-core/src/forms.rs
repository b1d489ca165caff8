use std::rc::Rc;

use futures::FutureExt;
use tracing::{
  debug,
  info,
  warn
};

use crate::alert::Severity;
use crate::config::Endpoints;
use crate::controller::UiController;
use crate::host::Host;

pub const SUCCESS_MARKER: &str = "Success";
pub const REGISTERED_MARKER: &str =
  "Registered";
pub const LOGIN_REQUIRED_MARKER: &str =
  "Please Login";

const NETWORK_FAILURE_MESSAGE: &str =
  "Could not reach the server. Please try \
   again.";

/// Forms whose submission is routed through the
/// controller.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum FormKind {
  Login,
  Signup,
  ForgotPassword,
  AddEvent
}

/// What the page should do with a submission's
/// response text.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq,
)]
pub struct FormReaction {
  pub reload:         bool,
  pub go_home:        bool,
  pub delayed_reload: bool
}

impl FormKind {
  pub const AUTH: [FormKind; 3] = [
    FormKind::Login,
    FormKind::Signup,
    FormKind::ForgotPassword
  ];

  pub fn selector(self) -> &'static str {
    match self {
      | FormKind::Login => "#loginpage",
      | FormKind::Signup => "#signuppage",
      | FormKind::ForgotPassword => {
        "#forgetpasswordpage"
      }
      | FormKind::AddEvent => {
        "#addEventForm"
      }
    }
  }

  pub fn endpoint(
    self,
    endpoints: &Endpoints
  ) -> &str {
    match self {
      | FormKind::Login => &endpoints.login,
      | FormKind::Signup => {
        &endpoints.signup
      }
      | FormKind::ForgotPassword => {
        &endpoints.forgot_password
      }
      | FormKind::AddEvent => {
        &endpoints.add_event
      }
    }
  }

  /// Substring contract with the server; the
  /// markers are matched case-sensitively.
  pub fn interpret(
    self,
    text: &str
  ) -> FormReaction {
    match self {
      | FormKind::AddEvent => FormReaction {
        reload:         false,
        go_home:        text.contains(
          LOGIN_REQUIRED_MARKER
        ),
        delayed_reload: text
          .contains(REGISTERED_MARKER)
      },
      | _ => FormReaction {
        reload: text
          .contains(SUCCESS_MARKER),
        ..FormReaction::default()
      }
    }
  }
}

/// Banner severity used to echo a response.
pub fn feedback_severity(
  text: &str
) -> Severity {
  if text.contains(SUCCESS_MARKER)
    || text.contains(REGISTERED_MARKER)
  {
    Severity::Success
  } else {
    Severity::Warning
  }
}

impl<H: Host> UiController<H> {
  /// Posts `fields` to the endpoint of `kind` and
  /// acts on the response text.
  #[tracing::instrument(skip(self, fields))]
  pub fn submit_form(
    self: &Rc<Self>,
    kind: FormKind,
    fields: Vec<(String, String)>
  ) {
    if !self.guard("submit_form") {
      return;
    }

    let url = kind
      .endpoint(&self.config.endpoints)
      .to_string();
    info!(url = %url, fields = fields.len(), "submitting form");

    let request =
      self.host.post_form(&url, fields);
    let this = Rc::clone(self);
    self.host.spawn(
      async move {
        match request.await {
          | Ok(text) => {
            this.apply_response(kind, &text)
          }
          | Err(error) => {
            warn!(%error, url = %url, "form submission failed");
            this.notify(
              NETWORK_FAILURE_MESSAGE,
              Severity::Error
            );
          }
        }
      }
      .boxed_local()
    );
  }

  fn apply_response(
    self: &Rc<Self>,
    kind: FormKind,
    text: &str
  ) {
    if !self.guard("apply_response") {
      return;
    }

    let reaction = kind.interpret(text);
    debug!(?kind, ?reaction, "form response");

    self.notify(
      text.trim(),
      feedback_severity(text)
    );

    if reaction.go_home {
      let home = self.config.home.clone();
      self.show_section(&home);
    }
    if reaction.reload {
      self.host.reload();
    }
    if reaction.delayed_reload {
      let weak = Rc::downgrade(self);
      self.host.schedule(
        self.config.timing.add_event_reload_ms,
        Box::new(move || {
          if let Some(this) = weak.upgrade()
            && this.is_live()
          {
            this.host.reload();
          }
        })
      );
    }
  }

  /// Fire-and-forget save of a single changed
  /// field of the add-event form.
  pub fn autosave_draft(
    self: &Rc<Self>,
    field: &str,
    value: &str
  ) {
    if !self.guard("autosave_draft")
      || field.is_empty()
    {
      return;
    }

    debug!(field, "autosaving draft field");
    let request = self.host.post_form(
      &self.config.endpoints.save_draft,
      vec![
        (
          "field".to_string(),
          field.to_string()
        ),
        (
          "value".to_string(),
          value.to_string()
        ),
      ]
    );
    self.host.spawn(
      async move {
        if let Err(error) = request.await {
          debug!(%error, "draft autosave failed");
        }
      }
      .boxed_local()
    );
  }
}
