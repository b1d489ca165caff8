use std::rc::Rc;

use rally_shared::StoredAlert;
use tracing::{
  debug,
  trace
};

use crate::controller::UiController;
use crate::host::Host;

pub const ALERT_BAR: &str = "#alertBar";
pub const ALERT_TEXT: &str = "#alertText";
pub const ALERT_BUTTONS: &str =
  "#alertButtons";
pub const ALERT_CLOSE: &str =
  "#alertCloseBtn";
const SHOW_CLASS: &str = "show";

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Severity {
  Success,
  Info,
  Warning,
  Error
}

impl Severity {
  pub const ALL: [Severity; 4] = [
    Severity::Success,
    Severity::Info,
    Severity::Warning,
    Severity::Error
  ];

  pub fn class(self) -> &'static str {
    match self {
      | Severity::Success => "success",
      | Severity::Info => "info",
      | Severity::Warning => "warning",
      | Severity::Error => "error"
    }
  }

  /// Unknown names are treated as `Info`.
  pub fn parse(raw: &str) -> Self {
    match raw.trim() {
      | "success" => Severity::Success,
      | "warning" => Severity::Warning,
      | "error" => Severity::Error,
      | _ => Severity::Info
    }
  }
}

/// How a banner behaves once shown.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct AlertPlan {
  pub show_buttons:  bool,
  pub dismiss_after: Option<u32>
}

impl AlertPlan {
  pub fn new(
    severity: Severity,
    duration_ms: u32,
    show_buttons: bool
  ) -> Self {
    if severity == Severity::Success
      && show_buttons
    {
      return Self {
        show_buttons:  true,
        dismiss_after: None
      };
    }

    Self {
      show_buttons:  false,
      dismiss_after: (duration_ms > 0)
        .then_some(duration_ms)
    }
  }
}

/// Duration argument of a scripted `showAlert`
/// call. An omitted argument takes the default;
/// anything that is not a positive number keeps
/// the banner up.
pub fn scripted_duration(
  argument: Option<f64>,
  default_ms: u32
) -> u32 {
  match argument {
    | None => default_ms,
    | Some(ms) if ms.is_finite() && ms > 0.0 => {
      ms.min(f64::from(u32::MAX)) as u32
    }
    | Some(_) => 0
  }
}

impl<H: Host> UiController<H> {
  #[tracing::instrument(skip(self, message))]
  pub fn show_alert(
    self: &Rc<Self>,
    message: &str,
    severity: Severity,
    duration_ms: u32,
    show_buttons: bool
  ) {
    if !self.guard("show_alert") {
      return;
    }

    let plan = AlertPlan::new(
      severity,
      duration_ms,
      show_buttons
    );
    let page = &self.host;

    page.set_text(ALERT_TEXT, message);
    for styled in Severity::ALL {
      page.set_class(
        ALERT_BAR,
        styled.class(),
        styled == severity
          && styled != Severity::Info
      );
    }
    if plan.show_buttons {
      page.set_display(
        ALERT_BUTTONS,
        "flex"
      );
      page.set_display(ALERT_CLOSE, "none");
    } else {
      page.set_display(
        ALERT_BUTTONS,
        "none"
      );
      page
        .set_display(ALERT_CLOSE, "block");
    }
    page.set_class(
      ALERT_BAR, SHOW_CLASS, true
    );

    let generation = {
      let mut state =
        self.state.borrow_mut();
      state.alert_generation += 1;
      state.alert_generation
    };

    if let Some(delay) = plan.dismiss_after
    {
      let weak = Rc::downgrade(self);
      self.host.schedule(
        delay,
        Box::new(move || {
          if let Some(this) = weak.upgrade()
          {
            this.expire_alert(generation);
          }
        })
      );
    }
  }

  /// Shows `message` with the configured default
  /// duration.
  pub fn notify(
    self: &Rc<Self>,
    message: &str,
    severity: Severity
  ) {
    self.show_alert(
      message,
      severity,
      self.config.alerts.default_duration_ms,
      false
    );
  }

  pub fn close_alert(&self) {
    self.host.set_class(
      ALERT_BAR, SHOW_CLASS, false
    );
  }

  fn expire_alert(
    &self,
    generation: u64
  ) {
    let current =
      self.state.borrow().alert_generation;
    if current != generation {
      trace!(
        generation,
        current,
        "stale alert timer; keeping newer \
         alert"
      );
      return;
    }
    self.close_alert();
  }

  /// Shows and clears the one-shot notification a
  /// previous page left in local storage.
  #[tracing::instrument(skip_all)]
  pub fn consume_stored_alert(
    self: &Rc<Self>
  ) {
    let key =
      self.config.stored_alert_key.clone();
    let Some(raw) = self.host.stored(&key)
    else {
      return;
    };

    match serde_json::from_str::<StoredAlert>(
      &raw
    ) {
      | Ok(stored) => {
        debug!(key = %key, "showing stored alert");
        self.show_alert(
          &stored.message,
          Severity::Success,
          0,
          true
        );
        self.host.forget(&key);
      }
      | Err(error) => {
        tracing::error!(
          %error,
          key = %key,
          "failed parsing stored alert"
        );
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn scripted_duration_keeps_non_positive_banners_up() {
    assert_eq!(scripted_duration(None, 5_000), 5_000);
    assert_eq!(
      scripted_duration(Some(2_500.0), 5_000),
      2_500
    );
    assert_eq!(scripted_duration(Some(0.0), 5_000), 0);
    assert_eq!(
      scripted_duration(Some(-1_000.0), 5_000),
      0
    );
    assert_eq!(
      scripted_duration(Some(f64::NAN), 5_000),
      0
    );
    assert_eq!(
      AlertPlan::new(
        Severity::Warning,
        scripted_duration(Some(-1.0), 5_000),
        false
      )
      .dismiss_after,
      None
    );
  }

  #[test]
  fn success_with_buttons_never_expires() {
    let plan = AlertPlan::new(
      Severity::Success,
      5_000,
      true
    );

    assert!(plan.show_buttons);
    assert_eq!(plan.dismiss_after, None);
  }

  #[test]
  fn buttons_only_apply_to_success() {
    for severity in [
      Severity::Info,
      Severity::Warning,
      Severity::Error
    ] {
      let plan =
        AlertPlan::new(severity, 3_000, true);
      assert!(!plan.show_buttons);
      assert_eq!(
        plan.dismiss_after,
        Some(3_000)
      );
    }
  }

  #[test]
  fn zero_duration_stays_open() {
    let plan = AlertPlan::new(
      Severity::Error,
      0,
      false
    );

    assert!(!plan.show_buttons);
    assert_eq!(plan.dismiss_after, None);
  }

  #[test]
  fn unknown_severity_reads_as_info() {
    assert_eq!(
      Severity::parse("warning"),
      Severity::Warning
    );
    assert_eq!(
      Severity::parse("loud"),
      Severity::Info
    );
  }
}
