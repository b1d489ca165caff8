use tracing::{
  debug,
  trace
};

use crate::controller::UiController;
use crate::host::Host;

pub const TAB_STRIP: &str =
  ".toggle-buttons";
pub const LOGIN_TAB: &str =
  "#login-tab-btn";
pub const SIGNUP_TAB: &str =
  "#signup-tab-btn";
pub const LOGIN_PANEL: &str = "#loginpage";
pub const SIGNUP_PANEL: &str =
  "#signuppage";
pub const FORGOT_PANEL: &str =
  "#forgetpasswordpage";
pub const FORGOT_LINK: &str =
  "#forget-pass-link";
pub const BACK_TO_LOGIN: &str =
  "#backToLoginBtn";

const LOGIN_USERNAME: &str =
  "input[name=\"loginusername\"]";
const LOGIN_PASSWORD: &str =
  "#loginpassword";
const FORGOT_EMAIL: &str = "#forgetemail";
const NEW_PASSWORD: &str = "#newpassword";
const ACTIVE: &str = "active";

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum AuthTab {
  Login,
  Signup
}

impl AuthTab {
  /// The tab a button id selects; other buttons
  /// sharing the strip (the view toggles, say)
  /// select nothing.
  pub fn from_button_id(
    id: &str
  ) -> Option<Self> {
    match id {
      | "login-tab-btn" => Some(AuthTab::Login),
      | "signup-tab-btn" => {
        Some(AuthTab::Signup)
      }
      | _ => None
    }
  }
}

impl<H: Host> UiController<H> {
  /// Handles a click on a button of the tab
  /// strip. Returns whether a panel was selected.
  pub fn select_auth_tab(
    &self,
    button_id: &str
  ) -> bool {
    if !self.guard("select_auth_tab") {
      return false;
    }
    let Some(tab) =
      AuthTab::from_button_id(button_id)
    else {
      trace!(
        button_id,
        "click is not an auth tab"
      );
      return false;
    };

    let login = tab == AuthTab::Login;
    let page = &self.host;
    page.set_class(LOGIN_TAB, ACTIVE, login);
    page.set_class(
      SIGNUP_TAB, ACTIVE, !login
    );
    page.set_class(
      LOGIN_PANEL,
      ACTIVE,
      login
    );
    page.set_class(
      SIGNUP_PANEL,
      ACTIVE,
      !login
    );
    page.set_class(
      FORGOT_PANEL,
      ACTIVE,
      false
    );
    page.set_display(TAB_STRIP, "flex");
    debug!(?tab, "auth tab selected");
    true
  }

  /// Switches to the reset form, carrying over
  /// whatever was typed into the login form.
  pub fn open_forgot_password(&self) {
    if !self.guard("open_forgot_password") {
      return;
    }
    let page = &self.host;

    if let Some(username) = page
      .value(LOGIN_USERNAME)
      .filter(|value| !value.is_empty())
    {
      page.set_value(FORGOT_EMAIL, &username);
    }
    if let Some(password) = page
      .value(LOGIN_PASSWORD)
      .filter(|value| !value.is_empty())
    {
      page.set_value(NEW_PASSWORD, &password);
    }

    page.set_class(
      LOGIN_PANEL,
      ACTIVE,
      false
    );
    page.set_class(
      FORGOT_PANEL,
      ACTIVE,
      true
    );
    page.set_display(TAB_STRIP, "none");
  }

  pub fn back_to_login(&self) {
    if !self.guard("back_to_login") {
      return;
    }
    let page = &self.host;
    page.set_class(
      FORGOT_PANEL,
      ACTIVE,
      false
    );
    page.set_class(
      LOGIN_PANEL,
      ACTIVE,
      true
    );
    page.set_display(TAB_STRIP, "flex");
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_tab_buttons_select_panels() {
    assert_eq!(
      AuthTab::from_button_id(
        "login-tab-btn"
      ),
      Some(AuthTab::Login)
    );
    assert_eq!(
      AuthTab::from_button_id(
        "signup-tab-btn"
      ),
      Some(AuthTab::Signup)
    );
    assert_eq!(
      AuthTab::from_button_id(
        "listViewBtn"
      ),
      None
    );
    assert_eq!(
      AuthTab::from_button_id(""),
      None
    );
  }
}
