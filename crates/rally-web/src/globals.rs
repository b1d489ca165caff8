//! Functions the server-rendered markup calls from
//! inline handlers, installed on `window`.

use std::rc::{
  Rc,
  Weak
};

use gloo::utils::window;
use js_sys::Reflect;
use rally_core::alert::{
  Severity,
  scripted_duration
};
use rally_core::calendar::ViewMode;
use rally_core::campaigns::{
  CARD,
  CATEGORY_WRAPPER,
  DescriptionAction,
  SEARCH_HIDDEN,
  matches_query
};
use rally_core::loader::LoaderKey;
use tracing::{
  debug,
  warn
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{
  JsCast,
  JsValue
};
use web_sys::Element;

use crate::dom;
use crate::listeners::Ui;

/// Installed globals. Dropping this removes them
/// from `window` again.
pub struct Globals {
  names: Vec<&'static str>
}

impl Globals {
  pub fn install(ui: &Rc<Ui>) -> Self {
    let mut globals = Self {
      names: Vec::new()
    };
    let weak = Rc::downgrade(ui);

    globals.set(
      "toggleView",
      unary(&weak, |ui, view| {
        ui.toggle_view(ViewMode::parse(
          &text(&view)
        ));
      })
    );
    globals.set(
      "closeAlert",
      nullary(&weak, |ui| ui.close_alert())
    );
    globals.set("showAlert", show_alert(&weak));
    globals.set(
      "loadCampaigns",
      nullary(&weak, |ui| {
        ui.load_fragment(LoaderKey::Campaigns);
      })
    );
    globals.set(
      "loadAddForm",
      nullary(&weak, |ui| {
        ui.load_fragment(LoaderKey::AddForm);
      })
    );
    globals.set(
      "loadPendingEvents",
      nullary(&weak, |ui| {
        ui.load_fragment(LoaderKey::Pending);
      })
    );
    globals.set(
      "changetemplate",
      nullary(&weak, |ui| ui.change_template())
    );
    globals.set(
      "viewyourevents",
      unary(&weak, |ui, username| {
        ui.view_your_events(&text(&username));
      })
    );
    globals.set(
      "sendsortreq",
      unary(&weak, |ui, sort_by| {
        ui.set_sort_by(&text(&sort_by));
      })
    );
    globals.set(
      "openeventchat",
      unary(&weak, |ui, id| {
        ui.open_event_chat(&text(&id));
      })
    );
    globals.set(
      "closeEventChat",
      nullary(&weak, |ui| ui.close_event_chat())
    );
    globals.set(
      "toggleDescription",
      binary(&weak, |ui, id, action| {
        ui.toggle_description(
          &text(&id),
          DescriptionAction::parse(&text(
            &action
          ))
        );
      })
    );
    globals.set(
      "filterCampaigns",
      unary(&weak, |_, input| {
        filter_campaigns(&input);
      })
    );
    globals.set(
      "togglePasswordVisibility",
      unary(&weak, |ui, id| {
        ui.toggle_password_visibility(&text(
          &id
        ));
      })
    );

    debug!(count = globals.names.len(), "page globals installed");
    globals
  }

  fn set(
    &mut self,
    name: &'static str,
    function: JsValue
  ) {
    match Reflect::set(
      &window(),
      &JsValue::from_str(name),
      &function
    ) {
      | Ok(_) => self.names.push(name),
      | Err(error) => {
        warn!(name, ?error, "failed to install global");
      }
    }
  }
}

impl Drop for Globals {
  fn drop(&mut self) {
    let window = window();
    for name in self.names.drain(..) {
      let _ = Reflect::delete_property(
        &window,
        &JsValue::from_str(name)
      );
    }
  }
}

fn nullary<F>(
  weak: &Weak<Ui>,
  call: F
) -> JsValue
where
  F: Fn(&Rc<Ui>) + 'static
{
  let weak = weak.clone();
  Closure::<dyn Fn()>::new(move || {
    if let Some(ui) = weak.upgrade() {
      call(&ui);
    }
  })
  .into_js_value()
}

fn unary<F>(
  weak: &Weak<Ui>,
  call: F
) -> JsValue
where
  F: Fn(&Rc<Ui>, JsValue) + 'static
{
  let weak = weak.clone();
  Closure::<dyn Fn(JsValue)>::new(
    move |arg: JsValue| {
      if let Some(ui) = weak.upgrade() {
        call(&ui, arg);
      }
    }
  )
  .into_js_value()
}

fn binary<F>(
  weak: &Weak<Ui>,
  call: F
) -> JsValue
where
  F: Fn(&Rc<Ui>, JsValue, JsValue) + 'static
{
  let weak = weak.clone();
  Closure::<dyn Fn(JsValue, JsValue)>::new(
    move |first: JsValue, second: JsValue| {
      if let Some(ui) = weak.upgrade() {
        call(&ui, first, second);
      }
    }
  )
  .into_js_value()
}

/// `showAlert(message, type = "info",
/// duration = default, showButtons = false)`.
fn show_alert(weak: &Weak<Ui>) -> JsValue {
  let weak = weak.clone();
  Closure::<
    dyn Fn(JsValue, JsValue, JsValue, JsValue)
  >::new(
    move |message: JsValue,
          kind: JsValue,
          duration: JsValue,
          buttons: JsValue| {
      let Some(ui) = weak.upgrade() else {
        return;
      };
      let severity = kind
        .as_string()
        .map_or(Severity::Info, |kind| {
          Severity::parse(&kind)
        });
      let duration_ms = scripted_duration(
        (!duration.is_undefined()).then(|| {
          duration.as_f64().unwrap_or(0.0)
        }),
        ui.config().alerts.default_duration_ms
      );
      ui.show_alert(
        &text(&message),
        severity,
        duration_ms,
        buttons.as_bool().unwrap_or(false)
      );
    }
  )
  .into_js_value()
}

fn filter_campaigns(input: &JsValue) {
  let Some(input) = input.dyn_ref::<Element>()
  else {
    return;
  };
  let query = Reflect::get(
    input,
    &JsValue::from_str("value")
  )
  .ok()
  .and_then(|value| value.as_string())
  .unwrap_or_default();
  let Ok(Some(wrapper)) =
    input.closest(CATEGORY_WRAPPER)
  else {
    return;
  };
  for card in dom::query_all_in(&wrapper, CARD)
  {
    let shown = matches_query(
      &card.text_content().unwrap_or_default(),
      &query
    );
    dom::set_class(
      &card,
      SEARCH_HIDDEN,
      !shown
    );
  }
}

fn text(value: &JsValue) -> String {
  value.as_string().unwrap_or_default()
}
