use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::utils::{
  document,
  window
};
use rally_core::UiController;
use rally_core::config::SiteConfig;
use rally_core::controller::PageExit;
use rally_core::loader::LoaderKey;
use tracing::info;
use wasm_bindgen::JsCast;
use web_sys::PageTransitionEvent;

use crate::globals::Globals;
use crate::host::WebHost;
use crate::listeners::{
  self,
  ListenerBag,
  Ui
};

struct App {
  controller: Rc<Ui>,
  _listeners: ListenerBag,
  _globals:   Globals
}

thread_local! {
  static APP: RefCell<Option<App>> =
    const { RefCell::new(None) };
}

/// Builds the controller, wires the page and
/// starts it once the document has been parsed.
pub fn boot() {
  let config = SiteConfig::embedded();
  let preview_cards =
    config.campaigns.preview_cards;
  let controller =
    UiController::new(WebHost, config);
  let bag = ListenerBag::default();

  {
    let bag = Rc::clone(&bag);
    controller.on_fragment_loaded(
      LoaderKey::Campaigns,
      move || {
        listeners::wire_campaigns(
          &bag,
          preview_cards
        );
      }
    );
  }
  {
    let bag = Rc::clone(&bag);
    let weak = Rc::downgrade(&controller);
    controller.on_fragment_loaded(
      LoaderKey::AddForm,
      move || {
        listeners::wire_add_form(&weak, &bag);
      }
    );
  }

  listeners::wire_page(&controller, &bag);
  let globals = Globals::install(&controller);

  EventListener::new(
    &window(),
    "pagehide",
    |event| {
      let persisted = event
        .dyn_ref::<PageTransitionEvent>()
        .is_some_and(PageTransitionEvent::persisted);
      leave(PageExit::from_pagehide(persisted));
    }
  )
  .forget();

  APP.with(|app| {
    *app.borrow_mut() = Some(App {
      controller: Rc::clone(&controller),
      _listeners: bag,
      _globals:   globals
    });
  });

  if document().ready_state() == "loading" {
    let weak = Rc::downgrade(&controller);
    EventListener::once(
      &document(),
      "DOMContentLoaded",
      move |_| {
        if let Some(controller) = weak.upgrade()
        {
          controller.start();
        }
      }
    )
    .forget();
  } else {
    controller.start();
  }
}

/// Drops listeners and globals once the
/// controller has been torn down.
fn leave(exit: PageExit) {
  let torn_down = APP.with(|app| {
    app
      .borrow()
      .as_ref()
      .is_some_and(|app| {
        app.controller.on_page_exit(exit)
      })
  });
  if torn_down {
    info!("page unloaded; releasing handlers");
    drop(APP.with(|app| app.borrow_mut().take()));
  }
}
