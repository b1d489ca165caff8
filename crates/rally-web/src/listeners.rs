use std::cell::RefCell;
use std::rc::{
  Rc,
  Weak
};

use gloo::events::{
  EventListener,
  EventListenerOptions
};
use gloo::utils::{
  document,
  window
};
use js_sys::Array;
use rally_core::UiController;
use rally_core::auth::{
  BACK_TO_LOGIN,
  FORGOT_LINK,
  TAB_STRIP
};
use rally_core::campaigns::{
  BACK_TO_ALL,
  CAMPAIGNS_SECTION,
  CARD,
  CATEGORY_ATTR,
  CATEGORY_WRAPPER,
  COLLAPSED,
  VIEW_ALL,
  collapsed_in_overview,
  wrapper_display,
  wrapper_visible
};
use rally_core::forms::FormKind;
use rally_core::router::{
  NAV_LINKS,
  SECTION_ATTR
};
use tracing::{
  debug,
  trace
};
use wasm_bindgen::{
  JsCast,
  JsValue
};
use web_sys::{
  Element,
  Event,
  FormData,
  HtmlFormElement,
  ScrollBehavior,
  ScrollIntoViewOptions
};

use crate::dom;
use crate::host::WebHost;

pub type Ui = UiController<WebHost>;

/// Listeners that live as long as the page. They
/// are removed when the bag is dropped.
pub type ListenerBag =
  Rc<RefCell<Vec<EventListener>>>;

/// Wires the listeners for markup that is part of
/// the initial page.
pub fn wire_page(
  ui: &Rc<Ui>,
  bag: &ListenerBag
) {
  let tab_buttons =
    format!("{TAB_STRIP} button");
  let mut listeners = bag.borrow_mut();

  listeners.push(on_click(
    ui,
    NAV_LINKS.to_string(),
    |ui, link| {
      let section = link
        .get_attribute(SECTION_ATTR)
        .unwrap_or_default();
      ui.navigate(&section);
    }
  ));
  listeners.push(on_click(
    ui,
    tab_buttons,
    |ui, button| {
      ui.select_auth_tab(&button.id());
    }
  ));
  listeners.push(on_click(
    ui,
    FORGOT_LINK.to_string(),
    |ui, _| ui.open_forgot_password()
  ));
  listeners.push(on_click(
    ui,
    BACK_TO_LOGIN.to_string(),
    |ui, _| ui.back_to_login()
  ));

  let weak = Rc::downgrade(ui);
  listeners.push(EventListener::new(
    &window(),
    "hashchange",
    move |_| {
      if let Some(ui) = weak.upgrade() {
        ui.on_fragment_change();
      }
    }
  ));

  let weak = Rc::downgrade(ui);
  listeners.push(
    EventListener::new_with_options(
      &document(),
      "submit",
      EventListenerOptions::enable_prevent_default(),
      move |event| {
        let Some(ui) = weak.upgrade() else {
          return;
        };
        let Some(form) = submitted_form(event)
        else {
          return;
        };
        let Some(kind) =
          FormKind::AUTH.into_iter().find(
            |kind| {
              form
                .matches(kind.selector())
                .unwrap_or(false)
            }
          )
        else {
          return;
        };
        event.prevent_default();
        ui.submit_form(kind, form_fields(&form));
      }
    )
  );

  debug!(count = listeners.len(), "page listeners wired");
}

/// Runs after the campaigns fragment is injected:
/// category focus and the way back to the
/// overview.
pub fn wire_campaigns(
  bag: &ListenerBag,
  preview_cards: usize
) {
  let mut listeners = bag.borrow_mut();

  for button in dom::query_all(VIEW_ALL) {
    let focus = button
      .get_attribute(CATEGORY_ATTR)
      .unwrap_or_default();
    listeners.push(EventListener::new(
      &button,
      "click",
      move |_| focus_category(&focus)
    ));
  }

  if let Some(back) = dom::query(BACK_TO_ALL)
  {
    listeners.push(EventListener::new(
      &back,
      "click",
      move |_| show_overview(preview_cards)
    ));
  }
}

/// Runs after the add-event fragment is
/// injected: submission and per-field draft
/// autosave.
pub fn wire_add_form(
  ui: &Weak<Ui>,
  bag: &ListenerBag
) {
  let Some(form) =
    dom::query(FormKind::AddEvent.selector())
  else {
    debug!("add-event form not in fragment");
    return;
  };
  let mut listeners = bag.borrow_mut();

  let weak = ui.clone();
  listeners.push(
    EventListener::new_with_options(
      &form,
      "submit",
      EventListenerOptions::enable_prevent_default(),
      move |event| {
        event.prevent_default();
        let Some(ui) = weak.upgrade() else {
          return;
        };
        if let Some(form) = submitted_form(event) {
          ui.submit_form(
            FormKind::AddEvent,
            form_fields(&form)
          );
        }
      }
    )
  );

  let weak = ui.clone();
  listeners.push(EventListener::new(
    &form,
    "change",
    move |event| {
      let Some(ui) = weak.upgrade() else {
        return;
      };
      let Some(field) =
        dom::event_element(event)
      else {
        return;
      };
      let name = field
        .get_attribute("name")
        .unwrap_or_default();
      let value = js_sys::Reflect::get(
        &field,
        &JsValue::from_str("value")
      )
      .ok()
      .and_then(|value| value.as_string())
      .unwrap_or_default();
      ui.autosave_draft(&name, &value);
    }
  ));
}

/// Whether a delegated click keeps the browser's
/// default action.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
enum Follow {
  Allow,
  Prevent
}

/// Section links are handled in page; every other
/// delegated click keeps its default.
fn follow_for(selector: &str) -> Follow {
  if selector == NAV_LINKS {
    Follow::Prevent
  } else {
    Follow::Allow
  }
}

/// Delegated click handler: `handler` receives the
/// closest ancestor of the click target matching
/// `selector`.
fn on_click<F>(
  ui: &Rc<Ui>,
  selector: String,
  handler: F
) -> EventListener
where
  F: Fn(&Rc<Ui>, &Element) + 'static
{
  let weak = Rc::downgrade(ui);
  let follow = follow_for(&selector);
  EventListener::new_with_options(
    &document(),
    "click",
    EventListenerOptions::enable_prevent_default(),
    move |event| {
      let Some(matched) =
        dom::event_element(event).and_then(
          |target| {
            target
              .closest(&selector)
              .ok()
              .flatten()
          }
        )
      else {
        return;
      };
      let Some(ui) = weak.upgrade() else {
        return;
      };
      trace!(selector = %selector, "delegated click");
      if follow == Follow::Prevent {
        event.prevent_default();
      }
      handler(&ui, &matched);
    }
  )
}

fn submitted_form(
  event: &Event
) -> Option<HtmlFormElement> {
  dom::event_element(event)?
    .dyn_into::<HtmlFormElement>()
    .ok()
}

/// String-valued entries of a form. File inputs
/// are skipped.
pub fn form_fields(
  form: &HtmlFormElement
) -> Vec<(String, String)> {
  let Ok(data) = FormData::new_with_form(form)
  else {
    return Vec::new();
  };
  let Ok(Some(entries)) = js_sys::try_iter(&data)
  else {
    return Vec::new();
  };
  entries
    .filter_map(Result::ok)
    .filter_map(|entry| {
      let pair = Array::from(&entry);
      Some((
        pair.get(0).as_string()?,
        pair.get(1).as_string()?
      ))
    })
    .collect()
}

fn focus_category(focus: &str) {
  debug!(category = focus, "showing one category");
  for wrapper in
    dom::query_all(CATEGORY_WRAPPER)
  {
    let category =
      wrapper.get_attribute(CATEGORY_ATTR);
    dom::set_display(
      &wrapper,
      wrapper_display(category.as_deref(), focus)
    );
    if wrapper_visible(category.as_deref(), focus) {
      for card in
        dom::query_all_in(&wrapper, CARD)
      {
        dom::set_class(
          &card, COLLAPSED, false
        );
      }
    }
  }

  if let Some(back) = dom::query(BACK_TO_ALL)
  {
    dom::set_display(&back, "block");
  }
  if let Some(section) =
    dom::query(CAMPAIGNS_SECTION)
  {
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    section
      .scroll_into_view_with_scroll_into_view_options(
        &options
      );
  }
}

fn show_overview(preview_cards: usize) {
  debug!("back to all categories");
  for wrapper in
    dom::query_all(CATEGORY_WRAPPER)
  {
    dom::set_display(&wrapper, "block");
    for (index, card) in
      dom::query_all_in(&wrapper, CARD)
        .iter()
        .enumerate()
    {
      dom::set_class(
        card,
        COLLAPSED,
        collapsed_in_overview(
          index,
          preview_cards
        )
      );
    }
  }
  if let Some(back) = dom::query(BACK_TO_ALL)
  {
    dom::set_display(&back, "none");
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_section_links_suppress_the_default() {
    assert_eq!(
      follow_for(NAV_LINKS),
      Follow::Prevent
    );
    for selector in [
      format!("{TAB_STRIP} button"),
      FORGOT_LINK.to_string(),
      BACK_TO_LOGIN.to_string()
    ] {
      assert_eq!(
        follow_for(&selector),
        Follow::Allow
      );
    }
  }
}
