use gloo::utils::document;
use wasm_bindgen::JsCast;
use web_sys::{
  Element,
  Event,
  HtmlElement,
  NodeList
};

pub fn query(
  selector: &str
) -> Option<Element> {
  document()
    .query_selector(selector)
    .ok()
    .flatten()
}

pub fn query_all(
  selector: &str
) -> Vec<Element> {
  collect(
    document()
      .query_selector_all(selector)
      .ok()
  )
}

pub fn query_all_in(
  parent: &Element,
  selector: &str
) -> Vec<Element> {
  collect(
    parent
      .query_selector_all(selector)
      .ok()
  )
}

fn collect(
  list: Option<NodeList>
) -> Vec<Element> {
  let Some(list) = list else {
    return Vec::new();
  };
  (0..list.length())
    .filter_map(|index| list.item(index))
    .filter_map(|node| {
      node.dyn_into::<Element>().ok()
    })
    .collect()
}

pub fn set_display(
  element: &Element,
  display: &str
) {
  if let Some(html) =
    element.dyn_ref::<HtmlElement>()
  {
    let _ = html
      .style()
      .set_property("display", display);
  }
}

pub fn set_class(
  element: &Element,
  class: &str,
  on: bool
) {
  let _ = element
    .class_list()
    .toggle_with_force(class, on);
}

/// The element an event was dispatched on.
pub fn event_element(
  event: &Event
) -> Option<Element> {
  event
    .target()
    .and_then(|target| {
      target.dyn_into::<Element>().ok()
    })
}
