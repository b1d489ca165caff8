use futures::FutureExt;
use futures::future::LocalBoxFuture;
use gloo::net::http::{
  Request,
  Response
};
use gloo::storage::{
  LocalStorage,
  Storage
};
use gloo::timers::callback::Timeout;
use gloo::utils::{
  document,
  window
};
use rally_core::config::CalendarOptions;
use rally_core::{
  CalendarHooks,
  FetchError,
  Host,
  Page,
  Runtime,
  Transport
};
use tracing::{
  debug,
  warn
};
use wasm_bindgen::JsValue;
use web_sys::FormData;

use crate::dom;
use crate::fullcalendar::FullCalendar;

/// The live browser page.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebHost;

impl Page for WebHost {
  fn set_class(
    &self,
    selector: &str,
    class: &str,
    on: bool
  ) {
    for element in dom::query_all(selector)
    {
      dom::set_class(&element, class, on);
    }
  }

  fn mark_matching(
    &self,
    selector: &str,
    attr: &str,
    value: &str,
    class: &str
  ) {
    for element in dom::query_all(selector)
    {
      let matches = element
        .get_attribute(attr)
        .is_some_and(|found| found == value);
      dom::set_class(
        &element, class, matches
      );
    }
  }

  fn set_display(
    &self,
    selector: &str,
    display: &str
  ) {
    for element in dom::query_all(selector)
    {
      dom::set_display(&element, display);
    }
  }

  fn set_text(
    &self,
    selector: &str,
    text: &str
  ) {
    for element in dom::query_all(selector)
    {
      element.set_text_content(Some(text));
    }
  }

  fn set_html(
    &self,
    selector: &str,
    html: &str
  ) {
    for element in dom::query_all(selector)
    {
      element.set_inner_html(html);
    }
  }

  fn activate_scripts(
    &self,
    selector: &str
  ) {
    let document = document();
    for container in
      dom::query_all(selector)
    {
      for old in dom::query_all_in(
        &container, "script"
      ) {
        let Ok(fresh) =
          document.create_element("script")
        else {
          continue;
        };
        for name in
          old.get_attribute_names().iter()
        {
          let Some(name) = name.as_string()
          else {
            continue;
          };
          if let Some(value) =
            old.get_attribute(&name)
          {
            let _ = fresh
              .set_attribute(&name, &value);
          }
        }
        fresh.set_text_content(
          old.text_content().as_deref()
        );
        if let Some(parent) =
          old.parent_node()
          && let Err(error) =
            parent.replace_child(&fresh, &old)
        {
          warn!(?error, "failed to activate script");
        }
      }
    }
  }

  fn value(
    &self,
    selector: &str
  ) -> Option<String> {
    let element = dom::query(selector)?;
    js_sys::Reflect::get(
      &element,
      &JsValue::from_str("value")
    )
    .ok()
    .and_then(|value| value.as_string())
  }

  fn set_value(
    &self,
    selector: &str,
    value: &str
  ) {
    if let Some(element) =
      dom::query(selector)
    {
      let _ = js_sys::Reflect::set(
        &element,
        &JsValue::from_str("value"),
        &JsValue::from_str(value)
      );
    }
  }

  fn attribute(
    &self,
    selector: &str,
    name: &str
  ) -> Option<String> {
    dom::query(selector)?
      .get_attribute(name)
  }

  fn set_attribute(
    &self,
    selector: &str,
    name: &str,
    value: &str
  ) {
    for element in dom::query_all(selector)
    {
      let _ =
        element.set_attribute(name, value);
    }
  }

  fn scroll_to_top(&self) {
    window().scroll_to_with_x_and_y(0.0, 0.0);
  }

  fn fragment(&self) -> String {
    window()
      .location()
      .hash()
      .map(|hash| {
        hash
          .trim_start_matches('#')
          .to_string()
      })
      .unwrap_or_default()
  }

  fn set_fragment(
    &self,
    fragment: &str
  ) {
    if let Err(error) =
      window().location().set_hash(fragment)
    {
      warn!(?error, "failed to set location hash");
    }
  }

  fn reload(&self) {
    if let Err(error) =
      window().location().reload()
    {
      warn!(?error, "failed to reload page");
    }
  }

  fn stored(
    &self,
    key: &str
  ) -> Option<String> {
    LocalStorage::raw()
      .get_item(key)
      .ok()
      .flatten()
  }

  fn forget(&self, key: &str) {
    LocalStorage::delete(key);
  }
}

impl Transport for WebHost {
  fn get_text(
    &self,
    url: &str
  ) -> LocalBoxFuture<
    'static,
    Result<String, FetchError>
  > {
    let url = url.to_string();
    async move {
      debug!(url = %url, "GET");
      let response = Request::get(&url)
        .send()
        .await
        .map_err(|error| {
          FetchError::Network(
            error.to_string()
          )
        })?;
      read_text(&url, response).await
    }
    .boxed_local()
  }

  fn post_form(
    &self,
    url: &str,
    fields: Vec<(String, String)>
  ) -> LocalBoxFuture<
    'static,
    Result<String, FetchError>
  > {
    let url = url.to_string();
    async move {
      debug!(url = %url, fields = fields.len(), "POST");
      let form =
        FormData::new().map_err(|error| {
          FetchError::Network(format!(
            "{error:?}"
          ))
        })?;
      for (name, value) in &fields {
        let _ =
          form.append_with_str(name, value);
      }
      let response = Request::post(&url)
        .body(form)
        .map_err(|error| {
          FetchError::Network(
            error.to_string()
          )
        })?
        .send()
        .await
        .map_err(|error| {
          FetchError::Network(
            error.to_string()
          )
        })?;
      read_text(&url, response).await
    }
    .boxed_local()
  }
}

async fn read_text(
  url: &str,
  response: Response
) -> Result<String, FetchError> {
  if !response.ok() {
    return Err(FetchError::Status {
      status: response.status(),
      url:    url.to_string()
    });
  }
  response.text().await.map_err(|error| {
    FetchError::Decode(error.to_string())
  })
}

impl Runtime for WebHost {
  fn spawn(
    &self,
    task: LocalBoxFuture<'static, ()>
  ) {
    wasm_bindgen_futures::spawn_local(task);
  }

  fn schedule(
    &self,
    delay_ms: u32,
    task: Box<dyn FnOnce()>
  ) {
    Timeout::new(delay_ms, task).forget();
  }
}

impl Host for WebHost {
  type Calendar = FullCalendar;

  fn mount_calendar(
    &self,
    options: &CalendarOptions,
    hooks: CalendarHooks
  ) -> Option<FullCalendar> {
    FullCalendar::mount(*self, options, hooks)
  }
}
