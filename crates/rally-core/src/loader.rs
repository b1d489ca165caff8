use std::rc::Rc;

use futures::FutureExt;
use tracing::{
  debug,
  info,
  warn
};

use crate::calendar::ViewMode;
use crate::controller::UiController;
use crate::error::FetchError;
use crate::host::Host;

/// Sections whose markup is fetched on first
/// visit.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
)]
pub enum LoaderKey {
  Campaigns,
  AddForm,
  Pending
}

impl LoaderKey {
  pub const ALL: [LoaderKey; 3] = [
    LoaderKey::Campaigns,
    LoaderKey::AddForm,
    LoaderKey::Pending
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      | LoaderKey::Campaigns => "campaigns",
      | LoaderKey::AddForm => "add_form",
      | LoaderKey::Pending => "pending"
    }
  }
}

#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct LoadRecord {
  pub loaded:  bool,
  pub fetches: u32
}

/// Markup shown in place of a fragment whose
/// fetch failed. `retry` is the inline handler
/// that loads it again.
pub fn retry_markup(retry: &str) -> String {
  format!(
    "<div class=\"load-error\">\
     <p>Could not load this section.</p>\
     <button type=\"button\" \
     class=\"retry-btn\" \
     onclick=\"{}\">Retry</button>\
     </div>",
    escape_attr(retry)
  )
}

fn escape_attr(raw: &str) -> String {
  raw
    .replace('&', "&amp;")
    .replace('"', "&quot;")
    .replace('<', "&lt;")
}

impl<H: Host> UiController<H> {
  pub fn is_loaded(
    &self,
    key: LoaderKey
  ) -> bool {
    self
      .state
      .borrow()
      .loaders
      .get(&key)
      .is_some_and(|record| record.loaded)
  }

  /// Fetches and injects the fragment for `key`
  /// unless it was already requested. The flag is
  /// set before the request goes out, so a second
  /// call while the first is in flight does
  /// nothing.
  #[tracing::instrument(skip(self))]
  pub fn load_fragment(
    self: &Rc<Self>,
    key: LoaderKey
  ) {
    if !self.guard("load_fragment") {
      return;
    }

    {
      let mut state =
        self.state.borrow_mut();
      let record = state
        .loaders
        .entry(key)
        .or_default();
      if record.loaded {
        debug!(
          key = key.as_str(),
          "fragment already requested"
        );
        return;
      }
      record.loaded = true;
      record.fetches += 1;
    }

    let loader = self.config.loader(key);
    info!(key = key.as_str(), url = %loader.url, "loading fragment");
    self
      .host
      .set_display(&loader.loading, "block");

    let request =
      self.host.get_text(&loader.url);
    let this = Rc::clone(self);
    self.host.spawn(
      async move {
        let result = request.await;
        this.finish_load(key, result);
      }
      .boxed_local()
    );
  }

  fn finish_load(
    &self,
    key: LoaderKey,
    result: Result<String, FetchError>
  ) {
    if !self.guard("finish_load") {
      return;
    }
    let loader = self.config.loader(key);
    let page = &self.host;
    // The campaigns container is the list view; it
    // stays hidden while the calendar is on screen.
    let show_content = key
      != LoaderKey::Campaigns
      || self.state.borrow().view
        != Some(ViewMode::Calendar);

    match result {
      | Ok(html) => {
        page.set_html(&loader.content, &html);
        page.set_display(
          &loader.loading,
          "none"
        );
        if show_content {
          page.set_display(
            &loader.content,
            "block"
          );
        }
        page.activate_scripts(&loader.content);

        let hooks = self
          .hooks
          .borrow()
          .get(&key)
          .cloned()
          .unwrap_or_default();
        debug!(
          key = key.as_str(),
          hooks = hooks.len(),
          "fragment injected"
        );
        for hook in hooks {
          hook();
        }
      }
      | Err(error) => {
        warn!(key = key.as_str(), %error, "fragment fetch failed");
        if let Some(record) = self
          .state
          .borrow_mut()
          .loaders
          .get_mut(&key)
        {
          record.loaded = false;
        }
        page.set_display(
          &loader.loading,
          "none"
        );
        page.set_html(
          &loader.content,
          &retry_markup(&loader.retry)
        );
        if show_content {
          page.set_display(
            &loader.content,
            "block"
          );
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn retry_markup_calls_the_loader() {
    let html =
      retry_markup("loadCampaigns()");

    assert!(html.contains(
      "onclick=\"loadCampaigns()\""
    ));
    assert!(html.contains("Retry"));
  }

  #[test]
  fn retry_label_is_attribute_escaped() {
    let html =
      retry_markup("load(\"x\")");

    assert!(html.contains(
      "onclick=\"load(&quot;x&quot;)\""
    ));
  }
}
