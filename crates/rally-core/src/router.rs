use std::rc::Rc;

use tracing::{
  debug,
  trace
};

use crate::config::SiteConfig;
use crate::controller::UiController;
use crate::host::Host;

pub const NAV_LINKS: &str = ".navlink";
pub const SECTIONS: &str = "main > section";
pub const SECTION_ATTR: &str =
  "data-section";
pub const MOBILE_NAV: &str = "nav";
const ACTIVE: &str = "active";

/// Maps a raw fragment or data-attribute value to
/// a known section, falling back to home.
pub fn resolve_section(
  config: &SiteConfig,
  raw: &str
) -> String {
  let id = raw
    .trim()
    .trim_start_matches('#');
  if !id.is_empty() && config.is_section(id)
  {
    return id.to_string();
  }
  if !id.is_empty() {
    debug!(
      id,
      home = %config.home,
      "unknown section; showing home"
    );
  }
  config.home.clone()
}

impl<H: Host> UiController<H> {
  #[tracing::instrument(skip(self))]
  pub fn show_section(
    self: &Rc<Self>,
    id: &str
  ) {
    if !self.guard("show_section") {
      return;
    }

    let target =
      resolve_section(&self.config, id);
    let page = &self.host;

    page.mark_matching(
      NAV_LINKS,
      SECTION_ATTR,
      &target,
      ACTIVE
    );
    page.mark_matching(
      SECTIONS, "id", &target, ACTIVE
    );
    page.scroll_to_top();
    page.set_class(
      MOBILE_NAV, ACTIVE, false
    );

    self.state.borrow_mut().current =
      Some(target.clone());

    if let Some(key) = self
      .config
      .loader_for_section(&target)
    {
      self.load_fragment(key);
    }
  }

  /// Click on an element carrying a section
  /// data-attribute: show it and record it in
  /// the location fragment.
  pub fn navigate(
    self: &Rc<Self>,
    id: &str
  ) {
    if !self.guard("navigate") {
      return;
    }
    let target =
      resolve_section(&self.config, id);
    self.show_section(&target);
    self.host.set_fragment(&target);
  }

  /// Back/forward navigation. A fragment that
  /// names the section already on screen (the
  /// echo of [`navigate`](Self::navigate)) is
  /// ignored.
  pub fn on_fragment_change(
    self: &Rc<Self>
  ) {
    if !self.guard("on_fragment_change") {
      return;
    }
    let target = resolve_section(
      &self.config,
      &self.host.fragment()
    );
    if self
      .state
      .borrow()
      .current
      .as_deref()
      == Some(target.as_str())
    {
      trace!(
        section = %target,
        "fragment already applied"
      );
      return;
    }
    self.show_section(&target);
  }
}
