use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::{
  debug,
  info
};

use crate::calendar::ViewMode;
use crate::config::SiteConfig;
use crate::host::Host;
use crate::loader::{
  LoadRecord,
  LoaderKey
};

pub(crate) type FragmentHook = Rc<dyn Fn()>;

/// Page state that outlives a single event
/// handler.
pub struct AppState<C> {
  pub(crate) loaders:          BTreeMap<LoaderKey, LoadRecord>,
  pub(crate) current:          Option<String>,
  pub(crate) view:             Option<ViewMode>,
  pub(crate) calendar:         Option<Rc<C>>,
  pub(crate) alert_generation: u64,
  pub(crate) torn_down:        bool
}

impl<C> Default for AppState<C> {
  fn default() -> Self {
    Self {
      loaders:          LoaderKey::ALL
        .into_iter()
        .map(|key| {
          (key, LoadRecord::default())
        })
        .collect(),
      current:          None,
      view:             None,
      calendar:         None,
      alert_generation: 0,
      torn_down:        false
    }
  }
}

/// How the page is being left.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum PageExit {
  /// Kept in the back/forward cache; the same
  /// document may be shown again.
  Cached,
  Unloaded
}

impl PageExit {
  pub fn from_pagehide(persisted: bool) -> Self {
    if persisted {
      PageExit::Cached
    } else {
      PageExit::Unloaded
    }
  }
}

/// Owns every piece of interactive behavior on
/// the page. One instance is built at startup and
/// torn down when the page unloads; handlers hold
/// it through `Rc`.
pub struct UiController<H: Host> {
  pub(crate) host:   H,
  pub(crate) config: SiteConfig,
  pub(crate) state:
    RefCell<AppState<H::Calendar>>,
  pub(crate) hooks: RefCell<
    BTreeMap<LoaderKey, Vec<FragmentHook>>
  >
}

impl<H: Host> UiController<H> {
  pub fn new(
    host: H,
    config: SiteConfig
  ) -> Rc<Self> {
    debug!(
      sections = config.sections.len(),
      "building ui controller"
    );
    Rc::new(Self {
      host,
      config,
      state: RefCell::new(
        AppState::default()
      ),
      hooks: RefCell::new(BTreeMap::new())
    })
  }

  pub fn host(&self) -> &H {
    &self.host
  }

  pub fn config(&self) -> &SiteConfig {
    &self.config
  }

  /// Runs the page-load sequence: hands over any
  /// stored notification, then shows the section
  /// named by the current fragment.
  #[tracing::instrument(skip_all)]
  pub fn start(self: &Rc<Self>) {
    info!("starting ui controller");
    self.consume_stored_alert();
    let fragment = self.host.fragment();
    self.show_section(&fragment);
  }

  /// Registers `hook` to run once the fragment for
  /// `key` has been fetched and injected.
  pub fn on_fragment_loaded<F>(
    &self,
    key: LoaderKey,
    hook: F
  ) where
    F: Fn() + 'static
  {
    self
      .hooks
      .borrow_mut()
      .entry(key)
      .or_default()
      .push(Rc::new(hook));
  }

  /// Drops hooks and the calendar instance. Every
  /// entry point is a no-op afterwards.
  #[tracing::instrument(skip_all)]
  pub fn teardown(&self) {
    let mut state = self.state.borrow_mut();
    if state.torn_down {
      return;
    }
    state.torn_down = true;
    state.calendar = None;
    drop(state);
    self.hooks.borrow_mut().clear();
    info!("ui controller torn down");
  }

  /// Tears down unless the page is only being
  /// cached. Returns whether it did.
  pub fn on_page_exit(
    &self,
    exit: PageExit
  ) -> bool {
    match exit {
      | PageExit::Cached => {
        debug!("page cached; staying live");
        false
      }
      | PageExit::Unloaded => {
        self.teardown();
        true
      }
    }
  }

  pub fn is_live(&self) -> bool {
    !self.state.borrow().torn_down
  }

  pub fn current_section(
    &self
  ) -> Option<String> {
    self.state.borrow().current.clone()
  }

  pub(crate) fn guard(
    &self,
    action: &'static str
  ) -> bool {
    let live = self.is_live();
    if !live {
      debug!(
        action,
        "ignoring call after teardown"
      );
    }
    live
  }
}
