#![allow(dead_code)]

use std::cell::{
  Cell,
  RefCell
};
use std::collections::{
  BTreeMap,
  BTreeSet,
  VecDeque
};
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use rally_core::config::{
  CalendarOptions,
  SiteConfig
};
use rally_core::{
  CalendarHooks,
  CalendarWidget,
  FetchError,
  Host,
  Page,
  Runtime,
  Transport,
  UiController
};

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
  pub selectors:          Vec<String>,
  pub attrs:              BTreeMap<String, String>,
  pub classes:            BTreeSet<String>,
  pub display:            Option<String>,
  pub text:               String,
  pub html:               String,
  pub value:              Option<String>,
  pub scripts_activated:  u32
}

impl FakeElement {
  pub fn new(selector: &str) -> Self {
    Self {
      selectors: vec![selector.to_string()],
      ..Self::default()
    }
  }

  pub fn attr(
    mut self,
    name: &str,
    value: &str
  ) -> Self {
    self.attrs.insert(
      name.to_string(),
      value.to_string()
    );
    self
  }

  pub fn class(mut self, name: &str) -> Self {
    self.classes.insert(name.to_string());
    self
  }

  pub fn value(mut self, value: &str) -> Self {
    self.value = Some(value.to_string());
    self
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
  pub method: &'static str,
  pub url:    String,
  pub fields: Vec<(String, String)>
}

pub struct FakeState {
  pub elements:           RefCell<Vec<FakeElement>>,
  pub fragment:           RefCell<String>,
  pub fragment_writes:    RefCell<Vec<String>>,
  pub reloads:            Cell<u32>,
  pub scrolls:            Cell<u32>,
  pub storage:            RefCell<BTreeMap<String, String>>,
  pub responses: RefCell<
    BTreeMap<String, Result<String, FetchError>>
  >,
  pub requests:           RefCell<Vec<RecordedRequest>>,
  pub tasks: RefCell<
    VecDeque<LocalBoxFuture<'static, ()>>
  >,
  pub timers: RefCell<Vec<(u32, Box<dyn FnOnce()>)>>,
  pub timer_log:          RefCell<Vec<u32>>,
  pub calendar_available: Cell<bool>,
  pub calendar_mounts:    Cell<u32>,
  pub calendar_renders:   Rc<Cell<u32>>,
  pub calendar_hooks:     RefCell<Option<CalendarHooks>>
}

/// Recording stand-in for the browser. Spawned
/// futures and timers only run when the test asks.
#[derive(Clone)]
pub struct FakeHost(pub Rc<FakeState>);

pub struct FakeCalendar {
  renders: Rc<Cell<u32>>
}

impl CalendarWidget for FakeCalendar {
  fn render(&self) {
    self.renders.set(self.renders.get() + 1);
  }
}

impl FakeHost {
  pub fn empty() -> Self {
    Self(Rc::new(FakeState {
      elements:           RefCell::new(vec![]),
      fragment:           RefCell::new(
        String::new()
      ),
      fragment_writes:    RefCell::new(vec![]),
      reloads:            Cell::new(0),
      scrolls:            Cell::new(0),
      storage:            RefCell::new(
        BTreeMap::new()
      ),
      responses:          RefCell::new(
        BTreeMap::new()
      ),
      requests:           RefCell::new(vec![]),
      tasks:              RefCell::new(
        VecDeque::new()
      ),
      timers:             RefCell::new(vec![]),
      timer_log:          RefCell::new(vec![]),
      calendar_available: Cell::new(true),
      calendar_mounts:    Cell::new(0),
      calendar_renders:   Rc::new(Cell::new(0)),
      calendar_hooks:     RefCell::new(None)
    }))
  }

  /// A page laid out like the real site: nav links
  /// and sections for every configured section,
  /// the alert bar, auth panels, fragment
  /// containers and the calendar toggle.
  pub fn site(config: &SiteConfig) -> Self {
    let host = Self::empty();
    for section in &config.sections {
      host.add(
        FakeElement::new(".navlink")
          .attr("data-section", section)
      );
      host.add(
        FakeElement::new("main > section")
          .attr("id", section)
      );
    }
    for selector in [
      "nav",
      "#alertBar",
      "#alertText",
      "#alertButtons",
      "#alertCloseBtn",
      ".toggle-buttons",
      "#login-tab-btn",
      "#signup-tab-btn",
      "#signuppage",
      "#forgetpasswordpage",
      "#forgetemail",
      "#newpassword",
      "#listViewBtn",
      "#calendarViewBtn",
      "#calendarView",
      "#campaignsLoadingState",
      "#campaignsContent",
      "#addFormLoadingState",
      "#addFormContent",
      "#pendingLoadingState",
      "#pendingContent",
      "#sideChatDrawer",
      "#globalChatIframe"
    ] {
      host.add(FakeElement::new(selector));
    }
    host.add(
      FakeElement::new("#loginpage")
        .class("active")
    );
    host.add(
      FakeElement::new(
        "input[name=\"loginusername\"]"
      )
      .value("")
    );
    host.add(
      FakeElement::new("#loginpassword")
        .value("")
    );
    host
  }

  pub fn add(&self, element: FakeElement) {
    self.0.elements.borrow_mut().push(element);
  }

  pub fn respond(
    &self,
    url: &str,
    response: Result<&str, FetchError>
  ) {
    self.0.responses.borrow_mut().insert(
      url.to_string(),
      response.map(str::to_string)
    );
  }

  pub fn controller(
    &self,
    config: SiteConfig
  ) -> Rc<UiController<FakeHost>> {
    UiController::new(self.clone(), config)
  }

  /// Drives every queued future to completion,
  /// including ones queued while running.
  pub fn run_tasks(&self) {
    loop {
      let next =
        self.0.tasks.borrow_mut().pop_front();
      match next {
        | Some(task) => {
          futures::executor::block_on(task)
        }
        | None => break
      }
    }
  }

  pub fn fire_timers(&self) {
    let due: Vec<_> =
      self.0.timers.borrow_mut().drain(..).collect();
    for (_, task) in due {
      task();
    }
  }

  pub fn pending_timers(&self) -> usize {
    self.0.timers.borrow().len()
  }

  pub fn timer_delays(&self) -> Vec<u32> {
    self.0.timer_log.borrow().clone()
  }

  pub fn requests_to(
    &self,
    url: &str
  ) -> Vec<RecordedRequest> {
    self
      .0
      .requests
      .borrow()
      .iter()
      .filter(|request| request.url == url)
      .cloned()
      .collect()
  }

  pub fn find(
    &self,
    selector: &str
  ) -> Vec<FakeElement> {
    self
      .0
      .elements
      .borrow()
      .iter()
      .filter(|element| {
        element
          .selectors
          .iter()
          .any(|s| s == selector)
      })
      .cloned()
      .collect()
  }

  pub fn one(
    &self,
    selector: &str
  ) -> FakeElement {
    self
      .find(selector)
      .into_iter()
      .next()
      .unwrap_or_else(|| {
        panic!("no element for {selector}")
      })
  }

  pub fn has_class(
    &self,
    selector: &str,
    class: &str
  ) -> bool {
    self.one(selector).classes.contains(class)
  }

  pub fn display(
    &self,
    selector: &str
  ) -> Option<String> {
    self.one(selector).display
  }

  pub fn active_attrs(
    &self,
    selector: &str,
    attr: &str
  ) -> Vec<String> {
    self
      .find(selector)
      .into_iter()
      .filter(|element| {
        element.classes.contains("active")
      })
      .filter_map(|element| {
        element.attrs.get(attr).cloned()
      })
      .collect()
  }

  fn each(
    &self,
    selector: &str,
    mut apply: impl FnMut(&mut FakeElement)
  ) {
    for element in self
      .0
      .elements
      .borrow_mut()
      .iter_mut()
      .filter(|element| {
        element
          .selectors
          .iter()
          .any(|s| s == selector)
      })
    {
      apply(element);
    }
  }

  fn respond_to(
    &self,
    method: &'static str,
    url: &str,
    fields: Vec<(String, String)>
  ) -> LocalBoxFuture<
    'static,
    Result<String, FetchError>
  > {
    self.0.requests.borrow_mut().push(
      RecordedRequest {
        method,
        url: url.to_string(),
        fields
      }
    );
    let response = self
      .0
      .responses
      .borrow()
      .get(url)
      .cloned()
      .unwrap_or_else(|| {
        Err(FetchError::Status {
          status: 404,
          url:    url.to_string()
        })
      });
    async move { response }.boxed_local()
  }
}

impl Page for FakeHost {
  fn set_class(
    &self,
    selector: &str,
    class: &str,
    on: bool
  ) {
    self.each(selector, |element| {
      if on {
        element.classes.insert(class.to_string());
      } else {
        element.classes.remove(class);
      }
    });
  }

  fn mark_matching(
    &self,
    selector: &str,
    attr: &str,
    value: &str,
    class: &str
  ) {
    self.each(selector, |element| {
      if element.attrs.get(attr).map(String::as_str)
        == Some(value)
      {
        element.classes.insert(class.to_string());
      } else {
        element.classes.remove(class);
      }
    });
  }

  fn set_display(
    &self,
    selector: &str,
    display: &str
  ) {
    self.each(selector, |element| {
      element.display = Some(display.to_string());
    });
  }

  fn set_text(&self, selector: &str, text: &str) {
    self.each(selector, |element| {
      element.text = text.to_string();
    });
  }

  fn set_html(&self, selector: &str, html: &str) {
    self.each(selector, |element| {
      element.html = html.to_string();
    });
  }

  fn activate_scripts(&self, selector: &str) {
    self.each(selector, |element| {
      element.scripts_activated += 1;
    });
  }

  fn value(&self, selector: &str) -> Option<String> {
    self
      .find(selector)
      .into_iter()
      .next()
      .and_then(|element| element.value)
  }

  fn set_value(&self, selector: &str, value: &str) {
    self.each(selector, |element| {
      element.value = Some(value.to_string());
    });
  }

  fn attribute(
    &self,
    selector: &str,
    name: &str
  ) -> Option<String> {
    self
      .find(selector)
      .into_iter()
      .next()
      .and_then(|element| {
        element.attrs.get(name).cloned()
      })
  }

  fn set_attribute(
    &self,
    selector: &str,
    name: &str,
    value: &str
  ) {
    self.each(selector, |element| {
      element
        .attrs
        .insert(name.to_string(), value.to_string());
    });
  }

  fn scroll_to_top(&self) {
    self.0.scrolls.set(self.0.scrolls.get() + 1);
  }

  fn fragment(&self) -> String {
    self.0.fragment.borrow().clone()
  }

  fn set_fragment(&self, fragment: &str) {
    *self.0.fragment.borrow_mut() =
      fragment.to_string();
    self
      .0
      .fragment_writes
      .borrow_mut()
      .push(fragment.to_string());
  }

  fn reload(&self) {
    self.0.reloads.set(self.0.reloads.get() + 1);
  }

  fn stored(&self, key: &str) -> Option<String> {
    self.0.storage.borrow().get(key).cloned()
  }

  fn forget(&self, key: &str) {
    self.0.storage.borrow_mut().remove(key);
  }
}

impl Transport for FakeHost {
  fn get_text(
    &self,
    url: &str
  ) -> LocalBoxFuture<
    'static,
    Result<String, FetchError>
  > {
    self.respond_to("GET", url, vec![])
  }

  fn post_form(
    &self,
    url: &str,
    fields: Vec<(String, String)>
  ) -> LocalBoxFuture<
    'static,
    Result<String, FetchError>
  > {
    self.respond_to("POST", url, fields)
  }
}

impl Runtime for FakeHost {
  fn spawn(
    &self,
    task: LocalBoxFuture<'static, ()>
  ) {
    self.0.tasks.borrow_mut().push_back(task);
  }

  fn schedule(
    &self,
    delay_ms: u32,
    task: Box<dyn FnOnce()>
  ) {
    self.0.timer_log.borrow_mut().push(delay_ms);
    self.0.timers.borrow_mut().push((delay_ms, task));
  }
}

impl Host for FakeHost {
  type Calendar = FakeCalendar;

  fn mount_calendar(
    &self,
    _options: &CalendarOptions,
    hooks: CalendarHooks
  ) -> Option<FakeCalendar> {
    if !self.0.calendar_available.get() {
      return None;
    }
    self
      .0
      .calendar_mounts
      .set(self.0.calendar_mounts.get() + 1);
    *self.0.calendar_hooks.borrow_mut() =
      Some(hooks);
    let calendar = FakeCalendar {
      renders: Rc::clone(&self.0.calendar_renders)
    };
    calendar.render();
    Some(calendar)
  }
}
