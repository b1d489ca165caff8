use anyhow::{
  Context,
  anyhow
};
use serde::Deserialize;
use tracing::{
  debug,
  info,
  warn
};

use crate::loader::LoaderKey;

const SITE_CONFIG_TOML: &str =
  include_str!("../assets/site.toml");

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct SiteConfig {
  pub version:          u32,
  pub home:             String,
  pub sections:         Vec<String>,
  pub stored_alert_key: String,
  pub alerts:           AlertConfig,
  pub timing:           TimingConfig,
  pub endpoints:        Endpoints,
  pub calendar:         CalendarOptions,
  pub campaigns:        CampaignConfig,
  pub loaders:          Loaders
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct AlertConfig {
  pub default_duration_ms: u32
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct TimingConfig {
  pub calendar_rerender_ms: u32,
  pub add_event_reload_ms:  u32,
  pub chat_clear_ms:        u32
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct Endpoints {
  pub login:            String,
  pub signup:           String,
  pub forgot_password:  String,
  pub add_event:        String,
  pub save_draft:       String,
  pub events:           String,
  pub change_template:  String,
  pub view_your_events: String,
  pub set_sort_by:      String,
  pub event_chat:       String
}

/// Options forwarded to the calendar widget
/// when it is first mounted.
#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct CalendarOptions {
  pub container:      String,
  pub initial_view:   String,
  pub toolbar_left:   String,
  pub toolbar_center: String,
  pub toolbar_right:  String,
  #[serde(skip)]
  pub events_url:     String
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct CampaignConfig {
  pub preview_cards: usize
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct LoaderSpec {
  pub section: String,
  pub url:     String,
  pub loading: String,
  pub content: String,
  pub retry:   String
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct Loaders {
  pub campaigns: LoaderSpec,
  pub add_form:  LoaderSpec,
  pub pending:   LoaderSpec
}

impl SiteConfig {
  /// Parses and sanitizes a site config.
  #[tracing::instrument(skip(text))]
  pub fn parse(
    text: &str
  ) -> anyhow::Result<Self> {
    let mut config =
      toml::from_str::<SiteConfig>(text)
        .context(
          "failed to parse site config"
        )?;
    config.sanitize();
    config.validate()?;
    debug!(
      version = config.version,
      sections = config.sections.len(),
      "parsed site config"
    );
    Ok(config)
  }

  /// The config compiled into the binary, or the
  /// built-in defaults when it does not parse.
  pub fn embedded() -> Self {
    match Self::parse(SITE_CONFIG_TOML) {
      | Ok(config) => {
        info!(
          version = config.version,
          home = %config.home,
          "loaded site config"
        );
        config
      }
      | Err(error) => {
        tracing::error!(%error, "failed parsing site config; using defaults");
        SiteConfig::default()
      }
    }
  }

  pub fn loader(
    &self,
    key: LoaderKey
  ) -> &LoaderSpec {
    match key {
      | LoaderKey::Campaigns => {
        &self.loaders.campaigns
      }
      | LoaderKey::AddForm => {
        &self.loaders.add_form
      }
      | LoaderKey::Pending => {
        &self.loaders.pending
      }
    }
  }

  pub fn loader_for_section(
    &self,
    section: &str
  ) -> Option<LoaderKey> {
    LoaderKey::ALL
      .into_iter()
      .find(|key| {
        self.loader(*key).section
          == section
      })
  }

  pub fn is_section(
    &self,
    id: &str
  ) -> bool {
    self
      .sections
      .iter()
      .any(|section| section == id)
  }

  pub fn calendar_options(
    &self
  ) -> CalendarOptions {
    CalendarOptions {
      events_url: self
        .endpoints
        .events
        .clone(),
      ..self.calendar.clone()
    }
  }

  fn sanitize(&mut self) {
    let defaults = SiteConfig::default();

    if self.home.trim().is_empty() {
      self.home = defaults.home.clone();
    }
    self.sections.retain(|section| {
      !section.trim().is_empty()
    });
    if !self.is_section(&self.home) {
      warn!(home = %self.home, "home section missing from section list; adding it");
      self
        .sections
        .insert(0, self.home.clone());
    }
    if self
      .stored_alert_key
      .trim()
      .is_empty()
    {
      self.stored_alert_key =
        defaults.stored_alert_key;
    }

    if self.alerts.default_duration_ms
      == 0
    {
      self.alerts.default_duration_ms =
        defaults
          .alerts
          .default_duration_ms;
    }
    if self.timing.calendar_rerender_ms
      == 0
    {
      self.timing.calendar_rerender_ms =
        defaults
          .timing
          .calendar_rerender_ms;
    }
    if self.timing.add_event_reload_ms
      == 0
    {
      self.timing.add_event_reload_ms =
        defaults
          .timing
          .add_event_reload_ms;
    }
    if self.timing.chat_clear_ms == 0 {
      self.timing.chat_clear_ms =
        defaults.timing.chat_clear_ms;
    }
    if self.campaigns.preview_cards == 0
    {
      self.campaigns.preview_cards =
        defaults
          .campaigns
          .preview_cards;
    }
  }

  fn validate(
    &self
  ) -> anyhow::Result<()> {
    for key in LoaderKey::ALL {
      let spec = self.loader(key);
      if spec.url.trim().is_empty() {
        return Err(anyhow!(
          "loader {} has no url",
          key.as_str()
        ));
      }
      if !self.is_section(&spec.section)
      {
        return Err(anyhow!(
          "loader {} targets unknown \
           section {}",
          key.as_str(),
          spec.section
        ));
      }
    }
    Ok(())
  }
}

impl Default for SiteConfig {
  fn default() -> Self {
    Self {
      version:          1,
      home:             "home".to_string(),
      sections:         [
        "home",
        "campaigns",
        "add",
        "pending",
        "account"
      ]
      .into_iter()
      .map(str::to_string)
      .collect(),
      stored_alert_key:
        "showLanguageChangeAlert"
          .to_string(),
      alerts:           AlertConfig::default(),
      timing:           TimingConfig::default(),
      endpoints:        Endpoints::default(),
      calendar:
        CalendarOptions::default(),
      campaigns:
        CampaignConfig::default(),
      loaders:          Loaders::default()
    }
  }
}

impl Default for AlertConfig {
  fn default() -> Self {
    Self {
      default_duration_ms: 5_000
    }
  }
}

impl Default for TimingConfig {
  fn default() -> Self {
    Self {
      calendar_rerender_ms: 100,
      add_event_reload_ms:  4_000,
      chat_clear_ms:        400
    }
  }
}

impl Default for Endpoints {
  fn default() -> Self {
    Self {
      login:            "/login".to_string(),
      signup:           "/signup"
        .to_string(),
      forgot_password:  "/forgetpassword"
        .to_string(),
      add_event:        "/addeventreq"
        .to_string(),
      save_draft:       "/save_draft"
        .to_string(),
      events:           "/api".to_string(),
      change_template:  "/changetemplate"
        .to_string(),
      view_your_events: "/viewyourevents"
        .to_string(),
      set_sort_by:      "/setsortby"
        .to_string(),
      event_chat:
        "/group-chat/from-event"
          .to_string()
    }
  }
}

impl Default for CalendarOptions {
  fn default() -> Self {
    Self {
      container:      "#calendar"
        .to_string(),
      initial_view:   "dayGridMonth"
        .to_string(),
      toolbar_left:   "prev,next today"
        .to_string(),
      toolbar_center: "title".to_string(),
      toolbar_right:
        "dayGridMonth,listWeek"
          .to_string(),
      events_url:     String::new()
    }
  }
}

impl Default for CampaignConfig {
  fn default() -> Self {
    Self {
      preview_cards: 4
    }
  }
}

impl Default for Loaders {
  fn default() -> Self {
    Self {
      campaigns: LoaderSpec {
        section: "campaigns".to_string(),
        url:     "/show_campaigns"
          .to_string(),
        loading: "#campaignsLoadingState"
          .to_string(),
        content: "#campaignsContent"
          .to_string(),
        retry:   "loadCampaigns()"
          .to_string()
      },
      add_form:  LoaderSpec {
        section: "add".to_string(),
        url:     "/show_add_form"
          .to_string(),
        loading: "#addFormLoadingState"
          .to_string(),
        content: "#addFormContent"
          .to_string(),
        retry:   "loadAddForm()"
          .to_string()
      },
      pending:   LoaderSpec {
        section: "pending".to_string(),
        url:     "/show_pending_events"
          .to_string(),
        loading: "#pendingLoadingState"
          .to_string(),
        content: "#pendingContent"
          .to_string(),
        retry:   "loadPendingEvents()"
          .to_string()
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embedded_config_matches_defaults() {
    let parsed =
      SiteConfig::parse(SITE_CONFIG_TOML)
        .expect("embedded config parses");

    assert_eq!(
      parsed,
      SiteConfig::default()
    );
  }

  #[test]
  fn zero_timings_fall_back_to_defaults() {
    let parsed = SiteConfig::parse(
      "[timing]\n\
       calendar_rerender_ms = 0\n\
       add_event_reload_ms = 2500\n",
    )
    .expect("partial config parses");

    assert_eq!(
      parsed.timing.calendar_rerender_ms,
      100
    );
    assert_eq!(
      parsed.timing.add_event_reload_ms,
      2_500
    );
    assert_eq!(
      parsed.alerts.default_duration_ms,
      5_000
    );
  }

  #[test]
  fn home_is_forced_into_sections() {
    let parsed = SiteConfig::parse(
      "home = \"start\"\n\
       sections = [\"campaigns\", \
       \"add\", \"pending\"]\n",
    )
    .expect("config parses");

    assert_eq!(parsed.sections[0], "start");
    assert!(parsed.is_section("start"));
  }

  #[test]
  fn loader_on_unknown_section_is_rejected(
  ) {
    let error = SiteConfig::parse(
      "sections = [\"home\", \
       \"campaigns\", \"add\"]\n",
    )
    .expect_err("pending is missing");

    assert!(
      error
        .to_string()
        .contains("pending")
    );
  }

  #[test]
  fn sections_map_back_to_loaders() {
    let config = SiteConfig::default();

    assert_eq!(
      config.loader_for_section("add"),
      Some(LoaderKey::AddForm)
    );
    assert_eq!(
      config.loader_for_section("home"),
      None
    );
    assert_eq!(
      config.calendar_options().events_url,
      "/api"
    );
  }
}
