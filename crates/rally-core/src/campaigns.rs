//! Behavior of the campaign listing fragment:
//! category focus, card search and description
//! expansion. The shell walks the DOM; the
//! decisions live here.

use crate::controller::UiController;
use crate::host::Host;

pub const CAMPAIGNS_SECTION: &str =
  "#campaigns";
pub const CATEGORY_WRAPPER: &str =
  ".campaign-category-wrapper";
pub const CARD: &str = ".campaign-card";
pub const VIEW_ALL: &str = ".view-all-btn";
pub const BACK_TO_ALL: &str =
  "#backToAllBtn";
pub const CATEGORY_ATTR: &str =
  "data-category-id";
pub const SEARCH_HIDDEN: &str =
  "search-hidden";
pub const COLLAPSED: &str = "hidden";

/// Case-insensitive substring match of a card's
/// rendered text. An empty query matches all.
pub fn matches_query(
  card_text: &str,
  query: &str
) -> bool {
  card_text
    .to_lowercase()
    .contains(&query.to_lowercase())
}

/// Whether a category wrapper stays visible while
/// `focus` is the category being browsed.
pub fn wrapper_visible(
  category: Option<&str>,
  focus: &str
) -> bool {
  category == Some(focus)
}

/// Display of a category wrapper while `focus` is
/// browsed. The overview shows every wrapper as
/// `block`.
pub fn wrapper_display(
  category: Option<&str>,
  focus: &str
) -> &'static str {
  if wrapper_visible(category, focus) {
    "block"
  } else {
    "none"
  }
}

/// Cards past the preview count are collapsed in
/// the overview.
pub fn collapsed_in_overview(
  index: usize,
  preview_cards: usize
) -> bool {
  index >= preview_cards
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum DescriptionAction {
  More,
  Less
}

impl DescriptionAction {
  pub fn parse(raw: &str) -> Self {
    if raw.trim() == "more" {
      DescriptionAction::More
    } else {
      DescriptionAction::Less
    }
  }
}

impl<H: Host> UiController<H> {
  pub fn toggle_description(
    &self,
    id: &str,
    action: DescriptionAction
  ) {
    if !self.guard("toggle_description") {
      return;
    }
    let short = format!("#desc-short-{id}");
    let full = format!("#desc-full-{id}");
    let more =
      format!("#read-more-btn-{id}");
    let less =
      format!("#read-less-btn-{id}");

    let (shown, hidden) = match action {
      | DescriptionAction::More => {
        ([full, less], [short, more])
      }
      | DescriptionAction::Less => {
        ([short, more], [full, less])
      }
    };
    for selector in &shown {
      self.host.set_display(selector, "inline");
    }
    for selector in &hidden {
      self.host.set_display(selector, "none");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn focused_category_is_the_only_block() {
    assert_eq!(
      wrapper_display(Some("7"), "7"),
      "block"
    );
    assert_eq!(
      wrapper_display(Some("3"), "7"),
      "none"
    );
    assert_eq!(wrapper_display(None, "7"), "none");
  }

  #[test]
  fn search_ignores_case() {
    assert!(matches_query(
      "Beach Cleanup at Juhu",
      "cleanup"
    ));
    assert!(matches_query(
      "Beach Cleanup",
      ""
    ));
    assert!(!matches_query(
      "Tree drive",
      "beach"
    ));
  }

  #[test]
  fn focus_shows_only_its_category() {
    assert!(wrapper_visible(
      Some("health"),
      "health"
    ));
    assert!(!wrapper_visible(
      Some("environment"),
      "health"
    ));
    assert!(!wrapper_visible(
      None, "health"
    ));
  }

  #[test]
  fn overview_keeps_the_first_cards() {
    let collapsed: Vec<bool> = (0..6)
      .map(|index| {
        collapsed_in_overview(index, 4)
      })
      .collect();

    assert_eq!(
      collapsed,
      vec![
        false, false, false, false, true,
        true
      ]
    );
  }
}
