use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuEvent {
    /// Click on the trigger button.
    TriggerClick,
    /// Click that landed outside the menu container.
    OutsideClick,
    Escape,
}

/// Attribute values the page writes for a given state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuView {
    /// Whether the container carries the `open` class.
    pub open: bool,
    /// `aria-expanded` on the trigger.
    pub aria_expanded: &'static str,
    /// `aria-hidden` on the panel, if the markup has one.
    pub panel_aria_hidden: &'static str,
    /// `tabindex` for each focusable item inside the panel.
    pub item_tab_index: i32,
}

impl MenuView {
    #[must_use]
    pub const fn for_state(state: MenuState) -> Self {
        match state {
            MenuState::Open => Self {
                open: true,
                aria_expanded: "true",
                panel_aria_hidden: "false",
                item_tab_index: 0,
            },
            MenuState::Closed => Self {
                open: false,
                aria_expanded: "false",
                panel_aria_hidden: "true",
                item_tab_index: -1,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuTransition {
    pub view: MenuView,
    /// The triggering click must not reach the document-level closer.
    pub stop_propagation: bool,
    pub focus_trigger: bool,
}

#[derive(Debug, Default)]
pub struct Menu {
    state: MenuState,
}

impl Menu {
    /// Adopts whatever state the markup already shows and returns the view
    /// that brings the attributes in line with it.
    #[must_use]
    pub const fn from_markup(open_in_markup: bool) -> (Self, MenuView) {
        let state = if open_in_markup {
            MenuState::Open
        } else {
            MenuState::Closed
        };
        (Self { state }, MenuView::for_state(state))
    }

    #[must_use]
    pub const fn state(&self) -> MenuState {
        self.state
    }

    pub fn handle(&mut self, event: MenuEvent) -> MenuTransition {
        let (next, stop_propagation, focus_trigger) = match event {
            MenuEvent::TriggerClick => (
                match self.state {
                    MenuState::Open => MenuState::Closed,
                    MenuState::Closed => MenuState::Open,
                },
                true,
                false,
            ),
            MenuEvent::OutsideClick => (MenuState::Closed, false, false),
            MenuEvent::Escape => (MenuState::Closed, false, true),
        };
        debug!(?event, from = ?self.state, to = ?next, "Menu transition");
        self.state = next;

        MenuTransition {
            view: MenuView::for_state(next),
            stop_propagation,
            focus_trigger,
        }
    }
}

/// A click on the logo while already on the home page would only reload it.
#[must_use]
pub fn suppress_logo_navigation(current_path: &str) -> bool {
    current_path == "/"
}
