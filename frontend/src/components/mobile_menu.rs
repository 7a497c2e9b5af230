use std::cell::Cell;
use std::rc::Rc;

use web_sys::{Document, Element, HtmlElement, MouseEvent};

use crate::dom::{self, Listener};

pub const TOGGLE_ID: &str = "navToggle";
pub const MENU_ID: &str = "mobileMenu";
pub const ACTIVE_CLASS: &str = "active";

/// The three things that must agree whenever the menu opens or closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuFlags {
    pub menu_active: bool,
    pub toggle_active: bool,
    pub scroll_locked: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuState {
    open: bool,
}

impl MenuState {
    pub fn is_open(self) -> bool {
        self.open
    }

    pub fn toggled(self) -> Self {
        Self { open: !self.open }
    }

    pub fn closed(self) -> Self {
        Self { open: false }
    }

    pub fn flags(self) -> MenuFlags {
        MenuFlags {
            menu_active: self.open,
            toggle_active: self.open,
            scroll_locked: self.open,
        }
    }
}

struct MenuParts {
    toggle: Element,
    menu: Element,
    body: Option<HtmlElement>,
    state: Cell<MenuState>,
}

impl MenuParts {
    fn apply(&self, next: MenuState) {
        self.state.set(next);
        let flags = next.flags();
        dom::set_class(&self.menu, ACTIVE_CLASS, flags.menu_active);
        dom::set_class(&self.toggle, ACTIVE_CLASS, flags.toggle_active);
        if let Some(body) = &self.body {
            dom::set_style(body, "overflow", if flags.scroll_locked { "hidden" } else { "" });
        }
    }
}

/// Hamburger toggle for the mobile nav overlay. The menu only closes through
/// the toggle or by following one of its links.
pub struct MobileMenu {
    parts: Rc<MenuParts>,
    _toggle: Option<Listener<MouseEvent>>,
    _links: Vec<Listener<MouseEvent>>,
}

impl MobileMenu {
    pub fn mount(document: &Document) -> Option<Self> {
        let (Some(toggle), Some(menu)) = (
            document.get_element_by_id(TOGGLE_ID),
            document.get_element_by_id(MENU_ID),
        ) else {
            log::debug!("no #{} / #{}, mobile menu disabled", TOGGLE_ID, MENU_ID);
            return None;
        };

        let parts = Rc::new(MenuParts {
            toggle: toggle.clone(),
            menu: menu.clone(),
            body: document.body(),
            state: Cell::new(MenuState::default()),
        });

        let on_toggle = {
            let parts = parts.clone();
            dom::listen(&toggle, "click", move |_: MouseEvent| {
                parts.apply(parts.state.get().toggled());
            })
        };

        let links = menu
            .query_selector_all("a")
            .map(|list| {
                (0..list.length())
                    .filter_map(|i| list.item(i))
                    .filter_map(|link| {
                        let parts = parts.clone();
                        dom::listen(&link, "click", move |_: MouseEvent| {
                            parts.apply(parts.state.get().closed());
                        })
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        Some(Self { parts, _toggle: on_toggle, _links: links })
    }

    pub fn state(&self) -> MenuState {
        self.parts.state.get()
    }
}
