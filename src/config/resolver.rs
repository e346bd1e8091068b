use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::config::actions::{DetailAction, DialogAction, GlobalAction, NavAction, PointsAction};
use crate::config::key::KeyBinding;
use crate::config::keybindings::KeybindingsConfig;

/// Maps key events to configured actions.
pub struct KeyResolver {
    pub keybindings: Arc<KeybindingsConfig>,
}

impl KeyResolver {
    pub const fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    fn global(&self, action: GlobalAction) -> &KeyBinding {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => &kb.quit,
            GlobalAction::Back => &kb.back,
        }
    }

    fn nav(&self, action: NavAction) -> &KeyBinding {
        let kb = &self.keybindings.navigation;
        match action {
            NavAction::Up => &kb.up,
            NavAction::Down => &kb.down,
            NavAction::Left => &kb.left,
            NavAction::Right => &kb.right,
            NavAction::Home => &kb.home,
            NavAction::End => &kb.end,
            NavAction::Select => &kb.select,
        }
    }

    fn points(&self, action: PointsAction) -> &KeyBinding {
        let kb = &self.keybindings.points;
        match action {
            PointsAction::ToggleCategory => &kb.toggle_category,
            PointsAction::Reload => &kb.reload,
        }
    }

    fn detail(&self, action: DetailAction) -> &KeyBinding {
        let kb = &self.keybindings.detail;
        match action {
            DetailAction::CopyEmail => &kb.copy_email,
            DetailAction::CopyWhatsapp => &kb.copy_whatsapp,
            DetailAction::Reload => &kb.reload,
        }
    }

    fn dialog(&self, action: DialogAction) -> &KeyBinding {
        match action {
            DialogAction::Dismiss => &self.keybindings.dialog.dismiss,
        }
    }

    pub fn matches_global(&self, event: &KeyEvent, action: GlobalAction) -> bool {
        self.global(action).matches(event)
    }

    pub fn display_global(&self, action: GlobalAction) -> String {
        self.global(action).display()
    }

    pub fn matches_nav(&self, event: &KeyEvent, action: NavAction) -> bool {
        self.nav(action).matches(event)
    }

    pub fn display_nav(&self, action: NavAction) -> String {
        self.nav(action).display()
    }

    pub fn matches_points(&self, event: &KeyEvent, action: PointsAction) -> bool {
        self.points(action).matches(event)
    }

    pub fn display_points(&self, action: PointsAction) -> String {
        self.points(action).display()
    }

    pub fn matches_detail(&self, event: &KeyEvent, action: DetailAction) -> bool {
        self.detail(action).matches(event)
    }

    pub fn display_detail(&self, action: DetailAction) -> String {
        self.detail(action).display()
    }

    pub fn matches_dialog(&self, event: &KeyEvent, action: DialogAction) -> bool {
        self.dialog(action).matches(event)
    }
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new(Arc::new(KeybindingsConfig::default()))
    }
}
