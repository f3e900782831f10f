use serde::{Deserialize, Serialize};

use crate::models::{UserProfile, WellnessTip};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    #[default]
    Profile,
    Board,
    Details,
    Saved,
}

/// Explicit per-user state, passed by reference to whatever drives the flows.
///
/// Saved tips keep insertion order for display; membership is by id only.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    profile: Option<UserProfile>,
    tips: Vec<WellnessTip>,
    saved: Vec<WellnessTip>,
    selected: Option<WellnessTip>,
    screen: Screen,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the saved set from a persistence adapter. Duplicate ids keep the first copy.
    pub fn restore_saved(&mut self, saved: Vec<WellnessTip>) {
        self.saved.clear();
        for tip in saved {
            self.save_tip(tip);
        }
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn set_profile(&mut self, profile: UserProfile) {
        self.profile = Some(profile);
    }

    pub fn tips(&self) -> &[WellnessTip] {
        &self.tips
    }

    pub fn set_tips(&mut self, tips: Vec<WellnessTip>) {
        self.tips = tips;
    }

    /// Returns false if a tip with the same id was already saved.
    pub fn save_tip(&mut self, tip: WellnessTip) -> bool {
        if self.is_saved(tip.id) {
            return false;
        }
        self.saved.push(tip);
        true
    }

    pub fn unsave_tip(&mut self, id: i64) -> bool {
        let before = self.saved.len();
        self.saved.retain(|t| t.id != id);
        self.saved.len() != before
    }

    /// Flip membership and return whether the tip is saved afterwards.
    pub fn toggle_save_tip(&mut self, tip: &WellnessTip) -> bool {
        if self.unsave_tip(tip.id) {
            false
        } else {
            self.save_tip(tip.clone())
        }
    }

    pub fn is_saved(&self, id: i64) -> bool {
        self.saved.iter().any(|t| t.id == id)
    }

    pub fn saved_tips(&self) -> &[WellnessTip] {
        &self.saved
    }

    pub fn selected_tip(&self) -> Option<&WellnessTip> {
        self.selected.as_ref()
    }

    pub fn set_selected_tip(&mut self, tip: Option<WellnessTip>) {
        self.selected = tip;
    }

    pub fn current_screen(&self) -> Screen {
        self.screen
    }

    pub fn set_current_screen(&mut self, screen: Screen) {
        tracing::debug!("Screen {:?} -> {:?}", self.screen, screen);
        self.screen = screen;
    }
}
