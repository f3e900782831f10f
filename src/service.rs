use crate::client::GenerationClient;
use crate::error::{Result, WellnessError};
use crate::models::{TipDetail, UserProfile, WellnessTip};
use crate::session::{Screen, SessionStore};
use crate::validation::{PRESET_GOALS, ProfileValidator, resolve_goal};

/// Drives the profile, board, detail and saved-tip flows against one session.
pub struct WellnessService {
    client: GenerationClient,
    validator: ProfileValidator,
    session: SessionStore,
}

impl WellnessService {
    pub fn new(client: GenerationClient, session: SessionStore) -> Self {
        Self {
            client,
            validator: ProfileValidator::new(),
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionStore {
        &mut self.session
    }

    /// Validate and store the profile, then generate the first board.
    ///
    /// The profile is kept even if generation fails so the caller can retry.
    pub async fn submit_profile(&mut self, profile: UserProfile) -> Result<&[WellnessTip]> {
        self.validator.validate(&profile)?;
        self.session.set_profile(profile.clone());

        let tips = self.client.generate_tip_list(&profile).await?;
        tracing::info!("Generated {} tips", tips.len());
        self.session.set_tips(tips);
        self.session.set_current_screen(Screen::Board);
        Ok(self.session.tips())
    }

    /// Submit the profile form as entered: a goal picked from the presets, with the
    /// custom text used when the pick is `Others`.
    pub async fn submit_selection(
        &mut self,
        age: &str,
        gender: &str,
        selected_goal: &str,
        custom_goal: &str,
    ) -> Result<&[WellnessTip]> {
        if !PRESET_GOALS.contains(&selected_goal) {
            tracing::debug!("Goal {:?} is not one of the presets", selected_goal);
        }
        let goal = resolve_goal(selected_goal, custom_goal);
        self.submit_profile(UserProfile::new(age, gender, goal)).await
    }

    pub async fn regenerate(&mut self) -> Result<&[WellnessTip]> {
        let profile = self
            .session
            .profile()
            .cloned()
            .ok_or_else(|| WellnessError::InvalidProfile("No profile submitted".to_string()))?;

        let tips = self.client.generate_tip_list(&profile).await?;
        self.session.set_tips(tips);
        Ok(self.session.tips())
    }

    pub async fn open_tip(&mut self, tip: WellnessTip) -> Result<TipDetail> {
        self.session.set_selected_tip(Some(tip.clone()));
        self.session.set_current_screen(Screen::Details);
        self.client
            .generate_tip_detail(&tip, self.session.profile())
            .await
    }

    pub fn toggle_save(&mut self, tip: &WellnessTip) -> bool {
        self.session.toggle_save_tip(tip)
    }
}
