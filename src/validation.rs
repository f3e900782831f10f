use crate::error::{Result, WellnessError};
use crate::models::UserProfile;

/// Goals offered on the profile form. `Others` means the user typed their own.
pub const PRESET_GOALS: &[&str] = &[
    "Weight Loss",
    "Stress Reduction",
    "Better Sleep",
    "Increased Energy",
    "Mental Clarity",
    "Muscle Building",
    "Flexibility",
    "Overall Wellness",
    OTHER_GOAL,
];

pub const OTHER_GOAL: &str = "Others";

/// Resolve the goal selection, substituting the custom goal for `Others`.
pub fn resolve_goal(selected: &str, custom: &str) -> String {
    if selected == OTHER_GOAL {
        custom.trim().to_string()
    } else {
        selected.to_string()
    }
}

/// Input validator for submitted profiles
#[derive(Debug, Default, Clone, Copy)]
pub struct ProfileValidator;

impl ProfileValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, profile: &UserProfile) -> Result<()> {
        let blank = [&profile.age, &profile.gender, &profile.goal]
            .iter()
            .any(|f| f.trim().is_empty());
        if blank {
            return Err(WellnessError::InvalidProfile(
                "Please fill in all fields".to_string(),
            ));
        }
        Ok(())
    }
}
