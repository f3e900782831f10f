use crate::models::{UserProfile, WellnessTip};

pub fn tip_list_prompt(profile: &UserProfile) -> String {
    format!(
        r#"You are a wellness expert. Generate exactly 5 personalized wellness tips for someone with the following profile:
- Age: {age}
- Gender: {gender}
- Goal: {goal}

Return ONLY valid JSON in this exact format with no additional text:
{{
  "tips": [
    {{
      "id": 1,
      "title": "Short Title",
      "short": "One line description (max 60 characters)",
      "icon": "🌅"
    }}
  ]
}}

Use relevant emojis for icons. Make tips actionable, specific, and tailored to their goal."#,
        age = profile.age,
        gender = profile.gender,
        goal = profile.goal,
    )
}

pub fn tip_detail_prompt(tip: &WellnessTip, profile: Option<&UserProfile>) -> String {
    let profile_context = profile
        .map(|p| {
            format!(
                "considering their profile (Age: {}, Gender: {}, Goal: {})",
                p.age, p.gender, p.goal
            )
        })
        .unwrap_or_default();

    format!(
        r#"You are a wellness expert. Provide detailed guidance for this wellness tip {profile_context}:

Title: {title}
Description: {short}

Return ONLY valid JSON in this exact format with no additional text:
{{
  "explanation": "A 2-3 paragraph detailed explanation of why this tip is beneficial and how it works",
  "steps": [
    "Step 1: Clear, actionable instruction",
    "Step 2: Clear, actionable instruction",
    "Step 3: Clear, actionable instruction"
  ]
}}

Make it practical, science-backed, and motivating. Include 3-5 actionable steps."#,
        title = tip.title,
        short = tip.short,
    )
}
