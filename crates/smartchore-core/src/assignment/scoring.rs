//! Candidate scoring for chore assignment.
//!
//! A candidate's *effective load* is their minutes so far plus a skill
//! penalty (or bonus) and a small preference nudge. The engine picks the
//! candidate with the lowest effective load.

use crate::household::{Member, SkillCategory};

/// Skill score used when a member has no rating for the category.
pub const UNRATED_SKILL_SCORE: f64 = 0.5;

/// Penalty at skill score 0.0 and the bonus at 1.0, used to normalize
/// candidate scores into [0, 1].
const MAX_PENALTY: f64 = 50.0;
const MAX_BONUS: f64 = 24.0;

/// Map a 1..=10 skill level onto [0.05, 1.0].
///
/// Piecewise linear in five bands:
/// - 1–2 → 0.05–0.15
/// - 3–4 → 0.20–0.35
/// - 5–6 → 0.45–0.60
/// - 7–8 → 0.70–0.85
/// - 9–10 → 0.90–1.00
pub fn skill_score(level: u8) -> f64 {
    let l = f64::from(level.clamp(1, 10));
    if l <= 2.0 {
        0.05 + (l - 1.0) * 0.10
    } else if l <= 4.0 {
        0.20 + (l - 3.0) * 0.15
    } else if l <= 6.0 {
        0.45 + (l - 5.0) * 0.15
    } else if l <= 8.0 {
        0.70 + (l - 7.0) * 0.15
    } else {
        0.90 + (l - 9.0) * 0.10
    }
}

/// Skill score of a member for a category; unrated → [`UNRATED_SKILL_SCORE`].
pub fn member_skill_score(member: &Member, skill: SkillCategory) -> f64 {
    member
        .rated_skill(skill)
        .map(skill_score)
        .unwrap_or(UNRATED_SKILL_SCORE)
}

/// Load penalty in minutes for a skill score (negative = bonus).
///
/// Continuous and non-increasing:
/// - +50 at 0.0 falling to +30 at 0.25
/// - +30 falling to 0 at 0.45
/// - 0 on [0.45, 0.70]
/// - a bonus falling to −24 at 1.0
pub fn load_penalty(skill_score: f64) -> f64 {
    let s = skill_score.clamp(0.0, 1.0);
    if s < 0.25 {
        30.0 + 80.0 * (0.25 - s)
    } else if s < 0.45 {
        150.0 * (0.45 - s)
    } else if s <= 0.70 {
        0.0
    } else {
        -80.0 * (s - 0.70)
    }
}

/// Preference nudge in minutes: liked −`liked`, disliked +`disliked`.
pub fn preference_adjustment(
    member: &Member,
    skill: SkillCategory,
    liked: f64,
    disliked: f64,
) -> f64 {
    let mut adjustment = 0.0;
    if member.preferences.likes(skill) {
        adjustment -= liked;
    }
    if member.preferences.dislikes(skill) {
        adjustment += disliked;
    }
    adjustment
}

/// Candidate score in [0, 1]: 1.0 for the strongest skill, 0.0 for the weakest.
pub fn candidate_score(skill_score: f64) -> f64 {
    ((MAX_PENALTY - load_penalty(skill_score)) / (MAX_PENALTY + MAX_BONUS)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn skill_bands_hit_their_endpoints() {
        assert!(approx(skill_score(1), 0.05));
        assert!(approx(skill_score(2), 0.15));
        assert!(approx(skill_score(3), 0.20));
        assert!(approx(skill_score(4), 0.35));
        assert!(approx(skill_score(5), 0.45));
        assert!(approx(skill_score(6), 0.60));
        assert!(approx(skill_score(7), 0.70));
        assert!(approx(skill_score(8), 0.85));
        assert!(approx(skill_score(9), 0.90));
        assert!(approx(skill_score(10), 1.00));
    }

    #[test]
    fn skill_score_is_strictly_increasing() {
        for level in 1..10u8 {
            assert!(skill_score(level) < skill_score(level + 1), "level {level}");
        }
    }

    #[test]
    fn penalty_anchor_points() {
        assert!(approx(load_penalty(0.0), 50.0));
        assert!(approx(load_penalty(0.25), 30.0));
        assert!(approx(load_penalty(0.45), 0.0));
        assert!(approx(load_penalty(0.70), 0.0));
        assert!(approx(load_penalty(1.0), -24.0));
    }

    #[test]
    fn penalty_never_increases_with_skill() {
        let mut previous = f64::INFINITY;
        for step in 0..=100 {
            let p = load_penalty(step as f64 / 100.0);
            assert!(p <= previous + 1e-9, "step {step}");
            previous = p;
        }
    }

    #[test]
    fn candidate_score_range() {
        assert!(approx(candidate_score(1.0), 1.0));
        assert!(approx(candidate_score(0.0), 0.0));
        assert!(candidate_score(skill_score(5)) >= 0.6);
        assert!(candidate_score(skill_score(4)) < 0.6);
        assert!(candidate_score(UNRATED_SKILL_SCORE) >= 0.6);
    }

    #[test]
    fn preferences_nudge_load() {
        use crate::household::Preferences;
        let member = Member::new("a", "Alice").with_preferences(Preferences {
            liked: vec![SkillCategory::Cooking],
            disliked: vec![SkillCategory::Laundry],
        });
        assert_eq!(preference_adjustment(&member, SkillCategory::Cooking, 5.0, 10.0), -5.0);
        assert_eq!(preference_adjustment(&member, SkillCategory::Laundry, 5.0, 10.0), 10.0);
        assert_eq!(preference_adjustment(&member, SkillCategory::Cleaning, 5.0, 10.0), 0.0);
    }
}
