//! One-time import helpers for legacy chore records.
//!
//! Older households stored chores without an explicit skill; the skill was
//! guessed from the chore name at runtime. This guess now happens once, at
//! import, and the result is stored on the record. The engine never calls
//! into this module.

use crate::household::SkillCategory;

/// Keyword → skill table. Covers the English names used by the default
/// catalog and the Japanese names found in legacy exports.
const SKILL_KEYWORDS: &[(&str, SkillCategory)] = &[
    ("cook", SkillCategory::Cooking),
    ("breakfast", SkillCategory::Cooking),
    ("lunch", SkillCategory::Cooking),
    ("dinner", SkillCategory::Cooking),
    ("meal", SkillCategory::Cooking),
    ("料理", SkillCategory::Cooking),
    ("朝食", SkillCategory::Cooking),
    ("夕食", SkillCategory::Cooking),
    ("laundry", SkillCategory::Laundry),
    ("ironing", SkillCategory::Laundry),
    ("洗濯", SkillCategory::Laundry),
    ("shopping", SkillCategory::Shopping),
    ("grocer", SkillCategory::Shopping),
    ("errand", SkillCategory::Shopping),
    ("買い物", SkillCategory::Shopping),
    ("childcare", SkillCategory::Childcare),
    ("school run", SkillCategory::Childcare),
    ("bath time", SkillCategory::Childcare),
    ("育児", SkillCategory::Childcare),
    ("maintenance", SkillCategory::Maintenance),
    ("repair", SkillCategory::Maintenance),
    ("appliance", SkillCategory::Maintenance),
    ("メンテナンス", SkillCategory::Maintenance),
    ("clean", SkillCategory::Cleaning),
    ("vacuum", SkillCategory::Cleaning),
    ("dishes", SkillCategory::Cleaning),
    ("掃除", SkillCategory::Cleaning),
];

/// Guess a skill from a chore's name and category text.
///
/// Returns `None` when no keyword matches; callers fall back to
/// [`SkillCategory::FALLBACK`].
pub fn infer_skill(name: &str, category: &str) -> Option<SkillCategory> {
    let haystacks = [name.to_lowercase(), category.to_lowercase()];
    SKILL_KEYWORDS.iter().find_map(|(keyword, skill)| {
        haystacks
            .iter()
            .any(|h| h.contains(keyword))
            .then_some(*skill)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_from_english_names() {
        assert_eq!(infer_skill("Cook dinner", ""), Some(SkillCategory::Cooking));
        assert_eq!(infer_skill("Weekly laundry", ""), Some(SkillCategory::Laundry));
        assert_eq!(infer_skill("Vacuum the hall", ""), Some(SkillCategory::Cleaning));
    }

    #[test]
    fn infers_from_legacy_japanese_names() {
        assert_eq!(infer_skill("朝食作り", ""), Some(SkillCategory::Cooking));
        assert_eq!(infer_skill("食材買い物", ""), Some(SkillCategory::Shopping));
    }

    #[test]
    fn category_text_is_consulted() {
        assert_eq!(infer_skill("Weekend job", "Maintenance"), Some(SkillCategory::Maintenance));
    }

    #[test]
    fn unknown_names_yield_none() {
        assert_eq!(infer_skill("Walk the dog", "pets"), None);
    }
}
