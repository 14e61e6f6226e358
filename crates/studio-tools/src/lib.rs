//! Keyword and regex heuristics used by the execution graph builder's
//! `auto` strategy to decide whether neighboring scenes need sequential
//! continuity or can run independently in parallel.

use std::collections::HashSet;

use regex::Regex;

/// Keywords that suggest a scene is independent b-roll/insert content and
/// can run in parallel with its neighbors.
pub const PARALLEL_KEYWORDS: &[&str] = &[
    "b-roll",
    "broll",
    "establishing",
    "cutaway",
    "montage",
    "insert",
    "overlay",
    "transition",
    "title",
    "logo",
    "product shot",
    "detail shot",
    "ambient",
    "background",
];

/// Keywords that suggest a scene needs sequential continuity with its
/// neighbor (same character, same thread of action).
pub const CONTINUITY_KEYWORDS: &[&str] = &[
    "continues",
    "continuous",
    "same",
    "character",
    "person",
    "protagonist",
    "hero",
    "actor",
    "follow",
    "tracking",
    "interview",
    "conversation",
    "dialogue",
    "reaction",
];

/// Per-scene continuity signal extracted from its title/description/visual
/// elements text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneAnalysis {
    pub is_parallel: bool,
    pub needs_continuity: bool,
    pub characters: HashSet<String>,
    pub locations: HashSet<String>,
}

fn contains_keyword(text_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text_lower.contains(kw))
}

fn character_pattern() -> Regex {
    Regex::new(r"\b(protagonist|hero|character|person|man|woman|user|developer|customer|they|their|them|he|she|his|her)\b")
        .expect("static character pattern is valid")
}

fn location_pattern() -> Regex {
    Regex::new(r"\b(office|room|desk|studio|kitchen|bedroom|living room|outdoor|indoor|background|environment|setting|scene|space)\b")
        .expect("static location pattern is valid")
}

/// Extracts character references (pronouns, generic role nouns) from text.
pub fn extract_characters(text: &str) -> HashSet<String> {
    let lower = text.to_lowercase();
    character_pattern()
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Extracts location references from text.
pub fn extract_locations(text: &str) -> HashSet<String> {
    let lower = text.to_lowercase();
    location_pattern()
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Analyzes a scene's combined title/description/visual-elements text for
/// continuity signals. `explicit_continuity` should be true when the scene
/// already carries a `continuity_group`, `requires_continuity_from`, or
/// `continuity_elements` hint from its caller.
pub fn analyze_scene(text: &str, explicit_continuity: bool) -> SceneAnalysis {
    let text_lower = text.to_lowercase();
    let is_parallel_kw = contains_keyword(&text_lower, PARALLEL_KEYWORDS);
    let needs_continuity = contains_keyword(&text_lower, CONTINUITY_KEYWORDS) || explicit_continuity;

    SceneAnalysis {
        is_parallel: is_parallel_kw && !needs_continuity,
        needs_continuity,
        characters: extract_characters(text),
        locations: extract_locations(text),
    }
}

/// Whether two analyzed scenes should be grouped into the same continuity
/// run: shared characters, shared locations, or explicit "continues"/"same"
/// language in the later scene.
pub fn scenes_related(prev: &SceneAnalysis, curr: &SceneAnalysis, curr_text_lower: &str) -> bool {
    if !prev.characters.is_disjoint(&curr.characters) {
        return true;
    }
    if !prev.locations.is_disjoint(&curr.locations) {
        return true;
    }
    curr_text_lower.contains("continues") || curr_text_lower.contains("same")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broll_without_continuity_is_parallel() {
        let analysis = analyze_scene("Establishing shot of the city skyline at dusk", false);
        assert!(analysis.is_parallel);
        assert!(!analysis.needs_continuity);
    }

    #[test]
    fn continuity_keyword_overrides_parallel_keyword() {
        let analysis = analyze_scene("Background continues as the protagonist keeps talking", false);
        assert!(!analysis.is_parallel);
        assert!(analysis.needs_continuity);
    }

    #[test]
    fn explicit_continuity_flag_forces_needs_continuity() {
        let analysis = analyze_scene("A quiet cutaway", true);
        assert!(analysis.needs_continuity);
    }

    #[test]
    fn shared_character_marks_scenes_related() {
        let prev = analyze_scene("The developer opens her laptop", false);
        let curr = analyze_scene("She begins typing furiously", false);
        assert!(scenes_related(&prev, &curr, "she begins typing furiously"));
    }

    #[test]
    fn unrelated_scenes_are_not_related() {
        let prev = analyze_scene("Product shot of the device on a table", false);
        let curr = analyze_scene("A logo animation fades in", false);
        assert!(!scenes_related(&prev, &curr, "a logo animation fades in"));
    }
}
