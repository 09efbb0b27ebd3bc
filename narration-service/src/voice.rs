use serde::{Deserialize, Serialize};

/// One narration voice offered by the speech platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub id: String,
    /// BCP 47 tag declared by the platform, e.g. `vi-VN`.
    pub language_tag: String,
    pub display_name: String,
}

/// Voice names that signal native affinity for a language, checked
/// case-insensitively against the display name. Platforms often expose
/// several voices per language tag; these pick the natural-sounding one.
const AFFINITY_KEYWORDS: &[(&str, &[&str])] = &[
    ("vi", &["vietnam", "việt", "viet"]),
    ("en", &["english", "united states", "america"]),
];

/// Pick the best available voice for a language tag.
///
/// Selection order, first match wins:
/// 1. primary-subtag match whose name carries an affinity keyword
/// 2. any primary-subtag match
/// 3. the first voice in the list
/// 4. `None` when the list is empty
///
/// Synchronous and idempotent over whatever list it is given; retrying an
/// asynchronously populated list is the caller's concern.
pub fn select_voice(language_tag: &str, voices: &[Voice]) -> Option<String> {
    let wanted = primary_subtag(language_tag).to_lowercase();
    let keywords = AFFINITY_KEYWORDS
        .iter()
        .find(|(tag, _)| *tag == wanted)
        .map(|(_, words)| *words)
        .unwrap_or(&[]);

    let subtag_matches = |voice: &&Voice| primary_subtag(&voice.language_tag).to_lowercase() == wanted;

    voices
        .iter()
        .filter(subtag_matches)
        .find(|voice| {
            let name = voice.display_name.to_lowercase();
            keywords.iter().any(|keyword| name.contains(keyword))
        })
        .or_else(|| voices.iter().find(subtag_matches))
        .or_else(|| voices.first())
        .map(|voice| voice.id.clone())
}

fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}
