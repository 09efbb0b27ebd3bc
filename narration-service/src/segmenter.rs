use serde::Serialize;

/// A Latin-only token whose stripped length exceeds this reads as foreign.
/// Empirically tuned alongside the other classification thresholds; kept
/// configurable rather than treated as an invariant.
pub const FOREIGN_MIN_LEN: usize = 4;

/// Punctuation stripped before a token is classified. The characters stay
/// in the segment text, they just carry no language signal.
const STRIP_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', '(', ')', '[', ']', '{', '}', '"', '\'', '%', '/', '\\', '-',
    '+', '*', '&', '•', '…',
];

/// Every Vietnamese letter that carries a diacritic (plus đ). One of these
/// in a token is conclusive evidence the token is Vietnamese.
const VIETNAMESE_DIACRITICS: &str = "àáạảãâầấậẩẫăằắặẳẵèéẹẻẽêềếệểễìíịỉĩòóọỏõôồốộổỗơờớợởỡùúụủũưừứựửữỳýỵỷỹđ\
ÀÁẠẢÃÂẦẤẬẨẪĂẰẮẶẲẴÈÉẸẺẼÊỀẾỆỂỄÌÍỊỈĨÒÓỌỎÕÔỒỐỘỔỖƠỜỚỢỞỠÙÚỤỦŨƯỪỨỰỬỮỲÝỴỶỸĐ";

/// Which of the two narration languages a run of text belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageClass {
    /// The narration's base language (Vietnamese by default).
    Primary,
    /// Latin-script material embedded in the base text: product names,
    /// ingredients, dosage strings.
    Foreign,
}

/// A maximal run of one classified language, whitespace and punctuation
/// included verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    pub text: String,
    pub class: LanguageClass,
}

/// Split mixed-language text into maximal same-language segments.
///
/// Pure and lossless: concatenating the returned segment texts reproduces
/// the input exactly, so a caller can always fall back to displaying the
/// original string. Tokens are whitespace-delimited; separators attach to
/// whichever segment is open, and never trigger a class change themselves.
///
/// The per-token heuristic is deliberately lightweight, not a language
/// detector. A token reads as `Foreign` when, digits and punctuation
/// stripped, it holds Latin letters, none of them carrying a Vietnamese
/// diacritic, and it looks name-like: fully upper-case beyond two letters,
/// mixed-case, or longer than [`FOREIGN_MIN_LEN`]. Tokens stripped to
/// nothing, and dosage-style tokens carrying digits ("500mg", "2%"), are
/// neutral: they ride along with the open segment. Misclassification of
/// short unaccented words is an accepted trade-off of this scheme.
pub fn segment(text: &str) -> Vec<TextSegment> {
    let mut segments: Vec<TextSegment> = Vec::new();
    // Neutral material seen before the first classified token.
    let mut pending = String::new();

    for run in runs(text) {
        match classify_run(run) {
            None => match segments.last_mut() {
                Some(open) => open.text.push_str(run),
                None => pending.push_str(run),
            },
            Some(class) => match segments.last_mut() {
                Some(open) if open.class == class => open.text.push_str(run),
                _ => {
                    let mut segment_text = std::mem::take(&mut pending);
                    segment_text.push_str(run);
                    segments.push(TextSegment {
                        text: segment_text,
                        class,
                    });
                }
            },
        }
    }

    // Input held no classifiable token at all: narrate it in the base
    // language as a single segment.
    if segments.is_empty() && !pending.is_empty() {
        segments.push(TextSegment {
            text: pending,
            class: LanguageClass::Primary,
        });
    }

    segments
}

/// Alternating whitespace / non-whitespace runs, covering the input
/// exactly.
fn runs(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_whitespace: Option<bool> = None;

    for (index, ch) in text.char_indices() {
        let ws = ch.is_whitespace();
        match in_whitespace {
            Some(current) if current == ws => {}
            Some(_) => {
                out.push(&text[start..index]);
                start = index;
                in_whitespace = Some(ws);
            }
            None => in_whitespace = Some(ws),
        }
    }
    if !text.is_empty() {
        out.push(&text[start..]);
    }
    out
}

/// `None` means the run carries no language signal of its own.
fn classify_run(run: &str) -> Option<LanguageClass> {
    if run.chars().all(char::is_whitespace) {
        return None;
    }
    let has_digit = run.chars().any(|c| c.is_ascii_digit());
    let stripped: String = run
        .chars()
        .filter(|c| !c.is_ascii_digit() && !STRIP_PUNCTUATION.contains(c))
        .collect();
    if stripped.is_empty() || has_digit {
        return None;
    }

    if !stripped.chars().any(|c| c.is_ascii_alphabetic()) {
        return Some(LanguageClass::Primary);
    }
    if stripped.chars().any(|c| VIETNAMESE_DIACRITICS.contains(c)) {
        return Some(LanguageClass::Primary);
    }

    let has_upper = stripped.chars().any(char::is_uppercase);
    let has_lower = stripped.chars().any(char::is_lowercase);
    let length = stripped.chars().count();

    let fully_upper = has_upper && !has_lower && length > 2;
    let mixed_case = has_upper && has_lower;
    if fully_upper || mixed_case || length > FOREIGN_MIN_LEN {
        Some(LanguageClass::Foreign)
    } else {
        Some(LanguageClass::Primary)
    }
}
