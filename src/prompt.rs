/// Instruction template used when `PROMPT_TEMPLATE_PATH` is not set.
///
/// `{language}` and `{max_chars}` are substituted by [`render_instructions`].
pub const DEFAULT_INSTRUCTION_TEMPLATE: &str = "\
You summarize software release notes for engineers who follow many repositories.

Rules:
1. Prioritize new features and changes to interfaces, APIs, CLI flags or configuration.
2. Mention internal dependency bumps only briefly, if at all.
3. Ignore minor bug fixes and documentation-only changes.
4. Output a bulleted list using \"- \" bullets, most important change first.
5. Keep the whole summary under {max_chars} characters.
6. Write the summary in {language}. Keep identifiers, code and version numbers as-is.
7. Output only the summary. No preamble, no closing remarks.
";

/// Release notes longer than this are cut before being sent to the model.
pub const MAX_RELEASE_NOTES_CHARS: usize = 20_000;

const TRUNCATION_SUFFIX: char = '…';

/// Human-readable language name for a locale tag such as `ja` or `en-US`.
#[must_use]
pub fn language_name(locale: &str) -> String {
    let primary = locale
        .split(['-', '_'])
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    match primary.as_str() {
        "ja" => "Japanese".to_string(),
        "en" => "English".to_string(),
        "zh" => "Chinese".to_string(),
        "ko" => "Korean".to_string(),
        "de" => "German".to_string(),
        "fr" => "French".to_string(),
        "es" => "Spanish".to_string(),
        _ => locale.to_string(),
    }
}

#[must_use]
pub fn render_instructions(template: &str, locale: &str, max_chars: usize) -> String {
    template
        .replace("{language}", &language_name(locale))
        .replace("{max_chars}", &max_chars.to_string())
}

/// Remove control characters (keeping line structure) and hard-truncate.
#[must_use]
pub fn sanitize_release_notes(raw: &str) -> String {
    raw.chars()
        .filter(|&c| c == '\n' || c == '\t' || !c.is_control())
        .take(MAX_RELEASE_NOTES_CHARS)
        .collect()
}

/// User message asking for a summary of one release.
#[must_use]
pub fn build_user_message(repository: &str, version: &str, release_notes: &str) -> String {
    let notes = sanitize_release_notes(release_notes);
    let notes = if notes.trim().is_empty() {
        "(no release notes provided)".to_string()
    } else {
        notes
    };
    format!(
        "Repository: {repository}\nVersion: {version}\n\nRelease notes:\n{notes}\n\nSummarize the release notes above."
    )
}

/// Cap a model response at `max_chars` characters, marking the cut.
#[must_use]
pub fn clamp_summary(summary: &str, max_chars: usize) -> String {
    let trimmed = summary.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(max_chars.saturating_sub(1)).collect();
    out.push(TRUNCATION_SUFFIX);
    out
}
