use release_notifier::prompt::{
    DEFAULT_INSTRUCTION_TEMPLATE, MAX_RELEASE_NOTES_CHARS, build_user_message, clamp_summary,
    language_name, render_instructions, sanitize_release_notes,
};

#[test]
fn default_template_renders_locale_and_budget() {
    let rendered = render_instructions(DEFAULT_INSTRUCTION_TEMPLATE, "ja", 2000);
    assert!(rendered.contains("Write the summary in Japanese"));
    assert!(rendered.contains("under 2000 characters"));
    assert!(!rendered.contains("{language}"));
    assert!(!rendered.contains("{max_chars}"));
}

#[test]
fn language_name_handles_regions_and_unknown_tags() {
    assert_eq!(language_name("en-GB"), "English");
    assert_eq!(language_name("JA_jp"), "Japanese");
    assert_eq!(language_name("pt-BR"), "pt-BR");
}

#[test]
fn sanitize_keeps_newlines_and_drops_control_chars() {
    let input = "line one\n\tline two\u{0000}\u{007F}";
    assert_eq!(sanitize_release_notes(input), "line one\n\tline two");

    let long = "a".repeat(MAX_RELEASE_NOTES_CHARS + 100);
    assert_eq!(sanitize_release_notes(&long).len(), MAX_RELEASE_NOTES_CHARS);
}

#[test]
fn user_message_includes_repository_and_version() {
    let message = build_user_message("tokio-rs/axum", "axum-v0.8.4", "## Added\n- `Router::merge`");
    assert!(message.starts_with("Repository: tokio-rs/axum\nVersion: axum-v0.8.4"));
    assert!(message.contains("- `Router::merge`"));

    let empty = build_user_message("tokio-rs/axum", "v1", "  ");
    assert!(empty.contains("(no release notes provided)"));
}

#[test]
fn clamp_summary_caps_length() {
    assert_eq!(clamp_summary("  - ok  \n", 100), "- ok");

    let clamped = clamp_summary(&"長".repeat(50), 10);
    assert_eq!(clamped.chars().count(), 10);
    assert!(clamped.ends_with('…'));
}
