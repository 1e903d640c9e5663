use crate::core::models::ReleaseDetails;

struct Labels {
    released: &'static str,
    repository: &'static str,
    version: &'static str,
    release_date: &'static str,
    changes: &'static str,
    release_notes: &'static str,
}

const JA: Labels = Labels {
    released: "がリリースされました！",
    repository: "リポジトリ",
    version: "バージョン",
    release_date: "リリース日",
    changes: "📝 主な変更点:",
    release_notes: "リリースノート",
};

const EN: Labels = Labels {
    released: "has been released!",
    repository: "Repository",
    version: "Version",
    release_date: "Release date",
    changes: "📝 Highlights:",
    release_notes: "Release notes",
};

fn labels_for(locale: &str) -> &'static Labels {
    if locale.to_ascii_lowercase().starts_with("ja") {
        &JA
    } else {
        &EN
    }
}

/// Plain-text Slack message announcing one release with its summary.
#[must_use]
pub fn format_release_message(
    repository: &str,
    release: &ReleaseDetails,
    summary: &str,
    locale: &str,
) -> String {
    let labels = labels_for(locale);
    let version = release.tag_name.as_str();

    let mut lines = vec![
        format!("🆕 {repository} {version} {}", labels.released),
        String::new(),
        format!("{}: {repository}", labels.repository),
        format!("{}: {version}", labels.version),
    ];

    if let Some(published_at) = release.published_at {
        lines.push(format!(
            "{}: {}",
            labels.release_date,
            published_at.format("%Y-%m-%d")
        ));
    }

    if let Some(name) = release.name.as_deref().filter(|n| !n.is_empty() && *n != version) {
        lines.push(format!("> {name}"));
    }

    lines.push(String::new());
    lines.push(labels.changes.to_string());
    lines.push(summary.to_string());
    lines.push(String::new());
    if !release.html_url.is_empty() {
        lines.push(format!("{}: {}", labels.release_notes, release.html_url));
    }
    lines.push("-".to_string());

    lines.join("\n")
}
