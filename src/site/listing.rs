//! Directory listing pages.
//!
//! One anchor per entry, one level deep, in whatever order the filesystem
//! hands entries back. No sorting is applied, so the order differs between
//! platforms and filesystems.

use std::path::Path;

use tokio::fs;

/// Reads the names of a directory's entries in enumeration order.
pub async fn entry_names(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    let mut entries = fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }

    Ok(names)
}

/// Renders a listing page.
///
/// * `marker` - document root marker, stripped from the title
/// * `public_dir` - the directory's path as clients see it (no marker)
/// * `target` - the request target as received
/// * `names` - entry names, rendered in the given order
pub fn render(marker: &str, public_dir: &str, target: &str, names: &[String]) -> String {
    let title = target.replace('/', "").replace(marker, "");
    let base = public_dir.trim_end_matches('/');

    let mut page = format!(
        "<html>\n    <head>\n        <title>{}</title>\n    </head>\n    <body>\n",
        escape_html(&title)
    );

    for name in names {
        let href = format!("{}/{}", base, name);
        let label = name.strip_suffix(".txt").unwrap_or(name);

        page.push_str(&format!(
            "       <a href=\"{}\">{}</a><br>\n",
            escape_html(&href),
            escape_html(label)
        ));
    }

    page.push_str("   </body>\n</html>");
    page
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }

    escaped
}
