use crate::site::listing::escape_html;

/// Renders the page served when a target matched nothing.
///
/// The title is the original target with its slashes dropped.
pub fn render(target: &str) -> String {
    let title = escape_html(&target.replace('/', ""));

    format!(
        "<html>\n    <head>\n        <title>{title}</title>\n    </head>\n    <body>\n       File not found.\n   </body>\n</html>"
    )
}
