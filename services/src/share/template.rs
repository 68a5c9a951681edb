use crate::store::Gallery;

/// Minimal HTML escaping for text placed inside element content or a
/// double-quoted attribute.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Renders the HTML body of a gallery invitation.
pub fn render_share_email(
    gallery: &Gallery,
    gallery_url: &str,
    message: Option<&str>,
    include_download: bool,
) -> String {
    let name = escape_html(&gallery.name);
    let url = escape_html(gallery_url);
    let contents = escape_html(
        gallery
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("beautiful photos"),
    );

    let message = message
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(|m| {
            format!(
                r#"<p style="font-style: italic;">"{}"</p>"#,
                escape_html(m)
            )
        })
        .unwrap_or_default();

    let download = if include_download {
        "<p><small>Download access has been enabled for this gallery.</small></p>"
    } else {
        ""
    };

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #3B82F6;">You've received a photo gallery!</h2>
  <p>Someone has shared a photo gallery with you: <strong>{name}</strong></p>
  {message}
  <p style="margin: 30px 0;">
    <a href="{url}" style="background-color: #3B82F6; color: white; padding: 12px 24px; text-decoration: none; border-radius: 6px; display: inline-block;">View Gallery</a>
  </p>
  {download}
  <hr style="margin: 30px 0; border: none; border-top: 1px solid #e5e7eb;">
  <p style="color: #6b7280; font-size: 14px;">This gallery contains {contents}.</p>
</div>
"#
    )
}
