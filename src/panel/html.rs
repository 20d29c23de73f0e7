//! Static page shell loaded into the panel webview.
//!
//! The page embeds the lookup URL in a full-frame iframe and listens for
//! `UPDATE_URL` messages to re-point it without recreating the panel.

use askama::Template;
use url::Url;

use super::PanelMessage;

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="UTF-8">
        <meta name="viewport" content="width=device-width, height=device-height, initial-scale=1.0">
        <title>{{ title }}</title>
        {% if let Some(icon) = icon_url %}
        <link rel="icon" href="{{ icon }}" type="image/x-icon">
        <link rel="shortcut icon" href="{{ icon }}" type="image/x-icon">
        <link rel="apple-touch-icon" href="{{ icon }}">
        {% endif %}
        <script>
            window.addEventListener('message', event => {
                const message = event.data;
                if (message && message.command === '{{ update_command }}') {
                    document.getElementById('devdocs-frame').src = message.text;
                }
            });
        </script>
    </head>
    <body style="margin:0; padding:0;">
        <iframe id="devdocs-frame" src="{{ url }}" style="width:100%; height:100vh; border:none;"></iframe>
    </body>
</html>
"#,
    ext = "html"
)]
struct ShellTemplate<'a> {
    title: &'a str,
    url: &'a str,
    icon_url: Option<String>,
    update_command: &'static str,
}

/// Render the panel page for `url`, using the site's favicon as tab icon.
///
/// A render failure is logged and yields an empty page; the host still gets
/// the URL alongside it.
pub fn render_shell(title: &str, url: &Url) -> String {
    let template = ShellTemplate {
        title,
        url: url.as_str(),
        icon_url: favicon_url(url),
        update_command: PanelMessage::UPDATE_URL,
    };
    template.render().unwrap_or_else(|e| {
        log::error!("Failed to render panel page: {}", e);
        String::new()
    })
}

fn favicon_url(url: &Url) -> Option<String> {
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return None;
    }
    url.join("/favicon.ico").ok().map(String::from)
}
