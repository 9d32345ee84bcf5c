//! Server-rendered pages: the per-endpoint query editor and the home page.
//!
//! The markup is presentation only; the gateway contract lives in
//! [`crate::endpoint`] and [`crate::forward`].

use crate::config::{EndpointBinding, ServerConfig};
use crate::AppState;
use axum::extract::State;
use axum::response::{Html, Redirect};

pub(crate) async fn handle_home(State(state): State<AppState>) -> Html<String> {
    let links = state
        .config
        .bindings
        .iter()
        .map(|b| format!(r#"<li><a href="{}">{}</a></li>"#, b.ui_route, b.title))
        .collect::<String>();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{base_url}</title>
  <link rel="stylesheet" href="/static/css/style.css">
</head>
<body>
  <h1>{base_url}</h1>
  <p>Available SPARQL endpoints:</p>
  <ul>{links}</ul>
</body>
</html>"#,
        base_url = state.config.base_url,
    ))
}

pub(crate) async fn handle_favicon() -> Redirect {
    Redirect::to("/static/favicon.ico")
}

/// Renders the interactive query editor for a binding.
///
/// The editor submits back to the binding's own route, so the page never
/// talks to the backend directly.
pub(crate) fn render_query_form(config: &ServerConfig, binding: &EndpointBinding) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title} SPARQL endpoint</title>
  <link rel="stylesheet" href="/static/css/yasgui.min.css">
  <link rel="stylesheet" href="/static/css/style.css">
  <script src="/static/js/yasgui.min.js"></script>
</head>
<body>
  <header>
    <h1>{title}</h1>
    <p>{base_url}{ui_route}</p>
  </header>
  <div id="yasgui"></div>
  <script>
    new Yasgui(document.getElementById("yasgui"), {{
      requestConfig: {{ endpoint: "{ui_route}" }},
      copyEndpointOnNewTab: false
    }});
  </script>
</body>
</html>"#,
        title = binding.title,
        base_url = config.base_url,
        ui_route = binding.ui_route,
    ))
}
