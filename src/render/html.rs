//! HTML document templates for the embedding surface.
//!
//! Four pure builders, one per mutually exclusive display state: the full
//! graph, an error with a retry affordance, the informational "no step data"
//! placeholder, and a loading stub. Server-supplied text is always escaped
//! before interpolation; only the SVG produced by our own renderer is
//! trusted markup.

use crate::domain::status::needs_update;

use super::escape;

/// Caller-supplied URIs and origin token for the embedding surface.
///
/// The embedder decides its own trusted origin; this module only
/// interpolates it into the content policy.
#[derive(Debug, Clone)]
pub struct TemplateAssets {
    pub script_uri: String,
    pub style_uri: String,
    pub csp_source: String,
}

impl TemplateAssets {
    fn csp(&self) -> String {
        format!(
            "default-src 'none'; img-src {src} data:; style-src {src}; script-src {src};",
            src = escape(&self.csp_source)
        )
    }
}

fn page(assets: &TemplateAssets, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta http-equiv="Content-Security-Policy" content="{csp}">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<link href="{style}" rel="stylesheet">
<title>Pipeline Run DAG</title>
</head>
<body>
{body}
</body>
</html>"#,
        csp = assets.csp(),
        style = escape(&assets.style_uri),
        body = body,
    )
}

/// Wrap the rendered SVG, adding the update banner while the run is active
pub fn build_main_content(svg: &str, run_status: &str, assets: &TemplateAssets) -> String {
    let banner = if needs_update(run_status) {
        format!(
            r#"<div id="update-banner" class="banner">Run is {}. <button id="update-button">Update</button></div>
"#,
            escape(run_status)
        )
    } else {
        String::new()
    };

    let body = format!(
        r#"{banner}<div id="dag">
{svg}
</div>
<script src="{script}"></script>"#,
        banner = banner,
        svg = svg,
        script = escape(&assets.script_uri),
    );
    page(assets, &body)
}

/// Wrap a user-facing failure message with a retry affordance
pub fn build_error_content(message: &str, assets: &TemplateAssets) -> String {
    let body = format!(
        r#"<div class="error">
<p>Failed to render the pipeline run: {message}</p>
<button id="retry-button">Retry</button>
</div>
<script src="{script}"></script>"#,
        message = escape(message),
        script = escape(&assets.script_uri),
    );
    page(assets, &body)
}

/// Informational placeholder for the "step data unavailable" variant
pub fn build_no_steps_content(run_status: &str, message: &str, assets: &TemplateAssets) -> String {
    let body = format!(
        r#"<div class="notice">
<p>{message}</p>
<p class="status">Run status: {status}</p>
</div>"#,
        message = escape(message),
        status = escape(run_status),
    );
    page(assets, &body)
}

/// Minimal placeholder shown while a fetch is outstanding
pub fn build_loading_content(assets: &TemplateAssets) -> String {
    page(assets, r#"<div class="loading">Loading pipeline run...</div>"#)
}
