//! Runtime theme-switch script injection.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Thin glue over the host's "assets ready" stage: splices a small
//! `<script>` shim into the produced entry asset so the theme can be
//! toggled at runtime by flipping a CSS class on the document root. The
//! override block (see [`crate::block`]) redirects every theme variable to
//! a `var(--prefix-name)` reference, so toggling the class is all that is
//! needed to switch themes without a rebuild.

use indexmap::IndexMap;

use crate::config::ThemeConfig;
use crate::error::PipelineError;

/// Marker baked into the shim; also the injection idempotency guard.
const RUNTIME_MARKER: &str = "livetheme-runtime";

/// The shim itself. `__PREFIX__` is replaced with the configured
/// `theme_class_pre`; the shim toggles `__PREFIX__-dark` on the document
/// root and persists the chosen mode.
const RUNTIME_TEMPLATE: &str = r#"<script id="livetheme-runtime">
(function () {
  var root = document.documentElement;
  var cls = '__PREFIX__-dark';
  var key = '__PREFIX__:mode';
  function apply(dark) {
    if (dark) { root.classList.add(cls); } else { root.classList.remove(cls); }
  }
  try { apply(localStorage.getItem(key) === 'dark'); } catch (e) { apply(false); }
  window.__setTheme = function (mode) {
    apply(mode === 'dark');
    try { localStorage.setItem(key, mode); } catch (e) {}
  };
})();
</script>"#;

/// Splice the runtime theme-switch shim into the entry asset.
///
/// `assets` is the host-supplied map of produced asset names to text
/// content; `entry_name` is the configured entry asset (typically the
/// emitted HTML page). The shim goes immediately before `</body>` when
/// present, otherwise at the end of the asset. Calling this twice on the
/// same asset is a no-op the second time.
///
/// # Errors
///
/// [`PipelineError::EntryNotFound`] if `entry_name` is not among the
/// build outputs. This is a hard error: a theme runtime with nowhere to
/// live means the build is misconfigured.
pub fn inject_runtime_script(
    assets: &mut IndexMap<String, String>,
    entry_name: &str,
    config: &ThemeConfig,
) -> Result<(), PipelineError> {
    let asset = assets
        .get_mut(entry_name)
        .ok_or_else(|| PipelineError::EntryNotFound {
            name: entry_name.to_string(),
        })?;

    if asset.contains(RUNTIME_MARKER) {
        tracing::debug!(entry = entry_name, "Runtime shim already present");
        return Ok(());
    }

    let script = RUNTIME_TEMPLATE.replace("__PREFIX__", &config.theme_class_pre);
    match asset.rfind("</body>") {
        Some(pos) => asset.insert_str(pos, &script),
        None => asset.push_str(&script),
    }
    tracing::debug!(entry = entry_name, "Injected runtime theme shim");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ThemeConfig {
        ThemeConfig::new("/theme")
    }

    fn assets_with(entry: &str, content: &str) -> IndexMap<String, String> {
        let mut assets = IndexMap::new();
        assets.insert(entry.to_string(), content.to_string());
        assets
    }

    #[test]
    fn test_inject_before_body_close() {
        let mut assets = assets_with("index.html", "<html><body><p>hi</p></body></html>");
        inject_runtime_script(&mut assets, "index.html", &config()).unwrap();

        let html = &assets["index.html"];
        let script = html.find("livetheme-runtime").unwrap();
        let body_close = html.rfind("</body>").unwrap();
        assert!(script < body_close);
        assert!(html.contains("antd-theme-dark"));
    }

    #[test]
    fn test_inject_appends_without_body() {
        let mut assets = assets_with("index.html", "<p>fragment</p>");
        inject_runtime_script(&mut assets, "index.html", &config()).unwrap();
        assert!(assets["index.html"].starts_with("<p>fragment</p>"));
        assert!(assets["index.html"].ends_with("</script>"));
    }

    #[test]
    fn test_inject_missing_entry_is_hard_error() {
        let mut assets = assets_with("other.html", "<html></html>");
        let result = inject_runtime_script(&mut assets, "index.html", &config());
        match result {
            Err(PipelineError::EntryNotFound { name }) => assert_eq!(name, "index.html"),
            other => panic!("expected EntryNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_inject_is_idempotent() {
        let mut assets = assets_with("index.html", "<body></body>");
        inject_runtime_script(&mut assets, "index.html", &config()).unwrap();
        let once = assets["index.html"].clone();
        inject_runtime_script(&mut assets, "index.html", &config()).unwrap();
        assert_eq!(assets["index.html"], once);
    }

    #[test]
    fn test_inject_uses_configured_prefix() {
        let mut cfg = config();
        cfg.theme_class_pre = "my-app".to_string();
        let mut assets = assets_with("index.html", "<body></body>");
        inject_runtime_script(&mut assets, "index.html", &cfg).unwrap();
        assert!(assets["index.html"].contains("my-app-dark"));
        assert!(!assets["index.html"].contains("__PREFIX__"));
    }
}
