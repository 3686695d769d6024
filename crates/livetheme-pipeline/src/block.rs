//! Override-block synthesis.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Builds the block of variable-override declarations prepended to every
//! compiled Less file. The block redirects each known theme variable to a
//! runtime-resolvable CSS custom property:
//!
//! ```text
//! @primary-color:~'var(--antd-theme-primary-color)';
//! ```
//!
//! Only variable *names* matter here: the values of the dark and light
//! variants are applied at runtime by class toggling, not at build time,
//! so the block is deliberately theme-agnostic.

use indexmap::IndexSet;

use livetheme_less::extract_variables;

use crate::config::ThemeConfig;
use crate::error::PipelineError;

/// Synthesize the override declaration block for `config`'s theme variants.
///
/// Both variant files are extracted concurrently. The block contains one
/// declaration per unique variable name across the two variants, in
/// first-seen order (dark keys, then light keys), with no separators.
/// Two variants with no declarations produce an empty string.
///
/// The block is recomputed on every call; caching across compiles is the
/// caller's business, not this function's.
///
/// # Errors
///
/// Fails if *either* variant file cannot be read or parsed. There is no
/// partial block.
pub async fn synthesize_override_block(config: &ThemeConfig) -> Result<String, PipelineError> {
    let dark_path = config.dark_path();
    let light_path = config.light_path();
    let (dark, light) = tokio::join!(
        extract_variables(&dark_path),
        extract_variables(&light_path),
    );
    let (dark, light) = (dark?, light?);

    let mut names: IndexSet<&str> = IndexSet::new();
    names.extend(dark.keys().map(String::as_str));
    names.extend(light.keys().map(String::as_str));

    tracing::debug!(
        dark = dark.len(),
        light = light.len(),
        union = names.len(),
        "Synthesized theme override block"
    );

    let prefix = &config.theme_class_pre;
    let mut block = String::new();
    for name in &names {
        block.push_str(&format!("@{name}:~'var(--{prefix}-{name})';"));
    }
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn theme_dir(dark: &str, light: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("dark.less"), dark).unwrap();
        fs::write(dir.path().join("light.less"), light).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_synthesize_union_first_seen_order() {
        // dark declares {primary-color, my-color}, light declares
        // {primary-color}: the union has no duplicates and keeps
        // first-seen order
        let dir = theme_dir(
            "@primary-color: red;\n@my-color: green;\n",
            "@primary-color: blue;\n",
        );
        let config = ThemeConfig::new(dir.path());

        let block = synthesize_override_block(&config).await.unwrap();
        assert_eq!(
            block,
            "@primary-color:~'var(--antd-theme-primary-color)';@my-color:~'var(--antd-theme-my-color)';"
        );
    }

    #[tokio::test]
    async fn test_synthesize_light_only_names_included() {
        let dir = theme_dir("@a: 1;\n", "@a: 2;\n@b: 3;\n");
        let config = ThemeConfig::new(dir.path());

        let block = synthesize_override_block(&config).await.unwrap();
        assert_eq!(
            block,
            "@a:~'var(--antd-theme-a)';@b:~'var(--antd-theme-b)';"
        );
    }

    #[tokio::test]
    async fn test_synthesize_empty_variants_is_empty_string() {
        let dir = theme_dir("// nothing\n", "");
        let config = ThemeConfig::new(dir.path());

        let block = synthesize_override_block(&config).await.unwrap();
        assert_eq!(block, "");
    }

    #[tokio::test]
    async fn test_synthesize_custom_prefix() {
        let dir = theme_dir("@primary: red;\n", "");
        let mut config = ThemeConfig::new(dir.path());
        config.theme_class_pre = "my-app".to_string();

        let block = synthesize_override_block(&config).await.unwrap();
        assert_eq!(block, "@primary:~'var(--my-app-primary)';");
    }

    #[tokio::test]
    async fn test_synthesize_missing_variant_fails_whole_block() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("dark.less"), "@a: 1;\n").unwrap();
        // no light.less
        let config = ThemeConfig::new(dir.path());

        let result = synthesize_override_block(&config).await;
        assert!(matches!(result, Err(PipelineError::Theme(_))));
    }

    #[tokio::test]
    async fn test_synthesize_invalid_variant_fails_whole_block() {
        let dir = theme_dir("@a: 1;\n", ".broken { color: red\n");
        let config = ThemeConfig::new(dir.path());

        let result = synthesize_override_block(&config).await;
        assert!(matches!(result, Err(PipelineError::Theme(_))));
    }
}
