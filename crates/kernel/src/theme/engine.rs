//! Theme engine with Tera templates and suggestion resolution.

use std::path::Path;

use anyhow::{Context, Result};
use dashmap::DashMap;
use tera::Tera;
use tracing::debug;

use crate::models::Page;

/// Theme engine for rendering templates.
pub struct ThemeEngine {
    /// Tera template engine instance.
    tera: Tera,
    /// Cache mapping suggestion lists to resolved template names.
    suggestion_cache: DashMap<String, String>,
}

impl ThemeEngine {
    /// Create a new theme engine loading templates from the given directory.
    pub fn new(template_dir: &Path) -> Result<Self> {
        let pattern = template_dir.join("**/*.html");
        let pattern_str = pattern
            .to_str()
            .context("invalid template directory path")?;

        let tera = Tera::new(pattern_str).context("failed to initialize Tera templates")?;

        let template_names: Vec<_> = tera.get_template_names().collect();
        debug!(count = template_names.len(), "loaded templates");

        Ok(Self::from_tera(tera))
    }

    /// Wrap an already-built Tera instance.
    pub fn from_tera(tera: Tera) -> Self {
        Self {
            tera,
            suggestion_cache: DashMap::new(),
        }
    }

    /// Get the underlying Tera instance.
    pub fn tera(&self) -> &Tera {
        &self.tera
    }

    /// Render a named template.
    pub fn render(&self, template: &str, context: &tera::Context) -> Result<String> {
        self.tera
            .render(template, context)
            .with_context(|| format!("failed to render template {template}"))
    }

    /// Resolve the best template from a list of suggestions.
    ///
    /// Suggestions are tried in order; the first one that exists is returned.
    /// Hits are cached, misses are not.
    ///
    /// Example suggestions: `["page--contact-us", "page"]`
    pub fn resolve_template(&self, suggestions: &[&str]) -> Option<String> {
        if suggestions.is_empty() {
            return None;
        }

        let cache_key = suggestions.join("|");
        if let Some(cached) = self.suggestion_cache.get(&cache_key) {
            return Some(cached.clone());
        }

        for suggestion in suggestions {
            let template_name = format!("{suggestion}.html");
            if self.tera.get_template(&template_name).is_ok() {
                self.suggestion_cache
                    .insert(cache_key, template_name.clone());
                return Some(template_name);
            }
        }

        None
    }

    /// Template suggestions for a public page, most specific first:
    /// `page--{slug}`, then `page`.
    pub fn page_suggestions(page: &Page) -> Vec<String> {
        vec![format!("page--{}", page.slug), "page".to_string()]
    }

    /// Render a public page with the given context (site name, menu, sidebar).
    pub fn render_page(&self, page: &Page, context: &mut tera::Context) -> Result<String> {
        let suggestions = Self::page_suggestions(page);
        let suggestion_refs: Vec<&str> = suggestions.iter().map(|s| s.as_str()).collect();

        let template = self
            .resolve_template(&suggestion_refs)
            .unwrap_or_else(|| "page.html".to_string());

        context.insert("page", page);
        self.render(&template, context)
    }
}
