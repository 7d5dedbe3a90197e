//! Page shell templates.
//!
//! Wraps a mounted page body in the page chrome: document title,
//! description, breadcrumbs, an on-this-page list and the last-updated
//! stamp, all read from the page's data export.

use minijinja::{context, Environment};

use pagelet_page::{Header, PageData};

/// A breadcrumb segment.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Crumb {
    /// Display title
    pub title: String,
    /// Whether this is the current page
    pub current: bool,
}

/// A table of contents entry.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// In-page link
    pub link: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Context for rendering a page shell.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Context {
    /// Page title
    pub title: String,
    /// Site title
    pub site_title: String,
    /// Page description
    pub description: String,
    /// Rendered body HTML
    pub content: String,
    /// Breadcrumbs from the relative path
    pub breadcrumbs: Vec<Crumb>,
    /// Table of contents
    pub toc: Vec<TocEntry>,
    /// Last-updated date, formatted
    pub last_updated: Option<String>,
    /// Base URL
    pub base_url: String,
}

impl Context {
    /// Build the chrome context from a page's data export and its body HTML.
    pub fn for_page(data: &PageData, content: String, site_title: &str, base_url: &str) -> Self {
        let toc = data
            .flat_headers()
            .into_iter()
            .map(|h: &Header| TocEntry {
                title: h.title.clone(),
                link: h.link.clone(),
                level: h.level,
            })
            .collect();

        let title = if data.title.is_empty() {
            site_title.to_string()
        } else {
            data.title.clone()
        };

        Self {
            title: title.clone(),
            site_title: site_title.to_string(),
            description: data.description.clone(),
            content,
            breadcrumbs: breadcrumbs(&data.relative_path, &title),
            toc,
            last_updated: data
                .last_updated
                .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string()),
            base_url: base_url.to_string(),
        }
    }
}

fn breadcrumbs(relative_path: &str, title: &str) -> Vec<Crumb> {
    let mut segments: Vec<&str> = relative_path.split('/').collect();
    segments.pop();

    let mut crumbs: Vec<Crumb> = segments
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(|s| Crumb {
            title: capitalize(&s.replace(['-', '_'], " ")),
            current: false,
        })
        .collect();

    crumbs.push(Crumb {
        title: title.to_string(),
        current: true,
    });
    crumbs
}

/// Capitalize first letter of a string.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();

        env.add_template("base.html", BASE_TEMPLATE)?;
        env.add_template("page.html", PAGE_TEMPLATE)?;

        Ok(Self { env })
    }

    /// Render a page using the specified template.
    pub fn render_page(
        &self,
        template: &str,
        context: &Context,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template)?;

        tmpl.render(context! {
            title => &context.title,
            site_title => &context.site_title,
            description => &context.description,
            content => &context.content,
            breadcrumbs => &context.breadcrumbs,
            toc => &context.toc,
            last_updated => &context.last_updated,
            base_url => &context.base_url,
        })
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{% if title != site_title %}{{ title }} | {% endif %}{{ site_title }}</title>
  {% if description %}<meta name="description" content="{{ description }}">{% endif %}
</head>
<body>
  <main class="main">
    {% block content %}{% endblock %}
  </main>
</body>
</html>"##;

const PAGE_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<nav class="breadcrumbs">
  <a href="{{ base_url }}">{{ site_title }}</a>
  {% for crumb in breadcrumbs %}
  <span class="crumb{% if crumb.current %} current{% endif %}">{{ crumb.title }}</span>
  {% endfor %}
</nav>

<article class="doc">
  <div class="content">{{ content | safe }}</div>
  {% if last_updated %}
  <p class="last-updated">Last updated: <time>{{ last_updated }}</time></p>
  {% endif %}
</article>

{% if toc %}
<aside class="toc">
  <h2>On this page</h2>
  <ul>
  {% for entry in toc %}
    <li class="toc-level-{{ entry.level }}">
      <a href="{{ entry.link }}">{{ entry.title }}</a>
    </li>
  {% endfor %}
  </ul>
</aside>
{% endif %}
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pagelet_page::{nest_headers, Header};

    fn page() -> PageData {
        let mut data = PageData::new("Geodesic paths", "tutorials/geodesic_paths.md");
        data.description = "Paths on an ellipsoid".to_string();
        data
    }

    #[test]
    fn renders_basic_page() {
        let engine = TemplateEngine::new().unwrap();
        let context = Context::for_page(&page(), "<p>Hello world</p>".to_string(), "Docs", "/");

        let html = engine.render_page("page.html", &context).unwrap();

        assert!(html.contains("<title>Geodesic paths | Docs</title>"));
        assert!(html.contains(r#"<meta name="description" content="Paths on an ellipsoid">"#));
        assert!(html.contains("<p>Hello world</p>"));
        assert!(!html.contains("Last updated"));
    }

    #[test]
    fn renders_breadcrumbs() {
        let context = Context::for_page(&page(), String::new(), "Docs", "/");

        let titles: Vec<_> = context.breadcrumbs.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Tutorials", "Geodesic paths"]);
        assert!(context.breadcrumbs[1].current);
    }

    #[test]
    fn renders_toc_and_last_updated() {
        let mut data = page();
        data.headers = nest_headers(vec![
            Header::new(2, "Setup", "setup"),
            Header::new(3, "Plotting", "plotting"),
        ]);
        data.last_updated = Some(Utc.with_ymd_and_hms(2024, 6, 10, 12, 30, 0).unwrap());

        let engine = TemplateEngine::new().unwrap();
        let context = Context::for_page(&data, String::new(), "Docs", "/");
        let html = engine.render_page("page.html", &context).unwrap();

        assert!(html.contains(r##"<a href="#plotting">Plotting</a>"##));
        assert!(html.contains("toc-level-3"));
        assert!(html.contains("<time>2024-06-10 12:30 UTC</time>"));
    }

    #[test]
    fn untitled_page_uses_site_title() {
        let data = PageData::new("", "index.md");
        let context = Context::for_page(&data, String::new(), "Docs", "/");

        let html = TemplateEngine::new()
            .unwrap()
            .render_page("page.html", &context)
            .unwrap();

        assert!(html.contains("<title>Docs</title>"));
    }
}
