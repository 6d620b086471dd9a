//! Server-rendered index page and the script it loads

use handlebars::{Handlebars, TemplateError};
use serde::Serialize;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.hbs");

/// Browser client served at `/static/main.js`
pub const MAIN_JS: &str = include_str!("../static/main.js");

const TEMPLATE_NAME: &str = "index";

#[derive(Debug, Serialize)]
struct PageContext<'a> {
    title: &'a str,
    script_path: &'a str,
    version: &'a str,
}

/// Handlebars renderer for `/`
#[derive(Debug)]
pub struct IndexPage {
    engine: Handlebars<'static>,
}

impl IndexPage {
    /// Page built from the bundled template
    pub fn new() -> Result<Self, TemplateError> {
        Self::from_template(INDEX_TEMPLATE)
    }

    /// Page built from a custom template.
    ///
    /// Strict mode is on, so a template referencing a value the page does
    /// not provide fails at render time.
    pub fn from_template(template: &str) -> Result<Self, TemplateError> {
        let mut engine = Handlebars::new();
        engine.set_strict_mode(true);
        engine.register_template_string(TEMPLATE_NAME, template)?;
        Ok(Self { engine })
    }

    pub fn render(&self) -> Result<String, handlebars::RenderError> {
        let context = PageContext {
            title: "Task List",
            script_path: "/static/main.js",
            version: env!("CARGO_PKG_VERSION"),
        };
        self.engine.render(TEMPLATE_NAME, &context)
    }
}
