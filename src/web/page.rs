//! Listing page rendering.

use std::fs;
use std::io;
use std::path::Path;

use crate::file::FileEntry;
use crate::template::{TemplateContext, TemplateEngine, Value};
use crate::Result;

/// Name of the listing page template.
pub const INDEX_TEMPLATE: &str = "index.html";

const BUILTIN_INDEX: &str = include_str!("../../templates/index.html");

/// Renders the listing page.
#[derive(Debug)]
pub struct PageRenderer {
    engine: TemplateEngine,
}

impl PageRenderer {
    /// Renderer using the built-in page.
    pub fn builtin() -> Result<Self> {
        Self::from_source(BUILTIN_INDEX)
    }

    /// Renderer using `source` as the listing page template.
    pub fn from_source(source: &str) -> Result<Self> {
        let mut engine = TemplateEngine::new();
        engine.load(INDEX_TEMPLATE, source)?;
        Ok(Self { engine })
    }

    /// Use `dir/index.html` when present, the built-in page otherwise.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(INDEX_TEMPLATE);
        match fs::read_to_string(&path) {
            Ok(source) => {
                tracing::info!("Using listing template {}", path.display());
                Self::from_source(&source)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::builtin(),
            Err(e) => Err(e.into()),
        }
    }

    /// Render the listing with an optional confirmation message.
    pub fn render_index(&self, files: &[FileEntry], message: Option<&str>) -> Result<String> {
        let mut context = TemplateContext::new();
        context.set(
            "files",
            Value::List(files.iter().map(file_value).collect()),
        );
        context.set("message", Value::from(message));

        Ok(self.engine.render(INDEX_TEMPLATE, &context)?)
    }
}

fn file_value(entry: &FileEntry) -> Value {
    Value::object([
        ("name", Value::from(entry.name.as_str())),
        ("url_name", Value::from(urlencoding::encode(&entry.name).into_owned())),
        ("size_label", Value::from(entry.size_label.as_str())),
        ("size", Value::Number(i64::try_from(entry.size).unwrap_or(i64::MAX))),
    ])
}
