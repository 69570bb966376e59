use tracing::debug;

use crate::error::{InheritanceError, TempleResult};
use crate::interface::{Context, Loader, OutputBuffers};
use crate::loader::FileLoader;
use crate::template::Template;

/// `Engine` compiles templates obtained from a [`Loader`], resolving
/// `extends` chains.
///
/// # Examples
///
/// ```
/// use temple::{Context, Engine, MemoryLoader};
///
/// let mut loader = MemoryLoader::new();
/// loader
///     .add_template("base.html", "<p>{% insert greeting %}{% endblock %}</p>")
///     .unwrap();
/// loader
///     .add_template(
///         "page.html",
///         "{% extends \"base.html\" %}{% block \"greeting\" %}Hi {{ name }}{% endblock %}",
///     )
///     .unwrap();
///
/// let engine = Engine::new(loader);
/// let context = Context::new().insert("name", "Ada").to_owned();
///
/// let output = engine.compile("page.html", Some(&context)).unwrap();
/// assert_eq!(output.root(), "<p>Hi Ada</p>");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine<L = FileLoader> {
    loader: L,
}

impl<L: Loader> Engine<L> {
    pub const fn new(loader: L) -> Self {
        Self { loader }
    }

    pub const fn loader(&self) -> &L {
        &self.loader
    }

    /// Compiles the template named by `reference` and every template it
    /// extends, returning the buffers of the last template in the chain.
    ///
    /// Each parent is rendered with the previous level's buffers as its
    /// insert values.
    ///
    /// # Errors
    ///
    /// * `TempleError::Parse` / `TempleError::Eval` - If any template in the
    ///   chain fails to parse or evaluate
    /// * `TempleError::Inheritance` - If a parent cannot be resolved or read,
    ///   or the chain revisits a template
    /// * `TempleError::Io` / `TempleError::MissingTemplate` - If the entry
    ///   template cannot be loaded
    pub fn compile(
        &self,
        reference: &str,
        variables: Option<&Context>,
    ) -> TempleResult<OutputBuffers> {
        let mut id = self.loader.resolve(None, reference)?;
        let mut chain = vec![id.clone()];
        let mut insert_values = None;
        // The child id and the reference it extended `id` through.
        let mut extended_by: Option<(String, String)> = None;

        loop {
            let source = self.loader.load(&id).map_err(|error| match &extended_by {
                Some((child, reference)) => InheritanceError::Unresolvable {
                    reference: reference.clone(),
                    from: child.clone(),
                    reason: error.to_string(),
                }
                .into(),
                None => error,
            })?;
            let template = Template::new(&source)?;
            let rendered = template.render(variables, insert_values.take())?;
            debug!(template = %id, regions = rendered.buffers.len(), "compiled template");

            let Some(parent) = rendered.extends else {
                return Ok(rendered.buffers);
            };

            let parent_id = self.loader.resolve(Some(&id), &parent)?;
            if chain.contains(&parent_id) {
                chain.push(parent_id);
                return Err(InheritanceError::Cycle { chain }.into());
            }
            debug!(child = %id, parent = %parent_id, "extending parent template");

            chain.push(parent_id.clone());
            insert_values = Some(rendered.buffers);
            extended_by = Some((std::mem::replace(&mut id, parent_id), parent));
        }
    }

    /// Renders standalone source without following `extends`.
    ///
    /// # Errors
    ///
    /// * `TempleError::Parse` / `TempleError::Eval` - If the source fails to
    ///   parse or evaluate
    pub fn render_str(
        &self,
        source: &str,
        variables: Option<&Context>,
    ) -> TempleResult<OutputBuffers> {
        let template = Template::new(source)?;
        Ok(template.render(variables, None)?.buffers)
    }
}

impl Engine<FileLoader> {
    /// Creates an engine reading templates from disk.
    pub const fn from_files() -> Self {
        Self::new(FileLoader::new())
    }
}
