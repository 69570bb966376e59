use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{InheritanceError, TempleError, TempleResult};
use crate::interface::Loader;

/// Loads templates from disk.
///
/// Ids are canonical paths, so the same file reached through different
/// relative paths is recognised as one template. A parent reference is
/// resolved relative to the directory of the template that contains it.
#[derive(Debug, Clone, Default)]
pub struct FileLoader;

impl FileLoader {
    pub const fn new() -> Self {
        Self
    }
}

impl Loader for FileLoader {
    fn resolve(&self, from: Option<&str>, reference: &str) -> TempleResult<String> {
        let candidate = match from {
            Some(child) => Path::new(child)
                .parent()
                .map_or_else(|| PathBuf::from(reference), |dir| dir.join(reference)),
            None => PathBuf::from(reference),
        };

        match std::fs::canonicalize(&candidate) {
            Ok(path) => Ok(path.display().to_string()),
            Err(error) => match from {
                Some(child) => Err(InheritanceError::Unresolvable {
                    reference: reference.to_string(),
                    from: child.to_string(),
                    reason: error.to_string(),
                }
                .into()),
                None => Err(TempleError::io(&candidate, &error)),
            },
        }
    }

    fn load(&self, id: &str) -> TempleResult<String> {
        std::fs::read_to_string(id).map_err(|error| TempleError::io(id, &error))
    }
}

/// Holds named templates in memory. Names form a flat namespace; the
/// template containing a reference does not affect how it resolves.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    templates: HashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// `add_template` tries to make a new template available to the loader.
    ///
    /// # Errors
    /// - If the template name is a duplicate.
    pub fn add_template<N: AsRef<str>, S: Into<String>>(
        &mut self,
        name: N,
        source: S,
    ) -> TempleResult<()> {
        let name = name.as_ref();

        if self.templates.contains_key(name) {
            return Err(TempleError::TemplateExists {
                template_name: name.to_string(),
            });
        }

        self.templates.insert(name.to_string(), source.into());
        Ok(())
    }
}

impl Loader for MemoryLoader {
    fn resolve(&self, from: Option<&str>, reference: &str) -> TempleResult<String> {
        if self.templates.contains_key(reference) {
            return Ok(reference.to_string());
        }
        match from {
            Some(child) => Err(InheritanceError::Unresolvable {
                reference: reference.to_string(),
                from: child.to_string(),
                reason: "no template with that name".to_string(),
            }
            .into()),
            None => Err(TempleError::MissingTemplate {
                template_name: reference.to_string(),
            }),
        }
    }

    fn load(&self, id: &str) -> TempleResult<String> {
        self.templates
            .get(id)
            .cloned()
            .ok_or_else(|| TempleError::MissingTemplate {
                template_name: id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ntest::timeout(100)]
    fn test_memory_loader_rejects_duplicates() {
        let mut loader = MemoryLoader::new();
        loader.add_template("a", "1").unwrap();
        assert_eq!(
            loader.add_template("a", "2"),
            Err(TempleError::TemplateExists {
                template_name: "a".to_string()
            })
        );
        assert_eq!(loader.load("a").unwrap(), "1");
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_memory_loader_resolution_errors() {
        let loader = MemoryLoader::new();
        assert!(matches!(
            loader.resolve(None, "x"),
            Err(TempleError::MissingTemplate { .. })
        ));
        assert!(matches!(
            loader.resolve(Some("child"), "x"),
            Err(TempleError::Inheritance(InheritanceError::Unresolvable { .. }))
        ));
    }

    #[test]
    #[ntest::timeout(1000)]
    fn test_file_loader_resolves_relative_to_child() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("pages")).unwrap();
        std::fs::write(dir.path().join("base.html"), "base").unwrap();
        std::fs::write(dir.path().join("pages/child.html"), "child").unwrap();

        let loader = FileLoader::new();
        let child = loader
            .resolve(None, &dir.path().join("pages/child.html").display().to_string())
            .unwrap();
        let parent = loader.resolve(Some(&child), "../base.html").unwrap();

        assert_eq!(loader.load(&parent).unwrap(), "base");
        assert_eq!(
            parent,
            std::fs::canonicalize(dir.path().join("base.html"))
                .unwrap()
                .display()
                .to_string()
        );
    }

    #[test]
    #[ntest::timeout(1000)]
    fn test_file_loader_missing_parent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("child.html"), "child").unwrap();

        let loader = FileLoader::new();
        let child = loader
            .resolve(None, &dir.path().join("child.html").display().to_string())
            .unwrap();
        assert!(matches!(
            loader.resolve(Some(&child), "missing.html"),
            Err(TempleError::Inheritance(InheritanceError::Unresolvable { .. }))
        ));
        assert!(matches!(
            loader.resolve(None, &dir.path().join("nope.html").display().to_string()),
            Err(TempleError::Io { .. })
        ));
    }
}
