//! Markdown file storage with Handlebars template engine
//!
//! This module renders converted pages with their metadata header and
//! saves them to the output directory under collision-free names.

use handlebars::Handlebars;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::models::PageRecord;
use crate::storage::namer;
use crate::utils::error::StorageError;

/// Default page template
const DEFAULT_TEMPLATE: &str = include_str!("../../templates/page.hbs");

const TEMPLATE_NAME: &str = "page";

/// Attempts at a fresh name when files appear behind our back
const MAX_CREATE_ATTEMPTS: usize = 1000;

/// Template data for rendering
#[derive(Debug, Serialize)]
struct PageTemplateData<'p> {
    title: &'p str,
    source: &'p str,
    scraped_at: String,
    content: &'p str,
}

impl<'p> From<&'p PageRecord> for PageTemplateData<'p> {
    fn from(page: &'p PageRecord) -> Self {
        Self {
            title: &page.title,
            source: &page.url,
            scraped_at: page.scraped_at_display(),
            content: &page.markdown,
        }
    }
}

/// Markdown writer with Handlebars template engine
pub struct MarkdownWriter<'a> {
    /// Handlebars template engine
    handlebars: Handlebars<'a>,

    /// Output directory
    output_dir: PathBuf,

    /// File names already present or written this run
    taken: HashSet<String>,
}

impl<'a> MarkdownWriter<'a> {
    /// Create a new MarkdownWriter with the default template
    ///
    /// Creates `output_dir` with parents and records the names of files
    /// already inside it so they are never overwritten.
    ///
    /// # Example
    /// ```no_run
    /// use docharvest::storage::MarkdownWriter;
    /// use std::path::Path;
    ///
    /// let writer = MarkdownWriter::new(Path::new("./docs/yjs")).unwrap();
    /// ```
    pub fn new(output_dir: &Path) -> Result<Self, StorageError> {
        let mut handlebars = Handlebars::new();
        handlebars
            .register_template_string(TEMPLATE_NAME, DEFAULT_TEMPLATE)
            .map_err(|e| StorageError::Template(e.to_string()))?;

        Self::with_engine(handlebars, output_dir)
    }

    /// Create with a custom template file
    ///
    /// The template receives `title`, `source`, `scraped_at` and `content`.
    pub fn with_template(output_dir: &Path, template_path: &Path) -> Result<Self, StorageError> {
        let mut handlebars = Handlebars::new();
        handlebars
            .register_template_file(TEMPLATE_NAME, template_path)
            .map_err(|e| StorageError::Template(e.to_string()))?;

        Self::with_engine(handlebars, output_dir)
    }

    fn with_engine(mut handlebars: Handlebars<'a>, output_dir: &Path) -> Result<Self, StorageError> {
        // Markdown output, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);

        fs::create_dir_all(output_dir).map_err(|source| StorageError::CreateDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let taken = existing_names(output_dir)?;
        tracing::debug!(
            dir = %output_dir.display(),
            existing = taken.len(),
            "Output directory ready"
        );

        Ok(Self {
            handlebars,
            output_dir: output_dir.to_path_buf(),
            taken,
        })
    }

    /// Render page to its final file contents
    pub fn render(&self, page: &PageRecord) -> Result<String, StorageError> {
        let data = PageTemplateData::from(page);
        self.handlebars
            .render(TEMPLATE_NAME, &data)
            .map_err(|e| StorageError::Template(e.to_string()))
    }

    /// Save page under a fresh name
    ///
    /// Files are opened with create-new semantics; a name that turns out to
    /// exist on disk is marked taken and the next suffix is tried.
    ///
    /// # Returns
    /// Path to saved file
    pub fn save(&mut self, page: &PageRecord) -> Result<PathBuf, StorageError> {
        let markdown = self.render(page)?;

        for _ in 0..MAX_CREATE_ATTEMPTS {
            let filename = namer::name_for(&page.url, &self.taken);
            let filepath = self.output_dir.join(&filename);

            match OpenOptions::new().write(true).create_new(true).open(&filepath) {
                Ok(file) => {
                    write_or_discard(file, &filepath, markdown.as_bytes())?;
                    self.taken.insert(filename);

                    tracing::debug!(path = %filepath.display(), "Saved page to markdown");
                    return Ok(filepath);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!(file = %filename, "File appeared on disk, trying next name");
                    self.taken.insert(filename);
                }
                Err(source) => {
                    return Err(StorageError::Write {
                        path: filepath,
                        source,
                    })
                }
            }
        }

        Err(StorageError::NamesExhausted(page.url.clone()))
    }

    /// Get output directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Names currently considered occupied
    pub fn taken_names(&self) -> &HashSet<String> {
        &self.taken
    }
}

/// Write `bytes` into a freshly created file, removing it again on failure
fn write_or_discard<W: Write>(mut file: W, path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let result = file.write_all(bytes).and_then(|()| file.flush());
    drop(file);

    if let Err(source) = result {
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove partial file");
        }
        return Err(StorageError::Write {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

/// File names present in `dir`
fn existing_names(dir: &Path) -> Result<HashSet<String>, StorageError> {
    let read_err = |source: std::io::Error| StorageError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = HashSet::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        names.insert(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}
