//! Loads project configuration from a `folio.yaml` file.

use crate::plan::{Options, PageKind, DEFAULT_ROOT};
use crate::util::open;
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "folio.yaml";

#[derive(Deserialize)]
struct PageSize(usize);
impl Default for PageSize {
    fn default() -> Self {
        PageSize(3)
    }
}

fn default_source() -> PathBuf {
    PathBuf::from("posts.yaml")
}

fn default_root() -> String {
    DEFAULT_ROOT.to_owned()
}

#[derive(Deserialize)]
struct Project {
    #[serde(default = "default_source")]
    source: PathBuf,

    #[serde(default)]
    page_size: PageSize,

    #[serde(default = "default_root")]
    root: String,

    #[serde(default)]
    emit_empty_listing: bool,

    #[serde(default)]
    templates: Templates,
}

/// The template identifier for each [`PageKind`]. Identifiers are opaque to
/// `folio` and are passed through to the page sink.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Templates {
    pub detail: String,
    pub list: String,
    pub category: String,
    pub author: String,
}

impl Default for Templates {
    fn default() -> Self {
        Templates {
            detail: "blog-post".to_owned(),
            list: "blog-list".to_owned(),
            category: "blog-category".to_owned(),
            author: "blog-author".to_owned(),
        }
    }
}

impl Templates {
    /// The template identifier for pages of `kind`.
    pub fn for_kind(&self, kind: PageKind) -> &str {
        match kind {
            PageKind::Detail => &self.detail,
            PageKind::List => &self.list,
            PageKind::Category => &self.category,
            PageKind::Author => &self.author,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// The query-result file documents are loaded from.
    pub source: PathBuf,
    pub page_size: usize,
    pub root: String,
    pub emit_empty_listing: bool,
    pub templates: Templates,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: default_source(),
            page_size: PageSize::default().0,
            root: default_root(),
            emit_empty_listing: false,
            templates: Templates::default(),
        }
    }
}

impl Config {
    /// Finds `folio.yaml` in `dir` or the nearest ancestor directory and loads
    /// it.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            match Config::from_project_file(&path) {
                Ok(config) => Ok(config),
                Err(e) => Err(anyhow!("Loading configuration: {:?}", e)),
            }
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    /// Loads a project file. A relative `source` is resolved against the
    /// directory holding the project file.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(open(path, "project")?)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => {
                if project.page_size.0 < 1 {
                    return Err(anyhow!("`page_size` must be positive"));
                }
                if !project.root.starts_with('/') {
                    return Err(anyhow!(
                        "`root` must be an absolute path such as `/blog` or `/`, got `{}`",
                        project.root
                    ));
                }
                Ok(Config {
                    source: project_root.join(project.source),
                    page_size: project.page_size.0,
                    root: project.root,
                    emit_empty_listing: project.emit_empty_listing,
                    templates: project.templates,
                })
            }
        }
    }

    /// The planner options described by this configuration.
    pub fn options(&self) -> Options {
        Options {
            page_size: self.page_size,
            root: self.root.clone(),
            emit_empty_listing: self.emit_empty_listing,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(PROJECT_FILE), "{}")?;
        let config = Config::from_directory(dir.path())?;
        assert_eq!(
            Config {
                source: dir.path().join("posts.yaml"),
                ..Config::default()
            },
            config
        );
        assert_eq!("blog-post", config.templates.for_kind(PageKind::Detail));
        assert_eq!(3, config.options().page_size);
        Ok(())
    }

    #[test]
    fn test_from_ancestor_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join(PROJECT_FILE),
            "
source: data/query.yaml
page_size: 10
root: /news
emit_empty_listing: true
templates:
  list: news-list
",
        )?;
        let nested = dir.path().join("content").join("drafts");
        fs::create_dir_all(&nested)?;

        let config = Config::from_directory(&nested)?;
        assert_eq!(dir.path().join("data/query.yaml"), config.source);
        assert_eq!(
            Options {
                page_size: 10,
                root: "/news".to_owned(),
                emit_empty_listing: true,
            },
            config.options()
        );
        assert_eq!("news-list", config.templates.for_kind(PageKind::List));
        assert_eq!("blog-author", config.templates.for_kind(PageKind::Author));
        Ok(())
    }

    #[test]
    fn test_zero_page_size() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(PROJECT_FILE), "page_size: 0")?;
        assert!(Config::from_directory(dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_root_must_be_absolute() -> Result<()> {
        let dir = tempfile::tempdir()?;
        for root in &["blog", "\"\""] {
            fs::write(dir.path().join(PROJECT_FILE), format!("root: {}", root))?;
            assert!(Config::from_directory(dir.path()).is_err(), "root {}", root);
        }

        fs::write(dir.path().join(PROJECT_FILE), "root: /")?;
        assert_eq!("/", Config::from_directory(dir.path())?.root);
        Ok(())
    }
}
