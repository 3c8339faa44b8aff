use clap::{App, Arg};
use folio::build::{build_site, Error as BuildError};
use folio::config::Config;
use folio::sink::ManifestSink;
use log::{error, LevelFilter, SetLoggerError};
use simple_logger::SimpleLogger;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

fn main() {
    let matches = App::new("folio")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Plans listing, category, author and post pages for a blog")
        .arg(
            Arg::with_name("project")
                .short("p")
                .long("project")
                .value_name("DIR")
                .help("Directory to search (upward) for folio.yaml")
                .default_value(".")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("FILE")
                .help("Where to write the page manifest (default: stdout)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("page-size")
                .long("page-size")
                .value_name("N")
                .help("Overrides the configured number of posts per listing page")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Enables debug logging"),
        )
        .get_matches();

    if let Err(e) = init_logging(matches.is_present("verbose")) {
        eprintln!("folio: installing logger: {}", e);
    }

    if let Err(e) = run(
        Path::new(matches.value_of("project").unwrap_or(".")),
        matches.value_of("output"),
        matches.value_of("page-size"),
    ) {
        if let Some(message) = failure_message(&e) {
            error!("{}", message);
        }
        std::process::exit(1);
    }
}

// The manifest may go to stdout, so logs go to stderr.
fn init_logging(verbose: bool) -> Result<(), SetLoggerError> {
    let level = match verbose {
        true => LevelFilter::Debug,
        false => LevelFilter::Info,
    };
    SimpleLogger::new().with_level(level).init()
}

/// The message to log for a failed run. Every error layer already includes
/// the text of the error it wraps, so only the outermost message is used.
/// Upstream query errors have been logged by [`build_site`] and yield `None`.
fn failure_message(e: &anyhow::Error) -> Option<String> {
    match e.downcast_ref::<BuildError>() {
        Some(BuildError::Source(err)) if err.upstream_errors().is_some() => None,
        _ => Some(e.to_string()),
    }
}

fn run(project: &Path, output: Option<&str>, page_size: Option<&str>) -> anyhow::Result<()> {
    let mut config = Config::from_directory(project)?;
    if let Some(page_size) = page_size {
        config.page_size = page_size
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid --page-size `{}`: {}", page_size, e))?;
    }

    // Nothing is written unless the whole plan succeeds.
    let mut sink = ManifestSink::new(Vec::new());
    build_site(&config, &mut sink)?;
    let manifest = sink.finish()?;
    match output {
        Some(path) => File::create(path)?.write_all(&manifest)?,
        None => io::stdout().write_all(&manifest)?,
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    fn project(posts: &str) -> anyhow::Result<tempfile::TempDir> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("folio.yaml"), "page_size: 3")?;
        fs::write(dir.path().join("posts.yaml"), posts)?;
        Ok(dir)
    }

    const POSTS: &str = "
posts:
  - {path: /a/, date: 2019-03-01, author: jane, category: [x]}
  - {path: /b/, date: 2019-02-01, author: jane, category: [x]}
";

    fn list_paths(manifest: &[u8]) -> anyhow::Result<Vec<String>> {
        let pages: serde_yaml::Value = serde_yaml::from_slice(manifest)?;
        Ok(pages
            .as_sequence()
            .ok_or_else(|| anyhow::anyhow!("manifest is not a sequence"))?
            .iter()
            .filter(|p| p["template"].as_str() == Some("blog-list"))
            .filter_map(|p| p["path"].as_str().map(str::to_owned))
            .collect())
    }

    #[test]
    fn test_run_page_size_override() -> anyhow::Result<()> {
        let dir = project(POSTS)?;
        let out = dir.path().join("manifest.yaml");
        let out = out.to_str().ok_or_else(|| anyhow::anyhow!("non-UTF-8 path"))?;

        run(dir.path(), Some(out), None)?;
        assert_eq!(vec!["/blog"], list_paths(&fs::read(out)?)?);

        run(dir.path(), Some(out), Some("1"))?;
        assert_eq!(vec!["/blog", "/blog/page/2"], list_paths(&fs::read(out)?)?);
        Ok(())
    }

    #[test]
    fn test_run_invalid_page_size() -> anyhow::Result<()> {
        let dir = project(POSTS)?;
        let out = dir.path().join("manifest.yaml");
        let out = out.to_str().ok_or_else(|| anyhow::anyhow!("non-UTF-8 path"))?;

        let err = run(dir.path(), Some(out), Some("abc")).unwrap_err();
        assert!(err.to_string().starts_with("Invalid --page-size `abc`"));

        let err = run(dir.path(), Some(out), Some("0")).unwrap_err();
        assert_eq!("page size must be positive, got 0", err.to_string());
        assert!(!dir.path().join("manifest.yaml").exists());
        Ok(())
    }

    #[test]
    fn test_upstream_failure_is_not_reported_again() -> anyhow::Result<()> {
        let dir = project("errors: [boom, bang]")?;
        let err = run(dir.path(), None, None).unwrap_err();
        assert_eq!(None, failure_message(&err));
        Ok(())
    }

    #[test]
    fn test_failure_message_mentions_cause_once() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("folio.yaml"), "source: missing.yaml")?;
        let err = run(dir.path(), None, None).unwrap_err();
        let message = failure_message(&err).ok_or_else(|| anyhow::anyhow!("no message"))?;
        assert_eq!(1, message.matches("opening query result").count());
        assert_eq!(1, message.matches("os error").count());
        Ok(())
    }

    #[test]
    fn test_init_logging_twice() {
        let _ = init_logging(false);
        assert!(init_logging(true).is_err());
    }
}
