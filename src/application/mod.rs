use crate::domain::deps::{DependencyCollector, DepsLine};
use crate::domain::report::{ReportLine, TypeReporter};
use crate::ports::{LineSink, SourceParser};
use anyhow::{Context, Result};
use log::info;
use std::path::Path;

pub struct ReportUsecase<'a> {
    pub parser: &'a dyn SourceParser,
}

impl<'a> ReportUsecase<'a> {
    /// Parse `path` and stream its type report into `sink`. Returns the number of lines emitted.
    pub fn run<S>(&self, path: &Path, sink: &mut S) -> Result<usize>
    where
        S: LineSink<ReportLine> + ?Sized,
    {
        let tree = self
            .parser
            .parse_file(path)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        let emitted = TypeReporter::walk(&tree, sink)
            .with_context(|| format!("failed to report types of {}", path.display()))?;
        info!("{}: {} line(s)", path.display(), emitted);
        Ok(emitted)
    }

    /// Parse `path` and write the dependency summary of each top-level class into `sink`.
    pub fn run_deps<S>(&self, path: &Path, sink: &mut S) -> Result<usize>
    where
        S: LineSink<DepsLine> + ?Sized,
    {
        let tree = self
            .parser
            .parse_file(path)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        let mut emitted = 0;
        for class in DependencyCollector::collect(&tree) {
            for line in class.lines() {
                sink.emit(line).context("failed to write dependency summary")?;
                emitted += 1;
            }
        }
        info!("{}: {} line(s)", path.display(), emitted);
        Ok(emitted)
    }
}
