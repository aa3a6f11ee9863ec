use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Result, SubtransError};
use crate::oracle::{Oracle, OracleFactory};
use crate::report::TranslationReport;
use crate::subtitle::{flatten_text, parse_blocks, refold, render_blocks};
use crate::translate::BatchTranslator;

/// What happened to one input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Translated,
    Skipped,
}

pub struct Workflow {
    config: Config,
    translator: BatchTranslator,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        let oracle = OracleFactory::create_oracle(config.oracle.clone());
        Self::with_oracle(config, oracle)
    }

    /// Build a workflow around an existing oracle
    pub fn with_oracle(config: Config, oracle: Box<dyn Oracle>) -> Result<Self> {
        config.validate()?;
        let translator = BatchTranslator::new(oracle, &config.translate);

        Ok(Self { config, translator })
    }

    /// Confirm the oracle binary runs, returning its version string
    pub async fn check_oracle(&self) -> Result<String> {
        self.translator.oracle().check_availability().await
    }

    /// Translate every untranslated subtitle file under `root`.
    ///
    /// Per-file failures are collected into the report; only a bad root is an error.
    pub async fn process_directory<P: AsRef<Path>>(&self, root: P) -> Result<TranslationReport> {
        let root = root.as_ref();
        info!("Processing directory: {}", root.display());

        let files = self.discover_files(root)?;
        info!("Found {} subtitle files", files.len());

        let mut report = TranslationReport::new(&self.config.discovery);
        for input in files {
            report.found += 1;
            let shown = display_path(&input, root);

            let output = match self.output_path_for(&input) {
                Ok(output) => output,
                Err(e) => {
                    report.errors.push(format!("{}: {}", shown, e));
                    continue;
                }
            };

            if output.exists() {
                info!("Skipping {}: {} already exists", shown, display_path(&output, root));
                report.skipped += 1;
                continue;
            }

            match self.translate_file_or_cleanup(&input, &output).await {
                Ok(()) => {
                    info!("Successfully translated: {}", shown);
                    report.translated += 1;
                }
                Err(e) => {
                    warn!("Failed to translate {}: {}", shown, e);
                    report.errors.push(format!("{}: {}", shown, e));
                }
            }
        }

        Ok(report)
    }

    /// Translate one file; an existing output is left alone unless `force` is set
    pub async fn process_single_file<P: AsRef<Path>>(
        &self,
        input: P,
        output: Option<PathBuf>,
        force: bool,
    ) -> Result<FileOutcome> {
        let input = input.as_ref();
        if !input.is_file() {
            return Err(SubtransError::FileNotFound(input.display().to_string()));
        }

        let output = match output {
            Some(path) => path,
            None => self.output_path_for(input)?,
        };

        if output.exists() && !force {
            info!("Skipping {}: {} already exists", input.display(), output.display());
            return Ok(FileOutcome::Skipped);
        }

        self.translate_file_or_cleanup(input, &output).await?;
        info!("Translated {} -> {}", input.display(), output.display());
        Ok(FileOutcome::Translated)
    }

    /// Subtitle files under `root`, sorted, excluding already translated ones
    pub fn discover_files<P: AsRef<Path>>(&self, root: P) -> Result<Vec<PathBuf>> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(SubtransError::Config(format!(
                "Input path is not a directory: {}",
                root.display()
            )));
        }

        let suffix = format!(".{}", self.config.discovery.extension);
        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.ends_with(&suffix) && !self.is_translated_name(name))
            })
            .map(|entry| entry.into_path())
            .collect();

        files.sort();
        Ok(files)
    }

    /// Whether a file name carries a translated marker
    pub fn is_translated_name(&self, name: &str) -> bool {
        let discovery = &self.config.discovery;
        name.ends_with(&discovery.output_suffix)
            || discovery
                .translated_markers
                .iter()
                .any(|marker| name.ends_with(marker.as_str()))
    }

    /// Output path for `input`: its `.<extension>` replaced by the output suffix
    pub fn output_path_for(&self, input: &Path) -> Result<PathBuf> {
        let discovery = &self.config.discovery;
        let name = input
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| SubtransError::Config(format!("Invalid file name: {}", input.display())))?;

        let stem = name
            .strip_suffix(&format!(".{}", discovery.extension))
            .ok_or_else(|| {
                SubtransError::Config(format!(
                    "{} does not have the .{} extension",
                    name, discovery.extension
                ))
            })?;

        Ok(input.with_file_name(format!("{}{}", stem, discovery.output_suffix)))
    }

    /// Translate `input` into `output` batch by batch, appending each batch as it completes
    pub async fn translate_file(&self, input: &Path, output: &Path) -> Result<()> {
        let content = fs::read_to_string(input).await?;
        let blocks = parse_blocks(&content);

        let batch_size = self.config.translate.batch_size;
        let total_batches = blocks.len().div_ceil(batch_size);

        let mut out_file = fs::File::create(output).await?;
        for (idx, batch) in blocks.chunks(batch_size).enumerate() {
            info!("Translating {} batch {}/{}", input.display(), idx + 1, total_batches);

            let translated = self.translator.translate(&flatten_text(batch)).await?;
            let translated_blocks = refold(batch, translated)?;

            out_file.write_all(render_blocks(&translated_blocks).as_bytes()).await?;
        }
        out_file.flush().await?;

        Ok(())
    }

    /// Like [`Workflow::translate_file`], but never leaves a partial output behind
    async fn translate_file_or_cleanup(&self, input: &Path, output: &Path) -> Result<()> {
        let result = self.translate_file(input, output).await;

        if result.is_err() && output.exists() {
            if let Err(e) = fs::remove_file(output).await {
                warn!("Failed to remove partial output {}: {}", output.display(), e);
            }
        }

        result
    }
}

/// Path relative to `root` for logs and the report
fn display_path(path: &Path, root: &Path) -> String {
    pathdiff::diff_paths(path, root)
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::MockOracle;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;

    const INPUT: &str = "1\n00:00:01,000 --> 00:00:02,000\nHello\nWorld\n\n2\n00:00:03,000 --> 00:00:04,000\nGoodbye\n";
    const EXPECTED: &str = "1\n00:00:01,000 --> 00:00:02,000\nПривет\nМир\n\n2\n00:00:03,000 --> 00:00:04,000\nПрощай\n\n";
    const RESPONSE: &str = r#"[{"id":0,"text":"Привет"},{"id":1,"text":"Мир"},{"id":2,"text":"Прощай"}]"#;

    fn workflow(oracle: MockOracle) -> Workflow {
        Workflow::with_oracle(Config::default(), Box::new(oracle)).unwrap()
    }

    #[tokio::test]
    async fn test_end_to_end_translation() {
        let temp = TempDir::new().unwrap();
        temp.child("movie.srt").write_str(INPUT).unwrap();

        let mut oracle = MockOracle::new();
        oracle
            .expect_complete()
            .times(1)
            .returning(|_| Ok(RESPONSE.to_string()));

        let report = workflow(oracle).process_directory(temp.path()).await.unwrap();
        assert_eq!((report.found, report.translated, report.skipped), (1, 1, 0));
        assert!(report.is_success());

        let written = std::fs::read_to_string(temp.child("movie.ru.srt").path()).unwrap();
        assert_eq!(written, EXPECTED);
    }

    #[tokio::test]
    async fn test_existing_output_is_skipped_without_oracle_calls() {
        let temp = TempDir::new().unwrap();
        temp.child("movie.srt").write_str(INPUT).unwrap();
        temp.child("movie.ru.srt").write_str("already done").unwrap();

        let mut oracle = MockOracle::new();
        oracle.expect_complete().never();

        let report = workflow(oracle).process_directory(temp.path()).await.unwrap();
        assert_eq!((report.found, report.translated, report.skipped), (1, 0, 1));
        assert_eq!(
            std::fs::read_to_string(temp.child("movie.ru.srt").path()).unwrap(),
            "already done"
        );
    }

    #[tokio::test]
    async fn test_failed_file_is_removed_and_run_continues() {
        let temp = TempDir::new().unwrap();
        temp.child("a.srt").write_str(INPUT).unwrap();
        temp.child("b.srt").write_str("1\n00:00:01,000 --> 00:00:02,000\nBye\n").unwrap();

        let mut oracle = MockOracle::new();
        oracle
            .expect_complete()
            .withf(|prompt| prompt.contains("Hello"))
            .returning(|_| Err(SubtransError::Oracle("agent crashed".to_string())));
        oracle
            .expect_complete()
            .withf(|prompt| prompt.contains("Bye"))
            .times(1)
            .returning(|_| Ok(r#"[{"id":0,"text":"Пока"}]"#.to_string()));

        let report = workflow(oracle).process_directory(temp.path()).await.unwrap();
        assert_eq!((report.found, report.translated, report.skipped), (2, 1, 0));
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("a.srt: "));
        assert!(!temp.child("a.ru.srt").path().exists());
        assert!(temp.child("b.ru.srt").path().exists());
    }

    #[tokio::test]
    async fn test_batches_are_translated_separately() {
        let temp = TempDir::new().unwrap();
        temp.child("movie.srt").write_str(INPUT).unwrap();

        let mut oracle = MockOracle::new();
        oracle
            .expect_complete()
            .withf(|prompt| prompt.contains("Hello"))
            .times(1)
            .returning(|_| Ok(r#"[{"id":0,"text":"Привет"},{"id":1,"text":"Мир"}]"#.to_string()));
        oracle
            .expect_complete()
            .withf(|prompt| prompt.contains("Goodbye"))
            .times(1)
            .returning(|_| Ok(r#"[{"id":0,"text":"Прощай"}]"#.to_string()));

        let mut config = Config::default();
        config.translate.batch_size = 1;
        let workflow = Workflow::with_oracle(config, Box::new(oracle)).unwrap();

        let outcome = workflow
            .process_single_file(temp.child("movie.srt").path(), None, false)
            .await
            .unwrap();
        assert_eq!(outcome, FileOutcome::Translated);
        assert_eq!(
            std::fs::read_to_string(temp.child("movie.ru.srt").path()).unwrap(),
            EXPECTED
        );
    }

    #[test]
    fn test_discovery_skips_translated_files() {
        let temp = TempDir::new().unwrap();
        temp.child("b.srt").touch().unwrap();
        temp.child("a.ru.srt").touch().unwrap();
        temp.child("c_ru.srt").touch().unwrap();
        temp.child("notes.txt").touch().unwrap();
        temp.child("season1").create_dir_all().unwrap();
        temp.child("season1/e01.srt").touch().unwrap();
        temp.child("season1/e01.ru.srt").touch().unwrap();

        let files = workflow(MockOracle::new()).discover_files(temp.path()).unwrap();
        let names: Vec<String> = files.iter().map(|p| display_path(p, temp.path())).collect();
        assert_eq!(names, vec!["b.srt", "season1/e01.srt"]);
    }

    #[test]
    fn test_output_path_for() {
        let workflow = workflow(MockOracle::new());
        assert_eq!(
            workflow.output_path_for(Path::new("/media/show/e01.srt")).unwrap(),
            PathBuf::from("/media/show/e01.ru.srt")
        );
        assert!(workflow.output_path_for(Path::new("/media/show/e01.vtt")).is_err());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut config = Config::default();
        config.translate.batch_size = 0;
        assert!(Workflow::with_oracle(config, Box::new(MockOracle::new())).is_err());
    }

    #[tokio::test]
    async fn test_missing_input_file() {
        let err = workflow(MockOracle::new())
            .process_single_file("/nonexistent/movie.srt", None, false)
            .await
            .unwrap_err();
        assert!(matches!(err, SubtransError::FileNotFound(_)));
    }
}
