//! CLI command handling

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;

use crate::services::config::normalize_extension;
use crate::services::renamer::{read_record, scan};
use crate::services::{extract_fields, NameTemplate, RenameConfig, Renamer};
use crate::types::FieldMapping;

/// Rename SGF game records from their embedded metadata
#[derive(Parser)]
#[command(name = "sgfrename")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory containing the records
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Search folders recursively
    #[arg(short, long)]
    recursive: bool,

    /// Renaming format. Variables: $date, $location, $result, $blackname,
    /// $whitename, $blackrank, $whiterank
    #[arg(short, long)]
    format: Option<String>,

    /// Record file extension
    #[arg(short, long)]
    extension: Option<String>,

    /// Print the planned renames without touching any file
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Print extracted fields as JSON instead of renaming
    #[arg(long)]
    json: bool,

    /// Config file (default: ~/.sgfrename/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

/// Resolved options after merging the config file and flags
struct Settings {
    dir: PathBuf,
    template: NameTemplate,
    extension: String,
    recursive: bool,
    dry_run: bool,
    json: bool,
}

#[derive(Serialize)]
struct RecordReport<'a> {
    path: &'a Path,
    fields: &'a FieldMapping,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        self.init_logging();

        let config = RenameConfig::load(self.config.as_deref())?;
        let settings = self.settings(config)?;

        let stdout = std::io::stdout();
        execute(&settings, &mut stdout.lock())
    }

    fn init_logging(&self) {
        let mut builder =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
        if self.quiet {
            builder.filter_level(log::LevelFilter::Error);
        } else if self.verbose {
            builder.filter_level(log::LevelFilter::Debug);
        }
        let _ = builder.target(env_logger::Target::Stderr).try_init();
    }

    fn settings(self, config: RenameConfig) -> anyhow::Result<Settings> {
        let format = self.format.unwrap_or(config.format);
        let extension = self
            .extension
            .map(|e| normalize_extension(&e))
            .unwrap_or(config.extension);
        if extension.is_empty() {
            anyhow::bail!("record extension must not be empty");
        }

        Ok(Settings {
            dir: self.dir,
            template: NameTemplate::parse(&format)?,
            extension,
            recursive: self.recursive || config.recursive,
            dry_run: self.dry_run,
            json: self.json,
        })
    }
}

/// Scan, extract and then either report or rename
fn execute(settings: &Settings, out: &mut impl Write) -> anyhow::Result<()> {
    let files = scan(&settings.dir, &settings.extension, settings.recursive)?;
    if files.is_empty() {
        log::warn!(
            "no .{} files found in {}",
            settings.extension,
            settings.dir.display()
        );
        return Ok(());
    }
    log::debug!("found {} records", files.len());

    // Extraction is independent per file; renames below stay sequential so
    // collision suffixes follow path order.
    let records: Vec<(PathBuf, FieldMapping)> = files
        .par_iter()
        .filter_map(|path| match read_record(path) {
            Ok(text) => Some((path.clone(), extract_fields(&text))),
            Err(e) => {
                log::warn!("could not read {}: {}", path.display(), e);
                None
            }
        })
        .collect();

    if settings.json {
        let reports: Vec<_> = records
            .iter()
            .map(|(path, fields)| RecordReport { path, fields })
            .collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&reports)?)?;
        return Ok(());
    }

    let mut renamer = Renamer::new(settings.template.clone(), &settings.extension);
    for (path, fields) in &records {
        if settings.dry_run {
            if let Some(target) = renamer.plan(path, fields) {
                writeln!(out, "{} -> {}", path.display(), target.display())?;
            }
            continue;
        }

        match renamer.rename(path, fields) {
            Ok(Some(target)) => writeln!(out, "{} -> {}", path.display(), target.display())?,
            Ok(None) => {}
            Err(e) => log::warn!("could not rename {}: {}", path.display(), e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::template::DEFAULT_FORMAT;
    use std::fs;
    use tempfile::TempDir;

    const OGS_RECORD: &str =
        "(;PB[Alice]PW[Bob]BR[5k]WR[3d]RE[B+Resign]DT[2021-01-02]PC[OGS: test])";

    fn settings_for(dir: &Path, args: &[&str]) -> Settings {
        let mut argv = vec!["sgfrename", dir.to_str().unwrap()];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv)
            .unwrap()
            .settings(RenameConfig::default())
            .unwrap()
    }

    fn run_in(dir: &Path, args: &[&str]) -> String {
        let mut out = Vec::new();
        execute(&settings_for(dir, args), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["sgfrename"]).unwrap();
        assert_eq!(cli.dir, PathBuf::from("."));
        assert!(!cli.recursive);
        assert!(cli.format.is_none());
        assert!(!cli.dry_run);
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_parse_recursive_and_format() {
        let cli = Cli::try_parse_from(["sgfrename", "-r", "-f", "$date"]).unwrap();
        assert!(cli.recursive);
        assert_eq!(cli.format.as_deref(), Some("$date"));
    }

    #[test]
    fn test_cli_parse_long_flags() {
        let cli = Cli::try_parse_from([
            "sgfrename",
            "games",
            "--recursive",
            "--format",
            "$result",
            "--extension",
            ".SGF",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.dir, PathBuf::from("games"));
        assert!(cli.dry_run);
        assert_eq!(cli.extension.as_deref(), Some(".SGF"));
    }

    #[test]
    fn test_cli_parse_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["sgfrename", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_settings_flags_override_config() {
        let config = RenameConfig {
            format: "$date".to_string(),
            extension: "txt".to_string(),
            recursive: true,
        };
        let cli = Cli::try_parse_from(["sgfrename", "-f", "$result", "-e", ".sgf"]).unwrap();
        let settings = cli.settings(config).unwrap();
        assert_eq!(settings.template, NameTemplate::parse("$result").unwrap());
        assert_eq!(settings.extension, "sgf");
        assert!(settings.recursive);
    }

    #[test]
    fn test_settings_fall_back_to_config() {
        let cli = Cli::try_parse_from(["sgfrename"]).unwrap();
        let settings = cli.settings(RenameConfig::default()).unwrap();
        assert_eq!(settings.template, NameTemplate::parse(DEFAULT_FORMAT).unwrap());
        assert_eq!(settings.extension, "sgf");
    }

    #[test]
    fn test_settings_reject_bad_template() {
        let cli = Cli::try_parse_from(["sgfrename", "-f", "$nope"]).unwrap();
        assert!(cli.settings(RenameConfig::default()).is_err());
    }

    #[test]
    fn test_settings_reject_empty_extension() {
        for ext in ["", ".", " "] {
            let cli = Cli::try_parse_from(["sgfrename", "-e", ext]).unwrap();
            assert!(cli.settings(RenameConfig::default()).is_err(), "ext {:?}", ext);
        }
    }

    #[test]
    fn test_settings_reject_empty_extension_from_config() {
        let config = RenameConfig {
            extension: String::new(),
            ..RenameConfig::default()
        };
        let cli = Cli::try_parse_from(["sgfrename"]).unwrap();
        assert!(cli.settings(config).is_err());
    }

    #[test]
    fn test_execute_renames() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("game.sgf"), OGS_RECORD).unwrap();

        let output = run_in(tmp.path(), &[]);

        let expected = tmp
            .path()
            .join("2021-01-02 - OGS - Alice [5k] - Bob [3d] - B+Resign.sgf");
        assert!(expected.exists());
        assert!(!tmp.path().join("game.sgf").exists());
        assert!(output.contains("game.sgf -> "));
    }

    #[test]
    fn test_execute_dry_run_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.sgf"), OGS_RECORD).unwrap();
        fs::write(tmp.path().join("b.sgf"), OGS_RECORD).unwrap();

        let output = run_in(tmp.path(), &["-n", "-f", "$blackname"]);

        assert!(tmp.path().join("a.sgf").exists());
        assert!(tmp.path().join("b.sgf").exists());
        assert!(!tmp.path().join("Alice.sgf").exists());
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Alice.sgf"));
        assert!(lines[1].ends_with("Alice1.sgf"));
    }

    #[test]
    fn test_execute_collisions_follow_path_order() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.sgf"), OGS_RECORD).unwrap();
        fs::write(tmp.path().join("b.sgf"), OGS_RECORD).unwrap();

        run_in(tmp.path(), &["-f", "$whitename"]);

        assert!(tmp.path().join("Bob.sgf").exists());
        assert!(tmp.path().join("Bob1.sgf").exists());
        assert!(!tmp.path().join("a.sgf").exists());
        assert!(!tmp.path().join("b.sgf").exists());
    }

    #[test]
    fn test_execute_json_report() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("game.sgf"), OGS_RECORD).unwrap();

        let output = run_in(tmp.path(), &["--json"]);

        assert!(tmp.path().join("game.sgf").exists());
        let reports: serde_json::Value = serde_json::from_str(&output).unwrap();
        let fields = &reports[0]["fields"];
        assert_eq!(fields["location"], "OGS");
        assert_eq!(fields["result"], "B+Resign");
        assert_eq!(fields["date"], "2021-01-02");
    }

    #[test]
    fn test_execute_empty_dir() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(run_in(tmp.path(), &[]), "");
    }

    #[test]
    fn test_execute_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("game.sgf"), OGS_RECORD).unwrap();

        run_in(tmp.path(), &["-f", "$blackname"]);
        let second = run_in(tmp.path(), &["-f", "$blackname"]);

        assert_eq!(second, "");
        assert!(tmp.path().join("Alice.sgf").exists());
    }
}
