//! File discovery, record reading and collision-free renaming

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::services::template::NameTemplate;
use crate::types::{FieldMapping, Result};

/// Characters stripped from rendered names
const ILLEGAL_CHARS: &[char] = &[
    '/', '\\', ';', ',', '>', '<', '&', '*', ':', '%', '=', '@', '!', '#', '^', '(', ')', '|', '?',
    '"',
];

/// Longest stem we produce, in bytes (most filesystems cap names at 255)
const MAX_STEM_BYTES: usize = 200;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Remove characters that are illegal or awkward in filenames
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c) && !c.is_control())
        .collect();
    let mut cleaned = cleaned.trim().to_string();

    if cleaned.len() > MAX_STEM_BYTES {
        let mut end = MAX_STEM_BYTES;
        while !cleaned.is_char_boundary(end) {
            end -= 1;
        }
        cleaned.truncate(end);
        cleaned = cleaned.trim_end().to_string();
    }

    if cleaned.is_empty() {
        cleaned = "unnamed".to_string();
    }
    cleaned
}

/// Files under `dir` with the given extension, sorted by path
pub fn scan(dir: &Path, extension: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let base = glob::Pattern::escape(&dir.to_string_lossy());
    let extension = glob::Pattern::escape(extension);
    let pattern = if recursive {
        format!("{}/**/*.{}", base, extension)
    } else {
        format!("{}/*.{}", base, extension)
    };

    let mut files: Vec<PathBuf> = glob::glob(&pattern)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                log::warn!("skipping unreadable path: {}", e);
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// Read a record as text.
///
/// Strips a UTF-8 BOM; other encodings are decoded lossily.
pub fn read_record(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(_) => {
            log::warn!(
                "{} is not valid UTF-8, undecodable bytes replaced",
                path.display()
            );
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// Turns field mappings into target paths and performs the renames
pub struct Renamer {
    template: NameTemplate,
    extension: String,
    claimed: HashSet<PathBuf>,
    vacated: HashSet<PathBuf>,
}

impl Renamer {
    pub fn new(template: NameTemplate, extension: &str) -> Self {
        Self {
            template,
            extension: extension.to_string(),
            claimed: HashSet::new(),
            vacated: HashSet::new(),
        }
    }

    /// Where `source` should go, or `None` if it already has that name.
    ///
    /// Occupied targets get a numeric suffix: `name.sgf`, `name1.sgf`, `name2.sgf`...
    /// Targets handed out earlier in this run count as occupied, and sources
    /// planned to move away count as free, whether or not the move happened.
    pub fn plan(&mut self, source: &Path, fields: &FieldMapping) -> Option<PathBuf> {
        let stem = sanitize_filename(&self.template.render(fields));
        let dir = source.parent().unwrap_or_else(|| Path::new(""));

        let mut counter = 0u32;
        loop {
            let name = if counter == 0 {
                format!("{}.{}", stem, self.extension)
            } else {
                format!("{}{}.{}", stem, counter, self.extension)
            };
            let candidate = dir.join(name);

            if candidate == source {
                return None;
            }
            let occupied = candidate.exists() && !self.vacated.contains(&candidate);
            if !occupied && !self.claimed.contains(&candidate) {
                self.claimed.insert(candidate.clone());
                self.vacated.insert(source.to_path_buf());
                return Some(candidate);
            }
            counter += 1;
        }
    }

    /// Plan and perform the rename; returns the new path if the file moved
    pub fn rename(&mut self, source: &Path, fields: &FieldMapping) -> Result<Option<PathBuf>> {
        let Some(target) = self.plan(source, fields) else {
            log::debug!("{} already named correctly", source.display());
            return Ok(None);
        };
        fs::rename(source, &target)?;
        Ok(Some(target))
    }
}
