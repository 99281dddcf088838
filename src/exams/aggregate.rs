//! Directory-tree aggregation of exam files.
//!
//! Walks a root directory, groups every `.json`/`.jsonc` file under its
//! immediate parent directory ("subject") and parses each file's content.
//! The whole pass is synchronous and builds its state from scratch on every
//! call; callers that run inside a runtime wrap it in `spawn_blocking`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use walkdir::WalkDir;

use super::parser::{self, Format, ParseError};
use crate::logger;

/// One parsed exam file: base name (extension included) plus its content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamEntry {
    pub name: String,
    pub content: Value,
}

/// All exams found under one parent directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    pub exams: Vec<ExamEntry>,
}

/// Aggregation failure. Any variant aborts the whole walk; there is no
/// partial result.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("failed to walk exam directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("failed to read file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse { path: PathBuf, source: ParseError },
}

/// Walk `root` and group every exam file under its immediate parent
/// directory.
///
/// Subjects come back in first-seen order; entries within a subject keep
/// traversal order. Directory entries are visited in sorted filename order
/// so the result is deterministic across runs.
///
/// Empty files are logged and skipped. Files with other extensions are
/// skipped silently. A missing or unreadable root fails immediately; a root
/// with no matching files yields an empty list.
pub fn aggregate(root: &Path) -> Result<Vec<Subject>, AggregateError> {
    let mut subjects: Vec<Subject> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        let Some(format) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Format::from_extension)
        else {
            continue;
        };

        // Group by the direct parent only, not the full path.
        let subject_name = path
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let content = std::fs::read(path).map_err(|source| AggregateError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if content.is_empty() {
            logger::log_warning(&format!("Skipping empty file {}", path.display()));
            continue;
        }

        let parsed = parser::parse(&content, format).map_err(|source| AggregateError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let exam = ExamEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            content: parsed,
        };

        match index.get(&subject_name) {
            Some(&i) => subjects[i].exams.push(exam),
            None => {
                index.insert(subject_name.clone(), subjects.len());
                subjects.push(Subject {
                    name: subject_name,
                    exams: vec![exam],
                });
            }
        }
    }

    Ok(subjects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn create_exam_tree() -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp dir");

        fs::create_dir(dir.path().join("math")).unwrap();
        fs::write(dir.path().join("math/a.json"), r#"{"q":1}"#).unwrap();
        fs::write(dir.path().join("math/b.jsonc"), "{\"q\":2 /* comment */}").unwrap();

        fs::create_dir(dir.path().join("physics")).unwrap();
        fs::write(dir.path().join("physics/final.json"), r#"[1, 2, 3]"#).unwrap();

        dir
    }

    #[test]
    fn test_groups_by_parent_directory() {
        let dir = create_exam_tree();
        let subjects = aggregate(dir.path()).unwrap();

        assert_eq!(subjects.len(), 2);
        let math = subjects.iter().find(|s| s.name == "math").unwrap();
        assert_eq!(math.exams.len(), 2);
        let physics = subjects.iter().find(|s| s.name == "physics").unwrap();
        assert_eq!(physics.exams.len(), 1);
        assert_eq!(physics.exams[0].name, "final.json");
        assert_eq!(physics.exams[0].content, json!([1, 2, 3]));
    }

    #[test]
    fn test_mixed_formats_in_one_subject() {
        let dir = create_exam_tree();
        let subjects = aggregate(dir.path()).unwrap();

        let math = subjects.iter().find(|s| s.name == "math").unwrap();
        // Sorted traversal: a.json before b.jsonc
        assert_eq!(math.exams[0].name, "a.json");
        assert_eq!(math.exams[0].content, json!({"q": 1}));
        assert_eq!(math.exams[1].name, "b.jsonc");
        assert_eq!(math.exams[1].content, json!({"q": 2}));
    }

    #[test]
    fn test_nested_files_group_under_direct_parent() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("history/2024")).unwrap();
        fs::write(dir.path().join("history/2024/midterm.json"), "{}").unwrap();
        fs::write(dir.path().join("history/old.json"), "{}").unwrap();

        let subjects = aggregate(dir.path()).unwrap();

        let names: Vec<&str> = subjects.iter().map(|s| s.name.as_str()).collect();
        assert!(names.contains(&"history"));
        assert!(names.contains(&"2024"));
        let nested = subjects.iter().find(|s| s.name == "2024").unwrap();
        assert_eq!(nested.exams[0].name, "midterm.json");
    }

    #[test]
    fn test_empty_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();
        fs::write(dir.path().join("empty/e.json"), "").unwrap();

        let subjects = aggregate(dir.path()).unwrap();
        // No entry is created for the empty file, so no subject appears
        assert!(subjects.is_empty());
    }

    #[test]
    fn test_unrecognized_extensions_are_skipped() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("math")).unwrap();
        fs::write(dir.path().join("math/notes.txt"), "plain text").unwrap();
        fs::write(dir.path().join("math/exam.JSON"), "{}").unwrap();
        fs::write(dir.path().join("math/a.json"), "{}").unwrap();

        let subjects = aggregate(dir.path()).unwrap();
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].exams.len(), 1);
        assert_eq!(subjects[0].exams[0].name, "a.json");
    }

    #[test]
    fn test_malformed_file_fails_whole_aggregation() {
        let dir = create_exam_tree();
        fs::create_dir(dir.path().join("zoology")).unwrap();
        fs::write(dir.path().join("zoology/bad.json"), "{not json").unwrap();

        let err = aggregate(dir.path()).unwrap_err();
        assert!(matches!(err, AggregateError::Parse { .. }));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn test_nonexistent_root_is_an_error() {
        let result = aggregate(Path::new("/nonexistent/exam/root"));
        assert!(matches!(result, Err(AggregateError::Walk(_))));
    }

    #[test]
    fn test_root_with_no_matching_files_is_empty() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("misc")).unwrap();
        fs::write(dir.path().join("misc/readme.md"), "# hi").unwrap();

        assert_eq!(aggregate(dir.path()).unwrap(), vec![]);
    }

    #[test]
    fn test_serialization_shape_and_round_trip() {
        let dir = create_exam_tree();
        let subjects = aggregate(dir.path()).unwrap();

        let wire = serde_json::to_string(&subjects).unwrap();
        let reparsed: Vec<Subject> = serde_json::from_str(&wire).unwrap();
        assert_eq!(reparsed, subjects);

        // Wire shape: [{"name": ..., "exams": [{"name": ..., "content": ...}]}]
        let generic: Value = serde_json::from_str(&wire).unwrap();
        let first = &generic.as_array().unwrap()[0];
        assert!(first.get("name").is_some());
        assert!(first["exams"][0].get("content").is_some());
    }
}
