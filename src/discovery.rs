//! 입력 파일 탐색 모듈
//!
//! 입력 폴더에서 `.json` 파일을 찾고, glob 패턴으로 파일 이름을 필터링합니다.

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{JCsvError, Result};

/// 입력으로 인정하는 파일 이름 접미사 (마지막 `.` 부터)
pub const JSON_EXTENSION: &str = ".json";

/// 입력 파일 필터 (확장자 + 선택적 glob 패턴)
#[derive(Default)]
pub struct FileFilter {
    pattern: Option<Pattern>,
}

impl FileFilter {
    /// 새 파일 필터 생성
    ///
    /// # Arguments
    /// * `pattern` - 파일 이름 글로브 패턴 (None이면 확장자만 검사)
    ///
    /// # Examples
    /// ```
    /// use jcsv::discovery::FileFilter;
    ///
    /// let filter = FileFilter::new(Some("users_*".to_string())).unwrap();
    /// assert!(filter.matches("users_01.json"));
    /// assert!(!filter.matches("users_01.JSON"));
    /// assert!(!filter.matches("orders_01.json"));
    /// ```
    pub fn new(pattern: Option<String>) -> Result<Self> {
        let compiled = match pattern {
            Some(ref p) => Some(
                Pattern::new(p)
                    .map_err(|_| JCsvError::InvalidPattern { pattern: p.clone() })?,
            ),
            None => None,
        };

        Ok(Self { pattern: compiled })
    }

    /// 파일 이름이 입력 조건을 만족하는지 확인
    ///
    /// 마지막 `.` 부터의 확장자가 대소문자를 구분하여 정확히 `.json` 이어야 합니다.
    /// 이름이 `.json` 뿐인 파일도 포함됩니다.
    pub fn matches(&self, file_name: &str) -> bool {
        file_name.ends_with(JSON_EXTENSION)
            && match &self.pattern {
                Some(p) => p.matches(file_name),
                None => true,
            }
    }

    /// 패턴이 설정되어 있는지 확인
    pub fn has_pattern(&self) -> bool {
        self.pattern.is_some()
    }
}

/// 입력 폴더에서 JSON 파일 목록 수집
///
/// 폴더를 읽을 수 없거나 존재하지 않으면 빈 목록을 반환합니다.
/// 결과는 파일 이름 순으로 정렬됩니다.
///
/// # Arguments
/// * `dir` - 입력 폴더
/// * `filter` - 파일 이름 필터
/// * `max_depth` - 탐색 깊이 (1이면 폴더 바로 아래 파일만)
pub fn discover_json_files(dir: &Path, filter: &FileFilter, max_depth: usize) -> Vec<PathBuf> {
    let files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(max_depth.max(1))
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::debug!("폴더 항목을 건너뜁니다: {}", err);
                None
            }
        })
        .filter(|e| e.path().is_file())
        .filter(|e| {
            e.file_name()
                .to_str()
                .map(|s| filter.matches(s))
                .unwrap_or(false)
        })
        .map(|e| e.into_path())
        .collect();

    tracing::debug!("{:?} 에서 JSON 파일 {}개 발견", dir, files.len());
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), r#"{"Items": []}"#).unwrap();
    }

    #[test]
    fn test_filter_extension_is_exact() {
        let filter = FileFilter::new(None).unwrap();
        assert!(filter.matches("people.json"));
        assert!(!filter.matches("people.JSON"));
        assert!(!filter.matches("people.jsonl"));
        assert!(!filter.matches("people.json.bak"));
        assert!(!filter.matches("people"));
        assert!(filter.matches(".json"));
        assert!(filter.matches("archive.tar.json"));
    }

    #[test]
    fn test_filter_with_pattern() {
        let filter = FileFilter::new(Some("batch?_*".to_string())).unwrap();
        assert!(filter.matches("batch1_users.json"));
        assert!(!filter.matches("batch12_users.json"));
        assert!(!filter.matches("batch1_users.txt"));
    }

    #[test]
    fn test_filter_invalid_pattern() {
        let result = FileFilter::new(Some("[invalid".to_string()));
        assert!(matches!(result, Err(JCsvError::InvalidPattern { .. })));
    }

    #[test]
    fn test_has_pattern() {
        assert!(FileFilter::new(Some("*.json".to_string())).unwrap().has_pattern());
        assert!(!FileFilter::new(None).unwrap().has_pattern());
    }

    #[test]
    fn test_discover_skips_non_json_and_dirs() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "b.json");
        touch(temp_dir.path(), "a.json");
        touch(temp_dir.path(), "notes.txt");
        touch(temp_dir.path(), ".json");
        fs::create_dir(temp_dir.path().join("nested.json")).unwrap();
        touch(&temp_dir.path().join("nested.json"), "inner.json");

        let files = discover_json_files(temp_dir.path(), &FileFilter::default(), 1);
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, vec![".json", "a.json", "b.json"]);
    }

    #[test]
    fn test_discover_with_depth() {
        let temp_dir = TempDir::new().unwrap();
        let sub_dir = temp_dir.path().join("sub");
        fs::create_dir(&sub_dir).unwrap();
        touch(temp_dir.path(), "root.json");
        touch(&sub_dir, "child.json");

        assert_eq!(
            discover_json_files(temp_dir.path(), &FileFilter::default(), 1).len(),
            1
        );
        assert_eq!(
            discover_json_files(temp_dir.path(), &FileFilter::default(), 2).len(),
            2
        );
    }

    #[test]
    fn test_discover_missing_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");

        assert!(discover_json_files(&missing, &FileFilter::default(), 1).is_empty());
    }
}
