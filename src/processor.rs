//! JSON 파일 처리 모듈
//!
//! 개별 JSON 파일의 읽기와 파싱, 파일 단위 처리 결과를 담당합니다.

use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::{JCsvError, Result};
use crate::record::{Column, Document};

/// 파일 처리 결과
#[derive(Debug, Clone, Default)]
pub struct FileReport {
    /// 처리된 파일 경로
    pub path: PathBuf,
    /// 원본 파일 크기
    pub file_size: u64,
    /// 파싱된 레코드 수
    pub records: usize,
    /// 출력 파일에 기록된 행 수
    pub rows_written: usize,
    /// 기록에 실패한 행 수
    pub rows_failed: usize,
    /// 파일 단위 에러 메시지 (읽기/파싱 실패 시)
    pub error: Option<String>,
}

impl FileReport {
    /// 파싱 성공 결과 생성 (아직 쓰기 전)
    pub fn parsed(path: PathBuf, records: usize, file_size: u64) -> Self {
        Self {
            path,
            file_size,
            records,
            ..Default::default()
        }
    }

    /// 실패 결과 생성
    pub fn failure(path: PathBuf, error: String, file_size: u64) -> Self {
        Self {
            path,
            file_size,
            error: Some(error),
            ..Default::default()
        }
    }

    /// 파일이 정상적으로 파싱되었는지 여부
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// JSON 처리 옵션
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// 출력 컬럼 (순서 포함)
    pub columns: Vec<Column>,
    /// 대용량 파일 임계값 (이상이면 메모리 매핑 사용)
    pub mmap_threshold: u64,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessOptions {
    /// 기본 옵션 생성
    pub fn new() -> Self {
        Self {
            columns: Column::ALL.to_vec(),
            mmap_threshold: 10 * 1024 * 1024, // 10MB
        }
    }

    /// 출력 컬럼 설정
    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// 메모리 매핑 임계값 설정
    pub fn with_mmap_threshold(mut self, threshold: u64) -> Self {
        self.mmap_threshold = threshold;
        self
    }
}

/// 단일 JSON 파일을 문서로 파싱
///
/// # Arguments
/// * `path` - 처리할 JSON 파일 경로
/// * `file_size` - 파일 크기 (읽기 방식 선택에 사용)
/// * `options` - 처리 옵션
pub fn read_document(path: &Path, file_size: u64, options: &ProcessOptions) -> Result<Document> {
    if file_size >= options.mmap_threshold {
        // 대용량 파일: 메모리 매핑 사용
        parse_with_mmap(path)
    } else {
        // 일반 파일: 버퍼 리더로 전부 읽기
        parse_with_reader(path)
    }
}

/// 파일 크기 조회 (실패하면 0)
pub fn file_size_of(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// 버퍼 리더로 읽은 뒤 JSON 파싱
fn parse_with_reader(path: &Path) -> Result<Document> {
    let file = File::open(path).map_err(|e| JCsvError::FileOpenError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut bytes = Vec::new();
    BufReader::new(file)
        .read_to_end(&mut bytes)
        .map_err(|e| JCsvError::FileOpenError {
            file: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    parse_bytes(path, &bytes)
}

/// 메모리 매핑을 사용한 JSON 파싱 (대용량 파일용)
fn parse_with_mmap(path: &Path) -> Result<Document> {
    let file = File::open(path).map_err(|e| JCsvError::FileOpenError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    // 처리 중 파일이 외부에서 잘리지 않는다고 가정
    let mmap = unsafe {
        Mmap::map(&file).map_err(|e| JCsvError::FileOpenError {
            file: path.to_path_buf(),
            reason: format!("메모리 매핑 실패: {}", e),
        })?
    };

    parse_bytes(path, &mmap)
}

/// 바이트 열을 문서로 파싱
///
/// 잘못된 UTF-8 바이트는 U+FFFD 로 바뀌며, 파일 전체를 버리지 않습니다.
fn parse_bytes(path: &Path, bytes: &[u8]) -> Result<Document> {
    let text = String::from_utf8_lossy(bytes);
    serde_json::from_str(&text).map_err(|e| JCsvError::ParseError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// JSON 파일 유효성 검사만 수행
///
/// # Returns
/// 레코드 수 또는 에러가 담긴 결과 (쓰기 관련 필드는 0)
pub fn validate_file(path: PathBuf, options: &ProcessOptions) -> FileReport {
    let file_size = file_size_of(&path);

    match read_document(&path, file_size, options) {
        Ok(document) => FileReport::parsed(path, document.items.len(), file_size),
        Err(e) => {
            tracing::warn!("{}", e);
            FileReport::failure(path, e.to_string(), file_size)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TWO_ITEMS: &str = r#"{"Items": [{"id": "1"}, {"id": "2", "pet": "dog"}]}"#;

    #[test]
    fn test_read_document_with_reader() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.json");
        fs::write(&path, TWO_ITEMS).unwrap();

        let doc = read_document(&path, file_size_of(&path), &ProcessOptions::new()).unwrap();
        assert_eq!(doc.items.len(), 2);
        assert_eq!(doc.items[1].pet, "dog");
    }

    #[test]
    fn test_read_document_with_mmap() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.json");
        fs::write(&path, TWO_ITEMS).unwrap();

        let options = ProcessOptions::new().with_mmap_threshold(0);
        let doc = read_document(&path, file_size_of(&path), &options).unwrap();
        assert_eq!(doc.items.len(), 2);
    }

    #[test]
    fn test_read_document_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gone.json");

        let result = read_document(&path, 0, &ProcessOptions::new());
        assert!(matches!(result, Err(JCsvError::FileOpenError { .. })));
    }

    #[test]
    fn test_read_document_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, r#"{"Items": [{"id": "1"}"#).unwrap();

        let result = read_document(&path, file_size_of(&path), &ProcessOptions::new());
        assert!(matches!(result, Err(JCsvError::ParseError { .. })));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("latin1.json");
        let mut content = br#"{"Items": [{"id": "1", "first_name": "Jos"#.to_vec();
        content.push(0xE9);
        content.extend_from_slice(br#""}]}"#);
        fs::write(&path, &content).unwrap();

        for threshold in [u64::MAX, 0] {
            let options = ProcessOptions::new().with_mmap_threshold(threshold);
            let doc = read_document(&path, file_size_of(&path), &options).unwrap();
            assert_eq!(doc.items[0].first_name, "Jos\u{FFFD}");
        }
    }

    #[test]
    fn test_validate_file() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("good.json");
        let bad = temp_dir.path().join("bad.json");
        fs::write(&good, TWO_ITEMS).unwrap();
        fs::write(&bad, "").unwrap();

        let options = ProcessOptions::new();
        let good_report = validate_file(good, &options);
        let bad_report = validate_file(bad, &options);

        assert!(good_report.is_valid());
        assert_eq!(good_report.records, 2);
        assert!(!bad_report.is_valid());
        assert_eq!(bad_report.records, 0);
    }

    #[test]
    fn test_process_options_builder() {
        let options = ProcessOptions::new()
            .with_columns(vec![Column::Id, Column::Email])
            .with_mmap_threshold(42);

        assert_eq!(options.columns, vec![Column::Id, Column::Email]);
        assert_eq!(options.mmap_threshold, 42);
        assert_eq!(ProcessOptions::default().columns.len(), 11);
    }
}
