//! 에러 타입 정의 모듈
//!
//! jcsv에서 발생할 수 있는 모든 에러 타입을 정의합니다.

use std::path::PathBuf;
use thiserror::Error;

/// jcsv에서 발생할 수 있는 에러 타입
#[derive(Error, Debug)]
pub enum JCsvError {
    /// 출력 파일이 이미 존재 (Error 모드에서)
    #[error("출력 파일이 이미 존재합니다: {path}")]
    OutputExists { path: PathBuf },

    /// 출력 파일 생성 실패
    #[error("출력 파일을 만들 수 없습니다 ({path}): {reason}")]
    OutputCreateError { path: PathBuf, reason: String },

    /// 출력 파일이 열려 있지 않음
    #[error("출력 파일이 열려 있지 않습니다 ({path}): {reason}")]
    OutputUnavailable { path: PathBuf, reason: String },

    /// JSON 파일 열기 실패
    #[error("파일을 열 수 없습니다 ({file}): {reason}")]
    FileOpenError { file: PathBuf, reason: String },

    /// JSON 파싱 실패
    #[error("JSON 파싱 실패 ({file}): {reason}")]
    ParseError { file: PathBuf, reason: String },

    /// CSV 행 쓰기 실패
    #[error("CSV 쓰기 실패: {reason}")]
    WriteError { reason: String },

    /// 스레드 풀 초기화 실패
    #[error("스레드 풀 초기화 실패: {reason}")]
    ThreadPoolError { reason: String },

    /// 유효하지 않은 패턴
    #[error("유효하지 않은 패턴: {pattern}")]
    InvalidPattern { pattern: String },

    /// 알 수 없는 컬럼 이름
    #[error("알 수 없는 컬럼: {name}")]
    InvalidColumn { name: String },

    /// 컬럼 목록이 비어 있음
    #[error("선택된 컬럼이 없습니다")]
    EmptyColumns,
}

impl From<csv::Error> for JCsvError {
    fn from(e: csv::Error) -> Self {
        JCsvError::WriteError {
            reason: e.to_string(),
        }
    }
}

/// jcsv 결과 타입 별칭
pub type Result<T> = std::result::Result<T, JCsvError>;
