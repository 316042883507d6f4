//! CSV 출력 모듈
//!
//! 실행 전체에서 단 하나의 출력 파일 핸들을 소유하고, 행 단위로
//! CSV 인코딩 후 flush 합니다.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::cli::WriteMode;
use crate::error::{JCsvError, Result};
use crate::record::{Column, Row};

/// 단일 CSV 라이터
///
/// 출력 파일을 열지 못한 경우에도 값은 만들어지며, 이때 모든 쓰기는
/// 실패로 보고됩니다.
pub struct RowWriter {
    path: PathBuf,
    inner: Option<csv::Writer<File>>,
    open_error: Option<String>,
    /// 열 때 이미 있던 내용의 길이 (추가 모드에서만 0보다 클 수 있음)
    existing_len: u64,
}

impl RowWriter {
    /// 출력 파일 열기
    ///
    /// 상위 폴더가 없으면 만든 뒤 `mode` 에 따라 파일을 엽니다.
    pub fn create(path: &Path, mode: WriteMode) -> Result<Self> {
        let create_error = |e: std::io::Error| JCsvError::OutputCreateError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(create_error)?;
        }

        let file = match mode {
            WriteMode::Overwrite => File::create(path).map_err(create_error)?,
            WriteMode::Append => OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(create_error)?,
            WriteMode::Error => OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path)
                .map_err(|e| match e.kind() {
                    std::io::ErrorKind::AlreadyExists => JCsvError::OutputExists {
                        path: path.to_path_buf(),
                    },
                    _ => create_error(e),
                })?,
        };

        let existing_len = file.metadata().map(|m| m.len()).unwrap_or(0);
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        Ok(Self {
            path: path.to_path_buf(),
            inner: Some(writer),
            open_error: None,
            existing_len,
        })
    }

    /// 출력 파일을 열고, 실패하면 에러를 기록한 뒤 비활성 라이터를 반환
    pub fn create_or_disabled(path: &Path, mode: WriteMode) -> Self {
        match Self::create(path, mode) {
            Ok(writer) => writer,
            Err(e) => {
                tracing::error!("{}", e);
                Self {
                    path: path.to_path_buf(),
                    inner: None,
                    open_error: Some(e.to_string()),
                    existing_len: 0,
                }
            }
        }
    }

    /// 출력 파일 경로
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 출력 파일이 열려 있는지 여부
    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    /// 열 때 파일에 이미 내용이 있었는지 여부
    pub fn has_existing_content(&self) -> bool {
        self.existing_len > 0
    }

    /// 컬럼 이름 헤더 기록
    ///
    /// 추가 모드로 연 파일에 이미 내용이 있으면 헤더를 다시 쓰지 않습니다.
    pub fn write_header(&mut self, columns: &[Column]) -> Result<()> {
        if self.has_existing_content() {
            tracing::debug!("{:?} 에 기존 내용이 있어 헤더를 건너뜁니다", self.path);
            return Ok(());
        }
        let writer = self.writer()?;
        writer.write_record(columns.iter().map(|c| c.name()))?;
        writer.flush().map_err(|e| JCsvError::WriteError {
            reason: e.to_string(),
        })
    }

    /// 행 하나를 CSV 한 줄로 기록하고 flush
    pub fn write_row(&mut self, row: &Row) -> Result<()> {
        let writer = self.writer()?;
        writer.write_record(&row.fields)?;
        writer.flush().map_err(|e| JCsvError::WriteError {
            reason: e.to_string(),
        })
    }

    fn writer(&mut self) -> Result<&mut csv::Writer<File>> {
        match self.inner.as_mut() {
            Some(writer) => Ok(writer),
            None => Err(JCsvError::OutputUnavailable {
                path: self.path.clone(),
                reason: self.open_error.clone().unwrap_or_default(),
            }),
        }
    }
}
