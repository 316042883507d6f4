//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::error::{JCsvError, Result};
use crate::record::Column;

/// 기본 입력 폴더
pub const DEFAULT_INPUT_DIR: &str = "./files/json/";

/// 기본 출력 파일
pub const DEFAULT_OUTPUT_FILE: &str = "./files/csv/output.csv";

/// 출력 파일 모드
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq)]
pub enum WriteMode {
    /// 기존 파일이 있으면 비우고 새로 쓰기
    #[default]
    Overwrite,
    /// 기존 파일에 추가
    Append,
    /// 기존 파일이 있으면 에러
    Error,
}

impl std::fmt::Display for WriteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteMode::Overwrite => write!(f, "Overwrite"),
            WriteMode::Append => write!(f, "Append"),
            WriteMode::Error => write!(f, "Error"),
        }
    }
}

/// jcsv CLI 인자 구조체
#[derive(Parser, Debug)]
#[command(
    name = "jcsv",
    author = "YourName <your@email.com>",
    version,
    about = "JSON FOLDER TO CSV CONVERTER - 폴더 내 JSON 레코드들을 하나의 CSV 파일로 평탄화하는 CLI 도구",
    long_about = r#"
JSON FOLDER TO CSV CONVERTER
============================

입력 폴더의 모든 .json 파일을 읽어 {"Items": [...]} 안의 레코드를
고정된 컬럼 순서의 CSV 행으로 펼친 뒤 하나의 CSV 파일에 기록합니다.

기본 컬럼 순서:
  id, first_name, last_name, email, timezone, street_name,
  city, country, country_code, pet, car

특징:
  • 레코드 평탄화는 워커 풀에서 병렬 처리
  • 모든 쓰기는 단일 라이터가 담당 (행 단위 flush)
  • 파싱/쓰기 오류는 기록 후 건너뛰기 (--strict 로 종료 코드 반영)

예제:
  jcsv
  jcsv -i ./files/json -o ./files/csv/output.csv
  jcsv -i ./data -o out.csv --mode append --header
  jcsv -i ./data --columns "id,email,country_code"
  jcsv -i ./data --validate-only
"#
)]
pub struct Args {
    /// JSON 파일들이 있는 입력 폴더 경로
    #[arg(short, long, default_value = DEFAULT_INPUT_DIR)]
    pub input: PathBuf,

    /// 생성될 CSV 파일 경로
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// 출력 파일 모드
    #[arg(short, long, value_enum, default_value_t = WriteMode::Overwrite)]
    pub mode: WriteMode,

    /// 파일 이름 패턴 필터 (glob 형식, 예: "users_*", "batch?.json")
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// 상세 출력 모드
    #[arg(short, long)]
    pub verbose: bool,

    /// 실제 변환 없이 처리될 파일 목록만 표시
    #[arg(long)]
    pub dry_run: bool,

    /// JSON 유효성 검사만 수행 (변환 없음)
    #[arg(long)]
    pub validate_only: bool,

    /// 출력할 컬럼 (쉼표로 구분, 예: "id,email,city")
    #[arg(long)]
    pub columns: Option<String>,

    /// 첫 줄에 컬럼 이름 헤더 기록
    #[arg(long)]
    pub header: bool,

    /// 병렬 처리 스레드 수 (기본값: CPU 코어 수)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// 최대 폴더 탐색 깊이 (1: 입력 폴더 바로 아래만)
    #[arg(long, default_value_t = 1)]
    pub max_depth: usize,

    /// 에러 로그 파일 경로
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// 실패한 파일이나 행이 있으면 종료 코드 1로 종료
    #[arg(long)]
    pub strict: bool,
}

impl Args {
    /// 컬럼 목록을 파싱하여 벡터로 반환
    ///
    /// 지정하지 않으면 기본 순서의 전체 컬럼을 반환합니다.
    pub fn get_columns(&self) -> Result<Vec<Column>> {
        let Some(spec) = self.columns.as_ref() else {
            return Ok(Column::ALL.to_vec());
        };

        let columns = spec
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<Column>())
            .collect::<Result<Vec<Column>>>()?;

        if columns.is_empty() {
            return Err(JCsvError::EmptyColumns);
        }

        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["jcsv"]);

        assert_eq!(args.input, PathBuf::from(DEFAULT_INPUT_DIR));
        assert_eq!(args.output, PathBuf::from(DEFAULT_OUTPUT_FILE));
        assert_eq!(args.mode, WriteMode::Overwrite);
        assert_eq!(args.max_depth, 1);
        assert!(!args.header);
        assert!(!args.strict);
    }

    #[test]
    fn test_get_columns_default() {
        let args = Args::parse_from(["jcsv"]);
        assert_eq!(args.get_columns().unwrap(), Column::ALL.to_vec());
    }

    #[test]
    fn test_get_columns_parsing() {
        let args = Args::parse_from(["jcsv", "--columns", "id, email ,country_code"]);
        assert_eq!(
            args.get_columns().unwrap(),
            vec![Column::Id, Column::Email, Column::CountryCode]
        );
    }

    #[test]
    fn test_get_columns_errors() {
        let unknown = Args::parse_from(["jcsv", "--columns", "id,zipcode"]);
        assert!(matches!(
            unknown.get_columns(),
            Err(JCsvError::InvalidColumn { ref name }) if name == "zipcode"
        ));

        let empty = Args::parse_from(["jcsv", "--columns", " , "]);
        assert!(matches!(empty.get_columns(), Err(JCsvError::EmptyColumns)));
    }

    #[test]
    fn test_mode_parsing() {
        let args = Args::parse_from(["jcsv", "-m", "append", "-j", "4", "--strict"]);
        assert_eq!(args.mode, WriteMode::Append);
        assert_eq!(args.threads, Some(4));
        assert!(args.strict);
    }
}
