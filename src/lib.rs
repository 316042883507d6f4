//! jcsv - JSON FOLDER TO CSV CONVERTER
//!
//! 폴더 내 JSON 문서들의 레코드를 평탄화하여 하나의 CSV 파일로 합치는 CLI 도구입니다.
//!
//! # 주요 기능
//!
//! - 🚀 **병렬 평탄화**: Rayon 워커 풀에서 레코드를 CSV 행으로 변환
//! - ✍️ **단일 라이터**: 모든 행은 채널을 거쳐 하나의 라이터가 기록 (행 단위 flush)
//! - 📊 **진행률 표시 및 통계**: 파일/레코드/행 단위 성공·실패 집계
//! - 🔍 **패턴 필터링**: glob 형식의 파일 이름 필터링
//! - 🎯 **컬럼 선택**: 출력 컬럼과 순서 지정
//! - 🧪 **드라이런 / 유효성 검사 모드**
//!
//! # 예제
//!
//! ```bash
//! # 기본 경로 (./files/json/ -> ./files/csv/output.csv)
//! jcsv
//!
//! # 경로 지정 + 헤더
//! jcsv -i ./data -o result.csv --header
//!
//! # 특정 컬럼만
//! jcsv -i ./data -o result.csv --columns "id,email"
//! ```

pub mod cli;
pub mod discovery;
pub mod error;
pub mod logger;
pub mod pipeline;
pub mod processor;
pub mod record;
pub mod stats;
pub mod writer;

// Re-exports for convenient access
pub use cli::{Args, WriteMode};
pub use discovery::{discover_json_files, FileFilter};
pub use error::{JCsvError, Result};
pub use pipeline::{convert_files, process_file, stream_rows, WriteCounts};
pub use processor::{read_document, validate_file, FileReport, ProcessOptions};
pub use record::{Column, Document, Record, Row};
pub use stats::{format_bytes, format_duration, Statistics};
pub use writer::RowWriter;
