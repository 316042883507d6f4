//! 행 파이프라인 모듈
//!
//! 파일 하나를 파싱한 뒤 레코드 평탄화는 rayon 워커 풀에 맡기고,
//! 결과 행은 파일마다 새로 만든 채널을 통해 단일 라이터 스레드로 모읍니다.
//! 파일들은 한 번에 하나씩 처리됩니다.

use crossbeam_channel::{bounded, Receiver};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::thread;

use crate::processor::{file_size_of, read_document, FileReport, ProcessOptions};
use crate::record::{Column, Record, Row};
use crate::writer::RowWriter;

/// 라이터 스레드의 쓰기 집계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteCounts {
    pub written: usize,
    pub failed: usize,
}

/// 행 채널 용량 (워커 수의 2배, 최소 16)
fn channel_capacity() -> usize {
    (rayon::current_num_threads() * 2).max(16)
}

/// 단일 파일 변환
///
/// 읽기/파싱 실패는 경고로 기록하고 실패 결과를 반환합니다.
pub fn process_file(path: &Path, writer: &mut RowWriter, options: &ProcessOptions) -> FileReport {
    let file_size = file_size_of(path);

    let document = match read_document(path, file_size, options) {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!("{}", e);
            return FileReport::failure(path.to_path_buf(), e.to_string(), file_size);
        }
    };

    let mut report = FileReport::parsed(path.to_path_buf(), document.items.len(), file_size);
    let counts = stream_rows(&document.items, &options.columns, writer);
    report.rows_written = counts.written;
    report.rows_failed = counts.failed;

    tracing::debug!(
        "{:?}: 레코드 {}개, 기록 {}행, 실패 {}행",
        path,
        report.records,
        report.rows_written,
        report.rows_failed
    );

    report
}

/// 파일 목록을 순서대로 변환
///
/// # Arguments
/// * `files` - 입력 파일 목록
/// * `writer` - 실행 전체에서 공유하는 출력 라이터
/// * `options` - 처리 옵션
/// * `on_file` - 파일 하나가 끝날 때마다 호출되는 콜백
pub fn convert_files<F>(
    files: &[PathBuf],
    writer: &mut RowWriter,
    options: &ProcessOptions,
    mut on_file: F,
) -> Vec<FileReport>
where
    F: FnMut(&FileReport),
{
    files
        .iter()
        .map(|path| {
            let report = process_file(path, writer, options);
            on_file(&report);
            report
        })
        .collect()
}

/// 레코드를 병렬로 평탄화하여 라이터로 흘려보냄
///
/// 모든 평탄화 작업이 끝나고, 라이터 스레드가 채널을 모두 비운 뒤에 반환합니다.
pub fn stream_rows(records: &[Record], columns: &[Column], writer: &mut RowWriter) -> WriteCounts {
    let (sender, receiver) = bounded::<Row>(channel_capacity());

    thread::scope(|scope| {
        let drain = scope.spawn(move || drain_rows(receiver, writer));

        // for_each_with 가 끝나면 모든 sender 복제본이 drop 되어 채널이 닫힘
        records.par_iter().for_each_with(sender, |sender, record| {
            if sender.send(record.flatten(columns)).is_err() {
                tracing::error!("행 채널이 닫혔습니다 (id: {})", record.id);
            }
        });

        drain.join().unwrap_or_else(|_| {
            tracing::error!("라이터 스레드가 비정상 종료되었습니다");
            WriteCounts {
                written: 0,
                failed: records.len(),
            }
        })
    })
}

/// 채널이 닫힐 때까지 행을 받아 기록
fn drain_rows(receiver: Receiver<Row>, writer: &mut RowWriter) -> WriteCounts {
    let mut counts = WriteCounts::default();

    for row in receiver {
        match writer.write_row(&row) {
            Ok(()) => counts.written += 1,
            Err(e) => {
                tracing::warn!("행 기록 실패: {}", e);
                counts.failed += 1;
            }
        }
    }

    counts
}
