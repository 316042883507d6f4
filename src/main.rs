//! jcsv - JSON FOLDER TO CSV CONVERTER
//!
//! 메인 엔트리포인트

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use jcsv::{
    cli::{Args, WriteMode},
    discovery::{discover_json_files, FileFilter},
    error::JCsvError,
    logger,
    pipeline::convert_files,
    processor::{file_size_of, validate_file, FileReport, ProcessOptions},
    record::Column,
    stats::Statistics,
    writer::RowWriter,
};

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    logger::init_logger(args.verbose);

    // 스레드 풀 설정
    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| JCsvError::ThreadPoolError {
                reason: e.to_string(),
            })
            .context("스레드 풀 초기화 실패")?;
    }

    // 컬럼 및 패턴 확인
    let columns = args.get_columns().context("컬럼 목록 확인 실패")?;
    let filter = FileFilter::new(args.pattern.clone())?;

    // 헤더 출력
    print_header(&args, &columns);

    // JSON 파일 수집 (폴더를 읽을 수 없으면 빈 목록)
    let json_files = discover_json_files(&args.input, &filter, args.max_depth);

    if json_files.is_empty() {
        println!("{}", "⚠️ 처리할 JSON 파일이 없습니다.".yellow());
    } else {
        println!(
            "  {} 발견된 파일 수: {}",
            "📋".bright_white(),
            json_files.len().to_string().bright_green()
        );
    }

    // 통계 초기화
    let stats = Statistics::new(json_files.len());

    // 드라이런 모드
    if args.dry_run {
        print_dry_run(&json_files);
        return Ok(ExitCode::SUCCESS);
    }

    // 유효성 검사 모드
    if args.validate_only {
        return run_validation_mode(&args, json_files, &stats);
    }

    // 일반 변환 모드
    run_conversion_mode(&args, columns, json_files, &stats)
}

/// 헤더 출력
fn print_header(args: &Args, columns: &[Column]) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!("{}", " 🚀 JSON FOLDER TO CSV CONVERTER".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());
    println!("  {} 입력 폴더: {:?}", "📂".bright_cyan(), args.input);

    if !args.validate_only {
        println!("  {} 출력 파일: {:?}", "📄".bright_green(), args.output);
        println!("  {} 모드: {}", "⚙️".bright_yellow(), args.mode);
        if args.columns.is_some() {
            let names: Vec<&str> = columns.iter().map(|c| c.name()).collect();
            println!("  {} 컬럼: {}", "🎯".bright_cyan(), names.join(","));
        }
        if args.header {
            println!("  {} {}", "🏷️".bright_white(), "헤더 행 기록".white());
        }
    }

    if let Some(ref pattern) = args.pattern {
        println!("  {} 패턴 필터: {}", "🔍".bright_magenta(), pattern);
    }

    if args.max_depth != 1 {
        println!("  {} 최대 깊이: {}", "📏".bright_white(), args.max_depth);
    }

    if args.dry_run {
        println!(
            "  {} {}",
            "⚠️".bright_yellow(),
            "드라이런 모드 (실제 변환 없음)".yellow()
        );
    }

    if args.validate_only {
        println!("  {} {}", "🔍".bright_cyan(), "유효성 검사 모드".cyan());
    }

    if args.strict {
        println!(
            "  {} {}",
            "🛑".bright_red(),
            "엄격 모드 (실패 시 종료 코드 1)".red()
        );
    }

    println!("{}", "═".repeat(50).bright_blue());
    println!("\n{}", "📁 파일 검색 중...".bright_cyan());
}

/// 드라이런 출력
fn print_dry_run(json_files: &[PathBuf]) {
    println!("\n{}", "📋 처리 예정 파일 목록:".bright_cyan());
    for (i, path) in json_files.iter().enumerate() {
        println!("  {}. {:?}", i + 1, path.file_name().unwrap_or_default());
    }
    println!(
        "\n{} 총 {} 개의 파일이 처리될 예정입니다.",
        "ℹ️".bright_blue(),
        json_files.len().to_string().bright_green()
    );
}

/// 유효성 검사 모드 실행
fn run_validation_mode(
    args: &Args,
    json_files: Vec<PathBuf>,
    stats: &Statistics,
) -> Result<ExitCode> {
    let pb = create_progress_bar(json_files.len());

    println!("\n{}", "🔍 유효성 검사 중...".bright_cyan());

    let options = ProcessOptions::new();
    let reports: Vec<FileReport> = json_files
        .into_par_iter()
        .map(|path| {
            let report = validate_file(path, &options);
            stats.record_validation(&report);
            pb.inc(1);

            if args.verbose && report.is_valid() {
                pb.println(format!(
                    "  {} {:?} ({} 레코드)",
                    "✓".green(),
                    report.path.file_name().unwrap_or_default(),
                    report.records
                ));
            }
            report
        })
        .collect();

    pb.finish_with_message("완료!");

    let errors = collect_errors(&reports);
    print_errors(&errors, args.verbose);

    // 로그 파일 작성
    if let Some(ref log_path) = args.log {
        write_error_log(log_path, &errors)?;
    }

    stats.print_validation_summary();

    if stats.get_validation_failed() == 0 {
        println!("\n{} 모든 파일이 유효합니다!\n", "✅".bright_green());
    } else {
        println!(
            "\n{} {} 개의 파일에 오류가 있습니다.\n",
            "⚠️".bright_yellow(),
            stats.get_validation_failed().to_string().red()
        );
    }

    Ok(exit_code(args.strict, stats.has_failures()))
}

/// 변환 모드 실행
fn run_conversion_mode(
    args: &Args,
    columns: Vec<Column>,
    json_files: Vec<PathBuf>,
    stats: &Statistics,
) -> Result<ExitCode> {
    // 출력 파일 모드 확인
    check_output_mode(args)?;

    let options = ProcessOptions::new().with_columns(columns);

    // 출력 파일은 실행 중 한 번만 연다
    let mut writer = RowWriter::create_or_disabled(&args.output, args.mode);
    let output_open = writer.is_open();
    if !output_open {
        println!(
            "{} 출력 파일을 열 수 없습니다. 모든 행 기록이 실패합니다: {:?}",
            "❌".bright_red(),
            args.output
        );
    }

    if args.header {
        if let Err(e) = writer.write_header(&options.columns) {
            tracing::warn!("헤더 기록 실패: {}", e);
        }
    }

    let pb = create_progress_bar(json_files.len());

    println!("\n{}", "⚡ 변환 중...".bright_cyan());

    let reports = convert_files(&json_files, &mut writer, &options, |report| {
        stats.record_file(report);
        pb.inc(1);

        if args.verbose && report.is_valid() {
            pb.println(format!(
                "  {} {:?} ({} 행)",
                "✓".green(),
                report.path.file_name().unwrap_or_default(),
                report.rows_written
            ));
        }
    });

    pb.finish_with_message("완료!");

    // 출력 파일 닫기
    drop(writer);
    if output_open {
        stats.set_bytes_written(file_size_of(&args.output));
    }

    let errors = collect_errors(&reports);
    print_errors(&errors, args.verbose);

    // 로그 파일 작성
    if let Some(ref log_path) = args.log {
        write_error_log(log_path, &errors)?;
    }

    stats.print_summary();

    if output_open {
        println!("\n{} 저장 완료: {:?}\n", "✅".bright_green(), args.output);
    }

    Ok(exit_code(args.strict, stats.has_failures() || !output_open))
}

/// 종료 코드 결정
///
/// 기본은 최선 노력(best effort)으로 항상 성공, `--strict` 이면 실패 시 1.
fn exit_code(strict: bool, failed: bool) -> ExitCode {
    if fails_run(strict, failed) {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn fails_run(strict: bool, failed: bool) -> bool {
    strict && failed
}

/// 출력 모드 확인
fn check_output_mode(args: &Args) -> Result<()> {
    if args.mode == WriteMode::Error && args.output.exists() {
        anyhow::bail!("출력 파일이 이미 존재합니다: {:?}", args.output);
    }
    Ok(())
}

/// 진행률 바 생성
fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▓▒░");
    pb.set_style(style);
    pb
}

/// 파일 및 행 단위 에러 목록 수집
fn collect_errors(reports: &[FileReport]) -> Vec<(PathBuf, String)> {
    reports
        .iter()
        .filter_map(|report| match (&report.error, report.rows_failed) {
            (Some(error), _) => Some((report.path.clone(), error.clone())),
            (None, 0) => None,
            (None, failed) => Some((
                report.path.clone(),
                format!("{} 개의 행을 기록하지 못했습니다", failed),
            )),
        })
        .collect()
}

/// 에러 목록 출력
fn print_errors(errors: &[(PathBuf, String)], verbose: bool) {
    if errors.is_empty() {
        return;
    }

    println!("\n{}", "❌ 오류 발생 파일:".bright_red());
    for (path, error) in errors {
        println!("  {} {:?}", "•".red(), path.file_name().unwrap_or_default());
        if verbose {
            println!("    {}", error.dimmed());
        }
    }
}

/// 에러 로그 파일 작성
fn write_error_log(log_path: &Path, errors: &[(PathBuf, String)]) -> Result<()> {
    let mut log_file = File::create(log_path)
        .with_context(|| format!("에러 로그 파일 생성 실패: {:?}", log_path))?;

    writeln!(log_file, "jcsv 에러 로그")?;
    writeln!(log_file, "생성 시간: {}", unix_now())?;
    writeln!(log_file, "총 에러 수: {}", errors.len())?;
    writeln!(log_file, "{}", "=".repeat(50))?;

    for (path, error) in errors {
        writeln!(log_file, "\n파일: {:?}", path)?;
        writeln!(log_file, "에러: {}", error)?;
    }

    println!("\n{} 에러 로그 저장: {:?}", "📝".bright_cyan(), log_path);

    Ok(())
}

/// 현재 시간 문자열 반환
fn unix_now() -> String {
    use std::time::SystemTime;
    let duration = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    format!("Unix timestamp: {}", duration.as_secs())
}
