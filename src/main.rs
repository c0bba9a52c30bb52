//! econvert - ENCODING CONVERTER
//!
//! 메인 엔트리포인트

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use econvert::{
    cli::Args,
    converter::{ConversionJob, Converter},
    pattern::PatternMatcher,
    report::ConsoleReporter,
};

/// 실패 시 종료 코드
const EXIT_FAILURE: i32 = -1;

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help, --version 은 정상 종료
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                e.exit();
            }
            let _ = e.print();
            std::process::exit(EXIT_FAILURE);
        }
    };

    if let Err(e) = run(&args) {
        eprintln!("\n{} {:#}", "❌".bright_red(), e);
        std::process::exit(EXIT_FAILURE);
    }
}

fn run(args: &Args) -> Result<()> {
    // 파일 시스템을 건드리기 전에 모든 인자를 검증
    let output = args.resolve_output().context("출력 폴더 확인 실패")?;
    let target = args.target_encoding()?;
    let exclude = PatternMatcher::new(args.exclude.clone())?;

    let job = ConversionJob::new(&output, target, args.extensions())?
        .with_exclude(exclude)
        .with_dry_run(args.dry_run);

    print_header(args, &job);

    let mut reporter = ConsoleReporter::new();
    Converter::new(&job)
        .convert(&args.input, &mut reporter)
        .with_context(|| format!("변환 중단: {:?}", args.input))?;

    // 로그 파일 작성
    if let Some(ref log_path) = args.log {
        write_audit_log(log_path, reporter.audit())?;
    }

    // 통계 출력
    reporter.stats().print_summary();

    if args.dry_run {
        println!(
            "\n{} 드라이런 완료 (변경된 파일 없음)\n",
            "ℹ️".bright_blue()
        );
    } else {
        println!(
            "\n{} 저장 완료: {:?}\n",
            "✅".bright_green(),
            job.destination_root()
        );
    }

    Ok(())
}

/// 헤더 출력
fn print_header(args: &Args, job: &ConversionJob) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!("{}", " 🔁 ENCODING CONVERTER".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());
    println!("  {} 입력:        {:?}", "📂".bright_cyan(), args.input);
    println!(
        "  {} 출력:        {:?}",
        "📄".bright_green(),
        job.destination_root()
    );
    println!(
        "  {} 확장자:      {}",
        "🎯".bright_cyan(),
        job.extensions().collect::<Vec<_>>().join(", ")
    );
    println!("  {} 인코딩:      {}", "⚙️".bright_yellow(), job.target());

    if job.exclude().has_pattern() {
        if let Some(ref exclude) = args.exclude {
            println!("  {} 제외 패턴:   {}", "🔍".bright_magenta(), exclude);
        }
    }

    if args.dry_run {
        println!(
            "  {} {}",
            "⚠️".bright_yellow(),
            "드라이런 모드 (실제 쓰기 없음)".yellow()
        );
    }

    println!("{}", "═".repeat(50).bright_blue());
    println!();
}

/// 감사 로그 파일 작성
fn write_audit_log(log_path: &Path, entries: &[(PathBuf, String)]) -> Result<()> {
    let mut log_file = File::create(log_path)
        .with_context(|| format!("로그 파일 생성 실패: {:?}", log_path))?;

    writeln!(log_file, "econvert 감사 로그")?;
    writeln!(log_file, "생성 시간: {}", chrono_now())?;
    writeln!(log_file, "총 항목 수: {}", entries.len())?;
    writeln!(log_file, "{}", "=".repeat(50))?;

    for (path, reason) in entries {
        writeln!(log_file, "\n파일: {:?}", path)?;
        writeln!(log_file, "내용: {}", reason)?;
    }

    println!("\n{} 감사 로그 저장: {:?}", "📝".bright_cyan(), log_path);

    Ok(())
}

/// 현재 시간 문자열 반환
fn chrono_now() -> String {
    use std::time::SystemTime;
    let now = SystemTime::now();
    let duration = now
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    format!("Unix timestamp: {}", duration.as_secs())
}
