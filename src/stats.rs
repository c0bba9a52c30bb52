//! 통계 및 유틸리티 모듈
//!
//! 변환 통계 수집 및 포맷팅을 담당합니다.

use colored::Colorize;
use std::time::{Duration, Instant};

/// 변환 통계 구조체
#[derive(Debug, Default)]
pub struct Statistics {
    /// 생성한 폴더 수
    pub dirs_created: usize,
    /// 인코딩 변환한 파일 수
    pub converted: usize,
    /// 그대로 복사한 파일 수 (대상 확장자가 아닌 파일)
    pub copied: usize,
    /// 감지 실패로 그대로 복사한 파일 수
    pub detection_failed: usize,
    /// 변환 중 표현할 수 없는 문자가 있었던 파일 수
    pub lossy: usize,
    /// 무시한 항목 수
    pub ignored: usize,
    /// 읽은 총 바이트
    pub total_bytes_read: u64,
    /// 쓴 총 바이트
    pub total_bytes_written: u64,
    /// 처리 시작 시간
    start_time: Option<Instant>,
}

impl Statistics {
    /// 새 통계 인스턴스 생성
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    pub fn record_dir_created(&mut self) {
        self.dirs_created += 1;
    }

    pub fn record_ignored(&mut self) {
        self.ignored += 1;
    }

    /// 변환 결과 기록
    pub fn record_converted(&mut self, bytes_read: u64, bytes_written: u64, unmappable: usize) {
        self.converted += 1;
        if unmappable > 0 {
            self.lossy += 1;
        }
        self.total_bytes_read += bytes_read;
        self.total_bytes_written += bytes_written;
    }

    /// 복사 결과 기록
    pub fn record_copied(&mut self, bytes: u64) {
        self.copied += 1;
        self.total_bytes_read += bytes;
        self.total_bytes_written += bytes;
    }

    /// 감지 실패(복사로 대체) 기록
    pub fn record_detection_failed(&mut self, bytes: u64) {
        self.detection_failed += 1;
        self.total_bytes_read += bytes;
        self.total_bytes_written += bytes;
    }

    /// 처리한 전체 파일 수
    pub fn total_files(&self) -> usize {
        self.converted + self.copied + self.detection_failed
    }

    /// 경과 시간 반환
    pub fn elapsed(&self) -> Duration {
        self.start_time
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// 변환 통계 요약 출력
    pub fn print_summary(&self) {
        let elapsed = self.elapsed();

        println!("\n{}", "═".repeat(50).bright_blue());
        println!("{}", " 📊 변환 통계".bright_white().bold());
        println!("{}", "═".repeat(50).bright_blue());

        println!(
            "  {} 전체 파일:    {}",
            "📁".bright_cyan(),
            self.total_files()
        );
        println!(
            "  {} 변환:         {}",
            "✅".bright_green(),
            self.converted.to_string().green()
        );
        println!("  {} 복사:         {}", "📄".bright_white(), self.copied);

        if self.detection_failed > 0 {
            println!(
                "  {} 감지 실패:    {}",
                "❌".bright_red(),
                self.detection_failed.to_string().red()
            );
        } else {
            println!("  {} 감지 실패:    {}", "✅".bright_green(), "0".green());
        }

        if self.lossy > 0 {
            println!(
                "  {} 손실 변환:    {}",
                "⚠️".bright_yellow(),
                self.lossy.to_string().yellow()
            );
        }

        println!("  {} 폴더 생성:    {}", "📂".bright_cyan(), self.dirs_created);
        println!("  {} 무시:         {}", "🚫".bright_yellow(), self.ignored);
        println!(
            "  {} 입력 용량:    {}",
            "📥".bright_yellow(),
            format_bytes(self.total_bytes_read)
        );
        println!(
            "  {} 출력 용량:    {}",
            "📤".bright_magenta(),
            format_bytes(self.total_bytes_written)
        );

        let candidates = self.converted + self.detection_failed;
        if candidates > 0 {
            let success_rate = (self.converted as f64 / candidates as f64) * 100.0;
            println!(
                "  {} 변환율:       {:.1}%",
                "📈".bright_white(),
                success_rate
            );
        }

        println!(
            "  {} 처리 시간:    {}",
            "⏱️".bright_cyan(),
            format_duration(elapsed)
        );

        println!("{}", "═".repeat(50).bright_blue());
    }
}

/// 바이트를 읽기 쉬운 형식으로 변환
///
/// # Arguments
/// * `bytes` - 바이트 수
///
/// # Returns
/// 형식화된 문자열 (예: "1.25 MB")
///
/// # Examples
/// ```
/// use econvert::stats::format_bytes;
///
/// assert_eq!(format_bytes(500), "500 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1048576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// 경과 시간을 읽기 쉬운 형식으로 변환
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs >= 3600 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}시간 {}분", hours, mins)
    } else if secs >= 60 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        format!("{}분 {}초", mins, remaining_secs)
    } else if secs > 0 {
        format!("{}.{:03}초", secs, millis)
    } else {
        format!("{}ms", millis)
    }
}
