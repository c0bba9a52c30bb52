//! 진행 상황 보고 모듈
//!
//! 폴더 탐색 중 항목마다 어떤 처리를 했는지 `Reporter` 로 알립니다.
//! 변환 엔진은 직접 출력하지 않으므로 콘솔 대신 기록용 구현을 끼워 테스트할 수 있습니다.

use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::detect::CharCode;
use crate::stats::Statistics;

/// 변환된 파일 한 개의 정보
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    /// 감지된 원본 문자 코드
    pub code: CharCode,
    pub bytes_read: u64,
    pub bytes_written: u64,
    /// `?` 로 대체된 문자 수
    pub unmappable: usize,
}

/// 항목별 처리 결과 수신자
///
/// `level` 은 출력 들여쓰기 단계이며 루트 바로 아래 항목이 0 입니다.
pub trait Reporter {
    /// 숨김 폴더나 제외 패턴 등으로 건너뛴 항목
    fn report_ignored(&mut self, path: &Path, level: usize);
    /// 출력 쪽에 생성한 폴더
    fn report_dir_created(&mut self, path: &Path, level: usize);
    /// 인코딩 변환한 파일
    fn report_file_converted(&mut self, path: &Path, level: usize, conversion: &Conversion);
    /// 대상 확장자가 아니어서 그대로 복사한 파일
    fn report_file_copied(&mut self, path: &Path, level: usize, bytes: u64);
    /// 인코딩 감지에 실패하여 그대로 복사한 파일
    fn report_detection_failed(&mut self, path: &Path, level: usize, bytes: u64);
}

/// 한 줄 출력 형식: `<label>: <들여쓰기><이름>`
///
/// # Examples
/// ```
/// use econvert::report::entry_line;
///
/// assert_eq!(entry_line("Dir Create ", 1, "sub/"), "Dir Create :   sub/");
/// ```
pub fn entry_line(label: &str, level: usize, name: &str) -> String {
    format!("{}: {}{}", label, " ".repeat(level * 2), name)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// 컬러 콘솔 출력 + 통계 + 감사 목록
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    stats: Statistics,
    audit: Vec<(PathBuf, String)>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            stats: Statistics::new(),
            audit: Vec::new(),
        }
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    /// 변환되지 않았거나 손실이 있었던 파일 목록
    pub fn audit(&self) -> &[(PathBuf, String)] {
        &self.audit
    }
}

impl Reporter for ConsoleReporter {
    fn report_ignored(&mut self, path: &Path, level: usize) {
        self.stats.record_ignored();
        let name = format!("{}{}", display_name(path), if path.is_dir() { "/" } else { "" });
        println!("{}", entry_line("Ignore     ", level, &name).yellow());
    }

    fn report_dir_created(&mut self, path: &Path, level: usize) {
        self.stats.record_dir_created();
        let name = format!("{}/", display_name(path));
        println!("{}", entry_line("Dir Create ", level, &name));
    }

    fn report_file_converted(&mut self, path: &Path, level: usize, conversion: &Conversion) {
        self.stats.record_converted(
            conversion.bytes_read,
            conversion.bytes_written,
            conversion.unmappable,
        );

        let name = format!("{} - Code: {}", display_name(path), conversion.code);
        let line = entry_line("File Create", level, &name).green();
        if conversion.unmappable > 0 {
            println!(
                "{}{}",
                line,
                format!(" (unmappable: {})", conversion.unmappable).yellow()
            );
            self.audit.push((
                path.to_path_buf(),
                format!(
                    "{} 문자를 변환할 수 없어 '?' 로 대체 (원본: {})",
                    conversion.unmappable, conversion.code
                ),
            ));
        } else {
            println!("{}", line);
        }
    }

    fn report_file_copied(&mut self, path: &Path, level: usize, bytes: u64) {
        self.stats.record_copied(bytes);
        println!("{}", entry_line("File Copy  ", level, &display_name(path)));
    }

    fn report_detection_failed(&mut self, path: &Path, level: usize, bytes: u64) {
        self.stats.record_detection_failed(bytes);

        let name = format!("{} - Code: ??? (Detection Failure)", display_name(path));
        println!("{}", entry_line("File Copy  ", level, &name).red());
        self.audit.push((
            path.to_path_buf(),
            "인코딩 감지 실패, 원본 그대로 복사".to_string(),
        ));
    }
}

/// 기록된 보고 이벤트
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Ignored(PathBuf),
    DirCreated(PathBuf),
    Converted(PathBuf, CharCode),
    Copied(PathBuf),
    DetectionFailed(PathBuf),
}

/// 이벤트를 순서대로 모으기만 하는 보고자 (테스트용)
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<Event>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 주어진 경로에 대한 이벤트 검색
    pub fn event_for(&self, path: &Path) -> Option<&Event> {
        self.events.iter().find(|event| event.path() == path)
    }
}

impl Event {
    pub fn path(&self) -> &Path {
        match self {
            Event::Ignored(p)
            | Event::DirCreated(p)
            | Event::Converted(p, _)
            | Event::Copied(p)
            | Event::DetectionFailed(p) => p,
        }
    }
}

impl Reporter for RecordingReporter {
    fn report_ignored(&mut self, path: &Path, _level: usize) {
        self.events.push(Event::Ignored(path.to_path_buf()));
    }

    fn report_dir_created(&mut self, path: &Path, _level: usize) {
        self.events.push(Event::DirCreated(path.to_path_buf()));
    }

    fn report_file_converted(&mut self, path: &Path, _level: usize, conversion: &Conversion) {
        self.events
            .push(Event::Converted(path.to_path_buf(), conversion.code));
    }

    fn report_file_copied(&mut self, path: &Path, _level: usize, _bytes: u64) {
        self.events.push(Event::Copied(path.to_path_buf()));
    }

    fn report_detection_failed(&mut self, path: &Path, _level: usize, _bytes: u64) {
        self.events.push(Event::DetectionFailed(path.to_path_buf()));
    }
}
