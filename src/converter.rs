//! 폴더 변환 모듈
//!
//! 입력 폴더를 깊이 우선으로 탐색하여 출력 폴더에 같은 구조를 만들고,
//! 대상 확장자 파일은 인코딩을 변환하고 나머지는 그대로 복사합니다.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::detect::{Detector, JapaneseDetector};
use crate::encoding::TargetEncoding;
use crate::error::{ConvertError, Result};
use crate::pattern::PatternMatcher;
use crate::processor::{detect_and_convert, read_source, Transcoded, DEFAULT_MMAP_THRESHOLD};
use crate::report::{Conversion, Reporter};

/// 확장자 문자열을 `.txt` 형태(소문자, 점 포함)로 정규화
///
/// # Examples
/// ```
/// use econvert::converter::normalize_extension;
///
/// assert_eq!(normalize_extension("TXT").unwrap(), ".txt");
/// assert_eq!(normalize_extension(" .php ").unwrap(), ".php");
/// assert!(normalize_extension("tar.gz").is_err());
/// ```
pub fn normalize_extension(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let bare = trimmed.strip_prefix('.').unwrap_or(trimmed);

    let invalid = bare.is_empty()
        || bare
            .chars()
            .any(|c| c == '.' || c == '/' || c == '\\' || c.is_whitespace());
    if invalid {
        return Err(ConvertError::InvalidExtension {
            extension: raw.to_string(),
        });
    }

    Ok(format!(".{}", bare.to_lowercase()))
}

/// 한 번의 실행 동안 변하지 않는 변환 설정
#[derive(Debug, Clone)]
pub struct ConversionJob {
    destination_root: PathBuf,
    target: TargetEncoding,
    extensions: BTreeSet<String>,
    exclude: PatternMatcher,
    dry_run: bool,
    mmap_threshold: u64,
}

impl ConversionJob {
    /// 새 변환 설정 생성
    ///
    /// # Arguments
    /// * `destination_root` - 출력 루트 폴더 (절대 경로로 변환됨)
    /// * `target` - 변환 대상 인코딩
    /// * `extensions` - 변환할 확장자 목록 (점 유무, 대소문자 무관)
    pub fn new<I, S>(
        destination_root: impl AsRef<Path>,
        target: TargetEncoding,
        extensions: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let root = destination_root.as_ref();
        let destination_root = std::path::absolute(root).map_err(|e| ConvertError::io(root, e))?;

        let extensions = extensions
            .into_iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .collect::<Result<BTreeSet<_>>>()?;
        if extensions.is_empty() {
            return Err(ConvertError::NoExtensions);
        }

        Ok(Self {
            destination_root,
            target,
            extensions,
            exclude: PatternMatcher::default(),
            dry_run: false,
            mmap_threshold: DEFAULT_MMAP_THRESHOLD,
        })
    }

    /// 제외 패턴 설정
    pub fn with_exclude(mut self, exclude: PatternMatcher) -> Self {
        self.exclude = exclude;
        self
    }

    /// 드라이런 설정 (파일 시스템을 변경하지 않음)
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 메모리 매핑 임계값 설정
    pub fn with_mmap_threshold(mut self, mmap_threshold: u64) -> Self {
        self.mmap_threshold = mmap_threshold;
        self
    }

    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    pub fn target(&self) -> TargetEncoding {
        self.target
    }

    pub fn exclude(&self) -> &PatternMatcher {
        &self.exclude
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// 정규화된 확장자 목록 (정렬됨)
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    /// 파일이 변환 대상 확장자인지 확인
    ///
    /// 파일 쪽 확장자는 정규화하지 않고 그대로 비교합니다 (`A.TXT` 는 `.txt` 와 다름).
    pub fn is_convertible(&self, path: &Path) -> bool {
        file_extension(path)
            .map(|ext| self.extensions.contains(ext))
            .unwrap_or(false)
    }
}

/// 파일 이름의 마지막 `.` 부터 끝까지 (점 포함)
///
/// `Path::extension` 과 달리 `.txt` 처럼 확장자만 있는 이름도 `.txt` 를 돌려줍니다.
fn file_extension(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    name.rfind('.').map(|i| &name[i..])
}

/// 폴더 이름이 점으로 시작하는지 확인
///
/// `.` 이나 `..` 처럼 이름이 없는 경로는 실제 경로로 풀어서 판단합니다.
fn is_hidden_root(path: &Path) -> Result<bool> {
    let name = match path.file_name() {
        Some(name) => name.to_os_string(),
        None => {
            let absolute = fs::canonicalize(path).map_err(|e| ConvertError::io(path, e))?;
            match absolute.file_name() {
                Some(name) => name.to_os_string(),
                None => return Ok(false),
            }
        }
    };
    Ok(name.to_string_lossy().starts_with('.'))
}

/// 폴더를 먼저, 그다음 파일을 이름 순으로
fn dirs_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    b.file_type()
        .is_dir()
        .cmp(&a.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// 두 경로가 같은 파일을 가리키는지 확인 (존재하지 않으면 false)
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// 폴더 탐색 및 파일 변환 엔진
pub struct Converter<'a> {
    job: &'a ConversionJob,
    detector: Box<dyn Detector + 'a>,
}

impl<'a> Converter<'a> {
    /// 기본 감지기(`JapaneseDetector`)를 사용하는 변환기 생성
    pub fn new(job: &'a ConversionJob) -> Self {
        Self {
            job,
            detector: Box::new(JapaneseDetector),
        }
    }

    /// 감지기 교체
    pub fn with_detector(mut self, detector: impl Detector + 'a) -> Self {
        self.detector = Box::new(detector);
        self
    }

    /// 폴더 또는 파일 하나를 변환
    ///
    /// 폴더면 하위 항목을 모두 처리하고, 파일이면 출력 루트 바로 아래에 씁니다.
    /// 파일 시스템 에러가 하나라도 나면 즉시 중단합니다.
    pub fn convert(&self, source: &Path, reporter: &mut dyn Reporter) -> Result<()> {
        let metadata = fs::metadata(source).map_err(|e| ConvertError::io(source, e))?;
        let destination_root = self.job.destination_root();

        if !self.job.is_dry_run() {
            fs::create_dir_all(destination_root)
                .map_err(|e| ConvertError::io(destination_root, e))?;
        }

        if metadata.is_dir() {
            return self.convert_dir(source, reporter);
        }

        let file_name = source.file_name().ok_or_else(|| {
            ConvertError::io(
                source,
                io::Error::new(io::ErrorKind::InvalidInput, "파일 이름이 없습니다"),
            )
        })?;
        self.convert_file(source, &destination_root.join(file_name), 0, reporter)
    }

    /// 폴더 하위를 깊이 우선으로 변환
    ///
    /// 각 단계에서 하위 폴더를 모두 처리한 뒤 그 폴더의 파일을 처리합니다.
    /// 점으로 시작하는 폴더(입력 루트 포함), 제외 패턴에 맞는 항목, 출력 루트 자신은 건너뜁니다.
    fn convert_dir(&self, source: &Path, reporter: &mut dyn Reporter) -> Result<()> {
        if is_hidden_root(source)? {
            reporter.report_ignored(source, 0);
            return Ok(());
        }

        let destination_root = self.job.destination_root();
        let output_guard = fs::canonicalize(destination_root).ok();

        let mut walker = WalkDir::new(source)
            .follow_links(true)
            .min_depth(1)
            .sort_by(dirs_first)
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry?;
            let level = entry.depth() - 1;
            let relative = entry
                .path()
                .strip_prefix(source)
                .map_err(|e| ConvertError::io(entry.path(), io::Error::other(e)))?;
            let destination = destination_root.join(relative);
            let excluded = self.job.exclude.matches(&entry.file_name().to_string_lossy());

            if entry.file_type().is_dir() {
                let is_output = output_guard
                    .as_deref()
                    .is_some_and(|guard| same_file(entry.path(), guard));

                if is_hidden(&entry) || excluded || is_output {
                    reporter.report_ignored(entry.path(), level);
                    walker.skip_current_dir();
                    continue;
                }

                if !self.job.is_dry_run() {
                    fs::create_dir_all(&destination)
                        .map_err(|e| ConvertError::io(&destination, e))?;
                }
                reporter.report_dir_created(&destination, level);
            } else if entry.file_type().is_file() && !excluded {
                self.convert_file(entry.path(), &destination, level, reporter)?;
            } else {
                // 제외 대상이거나 소켓, FIFO 등 일반 파일이 아닌 항목
                reporter.report_ignored(entry.path(), level);
            }
        }

        Ok(())
    }

    /// 파일 하나를 변환하거나 복사
    fn convert_file(
        &self,
        source: &Path,
        destination: &Path,
        level: usize,
        reporter: &mut dyn Reporter,
    ) -> Result<()> {
        if !self.job.is_convertible(source) {
            let bytes = self.copy_verbatim(source, destination)?;
            reporter.report_file_copied(source, level, bytes);
            return Ok(());
        }

        let contents = read_source(source, self.job.mmap_threshold)?;
        let bytes_read = contents.len() as u64;
        let transcoded = detect_and_convert(self.detector.as_ref(), &contents, self.job.target());
        // 같은 파일에 덮어쓸 수 있으므로 쓰기 전에 원본 핸들을 닫음
        drop(contents);

        match transcoded {
            Transcoded::Converted { code, encoded } => {
                if !self.job.is_dry_run() {
                    fs::write(destination, &encoded.bytes)
                        .map_err(|e| ConvertError::io(destination, e))?;
                }
                let conversion = Conversion {
                    code,
                    bytes_read,
                    bytes_written: encoded.bytes.len() as u64,
                    unmappable: encoded.unmappable,
                };
                reporter.report_file_converted(source, level, &conversion);
            }
            Transcoded::Failed => {
                self.copy_verbatim(source, destination)?;
                reporter.report_detection_failed(source, level, bytes_read);
            }
        }

        Ok(())
    }

    /// 바이트 그대로 복사 (항상 덮어씀)
    fn copy_verbatim(&self, source: &Path, destination: &Path) -> Result<u64> {
        // 원본과 출력이 같은 파일이면 이미 동일한 내용
        if self.job.is_dry_run() || same_file(source, destination) {
            return fs::metadata(source)
                .map(|m| m.len())
                .map_err(|e| ConvertError::io(source, e));
        }

        fs::copy(source, destination).map_err(|e| ConvertError::io(destination, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{CharCode, Detection};
    use crate::report::{Event, RecordingReporter};
    use tempfile::TempDir;

    struct AlwaysFails;

    impl Detector for AlwaysFails {
        fn detect(&self, _bytes: &[u8]) -> Detection {
            Detection::Failed
        }
    }

    /// 점으로 시작하지 않는 이름의 임시 입력 폴더 (`TempDir::new` 는 `.tmp` 로 시작)
    fn source_dir() -> TempDir {
        tempfile::Builder::new().prefix("source").tempdir().unwrap()
    }

    fn job(destination: &Path, extensions: &[&str]) -> ConversionJob {
        ConversionJob::new(destination, TargetEncoding::Utf8, extensions.iter()).unwrap()
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("txt").unwrap(), ".txt");
        assert_eq!(normalize_extension(".HTML").unwrap(), ".html");
        assert!(normalize_extension("").is_err());
        assert!(normalize_extension(".").is_err());
        assert!(normalize_extension("a/b").is_err());
    }

    #[test]
    fn test_job_rejects_empty_extension_list() {
        let result = ConversionJob::new("out", TargetEncoding::Utf8, Vec::<String>::new());
        assert!(matches!(result, Err(ConvertError::NoExtensions)));
    }

    #[test]
    fn test_job_destination_is_absolute() {
        let job = job(Path::new("relative/out"), &["txt"]);
        assert!(job.destination_root().is_absolute());
    }

    #[test]
    fn test_is_convertible() {
        let job = job(Path::new("/tmp/out"), &["txt", ".PHP"]);

        assert!(job.is_convertible(Path::new("a.txt")));
        assert!(job.is_convertible(Path::new("dir/index.php")));
        assert!(!job.is_convertible(Path::new("README.TXT")));
        assert!(!job.is_convertible(Path::new("index.PHP")));
        assert!(!job.is_convertible(Path::new("image.png")));
        assert!(!job.is_convertible(Path::new("Makefile")));
        assert!(!job.is_convertible(Path::new("trailing.")));
        // 확장자만 있는 이름
        assert!(job.is_convertible(Path::new("dir/.txt")));
        assert_eq!(job.extensions().collect::<Vec<_>>(), vec![".php", ".txt"]);
    }

    #[test]
    fn test_directories_before_files() {
        let source = source_dir();
        let output = TempDir::new().unwrap();
        fs::write(source.path().join("a.txt"), "a").unwrap();
        fs::create_dir(source.path().join("z")).unwrap();
        fs::write(source.path().join("z").join("b.txt"), "b").unwrap();

        let job = job(output.path(), &["txt"]);
        let mut reporter = RecordingReporter::new();
        Converter::new(&job)
            .convert(source.path(), &mut reporter)
            .unwrap();

        assert_eq!(
            reporter.events,
            vec![
                Event::DirCreated(job.destination_root().join("z")),
                Event::Converted(source.path().join("z").join("b.txt"), CharCode::Ascii),
                Event::Converted(source.path().join("a.txt"), CharCode::Ascii),
            ]
        );
    }

    #[test]
    fn test_custom_detector_falls_back_to_copy() {
        let source = source_dir();
        let output = TempDir::new().unwrap();
        fs::write(source.path().join("a.txt"), "plain").unwrap();

        let job = job(output.path(), &["txt"]);
        let mut reporter = RecordingReporter::new();
        Converter::new(&job)
            .with_detector(AlwaysFails)
            .convert(source.path(), &mut reporter)
            .unwrap();

        assert_eq!(
            reporter.events,
            vec![Event::DetectionFailed(source.path().join("a.txt"))]
        );
        assert_eq!(fs::read(output.path().join("a.txt")).unwrap(), b"plain");
    }

    #[test]
    fn test_output_inside_source_is_skipped() {
        let source = source_dir();
        let output = source.path().join("out");
        fs::create_dir(&output).unwrap();
        fs::write(source.path().join("a.txt"), "a").unwrap();

        let job = job(&output, &["txt"]);
        let mut reporter = RecordingReporter::new();
        Converter::new(&job)
            .convert(source.path(), &mut reporter)
            .unwrap();

        assert_eq!(reporter.events[0], Event::Ignored(output.clone()));
        assert!(!output.join("out").exists());
        assert!(output.join("a.txt").exists());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let source = source_dir();
        let output = TempDir::new().unwrap();
        let destination = output.path().join("never");
        fs::create_dir(source.path().join("sub")).unwrap();
        fs::write(source.path().join("sub").join("a.txt"), "a").unwrap();
        fs::write(source.path().join("b.bin"), [1u8, 2, 3]).unwrap();

        let job = job(&destination, &["txt"]).with_dry_run(true);
        let mut reporter = RecordingReporter::new();
        Converter::new(&job)
            .convert(source.path(), &mut reporter)
            .unwrap();

        assert_eq!(reporter.events.len(), 3);
        assert!(!destination.exists());
    }

    #[test]
    fn test_uppercase_extension_is_copied_verbatim() {
        let source = source_dir();
        let output = TempDir::new().unwrap();
        let (sjis, _, _) = encoding_rs::SHIFT_JIS.encode("こんにちは");
        fs::write(source.path().join("A.TXT"), &sjis).unwrap();

        let job = job(output.path(), &["txt"]);
        let mut reporter = RecordingReporter::new();
        Converter::new(&job)
            .convert(source.path(), &mut reporter)
            .unwrap();

        assert_eq!(
            reporter.events,
            vec![Event::Copied(source.path().join("A.TXT"))]
        );
        assert_eq!(fs::read(output.path().join("A.TXT")).unwrap(), &*sjis);
    }

    #[test]
    fn test_hidden_input_root_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join(".hidden");
        let output = temp_dir.path().join("out");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("a.txt"), "a").unwrap();

        let job = job(&output, &["txt"]);
        let mut reporter = RecordingReporter::new();
        Converter::new(&job).convert(&source, &mut reporter).unwrap();

        assert_eq!(reporter.events, vec![Event::Ignored(source.clone())]);
        assert!(!output.join("a.txt").exists());
    }

    #[test]
    fn test_hidden_root_given_as_current_dir() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join(".hidden");
        fs::create_dir(&source).unwrap();

        assert!(is_hidden_root(&source.join(".")).unwrap());
        assert!(!is_hidden_root(&temp_dir.path().join("site")).unwrap());
    }

    #[test]
    fn test_mmap_threshold_reaches_reader() {
        let source = source_dir();
        let output = TempDir::new().unwrap();
        let (sjis, _, _) = encoding_rs::SHIFT_JIS.encode("日本語のテキストです。");
        fs::write(source.path().join("big.txt"), &sjis).unwrap();

        // 임계값 1바이트: 모든 파일이 메모리 매핑 경로로 읽힘
        let job = job(output.path(), &["txt"]).with_mmap_threshold(1);
        let mut reporter = RecordingReporter::new();
        Converter::new(&job)
            .convert(source.path(), &mut reporter)
            .unwrap();

        assert_eq!(
            reporter.events,
            vec![Event::Converted(source.path().join("big.txt"), CharCode::ShiftJis)]
        );
        assert_eq!(
            fs::read(output.path().join("big.txt")).unwrap(),
            "日本語のテキストです。".as_bytes()
        );
    }
}
