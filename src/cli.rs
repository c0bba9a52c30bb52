//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱, 출력 폴더 결정을 담당합니다.

use clap::Parser;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::encoding::TargetEncoding;
use crate::error::{ConvertError, Result};

/// 출력 폴더를 지정하지 않았을 때 입력 폴더 이름 뒤에 붙는 접미사
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_convert";

/// econvert CLI 인자 구조체
#[derive(Parser, Debug)]
#[command(
    name = "econvert",
    author = "YourName <your@email.com>",
    version,
    about = "ENCODING CONVERTER - 폴더 내 텍스트 파일의 문자 인코딩을 변환하는 CLI 도구",
    long_about = r#"
ENCODING CONVERTER
==================

지정된 폴더(또는 파일)를 탐색하여 대상 확장자 파일의 문자 인코딩을
자동 감지하고 지정한 인코딩으로 변환한 결과를 출력 폴더에 같은 구조로 저장합니다.

특징:
  • BOM / ISO-2022-JP / UTF-8 / EUC-JP / Shift_JIS / ASCII 자동 감지
  • 감지 실패 파일과 대상 외 파일은 원본 그대로 복사
  • 점(.)으로 시작하는 폴더(.git 등)는 무시
  • UTF-8 출력 시 BOM 없음

예제:
  econvert -i ./site -f php,txt,html -e UTF-8
  econvert -i ./site -o ./out -f txt -e Shift_JIS
  econvert -i ./notes.txt -f txt -e EUC-JP
  econvert -i ./site -f txt -e UTF-8 --exclude "vendor,*.min.js" --dry-run
"#
)]
pub struct Args {
    /// 변환할 파일 또는 폴더 경로
    #[arg(short, long)]
    pub input: PathBuf,

    /// 출력 폴더 경로 (기본값: 폴더 입력이면 "<입력>_convert", 파일 입력이면 상위 폴더)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 변환할 확장자 (쉼표로 구분, 점 생략 가능, 예: "php,txt,html")
    #[arg(short = 'f', long = "file-extension", alias = "fileExtension")]
    pub file_extension: String,

    /// 변환 대상 인코딩 (Shift_JIS / UTF-8 / EUC-JP / ASCII ...)
    #[arg(short, long)]
    pub encoding: String,

    /// 제외할 파일/폴더 이름 패턴 (glob 형식, 쉼표로 구분)
    #[arg(short = 'x', long)]
    pub exclude: Option<String>,

    /// 실제 쓰기 없이 처리 내용만 표시
    #[arg(long)]
    pub dry_run: bool,

    /// 감지 실패 / 손실 변환 파일 목록을 기록할 로그 파일 경로
    #[arg(long)]
    pub log: Option<PathBuf>,
}

impl Args {
    /// 확장자 목록을 파싱하여 벡터로 반환
    pub fn extensions(&self) -> Vec<String> {
        parse_list(&self.file_extension)
    }

    /// 대상 인코딩 해석
    pub fn target_encoding(&self) -> Result<TargetEncoding> {
        TargetEncoding::from_name(&self.encoding)
    }

    /// 출력 폴더 결정
    pub fn resolve_output(&self) -> Result<PathBuf> {
        resolve_output(&self.input, self.output.as_deref())
    }
}

/// 쉼표로 구분된 목록 파싱 (빈 항목 제외)
pub fn parse_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// 출력 폴더 결정
///
/// 명시된 출력 경로가 있으면 기존 폴더여야 하며, 없으면 입력 종류에 따라 기본값을 사용합니다.
pub fn resolve_output(input: &Path, explicit: Option<&Path>) -> Result<PathBuf> {
    let metadata = fs::metadata(input).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ConvertError::InputNotFound {
            path: input.to_path_buf(),
        },
        _ => ConvertError::io(input, e),
    })?;

    if let Some(output) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        if output.is_dir() {
            return Ok(output.to_path_buf());
        }
        return Err(ConvertError::OutputNotADirectory {
            path: output.to_path_buf(),
        });
    }

    default_output(input, metadata.is_dir())
}

/// 기본 출력 폴더
///
/// * 폴더 입력 `D` → `D_convert` (끝의 경로 구분자는 무시)
/// * 파일 입력 → 파일이 있는 폴더
pub fn default_output(input: &Path, is_dir: bool) -> Result<PathBuf> {
    let empty = || ConvertError::EmptyOutput {
        input: input.to_path_buf(),
    };

    if !is_dir {
        let absolute = fs::canonicalize(input).map_err(|e| ConvertError::io(input, e))?;
        return absolute.parent().map(Path::to_path_buf).ok_or_else(empty);
    }

    // ".", ".." 처럼 이름이 없는 경로는 실제 경로로 풀어서 사용
    let base = if input.file_name().is_some() {
        input.to_path_buf()
    } else {
        fs::canonicalize(input).map_err(|e| ConvertError::io(input, e))?
    };

    let name = base.file_name().ok_or_else(empty)?;
    let mut output_name = OsString::from(name);
    output_name.push(DEFAULT_OUTPUT_SUFFIX);
    Ok(base.with_file_name(output_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("php, txt,,html "), vec!["php", "txt", "html"]);
        assert!(parse_list(" , ").is_empty());
    }

    #[test]
    fn test_default_output_for_directory() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("site");
        fs::create_dir(&input).unwrap();

        assert_eq!(
            default_output(&input, true).unwrap(),
            temp_dir.path().join("site_convert")
        );
    }

    #[test]
    fn test_default_output_strips_trailing_separator() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("site");
        fs::create_dir(&input).unwrap();
        let with_separator = PathBuf::from(format!("{}/", input.display()));

        assert_eq!(
            default_output(&with_separator, true).unwrap(),
            temp_dir.path().join("site_convert")
        );
    }

    #[test]
    fn test_default_output_for_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("notes.txt");
        fs::write(&input, "memo").unwrap();

        assert_eq!(
            default_output(&input, false).unwrap(),
            fs::canonicalize(temp_dir.path()).unwrap()
        );
    }

    #[test]
    fn test_resolve_output_rejects_plain_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("out.txt");
        fs::write(&file, "x").unwrap();

        let result = resolve_output(temp_dir.path(), Some(&file));
        assert!(matches!(result, Err(ConvertError::OutputNotADirectory { .. })));
    }

    #[test]
    fn test_resolve_output_missing_input() {
        let result = resolve_output(Path::new("/nonexistent/econvert/input"), None);
        assert!(matches!(result, Err(ConvertError::InputNotFound { .. })));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "econvert", "-i", "site", "-f", "php,txt", "-e", "UTF-8", "--dry-run",
        ])
        .unwrap();

        assert_eq!(args.extensions(), vec!["php", "txt"]);
        assert_eq!(args.target_encoding().unwrap(), TargetEncoding::Utf8);
        assert!(args.dry_run);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_args_camel_case_extension_option() {
        let args = Args::try_parse_from([
            "econvert", "-i", "site", "--fileExtension", "php,txt", "-e", "UTF-8",
        ])
        .unwrap();

        assert_eq!(args.extensions(), vec!["php", "txt"]);
    }

    #[test]
    fn test_args_missing_required() {
        let result = Args::try_parse_from(["econvert", "-i", "site", "-e", "UTF-8"]);
        assert!(result.is_err());
    }
}
