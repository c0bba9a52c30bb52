//! econvert - ENCODING CONVERTER
//!
//! 폴더(또는 파일)를 탐색하여 대상 확장자 파일의 문자 인코딩을 감지하고,
//! 지정한 인코딩으로 변환한 결과를 같은 구조의 출력 폴더에 저장하는 CLI 도구입니다.
//!
//! # 주요 기능
//!
//! - 🔍 **인코딩 자동 감지**: BOM, ISO-2022-JP, UTF-8, EUC-JP, Shift_JIS, ASCII, windows-1252
//! - 🔁 **재인코딩**: encoding_rs 가 지원하는 인코딩 + ASCII / UTF-16 출력 (UTF-8 은 BOM 없음)
//! - 📂 **폴더 구조 유지**: 하위 폴더를 먼저 처리하고 `.git` 같은 점 폴더는 무시
//! - 📄 **안전한 대체**: 감지 실패 파일과 대상 외 파일은 원본 그대로 복사
//! - 🚫 **제외 패턴**: glob 형식으로 특정 파일/폴더 건너뛰기
//! - 🧪 **드라이런 모드**: 실제 쓰기 없이 처리 결과 미리 확인
//! - 📝 **감사 로그**: 변환되지 않았거나 손실이 있었던 파일 목록 기록
//!
//! # 예제
//!
//! ```bash
//! # Shift_JIS 로 된 사이트 소스를 UTF-8 로 (출력: ./site_convert)
//! econvert -i ./site -f php,txt,html -e UTF-8
//!
//! # 파일 하나를 EUC-JP 로 (같은 폴더에 덮어씀)
//! econvert -i ./notes.txt -f txt -e EUC-JP
//! ```

pub mod cli;
pub mod converter;
pub mod detect;
pub mod encoding;
pub mod error;
pub mod pattern;
pub mod processor;
pub mod report;
pub mod stats;

// Re-exports for convenient access
pub use cli::Args;
pub use converter::{ConversionJob, Converter};
pub use detect::{CharCode, Detection, Detector, JapaneseDetector};
pub use encoding::{Encoded, TargetEncoding};
pub use error::{ConvertError, Result};
pub use pattern::PatternMatcher;
pub use processor::{detect_and_convert, Transcoded};
pub use report::{ConsoleReporter, RecordingReporter, Reporter};
pub use stats::{format_bytes, Statistics};
