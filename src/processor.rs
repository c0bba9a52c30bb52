//! 파일 처리 모듈
//!
//! 개별 파일의 읽기, 인코딩 감지, 재인코딩을 담당합니다.

use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::ops::Deref;
use std::path::Path;

use crate::detect::{CharCode, Detection, Detector};
use crate::encoding::{Encoded, TargetEncoding};
use crate::error::{ConvertError, Result};

/// 대용량 파일 임계값 (이상이면 메모리 매핑 사용)
pub const DEFAULT_MMAP_THRESHOLD: u64 = 10 * 1024 * 1024; // 10MB

/// 읽어 들인 원본 파일 내용
///
/// 값을 버리는 즉시 파일 핸들과 매핑이 해제됩니다.
pub enum SourceBytes {
    Buffered(Vec<u8>),
    Mapped(Mmap),
}

impl Deref for SourceBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            SourceBytes::Buffered(bytes) => bytes.as_slice(),
            SourceBytes::Mapped(mmap) => &mmap[..],
        }
    }
}

/// 파일 전체 읽기
///
/// # Arguments
/// * `path` - 읽을 파일 경로
/// * `mmap_threshold` - 이 크기 이상이면 메모리 매핑 사용
pub fn read_source(path: &Path, mmap_threshold: u64) -> Result<SourceBytes> {
    let mut file = File::open(path).map_err(|e| ConvertError::io(path, e))?;
    let len = file
        .metadata()
        .map_err(|e| ConvertError::io(path, e))?
        .len();

    if len > 0 && len >= mmap_threshold {
        // 대용량 파일: 메모리 매핑 사용
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| ConvertError::io(path, e))?;
        return Ok(SourceBytes::Mapped(mmap));
    }

    // 일반 파일: 전체 버퍼링
    let mut buffer = Vec::with_capacity(len as usize);
    file.read_to_end(&mut buffer)
        .map_err(|e| ConvertError::io(path, e))?;
    Ok(SourceBytes::Buffered(buffer))
}

/// 감지 + 재인코딩 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcoded {
    /// 원본 문자 코드와 대상 인코딩으로 다시 쓴 바이트
    Converted { code: CharCode, encoded: Encoded },
    /// 감지 실패 (호출 측에서 원본을 그대로 복사)
    Failed,
}

/// 원본 바이트의 인코딩을 감지하고 대상 인코딩으로 변환
///
/// # Examples
/// ```
/// use econvert::detect::{CharCode, JapaneseDetector};
/// use econvert::encoding::TargetEncoding;
/// use econvert::processor::{detect_and_convert, Transcoded};
///
/// let result = detect_and_convert(&JapaneseDetector, b"plain text", TargetEncoding::Utf8);
/// match result {
///     Transcoded::Converted { code, encoded } => {
///         assert_eq!(code, CharCode::Ascii);
///         assert_eq!(encoded.bytes, b"plain text");
///     }
///     Transcoded::Failed => unreachable!(),
/// }
/// ```
pub fn detect_and_convert(
    detector: &dyn Detector,
    bytes: &[u8],
    target: TargetEncoding,
) -> Transcoded {
    match detector.detect(bytes) {
        Detection::Detected { code, text } => Transcoded::Converted {
            code,
            encoded: target.encode(&text),
        },
        Detection::Failed => Transcoded::Failed,
    }
}
