//! 에러 타입 정의 모듈
//!
//! econvert에서 발생할 수 있는 모든 에러 타입을 정의합니다.

use std::path::PathBuf;
use thiserror::Error;

/// econvert에서 발생할 수 있는 에러 타입
#[derive(Error, Debug)]
pub enum ConvertError {
    /// 입력 경로가 존재하지 않음
    #[error("입력 경로를 찾을 수 없습니다: {path}")]
    InputNotFound { path: PathBuf },

    /// 지정된 출력 경로가 폴더가 아님
    #[error("출력 경로가 폴더가 아닙니다: {path}")]
    OutputNotADirectory { path: PathBuf },

    /// 출력 폴더를 결정할 수 없음
    #[error("출력 폴더를 결정할 수 없습니다 (입력: {input})")]
    EmptyOutput { input: PathBuf },

    /// 알 수 없는 인코딩 이름
    #[error("지원하지 않는 인코딩입니다: {name}")]
    UnknownEncoding { name: String },

    /// 잘못된 확장자 항목
    #[error("유효하지 않은 확장자: {extension:?}")]
    InvalidExtension { extension: String },

    /// 변환할 확장자가 하나도 없음
    #[error("변환할 확장자가 지정되지 않았습니다")]
    NoExtensions,

    /// 유효하지 않은 제외 패턴
    #[error("유효하지 않은 패턴: {pattern}")]
    InvalidPattern { pattern: String },

    /// 파일 시스템 입출력 실패
    #[error("입출력 실패 ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 폴더 탐색 실패
    #[error("폴더 탐색 실패: {0}")]
    Walk(#[from] walkdir::Error),
}

impl ConvertError {
    /// 경로 정보를 붙여 입출력 에러를 감싸는 헬퍼
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }
}

/// econvert 결과 타입 별칭
pub type Result<T> = std::result::Result<T, ConvertError>;
