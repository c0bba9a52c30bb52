//! 출력 인코딩 모듈
//!
//! 디코딩된 텍스트를 변환 대상 인코딩의 바이트열로 다시 씁니다.

use encoding_rs::{EncoderResult, Encoding, REPLACEMENT, UTF_16BE, UTF_16LE, UTF_8};
use std::fmt;

use crate::error::{ConvertError, Result};

/// 대상 인코딩으로 표현할 수 없는 문자를 대신하는 문자열
const REPLACEMENT_TEXT: &str = "?";

/// 변환 대상 인코딩
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetEncoding {
    /// BOM 없는 UTF-8
    Utf8,
    /// 7비트 ASCII (그 외 문자는 `?`)
    Ascii,
    /// BOM 포함 UTF-16LE
    Utf16Le,
    /// BOM 포함 UTF-16BE
    Utf16Be,
    /// encoding_rs 가 지원하는 그 외 인코딩 (Shift_JIS, EUC-JP, ...)
    Codepage(&'static Encoding),
}

/// 인코딩 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    /// 출력 바이트
    pub bytes: Vec<u8>,
    /// `?` 로 대체된 문자 수
    pub unmappable: usize,
}

impl TargetEncoding {
    /// 인코딩 이름을 해석 (대소문자 무시)
    ///
    /// # Examples
    /// ```
    /// use econvert::encoding::TargetEncoding;
    ///
    /// assert_eq!(TargetEncoding::from_name("utf-8").unwrap(), TargetEncoding::Utf8);
    /// assert_eq!(TargetEncoding::from_name("Shift_JIS").unwrap().name(), "Shift_JIS");
    /// assert!(TargetEncoding::from_name("no-such-encoding").is_err());
    /// ```
    pub fn from_name(name: &str) -> Result<Self> {
        let label = name.trim();
        let unknown = || ConvertError::UnknownEncoding {
            name: name.to_string(),
        };

        // WHATWG 라벨에서 "ascii" 는 windows-1252 를 가리키므로 먼저 처리
        match label.to_ascii_lowercase().as_str() {
            "ascii" | "us-ascii" => return Ok(TargetEncoding::Ascii),
            "utf8" => return Ok(TargetEncoding::Utf8),
            _ => {}
        }

        let encoding = Encoding::for_label(label.as_bytes()).ok_or_else(unknown)?;
        let target = if encoding == UTF_8 {
            TargetEncoding::Utf8
        } else if encoding == UTF_16LE {
            TargetEncoding::Utf16Le
        } else if encoding == UTF_16BE {
            TargetEncoding::Utf16Be
        } else if encoding == REPLACEMENT {
            return Err(unknown());
        } else {
            TargetEncoding::Codepage(encoding)
        };

        Ok(target)
    }

    /// 표시용 이름
    pub fn name(&self) -> &'static str {
        match self {
            TargetEncoding::Utf8 => "UTF-8",
            TargetEncoding::Ascii => "ASCII",
            TargetEncoding::Utf16Le => "UTF-16LE",
            TargetEncoding::Utf16Be => "UTF-16BE",
            TargetEncoding::Codepage(encoding) => encoding.name(),
        }
    }

    /// 텍스트를 대상 인코딩으로 변환
    pub fn encode(&self, text: &str) -> Encoded {
        match self {
            // 선두 BOM 문자는 출력하지 않음
            TargetEncoding::Utf8 => Encoded {
                bytes: strip_bom(text).as_bytes().to_vec(),
                unmappable: 0,
            },
            TargetEncoding::Ascii => encode_ascii(text),
            TargetEncoding::Utf16Le => encode_utf16(text, u16::to_le_bytes),
            TargetEncoding::Utf16Be => encode_utf16(text, u16::to_be_bytes),
            TargetEncoding::Codepage(encoding) => encode_codepage(*encoding, text),
        }
    }
}

impl fmt::Display for TargetEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 선두 BOM 하나만 제거 (그 뒤의 U+FEFF 는 본문)
fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{FEFF}').unwrap_or(text)
}

fn encode_ascii(text: &str) -> Encoded {
    let mut unmappable = 0;
    let bytes = text
        .chars()
        .map(|c| {
            if c.is_ascii() {
                c as u8
            } else {
                unmappable += 1;
                b'?'
            }
        })
        .collect();

    Encoded { bytes, unmappable }
}

fn encode_utf16(text: &str, to_bytes: fn(u16) -> [u8; 2]) -> Encoded {
    let mut bytes = Vec::with_capacity(2 + text.len() * 2);
    bytes.extend_from_slice(&to_bytes(0xFEFF));
    for unit in strip_bom(text).encode_utf16() {
        bytes.extend_from_slice(&to_bytes(unit));
    }

    Encoded {
        bytes,
        unmappable: 0,
    }
}

/// encoding_rs 인코더로 변환
///
/// encoding_rs 기본 동작(HTML 문자 참조로 대체) 대신 `?` 로 대체하고 개수를 셉니다.
/// ISO-2022-JP 처럼 상태를 갖는 인코딩에서도 대체 문자가 올바른 모드로 출력되도록
/// 인코더 자체에 `?` 를 넣습니다.
fn encode_codepage(encoding: &'static Encoding, text: &str) -> Encoded {
    let mut encoder = encoding.new_encoder();
    let mut bytes = Vec::with_capacity(
        encoder
            .max_buffer_length_from_utf8_without_replacement(text.len())
            .unwrap_or(text.len() * 4),
    );
    let mut unmappable = 0;
    let mut src = text;

    loop {
        let (result, read) =
            encoder.encode_from_utf8_to_vec_without_replacement(src, &mut bytes, true);
        src = &src[read..];

        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::OutputFull => {
                let needed = encoder
                    .max_buffer_length_from_utf8_without_replacement(src.len())
                    .unwrap_or(src.len() * 4);
                bytes.reserve(needed.max(16));
            }
            EncoderResult::Unmappable(_) => {
                unmappable += 1;
                let needed = encoder
                    .max_buffer_length_from_utf8_without_replacement(REPLACEMENT_TEXT.len())
                    .unwrap_or(8);
                bytes.reserve(needed);
                let _ = encoder.encode_from_utf8_to_vec_without_replacement(
                    REPLACEMENT_TEXT,
                    &mut bytes,
                    false,
                );
            }
        }
    }

    Encoded { bytes, unmappable }
}
