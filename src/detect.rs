//! 문자 인코딩 감지 모듈
//!
//! 파일의 원시 바이트를 보고 원본 인코딩을 추정합니다.
//! 후보는 BOM이 붙은 UTF 계열, ISO-2022-JP, UTF-8, EUC-JP, Shift_JIS, ASCII,
//! windows-1252 로 한정되며 어느 것에도 맞지 않으면 감지 실패로 처리합니다.

use chardetng::EncodingDetector;
use encoding_rs::{
    Encoding, EUC_JP, ISO_2022_JP, SHIFT_JIS, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252,
};
use std::fmt;

/// 감지된 문자 코드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharCode {
    /// BOM 포함 UTF-8
    Utf8Bom,
    /// BOM 포함 UTF-16 (리틀 엔디언)
    Utf16Le,
    /// BOM 포함 UTF-16 (빅 엔디언)
    Utf16Be,
    /// 7비트 이스케이프 시퀀스 기반 JIS
    Iso2022Jp,
    /// BOM 없는 UTF-8
    Utf8,
    EucJp,
    ShiftJis,
    /// 순수 7비트 ASCII
    Ascii,
    /// 그 외 알려진 코드 페이지 (서유럽 ANSI)
    Windows1252,
}

impl CharCode {
    /// 표시용 이름
    pub fn name(&self) -> &'static str {
        match self {
            CharCode::Utf8Bom => "UTF-8 (BOM)",
            CharCode::Utf16Le => "UTF-16LE (BOM)",
            CharCode::Utf16Be => "UTF-16BE (BOM)",
            CharCode::Iso2022Jp => "ISO-2022-JP",
            CharCode::Utf8 => "UTF-8",
            CharCode::EucJp => "EUC-JP",
            CharCode::ShiftJis => "Shift_JIS",
            CharCode::Ascii => "ASCII",
            CharCode::Windows1252 => "windows-1252",
        }
    }

    /// 해당 문자 코드의 디코더
    pub fn encoding(&self) -> &'static Encoding {
        match self {
            CharCode::Utf8Bom | CharCode::Utf8 | CharCode::Ascii => UTF_8,
            CharCode::Utf16Le => UTF_16LE,
            CharCode::Utf16Be => UTF_16BE,
            CharCode::Iso2022Jp => ISO_2022_JP,
            CharCode::EucJp => EUC_JP,
            CharCode::ShiftJis => SHIFT_JIS,
            CharCode::Windows1252 => WINDOWS_1252,
        }
    }
}

impl fmt::Display for CharCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 인코딩 감지 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// 감지 성공: 문자 코드와 디코딩된 텍스트
    Detected { code: CharCode, text: String },
    /// 어떤 후보와도 일치하지 않음
    Failed,
}

impl Detection {
    /// 감지된 문자 코드 (실패 시 None)
    pub fn code(&self) -> Option<CharCode> {
        match self {
            Detection::Detected { code, .. } => Some(*code),
            Detection::Failed => None,
        }
    }
}

/// 바이트열에서 인코딩을 추정하는 감지기
///
/// 폴더 탐색과 분리되어 있으므로 다른 휴리스틱으로 교체할 수 있습니다.
pub trait Detector {
    fn detect(&self, bytes: &[u8]) -> Detection;
}

/// 일본어 텍스트에 맞춘 기본 감지기
///
/// 판정 순서:
/// 1. 빈 파일 → 실패
/// 2. BOM (UTF-8 / UTF-16LE / UTF-16BE)
/// 3. NUL 바이트나 제어 문자가 많은 바이너리 → 실패
/// 4. 7비트 데이터: JIS 이스케이프가 있으면 ISO-2022-JP, 없으면 ASCII
/// 5. 엄격한 UTF-8
/// 6. chardetng 통계 추정이 EUC-JP / Shift_JIS / windows-1252 중 하나이고
///    그 인코딩으로 오류 없이 디코딩되면 채택
#[derive(Debug, Clone, Copy, Default)]
pub struct JapaneseDetector;

impl Detector for JapaneseDetector {
    fn detect(&self, bytes: &[u8]) -> Detection {
        if bytes.is_empty() {
            return Detection::Failed;
        }

        if let Some(detection) = detect_bom(bytes) {
            return detection;
        }

        if looks_binary(bytes) {
            return Detection::Failed;
        }

        if bytes.is_ascii() {
            return detect_seven_bit(bytes);
        }

        detect_multibyte(bytes)
    }
}

/// ISO-2022-JP 에서 2바이트 문자 집합으로 전환하는 이스케이프 시퀀스
const JIS_ESCAPES: [&[u8]; 5] = [b"\x1b$B", b"\x1b$@", b"\x1b(J", b"\x1b(I", b"\x1b$(D"];

/// 바이너리로 간주하는 제어 문자 비율의 역수 (5%)
const CONTROL_RATIO_DIVISOR: usize = 20;

/// 잘못된 시퀀스를 허용하지 않는 디코딩
fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

fn detect_bom(bytes: &[u8]) -> Option<Detection> {
    let (code, bom_len) = if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        (CharCode::Utf8Bom, 3)
    } else if bytes.starts_with(&[0xFF, 0xFE]) {
        (CharCode::Utf16Le, 2)
    } else if bytes.starts_with(&[0xFE, 0xFF]) {
        (CharCode::Utf16Be, 2)
    } else {
        return None;
    };

    let detection = match decode_strict(code.encoding(), &bytes[bom_len..]) {
        Some(text) => Detection::Detected { code, text },
        None => Detection::Failed,
    };
    Some(detection)
}

fn is_suspicious_control(byte: u8) -> bool {
    // 탭, 개행, 폼피드, ESC, DOS EOF(0x1A)는 텍스트에서도 쓰임
    matches!(byte, 0x01..=0x08 | 0x0E..=0x19 | 0x1C..=0x1F | 0x7F)
}

fn looks_binary(bytes: &[u8]) -> bool {
    if bytes.contains(&0) {
        return true;
    }

    let suspicious = bytes.iter().filter(|&&b| is_suspicious_control(b)).count();
    suspicious * CONTROL_RATIO_DIVISOR > bytes.len()
}

fn detect_seven_bit(bytes: &[u8]) -> Detection {
    let has_jis_escape = JIS_ESCAPES
        .iter()
        .any(|esc| bytes.windows(esc.len()).any(|window| window == *esc));

    if has_jis_escape {
        return match decode_strict(ISO_2022_JP, bytes) {
            Some(text) => Detection::Detected {
                code: CharCode::Iso2022Jp,
                text,
            },
            None => Detection::Failed,
        };
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Detection::Detected {
            code: CharCode::Ascii,
            text: text.to_owned(),
        },
        Err(_) => Detection::Failed,
    }
}

fn detect_multibyte(bytes: &[u8]) -> Detection {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Detection::Detected {
            code: CharCode::Utf8,
            text: text.to_owned(),
        };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    // UTF-8 은 이미 걸러졌으므로 후보에서 제외
    let guessed = detector.guess(None, false);

    let code = if guessed == EUC_JP {
        CharCode::EucJp
    } else if guessed == SHIFT_JIS {
        CharCode::ShiftJis
    } else if guessed == WINDOWS_1252 {
        return detect_codepage(bytes);
    } else {
        return Detection::Failed;
    };

    match decode_strict(code.encoding(), bytes) {
        Some(text) => Detection::Detected { code, text },
        None => Detection::Failed,
    }
}

fn detect_codepage(bytes: &[u8]) -> Detection {
    match decode_strict(WINDOWS_1252, bytes) {
        // 0x81, 0x8D 등 미정의 바이트는 C1 제어 문자로 디코딩됨
        Some(text) if !text.chars().any(|c| ('\u{80}'..='\u{9f}').contains(&c)) => {
            Detection::Detected {
                code: CharCode::Windows1252,
                text,
            }
        }
        _ => Detection::Failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(bytes: &[u8]) -> Detection {
        JapaneseDetector.detect(bytes)
    }

    #[test]
    fn test_empty_is_failure() {
        assert_eq!(detect(b""), Detection::Failed);
    }

    #[test]
    fn test_ascii() {
        let detection = detect(b"hello, world\r\n");
        assert_eq!(detection.code(), Some(CharCode::Ascii));
    }

    #[test]
    fn test_utf8_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("テスト".as_bytes());

        assert_eq!(
            detect(&bytes),
            Detection::Detected {
                code: CharCode::Utf8Bom,
                text: "テスト".to_string()
            }
        );
    }

    #[test]
    fn test_utf16le_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "日本語".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }

        let detection = detect(&bytes);
        assert_eq!(
            detection,
            Detection::Detected {
                code: CharCode::Utf16Le,
                text: "日本語".to_string()
            }
        );
    }

    #[test]
    fn test_utf8_without_bom() {
        let detection = detect("こんにちは、世界".as_bytes());
        assert_eq!(detection.code(), Some(CharCode::Utf8));
    }

    #[test]
    fn test_shift_jis() {
        let (bytes, _, _) = SHIFT_JIS.encode("こんにちは。日本語のテキストです。");

        assert_eq!(
            detect(&bytes),
            Detection::Detected {
                code: CharCode::ShiftJis,
                text: "こんにちは。日本語のテキストです。".to_string()
            }
        );
    }

    #[test]
    fn test_euc_jp_hiragana_beats_halfwidth_reading() {
        // EUC-JP 히라가나는 Shift_JIS 로도 (반각 가타카나로) 읽힐 수 있음
        let (bytes, _, _) = EUC_JP.encode("こんにちは。日本語のテキストです。");

        let detection = detect(&bytes);
        assert_eq!(detection.code(), Some(CharCode::EucJp));
    }

    #[test]
    fn test_iso_2022_jp() {
        let (bytes, _, _) = ISO_2022_JP.encode("メモ: こんにちは");
        assert!(bytes.is_ascii());

        let detection = detect(&bytes);
        assert_eq!(
            detection,
            Detection::Detected {
                code: CharCode::Iso2022Jp,
                text: "メモ: こんにちは".to_string()
            }
        );
    }

    #[test]
    fn test_broken_iso_2022_jp_fails() {
        // 2바이트 모드에서 1바이트만 남은 채 ASCII 로 복귀
        assert_eq!(detect(b"\x1b$B$\x1b(B"), Detection::Failed);
    }

    #[test]
    fn test_windows_1252_fallback() {
        let detection = detect(b"caf\xe9 au lait");
        assert_eq!(
            detection,
            Detection::Detected {
                code: CharCode::Windows1252,
                text: "café au lait".to_string()
            }
        );
    }

    #[test]
    fn test_binary_is_failure() {
        let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01";
        assert_eq!(detect(png), Detection::Failed);
    }

    #[test]
    fn test_control_heavy_is_failure() {
        assert_eq!(detect(b"\x01\x02\x03\x04abc"), Detection::Failed);
    }

    #[test]
    fn test_undecodable_high_bytes_fail() {
        // 어느 후보로도 엄격하게 디코딩되지 않는 바이트 (windows-1252 미정의 0x81)
        assert_eq!(detect(b"\x81\x81\x81"), Detection::Failed);
    }

    #[test]
    fn test_char_code_display() {
        assert_eq!(CharCode::ShiftJis.to_string(), "Shift_JIS");
        assert_eq!(CharCode::Utf8Bom.to_string(), "UTF-8 (BOM)");
    }
}
