//! 패턴 매칭 모듈
//!
//! glob 패턴을 사용한 제외 대상 필터링을 담당합니다.

use glob::Pattern;

use crate::error::{ConvertError, Result};

/// 컴파일된 제외 패턴 목록
#[derive(Debug, Default, Clone)]
pub struct PatternMatcher {
    patterns: Vec<Pattern>,
}

impl PatternMatcher {
    /// 새 패턴 매처 생성
    ///
    /// # Arguments
    /// * `patterns` - 쉼표로 구분된 글로브 패턴 문자열 (None이면 아무것도 제외하지 않음)
    ///
    /// # Returns
    /// 컴파일된 `PatternMatcher` 또는 에러
    ///
    /// # Examples
    /// ```
    /// use econvert::pattern::PatternMatcher;
    ///
    /// let matcher = PatternMatcher::new(Some("*.min.js, node_modules".to_string())).unwrap();
    /// assert!(matcher.matches("app.min.js"));
    /// assert!(matcher.matches("node_modules"));
    /// assert!(!matcher.matches("app.js"));
    /// ```
    pub fn new(patterns: Option<String>) -> Result<Self> {
        let compiled = match patterns {
            Some(ref list) => list
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(|p| {
                    Pattern::new(p).map_err(|_| ConvertError::InvalidPattern {
                        pattern: p.to_string(),
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(Self { patterns: compiled })
    }

    /// 항목 이름이 제외 패턴 중 하나와 일치하는지 확인
    ///
    /// # Arguments
    /// * `name` - 검사할 파일 또는 폴더 이름
    ///
    /// # Returns
    /// 패턴 일치 여부 (패턴이 없으면 항상 false)
    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(name))
    }

    /// 패턴이 설정되어 있는지 확인
    pub fn has_pattern(&self) -> bool {
        !self.patterns.is_empty()
    }
}
