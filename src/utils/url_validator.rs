//! URL 验证模块
//!
//! 分配时要求 http(s) 绝对地址；解析时只要求存量数据仍是合法的绝对 URI。
//!
//! `Url::parse` 会把非法字符百分号编码后接受，而存储的是原始字符串，
//! 所以解析之前先按 RFC 3986 检查原始字符。

use url::Url;

/// URL 验证错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    InvalidFormat(String),
    IllegalCharacter { ch: char, index: usize },
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
            Self::IllegalCharacter { ch, index } => {
                write!(f, "Illegal character {:?} at index {}", ch, index)
            }
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 验证新目标地址并返回去除首尾空白后的结果
///
/// 检查项目：
/// 1. 去除空白后不为空
/// 2. 必须以小写的 http:// 或 https:// 开头
/// 3. 不含 URI 中不允许原样出现的字符
/// 4. URL 格式有效
pub fn validate_target(url: &str) -> Result<&str, UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        let proto = url
            .split(':')
            .next()
            .map(|s| format!("{}:", s))
            .unwrap_or_default();
        return Err(UrlValidationError::InvalidProtocol(proto));
    }

    check_uri_characters(url)?;
    Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    Ok(url)
}

/// 验证已存储的目标地址是否仍可用于重定向
///
/// 存储层是外部系统，可能含有历史数据，这里只检查是否为绝对 URI，不限制协议。
pub fn validate_stored_target(url: &str) -> Result<(), UrlValidationError> {
    if url.trim().is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }
    check_uri_characters(url)?;
    Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;
    Ok(())
}

/// 拒绝 RFC 3986 不允许原样出现的字符和残缺的百分号转义
///
/// 非 ASCII 字符放行（IRI），由存储方按原样保存。
fn check_uri_characters(url: &str) -> Result<(), UrlValidationError> {
    let bytes = url.as_bytes();
    for (index, ch) in url.char_indices() {
        let illegal = match ch {
            ' ' | '<' | '>' | '"' | '{' | '}' | '|' | '\\' | '^' | '`' => true,
            '%' => !(bytes.get(index + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(index + 2).is_some_and(u8::is_ascii_hexdigit)),
            c => c.is_control() || c.is_whitespace(),
        };
        if illegal {
            return Err(UrlValidationError::IllegalCharacter { ch, index });
        }
    }
    Ok(())
}
