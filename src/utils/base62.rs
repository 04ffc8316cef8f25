//! Base62 编解码
//!
//! 字母表顺序为 `0-9a-z A-Z`，索引 0 为 `'0'`。编码时最高位在前。

use crate::errors::{Result, ShortcodeError};

/// 编码字母表
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// 基数
pub const BASE: u64 = ALPHABET.len() as u64;

/// u64::MAX 编码后的长度
pub const MAX_ENCODED_LEN: usize = 11;

/// 将整数编码为 base62 字符串
pub fn encode(mut n: u64) -> String {
    if n == 0 {
        return (ALPHABET[0] as char).to_string();
    }

    let mut digits = Vec::with_capacity(MAX_ENCODED_LEN);
    while n > 0 {
        digits.push(ALPHABET[(n % BASE) as usize]);
        n /= BASE;
    }
    // 低位先生成，需要反转
    digits.reverse();

    // 字母表全部为 ASCII
    digits.into_iter().map(char::from).collect()
}

/// 将 base62 字符串解码为整数
///
/// 任意字符不在字母表中时返回 `InvalidSymbol`；
/// 空串或超出 u64 范围返回 `InvalidInput`。
pub fn decode(s: &str) -> Result<u64> {
    if s.is_empty() {
        return Err(ShortcodeError::invalid_input("Cannot decode an empty string"));
    }

    let mut value: u64 = 0;
    for (position, ch) in s.chars().enumerate() {
        let digit = symbol_index(ch).ok_or_else(|| {
            ShortcodeError::invalid_symbol(format!(
                "Invalid character '{}' at position {} in '{}'",
                ch, position, s
            ))
        })?;

        value = value
            .checked_mul(BASE)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| {
                ShortcodeError::invalid_input(format!("'{}' overflows a 64-bit identifier", s))
            })?;
    }

    Ok(value)
}

/// 字符在字母表中的索引
pub fn symbol_index(ch: char) -> Option<u64> {
    match ch {
        '0'..='9' => Some(ch as u64 - '0' as u64),
        'a'..='z' => Some(ch as u64 - 'a' as u64 + 10),
        'A'..='Z' => Some(ch as u64 - 'A' as u64 + 36),
        _ => None,
    }
}

/// 判断字符串是否全部由字母表字符组成
pub fn is_base62(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| symbol_index(c).is_some())
}

/// 编码长度恰好为 `len` 的最小整数
///
/// `len` 超过 [`MAX_ENCODED_LEN`] 或为 0 时返回 `None`。
pub fn min_value_with_len(len: usize) -> Option<u64> {
    match len {
        0 => None,
        1 => Some(0),
        _ if len > MAX_ENCODED_LEN => None,
        _ => BASE.checked_pow((len - 1) as u32),
    }
}

/// 编码后的字符数，不实际分配字符串
pub fn encoded_len(mut n: u64) -> usize {
    let mut len = 1;
    while n >= BASE {
        n /= BASE;
        len += 1;
    }
    len
}
