//! 配置值验证模块
//!
//! 启动前拒绝会让分配器无法工作的组合。

use strum::IntoEnumIterator;

use super::{CacheType, SeedStrategy, SequenceKind, StaticConfig};
use crate::errors::{Result, ShortcodeError};
use crate::sequence;
use crate::storage::infer_backend_from_url;
use crate::utils::base62;

const LOG_FORMATS: &[&str] = &["text", "json"];

/// 校验整份静态配置
///
/// - `code_length` 必须在 1..=11（u64 最长编码 11 位）
/// - `max_attempts` 至少为 1
/// - 序列起始值的编码长度不得短于 `code_length`，否则"过短重取"会长时间空转
/// - 数据库序列需要 SQL 存储，且种子不能是时间戳（多进程起始值不同会发放重复值）
/// - 启用缓存时容量必须大于 0
/// - 日志格式只能是 text 或 json
pub fn validate_config(config: &StaticConfig) -> Result<()> {
    let code_length = config.allocator.code_length;
    if code_length == 0 || code_length > base62::MAX_ENCODED_LEN {
        return Err(ShortcodeError::config(format!(
            "allocator.code_length must be between 1 and {}, got {}",
            base62::MAX_ENCODED_LEN,
            code_length
        )));
    }

    if config.allocator.max_attempts == 0 {
        return Err(ShortcodeError::config(
            "allocator.max_attempts must be at least 1",
        ));
    }

    let start = sequence::initial_value(&config.sequence, code_length)?;
    if base62::encoded_len(start) < code_length {
        return Err(ShortcodeError::config(format!(
            "Sequence starts at {} which encodes to {} characters; at least {} are required. Use seed = \"aligned\" or a larger start",
            start,
            base62::encoded_len(start),
            code_length
        )));
    }

    let backend = infer_backend_from_url(&config.database.database_url)?;
    if config.sequence.kind == SequenceKind::Database {
        if backend == "memory" {
            return Err(ShortcodeError::config(
                "sequence.kind = \"database\" requires a SQL database_url",
            ));
        }
        if config.sequence.seed == SeedStrategy::Timestamp {
            let valid: Vec<String> = SeedStrategy::iter()
                .filter(|s| *s != SeedStrategy::Timestamp)
                .map(|s| s.to_string())
                .collect();
            return Err(ShortcodeError::config(format!(
                "sequence.kind = \"database\" needs a stable seed. Valid options: {:?}",
                valid
            )));
        }
    }

    if config.cache.cache_type == CacheType::Memory && config.cache.max_capacity == 0 {
        return Err(ShortcodeError::config(
            "cache.max_capacity must be greater than 0 when caching is enabled",
        ));
    }

    if !LOG_FORMATS.contains(&config.logging.format.as_str()) {
        return Err(ShortcodeError::config(format!(
            "Invalid logging.format '{}'. Valid options: {:?}",
            config.logging.format, LOG_FORMATS
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_config_error(config: &StaticConfig, needle: &str) {
        match validate_config(config) {
            Err(ShortcodeError::Config(msg)) => {
                assert!(msg.contains(needle), "'{}' does not mention '{}'", msg, needle)
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&StaticConfig::default()).is_ok());
    }

    #[test]
    fn test_code_length_bounds() {
        let mut config = StaticConfig::default();
        config.allocator.code_length = 0;
        assert_config_error(&config, "code_length");

        config.allocator.code_length = 12;
        assert_config_error(&config, "code_length");
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = StaticConfig::default();
        config.allocator.max_attempts = 0;
        assert_config_error(&config, "max_attempts");
    }

    #[test]
    fn test_fixed_seed_too_small_for_length() {
        let mut config = StaticConfig::default();
        config.sequence.seed = SeedStrategy::Fixed;
        config.sequence.start = Some(1);
        assert_config_error(&config, "encodes to 1 characters");

        config.sequence.start = Some(base62::min_value_with_len(7).unwrap());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_timestamp_seed_too_short_for_long_codes() {
        let mut config = StaticConfig::default();
        config.allocator.code_length = 9;
        assert_config_error(&config, "seed = \"aligned\"");

        config.sequence.seed = SeedStrategy::Aligned;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_database_sequence_requirements() {
        let mut config = StaticConfig::default();
        config.sequence.kind = SequenceKind::Database;
        config.sequence.seed = SeedStrategy::Aligned;
        assert_config_error(&config, "SQL database_url");

        config.database.database_url = "sqlite://codes.db".to_string();
        assert!(validate_config(&config).is_ok());

        config.sequence.seed = SeedStrategy::Timestamp;
        assert_config_error(&config, "stable seed");
    }

    #[test]
    fn test_unknown_database_url() {
        let mut config = StaticConfig::default();
        config.database.database_url = "redis://localhost".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(ShortcodeError::Config(_))
        ));
    }

    #[test]
    fn test_cache_capacity() {
        let mut config = StaticConfig::default();
        config.cache.max_capacity = 0;
        assert_config_error(&config, "max_capacity");

        config.cache.cache_type = CacheType::Disabled;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_log_format() {
        let mut config = StaticConfig::default();
        config.logging.format = "xml".to_string();
        assert_config_error(&config, "logging.format");
    }
}
