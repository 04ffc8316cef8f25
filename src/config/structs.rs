use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

use crate::errors::Result;

/// 插入阶段唯一约束冲突的处理方式
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, AsRefStr, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConflictPolicy {
    /// 直接返回 `StoreConflict`
    #[default]
    Fail,
    /// 视为一次失败尝试，继续分配（受同一尝试上限约束）
    Retry,
}

/// 序列实现
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, AsRefStr, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SequenceKind {
    /// 进程内原子计数器
    #[default]
    Atomic,
    /// 数据库计数器行，多进程共享
    Database,
}

/// 序列起始值策略
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, AsRefStr, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SeedStrategy {
    /// 当前 Unix 毫秒时间戳
    #[default]
    Timestamp,
    /// 62^(L-1)，编码长度恰好为 L 的最小值
    Aligned,
    /// 使用 `sequence.start`
    Fixed,
}

/// 缓存类型
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, AsRefStr, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CacheType {
    #[default]
    Memory,
    #[serde(rename = "none")]
    #[strum(serialize = "none")]
    Disabled,
}

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - allocator: 短码长度、尝试上限、冲突策略
/// - sequence: 序列实现与起始值
/// - database: 存储连接配置
/// - cache: 解析缓存配置
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub allocator: AllocatorConfig,
    #[serde(default)]
    pub sequence: SequenceConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从当前目录的 `config.toml` 和环境变量加载配置
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    /// 从指定 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > TOML 文件 > 默认值
    /// ENV 前缀：SC，分隔符：__
    /// 示例：SC__ALLOCATOR__CODE_LENGTH=8
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// 同 [`StaticConfig::load_from`]，但可以用给定的变量表代替进程环境
    pub fn load_with_env(path: &Path, env: Option<config::Map<String, String>>) -> Result<Self> {
        use config::{Config, Environment, File};

        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("SC")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        let config = settings.try_deserialize::<StaticConfig>()?;
        if path.exists() {
            eprintln!("[INFO] Configuration loaded from: {}", path.display());
        }
        Ok(config)
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> Result<String> {
        Ok(toml::to_string_pretty(&Self::default())?)
    }

    /// 校验配置，详见 [`super::validators::validate_config`]
    pub fn validate(&self) -> Result<()> {
        super::validators::validate_config(self)
    }
}

/// 分配器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocatorConfig {
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
}

/// 序列配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SequenceConfig {
    #[serde(default)]
    pub kind: SequenceKind,
    #[serde(default)]
    pub seed: SeedStrategy,
    #[serde(default)]
    pub start: Option<u64>,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    /// 单次读操作超时（秒），0 表示不限制
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// 解析缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(rename = "type")]
    #[serde(default)]
    pub cache_type: CacheType,
    #[serde(default = "default_cache_capacity")]
    pub max_capacity: u64,
    #[serde(default = "default_cache_ttl")]
    pub default_ttl: u64,
    /// 负缓存 TTL（秒），0 表示不缓存未命中
    #[serde(default = "default_negative_ttl")]
    pub negative_ttl: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_code_length() -> usize {
    7
}

fn default_max_attempts() -> u32 {
    5
}

fn default_database_url() -> String {
    "memory://".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_cache_capacity() -> u64 {
    10000
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_negative_ttl() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            max_attempts: default_max_attempts(),
            conflict_policy: ConflictPolicy::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_type: CacheType::default(),
            max_capacity: default_cache_capacity(),
            default_ttl: default_cache_ttl(),
            negative_ttl: default_negative_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
