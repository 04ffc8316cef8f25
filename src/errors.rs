use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcodeError {
    InvalidInput(String),
    InvalidSymbol(String),
    AllocationExhausted(String),
    StoreConflict(String),
    StoreUnavailable(String),
    CorruptTarget(String),
    Config(String),
}

impl ShortcodeError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortcodeError::InvalidInput(_) => "E001",
            ShortcodeError::InvalidSymbol(_) => "E002",
            ShortcodeError::AllocationExhausted(_) => "E003",
            ShortcodeError::StoreConflict(_) => "E004",
            ShortcodeError::StoreUnavailable(_) => "E005",
            ShortcodeError::CorruptTarget(_) => "E006",
            ShortcodeError::Config(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortcodeError::InvalidInput(_) => "Invalid Input",
            ShortcodeError::InvalidSymbol(_) => "Invalid Symbol",
            ShortcodeError::AllocationExhausted(_) => "Allocation Exhausted",
            ShortcodeError::StoreConflict(_) => "Store Conflict",
            ShortcodeError::StoreUnavailable(_) => "Store Unavailable",
            ShortcodeError::CorruptTarget(_) => "Corrupt Target",
            ShortcodeError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortcodeError::InvalidInput(msg) => msg,
            ShortcodeError::InvalidSymbol(msg) => msg,
            ShortcodeError::AllocationExhausted(msg) => msg,
            ShortcodeError::StoreConflict(msg) => msg,
            ShortcodeError::StoreUnavailable(msg) => msg,
            ShortcodeError::CorruptTarget(msg) => msg,
            ShortcodeError::Config(msg) => msg,
        }
    }

    /// 是否为调用方输入错误（其余均视为服务端故障）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ShortcodeError::InvalidInput(_) | ShortcodeError::InvalidSymbol(_)
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortcodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortcodeError {}

// 便捷的构造函数
impl ShortcodeError {
    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        ShortcodeError::InvalidInput(msg.into())
    }

    pub fn invalid_symbol<T: Into<String>>(msg: T) -> Self {
        ShortcodeError::InvalidSymbol(msg.into())
    }

    pub fn allocation_exhausted<T: Into<String>>(msg: T) -> Self {
        ShortcodeError::AllocationExhausted(msg.into())
    }

    pub fn store_conflict<T: Into<String>>(msg: T) -> Self {
        ShortcodeError::StoreConflict(msg.into())
    }

    pub fn store_unavailable<T: Into<String>>(msg: T) -> Self {
        ShortcodeError::StoreUnavailable(msg.into())
    }

    pub fn corrupt_target<T: Into<String>>(msg: T) -> Self {
        ShortcodeError::CorruptTarget(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ShortcodeError::Config(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for ShortcodeError {
    fn from(err: sea_orm::DbErr) -> Self {
        ShortcodeError::StoreUnavailable(err.to_string())
    }
}

impl From<config::ConfigError> for ShortcodeError {
    fn from(err: config::ConfigError) -> Self {
        ShortcodeError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ShortcodeError {
    fn from(err: toml::ser::Error) -> Self {
        ShortcodeError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortcodeError>;
