use std::fmt;

use thiserror::Error;

/// 解码过程中可能出现的结构性错误
///
/// 这些错误只在 `Outcome` 里出现，`CgiRequest::parse` 从不把它们抛给调用者。
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("query length {len} outside [1, {max})")]
    QueryLength { len: usize, max: usize },

    #[error("declared body length {declared} exceeds limit {limit}")]
    BodyTooLarge { declared: usize, limit: usize },

    #[error("short read: expected {expected} bytes, got {got}")]
    ShortRead { expected: usize, got: usize },

    #[error("content type has no boundary attribute")]
    MissingBoundary,

    #[error("body read timed out")]
    Timeout,

    #[error("cannot allocate {requested} bytes")]
    Alloc { requested: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// 单个解码阶段（GET / POST / 子解码）的结果
#[derive(Debug)]
pub enum Outcome {
    /// 阶段不适用，例如没有 QUERY_STRING
    Skipped,
    /// 全部 token / block 都被完整解析
    Decoded { fields: usize },
    /// 有容错分支被触发，结果是尽力而为的
    Partial { fields: usize, tolerated: usize },
    /// 输入在结构上被拒绝，本阶段不贡献任何字段
    Rejected(DecodeError),
    /// 内部缓冲区分配失败
    Failed(DecodeError),
}

impl Outcome {
    /// 根据计数构造 Decoded 或 Partial
    pub fn from_counts(fields: usize, tolerated: usize) -> Self {
        if tolerated == 0 {
            Outcome::Decoded { fields }
        } else {
            Outcome::Partial { fields, tolerated }
        }
    }

    pub fn fields(&self) -> usize {
        match self {
            Outcome::Decoded { fields } | Outcome::Partial { fields, .. } => *fields,
            _ => 0,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped)
    }

    /// 分配失败走 Failed，其余错误一律视为结构性拒绝
    pub fn from_error(err: DecodeError) -> Self {
        match err {
            DecodeError::Alloc { .. } => Outcome::Failed(err),
            other => Outcome::Rejected(other),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Skipped => write!(f, "skipped"),
            Outcome::Decoded { fields } => write!(f, "decoded {} field(s)", fields),
            Outcome::Partial { fields, tolerated } => {
                write!(f, "decoded {} field(s), tolerated {} malformed", fields, tolerated)
            }
            Outcome::Rejected(e) => write!(f, "rejected: {}", e),
            Outcome::Failed(e) => write!(f, "failed: {}", e),
        }
    }
}
