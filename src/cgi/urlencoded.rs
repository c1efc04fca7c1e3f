use tracing::{debug, warn};

use crate::cgi::{
    params::ParamMap,
    percent,
    types::{DecodeError, Outcome},
};

/// 一个 `&` 分隔 token 拆出的 key / value 原始字节
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub key: &'a [u8],
    pub value: &'a [u8],
    /// token 不完整（缺少 `=`、以 `=` 开头、value 被空白截断）
    pub tolerated: bool,
}

/// 按 “key 取到第一个 `=` 为止，value 取其后的非空白串” 拆分 token
pub fn split_token(token: &[u8]) -> Token<'_> {
    match token.iter().position(|&b| b == b'=') {
        // key 为空时整个 token 只贡献一对空串
        Some(0) => Token {
            key: b"",
            value: b"",
            tolerated: true,
        },
        Some(pos) => {
            let rest = &token[pos + 1..];
            let start = rest
                .iter()
                .position(|b| !b.is_ascii_whitespace())
                .unwrap_or(rest.len());
            let rest = &rest[start..];
            let end = rest
                .iter()
                .position(|b| b.is_ascii_whitespace())
                .unwrap_or(rest.len());
            Token {
                key: &token[..pos],
                value: &rest[..end],
                tolerated: start > 0 || end < rest.len(),
            }
        }
        None => Token {
            key: token,
            value: b"",
            tolerated: true,
        },
    }
}

/// 解析 `k1=v1&k2=v2` 并追加到 `out`
///
/// 长度不在 `[1, max_len)` 内的输入被整体拒绝，不写入任何字段。
/// key 原样保留，value 做 `%XX` 和 `+` 解码。
pub fn decode(input: &[u8], max_len: usize, out: &mut ParamMap) -> Outcome {
    if input.is_empty() || input.len() >= max_len {
        warn!(len = input.len(), max = max_len, "url-encoded input rejected");
        return Outcome::Rejected(DecodeError::QueryLength {
            len: input.len(),
            max: max_len,
        });
    }

    let mut fields = 0;
    let mut tolerated = 0;

    for raw in input.split(|&b| b == b'&').filter(|t| !t.is_empty()) {
        let token = split_token(raw);
        let value = percent::decode_value(token.value);
        if token.tolerated || value.malformed > 0 {
            tolerated += 1;
        }

        let key = String::from_utf8_lossy(token.key).into_owned();
        let value = value.into_string();
        debug!(key = %key, value = %value, "url-decoded");

        out.add(key, value);
        fields += 1;
    }

    Outcome::from_counts(fields, tolerated)
}

pub fn decode_str(input: &str, max_len: usize, out: &mut ParamMap) -> Outcome {
    decode(input.as_bytes(), max_len, out)
}
