//! `%XX` 转义与 `+` 空格替换
//!
//! 解码是宽松的：非法转义不会报错，而是原样拷贝并计数。

/// 解码结果，`malformed` 为遇到的非法转义个数
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Unescaped {
    pub bytes: Vec<u8>,
    pub malformed: usize,
}

impl Unescaped {
    pub fn into_string(self) -> String {
        match String::from_utf8(self.bytes) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }
}

#[inline]
fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn decode_with(input: &[u8], plus_as_space: bool) -> Unescaped {
    let mut bytes = Vec::with_capacity(input.len());
    let mut malformed = 0;
    let mut i = 0;

    while i < input.len() {
        match input[i] {
            b'%' => {
                // '%' 之后的两个字节总是被当作转义体消费掉
                let pair = input
                    .get(i + 1..i + 3)
                    .and_then(|e| Some((hex_val(e[0])?, hex_val(e[1])?)));
                match pair {
                    Some((hi, lo)) => bytes.push((hi << 4) | lo),
                    None => {
                        let end = (i + 3).min(input.len());
                        bytes.extend_from_slice(&input[i..end]);
                        malformed += 1;
                    }
                }
                i += 3;
            }
            b'+' if plus_as_space => {
                bytes.push(b' ');
                i += 1;
            }
            b => {
                bytes.push(b);
                i += 1;
            }
        }
    }

    Unescaped { bytes, malformed }
}

/// 只处理 `%XX`
pub fn unescape(input: &[u8]) -> Unescaped {
    decode_with(input, false)
}

/// 表单值解码：`%XX` 与 `+` 在同一遍里处理，解出来的 `%2B` 仍是 `+`
pub fn decode_value(input: &[u8]) -> Unescaped {
    decode_with(input, true)
}
