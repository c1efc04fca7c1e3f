use once_cell::sync::Lazy;
use regex::bytes::Regex;
use tracing::{debug, trace};

use crate::{
    cgi::{params::ParamMap, types::Outcome},
    protocol::content_type,
};

// 头部匹配全部在 block 的 header 区（第一个空行之前）进行
const C_DISP: &str = r#"(?i-u)content-disposition:[ \t]*form-data;[^\n]*?\bname="([^"]*)""#;
const C_FILE: &str = r#"(?i-u)content-disposition:[^\n]*?\bfilename="([^"]*)""#;
const C_TYPE: &str = r"(?i-u)content-type:[ \t]*([^\n]+)";
const C_CODE: &str = r"(?i-u)content-transfer-encoding:[ \t]*([^\n]+)";

static C_DISP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(C_DISP).unwrap());
static C_FILE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(C_FILE).unwrap());
static C_TYPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(C_TYPE).unwrap());
static C_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(C_CODE).unwrap());

const BLANK_LINE: &[u8] = b"\n\n";

/// 分隔符，已带上 `--` 前缀
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary(Vec<u8>);

impl Boundary {
    /// `token` 为 Content-Type 中 boundary= 的值
    pub fn new(token: &str) -> Self {
        let mut bytes = Vec::with_capacity(token.len() + 2);
        bytes.extend_from_slice(b"--");
        bytes.extend_from_slice(token.as_bytes());
        Boundary(bytes)
    }

    pub fn from_content_type(value: &str) -> Option<Self> {
        content_type::boundary(value).map(|token| Self::new(&token))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// 朴素子串查找
pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// 依次产出两个相邻分隔符之间的 block
///
/// 第一次出现的分隔符之前的内容（preamble）被忽略；
/// 最后一个分隔符之后没有闭合的残段不会被产出。
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    body: &'a [u8],
    boundary: &'a [u8],
    cursor: Option<usize>,
}

impl<'a> Blocks<'a> {
    pub fn new(body: &'a [u8], boundary: &'a Boundary) -> Self {
        let boundary = boundary.as_bytes();
        Self {
            body,
            boundary,
            cursor: find(body, boundary),
        }
    }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.cursor?;
        let mut beg = start + self.boundary.len();
        // 跳过分隔符所在行的换行
        if self.body.get(beg) == Some(&b'\n') {
            beg += 1;
        }

        match find(&self.body[beg..], self.boundary) {
            Some(offset) => {
                let end = beg + offset;
                self.cursor = Some(end);
                trace!(beg, end, "multipart block");
                Some(&self.body[beg..end])
            }
            None => {
                self.cursor = None;
                None
            }
        }
    }
}

/// 一个 multipart 段落的解析结果
///
/// 只有 name / value 会进入参数表，其余字段仅供调用者自行使用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub value: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub transfer_encoding: Option<String>,
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn capture(re: &Regex, haystack: &[u8]) -> Option<String> {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| lossy(m.as_bytes()))
}

/// 空行之后直到 block 结尾的内容，去掉一个结尾换行
fn content(block: &[u8]) -> Option<&[u8]> {
    let pos = find(block, BLANK_LINE)?;
    let rest = &block[pos + BLANK_LINE.len()..];
    Some(rest.strip_suffix(b"\n").unwrap_or(rest))
}

/// 解析单个 block；缺少非空 name 或非空 value 时返回 None
pub fn interpret(block: &[u8]) -> Option<Part> {
    let head = match find(block, BLANK_LINE) {
        Some(pos) => &block[..pos],
        None => block,
    };

    let name = capture(&C_DISP_RE, head).filter(|n| !n.is_empty())?;
    let value = content(block).filter(|v| !v.is_empty())?;

    Some(Part {
        name,
        value: lossy(value),
        filename: capture(&C_FILE_RE, head),
        content_type: capture(&C_TYPE_RE, head).map(|s| s.trim_end().to_string()),
        transfer_encoding: capture(&C_CODE_RE, head).map(|s| s.trim_end().to_string()),
    })
}

/// 所有可解析的 part，不可解析的 block 被静默跳过
pub fn parts<'a>(body: &'a [u8], boundary: &'a Boundary) -> impl Iterator<Item = Part> + 'a {
    Blocks::new(body, boundary).filter_map(interpret)
}

/// 解析整个 multipart body 并把 name / value 追加到 `out`
///
/// 分隔符从未出现时不算错误，结果为 0 个字段。
pub fn decode(body: &[u8], boundary: &Boundary, out: &mut ParamMap) -> Outcome {
    let mut fields = 0;
    let mut tolerated = 0;

    for block in Blocks::new(body, boundary) {
        match interpret(block) {
            Some(part) => {
                debug!(key = %part.name, value = %part.value, "form-decoded");
                out.add(part.name, part.value);
                fields += 1;
            }
            None => tolerated += 1,
        }
    }

    Outcome::from_counts(fields, tolerated)
}
