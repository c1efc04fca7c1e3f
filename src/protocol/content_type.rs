pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub const FORM_DATA: &str = "multipart/form-data";

/// POST body 的处理方式，按 CONTENT_TYPE 前缀（区分大小写）决定
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BodyKind {
    UrlEncoded,
    FormData,
    /// 其他类型（JSON、二进制上传等），原样保存
    Raw,
}

impl BodyKind {
    pub fn from_content_type(s: &str) -> Self {
        if s.starts_with(FORM_URLENCODED) {
            BodyKind::UrlEncoded
        } else if s.starts_with(FORM_DATA) {
            BodyKind::FormData
        } else {
            BodyKind::Raw
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyKind::UrlEncoded => FORM_URLENCODED,
            BodyKind::FormData => FORM_DATA,
            BodyKind::Raw => "raw",
        }
    }
}

/// ContentType 结构
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentType {
    pub mime: String,
    pub parameters: Vec<(String, String)>,
}

impl ContentType {
    pub fn parse(s: &str) -> Self {
        let mut parts = s.split(';');
        let mime = parts.next().unwrap_or("").trim().to_string();

        ContentType {
            mime,
            parameters: parts
                .filter(|p| !p.trim().is_empty())
                .map(|p| {
                    let mut kv = p.trim().splitn(2, '=');
                    let k = kv.next().unwrap_or("").trim().to_string();
                    let v = kv.next().unwrap_or("").trim().trim_matches('"').to_string();
                    (k, v)
                })
                .collect(),
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

const BOUNDARY_ATTR: &str = "boundary=";

/// 取出 boundary 属性值（不含 `--` 前缀），缺失或为空时返回 None
///
/// 先按 `;` 分隔的参数查找；找不到时退回到在整个字符串里搜索
/// `boundary=`，兼容 `multipart/form-data boundary=XYZ` 这类写法。
pub fn boundary(content_type: &str) -> Option<String> {
    let parsed = ContentType::parse(content_type);
    let value = match parsed.parameter("boundary") {
        Some(v) => v.to_string(),
        None => {
            let pos = content_type.find(BOUNDARY_ATTR)?;
            let rest = &content_type[pos + BOUNDARY_ATTR.len()..];
            let end = rest
                .find(|c: char| c == ';' || c.is_ascii_whitespace())
                .unwrap_or(rest.len());
            rest[..end].trim_matches('"').to_string()
        }
    };
    Some(value).filter(|b| !b.is_empty())
}
