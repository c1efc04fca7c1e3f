/// 拆分 Cookie 头，保留顺序和重复项
///
/// 空片段与没有 `=` 的片段被忽略。
pub fn parse_cookies(header_value: &str) -> Vec<(String, String)> {
    let mut cookies = Vec::new();
    for pair in header_value.split(';') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        let mut kv = pair.splitn(2, '=');
        if let (Some(k), Some(v)) = (kv.next(), kv.next()) {
            let k = k.trim();
            if !k.is_empty() {
                cookies.push((k.to_string(), v.trim().to_string()));
            }
        }
    }
    cookies
}
