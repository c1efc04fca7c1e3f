use std::io::Read;

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

use crate::{
    cgi::{
        config::CgiConfig,
        cookie::parse_cookies,
        meta::{
            CONTENT_LENGTH, CONTENT_TYPE, EnvSource, HTTP_COOKIES, META_FIELDS, MetaSource,
            QUERY_STRING, REQUEST_METHOD,
        },
        multipart::{self, Boundary},
        params::ParamMap,
        types::{DecodeError, Outcome},
        urlencoded,
    },
    protocol::{content_type::BodyKind, method::HttpMethod},
};

/// 一次完整解码的结果
#[derive(Debug)]
pub struct Decoded {
    pub params: ParamMap,
    pub get: Outcome,
    pub post: Outcome,
    /// 非表单类 body 的原始字节（未剔除 '\r'），仅在原样保存分支时存在
    pub raw: Option<Vec<u8>>,
    empty_value: String,
}

impl Decoded {
    /// 0 表示成功，-1 表示有阶段因分配失败而中止
    pub fn status(&self) -> i32 {
        if self.get.is_failed() || self.post.is_failed() {
            -1
        } else {
            0
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status() == 0
    }

    pub fn method(&self) -> Option<HttpMethod> {
        self.params.first(REQUEST_METHOD).and_then(HttpMethod::from_str)
    }

    /// 解析 HTTP_COOKIES；cookie 不会写回参数表
    pub fn cookies(&self) -> Vec<(String, String)> {
        match self.params.first(HTTP_COOKIES) {
            Some(raw) if raw != self.empty_value => parse_cookies(raw),
            _ => Vec::new(),
        }
    }

    pub fn into_params(self) -> ParamMap {
        self.params
    }
}

/// 宽松的整数解析：跳过前导空白，取开头的数字，其余忽略
///
/// 没有数字或为负数时得到 0，溢出时饱和到 usize::MAX。
pub fn parse_content_length(s: &str) -> usize {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];

    if negative || digits.is_empty() {
        return 0;
    }
    digits.parse::<usize>().unwrap_or(usize::MAX)
}

fn alloc(len: usize) -> Result<Vec<u8>, DecodeError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| DecodeError::Alloc { requested: len })?;
    Ok(buf)
}

fn check_len(got: usize, expected: usize) -> Result<(), DecodeError> {
    if got != expected {
        return Err(DecodeError::ShortRead { expected, got });
    }
    Ok(())
}

/// 请求解码器：元数据 → GET → POST，三个阶段各自容错
#[derive(Debug, Clone, Default)]
pub struct CgiRequest {
    config: CgiConfig,
}

impl CgiRequest {
    pub fn new(config: CgiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CgiConfig {
        &self.config
    }

    /// 只返回参数表
    pub fn parse<S, R>(&self, meta: &S, body: R) -> ParamMap
    where
        S: MetaSource + ?Sized,
        R: Read,
    {
        self.decode(meta, body).params
    }

    pub fn decode<S, R>(&self, meta: &S, body: R) -> Decoded
    where
        S: MetaSource + ?Sized,
        R: Read,
    {
        let (params, get, declaration) = self.begin(meta);
        let body = declaration
            .map(|(content_type, len)| (content_type, self.read_body(body, len)));
        self.complete(params, get, body)
    }

    pub async fn parse_async<S, R>(&self, meta: &S, body: R) -> ParamMap
    where
        S: MetaSource + ?Sized,
        R: AsyncRead + Unpin,
    {
        self.decode_async(meta, body).await.params
    }

    /// 与 decode 相同，body 从异步流读取，可配置读超时
    pub async fn decode_async<S, R>(&self, meta: &S, body: R) -> Decoded
    where
        S: MetaSource + ?Sized,
        R: AsyncRead + Unpin,
    {
        let (params, get, declaration) = self.begin(meta);
        let body = match declaration {
            Some((content_type, len)) => Some((content_type, self.read_body_async(body, len).await)),
            None => None,
        };
        self.complete(params, get, body)
    }

    /// 元数据 + GET 阶段，并给出 POST 声明（CONTENT_TYPE, 长度）
    fn begin<S>(&self, meta: &S) -> (ParamMap, Outcome, Option<(String, usize)>)
    where
        S: MetaSource + ?Sized,
    {
        let mut params = self.ingest(meta);
        let get = self.decode_get(&mut params);
        let declaration = self.post_declaration(&params);
        (params, get, declaration)
    }

    /// POST 阶段：`body` 为 None 表示请求没有声明 body
    fn complete(
        &self,
        mut params: ParamMap,
        get: Outcome,
        body: Option<(String, Result<Vec<u8>, DecodeError>)>,
    ) -> Decoded {
        let (post, raw) = match body {
            None => (Outcome::Skipped, None),
            Some((_, Err(e))) => (self.absorb("POST", e), None),
            Some((content_type, Ok(buf))) => self.decode_body(&content_type, buf, &mut params),
        };

        Decoded {
            params,
            get,
            post,
            raw,
            empty_value: self.config.empty_value.clone(),
        }
    }

    /// 进程级入口：环境变量 + stdin
    pub fn decode_env(&self) -> Decoded {
        let stdin = std::io::stdin();
        self.decode(&EnvSource, stdin.lock())
    }

    pub fn parse_env(&self) -> ParamMap {
        self.decode_env().params
    }

    /// 按 META_FIELDS 顺序写入全部元数据，缺失的用占位值
    fn ingest<S: MetaSource + ?Sized>(&self, meta: &S) -> ParamMap {
        let mut params = ParamMap::new();
        for field in META_FIELDS.iter() {
            let value = meta
                .var(field.name)
                .unwrap_or_else(|| {
                    field
                        .default
                        .unwrap_or(self.config.empty_value.as_str())
                        .to_string()
                });
            params.add(field.name, value);
        }
        params
    }

    /// 读取一个存在且不是占位值的元数据
    fn declared(&self, params: &ParamMap, name: &str) -> Option<String> {
        params
            .first(name)
            .filter(|v| !self.config.is_empty_value(v))
            .map(str::to_string)
    }

    fn decode_get(&self, params: &mut ParamMap) -> Outcome {
        let Some(query) = self.declared(params, QUERY_STRING) else {
            return Outcome::Skipped;
        };
        let outcome = urlencoded::decode_str(&query, self.config.max_query_len, params);
        debug!(%outcome, "GET phase");
        outcome
    }

    /// CONTENT_TYPE 与 CONTENT_LENGTH 都声明了才进入 POST 阶段
    fn post_declaration(&self, params: &ParamMap) -> Option<(String, usize)> {
        let content_type = self.declared(params, CONTENT_TYPE)?;
        let length = self.declared(params, CONTENT_LENGTH)?;
        Some((content_type, parse_content_length(&length)))
    }

    fn check_limit(&self, len: usize) -> Result<(), DecodeError> {
        match self.config.max_body_len {
            Some(limit) if len > limit => Err(DecodeError::BodyTooLarge {
                declared: len,
                limit,
            }),
            _ => Ok(()),
        }
    }

    fn read_body<R: Read>(&self, body: R, len: usize) -> Result<Vec<u8>, DecodeError> {
        self.check_limit(len)?;
        let mut buf = alloc(len)?;
        let got = body.take(len as u64).read_to_end(&mut buf)?;
        check_len(got, len)?;
        Ok(buf)
    }

    async fn read_body_async<R>(&self, body: R, len: usize) -> Result<Vec<u8>, DecodeError>
    where
        R: AsyncRead + Unpin,
    {
        self.check_limit(len)?;
        let mut buf = alloc(len)?;
        let mut reader = body.take(len as u64);
        let got = match self.config.read_timeout {
            Some(limit) => tokio::time::timeout(limit, reader.read_to_end(&mut buf))
                .await
                .map_err(|_| DecodeError::Timeout)??,
            None => reader.read_to_end(&mut buf).await?,
        };
        check_len(got, len)?;
        Ok(buf)
    }

    fn decode_body(
        &self,
        content_type: &str,
        buf: Vec<u8>,
        params: &mut ParamMap,
    ) -> (Outcome, Option<Vec<u8>>) {
        let kind = BodyKind::from_content_type(content_type);
        let stripped: Vec<u8> = buf.iter().copied().filter(|&b| b != b'\r').collect();

        let (outcome, raw) = match kind {
            BodyKind::UrlEncoded => (
                urlencoded::decode(&stripped, self.config.max_query_len, params),
                None,
            ),
            BodyKind::FormData => match Boundary::from_content_type(content_type) {
                Some(boundary) => (multipart::decode(&stripped, &boundary, params), None),
                None => return (self.absorb("POST", DecodeError::MissingBoundary), None),
            },
            BodyKind::Raw => {
                // 参数表只存字符串，原始字节另行返回
                let text = String::from_utf8_lossy(&stripped).into_owned();
                params.add(self.config.raw_content_key.as_str(), text);
                (Outcome::Decoded { fields: 1 }, Some(buf))
            }
        };
        debug!(kind = kind.as_str(), %outcome, "POST phase");
        (outcome, raw)
    }

    fn absorb(&self, phase: &str, err: DecodeError) -> Outcome {
        warn!(phase, error = %err, "phase contributed no fields");
        Outcome::from_error(err)
    }
}
