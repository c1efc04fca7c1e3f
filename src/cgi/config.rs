use std::time::Duration;

/// URL 最大长度（含结尾），合法 query 长度为 [1, MAX_QUERY_LEN - 1]
pub const MAX_QUERY_LEN: usize = 1024;
/// 元数据缺失时的占位值
pub const EMPTY_VALUE: &str = "empty";
/// 存在该环境变量时强制关闭 CGI 模式
pub const DISABLE_FLAG: &str = "NOCGI";
/// 非表单类 body 原样保存时使用的 key
pub const RAW_CONTENT_KEY: &str = "content";

/// 解码参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CgiConfig {
    pub max_query_len: usize,
    pub empty_value: String,
    pub disable_flag: String,
    pub raw_content_key: String,
    /// 声明长度超过该值时直接拒绝 POST，不读取 body
    pub max_body_len: Option<usize>,
    /// 仅对 parse_async 生效
    pub read_timeout: Option<Duration>,
}

impl Default for CgiConfig {
    fn default() -> Self {
        Self {
            max_query_len: MAX_QUERY_LEN,
            empty_value: EMPTY_VALUE.to_string(),
            disable_flag: DISABLE_FLAG.to_string(),
            raw_content_key: RAW_CONTENT_KEY.to_string(),
            max_body_len: None,
            read_timeout: None,
        }
    }
}

impl CgiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_query_len(mut self, len: usize) -> Self {
        self.max_query_len = len;
        self
    }

    pub fn with_empty_value(mut self, value: impl Into<String>) -> Self {
        self.empty_value = value.into();
        self
    }

    pub fn with_disable_flag(mut self, flag: impl Into<String>) -> Self {
        self.disable_flag = flag.into();
        self
    }

    pub fn with_raw_content_key(mut self, key: impl Into<String>) -> Self {
        self.raw_content_key = key.into();
        self
    }

    pub fn with_max_body_len(mut self, len: usize) -> Self {
        self.max_body_len = Some(len);
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// 判断一个元数据值是否等价于“缺失”
    #[inline]
    pub fn is_empty_value(&self, value: &str) -> bool {
        value == self.empty_value
    }
}
