use std::collections::HashMap;

use crate::cgi::config::CgiConfig;

/// 元数据表中的一项，`default` 为 None 时使用配置里的占位值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaField {
    pub name: &'static str,
    pub default: Option<&'static str>,
}

const fn field(name: &'static str) -> MetaField {
    MetaField {
        name,
        default: None,
    }
}

pub const SERVER_SOFTWARE: &str = "SERVER_SOFTWARE";
pub const SERVER_NAME: &str = "SERVER_NAME";
pub const GATEWAY_INTERFACE: &str = "GATEWAY_INTERFACE";
pub const REQUEST_METHOD: &str = "REQUEST_METHOD";
pub const QUERY_STRING: &str = "QUERY_STRING";
pub const CONTENT_TYPE: &str = "CONTENT_TYPE";
pub const CONTENT_LENGTH: &str = "CONTENT_LENGTH";
pub const HTTP_COOKIES: &str = "HTTP_COOKIES";

/// 每个请求都会写入结果的元数据字段，顺序即写入顺序
pub static META_FIELDS: [MetaField; 20] = [
    field(SERVER_SOFTWARE),
    field(SERVER_NAME),
    field(GATEWAY_INTERFACE),
    field("SERVER_PROTOCOL"),
    field("SERVER_PORT"),
    field(REQUEST_METHOD),
    field("PATH_INFO"),
    field("PATH_TRANSLATED"),
    field("SCRIPT_NAME"),
    field(QUERY_STRING),
    field("REMOTE_HOST"),
    field("REMOTE_ADDR"),
    field("AUTH_TYPE"),
    field("REMOTE_USER"),
    field("REMOTE_IDENT"),
    field(CONTENT_TYPE),
    field(CONTENT_LENGTH),
    field("HTTP_ACCEPT"),
    field("HTTP_USER_AGENT"),
    field(HTTP_COOKIES),
];

/// 只读的元数据来源（概念上等同于进程环境变量）
pub trait MetaSource {
    fn var(&self, name: &str) -> Option<String>;

    fn contains(&self, name: &str) -> bool {
        self.var(name).is_some()
    }
}

impl<T: MetaSource + ?Sized> MetaSource for &T {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

impl MetaSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl MetaSource for HashMap<&str, &str> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).map(|v| v.to_string())
    }
}

impl MetaSource for [(&str, &str)] {
    fn var(&self, name: &str) -> Option<String> {
        self.iter().find(|(k, _)| *k == name).map(|(_, v)| v.to_string())
    }
}

/// 从进程环境读取
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl MetaSource for EnvSource {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|v| v.to_string_lossy().into_owned())
    }
}

/// 当前调用是否处于 CGI 上下文
///
/// 关闭标志存在时恒为 false，否则要求 SERVER_SOFTWARE、SERVER_NAME、
/// GATEWAY_INTERFACE 同时存在。
pub fn is_active<S: MetaSource + ?Sized>(source: &S, config: &CgiConfig) -> bool {
    if source.contains(&config.disable_flag) {
        return false;
    }
    [SERVER_SOFTWARE, SERVER_NAME, GATEWAY_INTERFACE]
        .iter()
        .all(|name| source.contains(name))
}

pub fn is_active_env() -> bool {
    is_active(&EnvSource, &CgiConfig::default())
}
