use std::io::{self, Write};

use ahash::AHashMap;
use serde::{Serialize, Serializer};

/// 有序、可重复 key 的参数表
///
/// 条目按插入顺序保存在 `entries` 中；`index` 记录每个 key 出现的所有位置，
/// 因此重复的表单字段不会互相覆盖。
#[derive(Debug, Clone, Default)]
pub struct ParamMap {
    entries: Vec<(String, String)>,
    index: AHashMap<String, Vec<usize>>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个条目，已有同名 key 时保留旧值
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let pos = self.entries.len();
        self.index.entry(key.clone()).or_default().push(pos);
        self.entries.push((key, value.into()));
    }

    /// 第一个匹配值，不存在时返回 default
    pub fn get<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.first(key).unwrap_or(default)
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .and_then(|positions| positions.first())
            .map(|&pos| self.entries[pos].1.as_str())
    }

    /// 所有匹配值，按插入顺序
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.index
            .get(key)
            .map(|positions| {
                positions
                    .iter()
                    .map(|&pos| self.entries[pos].1.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 重新编码为 application/x-www-form-urlencoded
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }

    /// 人类可读的逐行输出
    pub fn dump<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (key, value) in self.iter() {
            writeln!(out, "{:>20}\t[{}]", key, value)?;
        }
        Ok(())
    }
}

impl Serialize for ParamMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParamMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ParamMap::new();
        for (k, v) in iter {
            map.add(k, v);
        }
        map
    }
}

impl PartialEq for ParamMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for ParamMap {}
