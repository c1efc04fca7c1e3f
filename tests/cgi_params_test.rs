#[cfg(test)]
mod tests {
    use aex_cgi::ParamMap;

    fn sample() -> ParamMap {
        let mut map = ParamMap::new();
        map.add("a", "1");
        map.add("b", "2");
        map.add("a", "3");
        map
    }

    #[test]
    fn test_add_keeps_duplicates_in_order() {
        let map = sample();
        assert_eq!(map.len(), 3);
        assert_eq!(map.get_all("a"), vec!["1", "3"]);
        assert_eq!(
            map.iter().collect::<Vec<_>>(),
            vec![("a", "1"), ("b", "2"), ("a", "3")]
        );
    }

    #[test]
    fn test_lookup_with_default() {
        let map = sample();
        // 重复 key 返回第一个值
        assert_eq!(map.get("a", "x"), "1");
        assert_eq!(map.get("missing", "x"), "x");
        assert_eq!(map.first("b"), Some("2"));
        assert_eq!(map.first("missing"), None);
        assert!(map.get_all("missing").is_empty());
        assert!(map.contains_key("b"));
        assert!(!map.contains_key("c"));
    }

    #[test]
    fn test_empty_map() {
        let map = ParamMap::new();
        assert!(map.is_empty());
        assert_eq!(map.to_query_string(), "");
    }

    #[test]
    fn test_to_query_string() {
        let map: ParamMap = vec![("q", "1 2"), ("s", "&"), ("q", "+")].into_iter().collect();
        assert_eq!(map.to_query_string(), "q=1+2&s=%26&q=%2B");
    }

    #[test]
    fn test_dump() {
        let mut out = Vec::new();
        sample().dump(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("a\t[1]"));
        assert_eq!(lines[0].len(), 20 + "\t[1]".len());
        assert!(lines[2].ends_with("a\t[3]"));
    }

    #[test]
    fn test_serialize_as_ordered_pairs() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"[["a","1"],["b","2"],["a","3"]]"#);
    }

    #[test]
    fn test_equality_follows_order() {
        let mut other = ParamMap::new();
        other.add("a", "1");
        other.add("b", "2");
        other.add("a", "3");
        assert_eq!(sample(), other);

        let reordered: ParamMap = vec![("b", "2"), ("a", "1"), ("a", "3")].into_iter().collect();
        assert_ne!(sample(), reordered);
    }
}
