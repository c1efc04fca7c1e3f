#[cfg(test)]
mod tests {
    use aex_cgi::cgi::{
        config::MAX_QUERY_LEN,
        params::ParamMap,
        types::{DecodeError, Outcome},
        urlencoded::{decode, decode_str, split_token},
    };

    fn run(input: &str) -> (ParamMap, Outcome) {
        let mut map = ParamMap::new();
        let outcome = decode_str(input, MAX_QUERY_LEN, &mut map);
        (map, outcome)
    }

    #[test]
    fn test_simple_pairs() {
        let (map, outcome) = run("name=Alice&age=30");
        assert!(matches!(outcome, Outcome::Decoded { fields: 2 }));
        assert_eq!(map.get("name", ""), "Alice");
        assert_eq!(map.get("age", ""), "30");
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["name", "age"]);
    }

    #[test]
    fn test_values_are_decoded_keys_are_not() {
        let (map, _) = run("city=New+York&sym=%26&a%20b=c");
        assert_eq!(map.get("city", ""), "New York");
        assert_eq!(map.get("sym", ""), "&");
        assert_eq!(map.get("a%20b", ""), "c");
        assert!(!map.contains_key("a b"));
    }

    #[test]
    fn test_duplicates_are_appended() {
        let (map, _) = run("tag=a&tag=b&tag=c");
        assert_eq!(map.get_all("tag"), vec!["a", "b", "c"]);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_tolerated_tokens() {
        // 没有 '='
        let (map, outcome) = run("flag&x=1");
        assert!(matches!(outcome, Outcome::Partial { fields: 2, tolerated: 1 }));
        assert_eq!(map.get("flag", "missing"), "");
        assert_eq!(map.get("x", ""), "1");

        // 以 '=' 开头
        let (map, outcome) = run("=v");
        assert!(matches!(outcome, Outcome::Partial { fields: 1, tolerated: 1 }));
        assert_eq!(map.get("", "missing"), "");

        // 空 value 是合法的
        let (map, outcome) = run("k=");
        assert!(matches!(outcome, Outcome::Decoded { fields: 1 }));
        assert_eq!(map.get("k", "missing"), "");
    }

    #[test]
    fn test_value_stops_at_whitespace() {
        let (map, outcome) = run("k=a b");
        assert_eq!(map.get("k", ""), "a");
        assert!(matches!(outcome, Outcome::Partial { .. }));
    }

    #[test]
    fn test_empty_tokens_are_skipped() {
        let (map, outcome) = run("&&");
        assert!(map.is_empty());
        assert!(matches!(outcome, Outcome::Decoded { fields: 0 }));

        let (map, _) = run("a=1&&b=2&");
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_length_bounds() {
        let (map, outcome) = run("");
        assert!(map.is_empty());
        assert!(matches!(
            outcome,
            Outcome::Rejected(DecodeError::QueryLength { len: 0, max: 1024 })
        ));

        let longest = format!("k={}", "v".repeat(MAX_QUERY_LEN - 3));
        assert_eq!(longest.len(), 1023);
        let (map, _) = run(&longest);
        assert_eq!(map.get("k", "").len(), 1021);

        let too_long = format!("k={}", "v".repeat(MAX_QUERY_LEN - 2));
        let (map, outcome) = run(&too_long);
        assert!(map.is_empty());
        assert!(outcome.is_rejected());
    }

    #[test]
    fn test_custom_limit() {
        let mut map = ParamMap::new();
        assert!(decode(b"a=1&b=2", 4, &mut map).is_rejected());
        assert!(map.is_empty());
    }

    #[test]
    fn test_split_token() {
        let t = split_token(b"key=value");
        assert_eq!((t.key, t.value, t.tolerated), (&b"key"[..], &b"value"[..], false));

        let t = split_token(b"a=b=c");
        assert_eq!((t.key, t.value), (&b"a"[..], &b"b=c"[..]));

        let t = split_token(b"k= v");
        assert_eq!(t.value, b"v");
        assert!(t.tolerated);
    }

    #[test]
    fn test_round_trip() {
        let pairs = [("q", "rust & c++"), ("path", "/a b/100%")];
        let encoded = pairs
            .iter()
            .map(|(k, v)| {
                let v: String = form_urlencoded::byte_serialize(v.as_bytes()).collect();
                format!("{}={}", k, v)
            })
            .collect::<Vec<_>>()
            .join("&");

        let (map, _) = run(&encoded);
        for (k, v) in pairs {
            assert_eq!(map.get(k, ""), v);
        }
    }
}
