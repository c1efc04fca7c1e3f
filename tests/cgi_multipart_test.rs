#[cfg(test)]
mod tests {
    use aex_cgi::cgi::{
        multipart::{Blocks, Boundary, decode, interpret, parts},
        params::ParamMap,
        types::Outcome,
    };

    const FORM: &[u8] = b"preamble\n\
--AaB03x\n\
Content-Disposition: form-data; name=\"field\"\n\
\n\
v1\n\
--AaB03x\n\
Content-Disposition: form-data; name=\"field\"\n\
\n\
v2\n\
--AaB03x\n\
Content-Disposition: form-data; name=\"upload\"; filename=\"a.txt\"\n\
Content-Type: text/plain\n\
Content-Transfer-Encoding: binary\n\
\n\
file body\n\
line2\n\
--AaB03x--\n";

    #[test]
    fn test_single_part() {
        let body = b"--XYZ\nContent-Disposition: form-data; name=\"f\"\n\nhello\n--XYZ--";
        let mut map = ParamMap::new();
        let outcome = decode(body, &Boundary::new("XYZ"), &mut map);

        assert!(matches!(outcome, Outcome::Decoded { fields: 1 }));
        assert_eq!(map.get("f", ""), "hello");
    }

    #[test]
    fn test_multiple_parts_with_duplicates() {
        let mut map = ParamMap::new();
        let outcome = decode(FORM, &Boundary::new("AaB03x"), &mut map);

        assert_eq!(outcome.fields(), 3);
        assert_eq!(map.get_all("field"), vec!["v1", "v2"]);
        assert_eq!(map.get("upload", ""), "file body\nline2");
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["field", "field", "upload"]);
    }

    #[test]
    fn test_part_details() {
        let boundary = Boundary::new("AaB03x");
        let all: Vec<_> = parts(FORM, &boundary).collect();
        assert_eq!(all.len(), 3);

        let upload = &all[2];
        assert_eq!(upload.name, "upload");
        assert_eq!(upload.filename.as_deref(), Some("a.txt"));
        assert_eq!(upload.content_type.as_deref(), Some("text/plain"));
        assert_eq!(upload.transfer_encoding.as_deref(), Some("binary"));

        assert_eq!(all[0].filename, None);
        assert_eq!(all[0].content_type, None);
    }

    #[test]
    fn test_unknown_boundary_yields_nothing() {
        let mut map = ParamMap::new();
        let outcome = decode(FORM, &Boundary::new("nope"), &mut map);
        assert!(map.is_empty());
        assert!(matches!(outcome, Outcome::Decoded { fields: 0 }));
    }

    #[test]
    fn test_unterminated_last_part_is_dropped() {
        let body = b"--B\nContent-Disposition: form-data; name=\"a\"\n\n1\n\
--B\nContent-Disposition: form-data; name=\"b\"\n\n2\n";
        let mut map = ParamMap::new();
        decode(body, &Boundary::new("B"), &mut map);

        assert_eq!(map.get("a", ""), "1");
        assert!(!map.contains_key("b"));
    }

    #[test]
    fn test_blocks_between_boundaries() {
        let boundary = Boundary::new("X");
        let blocks: Vec<_> = Blocks::new(b"junk--X\none\n--X\ntwo\n--X--", &boundary).collect();
        assert_eq!(blocks, vec![&b"one\n"[..], &b"two\n"[..]]);

        assert_eq!(Blocks::new(b"--X\nonly", &boundary).count(), 0);
    }

    #[test]
    fn test_malformed_blocks_are_skipped() {
        let body = b"--B\nContent-Type: text/plain\n\nno name\n\
--B\nContent-Disposition: form-data; name=\"empty\"\n\n\n\
--B\nContent-Disposition: form-data; name=\"ok\"\n\nyes\n--B--";
        let mut map = ParamMap::new();
        let outcome = decode(body, &Boundary::new("B"), &mut map);

        assert!(matches!(outcome, Outcome::Partial { fields: 1, tolerated: 2 }));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("ok", ""), "yes");
    }

    #[test]
    fn test_interpret() {
        // 头部名称大小写不敏感
        let part = interpret(b"content-disposition: form-data; name=\"x\"\n\nvalue\n").unwrap();
        assert_eq!((part.name.as_str(), part.value.as_str()), ("x", "value"));

        // filename 不会被当成 name
        let part = interpret(b"Content-Disposition: form-data; filename=\"f.bin\"; name=\"real\"\n\ndata").unwrap();
        assert_eq!(part.name, "real");
        assert_eq!(part.value, "data");

        // 没有空行分隔
        assert!(interpret(b"Content-Disposition: form-data; name=\"x\"\nvalue\n").is_none());
        // name 为空
        assert!(interpret(b"Content-Disposition: form-data; name=\"\"\n\nvalue\n").is_none());
    }

    #[test]
    fn test_boundary_from_content_type() {
        let b = Boundary::from_content_type("multipart/form-data; boundary=XYZ").unwrap();
        assert_eq!(b.as_bytes(), b"--XYZ");

        let b = Boundary::from_content_type("multipart/form-data; boundary=\"a b\"; charset=utf-8").unwrap();
        assert_eq!(b.as_bytes(), b"--a b");

        assert!(Boundary::from_content_type("multipart/form-data").is_none());
        assert!(Boundary::from_content_type("multipart/form-data; boundary=").is_none());
    }
}
