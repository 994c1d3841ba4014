use chrono::{TimeZone, Utc};
use toml_layout::{load_file, parse, Document, Error, Item, Kind, Value};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/example.toml");

const COMMENTED: &str = r#"
		# comment 0
		# comment 00

		key = "first key"
			# 1
		# 2
		[table] # 3
		int = 123456 # 4
		str = "string"

		[table2] # 5
			true = true
			false = false
			float = 123.45
			datetime = 2012-01-02T13:11:14Z

		# 6
			ia = [ 1 , 2] # 7
		# 8 overwrite 6
			ia = [ 1, 2,3] # 9 overwrite 7

			ba=[true,false]

		[multiline]
			ia= [ # open
			# 10.1
			1,
				2, # 10
			3,
			] # 10.2
		[arrayarray]
			ia=[[1,2]]
		[arrayarray.2]
			ia = [
				[1,2], # 11
				[true],
			]
		[[array.tables]]
			ia=1
			aa="name"
		[[array.tables]]
			ia=2
			aa="jack"
	# LastComments"#;

fn check_commented(doc: &Document) {
    let key = doc.get("key").unwrap();
    assert_eq!(key.comments.leading.as_deref(), Some("# comment 0\n# comment 00"));
    assert_eq!(key.as_str(), Some("first key"));

    let table = doc.get("table").unwrap();
    assert_eq!(table.kind(), Some(Kind::TableName));
    assert_eq!(table.comments.leading.as_deref(), Some("# 1\n# 2"));
    assert_eq!(table.comments.trailing.as_deref(), Some("# 3"));

    let int = doc.get("table.int").unwrap();
    assert_eq!(int.as_integer(), Some(123_456));
    assert_eq!(int.comments.trailing.as_deref(), Some("# 4"));
    assert_eq!(doc.get("table.str").and_then(|s| s.as_str()), Some("string"));

    assert_eq!(doc.get("table2").unwrap().comments.trailing.as_deref(), Some("# 5"));
    assert_eq!(doc.get("table2.true").and_then(|b| b.as_bool()), Some(true));
    assert_eq!(doc.get("table2.false").and_then(|b| b.as_bool()), Some(false));
    assert_eq!(doc.get("table2.float").and_then(|f| f.as_float()), Some(123.45));
    let datetime = doc.get("table2.datetime").unwrap();
    assert_eq!(
        datetime.as_datetime(),
        Some(Utc.with_ymd_and_hms(2012, 1, 2, 13, 11, 14).unwrap())
    );
    assert_eq!(datetime.to_string(), "2012-01-02 13:11:14");

    let ia = doc.get("table2.ia").unwrap();
    assert_eq!(ia.as_integers(), Some(vec![1, 2, 3]));
    assert_eq!(ia.comments.leading.as_deref(), Some("# 8 overwrite 6"));
    assert_eq!(ia.comments.trailing.as_deref(), Some("# 9 overwrite 7"));
    assert_eq!(doc.get("table2.ba").and_then(|b| b.as_bools()), Some(vec![true, false]));

    let multiline = doc.get("multiline.ia").unwrap();
    assert_eq!(multiline.to_string(), "[1, 2, 3]");
    assert_eq!(multiline.comments.trailing.as_deref(), Some("# 10.2"));
    assert_eq!(
        multiline.index(0).unwrap().comments.leading.as_deref(),
        Some("# open\n# 10.1")
    );
    assert_eq!(multiline.index(1).unwrap().comments.trailing.as_deref(), Some("# 10"));

    assert_eq!(doc.get("arrayarray.ia").map(|v| v.to_string()), Some("[[1, 2]]".into()));
    let nested = doc.get("arrayarray.2.ia").unwrap();
    assert_eq!(nested.kind(), Some(Kind::Array));
    assert_eq!(nested.to_string(), "[[1, 2], [true]]");
    assert_eq!(nested.index(0).unwrap().comments.trailing.as_deref(), Some("# 11"));

    let aot = doc.get("array.tables").unwrap();
    assert_eq!(aot.kind(), Some(Kind::ArrayOfTables));
    assert_eq!(aot.len(), 2);
    let first = aot.table(0).unwrap();
    assert_eq!(first.get("ia").and_then(|v| v.as_integer()), Some(1));
    assert_eq!(first.get("aa").and_then(|v| v.as_str()), Some("name"));
    let second = aot.table(-1).unwrap();
    assert_eq!(second.get("ia").and_then(|v| v.as_integer()), Some(2));
    assert_eq!(second.get("aa").and_then(|v| v.as_str()), Some("jack"));

    assert_eq!(doc.tail(), Some("# LastComments"));
}

#[test]
fn test_commented_document() {
    let doc = parse(COMMENTED.as_bytes()).unwrap();
    check_commented(&doc);
}

#[test]
fn test_commented_document_survives_formatting() {
    let doc = parse(COMMENTED.as_bytes()).unwrap();
    let text = doc.to_string();
    let again = parse(text.as_bytes()).unwrap();
    check_commented(&again);
    assert_eq!(again, doc);
    assert_eq!(again.to_string(), text);
}

#[test]
fn test_fixture_file() {
    let doc = load_file(FIXTURE).unwrap();
    assert_eq!(doc.get("title").and_then(|t| t.as_str()), Some("TOML Example"));
    assert_eq!(doc.get("servers.alpha.ip").map(|v| v.to_string()), Some("10.0.0.1".into()));
    assert_eq!(doc.get("servers.beta.ip").map(|v| v.to_string()), Some("10.0.0.2".into()));
    assert_eq!(
        doc.get("owner.bio").and_then(|b| b.as_str()),
        Some("GitHub Cofounder & CEO\nLikes tater tots and beer.")
    );
    assert_eq!(
        doc.get("database.ports").and_then(|p| p.as_integers()),
        Some(vec![8001, 8001, 8002])
    );
    assert_eq!(doc.get("clients.hosts").and_then(|h| h.as_strings()), Some(vec!["alpha", "omega"]));
    assert_eq!(doc.get("products").map(Item::len), Some(2));

    let again = parse(doc.to_string().as_bytes()).unwrap();
    assert_eq!(again, doc);
    for key in ["servers.alpha.ip", "servers.alpha.dc", "owner.dob"] {
        assert_eq!(
            doc.get(key).map(|v| v.to_string()),
            again.get(key).map(|v| v.to_string())
        );
    }
}

#[test]
fn test_single_key() {
    let doc = parse(b"key = 1").unwrap();
    assert_eq!(doc.len(), 1);
    let key = doc.get("key").unwrap();
    assert_eq!(key.kind(), Some(Kind::Integer));
    assert_eq!(key.as_integer(), Some(1));
}

#[test]
fn test_duplicate_table() {
    let err = parse(b"[table]\n[table]\n").unwrap_err();
    assert!(matches!(err.root(), Error::Redeclared(path) if path == "table"));
    assert_eq!(err.line(), Some(2));
    assert_eq!(err.column(), Some(1));
}

#[test]
fn test_table_trailing_comment_round_trip() {
    let doc = parse(b"[t] # about t\nk = \"v\"\n").unwrap();
    assert_eq!(doc.to_string(), "[t] # about t\n\tk = \"v\"\n");
}

#[test]
fn test_comment_in_empty_array_stays_with_it() {
    let doc = parse(b"a = [ # c\n]\n").unwrap();
    let a = doc.get("a").unwrap();
    assert_eq!(a.kind(), Some(Kind::Array));
    assert_eq!(a.comments.leading.as_deref(), Some("# c"));
    assert_eq!(doc.tail(), None);

    let text = doc.to_string();
    assert_eq!(text, "# c\na = []\n");
    assert_eq!(parse(text.as_bytes()).unwrap(), doc);
}

#[test]
fn test_comments_before_closing_bracket_stay_with_the_array() {
    let doc = parse(b"a = [1,\n# c\n]\n[t]\nb = 1\n").unwrap();
    assert_eq!(doc.get("a").unwrap().comments.leading.as_deref(), Some("# c"));
    assert_eq!(doc.get("t").unwrap().comments.leading, None);
    assert_eq!(doc.to_string(), "# c\na = [1]\n\n[t]\n\tb = 1\n");

    let doc = parse(b"a = [1,\n# c\n# d\n] # e\n").unwrap();
    let a = doc.get("a").unwrap();
    assert_eq!(a.comments.leading.as_deref(), Some("# c\n# d"));
    assert_eq!(a.comments.trailing.as_deref(), Some("# e"));
    assert_eq!(doc.to_string(), "# c\n# d\na = [1] # e\n");
}

#[test]
fn test_comment_before_inner_closing_bracket() {
    let doc = parse(b"m = [\n\t[1, # one\n\t# end\n\t],\n]\n").unwrap();
    let inner = doc.get("m").and_then(|m| m.index(0)).unwrap();
    assert_eq!(inner.comments.leading.as_deref(), Some("# end"));
    assert_eq!(inner.index(0).unwrap().comments.trailing.as_deref(), Some("# one"));

    let text = doc.to_string();
    assert_eq!(text, "m = [\n\t# end\n\t[\n\t\t1, # one\n\t],\n]\n");
    assert_eq!(parse(text.as_bytes()).unwrap(), doc);
}

#[test]
fn test_fetch_views() {
    let doc = parse(b"[a]\nx = 1\n[a.b]\ny = 2\n[c]\nz = 3\n").unwrap();
    let a = doc.fetch("a");
    assert_eq!(a.len(), 3);
    assert!(a.get("x").is_some());
    assert!(a.get("b").is_some_and(|b| b.kind() == Some(Kind::TableName)));
    assert!(a.get("z").is_none());
    assert_eq!(a.fetch("b").len(), 1);
    assert_eq!(doc.fetch("a.").len(), 3);
    assert_eq!(doc.fetch("").len(), doc.len());
    assert!(doc.fetch("missing").is_empty());
}

#[test]
fn test_fetch_mut_edits_parent() {
    let mut doc = parse(b"[db]\nport = 1\nhost = \"h\"\n").unwrap();
    {
        let mut db = doc.fetch_mut("db");
        for (_, item) in db.iter_mut() {
            if item.kind() == Some(Kind::Integer) {
                item.set(2).unwrap();
            }
        }
        assert!(db.get_mut("host").unwrap().set(5).is_err());
    }
    assert_eq!(doc.get("db.port").and_then(|p| p.as_integer()), Some(2));
    assert_eq!(doc.get("db.host").and_then(|h| h.as_str()), Some("h"));
}

#[test]
fn test_table_names_in_declaration_order() {
    let doc = parse(b"[z]\n[[p]]\n[a]\n[[q]]\n").unwrap();
    let (tables, arrays) = doc.table_names();
    assert_eq!(tables, ["z", "a"]);
    assert_eq!(arrays, ["p", "q"]);
}

#[test]
fn test_array_of_tables_editing() {
    let mut doc = parse(b"[[p]]\nn = 1\n[[p]]\nn = 2\n").unwrap();
    doc.push_table("p").unwrap().set("n", 3).unwrap();
    assert_eq!(doc.get("p").map(Item::len), Some(3));

    let removed = doc.remove_table("p", 0).unwrap();
    assert_eq!(removed.get("n").and_then(|n| n.as_integer()), Some(1));
    assert!(matches!(doc.remove_table("p", 7), Err(Error::OutOfRange(_))));
    assert!(matches!(doc.remove_table("nope", 0), Err(Error::NotSupported(_))));

    assert_eq!(
        doc.to_string(),
        "[[p]]\n\tn = 2\n\n[[p]]\n\tn = 3\n"
    );
}

#[test]
fn test_programmatic_document() {
    let mut doc = Document::new();
    doc.set("name", "svc").unwrap();
    doc.declare_table("limits").unwrap();
    doc.set("limits.cpu", 1.5).unwrap();
    doc.add("limits.zones", "a").unwrap();
    doc.add("limits.zones", "b").unwrap();

    let mut tagged = Item::from(Value::from(true));
    tagged.comments.leading = Some("# toggled by ops".into());
    doc.insert("limits.enabled", tagged);
    doc.set_tail(Some("# generated".into()));

    assert_eq!(
        doc.to_string(),
        "name = \"svc\"\n\n[limits]\n\tcpu = 1.5\n\tzones = [\"a\", \"b\"]\n\t# toggled by ops\n\tenabled = true\n\n# generated\n"
    );
    assert!(matches!(doc.set("limits", 1), Err(Error::NotSupported(_))));
    assert!(doc.remove("limits.enabled").is_some());
    assert!(!doc.contains_key("limits.enabled"));
}

#[test]
fn test_order_is_monotonic() {
    let doc = parse(b"a = 1\n[t]\nb = [1, 2]\n[[p]]\nc = 3\n").unwrap();
    let a = doc.get("a").and_then(|v| v.order()).unwrap();
    let t = doc.get("t").and_then(|v| v.order()).unwrap();
    let b = doc.get("t.b").unwrap();
    let p = doc.get("p").unwrap();
    let c = p.table(0).and_then(|e| e.get("c")).and_then(|v| v.order()).unwrap();
    assert!(a < t);
    assert!(t < b.order().unwrap());
    assert!(b.index(0).and_then(|e| e.order()).unwrap() < b.index(1).and_then(|e| e.order()).unwrap());
    assert!(p.order().unwrap() < c);
}

#[test]
fn test_from_str_trait() {
    let doc: Document = "x = \"y\"".parse().unwrap();
    assert_eq!(doc.get("x").and_then(|x| x.as_str()), Some("y"));
    assert!("x =".parse::<Document>().is_err());
}
