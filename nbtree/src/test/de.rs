use std::io::{Read, Write};

use crate::de::Decoder;
use crate::error::{Error, ErrorKind, Result};
use crate::test::builder::Builder;
use crate::{from_bytes, from_bytes_with_opts, from_reader, Compound, DecodeOpts, List, Tag, TagType};

fn root_compound(payload: &[u8]) -> Compound {
    let root = from_bytes(payload).unwrap();
    match root.into_parts().1 {
        Tag::Compound(c) => c,
        other => panic!("expected compound, got {:?}", other),
    }
}

fn err_kind(payload: &[u8]) -> ErrorKind {
    from_bytes(payload).unwrap_err().kind()
}

#[test]
fn error_impls_sync_send() {
    fn i<T: Clone + Send + Sync + std::error::Error>(_: T) {}
    i(Error::unknown_type_id(13));
}

#[test]
fn descriptive_error_on_gzip_magic() {
    let r = from_bytes(&[0x1f, 0x8b]);
    let e = r.unwrap_err();
    assert!(e.is_malformed());
    assert!(e.to_string().to_lowercase().contains("gzip"));
}

#[test]
fn empty_payload() {
    assert_eq!(err_kind(&[]), ErrorKind::MalformedData);
}

#[test]
fn single_int_compound_bytes() {
    let bytes = [0x0A, 0x00, 0x00, 0x03, 0x00, 0x01, 0x78, 0x00, 0x00, 0x00, 0x01, 0x00];
    let root = from_bytes(&bytes).unwrap();

    let expected = Compound::builder().put("x", 1i32).build().unwrap();
    assert_eq!(root.name(), "");
    assert_eq!(root.tag(), &Tag::Compound(expected));
}

#[test]
fn simple_scalars() {
    let payload = Builder::new()
        .start_compound("object")
        .byte("b", -123)
        .short("s", 1234)
        .int("i", 50345)
        .long("l", i32::MAX as i64 + 1)
        .float("f", 1.23)
        .double("d", 2.34)
        .string("str", "something")
        .end_compound()
        .build();

    let root = from_bytes(&payload).unwrap();
    assert_eq!(root.name(), "object");

    let c = root.tag().as_compound().unwrap();
    assert_eq!(c.get_byte("b"), Some(-123));
    assert_eq!(c.get_short("s"), Some(1234));
    assert_eq!(c.get_int("i"), Some(50345));
    assert_eq!(c.get_long("l"), Some(i32::MAX as i64 + 1));
    assert_eq!(c.get_float("f"), Some(1.23));
    assert_eq!(c.get_double("d"), Some(2.34));
    assert_eq!(c.get_str("str"), Some("something"));
}

#[test]
fn scalar_root() {
    let payload = Builder::new().int("abc", 7).build();
    let root = from_bytes(&payload).unwrap();
    assert_eq!(root.name(), "abc");
    assert_eq!(root.tag(), &Tag::Int(7));
}

#[test]
fn arrays() {
    let payload = Builder::new()
        .start_compound("")
        .byte_array("bytes", &[1, 2, -1])
        .int_array("ints", &[1, -2, i32::MAX])
        .byte_array("empty", &[])
        .end_compound()
        .build();

    let c = root_compound(&payload);
    assert_eq!(c.get_byte_array("bytes"), Some(&[1i8, 2, -1][..]));
    assert_eq!(c.get_int_array("ints"), Some(&[1, -2, i32::MAX][..]));
    assert_eq!(c.get_byte_array("empty"), Some(&[][..]));
}

#[test]
fn list_of_ints_keeps_order() {
    let payload = Builder::new()
        .start_compound("")
        .start_list("list", TagType::Int, 3)
        .int_payload(1)
        .int_payload(2)
        .int_payload(3)
        .end_compound()
        .build();

    let c = root_compound(&payload);
    let list = c.get_list("list").unwrap();
    assert_eq!(list.element_type(), TagType::Int);
    assert_eq!(list.as_slice(), &[Tag::Int(1), Tag::Int(2), Tag::Int(3)]);
}

#[test]
fn list_of_compounds() {
    let payload = Builder::new()
        .start_compound("")
        .start_list("list", TagType::Compound, 2)
        .start_anon_compound()
        .string("name", "a")
        .end_compound()
        .start_anon_compound()
        .string("name", "b")
        .int("extra", 5)
        .end_compound()
        .end_compound()
        .build();

    let c = root_compound(&payload);
    let list = c.get_list("list").unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list.get(0).unwrap().as_compound().unwrap().get_str("name"), Some("a"));
    let second = list.get(1).unwrap().as_compound().unwrap();
    assert_eq!(second.get_str("name"), Some("b"));
    assert_eq!(second.get_int("extra"), Some(5));
}

#[test]
fn list_of_lists() {
    let payload = Builder::new()
        .start_compound("")
        .start_list("outer", TagType::List, 2)
        .start_anon_list(TagType::Byte, 2)
        .byte_payload(1)
        .byte_payload(2)
        .start_anon_list(TagType::String, 1)
        .string_payload("hi")
        .end_compound()
        .build();

    let c = root_compound(&payload);
    let outer = c.get_list("outer").unwrap();
    let first = outer.get(0).unwrap().as_list().unwrap();
    let second = outer.get(1).unwrap().as_list().unwrap();
    assert_eq!(first.as_slice(), &[Tag::Byte(1), Tag::Byte(2)]);
    assert_eq!(second.as_slice(), &[Tag::String("hi".to_owned())]);
}

#[test]
fn empty_list_of_end_is_fine() {
    let payload = Builder::new()
        .start_compound("")
        .start_list("empty", TagType::End, 0)
        .end_compound()
        .build();

    let c = root_compound(&payload);
    assert_eq!(c.get_list("empty"), Some(&List::empty(TagType::End)));
}

#[test]
fn empty_list_reads_nothing_after_header() {
    // The compound's End follows the header directly.
    let payload = Builder::new()
        .start_compound("")
        .start_list("empty", TagType::Compound, 0)
        .int("after", 9)
        .end_compound()
        .build();

    let c = root_compound(&payload);
    assert!(c.get_list("empty").unwrap().is_empty());
    assert_eq!(c.get_int("after"), Some(9));
}

#[test]
fn nonempty_list_of_end_errors() {
    let payload = Builder::new()
        .start_compound("")
        .start_list("", TagType::End, 1)
        .tag(TagType::End)
        .end_compound()
        .build();

    assert_eq!(err_kind(&payload), ErrorKind::MalformedData);
}

#[test]
fn duplicate_names_later_wins() {
    let payload = Builder::new()
        .start_compound("")
        .int("a", 1)
        .int("b", 2)
        .string("a", "second")
        .end_compound()
        .build();

    let c = root_compound(&payload);
    assert_eq!(c.len(), 2);
    assert_eq!(c.get_str("a"), Some("second"));
    assert_eq!(c.keys().collect::<Vec<_>>(), ["b", "a"]);
}

#[test]
fn negative_lengths_error() {
    let byte_array = Builder::new()
        .tag(TagType::ByteArray)
        .name("")
        .int_payload(-1)
        .build();
    let int_array = Builder::new()
        .tag(TagType::IntArray)
        .name("")
        .int_payload(-5)
        .build();
    let list = Builder::new()
        .start_list("", TagType::Int, -1)
        .build();

    for payload in [byte_array, int_array, list] {
        let e = from_bytes(&payload).unwrap_err();
        assert!(e.is_malformed(), "{}", e);
        assert!(e.to_string().contains("negative"));
    }
}

#[test]
fn truncated_string_errors() {
    let payload = Builder::new()
        .tag(TagType::String)
        .name("s")
        .raw_str_len(10)
        .raw_bytes(b"abc")
        .build();

    assert_eq!(err_kind(&payload), ErrorKind::MalformedData);
}

#[test]
fn oversized_byte_array_declaration_errors() {
    let payload = Builder::new()
        .tag(TagType::ByteArray)
        .name("")
        .int_payload(i32::MAX)
        .raw_bytes(&[1, 2, 3])
        .build();

    assert_eq!(err_kind(&payload), ErrorKind::MalformedData);
}

#[test]
fn oversized_int_array_declaration_errors() {
    let payload = Builder::new()
        .tag(TagType::IntArray)
        .name("")
        .int_payload(i32::MAX)
        .int_payload(1)
        .build();

    assert_eq!(err_kind(&payload), ErrorKind::MalformedData);
}

#[test]
fn every_truncation_errors() {
    let payload = Builder::new()
        .start_compound("root")
        .byte("b", 1)
        .string("s", "hello")
        .byte_array("ba", &[1, 2, 3])
        .int_array("ia", &[4, 5])
        .start_list("l", TagType::Compound, 1)
        .start_anon_compound()
        .double("d", 1.5)
        .end_compound()
        .end_compound()
        .build();

    assert!(from_bytes(&payload).is_ok());
    for end in 0..payload.len() {
        let e = from_bytes(&payload[..end]).unwrap_err();
        assert!(e.is_malformed(), "prefix of {} bytes: {}", end, e);
    }
}

#[test]
fn unknown_type_ids_error() {
    for id in [12u8, 13, 0x7f, 0xff] {
        let payload = Builder::new().raw_bytes(&[id]).name("x").build();
        assert_eq!(err_kind(&payload), ErrorKind::MalformedData);
    }

    let in_compound = Builder::new()
        .start_compound("")
        .raw_bytes(&[12])
        .name("x")
        .end_compound()
        .build();
    assert_eq!(err_kind(&in_compound), ErrorKind::MalformedData);

    // Even an empty list must name a real element type.
    let in_list = Builder::new()
        .tag(TagType::List)
        .name("")
        .raw_bytes(&[200])
        .int_payload(0)
        .build();
    assert_eq!(err_kind(&in_list), ErrorKind::MalformedData);
}

#[test]
fn bare_end_root() {
    let root = from_bytes(&[0]).unwrap();
    assert_eq!(root.tag(), &Tag::End);
    assert_eq!(root.name(), "");
}

#[test]
fn bare_end_reads_one_byte() {
    let input = [0u8, 0xAA, 0xBB];
    let mut decoder = Decoder::new(&input[..]);
    assert_eq!(decoder.decode().unwrap().tag(), &Tag::End);
    assert_eq!(decoder.into_inner(), &[0xAA, 0xBB]);
}

#[test]
fn trailing_bytes_error_for_slices() {
    let payload = Builder::new().byte("a", 1).raw_bytes(&[0]).build();
    assert_eq!(err_kind(&payload), ErrorKind::MalformedData);

    // A reader just stops after the root.
    let root = from_reader(payload.as_slice()).unwrap();
    assert_eq!(root.tag(), &Tag::Byte(1));
}

#[test]
fn decoder_reads_consecutive_roots() {
    let payload = Builder::new().int("a", 1).string("b", "two").build();

    let mut decoder = Decoder::new(payload.as_slice());
    let a = decoder.decode().unwrap();
    let b = decoder.decode().unwrap();
    assert_eq!((a.name(), a.tag()), ("a", &Tag::Int(1)));
    assert_eq!((b.name(), b.tag()), ("b", &Tag::String("two".to_owned())));
    assert!(decoder.decode().unwrap_err().is_malformed());
}

#[test]
fn modified_utf8_null_and_supplementary() {
    // NUL is C0 80 and supplementary characters are surrogate pairs.
    let payload = Builder::new().string("s", "a\0b\u{1F600}").build();
    assert!(payload.windows(2).any(|w| w == [0xC0, 0x80]));

    let root = from_bytes(&payload).unwrap();
    assert_eq!(root.tag().as_str(), Some("a\0b\u{1F600}"));
}

#[test]
fn non_canonical_text_errors() {
    let raw_nul = Builder::new()
        .tag(TagType::String)
        .name("s")
        .raw_str_len(1)
        .raw_bytes(&[0])
        .build();
    let four_byte_utf8 = Builder::new()
        .tag(TagType::String)
        .name("s")
        .raw_str_len(4)
        .raw_bytes("\u{1F600}".as_bytes())
        .build();
    let garbage = Builder::new()
        .tag(TagType::String)
        .name("s")
        .raw_str_len(2)
        .raw_bytes(&[0xFF, 0xFE])
        .build();
    let bad_name = Builder::new()
        .tag(TagType::Int)
        .raw_str_len(1)
        .raw_bytes(&[0x80])
        .int_payload(1)
        .build();

    for payload in [raw_nul, four_byte_utf8, garbage, bad_name] {
        assert_eq!(err_kind(&payload), ErrorKind::MalformedData);
    }
}

fn nested_lists(depth: usize) -> Vec<u8> {
    let mut b = Builder::new().start_list("", TagType::List, 1);
    for _ in 1..depth - 1 {
        b = b.start_anon_list(TagType::List, 1);
    }
    b.start_anon_list(TagType::Int, 0).build()
}

#[test]
fn depth_limit() {
    let opts = DecodeOpts::new().max_depth(3);

    assert!(from_bytes_with_opts(&nested_lists(3), opts).is_ok());

    let e = from_bytes_with_opts(&nested_lists(4), opts).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::DepthExceeded);
}

#[test]
fn default_depth_limit_stops_hostile_nesting() {
    let e = from_bytes(&nested_lists(100_000)).unwrap_err();
    assert!(e.is_depth_exceeded());
}

#[test]
fn compound_depth_limit() {
    let payload = Builder::new()
        .start_compound("")
        .start_compound("a")
        .start_compound("b")
        .end_compound()
        .end_compound()
        .end_compound()
        .build();

    assert!(from_bytes_with_opts(&payload, DecodeOpts::new().max_depth(3)).is_ok());
    let e = from_bytes_with_opts(&payload, DecodeOpts::new().max_depth(2)).unwrap_err();
    assert!(e.is_depth_exceeded());
}

#[test]
fn max_seq_len() {
    let payload = Builder::new()
        .start_compound("")
        .int_array("ints", &[1, 2, 3])
        .end_compound()
        .build();

    assert!(from_bytes_with_opts(&payload, DecodeOpts::new().max_seq_len(3)).is_ok());
    let e = from_bytes_with_opts(&payload, DecodeOpts::new().max_seq_len(2)).unwrap_err();
    assert!(e.is_malformed());
}

#[test]
fn gzip_envelope_is_callers_job() -> Result<()> {
    let payload = Builder::new()
        .start_compound("")
        .string("level", "overworld")
        .end_compound()
        .build();

    let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    enc.write_all(&payload)?;
    let compressed = enc.finish()?;

    assert!(from_bytes(&compressed).is_err());

    let mut decoded = vec![];
    flate2::read::GzDecoder::new(compressed.as_slice()).read_to_end(&mut decoded)?;
    let root = from_reader(flate2::read::GzDecoder::new(compressed.as_slice()))?;
    assert_eq!(root, from_bytes(&decoded)?);
    assert_eq!(
        root.tag().as_compound().and_then(|c| c.get_str("level")),
        Some("overworld")
    );
    Ok(())
}
