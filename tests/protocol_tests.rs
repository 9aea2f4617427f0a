//! Protocol layer tests
//!
//! Request building, colenc parsing, body decoding, and status
//! classification, all exercised without any transport.

use tycoon::protocol::{
    build_target, decode_body, lookup, parse_colenc, Classification, ColEnc, Params, COMMANDS,
};
use tycoon::{params, ErrorKind, TycoonError};

// =============================================================================
// Request Building
// =============================================================================

#[test]
fn test_no_param_commands_build_bare_paths() {
    for name in ["echo", "report", "clear", "vacuum"] {
        let spec = lookup(name).unwrap();
        let target = build_target(spec, &Params::new()).unwrap();
        assert_eq!(target, format!("/rpc/{}", name));
    }
}

#[test]
fn test_query_string_renders_in_insertion_order() {
    let spec = lookup("cas").unwrap();
    let target = build_target(
        spec,
        &params! { "key" => "k", "oval" => "v1", "nval" => "v2" },
    )
    .unwrap();
    assert_eq!(target, "/rpc/cas?key=k&oval=v1&nval=v2");
}

#[test]
fn test_missing_required_param_fails_before_io() {
    let spec = lookup("set").unwrap();
    let err = build_target(spec, &params! { "key" => "k" }).unwrap_err();
    assert!(matches!(
        err,
        TycoonError::RequiredArgument {
            command: "set",
            param: "value"
        }
    ));
}

#[test]
fn test_bulk_keys_escape_like_any_other() {
    let spec = lookup("set_bulk").unwrap();
    let target = build_target(spec, &params! { "_a key" => "a value" }).unwrap();
    assert_eq!(target, "/rpc/set_bulk?_a%20key=a%20value");
}

// =============================================================================
// Round Trip (query escape → percent decode)
// =============================================================================

#[test]
fn test_query_encoding_round_trips() {
    // Any ASCII pair without tabs/newlines survives escape + colenc=U decode.
    let samples = ["plain", "with space", "a&b=c", "100%", "~tilde-dot."];
    for sample in samples {
        let escaped = tycoon::protocol::escape(sample);
        let body = format!("{}\t{}", escaped, escaped);
        let pairs = decode_body(ColEnc::Url, body.as_bytes()).unwrap().unwrap();
        assert_eq!(pairs.get(sample), Some(sample));
    }
}

// =============================================================================
// colenc Parsing
// =============================================================================

#[test]
fn test_colenc_marker_detection() {
    assert_eq!(parse_colenc("text/tab-separated-values"), ColEnc::Raw);
    assert_eq!(
        parse_colenc("text/tab-separated-values; colenc=B"),
        ColEnc::Base64
    );
    assert_eq!(
        parse_colenc("text/tab-separated-values; colenc=Q"),
        ColEnc::QuotedPrintable
    );
    assert_eq!(
        parse_colenc("text/tab-separated-values; colenc=U"),
        ColEnc::Url
    );
    // Unknown codes fall back to raw rather than failing the call.
    assert_eq!(parse_colenc("text/tab-separated-values; colenc=Z"), ColEnc::Raw);
}

// =============================================================================
// Body Decoding
// =============================================================================

#[test]
fn test_empty_body_is_none_not_empty_map() {
    assert!(decode_body(ColEnc::Raw, b"").unwrap().is_none());
}

#[test]
fn test_body_with_zero_pairs_is_distinct_from_no_body() {
    // A body with content always yields Some; absence yields None.
    let some = decode_body(ColEnc::Raw, b"k\tv\n").unwrap();
    assert!(some.is_some());
}

#[test]
fn test_malformed_line_is_error_not_panic() {
    let err = decode_body(ColEnc::Raw, b"k\tv\nno-tab").unwrap_err();
    assert!(matches!(err, TycoonError::Decode(_)));
}

#[test]
fn test_base64_decodes_whole_line_before_tab_split() {
    // base64("tab\tin\tvalue"): the embedded tabs only appear post-decode.
    let body = b"dGFiCWluCXZhbHVl";
    let pairs = decode_body(ColEnc::Base64, body).unwrap().unwrap();
    assert_eq!(pairs.get("tab"), Some("in\tvalue"));
}

// =============================================================================
// Status Classification Totality
// =============================================================================

#[test]
fn test_every_command_declares_200_success() {
    for spec in COMMANDS {
        assert_eq!(spec.classify(200), Classification::Success, "{}", spec.name);
    }
}

#[test]
fn test_undeclared_statuses_always_classify_unexpected() {
    for spec in COMMANDS {
        for code in [100, 204, 301, 404, 418, 500, 502] {
            assert_eq!(
                spec.classify(code),
                Classification::Unexpected,
                "{} / {}",
                spec.name,
                code
            );
        }
    }
}

#[test]
fn test_450_maps_to_command_specific_kinds() {
    let expect = [
        ("play_script", ErrorKind::Logical),
        ("synchronize", ErrorKind::CommandFailed),
        ("add", ErrorKind::RecordExists),
        ("replace", ErrorKind::RecordNotExists),
        ("remove", ErrorKind::RecordNotExists),
        ("get", ErrorKind::RecordNotExists),
        ("increment", ErrorKind::NotCompatible),
        ("increment_double", ErrorKind::NotCompatible),
        ("cas", ErrorKind::AssumptionFailed),
        ("cur_jump", ErrorKind::InvalidCursor),
        ("cur_step", ErrorKind::InvalidCursor),
        ("cur_delete", ErrorKind::InvalidCursor),
    ];
    for (name, kind) in expect {
        let spec = lookup(name).unwrap();
        assert_eq!(spec.classify(450), Classification::Error(kind), "{}", name);
    }
}

#[test]
fn test_450_on_unconditional_commands_is_unexpected() {
    // set/append/bulk never legitimately answer 450.
    for name in ["set", "append", "set_bulk", "remove_bulk", "get_bulk", "echo"] {
        let spec = lookup(name).unwrap();
        assert_eq!(spec.classify(450), Classification::Unexpected, "{}", name);
    }
}
