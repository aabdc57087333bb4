//! Property-based tests for structured_logger using proptest

use proptest::prelude::*;
use serde_json::Value;
use structured_logger::prelude::*;
use structured_logger::{translate, EncoderConfig, FieldKind};

fn level_strategy() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Panic),
        Just(LogLevel::Fatal),
    ]
}

fn encode(fields: Vec<Field>) -> LogContext {
    translate(fields, &EncoderConfig::default())
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Test that LogLevel string conversions roundtrip correctly
    #[test]
    fn test_log_level_str_roundtrip(level in level_strategy()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Test that LogLevel ordering is consistent with the discriminants
    #[test]
    fn test_log_level_ordering(level1 in level_strategy(), level2 in level_strategy()) {
        let val1 = level1 as u8;
        let val2 = level2 as u8;

        prop_assert_eq!(level1 <= level2, val1 <= val2);
        prop_assert_eq!(level1 < level2, val1 < val2);
    }

    /// Test that parsing accepts case-insensitive input
    #[test]
    fn test_log_level_case_insensitive(level in level_strategy(), use_lower in any::<bool>()) {
        let input = if use_lower {
            level.to_str().to_lowercase()
        } else {
            level.to_str().to_string()
        };

        let parsed: std::result::Result<LogLevel, String> = input.parse();
        prop_assert_eq!(parsed, Ok(level));
    }
}

// ============================================================================
// Message Escaping Tests
// ============================================================================

proptest! {
    /// Test that control characters never split a written line, whatever the format
    #[test]
    fn test_message_stays_on_one_line(message in ".*") {
        let entry = LogEntry::new(LogLevel::Info, message.clone());
        prop_assert_eq!(&entry.message, &message);

        for format in [OutputFormat::Text, OutputFormat::Logfmt, OutputFormat::Json] {
            let line = format.format(&entry, &TimestampFormat::Iso8601);
            prop_assert!(!line.contains(['\n', '\r', '\t']), "{:?}: {:?}", format, line);
        }

        let json = OutputFormat::Json.format(&entry, &TimestampFormat::Iso8601);
        let parsed: Value = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(parsed["message"].as_str(), Some(message.as_str()));

        if message.contains('\n') {
            let text = OutputFormat::Text.format(&entry, &TimestampFormat::Iso8601);
            prop_assert!(text.contains("\\n"));
        }
    }
}

// ============================================================================
// Field Translation Tests
// ============================================================================

proptest! {
    /// Test that finite floats survive translation bit for bit
    #[test]
    fn test_float64_is_bit_exact(value in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
        let ctx = encode(vec![fields::float64("f", value)]);
        let encoded = ctx.get("f").and_then(Value::as_f64).unwrap();
        prop_assert_eq!(encoded.to_bits(), value.to_bits());
    }

    /// Test that integers keep their exact value at every width
    #[test]
    fn test_integers_are_exact(a in any::<i64>(), b in any::<u64>(), c in any::<i8>(), d in any::<u16>()) {
        let ctx = encode(vec![
            fields::int64("a", a),
            fields::uint64("b", b),
            fields::int8("c", c),
            fields::uint16("d", d),
        ]);

        prop_assert_eq!(ctx.get("a").and_then(Value::as_i64), Some(a));
        prop_assert_eq!(ctx.get("b").and_then(Value::as_u64), Some(b));
        prop_assert_eq!(ctx.get("c").and_then(Value::as_i64), Some(i64::from(c)));
        prop_assert_eq!(ctx.get("d").and_then(Value::as_u64), Some(u64::from(d)));
    }

    /// Test that optional inputs are either an explicit null or the scalar's encoding
    #[test]
    fn test_optional_matches_scalar(value in proptest::option::of(any::<i32>())) {
        let ctx = encode(vec![fields::int32_opt("v", value)]);

        match value {
            Some(v) => {
                let direct = encode(vec![fields::int32("v", v)]);
                prop_assert_eq!(ctx.get("v"), direct.get("v"));
            }
            None => prop_assert_eq!(ctx.get("v"), Some(&Value::Null)),
        }
    }

    /// Test that strings are carried verbatim
    #[test]
    fn test_strings_verbatim(key in "[a-z]{1,12}", value in ".*") {
        let ctx = encode(vec![fields::string(key.clone(), value.clone())]);
        prop_assert_eq!(ctx.get(&key), Some(&Value::String(value)));
    }

    /// Test that skip fields never leave a trace, wherever they appear
    #[test]
    fn test_skips_vanish(layout in prop::collection::vec(any::<bool>(), 0..20)) {
        let mut fields_in = Vec::new();
        let mut expected = Vec::new();
        for (i, keep) in layout.iter().enumerate() {
            if *keep {
                let key = format!("k{}", i);
                expected.push(key.clone());
                fields_in.push(fields::uint(key, i));
            } else {
                fields_in.push(fields::skip());
            }
        }

        let ctx = encode(fields_in);
        prop_assert_eq!(ctx.keys().collect::<Vec<_>>(), expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    /// Test that repeated keys keep their first position and the last value
    #[test]
    fn test_duplicate_keys_last_value_wins(keys in prop::collection::vec("[a-c]", 1..12)) {
        let fields_in: Vec<Field> = keys
            .iter()
            .enumerate()
            .map(|(i, k)| fields::uint(k.clone(), i))
            .collect();

        let ctx = encode(fields_in);

        let mut first_seen: Vec<&str> = Vec::new();
        for k in &keys {
            if !first_seen.contains(&k.as_str()) {
                first_seen.push(k);
            }
        }
        prop_assert_eq!(ctx.keys().collect::<Vec<_>>(), first_seen.clone());

        for k in &first_seen {
            let last = keys.iter().rposition(|x| x == k).unwrap();
            prop_assert_eq!(ctx.get(k).and_then(Value::as_u64), Some(last as u64));
        }
    }

    /// Test that a namespace captures exactly the fields after it
    #[test]
    fn test_namespace_captures_rest(before in 0usize..5, after in 0usize..5) {
        let mut fields_in: Vec<Field> = (0..before).map(|i| fields::uint(format!("b{}", i), i)).collect();
        fields_in.push(fields::namespace("ns"));
        fields_in.extend((0..after).map(|i| fields::uint(format!("a{}", i), i)));

        let ctx = encode(fields_in);

        prop_assert_eq!(ctx.len(), before + 1);
        let nested = ctx.get("ns").and_then(Value::as_object).unwrap();
        prop_assert_eq!(nested.len(), after);
    }

    /// Test that byte blobs are always inferred as binary and base64 encoded
    #[test]
    fn test_any_bytes_are_binary(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let field = fields::any("blob", bytes.clone());
        prop_assert_eq!(field.kind(), FieldKind::Binary);

        let ctx = encode(vec![field]);
        let encoded = ctx.get("blob").and_then(Value::as_str).unwrap().to_string();
        prop_assert_eq!(encoded.len(), bytes.len().div_ceil(3) * 4);
        prop_assert!(encoded
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '='));
    }

    /// Test that whole-second durations under a minute render as seconds
    #[test]
    fn test_duration_seconds(secs in 1i64..60) {
        let ctx = encode(vec![fields::duration("d", chrono::Duration::seconds(secs))]);
        prop_assert_eq!(ctx.get("d"), Some(&Value::String(format!("{}s", secs))));
    }
}

// ============================================================================
// Logger Tests
// ============================================================================

proptest! {
    /// Test that only records at or above the threshold are written
    #[test]
    fn test_threshold_filtering(threshold in level_strategy(), level in prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
    ]) {
        let memory = MemoryAppender::new();
        let logger = Logger::builder()
            .min_level(threshold)
            .appender(memory.clone())
            .build();

        logger.log(&Context::background(), level, "threshold check", vec![]);

        prop_assert_eq!(memory.len(), usize::from(level >= threshold));
    }

    /// Test that ConsoleAppender handles arbitrary entries without failing
    #[test]
    fn test_console_appender_no_panic(messages in prop::collection::vec(".*", 0..10)) {
        let mut appender = ConsoleAppender::new();

        for message in messages {
            let entry = LogEntry::new(LogLevel::Info, message);
            let result = appender.append(&entry);
            prop_assert!(result.is_ok(), "ConsoleAppender failed: {:?}", result);
        }
    }
}
