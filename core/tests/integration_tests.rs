use cmdarg_core::{
    ArgError, ArgKind, ArgSchema, ArgSpec, ArgValue, ArgumentSet, BoundArguments, Token,
    TokenFormat, Validator, bind, bind_arguments, to_boolean, tokenize,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn word(value: &str) -> Token {
    Token::new(value, TokenFormat::UnquotedWord)
}

fn moderation_schema() -> ArgSchema {
    ArgSchema::new()
        .with_arg(ArgSpec::required("user", ArgKind::User))
        .unwrap()
        .with_arg(
            ArgSpec::required("count", ArgKind::Uint)
                .with_validator(Validator::range(Some(1.0), Some(400.0))),
        )
        .unwrap()
        .with_arg(ArgSpec::optional("silent", ArgKind::Boolean))
        .unwrap()
        .with_arg(
            ArgSpec::optional("reason", ArgKind::String)
                .with_transform(|arg| ArgValue::from(arg.value.to_string().to_uppercase())),
        )
        .unwrap()
}

// ---------------------------------------------------------------------------
// Tokenizing
// ---------------------------------------------------------------------------

#[test]
fn test_plain_words_become_unquoted_tokens_in_order() {
    let words = ["alpha", "b3ta", "-x", "γ", "12.5"];
    let tokens = tokenize(&format!("  {}  ", words.join("   ")));

    assert_eq!(tokens.len(), words.len());
    for (token, expected) in tokens.iter().zip(words) {
        assert_eq!(token.format, TokenFormat::UnquotedWord);
        assert_eq!(token.value, expected);
    }
}

#[test]
fn test_double_quoted_then_word() {
    assert_eq!(
        tokenize("\"a b\" c"),
        vec![Token::new("a b", TokenFormat::DoubleQuoted), word("c")]
    );
}

#[test]
fn test_single_then_double_quoted() {
    assert_eq!(
        tokenize("'x' \"y\""),
        vec![
            Token::new("x", TokenFormat::SingleQuoted),
            Token::new("y", TokenFormat::DoubleQuoted),
        ]
    );
}

#[test]
fn test_unterminated_quote_degrades_to_words() {
    assert_eq!(
        tokenize("\"unterminated rest"),
        vec![word("\"unterminated"), word("rest")]
    );
}

#[test]
fn test_fence_with_language_line() {
    let tokens = tokenize("```ts\nbody```");
    assert_eq!(tokens, vec![Token::code_block("body", Some("ts".to_string()))]);
}

#[test]
fn test_mixed_formats_keep_scan_order() {
    let tokens = tokenize("run `x + 1` ```\nlet y;\n``` 'done'");
    let formats: Vec<_> = tokens.iter().map(|t| t.format).collect();
    assert_eq!(
        formats,
        vec![
            TokenFormat::UnquotedWord,
            TokenFormat::InlineCode,
            TokenFormat::CodeBlock,
            TokenFormat::SingleQuoted,
        ]
    );
    assert_eq!(tokens[1].value, "x + 1");
    assert_eq!(tokens[2].value, "let y;");
    assert_eq!(tokens[2].language, None);
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

#[test]
fn test_uint_binding() {
    let schema = ArgSchema::new()
        .with_arg(ArgSpec::required("n", ArgKind::Uint))
        .unwrap();

    let bound = bind(&[word("5")], &schema).unwrap();
    assert_eq!(bound[0].value, ArgValue::Uint(5));

    for bad in ["-1", "abc"] {
        let err = bind(&[word(bad)], &schema).unwrap_err();
        assert!(
            matches!(err, ArgError::TypeCoercion { ref value, kind: ArgKind::Uint } if value == bad),
            "unexpected error for {bad}: {err:?}"
        );
    }
}

#[test]
fn test_full_schema_binding() {
    let tokens = tokenize("<@42> 25 no \"spam links\" extra");
    let bound = bind(&tokens, &moderation_schema()).unwrap();

    assert_eq!(bound.len(), tokens.len());
    assert_eq!(bound[0].value, ArgValue::from("<@42>"));
    assert_eq!(bound[0].kind, Some(ArgKind::User));
    assert_eq!(bound[1].value, ArgValue::Uint(25));
    assert_eq!(bound[2].value, ArgValue::Bool(false));
    assert_eq!(bound[3].value, ArgValue::from("SPAM LINKS"));
    assert_eq!(bound[3].format, TokenFormat::DoubleQuoted);

    assert!(!bound[4].is_named());
    assert_eq!(bound[4].kind, None);
    assert_eq!(bound[4].value, ArgValue::from("extra"));
}

#[test]
fn test_validation_error_aborts_binding() {
    let tokens = tokenize("<@42> 500 yes");
    let err = bind(&tokens, &moderation_schema()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "\"count\" must be less than or equal to 400"
    );
}

#[test]
fn test_missing_required_tokens_are_not_synthesized() {
    let bound = bind(&tokenize("<@42>"), &moderation_schema()).unwrap();
    assert_eq!(bound.len(), 1);
}

#[test]
fn test_rebinding_coerced_values_is_idempotent() {
    let schema = ArgSchema::new()
        .with_arg(ArgSpec::required("i", ArgKind::Int))
        .unwrap()
        .with_arg(ArgSpec::required("u", ArgKind::Uint))
        .unwrap()
        .with_arg(ArgSpec::required("f", ArgKind::Float))
        .unwrap()
        .with_arg(ArgSpec::required("b", ArgKind::Boolean))
        .unwrap()
        .with_arg(ArgSpec::required("c", ArgKind::Code))
        .unwrap()
        .with_arg(ArgSpec::required("s", ArgKind::String))
        .unwrap();

    let first = bind(&tokenize("-7 0x10 2.5e1 T `x` hi"), &schema).unwrap();
    let second = bind_arguments(first.clone(), &schema).unwrap();
    assert_eq!(first, second);
    assert_eq!(first[1].value, ArgValue::Uint(16));
    assert_eq!(first[2].value, ArgValue::Float(25.0));
}

#[test]
fn test_code_kind_requires_code_token() {
    let schema = ArgSchema::new()
        .with_arg(ArgSpec::required("snippet", ArgKind::Code))
        .unwrap();

    assert!(bind(&tokenize("`ok`"), &schema).is_ok());
    assert!(matches!(
        bind(&tokenize("\"not code\""), &schema),
        Err(ArgError::TypeCoercion {
            kind: ArgKind::Code,
            ..
        })
    ));
}

#[test]
fn test_duplicate_schema_name_rejected_before_parsing() {
    let err = ArgSchema::from_entries([ArgSpec::new("a"), ArgSpec::new("a")]).unwrap_err();
    assert_eq!(err, ArgError::DuplicateSchemaName("a".to_string()));
}

// ---------------------------------------------------------------------------
// Boolean coercion
// ---------------------------------------------------------------------------

#[test]
fn test_boolean_coercion_properties() {
    assert!(to_boolean(Some(&ArgValue::from("YES"))).unwrap());
    assert!(to_boolean(Some(&ArgValue::from("t"))).unwrap());
    assert!(to_boolean(Some(&ArgValue::Int(1))).unwrap());
    assert!(!to_boolean(None).unwrap());
    assert!(to_boolean(Some(&ArgValue::from("maybe"))).is_err());
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

#[test]
fn test_cursor_next_exhausts_then_stays() {
    let mut args = ArgumentSet::parse("one \"two three\" `four`");
    let n = args.len();

    let mut seen = Vec::new();
    for _ in 0..n {
        seen.push(args.next().unwrap().value.clone());
    }
    assert_eq!(seen, vec!["one", "two three", "four"]);

    assert!(args.next().is_none());
    assert_eq!(args.index(), n);
    assert_eq!(args.prev().unwrap().value, "four");
}

#[test]
fn test_cursor_lookups_do_not_move_index() {
    let mut args = ArgumentSet::parse("a b c d");
    args.set_index(1);

    assert_eq!(args.peek().unwrap().value, "b");
    assert_eq!(args.nth(3).unwrap().value, "d");
    assert_eq!(args.rest().len(), 3);
    assert_eq!(args.prev().unwrap().value, "a");
    assert_eq!(args.index(), 1);
}

#[test]
fn test_bound_arguments_named_lookup_and_cursor() {
    let mut args = BoundArguments::parse("<@1> 3 y", &moderation_schema()).unwrap();

    assert_eq!(args.get_str("user"), Some("<@1>"));
    assert_eq!(args.get_u64("count"), Some(3));
    assert_eq!(args.get_bool("silent"), Some(true));
    assert!(args.get("reason").is_none());

    let cursor = args.cursor_mut();
    assert_eq!(cursor.next().unwrap().value, "<@1>");
    assert_eq!(cursor.rest().len(), 2);
}
