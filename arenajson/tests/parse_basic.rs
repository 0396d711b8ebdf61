// Grammar acceptance and rejection for the DOM builder

use arenajson::{Arena, ErrKind, ParseError, Token};

fn parse(input: &str) -> Result<usize, ParseError> {
    let mut slots = [Token::EMPTY; 64];
    let mut arena = Arena::from_slice(&mut slots)?;
    let count = arena.parse(input.as_bytes())?.token_count();
    Ok(count)
}

fn parse_bounded(input: &str, len: usize) -> Result<usize, ParseError> {
    let mut slots = [Token::EMPTY; 64];
    let mut arena = Arena::from_slice(&mut slots)?;
    let count = arena.parse_bounded(input.as_bytes(), len)?.token_count();
    Ok(count)
}

macro_rules! parse_cases {
    ($($name:ident: $input:expr => $expected:pat,)*) => {
        $(
            paste::paste! {
                #[test_log::test]
                fn [<parse_ $name>]() {
                    let result = parse($input);
                    assert!(
                        matches!(result, $expected),
                        "input {:?} gave {:?}",
                        $input,
                        result
                    );
                }
            }
        )*
    };
}

parse_cases! {
    empty_object: "{}" => Ok(1),
    empty_object_space: "{ }" => Ok(1),
    empty_object_crlf: "{}\r\n" => Ok(1),
    empty_object_space_crlf: "{ }\r\n" => Ok(1),
    empty_object_tab: "{\t}\r\n" => Ok(1),
    empty_object_tab_space: "{\t }\r\n" => Ok(1),
    flat_array: "[1,2,3,4]" => Ok(5),
    member_empty_array: r#"{"k":[]}"# => Ok(2),
    member_array_one: r#"{"k":[1]}"# => Ok(3),
    member_array_two: r#"{"k":[1,2]}"# => Ok(4),
    member_array_trailing_comma: r#"{"k":[1,]}"# => Ok(3),
    member_nested_array: r#"{"k":[1,[1,2]]}"# => Ok(6),
    member_false: r#"{"k":false}"# => Ok(2),
    member_true: r#"{"k":true}"# => Ok(2),
    member_null: r#"{"k":null}"# => Ok(2),
    space_before_colon: r#"{"k" :null}"# => Ok(2),
    space_around_colon: r#"{"k" : null}"# => Ok(2),
    spaces_everywhere: r#"{ "k": null }"# => Ok(2),
    member_string: r#"{"k":"Stringgg"}"# => Ok(2),
    escaped_quote: r#"{"k":"Stri\"nggg with quote inside"}"# => Ok(2),

    empty_array: "[]" => Ok(1),
    empty_array_space: "[ ]" => Ok(1),
    nested_empty_arrays: "[[],[]]" => Ok(3),
    mixed_empty_containers: "[[],[],{}]" => Ok(4),
    unclosed_array: "[" => Err(ParseError::Syntax(_)),
    member_in_array: r#"["abc":"test"]"# => Err(ParseError::Syntax(_)),
    stray_close: "]" => Err(ParseError::Syntax(_)),
    leading_comma_nested: "[[,[]]" => Err(ParseError::Syntax(_)),
    leading_comma: "[,[]]" => Err(ParseError::Syntax(_)),
    leading_comma_second: "[[],[,{}]" => Err(ParseError::Syntax(_)),
    array_in_object_without_key: "{[0,1,2]}" => Err(ParseError::Syntax(_)),
    numbers_in_object_without_key: "{1,2}" => Err(ParseError::Syntax(_)),

    escape_tab: r#"{"k":"\t"}"# => Ok(2),
    escape_backspace: r#"{"k":"\b"}"# => Ok(2),
    escape_cr: r#"{"k":"\r"}"# => Ok(2),
    escape_lf: r#"{"k":"\n"}"# => Ok(2),
    escape_formfeed: r#"{"k":"\f"}"# => Ok(2),
    escape_backslash: r#"{"k":"\\"}"# => Ok(2),
    escape_unicode_digits: r#"{"k":"\u1234"}"# => Ok(2),
    escape_unicode_lower: r#"{"k":"\uabcd"}"# => Ok(2),
    escape_unicode_mixed_case: r#"{"k":"\uAbCd"}"# => Ok(2),
    escape_unicode_mixed: r#"{"k":"\u1abc"}"# => Ok(2),
    escape_unicode_bad_digit: r#"{"k":"\u1aGc"}"# => Err(ParseError::Syntax(_)),
    escape_unicode_whitespace: "{\"k\":\"\\u\t\n\n\n\"}" => Err(ParseError::Syntax(_)),
    escape_unicode_empty: r#"{"k":"\u"}"# => Err(ParseError::Syntax(_)),
    escape_unicode_one: r#"{"k":"\u1"}"# => Err(ParseError::Syntax(_)),
    escape_unicode_two: r#"{"k":"\u12"}"# => Err(ParseError::Syntax(_)),
    escape_unicode_three: r#"{"k":"\u123"}"# => Err(ParseError::Syntax(_)),
    escape_unknown: r#"{"k":"\a"}"# => Err(ParseError::Syntax(_)),

    empty_input: "" => Err(ParseError::InvalidArgument),
    array_member_without_key: "{[]}" => Err(ParseError::Syntax(_)),
    capital_false: r#"{"k":False}"# => Err(ParseError::Syntax(_)),
    capital_true: r#"{"k":True}"# => Err(ParseError::Syntax(_)),
    mixed_case_null: r#"{"k":nUll}"# => Err(ParseError::Syntax(_)),
    missing_colon: r#"{"k"1}"# => Err(ParseError::Syntax(_)),
    unquoted_key: "{k:1}" => Err(ParseError::Syntax(_)),
    unquoted_key_bad_number: "{k:0.}" => Err(ParseError::Syntax(_)),

    root_string: r#""text""# => Ok(1),
    root_number: "-125" => Ok(1),
    root_literal: " null " => Ok(1),
    whitespace_only: " \r\n\t" => Err(ParseError::Syntax(_)),
    leading_zero: "[012]" => Err(ParseError::Syntax(_)),
    dot_without_fraction: "[0.]" => Err(ParseError::Syntax(_)),
    exponent_without_digits: "[1e+]" => Err(ParseError::Syntax(_)),
    control_character: "[\"a\u{1}b\"]" => Err(ParseError::Syntax(_)),
    unterminated_string: "[\"abc" => Err(ParseError::Syntax(_)),
}

#[cfg(not(feature = "float-error"))]
parse_cases! {
    exponents: "{\"k\":{\"b\":1E5,\t\r\n\"c\":1.3E5\r\n}\r\n}" => Ok(4),
    fraction_after_zero: "[0.5]" => Ok(2),
}

#[cfg(feature = "float-error")]
parse_cases! {
    fraction_rejected: "[0.5]" => Err(ParseError::FloatNotAllowed),
    exponent_rejected: r#"{"k":1E5}"# => Err(ParseError::FloatNotAllowed),
    integer_still_accepted: "[5]" => Ok(2),
}

#[test_log::test]
fn test_bounded_input() {
    assert_eq!(parse_bounded("[1,2,3,4]abc", 9), Ok(5));
    assert_eq!(parse_bounded("[1,2,3,4]", 15), Ok(5));
    match parse_bounded("[1,2,3,4]abc", 10) {
        Err(ParseError::Syntax(err)) => {
            assert_eq!(err.kind(), ErrKind::ContentEnded);
            assert_eq!(err.character(), b'a');
            assert_eq!(err.position(), 9);
        }
        other => panic!("Expected ContentEnded, got: {:?}", other),
    }
    assert_eq!(parse_bounded("[1,2,3,4]", 0), Err(ParseError::InvalidArgument));
    assert!(matches!(
        parse_bounded("[1,2,3,4]", 5),
        Err(ParseError::Syntax(_))
    ));
}

#[test_log::test]
fn test_error_reports_first_offending_byte() {
    match parse(r#"{"k":nUll}"#) {
        Err(ParseError::Syntax(err)) => {
            assert_eq!(err.kind(), ErrKind::InvalidToken);
            assert_eq!(err.character(), b'U');
            assert_eq!(err.position(), 6);
            assert_eq!(format!("{:?}", err), "InvalidToken(U) at 6");
        }
        other => panic!("Expected InvalidToken, got: {:?}", other),
    }
}

#[cfg(feature = "comments")]
#[test_log::test]
fn test_comments_between_tokens() {
    assert_eq!(parse("/* lead */ [1, /* mid */ 2] /* tail */"), Ok(3));
    assert!(matches!(parse("[1 /* open"), Err(ParseError::Syntax(_))));
    assert!(matches!(parse("[1 // line\n]"), Err(ParseError::Syntax(_))));
}

#[cfg(not(feature = "comments"))]
#[test_log::test]
fn test_comments_rejected() {
    match parse("[1, /* c */ 2]") {
        Err(ParseError::Syntax(err)) => assert_eq!(err.kind(), ErrKind::UnexpectedComment),
        other => panic!("Expected UnexpectedComment, got: {:?}", other),
    }
}
