use std::sync::Arc;

use proptest::{
    prop_assert_eq, prop_oneof, proptest,
    strategy::{Just, Strategy},
};

use super::{
    parse, BinaryOperator, ExpressionMask, ExpressionType, Literal,
    ParseError, Tree, UnaryOperator,
};

fn int(value: i32) -> Tree { Tree::Literal(Literal::Int(value)) }

#[test]
fn binary_expression() {
    let tree = parse("2 + 3").unwrap();

    assert_eq!(tree, Tree::binary(BinaryOperator::Add, int(2), int(3)));
    assert_eq!(tree.expression_type(), ExpressionType::Binary);
    assert_eq!(tree.serialize(), "2 + 3");
}

#[test]
fn precedence_and_associativity() {
    assert_eq!(parse("1 + 2 * 3").unwrap().serialize(), "1 + (2 * 3)");
    assert_eq!(parse("1 - 2 - 3").unwrap().serialize(), "(1 - 2) - 3");
    assert_eq!(parse("(1 - 2) * 3").unwrap().serialize(), "(1 - 2) * 3");
    assert_eq!(
        parse("1 << 3 | 1").unwrap(),
        Tree::binary(
            BinaryOperator::BOr,
            Tree::binary(BinaryOperator::Lsh, int(1), int(3)),
            int(1),
        )
    );
    assert_eq!(
        parse("a == b && c").unwrap().serialize(),
        "(a == b) && c"
    );
}

#[test]
fn prefix_operators() {
    assert_eq!(parse("-5").unwrap(), Tree::unary(UnaryOperator::Unm, int(5)));
    assert_eq!(
        parse("!~1").unwrap(),
        Tree::unary(
            UnaryOperator::Not,
            Tree::unary(UnaryOperator::BNot, int(1))
        )
    );
    assert_eq!(parse("2 - -1").unwrap().serialize(), "2 - (-1)");
    assert_eq!(parse("-(1 + 2)").unwrap().serialize(), "-(1 + 2)");
}

#[test]
fn integer_suffixes() {
    let literal = |text: &str| parse(text).unwrap().into_literal().unwrap();

    assert_eq!(literal("5"), Literal::Int(5));
    assert_eq!(literal("5u"), Literal::UInt(5));
    assert_eq!(literal("5U"), Literal::UInt(5));
    assert_eq!(literal("5l"), Literal::Long(5));
    assert_eq!(literal("5ul"), Literal::ULong(5));
    assert_eq!(literal("5LU"), Literal::ULong(5));
    assert_eq!(literal("5ll"), Literal::LLong(5));
    assert_eq!(literal("5ull"), Literal::ULLong(5));
    assert_eq!(literal("0x10"), Literal::Int(16));
    assert_eq!(literal("0xffU"), Literal::UInt(255));
    assert_eq!(literal("3000000000"), Literal::Long(3_000_000_000));
    assert_eq!(
        literal("18446744073709551615"),
        Literal::ULong(u64::MAX)
    );
}

#[test]
fn floating_literals() {
    let literal = |text: &str| parse(text).unwrap().into_literal().unwrap();

    assert_eq!(literal("1.5"), Literal::Double(1.5));
    assert_eq!(literal("1.5f"), Literal::Float(1.5));
    assert_eq!(literal("2e3"), Literal::Double(2000.0));
    assert_eq!(Tree::from(Literal::Float(1.5)).serialize(), "1.5f");
    assert_eq!(Tree::from(Literal::Double(2.0)).serialize(), "2.0");
}

#[test]
fn keyword_and_name_literals() {
    let literal = |text: &str| parse(text).unwrap().into_literal().unwrap();

    assert_eq!(literal("true"), Literal::Bool(true));
    assert_eq!(literal("false"), Literal::Bool(false));
    assert_eq!(literal("null"), Literal::Null);
    assert_eq!(literal("Foo.Bar.baz"), Literal::Name(Arc::from("Foo.Bar.baz")));
    assert_eq!(literal("truey"), Literal::Name(Arc::from("truey")));
}

#[test]
fn string_and_char_literals() {
    let literal = |text: &str| parse(text).unwrap().into_literal().unwrap();

    assert_eq!(literal(r#""a\"b""#), Literal::String(Arc::from("a\"b")));
    assert_eq!(literal(r"'\n'"), Literal::Char('\n'));
    assert_eq!(literal("'x'"), Literal::Char('x'));

    let tree = Tree::from(Literal::String(Arc::from("tab\there")));
    assert_eq!(tree.serialize(), r#""tab\there""#);
    assert_eq!(Tree::from(Literal::Char('\'')).serialize(), r"'\''");
}

#[test]
fn malformed_text() {
    assert!(matches!(parse("1 +"), Err(ParseError::Expected { .. })));
    assert!(matches!(parse(""), Err(ParseError::Expected { .. })));
    assert!(matches!(parse("(1 + 2"), Err(ParseError::Expected { .. })));
    assert!(matches!(parse("1 2"), Err(ParseError::TrailingInput(2))));
    assert!(matches!(parse("'ab'"), Err(ParseError::InvalidCharacter(0))));
    assert!(matches!(parse("\"abc"), Err(ParseError::UnterminatedLiteral(0))));
    assert!(matches!(parse(r#""\q""#), Err(ParseError::InvalidEscape(_))));
    assert!(matches!(parse("5uz"), Err(ParseError::InvalidNumber { .. })));
    assert!(matches!(parse("1.5u"), Err(ParseError::InvalidNumber { .. })));
    assert!(matches!(
        parse("1 @ 2"),
        Err(ParseError::UnexpectedCharacter { character: '@', offset: 2 })
    ));
}

#[test]
fn masks() {
    assert!(ExpressionMask::INT.contains(ExpressionMask::SINT));
    assert!(ExpressionMask::NUMBER.contains(ExpressionMask::FLOAT));
    assert!(!ExpressionMask::SIGNED.contains(ExpressionMask::UINT));
    assert_eq!(ExpressionType::ULLong.mask(), ExpressionMask::UINT);
    assert!(ExpressionType::Name.mask().is_empty());
}

fn literal() -> impl Strategy<Value = Literal> {
    prop_oneof![
        (0..=i32::MAX).prop_map(Literal::Int),
        proptest::num::u32::ANY.prop_map(Literal::UInt),
        (0..=i64::MAX).prop_map(Literal::LLong),
        proptest::num::u64::ANY.prop_map(Literal::ULLong),
        (0.0f32..1.0e6).prop_map(Literal::Float),
        (0.0f64..1.0e12).prop_map(Literal::Double),
        "[a-z \"'\\\\\n]{0,8}"
            .prop_map(|text| Literal::String(Arc::from(text))),
        proptest::char::range('a', 'z').prop_map(Literal::Char),
        proptest::bool::ANY.prop_map(Literal::Bool),
        Just(Literal::Null),
        "[A-Z][a-z]{1,5}(\\.[A-Z][a-z]{1,5}){0,2}"
            .prop_map(|name| Literal::Name(Arc::from(name))),
    ]
}

fn binary_operator() -> impl Strategy<Value = BinaryOperator> {
    prop_oneof![
        Just(BinaryOperator::Add),
        Just(BinaryOperator::Sub),
        Just(BinaryOperator::Mul),
        Just(BinaryOperator::Div),
        Just(BinaryOperator::Mod),
        Just(BinaryOperator::Eq),
        Just(BinaryOperator::Nq),
        Just(BinaryOperator::Gt),
        Just(BinaryOperator::Lt),
        Just(BinaryOperator::Ge),
        Just(BinaryOperator::Le),
        Just(BinaryOperator::And),
        Just(BinaryOperator::Or),
        Just(BinaryOperator::BAnd),
        Just(BinaryOperator::BOr),
        Just(BinaryOperator::BXor),
        Just(BinaryOperator::Lsh),
        Just(BinaryOperator::Rsh),
    ]
}

fn unary_operator() -> impl Strategy<Value = UnaryOperator> {
    prop_oneof![
        Just(UnaryOperator::Unm),
        Just(UnaryOperator::Unp),
        Just(UnaryOperator::Not),
        Just(UnaryOperator::BNot),
    ]
}

fn tree() -> impl Strategy<Value = Tree> {
    literal().prop_map(Tree::Literal).prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (unary_operator(), inner.clone())
                .prop_map(|(operator, operand)| Tree::unary(operator, operand)),
            (binary_operator(), inner.clone(), inner).prop_map(
                |(operator, lhs, rhs)| Tree::binary(operator, lhs, rhs)
            ),
        ]
    })
}

proptest! {
    #[test]
    fn serialized_text_parses_back(tree in tree()) {
        let text = tree.serialize();

        prop_assert_eq!(parse(&text).unwrap(), tree);
    }
}
