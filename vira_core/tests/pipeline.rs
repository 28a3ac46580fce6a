use vira_core::language::{
    check, lex, parse, BinaryOperator, ErrorKind, Expression, Lexer, Parser, Statement, TokenType,
};
use vira_core::preprocessor::{MemoryResolver, Preprocessor};

fn num(value: f64) -> Expression {
    Expression::NumberLiteral(value)
}

fn rebuild(source: &str) -> String {
    let tokens = Lexer::new(source).tokenize().unwrap();
    let mut out = String::new();
    let mut cursor = 0;
    for token in &tokens {
        out.push_str(&source[cursor..token.span.start]);
        out.push_str(token.lexeme(source));
        cursor = token.span.end;
    }
    out.push_str(&source[cursor..]);
    out
}

#[test]
fn raw_lexemes_rebuild_the_source() {
    let sources = [
        "let x = 1;\nwrite x + 2 * (3 - y);",
        ":mathlib:;\n\tdef f(a, b) {\n  write \"a \\\" b\";\n}\n",
        "  foo(1,2)  ;  : abc :def x ",
        "write \"héllo\" ; # @",
        "",
    ];
    for source in sources {
        assert_eq!(rebuild(source), source);
    }
}

#[test]
fn eof_repeats_without_advancing() {
    let mut lexer = Lexer::new("write 1;\n");
    let mut last = lexer.next_token().unwrap();
    while !last.is(TokenType::EOF) {
        last = lexer.next_token().unwrap();
    }
    for _ in 0..3 {
        let again = lexer.next_token().unwrap();
        assert_eq!(again, last);
    }
    assert_eq!((last.line, last.column), (2, 1));
}

#[test]
fn statement_count_matches_top_level_declarations() {
    let source = "\
< a small program
:io:;
let greeting = \"hi\";
def twice(n) {
    let doubled = n * 2;
    write doubled;
}
write twice(21);
greeting;
";
    let parsed = parse(source).unwrap();
    assert!(parsed.is_clean(), "{:?}", parsed.errors);
    assert_eq!(parsed.program.len(), 5);
}

#[test]
fn precedence_examples() {
    let parsed = parse("1 + 2 * 3;\n(1 + 2) * 3;").unwrap();
    assert_eq!(
        parsed.program.statements,
        vec![
            Statement::Expression(Expression::binary(
                num(1.0),
                BinaryOperator::Add,
                Expression::binary(num(2.0), BinaryOperator::Multiply, num(3.0)),
            )),
            Statement::Expression(Expression::binary(
                Expression::binary(num(1.0), BinaryOperator::Add, num(2.0)),
                BinaryOperator::Multiply,
                num(3.0),
            )),
        ]
    );
}

#[test]
fn one_bad_statement_one_error() {
    let parsed = parse("let x = ;\nwrite x;").unwrap();
    assert_eq!(parsed.errors.len(), 1);
    assert_eq!(parsed.errors[0].kind, ErrorKind::Parser);
    assert_eq!(parsed.program.statements, vec![Statement::Write(Expression::Identifier("x".into()))]);
}

#[test]
fn several_bad_statements_are_isolated() {
    let source = "let = 1;\nwrite 1;\ndef (x) {}\nlet ok = 2;\nfoo(1;\nwrite ok;";
    let parsed = parse(source).unwrap();
    assert_eq!(parsed.errors.len(), 3);
    let lines: Vec<_> = parsed.errors.iter().map(|e| e.line).collect();
    assert_eq!(lines, vec![Some(1), Some(3), Some(5)]);
    assert_eq!(parsed.program.len(), 3);
}

#[test]
fn import_marker_lexes_as_one_token() {
    let tokens = lex(":mathlib:").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].token_type, TokenType::ImportStart);
    assert_eq!(tokens[0].text, "mathlib");
}

#[test]
fn unterminated_string_never_truncates() {
    let err = parse("write \"abc;").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Lexer);
    assert_eq!(err.line, Some(1));
}

#[test]
fn call_statement_shape() {
    let parsed = parse("foo(1, 2+3);").unwrap();
    assert_eq!(
        parsed.program.statements,
        vec![Statement::Expression(Expression::Call {
            callee: "foo".into(),
            args: vec![num(1.0), Expression::binary(num(2.0), BinaryOperator::Add, num(3.0))],
        })]
    );
}

#[test]
fn parser_can_be_driven_by_hand() {
    let tokens = lex("write 1;\nwrite ;").unwrap();
    let mut parser = Parser::new(tokens);
    let program = parser.parse();
    assert_eq!(program.len(), 1);
    assert_eq!(parser.errors().len(), 1);
    assert_eq!(parser.errors()[0].line, Some(2));
}

#[test]
fn preprocess_parse_check_and_dump() {
    let resolver = MemoryResolver::new().with_file("prelude.vira", "#define ANSWER 42\nlet base = ANSWER;");
    let mut pp = Preprocessor::new(resolver);
    let source = pp
        .process("#include \"prelude.vira\"\ndef scale(k) { write base * k; }\nscale(ANSWER);", None)
        .unwrap();

    let parsed = parse(&source).unwrap();
    assert!(parsed.is_clean());
    assert!(check(&parsed.program).is_empty());

    let expected = "\
Program:
  VarDecl: base
    Number: 42
  FuncDef: scale
    Params:
      k
    Body:
      Write:
        Binary: *
          Identifier: base
          Identifier: k
  ExprStmt:
    Call: scale
      Number: 42
";
    assert_eq!(parsed.program.dump(), expected);
}
