use rtt_api::host::{Program, SourceFile, TypeChecker};
use rtt_api::model::{LineColumn, NodeShape};
use rtt_script::*;
use std::error::Error;

fn calls(file: &ScriptFile) -> Vec<ScriptNode> {
    let mut result = Vec::new();
    let mut stack = vec![file.root()];
    while let Some(node) = stack.pop() {
        if let NodeShape::Call { .. } = file.shape(node) {
            result.push(node);
        }
        stack.extend(file.children(node).into_iter().rev());
    }
    result
}

fn callee_name(file: &ScriptFile, call: ScriptNode) -> String {
    match file.shape(call) {
        NodeShape::Call { callee, .. } => match file.shape(callee) {
            NodeShape::Identifier { name } => name.to_owned(),
            NodeShape::PropertyAccess { name, .. } => format!(".{}", name),
            _ => String::new(),
        },
        _ => String::new(),
    }
}

const TEST_FILE: &str = r#"import { describeType, testType } from 'readable-types';
import type { Equals } from "./equals";

type Alias<T> = {
  value: T;
};

interface Options {
  verbose: boolean;
}

export function helper(input: string = 'a', ...rest: number[]): Alias<string> {
  return input as any;
}

describeType('outer', () => {
  testType(`a template`, () => {
    const value = assertType<string>();
    value.equals<number>();
    expectFail()!;
  });

  describe("inner", function () {
    test('array', [first(), second<{ a: 1 }>()]);
    test('object', { a: first(), b: second(), c, d() { return third(); }, ...rest });
  });

  testType('operators', () => cond ? first() : second() || third() + fourth());
});
"#;

#[test]
fn parse_test_file_calls_in_order() -> Result<(), Box<dyn Error>> {
    let file = ScriptFile::parse("a.spec-types.ts", TEST_FILE)?;
    let names = calls(&file)
        .into_iter()
        .map(|call| callee_name(&file, call))
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            "describeType",
            "testType",
            "assertType",
            ".equals",
            "expectFail",
            "describe",
            "test",
            "first",
            "second",
            "test",
            "first",
            "second",
            "third",
            "testType",
            "first",
            "second",
            "third",
            "fourth",
        ]
    );
    Ok(())
}

#[test]
fn parse_describe_arguments() -> Result<(), Box<dyn Error>> {
    let file = ScriptFile::parse("a.spec-types.ts", TEST_FILE)?;
    let describe = calls(&file)[0];
    match file.shape(describe) {
        NodeShape::Call { arguments, .. } => {
            assert_eq!(arguments.len(), 2);
            assert_eq!(
                file.shape(arguments[0]),
                NodeShape::StringLiteral { value: "outer" }
            );
            assert!(file.shape(arguments[1]).is_function_like());
        }
        shape => panic!("unexpected shape {:?}", shape),
    }
    let template_test = calls(&file)[1];
    match file.shape(template_test) {
        NodeShape::Call { arguments, .. } => assert_eq!(
            file.shape(arguments[0]),
            NodeShape::StringLiteral {
                value: "a template"
            }
        ),
        shape => panic!("unexpected shape {:?}", shape),
    }
    Ok(())
}

#[test]
fn parse_object_callback_properties() -> Result<(), Box<dyn Error>> {
    let file = ScriptFile::parse("a.spec-types.ts", TEST_FILE)?;
    let object_test = calls(&file)[9];
    let callback = match file.shape(object_test) {
        NodeShape::Call { arguments, .. } => arguments[1],
        shape => panic!("unexpected shape {:?}", shape),
    };
    let properties = match file.shape(callback) {
        NodeShape::ObjectLiteral { properties } => properties.to_vec(),
        shape => panic!("unexpected shape {:?}", shape),
    };
    assert_eq!(properties.len(), 5);
    assert!(matches!(
        file.shape(properties[0]),
        NodeShape::PropertyAssignment { name: "a", .. }
    ));
    assert_eq!(file.shape(properties[2]), NodeShape::Other);
    Ok(())
}

#[test]
fn call_locations() -> Result<(), Box<dyn Error>> {
    let file = ScriptFile::parse("a.ts", "first();\n  second<string>(1, 'a');")?;
    let second = calls(&file)[1];
    let location = file.location(second);
    assert_eq!(location.start, 11);
    assert_eq!(location.length, "second<string>(1, 'a')".len());
    assert_eq!(location.line_column(), LineColumn { line: 1, column: 2 });
    Ok(())
}

#[test]
fn syntax_error_position() {
    let error = ScriptFile::parse("broken.ts", "describeType('a', () => {\n  test(;\n});").unwrap_err();
    assert_eq!(error.file(), Some("broken.ts"));
    assert_eq!(error.position(), Some(LineColumn { line: 1, column: 7 }));
    assert!(matches!(
        error.kind(),
        ScriptErrorKind::UnexpectedToken { .. }
    ));
    assert_eq!(
        error.to_string(),
        "unexpected ';', expecting expression at broken.ts:2:8"
    );
}

#[test]
fn deep_nesting_is_an_error() {
    let depth = 2000;
    let text = format!(
        "{}testType('t', () => pass());{}",
        "describeType('g', () => {".repeat(depth),
        "});".repeat(depth)
    );
    let error = ScriptFile::parse("deep.ts", text).unwrap_err();
    assert!(matches!(error.kind(), ScriptErrorKind::TooDeeplyNested));

    let shallow = format!(
        "{}testType('t', () => pass());{}",
        "describeType('g', () => {".repeat(50),
        "});".repeat(50)
    );
    assert!(ScriptFile::parse("shallow.ts", shallow).is_ok());

    let parenthesized = format!("{}1{};", "(".repeat(depth), ")".repeat(depth));
    let error = ScriptFile::parse("parens.ts", parenthesized).unwrap_err();
    assert!(matches!(error.kind(), ScriptErrorKind::TooDeeplyNested));
}

#[test]
fn premature_end_of_file() {
    let error = ScriptFile::parse("a.ts", "describeType('a', () => {").unwrap_err();
    assert!(matches!(error.kind(), ScriptErrorKind::PrematureEOF));
}

#[test]
fn declarations_drive_types() -> Result<(), Box<dyn Error>> {
    let program = ScriptProgram::from_sources(vec![
        (
            "lib.d.ts",
            "declare function assertType<T>(): Assertion<T>;\ndeclare function equals<E>(): RTT_FAIL<\"Expected `E`\">;\ndeclare const text: string;",
        ),
        (
            "a.spec-types.ts",
            "assertType<number>().equals<string>();\nassertType<typeof text>();",
        ),
    ])?;
    let checker = program.type_checker();
    let file = program
        .source_file("a.spec-types.ts")
        .ok_or("file not found")?;
    let all_calls = calls(file);

    let equals = all_calls[0];
    let signature = checker
        .resolved_signature(equals)
        .ok_or("no signature")?;
    assert_eq!(
        checker.type_to_string(&checker.return_type_of_signature(&signature)),
        "RTT_FAIL<\"Expected `E`\">"
    );
    let expected = checker
        .type_from_type_argument(equals, 0)
        .ok_or("no type argument")?;
    assert_eq!(checker.type_to_string(&expected), "string");

    let receiver = match file.shape(equals) {
        NodeShape::Call { callee, .. } => match file.shape(callee) {
            NodeShape::PropertyAccess { object, .. } => object,
            shape => panic!("unexpected shape {:?}", shape),
        },
        shape => panic!("unexpected shape {:?}", shape),
    };
    let receiver_type = checker.type_at_location(receiver).ok_or("no type")?;
    assert_eq!(checker.type_to_string(&receiver_type), "Assertion<number>");
    let received = checker
        .resolved_type_argument(&receiver_type, 0)
        .ok_or("no type argument")?;
    assert_eq!(checker.type_to_string(&received), "number");

    assert_eq!(
        checker
            .type_from_type_argument(all_calls[2], 0)
            .map(|t| t.to_string()),
        Some("typeof text".to_owned())
    );
    assert_eq!(checker.type_from_type_argument(all_calls[2], 1), None);
    Ok(())
}

#[test]
fn unknown_calls_have_no_signature() -> Result<(), Box<dyn Error>> {
    let program = ScriptProgram::from_source("a.ts", "notDeclared<string>();")?;
    let file = program.source_file("a.ts").ok_or("file not found")?;
    assert!(program
        .type_checker()
        .resolved_signature(calls(file)[0])
        .is_none());
    Ok(())
}
