use rtt_api::host::LanguageSession;
use rtt_api::model::Severity;
use rtt_script::{ScriptProgram, ScriptSession};
use rtt_tester::diagnostics::{TypeTestSession, DIAGNOSTIC_CODE};
use std::error::Error;

const LOADED: &str = "Readable-Types:: readable-types-plugin loaded";
const NOT_FOUND: &str = "Readable-Types:: SourceFile not found";

fn session(source: &str) -> Result<TypeTestSession<ScriptSession>, Box<dyn Error>> {
    let program = ScriptProgram::from_sources(vec![
        (
            "lib.d.ts",
            "declare function pass(): true;
declare function fails(): RTT_FAIL<'Expected `number`\\nsecond line'>;
declare function describeType(description: string, callback: unknown): void;
declare function testType(description: string, callback: unknown): void;",
        ),
        ("a.spec-types.ts", source),
    ])?;
    Ok(TypeTestSession::new(ScriptSession::new(program)))
}

#[test]
fn loading_is_logged() -> Result<(), Box<dyn Error>> {
    let session = session("pass();")?;
    assert_eq!(session.inner().logged(), vec![LOADED.to_owned()]);
    Ok(())
}

#[test]
fn session_diagnostics_are_kept_as_is_without_failures() -> Result<(), Box<dyn Error>> {
    let session = session("missing();\npass();")?;
    let delegated = session.inner().semantic_diagnostics("a.spec-types.ts");
    assert_eq!(delegated.len(), 1);
    assert_eq!(delegated[0].code, "2304");
    assert_eq!(session.semantic_diagnostics("a.spec-types.ts"), delegated);
    Ok(())
}

#[test]
fn failing_calls_are_merged_in_order() -> Result<(), Box<dyn Error>> {
    let source = "fails();\nmissing();\ndescribeType('g', () => { testType('t', () => fails()); });";
    let session = session(source)?;
    let diagnostics = session.semantic_diagnostics("a.spec-types.ts");
    assert_eq!(diagnostics.len(), 3);

    assert_eq!(diagnostics[0].start, 0);
    assert_eq!(diagnostics[0].length, "fails()".len());
    assert_eq!(diagnostics[0].code, DIAGNOSTIC_CODE);
    assert_eq!(
        diagnostics[0].message,
        "Test is failing: Expected `number`\nsecond line"
    );
    assert_eq!(diagnostics[0].severity, Severity::Error);

    assert_eq!(diagnostics[1].code, "2304");
    assert_eq!(diagnostics[1].start, source.find("missing").ok_or("no call")?);

    assert_eq!(diagnostics[2].code, DIAGNOSTIC_CODE);
    assert_eq!(diagnostics[2].start, source.rfind("fails").ok_or("no call")?);
    assert!(diagnostics.windows(2).all(|pair| pair[0] <= pair[1]));
    Ok(())
}

#[test]
fn missing_files_are_logged() -> Result<(), Box<dyn Error>> {
    let session = session("fails();")?;
    assert!(session.semantic_diagnostics("other.ts").is_empty());
    assert_eq!(
        session.inner().logged(),
        vec![LOADED.to_owned(), NOT_FOUND.to_owned()]
    );

    let session = TypeTestSession::new(ScriptSession::without_program());
    assert!(session.semantic_diagnostics("a.spec-types.ts").is_empty());
    assert_eq!(session.into_inner().logged().last().map(String::as_str), Some(NOT_FOUND));
    Ok(())
}
