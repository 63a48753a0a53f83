use criterion::{criterion_group, criterion_main, Criterion};
use rtt_api::host::Program;
use rtt_script::ScriptProgram;
use rtt_tester::config::Config;
use rtt_tester::walker::TreeWalker;
use rtt_tester::TypeTester;

const DECLARATIONS: &str = r#"
declare function assertType<T>(): Assertion<T>;
declare function toBeString(): true;
declare function toBeNumber<E>(): RTT_FAIL<"Expected `number`">;
"#;

fn test_file(groups: usize, cases: usize) -> String {
    let mut text = String::new();
    for group in 0..groups {
        text.push_str(&format!("describeType('group {}', () => {{\n", group));
        for case in 0..cases {
            if case % 10 == 9 {
                text.push_str(&format!(
                    "  testType('case {}', () => assertType<string>().toBeNumber<{}>());\n",
                    case, case
                ));
            } else {
                text.push_str(&format!(
                    "  testType('case {}', [assertType<string>().toBeString(), assertType<{}>().toBeString()]);\n",
                    case, case
                ));
            }
        }
        text.push_str("});\n");
    }
    text
}

fn bench_parse(c: &mut Criterion) {
    let text = test_file(20, 50);
    c.bench_function("parse test file", |b| {
        b.iter(|| {
            ScriptProgram::from_sources(vec![("lib.d.ts", DECLARATIONS), ("a.spec.ts", text.as_str())])
                .unwrap();
        })
    });
}

fn bench_walk(c: &mut Criterion) {
    let text = test_file(20, 50);
    let program =
        ScriptProgram::from_sources(vec![("lib.d.ts", DECLARATIONS), ("a.spec.ts", text.as_str())])
            .unwrap();
    let file = program.source_file("a.spec.ts").unwrap();
    c.bench_function("walk test file", |b| {
        b.iter(|| TreeWalker::new(file, program.type_checker()).walk())
    });
}

fn bench_run(c: &mut Criterion) {
    let sources = (0..10)
        .map(|i| (format!("types/{}.spec.ts", i), test_file(5, 20)))
        .chain(Some(("lib.d.ts".to_owned(), DECLARATIONS.to_owned())))
        .collect::<Vec<_>>();
    let program = ScriptProgram::from_sources(sources).unwrap();
    let config = Config::default();
    c.bench_function("run program", |b| {
        b.iter(|| TypeTester::new(&program, &config).run())
    });
}

criterion_group!(walker, bench_parse, bench_walk, bench_run);

criterion_main!(walker);
