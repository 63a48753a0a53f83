#![no_main]
use libfuzzer_sys::fuzz_target;
use rtt_api::host::Program;
use rtt_script::ScriptProgram;
use rtt_tester::walker::TreeWalker;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(program) = ScriptProgram::from_source("fuzz.spec.ts", text) {
            if let Some(file) = program.source_file("fuzz.spec.ts") {
                TreeWalker::new(file, program.type_checker()).walk();
            }
        }
    }
});
