//! End-to-end scenarios: job in, OpenSBP text out.

use clap::Parser;
use sbpost_lib::cli::Args;
use sbpost_lib::error::AppError;
use sbpost_lib::gcode::{CommandParser, GcodeParser};
use sbpost_lib::models::{PathItem, Postable};
use sbpost_lib::postprocessor::{config, Config, PostProcessor, PostProcessorError};

fn cfg(toml: &str) -> Config {
    let base = "[output]\nheader = false\nshow_editor = false\n";
    config::parse(&format!("{base}{toml}")).expect("test config is valid")
}

fn job(lines: &[&str]) -> Vec<Postable> {
    vec![Postable::Path(PathItem {
        label: "testpath".to_string(),
        commands: Some(
            lines
                .iter()
                .map(|l| GcodeParser.parse(l).expect("test line parses"))
                .collect(),
        ),
        tool_controller: None,
    })]
}

fn generate(config: Config, lines: &[&str]) -> Result<String, PostProcessorError> {
    PostProcessor::new(config)?.generate(&job(lines))
}

// ── moves ───────────────────────────────────────────────────────────────────

#[test]
fn unchanged_axes_produce_no_move() {
    let out = generate(cfg("[modal]\naxes = true\n"), &["G0 X1 Y2 Z3", "G0 X1 Y2 Z3"]).unwrap();
    assert_eq!(out, "J3,1.000,2.000,3.000\n");
}

#[test]
fn three_axis_rapid_metric_and_imperial() {
    let metric = generate(cfg("precision = 4\n"), &["G0 X10 Y20 Z30"]).unwrap();
    assert_eq!(metric, "J3,10.0000,20.0000,30.0000\n");

    let imperial = generate(
        cfg("precision = 4\nunits = \"imperial\"\n"),
        &["G0 X10 Y20 Z30"],
    )
    .unwrap();
    assert_eq!(imperial, "J3,0.3937,0.7874,1.1811\n");
}

#[test]
fn five_axis_feed_move() {
    let out = generate(cfg("precision = 4\n"), &["G1 X10 Y20 Z30 A40 B50"]).unwrap();
    assert_eq!(out, "M5,10.0000,20.0000,30.0000,40.0000,50.0000\n");
}

#[test]
fn duplicate_move_elided_until_relative() {
    let toml = "[modal]\ncommands = true\n";
    let absolute = generate(cfg(toml), &["G0 X5 Y5", "G0 X5 Y5"]).unwrap();
    assert_eq!(absolute, "J2,5.000,5.000\n");

    let relative = generate(cfg(toml), &["G91", "G0 X5 Y5", "G0 X5 Y5"]).unwrap();
    assert_eq!(relative, "SR 'RELATIVE\nJ2,5.000,5.000\nJ2,5.000,5.000\n");
}

// ── tools ───────────────────────────────────────────────────────────────────

#[test]
fn only_later_tool_changes_pause() {
    let out = generate(cfg(""), &["M6 T1", "G0 Z5", "M6 T2"]).unwrap();
    let first = out.find("&Tool=2").expect("second tool change present");
    assert!(!out[..first].contains("PAUSE"));
    assert!(out[first..].contains("'Change tool to #2: 2\nPAUSE\n"));
}

#[test]
fn manual_and_automatic_tooling() {
    let lines = ["M6 T2", "M3 S3000", "M6 T3"];
    let manual = generate(cfg("comments = true\n"), &lines).unwrap();
    assert_eq!(
        manual,
        "'(begin preamble)\n\
         '(begin operation: testpath)\n\
         '(Path: testpath)\n\
         '(tool change)\n\
         &Tool=2\n\
         '(First change tool, should already be #2: 2)\n\
         &ToolName=\"2\"\n\
         '(no horizontal feed rate)\n\
         '(no vertical feed rate)\n\
         '(no horizontal rapid rate)\n\
         '(no vertical rapid rate)\n\
         TR,3000\n\
         'Change spindle speed to 3000\n\
         PAUSE\n\
         '(tool change)\n\
         &Tool=3\n\
         'Change tool to #3: 3\n\
         PAUSE\n\
         &ToolName=\"3\"\n\
         '(no horizontal feed rate)\n\
         '(no vertical feed rate)\n\
         '(no horizontal rapid rate)\n\
         '(no vertical rapid rate)\n\
         '(finish operation: testpath)\n\
         '(begin postamble)\n"
    );

    let automatic = generate(
        cfg("[machine]\ntoolchanger = true\nspindle_controller = true\n"),
        &lines,
    )
    .unwrap();
    assert_eq!(
        automatic,
        "&Tool=2\nC9 'toolchanger\n&ToolName=\"2\"\nTR,3000\nC6 'spindle-controller\nPAUSE 3\n\
         &Tool=3\nC9 'toolchanger\n&ToolName=\"3\"\n"
    );
}

// ── unknown commands ────────────────────────────────────────────────────────

#[test]
fn unknown_offset_aborts_with_operation_name() {
    let err = generate(cfg(""), &["G0 X1", "G55"]).unwrap_err();
    match &err {
        PostProcessorError::UnknownCommand { command, operation } => {
            assert_eq!(command, "G55");
            assert_eq!(operation, "testpath");
        }
        other => panic!("expected UnknownCommand, got {other:?}"),
    }
}

#[test]
fn exempted_unknown_continues() {
    let out = generate(cfg("[unknown]\nallow = [\"G55\"]\n"), &["G55", "G0 X1"]).unwrap();
    assert_eq!(out, "'Unhandled: G55\nJX,1.000\n");
}

#[test]
fn drill_cycle_passes_when_abort_disabled() {
    let out = generate(
        cfg("[unknown]\nabort = false\n"),
        &["G0 Z5", "G81 X1 Y2 Z-3 R5 F100", "G2 X0 Y10 I-5 J0 K0"],
    )
    .unwrap();
    assert_eq!(
        out,
        "JZ,5.000\n\
         'Unhandled: G81 X1.000000 Y2.000000 Z-3.000000 F100.000000 R5.000000\n\
         CG,,0.000,10.000,-5.000,0.000,T,1\n"
    );
}

// ── program structure ───────────────────────────────────────────────────────

#[test]
fn return_to_and_ambles() {
    let toml = "[program]\npreamble = \"G0 Z50\"\npostamble = \"G0 Z55\"\nreturn_to = \",,40\"\nnative_postamble = \"END\"\n";
    let out = generate(cfg(toml), &["G0 X1"]).unwrap();
    assert_eq!(out, "JZ,50.000\nJX,1.000\nJZ,40.000\nJZ,55.000\nEND\n");
}

#[test]
fn pause_prompts() {
    let quiet = generate(cfg(""), &["(With Prompt)", "M0"]).unwrap();
    assert_eq!(quiet, "'With Prompt\nPAUSE\n");

    let bare = generate(cfg(""), &["G0 X0", "M00"]).unwrap();
    assert_eq!(bare, "JX,0.000\n'Continue?\nPAUSE\n");
}

// ── command line ────────────────────────────────────────────────────────────

#[test]
fn export_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("job.json");
    let output = dir.path().join("job.sbp");
    std::fs::write(
        &input,
        r#"[{ "type": "path", "label": "Op", "commands": ["G0 X10 Y20", "G1 Z-1 F120"] }]"#,
    )
    .unwrap();

    let args = Args::try_parse_from([
        "sbpost",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "--no-header",
        "--no-show-editor",
        "--inches",
    ])
    .unwrap();
    let text = sbpost_lib::export(&args).unwrap();

    let expected = "J2,0.3937,0.7874\nMS,,4.7244\nMZ,-0.0394\n";
    assert_eq!(text, expected);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), expected);
}

#[test]
fn malformed_job_is_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("job.json");
    std::fs::write(&input, r#"[{ "type": "path", "label": "Op", "commands": ["G0 X"] }]"#).unwrap();

    let args = Args::try_parse_from(["sbpost", input.to_str().unwrap(), "--no-show-editor"]).unwrap();
    let err = sbpost_lib::export(&args).unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
}

#[test]
fn missing_job_file_is_io_error() {
    let args = Args::try_parse_from(["sbpost", "/nonexistent/sbpost/job.json"]).unwrap();
    let err = sbpost_lib::export(&args).unwrap_err();
    assert!(matches!(err, AppError::Io(_)));
}
