use std::cell::Cell;
use std::io::Cursor;
use std::rc::Rc;

use alex_core::{CaptureBuffer, Console, ContextEvaluator, EvaluationResult, SessionConfig, SessionScope};
use alex_runtime::rhai::{Dynamic, INT};
use alex_runtime::{Binding, HelperRegistry, RhaiEvaluator, RhaiEvaluatorOptions};
use alex_session::Session;

const SENTINEL: &str = "sentinel-actor";

fn rhai_session() -> (Session<RhaiEvaluator>, CaptureBuffer, Rc<Cell<usize>>) {
    let (console, buffer) = Console::capture();

    let calls = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&calls);
    let mut helpers = HelperRegistry::builder();
    helpers
        .add("actor", 1, move |_, args| {
            counter.set(counter.get() + 1);
            if args[0].as_int()? == 0 {
                Ok(Dynamic::from(SENTINEL.to_string()))
            } else {
                Ok(Dynamic::UNIT)
            }
        })
        .expect("register actor");

    let evaluator = RhaiEvaluator::new(RhaiEvaluatorOptions {
        console,
        scope: SessionScope::new(),
        helpers: Some(Rc::new(helpers.build())),
        host_functions: None,
        max_operations: Some(1_000_000),
    });
    (
        Session::new(SessionConfig::default(), evaluator),
        buffer,
        calls,
    )
}

fn run(session: &Session<RhaiEvaluator>, binding: &mut Binding, input: &str) {
    session
        .start_with_input(binding, &mut Cursor::new(input.as_bytes()))
        .expect("session should run");
}

#[test]
fn one_plus_one_prints_two() {
    let (session, buffer, _calls) = rhai_session();
    run(&session, &mut Binding::new(), "1+1\nexit\n");

    assert_eq!(buffer.contents(), "alex: => 2\nalex: ");
    assert!(!session.is_running());
}

#[test]
fn thrown_error_is_reported_and_session_prompts_again() {
    let (session, buffer, _calls) = rhai_session();
    run(&session, &mut Binding::new(), "throw \"kaboom\"\n40 + 2\nexit\n");

    let output = buffer.contents();
    let error_line = output
        .lines()
        .find(|line| line.contains("Error: "))
        .expect("error line");
    assert!(error_line.contains("kaboom"));
    assert!(!output.contains("=> ()"));
    assert!(output.ends_with("alex: => 42\nalex: "));
}

#[test]
fn multi_line_function_is_collected_then_callable() {
    let (session, buffer, _calls) = rhai_session();
    let mut binding = Binding::new();
    run(
        &session,
        &mut binding,
        "fn triple(x) {\nx * 3\n}\ntriple(5)\nexit\n",
    );

    let output = buffer.contents();
    assert!(output.starts_with("alex: alex: alex: => ()\n"));
    assert!(output.contains("=> 15\n"));
    assert_eq!(binding.function_names(), vec!["triple".to_string()]);
}

#[test]
fn trial_prints_are_suppressed() {
    let (session, buffer, _calls) = rhai_session();
    run(&session, &mut Binding::new(), "print(\"once\")\nexit\n");

    assert_eq!(buffer.contents().matches("once").count(), 1);
    assert!(session.console().discarded_bytes() > 0);
}

#[test]
fn session_mutates_captured_locals() {
    let (session, _buffer, _calls) = rhai_session();
    let mut scope = alex_runtime::rhai::Scope::new();
    scope.push("gold", 100 as INT);
    let mut binding = Binding::from_scope(scope);

    run(&session, &mut binding, "gold += 50;\nlet found = true;\nexit\n");

    assert_eq!(binding.get_value::<INT>("gold"), Some(150));
    assert_eq!(binding.get_value::<bool>("found"), Some(true));
}

#[test]
fn helper_resolves_only_while_running() {
    let (session, buffer, calls) = rhai_session();
    let mut binding = Binding::new();
    run(&session, &mut binding, "actor(0)\nexit\n");

    assert!(buffer
        .contents()
        .contains(&format!("=> \"{}\"", SENTINEL)));
    let calls_while_running = calls.get();
    assert!(calls_while_running >= 1);

    let idle = session.evaluator().evaluate("actor(0)", &mut binding);
    match idle {
        EvaluationResult::Error(message) => assert!(message.contains("actor")),
        other => panic!("idle call should fail, got {:?}", other),
    }
    assert_eq!(calls.get(), calls_while_running);
}

#[test]
fn cls_builtin_and_sentinel_both_clear() {
    let (session, buffer, _calls) = rhai_session();
    run(&session, &mut Binding::new(), "cls\ncls()\nexit\n");

    assert_eq!(buffer.contents().matches("\u{1b}[2J").count(), 2);
}
