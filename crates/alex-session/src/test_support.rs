//! A tiny block-structured evaluator used to drive the session in tests.
//!
//! Grammar: lines opening with `def`/`class`/`if`/... or ending in `do` open a
//! block that an `end` line closes; `puts x` prints, `raise x` fails, `a+b` adds,
//! `nest` starts a nested session on the attached session.

use std::cell::{Cell, RefCell};
use std::io::{BufRead, Cursor};
use std::rc::{Rc, Weak};

use alex_core::{Console, ContextEvaluator, EvaluationResult, SessionScope, TrialOutcome};

use crate::{LineReader, Session};

const OPENERS: [&str; 8] = [
    "def", "class", "module", "while", "until", "begin", "if", "unless",
];

#[derive(Debug, Default)]
pub(crate) struct TrialLog {
    pub(crate) evaluated: Vec<String>,
    pub(crate) notes: Vec<String>,
}

pub(crate) type SharedInput = Rc<RefCell<Cursor<Vec<u8>>>>;

pub(crate) struct ScriptedEvaluator {
    console: Console,
    scope: SessionScope,
    parser: bool,
    trial_runs: Cell<usize>,
    nested_input: String,
    shared_input: Option<SharedInput>,
    session: RefCell<Weak<Session<ScriptedEvaluator>>>,
}

impl ScriptedEvaluator {
    pub(crate) fn new(console: Console) -> Self {
        Self {
            console,
            scope: SessionScope::new(),
            parser: false,
            trial_runs: Cell::new(0),
            nested_input: String::new(),
            shared_input: None,
            session: RefCell::new(Weak::new()),
        }
    }

    pub(crate) fn with_parser(mut self) -> Self {
        self.parser = true;
        self
    }

    pub(crate) fn with_nested_input(mut self, input: &str) -> Self {
        self.nested_input = input.to_string();
        self
    }

    /// Nested sessions read from `source`, one line per borrow.
    pub(crate) fn with_shared_input(mut self, source: SharedInput) -> Self {
        self.shared_input = Some(source);
        self
    }

    pub(crate) fn attach(&self, session: &Rc<Session<ScriptedEvaluator>>) {
        *self.session.borrow_mut() = Rc::downgrade(session);
    }

    pub(crate) fn trial_runs(&self) -> usize {
        self.trial_runs.get()
    }

    fn nest(&self, context: &mut TrialLog) -> EvaluationResult {
        let Some(session) = self.session.borrow().upgrade() else {
            return EvaluationResult::Error("no session attached".to_string());
        };
        let started = match &self.shared_input {
            Some(source) => {
                let source = Rc::clone(source);
                let mut input =
                    LineReader::new(move |line: &mut String| source.borrow_mut().read_line(line));
                session.start_with_input(context, &mut input)
            }
            None => session.start_with_input(context, &mut Cursor::new(self.nested_input.as_bytes())),
        };
        match started {
            Ok(()) => context.notes.push(format!(
                "inner exited; outer running: {}",
                session.is_running()
            )),
            Err(error) => context
                .notes
                .push(format!("nested start refused: {}", error.code)),
        }
        EvaluationResult::Value("nested".to_string())
    }

    fn run(&self, source: &str) -> Result<String, String> {
        if balance(source) < 0 {
            return Err("unexpected end".to_string());
        }
        let first_line = source.lines().next().unwrap_or("").trim();
        let mut words = first_line.splitn(2, ' ');
        let head = words.next().unwrap_or("");
        let rest = words.next().unwrap_or("").trim();
        match head {
            "def" => Ok(format!(":{}", rest)),
            "puts" => {
                self.console.script_output(rest);
                Ok("nil".to_string())
            }
            "raise" => Err(rest.to_string()),
            "panic" => panic!("scripted panic"),
            _ if OPENERS.contains(&head) => Ok("nil".to_string()),
            _ => arithmetic(first_line)
                .map(|value| value.to_string())
                .ok_or_else(|| format!("undefined local variable or method `{}'", first_line)),
        }
    }
}

fn balance(source: &str) -> isize {
    let mut depth = 0isize;
    for line in source.lines() {
        let line = line.trim();
        let first = line.split_whitespace().next().unwrap_or("");
        if OPENERS.contains(&first) || line.ends_with(" do") {
            depth += 1;
        } else if line == "end" || line.ends_with(" end") {
            depth -= 1;
        }
    }
    depth
}

fn syntax_error(source: &str) -> Option<String> {
    (balance(source) > 0).then(|| "unexpected end-of-input".to_string())
}

fn arithmetic(expr: &str) -> Option<i64> {
    match expr.split_once('+') {
        Some((left, right)) => Some(left.trim().parse::<i64>().ok()? + right.trim().parse::<i64>().ok()?),
        None => expr.parse::<i64>().ok(),
    }
}

impl ContextEvaluator for ScriptedEvaluator {
    type Context = TrialLog;

    fn console(&self) -> &Console {
        &self.console
    }

    fn session_scope(&self) -> &SessionScope {
        &self.scope
    }

    fn trial_run(&self, source: &str, _context: &TrialLog) -> TrialOutcome {
        self.trial_runs.set(self.trial_runs.get() + 1);
        if let Some(message) = syntax_error(source) {
            return TrialOutcome::Syntax(message);
        }
        if source.trim() == "nest" {
            return TrialOutcome::Accepted;
        }
        match self.run(source) {
            Ok(_) => TrialOutcome::Accepted,
            Err(message) => TrialOutcome::Raised(message),
        }
    }

    fn parse_only(&self, source: &str, _context: &TrialLog) -> Option<TrialOutcome> {
        if !self.parser {
            return None;
        }
        Some(match syntax_error(source) {
            Some(message) => TrialOutcome::Syntax(message),
            None => TrialOutcome::Accepted,
        })
    }

    fn evaluate(&self, source: &str, context: &mut TrialLog) -> EvaluationResult {
        context.evaluated.push(source.to_string());
        if source.trim() == "nest" {
            return self.nest(context);
        }
        match self.run(source) {
            Ok(value) => EvaluationResult::Value(value),
            Err(message) => EvaluationResult::Error(message),
        }
    }
}
