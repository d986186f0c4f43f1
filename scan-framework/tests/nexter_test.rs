//! Driver trampoline and output iterator semantics, exercised through a
//! minimal stage facade built the way the lexer and parser crates build
//! theirs.

use std::cell::Cell;
use std::rc::Rc;

use scan_framework::{
    Diagnostic, Emitted, Engine, IterSource, Machine, NextFn, Nexter, SinkEntry, Source,
};

#[derive(Debug, Clone, PartialEq)]
enum Out {
    Text(String),
    Bad(String),
}

impl Emitted for Out {
    fn error_message(&self) -> Option<&str> {
        match self {
            Out::Bad(message) => Some(message),
            Out::Text(_) => None,
        }
    }
}

type CharIter = IterSource<std::vec::IntoIter<char>>;
type StepFn = NextFn<TestMachine>;

struct TestMachine {
    engine: Engine<CharIter, Out, StepFn>,
}

impl TestMachine {
    fn new(input: &str, start: StepFn) -> Self {
        let chars: Vec<char> = input.chars().collect();
        Self {
            engine: Engine::new(IterSource::new(chars.into_iter()), start),
        }
    }
}

impl Machine for TestMachine {
    type Item = Out;

    fn poll_ready(&mut self) -> bool {
        self.engine.ready()
    }

    fn step(&mut self) {
        // Clone, don't take: markers taken inside the running function must
        // capture the function itself.
        if let Some(f) = self.engine.next_fn() {
            let next = f.run(self);
            self.engine.set_next_fn(next);
        }
    }

    fn finish(&mut self) {
        self.engine.force_terminal();
    }

    fn take_entry(&mut self) -> Option<SinkEntry<Out>> {
        self.engine.take_entry()
    }
}

fn nexter(input: &str, start: StepFn) -> Nexter<TestMachine> {
    Nexter::new(TestMachine::new(input, start))
}

/// Emits every element as its own item, one per invocation.
fn emit_each(m: &mut TestMachine) -> Option<StepFn> {
    let ch = m.engine.consume().expect("driver guarantees can_peek(1)");
    m.engine.emit(Out::Text(ch.to_string())).expect("emit");
    Some(NextFn::new(emit_each))
}

#[test]
fn empty_input_yields_end_forever() {
    let mut n = nexter("", NextFn::new(emit_each));
    assert_eq!(n.next(), None);
    // End is idempotent
    assert_eq!(n.next(), None);
    assert_eq!(n.next(), None);
}

#[test]
fn items_then_end() {
    let n = nexter("ab", NextFn::new(emit_each));
    let items: Vec<_> = n.collect();
    assert_eq!(
        items,
        vec![
            Ok(Out::Text("a".to_string())),
            Ok(Out::Text("b".to_string())),
        ]
    );
}

#[test]
fn driver_forces_exactly_one_terminal_on_silent_shutdown() {
    // Returns the empty continuation without emitting anything.
    fn quit(_m: &mut TestMachine) -> Option<StepFn> {
        None
    }
    let mut n = nexter("abc", NextFn::new(quit));
    assert_eq!(n.next(), None);
    assert_eq!(n.next(), None);
}

#[test]
fn error_items_do_not_end_the_stream() {
    fn bad_then_good(m: &mut TestMachine) -> Option<StepFn> {
        m.engine.consume().expect("consume");
        m.engine.emit(Out::Bad("bad token".to_string())).expect("emit");
        Some(NextFn::new(|m: &mut TestMachine| {
            m.engine.consume().expect("consume");
            m.engine.emit(Out::Text("X".to_string())).expect("emit");
            None
        }))
    }
    let mut n = nexter("??", NextFn::new(bad_then_good));
    assert_eq!(n.next(), Some(Err(Diagnostic::new("bad token"))));
    assert_eq!(n.next(), Some(Ok(Out::Text("X".to_string()))));
    assert_eq!(n.next(), None);
}

#[test]
fn several_emits_in_one_step_need_no_extra_invocations() {
    let calls = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&calls);
    let start = NextFn::new(move |m: &mut TestMachine| {
        counter.set(counter.get() + 1);
        while m.engine.can_peek(1).expect("can_peek") {
            let ch = m.engine.consume().expect("consume");
            m.engine.emit(Out::Text(ch.to_string())).expect("emit");
        }
        None
    });
    let n = nexter("xyz", start);
    assert_eq!(n.count(), 3);
    assert_eq!(calls.get(), 1);
}

#[test]
fn explicit_terminal_ends_the_stream() {
    fn one_then_eof(m: &mut TestMachine) -> Option<StepFn> {
        let ch = m.engine.consume().expect("consume");
        m.engine.emit(Out::Text(ch.to_string())).expect("emit");
        m.engine.emit_terminal().expect("terminal");
        None
    }
    let mut n = nexter("ab", NextFn::new(one_then_eof));
    assert_eq!(n.next(), Some(Ok(Out::Text("a".to_string()))));
    assert_eq!(n.next(), None);
    assert_eq!(n.next(), None);
}

#[test]
fn source_impl_hands_items_through_verbatim() {
    fn bad_one(m: &mut TestMachine) -> Option<StepFn> {
        m.engine.consume().expect("consume");
        m.engine.emit(Out::Bad("oops".to_string())).expect("emit");
        None
    }
    let mut n = nexter("?", NextFn::new(bad_one));
    // On the pipeline path error items are elements like any other
    assert!(matches!(n.pull(), Ok(Some(Out::Bad(ref m))) if m == "oops"));
    assert!(matches!(n.pull(), Ok(None)));
    assert!(matches!(n.pull(), Ok(None)));
}

#[test]
fn marker_taken_mid_step_resumes_the_running_function() {
    // First pass: mark, consume three, rewind, hand back the marker's
    // continuation. Second pass: consume one and emit it.
    let rewound = Rc::new(Cell::new(false));
    let flag = Rc::clone(&rewound);
    let start = NextFn::new(move |m: &mut TestMachine| {
        if !flag.get() {
            let marker = m.engine.mark();
            m.engine.consume().expect("consume");
            m.engine.consume().expect("consume");
            m.engine.consume().expect("consume");
            flag.set(true);
            return m.engine.apply(&marker).expect("marker is fresh");
        }
        let ch = m.engine.consume().expect("consume");
        m.engine.emit(Out::Text(ch.to_string())).expect("emit");
        None
    });
    let mut n = nexter("abc", start);
    // The rewind un-matched everything, so the first element is still 'a'
    assert_eq!(n.next(), Some(Ok(Out::Text("a".to_string()))));
    assert_eq!(n.next(), None);
}
