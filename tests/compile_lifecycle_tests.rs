// Integration tests for the compile request lifecycle

use cppad::compile::{
    self, CompileBackend, CompileClient, CompileOutcome, CompileRequest, EMPTY_OUTPUT_PLACEHOLDER,
    GENERIC_FAILURE_MESSAGE,
};
use cppad::editor::{EditorBindings, DEFAULT_TAB_WIDTH};
use cppad::tabs::{TabField, TabId, TabRegistry, TabStatus};
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

/// Backend that holds each request until the test releases it.
///
/// Requests are matched to their gate by source code, so tests can finish
/// them in any order.
#[derive(Default)]
struct GatedBackend {
    gates: Mutex<HashMap<String, Receiver<CompileOutcome>>>,
    requests: Mutex<Vec<CompileRequest>>,
}

impl GatedBackend {
    fn gate(&self, code: &str) -> Sender<CompileOutcome> {
        let (tx, rx) = mpsc::channel();
        self.gates.lock().unwrap().insert(code.to_string(), rx);
        tx
    }

    fn requests(&self) -> Vec<CompileRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl CompileBackend for GatedBackend {
    fn compile(&self, request: &CompileRequest) -> CompileOutcome {
        self.requests.lock().unwrap().push(request.clone());
        let gate = self.gates.lock().unwrap().remove(&request.code);
        match gate.map(|rx| rx.recv()) {
            Some(Ok(outcome)) => outcome,
            _ => CompileOutcome::Transport { output: None },
        }
    }
}

struct Harness {
    backend: Arc<GatedBackend>,
    client: CompileClient,
    registry: TabRegistry,
    bindings: EditorBindings,
}

impl Harness {
    fn new() -> Self {
        let backend = Arc::new(GatedBackend::default());
        let client = CompileClient::new(backend.clone());
        let registry = TabRegistry::new();
        let mut bindings = EditorBindings::new(DEFAULT_TAB_WIDTH);
        bindings.mount(registry.active());
        Harness {
            backend,
            client,
            registry,
            bindings,
        }
    }

    fn set_code(&mut self, id: TabId, code: &str) {
        assert!(self.bindings.replace_content(&mut self.registry, id, code));
    }

    /// Give tab `id` unique code and start compiling it behind a gate
    fn start(&mut self, id: TabId, code: &str) -> Sender<CompileOutcome> {
        self.set_code(id, code);
        let gate = self.backend.gate(code);
        self.client
            .compile(&mut self.registry, &self.bindings, id)
            .unwrap();
        gate
    }

    fn activate(&mut self, id: TabId) {
        self.registry.set_active_tab(id).unwrap();
        self.bindings.mount(self.registry.active());
    }
}

fn success(output: &str) -> CompileOutcome {
    CompileOutcome::Success {
        output: Some(output.to_string()),
    }
}

#[test]
fn test_successful_compile() {
    let mut h = Harness::new();
    let id = h.registry.active_id();
    let gate = h.start(id, "int main() { return 0; }");

    let tab = h.registry.get(id).unwrap();
    assert_eq!(tab.status(), TabStatus::Compiling);
    assert!(h.client.is_pending(id));

    gate.send(success("Hello, World!\n")).unwrap();
    assert_eq!(h.client.wait(&mut h.registry, WAIT), 1);

    let tab = h.registry.get(id).unwrap();
    assert_eq!(tab.status(), TabStatus::Success);
    assert_eq!(tab.output(), "Hello, World!\n");
    assert_eq!(tab.error(), "");
    assert!(!h.client.is_pending(id));
}

#[test]
fn test_success_with_empty_output_uses_placeholder() {
    let mut h = Harness::new();
    let id = h.registry.active_id();
    let gate = h.start(id, "int main() {}");
    gate.send(CompileOutcome::Success { output: None }).unwrap();
    h.client.wait(&mut h.registry, WAIT);

    assert_eq!(h.registry.get(id).unwrap().output(), EMPTY_OUTPUT_PLACEHOLDER);
}

#[test]
fn test_compiler_error_reported_on_tab() {
    let mut h = Harness::new();
    let id = h.registry.active_id();
    let gate = h.start(id, "int main() { return x; }");
    gate.send(CompileOutcome::Failure {
        message: Some("error: 'x' was not declared in this scope".to_string()),
        output: Some("partial".to_string()),
    })
    .unwrap();
    h.client.wait(&mut h.registry, WAIT);

    let tab = h.registry.get(id).unwrap();
    assert_eq!(tab.status(), TabStatus::Error);
    assert_eq!(tab.error(), "error: 'x' was not declared in this scope");
    assert_eq!(tab.output(), "partial");
}

#[test]
fn test_failure_without_details_uses_generic_message() {
    let mut h = Harness::new();
    let id = h.registry.active_id();
    let gate = h.start(id, "int main( {}");
    gate.send(CompileOutcome::Failure {
        message: Some(String::new()),
        output: None,
    })
    .unwrap();
    h.client.wait(&mut h.registry, WAIT);

    let tab = h.registry.get(id).unwrap();
    assert_eq!(tab.status(), TabStatus::Error);
    assert_eq!(tab.error(), GENERIC_FAILURE_MESSAGE);
    assert_eq!(tab.output(), "");
}

#[test]
fn test_transport_failure_is_tab_local() {
    let mut h = Harness::new();
    let first = h.registry.active_id();
    let second = h.registry.create_tab();
    h.activate(second);

    // No gate registered: the backend reports a transport failure
    h.set_code(second, "int main() { return 1; }");
    h.client
        .compile(&mut h.registry, &h.bindings, second)
        .unwrap();
    h.client.wait(&mut h.registry, WAIT);

    let tab = h.registry.get(second).unwrap();
    assert_eq!(tab.status(), TabStatus::Error);
    assert_eq!(tab.error(), GENERIC_FAILURE_MESSAGE);
    assert_eq!(tab.output(), "");
    assert_eq!(h.registry.get(first).unwrap().status(), TabStatus::Idle);
}

#[test]
fn test_result_lands_on_originating_tab_after_switch() {
    let mut h = Harness::new();
    let a = h.registry.active_id();
    let gate = h.start(a, "// tab a\nint main() {}");

    let b = h.registry.create_tab();
    h.activate(b);
    gate.send(success("from a")).unwrap();
    assert_eq!(h.client.wait(&mut h.registry, WAIT), 1);

    assert_eq!(h.registry.active_id(), b);
    assert_eq!(h.registry.get(a).unwrap().output(), "from a");
    assert_eq!(h.registry.get(a).unwrap().status(), TabStatus::Success);
    let active = h.registry.active();
    assert_eq!(active.status(), TabStatus::Idle);
    assert_eq!(active.output(), "");
}

#[test]
fn test_tabs_compile_independently() {
    let mut h = Harness::new();
    let a = h.registry.active_id();
    let gate_a = h.start(a, "// a\nint main() {}");

    let b = h.registry.create_tab();
    h.activate(b);
    let gate_b = h.start(b, "// b\nint main() {}");
    assert_eq!(h.registry.get(a).unwrap().status(), TabStatus::Compiling);
    assert_eq!(h.registry.get(b).unwrap().status(), TabStatus::Compiling);

    gate_b
        .send(CompileOutcome::Failure {
            message: Some("syntax error".to_string()),
            output: None,
        })
        .unwrap();
    assert_eq!(h.client.wait(&mut h.registry, WAIT), 1);
    assert_eq!(h.registry.get(b).unwrap().status(), TabStatus::Error);
    assert_eq!(h.registry.get(a).unwrap().status(), TabStatus::Compiling);

    gate_a.send(success("a done")).unwrap();
    assert_eq!(h.client.wait(&mut h.registry, WAIT), 1);
    assert_eq!(h.registry.get(a).unwrap().status(), TabStatus::Success);
    assert_eq!(h.registry.get(b).unwrap().error(), "syntax error");
}

#[test]
fn test_result_for_closed_tab_is_dropped() {
    let mut h = Harness::new();
    let a = h.registry.active_id();
    let b = h.registry.create_tab();
    h.activate(b);
    let gate = h.start(b, "// tab b\nint main() {}");

    h.registry.close_tab(b).unwrap();
    h.bindings.release(b);
    h.client.forget(b);

    gate.send(success("late")).unwrap();
    assert_eq!(h.client.wait(&mut h.registry, WAIT), 0);
    assert!(!h.registry.contains(b));
    assert_eq!(h.registry.len(), 1);
    assert_eq!(h.registry.get(a).unwrap().output(), "");
}

#[test]
fn test_superseded_result_is_dropped() {
    let mut h = Harness::new();
    let id = h.registry.active_id();
    let first = h.start(id, "// v1\nint main() {}");
    let second = h.start(id, "// v2\nint main() {}");

    second.send(success("v2 output")).unwrap();
    assert_eq!(h.client.wait(&mut h.registry, WAIT), 1);
    assert_eq!(h.registry.get(id).unwrap().output(), "v2 output");

    // The older request finishes last and must not overwrite the newer result
    first.send(success("v1 output")).unwrap();
    assert_eq!(h.client.wait(&mut h.registry, WAIT), 0);
    assert_eq!(h.registry.get(id).unwrap().output(), "v2 output");
}

#[test]
fn test_compile_uses_live_buffer_and_trimmed_input() {
    let mut h = Harness::new();
    let id = h.registry.active_id();
    let code = "#include <iostream>\nint main() { int n; std::cin >> n; std::cout << n * 2; }\n";
    h.set_code(id, code);
    assert!(h.registry.get(id).unwrap().show_input());

    assert!(h.registry.update_tab_field(id, TabField::Input, "  21 \n"));
    let gate = h.backend.gate(code);
    h.client
        .compile(&mut h.registry, &h.bindings, id)
        .unwrap();
    gate.send(success("42")).unwrap();
    h.client.wait(&mut h.registry, WAIT);

    let requests = h.backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].code, code);
    assert_eq!(requests[0].input, "21");
    assert_eq!(h.registry.get(id).unwrap().output(), "42");
}

#[test]
fn test_compile_unknown_tab() {
    let mut h = Harness::new();
    let result = h
        .client
        .compile(&mut h.registry, &h.bindings, TabId(77));
    assert!(matches!(result, Err(compile::CompileError::UnknownTab(TabId(77)))));
    assert!(!h.client.is_pending(TabId(77)));
}

#[test]
fn test_clear_output_keeps_code_and_input() {
    let mut h = Harness::new();
    let id = h.registry.active_id();
    let code = "int main() { return 0; }";
    let gate = h.start(id, code);
    h.registry.update_tab_field(id, TabField::Input, "7");

    // Ignored while the request is outstanding
    assert!(!compile::clear_output(&mut h.registry, id));
    assert_eq!(h.registry.get(id).unwrap().status(), TabStatus::Compiling);

    gate.send(success("done")).unwrap();
    h.client.wait(&mut h.registry, WAIT);
    assert!(compile::clear_output(&mut h.registry, id));

    let tab = h.registry.get(id).unwrap();
    assert_eq!(tab.status(), TabStatus::Idle);
    assert_eq!(tab.output(), "");
    assert_eq!(tab.error(), "");
    assert_eq!(tab.code(), code);
    assert_eq!(tab.input(), "7");
}

#[test]
fn test_recompile_clears_previous_result() {
    let mut h = Harness::new();
    let id = h.registry.active_id();
    let gate = h.start(id, "// first\nint main() {}");
    gate.send(CompileOutcome::Failure {
        message: Some("boom".to_string()),
        output: None,
    })
    .unwrap();
    h.client.wait(&mut h.registry, WAIT);
    assert_eq!(h.registry.get(id).unwrap().error(), "boom");

    let _gate = h.start(id, "// second\nint main() {}");
    let tab = h.registry.get(id).unwrap();
    assert_eq!(tab.status(), TabStatus::Compiling);
    assert_eq!(tab.error(), "");
    assert_eq!(tab.output(), "");
}
