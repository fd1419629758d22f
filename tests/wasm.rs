// In-browser smoke tests for the WASM surface. Run with wasm-pack test.
// The state machines themselves are covered natively in the unit suites.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use motion_core::{WasmContactForm, WasmRevealController, WasmScrollSpy, WasmTrailEngine};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn reveal_controller_over_the_boundary() {
    let mut ctl = WasmRevealController::new(r#"{"animation_class":"fade-up"}"#).unwrap();
    ctl.hydrate(0.0).unwrap();
    assert_eq!(ctl.state(), "hidden");
    assert_eq!(ctl.poll(1000.0), "revealed");
}

#[wasm_bindgen_test]
fn invalid_settings_surface_as_js_errors() {
    assert!(WasmRevealController::new("not json").is_err());
    assert!(WasmScrollSpy::new(r#"{"sections":42}"#).is_err());
}

#[wasm_bindgen_test]
fn trail_engine_over_the_boundary() {
    let mut engine = WasmTrailEngine::new("{}").unwrap();
    engine
        .pointer_moved(10.0, 20.0, 0.0, r#"[{"tag":"div"}]"#)
        .unwrap();
    engine
        .pointer_moved(30.0, 40.0, 20.0, r#"[{"tag":"div"}]"#)
        .unwrap();
    assert_eq!(engine.path_data(), "M 10 20 L 30 40");
}

#[wasm_bindgen_test]
async fn boundary_reply_reduces_to_outcome() {
    let reply = js_sys::Promise::resolve(&wasm_bindgen::JsValue::from_str(
        r#"{"status":200,"body":"{\"success\":true}"}"#,
    ));
    let outcome = motion_core::resolve_boundary_reply(reply).await.unwrap();
    assert_eq!(outcome, r#"{"outcome":"success"}"#);

    let mut form = WasmContactForm::new();
    form.set_fields(
        r#"{"name":"Ada","email":"ada@example.com","subject":"Hi","message":"Hello"}"#,
    )
    .unwrap();
    form.begin_submit().unwrap();
    form.complete(&outcome).unwrap();
    assert_eq!(form.status(), "success");
}
