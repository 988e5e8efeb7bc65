//! Facade tests, run in a JS host with `wasm-pack test`.

#![cfg(target_arch = "wasm32")]

use js_sys::Reflect;
use nexus_graph_wasm::Nexus;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

fn field(object: &JsValue, name: &str) -> JsValue {
    Reflect::get(object, &JsValue::from_str(name)).unwrap()
}

fn object(json: &str) -> JsValue {
    js_sys::JSON::parse(json).unwrap()
}

#[wasm_bindgen_test]
fn add_node_dedups_and_merges() {
    let mut nexus = Nexus::new(JsValue::UNDEFINED).unwrap();
    let first = nexus.add_node("a".into(), object(r#"{ "w": 1, "c": "red" }"#)).unwrap();
    let second = nexus.add_node("a".into(), object(r#"{ "w": 2 }"#)).unwrap();

    assert_eq!(field(&first, "id"), field(&second, "id"));
    assert_eq!(nexus.node_count(), 1);

    let data = field(&second, "data");
    assert_eq!(field(&data, "w").as_f64(), Some(2.0));
    assert_eq!(field(&data, "c").as_string().as_deref(), Some("red"));
}

#[wasm_bindgen_test]
fn add_link_spec_then_pair() {
    let mut nexus = Nexus::new(JsValue::UNDEFINED).unwrap();
    nexus
        .add_link(
            object(r#"{ "nodeFrom": "x", "nodeTo": "y", "data": { "w": 1 } }"#),
            JsValue::UNDEFINED,
            JsValue::UNDEFINED,
        )
        .unwrap();
    let link = nexus
        .add_link("x".into(), "y".into(), object(r#"{ "w": 2 }"#))
        .unwrap();

    assert_eq!(nexus.link_count(), 1);
    assert_eq!(field(&link, "name").as_string().as_deref(), Some("x->y"));
    assert_eq!(field(&field(&link, "data"), "w").as_f64(), Some(2.0));
}

#[wasm_bindgen_test]
fn lookups_are_directed_and_missing_is_undefined() {
    let mut nexus = Nexus::new(JsValue::UNDEFINED).unwrap();
    nexus.add_link("a".into(), "b".into(), JsValue::UNDEFINED).unwrap();

    assert!(!nexus.get_link("a".into(), "b".into()).unwrap().is_undefined());
    assert!(nexus.get_link("b".into(), "a".into()).unwrap().is_undefined());
    assert!(nexus.get_node("zzz".into()).unwrap().is_undefined());

    let removed = nexus.remove_link("a->b".into(), JsValue::UNDEFINED).unwrap();
    assert!(!removed.is_undefined());
    assert!(nexus.get_link("a".into(), "b".into()).unwrap().is_undefined());
}

#[wasm_bindgen_test]
fn links_from_is_plain_object() {
    let mut nexus = Nexus::new(JsValue::UNDEFINED).unwrap();
    nexus.add_link("a".into(), "b".into(), JsValue::UNDEFINED).unwrap();
    nexus.add_link("a".into(), "c".into(), JsValue::UNDEFINED).unwrap();

    let from = nexus.get_links_from("a".into()).unwrap();
    let keys = js_sys::Object::keys(&js_sys::Object::from(from));
    assert_eq!(keys.length(), 2);
}

#[wasm_bindgen_test]
fn options_and_particles() {
    let mut nexus = Nexus::new(object(r#"{ "friction": 0.5 }"#)).unwrap();
    assert_eq!(nexus.friction(), 0.5);
    assert_eq!(nexus.gravity(), 0.0);

    let index = nexus
        .add_particle(object(r#"{ "location": { "x": 3 } }"#))
        .unwrap();
    let particle = nexus.get_particle(index).unwrap();
    assert_eq!(field(&particle, "mass").as_f64(), Some(1.0));
    assert!(field(&particle, "death").is_null() || field(&particle, "death").is_undefined());

    assert_eq!(nexus.nearest_particle(2.0, 0.0, 0.0), Some(index));
    assert!(nexus.set_particle_location(index, 9.0, 9.0, 9.0));
    assert_eq!(nexus.get_locations().to_vec(), vec![9.0, 9.0, 9.0]);
}

#[wasm_bindgen_test]
fn numbers_that_are_not_ids_find_nothing() {
    let mut nexus = Nexus::new(JsValue::UNDEFINED).unwrap();
    nexus.add_node("a".into(), JsValue::UNDEFINED).unwrap();
    nexus.add_node("b".into(), JsValue::UNDEFINED).unwrap();

    assert!(!nexus.get_node(JsValue::from_f64(0.0)).unwrap().is_undefined());
    for key in [-1.0, f64::NAN, 0.5, 1.5, 1e12] {
        assert!(nexus.get_node(JsValue::from_f64(key)).unwrap().is_undefined());
        assert!(nexus.remove_node(JsValue::from_f64(key)).unwrap().is_undefined());
    }
    assert_eq!(nexus.node_count(), 2);

    assert!(nexus.add_link(JsValue::from_f64(-1.0), "b".into(), JsValue::UNDEFINED).is_err());
    assert_eq!(nexus.link_count(), 0);
}

#[wasm_bindgen_test]
fn stepper_reads_and_writes_particle_vectors() {
    let mut nexus = Nexus::new(JsValue::UNDEFINED).unwrap();
    let first = nexus.add_particle(JsValue::UNDEFINED).unwrap();
    let second = nexus.add_particle(JsValue::UNDEFINED).unwrap();

    assert!(nexus.set_particle_velocity(first, 1.0, 2.0, 3.0));
    assert!(nexus.set_particle_force(second, 0.0, -1.0, 0.0));
    assert!(!nexus.set_particle_force(9, 0.0, 0.0, 0.0));

    assert_eq!(nexus.get_velocities().to_vec(), vec![1.0, 2.0, 3.0, 0.0, 0.0, 0.0]);
    assert_eq!(nexus.get_forces().to_vec(), vec![0.0, 0.0, 0.0, 0.0, -1.0, 0.0]);

    nexus.set_locations(&[1.0, 1.0, 1.0, 5.0, 5.0, 5.0]).unwrap();
    nexus.set_forces(&[0.0; 6]).unwrap();
    assert!(nexus.set_velocities(&[1.0]).is_err());

    assert_eq!(nexus.get_locations().to_vec(), vec![1.0, 1.0, 1.0, 5.0, 5.0, 5.0]);
    assert_eq!(nexus.get_forces().to_vec(), vec![0.0; 6]);
    assert_eq!(nexus.nearest_particle(4.0, 4.0, 4.0), Some(second));
}
