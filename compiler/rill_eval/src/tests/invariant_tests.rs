//! The core invariants: symbol identity, nil, truthiness, primitive ivars,
//! ancestor determinism, map ordering, and the scope assignment rule.

use rill_ir::BinaryOp;

use super::support::{eval_program, run_program};
use crate::errors::ErrorKind;
use crate::value::Value;

#[test]
fn symbols_with_equal_names_are_the_same_object() {
    let (result, interp) = run_program(|b| {
        let left = b.symbol("shared");
        let right = b.symbol("shared");
        let cmp = b.binary(BinaryOp::Eq, left, right);
        b.stmt(cmp);
    });
    assert_eq!(result.unwrap(), Value::Bool(true));

    // Same name interns to the same id; ids are monotonic and stable.
    let first = interp.interner().intern("shared");
    let second = interp.interner().intern("shared");
    assert_eq!(first, second);
}

#[test]
fn nil_is_one_logical_object() {
    let result = eval_program(|b| {
        let left = b.nil();
        let right = b.nil();
        let cmp = b.binary(BinaryOp::Eq, left, right);
        b.stmt(cmp);
    });
    assert_eq!(result.unwrap(), Value::Bool(true));
    assert!(!Value::Nil.is_truthy());
}

#[test]
fn only_nil_and_false_are_non_truthy() {
    // Zero is truthy: the else branch is not taken.
    let result = eval_program(|b| {
        let zero = b.int(0);
        let then = b.int(1);
        let els = b.int(2);
        let cond = b.if_(zero, then, Some(els));
        b.stmt(cond);
    });
    assert_eq!(result.unwrap(), Value::Int(1));

    // False takes the else branch.
    let result = eval_program(|b| {
        let fls = b.boolean(false);
        let then = b.int(1);
        let els = b.int(2);
        let cond = b.if_(fls, then, Some(els));
        b.stmt(cond);
    });
    assert_eq!(result.unwrap(), Value::Int(2));

    // Nil without an else branch evaluates to nil.
    let result = eval_program(|b| {
        let nil = b.nil();
        let then = b.int(1);
        let cond = b.if_(nil, then, None);
        b.stmt(cond);
    });
    assert_eq!(result.unwrap(), Value::Nil);
}

#[test]
fn ivar_access_on_primitive_is_type_misuse() {
    // Top-level self is nil, a primitive.
    let result = eval_program(|b| {
        let read = b.ivar_get("x");
        b.stmt(read);
    });
    assert_eq!(result.unwrap_err().kind, ErrorKind::TypeMisuse);

    let result = eval_program(|b| {
        let one = b.int(1);
        let write = b.ivar_set("x", one);
        b.stmt(write);
    });
    assert_eq!(result.unwrap_err().kind, ErrorKind::TypeMisuse);
}

#[test]
fn ancestors_are_duplicate_free_in_first_occurrence_order() {
    // Shared is included by both Mixin and the class; it must appear once,
    // at its first position. The chain surfaces through Class#ancestors.
    let result = eval_program(|b| {
        let shared = b.module_decl("Shared", &[]);
        b.stmt(shared);

        let inner_include = b.include_directive("Shared");
        let mixin = b.module_decl("Mixin", &[inner_include]);
        b.stmt(mixin);

        let base = b.class_decl("Base", None, &[]);
        b.stmt(base);

        let include_mixin = b.include_directive("Mixin");
        let include_shared = b.include_directive("Shared");
        let class = b.class_decl("Child", Some("Base"), &[include_mixin, include_shared]);
        b.stmt(class);

        let child = b.ident("Child");
        let ancestors = b.call(Some(child), "ancestors", &[], None);
        b.stmt(ancestors);
    });

    // Shared was included last, so it is searched first; Mixin follows, its
    // own inclusion of Shared deduplicated; the superclass comes last.
    assert_eq!(
        result.unwrap(),
        Value::list(vec![
            Value::string("Shared"),
            Value::string("Mixin"),
            Value::string("Base"),
        ])
    );
}

#[test]
fn fresh_map_keys_iterate_in_insertion_order() {
    // k1..k4 assigned in order through []=; each must visit in that order.
    let (result, interp) = run_program(|b| {
        let empty_list = b.list(&[]);
        let order = b.assign("order", empty_list);
        b.stmt(order);
        let empty_map = b.map(&[]);
        let m = b.assign("m", empty_map);
        b.stmt(m);

        for (key, value) in [("k1", 1), ("k2", 2), ("k3", 3), ("k4", 4)] {
            let m = b.ident("m");
            let k = b.symbol(key);
            let v = b.int(value);
            let store = b.index_set(m, k, v);
            b.stmt(store);
        }

        let order_ref = b.ident("order");
        let k = b.ident("k");
        let push = b.call(Some(order_ref), "push", &[k], None);
        let block = b.block(&["k", "v"], &[push]);
        let m = b.ident("m");
        let each = b.call(Some(m), "each", &[], Some(block));
        b.stmt(each);

        let order = b.ident("order");
        b.stmt(order);
    });

    let keys: Vec<Value> = ["k1", "k2", "k3", "k4"]
        .iter()
        .map(|k| Value::Symbol(interp.interner().intern(k)))
        .collect();
    assert_eq!(result.unwrap(), Value::list(keys));
}

#[test]
fn merge_falls_back_to_receiver_for_uncollided_keys() {
    let result = eval_program(|b| {
        let a1 = b.symbol("a");
        let one = b.int(1);
        let left = b.map(&[(a1, one)]);
        let b2 = b.symbol("b");
        let two = b.int(2);
        let right = b.map(&[(b2, two)]);
        let merged = b.binary(BinaryOp::Add, left, right);
        let key = b.symbol("a");
        let lookup = b.index(merged, key);
        b.stmt(lookup);
    });
    assert_eq!(result.unwrap(), Value::Int(1));
}

#[test]
fn assignment_mutates_enclosing_binding_through_blocks() {
    // x = 1; [10, 20].each { |i| x = x + i }; x
    // The block's frame parents to the defining scope, so assignment walks
    // out and mutates the top-level x.
    let result = eval_program(|b| {
        let one = b.int(1);
        let init = b.assign("x", one);
        b.stmt(init);

        let x = b.ident("x");
        let i = b.ident("i");
        let sum = b.binary(BinaryOp::Add, x, i);
        let update = b.assign("x", sum);
        let block = b.block(&["i"], &[update]);

        let ten = b.int(10);
        let twenty = b.int(20);
        let list = b.list(&[ten, twenty]);
        let each = b.call(Some(list), "each", &[], Some(block));
        b.stmt(each);

        let x = b.ident("x");
        b.stmt(x);
    });
    assert_eq!(result.unwrap(), Value::Int(31));
}

#[test]
fn dispatch_searches_type_then_mixins_then_superclass() {
    // Base defines m; a module included by Child overrides it; Child's own
    // definition beats both.
    let result = eval_program(|b| {
        let one = b.int(1);
        let base_m = b.method_def("m", &[], &[one]);
        let base = b.class_decl("Base", None, &[base_m]);
        b.stmt(base);

        let two = b.int(2);
        let mixin_m = b.method_def("m", &[], &[two]);
        let mixin = b.module_decl("Mixin", &[mixin_m]);
        b.stmt(mixin);

        // Child with only the mixin: the module wins over the superclass.
        let include = b.include_directive("Mixin");
        let child = b.class_decl("Child", Some("Base"), &[include]);
        b.stmt(child);
        let child_ref = b.ident("Child");
        let new = b.call(Some(child_ref), "new", &[], None);
        let call = b.call(Some(new), "m", &[], None);
        let first = b.assign("from_mixin", call);
        b.stmt(first);

        // Plain subclass: the superclass provides m.
        let plain = b.class_decl("Plain", Some("Base"), &[]);
        b.stmt(plain);
        let plain_ref = b.ident("Plain");
        let new = b.call(Some(plain_ref), "new", &[], None);
        let call = b.call(Some(new), "m", &[], None);
        let second = b.assign("from_base", call);
        b.stmt(second);

        let from_mixin = b.ident("from_mixin");
        let from_base = b.ident("from_base");
        let result = b.list(&[from_mixin, from_base]);
        b.stmt(result);
    });
    assert_eq!(
        result.unwrap(),
        Value::list(vec![Value::Int(2), Value::Int(1)])
    );
}
