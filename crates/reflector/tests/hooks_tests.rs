//! Integration tests for lifecycle hooks
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test hooks_tests
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use reflector::{
    method_decorator, property_decorator, Class, ClassDef, PartialHook, ReflectError, Reflector,
    TypeRef,
};

fn counter() -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    (Arc::clone(&count), count)
}

// ===== Creation Hook Tests =====

#[test]
fn test_class_created() {
    let reflector = Reflector::new();
    let (seen, count) = counter();
    reflector.register_hook(PartialHook::new().on_create_class(move |_| {
        count.fetch_add(1, Ordering::SeqCst);
    }));

    reflector.get_or_create(&Class::new("X", None));
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[test]
fn test_method_created_counts_constructor() {
    let reflector = Reflector::new();
    let (seen, count) = counter();
    reflector.register_hook(PartialHook::new().on_create_method(move |_, _| {
        count.fetch_add(1, Ordering::SeqCst);
    }));

    let cd = reflector.get_or_create(&Class::new("X", None));
    let first = cd.get_or_create_method("MyMethod");
    for _ in 0..3 {
        assert!(Arc::ptr_eq(&first, &cd.get_or_create_method("MyMethod")));
    }
    // constructor plus one method
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[test]
fn test_property_created() {
    let reflector = Reflector::new();
    let (seen, count) = counter();
    reflector.register_hook(PartialHook::new().on_create_property(move |_, _| {
        count.fetch_add(1, Ordering::SeqCst);
    }));

    let cd = reflector.get_or_create(&Class::new("X", None));
    let first = cd.get_or_create_property("MyProperty");
    assert!(Arc::ptr_eq(&first, &cd.get_or_create_property("MyProperty")));
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[test]
fn test_parameter_created() {
    let reflector = Reflector::new();
    let (seen, count) = counter();
    reflector.register_hook(PartialHook::new().on_create_parameter(move |_, _, _| {
        count.fetch_add(1, Ordering::SeqCst);
    }));

    let cd = reflector.get_or_create(&Class::new("X", None));
    let md = cd.get_or_create_method("MyProperty");
    let first = md.get_or_create_parameter(0);
    for _ in 0..3 {
        assert!(Arc::ptr_eq(&first, &md.get_or_create_parameter(0)));
    }
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

// ===== Processing Hook Tests =====

#[test]
fn test_method_processed() {
    let reflector = Reflector::new();
    let (seen, count) = counter();
    reflector.register_hook(PartialHook::new().on_processed_method(move |_, _| {
        count.fetch_add(1, Ordering::SeqCst);
    }));

    let cd = reflector.get_or_create(&Class::new("X", None));
    cd.get_or_create_method("MyMethod1");
    cd.get_or_create_method("MyMethod2");
    cd.build();
    // constructor plus two methods
    assert_eq!(seen.load(Ordering::SeqCst), 3);
}

#[test]
fn test_class_processed_once() {
    let reflector = Reflector::new();
    let (seen, count) = counter();
    reflector.register_hook(PartialHook::new().on_processed_class(move |_| {
        count.fetch_add(1, Ordering::SeqCst);
    }));

    let cd = reflector.get_or_create(&Class::new("X", None));
    cd.get_or_create_method("MyMethod1");
    cd.get_or_create_method("MyMethod2");
    cd.build();
    cd.build();
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

// ===== Decoration Hook Tests =====

#[test]
fn test_decoration_hooks_follow_declaration() {
    let reflector = Reflector::new();
    let (methods_seen, methods) = counter();
    let (properties_seen, properties) = counter();
    reflector.register_hook(
        PartialHook::new()
            .on_decorated_method(move |_, _| {
                methods.fetch_add(1, Ordering::SeqCst);
            })
            .on_decorated_property(move |_, _| {
                properties.fetch_add(1, Ordering::SeqCst);
            }),
    );

    ClassDef::new("Order")
        .method("total", |m| {
            m.decorate(method_decorator(|_, _, _| {}))
                .decorate(method_decorator(|_, _, _| {}));
        })
        .field("id", |f| {
            f.typed(TypeRef::string()).decorate(property_decorator(|_, _| {}));
        })
        .define(&reflector);

    assert_eq!(methods_seen.load(Ordering::SeqCst), 2);
    assert_eq!(properties_seen.load(Ordering::SeqCst), 1);
}

#[test]
fn test_hooks_see_created_descriptor() {
    let reflector = Reflector::new();
    let names = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = Arc::clone(&names);
    reflector.register_hook(PartialHook::new().on_create_method(move |cd, md| {
        sink.lock().push(format!("{}.{}", cd.name(), md.name()));
    }));

    let cd = reflector.get_or_create(&Class::new("Cart", None));
    cd.get_or_create_method("checkout");
    assert_eq!(*names.lock(), vec!["Cart.constructor", "Cart.checkout"]);
}

#[test]
fn test_missing_hook_is_rejected() {
    let reflector = Reflector::new();
    assert!(matches!(reflector.add_hook(None), Err(ReflectError::InvalidHook)));
    assert!(reflector.hooks().is_empty());
}
