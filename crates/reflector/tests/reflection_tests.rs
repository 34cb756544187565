//! Integration tests for descriptor creation, lookup and the build pass
//!
//! Classes are declared through `ClassDef`, which emits design metadata and
//! applies decorators in host order, then inspected through the reflector.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test reflection_tests
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use reflector::{
    class_decorator, method_decorator, parameter_decorator, property_decorator, Annotated, ClassDef,
    PartialHook, Reflector, TypeRef,
};

fn class_attr() -> reflector::ClassDecorator {
    class_decorator(|_| {})
}

// ===== Registry Tests =====

#[test]
fn test_decorated_class_has_descriptor() {
    let reflector = Reflector::new();
    let class = ClassDef::new("ClassTest").decorate(class_attr()).define(&reflector);

    let cd = reflector.get(&class).expect("descriptor");
    assert_eq!(cd.name(), "ClassTest");
    assert!(Arc::ptr_eq(cd.target(), &class));
}

#[test]
fn test_undecorated_class_has_no_descriptor() {
    let reflector = Reflector::new();
    let class = ClassDef::new("Plain").method("m", |_| {}).define(&reflector);
    assert!(reflector.get(&class).is_none());
}

#[test]
fn test_get_or_create_is_stable() {
    let reflector = Reflector::new();
    let created = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&created);
    reflector.register_hook(PartialHook::new().on_create_class(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    let class = ClassDef::new("X").define(&reflector);
    let first = reflector.get_or_create(&class);
    let second = reflector.get_or_create(&class);

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(created.load(Ordering::SeqCst), 1);
}

#[test]
fn test_method_decoration_creates_descriptor() {
    let reflector = Reflector::new();
    let class = ClassDef::new("MethodTest")
        .method("method", |m| {
            m.decorate(method_decorator(|_, _, _| {}));
        })
        .define(&reflector);

    let cd = reflector.get(&class).expect("descriptor");
    let methods = cd.methods();
    assert_eq!(methods.len(), 2);
    assert!(methods[0].is_constructor());
    assert_eq!(methods[1].name(), "method");
}

#[test]
fn test_decorated_parameter_only() {
    let reflector = Reflector::new();
    let class = ClassDef::new("ParamTest")
        .method("method", |m| {
            m.param("p", TypeRef::string()).decorate(parameter_decorator(|_, _, _| {}));
        })
        .define(&reflector);

    let cd = reflector.get(&class).expect("descriptor");
    let method = cd.method("method").expect("method");
    assert_eq!(method.parameter_count(), 1);
    assert_eq!(method.parameter(0).map(|p| p.idx()), Some(0));
}

#[test]
fn test_undecorated_trailing_parameter_is_inferred() {
    let reflector = Reflector::new();
    let class = ClassDef::new("ParamTestTyped")
        .method("method", |m| {
            m.param("p", TypeRef::string()).decorate(parameter_decorator(|_, _, _| {}));
            m.param("s", TypeRef::string());
        })
        .define(&reflector);

    let cd = reflector.get(&class).expect("descriptor");
    cd.build();

    let method = cd.method("method").expect("method");
    assert_eq!(method.parameter_count(), 2);
    let trailing = method.parameter(1).expect("parameter 1");
    assert_eq!(trailing.idx(), 1);
    assert_eq!(trailing.declared_type().map(|t| t.name().to_string()), Some("String".to_string()));
}

// ===== Inheritance Tests =====

#[test]
fn test_child_and_parent_are_separate() {
    let reflector = Reflector::new();
    let parent = ClassDef::new("PropertyTest")
        .field("name", |f| {
            f.typed(TypeRef::string()).decorate(property_decorator(|_, _| {}));
        })
        .define(&reflector);
    let child = ClassDef::new("PropertyTestDescending")
        .extends(&parent)
        .field("username", |f| {
            f.typed(TypeRef::string()).decorate(property_decorator(|_, _| {}));
        })
        .define(&reflector);

    let child_cd = reflector.get(&child).expect("child");
    let parent_cd = reflector.get(&parent).expect("parent");
    let names = |props: Vec<Arc<reflector::PropertyDescriptor>>| {
        props.iter().map(|p| p.name().to_string()).collect::<Vec<_>>()
    };
    assert_eq!(names(child_cd.properties()), vec!["username"]);
    assert_eq!(names(parent_cd.properties()), vec!["name"]);

    let chain = reflector.get_with_ancestors(&child);
    assert_eq!(chain.len(), 2);
    assert_eq!(chain[0].as_ref().map(|cd| cd.name()), Some("PropertyTestDescending"));
    assert_eq!(chain[1].as_ref().map(|cd| cd.name()), Some("PropertyTest"));
}

#[test]
fn test_ancestors_keep_undescribed_child_slot() {
    let reflector = Reflector::new();
    let base = ClassDef::new("Base").decorate(class_attr()).define(&reflector);
    let descendant = ClassDef::new("Descendant").extends(&base).define(&reflector);

    let chain = reflector.get_with_ancestors(&descendant);
    assert_eq!(chain.len(), 2);
    assert!(chain[0].is_none());
    assert_eq!(chain[1].as_ref().map(|cd| cd.name()), Some("Base"));
}

#[test]
fn test_inherited_method_gets_parent_types() {
    let reflector = Reflector::new();
    let parent = ClassDef::new("Parent")
        .method("m", |m| {
            m.param("a", TypeRef::number());
            m.returns(TypeRef::string());
        })
        .define(&reflector);
    let child = ClassDef::new("Child").extends(&parent).define(&reflector);

    let cd = reflector.get_or_create(&child);
    let method = cd.get_or_create_method("m");
    cd.build();

    assert_eq!(method.parameter_count(), 1);
    let a = method.parameter(0).expect("parameter 0");
    assert_eq!(a.name(), Some("a".to_string()));
    assert_eq!(a.declared_type(), Some(TypeRef::number()));
    assert_eq!(method.return_type(), Some(TypeRef::string()));
}

// ===== Build Tests =====

#[test]
fn test_build_without_properties() {
    let reflector = Reflector::new();
    let class = ClassDef::new("TestClass")
        .method("testMethod", |_| {})
        .field("testProp", |f| {
            f.typed(TypeRef::string());
        })
        .define(&reflector);

    let cd = reflector.get_or_create(&class);
    cd.build();

    assert!(cd.properties().is_empty());
    let methods = cd.methods();
    assert_eq!(methods.len(), 2);
    assert_eq!(methods[1].name(), "testMethod");
}

#[test]
fn test_build_discovers_accessor() {
    let reflector = Reflector::new();
    let class = ClassDef::new("TestClass")
        .method("testMethod", |_| {})
        .accessor("testProp", |a| {
            a.getter(|_, _| reflector::Value::from(""));
        })
        .define(&reflector);

    let cd = reflector.get_or_create(&class);
    cd.build();

    let properties = cd.properties();
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].name(), "testProp");
    assert_eq!(cd.methods().len(), 2);
}

#[test]
fn test_property_type_from_metadata() {
    let reflector = Reflector::new();
    let class = ClassDef::new("TestClass")
        .field("test", |f| {
            f.typed(TypeRef::string()).decorate(property_decorator(|_, _| {}));
        })
        .define(&reflector);

    let cd = reflector.get_or_create(&class);
    cd.build();
    assert_eq!(cd.property("test").and_then(|p| p.declared_type()), Some(TypeRef::string()));
}

#[test]
fn test_property_type_set_by_decorator_is_kept() {
    let reflector = Reflector::new();
    let class = ClassDef::new("TestClass")
        .field("test", |f| {
            f.typed(TypeRef::string())
                .decorate(property_decorator(|_, p| p.set_declared_type(TypeRef::number())));
        })
        .define(&reflector);

    let cd = reflector.get_or_create(&class);
    cd.build();
    assert_eq!(cd.property("test").and_then(|p| p.declared_type()), Some(TypeRef::number()));
}

#[test]
fn test_constructor_return_type() {
    let reflector = Reflector::new();
    let class = ClassDef::new("TestClass").define(&reflector);

    let cd = reflector.get_or_create(&class);
    cd.build();
    let ctor = cd.constructor();
    assert!(ctor.return_type().is_some_and(|t| t.is_class(&class)));
}

#[test]
fn test_constructor_parameter_decorated_and_typed() {
    let reflector = Reflector::new();
    let class = ClassDef::new("TestClass")
        .constructor(|c| {
            c.param("m", TypeRef::number())
                .decorate(parameter_decorator(|_, _, p| p.set_tag("Decorated", true)));
        })
        .define(&reflector);

    let cd = reflector.get_or_create(&class);
    cd.build();

    let ctor = cd.constructor();
    assert_eq!(ctor.parameter_count(), 1);
    let p = ctor.parameter(0).expect("parameter");
    assert_eq!(p.tag("Decorated"), Some(true.into()));
    assert_eq!(p.declared_type(), Some(TypeRef::number()));
}

#[test]
fn test_parameters_without_decorators() {
    let reflector = Reflector::new();
    let class = ClassDef::new("TestClass")
        .constructor(|c| {
            c.param("x", TypeRef::object());
        })
        .method("method", |m| {
            m.param("y", TypeRef::object());
            m.param("z", TypeRef::object());
            m.param("t", TypeRef::object());
        })
        .define(&reflector);

    let cd = reflector.get_or_create(&class);
    cd.build();

    assert_eq!(cd.constructor().parameter_count(), 1);
    let method = cd.get_or_create_method("method");
    let names: Vec<Option<String>> = method.sorted_parameters().iter().map(|p| p.name()).collect();
    assert_eq!(
        names,
        vec![Some("y".to_string()), Some("z".to_string()), Some("t".to_string())]
    );
}

#[test]
fn test_constructor_parameter_class_type() {
    let reflector = Reflector::new();
    let service = ClassDef::new("Service").define(&reflector);
    let class = ClassDef::new("TestConstruct")
        .constructor(|c| {
            c.param("c", TypeRef::class(&service));
        })
        .decorate(class_attr())
        .define(&reflector);

    let cd = reflector.get_or_create(&class);
    cd.build();
    let ctor = cd.constructor();
    assert_eq!(ctor.parameter_count(), 1);
    assert!(ctor
        .parameter(0)
        .and_then(|p| p.declared_type())
        .is_some_and(|t| t.is_class(&service)));
}

#[test]
fn test_build_runs_once() {
    let reflector = Reflector::new();
    let service = ClassDef::new("Service").define(&reflector);
    let class = ClassDef::new("TestConstruct")
        .constructor(|c| {
            c.param("c", TypeRef::class(&service));
        })
        .decorate(class_attr())
        .define(&reflector);

    let cd = reflector.get_or_create(&class);
    cd.build();
    assert!(cd.constructor().remove_parameter(0).is_some());
    cd.build();

    assert!(cd.is_built());
    assert_eq!(cd.constructor().parameter_count(), 0);
}
