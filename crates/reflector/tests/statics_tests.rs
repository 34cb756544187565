//! Integration tests for static members
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test statics_tests
//! ```

use reflector::{method_decorator, ClassDef, MethodKind, PropertyKind, Reflector, TypeRef, Value};

// ===== Static Method Tests =====

#[test]
fn test_static_method_parameters() {
    let reflector = Reflector::new();
    let class = ClassDef::new("TestClass")
        .static_method("method", |m| {
            m.param("y", TypeRef::object());
            m.param("z", TypeRef::object());
            m.param("t", TypeRef::object());
        })
        .define(&reflector);

    let cd = reflector.get_or_create(&class);
    cd.build();

    let method = cd.method("method").expect("static method");
    assert_eq!(method.kind(), MethodKind::Static);
    let names: Vec<String> = method.sorted_parameters().iter().filter_map(|p| p.name()).collect();
    assert_eq!(names, vec!["y", "z", "t"]);
}

#[test]
fn test_decorated_static_method_kind() {
    let reflector = Reflector::new();
    let class = ClassDef::new("TestClass")
        .static_method("create", |m| {
            m.returns(TypeRef::string()).decorate(method_decorator(|_, _, _| {}));
        })
        .method("instance", |_| {})
        .define(&reflector);

    let cd = reflector.get(&class).expect("descriptor");
    assert_eq!(cd.method("create").map(|m| m.kind()), Some(MethodKind::Static));

    cd.build();
    assert_eq!(cd.method("instance").map(|m| m.kind()), Some(MethodKind::Instance));
    assert_eq!(
        cd.method("create").and_then(|m| m.return_type()),
        Some(TypeRef::string())
    );
}

// ===== Static Property Tests =====

#[test]
fn test_static_getter_property() {
    let reflector = Reflector::new();
    let class = ClassDef::new("TestClass")
        .static_accessor("prop", |a| {
            a.getter(|_, _| Value::from("value"));
        })
        .define(&reflector);

    let cd = reflector.get_or_create(&class);
    cd.build();

    let properties = cd.properties();
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].name(), "prop");
    assert_eq!(properties[0].kind(), PropertyKind::Static);
}

#[test]
fn test_static_value_property() {
    let reflector = Reflector::new();
    let class = ClassDef::new("TestClass")
        .static_field("prop", |f| {
            f.initial("value");
        })
        .define(&reflector);

    let cd = reflector.get_or_create(&class);
    cd.build();

    let property = cd.property("prop").expect("static property");
    assert_eq!(property.kind(), PropertyKind::Static);
}

#[test]
fn test_static_value_decorated_before_build() {
    let reflector = Reflector::new();
    let class = ClassDef::new("TestClass")
        .static_field("limit", |f| {
            f.typed(TypeRef::number())
                .initial(10)
                .decorate(reflector::property_decorator(|_, _| {}));
        })
        .define(&reflector);

    let cd = reflector.get(&class).expect("descriptor");
    assert_eq!(cd.property("limit").map(|p| p.kind()), Some(PropertyKind::Static));

    cd.build();
    let property = cd.property("limit").expect("property");
    assert_eq!(property.kind(), PropertyKind::Static);
    assert_eq!(property.declared_type(), Some(TypeRef::number()));
}
