//! Integration tests for decorator site dispatch
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test decorator_tests
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use reflector::{
    any_decorator, name_decorator, Annotated, AnyDecorator, ClassDef, Decorated, DecoratorSite,
    Reflector, TypeRef, NAME_TAG,
};

/// Decorator recording every site it is applied to
fn recording() -> (Arc<Mutex<Vec<DecoratorSite>>>, AnyDecorator) {
    let sites = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&sites);
    let decorator = any_decorator(move |decorated| sink.lock().push(decorated.site()));
    (sites, decorator)
}

// ===== Site Tests =====

#[test]
fn test_class_site() {
    let reflector = Reflector::new();
    let (sites, decorator) = recording();
    ClassDef::new("TestConstruct").decorate(decorator).define(&reflector);
    assert_eq!(*sites.lock(), vec![DecoratorSite::Class]);
}

#[test]
fn test_method_site() {
    let reflector = Reflector::new();
    let (sites, decorator) = recording();
    ClassDef::new("TestConstruct")
        .method("method", |m| {
            m.decorate(decorator);
        })
        .define(&reflector);
    assert_eq!(*sites.lock(), vec![DecoratorSite::Method]);
}

#[test]
fn test_property_site() {
    let reflector = Reflector::new();
    let (sites, decorator) = recording();
    ClassDef::new("TestConstruct")
        .field("prop", |f| {
            f.typed(TypeRef::string()).decorate(decorator);
        })
        .define(&reflector);
    assert_eq!(*sites.lock(), vec![DecoratorSite::Property]);
}

#[test]
fn test_parameter_site() {
    let reflector = Reflector::new();
    let (sites, decorator) = recording();
    ClassDef::new("TestConstruct")
        .method("method", |m| {
            m.param("a", TypeRef::string()).decorate(decorator);
        })
        .define(&reflector);
    assert_eq!(*sites.lock(), vec![DecoratorSite::Parameter]);
}

#[test]
fn test_constructor_parameter_site() {
    let reflector = Reflector::new();
    let (sites, decorator) = recording();
    let class = ClassDef::new("TestConstruct")
        .constructor(|c| {
            c.param("a", TypeRef::string()).decorate(decorator);
        })
        .define(&reflector);

    assert_eq!(*sites.lock(), vec![DecoratorSite::Constructor]);
    let cd = reflector.get(&class).expect("descriptor");
    assert_eq!(cd.constructor().parameter_count(), 1);
}

#[test]
fn test_accessor_reported_as_method() {
    let reflector = Reflector::new();
    let (sites, decorator) = recording();
    let class = ClassDef::new("TestConstruct")
        .accessor("value", |a| {
            a.typed(TypeRef::number()).decorate(decorator);
        })
        .define(&reflector);

    assert_eq!(*sites.lock(), vec![DecoratorSite::Method]);
    let cd = reflector.get(&class).expect("descriptor");
    assert!(cd.method("value").is_some());
    assert!(cd.property("value").is_none());
}

#[test]
fn test_shared_decorator_sees_every_site_in_host_order() {
    let reflector = Reflector::new();
    let (sites, decorator) = recording();
    let decorator = Arc::new(decorator);

    ClassDef::new("Everything")
        .constructor(|c| {
            c.param("dep", TypeRef::object()).decorate(Arc::clone(&decorator));
        })
        .method("run", |m| {
            m.param("input", TypeRef::string()).decorate(Arc::clone(&decorator));
            m.decorate(Arc::clone(&decorator));
        })
        .field("state", |f| {
            f.decorate(Arc::clone(&decorator));
        })
        .decorate(Arc::clone(&decorator))
        .define(&reflector);

    assert_eq!(
        *sites.lock(),
        vec![
            DecoratorSite::Parameter,
            DecoratorSite::Method,
            DecoratorSite::Property,
            DecoratorSite::Constructor,
            DecoratorSite::Class,
        ]
    );
}

#[test]
fn test_decorated_class_is_shared_across_sites() {
    let reflector = Reflector::new();
    let decorator = any_decorator(|decorated| {
        let count = decorated.class().tag("count").and_then(|v| v.as_u64()).unwrap_or(0);
        decorated.class().set_tag("count", count + 1);
        if let Decorated::Parameter { parameter, .. } = decorated {
            parameter.set_tag("seen", true);
        }
    });
    let decorator = Arc::new(decorator);

    let class = ClassDef::new("Counter")
        .method("m", |m| {
            m.param("a", TypeRef::number()).decorate(Arc::clone(&decorator));
            m.decorate(Arc::clone(&decorator));
        })
        .decorate(Arc::clone(&decorator))
        .define(&reflector);

    let cd = reflector.get(&class).expect("descriptor");
    assert_eq!(cd.tag("count"), Some(3u64.into()));
    let parameter = cd.method("m").and_then(|m| m.parameter(0)).expect("parameter");
    assert_eq!(parameter.tag("seen"), Some(true.into()));
}

// ===== Name Decorator Tests =====

#[test]
fn test_name_decorator_on_declared_class() {
    let reflector = Reflector::new();
    let class = ClassDef::new("Invoice")
        .method("pay", |m| {
            m.param("amount", TypeRef::number()).decorate(name_decorator("sum"));
            m.decorate(name_decorator("settle"));
        })
        .field("id", |f| {
            f.decorate(name_decorator("key"));
        })
        .decorate(name_decorator("bill"))
        .define(&reflector);

    let cd = reflector.get(&class).expect("descriptor");
    let pay = cd.method("pay").expect("method");
    assert_eq!(cd.tag(NAME_TAG), Some("bill".into()));
    assert_eq!(pay.tag(NAME_TAG), Some("settle".into()));
    assert_eq!(pay.parameter(0).and_then(|p| p.tag(NAME_TAG)), Some("sum".into()));
    assert_eq!(cd.property("id").and_then(|p| p.tag(NAME_TAG)), Some("key".into()));
}
