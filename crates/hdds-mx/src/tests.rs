// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cross-module workflow tests.

use crate::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Clone)]
struct Endpoint {
    host: String,
    port: u16,
}
impl TypeClass for Endpoint {}

struct Service {
    name: String,
    primary: Endpoint,
    replicas: Vec<Endpoint>,
}
impl TypeClass for Service {}

fn endpoint(host: &str, port: u16) -> Endpoint {
    Endpoint {
        host: host.into(),
        port,
    }
}

fn endpoint_writer(mapper: &Arc<OpenTypeMapper>) -> Arc<CompositeDataWriter<Endpoint>> {
    CompositeDataWriter::<Endpoint>::builder()
        .with_type_name("endpoint")
        .with_type_description("Network endpoint")
        .with_simple_attribute("host", |e: &Endpoint| e.host.clone())
        .with_simple_attribute("port", |e: &Endpoint| e.port)
        .with_mapper(Arc::clone(mapper))
        .build()
        .expect("endpoint writer")
}

#[test]
fn test_full_workflow() {
    let mapper = Arc::new(OpenTypeMapper::new());

    // 1. Writers, leaves first
    let endpoints = endpoint_writer(&mapper);
    let service = CompositeDataWriter::<Service>::builder()
        .with_type_name("service")
        .with_type_description("Service")
        .with_simple_attribute("name", |s: &Service| s.name.clone())
        .with_simple_attribute("primary", |s: &Service| s.primary.clone())
        .with_simple_attribute("replicas", |s: &Service| s.replicas.clone())
        .with_mapper(Arc::clone(&mapper))
        .build()
        .expect("service writer");
    let table = TabularDataWriter::<Endpoint>::builder()
        .with_type_name("endpoints")
        .with_type_description("Endpoints")
        .with_index_names(["host", "port"])
        .with_composite_data_writer(Arc::clone(&endpoints))
        .with_mapper(Arc::clone(&mapper))
        .build()
        .expect("table writer");

    // 2. Live state
    let state = Arc::new(RwLock::new(vec![endpoint("a", 1), endpoint("b", 2)]));
    let requests = Arc::new(AtomicU64::new(0));

    // 3. Interface
    let rows = Arc::clone(&state);
    let current = Arc::clone(&state);
    let counter = Arc::clone(&requests);
    let added = Arc::clone(&state);
    let add = OperationInfo::builder()
        .with_name("add")
        .with_description("Add an endpoint")
        .with_parameter(
            ParameterInfo::builder()
                .with_class::<String>()
                .with_name("host")
                .with_mapper(Arc::clone(&mapper))
                .build()
                .expect("host"),
        )
        .with_parameter(
            ParameterInfo::builder()
                .with_class::<u16>()
                .with_name("port")
                .with_mapper(Arc::clone(&mapper))
                .build()
                .expect("port"),
        )
        .with_return::<u32>()
        .with_impact(Impact::ActionInfo)
        .with_invoker(move |args: &[OpenValue]| {
            let host = args[0].as_str().ok_or("host")?;
            let port = match args[1] {
                OpenValue::U16(port) => port,
                _ => return Err::<OpenValue, BoxError>("port".into()),
            };
            let mut endpoints = added.write().map_err(|_| "poisoned")?;
            endpoints.push(endpoint(host, port));
            Ok(OpenValue::U32(endpoints.len() as u32))
        })
        .with_mapper(Arc::clone(&mapper))
        .build()
        .expect("add");

    let interface = DynamicInterface::builder()
        .with_class_name("ServiceRegistry")
        .with_description("Registry of service endpoints")
        .with_descriptor(&Descriptor::builder().with_since("1.0").build())
        .with_simple_attribute("requests", "Requests served", move || {
            counter.fetch_add(1, Ordering::SeqCst)
        })
        .with_composite_attribute(
            "primary",
            move || {
                current
                    .read()
                    .map(|endpoints| endpoints[0].clone())
                    .unwrap_or_else(|_| endpoint("poisoned", 0))
            },
            Arc::clone(&endpoints),
        )
        .with_tabular_attribute(
            "endpoints",
            move || rows.read().map(|e| e.clone()).unwrap_or_default(),
            table,
        )
        .with_operation(add)
        .with_mapper(Arc::clone(&mapper))
        .build()
        .expect("interface");

    // 4. Metadata
    let meta = interface.metadata();
    assert_eq!(meta.class_name, "ServiceRegistry");
    assert_eq!(
        meta.attribute_names().collect::<Vec<_>>(),
        vec!["requests", "primary", "endpoints"]
    );
    assert_eq!(meta.attribute("primary").map(|a| a.type_name.as_str()), Some("CompositeData"));
    assert_eq!(
        meta.attribute("primary").and_then(|a| a.description.as_deref()),
        Some("Network endpoint")
    );
    assert_eq!(meta.attribute("endpoints").map(|a| a.type_name.as_str()), Some("TabularData"));
    assert_eq!(meta.operation("add").map(|o| o.return_type.as_str()), Some("u32"));
    assert_eq!(meta.descriptor.get("since").and_then(|v| v.as_text()), Some("1.0"));

    // 5. Reads pull live values every time
    assert_eq!(interface.attribute("requests").expect("read"), OpenValue::U64(0));
    assert_eq!(interface.attribute("requests").expect("read"), OpenValue::U64(1));
    let table = interface.attribute("endpoints").expect("read");
    assert_eq!(table.as_tabular().map(|t| t.len()), Some(2));

    // 6. Invoke mutates the source objects, not the interface
    let count = interface
        .invoke("add", &[OpenValue::String("c".into()), OpenValue::U16(3)])
        .expect("invoke");
    assert_eq!(count, OpenValue::U32(3));
    let table = interface.attribute("endpoints").expect("read");
    let table = table.as_tabular().expect("tabular");
    assert_eq!(table.len(), 3);
    assert!(table.contains_key(&[OpenValue::String("c".into()), OpenValue::U16(3)]));

    // 7. Nested composite through the service writer
    let data = service
        .apply(&Service {
            name: "api".into(),
            primary: endpoint("a", 1),
            replicas: vec![endpoint("b", 2), endpoint("c", 3)],
        })
        .expect("apply");
    let replicas = data.get("replicas").and_then(|v| v.as_array()).expect("array");
    assert_eq!(replicas.len(), 2);
    assert_eq!(
        replicas[1].as_composite().and_then(|c| c.get("host")).and_then(|v| v.as_str()),
        Some("c")
    );
}

#[test]
fn test_interface_lookups_fail_cleanly() {
    let interface = DynamicInterface::builder()
        .with_simple_attribute("answer", "The answer", || 42i32)
        .with_mapper(Arc::new(OpenTypeMapper::new()))
        .build()
        .expect("interface");

    assert_eq!(interface.class_name(), crate::config::DEFAULT_INTERFACE_CLASS);
    assert!(matches!(
        interface.attribute("nonexistent"),
        Err(Error::AttributeNotFound(ref name)) if name == "nonexistent"
    ));
    assert!(matches!(
        interface.invoke("nonexistent", &[]),
        Err(Error::OperationNotFound(_))
    ));
    // Still usable afterwards
    assert_eq!(interface.attribute("answer").expect("read"), OpenValue::I32(42));
}

#[test]
fn test_duplicate_names_rejected() {
    let mapper = Arc::new(OpenTypeMapper::new());

    // Same name, different types
    let err = DynamicInterface::builder()
        .with_simple_attribute("x", "int", || 1i32)
        .with_simple_attribute("x", "text", || "one")
        .with_mapper(Arc::clone(&mapper))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateMember { ref name, .. } if name == "x"));

    let op = || {
        OperationInfo::builder()
            .with_name("reset")
            .with_invoker(|_: &[OpenValue]| Ok::<_, BoxError>(OpenValue::Void))
            .with_mapper(Arc::clone(&mapper))
            .build()
            .expect("operation")
    };
    let err = DynamicInterface::builder()
        .with_operation(op())
        .with_operation(op())
        .with_mapper(Arc::clone(&mapper))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateMember { ref name, .. } if name == "reset"));

    // Attributes and operations are separate namespaces
    let interface = DynamicInterface::builder()
        .with_simple_attribute("reset", "Last reset", || 0u64)
        .with_operation(op())
        .with_mapper(Arc::clone(&mapper))
        .build();
    assert!(interface.is_ok());
}

#[test]
fn test_convenience_errors_surface_at_build() {
    struct Unmapped;
    impl TypeClass for Unmapped {}

    let err = DynamicInterface::builder()
        .with_simple_attribute("ok", "fine", || 1i32)
        .with_simple_attribute("bad", "unmapped", || Unmapped)
        .with_mapper(Arc::new(OpenTypeMapper::new()))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedType { .. }));
}

#[test]
fn test_bulk_read_skips_failures() {
    let interface = DynamicInterface::builder()
        .with_simple_attribute("a", "A", || 1i32)
        .with_attribute(
            AttributeInfo::builder()
                .with_name("broken")
                .with_fallible_supplier(|| Err::<i32, _>("down"))
                .with_mapper(Arc::new(OpenTypeMapper::new()))
                .build()
                .expect("broken"),
        )
        .with_simple_attribute("b", "B", || 2i32)
        .with_mapper(Arc::new(OpenTypeMapper::new()))
        .build()
        .expect("interface");

    let values = interface.attributes(&["b", "broken", "missing", "a"]);
    assert_eq!(
        values,
        vec![
            ("b".to_string(), OpenValue::I32(2)),
            ("a".to_string(), OpenValue::I32(1)),
        ]
    );
    assert!(matches!(
        interface.attribute("broken"),
        Err(Error::AttributeRead { .. })
    ));
}

#[test]
fn test_concurrent_reads() {
    let mapper = Arc::new(OpenTypeMapper::new());
    let endpoints = endpoint_writer(&mapper);
    let interface = Arc::new(
        DynamicInterface::builder()
            .with_composite_attribute("primary", || endpoint("a", 1), endpoints)
            .with_mapper(mapper)
            .build()
            .expect("interface"),
    );

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let interface = Arc::clone(&interface);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    let value = interface.attribute("primary").expect("read");
                    let data = value.as_composite().expect("composite");
                    assert_eq!(data.get("port"), Some(&OpenValue::U16(1)));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("join");
    }
}

#[test]
fn test_managed_interface_is_object_safe() {
    let interface: Box<dyn ManagedInterface> = Box::new(
        DynamicInterface::builder()
            .with_simple_attribute("up", "Up", || true)
            .with_mapper(Arc::new(OpenTypeMapper::new()))
            .build()
            .expect("interface"),
    );
    assert_eq!(interface.attribute("up").expect("read"), OpenValue::Bool(true));
    assert_eq!(interface.metadata().attributes.len(), 1);
}

#[cfg(feature = "serde")]
#[test]
fn test_metadata_serializes() {
    let mapper = Arc::new(OpenTypeMapper::new());
    let interface = DynamicInterface::builder()
        .with_class_name("Registry")
        .with_composite_attribute("primary", || endpoint("a", 1), endpoint_writer(&mapper))
        .with_mapper(mapper)
        .build()
        .expect("interface");

    let json = serde_json::to_value(interface.metadata()).expect("serialize");
    assert_eq!(json["class_name"], "Registry");
    assert_eq!(json["attributes"][0]["type_name"], "CompositeData");
    assert_eq!(json["attributes"][0]["readable"], true);

    let value = interface.attribute("primary").expect("read");
    let json = serde_json::to_string(&value).expect("serialize value");
    assert!(json.contains("\"host\""));
}
