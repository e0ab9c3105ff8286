//! The default synthesis backend.
//!
//! [`DispatchTableBackend`] compiles each [`DispatchBinding`] of a descriptor
//! into a [`Method`] closure once, and every instance built by the returned
//! factory shares that table.

use std::collections::HashMap;
use std::sync::Arc;

use ioc_kernel::{
    AdapterDescriptor, AdapterFactory, AdapterInstance, DispatchBinding, IocError, Method,
    SynthesisBackend, SynthesisError, Value,
};
use tracing::debug;

/// In-process backend turning bindings into closures.
#[derive(Debug, Default, Clone, Copy)]
pub struct DispatchTableBackend;

impl DispatchTableBackend {
    pub const NAME: &'static str = "dispatch-table";

    pub fn new() -> Self {
        Self
    }
}

fn compile(contract: &str, operation: &str, binding: &DispatchBinding) -> Method {
    match binding.clone() {
        DispatchBinding::Resolve { key } => {
            let operation = operation.to_string();
            Method::new(move |resolver, backing, args| {
                if !args.is_empty() {
                    return Err(IocError::invalid_arguments(
                        &operation,
                        format!("getter takes no arguments, got {}", args.len()),
                    ));
                }
                resolver.resolve(&key, &[backing.clone()])
            })
        }
        DispatchBinding::ResolveAndRun { key } => {
            let operation = operation.to_string();
            Method::new(move |resolver, backing, args| {
                let [value] = args else {
                    return Err(IocError::invalid_arguments(
                        &operation,
                        format!("setter takes exactly one argument, got {}", args.len()),
                    ));
                };
                resolver.run(&key, &[backing.clone(), value.clone()])?;
                Ok(Value::unit())
            })
        }
        DispatchBinding::Unregister { key, target } => Method::new(move |resolver, _, _| {
            resolver.run(&key, &[Value::from(target.as_str())])?;
            Ok(Value::unit())
        }),
        DispatchBinding::Unsupported => {
            let contract = contract.to_string();
            let operation = operation.to_string();
            Method::new(move |_, _, _| {
                Err(IocError::UnsupportedOperation {
                    contract: contract.clone(),
                    operation: operation.clone(),
                })
            })
        }
    }
}

impl SynthesisBackend for DispatchTableBackend {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn materialize(&self, descriptor: Arc<AdapterDescriptor>) -> Result<AdapterFactory, SynthesisError> {
        let methods: HashMap<_, _> = descriptor
            .entries
            .iter()
            .map(|entry| {
                let name = entry.operation.name.clone();
                let method = compile(&descriptor.contract.name, &name, &entry.binding);
                (name, method)
            })
            .collect();
        let methods = Arc::new(methods);

        debug!(
            adapter = %descriptor.adapter_name,
            methods = methods.len(),
            "dispatch table compiled"
        );

        Ok(AdapterFactory::new(move |resolver, backing| {
            Ok(AdapterInstance::new(
                resolver,
                backing,
                descriptor.clone(),
                methods.clone(),
            ))
        }))
    }
}
