//! Adapter synthesis.
//!
//! `Adapter(contract, backing)` derives the adapter name from the contract,
//! materializes a factory through the container's backend, registers that
//! factory under the adapter name in the current scope, and finally resolves
//! the adapter name with the backing object to obtain an instance.

use std::sync::Arc;

use ioc_kernel::{AdapterDescriptor, Behavior, Contract, IocError, IocResult, Value};
use tracing::{info, warn};

use crate::container::Container;

pub(crate) fn synthesize(container: &Container, contract: &Contract, backing: Value) -> IocResult<Value> {
    let adapter_config = &container.config().adapter;
    let adapter_name = contract.adapter_name(&adapter_config.suffix, adapter_config.strip_leading_char);

    let descriptor = Arc::new(AdapterDescriptor::from_contract(
        contract,
        adapter_name.clone(),
        &adapter_config.suffix,
    )?);

    info!(
        contract = %contract.name,
        adapter = %adapter_name,
        backend = container.backend_name(),
        operations = descriptor.entries.len(),
        "synthesizing adapter"
    );

    let factory = container.backend().materialize(descriptor).inspect_err(|e| {
        warn!(contract = %contract.name, adapter = %adapter_name, error = %e, "adapter synthesis failed");
    })?;

    let key = adapter_name.clone();
    let registration = Behavior::new(move |resolver, args| {
        let [backing] = args else {
            return Err(IocError::invalid_arguments(
                &key,
                format!("expected 1 argument(s), got {}", args.len()),
            ));
        };
        let instance = factory.construct(resolver.handle(), backing.clone())?;
        Ok(Value::new(instance))
    });
    container.register(adapter_name.clone(), registration)?;
    info!(adapter = %adapter_name, "adapter factory registered");

    container.resolve(&adapter_name, &[backing])
}
