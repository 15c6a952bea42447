//! Host functions exposed to the smoke-check scripts

use anyhow::{anyhow, bail};
use tether_core::{CallRequest, HostRegistry, RegistrationError, Scalar};

pub fn registry() -> Result<HostRegistry, RegistrationError> {
    let mut registry = HostRegistry::new();

    registry.register("pass_integer", |_, args| {
        args.first()
            .cloned()
            .ok_or_else(|| anyhow!("pass_integer expects one argument"))
    })?;

    registry.register("test_call", |script, _| {
        let request = CallRequest::new("pass_integer", vec![Scalar::Int(10)]);
        Ok(script.call_script(&request)?)
    })?;

    registry.register("test_raise", |_, _| bail!("host_test_exception"))?;

    registry.register("divide_by", |_, args| {
        let divisor = args
            .first()
            .and_then(Scalar::as_i64)
            .ok_or_else(|| anyhow!("divide_by expects an integer"))?;
        if divisor == 0 {
            bail!("division by zero");
        }
        Ok(Scalar::Long(5 / divisor))
    })?;

    Ok(registry)
}
