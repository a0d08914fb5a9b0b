use std::rc::Rc;

use alex_core::SessionScope;
use rhai::{Dynamic, Engine, EvalAltResult, NativeCallContext};

use crate::helpers::{Helper, HelperRegistry};

/// Registers each helper as a native function of its arity. The functions only
/// forward to the helper while `scope` is active; otherwise they fail exactly like
/// an unknown function would.
///
/// Script-defined functions with the same name and arity are resolved first, so a
/// helper never shadows code from the evaluated context.
pub fn install_helpers(engine: &mut Engine, registry: Rc<HelperRegistry>, scope: SessionScope) {
    for helper in registry.iter() {
        register_helper(engine, helper.clone(), scope.clone());
    }
}

fn register_helper(engine: &mut Engine, helper: Helper, scope: SessionScope) {
    let name = helper.name().to_string();
    match helper.arity() {
        0 => {
            engine.register_fn(name, move |ctx: NativeCallContext| {
                dispatch(&ctx, &helper, &scope, &[])
            });
        }
        1 => {
            engine.register_fn(name, move |ctx: NativeCallContext, a: Dynamic| {
                dispatch(&ctx, &helper, &scope, &[a])
            });
        }
        2 => {
            engine.register_fn(
                name,
                move |ctx: NativeCallContext, a: Dynamic, b: Dynamic| {
                    dispatch(&ctx, &helper, &scope, &[a, b])
                },
            );
        }
        3 => {
            engine.register_fn(
                name,
                move |ctx: NativeCallContext, a: Dynamic, b: Dynamic, c: Dynamic| {
                    dispatch(&ctx, &helper, &scope, &[a, b, c])
                },
            );
        }
        4 => {
            engine.register_fn(
                name,
                move |ctx: NativeCallContext, a: Dynamic, b: Dynamic, c: Dynamic, d: Dynamic| {
                    dispatch(&ctx, &helper, &scope, &[a, b, c, d])
                },
            );
        }
        arity => {
            tracing::warn!(helper = %name, arity, "helper arity not supported, skipped");
        }
    }
}

fn dispatch(
    ctx: &NativeCallContext,
    helper: &Helper,
    scope: &SessionScope,
    args: &[Dynamic],
) -> Result<Dynamic, Box<EvalAltResult>> {
    if !scope.is_active() {
        return Err(Box::new(EvalAltResult::ErrorFunctionNotFound(
            call_signature(helper.name(), args),
            ctx.position(),
        )));
    }
    tracing::debug!(helper = helper.name(), "dispatching unresolved call to helper");
    helper.call(ctx.engine(), args)
}

fn call_signature(name: &str, args: &[Dynamic]) -> String {
    let types = args
        .iter()
        .map(|arg| arg.type_name())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} ({})", name, types)
}
