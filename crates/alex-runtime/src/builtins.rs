use alex_core::Console;
use rhai::{Dynamic, Engine, EvalAltResult, NativeCallContext, Scope};

use crate::binding::RECEIVER_NAME;

/// Functions available in every engine, with or without an active session.
pub(crate) fn register_builtins(engine: &mut Engine, console: Console) {
    engine.register_fn("cls", move || -> Result<(), Box<EvalAltResult>> {
        console
            .clear_screen()
            .map_err(|error| error.to_string().into())
    });
    engine.register_fn("ie", instance_eval);
}

/// `value.ie("receiver + 1")`: runs code with `receiver` bound to `value`.
/// The snippet sees only `receiver`, never the caller's locals or session
/// functions, since a native call has no access to the calling scope.
fn instance_eval(
    ctx: NativeCallContext,
    receiver: Dynamic,
    code: &str,
) -> Result<Dynamic, Box<EvalAltResult>> {
    let mut scope = Scope::new();
    scope.push_constant_dynamic(RECEIVER_NAME, receiver);
    ctx.engine().eval_with_scope::<Dynamic>(&mut scope, code)
}
