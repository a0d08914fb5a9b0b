use rhai::Engine;

/// Native functions and types the host exposes to evaluated code, such as
/// getters and setters over live game objects.
///
/// Registered after the built-ins and helpers, so a host function replaces a
/// helper with the same name and arity.
pub trait HostFunctions {
    fn register(&self, engine: &mut Engine);
}

impl<F> HostFunctions for F
where
    F: Fn(&mut Engine),
{
    fn register(&self, engine: &mut Engine) {
        self(engine)
    }
}
