use rhai::{Dynamic, Scope, Variant, AST};

/// Name under which a binding's receiver is visible to evaluated code.
///
/// The `ie` built-in binds the same name, but its snippet runs in a scope of its
/// own: caller locals and functions defined in the session are not visible
/// there. Pass what the snippet needs through the receiver.
pub const RECEIVER_NAME: &str = "receiver";

/// A captured evaluation context: local variables, an optional receiver and the
/// functions defined so far against it.
///
/// The receiver is bound as a constant named [`RECEIVER_NAME`] instead of being
/// the `this` of the evaluation, which behaves the same for ordinary
/// expressions.
#[derive(Debug, Clone)]
pub struct Binding {
    scope: Scope<'static>,
    library: AST,
}

impl Default for Binding {
    fn default() -> Self {
        Self::new()
    }
}

impl Binding {
    pub fn new() -> Self {
        Self::from_scope(Scope::new())
    }

    pub fn from_scope(scope: Scope<'static>) -> Self {
        Self {
            scope,
            library: AST::empty(),
        }
    }

    pub fn with_receiver(mut self, receiver: Dynamic) -> Self {
        self.scope.push_constant_dynamic(RECEIVER_NAME, receiver);
        self
    }

    pub fn receiver(&self) -> Option<Dynamic> {
        self.scope.get_value::<Dynamic>(RECEIVER_NAME)
    }

    pub fn get_value<T: Variant + Clone>(&self, name: &str) -> Option<T> {
        self.scope.get_value::<T>(name)
    }

    pub fn set_value<T: Variant + Clone>(&mut self, name: &str, value: T) {
        self.scope.set_or_push(name, value);
    }

    pub fn scope(&self) -> &Scope<'static> {
        &self.scope
    }

    pub fn scope_mut(&mut self) -> &mut Scope<'static> {
        &mut self.scope
    }

    /// Script functions defined by earlier evaluations in this binding.
    pub fn function_names(&self) -> Vec<String> {
        self.library
            .iter_functions()
            .map(|function| function.name.to_string())
            .collect()
    }

    pub(crate) fn library(&self) -> &AST {
        &self.library
    }

    pub(crate) fn set_library(&mut self, library: AST) {
        self.library = library;
    }
}
