use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use alex_core::AlexError;
use rhai::{Dynamic, Engine, EvalAltResult, FnAccess, Scope, AST};
use walkdir::WalkDir;

/// Helpers are registered per arity; calls with more arguments than this are not
/// supported.
pub const MAX_HELPER_ARITY: usize = 4;

pub type HelperFn = dyn Fn(&Engine, &[Dynamic]) -> Result<Dynamic, Box<EvalAltResult>>;

#[derive(Clone)]
pub struct Helper {
    name: String,
    arity: usize,
    func: Rc<HelperFn>,
}

impl Helper {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn call(&self, engine: &Engine, args: &[Dynamic]) -> Result<Dynamic, Box<EvalAltResult>> {
        (self.func)(engine, args)
    }
}

impl fmt::Debug for Helper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Helper")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Convenience functions reachable from a running session when normal name
/// resolution finds nothing. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct HelperRegistry {
    helpers: BTreeMap<String, Helper>,
}

impl HelperRegistry {
    pub fn builder() -> HelperRegistryBuilder {
        HelperRegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&Helper> {
        self.helpers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.helpers.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Helper> {
        self.helpers.values()
    }

    pub fn len(&self) -> usize {
        self.helpers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.helpers.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct HelperRegistryBuilder {
    helpers: BTreeMap<String, Helper>,
}

impl HelperRegistryBuilder {
    pub fn add<F>(&mut self, name: &str, arity: usize, func: F) -> Result<&mut Self, AlexError>
    where
        F: Fn(&Engine, &[Dynamic]) -> Result<Dynamic, Box<EvalAltResult>> + 'static,
    {
        self.insert(name, arity, Rc::new(func))?;
        Ok(self)
    }

    /// Adds every public function of a helper script, each as a helper of its own
    /// arity. Top-level statements of the script are not run.
    pub fn add_script(&mut self, source_name: &str, source: &str) -> Result<&mut Self, AlexError> {
        let ast = Engine::new().compile(source).map_err(|error| {
            AlexError::new(
                "HELPER_SCRIPT_COMPILE",
                format!("Helper script \"{}\" failed to compile: {}", source_name, error),
            )
        })?;
        let library = Rc::new(ast.clone_functions_only());

        let mut exported = Vec::new();
        for function in library.iter_functions() {
            if function.access == FnAccess::Private {
                continue;
            }
            exported.push((function.name.to_string(), function.params.len()));
        }

        for (name, arity) in exported {
            let library = Rc::clone(&library);
            let fn_name = name.clone();
            self.insert(
                &name,
                arity,
                Rc::new(move |engine: &Engine, args: &[Dynamic]| {
                    call_script_helper(engine, &library, &fn_name, args)
                }),
            )?;
        }
        Ok(self)
    }

    /// Loads every `*.rhai` file under `dir`, in file name order.
    pub fn add_scripts_dir(&mut self, dir: &Path) -> Result<&mut Self, AlexError> {
        if !dir.is_dir() {
            return Err(AlexError::new(
                "HELPER_SCAN",
                format!("Helpers directory does not exist: {}", dir.display()),
            ));
        }

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|error| AlexError::new("HELPER_SCAN", error.to_string()))?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some("rhai")
            {
                continue;
            }
            let source = fs::read_to_string(path).map_err(|error| {
                AlexError::new(
                    "HELPER_SCRIPT_READ",
                    format!("{}: {}", path.display(), error),
                )
            })?;
            tracing::debug!(path = %path.display(), "loading helper script");
            self.add_script(&path.display().to_string(), &source)?;
        }
        Ok(self)
    }

    pub fn build(self) -> HelperRegistry {
        HelperRegistry {
            helpers: self.helpers,
        }
    }

    fn insert(&mut self, name: &str, arity: usize, func: Rc<HelperFn>) -> Result<(), AlexError> {
        if arity > MAX_HELPER_ARITY {
            return Err(AlexError::new(
                "HELPER_ARITY",
                format!(
                    "Helper \"{}\" takes {} arguments; at most {} are supported.",
                    name, arity, MAX_HELPER_ARITY
                ),
            ));
        }
        if self.helpers.contains_key(name) {
            return Err(AlexError::new(
                "HELPER_DUPLICATE",
                format!("Helper \"{}\" is already registered.", name),
            ));
        }
        self.helpers.insert(
            name.to_string(),
            Helper {
                name: name.to_string(),
                arity,
                func,
            },
        );
        Ok(())
    }
}

fn call_script_helper(
    engine: &Engine,
    library: &AST,
    name: &str,
    args: &[Dynamic],
) -> Result<Dynamic, Box<EvalAltResult>> {
    let mut scope = Scope::new();
    engine.call_fn::<Dynamic>(&mut scope, library, name, args.to_vec())
}
