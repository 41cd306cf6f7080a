use std::rc::Rc;

use ahash::AHashMap;

use crate::ast::Stmt;
use crate::value::Value;

// A declared routine, detached from the program tree so the binding can
// outlive the statement that produced it.
#[derive(Debug, PartialEq)]
pub(crate) struct Routine {
    pub(crate) name: String,
    pub(crate) params: Vec<String>,
    pub(crate) body: Stmt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScopeId(usize);

pub(crate) const GLOBAL: ScopeId = ScopeId(0);

// Variables and routines live in independent namespaces, so a variable may
// share its name with a routine without collision.
#[derive(Debug, Default)]
struct Scope {
    parent: Option<ScopeId>,
    variables: AHashMap<String, Value>,
    routines: AHashMap<String, Rc<Routine>>,
}

// Scopes are arena-allocated and refer to their parent by index. Call scopes
// come and go in strict stack order relative to the call tree, which makes
// discarding one a truncate.
#[derive(Debug)]
pub(crate) struct Environment {
    scopes: Vec<Scope>,
}

impl Environment {
    pub(crate) fn new() -> Self {
        Environment {
            scopes: vec![Scope::default()],
        }
    }

    pub(crate) fn push(&mut self, parent: ScopeId) -> ScopeId {
        self.scopes.push(Scope {
            parent: Some(parent),
            ..Scope::default()
        });

        ScopeId(self.scopes.len() - 1)
    }

    pub(crate) fn pop(&mut self, scope: ScopeId) {
        self.scopes.truncate(scope.0);
    }

    // Drops everything above the global scope. Run before each top-level
    // evaluation so scopes left behind by an aborted call cannot leak into
    // the next one.
    pub(crate) fn reset(&mut self) {
        self.scopes.truncate(1);
    }

    pub(crate) fn define_variable(&mut self, scope: ScopeId, name: &str, value: Value) {
        self.scopes[scope.0]
            .variables
            .insert(String::from(name), value);
    }

    pub(crate) fn define_routine(&mut self, scope: ScopeId, routine: Routine) {
        self.scopes[scope.0]
            .routines
            .insert(routine.name.clone(), Rc::new(routine));
    }

    pub(crate) fn variable(&self, scope: ScopeId, name: &str) -> Option<Value> {
        let mut next = Some(scope);

        while let Some(id) = next {
            let scope = &self.scopes[id.0];
            if let Some(value) = scope.variables.get(name) {
                return Some(value.clone());
            }

            next = scope.parent;
        }

        None
    }

    pub(crate) fn routine(&self, scope: ScopeId, name: &str) -> Option<Rc<Routine>> {
        let mut next = Some(scope);

        while let Some(id) = next {
            let scope = &self.scopes[id.0];
            if let Some(routine) = scope.routines.get(name) {
                return Some(Rc::clone(routine));
            }

            next = scope.parent;
        }

        None
    }
}
