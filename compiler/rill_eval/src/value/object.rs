//! Modules, classes, and instances.
//!
//! A module is a named scope that can include other modules; a class adds a
//! static scope, an instance scope, an optional superclass, and extended
//! modules. Ancestor resolution flattens that graph into the deterministic,
//! duplicate-free chain method dispatch walks.

use rustc_hash::FxHashSet;

use rill_ir::Sym;

use crate::environment::Scope;
use crate::shared::Shared;
use crate::value::Ivars;

/// A named namespace with a binding scope.
#[derive(Debug)]
pub struct ModuleDef {
    pub name: Sym,
    pub scope: Shared<Scope>,
    /// Included modules, most recent first.
    pub included: Vec<Shared<ModuleDef>>,
    pub ivars: Ivars,
}

impl ModuleDef {
    pub fn new(name: Sym) -> Shared<ModuleDef> {
        Shared::new(ModuleDef {
            name,
            scope: Shared::new(Scope::new()),
            included: Vec::new(),
            ivars: Ivars::default(),
        })
    }

    /// Prepend a module to the inclusion list (most recent inclusion wins).
    pub fn include_module(&mut self, module: Shared<ModuleDef>) {
        self.included.insert(0, module);
    }
}

/// A class: static scope, instance scope, optional superclass, and the
/// included/extended module lists.
#[derive(Debug)]
pub struct ClassDef {
    pub name: Sym,
    pub static_scope: Shared<Scope>,
    pub instance_scope: Shared<Scope>,
    pub superclass: Option<Shared<ClassDef>>,
    /// Included modules, most recent first. Searched for instance dispatch.
    pub included: Vec<Shared<ModuleDef>>,
    /// Extended modules, most recent first. Searched for class dispatch.
    pub extended: Vec<Shared<ModuleDef>>,
    pub ivars: Ivars,
}

impl ClassDef {
    pub fn new(name: Sym, superclass: Option<Shared<ClassDef>>) -> Shared<ClassDef> {
        Shared::new(ClassDef {
            name,
            static_scope: Shared::new(Scope::new()),
            instance_scope: Shared::new(Scope::new()),
            superclass,
            included: Vec::new(),
            extended: Vec::new(),
            ivars: Ivars::default(),
        })
    }

    /// Prepend a module to the inclusion list.
    pub fn include_module(&mut self, module: Shared<ModuleDef>) {
        self.included.insert(0, module);
    }

    /// Prepend a module to the extension list.
    pub fn extend_module(&mut self, module: Shared<ModuleDef>) {
        self.extended.insert(0, module);
    }
}

/// An object of a user-defined class.
///
/// The instance scope's parent is the class's instance scope, so
/// instance-level lookup falls back to the class's instance bindings.
#[derive(Debug)]
pub struct Instance {
    pub class: Shared<ClassDef>,
    pub scope: Shared<Scope>,
    pub ivars: Ivars,
}

impl Instance {
    pub fn new(class: Shared<ClassDef>) -> Shared<Instance> {
        let scope = {
            let parent = class.borrow().instance_scope.clone();
            Shared::new(Scope::with_parent(parent))
        };
        Shared::new(Instance {
            class,
            scope,
            ivars: Ivars::default(),
        })
    }
}

/// One entry of an ancestor chain.
#[derive(Clone, Debug)]
pub enum Ancestor {
    Class(Shared<ClassDef>),
    Module(Shared<ModuleDef>),
}

impl Ancestor {
    /// The scope this ancestor contributes to dispatch: a class contributes
    /// its instance scope, a module its scope.
    pub fn dispatch_scope(&self) -> Shared<Scope> {
        match self {
            Ancestor::Class(c) => c.borrow().instance_scope.clone(),
            Ancestor::Module(m) => m.borrow().scope.clone(),
        }
    }

    /// The ancestor's name.
    pub fn name(&self) -> Sym {
        match self {
            Ancestor::Class(c) => c.borrow().name,
            Ancestor::Module(m) => m.borrow().name,
        }
    }

    fn identity(&self) -> usize {
        match self {
            Ancestor::Class(c) => c.as_ptr() as usize,
            Ancestor::Module(m) => m.as_ptr() as usize,
        }
    }
}

/// Ancestor list for normal (instance) method dispatch.
///
/// Included modules in order, each followed by its own ancestors, then the
/// superclass and its ancestors. First occurrence wins; later duplicates are
/// dropped. Deterministic under re-runs.
pub fn class_ancestors(class: &Shared<ClassDef>) -> Vec<Ancestor> {
    let mut out = Vec::new();
    let mut seen = FxHashSet::default();
    append_class_chain(class, false, &mut out, &mut seen);
    out
}

/// Ancestor list for dispatch on the class object itself: extended modules
/// substitute for included ones, and the superclass chain contributes its
/// extended ancestors recursively.
pub fn class_extended_ancestors(class: &Shared<ClassDef>) -> Vec<Ancestor> {
    let mut out = Vec::new();
    let mut seen = FxHashSet::default();
    append_class_chain(class, true, &mut out, &mut seen);
    out
}

fn append_class_chain(
    class: &Shared<ClassDef>,
    extended: bool,
    out: &mut Vec<Ancestor>,
    seen: &mut FxHashSet<usize>,
) {
    let (modules, superclass) = {
        let def = class.borrow();
        let modules = if extended {
            def.extended.clone()
        } else {
            def.included.clone()
        };
        (modules, def.superclass.clone())
    };
    for module in &modules {
        append_module(module, out, seen);
    }
    if let Some(superclass) = superclass {
        push_unique(Ancestor::Class(superclass.clone()), out, seen);
        append_class_chain(&superclass, extended, out, seen);
    }
}

fn append_module(module: &Shared<ModuleDef>, out: &mut Vec<Ancestor>, seen: &mut FxHashSet<usize>) {
    push_unique(Ancestor::Module(module.clone()), out, seen);
    let included = module.borrow().included.clone();
    for inner in &included {
        append_module(inner, out, seen);
    }
}

fn push_unique(ancestor: Ancestor, out: &mut Vec<Ancestor>, seen: &mut FxHashSet<usize>) {
    if seen.insert(ancestor.identity()) {
        out.push(ancestor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(raw: u32) -> Sym {
        Sym::from_raw(raw)
    }

    fn names(ancestors: &[Ancestor]) -> Vec<Sym> {
        ancestors.iter().map(Ancestor::name).collect()
    }

    #[test]
    fn includes_come_before_superclass_most_recent_first() {
        let m1 = ModuleDef::new(sym(1));
        let m2 = ModuleDef::new(sym(2));
        let base = ClassDef::new(sym(10), None);
        let class = ClassDef::new(sym(11), Some(base.clone()));
        class.borrow_mut().include_module(m1);
        class.borrow_mut().include_module(m2);

        // m2 was included last, so it is searched first.
        assert_eq!(names(&class_ancestors(&class)), vec![sym(2), sym(1), sym(10)]);
    }

    #[test]
    fn module_ancestors_are_flattened() {
        let inner = ModuleDef::new(sym(1));
        let outer = ModuleDef::new(sym(2));
        outer.borrow_mut().include_module(inner.clone());
        let class = ClassDef::new(sym(10), None);
        class.borrow_mut().include_module(outer);

        assert_eq!(names(&class_ancestors(&class)), vec![sym(2), sym(1)]);
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let shared = ModuleDef::new(sym(1));
        let base = ClassDef::new(sym(10), None);
        base.borrow_mut().include_module(shared.clone());
        let class = ClassDef::new(sym(11), Some(base.clone()));
        class.borrow_mut().include_module(shared.clone());

        // The module appears once, at its first position.
        assert_eq!(names(&class_ancestors(&class)), vec![sym(1), sym(10)]);
    }

    #[test]
    fn deterministic_under_reruns() {
        let m = ModuleDef::new(sym(1));
        let base = ClassDef::new(sym(10), None);
        let class = ClassDef::new(sym(11), Some(base));
        class.borrow_mut().include_module(m);

        let first = names(&class_ancestors(&class));
        let second = names(&class_ancestors(&class));
        assert_eq!(first, second);
    }

    #[test]
    fn extended_ancestors_use_extension_list() {
        let inst = ModuleDef::new(sym(1));
        let stat = ModuleDef::new(sym(2));
        let class = ClassDef::new(sym(10), None);
        class.borrow_mut().include_module(inst);
        class.borrow_mut().extend_module(stat);

        assert_eq!(names(&class_ancestors(&class)), vec![sym(1)]);
        assert_eq!(names(&class_extended_ancestors(&class)), vec![sym(2)]);
    }

    #[test]
    fn extended_ancestors_follow_superclass_extensions() {
        let base_ext = ModuleDef::new(sym(1));
        let base = ClassDef::new(sym(10), None);
        base.borrow_mut().extend_module(base_ext);
        let class = ClassDef::new(sym(11), Some(base.clone()));

        assert_eq!(
            names(&class_extended_ancestors(&class)),
            vec![sym(10), sym(1)]
        );
    }

    #[test]
    fn instance_scope_parents_to_class_instance_scope() {
        use crate::value::Value;

        let class = ClassDef::new(sym(10), None);
        class
            .borrow()
            .instance_scope
            .borrow_mut()
            .define(sym(1), Value::Int(42));
        let instance = Instance::new(class);
        assert_eq!(
            instance.borrow().scope.borrow().lookup(sym(1)),
            Some(Value::Int(42))
        );
    }
}
