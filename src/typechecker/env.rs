//! Lexical type environment.
//!
//! Stella's scoping is a plain stack of frames. Rather than sharing frames
//! behind an `Rc<RefCell<_>>` so sibling closures observe each other's
//! bindings, this checker needs `nested()` to hand back an environment
//! whose writes never become visible to the parent — a descent into
//! `let`, an abstraction body, or a match arm must not leak bindings back
//! out. Each frame is therefore copied by value.

use std::collections::HashMap;

use super::types::Type;

#[derive(Clone, Default)]
pub struct TypeEnv {
    frames: Vec<HashMap<String, Type>>,
}

impl TypeEnv {
    pub fn new() -> Self {
        TypeEnv {
            frames: vec![HashMap::new()],
        }
    }

    /// A child scope that starts as a copy of this one; bindings inserted
    /// into the child are never observed by `self` afterwards.
    pub fn nested(&self) -> Self {
        let mut frames = self.frames.clone();
        frames.push(HashMap::new());
        TypeEnv { frames }
    }

    pub fn insert(&mut self, name: impl ToString, ty: Type) {
        self.frames
            .last_mut()
            .expect("a TypeEnv always has at least one frame")
            .insert(name.to_string(), ty);
    }

    pub fn lookup(&self, name: &str) -> Option<&Type> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_writes_do_not_leak_to_parent() {
        let mut parent = TypeEnv::new();
        parent.insert("x", Type::Nat);

        let mut child = parent.nested();
        child.insert("y", Type::Bool);

        assert_eq!(parent.lookup("y"), None);
        assert_eq!(child.lookup("x"), Some(&Type::Nat));
    }

    #[test]
    fn child_shadows_parent_binding() {
        let mut parent = TypeEnv::new();
        parent.insert("x", Type::Nat);

        let mut child = parent.nested();
        child.insert("x", Type::Bool);

        assert_eq!(parent.lookup("x"), Some(&Type::Nat));
        assert_eq!(child.lookup("x"), Some(&Type::Bool));
    }
}
