//! Contains the name indices of the declarations stored in a database.

use std::{collections::HashMap, fmt::Debug, sync::Arc};

use eolian_arena::ID;

use crate::{
    class::ClassData, declaration::DeclarationData, typedecl::TypedeclData,
    variable::VariableData,
};

/// Maps dotted names to the objects declaring them, remembering the
/// declaring file and the declaration order.
pub(crate) struct Index<T> {
    by_name: HashMap<Arc<str>, (ID<T>, Arc<str>)>,
    by_file: HashMap<Arc<str>, Vec<ID<T>>>,
    order: Vec<ID<T>>,
}

impl<T> Default for Index<T> {
    fn default() -> Self {
        Self {
            by_name: HashMap::new(),
            by_file: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<T> Debug for Index<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Index").field("len", &self.order.len()).finish()
    }
}

impl<T> Index<T> {
    /// Adds `id` under `name`. Returns the file already declaring the name
    /// instead if there is one.
    pub(crate) fn insert(
        &mut self,
        name: Arc<str>,
        file: Arc<str>,
        id: ID<T>,
    ) -> Result<(), Arc<str>> {
        if let Some((_, existing)) = self.by_name.get(&name) {
            return Err(existing.clone());
        }

        self.by_file.entry(file.clone()).or_default().push(id);
        self.by_name.insert(name, (id, file));
        self.order.push(id);

        Ok(())
    }

    /// Removes the entry registered under `name`.
    pub(crate) fn remove(&mut self, name: &str) {
        let Some((id, file)) = self.by_name.remove(name) else {
            return;
        };

        if let Some(ids) = self.by_file.get_mut(&file) {
            ids.retain(|existing| *existing != id);

            if ids.is_empty() {
                self.by_file.remove(&file);
            }
        }

        self.order.retain(|existing| *existing != id);
    }

    pub(crate) fn get(&self, name: &str) -> Option<(ID<T>, &str)> {
        self.by_name.get(name).map(|(id, file)| (*id, &**file))
    }

    pub(crate) fn in_file(&self, file: &str) -> &[ID<T>] {
        self.by_file.get(file).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn all(&self) -> &[ID<T>] { &self.order }
}

/// Selects one index of the [`Registry`].
pub(crate) type Selector<T> = fn(&mut Registry) -> &mut Index<T>;

/// The indices of every named declaration.
///
/// Structs, enums and aliases share the typedecl arena but are indexed
/// separately; function pointer types live in the alias index.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    pub(crate) classes: Index<ClassData>,
    pub(crate) structs: Index<TypedeclData>,
    pub(crate) enums: Index<TypedeclData>,
    pub(crate) aliases: Index<TypedeclData>,
    pub(crate) constants: Index<VariableData>,
    pub(crate) globals: Index<VariableData>,
    pub(crate) declarations: Index<DeclarationData>,
}

impl Registry {
    pub(crate) fn classes_mut(&mut self) -> &mut Index<ClassData> {
        &mut self.classes
    }

    pub(crate) fn structs_mut(&mut self) -> &mut Index<TypedeclData> {
        &mut self.structs
    }

    pub(crate) fn enums_mut(&mut self) -> &mut Index<TypedeclData> {
        &mut self.enums
    }

    pub(crate) fn aliases_mut(&mut self) -> &mut Index<TypedeclData> {
        &mut self.aliases
    }

    pub(crate) fn constants_mut(&mut self) -> &mut Index<VariableData> {
        &mut self.constants
    }

    pub(crate) fn globals_mut(&mut self) -> &mut Index<VariableData> {
        &mut self.globals
    }

    pub(crate) fn declarations_mut(&mut self) -> &mut Index<DeclarationData> {
        &mut self.declarations
    }

    /// Looks up the typedecl declared under `name` in any of the typedecl
    /// indices.
    pub(crate) fn typedecl(&self, name: &str) -> Option<ID<TypedeclData>> {
        self.structs
            .get(name)
            .or_else(|| self.enums.get(name))
            .or_else(|| self.aliases.get(name))
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use eolian_arena::Arena;

    use super::Index;

    #[test]
    fn insert_keeps_order_and_rejects_duplicates() {
        let mut arena = Arena::<u8>::new();
        let mut index = Index::default();
        let first = arena.insert(1);
        let second = arena.insert(2);
        let third = arena.insert(3);

        let file: Arc<str> = Arc::from("a.eot");
        index.insert(Arc::from("B"), file.clone(), first).unwrap();
        index.insert(Arc::from("A"), Arc::from("b.eot"), second).unwrap();

        let existing = index.insert(Arc::from("B"), file, third).unwrap_err();

        assert_eq!(&*existing, "a.eot");
        assert_eq!(index.all(), &[first, second]);
        assert_eq!(index.in_file("a.eot"), &[first]);
        assert_eq!(index.get("A"), Some((second, "b.eot")));
    }

    #[test]
    fn remove_clears_every_view() {
        let mut arena = Arena::<u8>::new();
        let mut index = Index::default();
        let id = arena.insert(1);

        index.insert(Arc::from("A"), Arc::from("a.eot"), id).unwrap();
        index.remove("A");
        index.remove("A");

        assert!(index.get("A").is_none());
        assert!(index.all().is_empty());
        assert!(index.in_file("a.eot").is_empty());
    }
}
