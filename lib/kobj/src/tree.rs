use crate::{AttributeTree, KobjError, KobjId, KobjMode, READ_BUFFER_SIZE, ReadFn, WriteFn};
use alloc::{boxed::Box, collections::BTreeMap, string::String, vec, vec::Vec};
use spin::RwLock;

pub enum KobjKind {
    Directory,
    Regular {
        read: Option<ReadFn>,
        write: Option<WriteFn>,
    },
}

pub struct Kobj {
    pub name: Box<str>,
    pub parent: Option<KobjId>,
    pub children: Vec<KobjId>,
    pub kind: KobjKind,
}

impl Kobj {
    pub fn is_directory(&self) -> bool {
        matches!(self.kind, KobjKind::Directory)
    }

    pub fn mode(&self) -> KobjMode {
        let mut mode = KobjMode::empty();
        if let KobjKind::Regular { read, write } = &self.kind {
            if read.is_some() {
                mode |= KobjMode::READ;
            }
            if write.is_some() {
                mode |= KobjMode::WRITE;
            }
        }
        mode
    }
}

/// Live nodes keyed by [KobjId]. Removal frees the entry, but ids come from a monotonic
/// counter and are never handed out again, so a stale id resolves to [KobjError::NotFound]
/// instead of some unrelated node.
struct Container {
    nodes: BTreeMap<usize, Kobj>,
    next: usize,
}

impl Container {
    fn get(&self, id: KobjId) -> Result<&Kobj, KobjError> {
        self.nodes.get(&*id).ok_or(KobjError::NotFound)
    }

    fn get_mut(&mut self, id: KobjId) -> Result<&mut Kobj, KobjError> {
        self.nodes.get_mut(&*id).ok_or(KobjError::NotFound)
    }

    fn find_child(&self, dir: &Kobj, name: &str) -> Option<KobjId> {
        dir.children
            .iter()
            .copied()
            .find(|id| matches!(self.get(*id), Ok(child) if *child.name == *name))
    }

    fn insert(&mut self, parent: KobjId, name: &str, kind: KobjKind) -> Result<KobjId, KobjError> {
        if name.is_empty() || name.contains('/') {
            return Err(KobjError::InvalidName);
        }
        let dir = self.get(parent)?;
        if !dir.is_directory() {
            return Err(KobjError::NotDirectory);
        }
        if self.find_child(dir, name).is_some() {
            return Err(KobjError::Exists);
        }
        let id = KobjId::from(self.next);
        self.next += 1;
        self.nodes.insert(
            *id,
            Kobj {
                name: Box::from(name),
                parent: Some(parent),
                children: vec![],
                kind,
            },
        );
        self.get_mut(parent)?.children.push(id);
        Ok(id)
    }

    fn resolve(&self, root: KobjId, path: &str) -> Result<KobjId, KobjError> {
        let mut node = root;
        for section in path.split('/') {
            if section.trim().is_empty() {
                continue;
            }
            let dir = self.get(node)?;
            node = self.find_child(dir, section).ok_or(KobjError::NotFound)?;
        }
        Ok(node)
    }

    fn drop_subtree(&mut self, id: KobjId) {
        let Some(node) = self.nodes.remove(&*id) else {
            return;
        };
        for child in node.children {
            self.drop_subtree(child);
        }
    }
}

/// In-memory object tree.
pub struct ObjectTree {
    root: KobjId,
    inner: RwLock<Container>,
}

impl ObjectTree {
    pub fn new() -> ObjectTree {
        let root = Kobj {
            name: Box::from(""),
            parent: None,
            children: vec![],
            kind: KobjKind::Directory,
        };
        ObjectTree {
            root: KobjId::from(0),
            inner: RwLock::new(Container {
                nodes: BTreeMap::from([(0, root)]),
                next: 1,
            }),
        }
    }

    /// Number of live nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.inner.read().nodes.len()
    }

    /// Resolve a `/`-separated path from the root.
    pub fn lookup(&self, path: impl AsRef<str>) -> Result<KobjId, KobjError> {
        self.inner.read().resolve(self.root, path.as_ref())
    }

    pub fn exists(&self, path: impl AsRef<str>) -> bool {
        self.lookup(path).is_ok()
    }

    /// Names of the children of the directory at `path`, in creation order.
    pub fn list(&self, path: impl AsRef<str>) -> Result<Vec<Box<str>>, KobjError> {
        let guard = self.inner.read();
        let dir = guard.get(guard.resolve(self.root, path.as_ref())?)?;
        if !dir.is_directory() {
            return Err(KobjError::NotDirectory);
        }
        Ok(dir
            .children
            .iter()
            .filter_map(|id| guard.get(*id).ok())
            .map(|child| child.name.clone())
            .collect())
    }

    pub fn mode(&self, path: impl AsRef<str>) -> Result<KobjMode, KobjError> {
        let guard = self.inner.read();
        Ok(guard.get(guard.resolve(self.root, path.as_ref())?)?.mode())
    }

    /// Render the regular node at `path` into `buf`, returning the byte count.
    ///
    /// The callback runs after the tree lock is released, so it may itself read the tree.
    pub fn read_into(&self, path: impl AsRef<str>, buf: &mut [u8]) -> Result<usize, KobjError> {
        let read = {
            let guard = self.inner.read();
            let node = guard.get(guard.resolve(self.root, path.as_ref())?)?;
            match &node.kind {
                KobjKind::Directory => return Err(KobjError::NotRegular),
                KobjKind::Regular { read, .. } => read.clone().ok_or(KobjError::PermissionDenied)?,
            }
        };
        Ok(read(buf).min(buf.len()))
    }

    /// Render the regular node at `path` as text.
    pub fn read(&self, path: impl AsRef<str>) -> Result<String, KobjError> {
        let mut buf = vec![0u8; READ_BUFFER_SIZE];
        let len = self.read_into(path, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf[..len]).into_owned())
    }

    pub fn write(&self, path: impl AsRef<str>, data: &[u8]) -> Result<usize, KobjError> {
        let write = {
            let guard = self.inner.read();
            let node = guard.get(guard.resolve(self.root, path.as_ref())?)?;
            match &node.kind {
                KobjKind::Directory => return Err(KobjError::NotRegular),
                KobjKind::Regular { write, .. } => {
                    write.clone().ok_or(KobjError::PermissionDenied)?
                }
            }
        };
        Ok(write(data))
    }
}

impl Default for ObjectTree {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeTree for ObjectTree {
    fn root(&self) -> KobjId {
        self.root
    }

    fn search_directory_with_create(
        &self,
        parent: KobjId,
        name: &str,
    ) -> Result<KobjId, KobjError> {
        let mut guard = self.inner.write();
        let dir = guard.get(parent)?;
        if let Some(id) = guard.find_child(dir, name) {
            return match guard.get(id)?.is_directory() {
                true => Ok(id),
                false => Err(KobjError::NotDirectory),
            };
        }
        guard.insert(parent, name, KobjKind::Directory)
    }

    fn add_directory(&self, parent: KobjId, name: &str) -> Result<KobjId, KobjError> {
        self.inner
            .write()
            .insert(parent, name, KobjKind::Directory)
    }

    fn add_regular(
        &self,
        dir: KobjId,
        name: &str,
        read: Option<ReadFn>,
        write: Option<WriteFn>,
    ) -> Result<KobjId, KobjError> {
        self.inner
            .write()
            .insert(dir, name, KobjKind::Regular { read, write })
    }

    fn remove(&self, node: KobjId) -> Result<(), KobjError> {
        if node == self.root {
            return Err(KobjError::PermissionDenied);
        }
        let mut guard = self.inner.write();
        let parent = guard.get(node)?.parent;
        if let Some(parent) = parent {
            guard.get_mut(parent)?.children.retain(|id| *id != node);
        }
        guard.drop_subtree(node);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::sync::Arc;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use utils::fmt::format_into;

    fn text(value: &'static str) -> ReadFn {
        Arc::new(move |buf: &mut [u8]| format_into(buf, format_args!("{}", value)))
    }

    #[test]
    fn search_with_create_is_idempotent() {
        let tree = ObjectTree::new();
        let class = tree.search_directory_with_create(tree.root(), "class").unwrap();
        let again = tree.search_directory_with_create(tree.root(), "class").unwrap();
        assert_eq!(class, again);
        assert_eq!(tree.list("/").unwrap().len(), 1);
    }

    #[test]
    fn regular_node_renders_on_read() {
        let tree = ObjectTree::new();
        let dir = tree.add_directory(tree.root(), "board").unwrap();
        tree.add_regular(dir, "description", Some(text("QEMU virt")), None)
            .unwrap();
        assert_eq!(tree.read("/board/description").unwrap(), "QEMU virt");
        assert_eq!(tree.mode("board/description").unwrap(), KobjMode::READ);
        assert_eq!(tree.read("/board"), Err(KobjError::NotRegular));
    }

    #[test]
    fn read_only_node_rejects_write() {
        let tree = ObjectTree::new();
        let dir = tree.add_directory(tree.root(), "board").unwrap();
        tree.add_regular(dir, "uniqueid", Some(text("01")), None).unwrap();
        assert_eq!(
            tree.write("/board/uniqueid", b"x"),
            Err(KobjError::PermissionDenied)
        );
    }

    #[test]
    fn writable_node_accepts_bytes() {
        let seen = Arc::new(AtomicUsize::new(0));
        let sink = seen.clone();
        let tree = ObjectTree::new();
        let dir = tree.add_directory(tree.root(), "led").unwrap();
        let write: WriteFn = Arc::new(move |data: &[u8]| {
            sink.fetch_add(data.len(), Ordering::Relaxed);
            data.len()
        });
        tree.add_regular(dir, "brightness", None, Some(write)).unwrap();
        assert_eq!(tree.write("led/brightness", b"255").unwrap(), 3);
        assert_eq!(seen.load(Ordering::Relaxed), 3);
        assert_eq!(tree.mode("led/brightness").unwrap(), KobjMode::WRITE);
    }

    #[test]
    fn duplicate_and_invalid_names_are_rejected() {
        let tree = ObjectTree::new();
        tree.add_directory(tree.root(), "a").unwrap();
        assert_eq!(tree.add_directory(tree.root(), "a"), Err(KobjError::Exists));
        assert_eq!(tree.add_directory(tree.root(), ""), Err(KobjError::InvalidName));
        assert_eq!(
            tree.add_directory(tree.root(), "a/b"),
            Err(KobjError::InvalidName)
        );
    }

    #[test]
    fn remove_drops_the_whole_subtree() {
        let tree = ObjectTree::new();
        let dir = tree.add_directory(tree.root(), "board").unwrap();
        let attr = tree.add_regular(dir, "map", Some(text("")), None).unwrap();
        tree.remove(dir).unwrap();
        assert!(!tree.exists("/board"));
        assert_eq!(tree.remove(attr), Err(KobjError::NotFound));
        assert_eq!(tree.remove(tree.root()), Err(KobjError::PermissionDenied));
        // Ids are not recycled.
        let other = tree.add_directory(tree.root(), "board").unwrap();
        assert_ne!(other, dir);
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn churn_does_not_grow_storage() {
        let tree = ObjectTree::new();
        let mut last = None;
        for _ in 0..10_000 {
            let dir = tree.add_directory(tree.root(), "board").unwrap();
            tree.add_regular(dir, "description", Some(text("x")), None)
                .unwrap();
            tree.add_regular(dir, "map", Some(text("")), None).unwrap();
            assert_eq!(tree.node_count(), 4);
            tree.remove(dir).unwrap();
            assert_eq!(tree.node_count(), 1);
            assert_ne!(Some(dir), last);
            last = Some(dir);
        }
        assert_eq!(tree.list("/").unwrap().len(), 0);
    }
}
