use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

pub const EMPTY_INDEX: u32 = 0;
pub const STRING_CLASS_INDEX: u32 = 1;
pub const OBJECT_CLASS_INDEX: u32 = 2;
pub const THREAD_CLASS_INDEX: u32 = 3;
pub const CLASS_CLASS_INDEX: u32 = 4;

const RESERVED: [&str; 5] = [
    "",
    "java/lang/String",
    "java/lang/Object",
    "java/lang/Thread",
    "java/lang/Class",
];

const ARRAY_CLASS_NAMES: [&str; 10] = [
    "[B",
    "[C",
    "[D",
    "[F",
    "[I",
    "[J",
    "[S",
    "[Z",
    "[Ljava/lang/Object;",
    "[Ljava/lang/String;",
];

/// 字符串池。类名和符号都以下标的形式引用
///
/// Entries are only ever appended, so an index stays valid for the life of the pool.
pub struct StringPool {
    table: HashMap<Arc<str>, u32>,
    list: Vec<Arc<str>>,
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

impl StringPool {
    pub fn new() -> StringPool {
        let mut pool = StringPool {
            table: HashMap::new(),
            list: Vec::new(),
        };
        pool.reset();
        pool
    }

    fn reset(&mut self) {
        self.table.clear();
        self.list.clear();
        for name in RESERVED.iter().chain(ARRAY_CLASS_NAMES.iter()) {
            self.insert(name);
        }
    }

    fn insert(&mut self, s: &str) -> u32 {
        if let Some(index) = self.table.get(s) {
            return *index;
        }
        let index = self.list.len() as u32;
        let entry: Arc<str> = Arc::from(s);
        self.list.push(entry.clone());
        self.table.insert(entry, index);
        index
    }

    pub fn get_index(&self, s: &str) -> Option<u32> {
        self.table.get(s).copied()
    }

    pub fn get_or_insert(&mut self, s: &str) -> u32 {
        self.insert(s)
    }

    pub fn get_string(&self, index: u32) -> Option<Arc<str>> {
        self.list.get(index as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Drops everything but the five reserved entries.
    pub fn empty(&mut self) {
        self.table.clear();
        self.list.clear();
        for name in RESERVED.iter() {
            self.insert(name);
        }
    }

    pub fn dump(&self, label: &str) -> String {
        let mut entries: Vec<&str> = self
            .list
            .iter()
            .map(|s| s.as_ref())
            .filter(|s| {
                !(s.starts_with("java/")
                    || s.starts_with("jdk/")
                    || s.starts_with("javax/")
                    || s.starts_with("sun/"))
            })
            .collect();
        // byte order puts upper case before lower case
        entries.sort_unstable();
        let mut out = format!("===== DumpStringPool BEGIN: {}\n", label);
        for entry in entries {
            let index = self.table.get(entry).copied().unwrap_or(EMPTY_INDEX);
            out.push_str(&format!("{:5}  {}\n", index, entry));
        }
        out.push_str(&format!("===== DumpStringPool END: {}\n", label));
        out
    }
}

static STRING_POOL: LazyLock<RwLock<StringPool>> = LazyLock::new(|| RwLock::new(StringPool::new()));

/// Returns the stable index for `s`, adding it on first sight.
pub fn get_string_index(s: &str) -> u32 {
    if let Some(index) = STRING_POOL.read().get_index(s) {
        return index;
    }
    let mut pool = STRING_POOL.write();
    let index = pool.get_or_insert(s);
    debug!("string pool: {} -> {}", s, index);
    index
}

/// Inverse of [`get_string_index`]; `None` when the index was never handed out.
pub fn get_string_pointer(index: u32) -> Option<Arc<str>> {
    STRING_POOL.read().get_string(index)
}

pub fn get_string_pool_size() -> usize {
    STRING_POOL.read().len()
}

pub fn dump_string_pool(label: &str) -> String {
    STRING_POOL.read().dump(label)
}

/// Resets the global pool to its reserved entries. Test support only.
pub fn empty_string_pool() {
    STRING_POOL.write().empty();
}
