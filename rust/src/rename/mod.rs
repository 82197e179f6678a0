use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::ast::{NodeId, NodeMap, Syntax};
use crate::char::{ID_CONTINUE, ID_START};
use crate::error::{ConfigError, MalformedInputError, MalformedResult};
use crate::lex::KEYWORD_STRS;
use crate::scope::{BindingId, BindingKind, ScopeId, ScopeTree};
use crate::source::SourceRange;

#[cfg(test)]
mod tests;

pub const DEFAULT_START_CHARS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_$";
pub const DEFAULT_CONTINUE_CHARS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_$0123456789";

/// Characters generated names are built from. The first character of a name comes from `start`,
/// later ones from `continuation`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
    start: Vec<u8>,
    continuation: Vec<u8>,
}

fn check_chars(chars: &[u8], legal: impl Fn(u8) -> bool) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for &c in chars {
        if !legal(c) {
            return Err(ConfigError::InvalidAlphabetChar(c as char));
        };
        if !seen.insert(c) {
            return Err(ConfigError::DuplicateAlphabetChar(c as char));
        };
    }
    Ok(())
}

impl Alphabet {
    pub fn new(start: &str, continuation: &str) -> Result<Alphabet, ConfigError> {
        let start = start.as_bytes().to_vec();
        let continuation = continuation.as_bytes().to_vec();
        if start.is_empty() || continuation.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        };
        // Non-ASCII bytes fail these filters, so both sets are ASCII afterwards.
        check_chars(&start, |c| c.is_ascii() && ID_START.has(c))?;
        check_chars(&continuation, |c| c.is_ascii() && ID_CONTINUE.has(c))?;
        if let Some(&c) = start.iter().find(|c| !continuation.contains(c)) {
            return Err(ConfigError::StartCharNotContinue(c as char));
        };
        Ok(Alphabet {
            start,
            continuation,
        })
    }

    pub fn start(&self) -> &[u8] {
        &self.start
    }

    pub fn continuation(&self) -> &[u8] {
        &self.continuation
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Alphabet {
            start: DEFAULT_START_CHARS.as_bytes().to_vec(),
            continuation: DEFAULT_CONTINUE_CHARS.as_bytes().to_vec(),
        }
    }
}

/// Returns the `index`-th name: all one-character names first, then all two-character names, and
/// so on. Within one length the first character varies fastest.
pub fn get_name(alphabet: &Alphabet, index: usize) -> Vec<u8> {
    let s = alphabet.start.len();
    let c = alphabet.continuation.len();
    let mut rem = index;
    let mut len = 1;
    // Number of names of the current length; None once it exceeds any possible index.
    let mut block = Some(s);
    while let Some(b) = block {
        if rem < b {
            break;
        };
        rem -= b;
        len += 1;
        block = b.checked_mul(c);
    }
    let mut name = Vec::with_capacity(len);
    name.push(alphabet.start[rem % s]);
    rem /= s;
    for _ in 1..len {
        name.push(alphabet.continuation[rem % c]);
        rem /= c;
    }
    name
}

/// Exact inverse of `get_name`. Returns None if `name` cannot be generated from `alphabet`.
pub fn get_index(alphabet: &Alphabet, name: &[u8]) -> Option<usize> {
    let (first, rest) = name.split_first()?;
    let s = alphabet.start.len();
    let c = alphabet.continuation.len();
    let mut offset: usize = 0;
    let mut block = s;
    for _ in 0..rest.len() {
        offset = offset.checked_add(block)?;
        block = block.checked_mul(c)?;
    }
    let first = alphabet.start.iter().position(|x| x == first)?;
    let mut tail: usize = 0;
    for ch in rest.iter().rev() {
        let digit = alphabet.continuation.iter().position(|x| x == ch)?;
        tail = tail.checked_mul(c)?.checked_add(digit)?;
    }
    offset.checked_add(tail.checked_mul(s)?.checked_add(first)?)
}

// Contextual keywords that are ordinary identifiers everywhere a binding can appear.
const CONTEXTUAL_KEYWORDS: &[&str] = &["as", "async", "constructor", "from", "get", "of", "set"];

// Reserved in strict mode or naming globals the minifier itself relies on.
const EXTRA_RESERVED: &[&str] = &[
    "arguments",
    "enum",
    "eval",
    "implements",
    "Infinity",
    "interface",
    "NaN",
    "package",
    "private",
    "protected",
    "public",
    "undefined",
];

/// Names a renamed binding may never take.
pub struct ReservedWords {
    words: HashSet<Vec<u8>>,
}

impl ReservedWords {
    pub fn new() -> ReservedWords {
        let mut words: HashSet<Vec<u8>> = KEYWORD_STRS
            .iter()
            .filter(|w| !CONTEXTUAL_KEYWORDS.iter().any(|c| c.as_bytes() == **w))
            .map(|w| w.to_vec())
            .collect();
        words.extend(EXTRA_RESERVED.iter().map(|w| w.as_bytes().to_vec()));
        ReservedWords { words }
    }

    pub fn contains(&self, name: &[u8]) -> bool {
        self.words.contains(name)
    }
}

impl Default for ReservedWords {
    fn default() -> Self {
        ReservedWords::new()
    }
}

fn set_identifier_name(map: &mut NodeMap, node: NodeId, new_name: &SourceRange) -> MalformedResult<()> {
    match map[node].stx_mut() {
        Syntax::IdentifierExpr { name }
        | Syntax::IdentifierPattern { name }
        | Syntax::ClassOrFunctionName { name } => {
            *name = new_name.clone();
            Ok(())
        }
        _ => Err(MalformedInputError::new(node, "identifier")),
    }
}

struct Renamer<'a> {
    tree: &'a ScopeTree,
    alphabet: &'a Alphabet,
    reserved: &'a ReservedWords,
    free_names: HashSet<Vec<u8>>,
    names: HashMap<BindingId, SourceRange>,
}

impl<'a> Renamer<'a> {
    fn can_rename(&self, id: BindingId) -> bool {
        let b = self.tree.binding(id);
        !self.tree.is_binding_exposed(id)
            && b.kind() != BindingKind::Import
            && *b.name() != *"arguments"
    }

    fn current_name(&self, id: BindingId) -> &SourceRange {
        self.names
            .get(&id)
            .unwrap_or_else(|| self.tree.binding(id).name())
    }

    // Outer scopes are named first, so every outer binding referenced here already has its final
    // name when this scope's bindings pick theirs.
    fn rename_scope(&mut self, scope: ScopeId) {
        let tree = self.tree;
        let data = tree.scope(scope);
        let mut taken: HashSet<Vec<u8>> = data
            .outer_references()
            .iter()
            .map(|&b| self.current_name(b).as_slice().to_vec())
            .collect();
        let mut pending = Vec::new();
        for &b in data.bindings() {
            if self.names.contains_key(&b) || !self.can_rename(b) {
                taken.insert(self.current_name(b).as_slice().to_vec());
            } else {
                pending.push(b);
            };
        }
        let mut next_index = 0;
        for b in pending {
            let name = loop {
                let candidate = get_name(self.alphabet, next_index);
                next_index += 1;
                if !self.reserved.contains(&candidate)
                    && !taken.contains(&candidate)
                    && !self.free_names.contains(&candidate)
                {
                    break candidate;
                };
            };
            taken.insert(name.clone());
            trace!(
                from = %tree.binding(b).name(),
                to = %String::from_utf8_lossy(&name),
                "renamed binding"
            );
            self.names.insert(b, SourceRange::anonymous(name));
        }
        for &child in data.children() {
            self.rename_scope(child);
        }
    }
}

/// Gives every renameable binding the shortest name that collides with nothing visible where the
/// binding is live, then rewrites all of its declaration and reference sites. Returns the number
/// of bindings renamed.
pub fn rename_bindings(
    map: &mut NodeMap,
    tree: &ScopeTree,
    alphabet: &Alphabet,
    reserved: &ReservedWords,
) -> MalformedResult<usize> {
    let mut renamer = Renamer {
        tree,
        alphabet,
        reserved,
        free_names: tree
            .free_names()
            .iter()
            .map(|n| n.as_slice().to_vec())
            .collect(),
        names: HashMap::new(),
    };
    renamer.rename_scope(tree.root());
    let mut renamed = 0;
    for (id, new_name) in renamer.names {
        let b = tree.binding(id);
        if *b.name() == new_name {
            continue;
        };
        for &site in b.declarations().iter().chain(b.references()) {
            set_identifier_name(map, site, &new_name)?;
        }
        renamed += 1;
    }
    Ok(renamed)
}

/// Removes the names of function expressions that never refer to themselves.
pub fn drop_unused_function_expression_names(map: &mut NodeMap, tree: &ScopeTree) -> usize {
    let mut dropped = 0;
    for node in map.ids().collect::<Vec<_>>() {
        let unused = match map[node].stx() {
            Syntax::FunctionExpr {
                name: Some(name), ..
            } => tree.binding_of(*name).map_or(false, |b| {
                let binding = tree.binding(b);
                binding.references().is_empty() && !tree.scope(binding.scope()).is_dynamic()
            }),
            _ => false,
        };
        if unused {
            if let Syntax::FunctionExpr { name, .. } = map[node].stx_mut() {
                *name = None;
                dropped += 1;
            };
        };
    }
    dropped
}
