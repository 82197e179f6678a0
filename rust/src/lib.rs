use std::io::{self, Write};

use thiserror::Error;
use tracing::{debug, debug_span};

use ast::{NodeId, NodeMap};
use emit::emit_js;
use error::{ConfigError, MalformedInputError, SyntaxError, SyntaxErrorType};
use lex::Lexer;
use parse::{parse_top_level, parser::Parser};
use rename::{drop_unused_function_expression_names, rename_bindings, ReservedWords};
use scope::build_scopes;
use simplify::{simplify, SimplifyContext};
use version::VersionPolicy;

pub mod ast;
pub mod char;
mod config;
pub mod emit;
pub mod error;
pub mod lex;
pub mod num;
pub mod operator;
pub mod parse;
pub mod rename;
pub mod scope;
pub mod simplify;
pub mod source;
pub mod token;
#[cfg(test)]
mod util;
pub mod version;

pub use config::Config;

#[derive(Debug, Error)]
pub enum MinifyError {
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Malformed(#[from] MalformedInputError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A parsed source file: the node arena and the `TopLevel` node at its root.
pub struct Program {
    pub node_map: NodeMap,
    pub root: NodeId,
}

/// Parses UTF-8 JavaScript source code into a syntax tree.
pub fn parse(source: Vec<u8>) -> Result<Program, SyntaxError> {
    if let Err(err) = std::str::from_utf8(&source) {
        return Err(SyntaxError::new(
            SyntaxErrorType::InvalidUtf8,
            err.valid_up_to(),
            None,
        ));
    };
    let lexer = Lexer::new(source);
    let mut parser = Parser::new(lexer);
    let root = parse_top_level(&mut parser)?;
    Ok(Program {
        node_map: parser.take(),
        root,
    })
}

/// Renames local bindings and simplifies statements and expressions of an already parsed program
/// in place. This allows custom introspections and transforms on the tree before or after.
///
/// # Arguments
///
/// * `config` - Renaming and target version options.
/// * `node_map` - The NodeMap from the parsed AST.
/// * `root` - The ID of the `TopLevel` node from the parsed AST.
pub fn transform(config: &Config, node_map: &mut NodeMap, root: NodeId) -> Result<(), MinifyError> {
    config.validate()?;

    let tree = {
        let _span = debug_span!("scopes").entered();
        let tree = build_scopes(node_map, root)?;
        debug!(
            scopes = tree.scope_count(),
            bindings = tree.binding_count(),
            "built scope tree"
        );
        tree
    };

    {
        let _span = debug_span!("rename").entered();
        if config.keep_var_names {
            debug!("renaming disabled");
        } else {
            let reserved = ReservedWords::new();
            let renamed = rename_bindings(node_map, &tree, &config.alphabet, &reserved)?;
            let dropped = drop_unused_function_expression_names(node_map, &tree);
            debug!(renamed, dropped, "renamed bindings");
        };
    }

    let _span = debug_span!("simplify", version = config.version).entered();
    let policy = VersionPolicy::new();
    let ctx = SimplifyContext {
        policy: &policy,
        target_version: config.version,
    };
    let passes = simplify(node_map, root, &ctx)?;
    debug!(passes, "simplified");
    Ok(())
}

/// Emits UTF-8 JavaScript code from a parsed AST in a minified way.
///
/// # Arguments
///
/// * `node_map` - The NodeMap from the parsed AST.
/// * `root` - The ID of the root node from the parsed AST.
/// * `output` - Destination to write output JavaScript code.
pub fn emit<T: Write>(node_map: &NodeMap, root: NodeId, output: &mut T) -> Result<(), MinifyError> {
    let mut out = Vec::new();
    emit_js(&mut out, node_map, root);
    output.write_all(&out)?;
    Ok(())
}

/// Minifies UTF-8 JavaScript code, represented as an array of bytes.
///
/// # Arguments
///
/// * `config` - Renaming and target version options.
/// * `source` - A vector of bytes representing the source code to minify.
/// * `output` - Destination to write minified output JavaScript code.
///
/// # Examples
///
/// ```
/// use jscrush::{minify, Config};
///
/// let code: &[u8] = b"const main = () => { let my_first_variable = 1; return my_first_variable; };";
/// let mut out = Vec::new();
/// minify(&Config::default(), code.to_vec(), &mut out).unwrap();
/// assert_eq!(out.as_slice(), b"const main=()=>{let a=1;return a}");
/// ```
pub fn minify<T: Write>(config: &Config, source: Vec<u8>, output: &mut T) -> Result<(), MinifyError> {
    config.validate()?;
    let mut program = parse(source)?;
    transform(config, &mut program.node_map, program.root)?;
    emit(&program.node_map, program.root, output)
}

#[cfg(test)]
mod tests;
