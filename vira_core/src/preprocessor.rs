//! Line-oriented text preprocessor run before lexing.
//!
//! Directives start with `#` as the first non-blank character of a line:
//! `#define NAME value`, `#undef NAME` and `#include "file"` / `#include <file>`.
//! Unknown directives are passed through untouched. On every other line each
//! identifier naming a macro is replaced by its value, once, without
//! rescanning the substituted text.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, trace};
use crate::language::error::Result;
use crate::preprocessor_error;

pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 16;

/// Locates and reads files named by `#include`.
pub trait IncludeResolver {
    /// `system` is true for `<name>`, false for `"name"`. `from` is the
    /// directory of the including file, when known.
    fn load(&self, name: &str, system: bool, from: Option<&Path>) -> Option<(PathBuf, String)>;
}

/// Resolves `"name"` against the including file's directory and then the
/// working directory, and `<name>` against the configured include paths.
#[derive(Debug, Clone, Default)]
pub struct FsResolver {
    include_paths: Vec<PathBuf>,
}

impl FsResolver {
    pub fn new(include_paths: Vec<PathBuf>) -> Self {
        FsResolver { include_paths }
    }

    fn read(path: PathBuf) -> Option<(PathBuf, String)> {
        match fs::read_to_string(&path) {
            Ok(content) => Some((path, content)),
            Err(e) => {
                trace!("Include candidate '{}' not readable: {}", path.display(), e);
                None
            }
        }
    }
}

impl IncludeResolver for FsResolver {
    fn load(&self, name: &str, system: bool, from: Option<&Path>) -> Option<(PathBuf, String)> {
        if system {
            return self
                .include_paths
                .iter()
                .find_map(|dir| Self::read(dir.join(name)));
        }

        from.and_then(|dir| Self::read(dir.join(name)))
            .or_else(|| Self::read(PathBuf::from(name)))
    }
}

/// In-memory file table, keyed by the name written in the directive.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    files: HashMap<String, String>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        MemoryResolver::default()
    }

    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(name.into(), content.into());
        self
    }
}

impl IncludeResolver for MemoryResolver {
    fn load(&self, name: &str, _system: bool, _from: Option<&Path>) -> Option<(PathBuf, String)> {
        self.files.get(name).map(|content| (PathBuf::from(name), content.clone()))
    }
}

/// One preprocessing session. The macro table lives as long as the session
/// and is shared by every included file.
pub struct Preprocessor<R: IncludeResolver> {
    defines: HashMap<String, String>,
    resolver: R,
    max_include_depth: usize,
    include_stack: Vec<PathBuf>,
}

impl<R: IncludeResolver> Preprocessor<R> {
    pub fn new(resolver: R) -> Self {
        Preprocessor {
            defines: HashMap::new(),
            resolver,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            include_stack: Vec::new(),
        }
    }

    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }

    pub fn define(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.defines.insert(name.into(), value.into());
    }

    pub fn undefine(&mut self, name: &str) -> bool {
        self.defines.remove(name).is_some()
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.defines.get(name).map(String::as_str)
    }

    /// Preprocesses `source`. `origin` is the path it was read from, used to
    /// resolve relative includes and to detect include cycles.
    pub fn process(&mut self, source: &str, origin: Option<&Path>) -> Result<String> {
        let mut out = String::with_capacity(source.len());

        if let Some(path) = origin {
            self.include_stack.push(path.to_path_buf());
        }
        let result = self.process_text(source, origin, &mut out);
        if origin.is_some() {
            self.include_stack.pop();
        }

        result?;
        debug!("Preprocessed {} bytes into {} bytes, {} macros defined", source.len(), out.len(), self.defines.len());
        Ok(out)
    }

    pub fn process_file(&mut self, path: &Path) -> Result<String> {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => return preprocessor_error!(format!("Cannot open input '{}': {}", path.display(), e)),
        };
        self.process(&source, Some(path))
    }

    fn process_text(&mut self, source: &str, origin: Option<&Path>, out: &mut String) -> Result<()> {
        for (index, line) in source.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = line.trim_start();

            if let Some(directive) = trimmed.strip_prefix('#') {
                self.directive(directive, line, line_no, origin, out)?;
            } else {
                self.expand_macros(line, out);
                out.push('\n');
            }
        }

        Ok(())
    }

    fn directive(&mut self, directive: &str, line: &str, line_no: usize, origin: Option<&Path>, out: &mut String) -> Result<()> {
        let directive = directive.trim_start();
        let (keyword, rest) = split_word(directive);

        match keyword {
            "include" => self.include(rest.trim(), line_no, origin, out),
            "define" => {
                let (name, value) = split_word(rest.trim_start());
                if name.is_empty() {
                    return preprocessor_error!("Expected macro name after #define", line_no);
                }
                trace!("#define {} {}", name, value.trim());
                self.define(name, value.trim());
                Ok(())
            }
            "undef" => {
                let name = rest.trim();
                if !self.undefine(name) {
                    trace!("#undef of unknown macro '{}'", name);
                }
                Ok(())
            }
            _ => {
                out.push_str(line);
                out.push('\n');
                Ok(())
            }
        }
    }

    fn include(&mut self, target: &str, line_no: usize, origin: Option<&Path>, out: &mut String) -> Result<()> {
        let (system, closing) = match target.chars().next() {
            Some('<') => (true, '>'),
            Some('"') => (false, '"'),
            _ => return preprocessor_error!("Invalid include", line_no),
        };

        let Some(end) = target[1..].find(closing) else {
            return preprocessor_error!("Invalid include", line_no);
        };
        let name = &target[1..1 + end];

        if self.include_stack.len() >= self.max_include_depth {
            return preprocessor_error!(format!("Include depth exceeded including '{}'", name), line_no);
        }

        let from_dir = origin.and_then(Path::parent);
        let Some((path, content)) = self.resolver.load(name, system, from_dir) else {
            return preprocessor_error!(format!("Cannot open include: {}", name), line_no);
        };

        if self.include_stack.contains(&path) {
            debug!("Include cycle through '{}'", path.display());
            return preprocessor_error!(format!("Include cycle: '{}' includes itself", path.display()), line_no);
        }

        debug!("Including '{}'", path.display());
        self.include_stack.push(path.clone());
        let result = self.process_text(&content, Some(&path), out);
        self.include_stack.pop();

        result
    }

    fn expand_macros(&self, line: &str, out: &mut String) {
        let mut chars = line.char_indices().peekable();

        while let Some((start, ch)) = chars.next() {
            if !(ch.is_alphabetic() || ch == '_') {
                out.push(ch);
                continue;
            }

            let mut end = start + ch.len_utf8();
            while let Some(&(index, next)) = chars.peek() {
                if next.is_alphanumeric() || next == '_' {
                    end = index + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }

            let ident = &line[start..end];
            out.push_str(self.lookup(ident).unwrap_or(ident));
        }
    }
}

fn split_word(text: &str) -> (&str, &str) {
    match text.find(char::is_whitespace) {
        Some(index) => (&text[..index], &text[index..]),
        None => (text, ""),
    }
}
