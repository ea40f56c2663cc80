//! Parser module for JavaScript/TypeScript source code
//!
//! Integrates with SWC for parsing source files into a `Program` and keeps
//! enough position information to turn spans back into byte offsets.

use swc_common::sync::Lrc;
use swc_common::{BytePos, FileName, SourceMap, Span, Spanned};
use swc_ecma_parser::{EsSyntax, Syntax, TsSyntax, parse_file_as_program};

pub use swc_ecma_ast::{EsVersion, Program};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    JavaScript,
    TypeScript,
    Jsx,
    Tsx,
}

pub fn detect_language(filename: &str) -> Language {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();

    match ext.as_str() {
        "ts" | "mts" | "cts" => Language::TypeScript,
        "tsx" => Language::Tsx,
        "jsx" => Language::Jsx,
        _ => Language::JavaScript,
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

#[derive(Debug)]
pub struct ParseResult {
    pub program: Option<Program>,
    pub errors: Vec<ParseError>,
    /// Position of the first byte of the source in span coordinates.
    pub start_pos: BytePos,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// A source file together with its recovered parse.
pub struct ParsedFile {
    filename: String,
    source: String,
    program: Option<Program>,
    errors: Vec<ParseError>,
    start_pos: BytePos,
}

impl std::fmt::Debug for ParsedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedFile")
            .field("filename", &self.filename)
            .field("has_program", &self.program.is_some())
            .field("error_count", &self.errors.len())
            .finish()
    }
}

impl ParsedFile {
    pub fn from_source(filename: &str, source: &str) -> Self {
        let result = Parser::for_file(filename).parse_recovering(source);

        Self {
            filename: filename.to_string(),
            source: source.to_string(),
            program: result.program,
            errors: result.errors,
            start_pos: result.start_pos,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn program(&self) -> Option<&Program> {
        self.program.as_ref()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Converts a span position into a byte offset into [`ParsedFile::source`].
    pub fn offset(&self, pos: BytePos) -> usize {
        (pos.0.saturating_sub(self.start_pos.0) as usize).min(self.source.len())
    }

    pub fn byte_range(&self, span: Span) -> std::ops::Range<usize> {
        self.offset(span.lo)..self.offset(span.hi)
    }

    /// 1-based line and column of a byte offset.
    pub fn location(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.source.len());
        let prefix = &self.source[..offset];
        let line = prefix.matches('\n').count() + 1;
        let column_start = prefix.rfind('\n').map_or(0, |i| i + 1);
        (line, offset - column_start + 1)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParserBuilder {
    jsx: bool,
    typescript: bool,
}

impl ParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jsx(mut self, enabled: bool) -> Self {
        self.jsx = enabled;
        self
    }

    pub fn typescript(mut self, enabled: bool) -> Self {
        self.typescript = enabled;
        self
    }

    /// Decorators are always enabled.
    pub fn build(self) -> Parser {
        let syntax = if self.typescript {
            Syntax::Typescript(TsSyntax {
                tsx: self.jsx,
                decorators: true,
                ..Default::default()
            })
        } else {
            Syntax::Es(EsSyntax {
                jsx: self.jsx,
                decorators: true,
                ..Default::default()
            })
        };

        Parser { syntax }
    }
}

#[derive(Debug, Clone)]
pub struct Parser {
    syntax: Syntax,
}

impl Parser {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn for_file(filename: &str) -> Self {
        match detect_language(filename) {
            Language::JavaScript => Self::new(),
            Language::TypeScript => Self::builder().typescript(true).build(),
            Language::Jsx => Self::builder().jsx(true).build(),
            Language::Tsx => Self::builder().typescript(true).jsx(true).build(),
        }
    }

    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    /// Parses `code` as a script or a module, whichever it turns out to be,
    /// collecting recoverable errors instead of stopping at the first one.
    pub fn parse_recovering(&self, code: &str) -> ParseResult {
        let source_map: Lrc<SourceMap> = Default::default();
        let fm = source_map
            .new_source_file(FileName::Custom("input.js".into()).into(), code.to_string());

        let mut recovered_errors = Vec::new();

        let result = parse_file_as_program(
            &fm,
            self.syntax,
            EsVersion::latest(),
            None,
            &mut recovered_errors,
        );

        let to_parse_error = |e: swc_ecma_parser::error::Error| {
            let loc = source_map.lookup_char_pos(e.span().lo);
            ParseError {
                line: loc.line,
                column: loc.col_display,
                message: e.kind().msg().to_string(),
            }
        };

        let mut errors: Vec<ParseError> = recovered_errors.into_iter().map(to_parse_error).collect();

        let program = match result {
            Ok(program) => Some(program),
            Err(e) => {
                errors.push(to_parse_error(e));
                None
            }
        };

        ParseResult {
            program,
            errors,
            start_pos: fm.start_pos,
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
