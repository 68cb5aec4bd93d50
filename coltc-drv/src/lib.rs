//! Compiler driver: wires the lexer's `TokenBuffer` into `AstBuilder`
//! and reports the result. Everything past AST-building (semantic
//! analysis, codegen, linking, a VM backend) is out of scope here.

mod pretty;

use std::path::PathBuf;

use anyhow::{Context, Result};
use parking_lot::Mutex;

use coltc_lex::Lexer;
use coltc_par::{AstBuilder, ModuleTable, TypeBuffer, WarnFor};
use coltc_util::diagnostic::{ColorConfig, Console};
use coltc_util::span::{FileId, SourceMap};
use coltc_util::{Reporter, StringTable};

pub use pretty::render_program;

/// What a run should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitType {
    /// The columnar token stream, one line per token.
    Tokens,
    /// The built statement list, pretty-printed.
    #[default]
    Ast,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub input_files: Vec<PathBuf>,
    pub emit: EmitType,
    pub verbose: bool,
    pub warnings_as_errors: bool,
    pub warn_for: WarnFor,
    pub color: ColorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_files: Vec::new(),
            emit: EmitType::default(),
            verbose: false,
            warnings_as_errors: false,
            warn_for: WarnFor::default(),
            color: ColorConfig::Auto,
        }
    }
}

/// Tables shared across every file in one invocation, guarded the way
/// the front end's concurrency model expects even though this driver
/// itself builds each file's AST sequentially (§5).
pub struct Session {
    pub config: Config,
    pub sources: SourceMap,
    pub strings: Mutex<StringTable>,
    pub types: Mutex<TypeBuffer>,
    pub modules: Mutex<ModuleTable>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        let mut strings = StringTable::new();
        let root_name = strings.intern("root");
        Session {
            config,
            sources: SourceMap::new(),
            strings: Mutex::new(strings),
            types: Mutex::new(TypeBuffer::new()),
            modules: Mutex::new(ModuleTable::new(root_name)),
        }
    }

    /// Reads every configured input file into the shared source map.
    pub fn read_sources(&mut self) -> Result<()> {
        let paths = self.config.input_files.clone();
        for path in &paths {
            if self.config.verbose {
                eprintln!("reading: {}", path.display());
            }
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            self.sources.add_file(path.display().to_string(), content);
        }
        Ok(())
    }

    /// Lexes and builds every source file's AST, printing diagnostics to
    /// stderr and the emitted product to stdout. Returns the number of
    /// files that produced at least one error (or, with
    /// `warnings_as_errors`, at least one warning).
    pub fn compile(&mut self) -> Result<usize> {
        let mut failures = 0;
        for file_index in 0..self.sources.file_count() {
            let file_id = FileId::new(file_index);
            let Some(source_file) = self.sources.get(file_id) else { continue };

            if self.config.verbose {
                eprintln!("compiling: {}", source_file.name());
            }

            let mut console = Console::new(&self.sources, self.config.color, false);
            let mut strings = self.strings.lock();
            let tokens = Lexer::new(source_file.content(), &mut *strings, &mut console, file_id).lex();

            if self.config.emit == EmitType::Tokens {
                print_tokens(&tokens, source_file.name());
            } else {
                let mut types = self.types.lock();
                let mut modules = self.modules.lock();
                let mut builder = AstBuilder::new(&tokens, &mut *strings, &mut *types, &mut *modules, &mut console)
                    .with_warn_for(self.config.warn_for)
                    .with_file_id(file_id);
                let program = builder.parse_program();
                let arena = builder.into_arena();
                println!("{}", render_program(&program, &arena));
            }

            let has_errors = console.error_count() > 0
                || (self.config.warnings_as_errors && console.warning_count() > 0);
            eprint!("{}", console.rendered());
            if has_errors {
                failures += 1;
            }
        }
        Ok(failures)
    }
}

fn print_tokens(tokens: &coltc_lex::TokenBuffer, file_name: &str) {
    println!("-- tokens: {file_name} --");
    for idx in 0..tokens.len() {
        let idx = coltc_lex::token_buffer::TokenIdx(idx as u32);
        println!("{:>4} {:>3}:{:<3} {:?}", idx.0, tokens.line(idx), tokens.column(idx), tokens.kind(idx));
    }
}
