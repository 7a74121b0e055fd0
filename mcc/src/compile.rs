use crate::codegen::CodeGen;
use crate::error::{print_diag, Error, Phase};
use crate::grammer::ast::Program;
use crate::grammer::lexer::Lexer;
use crate::grammer::parsercore::Parser;
use crate::grammer::token::{Pos, Token};
use crate::semantic::Analyzer;
use crate::symbols::SymbolExport;
use serde::Serialize;

/// Token as reported in a compile result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenView {
    pub kind: String,
    pub value: String,
    pub line: usize,
    pub column: usize,
}

impl From<&Token> for TokenView {
    fn from(token: &Token) -> Self {
        TokenView {
            kind: token.kind.to_string(),
            value: token.kind.text().to_string(),
            line: token.pos.line,
            column: token.pos.col,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub tokens: usize,
    pub functions: usize,
    pub variables: usize,
    pub code_lines: usize,
    pub warnings: usize,
}

/// Everything one compile produced, including partial artifacts on failure
#[derive(Debug, Clone, Default, Serialize)]
pub struct Compilation {
    pub success: bool,
    pub asm: Option<String>,
    pub tokens: Vec<TokenView>,
    pub ast: Option<Program>,
    pub symbols: Option<SymbolExport>,
    pub warnings: Vec<String>,
    pub stats: Option<Stats>,
    pub error: Option<String>,
    pub phase: Option<Phase>,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl Compilation {
    fn fail(mut self, error: Error) -> Self {
        log::error!("{} failed: {}", error.phase(), error);
        self.success = false;
        self.phase = Some(error.phase());
        self.line = error.pos().map(|pos| pos.line);
        self.column = error.pos().map(|pos| pos.col);
        self.error = Some(error.to_string());
        self
    }

    /// Print the failure, if any, against `source`
    pub fn print_diag(&self, file: &str, source: &str) {
        let Some(error) = &self.error else { return };
        let phase = self.phase.unwrap_or(Phase::Unknown);
        let pos = self.line.zip(self.column).map(|(line, col)| Pos { line, col });
        print_diag(&format!("[{}]: {}", phase, error), pos, file, source);
    }
}

/// Run every phase on `source`, stopping at the first fatal error
pub fn compile(source: &str) -> Compilation {
    let mut result = Compilation::default();

    // 1. Lexical analysis
    log::info!("Phase 1: Lexical Analysis");
    let tokens = match Lexer::new(source).tokenize() {
        Ok(tokens) => tokens,
        Err(e) => return result.fail(e),
    };
    result.tokens = tokens.iter().map(TokenView::from).collect();
    log::info!("  {} tokens", tokens.len());

    // 2. Syntax analysis
    log::info!("Phase 2: Syntax Analysis");
    let program = match Parser::new(tokens.into_iter()).parse() {
        Ok(program) => program,
        Err(e) => return result.fail(e),
    };
    log::info!(
        "  {} functions, {} declarations, {} statements",
        program.functions.len(),
        program.declarations.len(),
        program.statements.len()
    );
    result.ast = Some(program.clone());

    // 3. Semantic analysis
    log::info!("Phase 3: Semantic Analysis");
    let mut analyzer = Analyzer::new();
    if let Err(e) = analyzer.analyze(&program) {
        result.symbols = Some(analyzer.table().export());
        result.warnings = analyzer.warnings().to_vec();
        return result.fail(e);
    }
    let (table, warnings) = analyzer.finish();
    result.symbols = Some(table.export());
    result.warnings = warnings;
    log::info!(
        "  {} variables, {} functions, {} warnings",
        table.variables.len(),
        table.functions.len(),
        result.warnings.len()
    );

    // 4. Code generation
    log::info!("Phase 4: Code Generation");
    let generated = CodeGen::generate(&program, &table);
    log::debug!("  {:?}", generated.stats);
    result.warnings.extend(generated.warnings);

    result.stats = Some(Stats {
        tokens: result.tokens.len(),
        functions: table.functions.len(),
        variables: table.variables.len(),
        code_lines: generated.asm.lines().count(),
        warnings: result.warnings.len(),
    });
    result.asm = Some(generated.asm);
    result.success = true;
    result
}
