//! End-to-end scenarios exercised through the public `AstBuilder` entry
//! point rather than through any single module's unit tests.

use coltc_lex::Lexer;
use coltc_par::{AstBuilder, ModuleTable, ProdExprKind, StmtExprKind, TypeBuffer, TypeVariant};
use coltc_util::diagnostic::{Diagnostic, Level, Reporter};
use coltc_util::span::FileId;
use coltc_util::StringTable;

#[derive(Default)]
struct Recorder {
    messages: Vec<(Level, String)>,
}

impl Reporter for Recorder {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.messages.push((diagnostic.level, diagnostic.message));
    }

    fn count_for(&self, level: Level) -> u64 {
        self.messages.iter().filter(|(l, _)| *l == level).count() as u64
    }
}

fn build(source: &str) -> (Vec<coltc_par::StmtExprToken>, coltc_par::ExprArena, TypeBuffer, Recorder) {
    let mut strings = StringTable::new();
    let mut recorder = Recorder::default();
    let tokens = Lexer::new(source, &mut strings, &mut recorder, FileId::new(0)).lex();
    let mut types = TypeBuffer::new();
    let root_name = strings.intern("root");
    let mut modules = ModuleTable::new(root_name);
    let mut builder = AstBuilder::new(&tokens, &mut strings, &mut types, &mut modules, &mut recorder);
    let stmts = builder.parse_program();
    (stmts, builder.into_arena(), types, recorder)
}

/// `let x: i32 = 2 + 3 * 4;` folds to a single literal `14` (scenario 1).
#[test]
fn scenario_one_folds_arithmetic_into_a_single_literal() {
    let (stmts, arena, _types, recorder) = build("let x: i32 = 2 + 3 * 4;");
    assert_eq!(recorder.error_count(), 0);
    let StmtExprKind::VarDecl { init, .. } = arena.stmt(stmts[0]).kind else {
        panic!("expected a variable declaration");
    };
    assert!(matches!(arena.prod(init.unwrap()).kind, ProdExprKind::IntLiteral(14)));
}

/// `let y: i32 = 5 / 0;` is always an error, never a warning (scenario 2).
#[test]
fn scenario_two_division_by_literal_zero_is_always_an_error() {
    let (_stmts, _arena, _types, recorder) = build("let y: i32 = 5 / 0;");
    assert!(recorder.messages.iter().any(|(level, msg)| {
        *level == Level::Error && msg == "Integral division by zero is not allowed!"
    }));
}

/// `if (1 < 2 < 3) { }`: a same-family comparison chain desugars into a
/// conjunction with no diagnostics (scenario 3).
#[test]
fn scenario_three_same_family_chain_desugars_cleanly() {
    let (stmts, arena, _types, recorder) = build("if (1 < 2 < 3) { }");
    assert_eq!(recorder.error_count(), 0);
    let StmtExprKind::Condition { cond, .. } = arena.stmt(stmts[0]).kind else {
        panic!("expected a condition");
    };
    assert!(matches!(arena.prod(cond).kind, ProdExprKind::Binary { op: coltc_par::BinaryOp::And, .. }));
}

/// `if (1 < 2 == 3) { }`: crossing comparison families is a diagnosed
/// error, but the body still parses (scenario 4).
#[test]
fn scenario_four_mismatched_chain_reports_but_recovers() {
    let (stmts, _arena, _types, recorder) = build("if (1 < 2 == 3) { }");
    assert_eq!(stmts.len(), 1);
    assert!(recorder.error_count() >= 1);
}

/// A nested block comment does not disturb the statement that follows it
/// (scenario 5).
#[test]
fn scenario_five_nested_block_comment_is_transparent() {
    let (stmts, arena, _types, recorder) = build("/* a /* b */ c */ let z: i32 = 1;");
    assert_eq!(recorder.error_count(), 0);
    assert_eq!(stmts.len(), 1);
    assert!(matches!(arena.stmt(stmts[0]).kind, StmtExprKind::VarDecl { .. }));
}

/// `let p: ptr.i32 = &q; *p;`: a pointee-typed pointer can be taken and
/// dereferenced as a standalone statement (scenario 6).
#[test]
fn scenario_six_pointer_declaration_and_deref_statement() {
    let (stmts, arena, types, recorder) = build("let q: i32 = 1; let p: ptr.i32 = &q; *p;");
    assert_eq!(recorder.error_count(), 0);
    assert_eq!(stmts.len(), 3);

    let StmtExprKind::VarDecl { init: p_init, .. } = arena.stmt(stmts[1]).kind else {
        panic!("expected a variable declaration for p");
    };
    match types.get(arena.prod(p_init.unwrap()).ty) {
        TypeVariant::Pointer { mutable, .. } => {
            assert!(!mutable, "address-of without 'mut' must produce an immutable pointer");
        }
        other => panic!("expected a pointer type, got {other:?}"),
    }

    let StmtExprKind::ExprStmt { value } = arena.stmt(stmts[2]).kind else {
        panic!("expected a bare expression statement for '*p;'");
    };
    assert!(matches!(arena.prod(value).kind, ProdExprKind::PointerLoad { .. }));
}

/// An opaque pointer (`ptr` with no pointee) cannot be dereferenced.
#[test]
fn opaque_pointer_deref_is_a_diagnosed_error() {
    let (_stmts, _arena, _types, recorder) = build("let q: i32 = 1; let p: ptr = &q; *p;");
    assert!(recorder.messages.iter().any(|(level, msg)| {
        *level == Level::Error && msg == "Unary '*' can only be applied on a non-opaque pointer!"
    }));
}
