//! A human-readable dump of a built statement list, used by `--emit-ast`.
//!
//! The front end's own types already derive `Debug`; this module just
//! walks the arena so that `Scope`/`Condition` nesting reads as an
//! indented tree instead of Rust's flat derive output.

use std::fmt::Write as _;

use coltc_par::{ExprArena, ProdExprToken, StmtExprKind, StmtExprToken};

pub fn render_program(program: &[StmtExprToken], arena: &ExprArena) -> String {
    let mut out = String::new();
    for stmt in program {
        render_stmt(&mut out, arena, *stmt, 0);
    }
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn render_stmt(out: &mut String, arena: &ExprArena, token: StmtExprToken, depth: usize) {
    let stmt = arena.stmt(token);
    indent(out, depth);
    match &stmt.kind {
        StmtExprKind::Error => {
            let _ = writeln!(out, "<error>");
        }
        StmtExprKind::ExprStmt { value } => {
            let _ = writeln!(out, "expr {}", render_prod(arena, *value));
        }
        StmtExprKind::VarDecl { name, local, init } => {
            let _ = writeln!(
                out,
                "let {:?} (local {:?}) = {}",
                name,
                local,
                init.map(|v| render_prod(arena, v)).unwrap_or_else(|| "<uninit>".to_string())
            );
        }
        StmtExprKind::GlobalDecl { name, global, init } => {
            let _ = writeln!(out, "let {:?} (global {:?}) = {}", name, global, render_prod(arena, *init));
        }
        StmtExprKind::Scope { children, .. } => {
            let _ = writeln!(out, "{{");
            for child in children {
                render_stmt(out, arena, *child, depth + 1);
            }
            indent(out, depth);
            let _ = writeln!(out, "}}");
        }
        StmtExprKind::Condition { cond, then_branch, else_branch } => {
            let _ = writeln!(out, "if {}", render_prod(arena, *cond));
            render_stmt(out, arena, *then_branch, depth + 1);
            if let Some(else_branch) = else_branch {
                indent(out, depth);
                let _ = writeln!(out, "else");
                render_stmt(out, arena, *else_branch, depth + 1);
            }
        }
        StmtExprKind::VisibilitySection { public } => {
            let _ = writeln!(out, "{}:", if *public { "public" } else { "private" });
        }
    }
}

fn render_prod(arena: &ExprArena, token: ProdExprToken) -> String {
    format!("{:?}", arena.prod(token).kind)
}
