//! `${...}` template substitution
//!
//! The scanner looks for the literal marker `${`, then for the next `}`. A
//! `|` before that `}` splits variable name from a literal default; the
//! default is emitted verbatim and never re-substituted. An unterminated
//! `${` is reproduced as-is, with scanning resuming immediately after the
//! two characters rather than at the next marker.

use crate::context::ExecutionContext;
use crate::variable::Variable;

pub fn substitute(ctx: &ExecutionContext, template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find("${") {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 2..];
        match after.find('}') {
            None => {
                // No closing brace anywhere: emit the marker literally
                out.push_str("${");
                rest = after;
            }
            Some(close) => {
                let inner = &after[..close];
                let (name, default) = match inner.find('|') {
                    Some(bar) => (&inner[..bar], Some(&inner[bar + 1..])),
                    None => (inner, None),
                };
                let value = ctx.get_variable(name);
                match (&value, default) {
                    (Variable::Null, Some(default)) => out.push_str(default),
                    _ => out.push_str(&value.render()),
                }
                rest = &after[close + 1..];
            }
        }
    }

    out.push_str(rest);
    out
}
