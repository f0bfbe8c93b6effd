//! Structural checks behind `--strict`.
//!
//! The emitter never looks at these; a grammar that fails them still renders,
//! it just renders a module that will not compile. Every problem is collected,
//! in declaration order, so one run reports all of them.
use std::fmt;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::emit::{union_name, RESERVED};
use crate::error::{Error, Result};
use crate::grammar::{FieldType, Grammar};

static IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());
static OPTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Option\s*<\s*(.*?)\s*>$").unwrap());

/// Keywords that cannot be written as raw identifiers either.
const PATH_KEYWORDS: &[&str] = &["self", "Self", "super", "crate", "_"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    NoFamilies,
    BadFamilyName { family: String },
    ReservedFamilyName { family: String, union: String },
    DuplicateFamily { union: String, first: usize, again: usize },
    BadVariantName { family: String, variant: String },
    ReservedVariantName { family: String, variant: String },
    DuplicateVariant { family: String, variant: String },
    EmptyField { family: String, variant: String, position: usize },
    RecursiveByValue { family: String, variant: String, position: usize, ty: String },
    UnknownRoot { family: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NoFamilies => write!(f, "grammar declares no node families"),
            Diagnostic::BadFamilyName { family } => {
                write!(f, "family `{family}` is not a valid identifier")
            }
            Diagnostic::ReservedFamilyName { family, union } => {
                write!(f, "family `{family}` renders as `enum {union}` or a visit parameter that is a reserved word")
            }
            Diagnostic::DuplicateFamily { union, first, again } => write!(
                f,
                "families #{first} and #{again} both produce `enum {union}`"
            ),
            Diagnostic::BadVariantName { family, variant } => {
                write!(f, "{family}: variant `{variant}` is not a valid identifier")
            }
            Diagnostic::ReservedVariantName { family, variant } => {
                write!(f, "{family}: variant `{variant}` is a reserved word")
            }
            Diagnostic::DuplicateVariant { family, variant } => {
                write!(f, "{family}: variant `{variant}` is declared more than once")
            }
            Diagnostic::EmptyField { family, variant, position } => {
                write!(f, "{family}::{variant}: field {position} has an empty type")
            }
            Diagnostic::RecursiveByValue { family, variant, position, ty } => write!(
                f,
                "{family}::{variant}: field {position} (`{ty}`) embeds its own union by value; wrap it in Box<..>"
            ),
            Diagnostic::UnknownRoot { family } => {
                write!(f, "root family `{family}` is not declared")
            }
        }
    }
}

fn is_reserved(name: &str) -> bool {
    RESERVED.contains(&name) || PATH_KEYWORDS.contains(&name)
}

/// A family names both `enum {union}` and the `{lower}: &Box<..>` visit
/// parameter. Plain keywords are fine in the parameter (`r#type`); `self` and
/// friends are not.
fn family_is_reserved(family: &str, union: &str) -> bool {
    is_reserved(union) || PATH_KEYWORDS.contains(&family.to_lowercase().as_str())
}

/// Strip any number of `Option<..>` layers. `Option<Option<Expr>>` → `Expr`.
fn strip_options(ty: &str) -> &str {
    let mut ty = ty.trim();
    while let Some(caps) = OPTION.captures(ty) {
        match caps.get(1) {
            Some(inner) => ty = inner.as_str(),
            None => break,
        }
    }
    ty
}

/// True when the field stores `union` inline, which makes the type infinitely sized.
fn embeds_by_value(field: &FieldType, union: &str) -> bool {
    strip_options(field.as_str()) == union
}

pub fn check(grammar: &Grammar) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    if grammar.families.is_empty() {
        out.push(Diagnostic::NoFamilies);
    }

    let mut unions = IndexMap::<String, usize>::new();
    for (index, family) in grammar.families().enumerate() {
        let union = union_name(&family.name);
        if !IDENT.is_match(&family.name) {
            out.push(Diagnostic::BadFamilyName { family: family.name.clone() });
        } else if family_is_reserved(&family.name, &union) {
            out.push(Diagnostic::ReservedFamilyName {
                family: family.name.clone(),
                union: union.clone(),
            });
        }
        match unions.get(&union) {
            Some(&first) => out.push(Diagnostic::DuplicateFamily {
                union: union.clone(),
                first,
                again: index,
            }),
            None => {
                unions.insert(union.clone(), index);
            }
        }

        let mut seen = IndexMap::<&str, usize>::new();
        for variant in &family.variants {
            if !IDENT.is_match(&variant.name) {
                out.push(Diagnostic::BadVariantName {
                    family: family.name.clone(),
                    variant: variant.name.clone(),
                });
            } else if is_reserved(&variant.name) {
                out.push(Diagnostic::ReservedVariantName {
                    family: family.name.clone(),
                    variant: variant.name.clone(),
                });
            }
            let count = seen.entry(variant.name.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                out.push(Diagnostic::DuplicateVariant {
                    family: family.name.clone(),
                    variant: variant.name.clone(),
                });
            }
            for (position, field) in variant.fields.iter().enumerate() {
                if field.as_str().trim().is_empty() {
                    out.push(Diagnostic::EmptyField {
                        family: family.name.clone(),
                        variant: variant.name.clone(),
                        position,
                    });
                } else if embeds_by_value(field, &union) {
                    out.push(Diagnostic::RecursiveByValue {
                        family: family.name.clone(),
                        variant: variant.name.clone(),
                        position,
                        ty: field.as_str().to_string(),
                    });
                }
            }
        }
    }

    if !unions.contains_key(&union_name(&grammar.root.family)) {
        out.push(Diagnostic::UnknownRoot { family: grammar.root.family.clone() });
    }
    out
}

/// `check`, turned into an error when anything was found.
pub fn ensure_well_formed(grammar: &Grammar) -> Result<()> {
    let diagnostics = check(grammar);
    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(Error::Invalid(diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{NodeFamily, RootShape, RootSpec};

    fn single(families: Vec<NodeFamily>) -> Grammar {
        Grammar::new("ast", RootSpec { family: "expr".into(), shape: RootShape::Single }, families)
    }

    #[test]
    fn presets_are_clean() {
        assert!(check(&Grammar::expr_preset()).is_empty());
        assert!(check(&Grammar::program_preset()).is_empty());
        assert!(ensure_well_formed(&Grammar::program_preset()).is_ok());
    }

    #[test]
    fn empty_grammar_reports_missing_families_and_root() {
        let diagnostics = check(&single(vec![]));
        assert_eq!(
            diagnostics,
            vec![Diagnostic::NoFamilies, Diagnostic::UnknownRoot { family: "expr".into() }]
        );
    }

    #[test]
    fn duplicate_variant_reported_once() {
        let grammar = single(vec![
            NodeFamily::new("expr")
                .variant("Literal", ["Literal"])
                .variant("Literal", ["Token"])
                .variant("Literal", ["Token"]),
        ]);
        assert_eq!(
            check(&grammar),
            vec![Diagnostic::DuplicateVariant { family: "expr".into(), variant: "Literal".into() }]
        );
    }

    #[test]
    fn families_colliding_after_capitalization() {
        let grammar = single(vec![NodeFamily::new("expr"), NodeFamily::new("Expr")]);
        assert_eq!(
            check(&grammar),
            vec![Diagnostic::DuplicateFamily { union: "Expr".into(), first: 0, again: 1 }]
        );
    }

    #[test]
    fn recursion_without_indirection() {
        let grammar = single(vec![
            NodeFamily::new("expr")
                .variant("Grouping", ["Expr"])
                .variant("Maybe", ["Option<Expr>"])
                .variant("Boxed", ["Option<Box<Expr>>"])
                .variant("Many", ["Vec<Expr>"]),
        ]);
        let diagnostics = check(&grammar);
        assert_eq!(diagnostics.len(), 2);
        assert!(matches!(&diagnostics[0], Diagnostic::RecursiveByValue { variant, position: 0, .. } if variant == "Grouping"));
        assert!(matches!(&diagnostics[1], Diagnostic::RecursiveByValue { variant, .. } if variant == "Maybe"));
    }

    #[test]
    fn identifiers_and_empty_fields() {
        let grammar = single(vec![
            NodeFamily::new("expr")
                .variant("Bin op", ["Token"])
                .variant("Call", ["Box<Expr>", "  "]),
            NodeFamily::new("2stmt"),
        ]);
        let diagnostics = check(&grammar);
        assert_eq!(diagnostics.len(), 3);
        assert!(matches!(&diagnostics[0], Diagnostic::BadVariantName { variant, .. } if variant == "Bin op"));
        assert!(matches!(&diagnostics[1], Diagnostic::EmptyField { position: 1, .. }));
        assert!(matches!(&diagnostics[2], Diagnostic::BadFamilyName { family } if family == "2stmt"));
    }

    #[test]
    fn reserved_variant_names() {
        let grammar = single(vec![
            NodeFamily::new("expr")
                .variant("type", ["Token"])
                .variant("Self", Vec::<&str>::new())
                .variant("_", Vec::<&str>::new())
                .variant("Type", ["Token"]),
        ]);
        let reserved = check(&grammar)
            .into_iter()
            .map(|d| match d {
                Diagnostic::ReservedVariantName { variant, .. } => variant,
                other => panic!("unexpected diagnostic: {other:?}"),
            })
            .collect::<Vec<_>>();
        assert_eq!(reserved, ["type", "Self", "_"]);
    }

    #[test]
    fn reserved_family_names() {
        let grammar = Grammar::new(
            "ast",
            RootSpec { family: "type".into(), shape: RootShape::Single },
            vec![NodeFamily::new("self"), NodeFamily::new("Super"), NodeFamily::new("type")],
        );
        assert_eq!(
            check(&grammar),
            vec![
                Diagnostic::ReservedFamilyName { family: "self".into(), union: "Self".into() },
                Diagnostic::ReservedFamilyName { family: "Super".into(), union: "Super".into() },
            ]
        );
    }

    #[test]
    fn root_matches_by_union_name() {
        let grammar = Grammar::new(
            "ast",
            RootSpec { family: "Stmt".into(), shape: RootShape::Sequence },
            vec![NodeFamily::new("stmt").variant("Print", ["Token"])],
        );
        assert!(check(&grammar).is_empty());

        let grammar = Grammar::new(
            "ast",
            RootSpec { family: "decl".into(), shape: RootShape::Sequence },
            vec![NodeFamily::new("stmt")],
        );
        assert_eq!(check(&grammar), vec![Diagnostic::UnknownRoot { family: "decl".into() }]);
    }

    #[test]
    fn option_layers_are_stripped() {
        assert_eq!(strip_options("Option<Option< Expr >>"), "Expr");
        assert_eq!(strip_options("Box<Expr>"), "Box<Expr>");
    }

    #[test]
    fn rejection_carries_every_diagnostic() {
        let err = ensure_well_formed(&single(vec![])).unwrap_err();
        match err {
            Error::Invalid(diagnostics) => assert_eq!(diagnostics.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn diagnostics_render_readably() {
        let d = Diagnostic::RecursiveByValue {
            family: "expr".into(),
            variant: "Grouping".into(),
            position: 0,
            ty: "Expr".into(),
        };
        assert_eq!(
            d.to_string(),
            "expr::Grouping: field 0 (`Expr`) embeds its own union by value; wrap it in Box<..>"
        );
    }
}
