//! Semantic types produced from surface `TypeName`s. Stella has no aliases
//! or type variables, so the conversion from syntax is a straightforward
//! structural fold that can never fail, unlike languages whose type names
//! must resolve user-defined identifiers against a context.

use std::fmt::Debug;

use crate::parser::ast::TypeName;

#[derive(Clone, PartialEq, Eq)]
pub enum Type {
    Bool,
    Nat,
    Unit,
    Fun { params: Vec<Type>, result: Box<Type> },
    List(Box<Type>),
    Tuple(Vec<Type>),
    Record(Vec<(String, Type)>),
    Sum { left: Box<Type>, right: Box<Type> },
    Variant(Vec<(String, Type)>),
}

impl From<&TypeName> for Type {
    fn from(value: &TypeName) -> Self {
        match value {
            TypeName::Bool(_) => Type::Bool,
            TypeName::Nat(_) => Type::Nat,
            TypeName::Unit(_) => Type::Unit,
            TypeName::Fun { params, result, .. } => Type::Fun {
                params: params.iter().map(Type::from).collect(),
                result: Box::new(Type::from(result.as_ref())),
            },
            TypeName::List(inner, _) => Type::List(Box::new(Type::from(inner.as_ref()))),
            TypeName::Tuple(items, _) => Type::Tuple(items.iter().map(Type::from).collect()),
            TypeName::Record(fields, _) => Type::Record(
                fields
                    .iter()
                    .map(|(name, ty)| (name.clone(), Type::from(ty)))
                    .collect(),
            ),
            TypeName::Sum(left, right, _) => Type::Sum {
                left: Box::new(Type::from(left.as_ref())),
                right: Box::new(Type::from(right.as_ref())),
            },
            TypeName::Variant(cases, _) => Type::Variant(
                cases
                    .iter()
                    .map(|(label, ty)| {
                        (
                            label.clone(),
                            ty.as_ref().map(Type::from).unwrap_or(Type::Unit),
                        )
                    })
                    .collect(),
            ),
        }
    }
}

impl Type {
    pub fn variant_case(&self, label: &str) -> Option<&Type> {
        match self {
            Type::Variant(cases) => cases.iter().find(|(name, _)| name == label).map(|(_, t)| t),
            _ => None,
        }
    }
}

impl Debug for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Bool => write!(f, "Bool"),
            Type::Nat => write!(f, "Nat"),
            Type::Unit => write!(f, "Unit"),
            Type::Fun { params, result } => {
                write!(f, "fn(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p:?}")?;
                }
                write!(f, ") -> {result:?}")
            }
            Type::List(inner) => write!(f, "[{inner:?}]"),
            Type::Tuple(items) => {
                write!(f, "{{")?;
                for (i, t) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{t:?}")?;
                }
                write!(f, "}}")
            }
            Type::Record(fields) => {
                write!(f, "{{")?;
                for (i, (name, t)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name} : {t:?}")?;
                }
                write!(f, "}}")
            }
            Type::Sum { left, right } => write!(f, "{left:?} + {right:?}"),
            Type::Variant(cases) => {
                write!(f, "<|")?;
                for (i, (label, t)) in cases.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{label} : {t:?}")?;
                }
                write!(f, "|>")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Span;

    fn span() -> Span {
        Span::default()
    }

    #[test]
    fn converts_nested_type_names() {
        let name = TypeName::Fun {
            params: vec![TypeName::Nat(span())],
            result: Box::new(TypeName::List(Box::new(TypeName::Bool(span())), span())),
            span: span(),
        };
        let ty = Type::from(&name);
        assert_eq!(
            ty,
            Type::Fun {
                params: vec![Type::Nat],
                result: Box::new(Type::List(Box::new(Type::Bool))),
            }
        );
    }

    #[test]
    fn variant_case_without_payload_is_unit() {
        let name = TypeName::Variant(vec![("none".to_string(), None)], span());
        let ty = Type::from(&name);
        assert_eq!(ty.variant_case("none"), Some(&Type::Unit));
    }
}
