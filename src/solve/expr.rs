// License: MIT
// Copyright © 2026 multistate-net contributors

//! The structure-function expression tree.
//!
//! A structure function maps the chosen state of every element to the
//! performance delivered to one user.  It is built once per user during the
//! reduction loop and discarded after evaluation; only the resulting UGF is
//! persisted.

/// An expression over element-state leaves.
///
/// `Val { leaf }` reads the value of element `leaf` at its currently chosen
/// state index.  Series composition is `Min` (weakest link), parallel
/// composition is `Sum` (capacities add); `Sub` and `Max` only appear inside
/// bridge terms, where the sign of a branch imbalance decides whether the
/// diagonal element carries flow.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Expr {
    Val { leaf: usize },
    Number { value: f64 },
    Sum { params: Vec<Expr> },
    Sub { params: Vec<Expr> },
    Min { params: Vec<Expr> },
    Max { params: Vec<Expr> },
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            // (a + b) + (c + d) = a + b + c + d
            (Self::Sum { params: mut lhs }, Self::Sum { params: mut rhs }) => {
                lhs.append(&mut rhs);
                Self::Sum { params: lhs }
            }
            // (a + b) + c = a + b + c
            (Self::Sum { mut params }, rhs) => {
                params.push(rhs);
                Self::Sum { params }
            }
            // a + (b + c) = a + b + c
            (lhs, Self::Sum { mut params }) => {
                params.insert(0, lhs);
                Self::Sum { params }
            }
            // Catch all other cases
            (lhs, rhs) => Self::Sum {
                params: vec![lhs, rhs],
            },
        }
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    // The first parameter minus the sum of the rest.
    fn sub(self, rhs: Self) -> Self {
        match self {
            Self::Sub { mut params } => {
                params.push(rhs);
                Self::Sub { params }
            }
            lhs => Self::Sub {
                params: vec![lhs, rhs],
            },
        }
    }
}

/// Constructors for [`Expr`].
impl Expr {
    pub(crate) fn val(leaf: usize) -> Self {
        Self::Val { leaf }
    }

    pub(crate) fn number(value: f64) -> Self {
        Self::Number { value }
    }

    pub(crate) fn sum(params: Vec<Expr>) -> Self {
        let mut flat = Vec::with_capacity(params.len());
        for param in params {
            match param {
                Self::Sum { params } => flat.extend(params),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            flat.swap_remove(0)
        } else {
            Self::Sum { params: flat }
        }
    }

    /// A `Min` over the given parameters, flattening nested `Min`s; a single
    /// parameter is returned unwrapped.
    pub(crate) fn min(params: Vec<Expr>) -> Self {
        let mut flat = Vec::with_capacity(params.len());
        for param in params {
            match param {
                Self::Min { params } => flat.extend(params),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            flat.swap_remove(0)
        } else {
            Self::Min { params: flat }
        }
    }

    pub(crate) fn max(params: Vec<Expr>) -> Self {
        Self::Max { params }
    }

    /// `max(0, param)`: the indicator-style clamp used by bridge terms.
    pub(crate) fn clamp_non_negative(param: Expr) -> Self {
        Self::max(vec![Self::number(0.0), param])
    }
}

/// Evaluation.
impl Expr {
    /// Evaluates the expression against the current per-leaf values.
    pub(crate) fn eval(&self, leaf_values: &[f64]) -> f64 {
        match self {
            Self::Val { leaf } => leaf_values[*leaf],
            Self::Number { value } => *value,
            Self::Sum { params } => params.iter().map(|p| p.eval(leaf_values)).sum(),
            Self::Sub { params } => {
                let mut iter = params.iter().map(|p| p.eval(leaf_values));
                let first = iter.next().unwrap_or(0.0);
                first - iter.sum::<f64>()
            }
            Self::Min { params } => params
                .iter()
                .map(|p| p.eval(leaf_values))
                .fold(f64::INFINITY, f64::min),
            Self::Max { params } => params
                .iter()
                .map(|p| p.eval(leaf_values))
                .fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// Display helpers.
impl Expr {
    fn join_params(
        f: &mut std::fmt::Formatter<'_>,
        params: &[Expr],
        separator: &str,
        prefix: Option<&str>,
    ) -> std::fmt::Result {
        if let Some(prefix) = prefix {
            write!(f, "{prefix}(")?;
        }
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                write!(f, "{separator}")?;
            }
            let bracket =
                prefix.is_none() && matches!(param, Self::Sum { .. } | Self::Sub { .. });
            if bracket {
                write!(f, "({param})")?;
            } else {
                write!(f, "{param}")?;
            }
        }
        if prefix.is_some() {
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Val { leaf } => write!(f, "x{leaf}"),
            Self::Number { value } => {
                if value.fract() == 0.0 {
                    write!(f, "{value:.1}")
                } else {
                    write!(f, "{value}")
                }
            }
            Self::Sum { params } => Self::join_params(f, params, " + ", None),
            Self::Sub { params } => Self::join_params(f, params, " - ", None),
            Self::Min { params } => Self::join_params(f, params, ", ", Some("MIN")),
            Self::Max { params } => Self::join_params(f, params, ", ", Some("MAX")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Expr;
    use crate::test_utils::assert_close;

    #[test]
    fn test_add_flattens() {
        let expr = Expr::val(0) + Expr::val(1) + Expr::val(2);
        assert_eq!(
            expr,
            Expr::Sum {
                params: vec![Expr::val(0), Expr::val(1), Expr::val(2)]
            }
        );
        assert_eq!(expr.to_string(), "x0 + x1 + x2");
    }

    #[test]
    fn test_min_flattens_and_unwraps() {
        let expr = Expr::min(vec![
            Expr::min(vec![Expr::val(0), Expr::val(1)]),
            Expr::val(2),
        ]);
        assert_eq!(expr.to_string(), "MIN(x0, x1, x2)");
        assert_eq!(Expr::min(vec![Expr::val(7)]), Expr::val(7));
    }

    #[test]
    fn test_eval() {
        let leaves = [3.0, 5.0, 2.0];

        let series = Expr::min(vec![Expr::val(0), Expr::val(1) + Expr::val(2)]);
        assert_close(series.eval(&leaves), 3.0);

        let delta = Expr::val(1) - Expr::val(0) - Expr::val(2);
        assert_close(delta.eval(&leaves), 0.0);

        let clamped = Expr::clamp_non_negative(Expr::val(2) - Expr::val(1));
        assert_close(clamped.eval(&leaves), 0.0);
        let clamped = Expr::clamp_non_negative(Expr::val(1) - Expr::val(2));
        assert_close(clamped.eval(&leaves), 3.0);
    }

    #[test]
    fn test_display() {
        let expr = Expr::min(vec![
            Expr::val(0),
            Expr::val(1) + Expr::val(2),
            Expr::clamp_non_negative(Expr::val(1) - Expr::val(2)),
        ]);
        assert_eq!(expr.to_string(), "MIN(x0, x1 + x2, MAX(0.0, x1 - x2))");
    }
}
