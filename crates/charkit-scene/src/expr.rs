//! Driver expression trees.
//!
//! The host's live-driver model evaluates a scripted expression every
//! frame. Here that contract is kept, but the expression is an explicit
//! tree (weighted variable reads combined by sum/max and clamped) instead
//! of a concatenated string: [`Expr::eval`] runs it, and `Display` renders
//! the canonical expression text for inspection and round-trip fidelity.

use serde::{Deserialize, Serialize};

/// Tuning for the session-registered nonlinear remap applied to retargeted
/// motion-capture contributions. Read from custom properties on the ARKit
/// proxy rig at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RemapParams {
    /// Overall output strength.
    pub strength: f64,
    /// Curve relaxation; 0 is linear, larger values flatten small inputs.
    pub relaxation: f64,
    /// Extra gain on horizontal contributions.
    pub h_bias: f64,
    /// Extra gain on vertical contributions.
    pub v_bias: f64,
}

impl Default for RemapParams {
    fn default() -> Self {
        Self {
            strength: 1.0,
            relaxation: 0.0,
            h_bias: 0.0,
            v_bias: 0.0,
        }
    }
}

impl RemapParams {
    /// Applies the remap to one contribution value.
    pub fn apply(&self, value: f64, vertical: bool) -> f64 {
        let bias = if vertical { self.v_bias } else { self.h_bias };
        let exponent = 1.0 / (1.0 + self.relaxation.max(0.0));
        let shaped = value.signum() * value.abs().powf(exponent);
        (shaped * self.strength * (1.0 + bias)).clamp(-1.0, 1.0)
    }
}

/// Context for expression evaluation: a variable resolver plus the
/// optional session remap registration.
pub struct EvalContext<'a> {
    /// Resolves a driver variable name to its live value. A miss evaluates
    /// as 0.0 (the contribution is dropped, never an error).
    pub resolver: &'a dyn Fn(&str) -> Option<f64>,
    /// Remap parameters, present once registered for the session.
    pub remap: Option<RemapParams>,
}

impl<'a> EvalContext<'a> {
    /// Creates a context with no remap registered.
    pub fn new(resolver: &'a dyn Fn(&str) -> Option<f64>) -> Self {
        Self {
            resolver,
            remap: None,
        }
    }

    /// Creates a context with the remap registered.
    pub fn with_remap(resolver: &'a dyn Fn(&str) -> Option<f64>, remap: RemapParams) -> Self {
        Self {
            resolver,
            remap: Some(remap),
        }
    }
}

/// A driver expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Expr {
    /// Literal constant.
    Const {
        /// The value.
        value: f64,
    },
    /// A driver variable read.
    Var {
        /// Variable name bound on the driver.
        name: String,
    },
    /// Sum of terms.
    Sum {
        /// Terms, in emission order.
        terms: Vec<Expr>,
    },
    /// Left minus right.
    Sub {
        /// Minuend.
        lhs: Box<Expr>,
        /// Subtrahend.
        rhs: Box<Expr>,
    },
    /// Product of two expressions.
    Mul {
        /// Left factor.
        lhs: Box<Expr>,
        /// Right factor.
        rhs: Box<Expr>,
    },
    /// Left divided by right; division by zero evaluates to 0.0.
    Div {
        /// Dividend.
        lhs: Box<Expr>,
        /// Divisor.
        rhs: Box<Expr>,
    },
    /// Negation.
    Neg {
        /// Negated expression.
        value: Box<Expr>,
    },
    /// Maximum of terms.
    Max {
        /// Terms.
        terms: Vec<Expr>,
    },
    /// Minimum of terms.
    Min {
        /// Terms.
        terms: Vec<Expr>,
    },
    /// Clamp into [lo, hi].
    Clamp {
        /// Clamped expression.
        value: Box<Expr>,
        /// Lower bound.
        lo: f64,
        /// Upper bound.
        hi: f64,
    },
    /// The session-registered ARKit remap call. Evaluates to its argument
    /// unchanged when no remap is registered.
    ArkitRemap {
        /// Remapped expression.
        value: Box<Expr>,
        /// True for vertical-axis contributions.
        vertical: bool,
    },
}

impl Expr {
    /// Constant shorthand.
    pub fn constant(value: f64) -> Self {
        Expr::Const { value }
    }

    /// Variable shorthand.
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var { name: name.into() }
    }

    /// `weight * var / distance` — the canonical weighted-contribution term.
    pub fn contribution(weight: f64, var: impl Into<String>, distance: f64) -> Self {
        Expr::Div {
            lhs: Box::new(Expr::Mul {
                lhs: Box::new(Expr::constant(weight)),
                rhs: Box::new(Expr::var(var)),
            }),
            rhs: Box::new(Expr::constant(distance)),
        }
    }

    /// Clamps this expression into [lo, hi].
    pub fn clamped(self, lo: f64, hi: f64) -> Self {
        Expr::Clamp {
            value: Box::new(self),
            lo,
            hi,
        }
    }

    /// Evaluates the expression against the context.
    pub fn eval(&self, ctx: &EvalContext<'_>) -> f64 {
        match self {
            Expr::Const { value } => *value,
            Expr::Var { name } => (ctx.resolver)(name).unwrap_or(0.0),
            Expr::Sum { terms } => terms.iter().map(|t| t.eval(ctx)).sum(),
            Expr::Sub { lhs, rhs } => lhs.eval(ctx) - rhs.eval(ctx),
            Expr::Mul { lhs, rhs } => lhs.eval(ctx) * rhs.eval(ctx),
            Expr::Div { lhs, rhs } => {
                let d = rhs.eval(ctx);
                if d.abs() < f64::EPSILON {
                    0.0
                } else {
                    lhs.eval(ctx) / d
                }
            }
            Expr::Neg { value } => -value.eval(ctx),
            Expr::Max { terms } => terms
                .iter()
                .map(|t| t.eval(ctx))
                .fold(f64::NEG_INFINITY, f64::max),
            Expr::Min { terms } => terms
                .iter()
                .map(|t| t.eval(ctx))
                .fold(f64::INFINITY, f64::min),
            Expr::Clamp { value, lo, hi } => value.eval(ctx).clamp(*lo, *hi),
            Expr::ArkitRemap { value, vertical } => {
                let v = value.eval(ctx);
                match ctx.remap {
                    Some(remap) => remap.apply(v, *vertical),
                    None => v,
                }
            }
        }
    }

    /// All variable names read by this expression, in reading order.
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_vars(&mut out);
        out
    }

    fn collect_vars<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Const { .. } => {}
            Expr::Var { name } => out.push(name),
            Expr::Sum { terms } | Expr::Max { terms } | Expr::Min { terms } => {
                for t in terms {
                    t.collect_vars(out);
                }
            }
            Expr::Sub { lhs, rhs } | Expr::Mul { lhs, rhs } | Expr::Div { lhs, rhs } => {
                lhs.collect_vars(out);
                rhs.collect_vars(out);
            }
            Expr::Neg { value } | Expr::Clamp { value, .. } | Expr::ArkitRemap { value, .. } => {
                value.collect_vars(out)
            }
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Const { value } => write!(f, "{value}"),
            Expr::Var { name } => write!(f, "{name}"),
            Expr::Sum { terms } => {
                write!(f, "(")?;
                for (i, t) in terms.iter().enumerate() {
                    if i > 0 {
                        write!(f, " + ")?;
                    }
                    write!(f, "{t}")?;
                }
                write!(f, ")")
            }
            Expr::Sub { lhs, rhs } => write!(f, "({lhs} - {rhs})"),
            Expr::Mul { lhs, rhs } => write!(f, "({lhs} * {rhs})"),
            Expr::Div { lhs, rhs } => write!(f, "({lhs} / {rhs})"),
            Expr::Neg { value } => write!(f, "(-{value})"),
            Expr::Max { terms } => {
                write!(f, "max(")?;
                for (i, t) in terms.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{t}")?;
                }
                write!(f, ")")
            }
            Expr::Min { terms } => {
                write!(f, "min(")?;
                for (i, t) in terms.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{t}")?;
                }
                write!(f, ")")
            }
            Expr::Clamp { value, lo, hi } => write!(f, "min(max({value}, {lo}), {hi})"),
            Expr::ArkitRemap { value, vertical } => {
                let axis = if *vertical { "V" } else { "H" };
                write!(f, "rl_arkit({value}, '{axis}')")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn ctx_of(vars: &HashMap<String, f64>) -> impl Fn(&str) -> Option<f64> + '_ {
        move |name| vars.get(name).copied()
    }

    #[test]
    fn weighted_sum_evaluates() {
        // 0.6*a/10 + 0.4*b/10 with a=5, b=0 -> 0.3
        let expr = Expr::Sum {
            terms: vec![
                Expr::contribution(0.6, "a", 10.0),
                Expr::contribution(0.4, "b", 10.0),
            ],
        }
        .clamped(0.0, 1.0);

        let mut vars = HashMap::new();
        vars.insert("a".to_string(), 5.0);
        vars.insert("b".to_string(), 0.0);
        let resolver = ctx_of(&vars);
        let ctx = EvalContext::new(&resolver);
        assert!((expr.eval(&ctx) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn missing_variable_drops_to_zero() {
        let expr = Expr::contribution(1.0, "gone", 2.0);
        let vars = HashMap::new();
        let resolver = ctx_of(&vars);
        let ctx = EvalContext::new(&resolver);
        assert_eq!(expr.eval(&ctx), 0.0);
    }

    #[test]
    fn division_by_zero_is_zero() {
        let expr = Expr::Div {
            lhs: Box::new(Expr::constant(1.0)),
            rhs: Box::new(Expr::constant(0.0)),
        };
        let vars = HashMap::new();
        let resolver = ctx_of(&vars);
        assert_eq!(expr.eval(&EvalContext::new(&resolver)), 0.0);
    }

    #[test]
    fn clamp_renders_min_max_form() {
        let expr = Expr::var("v").clamped(-1.0, 1.0);
        assert_eq!(expr.to_string(), "min(max(v, -1), 1)");
    }

    #[test]
    fn arkit_remap_renders_the_host_call() {
        let expr = Expr::ArkitRemap {
            value: Box::new(Expr::var("v")),
            vertical: true,
        };
        assert_eq!(expr.to_string(), "rl_arkit(v, 'V')");
        let expr = Expr::ArkitRemap {
            value: Box::new(Expr::var("v")),
            vertical: false,
        };
        assert_eq!(expr.to_string(), "rl_arkit(v, 'H')");
    }

    #[test]
    fn remap_is_identity_when_unregistered() {
        let expr = Expr::ArkitRemap {
            value: Box::new(Expr::var("v")),
            vertical: true,
        };
        let mut vars = HashMap::new();
        vars.insert("v".to_string(), 0.4);
        let resolver = ctx_of(&vars);
        assert!((expr.eval(&EvalContext::new(&resolver)) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn remap_applies_strength_and_bias() {
        let expr = Expr::ArkitRemap {
            value: Box::new(Expr::var("v")),
            vertical: false,
        };
        let mut vars = HashMap::new();
        vars.insert("v".to_string(), 0.5);
        let resolver = ctx_of(&vars);
        let remap = RemapParams {
            strength: 0.5,
            relaxation: 0.0,
            h_bias: 0.2,
            v_bias: 0.0,
        };
        let ctx = EvalContext::with_remap(&resolver, remap);
        // linear relaxation: 0.5 * 0.5 * 1.2 = 0.3
        assert!((expr.eval(&ctx) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn variables_collected_in_order() {
        let expr = Expr::Sum {
            terms: vec![
                Expr::contribution(1.0, "a", 1.0),
                Expr::contribution(1.0, "b", 1.0),
            ],
        };
        assert_eq!(expr.variables(), vec!["a", "b"]);
    }
}
