//! Symbolic expressions over binary variables.

use std::iter::Sum;
use std::ops::{Add, Mul, Neg, Sub};

use super::compile::Expander;
use super::model::Model;
use crate::error::Result;

/// A Hamiltonian before compilation.
///
/// Expressions are built from binary variables, numeric constants and named
/// placeholders (weights whose value is supplied later through a
/// [`FeedDict`](super::FeedDict)), combined with `+`, `-`, `*` and
/// [`pow`](Expr::pow).
///
/// # Examples
///
/// ```
/// use u_qubo::qubo::{Expr, FeedDict};
///
/// let a = Expr::binary("a");
/// let b = Expr::binary("b");
/// let h = Expr::placeholder("w") * (a + b - 1.0).pow(2);
///
/// let model = h.compile().unwrap();
/// let qubo = model.to_qubo(&FeedDict::new().with("w", 2.0)).unwrap();
/// // exactly one of a, b set: zero energy
/// assert_eq!(qubo.energy(&[1, 0]) + qubo.offset(), 0.0);
/// assert_eq!(qubo.energy(&[1, 1]) + qubo.offset(), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric constant.
    Num(f64),
    /// Named binary variable taking values in {0, 1}.
    Binary(String),
    /// Named weight resolved at [`Model::to_qubo`] time.
    Placeholder(String),
    /// Sum of sub-expressions.
    Add(Vec<Expr>),
    /// Product of two sub-expressions.
    Mul(Box<Expr>, Box<Expr>),
    /// Labelled sub-expression whose value is reported when decoding samples.
    ///
    /// A constraint is satisfied when its own value is zero.
    Constraint { label: String, expr: Box<Expr> },
}

impl Expr {
    pub fn num(value: f64) -> Self {
        Expr::Num(value)
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Expr::Binary(name.into())
    }

    pub fn placeholder(name: impl Into<String>) -> Self {
        Expr::Placeholder(name.into())
    }

    /// Wraps `expr` as a labelled constraint.
    pub fn constraint(expr: Expr, label: impl Into<String>) -> Self {
        Expr::Constraint {
            label: label.into(),
            expr: Box::new(expr),
        }
    }

    /// Raises the expression to a non-negative integer power.
    pub fn pow(self, exponent: u32) -> Self {
        if exponent == 0 {
            return Expr::Num(1.0);
        }
        let mut result = self.clone();
        for _ in 1..exponent {
            result = result * self.clone();
        }
        result
    }

    /// Expands the expression into a [`Model`].
    ///
    /// # Errors
    ///
    /// [`QuboError::DegreeTooHigh`](crate::QuboError::DegreeTooHigh) when a
    /// term multiplies more than two distinct binary variables.
    pub fn compile(&self) -> Result<Model> {
        let mut expander = Expander::default();
        let objective = expander.expand(self);
        expander.finish(objective)
    }
}

impl Default for Expr {
    fn default() -> Self {
        Expr::Num(0.0)
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Num(value)
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        match (self, rhs) {
            (Expr::Add(mut lhs), Expr::Add(rhs)) => {
                lhs.extend(rhs);
                Expr::Add(lhs)
            }
            (Expr::Add(mut lhs), rhs) => {
                lhs.push(rhs);
                Expr::Add(lhs)
            }
            (lhs, Expr::Add(mut rhs)) => {
                rhs.insert(0, lhs);
                Expr::Add(rhs)
            }
            (lhs, rhs) => Expr::Add(vec![lhs, rhs]),
        }
    }
}

impl Add<f64> for Expr {
    type Output = Expr;

    fn add(self, rhs: f64) -> Expr {
        self + Expr::Num(rhs)
    }
}

impl Add<Expr> for f64 {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::Num(self) + rhs
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::Num(-1.0) * self
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        self + (-rhs)
    }
}

impl Sub<f64> for Expr {
    type Output = Expr;

    fn sub(self, rhs: f64) -> Expr {
        self + Expr::Num(-rhs)
    }
}

impl Sub<Expr> for f64 {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::Num(self) + (-rhs)
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::Mul(Box::new(self), Box::new(rhs))
    }
}

impl Mul<f64> for Expr {
    type Output = Expr;

    fn mul(self, rhs: f64) -> Expr {
        Expr::Mul(Box::new(self), Box::new(Expr::Num(rhs)))
    }
}

impl Mul<Expr> for f64 {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::Mul(Box::new(Expr::Num(self)), Box::new(rhs))
    }
}

impl Sum for Expr {
    fn sum<I: Iterator<Item = Expr>>(iter: I) -> Expr {
        iter.fold(Expr::Num(0.0), |acc, e| acc + e)
    }
}

/// A named 2-D array of binary variables labelled `name[i][j]`.
///
/// # Examples
///
/// ```
/// use u_qubo::qubo::BinaryArray;
///
/// let x = BinaryArray::new("x", 2, 3);
/// assert_eq!(x.label(1, 2), "x[1][2]");
/// assert_eq!(x.row(0).count(), 3);
/// assert_eq!(x.column(0).count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct BinaryArray {
    name: String,
    rows: usize,
    cols: usize,
}

impl BinaryArray {
    pub fn new(name: impl Into<String>, rows: usize, cols: usize) -> Self {
        Self {
            name: name.into(),
            rows,
            cols,
        }
    }

    /// Returns `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Variable label of cell `(i, j)`.
    pub fn label(&self, i: usize, j: usize) -> String {
        format!("{}[{}][{}]", self.name, i, j)
    }

    /// Binary variable of cell `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `(i, j)` is outside the array.
    pub fn get(&self, i: usize, j: usize) -> Expr {
        assert!(
            i < self.rows && j < self.cols,
            "index ({i}, {j}) out of bounds for {}x{} array `{}`",
            self.rows,
            self.cols,
            self.name
        );
        Expr::Binary(self.label(i, j))
    }

    /// Variables of row `i`, left to right.
    pub fn row(&self, i: usize) -> impl Iterator<Item = Expr> + '_ {
        (0..self.cols).map(move |j| self.get(i, j))
    }

    /// Variables of column `j`, top to bottom.
    pub fn column(&self, j: usize) -> impl Iterator<Item = Expr> + '_ {
        (0..self.rows).map(move |i| self.get(i, j))
    }
}
