//! Polynomial expansion of [`Expr`] trees.
//!
//! Every expression is expanded into a sum of monomials over binary
//! variables. Coefficients are themselves polynomials over placeholders so
//! that one compiled model can be re-fed with different weights.

use std::collections::{BTreeMap, HashMap};

use super::expr::Expr;
use super::model::Model;
use crate::error::{QuboError, Result};

/// Sorted, deduplicated variable indices (`x * x = x` for binaries).
pub(crate) type Monomial = Vec<usize>;

/// Placeholder product (sorted, repeats kept) to numeric factor.
pub(crate) type Coefficient = BTreeMap<Vec<usize>, f64>;

#[derive(Debug, Clone, Default)]
pub(crate) struct Polynomial {
    pub(crate) terms: BTreeMap<Monomial, Coefficient>,
}

impl Polynomial {
    fn constant(value: f64) -> Self {
        Self::single(Vec::new(), Vec::new(), value)
    }

    fn single(monomial: Monomial, placeholders: Vec<usize>, value: f64) -> Self {
        let mut poly = Polynomial::default();
        if value != 0.0 {
            poly.terms
                .entry(monomial)
                .or_default()
                .insert(placeholders, value);
        }
        poly
    }

    fn add_term(&mut self, monomial: Monomial, placeholders: Vec<usize>, value: f64) {
        *self
            .terms
            .entry(monomial)
            .or_default()
            .entry(placeholders)
            .or_insert(0.0) += value;
    }

    fn add_assign(&mut self, other: Polynomial) {
        for (monomial, coeff) in other.terms {
            for (placeholders, value) in coeff {
                self.add_term(monomial.clone(), placeholders, value);
            }
        }
    }

    fn mul(&self, other: &Polynomial) -> Polynomial {
        let mut out = Polynomial::default();
        for (m1, c1) in &self.terms {
            for (m2, c2) in &other.terms {
                let monomial = merge_dedup(m1, m2);
                for (p1, v1) in c1 {
                    for (p2, v2) in c2 {
                        out.add_term(monomial.clone(), merge_keep(p1, p2), v1 * v2);
                    }
                }
            }
        }
        out.prune();
        out
    }

    /// Drops coefficients that cancelled to exactly zero.
    fn prune(&mut self) {
        for coeff in self.terms.values_mut() {
            coeff.retain(|_, v| *v != 0.0);
        }
        self.terms.retain(|_, coeff| !coeff.is_empty());
    }

    pub(crate) fn degree(&self) -> usize {
        self.terms.keys().map(Vec::len).max().unwrap_or(0)
    }

    /// Value of the polynomial for resolved placeholder values and a
    /// variable lookup.
    pub(crate) fn evaluate(&self, weights: &[f64], value_of: impl Fn(usize) -> u8) -> f64 {
        self.terms
            .iter()
            .filter(|(monomial, _)| monomial.iter().all(|&v| value_of(v) == 1))
            .map(|(_, coeff)| resolve(coeff, weights))
            .sum()
    }
}

/// Numeric value of a coefficient given placeholder values.
pub(crate) fn resolve(coeff: &Coefficient, weights: &[f64]) -> f64 {
    coeff
        .iter()
        .map(|(placeholders, value)| {
            placeholders
                .iter()
                .fold(*value, |acc, &p| acc * weights[p])
        })
        .sum()
}

fn merge_dedup(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out: Vec<usize> = a.iter().chain(b).copied().collect();
    out.sort_unstable();
    out.dedup();
    out
}

fn merge_keep(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out: Vec<usize> = a.iter().chain(b).copied().collect();
    out.sort_unstable();
    out
}

/// Walks an expression tree, interning variable and placeholder names.
#[derive(Debug, Default)]
pub(crate) struct Expander {
    variables: Vec<String>,
    variable_index: HashMap<String, usize>,
    placeholders: Vec<String>,
    placeholder_index: HashMap<String, usize>,
    constraints: Vec<(String, Polynomial)>,
}

impl Expander {
    pub(crate) fn expand(&mut self, expr: &Expr) -> Polynomial {
        match expr {
            Expr::Num(v) => Polynomial::constant(*v),
            Expr::Binary(name) => {
                let idx = intern(&mut self.variables, &mut self.variable_index, name);
                Polynomial::single(vec![idx], Vec::new(), 1.0)
            }
            Expr::Placeholder(name) => {
                let idx = intern(&mut self.placeholders, &mut self.placeholder_index, name);
                Polynomial::single(Vec::new(), vec![idx], 1.0)
            }
            Expr::Add(items) => {
                let mut sum = Polynomial::default();
                for item in items {
                    sum.add_assign(self.expand(item));
                }
                sum.prune();
                sum
            }
            Expr::Mul(lhs, rhs) => {
                let l = self.expand(lhs);
                let r = self.expand(rhs);
                l.mul(&r)
            }
            Expr::Constraint { label, expr } => {
                let inner = self.expand(expr);
                self.constraints.push((label.clone(), inner.clone()));
                inner
            }
        }
    }

    pub(crate) fn finish(self, objective: Polynomial) -> Result<Model> {
        let degree = objective.degree();
        if let Some(monomial) = objective.terms.keys().find(|m| m.len() == degree && degree > 2) {
            let term = monomial
                .iter()
                .map(|&v| self.variables[v].as_str())
                .collect::<Vec<_>>()
                .join("*");
            return Err(QuboError::DegreeTooHigh { degree, term });
        }
        Ok(Model::new(
            self.variables,
            self.variable_index,
            self.placeholders,
            objective,
            self.constraints,
        ))
    }
}

fn intern(names: &mut Vec<String>, index: &mut HashMap<String, usize>, name: &str) -> usize {
    if let Some(&idx) = index.get(name) {
        return idx;
    }
    let idx = names.len();
    names.push(name.to_string());
    index.insert(name.to_string(), idx);
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(expr: &Expr) -> (Expander, Polynomial) {
        let mut expander = Expander::default();
        let poly = expander.expand(expr);
        (expander, poly)
    }

    #[test]
    fn test_binary_square_is_idempotent() {
        let a = Expr::binary("a");
        let (_, poly) = expand(&(a.clone() * a));
        assert_eq!(poly.terms.len(), 1);
        assert_eq!(poly.degree(), 1);
    }

    #[test]
    fn test_cancellation_drops_term() {
        let a = Expr::binary("a");
        let (_, poly) = expand(&(a.clone() - a));
        assert!(poly.terms.is_empty());
    }

    #[test]
    fn test_square_of_one_hot_sum() {
        // (a + b - 1)^2 = 1 - a - b + 2ab
        let e = (Expr::binary("a") + Expr::binary("b") - 1.0).pow(2);
        let (_, poly) = expand(&e);
        let value = |m: Vec<usize>| resolve(&poly.terms[&m], &[]);
        assert_eq!(value(vec![]), 1.0);
        assert_eq!(value(vec![0]), -1.0);
        assert_eq!(value(vec![1]), -1.0);
        assert_eq!(value(vec![0, 1]), 2.0);
    }

    #[test]
    fn test_placeholder_products_keep_repeats() {
        let w = Expr::placeholder("w");
        let (_, poly) = expand(&(w.clone() * w * Expr::binary("a")));
        let coeff = &poly.terms[&vec![0]];
        assert_eq!(resolve(coeff, &[3.0]), 9.0);
    }

    #[test]
    fn test_constraints_are_recorded_unweighted() {
        let inner = Expr::binary("a") - 1.0;
        let e = Expr::placeholder("w") * Expr::constraint(inner, "c");
        let (expander, _) = expand(&e);
        assert_eq!(expander.constraints.len(), 1);
        let (label, poly) = &expander.constraints[0];
        assert_eq!(label, "c");
        assert_eq!(poly.evaluate(&[], |_| 1), 0.0);
        assert_eq!(poly.evaluate(&[], |_| 0), -1.0);
    }

    #[test]
    fn test_highest_degree_term_is_reported() {
        let (a, b, c, d) = (
            Expr::binary("a"),
            Expr::binary("b"),
            Expr::binary("c"),
            Expr::binary("d"),
        );
        let e = a.clone() * b.clone() * c.clone() + a * b * c * d;
        match e.compile().unwrap_err() {
            QuboError::DegreeTooHigh { degree, term } => {
                assert_eq!(degree, 4);
                assert_eq!(term, "a*b*c*d");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_cubic_term_is_rejected() {
        let e = Expr::binary("a") * Expr::binary("b") * Expr::binary("c");
        let err = e.compile().unwrap_err();
        assert!(matches!(err, QuboError::DegreeTooHigh { degree: 3, .. }));
    }
}
