//! Compiled models and numeric QUBOs.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::compile::{resolve, Polynomial};
use crate::error::{QuboError, Result};
use crate::sampler::SampleView;

/// Tolerance under which a constraint counts as satisfied.
const CONSTRAINT_EPS: f64 = 1e-9;

/// Placeholder values used to turn a [`Model`] into a [`Qubo`].
///
/// # Examples
///
/// ```
/// use u_qubo::qubo::FeedDict;
///
/// let feed = FeedDict::new().with("H1_cover", 1.0).with("H2_cover", 2.0);
/// assert_eq!(feed.get("H2_cover"), Some(2.0));
/// assert_eq!(feed.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedDict {
    values: BTreeMap<String, f64>,
}

impl FeedDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for FeedDict {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// An expanded expression, ready to be fed placeholder values.
///
/// Produced by [`Expr::compile`](super::Expr::compile).
#[derive(Debug, Clone)]
pub struct Model {
    variables: Vec<String>,
    index: HashMap<String, usize>,
    placeholders: Vec<String>,
    objective: Polynomial,
    constraints: Vec<(String, Polynomial)>,
}

impl Model {
    pub(crate) fn new(
        variables: Vec<String>,
        index: HashMap<String, usize>,
        placeholders: Vec<String>,
        objective: Polynomial,
        constraints: Vec<(String, Polynomial)>,
    ) -> Self {
        Self {
            variables,
            index,
            placeholders,
            objective,
            constraints,
        }
    }

    /// Variable labels in order of first appearance.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Placeholder names in order of first appearance.
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Labels of the constraints embedded in the expression.
    pub fn constraint_labels(&self) -> impl Iterator<Item = &str> {
        self.constraints.iter().map(|(label, _)| label.as_str())
    }

    fn weights(&self, feed: &FeedDict) -> Result<Vec<f64>> {
        self.placeholders
            .iter()
            .map(|name| {
                feed.get(name)
                    .ok_or_else(|| QuboError::MissingPlaceholder(name.clone()))
            })
            .collect()
    }

    /// Substitutes placeholders and returns the numeric QUBO.
    ///
    /// # Errors
    ///
    /// [`QuboError::MissingPlaceholder`] if `feed` lacks a placeholder the
    /// expression uses.
    pub fn to_qubo(&self, feed: &FeedDict) -> Result<Qubo> {
        let weights = self.weights(feed)?;
        let mut qubo = Qubo::with_variables(self.variables.clone());
        for (monomial, coeff) in &self.objective.terms {
            let value = resolve(coeff, &weights);
            match monomial.as_slice() {
                [] => qubo.offset += value,
                [i] => qubo.linear[*i] += value,
                [i, j] => qubo.add_quadratic(*i, *j, value),
                _ => unreachable!("degree is checked at compile time"),
            }
        }
        qubo.quadratic.retain(|_, v| *v != 0.0);
        Ok(qubo)
    }

    /// Evaluates a sample against the full expression and every constraint.
    ///
    /// # Errors
    ///
    /// [`QuboError::UnknownVariable`] if the sample lacks one of the model's
    /// variables, or [`QuboError::MissingPlaceholder`].
    pub fn decode(&self, sample: &SampleView<'_>, feed: &FeedDict) -> Result<DecodedSample> {
        let weights = self.weights(feed)?;
        let values = self
            .variables
            .iter()
            .map(|name| {
                sample
                    .get(name)
                    .ok_or_else(|| QuboError::UnknownVariable(name.clone()))
            })
            .collect::<Result<Vec<u8>>>()?;

        let energy = self.objective.evaluate(&weights, |v| values[v]);
        let constraints = self
            .constraints
            .iter()
            .map(|(label, poly)| {
                let value = poly.evaluate(&weights, |v| values[v]);
                ConstraintReport {
                    label: label.clone(),
                    energy: value,
                    satisfied: value.abs() < CONSTRAINT_EPS,
                }
            })
            .collect();

        Ok(DecodedSample {
            energy,
            constraints,
        })
    }

    /// Index of a variable label.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }
}

/// Outcome of a labelled constraint for one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintReport {
    pub label: String,
    pub energy: f64,
    pub satisfied: bool,
}

/// A sample evaluated against its [`Model`].
#[derive(Debug, Clone)]
pub struct DecodedSample {
    /// Expression value, offset included.
    pub energy: f64,
    /// One entry per constraint, in declaration order.
    pub constraints: Vec<ConstraintReport>,
}

impl DecodedSample {
    /// Constraints whose value is non-zero.
    pub fn broken(&self) -> impl Iterator<Item = &ConstraintReport> {
        self.constraints.iter().filter(|c| !c.satisfied)
    }

    pub fn is_feasible(&self) -> bool {
        self.constraints.iter().all(|c| c.satisfied)
    }
}

/// A numeric QUBO: `E(x) = sum_i a_i x_i + sum_{i<j} b_ij x_i x_j`, plus a
/// constant offset kept apart from the energy.
#[derive(Debug, Clone, PartialEq)]
pub struct Qubo {
    variables: Vec<String>,
    index: HashMap<String, usize>,
    linear: Vec<f64>,
    quadratic: BTreeMap<(usize, usize), f64>,
    offset: f64,
}

impl Qubo {
    /// An all-zero QUBO over the given labels.
    pub fn with_variables(variables: Vec<String>) -> Self {
        let index = variables
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        let n = variables.len();
        Self {
            variables,
            index,
            linear: vec![0.0; n],
            quadratic: BTreeMap::new(),
            offset: 0.0,
        }
    }

    /// Builds a QUBO from `(u, v, bias)` triplets; `u == v` is a linear bias.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_qubo::qubo::Qubo;
    ///
    /// let qubo = Qubo::from_triplets([("a", "a", -1.0), ("a", "b", 2.0)], 0.5);
    /// assert_eq!(qubo.len(), 2);
    /// assert_eq!(qubo.energy(&[1, 1]), 1.0);
    /// assert_eq!(qubo.offset(), 0.5);
    /// ```
    pub fn from_triplets<'a>(
        terms: impl IntoIterator<Item = (&'a str, &'a str, f64)>,
        offset: f64,
    ) -> Self {
        let mut qubo = Qubo::with_variables(Vec::new());
        qubo.offset = offset;
        for (u, v, bias) in terms {
            let i = qubo.intern(u);
            let j = qubo.intern(v);
            if i == j {
                qubo.linear[i] += bias;
            } else {
                qubo.add_quadratic(i, j, bias);
            }
        }
        qubo
    }

    fn intern(&mut self, label: &str) -> usize {
        if let Some(&i) = self.index.get(label) {
            return i;
        }
        let i = self.variables.len();
        self.variables.push(label.to_string());
        self.index.insert(label.to_string(), i);
        self.linear.push(0.0);
        i
    }

    fn add_quadratic(&mut self, i: usize, j: usize, value: f64) {
        let key = if i < j { (i, j) } else { (j, i) };
        *self.quadratic.entry(key).or_insert(0.0) += value;
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn linear(&self) -> &[f64] {
        &self.linear
    }

    /// Pairwise coefficients keyed by `(i, j)` with `i < j`.
    pub fn quadratic(&self) -> &BTreeMap<(usize, usize), f64> {
        &self.quadratic
    }

    /// Energy of an assignment, offset excluded.
    ///
    /// # Panics
    ///
    /// Panics if `sample.len() != self.len()`.
    pub fn energy(&self, sample: &[u8]) -> f64 {
        assert_eq!(sample.len(), self.len(), "sample length mismatch");
        let linear: f64 = self
            .linear
            .iter()
            .zip(sample)
            .filter(|&(_, &x)| x == 1)
            .map(|(a, _)| a)
            .sum();
        let quadratic: f64 = self
            .quadratic
            .iter()
            .filter(|&(&(i, j), _)| sample[i] == 1 && sample[j] == 1)
            .map(|(_, b)| b)
            .sum();
        linear + quadratic
    }

    /// Neighbor lists: for each variable, `(other, coupling)` pairs.
    pub(crate) fn adjacency(&self) -> Vec<Vec<(usize, f64)>> {
        let mut adj = vec![Vec::new(); self.len()];
        for (&(i, j), &b) in &self.quadratic {
            adj[i].push((j, b));
            adj[j].push((i, b));
        }
        adj
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qubo::Expr;
    use crate::sampler::SampleSet;

    fn idle_expr() -> Expr {
        let minutes = [
            ("anime", 30.0),
            ("youtube", 5.0),
            ("amazon", 4.0),
            ("netflix", 3.0),
            ("dorama", 60.0),
        ];
        let used: Expr = minutes.iter().map(|&(n, m)| m * Expr::binary(n)).sum();
        Expr::placeholder("sukima1") * (45.0 - used).pow(2)
    }

    #[test]
    fn test_energy_plus_offset_matches_expression() {
        let model = idle_expr().compile().unwrap();
        let qubo = model.to_qubo(&FeedDict::new().with("sukima1", 1.0)).unwrap();
        let minutes = [30.0, 5.0, 4.0, 3.0, 60.0];
        for bits in 0u32..32 {
            let sample: Vec<u8> = (0..5).map(|k| ((bits >> k) & 1) as u8).collect();
            let used: f64 = sample
                .iter()
                .zip(minutes)
                .map(|(&x, m)| x as f64 * m)
                .sum();
            let expected = (45.0 - used).powi(2);
            let got = qubo.energy(&sample) + qubo.offset();
            assert!((got - expected).abs() < 1e-9, "bits {bits:05b}: {got} != {expected}");
        }
    }

    #[test]
    fn test_offset_and_variable_order() {
        let model = idle_expr().compile().unwrap();
        assert_eq!(model.variables(), ["anime", "youtube", "amazon", "netflix", "dorama"]);
        let qubo = model.to_qubo(&FeedDict::new().with("sukima1", 1.0)).unwrap();
        assert_eq!(qubo.offset(), 2025.0);
        assert_eq!(qubo.linear()[0], 30.0 * 30.0 - 2.0 * 45.0 * 30.0);
        assert_eq!(qubo.quadratic()[&(0, 1)], 2.0 * 30.0 * 5.0);
    }

    #[test]
    fn test_placeholder_scales_qubo() {
        let model = idle_expr().compile().unwrap();
        let one = model.to_qubo(&FeedDict::new().with("sukima1", 1.0)).unwrap();
        let two = model.to_qubo(&FeedDict::new().with("sukima1", 2.0)).unwrap();
        assert_eq!(two.offset(), 2.0 * one.offset());
        assert_eq!(two.linear()[3], 2.0 * one.linear()[3]);
    }

    #[test]
    fn test_missing_placeholder() {
        let model = idle_expr().compile().unwrap();
        let err = model.to_qubo(&FeedDict::new()).unwrap_err();
        assert!(matches!(err, QuboError::MissingPlaceholder(ref p) if p == "sukima1"));
    }

    #[test]
    fn test_decode_reports_broken_constraints() {
        let a = Expr::binary("a");
        let b = Expr::binary("b");
        let h = Expr::placeholder("w") * Expr::constraint((a + b - 1.0).pow(2), "one_hot");
        let model = h.compile().unwrap();
        let feed = FeedDict::new().with("w", 5.0);

        let set = SampleSet::from_samples(
            model.variables().to_vec(),
            vec![(vec![1, 1], 0.0), (vec![0, 1], 0.0)],
        );
        let decoded: Vec<_> = set
            .data()
            .map(|view| model.decode(&view, &feed).unwrap())
            .collect();

        assert!(!decoded[0].is_feasible());
        assert_eq!(decoded[0].energy, 5.0);
        assert_eq!(decoded[0].broken().next().unwrap().label, "one_hot");
        assert!(decoded[1].is_feasible());
        assert_eq!(decoded[1].energy, 0.0);
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let qubo = Qubo::from_triplets([("a", "b", 1.5), ("b", "c", -2.0)], 0.0);
        let adj = qubo.adjacency();
        assert_eq!(adj[0], vec![(1, 1.5)]);
        assert_eq!(adj[1].len(), 2);
        assert_eq!(adj[2], vec![(1, -2.0)]);
    }
}
